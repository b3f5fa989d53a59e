pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod store;
pub mod types;

pub use auth::*;
pub use config::*;
pub use error::*;
pub use routes::*;
pub use store::*;
pub use types::*;
