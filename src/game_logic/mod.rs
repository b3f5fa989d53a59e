pub mod constants;
pub mod components;
pub mod config;
pub mod difficulty;
pub mod motion;
pub mod lap_system;
pub mod scoring;
pub mod session;
pub mod track;

pub use constants::*;
pub use components::*;
pub use config::*;
pub use difficulty::*;
pub use motion::*;
pub use lap_system::*;
pub use scoring::*;
pub use session::*;
pub use track::*;
