pub mod api;
pub mod config;
pub mod preferences;
pub mod submission;

pub use api::{ApiClient, ClientError, ScoreApi};
pub use config::{ClientConfig, Credentials};
pub use preferences::{CarColor, Preferences};
pub use submission::{PendingSubmission, RetryPolicy, SubmissionOutcome};
