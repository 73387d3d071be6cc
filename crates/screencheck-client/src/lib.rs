pub mod collector;
pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use collector::CollectorClient;
pub use config::*;
pub use error::SubmitError;
pub use traits::*;
pub use types::*;
