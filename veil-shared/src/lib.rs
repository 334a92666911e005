pub mod types;
pub mod errors;
pub mod middleware;
pub mod clients;
pub mod reaction;

pub use types::*;
pub use errors::{AppError, ErrorCode, AppResult};
