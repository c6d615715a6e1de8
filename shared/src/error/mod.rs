//! Unified error system
//!
//! - [`ErrorCode`]: standardized numeric codes grouped by domain
//! - [`AppError`]: code + message + optional details, the user-facing error
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::CartEmpty);
//! assert_eq!(err.code.code(), 3003);
//!
//! let err = AppError::validation("Phone is required").with_detail("field", "phone");
//! assert!(err.details.is_some());
//! ```

mod codes;
mod types;

pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};
