pub mod error;
pub mod loan;
pub mod types;

pub use error::AutoLoanError;
pub use types::*;

/// Standard result type for all engine operations
pub type AutoLoanResult<T> = Result<T, AutoLoanError>;
