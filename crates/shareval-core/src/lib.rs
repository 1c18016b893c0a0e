pub mod error;
pub mod types;

#[cfg(feature = "valuation")]
pub mod valuation;

#[cfg(feature = "tax")]
pub mod tax;

#[cfg(feature = "projection")]
pub mod projection;

#[cfg(feature = "session")]
pub mod session;

#[cfg(feature = "tabular")]
pub mod tabular;

pub use error::ShareValError;
pub use types::*;

/// Standard result type for all shareval operations
pub type ShareValResult<T> = Result<T, ShareValError>;
