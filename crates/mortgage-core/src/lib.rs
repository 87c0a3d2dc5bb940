pub mod amortization;
pub mod apr;
pub mod error;
pub mod pipeline;
pub mod rates;
pub mod risk;
pub mod schedule;
pub mod store;
pub mod tax;
pub mod types;

pub use error::MortgageError;
pub use types::*;

/// Standard result type for all mortgage-pipeline operations
pub type MortgageResult<T> = Result<T, MortgageError>;
