//! # Adaptune Common
//!
//! Shared types and errors for the Adaptune controller tuning workspace.
//!
//! ## Core Types
//!
//! - [`ParameterVector`]: ordered, fixed-arity tuple of controller coefficients
//!
//! ## Errors
//!
//! - [`AdaptuneError`]: unified error with [`ModelError`], [`ManagerError`] and
//!   [`MonitorError`] domain variants

pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{AdaptuneError, ManagerError, ModelError, MonitorError, Result};
pub use types::parameters::ParameterVector;

/// Adaptune version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Decimal places used when rendering parameters for logs
pub const PARAMETER_DISPLAY_PRECISION: usize = 4;
