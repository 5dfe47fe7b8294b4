//! # Vultr Utils
//!
//! Helpers shared by the API client and the CLI: request value encoding,
//! parsing of the API's text-typed numbers and dates, and human-readable
//! formatting.

pub mod encoding;
pub mod errors;
pub mod formatters;
pub mod parsers;

// Re-export common types for convenience
pub use encoding::*;
pub use errors::*;
pub use formatters::*;
pub use parsers::*;
