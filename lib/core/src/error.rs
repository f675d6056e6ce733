//! Error handling foundation for flowdeck.
//!
//! Library crates define their own domain-specific error enums. Outer layers
//! (the CLI, a persistence service) wrap them in rootcause reports and add
//! their own context as errors propagate up the stack.

use rootcause::Report;

/// A Result type alias using rootcause's Report for error handling.
pub type Result<T, C = ()> = std::result::Result<T, Report<C>>;
