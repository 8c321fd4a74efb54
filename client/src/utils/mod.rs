//! Client-side helpers. Pure formatting lives in `lib-utils`.

pub mod timing;
pub mod validation;

pub use timing::{Debouncer, Throttler};
pub use validation::ValidationResult;
