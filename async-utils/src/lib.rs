//! Small async building blocks shared by the roster crates.

mod debounce;

pub use debounce::DEFAULT_DEBOUNCE;
pub use debounce::Debouncer;
