//! Terminal output: step-by-step progress lines on stderr

mod progress;

pub use progress::{Progress, Status};

#[cfg(test)]
pub(crate) use progress::test_support;
