#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Reference resource manager (spec §6): subprocess execution with
//! cooperative cancellation, and output-path boundary validation.

mod manager;
mod tokio_manager;

pub use manager::ResourceManager;
pub use tokio_manager::TokioResourceManager;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeOutcome, FakeResourceManager, RecordedCall};
