//! Asynchronous group processing
//!
//! Balance computation and settlement planning are pure, so groups can be
//! settled concurrently without any coordination beyond collecting results.
//!
//! - **BatchProcessor**: spawns one tokio task per group and gathers outcomes
//!   in a DashMap keyed by group id

pub mod batch_processor;

pub use batch_processor::{BatchProcessor, GroupOutcome};
