//! Submission dispatch for the Gavel online judge.
//!
//! A [`Dispatcher`] owns a FIFO queue of submission ids and exactly one
//! worker task that drains it, so at most one judge job runs at a time.

pub mod dispatcher;
pub mod worker;

pub use dispatcher::{DispatchHandle, Dispatcher};
