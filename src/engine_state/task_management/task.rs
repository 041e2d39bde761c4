//! # Task System Core Trait
//!
//! This module defines the unit of work executed by the task system.
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and scheduled via `TaskManager::publish_task()`
//! 2. The task's `process()` method is called on a worker thread
//! 3. The task returns its `Output`
//! 4. The output is collected on the owning thread by `process_completed_tasks()`
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be transferred to a worker
//! - `Output` must be `Send` to be transferred back
//! - Tasks own everything they need; shared inputs are behind `Arc`

/// A unit of work that can be executed on a worker thread.
///
/// Tasks are the primary mechanism for offloading work from the owning thread. They
/// should be self-contained and own all the data they need to perform their work.
///
/// # Implementation Guidelines
/// - Should be relatively coarse-grained to amortize scheduling overhead
/// - Must not touch state that the owning thread mutates
pub trait Task: Send + 'static {
    /// What the task hands back to the owning thread.
    type Output: Send + 'static;

    /// Processes the task and returns its output.
    ///
    /// Runs on a worker thread. Any failure must be expressed in `Output`.
    fn process(&self) -> Self::Output;
}
