//! # Task Management System
//!
//! This module provides a small worker pool for executing work on background threads.
//! The owning thread publishes tasks, workers process them, and the owning thread
//! collects outputs whenever it is ready to apply them.
//!
//! ## Architecture Overview
//!
//! - `TaskManager`: Central coordinator for task distribution and worker management
//! - `Task`: A unit of work that can be executed on a worker
//! - `TaskChannel`: Communication channel between the owning thread and one worker
//!
//! ## Task Lifecycle
//! 1. Tasks are created and published via `TaskManager::publish_task()`
//! 2. The manager distributes tasks to available worker channels using round-robin
//! 3. Workers process tasks and send their outputs back
//! 4. Outputs are collected on the owning thread in `process_completed_tasks()`
//! 5. Queued tasks are handed out as workers free up
//!
//! ## Example Usage
//! ```
//! use voxel_world::engine_state::task_management::{task::Task, TaskManager};
//!
//! struct Square(u64);
//!
//! impl Task for Square {
//!     type Output = u64;
//!     fn process(&self) -> u64 {
//!         self.0 * self.0
//!     }
//! }
//!
//! let mut task_manager = TaskManager::new(2);
//! for i in 0..4 {
//!     task_manager.publish_task(Square(i));
//! }
//! let mut outputs = task_manager.wait_for_all();
//! outputs.sort();
//! assert_eq!(outputs, vec![0, 1, 4, 9]);
//! ```

pub mod task;

use std::{
    collections::VecDeque,
    sync::mpsc::{channel, Receiver, Sender},
    thread::{self, JoinHandle},
};

use log::{debug, error};
use task::Task;

/// A communication channel between the owning thread and a worker thread.
///
/// # Implementation Notes
/// - Each channel is backed by one OS thread
/// - Dropping the sender ends the worker's receive loop
#[derive(Debug)]
pub struct TaskChannel<T: Task> {
    task_sender: Sender<T>,
    result_receiver: Receiver<T::Output>,
    num_tasks_in_flight: usize,
    _worker: JoinHandle<()>,
}

/// Manages a pool of worker threads and coordinates task execution.
///
/// The `TaskManager` is responsible for:
/// - Creating the worker threads
/// - Distributing tasks across available workers
/// - Collecting task outputs
/// - Queuing tasks when all workers are busy
pub struct TaskManager<T: Task> {
    channels: Vec<TaskChannel<T>>,
    queued_tasks: VecDeque<T>,
    current_channel: usize,
}

/// Maximum number of tasks that can be in flight per worker channel.
///
/// Keeping this at 1 leaves undispatched work in the queue, where it can still be
/// cancelled with `retain_queued`.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

impl<T: Task> TaskManager<T> {
    /// Creates a new `TaskManager` with the specified number of worker threads.
    ///
    /// # Arguments
    /// * `num_workers` - Number of worker threads to create. With zero workers every
    ///   published task stays queued.
    pub fn new(num_workers: usize) -> Self {
        let mut channels = Vec::with_capacity(num_workers);

        for index in 0..num_workers {
            let (task_tx, task_rx) = channel::<T>();
            let (result_tx, result_rx) = channel::<T::Output>();

            let task_closure = move || {
                while let Ok(task) = task_rx.recv() {
                    let result = task.process();
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
            };

            let worker = thread::Builder::new()
                .name(format!("voxel-worker-{index}"))
                .spawn(task_closure);
            match worker {
                Ok(worker) => channels.push(TaskChannel {
                    task_sender: task_tx,
                    result_receiver: result_rx,
                    num_tasks_in_flight: 0,
                    _worker: worker,
                }),
                Err(err) => error!("Failed to spawn worker {}: {}", index, err),
            }
        }

        debug!(
            "Started {} workers (available parallelism: {:?})",
            channels.len(),
            thread::available_parallelism()
        );

        TaskManager {
            channels,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
        }
    }

    pub fn worker_count(&self) -> usize {
        self.channels.len()
    }

    /// Tasks dispatched to workers whose output has not been collected yet.
    pub fn in_flight(&self) -> usize {
        self.channels.iter().map(|c| c.num_tasks_in_flight).sum()
    }

    pub fn queued(&self) -> usize {
        self.queued_tasks.len()
    }

    /// Whether no task is queued or in flight.
    pub fn is_idle(&self) -> bool {
        self.queued_tasks.is_empty() && self.in_flight() == 0
    }

    /// Attempts to send a task to a specific worker channel.
    ///
    /// # Returns
    /// - `Ok(())` if the task was sent
    /// - `Err(task)` if the worker has disconnected, handing the task back for requeueing
    fn try_send_task(&mut self, task: T, channel_idx: usize) -> Result<(), T> {
        match self.channels[channel_idx].task_sender.send(task) {
            Ok(_) => {
                self.channels[channel_idx].num_tasks_in_flight += 1;
                Ok(())
            }
            Err(task) => Err(task.0),
        }
    }

    /// Finds an available worker channel, round-robin from the last used channel.
    ///
    /// Channels that have reached `MAX_TASKS_IN_FLIGHT` are skipped.
    fn find_available_channel(&self) -> Option<usize> {
        let len = self.channels.len();
        (0..len)
            .map(|step| (self.current_channel + step) % len)
            .find(|&idx| self.channels[idx].num_tasks_in_flight < MAX_TASKS_IN_FLIGHT)
    }

    /// Publishes a new task for execution.
    ///
    /// # Returns
    /// - `true` if the task was immediately dispatched to a worker
    /// - `false` if the task was queued because all workers are busy
    pub fn publish_task(&mut self, task: T) -> bool {
        match self.find_available_channel() {
            Some(channel_idx) => match self.try_send_task(task, channel_idx) {
                Ok(_) => {
                    self.current_channel = (channel_idx + 1) % self.channels.len();
                    true
                }
                Err(task) => {
                    self.queued_tasks.push_back(task);
                    false
                }
            },
            None => {
                self.queued_tasks.push_back(task);
                false
            }
        }
    }

    /// Dispatches queued tasks, oldest first, while workers are available.
    pub fn process_queued_tasks(&mut self) {
        while let Some(channel_idx) = self.find_available_channel() {
            let Some(task) = self.queued_tasks.pop_front() else {
                return;
            };
            match self.try_send_task(task, channel_idx) {
                Ok(_) => self.current_channel = (channel_idx + 1) % self.channels.len(),
                Err(task) => {
                    // Channel is disconnected, put task back and stop processing
                    self.queued_tasks.push_front(task);
                    return;
                }
            }
        }
    }

    /// Drops queued tasks for which `keep` returns `false`. Returns how many were dropped.
    ///
    /// Tasks already dispatched cannot be recalled; their outputs must be filtered by
    /// the caller.
    pub fn retain_queued<F>(&mut self, keep: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let before = self.queued_tasks.len();
        self.queued_tasks.retain(keep);
        before - self.queued_tasks.len()
    }

    /// Collects every output that is ready without blocking, then refills idle workers.
    pub fn process_completed_tasks(&mut self) -> Vec<T::Output> {
        let mut outputs = Vec::new();
        for channel in &mut self.channels {
            while let Ok(result) = channel.result_receiver.try_recv() {
                channel.num_tasks_in_flight -= 1;
                outputs.push(result);
            }
        }
        self.process_queued_tasks();
        outputs
    }

    /// Blocks until every queued and in-flight task has finished and returns all outputs.
    ///
    /// A worker that dies mid-task is logged and its task is lost.
    pub fn wait_for_all(&mut self) -> Vec<T::Output> {
        let mut outputs = Vec::new();
        loop {
            self.process_queued_tasks();
            if self.in_flight() == 0 {
                if self.queued_tasks.is_empty() || self.channels.is_empty() {
                    break;
                }
                // Every remaining worker refused the queued tasks.
                error!(
                    "Dropping {} queued tasks: no worker accepts them",
                    self.queued_tasks.len()
                );
                self.queued_tasks.clear();
                break;
            }
            for channel in &mut self.channels {
                if channel.num_tasks_in_flight == 0 {
                    continue;
                }
                match channel.result_receiver.recv() {
                    Ok(result) => {
                        channel.num_tasks_in_flight -= 1;
                        outputs.push(result);
                    }
                    Err(_) => {
                        error!(
                            "Worker disconnected with {} tasks in flight",
                            channel.num_tasks_in_flight
                        );
                        channel.num_tasks_in_flight = 0;
                    }
                }
            }
        }
        outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Double(i32);

    impl Task for Double {
        type Output = i32;
        fn process(&self) -> i32 {
            self.0 * 2
        }
    }

    #[test]
    fn outputs_come_back_from_workers() {
        let mut manager = TaskManager::new(3);
        assert_eq!(manager.worker_count(), 3);
        for i in 0..10 {
            manager.publish_task(Double(i));
        }
        let mut outputs = manager.wait_for_all();
        outputs.sort();
        assert_eq!(outputs, (0..10).map(|i| i * 2).collect::<Vec<_>>());
        assert!(manager.is_idle());
    }

    #[test]
    fn without_workers_tasks_stay_queued() {
        let mut manager = TaskManager::new(0);
        assert!(!manager.publish_task(Double(1)));
        assert_eq!(manager.queued(), 1);
        assert!(manager.process_completed_tasks().is_empty());
        assert_eq!(manager.retain_queued(|_| false), 1);
        assert!(manager.is_idle());
    }

    #[test]
    fn queued_tasks_can_be_filtered() {
        let mut manager = TaskManager::new(1);
        for i in 0..6 {
            manager.publish_task(Double(i));
        }
        let dropped = manager.retain_queued(|task| task.0 % 2 == 0);
        let outputs = manager.wait_for_all();
        assert_eq!(outputs.len() + dropped, 6);
        assert!(outputs.iter().all(|v| v % 4 == 0));
    }
}
