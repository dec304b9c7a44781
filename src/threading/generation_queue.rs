// src/threading/generation_queue.rs
use std::sync::mpsc::{channel, Receiver, Sender};

use crate::threading::worker_pool::WorkerPool;

/// Hands generation jobs to a fixed-size worker pool and collects their
/// results on a channel owned by the submitting thread.
///
/// `drain` is the only consumption path and must be called from the thread
/// that owns the queue, once per tick. Results arrive in completion order,
/// not submission order; a slow job can land after jobs submitted later.
/// There is no cancellation: every submitted job eventually completes and
/// is eventually drained.
pub struct GenerationQueue<T> {
    pool: WorkerPool,
    sender: Sender<T>,
    receiver: Receiver<T>,
}

impl<T: Send + 'static> GenerationQueue<T> {
    pub fn new(worker_threads: usize) -> Self {
        let (sender, receiver) = channel();
        GenerationQueue {
            pool: WorkerPool::new(worker_threads),
            sender,
            receiver,
        }
    }

    /// Run `job` on a pool worker and enqueue its result.
    ///
    /// The send only fails if the queue itself has been dropped, in which
    /// case the result has nowhere to go and is discarded with it.
    pub fn submit<F>(&self, job: F)
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let sender = self.sender.clone();
        self.pool.execute(move || {
            let _ = sender.send(job());
        });
    }

    /// Pop every currently queued result without blocking.
    pub fn drain(&self) -> Vec<T> {
        self.receiver.try_iter().collect()
    }

    pub fn num_threads(&self) -> usize {
        self.pool.num_threads()
    }
}
