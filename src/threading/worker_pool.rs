// src/threading/worker_pool.rs
use rayon::ThreadPoolBuilder;

// A wrapper around Rayon's ThreadPool that provides a clean interface for
// terrain generation jobs.
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    num_threads: usize,
}

impl WorkerPool {
    // Create a new WorkerPool with the specified number of threads.
    // If size is 0, all CPUs minus one are used, keeping a core free for
    // the owning thread.
    pub fn new(size: usize) -> WorkerPool {
        let num_threads = if size > 0 {
            size
        } else {
            std::cmp::max(1, num_cpus::get().saturating_sub(1))
        };

        let pool = ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|index| format!("terrain-worker-{}", index))
            .build()
            .expect("Failed to build Rayon thread pool");

        tracing::info!("Created worker pool with {} threads", num_threads);

        WorkerPool { pool, num_threads }
    }

    // Execute a job in the thread pool
    pub fn execute<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.pool.spawn(f);
    }

    // Get the number of threads in the pool
    pub fn num_threads(&self) -> usize {
        self.num_threads
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;

    // Size 0 resolves to an automatic thread count
    #[test]
    fn test_auto_sizing() {
        let pool = WorkerPool::new(0);
        assert!(pool.num_threads() >= 1);

        let sized = WorkerPool::new(3);
        assert_eq!(sized.num_threads(), 3);
    }

    // Jobs run off the calling thread and complete
    #[test]
    fn test_execute_runs_jobs() {
        let pool = WorkerPool::new(2);
        let (tx, rx) = channel();

        for i in 0..8 {
            let tx = tx.clone();
            pool.execute(move || {
                tx.send(i).expect("Failed to send result via channel");
            });
        }

        let mut results: Vec<i32> = (0..8).map(|_| rx.recv().unwrap()).collect();
        results.sort();
        assert_eq!(results, (0..8).collect::<Vec<_>>());
    }
}
