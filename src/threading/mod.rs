pub mod generation_queue;
pub mod worker_pool;

pub use generation_queue::GenerationQueue;
pub use worker_pool::WorkerPool;
