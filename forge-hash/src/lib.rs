//! SHA-1 kernel, worker pool, and buffer pool for the torrent-forge piece
//! hasher. This crate knows nothing about files, pieces, or metainfo — it
//! only hashes byte buffers in parallel and recycles the memory involved.

mod accel;
mod buffer;
mod kernel;
mod pool;
mod scalar;

pub use buffer::BufferPool;
pub use kernel::{active_capability, hash, Capability};
pub use pool::WorkerPool;
