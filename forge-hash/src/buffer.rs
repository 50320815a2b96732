//! Reusable byte buffers for the hashing pipeline, so that neither the
//! 16 MiB macro-chunk nor the per-piece slices handed to workers are
//! reallocated from scratch on every dispatch.
//!
//! Grounded on bip_metainfo's `builder::buffer::PieceBuffers`, generalized:
//! the corpus's version blocks on checkout (backed by a `crossbeam::sync::MsQueue`
//! pop); this one prefers never blocking the orchestrator, falling back to a
//! fresh allocation when the pool is momentarily empty rather than stalling
//! the single-threaded dispatch loop on worker throughput.

use crossbeam_channel::{Receiver, Sender};

/// Ensures enough spare buffers exist that workers rarely wait on an
/// allocation, mirroring the corpus's multiplicative/additive headroom.
const SPARE_MULTIPLIER: usize = 2;
const SPARE_ADDITIVE: usize = 4;

pub struct BufferPool {
    capacity: usize,
    free_tx: Sender<Vec<u8>>,
    free_rx: Receiver<Vec<u8>>,
}

impl BufferPool {
    /// Creates a pool sized for `worker_count` concurrent consumers, each
    /// buffer preallocated to `capacity` bytes.
    pub fn new(capacity: usize, worker_count: usize) -> Self {
        let total = worker_count * SPARE_MULTIPLIER + SPARE_ADDITIVE;
        let (free_tx, free_rx) = crossbeam_channel::unbounded();
        for _ in 0..total {
            free_tx.send(Vec::with_capacity(capacity)).expect("channel just created");
        }
        BufferPool { capacity, free_tx, free_rx }
    }

    /// Checks out a buffer for exclusive use. Never blocks: if the pool is
    /// empty, a fresh buffer is allocated (and returned to the pool on
    /// checkin like any other).
    pub fn checkout(&self) -> Vec<u8> {
        self.free_rx
            .try_recv()
            .unwrap_or_else(|_| Vec::with_capacity(self.capacity))
    }

    /// Returns `buffer` to the pool for reuse, clearing its contents but
    /// keeping its allocation.
    pub fn checkin(&self, mut buffer: Vec<u8>) {
        buffer.clear();
        // A full channel would mean more buffers are in flight than the pool
        // ever minted, which cannot happen with an unbounded channel; ignore
        // the send failure that would only occur if the pool itself was dropped.
        let _ = self.free_tx.send(buffer);
    }
}
