//! Bounded parallel dispatch of hash jobs.
//!
//! Grounded on bip_metainfo's `builder::worker` master/worker split (a
//! channel of jobs, N worker threads, results flowing back through another
//! channel), generalized to the spec's `compute_hashes`/`set_active_job_id`
//! contract. `crossbeam_channel`'s multi-consumer `Receiver` gives the FIFO
//! "first idle worker wins" scheduling for free: a worker blocked in `recv`
//! is the one woken when a job arrives, so arrival order at the channel is
//! service order.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use log::trace;

use crate::kernel;

const MAX_WORKERS: usize = 8;

struct Job {
    inputs: Vec<Vec<u8>>,
    job_id: Option<u64>,
    respond: Sender<Option<(Vec<[u8; 20]>, Vec<Vec<u8>>)>>,
}

/// Owns up to `min(n, 8)` worker threads that hash whatever jobs are
/// submitted through [`WorkerPool::compute_hashes`].
pub struct WorkerPool {
    job_tx: Sender<Job>,
    active_job_id: Arc<AtomicU64>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub fn new(worker_count: usize) -> Self {
        let worker_count = worker_count.clamp(1, MAX_WORKERS);
        let (job_tx, job_rx): (Sender<Job>, Receiver<Job>) = unbounded();
        let active_job_id = Arc::new(AtomicU64::new(0));

        let workers = (0..worker_count)
            .map(|idx| {
                let job_rx = job_rx.clone();
                let active_job_id = Arc::clone(&active_job_id);
                thread::Builder::new()
                    .name(format!("forge-hash-worker-{idx}"))
                    .spawn(move || worker_loop(job_rx, active_job_id))
                    .expect("failed to spawn hash worker thread")
            })
            .collect();

        WorkerPool { job_tx, active_job_id, workers }
    }

    /// Hashes each of `inputs` independently, in order, returning the
    /// concatenated digests plus the original buffers for recycling by the
    /// caller. Returns `None` if `job_id` no longer matches the pool's
    /// active job id by the time a worker picks up the job — the job is
    /// cancelled and nothing is hashed.
    pub fn compute_hashes(
        &self,
        inputs: Vec<Vec<u8>>,
        job_id: Option<u64>,
    ) -> Option<(Vec<[u8; 20]>, Vec<Vec<u8>>)> {
        let (respond, response_rx) = bounded(1);
        self.job_tx
            .send(Job { inputs, job_id, respond })
            .expect("hash worker threads outlive the pool that owns them");

        response_rx.recv().expect("hash worker thread dropped its response sender")
    }

    /// Atomically updates the id jobs are checked against. In-flight workers
    /// are not interrupted; their results are discarded by whoever compares
    /// ids afterwards (the pipeline), not by the pool itself.
    pub fn set_active_job_id(&self, id: u64) {
        self.active_job_id.store(id, Ordering::Release);
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Reads the id jobs are currently checked against, so a caller can bail
    /// out of a dispatch loop early instead of only discovering cancellation
    /// once a worker picks the job up.
    pub fn active_job_id(&self) -> u64 {
        self.active_job_id.load(Ordering::Acquire)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Dropping `job_tx` (there may be clones held by callers, but the
        // pool's own copy going away combined with no more sends) lets
        // `job_rx.iter()` in each worker terminate once drained.
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

fn worker_loop(job_rx: Receiver<Job>, active_job_id: Arc<AtomicU64>) {
    for job in job_rx.iter() {
        let cancelled = job
            .job_id
            .is_some_and(|id| active_job_id.load(Ordering::Acquire) != id);

        if cancelled {
            trace!(target: "forge_hash::pool", "dropping stale hash job before hashing");
            let _ = job.respond.send(None);
            continue;
        }

        let digests = job.inputs.iter().map(|input| kernel::hash(input)).collect();
        let _ = job.respond.send(Some((digests, job.inputs)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_each_input_independently_and_returns_buffers() {
        let pool = WorkerPool::new(2);
        let inputs = vec![b"ab".to_vec(), b"cd".to_vec()];

        let (digests, returned) = pool.compute_hashes(inputs.clone(), None).expect("not cancelled");

        assert_eq!(digests.len(), 2);
        assert_eq!(digests[0], kernel::hash(b"ab"));
        assert_eq!(digests[1], kernel::hash(b"cd"));
        assert_eq!(returned, inputs);
    }

    #[test]
    fn mismatched_job_id_is_cancelled_without_hashing() {
        let pool = WorkerPool::new(1);
        pool.set_active_job_id(7);

        let result = pool.compute_hashes(vec![b"data".to_vec()], Some(6));
        assert!(result.is_none());
    }

    #[test]
    fn matching_job_id_proceeds() {
        let pool = WorkerPool::new(1);
        pool.set_active_job_id(7);

        let result = pool.compute_hashes(vec![b"data".to_vec()], Some(7));
        assert!(result.is_some());
    }

    #[test]
    fn active_job_id_reflects_latest_set_value() {
        let pool = WorkerPool::new(1);
        assert_eq!(pool.active_job_id(), 0);
        pool.set_active_job_id(42);
        assert_eq!(pool.active_job_id(), 42);
    }

    #[test]
    fn worker_count_is_clamped_to_eight() {
        let pool = WorkerPool::new(64);
        assert_eq!(pool.worker_count(), 8);
    }

    #[test]
    fn many_concurrent_jobs_all_complete() {
        let pool = Arc::new(WorkerPool::new(4));
        let handles: Vec<_> = (0..32)
            .map(|i| {
                let pool = Arc::clone(&pool);
                thread::spawn(move || {
                    let input = vec![i as u8; 128];
                    pool.compute_hashes(vec![input.clone()], None)
                        .map(|(digests, _)| digests[0])
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let digest = handle.join().unwrap().expect("no cancellation configured");
            assert_eq!(digest, kernel::hash(&vec![i as u8; 128]));
        }
    }
}
