//! The streaming piece-hashing pipeline (spec.md §4.4).
//!
//! Grounded on bip_metainfo's `builder::process_files_pieces` /
//! `builder::worker::distribute_data_entry` (macro-accumulator feeding a
//! worker pool, writing into a preallocated piece table at reserved
//! offsets), rewired onto `forge_hash::{WorkerPool, BufferPool}` and the
//! `FileEntry` stream contract. Each dispatch runs on its own OS thread so
//! the orchestrator keeps reading the next file while earlier dispatches are
//! still hashing; the piece table itself is only ever written by the
//! orchestrator thread, after joining a dispatch, which is what makes the
//! "workers run in parallel, everything else is orchestrator-only" claim
//! in the concurrency model actually true rather than aspirational.

use std::io::Read;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use forge_hash::{BufferPool, WorkerPool};
use log::{debug, trace};

use crate::error::{CoreError, CoreResult};
use crate::file_entry::FileEntry;

/// Reusable read/accumulate granularity, independent of piece size.
pub const MACRO_CHUNK_SIZE: usize = 16 * 1024 * 1024;

pub type PieceTable = Vec<u8>;

/// Progress/status callbacks the caller supplies (spec.md §6). Held as
/// trait objects rather than generics so `calculate_hashes` has one
/// concrete signature regardless of what the caller closes over.
pub struct ProgressCallbacks<'a> {
    pub on_bytes_read: &'a mut dyn FnMut(u64),
    pub on_bytes_hashed: &'a mut dyn FnMut(u64),
    pub on_file_open: &'a mut dyn FnMut(&str),
}

fn ceil_div(a: u64, b: u64) -> u64 {
    (a + b - 1) / b
}

/// A dispatch's outcome, computed entirely off the orchestrator thread.
/// `None` means the worker pool observed a stale `job_id` and dropped the
/// job without hashing it.
type DispatchResult = Option<(u64, Vec<[u8; 20]>, u64)>;

/// Runs the algorithm of spec.md §4.4 to completion (or until cancellation
/// is observed), returning the finished piece table.
///
/// `Ok(None)` means the job was superseded mid-flight — a neutral result,
/// not an error, per the error design in [`crate::error`]. The caller is
/// expected to have already called `pool.set_active_job_id(job_id)` (if
/// `job_id` is `Some`) before invoking this function.
pub fn calculate_hashes(
    files: &[FileEntry],
    total_size: u64,
    piece_length: u64,
    job_id: Option<u64>,
    pool: &Arc<WorkerPool>,
    macro_buffers: &Arc<BufferPool>,
    piece_buffers: &Arc<BufferPool>,
    callbacks: &mut ProgressCallbacks<'_>,
) -> CoreResult<Option<PieceTable>> {
    let piece_count = ceil_div(total_size, piece_length) as usize;
    let mut piece_table = vec![0u8; piece_count * 20];
    let mut next_piece_index: u64 = 0;

    let mut accumulator = macro_buffers.checkout();
    let mut handles: Vec<JoinHandle<DispatchResult>> = Vec::new();
    let mut cancelled = false;
    let mut read_buf = vec![0u8; MACRO_CHUNK_SIZE];

    'files: for file in files {
        if file.size == 0 {
            continue;
        }
        if is_cancelled(pool, job_id) {
            debug!(target: "forge_metainfo::pipeline", "job superseded before opening next file");
            cancelled = true;
            break;
        }

        let display_path = file.path.join("/");
        trace!(target: "forge_metainfo::pipeline", "opening {display_path}");
        (callbacks.on_file_open)(&display_path);

        let mut reader = file
            .open()
            .map_err(|_| CoreError::file_read(display_path.clone()))?;

        loop {
            let n = reader
                .read(&mut read_buf)
                .map_err(|_| CoreError::file_read(display_path.clone()))?;
            if n == 0 {
                break;
            }
            (callbacks.on_bytes_read)(n as u64);

            let mut chunk = &read_buf[..n];
            while !chunk.is_empty() {
                let space = MACRO_CHUNK_SIZE - accumulator.len();
                let take = space.min(chunk.len());
                accumulator.extend_from_slice(&chunk[..take]);
                chunk = &chunk[take..];

                if accumulator.len() == MACRO_CHUNK_SIZE {
                    if is_cancelled(pool, job_id) {
                        cancelled = true;
                        break 'files;
                    }
                    let full = std::mem::replace(&mut accumulator, macro_buffers.checkout());
                    let start_index = next_piece_index;
                    next_piece_index += ceil_div(full.len() as u64, piece_length);
                    handles.push(dispatch(
                        full,
                        start_index,
                        piece_length,
                        job_id,
                        Arc::clone(pool),
                        Arc::clone(piece_buffers),
                        Arc::clone(macro_buffers),
                    ));
                }
            }
        }
    }

    if !cancelled && !accumulator.is_empty() {
        let start_index = next_piece_index;
        next_piece_index += ceil_div(accumulator.len() as u64, piece_length);
        handles.push(dispatch(
            accumulator,
            start_index,
            piece_length,
            job_id,
            Arc::clone(pool),
            Arc::clone(piece_buffers),
            Arc::clone(macro_buffers),
        ));
    } else {
        macro_buffers.checkin(accumulator);
    }
    if !cancelled {
        debug_assert_eq!(next_piece_index as usize, piece_count);
    }

    for handle in handles {
        let outcome = handle.join().expect("dispatch thread panicked");
        match outcome {
            Some((start_index, digests, segment_len)) => {
                let offset = (start_index as usize) * 20;
                for (i, digest) in digests.iter().enumerate() {
                    piece_table[offset + i * 20..offset + i * 20 + 20].copy_from_slice(digest);
                }
                (callbacks.on_bytes_hashed)(segment_len);
            }
            None => cancelled = true,
        }
    }

    if cancelled {
        Ok(None)
    } else {
        Ok(Some(piece_table))
    }
}

fn is_cancelled(pool: &WorkerPool, job_id: Option<u64>) -> bool {
    job_id.is_some_and(|id| pool.active_job_id() != id)
}

fn dispatch(
    segment: Vec<u8>,
    start_index: u64,
    piece_length: u64,
    job_id: Option<u64>,
    pool: Arc<WorkerPool>,
    piece_buffers: Arc<BufferPool>,
    macro_buffers: Arc<BufferPool>,
) -> JoinHandle<DispatchResult> {
    thread::spawn(move || {
        let m = segment.len() as u64;
        let k = ceil_div(m, piece_length) as usize;
        let p = piece_length as usize;

        let mut pieces = Vec::with_capacity(k);
        let mut offset = 0usize;
        for _ in 0..k {
            let end = (offset + p).min(segment.len());
            let mut buf = piece_buffers.checkout();
            buf.extend_from_slice(&segment[offset..end]);
            pieces.push(buf);
            offset = end;
        }
        macro_buffers.checkin(segment);

        match pool.compute_hashes(pieces, job_id) {
            Some((digests, returned)) => {
                for buf in returned {
                    piece_buffers.checkin(buf);
                }
                Some((start_index, digests, m))
            }
            None => None,
        }
    })
}
