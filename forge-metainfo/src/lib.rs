//! Validates UI input, drives the streaming piece hasher, and assembles a
//! BitTorrent v1 `.torrent` metainfo document plus its info-hash.
//!
//! [`Engine`] is the one public entry point a caller needs for the common
//! case; the individual modules (`validate`, `pipeline`, `assemble`,
//! `infohash`, `verify`) are public too, for callers that want to recompute
//! just the info-hash after a metadata-only edit, or drive the pipeline
//! directly with their own validation.

pub mod assemble;
pub mod error;
pub mod file_entry;
pub mod infohash;
mod piece_length;
pub mod pipeline;
pub mod size;
pub mod validate;
pub mod verify;

pub use error::{CoreError, CoreErrorKind, CoreResult};
pub use file_entry::{walk_directory, FileEntry};
pub use piece_length::{PieceLength, MAX_EXPONENT, MIN_EXPONENT};
pub use pipeline::{calculate_hashes, PieceTable, ProgressCallbacks, MACRO_CHUNK_SIZE};
pub use size::format_bytes;

pub use forge_bencode::{encode, Bencode};
pub use forge_hash::{hash, BufferPool, Capability, WorkerPool};

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// UI-facing parameters (spec.md §6 "UI parameters record"). The picker/
/// form collaborator populates this; the engine only ever reads it.
pub struct UiParams {
    pub name: String,
    pub piece_length: PieceLength,
    pub private: bool,
    pub set_creation_date: bool,
    pub trackers_text: String,
    pub web_seeds_text: String,
    pub comment: String,
    pub source: String,
}

/// The result of a successful, non-cancelled build.
pub struct BuiltTorrent {
    pub bytes: Vec<u8>,
    pub info_hash: String,
}

/// Owns the long-lived worker pool and macro-chunk buffer pool so repeated
/// builds (e.g. the user tweaking settings and re-creating the torrent)
/// don't pay thread-spawn cost each time. Cheap to construct once per
/// process; cloning the `Arc`s inside is what [`pipeline::calculate_hashes`]
/// hands to its dispatch threads.
pub struct Engine {
    pool: Arc<WorkerPool>,
    macro_buffers: Arc<BufferPool>,
}

impl Engine {
    pub fn new(worker_count: usize) -> Self {
        let pool = Arc::new(WorkerPool::new(worker_count));
        let macro_buffers = Arc::new(BufferPool::new(MACRO_CHUNK_SIZE, pool.worker_count()));
        Engine { pool, macro_buffers }
    }

    /// Validates `ui`, runs the streaming hash pipeline over `files`, and
    /// assembles the finished `.torrent` bytes plus info-hash.
    ///
    /// `single_file` distinguishes "the root the caller picked was a bare
    /// file" from "a folder that happens to contain one file" — see
    /// [`assemble::AssembleInput::single_file`]. `Ok(None)` means `job_id`
    /// was superseded before the build finished.
    pub fn build(
        &self,
        files: &[FileEntry],
        single_file: bool,
        ui: &UiParams,
        job_id: Option<u64>,
        callbacks: &mut ProgressCallbacks<'_>,
    ) -> CoreResult<Option<BuiltTorrent>> {
        validate::validate_name(&ui.name)?;
        let trackers = validate::validate_trackers(&ui.trackers_text)?;
        let web_seeds = validate::validate_web_seeds(&ui.web_seeds_text)?;

        let total_size: u64 = files.iter().map(|f| f.size).sum();
        let piece_length = ui
            .piece_length
            .resolve(total_size)
            .map_err(CoreError::validation)?;

        if let Some(id) = job_id {
            self.pool.set_active_job_id(id);
        }
        let piece_buffers = Arc::new(BufferPool::new(piece_length as usize, self.pool.worker_count()));

        let piece_table = match pipeline::calculate_hashes(
            files,
            total_size,
            piece_length,
            job_id,
            &self.pool,
            &self.macro_buffers,
            &piece_buffers,
            callbacks,
        )? {
            Some(table) => table,
            None => return Ok(None),
        };

        let creation_date = ui.set_creation_date.then(current_unix_seconds);

        let input = assemble::AssembleInput {
            name: &ui.name,
            piece_length,
            piece_table,
            files,
            single_file,
            private: ui.private,
            source: &ui.source,
            trackers: &trackers,
            web_seeds: &web_seeds,
            comment: &ui.comment,
            creation_date,
        };

        let info = assemble::build_info(&input);
        let info_hash = infohash::compute(&info);
        let outer = assemble::assemble(input);
        let bytes = forge_bencode::encode(&outer);

        Ok(Some(BuiltTorrent { bytes, info_hash }))
    }

    pub fn worker_count(&self) -> usize {
        self.pool.worker_count()
    }
}

fn current_unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
