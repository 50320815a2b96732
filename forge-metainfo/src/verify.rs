//! Post-build verification (supplemented feature, not named by the core
//! contract itself): re-reads the same file list and re-hashes it against
//! an already-built piece table, to catch a file that was modified, moved,
//! or truncated after the initial hash pass completed.
//!
//! Grounded on rqbit's `file_checking::initial_check` — simplified to a
//! single pass with no bitfield/partial-download bookkeeping, since this
//! engine builds torrents rather than resuming them. Deliberately
//! sequential rather than routed through [`forge_hash::WorkerPool`]: this
//! is an optional sanity check run once after a build, not the hot path.

use std::io::Read;

use crate::error::{CoreError, CoreResult};
use crate::file_entry::FileEntry;

pub struct VerifyReport {
    pub total_pieces: usize,
    pub mismatched_pieces: Vec<usize>,
}

impl VerifyReport {
    pub fn is_valid(&self) -> bool {
        self.mismatched_pieces.is_empty()
    }
}

/// Re-hashes `files` piece by piece and compares against `piece_table`.
pub fn verify(files: &[FileEntry], piece_table: &[u8], piece_length: u64) -> CoreResult<VerifyReport> {
    let piece_count = piece_table.len() / 20;
    let mut mismatched = Vec::new();

    let mut remaining_files = files.iter().filter(|f| f.size > 0);
    let mut current = remaining_files.next();
    let mut reader = match current {
        Some(f) => Some(f.open().map_err(|_| CoreError::file_read(f.path.join("/")))?),
        None => None,
    };
    let mut remaining_in_file = current.map(|f| f.size).unwrap_or(0);

    for piece_index in 0..piece_count {
        let mut piece_bytes = Vec::with_capacity(piece_length as usize);
        let mut remaining_piece = piece_length;

        while remaining_piece > 0 {
            if remaining_in_file == 0 {
                current = remaining_files.next();
                match current {
                    Some(f) => {
                        reader = Some(f.open().map_err(|_| CoreError::file_read(f.path.join("/")))?);
                        remaining_in_file = f.size;
                    }
                    None => break,
                }
            }

            let to_read = remaining_piece.min(remaining_in_file) as usize;
            let mut chunk = vec![0u8; to_read];
            let path_for_error = current.map(|f| f.path.join("/")).unwrap_or_default();
            reader
                .as_mut()
                .expect("remaining_in_file > 0 implies a reader is open")
                .read_exact(&mut chunk)
                .map_err(|_| CoreError::file_read(path_for_error))?;

            piece_bytes.extend_from_slice(&chunk);
            remaining_piece -= to_read as u64;
            remaining_in_file -= to_read as u64;
        }

        let digest = forge_hash::hash(&piece_bytes);
        let expected = &piece_table[piece_index * 20..piece_index * 20 + 20];
        if digest.as_slice() != expected {
            mismatched.push(piece_index);
        }
    }

    Ok(VerifyReport { total_pieces: piece_count, mismatched_pieces: mismatched })
}
