//! Error taxonomy for torrent building.
//!
//! Grounded on bip_metainfo's `error_chain!`-based `error.rs`, generalized
//! to the three result kinds the spec names: `ValidationError`, `IoError`,
//! and `Cancelled`. `Cancelled` is deliberately *not* one of these chained
//! error kinds — the spec treats cancellation as a neutral result, not a
//! failure, so [`crate::pipeline::calculate_hashes`] represents it as
//! `Ok(None)` rather than `Err(CoreError::Cancelled)`.

use std::path::PathBuf;

error_chain::error_chain! {
    types {
        CoreError, CoreErrorKind, ResultExt, CoreResult;
    }

    foreign_links {
        Io(std::io::Error);
        Walkdir(walkdir::Error);
    }

    errors {
        /// Raised before any hashing begins; surfaced verbatim to the caller.
        Validation(message: String) {
            description("torrent input failed validation")
            display("{}", message)
        }

        /// A file disappeared, had its permissions changed, or was truncated
        /// mid-read. Fatal for the job.
        FileRead(path: PathBuf) {
            description("error reading file")
            display(
                "Error reading file: {}. The file might be inaccessible, or might have been modified, moved, or deleted.",
                path.display()
            )
        }
    }
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> CoreError {
        CoreErrorKind::Validation(message.into()).into()
    }

    pub fn file_read(path: impl Into<PathBuf>) -> CoreError {
        CoreErrorKind::FileRead(path.into()).into()
    }
}
