//! Info-hash computation (spec.md §4.7): `SHA1(encode(info))`, rendered as
//! 40 lowercase hex chars, plus the "last-issued-wins" epoch tracker that
//! protects a caller recomputing on every keystroke (name/private/source
//! edits) from a slow, superseded computation overwriting a fresher one.
//!
//! Grounded on bip_util's `sha::ShaHash` for the digest-to-hex convention
//! and generalized with an explicit epoch counter; the corpus has no
//! equivalent to the "last-issued-wins" requirement since its builder is
//! synchronous end to end.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use forge_bencode::Bencode;

/// Computes the 40-char lowercase hex info-hash of an already-built `info`
/// dict. Cheap relative to re-hashing piece data: `pieces` doesn't change
/// just because `name`/`private`/`source` did.
pub fn compute(info: &Bencode) -> String {
    let encoded = forge_bencode::encode(info);
    let digest = forge_hash::hash(&encoded);
    hex_encode(&digest)
}

fn hex_encode(bytes: &[u8; 20]) -> String {
    let mut out = String::with_capacity(40);
    for byte in bytes {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

/// Tracks a monotonically increasing computation epoch so a result computed
/// for an earlier edit can't clobber one computed for a later edit that
/// happened to finish first (last-*issued*-wins, not last-*completed*-wins).
pub struct InfoHashComputer {
    next_epoch: AtomicU64,
    last: Mutex<(u64, String)>,
}

impl Default for InfoHashComputer {
    fn default() -> Self {
        InfoHashComputer { next_epoch: AtomicU64::new(0), last: Mutex::new((0, String::new())) }
    }
}

impl InfoHashComputer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints a fresh epoch for a caller about to start a computation. The
    /// caller threads this value through to [`InfoHashComputer::submit`]
    /// once the (possibly slow, possibly out-of-order) computation finishes.
    pub fn issue(&self) -> u64 {
        self.next_epoch.fetch_add(1, Ordering::SeqCst)
    }

    /// Records `hash` as the result of the computation issued with `epoch`,
    /// unless a result for a later epoch has already been recorded.
    /// Returns the current best-known hash after this call.
    pub fn submit(&self, epoch: u64, hash: String) -> String {
        let mut last = self.last.lock().expect("info-hash lock poisoned");
        if epoch >= last.0 || last.1.is_empty() {
            *last = (epoch, hash);
        }
        last.1.clone()
    }

    pub fn current(&self) -> String {
        self.last.lock().expect("info-hash lock poisoned").1.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_bencode::DictBuilder;

    #[test]
    fn matches_scenario_s4() {
        let pieces = forge_hash::hash(b"hello").to_vec();
        let info = DictBuilder::new()
            .insert(b"length", 5i64)
            .insert(b"name", "a.txt")
            .insert(b"piece length", 16384i64)
            .insert(b"pieces", pieces)
            .build();

        let hash = compute(&info);
        assert_eq!(hash.len(), 40);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn recomputing_unchanged_input_is_idempotent() {
        let info = DictBuilder::new().insert(b"name", "x").build();
        assert_eq!(compute(&info), compute(&info));
    }

    #[test]
    fn later_issued_epoch_wins_even_if_submitted_first() {
        let computer = InfoHashComputer::new();
        let epoch_a = computer.issue();
        let epoch_b = computer.issue();
        assert!(epoch_b > epoch_a);

        computer.submit(epoch_b, "newer".to_owned());
        let result = computer.submit(epoch_a, "older".to_owned());

        assert_eq!(result, "newer");
        assert_eq!(computer.current(), "newer");
    }

    #[test]
    fn first_submission_is_always_accepted() {
        let computer = InfoHashComputer::new();
        let epoch = computer.issue();
        assert_eq!(computer.submit(epoch, "abc".to_owned()), "abc");
    }
}
