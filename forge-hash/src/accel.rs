//! The accelerated SHA-1 variant. Delegates to the `sha1` crate (RustCrypto),
//! which itself probes for hardware SHA extensions (via `cpufeatures`) and
//! falls back to its own software implementation when none are available —
//! from this kernel's point of view it is simply "the fast path."

use sha1::{Digest, Sha1};

pub fn hash(input: &[u8]) -> [u8; 20] {
    let mut hasher = Sha1::new();
    hasher.update(input);
    hasher.finalize().into()
}
