use std::sync::OnceLock;

use crate::{accel, scalar};

/// Which SHA-1 code path this process resolved to at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// No usable hardware SHA extension was detected; the portable
    /// from-scratch implementation runs every call.
    Scalar,
    /// A hardware-accelerated path is available on this target.
    Accelerated,
}

static CAPABILITY: OnceLock<Capability> = OnceLock::new();

/// Probes the CPU once and caches the result. Subsequent calls (including
/// the ones made lazily by `hash`) reuse the cached value — the spec calls
/// this out explicitly: selection happens once at startup, not per call.
fn capability() -> Capability {
    *CAPABILITY.get_or_init(probe)
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
fn probe() -> Capability {
    if std::is_x86_feature_detected!("sha") {
        Capability::Accelerated
    } else {
        Capability::Scalar
    }
}

#[cfg(target_arch = "aarch64")]
fn probe() -> Capability {
    if std::arch::is_aarch64_feature_detected!("sha2") {
        Capability::Accelerated
    } else {
        Capability::Scalar
    }
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
fn probe() -> Capability {
    Capability::Scalar
}

/// Hashes `input` and returns its 20-byte SHA-1 digest. The caller never
/// learns (and never needs to know) whether the scalar or accelerated path
/// ran — both are total and bit-identical over any input.
pub fn hash(input: &[u8]) -> [u8; 20] {
    match capability() {
        Capability::Scalar => scalar::hash(input),
        // The `sha1` crate performs its own internal hardware dispatch;
        // calling it here is what "accelerated" means in this kernel.
        Capability::Accelerated => accel::hash(input),
    }
}

/// Exposed for diagnostics/logging only — callers should never branch on it.
pub fn active_capability() -> Capability {
    capability()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_and_accelerated_paths_agree() {
        let inputs: [&[u8]; 4] = [b"", b"abc", b"hello", &[0x42u8; 70_000]];
        for input in inputs {
            assert_eq!(scalar::hash(input), accel::hash(input));
        }
    }

    #[test]
    fn capability_is_stable_across_calls() {
        assert_eq!(active_capability(), active_capability());
    }

    #[test]
    fn scalar_and_accelerated_paths_agree_on_random_lengths() {
        use rand::RngCore;

        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            let len = (rng.next_u32() % (2 * 64)) as usize;
            let mut buf = vec![0u8; len];
            rng.fill_bytes(&mut buf);
            assert_eq!(scalar::hash(&buf), accel::hash(&buf));
        }
    }
}
