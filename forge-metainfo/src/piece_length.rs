//! Piece length selection (spec.md §3 "Piece length (P)").
//!
//! Grounded on bip_metainfo's `builder::PieceLength`/`determine_piece_length`,
//! which offers a handful of named presets; this spec instead names one
//! concrete auto rule targeting ~1200 pieces, so the preset enum collapses
//! to `Auto` vs. `Custom`.

pub const MIN_EXPONENT: u32 = 14;
pub const MAX_EXPONENT: u32 = 24;

/// Target pieces-per-torrent the auto rule aims for.
const TARGET_PIECE_COUNT: f64 = 1200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceLength {
    /// `P = 1 << clamp(round(log2(total_size / 1200)), 14, 24)`.
    Auto,
    /// A caller-chosen piece length; must be a power of two in
    /// `[2^14, 2^24]` (checked by [`PieceLength::resolve`]).
    Custom(u64),
}

impl PieceLength {
    /// Resolves to a concrete `P` in bytes for the given total input size.
    ///
    /// Returns `Err` if a `Custom` value isn't a power of two in range —
    /// the one piece-length input the validator (spec.md §4.5) doesn't
    /// already cover because it's a builder parameter, not UI text.
    pub fn resolve(self, total_size: u64) -> Result<u64, String> {
        match self {
            PieceLength::Auto => Ok(auto_piece_length(total_size)),
            PieceLength::Custom(p) => {
                if p.is_power_of_two() && (MIN_EXPONENT..=MAX_EXPONENT).contains(&p.trailing_zeros()) {
                    Ok(p)
                } else {
                    Err(format!(
                        "Piece length must be a power of two between 2^{MIN_EXPONENT} and 2^{MAX_EXPONENT}, got {p}"
                    ))
                }
            }
        }
    }
}

fn auto_piece_length(total_size: u64) -> u64 {
    // For total_size <= 0 the log argument would be non-positive; clamp the
    // ratio to a tiny positive value so log2 stays finite instead of -inf,
    // which still clamps to MIN_EXPONENT below.
    let ratio = (total_size.max(1) as f64) / TARGET_PIECE_COUNT;
    let exponent = ratio.log2().round();
    let clamped = (exponent as i64).clamp(MIN_EXPONENT as i64, MAX_EXPONENT as i64) as u32;

    1u64 << clamped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_matches_spec_scenario_s6() {
        // total_size = 1_200_000 -> factor round(log2(1000)) = 10, clamped to 14
        assert_eq!(auto_piece_length(1_200_000), 16384);
    }

    #[test]
    fn small_inputs_collapse_to_sixteen_kib() {
        // Open question in the spec: preserved as specified.
        assert_eq!(auto_piece_length(1), 16384);
        assert_eq!(auto_piece_length(19_200), 16384);
    }

    #[test]
    fn large_inputs_clamp_to_sixteen_mib() {
        assert_eq!(auto_piece_length(u64::MAX / 2), 1 << 24);
    }

    #[test]
    fn custom_rejects_non_power_of_two() {
        assert!(PieceLength::Custom(100).resolve(0).is_err());
    }

    #[test]
    fn custom_rejects_out_of_range_power_of_two() {
        assert!(PieceLength::Custom(1 << 10).resolve(0).is_err());
        assert!(PieceLength::Custom(1 << 30).resolve(0).is_err());
    }

    #[test]
    fn custom_accepts_in_range_power_of_two() {
        assert_eq!(PieceLength::Custom(1 << 18).resolve(0), Ok(1 << 18));
    }
}
