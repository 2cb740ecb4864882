//! Ordered ability-score bands.
//!
//! Ability input is banded, not free-form: the member picks a labeled range
//! and the record stores that band's representative value. The quantization
//! is deliberately lossy -- the member's precise score is irrecoverable
//! from storage. Re-display maps the representative value back to its label
//! through this same table; a stored value with no exact match falls back
//! to a generic "~N" rendering.

/// One labeled range in the ability-score catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbilityBand {
    pub label: &'static str,
    /// The integer stored on the character record for this band.
    pub representative: i64,
}

const BANDS: &[AbilityBand] = &[
    AbilityBand { label: "\u{2264}10k", representative: 9_000 },
    AbilityBand { label: "10k-12k", representative: 11_000 },
    AbilityBand { label: "12k-14k", representative: 13_000 },
    AbilityBand { label: "14k-16k", representative: 15_000 },
    AbilityBand { label: "16k-18k", representative: 17_000 },
    AbilityBand { label: "18k-20k", representative: 19_000 },
    AbilityBand { label: "20k-22k", representative: 21_000 },
    AbilityBand { label: "22k-24k", representative: 23_000 },
    AbilityBand { label: "24k-26k", representative: 25_000 },
    AbilityBand { label: "26k-28k", representative: 27_000 },
    AbilityBand { label: "28k-30k", representative: 29_000 },
    AbilityBand { label: "30k-32k", representative: 31_000 },
    AbilityBand { label: "32k-36k", representative: 34_000 },
    AbilityBand { label: "36k-40k", representative: 38_000 },
    AbilityBand { label: "40k-44k", representative: 42_000 },
    AbilityBand { label: "44k-48k", representative: 46_000 },
    AbilityBand { label: "48k-52k", representative: 50_000 },
    AbilityBand { label: "52k-56k", representative: 54_000 },
    AbilityBand { label: "56k+", representative: 57_000 },
];

/// All bands, in ascending order.
pub fn bands() -> &'static [AbilityBand] {
    BANDS
}

/// The band whose label matches exactly.
pub fn band_for_label(label: &str) -> Option<&'static AbilityBand> {
    BANDS.iter().find(|b| b.label == label)
}

/// Map a stored value back to its band label.
///
/// A value that is not any band's representative (e.g. written by an older
/// release) renders generically rather than erroring.
pub fn label_for_value(value: i64) -> String {
    match BANDS.iter().find(|b| b.representative == value) {
        Some(band) => band.label.to_string(),
        None => format!("~{value}"),
    }
}
