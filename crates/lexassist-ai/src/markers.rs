//! Marker words signalling that the user described their own situation.
//!
//! A fixed set-membership check: any marker occurring anywhere in the
//! normalised query sets the flag, so "the" counts for "he" and "myself"
//! for "my".

/// First/second/third-person and conditional markers.
pub const SCENARIO_MARKERS: &[&str] = &[
    "someone", "person", "they", "he", "she", "my", "can i", "what if",
];

/// Whether the lower-cased query contains any scenario marker.
pub fn describes_scenario(normalized: &str) -> bool {
    SCENARIO_MARKERS
        .iter()
        .any(|marker| normalized.contains(marker))
}
