//! # Swara Module
//!
//! The fixed table of swara positions used to name what was actually sung,
//! and the circular nearest-swara search over it.
//!
//! The table is built once on first use and never mutated, so it can be read
//! from any number of threads without synchronization.

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::cents::{circular_distance, fold_cents};

/// A named position on the octave circle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Swara {
    /// Name as taught (e.g. "Sa", "Ri2", "Dha1")
    pub name: &'static str,
    /// Position above Sa in cents, in `[0, 1200)`
    pub cents: f32,
}

/// Name of the swara every run is measured against.
pub const TARGET_SWARA: &str = "Sa";

/// Position of the target swara.
pub const TARGET_CENTS: f32 = 0.0;

/// Positions of all swaras, in lookup order.
///
/// Order matters: `find_nearest_swara` returns the first minimum, so the
/// Ga1/Ga2 alias pair always resolves to `Ga1`.
static SWARA_TABLE: Lazy<Vec<Swara>> = Lazy::new(|| {
    const POSITIONS: [(&str, f32); 13] = [
        ("Sa", 0.0),
        ("Ri1", 90.0),
        ("Ri2", 204.0),
        ("Ga1", 294.0),
        ("Ga2", 294.0),
        ("Ga3", 386.0),
        ("Ma1", 498.0),
        ("Ma2", 590.0),
        ("Pa", 702.0),
        ("Dha1", 792.0),
        ("Dha2", 906.0),
        ("Ni2", 996.0),
        ("Ni3", 1088.0),
    ];
    POSITIONS
        .iter()
        .map(|&(name, cents)| Swara { name, cents })
        .collect()
});

/// The whole table in lookup order.
pub fn swara_table() -> &'static [Swara] {
    &SWARA_TABLE
}

/// Finds the swara closest to `cents` on the octave circle.
///
/// Total over all finite input; exact ties go to the entry listed first.
pub fn find_nearest_swara(cents: f32) -> &'static Swara {
    let cents = fold_cents(cents);
    let mut best = &SWARA_TABLE[0];
    let mut best_dist = circular_distance(cents, best.cents);

    for swara in SWARA_TABLE.iter().skip(1) {
        let dist = circular_distance(cents, swara.cents);
        // Strict comparison keeps the earlier entry on a tie
        if dist < best_dist {
            best = swara;
            best_dist = dist;
        }
    }
    best
}

/// Position of a swara in the table, for widgets that index by slot.
pub fn swara_index(name: &str) -> Option<usize> {
    SWARA_TABLE.iter().position(|s| s.name == name)
}
