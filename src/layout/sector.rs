//! Angular sector allocation: one wedge of the circle per theme.

use std::f64::consts::PI;

/// The angular range reserved for one theme and all its descendants.
/// Owned by the allocator; descendants reference it for positioning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngularSector {
    /// Center angle in radians.
    pub center: f64,
    /// Start of the usable range, gap already applied.
    pub start: f64,
    /// End of the usable range, gap already applied.
    pub end: f64,
}

impl AngularSector {
    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    pub fn midpoint(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

/// Partition the full circle among `count` themes.
///
/// Centers are spaced exactly `2π / count` apart. Each sector's start and
/// end are inset from the midpoint boundary to the neighbor by the
/// configured gap (degrees), so adjacent theme clusters stay visually
/// separated regardless of count. The inset is clamped to keep every span
/// strictly positive even for degenerate gap × count combinations.
pub fn allocate_sectors(count: usize, gap_degrees: f64) -> Vec<AngularSector> {
    if count == 0 {
        return Vec::new();
    }

    let step = 2.0 * PI / count as f64;
    let half = step / 2.0;
    let inset = gap_degrees.to_radians().min(half * 0.9);

    (0..count)
        .map(|i| {
            let center = i as f64 * step;
            AngularSector {
                center,
                start: center - half + inset,
                end: center + half - inset,
            }
        })
        .collect()
}
