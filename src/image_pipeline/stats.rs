//! Summary statistics over decoded grids

use std::fmt;

use crate::image_pipeline::pgx::types::with_values;
use crate::image_pipeline::pgx::{DecodedGrid, ElementKind};

/// Minimum, maximum and mean of a grid, with samples widened to `i64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridStats {
    pub min: i64,
    pub max: i64,
    pub mean: f64,
}

impl GridStats {
    /// Returns `None` for a grid without samples.
    pub fn compute(grid: &DecodedGrid) -> Option<Self> {
        with_values!(grid.samples(), values => stats_of(values.as_slice()))
    }
}

fn stats_of<T: Copy + Into<i64>>(values: &[T]) -> Option<GridStats> {
    let (&first, rest) = values.split_first()?;
    let first: i64 = first.into();

    let (mut min, mut max) = (first, first);
    // i128 so that huge 32-bit planes cannot overflow the running sum
    let mut sum = i128::from(first);
    for &value in rest {
        let value: i64 = value.into();
        min = min.min(value);
        max = max.max(value);
        sum += i128::from(value);
    }

    Some(GridStats {
        min,
        max,
        mean: sum as f64 / values.len() as f64,
    })
}

/// One line of the per-image report.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSummary {
    pub name: String,
    pub element_kind: ElementKind,
    /// `(height, width)`
    pub shape: (usize, usize),
    pub stats: Option<GridStats>,
}

impl ImageSummary {
    pub fn new(name: impl Into<String>, grid: &DecodedGrid) -> Self {
        Self {
            name: name.into(),
            element_kind: grid.element_kind(),
            shape: grid.shape(),
            stats: GridStats::compute(grid),
        }
    }
}

impl fmt::Display for ImageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (height, width) = self.shape;
        write!(
            f,
            "{}: dtype={} shape=({}, {})",
            self.name, self.element_kind, height, width
        )?;
        match &self.stats {
            Some(stats) => write!(
                f,
                " min={} max={} mean={:.2}",
                stats.min, stats.max, stats.mean
            ),
            None => write!(f, " (empty)"),
        }
    }
}
