//! Collage layout
//!
//! Positions are a pure function of the photo index and the viewport
//! bucket: a column/row grid across the middle band of the screen with a
//! small index-derived jitter. Each bucket is computed once and cached.

use serde::{Deserialize, Serialize};

/// Viewport width class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewportBucket {
    Mobile,
    Tablet,
    Desktop,
}

impl ViewportBucket {
    pub fn from_width(width: f32) -> Self {
        if width < 768.0 {
            ViewportBucket::Mobile
        } else if width < 1024.0 {
            ViewportBucket::Tablet
        } else {
            ViewportBucket::Desktop
        }
    }

    pub fn columns(&self) -> usize {
        match self {
            ViewportBucket::Mobile => 8,
            ViewportBucket::Tablet | ViewportBucket::Desktop => 10,
        }
    }

    /// Tile edge length in px
    pub fn tile_size(&self) -> f32 {
        match self {
            ViewportBucket::Mobile => 64.0,
            ViewportBucket::Tablet => 82.0,
            ViewportBucket::Desktop => 100.0,
        }
    }

    fn slot(&self) -> usize {
        match self {
            ViewportBucket::Mobile => 0,
            ViewportBucket::Tablet => 1,
            ViewportBucket::Desktop => 2,
        }
    }
}

/// Placement of one tile, in viewport percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutPosition {
    pub row: usize,
    pub col: usize,
    pub x: f32,
    pub y: f32,
    /// Degrees
    pub rotation: f32,
}

const X_START: f32 = 6.0;
const X_END: f32 = 94.0;
const Y_START: f32 = 22.0;
const Y_END: f32 = 82.0;

/// Compute positions for `total` tiles
pub fn build_layout(total: usize, bucket: ViewportBucket) -> Vec<LayoutPosition> {
    let cols = bucket.columns();
    let rows = total.div_ceil(cols);

    (0..total)
        .map(|i| {
            let col = i % cols;
            let row = i / cols;
            let col_norm = if cols > 1 { col as f32 / (cols - 1) as f32 } else { 0.5 };
            let row_norm = if rows > 1 { row as f32 / (rows - 1) as f32 } else { 0.5 };
            let x_jitter = ((i % 7) as f32 - 3.0) * 0.4;
            let y_jitter = ((i % 5) as f32 - 2.0) * 0.4;
            LayoutPosition {
                row,
                col,
                x: (X_START + col_norm * (X_END - X_START) + x_jitter).clamp(2.0, 98.0),
                y: (Y_START + row_norm * (Y_END - Y_START) + y_jitter).clamp(2.0, 98.0),
                rotation: ((i % 5) as f32 - 2.0) * 4.0,
            }
        })
        .collect()
}

/// Per-bucket layout cache
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutCache {
    slots: [Option<Vec<LayoutPosition>>; 3],
}

impl LayoutCache {
    pub fn positions(&mut self, bucket: ViewportBucket, total: usize) -> &[LayoutPosition] {
        let slot = &mut self.slots[bucket.slot()];
        if slot.as_ref().is_none_or(|p| p.len() != total) {
            log::debug!("Computing {total} layout positions for {bucket:?}");
            *slot = Some(build_layout(total, bucket));
        }
        slot.as_deref().unwrap_or_default()
    }

    /// Cached positions without computing
    pub fn get(&self, bucket: ViewportBucket) -> Option<&[LayoutPosition]> {
        self.slots[bucket.slot()].as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buckets() {
        assert_eq!(ViewportBucket::from_width(375.0), ViewportBucket::Mobile);
        assert_eq!(ViewportBucket::from_width(768.0), ViewportBucket::Tablet);
        assert_eq!(ViewportBucket::from_width(1023.0), ViewportBucket::Tablet);
        assert_eq!(ViewportBucket::from_width(1440.0), ViewportBucket::Desktop);
    }

    #[test]
    fn test_layout_deterministic_and_in_bounds() {
        let a = build_layout(122, ViewportBucket::Desktop);
        let b = build_layout(122, ViewportBucket::Desktop);
        assert_eq!(a, b);
        assert_eq!(a.len(), 122);
        for p in &a {
            assert!((2.0..=98.0).contains(&p.x));
            assert!((2.0..=98.0).contains(&p.y));
        }
    }

    #[test]
    fn test_no_two_tiles_share_a_cell() {
        let layout = build_layout(122, ViewportBucket::Mobile);
        for (i, a) in layout.iter().enumerate() {
            for b in &layout[i + 1..] {
                assert!((a.row, a.col) != (b.row, b.col));
                assert!((a.x - b.x).abs() > 1e-3 || (a.y - b.y).abs() > 1e-3);
            }
        }
    }

    #[test]
    fn test_single_row_centres_vertically() {
        let layout = build_layout(3, ViewportBucket::Desktop);
        // rows == 1 -> row_norm 0.5 -> y around 52
        assert!((layout[2].y - (52.0 + 0.0)).abs() < 1e-4);
    }

    #[test]
    fn test_cache_reuses_per_bucket() {
        let mut cache = LayoutCache::default();
        assert!(cache.get(ViewportBucket::Tablet).is_none());
        let first = cache.positions(ViewportBucket::Tablet, 50).to_vec();
        let again = cache.positions(ViewportBucket::Tablet, 50).to_vec();
        assert_eq!(first, again);
        assert!(cache.get(ViewportBucket::Tablet).is_some());
        assert!(cache.get(ViewportBucket::Mobile).is_none());
    }

    #[test]
    fn test_empty_layout() {
        assert!(build_layout(0, ViewportBucket::Desktop).is_empty());
    }
}
