//! Grid placement of topics by their interest vectors.
//!
//! Each vector is projected onto the plane by spreading its K components
//! evenly around the unit circle. The projections are min-max normalized,
//! visited in (y, x) order and dropped onto the nearest free grid cell,
//! searching outward ring by ring.

use std::collections::HashSet;
use std::f64::consts::TAU;

use tracing::debug;

use topicvec_core::types::{Point2, TopicRecord};
use topicvec_core::{Error, Result};

pub fn project_to_2d(vector: &[f64]) -> Point2 {
    let k = vector.len() as f64;
    vector.iter().enumerate().fold(Point2::default(), |acc, (i, v)| {
        let angle = i as f64 / k * TAU;
        Point2::new(acc.x + v * angle.cos(), acc.y + v * angle.sin())
    })
}

/// Assign `grid_pos` to every record. Fails when the grid is too small.
pub fn arrange_by_projection(topics: &mut [TopicRecord], cols: usize, rows: usize) -> Result<()> {
    if cols == 0 || rows == 0 || topics.len() > cols * rows {
        return Err(Error::InvalidConfig(format!("grid {}x{} cannot hold {} topics", cols, rows, topics.len())));
    }
    let projected: Vec<Point2> = topics.iter().map(|t| project_to_2d(&t.vector)).collect();
    let (min_x, max_x) = bounds(projected.iter().map(|p| p.x));
    let (min_y, max_y) = bounds(projected.iter().map(|p| p.y));
    let range_x = if max_x - min_x > 0.0 { max_x - min_x } else { 1.0 };
    let range_y = if max_y - min_y > 0.0 { max_y - min_y } else { 1.0 };

    let mut order: Vec<(usize, Point2)> = projected
        .iter()
        .enumerate()
        .map(|(i, p)| (i, Point2::new((p.x - min_x) / range_x, (p.y - min_y) / range_y)))
        .collect();
    order.sort_by(|a, b| a.1.y.total_cmp(&b.1.y).then(a.1.x.total_cmp(&b.1.x)));

    let mut occupied: HashSet<(usize, usize)> = HashSet::new();
    for (index, norm) in order {
        let target_col = cell(norm.x, cols);
        let target_row = cell(norm.y, rows);
        let placed = nearest_free(target_col, target_row, cols, rows, &occupied)
            .ok_or_else(|| Error::InvalidConfig(format!("no free grid cell for topic {}", topics[index].id)))?;
        occupied.insert(placed);
        debug!(topic = topics[index].id, col = placed.0, row = placed.1, "placed topic");
        topics[index].grid_pos = Some([placed.0, placed.1]);
    }
    Ok(())
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

fn cell(norm: f64, size: usize) -> usize {
    let raw = (norm * size as f64 * 0.999).floor();
    if raw <= 0.0 { 0 } else { (raw as usize).min(size - 1) }
}

fn nearest_free(col: usize, row: usize, cols: usize, rows: usize, occupied: &HashSet<(usize, usize)>) -> Option<(usize, usize)> {
    let max_radius = cols.max(rows) as i64;
    for radius in 0..=max_radius {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx.abs() != radius && dy.abs() != radius { continue; }
                let c = col as i64 + dx;
                let r = row as i64 + dy;
                if c < 0 || r < 0 || c >= cols as i64 || r >= rows as i64 { continue; }
                let key = (c as usize, r as usize);
                if !occupied.contains(&key) { return Some(key); }
            }
        }
    }
    None
}
