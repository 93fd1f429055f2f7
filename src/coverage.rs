//! Covered-area fractions for ring traversals through a cell.
//!
//! For a counterclockwise ring, the covered part of a cell is the region to
//! the *left* of the ring's path through it. When a single pass of the ring
//! crosses the cell, that region is bounded by the path itself plus the
//! clockwise arc of the cell boundary from the exit point back to the entry
//! point, and its area can be computed directly. When several passes visit
//! the same cell, the regions are recovered by chaining the passes along the
//! cell perimeter.

use crate::geom::{Bounds, Point};
use crate::num::CheapOrderedFloat;

/// Tolerance for comparing perimeter distances.
const PD_TOL: f64 = 1e-12;

/// Signed area of a closed ring (`ring[0] == ring[last]`), by the shoelace
/// formula.
///
/// Coordinates are taken relative to the first vertex before multiplying,
/// which avoids most of the cancellation error for small rings far from the
/// origin. The sign depends on orientation; callers take the absolute value.
pub fn signed_area(ring: &[Point]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let x0 = ring[0].x;
    let mut sum = 0.0;
    for i in 1..ring.len() - 1 {
        let x = ring[i].x - x0;
        sum += x * (ring[i - 1].y - ring[i + 1].y);
    }
    sum / 2.0
}

/// Covered fraction of a cell for a ring lying entirely inside it.
pub fn closed_ring_fraction(bounds: &Bounds, ring: &[Point]) -> f64 {
    let cell_area = bounds.area();
    if cell_area <= 0.0 {
        return 0.0;
    }
    signed_area(ring).abs() / cell_area
}

/// The four cell corners with their perimeter distances, in counterclockwise
/// order from the bottom-left.
fn corner_points(bounds: &Bounds) -> [(Point, f64); 4] {
    let h = bounds.height();
    let w = bounds.width();
    [
        (Point::new(bounds.xmin, bounds.ymin), 0.0),
        (Point::new(bounds.xmin, bounds.ymax), h),
        (Point::new(bounds.xmax, bounds.ymax), h + w),
        (Point::new(bounds.xmax, bounds.ymin), 2.0 * h + w),
    ]
}

/// Clockwise arc length along the perimeter from the position `from` back to
/// the position `to`.
fn cw_distance(from: f64, to: f64, perimeter: f64) -> f64 {
    let d = from - to;
    if d < 0.0 {
        d + perimeter
    } else {
        d
    }
}

/// Covered fraction of a cell crossed by a single traversal.
///
/// `coords` runs from an entry point on the cell boundary, through interior
/// (or boundary) points, to an exit point on the cell boundary. The covered
/// region is closed by walking the cell boundary clockwise from the exit back
/// to the entry, inserting any corners passed on the way. If entry and exit
/// coincide (within tolerance), the traversal is treated as a closed loop and
/// measured directly.
pub fn covered_fraction(bounds: &Bounds, coords: &[Point]) -> f64 {
    let cell_area = bounds.area();
    if cell_area <= 0.0 || coords.len() < 2 {
        return 0.0;
    }

    let perimeter = bounds.perimeter();
    let entry_pd = bounds.perimeter_distance(coords[0]);
    let exit_pd = bounds.perimeter_distance(coords[coords.len() - 1]);

    let arc = if exit_pd > entry_pd + PD_TOL {
        exit_pd - entry_pd
    } else if entry_pd > exit_pd + PD_TOL {
        perimeter - entry_pd + exit_pd
    } else {
        let mut ring = coords.to_vec();
        if ring[0] != ring[ring.len() - 1] {
            ring.push(ring[0]);
        }
        return signed_area(&ring).abs() / cell_area;
    };

    let mut in_arc: Vec<(Point, f64)> = corner_points(bounds)
        .into_iter()
        .filter_map(|(corner, pd)| {
            let d = cw_distance(exit_pd, pd, perimeter);
            (d > PD_TOL && d < arc - PD_TOL).then_some((corner, d))
        })
        .collect();
    in_arc.sort_by(|a, b| CheapOrderedFloat::from(a.1).cmp(&CheapOrderedFloat::from(b.1)));

    let mut ring = Vec::with_capacity(coords.len() + in_arc.len() + 1);
    ring.extend_from_slice(coords);
    ring.extend(in_arc.into_iter().map(|(corner, _)| corner));
    ring.push(coords[0]);

    signed_area(&ring).abs() / cell_area
}

/// Total area to the left of a set of traversals through one cell.
///
/// Each traversal starts and ends on the cell boundary. Starting from a
/// traversal's exit, the boundary is walked clockwise to the nearest entry of
/// a traversal not yet consumed (the chain's first traversal closes the
/// ring), inserting the corners passed along the way. Chaining repeats until
/// every traversal belongs to some closed ring; the result is the sum of the
/// ring areas.
pub fn left_hand_area(bounds: &Bounds, traversals: &[&[Point]]) -> f64 {
    let perimeter = bounds.perimeter();
    let corners = corner_points(bounds);
    let entry_pds: Vec<f64> = traversals
        .iter()
        .map(|t| bounds.perimeter_distance(t[0]))
        .collect();
    let exit_pds: Vec<f64> = traversals
        .iter()
        .map(|t| bounds.perimeter_distance(t[t.len() - 1]))
        .collect();

    let mut used = vec![false; traversals.len()];
    let mut total = 0.0;

    for start in 0..traversals.len() {
        if used[start] {
            continue;
        }
        let mut ring: Vec<Point> = Vec::new();
        let mut cur = start;
        loop {
            used[cur] = true;
            ring.extend_from_slice(traversals[cur]);

            let mut next = start;
            let mut arc = cw_distance(exit_pds[cur], entry_pds[start], perimeter);
            for (j, &used_j) in used.iter().enumerate() {
                if used_j {
                    continue;
                }
                let d = cw_distance(exit_pds[cur], entry_pds[j], perimeter);
                if d < arc {
                    arc = d;
                    next = j;
                }
            }

            let mut between: Vec<(Point, f64)> = corners
                .iter()
                .filter_map(|&(corner, pd)| {
                    let d = cw_distance(exit_pds[cur], pd, perimeter);
                    (d > PD_TOL && d < arc - PD_TOL).then_some((corner, d))
                })
                .collect();
            between.sort_by(|a, b| CheapOrderedFloat::from(a.1).cmp(&CheapOrderedFloat::from(b.1)));
            ring.extend(between.into_iter().map(|(corner, _)| corner));

            if next == start {
                break;
            }
            cur = next;
        }
        if ring[0] != ring[ring.len() - 1] {
            ring.push(ring[0]);
        }
        total += signed_area(&ring).abs();
    }

    total
}
