//! The ring walker: follows one polygon ring cell by cell across a padded
//! grid, recording every pass the ring makes through every cell it touches.

use std::collections::BTreeMap;

use crate::geom::{Bounds, Point, Side};
use crate::grid::PaddedGrid;

/// One pass of a ring through a single cell: the entry side, the ordered
/// coordinates inside the cell, and the exit side.
///
/// A ring that lies entirely within one cell produces a single traversal
/// with no entry or exit whose coordinates form a closed loop.
#[derive(Clone, Debug)]
pub struct Traversal {
    /// The side through which the ring entered the cell, or [`Side::None`]
    /// if the pass began at a ring coordinate strictly inside it.
    pub entry: Side,
    /// The path through the cell. The first point lies on `entry` and the
    /// last on `exit` when those sides are set.
    pub coords: Vec<Point>,
    /// The side through which the ring left the cell, or [`Side::None`].
    pub exit: Side,
}

impl Traversal {
    fn new() -> Self {
        Traversal {
            entry: Side::None,
            coords: Vec::new(),
            exit: Side::None,
        }
    }

    /// Did the ring pass through the cell, entering and leaving through its
    /// boundary?
    pub fn traversed(&self) -> bool {
        self.entry != Side::None && self.exit != Side::None
    }

    /// Do the coordinates form a closed loop of at least three points?
    pub fn is_closed_ring(&self) -> bool {
        self.coords.len() >= 3 && self.coords[0] == self.coords[self.coords.len() - 1]
    }

    /// Is there more than one distinct coordinate? Corner touches produce
    /// degenerate single-point traversals that carry no area or winding.
    pub fn has_multiple_unique_coords(&self) -> bool {
        self.coords[1..].iter().any(|c| *c != self.coords[0])
    }
}

/// Everything one ring did inside one padded-grid cell.
#[derive(Clone, Debug)]
pub struct CellRecord {
    /// The cell rectangle.
    pub bounds: Bounds,
    /// The ring's passes through the cell, in walk order.
    pub traversals: Vec<Traversal>,
}

/// Follow a closed ring across `grid`, returning the touched cells keyed by
/// padded `(row, col)`.
///
/// The ring is consumed because the walk may need to replay its opening
/// coordinates: when the ring starts strictly inside a cell, the first pass
/// through that cell has no entry side, and its coordinates are appended to
/// the ring's tail so that the closing visit completes them.
pub fn walk_ring(mut coords: Vec<Point>, grid: &PaddedGrid) -> BTreeMap<(usize, usize), CellRecord> {
    let mut cells: BTreeMap<(usize, usize), CellRecord> = BTreeMap::new();
    if coords.is_empty() {
        return cells;
    }

    let mut pos = 0;
    let mut row = grid.row_of(coords[0].y);
    let mut col = grid.col_of(coords[0].x);
    // An interpolated exit point carried over to seed the next cell's entry.
    let mut last_exit: Option<Point> = None;

    while pos < coords.len() {
        let record = cells.entry((row, col)).or_insert_with(|| CellRecord {
            bounds: grid.cell(row, col),
            traversals: Vec::new(),
        });
        let bounds = record.bounds;

        let mut trav = Traversal::new();

        while pos < coords.len() {
            let next = last_exit.unwrap_or(coords[pos]);

            if trav.coords.is_empty() {
                trav.entry = bounds.side(next);
                trav.coords.push(next);
                if last_exit.take().is_none() {
                    pos += 1;
                }
                continue;
            }

            if bounds.contains(next) {
                trav.coords.push(next);
                if last_exit.take().is_none() {
                    pos += 1;
                }
            } else {
                // The segment leaves this cell. The crossing is computed from
                // the last original ring coordinate: an interpolated reentry
                // point already lies on a cell side, and recomputing the
                // slope from it can put the crossing on the wrong side of an
                // axis-aligned edge.
                let from = if pos > 0 {
                    coords[pos - 1]
                } else {
                    trav.coords[trav.coords.len() - 1]
                };
                let crossing = bounds.crossing(from, next);
                trav.coords.push(crossing.coord);
                trav.exit = crossing.side;
                if crossing.coord != next {
                    last_exit = Some(crossing.coord);
                }
                break;
            }
        }

        // A traversal that ran out of ring coordinates while sitting on the
        // cell boundary still exits there.
        if trav.exit == Side::None {
            if let Some(&last) = trav.coords.last() {
                if bounds.contains(last) && !bounds.strictly_contains(last) {
                    trav.exit = bounds.side(last);
                }
            }
        }

        let exited = trav.exit != Side::None;

        // The ring began strictly inside this cell and has now left without
        // entering through a side. Replay the partial pass at the ring's
        // tail; the closing visit to this cell completes it.
        if exited && trav.entry == Side::None {
            coords.extend_from_slice(&trav.coords);
        }

        let exit = trav.exit;
        record.traversals.push(trav);

        if exited {
            match exit {
                Side::Top => row -= 1,
                Side::Bottom => row += 1,
                Side::Left => col -= 1,
                Side::Right => col += 1,
                Side::None => {}
            }
        }
    }

    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Bounds;
    use crate::grid::Grid;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn padded_4x4() -> PaddedGrid {
        Grid::new(Bounds::new(0.0, 0.0, 4.0, 4.0), 4, 4)
            .unwrap()
            .padded()
    }

    #[test]
    fn ring_inside_one_cell() {
        let grid = padded_4x4();
        let ring = vec![p(0.2, 0.2), p(0.8, 0.2), p(0.8, 0.8), p(0.2, 0.8), p(0.2, 0.2)];
        let cells = walk_ring(ring, &grid);

        assert_eq!(cells.len(), 1);
        let record = &cells[&(4, 1)];
        assert_eq!(record.traversals.len(), 1);
        let trav = &record.traversals[0];
        assert_eq!(trav.entry, Side::None);
        assert_eq!(trav.exit, Side::None);
        assert!(trav.is_closed_ring());
    }

    #[test]
    fn segment_crossing_several_cells_is_split_at_each_boundary() {
        let grid = padded_4x4();
        // One long edge from cell (4, 1) to cell (4, 4) and back around
        // far above the grid.
        let ring = vec![p(0.5, 0.5), p(3.5, 0.5), p(3.5, 9.0), p(0.5, 9.0), p(0.5, 0.5)];
        let cells = walk_ring(ring, &grid);

        // Bottom row cells 1..=4 are all visited, with interpolated entry
        // and exit points on their shared edges.
        for col in 1..=4usize {
            assert!(cells.contains_key(&(4, col)), "missing cell (4, {col})");
        }
        let middle = &cells[&(4, 2)];
        let trav = &middle.traversals[0];
        assert_eq!(trav.entry, Side::Left);
        assert_eq!(trav.exit, Side::Right);
        assert_eq!(trav.coords.first(), Some(&p(1.0, 0.5)));
        assert_eq!(trav.coords.last(), Some(&p(2.0, 0.5)));
    }

    #[test]
    fn ring_starting_inside_a_cell_completes_on_the_closing_visit() {
        let grid = padded_4x4();
        // Starts strictly inside cell (4, 1), leaves it, and returns.
        let ring = vec![p(0.5, 0.5), p(2.5, 0.5), p(2.5, 1.5), p(0.5, 1.5), p(0.5, 0.5)];
        let cells = walk_ring(ring, &grid);

        let start_cell = &cells[&(4, 1)];
        // First visit is the incomplete opening pass; the closing visit
        // produces a proper traversal that exits where the opening pass did.
        assert!(start_cell.traversals.len() >= 2);
        let first = &start_cell.traversals[0];
        assert_eq!(first.entry, Side::None);
        assert_eq!(first.exit, Side::Right);
        let last = start_cell.traversals.last().unwrap();
        assert!(last.traversed());
        assert_eq!(last.exit, Side::Right);
    }

    #[test]
    fn walk_follows_geometry_outside_the_grid() {
        let grid = padded_4x4();
        // A ring dipping far outside the left edge of the grid.
        let ring = vec![
            p(0.5, 0.5),
            p(0.5, 3.5),
            p(-50.0, 3.5),
            p(-50.0, 0.5),
            p(0.5, 0.5),
        ];
        let cells = walk_ring(ring, &grid);

        // The excursion is tracked in the left halo column.
        assert!(cells.keys().any(|&(_, col)| col == 0));
        // And never outside the padded index range.
        assert!(cells.keys().all(|&(row, col)| row <= 5 && col <= 5));
    }
}
