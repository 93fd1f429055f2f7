//! Aggregation of cell traversals into per-row boundary records, and the
//! winding sweep that turns those records into interior runs and edge cells.

use std::collections::BTreeMap;

use crate::coverage;
use crate::geom::{Point, Side};
use crate::output::{GridEdge, GridRun};
use crate::walk::{CellRecord, Traversal};

/// Tolerance separating edge cells from empty and fully covered ones.
pub(crate) const COVERAGE_TOL: f64 = 1e-6;

/// Aggregated contribution of one boundary cell to its row.
///
/// `col` is a 0-based full-grid column; halo cells map to one column left or
/// right of the subgrid, so it can be `-1` or `ncol`. Coverage is signed:
/// exterior rings add, holes subtract, and classification happens only after
/// every ring of the component has been accumulated.
#[derive(Clone, Copy, Debug)]
pub(crate) struct BoundaryCell {
    pub col: i64,
    pub coverage: f64,
    pub winding_delta: i32,
}

fn find_or_create(cells: &mut Vec<BoundaryCell>, col: i64) -> &mut BoundaryCell {
    match cells.iter().position(|c| c.col == col) {
        Some(i) => &mut cells[i],
        None => {
            cells.push(BoundaryCell {
                col,
                coverage: 0.0,
                winding_delta: 0,
            });
            let last = cells.len() - 1;
            &mut cells[last]
        }
    }
}

/// Is this traversal usable for coverage and winding?
///
/// Either a proper pass through the cell with at least two distinct
/// coordinates, or a closed ring that never left the cell.
fn is_valid(t: &Traversal) -> bool {
    (t.traversed() && t.has_multiple_unique_coords())
        || (t.entry == Side::None && t.is_closed_ring())
}

/// Fold one walked ring into the per-row boundary records.
///
/// Halo rows are dropped entirely: they can't affect any grid row. Halo
/// *columns* are kept for winding only; a ring edge beyond the horizontal
/// extent still decides whether the grid cells to its side are interior.
pub(crate) fn accumulate_ring(
    cells: &BTreeMap<(usize, usize), CellRecord>,
    is_exterior: bool,
    sub_cols: usize,
    col_off: usize,
    rows: &mut [Vec<BoundaryCell>],
) {
    let coverage_factor = if is_exterior { 1.0 } else { -1.0 };
    let winding_factor: i32 = if is_exterior { 1 } else { -1 };

    for (&(row, col), record) in cells {
        if row < 1 {
            continue;
        }
        let sub_row = row - 1;
        if sub_row >= rows.len() {
            continue;
        }

        let (full_col, in_grid) = if col < 1 {
            (col_off as i64 - 1, false)
        } else if col - 1 >= sub_cols {
            ((col_off + sub_cols) as i64, false)
        } else {
            ((col_off + col - 1) as i64, true)
        };

        let valid: Vec<&Traversal> = record.traversals.iter().filter(|t| is_valid(t)).collect();
        if valid.is_empty() {
            continue;
        }

        let frac = if in_grid {
            match valid.as_slice() {
                [t] if t.entry == Side::None => {
                    coverage::closed_ring_fraction(&record.bounds, &t.coords)
                }
                [t] => coverage::covered_fraction(&record.bounds, &t.coords),
                _ => {
                    let paths: Vec<&[Point]> = valid.iter().map(|t| t.coords.as_slice()).collect();
                    let cell_area = record.bounds.area();
                    if cell_area > 0.0 {
                        coverage::left_hand_area(&record.bounds, &paths) / cell_area
                    } else {
                        0.0
                    }
                }
            }
        } else {
            0.0
        };

        let row_cells = &mut rows[sub_row];
        if frac != 0.0 {
            find_or_create(row_cells, full_col).coverage += coverage_factor * frac;
        }

        // Winding deltas are recorded even when the coverage is zero: a
        // traversal riding a cell wall has no area but still crosses the row
        // midline, and that crossing is what classifies the cells beside it
        // as interior.
        let y_mid = (record.bounds.ymin + record.bounds.ymax) / 2.0;
        for t in &valid {
            if !t.traversed() || t.coords.len() < 2 {
                continue;
            }
            let entry_y = t.coords[0].y;
            let exit_y = t.coords[t.coords.len() - 1].y;
            let crosses = (entry_y > y_mid && exit_y < y_mid) || (entry_y < y_mid && exit_y > y_mid);
            if !crosses {
                continue;
            }
            let delta = if entry_y > y_mid { -winding_factor } else { winding_factor };
            find_or_create(row_cells, full_col).winding_delta += delta;
        }
    }
}

/// Sweep one row's boundary cells left to right, emitting interior runs and
/// edge cells.
///
/// `row` is the 1-based full-grid row. The `prev_col` sentinel starts at −2
/// rather than −1 so that a halo-column record (at column −1) can seed a run
/// beginning at grid column 1.
pub(crate) fn sweep_row(
    mut cells: Vec<BoundaryCell>,
    row: usize,
    id: usize,
    runs: &mut Vec<GridRun>,
    edges: &mut Vec<GridEdge>,
) {
    cells.sort_by_key(|c| c.col);

    let mut merged: Vec<BoundaryCell> = Vec::with_capacity(cells.len());
    for cell in cells {
        match merged.last_mut() {
            Some(m) if m.col == cell.col => {
                m.coverage += cell.coverage;
                m.winding_delta += cell.winding_delta;
            }
            _ => merged.push(cell),
        }
    }

    let mut winding = 0i32;
    let mut prev_col = -2i64;

    for mc in merged {
        if winding != 0 && prev_col > -2 && mc.col > prev_col + 1 {
            runs.push(GridRun {
                row,
                col_start: (prev_col + 2) as usize,
                col_end: mc.col as usize,
                id,
            });
        }

        let w = mc.coverage;
        if w > COVERAGE_TOL && w < 1.0 - COVERAGE_TOL {
            edges.push(GridEdge {
                row,
                col: (mc.col + 1) as usize,
                weight: w,
                id,
            });
        } else if w >= 1.0 - COVERAGE_TOL {
            runs.push(GridRun {
                row,
                col_start: (mc.col + 1) as usize,
                col_end: (mc.col + 1) as usize,
                id,
            });
        }

        winding += mc.winding_delta;
        prev_col = mc.col;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(col: i64, coverage: f64, winding_delta: i32) -> BoundaryCell {
        BoundaryCell {
            col,
            coverage,
            winding_delta,
        }
    }

    #[test]
    fn sweep_emits_runs_between_boundary_cells() {
        let mut runs = Vec::new();
        let mut edges = Vec::new();
        sweep_row(
            vec![cell(1, 0.5, 1), cell(5, 0.5, -1)],
            3,
            7,
            &mut runs,
            &mut edges,
        );

        assert_eq!(
            runs,
            vec![GridRun {
                row: 3,
                col_start: 3,
                col_end: 5,
                id: 7
            }]
        );
        assert_eq!(edges.len(), 2);
        assert_eq!((edges[0].col, edges[1].col), (2, 6));
    }

    #[test]
    fn sweep_merges_duplicate_columns_before_classifying() {
        // Two half-covered records for the same cell merge into one fully
        // covered cell.
        let mut runs = Vec::new();
        let mut edges = Vec::new();
        sweep_row(
            vec![cell(2, 0.5, 1), cell(2, 0.5, 0)],
            1,
            1,
            &mut runs,
            &mut edges,
        );

        assert!(edges.is_empty());
        assert_eq!(
            runs,
            vec![GridRun {
                row: 1,
                col_start: 3,
                col_end: 3,
                id: 1
            }]
        );
    }

    #[test]
    fn halo_record_seeds_a_run_at_the_first_grid_column() {
        // A winding crossing in the left halo (column -1), then nothing
        // until a closing crossing in the right halo (column 4): the whole
        // row is interior.
        let mut runs = Vec::new();
        let mut edges = Vec::new();
        sweep_row(
            vec![cell(-1, 0.0, 1), cell(4, 0.0, -1)],
            2,
            1,
            &mut runs,
            &mut edges,
        );

        assert!(edges.is_empty());
        assert_eq!(
            runs,
            vec![GridRun {
                row: 2,
                col_start: 1,
                col_end: 4,
                id: 1
            }]
        );
    }

    #[test]
    fn negative_and_tiny_coverage_emits_nothing() {
        let mut runs = Vec::new();
        let mut edges = Vec::new();
        sweep_row(
            vec![cell(0, -1.0, 1), cell(1, 1e-9, 0), cell(2, 0.0, -1)],
            1,
            1,
            &mut runs,
            &mut edges,
        );
        assert!(runs.is_empty());
        assert!(edges.is_empty());
    }
}
