//! The sparse two-table output format: interior runs and edge cells.

/// A horizontal span of fully covered cells in one row.
///
/// All coordinates are 1-based; `row` 1 is the top row of the grid and the
/// span covers columns `col_start..=col_end`. A single fully covered cell is
/// a unit-length run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct GridRun {
    /// 1-based row, counted from the top.
    pub row: usize,
    /// 1-based first column of the span.
    pub col_start: usize,
    /// 1-based last column of the span, inclusive.
    pub col_end: usize,
    /// 1-based index of the input geometry that produced this run.
    pub id: usize,
}

/// A partially covered boundary cell.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GridEdge {
    /// 1-based row, counted from the top.
    pub row: usize,
    /// 1-based column.
    pub col: usize,
    /// Covered fraction of the cell, strictly between 0 and 1.
    pub weight: f64,
    /// 1-based index of the input geometry that produced this edge cell.
    pub id: usize,
}

/// Rasterization output: interior runs and boundary edge cells.
///
/// Records are grouped by geometry id in input order; within one polygon
/// component, rows increase, and within a row, columns increase.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SparseOutput {
    /// Interior runs.
    pub runs: Vec<GridRun>,
    /// Boundary edge cells.
    pub edges: Vec<GridEdge>,
}

impl SparseOutput {
    /// Convert a dense coverage-fraction matrix into the sparse two-table
    /// format.
    ///
    /// `coverage` is row-major with `nrow * ncol` entries describing a
    /// subgrid whose top-left cell sits at 0-based offsets (`row_off`,
    /// `col_off`) in the full grid. Cells with weight at least `1 - tol` are
    /// folded into runs; weights in `(0, 1 - tol)` become edge cells;
    /// non-positive weights close any open run.
    ///
    /// This is the legacy path for coverage produced by an engine that fills
    /// a dense matrix instead of walking rings.
    pub fn from_dense(
        coverage: &[f64],
        nrow: usize,
        ncol: usize,
        row_off: usize,
        col_off: usize,
        id: usize,
        tol: f64,
    ) -> Self {
        assert_eq!(
            coverage.len(),
            nrow * ncol,
            "coverage matrix must have nrow * ncol entries"
        );

        let mut out = SparseOutput::default();

        for i in 0..nrow {
            let row = row_off + i + 1;
            // 1-based full-grid column where the open run began.
            let mut run_start: Option<usize> = None;

            for j in 0..ncol {
                let w = coverage[i * ncol + j];
                let col = col_off + j + 1;

                if w <= 0.0 {
                    if let Some(start) = run_start.take() {
                        out.runs.push(GridRun {
                            row,
                            col_start: start,
                            col_end: col - 1,
                            id,
                        });
                    }
                    continue;
                }

                if w >= 1.0 - tol {
                    if run_start.is_none() {
                        run_start = Some(col);
                    }
                } else {
                    if let Some(start) = run_start.take() {
                        out.runs.push(GridRun {
                            row,
                            col_start: start,
                            col_end: col - 1,
                            id,
                        });
                    }
                    out.edges.push(GridEdge {
                        row,
                        col,
                        weight: w,
                        id,
                    });
                }
            }

            if let Some(start) = run_start {
                out.runs.push(GridRun {
                    row,
                    col_start: start,
                    col_end: col_off + ncol,
                    id,
                });
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_rows_are_run_length_encoded() {
        #[rustfmt::skip]
        let coverage = [
            0.0, 1.0, 1.0, 0.5,
            1.0, 1.0, 0.25, 1.0,
        ];
        let out = SparseOutput::from_dense(&coverage, 2, 4, 0, 0, 1, 1e-6);

        assert_eq!(
            out.runs,
            vec![
                GridRun { row: 1, col_start: 2, col_end: 3, id: 1 },
                GridRun { row: 2, col_start: 1, col_end: 2, id: 1 },
                GridRun { row: 2, col_start: 4, col_end: 4, id: 1 },
            ]
        );
        assert_eq!(
            out.edges,
            vec![
                GridEdge { row: 1, col: 4, weight: 0.5, id: 1 },
                GridEdge { row: 2, col: 3, weight: 0.25, id: 1 },
            ]
        );
    }

    #[test]
    fn offsets_shift_into_full_grid_coordinates() {
        let coverage = [1.0];
        let out = SparseOutput::from_dense(&coverage, 1, 1, 4, 7, 3, 1e-6);
        assert_eq!(
            out.runs,
            vec![GridRun { row: 5, col_start: 8, col_end: 8, id: 3 }]
        );
        assert!(out.edges.is_empty());
    }

    #[test]
    fn near_full_weights_count_as_interior() {
        let coverage = [1.0 - 1e-9, 0.999];
        let out = SparseOutput::from_dense(&coverage, 1, 2, 0, 0, 1, 1e-6);
        assert_eq!(out.runs.len(), 1);
        assert_eq!(out.runs[0].col_start, 1);
        assert_eq!(out.runs[0].col_end, 1);
        assert_eq!(out.edges.len(), 1);
        assert_eq!(out.edges[0].weight, 0.999);
    }
}
