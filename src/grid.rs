//! Bounded grids and their padded variants.
//!
//! A [`Grid`] is the user-visible lattice: an extent divided into `nrow`
//! by `ncol` equal cells. A [`PaddedGrid`] adds one virtual halo cell on
//! each side so that the ring walker can follow geometry that wanders
//! outside the extent without any special casing at the borders.

use crate::geom::Bounds;
use crate::Error;

/// A regular axis-aligned lattice over a bounded extent.
///
/// Rows are counted from the top: row 0 covers `y` in `[ymax - dy, ymax]`.
/// Columns are counted from the left.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Grid {
    extent: Bounds,
    dx: f64,
    dy: f64,
    nrow: usize,
    ncol: usize,
}

impl Grid {
    /// Create a grid over `extent` with `ncol` columns and `nrow` rows.
    ///
    /// Fails if the extent is non-finite or degenerate, or if either
    /// dimension is zero.
    pub fn new(extent: Bounds, ncol: usize, nrow: usize) -> Result<Self, Error> {
        let coords = [extent.xmin, extent.ymin, extent.xmax, extent.ymax];
        if coords.iter().any(|c| !c.is_finite()) {
            return Err(Error::NotFinite);
        }
        if extent.xmax <= extent.xmin || extent.ymax <= extent.ymin {
            return Err(Error::EmptyExtent);
        }
        if ncol == 0 || nrow == 0 {
            return Err(Error::EmptyGrid);
        }
        Ok(Grid {
            extent,
            dx: extent.width() / ncol as f64,
            dy: extent.height() / nrow as f64,
            nrow,
            ncol,
        })
    }

    /// The extent covered by this grid.
    pub fn extent(&self) -> Bounds {
        self.extent
    }

    /// The width of one cell.
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// The height of one cell.
    pub fn dy(&self) -> f64 {
        self.dy
    }

    /// The number of rows.
    pub fn nrow(&self) -> usize {
        self.nrow
    }

    /// The number of columns.
    pub fn ncol(&self) -> usize {
        self.ncol
    }

    /// The smallest subgrid of this grid that covers `region`, with the
    /// region's bounds snapped outward to cell boundaries.
    ///
    /// `region` must overlap the extent. The subgrid keeps this grid's cell
    /// size, and its outer edges are flush with this grid's extent wherever
    /// they meet it, so subgrid cell boundaries coincide bit-for-bit with
    /// parent cell boundaries.
    pub fn shrink_to_fit(&self, region: &Bounds) -> Grid {
        let e = self.extent;

        let i0 = (((region.xmin - e.xmin) / self.dx).floor() as i64).clamp(0, self.ncol as i64 - 1)
            as usize;
        let mut i1 =
            (((region.xmax - e.xmin) / self.dx).ceil() as i64).clamp(0, self.ncol as i64) as usize;
        if i1 <= i0 {
            i1 = i0 + 1;
        }

        let j0 = (((e.ymax - region.ymax) / self.dy).floor() as i64).clamp(0, self.nrow as i64 - 1)
            as usize;
        let mut j1 =
            (((e.ymax - region.ymin) / self.dy).ceil() as i64).clamp(0, self.nrow as i64) as usize;
        if j1 <= j0 {
            j1 = j0 + 1;
        }

        let xmin = if i0 == 0 { e.xmin } else { e.xmin + i0 as f64 * self.dx };
        let xmax = if i1 == self.ncol { e.xmax } else { e.xmin + i1 as f64 * self.dx };
        let ymax = if j0 == 0 { e.ymax } else { e.ymax - j0 as f64 * self.dy };
        let ymin = if j1 == self.nrow { e.ymin } else { e.ymax - j1 as f64 * self.dy };

        Grid {
            extent: Bounds::new(xmin, ymin, xmax, ymax),
            dx: self.dx,
            dy: self.dy,
            nrow: j1 - j0,
            ncol: i1 - i0,
        }
    }

    /// This grid with one halo cell added on each side.
    pub fn padded(&self) -> PaddedGrid {
        PaddedGrid { grid: self.clone() }
    }
}

/// A grid extended by one virtual halo cell on each side.
///
/// Halo cells are half-planes represented as very large finite rectangles:
/// their inner edge sits on the grid boundary and their outer edge at
/// `±f64::MAX`. Every finite coordinate therefore falls into some padded
/// cell, and a walk can never step beyond the halo.
#[derive(Clone, Debug)]
pub struct PaddedGrid {
    grid: Grid,
}

/// Outer edge coordinate of halo cells.
const FAR: f64 = f64::MAX;

impl PaddedGrid {
    /// The number of rows, including the two halo rows.
    pub fn rows(&self) -> usize {
        self.grid.nrow + 2
    }

    /// The number of columns, including the two halo columns.
    pub fn cols(&self) -> usize {
        self.grid.ncol + 2
    }

    /// The padded row index containing `y`.
    ///
    /// Row 0 is the top halo; rows `1..=nrow` are grid rows; row `nrow + 1`
    /// is the bottom halo. A coordinate exactly on an interior cell boundary
    /// maps to the cell below it; `y == ymax` maps to the top grid row and
    /// `y == ymin` to the bottom grid row.
    pub fn row_of(&self, y: f64) -> usize {
        let e = self.grid.extent;
        if y > e.ymax {
            return 0;
        }
        if y < e.ymin {
            return self.grid.nrow + 1;
        }
        let row = ((e.ymax - y) / self.grid.dy).floor() as i64;
        1 + row.clamp(0, self.grid.nrow as i64 - 1) as usize
    }

    /// The padded column index containing `x`.
    ///
    /// Column 0 is the left halo; columns `1..=ncol` are grid columns;
    /// column `ncol + 1` is the right halo.
    pub fn col_of(&self, x: f64) -> usize {
        let e = self.grid.extent;
        if x < e.xmin {
            return 0;
        }
        if x > e.xmax {
            return self.grid.ncol + 1;
        }
        let col = ((x - e.xmin) / self.grid.dx).floor() as i64;
        1 + col.clamp(0, self.grid.ncol as i64 - 1) as usize
    }

    /// The rectangle of the padded cell at (`row`, `col`).
    ///
    /// Neighboring cells share boundary coordinates bit-for-bit, and the
    /// outermost grid cells are flush with the extent.
    pub fn cell(&self, row: usize, col: usize) -> Bounds {
        let g = &self.grid;
        let e = g.extent;

        let xmin = if col == 0 {
            -FAR
        } else {
            e.xmin + (col - 1) as f64 * g.dx
        };
        let xmax = if col == g.ncol + 1 {
            FAR
        } else if col == g.ncol {
            e.xmax
        } else {
            e.xmin + col as f64 * g.dx
        };
        let ymax = if row == 0 {
            FAR
        } else {
            e.ymax - (row - 1) as f64 * g.dy
        };
        let ymin = if row == g.nrow + 1 {
            -FAR
        } else if row == g.nrow {
            e.ymin
        } else {
            e.ymax - row as f64 * g.dy
        };

        Bounds::new(xmin, ymin, xmax, ymax)
    }
}
