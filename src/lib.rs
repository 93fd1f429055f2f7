#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

pub mod coverage;
mod emit;
mod geom;
mod grid;
mod num;
mod output;
mod raster;
mod walk;

use geo::HasDimensions;
use geo_types::Geometry;

pub use geom::{Bounds, Crossing, Point, Side};
pub use grid::{Grid, PaddedGrid};
pub use output::{GridEdge, GridRun, SparseOutput};

/// The grid parameters were invalid.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Error {
    /// The extent has non-positive width or height.
    EmptyExtent,
    /// The grid has zero rows or zero columns.
    EmptyGrid,
    /// An extent coordinate is NaN or infinite.
    NotFinite,
}

/// Rasterize already-parsed geometries onto `grid`.
///
/// Each geometry may be a polygon, a multipolygon, or a collection of those;
/// anything else is ignored. The `id` attached to the output records is the
/// 1-based position of the geometry in the input sequence. Empty geometries
/// produce no output.
pub fn rasterize<'a>(
    geometries: impl IntoIterator<Item = &'a Geometry<f64>>,
    grid: &Grid,
) -> SparseOutput {
    let mut out = SparseOutput::default();
    for (k, geometry) in geometries.into_iter().enumerate() {
        if geometry.is_empty() {
            continue;
        }
        raster::burn_geometry(geometry, grid, k + 1, &mut out.runs, &mut out.edges);
    }
    out
}

/// Rasterize a sequence of WKB-encoded geometries onto a fresh grid.
///
/// The grid covers `(xmin, ymin)..(xmax, ymax)` with `ncol` columns and
/// `nrow` rows; output rows are 1-based and counted from the top. Each
/// buffer should hold a WKB `POLYGON`, `MULTIPOLYGON`, or a collection of
/// those. Empty buffers and empty geometries are skipped silently; a buffer
/// that fails to parse is skipped with a warning naming its 1-based index.
pub fn rasterize_exact<B: AsRef<[u8]>>(
    wkbs: impl IntoIterator<Item = B>,
    xmin: f64,
    ymin: f64,
    xmax: f64,
    ymax: f64,
    ncol: usize,
    nrow: usize,
) -> Result<SparseOutput, Error> {
    let grid = Grid::new(Bounds::new(xmin, ymin, xmax, ymax), ncol, nrow)?;

    let mut out = SparseOutput::default();
    for (k, buf) in wkbs.into_iter().enumerate() {
        let mut buf = buf.as_ref();
        if buf.is_empty() {
            continue;
        }
        let geometry = match wkb::wkb_to_geom(&mut buf) {
            Ok(geometry) => geometry,
            Err(err) => {
                log::warn!("failed to parse WKB for geometry {}, skipping: {:?}", k + 1, err);
                continue;
            }
        };
        if geometry.is_empty() {
            continue;
        }
        raster::burn_geometry(&geometry, &grid, k + 1, &mut out.runs, &mut out.edges);
    }
    Ok(out)
}
