//! Per-geometry dispatch: subgrid selection, ring walking, and the winding
//! sweep, one polygon component at a time.

use geo::{BoundingRect, CoordsIter, Winding};
use geo_types::{Geometry, LineString, Polygon};

use crate::emit::{self, BoundaryCell};
use crate::geom::{Bounds, Point};
use crate::grid::{Grid, PaddedGrid};
use crate::output::{GridEdge, GridRun};
use crate::walk;

/// Rasterize one input geometry, appending to the output accumulators.
///
/// Collections and multipolygons recurse; every polygon component is
/// processed independently with its own subgrid and row table, so winding
/// from one disjoint component can never promote another component's
/// boundary cells to interior. Non-polygonal geometry is ignored.
pub(crate) fn burn_geometry(
    geometry: &Geometry<f64>,
    grid: &Grid,
    id: usize,
    runs: &mut Vec<GridRun>,
    edges: &mut Vec<GridEdge>,
) {
    match geometry {
        Geometry::Polygon(polygon) => burn_polygon(polygon, grid, id, runs, edges),
        Geometry::MultiPolygon(polygons) => {
            for polygon in &polygons.0 {
                burn_polygon(polygon, grid, id, runs, edges);
            }
        }
        Geometry::GeometryCollection(collection) => {
            for child in &collection.0 {
                burn_geometry(child, grid, id, runs, edges);
            }
        }
        _ => {}
    }
}

fn burn_polygon(
    polygon: &Polygon<f64>,
    grid: &Grid,
    id: usize,
    runs: &mut Vec<GridRun>,
    edges: &mut Vec<GridEdge>,
) {
    if polygon
        .coords_iter()
        .any(|c| !c.x.is_finite() || !c.y.is_finite())
    {
        log::warn!("geometry {id} has a non-finite coordinate, skipping a polygon");
        return;
    }

    let Some(bbox) = polygon.bounding_rect() else {
        return;
    };
    let bbox = Bounds::new(bbox.min().x, bbox.min().y, bbox.max().x, bbox.max().y);
    let Some(region) = grid.extent().intersection(&bbox) else {
        return;
    };

    let sub = grid.shrink_to_fit(&region);
    let padded = sub.padded();

    let row_off = ((grid.extent().ymax - sub.extent().ymax) / grid.dy()).round() as usize;
    let col_off = ((sub.extent().xmin - grid.extent().xmin) / grid.dx()).round() as usize;

    let mut rows: Vec<Vec<BoundaryCell>> = vec![Vec::new(); sub.nrow()];

    burn_ring(polygon.exterior(), true, &padded, sub.ncol(), col_off, &mut rows);
    for hole in polygon.interiors() {
        burn_ring(hole, false, &padded, sub.ncol(), col_off, &mut rows);
    }

    for (sub_row, cells) in rows.into_iter().enumerate() {
        if cells.is_empty() {
            continue;
        }
        emit::sweep_row(cells, row_off + sub_row + 1, id, runs, edges);
    }
}

fn burn_ring(
    ring: &LineString<f64>,
    is_exterior: bool,
    padded: &PaddedGrid,
    sub_cols: usize,
    col_off: usize,
    rows: &mut [Vec<BoundaryCell>],
) {
    if ring.0.len() < 4 {
        return;
    }

    // Normalize to counterclockwise so that left-of-path always means
    // inside-the-ring; the hole/exterior distinction is carried by the sign
    // factors instead.
    let mut coords: Vec<Point> = ring.0.iter().map(|c| Point::new(c.x, c.y)).collect();
    if !ring.is_ccw() {
        coords.reverse();
    }

    let cells = walk::walk_ring(coords, padded);
    emit::accumulate_ring(&cells, is_exterior, sub_cols, col_off, rows);
}
