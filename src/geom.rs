//! Geometric primitives: points, cell rectangles, and boundary crossings.

/// A two-dimensional point.
///
/// Equality is bit-exact: the ring walker relies on comparing interpolated
/// crossing points against original ring coordinates without tolerance.
#[derive(Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate. Larger values are up; grid rows are counted
    /// from the top, so row indices grow as `y` shrinks.
    pub y: f64,
}

impl std::fmt::Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?}, {:?})", self.x, self.y)
    }
}

impl Point {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// One side of a cell rectangle, or [`Side::None`] for a point that isn't
/// on the boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Side {
    /// The `y == ymax` edge.
    Top,
    /// The `y == ymin` edge.
    Bottom,
    /// The `x == xmin` edge.
    Left,
    /// The `x == xmax` edge.
    Right,
    /// Not on the boundary.
    None,
}

/// The point at which a directed segment leaves a rectangle, together with
/// the side it leaves through.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Crossing {
    /// The side of the rectangle that the segment crosses.
    pub side: Side,
    /// The crossing point; it lies exactly on `side`.
    pub coord: Point,
}

impl Crossing {
    fn new(side: Side, x: f64, y: f64) -> Self {
        Crossing {
            side,
            coord: Point::new(x, y),
        }
    }
}

/// An axis-aligned rectangle: one grid cell, or a bounding region.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    /// Smallest `x` coordinate.
    pub xmin: f64,
    /// Smallest `y` coordinate.
    pub ymin: f64,
    /// Largest `x` coordinate.
    pub xmax: f64,
    /// Largest `y` coordinate.
    pub ymax: f64,
}

impl Bounds {
    /// Create a new rectangle. `xmin <= xmax` and `ymin <= ymax` is the
    /// caller's responsibility.
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Bounds {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// The horizontal extent of this rectangle.
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    /// The vertical extent of this rectangle.
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// The area of this rectangle.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// The length of this rectangle's boundary.
    pub fn perimeter(&self) -> f64 {
        2.0 * (self.width() + self.height())
    }

    /// Does this rectangle contain `p`? The boundary is included.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.xmin && p.x <= self.xmax && p.y >= self.ymin && p.y <= self.ymax
    }

    /// Does the interior of this rectangle contain `p`?
    pub fn strictly_contains(&self, p: Point) -> bool {
        p.x > self.xmin && p.x < self.xmax && p.y > self.ymin && p.y < self.ymax
    }

    /// Do this rectangle and `other` overlap, boundaries included?
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.xmin <= other.xmax
            && self.xmax >= other.xmin
            && self.ymin <= other.ymax
            && self.ymax >= other.ymin
    }

    /// The intersection of this rectangle with `other`, or `None` if they
    /// don't overlap.
    pub fn intersection(&self, other: &Bounds) -> Option<Bounds> {
        if !self.intersects(other) {
            return None;
        }
        Some(Bounds::new(
            self.xmin.max(other.xmin),
            self.ymin.max(other.ymin),
            self.xmax.min(other.xmax),
            self.ymax.min(other.ymax),
        ))
    }

    /// The side whose closed segment contains `p`, or [`Side::None`].
    ///
    /// Corner points belong to the top or bottom side: the tie-break must be
    /// stable because the ring walker uses it to pick the exit direction, and
    /// it matches the corner handling in [`Bounds::crossing`].
    pub fn side(&self, p: Point) -> Side {
        if p.y == self.ymax {
            Side::Top
        } else if p.y == self.ymin {
            Side::Bottom
        } else if p.x == self.xmin {
            Side::Left
        } else if p.x == self.xmax {
            Side::Right
        } else {
            Side::None
        }
    }

    /// The crossing at which the directed line `from -> to` leaves this
    /// rectangle. `to` must lie outside the rectangle, and the line must pass
    /// through it (or touch its boundary).
    ///
    /// `from` must be an original ring coordinate, not an interpolated
    /// reentry point: reentry points already sit on a cell side, and
    /// recomputing a slope from them amplifies rounding error enough to
    /// produce crossings on the wrong side of an axis-aligned edge. Because
    /// only the direction and the line through the two points matter, `from`
    /// itself may lie outside the rectangle (behind the entry point).
    pub fn crossing(&self, from: Point, to: Point) -> Crossing {
        if from.x == to.x {
            // Vertical segment.
            return if to.y > from.y {
                Crossing::new(Side::Top, from.x, self.ymax)
            } else {
                Crossing::new(Side::Bottom, from.x, self.ymin)
            };
        }
        if from.y == to.y {
            // Horizontal segment.
            return if to.x > from.x {
                Crossing::new(Side::Right, self.xmax, from.y)
            } else {
                Crossing::new(Side::Left, self.xmin, from.y)
            };
        }

        let m = ((to.y - from.y) / (to.x - from.x)).abs();
        let up = to.y > from.y;
        let right = to.x > from.x;

        if up {
            if right {
                let y = from.y + m * (self.xmax - from.x);
                if y < self.ymax {
                    Crossing::new(Side::Right, self.xmax, y)
                } else {
                    Crossing::new(Side::Top, from.x + (self.ymax - from.y) / m, self.ymax)
                }
            } else {
                let y = from.y + m * (from.x - self.xmin);
                if y < self.ymax {
                    Crossing::new(Side::Left, self.xmin, y)
                } else {
                    Crossing::new(Side::Top, from.x - (self.ymax - from.y) / m, self.ymax)
                }
            }
        } else if right {
            let y = from.y - m * (self.xmax - from.x);
            if y > self.ymin {
                Crossing::new(Side::Right, self.xmax, y)
            } else {
                Crossing::new(Side::Bottom, from.x + (from.y - self.ymin) / m, self.ymin)
            }
        } else {
            let y = from.y - m * (from.x - self.xmin);
            if y > self.ymin {
                Crossing::new(Side::Left, self.xmin, y)
            } else {
                Crossing::new(Side::Bottom, from.x - (from.y - self.ymin) / m, self.ymin)
            }
        }
    }

    /// Arc length along the boundary from the bottom-left corner to `p`,
    /// walking counterclockwise (up the left side first).
    ///
    /// Corners: bottom-left is 0, top-left is `h`, top-right is `h + w`,
    /// bottom-right is `2h + w`.
    ///
    /// `p` must lie on the boundary.
    pub fn perimeter_distance(&self, p: Point) -> f64 {
        if p.x == self.xmin {
            p.y - self.ymin
        } else if p.y == self.ymax {
            self.height() + (p.x - self.xmin)
        } else if p.x == self.xmax {
            self.height() + self.width() + (self.ymax - p.y)
        } else if p.y == self.ymin {
            2.0 * self.height() + self.width() + (self.xmax - p.x)
        } else {
            debug_assert!(false, "{:?} is not on the boundary of {:?}", p, self);
            0.0
        }
    }
}
