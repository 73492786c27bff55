//! Axis-aligned bounding volumes

use crate::point::Point3d;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box that may be void (contains nothing)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    corners: Option<(Point3d, Point3d)>,
}

impl BoundingBox {
    /// Create a void box
    pub const fn void() -> Self {
        Self { corners: None }
    }

    /// Create a box from two opposite corners, in any order
    pub fn from_corners(a: Point3d, b: Point3d) -> Self {
        Self {
            corners: Some((a.inf(&b), a.sup(&b))),
        }
    }

    /// Create the smallest box enclosing all points; void for no points
    pub fn from_points<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a Point3d>,
    {
        let mut bounds = Self::void();
        for point in points {
            bounds.add_point(point);
        }
        bounds
    }

    /// Check whether the box contains nothing
    pub fn is_void(&self) -> bool {
        self.corners.is_none()
    }

    /// Clear the box back to void
    pub fn set_void(&mut self) {
        self.corners = None;
    }

    /// Minimum corner, `None` when void
    pub fn min(&self) -> Option<Point3d> {
        self.corners.map(|(min, _)| min)
    }

    /// Maximum corner, `None` when void
    pub fn max(&self) -> Option<Point3d> {
        self.corners.map(|(_, max)| max)
    }

    /// Center of the box, `None` when void
    pub fn center(&self) -> Option<Point3d> {
        self.corners.map(|(min, max)| nalgebra::center(&min, &max))
    }

    /// Grow the box to enclose a point
    pub fn add_point(&mut self, point: &Point3d) {
        self.corners = Some(match self.corners {
            Some((min, max)) => (min.inf(point), max.sup(point)),
            None => (*point, *point),
        });
    }

    /// Grow the box to enclose another box; adding a void box is a no-op
    pub fn add(&mut self, other: &BoundingBox) {
        if let Some((min, max)) = other.corners {
            self.add_point(&min);
            self.add_point(&max);
        }
    }

    /// Union of two boxes
    pub fn union(mut self, other: &BoundingBox) -> Self {
        self.add(other);
        self
    }

    /// Check whether a point lies inside or on the boundary of the box
    pub fn contains(&self, point: &Point3d) -> bool {
        match self.corners {
            Some((min, max)) => {
                (0..3).all(|i| min[i] <= point[i] && point[i] <= max[i])
            }
            None => false,
        }
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::void()
    }
}

impl<'a> FromIterator<&'a BoundingBox> for BoundingBox {
    fn from_iter<I: IntoIterator<Item = &'a BoundingBox>>(iter: I) -> Self {
        iter.into_iter().fold(Self::void(), |acc, b| acc.union(b))
    }
}

impl FromIterator<BoundingBox> for BoundingBox {
    fn from_iter<I: IntoIterator<Item = BoundingBox>>(iter: I) -> Self {
        iter.into_iter().fold(Self::void(), |acc, b| acc.union(&b))
    }
}
