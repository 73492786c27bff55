//! Core traits for scenecrate

use crate::bounds::BoundingBox;
use crate::mesh::Triangulation;
use crate::point::Point3d;

/// Trait for objects occupying a region of space
pub trait Bounded {
    /// Get the bounding box of the object
    fn bounding_box(&self) -> BoundingBox;

    /// Get the center point of the object, `None` when it has no extent
    fn center(&self) -> Option<Point3d> {
        self.bounding_box().center()
    }
}

impl Bounded for Triangulation {
    fn bounding_box(&self) -> BoundingBox {
        Triangulation::bounding_box(self)
    }
}

impl Bounded for BoundingBox {
    fn bounding_box(&self) -> BoundingBox {
        *self
    }
}

impl<T: Bounded> Bounded for [T] {
    fn bounding_box(&self) -> BoundingBox {
        self.iter().map(Bounded::bounding_box).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_bounds_are_the_union() {
        let boxes = [
            BoundingBox::from_corners(Point3d::new(0.0, 0.0, 0.0), Point3d::new(1.0, 1.0, 1.0)),
            BoundingBox::void(),
            BoundingBox::from_corners(Point3d::new(2.0, 2.0, 2.0), Point3d::new(3.0, 3.0, 3.0)),
        ];
        let bounds = boxes[..].bounding_box();
        assert_eq!(bounds.min(), Some(Point3d::new(0.0, 0.0, 0.0)));
        assert_eq!(bounds.max(), Some(Point3d::new(3.0, 3.0, 3.0)));
        assert_eq!(boxes[..].center(), Some(Point3d::new(1.5, 1.5, 1.5)));
    }

    #[test]
    fn test_empty_has_no_center() {
        let meshes: [Triangulation; 0] = [];
        assert_eq!(meshes[..].center(), None);
    }
}
