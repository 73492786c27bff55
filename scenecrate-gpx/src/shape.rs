//! Boundary-representation shape handles
//!
//! A [`Shape`] is a shared, immutable node of a topology tree (compound,
//! solid, shell, face, wire, edge, vertex) placed by a location. Two handles
//! are equal only when they refer to the same node at the same location,
//! which is how selection owners are matched against sub-shapes of an item.

use scenecrate_core::{Bounded, BoundingBox, Point3d, QuantityArea, Transform3D, Vector3d};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Topological shape kinds, ordered from most to least complex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeType {
    Compound,
    CompSolid,
    Solid,
    Shell,
    Face,
    Wire,
    Edge,
    Vertex,
}

impl ShapeType {
    /// `true` if shapes of this type are built from shapes of `other`
    pub fn is_more_complex_than(self, other: ShapeType) -> bool {
        self < other
    }
}

#[derive(Debug)]
struct ShapeNode {
    shape_type: ShapeType,
    children: Vec<Shape>,
    points: Vec<Point3d>,
}

/// Shared handle to a shape node
#[derive(Debug, Clone)]
pub struct Shape {
    node: Arc<ShapeNode>,
    location: Transform3D,
}

impl Shape {
    fn from_node(node: ShapeNode) -> Self {
        Self {
            node: Arc::new(node),
            location: Transform3D::identity(),
        }
    }

    /// A vertex at `point`
    pub fn vertex(point: Point3d) -> Self {
        Self::from_node(ShapeNode {
            shape_type: ShapeType::Vertex,
            children: Vec::new(),
            points: vec![point],
        })
    }

    /// A straight edge between two points
    pub fn edge(start: Point3d, end: Point3d) -> Self {
        Self::from_node(ShapeNode {
            shape_type: ShapeType::Edge,
            children: vec![Self::vertex(start), Self::vertex(end)],
            points: vec![start, end],
        })
    }

    /// A planar polygonal face bounded by `outline`, closed implicitly
    pub fn face(outline: Vec<Point3d>) -> Self {
        let edges = (0..outline.len())
            .map(|i| Self::edge(outline[i], outline[(i + 1) % outline.len()]))
            .collect();
        let wire = Self::from_node(ShapeNode {
            shape_type: ShapeType::Wire,
            children: edges,
            points: Vec::new(),
        });
        Self::from_node(ShapeNode {
            shape_type: ShapeType::Face,
            children: vec![wire],
            points: outline,
        })
    }

    /// A composite shape (shell, solid, compound...) made of `children`
    pub fn composite(shape_type: ShapeType, children: Vec<Shape>) -> Self {
        Self::from_node(ShapeNode {
            shape_type,
            children,
            points: Vec::new(),
        })
    }

    /// An axis-aligned box solid with six faces
    pub fn cuboid(min: Point3d, max: Point3d) -> Self {
        let corner = |x: bool, y: bool, z: bool| {
            Point3d::new(
                if x { max.x } else { min.x },
                if y { max.y } else { min.y },
                if z { max.z } else { min.z },
            )
        };
        let faces = vec![
            Self::face(vec![corner(false, false, false), corner(false, true, false), corner(true, true, false), corner(true, false, false)]),
            Self::face(vec![corner(false, false, true), corner(true, false, true), corner(true, true, true), corner(false, true, true)]),
            Self::face(vec![corner(false, false, false), corner(true, false, false), corner(true, false, true), corner(false, false, true)]),
            Self::face(vec![corner(false, true, false), corner(false, true, true), corner(true, true, true), corner(true, true, false)]),
            Self::face(vec![corner(false, false, false), corner(false, false, true), corner(false, true, true), corner(false, true, false)]),
            Self::face(vec![corner(true, false, false), corner(true, true, false), corner(true, true, true), corner(true, false, true)]),
        ];
        let shell = Self::composite(ShapeType::Shell, faces);
        Self::composite(ShapeType::Solid, vec![shell])
    }

    pub fn shape_type(&self) -> ShapeType {
        self.node.shape_type
    }

    /// Placement of this handle
    pub fn location(&self) -> &Transform3D {
        &self.location
    }

    /// The same node placed at `location`, replacing the current one
    pub fn located(&self, location: Transform3D) -> Shape {
        Self {
            node: Arc::clone(&self.node),
            location,
        }
    }

    /// The same node with `transform` applied on top of the current location
    pub fn moved(&self, transform: Transform3D) -> Shape {
        self.located(transform.compose(self.location))
    }

    /// Direct children of this shape, carrying the location of `self`
    pub fn children(&self) -> Vec<Shape> {
        self.node
            .children
            .iter()
            .map(|child| child.moved(self.location))
            .collect()
    }

    /// All distinct sub-shapes of `shape_type`, depth-first, including `self`
    pub fn sub_shapes(&self, shape_type: ShapeType) -> Vec<Shape> {
        let mut found = Vec::new();
        self.collect(shape_type, &mut found);
        found
    }

    fn collect(&self, shape_type: ShapeType, found: &mut Vec<Shape>) {
        if self.shape_type() == shape_type {
            if !found.contains(self) {
                found.push(self.clone());
            }
            return;
        }
        for child in self.children() {
            child.collect(shape_type, found);
        }
    }

    /// Faces making up this shape: its sub-faces, or itself if it is a face
    pub fn faces(&self) -> Vec<Shape> {
        if self.shape_type().is_more_complex_than(ShapeType::Face) || self.shape_type() == ShapeType::Face {
            self.sub_shapes(ShapeType::Face)
        } else {
            Vec::new()
        }
    }

    /// Points of this node, placed by its location
    fn placed_points(&self) -> Vec<Point3d> {
        self.node
            .points
            .iter()
            .map(|p| self.location.transform_point(p))
            .collect()
    }

    /// Bounding box of every point in the shape tree
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bounds = BoundingBox::from_points(&self.placed_points());
        for child in self.children() {
            bounds.add(&child.bounding_box());
        }
        bounds
    }

    /// Surface area of the planar faces in this shape
    pub fn area(&self) -> QuantityArea {
        let total = self
            .faces()
            .iter()
            .map(|face| polygon_area(&face.placed_points()))
            .sum();
        QuantityArea::new(total)
    }
}

/// Newell's formula for a closed planar polygon
fn polygon_area(points: &[Point3d]) -> f64 {
    let mut normal = Vector3d::zeros();
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        normal += p.coords.cross(&q.coords);
    }
    normal.norm() / 2.0
}

impl Bounded for Shape {
    fn bounding_box(&self) -> BoundingBox {
        Shape::bounding_box(self)
    }
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.node, &other.node) && self.location == other.location
    }
}

impl Eq for Shape {}

impl Hash for Shape {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.node).hash(state);
    }
}
