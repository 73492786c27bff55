//! Triangulated surface data carried by mesh items

use crate::bounds::BoundingBox;
use crate::point::*;
use crate::quantity::QuantityArea;
use serde::{Deserialize, Serialize};

/// A triangulation with shared nodes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Triangulation {
    pub nodes: Vec<Point3d>,
    pub triangles: Vec<[usize; 3]>,
}

impl Triangulation {
    /// Create a new empty triangulation
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a triangulation from nodes and triangles
    pub fn from_nodes_and_triangles(nodes: Vec<Point3d>, triangles: Vec<[usize; 3]>) -> Self {
        Self { nodes, triangles }
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Check if the triangulation is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() || self.triangles.is_empty()
    }

    /// Add a node and return its index
    pub fn add_node(&mut self, node: Point3d) -> usize {
        let index = self.nodes.len();
        self.nodes.push(node);
        index
    }

    /// Add a triangle
    pub fn add_triangle(&mut self, triangle: [usize; 3]) {
        self.triangles.push(triangle);
    }

    /// Total surface area; triangles referencing missing nodes are skipped
    pub fn area(&self) -> QuantityArea {
        let twice_area: f64 = self
            .triangles
            .iter()
            .filter_map(|t| {
                let a = self.nodes.get(t[0])?;
                let b = self.nodes.get(t[1])?;
                let c = self.nodes.get(t[2])?;
                Some((b - a).cross(&(c - a)).norm())
            })
            .sum();
        QuantityArea::new(twice_area / 2.0)
    }

    /// Bounding box of all nodes
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.nodes)
    }
}
