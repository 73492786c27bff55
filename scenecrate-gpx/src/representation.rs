//! Boundary with the rendering collaborator
//!
//! The traits here are implemented by whatever draws the scene. The registry
//! and the proxies only ever talk to the renderer through them.

use crate::shape::{Shape, ShapeType};
use scenecrate_core::{BoundingBox, Color, PropertyEnum, Triangulation};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one representation handle for the lifetime of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepresentationId(u64);

impl RepresentationId {
    /// Allocate a fresh identifier
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Registry-scoped presentation mode of a representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DisplayMode {
    Wireframe,
    #[default]
    Shaded,
    Shrink,
}

impl PropertyEnum for DisplayMode {
    fn enumeration() -> &'static [(Self, &'static str)] {
        &[
            (DisplayMode::Wireframe, "Wireframe"),
            (DisplayMode::Shaded, "Shaded"),
            (DisplayMode::Shrink, "Shrink"),
        ]
    }
}

/// Named surface materials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Material {
    Brass,
    Bronze,
    Copper,
    Gold,
    Pewter,
    Plaster,
    #[default]
    Plastic,
    Silver,
    Steel,
    Stone,
    Chrome,
    Aluminium,
}

impl PropertyEnum for Material {
    fn enumeration() -> &'static [(Self, &'static str)] {
        &[
            (Material::Brass, "Brass"),
            (Material::Bronze, "Bronze"),
            (Material::Copper, "Copper"),
            (Material::Gold, "Gold"),
            (Material::Pewter, "Pewter"),
            (Material::Plaster, "Plaster"),
            (Material::Plastic, "Plastic"),
            (Material::Silver, "Silver"),
            (Material::Steel, "Steel"),
            (Material::Stone, "Stone"),
            (Material::Chrome, "Chrome"),
            (Material::Aluminium, "Aluminium"),
        ]
    }
}

/// A representation-local visual setting
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VisualAttribute {
    Color(Color),
    Material(Material),
    ShowEdges(bool),
    ShowNodes(bool),
    /// 0 is opaque, 1 is fully transparent
    Transparency(f64),
}

/// Selection granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionMode {
    Vertex,
    Edge,
    Face,
    Solid,
}

impl SelectionMode {
    /// Sub-shape type picked in this mode
    pub fn shape_type(&self) -> ShapeType {
        match self {
            SelectionMode::Vertex => ShapeType::Vertex,
            SelectionMode::Edge => ShapeType::Edge,
            SelectionMode::Face => ShapeType::Face,
            SelectionMode::Solid => ShapeType::Solid,
        }
    }
}

/// What a selection owner stands for
#[derive(Debug, Clone, PartialEq)]
pub enum OwnerKind {
    /// The representation as a whole
    Whole,
    /// One sub-shape of the representation
    SubShape(Shape),
}

/// A selectable element of a representation
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionOwner {
    representation: RepresentationId,
    kind: OwnerKind,
}

impl SelectionOwner {
    pub fn whole(representation: RepresentationId) -> Self {
        Self {
            representation,
            kind: OwnerKind::Whole,
        }
    }

    pub fn sub_shape(representation: RepresentationId, shape: Shape) -> Self {
        Self {
            representation,
            kind: OwnerKind::SubShape(shape),
        }
    }

    pub fn representation(&self) -> RepresentationId {
        self.representation
    }

    pub fn kind(&self) -> &OwnerKind {
        &self.kind
    }

    /// Sub-shape this owner represents, `None` for whole-representation owners
    pub fn shape(&self) -> Option<&Shape> {
        match &self.kind {
            OwnerKind::SubShape(shape) => Some(shape),
            OwnerKind::Whole => None,
        }
    }
}

/// Rendering handle created for one document item
pub trait Representation: fmt::Debug {
    fn id(&self) -> RepresentationId;

    /// Apply a visual setting; takes effect at the next redisplay
    fn apply(&mut self, attribute: VisualAttribute);

    fn bounding_box(&self) -> BoundingBox;

    /// Recompute the presentation (fire-and-forget)
    fn request_redisplay(&mut self);

    /// Sub-shape selection support, if the representation has any
    fn selection_provider_mut(&mut self) -> Option<&mut dyn SelectionProvider> {
        None
    }

    fn as_any(&self) -> &dyn Any;
}

/// Fine-grained selection support of a representation
pub trait SelectionProvider {
    /// Make elements of the given granularity selectable
    fn activate(&mut self, mode: SelectionMode);

    /// Selection owners of an activated granularity, in a stable order
    fn owners(&self, mode: SelectionMode) -> Vec<SelectionOwner>;
}

/// The renderer owning the 3D view
pub trait GraphicsBackend {
    fn create_mesh_representation(&mut self, mesh: &Triangulation) -> Box<dyn Representation>;
    fn create_shape_representation(&mut self, shape: &Shape) -> Box<dyn Representation>;

    fn display(&mut self, representation: &dyn Representation);
    fn erase(&mut self, representation: &dyn Representation);
    fn set_display_mode(&mut self, representation: RepresentationId, mode: DisplayMode);

    /// Redraw the view
    fn update_viewer(&mut self);

    /// Frame everything displayed in the view
    fn fit_all(&mut self);

    fn as_any(&self) -> &dyn Any;
}
