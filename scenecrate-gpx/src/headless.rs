//! A graphics backend that records requests instead of drawing
//!
//! Used by the demo and the tests to observe what the registry and the
//! proxies ask of the renderer.

use crate::representation::{
    DisplayMode, GraphicsBackend, Representation, RepresentationId, SelectionMode,
    SelectionOwner, SelectionProvider, VisualAttribute,
};
use crate::shape::Shape;
use scenecrate_core::{BoundingBox, Triangulation};
use std::any::Any;
use std::collections::HashMap;

/// Recording [`GraphicsBackend`]
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    created: usize,
    displayed: Vec<RepresentationId>,
    display_modes: HashMap<RepresentationId, DisplayMode>,
    viewer_updates: usize,
    fit_alls: usize,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Representations currently shown, in display order
    pub fn displayed(&self) -> &[RepresentationId] {
        &self.displayed
    }

    pub fn is_displayed(&self, id: RepresentationId) -> bool {
        self.displayed.contains(&id)
    }

    pub fn display_mode(&self, id: RepresentationId) -> Option<DisplayMode> {
        self.display_modes.get(&id).copied()
    }

    pub fn created_count(&self) -> usize {
        self.created
    }

    pub fn viewer_updates(&self) -> usize {
        self.viewer_updates
    }

    /// Number of times the view was framed
    pub fn fit_all_count(&self) -> usize {
        self.fit_alls
    }
}

impl GraphicsBackend for HeadlessBackend {
    fn create_mesh_representation(&mut self, mesh: &Triangulation) -> Box<dyn Representation> {
        self.created += 1;
        Box::new(HeadlessRepresentation::new(mesh.bounding_box(), None))
    }

    fn create_shape_representation(&mut self, shape: &Shape) -> Box<dyn Representation> {
        self.created += 1;
        Box::new(HeadlessRepresentation::new(shape.bounding_box(), Some(shape.clone())))
    }

    fn display(&mut self, representation: &dyn Representation) {
        let id = representation.id();
        if !self.displayed.contains(&id) {
            self.displayed.push(id);
        }
    }

    fn erase(&mut self, representation: &dyn Representation) {
        let id = representation.id();
        self.displayed.retain(|shown| *shown != id);
        self.display_modes.remove(&id);
    }

    fn set_display_mode(&mut self, representation: RepresentationId, mode: DisplayMode) {
        self.display_modes.insert(representation, mode);
    }

    fn update_viewer(&mut self) {
        self.viewer_updates += 1;
    }

    fn fit_all(&mut self) {
        self.fit_alls += 1;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Representation produced by [`HeadlessBackend`]
#[derive(Debug)]
pub struct HeadlessRepresentation {
    id: RepresentationId,
    bounds: BoundingBox,
    shape: Option<Shape>,
    attributes: Vec<VisualAttribute>,
    redisplays: usize,
    active_modes: Vec<SelectionMode>,
}

impl HeadlessRepresentation {
    pub fn new(bounds: BoundingBox, shape: Option<Shape>) -> Self {
        Self {
            id: RepresentationId::next(),
            bounds,
            shape,
            attributes: Vec::new(),
            redisplays: 0,
            active_modes: Vec::new(),
        }
    }

    /// Attributes applied so far, oldest first
    pub fn attributes(&self) -> &[VisualAttribute] {
        &self.attributes
    }

    pub fn last_attribute(&self) -> Option<&VisualAttribute> {
        self.attributes.last()
    }

    pub fn redisplay_count(&self) -> usize {
        self.redisplays
    }

    pub fn active_modes(&self) -> &[SelectionMode] {
        &self.active_modes
    }
}

impl Representation for HeadlessRepresentation {
    fn id(&self) -> RepresentationId {
        self.id
    }

    fn apply(&mut self, attribute: VisualAttribute) {
        self.attributes.push(attribute);
    }

    fn bounding_box(&self) -> BoundingBox {
        self.bounds
    }

    fn request_redisplay(&mut self) {
        self.redisplays += 1;
    }

    fn selection_provider_mut(&mut self) -> Option<&mut dyn SelectionProvider> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl SelectionProvider for HeadlessRepresentation {
    fn activate(&mut self, mode: SelectionMode) {
        if !self.active_modes.contains(&mode) {
            self.active_modes.push(mode);
        }
    }

    fn owners(&self, mode: SelectionMode) -> Vec<SelectionOwner> {
        match &self.shape {
            Some(shape) if self.active_modes.contains(&mode) => shape
                .sub_shapes(mode.shape_type())
                .into_iter()
                .map(|sub| SelectionOwner::sub_shape(self.id, sub))
                .collect(),
            _ => Vec::new(),
        }
    }
}
