//! Integration tests for scenecrate-gpx
//!
//! These tests drive a scene registry through document events and check the
//! aggregate bounds, the selection index and what reaches the backend.

use scenecrate_core::{
    Color, Error, Point3d, PropertyOwner, PropertyOwnerExt, PropertySet, Transform3D, Triangulation,
    Vector3d,
};
use scenecrate_gpx::*;
use std::any::Any;
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

fn cube(label: &str, min: f64, max: f64) -> ShapeItem {
    ShapeItem::new(
        label,
        Shape::cuboid(Point3d::new(min, min, min), Point3d::new(max, max, max)),
    )
}

fn new_registry(document: &Document) -> SceneRegistry {
    SceneRegistry::new(document, Box::new(HeadlessBackend::new()), DisplayDefaults::default())
}

/// Record every event emitted by `registry`
fn record(registry: &mut SceneRegistry) -> Rc<RefCell<Vec<SceneEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    registry.subscribe(move |event| sink.borrow_mut().push(event.clone()));
    events
}

fn add(document: &mut Document, registry: &mut SceneRegistry, item: impl DocumentItem) -> ItemId {
    let id = item.id();
    let event = document.add_item(item);
    registry.handle_document_event(document, &event).unwrap();
    id
}

fn headless(proxy: &dyn GpxProxy) -> &HeadlessRepresentation {
    proxy
        .representation()
        .as_any()
        .downcast_ref::<HeadlessRepresentation>()
        .unwrap()
}

#[test]
fn test_bounds_follow_add_and_erase() {
    let mut doc = Document::new("doc");
    let mut registry = new_registry(&doc);
    let events = record(&mut registry);

    let a = add(&mut doc, &mut registry, cube("a", 0.0, 1.0));
    let _b = add(&mut doc, &mut registry, cube("b", 2.0, 3.0));

    let bounds = registry.bounding_box();
    assert_eq!(bounds.min(), Some(Point3d::new(0.0, 0.0, 0.0)));
    assert_eq!(bounds.max(), Some(Point3d::new(3.0, 3.0, 3.0)));
    assert_eq!(events.borrow().len(), 2);

    let event = doc.erase_item(a).unwrap();
    registry.handle_document_event(&doc, &event).unwrap();

    let bounds = registry.bounding_box();
    assert_eq!(bounds.min(), Some(Point3d::new(2.0, 2.0, 2.0)));
    assert_eq!(bounds.max(), Some(Point3d::new(3.0, 3.0, 3.0)));
    assert_eq!(events.borrow().last(), Some(&SceneEvent::BoundsChanged(bounds)));
}

#[test]
fn test_erase_twice_is_idempotent() {
    let mut doc = Document::new("doc");
    let mut registry = new_registry(&doc);
    let a = add(&mut doc, &mut registry, cube("a", 0.0, 1.0));
    let events = record(&mut registry);

    assert!(registry.erase_item(a));
    assert!(!registry.erase_item(a));

    assert_eq!(registry.entry_count(), 0);
    assert!(registry.bounding_box().is_void());
    assert_eq!(events.borrow().len(), 1);
    assert!(registry.backend::<HeadlessBackend>().unwrap().displayed().is_empty());
}

#[test]
fn test_toggle_face_twice_restores_selection() {
    let mut doc = Document::new("doc");
    let mut registry = new_registry(&doc);

    let mut item = cube("block", 0.0, 1.0);
    let face = item.shape().faces()[1].clone();
    let node = item.add_node(item.root_node(), "top", face.clone()).unwrap();
    let id = add(&mut doc, &mut registry, item);
    let events = record(&mut registry);

    let target = ApplicationItem::AssemblyNode { document: &doc, item: id, node };
    registry.toggle_selection(&target);
    assert_eq!(registry.selection().len(), 1);
    let selected = registry.selection().iter().next().unwrap();
    assert_eq!(selected.shape(), Some(&face));

    registry.toggle_selection(&target);
    assert!(registry.selection().is_empty());
    assert_eq!(*events.borrow(), vec![SceneEvent::SelectionChanged, SceneEvent::SelectionChanged]);
}

#[test]
fn test_toggle_root_node_selects_every_face() {
    let mut doc = Document::new("doc");
    let mut registry = new_registry(&doc);
    let item = cube("block", 0.0, 1.0);
    let root = item.root_node();
    let id = add(&mut doc, &mut registry, item);

    registry.toggle_selection(&ApplicationItem::AssemblyNode { document: &doc, item: id, node: root });
    assert_eq!(registry.selection().len(), 6);
}

#[test]
fn test_toggle_located_assembly_node_selects_its_instance() {
    let mut doc = Document::new("doc");
    let mut registry = new_registry(&doc);

    let part = Shape::cuboid(Point3d::new(0.0, 0.0, 0.0), Point3d::new(1.0, 1.0, 1.0));
    let offset = Transform3D::translation(Vector3d::new(5.0, 0.0, 0.0));
    let assembly = Shape::composite(ShapeType::Compound, vec![part.clone(), part.located(offset)]);
    let mut item = ShapeItem::new("pair", assembly);
    let root = item.root_node();
    let left = item.add_node(root, "left", part.clone()).unwrap();
    let right = item.add_located_node(root, "right", part.clone(), offset).unwrap();
    let id = add(&mut doc, &mut registry, item);

    assert_eq!(registry.entries()[0].sub_entity_owners().len(), 12);
    assert_eq!(registry.bounding_box().max(), Some(Point3d::new(6.0, 1.0, 1.0)));

    registry.toggle_selection(&ApplicationItem::AssemblyNode { document: &doc, item: id, node: right });
    assert_eq!(registry.selection().len(), 6);
    assert!(registry
        .selection()
        .iter()
        .all(|owner| owner.shape().map(Shape::location) == Some(&offset)));

    registry.toggle_selection(&ApplicationItem::AssemblyNode { document: &doc, item: id, node: left });
    assert_eq!(registry.selection().len(), 12);
}

/// Backend whose recorded state stays readable from outside the registry
struct SharedBackend(Rc<RefCell<HeadlessBackend>>);

impl GraphicsBackend for SharedBackend {
    fn create_mesh_representation(&mut self, mesh: &Triangulation) -> Box<dyn Representation> {
        self.0.borrow_mut().create_mesh_representation(mesh)
    }

    fn create_shape_representation(&mut self, shape: &Shape) -> Box<dyn Representation> {
        self.0.borrow_mut().create_shape_representation(shape)
    }

    fn display(&mut self, representation: &dyn Representation) {
        self.0.borrow_mut().display(representation);
    }

    fn erase(&mut self, representation: &dyn Representation) {
        self.0.borrow_mut().erase(representation);
    }

    fn set_display_mode(&mut self, representation: RepresentationId, mode: DisplayMode) {
        self.0.borrow_mut().set_display_mode(representation, mode);
    }

    fn update_viewer(&mut self) {
        self.0.borrow_mut().update_viewer();
    }

    fn fit_all(&mut self) {
        self.0.borrow_mut().fit_all();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[test]
fn test_bounds_event_follows_display() {
    let state = Rc::new(RefCell::new(HeadlessBackend::new()));
    let mut doc = Document::new("doc");
    let mut registry = SceneRegistry::new(
        &doc,
        Box::new(SharedBackend(Rc::clone(&state))),
        DisplayDefaults::default(),
    );

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let observed = Rc::clone(&state);
    registry.subscribe(move |event| {
        if let SceneEvent::BoundsChanged(_) = event {
            let backend = observed.borrow();
            sink.borrow_mut().push((backend.displayed().to_vec(), backend.fit_all_count()));
        }
    });

    let id = add(&mut doc, &mut registry, cube("a", 0.0, 1.0));

    let rep = registry.find_proxy(id).unwrap().representation().id();
    assert_eq!(*seen.borrow(), vec![(vec![rep], 1)]);
}

#[test]
fn test_toggle_whole_document() {
    let mut doc = Document::new("doc");
    let mut registry = new_registry(&doc);
    let a = add(&mut doc, &mut registry, cube("a", 0.0, 1.0));
    let b = add(&mut doc, &mut registry, MeshItem::new("mesh", Triangulation::new()));

    registry.toggle_selection(&ApplicationItem::Document(&doc));

    let owners: Vec<_> = registry.selection().iter().map(|o| o.representation()).collect();
    let rep_a = registry.find_proxy(a).unwrap().representation().id();
    let rep_b = registry.find_proxy(b).unwrap().representation().id();
    assert_eq!(owners, vec![rep_a, rep_b]);
    assert!(registry.selection().iter().all(|o| o.shape().is_none()));
}

#[test]
fn test_foreign_document_is_ignored() {
    let mut doc = Document::new("doc");
    let mut other = Document::new("other");
    let mut registry = new_registry(&doc);
    add(&mut doc, &mut registry, cube("a", 0.0, 1.0));
    let events = record(&mut registry);

    let stray = cube("stray", 5.0, 6.0);
    let stray_id = stray.id();
    let event = other.add_item(stray);
    registry.handle_document_event(&other, &event).unwrap();
    registry.toggle_selection(&ApplicationItem::Document(&other));
    registry.toggle_selection(&ApplicationItem::Item { document: &other, item: stray_id });

    assert_eq!(registry.entry_count(), 1);
    assert!(registry.selection().is_empty());
    assert!(events.borrow().is_empty());
}

#[derive(Debug)]
struct PointCloudItem {
    id: ItemId,
    properties: PropertySet,
}

impl PointCloudItem {
    const KIND: ItemKind = ItemKind::new("PointCloudItem");

    fn new() -> Self {
        Self {
            id: ItemId::next(),
            properties: PropertySet::new(),
        }
    }
}

impl PropertyOwner for PointCloudItem {
    fn properties(&self) -> &PropertySet {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut PropertySet {
        &mut self.properties
    }
}

impl DocumentItem for PointCloudItem {
    fn id(&self) -> ItemId {
        self.id
    }

    fn kind(&self) -> ItemKind {
        Self::KIND
    }

    fn label(&self) -> &str {
        "cloud"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[test]
fn test_unsupported_kind_leaves_registry_untouched() {
    let mut doc = Document::new("doc");
    let mut registry = new_registry(&doc);
    let events = record(&mut registry);

    let item = PointCloudItem::new();
    let event = doc.add_item(item);
    let err = registry.handle_document_event(&doc, &event).unwrap_err();

    assert!(matches!(err, Error::UnsupportedItemKind(kind) if kind == "PointCloudItem"));
    assert_eq!(registry.entry_count(), 0);
    assert!(registry.bounding_box().is_void());
    assert!(events.borrow().is_empty());
    assert_eq!(registry.backend::<HeadlessBackend>().unwrap().created_count(), 0);
}

#[test]
fn test_proxy_construction_and_property_changes() {
    let mut doc = Document::new("doc");
    let mut registry = new_registry(&doc);
    let id = add(&mut doc, &mut registry, cube("a", 0.0, 1.0));

    assert_eq!(headless(registry.find_proxy(id).unwrap()).redisplay_count(), 0);

    let proxy = registry.find_proxy_mut(id).unwrap();
    let shape_proxy = proxy.as_any().downcast_ref::<ShapeProxy>().unwrap();
    let (color, material) = (shape_proxy.color, shape_proxy.material);
    proxy.set_value(color, Color::new(1.0, 0.0, 0.0)).unwrap();
    proxy.set_value(material, Material::Steel).unwrap();

    let rep = headless(registry.find_proxy(id).unwrap());
    assert_eq!(rep.redisplay_count(), 2);
    assert_eq!(rep.last_attribute(), Some(&VisualAttribute::Material(Material::Steel)));
    assert_eq!(
        rep.active_modes(),
        &[SelectionMode::Vertex, SelectionMode::Edge, SelectionMode::Face]
    );
}

#[test]
fn test_display_mode_is_registry_scoped() {
    let mut doc = Document::new("doc");
    let mut registry = new_registry(&doc);
    let a = add(&mut doc, &mut registry, cube("a", 0.0, 1.0));
    let b = add(&mut doc, &mut registry, MeshItem::new("mesh", Triangulation::new()));

    registry.set_display_mode(b, DisplayMode::Wireframe).unwrap();

    assert_eq!(registry.display_mode(a), Some(DisplayMode::Shaded));
    assert_eq!(registry.display_mode(b), Some(DisplayMode::Wireframe));
    let rep_b = registry.find_proxy(b).unwrap().representation().id();
    assert_eq!(
        registry.backend::<HeadlessBackend>().unwrap().display_mode(rep_b),
        Some(DisplayMode::Wireframe)
    );

    let proxy = registry.find_proxy(b).unwrap();
    let key = proxy.display_mode_property().unwrap();
    assert_eq!(proxy.value(key), Some(&DisplayMode::Wireframe));
    assert_eq!(headless(proxy).redisplay_count(), 0);
}

#[test]
fn test_defaults_loaded_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "shape": {{ "transparency": 50, "display_mode": "Shrink" }}, "mesh": {{ "show_nodes": true }} }}"#
    )
    .unwrap();

    let defaults = DisplayDefaults::load(file.path()).unwrap();
    let mut doc = Document::new("doc");
    let mut registry = SceneRegistry::new(&doc, Box::new(HeadlessBackend::new()), defaults);
    let id = add(&mut doc, &mut registry, cube("a", 0.0, 1.0));

    let proxy = registry.find_proxy(id).unwrap();
    let shape_proxy = proxy.as_any().downcast_ref::<ShapeProxy>().unwrap();
    assert_eq!(proxy.value(shape_proxy.transparency), Some(&50));
    assert_eq!(registry.display_mode(id), Some(DisplayMode::Shrink));
    assert!(headless(proxy).attributes().contains(&VisualAttribute::Transparency(0.5)));
    assert!(registry.defaults().mesh.show_nodes);
}

#[test]
fn test_missing_defaults_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = DisplayDefaults::load(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
