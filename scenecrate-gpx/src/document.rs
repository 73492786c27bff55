//! Document model: logical items and the events they emit

use crate::shape::Shape;
use scenecrate_core::{
    PropertyArea, PropertyInt, PropertyKey, PropertyOwner, PropertyOwnerExt, PropertySet,
    PropertyString, Result, Transform3D, Triangulation, ValueProperty,
};
use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

fn next_id() -> u64 {
    static NEXT: AtomicU64 = AtomicU64::new(1);
    NEXT.fetch_add(1, Ordering::Relaxed)
}

/// Identity of a document item, unique within the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u64);

impl ItemId {
    pub fn next() -> Self {
        Self(next_id())
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(u64);

/// Tag naming the concrete kind of a document item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemKind(&'static str);

impl ItemKind {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// An entity of a document, displayed through a graphical proxy
pub trait DocumentItem: PropertyOwner + fmt::Debug + Any {
    fn id(&self) -> ItemId;
    fn kind(&self) -> ItemKind;
    fn label(&self) -> &str;
    fn as_any(&self) -> &dyn Any;
}

/// Notification emitted by a [`Document`] when its content changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentEvent {
    ItemAdded(ItemId),
    ItemErased(ItemId),
}

/// An ordered collection of root items
#[derive(Debug)]
pub struct Document {
    id: DocumentId,
    label: String,
    items: Vec<Box<dyn DocumentItem>>,
}

impl Document {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: DocumentId(next_id()),
            label: label.into(),
            items: Vec::new(),
        }
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Take ownership of `item`; forward the event to the scene registry
    pub fn add_item<I: DocumentItem>(&mut self, item: I) -> DocumentEvent {
        let id = item.id();
        self.items.push(Box::new(item));
        DocumentEvent::ItemAdded(id)
    }

    /// Destroy an item; `None` if it is not part of this document
    pub fn erase_item(&mut self, id: ItemId) -> Option<DocumentEvent> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        self.items.remove(index);
        Some(DocumentEvent::ItemErased(id))
    }

    pub fn item(&self, id: ItemId) -> Option<&dyn DocumentItem> {
        self.items.iter().find(|item| item.id() == id).map(|item| item.as_ref())
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut dyn DocumentItem> {
        self.items
            .iter_mut()
            .find(|item| item.id() == id)
            .map(|item| item.as_mut())
    }

    /// Typed access to an item
    pub fn item_as<T: DocumentItem>(&self, id: ItemId) -> Option<&T> {
        self.item(id).and_then(|item| item.as_any().downcast_ref::<T>())
    }

    pub fn root_items(&self) -> impl Iterator<Item = &dyn DocumentItem> + '_ {
        self.items.iter().map(|item| item.as_ref())
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

/// Target of a selection request coming from the application tree
#[derive(Debug, Clone, Copy)]
pub enum ApplicationItem<'a> {
    /// A whole document: every root item
    Document(&'a Document),
    /// One item of a document
    Item { document: &'a Document, item: ItemId },
    /// A node of an item's assembly tree
    AssemblyNode {
        document: &'a Document,
        item: ItemId,
        node: NodeId,
    },
}

impl<'a> ApplicationItem<'a> {
    pub fn document(&self) -> &'a Document {
        match self {
            ApplicationItem::Document(document)
            | ApplicationItem::Item { document, .. }
            | ApplicationItem::AssemblyNode { document, .. } => document,
        }
    }
}

fn label_of(properties: &PropertySet, key: PropertyKey<PropertyString>) -> &str {
    properties.get(key).map(|p| p.value().as_str()).unwrap_or_default()
}

/// A document item holding a triangulated mesh
#[derive(Debug)]
pub struct MeshItem {
    id: ItemId,
    properties: PropertySet,
    triangulation: Triangulation,
    pub label: PropertyKey<PropertyString>,
    pub node_count: PropertyKey<PropertyInt>,
    pub triangle_count: PropertyKey<PropertyInt>,
    pub area: PropertyKey<PropertyArea>,
}

impl MeshItem {
    pub const KIND: ItemKind = ItemKind::new("MeshItem");

    pub fn new(label: impl Into<String>, triangulation: Triangulation) -> Self {
        let mut properties = PropertySet::new();
        let label = properties.add(PropertyString::new("Label").with_value(label.into()));
        let node_count = properties.add(
            PropertyInt::new("Node count").with_value(count(triangulation.node_count())),
        );
        let triangle_count = properties.add(
            PropertyInt::new("Triangle count").with_value(count(triangulation.triangle_count())),
        );
        let area = properties.add(PropertyArea::new("Area").with_quantity(triangulation.area()));
        Self {
            id: ItemId::next(),
            properties,
            triangulation,
            label,
            node_count,
            triangle_count,
            area,
        }
    }

    pub fn triangulation(&self) -> &Triangulation {
        &self.triangulation
    }

    /// Replace the mesh data and refresh the derived properties
    pub fn set_triangulation(&mut self, triangulation: Triangulation) -> Result<()> {
        self.set_value(self.node_count, count(triangulation.node_count()))?;
        self.set_value(self.triangle_count, count(triangulation.triangle_count()))?;
        self.set_quantity(self.area, triangulation.area())?;
        self.triangulation = triangulation;
        Ok(())
    }
}

fn count(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

impl PropertyOwner for MeshItem {
    fn properties(&self) -> &PropertySet {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut PropertySet {
        &mut self.properties
    }
}

impl DocumentItem for MeshItem {
    fn id(&self) -> ItemId {
        self.id
    }

    fn kind(&self) -> ItemKind {
        Self::KIND
    }

    fn label(&self) -> &str {
        label_of(&self.properties, self.label)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Index of a node in a shape item's assembly tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
struct AssemblyNode {
    name: String,
    shape: Shape,
    parent: Option<NodeId>,
    location: Transform3D,
}

/// A document item holding a B-rep shape organized as an assembly tree
#[derive(Debug)]
pub struct ShapeItem {
    id: ItemId,
    properties: PropertySet,
    nodes: Vec<AssemblyNode>,
    pub label: PropertyKey<PropertyString>,
    pub face_count: PropertyKey<PropertyInt>,
    pub area: PropertyKey<PropertyArea>,
}

impl ShapeItem {
    pub const KIND: ItemKind = ItemKind::new("ShapeItem");

    /// Create an item whose root assembly node is `shape`
    pub fn new(label: impl Into<String>, shape: Shape) -> Self {
        let label = label.into();
        let mut properties = PropertySet::new();
        let label_key = properties.add(PropertyString::new("Label").with_value(label.clone()));
        let face_count =
            properties.add(PropertyInt::new("Face count").with_value(count(shape.faces().len())));
        let area = properties.add(PropertyArea::new("Area").with_quantity(shape.area()));
        Self {
            id: ItemId::next(),
            properties,
            nodes: vec![AssemblyNode {
                name: label,
                shape,
                parent: None,
                location: Transform3D::identity(),
            }],
            label: label_key,
            face_count,
            area,
        }
    }

    /// Root shape of the item
    pub fn shape(&self) -> &Shape {
        &self.nodes[0].shape
    }

    pub fn root_node(&self) -> NodeId {
        NodeId(0)
    }

    /// Register `shape` (a sub-shape of the root) as a child node of `parent`
    pub fn add_node(&mut self, parent: NodeId, name: impl Into<String>, shape: Shape) -> Option<NodeId> {
        self.add_located_node(parent, name, shape, Transform3D::identity())
    }

    /// Register an instance of `shape` placed at `location` relative to `parent`
    pub fn add_located_node(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        shape: Shape,
        location: Transform3D,
    ) -> Option<NodeId> {
        if parent.0 >= self.nodes.len() {
            return None;
        }
        self.nodes.push(AssemblyNode {
            name: name.into(),
            shape,
            parent: Some(parent),
            location,
        });
        Some(NodeId(self.nodes.len() - 1))
    }

    /// Shape of `node` as registered, without its placement
    pub fn node_shape(&self, node: NodeId) -> Option<&Shape> {
        self.nodes.get(node.0).map(|n| &n.shape)
    }

    /// Location of `node` relative to its parent
    pub fn node_location(&self, node: NodeId) -> Option<Transform3D> {
        self.nodes.get(node.0).map(|n| n.location)
    }

    /// Location of `node` relative to the item root, composing every ancestor
    pub fn node_absolute_location(&self, node: NodeId) -> Option<Transform3D> {
        let mut location = self.node_location(node)?;
        let mut current = self.node_parent(node);
        while let Some(parent) = current {
            location = self.nodes[parent.0].location.compose(location);
            current = self.nodes[parent.0].parent;
        }
        Some(location)
    }

    /// Shape of `node` placed in the frame of the item root shape
    pub fn node_absolute_shape(&self, node: NodeId) -> Option<Shape> {
        let location = self.node_absolute_location(node)?;
        self.node_shape(node).map(|shape| shape.moved(location))
    }

    pub fn node_name(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node.0).map(|n| n.name.as_str())
    }

    pub fn node_parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    /// Child nodes of `node`, in insertion order
    pub fn node_children(&self, node: NodeId) -> Vec<NodeId> {
        (0..self.nodes.len())
            .filter(|&i| self.nodes[i].parent == Some(node))
            .map(NodeId)
            .collect()
    }
}

impl PropertyOwner for ShapeItem {
    fn properties(&self) -> &PropertySet {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut PropertySet {
        &mut self.properties
    }
}

impl DocumentItem for ShapeItem {
    fn id(&self) -> ItemId {
        self.id
    }

    fn kind(&self) -> ItemKind {
        Self::KIND
    }

    fn label(&self) -> &str {
        label_of(&self.properties, self.label)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
