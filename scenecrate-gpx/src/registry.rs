//! Scene registry
//!
//! Tracks the graphical proxy of every displayed item of one document, the
//! bounding box of the whole scene and the current selection. Outward
//! notifications are delivered synchronously to the observers registered with
//! [`SceneRegistry::subscribe`].

use crate::context::{SceneContext, SharedContext};
use crate::document::{ApplicationItem, Document, DocumentEvent, DocumentId, DocumentItem, ItemId, ShapeItem};
use crate::proxy::{GpxProxy, ProxyEnv, ProxyFactories};
use crate::representation::{DisplayMode, GraphicsBackend, SelectionMode, SelectionOwner};
use crate::selection::SelectionSet;
use crate::settings::DisplayDefaults;
use crate::shape::Shape;
use scenecrate_core::{BoundingBox, Error, PropertyOwnerExt, Result};
use std::any::Any;
use std::cell::Ref;
use std::fmt;
use tracing::{debug, info, warn};

/// Change notification emitted by a [`SceneRegistry`]
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    /// The aggregate bounding box was recomputed
    BoundsChanged(BoundingBox),
    SelectionChanged,
}

/// One displayed item
#[derive(Debug)]
pub struct SceneEntry {
    item: ItemId,
    proxy: Box<dyn GpxProxy>,
    sub_entity_owners: Vec<SelectionOwner>,
}

impl SceneEntry {
    pub fn item(&self) -> ItemId {
        self.item
    }

    pub fn proxy(&self) -> &dyn GpxProxy {
        self.proxy.as_ref()
    }

    /// Face-level owners captured when the item was added
    pub fn sub_entity_owners(&self) -> &[SelectionOwner] {
        &self.sub_entity_owners
    }

    /// Owner standing for `face`, first match in capture order
    pub fn find_brep_owner(&self, face: &Shape) -> Option<&SelectionOwner> {
        self.sub_entity_owners
            .iter()
            .find(|owner| owner.shape() == Some(face))
    }

    fn whole_owner(&self) -> SelectionOwner {
        SelectionOwner::whole(self.proxy.representation().id())
    }
}

type Observer = Box<dyn FnMut(&SceneEvent)>;

/// Graphical state of one document
pub struct SceneRegistry {
    document: DocumentId,
    context: SharedContext,
    defaults: DisplayDefaults,
    factories: ProxyFactories,
    entries: Vec<SceneEntry>,
    bounds: BoundingBox,
    selection: SelectionSet,
    observers: Vec<Observer>,
}

impl SceneRegistry {
    /// Create an empty registry for `document` drawing through `backend`
    pub fn new(document: &Document, backend: Box<dyn GraphicsBackend>, defaults: DisplayDefaults) -> Self {
        Self {
            document: document.id(),
            context: SceneContext::new(backend).into_shared(),
            defaults,
            factories: ProxyFactories::with_builtins(),
            entries: Vec::new(),
            bounds: BoundingBox::void(),
            selection: SelectionSet::new(),
            observers: Vec::new(),
        }
    }

    /// Replace the proxy dispatch table
    pub fn with_factories(mut self, factories: ProxyFactories) -> Self {
        self.factories = factories;
        self
    }

    /// Register an observer of scene events
    pub fn subscribe(&mut self, observer: impl FnMut(&SceneEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn emit(&mut self, event: SceneEvent) {
        for observer in &mut self.observers {
            observer(&event);
        }
    }

    /// Create, display and index the proxy of `item`, then frame the view
    pub fn add_item(&mut self, item: &dyn DocumentItem) -> Result<()> {
        let id = item.id();
        if self.entry_index(id).is_some() {
            warn!("Item {} is already displayed", id);
            return Err(Error::DuplicateItem(id.get()));
        }

        let env = ProxyEnv {
            defaults: &self.defaults,
            context: &self.context,
        };
        let mut proxy = self.factories.create(item, &env).map_err(|err| {
            warn!("No graphical proxy for item {} ({}): {}", id, item.kind(), err);
            err
        })?;

        self.context.borrow_mut().backend_mut().display(proxy.representation());

        let modes = proxy.selection_modes();
        let mut sub_entity_owners = Vec::new();
        if let Some(provider) = proxy.representation_mut().selection_provider_mut() {
            for &mode in modes {
                provider.activate(mode);
            }
            if modes.contains(&SelectionMode::Face) {
                sub_entity_owners = provider.owners(SelectionMode::Face);
            }
        }

        self.bounds.add(&proxy.representation().bounding_box());
        self.context.borrow_mut().backend_mut().fit_all();
        info!("Displayed item {} '{}' with {} face owners", id, item.label(), sub_entity_owners.len());
        self.entries.push(SceneEntry {
            item: id,
            proxy,
            sub_entity_owners,
        });
        self.emit(SceneEvent::BoundsChanged(self.bounds));
        Ok(())
    }

    /// Remove the proxy of `item` from the view; `false` if it was not displayed
    pub fn erase_item(&mut self, item: ItemId) -> bool {
        let Some(index) = self.entry_index(item) else {
            return false;
        };
        let entry = self.entries.remove(index);
        let representation = entry.proxy.representation();
        {
            let mut context = self.context.borrow_mut();
            context.backend_mut().erase(representation);
            context.forget(representation.id());
        }
        let deselected = self.selection.remove_representation(representation.id());
        drop(entry);

        self.bounds = self
            .entries
            .iter()
            .map(|entry| entry.proxy.representation().bounding_box())
            .collect();
        info!("Erased item {}", item);
        self.emit(SceneEvent::BoundsChanged(self.bounds));
        if deselected > 0 {
            self.emit(SceneEvent::SelectionChanged);
        }
        true
    }

    /// Apply a document notification
    pub fn handle_document_event(&mut self, document: &Document, event: &DocumentEvent) -> Result<()> {
        if document.id() != self.document {
            debug!("Ignoring event of another document: {:?}", event);
            return Ok(());
        }
        match *event {
            DocumentEvent::ItemAdded(id) => match document.item(id) {
                Some(item) => self.add_item(item),
                None => Ok(()),
            },
            DocumentEvent::ItemErased(id) => {
                self.erase_item(id);
                Ok(())
            }
        }
    }

    fn entry_index(&self, item: ItemId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.item == item)
    }

    fn entry(&self, item: ItemId) -> Option<&SceneEntry> {
        self.entries.iter().find(|entry| entry.item == item)
    }

    pub fn find_proxy(&self, item: ItemId) -> Option<&dyn GpxProxy> {
        self.entry(item).map(|entry| entry.proxy.as_ref())
    }

    pub fn find_proxy_mut(&mut self, item: ItemId) -> Option<&mut dyn GpxProxy> {
        self.entries
            .iter_mut()
            .find(|entry| entry.item == item)
            .map(|entry| entry.proxy.as_mut() as &mut dyn GpxProxy)
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[SceneEntry] {
        &self.entries
    }

    /// Union of the bounds of every displayed item
    pub fn bounding_box(&self) -> BoundingBox {
        self.bounds
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn defaults(&self) -> &DisplayDefaults {
        &self.defaults
    }

    /// Toggle the selection state of the owners matching `target`
    pub fn toggle_selection(&mut self, target: &ApplicationItem<'_>) {
        let document = target.document();
        if document.id() != self.document {
            debug!("Selection target belongs to another document");
            return;
        }

        let owners: Vec<SelectionOwner> = match *target {
            ApplicationItem::AssemblyNode { item, node, .. } => {
                let faces = document
                    .item_as::<ShapeItem>(item)
                    .and_then(|shape_item| shape_item.node_absolute_shape(node))
                    .map(|shape| shape.faces())
                    .unwrap_or_default();
                match self.entry(item) {
                    Some(entry) => faces
                        .iter()
                        .filter_map(|face| entry.find_brep_owner(face).cloned())
                        .collect(),
                    None => Vec::new(),
                }
            }
            ApplicationItem::Item { item, .. } => {
                self.entry(item).map(SceneEntry::whole_owner).into_iter().collect()
            }
            ApplicationItem::Document(document) => document
                .root_items()
                .filter_map(|item| self.entry(item.id()))
                .map(SceneEntry::whole_owner)
                .collect(),
        };

        if owners.is_empty() {
            return;
        }
        for owner in owners {
            self.selection.toggle(owner);
        }
        debug!("Selection now holds {} owners", self.selection.len());
        self.emit(SceneEvent::SelectionChanged);
    }

    /// Deselect everything; does not redraw the view
    pub fn clear_selection(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.selection.clear();
        self.emit(SceneEvent::SelectionChanged);
    }

    /// Change the display mode of an item's representation
    pub fn set_display_mode(&mut self, item: ItemId, mode: DisplayMode) -> Result<()> {
        let Some(proxy) = self.find_proxy_mut(item) else {
            debug!("No proxy for item {}, display mode ignored", item);
            return Ok(());
        };
        match proxy.display_mode_property() {
            Some(key) => proxy.set_value(key, mode),
            None => {
                let representation = proxy.representation().id();
                self.context.borrow_mut().set_display_mode(representation, mode);
                Ok(())
            }
        }
    }

    /// Current display mode of an item's representation
    pub fn display_mode(&self, item: ItemId) -> Option<DisplayMode> {
        let representation = self.find_proxy(item)?.representation().id();
        self.context.borrow().display_mode(representation)
    }

    /// Ask the backend to redraw the view
    pub fn update_viewer(&mut self) {
        self.context.borrow_mut().backend_mut().update_viewer();
    }

    /// Typed access to the graphics backend
    pub fn backend<B: Any>(&self) -> Option<Ref<'_, B>> {
        Ref::filter_map(self.context.borrow(), |context| {
            context.backend().as_any().downcast_ref::<B>()
        })
        .ok()
    }
}

impl fmt::Debug for SceneRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneRegistry")
            .field("document", &self.document)
            .field("entries", &self.entries)
            .field("bounds", &self.bounds)
            .field("selection", &self.selection)
            .field("observers", &self.observers.len())
            .finish()
    }
}
