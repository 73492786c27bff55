//! Graphical proxies binding document items to representations
//!
//! A proxy owns the representation of one item and exposes its visual
//! settings as properties. Writing one of those properties updates the
//! representation and asks for a redisplay; the display mode is routed to the
//! registry's [`SceneContext`](crate::context::SceneContext) instead, since it
//! is scoped to the whole view.

use crate::context::{ContextHandle, SharedContext};
use crate::document::{DocumentItem, ItemId, ItemKind, MeshItem, ShapeItem};
use crate::representation::{
    DisplayMode, GraphicsBackend, Material, Representation, SelectionMode, VisualAttribute,
};
use crate::settings::DisplayDefaults;
use scenecrate_core::{
    EnumProperty, Error, PropertyBool, PropertyColor, PropertyId, PropertyInt, PropertyKey,
    PropertyOwner, PropertyOwnerExt, PropertySet, Result, ScalarProperty,
};
use std::any::Any;
use std::fmt;
use tracing::debug;

pub type PropertyDisplayMode = EnumProperty<DisplayMode>;
pub type PropertyMaterial = EnumProperty<Material>;

/// Graphical counterpart of one document item
pub trait GpxProxy: PropertyOwner + fmt::Debug {
    /// Item this proxy presents
    fn item(&self) -> ItemId;

    fn representation(&self) -> &dyn Representation;
    fn representation_mut(&mut self) -> &mut dyn Representation;

    /// Selection granularities activated when the proxy is displayed
    fn selection_modes(&self) -> &'static [SelectionMode] {
        &[]
    }

    /// Property driving the registry-scoped display mode, if any
    fn display_mode_property(&self) -> Option<PropertyKey<PropertyDisplayMode>> {
        None
    }

    fn as_any(&self) -> &dyn Any;
}

/// Context handed to proxy factories
pub struct ProxyEnv<'a> {
    pub defaults: &'a DisplayDefaults,
    pub context: &'a SharedContext,
}

impl ProxyEnv<'_> {
    fn create_representation(
        &self,
        create: impl FnOnce(&mut dyn GraphicsBackend) -> Box<dyn Representation>,
    ) -> Result<Box<dyn Representation>> {
        let mut context = self
            .context
            .try_borrow_mut()
            .map_err(|_| Error::InvalidData("scene context is busy".to_string()))?;
        Ok(create(context.backend_mut()))
    }

    fn set_display_mode(&self, representation: &dyn Representation, mode: DisplayMode) -> Result<()> {
        let mut context = self
            .context
            .try_borrow_mut()
            .map_err(|_| Error::InvalidData("scene context is busy".to_string()))?;
        context.set_display_mode(representation.id(), mode);
        Ok(())
    }
}

/// State common to the built-in proxies
#[derive(Debug)]
struct ProxyBase {
    item: ItemId,
    representation: Box<dyn Representation>,
    context: ContextHandle,
    properties: PropertySet,
}

impl ProxyBase {
    fn new(item: ItemId, representation: Box<dyn Representation>, env: &ProxyEnv<'_>) -> Self {
        Self {
            item,
            representation,
            context: ContextHandle::new(env.context),
            properties: PropertySet::new(),
        }
    }

    fn refresh(&mut self, attribute: VisualAttribute) {
        self.representation.apply(attribute);
        self.representation.request_redisplay();
    }

    fn route_display_mode(&self, mode: DisplayMode) {
        let id = self.representation.id();
        if self.context.with(|ctx| ctx.set_display_mode(id, mode)).is_none() {
            debug!("Display mode of {} not routed, no scene context", self.item);
        }
    }
}

/// Proxy of a [`MeshItem`]
#[derive(Debug)]
pub struct MeshProxy {
    base: ProxyBase,
    pub material: PropertyKey<PropertyMaterial>,
    pub color: PropertyKey<PropertyColor>,
    pub display_mode: PropertyKey<PropertyDisplayMode>,
    pub show_edges: PropertyKey<PropertyBool>,
    pub show_nodes: PropertyKey<PropertyBool>,
}

impl MeshProxy {
    pub fn new(item: &MeshItem, env: &ProxyEnv<'_>) -> Result<Self> {
        let defaults = &env.defaults.mesh;
        let mut representation =
            env.create_representation(|backend| backend.create_mesh_representation(item.triangulation()))?;
        representation.apply(VisualAttribute::Color(defaults.color));
        representation.apply(VisualAttribute::Material(defaults.material));
        representation.apply(VisualAttribute::ShowEdges(defaults.show_edges));
        representation.apply(VisualAttribute::ShowNodes(defaults.show_nodes));
        env.set_display_mode(representation.as_ref(), defaults.display_mode)?;

        let mut base = ProxyBase::new(item.id(), representation, env);
        let material = PropertyMaterial::declare(&mut base.properties, "Material");
        let color = PropertyColor::declare(&mut base.properties, "Color");
        let display_mode = PropertyDisplayMode::declare(&mut base.properties, "Display mode");
        let show_edges = PropertyBool::declare(&mut base.properties, "Show edges");
        let show_nodes = PropertyBool::declare(&mut base.properties, "Show nodes");

        let mut proxy = Self {
            base,
            material,
            color,
            display_mode,
            show_edges,
            show_nodes,
        };
        {
            let mut blocked = proxy.block_notifications();
            blocked.set_value(material, defaults.material)?;
            blocked.set_value(color, defaults.color)?;
            blocked.set_value(display_mode, defaults.display_mode)?;
            blocked.set_value(show_edges, defaults.show_edges)?;
            blocked.set_value(show_nodes, defaults.show_nodes)?;
        }
        Ok(proxy)
    }
}

impl PropertyOwner for MeshProxy {
    fn properties(&self) -> &PropertySet {
        &self.base.properties
    }

    fn properties_mut(&mut self) -> &mut PropertySet {
        &mut self.base.properties
    }

    fn on_property_changed(&mut self, property: PropertyId) {
        let attribute = if self.material == property {
            self.value(self.material).copied().map(VisualAttribute::Material)
        } else if self.color == property {
            self.value(self.color).copied().map(VisualAttribute::Color)
        } else if self.show_edges == property {
            self.value(self.show_edges).copied().map(VisualAttribute::ShowEdges)
        } else if self.show_nodes == property {
            self.value(self.show_nodes).copied().map(VisualAttribute::ShowNodes)
        } else {
            if self.display_mode == property {
                if let Some(&mode) = self.value(self.display_mode) {
                    self.base.route_display_mode(mode);
                }
            }
            None
        };
        if let Some(attribute) = attribute {
            self.base.refresh(attribute);
        }
    }
}

impl GpxProxy for MeshProxy {
    fn item(&self) -> ItemId {
        self.base.item
    }

    fn representation(&self) -> &dyn Representation {
        self.base.representation.as_ref()
    }

    fn representation_mut(&mut self) -> &mut dyn Representation {
        self.base.representation.as_mut()
    }

    fn display_mode_property(&self) -> Option<PropertyKey<PropertyDisplayMode>> {
        Some(self.display_mode)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Proxy of a B-rep [`ShapeItem`]
#[derive(Debug)]
pub struct ShapeProxy {
    base: ProxyBase,
    pub material: PropertyKey<PropertyMaterial>,
    pub color: PropertyKey<PropertyColor>,
    /// Percentage in `0..=100`, step 10
    pub transparency: PropertyKey<PropertyInt>,
    pub display_mode: PropertyKey<PropertyDisplayMode>,
}

impl ShapeProxy {
    const SELECTION_MODES: &'static [SelectionMode] =
        &[SelectionMode::Vertex, SelectionMode::Edge, SelectionMode::Face];

    pub fn new(item: &ShapeItem, env: &ProxyEnv<'_>) -> Result<Self> {
        let defaults = &env.defaults.shape;
        let mut representation =
            env.create_representation(|backend| backend.create_shape_representation(item.shape()))?;
        representation.apply(VisualAttribute::Color(defaults.color));
        representation.apply(VisualAttribute::Material(defaults.material));
        representation.apply(VisualAttribute::Transparency(transparency_ratio(defaults.transparency)));
        env.set_display_mode(representation.as_ref(), defaults.display_mode)?;

        let mut base = ProxyBase::new(item.id(), representation, env);
        let material = PropertyMaterial::declare(&mut base.properties, "Material");
        let color = PropertyColor::declare(&mut base.properties, "Color");
        let transparency = base
            .properties
            .add(ScalarProperty::with_range("Transparency", 0, 100, 10));
        let display_mode = PropertyDisplayMode::declare(&mut base.properties, "Display mode");

        let mut proxy = Self {
            base,
            material,
            color,
            transparency,
            display_mode,
        };
        {
            let mut blocked = proxy.block_notifications();
            blocked.set_value(material, defaults.material)?;
            blocked.set_value(color, defaults.color)?;
            blocked.set_value(transparency, defaults.transparency)?;
            blocked.set_value(display_mode, defaults.display_mode)?;
        }
        Ok(proxy)
    }
}

fn transparency_ratio(percent: i32) -> f64 {
    f64::from(percent) / 100.0
}

impl PropertyOwner for ShapeProxy {
    fn properties(&self) -> &PropertySet {
        &self.base.properties
    }

    fn properties_mut(&mut self) -> &mut PropertySet {
        &mut self.base.properties
    }

    fn on_property_changed(&mut self, property: PropertyId) {
        let attribute = if self.material == property {
            self.value(self.material).copied().map(VisualAttribute::Material)
        } else if self.color == property {
            self.value(self.color).copied().map(VisualAttribute::Color)
        } else if self.transparency == property {
            self.value(self.transparency)
                .map(|&percent| VisualAttribute::Transparency(transparency_ratio(percent)))
        } else {
            if self.display_mode == property {
                if let Some(&mode) = self.value(self.display_mode) {
                    self.base.route_display_mode(mode);
                }
            }
            None
        };
        if let Some(attribute) = attribute {
            self.base.refresh(attribute);
        }
    }
}

impl GpxProxy for ShapeProxy {
    fn item(&self) -> ItemId {
        self.base.item
    }

    fn representation(&self) -> &dyn Representation {
        self.base.representation.as_ref()
    }

    fn representation_mut(&mut self) -> &mut dyn Representation {
        self.base.representation.as_mut()
    }

    fn selection_modes(&self) -> &'static [SelectionMode] {
        Self::SELECTION_MODES
    }

    fn display_mode_property(&self) -> Option<PropertyKey<PropertyDisplayMode>> {
        Some(self.display_mode)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Builds the proxy of an item of a given kind
pub type ProxyFactory = fn(&dyn DocumentItem, &ProxyEnv<'_>) -> Result<Box<dyn GpxProxy>>;

/// Ordered dispatch table from item kind to proxy factory
#[derive(Clone, Default)]
pub struct ProxyFactories {
    factories: Vec<(ItemKind, ProxyFactory)>,
}

impl ProxyFactories {
    /// Empty table, every kind is unsupported
    pub fn new() -> Self {
        Self::default()
    }

    /// Table handling [`ShapeItem`] and [`MeshItem`]
    pub fn with_builtins() -> Self {
        let mut factories = Self::new();
        factories.register(ShapeItem::KIND, create_shape_proxy);
        factories.register(MeshItem::KIND, create_mesh_proxy);
        factories
    }

    /// Append a factory; earlier registrations for the same kind win
    pub fn register(&mut self, kind: ItemKind, factory: ProxyFactory) {
        self.factories.push((kind, factory));
    }

    pub fn supports(&self, kind: ItemKind) -> bool {
        self.factories.iter().any(|(k, _)| *k == kind)
    }

    pub fn create(&self, item: &dyn DocumentItem, env: &ProxyEnv<'_>) -> Result<Box<dyn GpxProxy>> {
        let kind = item.kind();
        match self.factories.iter().find(|(k, _)| *k == kind) {
            Some((_, factory)) => factory(item, env),
            None => Err(Error::UnsupportedItemKind(kind.name().to_string())),
        }
    }
}

impl fmt::Debug for ProxyFactories {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.factories.iter().map(|(kind, _)| kind))
            .finish()
    }
}

fn downcast<'a, T: DocumentItem>(item: &'a dyn DocumentItem) -> Result<&'a T> {
    item.as_any().downcast_ref::<T>().ok_or_else(|| {
        Error::InvalidData(format!("item {} is not a {}", item.id(), item.kind()))
    })
}

fn create_mesh_proxy(item: &dyn DocumentItem, env: &ProxyEnv<'_>) -> Result<Box<dyn GpxProxy>> {
    Ok(Box::new(MeshProxy::new(downcast::<MeshItem>(item)?, env)?))
}

fn create_shape_proxy(item: &dyn DocumentItem, env: &ProxyEnv<'_>) -> Result<Box<dyn GpxProxy>> {
    Ok(Box::new(ShapeProxy::new(downcast::<ShapeItem>(item)?, env)?))
}
