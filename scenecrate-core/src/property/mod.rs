//! Observable property framework
//!
//! A property is a named, typed value slot owned by exactly one
//! [`PropertyOwner`]. Properties live in the owner's [`PropertySet`] and are
//! addressed through typed [`PropertyKey`]s handed out when they are declared.
//! Every write made through [`PropertyOwnerExt::set_value`] stores the new
//! value and then synchronously calls [`PropertyOwner::on_property_changed`],
//! unless the owner is inside a [`NotificationBlocker`] scope.
//!
//! ```rust
//! use scenecrate_core::property::*;
//!
//! #[derive(Default)]
//! struct Settings {
//!     properties: PropertySet,
//!     changes: usize,
//! }
//!
//! impl PropertyOwner for Settings {
//!     fn properties(&self) -> &PropertySet { &self.properties }
//!     fn properties_mut(&mut self) -> &mut PropertySet { &mut self.properties }
//!     fn on_property_changed(&mut self, _property: PropertyId) { self.changes += 1; }
//! }
//!
//! let mut settings = Settings::default();
//! let visible = settings.properties_mut().add(PropertyBool::new("Visible"));
//! settings.set_value(visible, true).unwrap();
//! assert_eq!(settings.value(visible), Some(&true));
//! assert_eq!(settings.changes, 1);
//! ```

mod builtins;
mod owner;
mod value;

pub use builtins::*;
pub use owner::*;
pub use value::*;

use crate::point::{Color, Point3d};
use crate::transform::Transform3D;
use chrono::{DateTime, Utc};
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

/// Position of a property inside its owner's [`PropertySet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyId(pub(crate) usize);

impl PropertyId {
    /// Declaration index within the owning set
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Typed handle to a property of concrete type `P`
///
/// A key only resolves in the [`PropertySet`] that created it.
pub struct PropertyKey<P> {
    set: u64,
    id: PropertyId,
    marker: PhantomData<fn() -> P>,
}

impl<P> PropertyKey<P> {
    pub(crate) fn new(set: u64, id: PropertyId) -> Self {
        Self {
            set,
            id,
            marker: PhantomData,
        }
    }

    pub(crate) fn set(&self) -> u64 {
        self.set
    }

    /// Untyped identifier of the property
    pub fn id(&self) -> PropertyId {
        self.id
    }
}

impl<P> Clone for PropertyKey<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for PropertyKey<P> {}

impl<P> PartialEq for PropertyKey<P> {
    fn eq(&self, other: &Self) -> bool {
        self.set == other.set && self.id == other.id
    }
}

impl<P> Eq for PropertyKey<P> {}

impl<P> PartialEq<PropertyId> for PropertyKey<P> {
    fn eq(&self, other: &PropertyId) -> bool {
        self.id == *other
    }
}

impl<P> fmt::Debug for PropertyKey<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PropertyKey").field(&self.id.0).finish()
    }
}

/// A named, typed, observable slot
pub trait Property: Any + fmt::Debug {
    /// Human readable label
    fn label(&self) -> &str;

    /// Stable identifier of the concrete property type, for reflection
    fn type_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

pub(crate) mod sealed {
    pub trait Store {
        type Value;
        fn store(&mut self, value: Self::Value);
    }
}

/// A property whose payload can be read and written through its owner
pub trait ValueProperty: Property + sealed::Store {
    fn value(&self) -> &Self::Value;
}

/// Value types that can be held by a plain or constrained property
pub trait PropertyValue: Clone + fmt::Debug + 'static {
    /// Type-specific zero value
    fn init_value() -> Self;
}

/// Value types stored by a [`GenericProperty`]
///
/// Scalars are not plain values: `i32` and `f64` only exist as
/// [`ScalarProperty`] so each property type name maps to one concrete type.
pub trait PlainValue: PropertyValue {
    /// Type name reported by a [`GenericProperty`] holding this value type
    const PROPERTY_TYPE_NAME: &'static str;
}

/// Scalar value types that accept a [`RangeConstraint`]
pub trait ScalarValue: PropertyValue + Copy + PartialOrd {
    /// Type name reported by a [`ScalarProperty`] holding this value type
    const PROPERTY_TYPE_NAME: &'static str;
}

/// Closed set of named enumerators usable by an [`EnumProperty`]
pub trait PropertyEnum: Copy + PartialEq + Default + fmt::Debug + 'static {
    /// All enumerators with their display names, in presentation order
    fn enumeration() -> &'static [(Self, &'static str)];

    /// Display name of this enumerator
    fn name(&self) -> &'static str {
        Self::enumeration()
            .iter()
            .find(|(value, _)| value == self)
            .map(|(_, name)| *name)
            .unwrap_or("")
    }
}

macro_rules! property_values {
    ($kind:ident: $($ty:ty => $name:literal, $init:expr;)*) => {
        $(
            impl PropertyValue for $ty {
                fn init_value() -> Self {
                    $init
                }
            }

            impl $kind for $ty {
                const PROPERTY_TYPE_NAME: &'static str = $name;
            }
        )*
    };
}

property_values! {
    PlainValue:
    bool => "scenecrate::PropertyBool", false;
    String => "scenecrate::PropertyString", String::new();
    Vec<u8> => "scenecrate::PropertyByteArray", Vec::new();
    DateTime<Utc> => "scenecrate::PropertyDateTime", DateTime::<Utc>::default();
    Color => "scenecrate::PropertyColor", Color::BLACK;
    Point3d => "scenecrate::PropertyPoint", Point3d::origin();
    Transform3D => "scenecrate::PropertyTransform", Transform3D::identity();
}

property_values! {
    ScalarValue:
    i32 => "scenecrate::PropertyInt", 0;
    f64 => "scenecrate::PropertyDouble", 0.0;
}
