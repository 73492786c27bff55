//! Property storage, owner hook and notification suppression

use super::sealed::Store;
use super::{Property, PropertyId, PropertyKey, ValueProperty};
use crate::quantity::{Quantity, Unit};
use crate::{Error, Result};
use std::ops::{Deref, DerefMut, Index};
use std::sync::atomic::{AtomicU64, Ordering};

use super::QuantityProperty;

static NEXT_SET_ID: AtomicU64 = AtomicU64::new(1);

/// Ordered set of properties belonging to one owner
///
/// Properties are never removed, so a key stays valid for the whole lifetime
/// of the set that produced it. Keys carry the identity of their set and do
/// not resolve anywhere else.
#[derive(Debug)]
pub struct PropertySet {
    id: u64,
    properties: Vec<Box<dyn Property>>,
    blocked: usize,
}

impl Default for PropertySet {
    fn default() -> Self {
        Self {
            id: NEXT_SET_ID.fetch_add(1, Ordering::Relaxed),
            properties: Vec::new(),
            blocked: 0,
        }
    }
}

impl PropertySet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a property and get a typed key to it
    pub fn add<P: Property>(&mut self, property: P) -> PropertyKey<P> {
        let id = PropertyId(self.properties.len());
        self.properties.push(Box::new(property));
        PropertyKey::new(self.id, id)
    }

    /// Typed access; `None` if the key was created by another set
    pub fn get<P: Property>(&self, key: PropertyKey<P>) -> Option<&P> {
        if key.set() != self.id {
            return None;
        }
        self.properties
            .get(key.id().0)
            .and_then(|p| p.as_any().downcast_ref::<P>())
    }

    /// Typed mutable access, for metadata such as range constraints.
    /// Values must be written through [`PropertyOwnerExt::set_value`].
    pub fn get_mut<P: Property>(&mut self, key: PropertyKey<P>) -> Option<&mut P> {
        if key.set() != self.id {
            return None;
        }
        self.properties
            .get_mut(key.id().0)
            .and_then(|p| p.as_any_mut().downcast_mut::<P>())
    }

    /// Untyped access for reflection
    pub fn get_dyn(&self, id: PropertyId) -> Option<&dyn Property> {
        self.properties.get(id.0).map(|p| p.as_ref())
    }

    /// First property with the given label
    pub fn find_by_label(&self, label: &str) -> Option<PropertyId> {
        self.properties
            .iter()
            .position(|p| p.label() == label)
            .map(PropertyId)
    }

    /// Properties in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (PropertyId, &dyn Property)> + '_ {
        self.properties
            .iter()
            .enumerate()
            .map(|(i, p)| (PropertyId(i), p.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// `false` while at least one [`NotificationBlocker`] is alive
    pub fn notifications_enabled(&self) -> bool {
        self.blocked == 0
    }
}

impl<P: Property> Index<PropertyKey<P>> for PropertySet {
    type Output = P;

    fn index(&self, key: PropertyKey<P>) -> &Self::Output {
        match self.get(key) {
            Some(property) => property,
            None => panic!("{:?} does not belong to this property set", key),
        }
    }
}

/// An object holding properties and reacting to their changes
pub trait PropertyOwner {
    fn properties(&self) -> &PropertySet;
    fn properties_mut(&mut self) -> &mut PropertySet;

    /// Called after a property of this owner has been written
    fn on_property_changed(&mut self, _property: PropertyId) {}
}

/// Value access and mutation helpers available on every [`PropertyOwner`]
pub trait PropertyOwnerExt: PropertyOwner {
    /// Current value of a property
    fn value<P: ValueProperty>(&self, key: PropertyKey<P>) -> Option<&P::Value> {
        self.properties().get(key).map(|p| p.value())
    }

    /// Store `value` then notify the owner, even if the value did not change
    ///
    /// Fails with [`Error::UnknownProperty`] when `key` was created by
    /// another owner's set; nothing is stored or notified then.
    fn set_value<P: ValueProperty>(&mut self, key: PropertyKey<P>, value: P::Value) -> Result<()> {
        let property = self
            .properties_mut()
            .get_mut(key)
            .ok_or_else(|| Error::UnknownProperty(format!("{:?}", key)))?;
        property.store(value);
        self.notify_changed(key.id());
        Ok(())
    }

    fn quantity<U: Unit>(&self, key: PropertyKey<QuantityProperty<U>>) -> Option<Quantity<U>> {
        self.properties().get(key).map(|p| p.quantity())
    }

    fn set_quantity<U: Unit>(
        &mut self,
        key: PropertyKey<QuantityProperty<U>>,
        quantity: Quantity<U>,
    ) -> Result<()> {
        self.set_value(key, quantity)
    }

    /// Deliver a change notification unless notifications are blocked
    fn notify_changed(&mut self, property: PropertyId) {
        if self.properties().notifications_enabled() {
            self.on_property_changed(property);
        }
    }

    /// Withhold change notifications until the returned guard is dropped
    fn block_notifications(&mut self) -> NotificationBlocker<'_, Self> {
        NotificationBlocker::new(self)
    }
}

impl<O: PropertyOwner + ?Sized> PropertyOwnerExt for O {}

/// Scope guard suppressing notifications of one owner
///
/// The guard dereferences to the owner so properties can be initialized
/// through it. Notifications resume when it is dropped, on every exit path.
pub struct NotificationBlocker<'a, O: PropertyOwner + ?Sized> {
    owner: &'a mut O,
}

impl<'a, O: PropertyOwner + ?Sized> NotificationBlocker<'a, O> {
    pub fn new(owner: &'a mut O) -> Self {
        owner.properties_mut().blocked += 1;
        Self { owner }
    }
}

impl<O: PropertyOwner + ?Sized> Drop for NotificationBlocker<'_, O> {
    fn drop(&mut self) {
        let set = self.owner.properties_mut();
        set.blocked = set.blocked.saturating_sub(1);
    }
}

impl<O: PropertyOwner + ?Sized> Deref for NotificationBlocker<'_, O> {
    type Target = O;

    fn deref(&self) -> &O {
        &*self.owner
    }
}

impl<O: PropertyOwner + ?Sized> DerefMut for NotificationBlocker<'_, O> {
    fn deref_mut(&mut self) -> &mut O {
        &mut *self.owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{PropertyBool, PropertyDouble, PropertyInt, PropertyLength, PropertyString};
    use crate::quantity::QuantityLength;

    #[derive(Default)]
    struct Recorder {
        properties: PropertySet,
        changed: Vec<PropertyId>,
    }

    impl PropertyOwner for Recorder {
        fn properties(&self) -> &PropertySet {
            &self.properties
        }

        fn properties_mut(&mut self) -> &mut PropertySet {
            &mut self.properties
        }

        fn on_property_changed(&mut self, property: PropertyId) {
            self.changed.push(property);
        }
    }

    #[test]
    fn test_every_write_notifies() {
        let mut owner = Recorder::default();
        let flag = PropertyBool::declare(&mut owner.properties, "Flag");

        owner.set_value(flag, true).unwrap();
        owner.set_value(flag, true).unwrap();

        assert_eq!(owner.changed, vec![flag.id(), flag.id()]);
        assert_eq!(owner.value(flag), Some(&true));
    }

    #[test]
    fn test_notification_sees_stored_value() {
        struct Mirror {
            properties: PropertySet,
            key: Option<PropertyKey<PropertyString>>,
            seen: Option<String>,
        }

        impl PropertyOwner for Mirror {
            fn properties(&self) -> &PropertySet {
                &self.properties
            }

            fn properties_mut(&mut self) -> &mut PropertySet {
                &mut self.properties
            }

            fn on_property_changed(&mut self, _property: PropertyId) {
                self.seen = self.key.and_then(|k| self.value(k).cloned());
            }
        }

        let mut owner = Mirror { properties: PropertySet::new(), key: None, seen: None };
        let key = PropertyString::declare(&mut owner.properties, "Name");
        owner.key = Some(key);

        owner.set_value(key, "part".to_string()).unwrap();
        assert_eq!(owner.seen.as_deref(), Some("part"));
    }

    #[test]
    fn test_blocked_scope_withholds_notifications() {
        let mut owner = Recorder::default();
        let opacity = PropertyDouble::declare(&mut owner.properties, "Opacity");
        let length = PropertyLength::declare(&mut owner.properties, "Length");

        {
            let mut blocked = owner.block_notifications();
            for i in 0..5 {
                blocked.set_value(opacity, i as f64).unwrap();
            }
            blocked.set_quantity(length, QuantityLength::new(12.0)).unwrap();
        }

        assert!(owner.changed.is_empty());
        assert_eq!(owner.value(opacity), Some(&4.0));
        assert_eq!(owner.quantity(length), Some(QuantityLength::new(12.0)));

        owner.set_value(opacity, 0.5).unwrap();
        assert_eq!(owner.changed, vec![opacity.id()]);
    }

    #[test]
    fn test_blocked_scope_released_on_early_return() {
        fn init(owner: &mut Recorder, key: PropertyKey<PropertyBool>) -> Result<()> {
            let mut blocked = owner.block_notifications();
            blocked.set_value(key, true)?;
            Err(Error::InvalidData("abort".into()))
        }

        let mut owner = Recorder::default();
        let key = PropertyBool::declare(&mut owner.properties, "Flag");
        assert!(init(&mut owner, key).is_err());
        assert!(owner.properties().notifications_enabled());

        owner.set_value(key, false).unwrap();
        assert_eq!(owner.changed.len(), 1);
    }

    #[test]
    fn test_nested_blockers() {
        let mut owner = Recorder::default();
        let key = PropertyBool::declare(&mut owner.properties, "Flag");
        {
            let mut outer = owner.block_notifications();
            {
                let mut inner = outer.block_notifications();
                inner.set_value(key, true).unwrap();
            }
            outer.set_value(key, false).unwrap();
        }
        assert!(owner.changed.is_empty());
    }

    #[test]
    fn test_foreign_key_is_rejected() {
        let mut other = PropertySet::new();
        other.add(PropertyString::new("Label"));
        let foreign = other.add(PropertyBool::new("Flag"));

        let mut owner = Recorder::default();
        PropertyBool::declare(&mut owner.properties, "Flag");

        assert!(matches!(owner.set_value(foreign, true), Err(Error::UnknownProperty(_))));
        assert!(owner.changed.is_empty());
    }

    #[test]
    fn test_key_of_same_shape_from_another_set_is_rejected() {
        let mut other = Recorder::default();
        let foreign = PropertyBool::declare(&mut other.properties, "Flag");

        let mut owner = Recorder::default();
        let own = PropertyBool::declare(&mut owner.properties, "Flag");
        assert_eq!(foreign.id(), own.id());

        assert!(matches!(owner.set_value(foreign, true), Err(Error::UnknownProperty(_))));
        assert_eq!(owner.value(own), Some(&false));
        assert_eq!(owner.value(foreign), None);
        assert!(owner.changed.is_empty());
        assert_ne!(foreign, own);
    }

    #[test]
    fn test_out_of_range_write_is_stored_and_notified_once() {
        let mut owner = Recorder::default();
        let transparency = owner
            .properties
            .add(PropertyInt::with_range("Transparency", 0, 100, 10));

        owner.set_value(transparency, 500).unwrap();

        assert_eq!(owner.value(transparency), Some(&500));
        assert_eq!(owner.changed, vec![transparency.id()]);
        assert!(owner.properties[transparency].constraints_enabled());
        assert!(!owner.properties[transparency].constraints().accepts(500));
    }

    #[test]
    fn test_reflection_in_declaration_order() {
        let mut owner = Recorder::default();
        PropertyString::declare(&mut owner.properties, "Label");
        PropertyBool::declare(&mut owner.properties, "Visible");

        let labels: Vec<_> = owner.properties().iter().map(|(_, p)| p.label().to_string()).collect();
        assert_eq!(labels, ["Label", "Visible"]);
        let visible = owner.properties().find_by_label("Visible").unwrap();
        assert_eq!(owner.properties().get_dyn(visible).unwrap().type_name(), "scenecrate::PropertyBool");
    }
}
