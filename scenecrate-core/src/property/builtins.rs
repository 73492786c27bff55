//! Concrete property types
//!
//! Four payload variants are provided: plain values ([`GenericProperty`]),
//! range-constrained scalars ([`ScalarProperty`]), unit quantities
//! ([`QuantityProperty`]) and enumerations ([`EnumProperty`]).

use super::sealed::Store;
use super::{
    PlainValue, Property, PropertyEnum, PropertyKey, PropertySet, RangeConstraint,
    ScalarValue, TypedValue, ValueProperty,
};
use crate::point::{Color, Point3d};
use crate::quantity::{
    Angle, Area, Length, Mass, Quantity, Time, Unit, Velocity, Volume,
};
use crate::transform::Transform3D;
use chrono::{DateTime, Utc};
use std::any::Any;

macro_rules! impl_property {
    ($ty:ident<$param:ident: $bound:path>, $type_name:expr) => {
        impl<$param: $bound> Property for $ty<$param> {
            fn label(&self) -> &str {
                &self.label
            }

            fn type_name(&self) -> &'static str {
                $type_name
            }

            fn as_any(&self) -> &dyn Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn Any {
                self
            }
        }
    };
}

/// A property holding a plain, non-scalar value
#[derive(Debug, Clone)]
pub struct GenericProperty<T> {
    label: String,
    value: TypedValue<T>,
}

impl<T: PlainValue> GenericProperty<T> {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: TypedValue::default(),
        }
    }

    /// Set the initial value before the property is registered
    pub fn with_value(mut self, value: T) -> Self {
        self.value.set(value);
        self
    }

    /// Create the property and register it in `owner`
    pub fn declare(owner: &mut PropertySet, label: impl Into<String>) -> PropertyKey<Self> {
        owner.add(Self::new(label))
    }
}

impl_property!(GenericProperty<T: PlainValue>, T::PROPERTY_TYPE_NAME);

impl<T: PlainValue> Store for GenericProperty<T> {
    type Value = T;

    fn store(&mut self, value: T) {
        self.value.set(value);
    }
}

impl<T: PlainValue> ValueProperty for GenericProperty<T> {
    fn value(&self) -> &T {
        self.value.get()
    }
}

/// A scalar property carrying optional range metadata
#[derive(Debug, Clone)]
pub struct ScalarProperty<T> {
    label: String,
    value: TypedValue<T>,
    constraints: RangeConstraint<T>,
}

impl<T: ScalarValue> ScalarProperty<T> {
    /// Unconstrained scalar property
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: TypedValue::default(),
            constraints: RangeConstraint::default(),
        }
    }

    /// Scalar property with enabled range constraints
    pub fn with_range(label: impl Into<String>, minimum: T, maximum: T, single_step: T) -> Self {
        Self {
            label: label.into(),
            value: TypedValue::default(),
            constraints: RangeConstraint::new(minimum, maximum, single_step),
        }
    }

    /// Set the initial value before the property is registered
    pub fn with_value(mut self, value: T) -> Self {
        self.value.set(value);
        self
    }

    /// Create the property and register it in `owner`
    pub fn declare(owner: &mut PropertySet, label: impl Into<String>) -> PropertyKey<Self> {
        owner.add(Self::new(label))
    }

    pub fn constraints(&self) -> &RangeConstraint<T> {
        &self.constraints
    }

    pub fn constraints_enabled(&self) -> bool {
        self.constraints.enabled()
    }

    /// Toggle the constraints; the stored value is left untouched
    pub fn set_constraints_enabled(&mut self, on: bool) {
        self.constraints.set_enabled(on);
    }

    pub fn minimum(&self) -> T {
        self.constraints.minimum()
    }

    pub fn set_minimum(&mut self, value: T) {
        self.constraints.set_minimum(value);
    }

    pub fn maximum(&self) -> T {
        self.constraints.maximum()
    }

    pub fn set_maximum(&mut self, value: T) {
        self.constraints.set_maximum(value);
    }

    pub fn set_range(&mut self, minimum: T, maximum: T) {
        self.constraints.set_range(minimum, maximum);
    }

    pub fn single_step(&self) -> T {
        self.constraints.single_step()
    }

    pub fn set_single_step(&mut self, step: T) {
        self.constraints.set_single_step(step);
    }
}

impl_property!(ScalarProperty<T: ScalarValue>, T::PROPERTY_TYPE_NAME);

impl<T: ScalarValue> Store for ScalarProperty<T> {
    type Value = T;

    fn store(&mut self, value: T) {
        self.value.set(value);
    }
}

impl<T: ScalarValue> ValueProperty for ScalarProperty<T> {
    fn value(&self) -> &T {
        self.value.get()
    }
}

/// A property holding a physical quantity of category `U`
#[derive(Debug, Clone)]
pub struct QuantityProperty<U: Unit> {
    label: String,
    quantity: Quantity<U>,
}

impl<U: Unit> QuantityProperty<U> {
    /// Zero-magnitude quantity property
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            quantity: Quantity::default(),
        }
    }

    /// Set the initial quantity before the property is registered
    pub fn with_quantity(mut self, quantity: Quantity<U>) -> Self {
        self.quantity = quantity;
        self
    }

    /// Create the property and register it in `owner`
    pub fn declare(owner: &mut PropertySet, label: impl Into<String>) -> PropertyKey<Self> {
        owner.add(Self::new(label))
    }

    pub fn quantity(&self) -> Quantity<U> {
        self.quantity
    }
}

impl_property!(QuantityProperty<U: Unit>, U::PROPERTY_TYPE_NAME);

impl<U: Unit> Store for QuantityProperty<U> {
    type Value = Quantity<U>;

    fn store(&mut self, value: Quantity<U>) {
        self.quantity = value;
    }
}

impl<U: Unit> ValueProperty for QuantityProperty<U> {
    fn value(&self) -> &Quantity<U> {
        &self.quantity
    }
}

/// A property selecting one enumerator of `E`
#[derive(Debug, Clone)]
pub struct EnumProperty<E> {
    label: String,
    value: E,
}

impl<E: PropertyEnum> EnumProperty<E> {
    /// Initialized to `E::default()`
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: E::default(),
        }
    }

    /// Set the initial value before the property is registered
    pub fn with_value(mut self, value: E) -> Self {
        self.value = value;
        self
    }

    /// Create the property and register it in `owner`
    pub fn declare(owner: &mut PropertySet, label: impl Into<String>) -> PropertyKey<Self> {
        owner.add(Self::new(label))
    }

    /// Enumerators accepted by this property, with display names
    pub fn enumeration(&self) -> &'static [(E, &'static str)] {
        E::enumeration()
    }

    /// Display name of the current value
    pub fn value_name(&self) -> &'static str {
        self.value.name()
    }
}

impl_property!(EnumProperty<E: PropertyEnum>, "scenecrate::PropertyEnumeration");

impl<E: PropertyEnum> Store for EnumProperty<E> {
    type Value = E;

    fn store(&mut self, value: E) {
        self.value = value;
    }
}

impl<E: PropertyEnum> ValueProperty for EnumProperty<E> {
    fn value(&self) -> &E {
        &self.value
    }
}

pub type PropertyBool = GenericProperty<bool>;
pub type PropertyInt = ScalarProperty<i32>;
pub type PropertyDouble = ScalarProperty<f64>;
pub type PropertyString = GenericProperty<String>;
pub type PropertyByteArray = GenericProperty<Vec<u8>>;
pub type PropertyDateTime = GenericProperty<DateTime<Utc>>;
pub type PropertyColor = GenericProperty<Color>;
pub type PropertyPoint = GenericProperty<Point3d>;
pub type PropertyTransform = GenericProperty<Transform3D>;

pub type PropertyLength = QuantityProperty<Length>;
pub type PropertyArea = QuantityProperty<Area>;
pub type PropertyVolume = QuantityProperty<Volume>;
pub type PropertyMass = QuantityProperty<Mass>;
pub type PropertyTime = QuantityProperty<Time>;
pub type PropertyAngle = QuantityProperty<Angle>;
pub type PropertyVelocity = QuantityProperty<Velocity>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    enum Shading {
        #[default]
        Flat,
        Smooth,
    }

    impl PropertyEnum for Shading {
        fn enumeration() -> &'static [(Self, &'static str)] {
            &[(Shading::Flat, "Flat"), (Shading::Smooth, "Smooth")]
        }
    }

    #[test]
    fn test_type_names_are_unique() {
        let properties: Vec<Box<dyn Property>> = vec![
            Box::new(PropertyBool::new("")),
            Box::new(PropertyInt::new("")),
            Box::new(PropertyDouble::new("")),
            Box::new(PropertyString::new("")),
            Box::new(PropertyByteArray::new("")),
            Box::new(PropertyDateTime::new("")),
            Box::new(PropertyColor::new("")),
            Box::new(PropertyPoint::new("")),
            Box::new(PropertyTransform::new("")),
            Box::new(PropertyLength::new("")),
            Box::new(PropertyArea::new("")),
            Box::new(PropertyVolume::new("")),
            Box::new(PropertyMass::new("")),
            Box::new(PropertyTime::new("")),
            Box::new(PropertyAngle::new("")),
            Box::new(PropertyVelocity::new("")),
            Box::new(EnumProperty::<Shading>::new("")),
        ];
        let names: HashSet<_> = properties.iter().map(|p| p.type_name()).collect();
        assert_eq!(names.len(), properties.len());
        assert_eq!(PropertyDouble::new("").type_name(), "scenecrate::PropertyDouble");
        assert_eq!(PropertyArea::new("").type_name(), "scenecrate::PropertyArea");
    }

    #[test]
    fn test_type_name_selects_downcast_target() {
        let properties: Vec<Box<dyn Property>> = vec![
            Box::new(PropertyInt::with_range("Transparency", 0, 100, 10)),
            Box::new(PropertyDouble::new("Opacity")),
            Box::new(PropertyBool::new("Visible")),
        ];
        for property in &properties {
            let any = property.as_any();
            match property.type_name() {
                "scenecrate::PropertyInt" => assert!(any.is::<ScalarProperty<i32>>()),
                "scenecrate::PropertyDouble" => assert!(any.is::<ScalarProperty<f64>>()),
                "scenecrate::PropertyBool" => assert!(any.is::<GenericProperty<bool>>()),
                other => panic!("unexpected type name {other}"),
            }
        }
        assert_ne!(
            <i32 as ScalarValue>::PROPERTY_TYPE_NAME,
            <f64 as ScalarValue>::PROPERTY_TYPE_NAME
        );
    }

    #[test]
    fn test_initial_values() {
        assert_eq!(*PropertyInt::new("Count").value(), 0);
        assert_eq!(*PropertyPoint::new("Origin").value(), Point3d::origin());
        assert_eq!(PropertyVolume::new("Volume").quantity().value(), 0.0);

        let shading = EnumProperty::<Shading>::new("Shading");
        assert_eq!(*shading.value(), Shading::Flat);
        assert_eq!(shading.value_name(), "Flat");
        assert_eq!(shading.enumeration().len(), 2);
    }

    #[test]
    fn test_disabling_constraints_keeps_value() {
        let mut prop = PropertyDouble::with_range("Opacity", 0.0, 1.0, 0.1);
        prop.store(5.0);
        assert!(prop.constraints_enabled());
        assert_eq!(*prop.value(), 5.0);

        prop.set_constraints_enabled(false);
        assert_eq!(*prop.value(), 5.0);
        assert!(!prop.constraints_enabled());
    }

    #[test]
    fn test_scalar_constraint_accessors() {
        let mut prop = PropertyInt::new("Steps");
        assert!(!prop.constraints_enabled());

        prop.set_range(1, 8);
        prop.set_single_step(2);
        prop.set_constraints_enabled(true);
        assert_eq!((prop.minimum(), prop.maximum(), prop.single_step()), (1, 8, 2));
        assert!(prop.constraints().accepts(8));
        assert!(!prop.constraints().accepts(9));
    }
}
