//! Property payload containers

use super::{PropertyValue, ScalarValue};

/// Holds one value of a property type, independent of how it is edited
#[derive(Debug, Clone, PartialEq)]
pub struct TypedValue<T> {
    value: T,
}

impl<T> TypedValue<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn set(&mut self, value: T) {
        self.value = value;
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: PropertyValue> Default for TypedValue<T> {
    fn default() -> Self {
        Self::new(T::init_value())
    }
}

/// Optional min/max/step metadata for a scalar property
///
/// The constraint is descriptive only: nothing clamps values against it.
/// `set_minimum` and `set_maximum` may leave `minimum > maximum` until the
/// other bound is updated; use [`RangeConstraint::set_range`] to move both.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeConstraint<T> {
    minimum: T,
    maximum: T,
    single_step: T,
    enabled: bool,
}

impl<T: ScalarValue> RangeConstraint<T> {
    /// Create an enabled constraint
    pub fn new(minimum: T, maximum: T, single_step: T) -> Self {
        Self {
            minimum,
            maximum,
            single_step,
            enabled: true,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, on: bool) {
        self.enabled = on;
    }

    pub fn minimum(&self) -> T {
        self.minimum
    }

    pub fn set_minimum(&mut self, value: T) {
        self.minimum = value;
    }

    pub fn maximum(&self) -> T {
        self.maximum
    }

    pub fn set_maximum(&mut self, value: T) {
        self.maximum = value;
    }

    pub fn set_range(&mut self, minimum: T, maximum: T) {
        self.set_minimum(minimum);
        self.set_maximum(maximum);
    }

    pub fn single_step(&self) -> T {
        self.single_step
    }

    pub fn set_single_step(&mut self, step: T) {
        self.single_step = step;
    }

    /// `false` only when enabled with `minimum > maximum`
    pub fn is_consistent(&self) -> bool {
        !self.enabled || self.minimum <= self.maximum
    }

    /// Check a value against the range; always `true` when disabled
    pub fn accepts(&self, value: T) -> bool {
        !self.enabled || (self.minimum <= value && value <= self.maximum)
    }
}

impl<T: ScalarValue> Default for RangeConstraint<T> {
    fn default() -> Self {
        Self {
            minimum: T::init_value(),
            maximum: T::init_value(),
            single_step: T::init_value(),
            enabled: false,
        }
    }
}
