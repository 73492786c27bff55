//! Physical quantities tagged with a unit category
//!
//! A [`Quantity`] carries its category in the type (`Quantity<Length>`,
//! `Quantity<Area>`, ...), so a length can never be stored where an angle is
//! expected. Magnitudes are expressed in the base unit of the category
//! (millimeter, square millimeter, cubic millimeter, kilogram, second,
//! radian, millimeter per second).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Physical unit categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitCategory {
    Length,
    Area,
    Volume,
    Mass,
    Time,
    Angle,
    Velocity,
}

impl UnitCategory {
    /// Symbol of the base unit for this category
    pub fn base_symbol(&self) -> &'static str {
        match self {
            UnitCategory::Length => "mm",
            UnitCategory::Area => "mm²",
            UnitCategory::Volume => "mm³",
            UnitCategory::Mass => "kg",
            UnitCategory::Time => "s",
            UnitCategory::Angle => "rad",
            UnitCategory::Velocity => "mm/s",
        }
    }
}

/// Marker trait for unit category tags
pub trait Unit: fmt::Debug + Copy + Send + Sync + 'static {
    const CATEGORY: UnitCategory;
    /// Type name reported by properties holding this kind of quantity
    const PROPERTY_TYPE_NAME: &'static str;
}

macro_rules! unit_tags {
    ($($(#[$meta:meta])* $name:ident => $type_name:literal),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
            pub struct $name;

            impl Unit for $name {
                const CATEGORY: UnitCategory = UnitCategory::$name;
                const PROPERTY_TYPE_NAME: &'static str = $type_name;
            }
        )*
    };
}

unit_tags! {
    /// Length, in millimeters
    Length => "scenecrate::PropertyLength",
    /// Area, in square millimeters
    Area => "scenecrate::PropertyArea",
    /// Volume, in cubic millimeters
    Volume => "scenecrate::PropertyVolume",
    /// Mass, in kilograms
    Mass => "scenecrate::PropertyMass",
    /// Time, in seconds
    Time => "scenecrate::PropertyTime",
    /// Plane angle, in radians
    Angle => "scenecrate::PropertyAngle",
    /// Velocity, in millimeters per second
    Velocity => "scenecrate::PropertyVelocity",
}

/// A magnitude tagged with the unit category `U`
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity<U: Unit> {
    value: f64,
    #[serde(skip)]
    unit: PhantomData<U>,
}

pub type QuantityLength = Quantity<Length>;
pub type QuantityArea = Quantity<Area>;
pub type QuantityVolume = Quantity<Volume>;
pub type QuantityMass = Quantity<Mass>;
pub type QuantityTime = Quantity<Time>;
pub type QuantityAngle = Quantity<Angle>;
pub type QuantityVelocity = Quantity<Velocity>;

impl<U: Unit> Quantity<U> {
    /// Create a quantity from a magnitude in the category's base unit
    pub const fn new(value: f64) -> Self {
        Self {
            value,
            unit: PhantomData,
        }
    }

    /// Magnitude in the category's base unit
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Unit category, fixed by the type
    pub fn category(&self) -> UnitCategory {
        U::CATEGORY
    }
}

impl Quantity<Angle> {
    /// Create an angle from degrees
    pub fn from_degrees(degrees: f64) -> Self {
        Self::new(degrees.to_radians())
    }

    /// Angle magnitude in degrees
    pub fn degrees(&self) -> f64 {
        self.value.to_degrees()
    }
}

// Manual impls: derives would put bounds on `U` itself.
impl<U: Unit> Clone for Quantity<U> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<U: Unit> Copy for Quantity<U> {}

impl<U: Unit> Default for Quantity<U> {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl<U: Unit> PartialEq for Quantity<U> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<U: Unit> PartialOrd for Quantity<U> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl<U: Unit> fmt::Debug for Quantity<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Quantity")
            .field("value", &self.value)
            .field("category", &U::CATEGORY)
            .finish()
    }
}

impl<U: Unit> fmt::Display for Quantity<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, U::CATEGORY.base_symbol())
    }
}

impl<U: Unit> Add for Quantity<U> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.value + rhs.value)
    }
}

impl<U: Unit> Sub for Quantity<U> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.value - rhs.value)
    }
}

impl<U: Unit> Neg for Quantity<U> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.value)
    }
}

impl<U: Unit> Mul<f64> for Quantity<U> {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.value * rhs)
    }
}

impl<U: Unit> Div<f64> for Quantity<U> {
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Self::new(self.value / rhs)
    }
}

impl Mul for Quantity<Length> {
    type Output = Quantity<Area>;

    fn mul(self, rhs: Self) -> Self::Output {
        Quantity::new(self.value * rhs.value)
    }
}

impl Mul<Quantity<Length>> for Quantity<Area> {
    type Output = Quantity<Volume>;

    fn mul(self, rhs: Quantity<Length>) -> Self::Output {
        Quantity::new(self.value * rhs.value)
    }
}

impl Div<Quantity<Time>> for Quantity<Length> {
    type Output = Quantity<Velocity>;

    fn div(self, rhs: Quantity<Time>) -> Self::Output {
        Quantity::new(self.value / rhs.value)
    }
}
