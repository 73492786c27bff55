//! Core data structures and traits for scenecrate
//!
//! This crate provides the observable property framework used by document
//! items and their graphical proxies, physical quantities, bounding volumes,
//! and the small geometry value types those properties hold.

pub mod bounds;
pub mod error;
pub mod mesh;
pub mod point;
pub mod property;
pub mod quantity;
pub mod traits;
pub mod transform;

pub use bounds::*;
pub use error::*;
pub use mesh::*;
pub use point::*;
pub use property::*;
pub use quantity::*;
pub use traits::*;
pub use transform::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, UnitQuaternion, Vector3};
