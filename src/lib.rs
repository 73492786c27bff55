//! # scenecrate
//!
//! Observable properties and scene bookkeeping for 3D document viewers.
//!
//! This is the umbrella crate that provides convenient access to all scenecrate
//! functionality. You can use this crate to get everything in one place, or use
//! individual crates for more granular control over dependencies.
//!
//! ## Features
//!
//! - **Core**: Property framework, quantities, bounding boxes, meshes
//! - **Gpx**: Document model, graphical proxies and the scene registry
//!
//! ## Quick Start
//!
//! ```rust
//! use scenecrate::prelude::*;
//!
//! let mut document = Document::new("parts");
//! let event = document.add_item(ShapeItem::new(
//!     "block",
//!     Shape::cuboid(Point3d::new(0.0, 0.0, 0.0), Point3d::new(2.0, 1.0, 1.0)),
//! ));
//!
//! let mut registry = SceneRegistry::new(
//!     &document,
//!     Box::new(HeadlessBackend::new()),
//!     DisplayDefaults::default(),
//! );
//! registry.handle_document_event(&document, &event).unwrap();
//! assert_eq!(registry.bounding_box().max(), Some(Point3d::new(2.0, 1.0, 1.0)));
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: Enables gpx
//! - `gpx`: Graphical proxies and scene registry

// Re-export core functionality
pub use scenecrate_core::*;

#[cfg(feature = "gpx")]
pub use scenecrate_gpx as gpx;

/// Convenient imports for common use cases
pub mod prelude {
    pub use scenecrate_core::*;

    #[cfg(feature = "gpx")]
    pub use scenecrate_gpx::*;
}
