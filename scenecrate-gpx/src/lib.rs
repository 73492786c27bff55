//! Graphical proxies and scene registry
//!
//! This crate keeps the 3D view of a document in sync with its content:
//! - Document model with mesh and B-rep shape items
//! - Graphical proxies exposing visual settings as observable properties
//! - Scene registry tracking proxies, aggregate bounds and selection
//! - Display defaults loaded from JSON
//! - A headless backend recording renderer requests
//!
//! The renderer itself is abstracted behind [`GraphicsBackend`].

pub mod context;
pub mod document;
pub mod headless;
pub mod proxy;
pub mod registry;
pub mod representation;
pub mod selection;
pub mod settings;
pub mod shape;

pub use context::*;
pub use document::*;
pub use headless::*;
pub use proxy::*;
pub use registry::*;
pub use representation::*;
pub use selection::*;
pub use settings::*;
pub use shape::*;
