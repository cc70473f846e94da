//! Service layer for sheet logic.
//!
//! Geometry, occupancy and the entry store are independent building blocks;
//! [`sheet::Sheet`] wires them together and is what renderers and the CLI use.

pub mod geometry;
pub mod layouts;
pub mod occupancy;
pub mod sheet;
pub mod store;

// Re-export commonly used types
pub use layouts::LayoutCatalog;
pub use occupancy::{CellFilter, OccupancyIndex};
pub use sheet::{Sheet, SheetEvent, SheetSnapshot};
pub use store::{LabelStore, StoreEvent, StoreStats};
