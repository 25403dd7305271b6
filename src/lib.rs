//! framegraph: structural-engineering model graph for cross-tool exchange
//!
//! Holds physical elements, analytical elements and geometry as entities of
//! an in-memory graph, deduplicates them on construction, and exports each
//! graph as a JSON node/edge document.
//!
//! # Core Concepts
//!
//! - **Entities**: graph nodes (beams, point connections, materials, points, ...)
//! - **Relationships**: typed, directed edges between entities of one model
//! - **Models**: independent graphs, addressed by index in a `ModelRegistry`
//! - **Identity**: entities are deduplicated by native id or by coordinates
//!
//! # Example
//!
//! ```
//! use framegraph::{EntityHeader, Material, MaterialType, ModelRegistry};
//!
//! let mut registry = ModelRegistry::new();
//! let index = registry.add_model();
//! let model = registry.model_mut(index).unwrap();
//! let a = model.create_material(
//!     EntityHeader::new("mat-1").native_id("STEEL-01"),
//!     Material::new(MaterialType::Steel, "S355"),
//! );
//! let b = model.create_material(
//!     EntityHeader::new("mat-2").native_id("steel-01"),
//!     Material::new(MaterialType::Steel, "S355"),
//! );
//! assert_eq!(a, b);
//! assert_eq!(registry.build_graph_document(index).unwrap().nodes.len(), 1);
//! ```

pub mod config;
pub mod exchange;
mod graph;
pub mod storage;

pub use config::{ConfigError, ExportOptions, Settings};
pub use exchange::{EdgeRecord, GraphDocument, NodeRecord};
pub use graph::*;
pub use storage::{DocumentStore, JsonFileStore, OpenStore, StorageError, StorageResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
