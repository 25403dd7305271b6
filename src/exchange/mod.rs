//! Exchange document for cross-tool transfer
//!
//! A model is exchanged as a single JSON object with a `nodes` array (one
//! object per entity) and an `edges` array (one object per relationship,
//! referencing node ids).

mod document;

pub use document::{EdgeRecord, GraphDocument, NodeRecord};
