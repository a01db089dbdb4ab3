//! Core indexing and query services for nirs-mcp.
//!
//! This crate walks a MATLAB-style toolbox tree, recovers class and function
//! metadata with a pattern-based extractor, and resolves the list/get/search
//! operations exposed by the MCP layer into markdown documents. Every query
//! re-reads the tree; nothing is cached between calls.

pub mod catalog;
pub mod context;
pub mod control;
pub mod index;
pub mod models;
pub mod parsers;
pub mod render;
pub mod source;

pub use context::{SourceLayout, ToolboxContext};
pub use control::{ControlError, NirsControlPlane};
pub use models::{Entity, EntityKind, Method, Property};
