//! MCP tool modules.
//!
//! Tools are grouped by purpose: toolbox queries and server self-description.

pub mod query;
mod context;
