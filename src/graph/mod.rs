//! Graph model and wire format.
//!
//! - [`model`] — adjacency-map [`Graph`], [`NodeId`], [`Connection`],
//!   [`GraphError`]
//! - [`wire`] — the `{nodes, edges}` transport record ([`GraphData`]) and
//!   the `Graph ⇄ wire` round-trip

pub mod model;
pub mod wire;

pub use model::{Connection, Graph, GraphError, NodeId};
pub use wire::{GraphData, WireEdge};
