//! Core abstractions for model export
//!
//! This module holds the UML model, the repository query layer, and the
//! shared transformation components every output format builds on.

mod config;
mod context;
mod diagnostics;
mod error;
mod exporter;
mod filter;
mod graph;
mod loader;
pub mod logging;
mod model;
mod query;
mod repository;
mod type_mapper;

pub use config::*;
pub use context::*;
pub use diagnostics::*;
pub use error::*;
pub use exporter::*;
pub use filter::*;
pub use graph::*;
pub use loader::*;
pub use logging::*;
pub use model::*;
pub use query::*;
pub use repository::*;
pub use type_mapper::*;
