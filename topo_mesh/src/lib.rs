//! Core library of the DWG topo mesh add-on: turns survey markers and their
//! elevation labels into a terrain mesh element.

pub mod config;
pub mod dispatch;
pub mod elevation;
pub mod error;
pub mod geometry;
pub mod io;
pub mod logging;
pub mod matcher;
pub mod mesh;
pub mod orchestrator;
pub mod panel;
pub mod params;
pub mod query;
pub mod store;

pub use error::{BuildError, ConstructionError, ParseError, StoreError};
pub use orchestrator::{create_mesh, MeshReport};
pub use params::ConstructionParameters;
