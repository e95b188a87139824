//! Shared foundation for the clipcast pipeline: error taxonomy,
//! configuration, per-run temp workspace, duration/geometry math, value
//! types, and the capability traits each stage implements.

pub mod config;
pub mod error;
pub mod timing;
pub mod traits;
pub mod types;
pub mod workspace;
