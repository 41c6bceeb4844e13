//! Crossway Core - Foundational types for the Crossway viewer
//!
//! This crate provides the types every other Crossway crate depends on:
//! - `Vec3`, `Transform`, `Color`, `Material` - Spatial and visual types
//! - Error types and Result alias

mod error;
mod types;

pub use error::{CrosswayError, Result};
pub use types::{mat4_mul, Color, Material, Transform, Vec3, MAT4_IDENTITY};
