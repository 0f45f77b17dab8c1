#[macro_use]
extern crate tracing;

pub mod camera;
pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod scene;

pub use error::{LinesceneError, Result};
