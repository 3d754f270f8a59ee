//! figpolish - publication styling for scientific figures
//!
//! Batch-improves SVG (and, through inkscape, PDF) figures: cleans up
//! matplotlib artifacts, remaps data colors onto a journal palette and
//! applies template fonts and backgrounds.
//! This library exposes modules for integration testing.

pub mod analysis;
pub mod assets;
pub mod cleanup;
pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
pub mod svg;
