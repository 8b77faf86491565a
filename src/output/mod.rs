//! Rendering and export of generated reviews

pub mod formatter;
pub mod report;
