//! Core entry point for the report_fonts crate.
//!
//! Resolve the report font once with [`fonts::resolve`], then pass the result to
//! [`registry::install`] or [`specimen::render`].

pub mod config;
pub mod fonts;
pub mod registry;
pub mod specimen;

pub use config::FontConfig;
pub use fonts::{resolve, BuiltinFamily, FontSetting, ResolvedFonts};
