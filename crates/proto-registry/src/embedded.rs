//! Embedded component catalogue.
//!
//! The built-in catalogue is compiled into the binary with `include_str!()`,
//! so the registry is available without any file I/O.

/// Built-in catalogue JSON: categories, layout overlays and component types.
pub const BUILTIN_CATALOGUE: &str = include_str!("../data/catalogue.json");
