//! Property resolution and conditional disclosure.
//!
//! Given an instance, its registered type, and the type of its parent, a
//! [`PropertyScope`] answers:
//!
//! - the effective value of each property (explicit, else default)
//! - which properties and slots are visible under their `showWhen` rules
//! - the ordered property list an editor shows (booleans last)
//! - the resolved property bag handed to a renderer
//! - whether a write or an action note is acceptable
//! - which icon names in effect the host cannot resolve
//!
//! Nothing is cached: a scope reads the instance as it is when asked, so
//! visibility always reflects the latest property values.

pub mod error;
pub mod icons;
pub mod panel;
pub mod scope;
pub mod slots;
pub mod value;

pub use error::{PropertyError, Result};
pub use icons::{IconReference, IconResolver, IconSet};
pub use panel::{ActionEntry, PanelEntry, PropertyPanel};
pub use scope::{PropertyScope, empty_value};
pub use slots::{AvailableSlot, SlotRule};
pub use value::{parse_value, validate_value};
