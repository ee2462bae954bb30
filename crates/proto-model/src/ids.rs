use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::ModelError;

/// Identity of one component instance.
///
/// Assigned at creation and never reused; moves keep it, duplication and
/// instantiation hand out new ones.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct ComponentId(String);

impl ComponentId {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidComponentId(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ComponentId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of one saved composition in the library.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct CompositionId(String);

impl CompositionId {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidCompositionId(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Generate a fresh random composition id (`saved-<uuid>`).
    pub fn generate() -> Self {
        Self(format!("saved-{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CompositionId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for CompositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of fresh component ids.
///
/// Sources are not required to know which ids are already taken; the
/// editing engine draws again when a candidate collides with the forest.
pub trait IdSource {
    fn next_component_id(&mut self) -> ComponentId;
}

/// Random ids of the form `<prefix>-<uuid>`.
#[derive(Debug, Clone)]
pub struct RandomIds {
    prefix: String,
}

impl Default for RandomIds {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomIds {
    pub fn new() -> Self {
        Self::with_prefix("comp")
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl IdSource for RandomIds {
    fn next_component_id(&mut self) -> ComponentId {
        ComponentId(format!("{}-{}", self.prefix, Uuid::new_v4().simple()))
    }
}

/// Deterministic ids of the form `<prefix><n>`, counting up from a start value.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::starting_at(prefix, 1)
    }

    pub fn starting_at(prefix: impl Into<String>, next: u64) -> Self {
        Self {
            prefix: prefix.into(),
            next,
        }
    }
}

impl IdSource for SequentialIds {
    fn next_component_id(&mut self) -> ComponentId {
        let id = ComponentId(format!("{}{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}

impl<T: IdSource + ?Sized> IdSource for &mut T {
    fn next_component_id(&mut self) -> ComponentId {
        (**self).next_component_id()
    }
}
