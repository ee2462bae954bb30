//! Conditional-visibility predicates (`showWhen`).
//!
//! A [`ShowWhen`] is a conjunction of [`Condition`]s over sibling property
//! values. In catalogue JSON it is written as a map from property name to
//! either a single expected value or a list of accepted values:
//!
//! ```json
//! { "type": ["action", "billboard"], "disabled": true }
//! ```
//!
//! An empty predicate always holds.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::PropValue;

/// One clause of a `showWhen` predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// The property's effective value equals `value`.
    Equals { property: String, value: PropValue },
    /// The property's effective value is one of `values`.
    OneOf {
        property: String,
        values: Vec<PropValue>,
    },
}

impl Condition {
    pub fn property(&self) -> &str {
        match self {
            Self::Equals { property, .. } | Self::OneOf { property, .. } => property,
        }
    }

    /// Whether the clause holds for the given effective value.
    ///
    /// An unset property with no default never satisfies a clause.
    pub fn holds(&self, actual: Option<&PropValue>) -> bool {
        let Some(actual) = actual else {
            return false;
        };
        match self {
            Self::Equals { value, .. } => actual == value,
            Self::OneOf { values, .. } => values.contains(actual),
        }
    }
}

/// Conjunction of conditions gating a property or slot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Expected>", into = "BTreeMap<String, Expected>")]
pub struct ShowWhen {
    conditions: Vec<Condition>,
}

impl ShowWhen {
    pub fn new(conditions: Vec<Condition>) -> Self {
        Self { conditions }
    }

    /// Predicate with a single `property == value` clause.
    pub fn equals(property: impl Into<String>, value: impl Into<PropValue>) -> Self {
        Self::default().and_equals(property, value)
    }

    /// Predicate with a single `property in values` clause.
    pub fn one_of<I, V>(property: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<PropValue>,
    {
        Self::default().and_one_of(property, values)
    }

    #[must_use]
    pub fn and_equals(mut self, property: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.conditions.push(Condition::Equals {
            property: property.into(),
            value: value.into(),
        });
        self
    }

    #[must_use]
    pub fn and_one_of<I, V>(mut self, property: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<PropValue>,
    {
        self.conditions.push(Condition::OneOf {
            property: property.into(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Names of the properties this predicate reads.
    pub fn referenced_properties(&self) -> impl Iterator<Item = &str> {
        self.conditions.iter().map(Condition::property)
    }

    /// Evaluate against effective values supplied by `lookup`.
    ///
    /// Pure: the result depends only on what `lookup` returns.
    pub fn evaluate<'v, F>(&self, mut lookup: F) -> bool
    where
        F: FnMut(&str) -> Option<&'v PropValue>,
    {
        self.conditions
            .iter()
            .all(|condition| condition.holds(lookup(condition.property())))
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equals { property, value } => write!(f, "{property} = {value}"),
            Self::OneOf { property, values } => {
                write!(f, "{property} in [")?;
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl fmt::Display for ShowWhen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, condition) in self.conditions.iter().enumerate() {
            if index > 0 {
                f.write_str(" and ")?;
            }
            write!(f, "{condition}")?;
        }
        Ok(())
    }
}

/// Wire form of one `showWhen` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum Expected {
    Many(Vec<PropValue>),
    One(PropValue),
}

impl From<BTreeMap<String, Expected>> for ShowWhen {
    fn from(map: BTreeMap<String, Expected>) -> Self {
        let conditions = map
            .into_iter()
            .map(|(property, expected)| match expected {
                Expected::One(value) => Condition::Equals { property, value },
                Expected::Many(values) => Condition::OneOf { property, values },
            })
            .collect();
        Self { conditions }
    }
}

impl From<ShowWhen> for BTreeMap<String, Expected> {
    fn from(show_when: ShowWhen) -> Self {
        show_when
            .conditions
            .into_iter()
            .map(|condition| match condition {
                Condition::Equals { property, value } => (property, Expected::One(value)),
                Condition::OneOf { property, values } => (property, Expected::Many(values)),
            })
            .collect()
    }
}
