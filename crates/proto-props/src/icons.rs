//! Icon references and the host's asset lookup.
//!
//! Icon properties hold plain names. Only the host knows which names map
//! to real assets, so lookups go through [`IconResolver`].

use std::collections::BTreeSet;

use crate::scope::PropertyScope;

/// Host-side lookup from an icon name to a renderable asset.
pub trait IconResolver {
    type Asset;

    /// `None` when the name is unknown.
    fn resolve(&self, name: &str) -> Option<Self::Asset>;
}

/// A fixed set of known icon names, resolving to the name itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IconSet {
    names: BTreeSet<String>,
}

impl IconSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl IconResolver for IconSet {
    type Asset = String;

    fn resolve(&self, name: &str) -> Option<String> {
        self.names.get(name).cloned()
    }
}

/// An icon property currently in effect on an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconReference<'a> {
    pub prop_name: &'a str,
    pub icon: &'a str,
}

impl<'a> PropertyScope<'a> {
    /// Visible icon properties with a non-blank effective value.
    pub fn icon_references(&self) -> Vec<IconReference<'a>> {
        self.visible_properties()
            .into_iter()
            .chain(self.visible_layout_properties())
            .filter(|def| def.is_icon_reference)
            .filter_map(|def| {
                let icon = self.effective_value(&def.name)?.as_str()?.trim();
                (!icon.is_empty()).then_some(IconReference {
                    prop_name: def.name.as_str(),
                    icon,
                })
            })
            .collect()
    }

    /// Icon references the resolver does not know.
    pub fn unresolved_icons<R: IconResolver>(&self, resolver: &R) -> Vec<IconReference<'a>> {
        self.icon_references()
            .into_iter()
            .filter(|reference| resolver.resolve(reference.icon).is_none())
            .collect()
    }
}
