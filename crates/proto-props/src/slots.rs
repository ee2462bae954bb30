//! Slot availability: static slots gated by `showWhen`, plus generated slots.

use proto_model::{AllowedTypes, ComponentTypeDefinition, DynamicSlots, PropValue};
use tracing::debug;

use crate::scope::PropertyScope;

/// Placement rules for one slot, as the editing engine needs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRule<'a> {
    pub allowed: &'a AllowedTypes,
    pub auto_add: Option<&'a str>,
}

/// A slot currently offered on an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailableSlot<'a> {
    pub name: String,
    pub display_label: String,
    pub description: Option<&'a str>,
    pub rule: SlotRule<'a>,
    pub child_count: usize,
}

impl<'a> PropertyScope<'a> {
    /// Slots shown for this instance right now, in declaration order.
    ///
    /// Static slots whose `showWhen` fails are left out; generated slots
    /// follow, numbered from 1 up to the effective count.
    pub fn available_slots(&self) -> Vec<AvailableSlot<'a>> {
        let mut slots: Vec<AvailableSlot<'a>> = self
            .definition
            .slots
            .iter()
            .filter(|slot| self.is_visible(&slot.show_when))
            .map(|slot| AvailableSlot {
                name: slot.name.clone(),
                display_label: slot.display_label.clone(),
                description: slot.description.as_deref(),
                rule: SlotRule {
                    allowed: &slot.allowed_type_names,
                    auto_add: slot.auto_add_type_name.as_deref(),
                },
                child_count: self.instance.slot(&slot.name).len(),
            })
            .collect();

        if let Some(dynamic) = &self.definition.dynamic_slots {
            let labels = self.header_labels(dynamic);
            for index in 1..=self.dynamic_slot_count(dynamic) {
                let name = dynamic.slot_name(index);
                let display_label = labels
                    .get(index - 1)
                    .filter(|label| !label.is_empty())
                    .cloned()
                    .unwrap_or_else(|| format!("{} {index}", dynamic.label_prefix));
                slots.push(AvailableSlot {
                    child_count: self.instance.slot(&name).len(),
                    name,
                    display_label,
                    description: None,
                    rule: SlotRule {
                        allowed: &dynamic.allowed_type_names,
                        auto_add: None,
                    },
                });
            }
        }
        slots
    }

    /// Rules for inserting into `slot_name`, if the slot exists right now.
    ///
    /// Static slots are accepted regardless of `showWhen`, which only
    /// governs display. Generated slots must fall inside the current count.
    pub fn slot_rule(&self, slot_name: &str) -> Option<SlotRule<'a>> {
        let definition: &'a ComponentTypeDefinition = self.definition;
        if let Some(slot) = definition.static_slot(slot_name) {
            return Some(SlotRule {
                allowed: &slot.allowed_type_names,
                auto_add: slot.auto_add_type_name.as_deref(),
            });
        }
        let dynamic = definition.dynamic_slots.as_ref()?;
        let index = dynamic.slot_index(slot_name)?;
        (index <= self.dynamic_slot_count(dynamic)).then_some(SlotRule {
            allowed: &dynamic.allowed_type_names,
            auto_add: None,
        })
    }

    /// Current number of generated slots, clamped to `[0, max]`.
    pub fn dynamic_slot_count(&self, dynamic: &DynamicSlots) -> usize {
        let raw = self
            .effective_value(&dynamic.count_property)
            .and_then(PropValue::as_f64)
            .unwrap_or(0.0);
        if !raw.is_finite() || raw < 0.0 {
            debug!(
                type_name = %self.definition.type_name,
                count = raw,
                "slot count out of range, treating as zero"
            );
            return 0;
        }
        // Saturating cast; fractional counts round down.
        dynamic.clamp_count(raw as usize)
    }

    fn header_labels(&self, dynamic: &DynamicSlots) -> Vec<String> {
        dynamic
            .header_property
            .as_deref()
            .and_then(|name| self.effective_value(name))
            .and_then(PropValue::as_str)
            .map(|headers| headers.split(',').map(|h| h.trim().to_string()).collect())
            .unwrap_or_default()
    }
}
