//! Table rendering for registry, panel and library listings.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use proto_model::{ComponentTypeDefinition, PropertyDefinition};
use proto_persistence::SavedComposition;
use proto_props::{AvailableSlot, PanelEntry, PropertyPanel};
use proto_registry::ComponentRegistry;

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

/// Types grouped by category, in catalogue order.
pub fn types_table(registry: &ComponentRegistry, only: Option<&str>) -> Table {
    let grouped = registry.list_by_category();
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Category"),
        header_cell("Type"),
        header_cell("Children"),
        header_cell("Slots"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    for category in registry.categories() {
        if only.is_some_and(|wanted| wanted != category) {
            continue;
        }
        for definition in grouped.get(category.as_str()).into_iter().flatten() {
            table.add_row(vec![
                dim_cell(category),
                Cell::new(&definition.type_name).add_attribute(Attribute::Bold),
                flag_cell(definition.accepts_children),
                slot_summary_cell(definition),
                text_cell(definition.description.as_deref()),
            ]);
        }
    }
    table
}

/// Declared properties of a type.
pub fn properties_table(definition: &ComponentTypeDefinition) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Property"),
        header_cell("Type"),
        header_cell("Default"),
        header_cell("Options"),
        header_cell("Shown when"),
        header_cell("Notes"),
    ]);
    apply_table_style(&mut table);
    for property in &definition.properties {
        table.add_row(vec![
            Cell::new(&property.name),
            Cell::new(property.semantic_type.label()),
            text_cell(property.default_value.as_ref().map(ToString::to_string).as_deref()),
            options_cell(property),
            show_when_cell(property),
            text_cell(Some(notes(property).as_str()).filter(|n| !n.is_empty())),
        ]);
    }
    table
}

/// Static slots of a type.
pub fn slots_table(definition: &ComponentTypeDefinition) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Slot"),
        header_cell("Label"),
        header_cell("Accepts"),
        header_cell("Auto-adds"),
        header_cell("Shown when"),
    ]);
    apply_table_style(&mut table);
    for slot in &definition.slots {
        let accepts = slot
            .allowed_type_names
            .names()
            .map(|names| names.iter().cloned().collect::<Vec<_>>().join(", "));
        let shown = Some(slot.show_when.to_string()).filter(|s| !s.is_empty());
        table.add_row(vec![
            Cell::new(&slot.name),
            Cell::new(&slot.display_label),
            text_cell(Some(accepts.as_deref().unwrap_or("any"))),
            text_cell(slot.auto_add_type_name.as_deref()),
            text_cell(shown.as_deref()),
        ]);
    }
    table
}

/// Visible property rows with their effective values.
pub fn panel_properties_table(entries: &[PanelEntry<'_>]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Property"),
        header_cell("Type"),
        header_cell("Value"),
        header_cell("Source"),
    ]);
    apply_table_style(&mut table);
    for entry in entries {
        let source = if entry.explicit {
            Cell::new("set")
        } else if entry.value.is_some() {
            dim_cell("default")
        } else {
            dim_cell("-")
        };
        let name = if entry.definition.required {
            Cell::new(format!("{} *", entry.definition.name))
        } else {
            Cell::new(&entry.definition.name)
        };
        table.add_row(vec![
            name,
            Cell::new(entry.definition.semantic_type.label()),
            text_cell(entry.value.map(ToString::to_string).as_deref()),
            source,
        ]);
    }
    table
}

/// Function properties and their action notes.
pub fn actions_table(panel: &PropertyPanel<'_>) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Action"), header_cell("Description")]);
    apply_table_style(&mut table);
    for action in &panel.actions {
        let description = match (action.description, action.help) {
            (Some(text), _) => Cell::new(text),
            (None, Some(help)) => dim_cell(help),
            (None, None) => dim_cell("-"),
        };
        table.add_row(vec![Cell::new(action.prop_name), description]);
    }
    table
}

/// Slots currently offered for insertion.
pub fn available_slots_table(slots: &[AvailableSlot<'_>]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Slot"),
        header_cell("Label"),
        header_cell("Children"),
        header_cell("Accepts"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for slot in slots {
        let accepts = match (slot.rule.auto_add, slot.rule.allowed.names()) {
            (Some(auto), _) => format!("{auto} (auto)"),
            (None, Some(names)) => names.iter().cloned().collect::<Vec<_>>().join(", "),
            (None, None) => "any".to_string(),
        };
        table.add_row(vec![
            Cell::new(&slot.name),
            Cell::new(&slot.display_label),
            Cell::new(slot.child_count),
            Cell::new(accepts),
        ]);
    }
    table
}

pub fn saved_table(entries: &[SavedComposition]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Id"),
        header_cell("Name"),
        header_cell("Root"),
        header_cell("Nodes"),
        header_cell("Created"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    for entry in entries {
        table.add_row(vec![
            dim_cell(entry.id.as_str()),
            Cell::new(&entry.display_name).add_attribute(Attribute::Bold),
            Cell::new(&entry.component_snapshot.type_name),
            Cell::new(entry.component_snapshot.ids().count()),
            Cell::new(entry.created_at.format("%Y-%m-%d %H:%M")),
            Cell::new(&entry.description),
        ]);
    }
    table
}

fn slot_summary_cell(definition: &ComponentTypeDefinition) -> Cell {
    let mut names: Vec<String> = definition.slots.iter().map(|s| s.name.clone()).collect();
    if let Some(dynamic) = &definition.dynamic_slots {
        names.push(format!("{}1..N", dynamic.prefix));
    }
    if names.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(names.join(", "))
    }
}

fn options_cell(property: &PropertyDefinition) -> Cell {
    if property.enum_options.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(property.enum_options.join(" | "))
    }
}

fn show_when_cell(property: &PropertyDefinition) -> Cell {
    if property.show_when.is_empty() {
        dim_cell("always")
    } else {
        Cell::new(property.show_when.to_string()).fg(Color::Yellow)
    }
}

fn notes(property: &PropertyDefinition) -> String {
    let mut notes = Vec::new();
    if property.required {
        notes.push("required");
    }
    if property.is_icon_reference {
        notes.push("icon");
    }
    if property.accepts_action {
        notes.push("action");
    }
    notes.join(", ")
}

fn flag_cell(flag: bool) -> Cell {
    if flag {
        Cell::new("yes").fg(Color::Green)
    } else {
        dim_cell("no")
    }
}

fn text_cell(value: Option<&str>) -> Cell {
    match value {
        Some(text) => Cell::new(text),
        None => dim_cell("-"),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
