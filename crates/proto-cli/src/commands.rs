//! Command handlers.
//!
//! Every handler returns the text to print, so the binary stays a thin
//! dispatcher and the handlers can be driven from tests.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};
use proto_model::{ComponentInstance, IdSource, RandomIds};
use proto_persistence::{
    CompositionLibrary, CompositionUpdate, FileStore, PersistenceError, PrototypeDocument,
    is_unmodified, load_document, save_document,
};
use proto_props::parse_value;
use proto_registry::ComponentRegistry;
use proto_tree::{DragSession, TreeEditor, render_outline};
use tracing::info;

use crate::cli::{
    ActionArgs, AddArgs, Command, DescribeArgs, DocumentArg, MoveArgs, NewArgs, PropsArgs,
    SaveArgs, SavedCommand, SavedIdArg, SetArgs, TargetArgs, TypesArgs, UnsetArgs, UpdateArgs,
    UseArgs,
};
use crate::config::Settings;
use crate::render::{
    actions_table, available_slots_table, panel_properties_table, properties_table, saved_table,
    slots_table, types_table,
};

/// Everything a command needs besides its own arguments.
pub struct Context {
    pub registry: ComponentRegistry,
    pub settings: Settings,
}

impl Context {
    /// Registry from `catalogue` (or the built-in one) plus settings.
    pub fn load(catalogue: Option<&Path>, settings: Settings) -> Result<Self> {
        let registry = match catalogue {
            Some(path) => ComponentRegistry::from_path(path)
                .with_context(|| format!("load catalogue {}", path.display()))?,
            None => ComponentRegistry::builtin().context("load built-in catalogue")?,
        };
        info!(types = registry.len(), "Loaded component registry");
        Ok(Self { registry, settings })
    }

    pub fn library_path(&self) -> PathBuf {
        self.settings.library_path()
    }

    fn editor(&self) -> TreeEditor<'_, RandomIds> {
        TreeEditor::with_ids(
            &self.registry,
            RandomIds::with_prefix(self.settings.editor.id_prefix.clone()),
        )
    }

    fn library(&self) -> Result<CompositionLibrary<FileStore>> {
        let store = FileStore::open(self.library_path()).map_err(friendly)?;
        Ok(CompositionLibrary::new(store))
    }
}

/// Run one command and return its output.
pub fn run(ctx: &Context, command: Command) -> Result<String> {
    match command {
        Command::Types(args) => run_types(ctx, &args),
        Command::Describe(args) => run_describe(ctx, &args),
        Command::New(args) => run_new(&args),
        Command::Tree(args) => run_tree(ctx, &args),
        Command::Add(args) => run_add(ctx, &args),
        Command::Remove(args) => run_remove(ctx, &args),
        Command::Duplicate(args) => run_duplicate(ctx, &args),
        Command::Move(args) => run_move(ctx, &args),
        Command::Set(args) => run_set(ctx, &args),
        Command::Unset(args) => run_unset(ctx, &args),
        Command::Action(args) => run_action(ctx, &args),
        Command::Props(args) => run_props(ctx, &args),
        Command::Saved(command) => match command {
            SavedCommand::List => run_saved_list(ctx),
            SavedCommand::Save(args) => run_saved_save(ctx, &args),
            SavedCommand::Use(args) => run_saved_use(ctx, &args),
            SavedCommand::Update(args) => run_saved_update(ctx, &args),
            SavedCommand::Delete(args) => run_saved_delete(ctx, &args),
        },
    }
}

pub fn run_types(ctx: &Context, args: &TypesArgs) -> Result<String> {
    if let Some(category) = &args.category
        && !ctx.registry.categories().iter().any(|c| c == category)
    {
        bail!(
            "unknown category '{category}' (known: {})",
            ctx.registry.categories().join(", ")
        );
    }
    Ok(types_table(&ctx.registry, args.category.as_deref()).to_string())
}

pub fn run_describe(ctx: &Context, args: &DescribeArgs) -> Result<String> {
    let definition = ctx.registry.require(&args.type_name)?;
    let mut out = String::new();
    writeln!(out, "{} ({})", definition.type_name, definition.category)?;
    if let Some(description) = &definition.description {
        writeln!(out, "{description}")?;
    }
    if definition.accepts_children {
        writeln!(out, "Accepts children.")?;
    }
    if definition.properties.is_empty() {
        writeln!(out, "\nNo properties.")?;
    } else {
        writeln!(out, "\n{}", properties_table(definition))?;
    }
    if !definition.slots.is_empty() {
        writeln!(out, "\n{}", slots_table(definition))?;
    }
    if let Some(dynamic) = &definition.dynamic_slots {
        write!(
            out,
            "\nSlots {}1..N follow the '{}' property",
            dynamic.prefix, dynamic.count_property
        )?;
        if let Some(max) = dynamic.max_count {
            write!(out, " (at most {max})")?;
        }
        if let Some(header) = &dynamic.header_property {
            write!(out, "; labels come from '{header}'")?;
        }
        writeln!(out, ".")?;
    }
    Ok(out)
}

pub fn run_new(args: &NewArgs) -> Result<String> {
    if args.file.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            args.file.display()
        );
    }
    let name = args.name.clone().unwrap_or_else(|| {
        args.file
            .file_stem()
            .map_or_else(|| "Untitled".to_string(), |s| s.to_string_lossy().into_owned())
    });
    let mut document = PrototypeDocument::new(name);
    store_document(&mut document, &args.file)?;
    Ok(format!("Created '{}' at {}", document.name, args.file.display()))
}

pub fn run_tree(ctx: &Context, args: &DocumentArg) -> Result<String> {
    let document = open_document(ctx, &args.file)?;
    let mut out = format!("{}\n", document.name);
    if document.components.is_empty() {
        out.push_str("(empty)\n");
        return Ok(out);
    }
    out.push_str(&render_outline(&document.components, &ctx.registry));

    let copies: Vec<_> = document
        .components
        .iter()
        .flat_map(ComponentInstance::preorder)
        .filter(|node| node.saved_composition_ref.is_some())
        .collect();
    if !copies.is_empty() {
        out.push_str("\nSaved-component copies:\n");
        for node in copies {
            let state = if is_unmodified(node) { "unmodified" } else { "modified" };
            writeln!(out, "  {} [{}] {state}", node.type_name, node.id)?;
        }
    }
    Ok(out)
}

pub fn run_add(ctx: &Context, args: &AddArgs) -> Result<String> {
    let mut document = open_document(ctx, &args.file)?;
    let mut editor = ctx.editor();
    let id = match &args.parent {
        Some(parent) => editor.insert_child(
            &mut document.components,
            parent,
            args.slot.as_deref(),
            &args.type_name,
        )?,
        None => editor.insert_root(&mut document.components, &args.type_name)?,
    };
    store_document(&mut document, &args.file)?;
    Ok(id.to_string())
}

pub fn run_remove(ctx: &Context, args: &TargetArgs) -> Result<String> {
    let mut document = open_document(ctx, &args.file)?;
    let Some(removed) = ctx.editor().delete(&mut document.components, &args.id) else {
        bail!("component {} not found in {}", args.id, args.file.display());
    };
    store_document(&mut document, &args.file)?;
    let count = removed.ids().count();
    Ok(format!(
        "Removed {} [{}] ({count} component{})",
        removed.type_name,
        removed.id,
        if count == 1 { "" } else { "s" }
    ))
}

pub fn run_duplicate(ctx: &Context, args: &TargetArgs) -> Result<String> {
    let mut document = open_document(ctx, &args.file)?;
    let id = ctx.editor().duplicate(&mut document.components, &args.id)?;
    store_document(&mut document, &args.file)?;
    Ok(id.to_string())
}

pub fn run_move(ctx: &Context, args: &MoveArgs) -> Result<String> {
    let mut document = open_document(ctx, &args.file)?;
    let editor = ctx.editor();
    let mut session = DragSession::start(args.dragged.clone());
    match (args.placement, args.offset) {
        (Some(placement), _) => {
            session.hover(args.target.clone(), placement);
        }
        (None, Some(offset)) => {
            session
                .hover_at(&editor, &document.components, &args.target, offset, args.height)
                .with_context(|| format!("in {}", args.file.display()))?;
        }
        (None, None) => bail!("give --placement or --offset"),
    }
    let placement = session.candidate().map(|candidate| candidate.placement);
    if !session.commit(&editor, &mut document.components)? {
        return Ok("Nothing to move".to_string());
    }
    store_document(&mut document, &args.file)?;
    Ok(match placement {
        Some(placement) => format!("Moved {} {placement} {}", args.dragged, args.target),
        None => format!("Moved {}", args.dragged),
    })
}

pub fn run_set(ctx: &Context, args: &SetArgs) -> Result<String> {
    let mut document = open_document(ctx, &args.file)?;
    let editor = ctx.editor();
    let value = {
        let scope = editor.scope(&document.components, &args.id)?;
        let definition = scope.definition_of(&args.property).with_context(|| {
            format!(
                "'{}' has no property '{}'",
                scope.definition.type_name, args.property
            )
        })?;
        parse_value(definition, &args.value)?
    };
    editor.set_property(&mut document.components, &args.id, &args.property, value.clone())?;
    store_document(&mut document, &args.file)?;
    Ok(format!("{}.{} = {value}", args.id, args.property))
}

pub fn run_unset(ctx: &Context, args: &UnsetArgs) -> Result<String> {
    let mut document = open_document(ctx, &args.file)?;
    let removed = ctx
        .editor()
        .clear_property(&mut document.components, &args.id, &args.property)?;
    if !removed {
        return Ok(format!("{}.{} was not set", args.id, args.property));
    }
    store_document(&mut document, &args.file)?;
    Ok(format!("Cleared {}.{}", args.id, args.property))
}

pub fn run_action(ctx: &Context, args: &ActionArgs) -> Result<String> {
    let mut document = open_document(ctx, &args.file)?;
    ctx.editor().set_action(
        &mut document.components,
        &args.id,
        &args.property,
        &args.description,
    )?;
    store_document(&mut document, &args.file)?;
    if args.description.trim().is_empty() {
        Ok(format!("Removed action note from {}.{}", args.id, args.property))
    } else {
        Ok(format!("Action note set on {}.{}", args.id, args.property))
    }
}

pub fn run_props(ctx: &Context, args: &PropsArgs) -> Result<String> {
    let document = open_document(ctx, &args.file)?;
    let editor = ctx.editor();
    let scope = editor.scope(&document.components, &args.id)?;
    if args.json {
        return Ok(serde_json::to_string_pretty(&scope.resolved_properties())?);
    }

    let panel = scope.panel();
    let mut out = format!("{} [{}]\n", panel.type_name, args.id);
    if panel.properties.is_empty() {
        out.push_str("No visible properties.\n");
    } else {
        writeln!(out, "{}", panel_properties_table(&panel.properties))?;
    }
    if !panel.layout.is_empty() {
        let parent = document
            .components
            .parent_type_of(&args.id)
            .unwrap_or_default();
        writeln!(out, "\nLayout (inside {parent})")?;
        writeln!(out, "{}", panel_properties_table(&panel.layout))?;
    }
    if !panel.actions.is_empty() {
        writeln!(out, "\nActions")?;
        writeln!(out, "{}", actions_table(&panel))?;
    }
    if !panel.slots.is_empty() {
        writeln!(out, "\nSlots")?;
        writeln!(out, "{}", available_slots_table(&panel.slots))?;
    }
    Ok(out)
}

pub fn run_saved_list(ctx: &Context) -> Result<String> {
    let entries = ctx.library()?.list().map_err(friendly)?;
    if entries.is_empty() {
        return Ok("No saved components.".to_string());
    }
    Ok(saved_table(&entries).to_string())
}

pub fn run_saved_save(ctx: &Context, args: &SaveArgs) -> Result<String> {
    let document = open_document(ctx, &args.file)?;
    let Some(instance) = document.components.find(&args.id) else {
        bail!("component {} not found in {}", args.id, args.file.display());
    };
    let saved = ctx
        .library()?
        .save(instance, &args.name, args.description.as_deref())
        .map_err(friendly)?;
    Ok(saved.id.to_string())
}

pub fn run_saved_use(ctx: &Context, args: &UseArgs) -> Result<String> {
    let mut document = open_document(ctx, &args.file)?;
    let mut ids = RandomIds::with_prefix(ctx.settings.editor.id_prefix.clone());
    let copy = ctx
        .library()?
        .instantiate(&args.saved, &mut || ids.next_component_id())
        .map_err(friendly)?
        .with_context(|| format!("no saved component {}", args.saved))?;
    let id = ctx.editor().insert_subtree(
        &mut document.components,
        args.parent.as_ref(),
        args.slot.as_deref(),
        copy,
    )?;
    store_document(&mut document, &args.file)?;
    Ok(id.to_string())
}

pub fn run_saved_update(ctx: &Context, args: &UpdateArgs) -> Result<String> {
    if args.name.is_none() && args.description.is_none() {
        bail!("nothing to update (give --name or --description)");
    }
    let update = CompositionUpdate {
        display_name: args.name.clone(),
        description: args.description.clone(),
    };
    let saved = ctx
        .library()?
        .update(&args.saved, update)
        .map_err(friendly)?
        .with_context(|| format!("no saved component {}", args.saved))?;
    Ok(format!("Updated '{}' [{}]", saved.display_name, saved.id))
}

pub fn run_saved_delete(ctx: &Context, args: &SavedIdArg) -> Result<String> {
    if !ctx.library()?.delete(&args.saved).map_err(friendly)? {
        bail!("no saved component {}", args.saved);
    }
    Ok(format!("Deleted {}", args.saved))
}

/// Load a document whose every component type is registered.
fn open_document(ctx: &Context, path: &Path) -> Result<PrototypeDocument> {
    let document = load_document(path).map_err(friendly)?;
    let unknown: BTreeSet<String> = document
        .components
        .roots
        .iter()
        .flat_map(ComponentInstance::preorder)
        .filter(|node| !ctx.registry.contains(&node.type_name))
        .map(|node| node.type_name.clone())
        .collect();
    if !unknown.is_empty() {
        let names: Vec<String> = unknown.into_iter().collect();
        bail!(
            "{} uses component types missing from the catalogue: {}",
            path.display(),
            names.join(", ")
        );
    }
    Ok(document)
}

fn store_document(document: &mut PrototypeDocument, path: &Path) -> Result<()> {
    save_document(document, path).map_err(friendly)
}

/// Wrap a persistence error with its user-facing message and hint.
fn friendly(error: PersistenceError) -> anyhow::Error {
    let message = match error.suggestion() {
        Some(hint) => format!("{} {hint}", error.user_message()),
        None => error.user_message(),
    };
    anyhow::Error::new(error).context(message)
}
