//! CLI argument definitions for the prototype studio.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use proto_model::{ComponentId, CompositionId};
use proto_tree::DropPlacement;

#[derive(Parser)]
#[command(
    name = "proto-studio",
    version,
    about = "Compose UI prototypes from a catalogue of component types",
    long_about = "Compose UI prototypes from a catalogue of component types.\n\n\
                  A prototype is a JSON document holding a forest of components.\n\
                  Subtrees can be saved to a library and reused with fresh ids."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Settings file (default: platform config folder).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Load component types from this JSON catalogue instead of the built-in one.
    #[arg(long = "catalogue", value_name = "PATH", global = true)]
    pub catalogue: Option<PathBuf>,

    /// Saved-composition library file (overrides the settings file).
    #[arg(long = "library", value_name = "PATH", global = true)]
    pub library: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (default: settings file, else pretty).
    #[arg(long = "log-format", value_enum, global = true)]
    pub log_format: Option<LogFormatArg>,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List component types by category.
    Types(TypesArgs),

    /// Show the properties and slots of one component type.
    Describe(DescribeArgs),

    /// Create an empty prototype document.
    New(NewArgs),

    /// Print the component outline of a document.
    Tree(DocumentArg),

    /// Add a component at the top level, as a child, or into a slot.
    Add(AddArgs),

    /// Delete a component and everything under it.
    Remove(TargetArgs),

    /// Copy a component subtree with fresh ids, next to the original.
    Duplicate(TargetArgs),

    /// Move a component before, after or inside another.
    Move(MoveArgs),

    /// Set a property value.
    Set(SetArgs),

    /// Clear a property so its default applies.
    Unset(UnsetArgs),

    /// Attach a free-text action note to a function property.
    Action(ActionArgs),

    /// Show the visible properties, layout properties and slots of a component.
    Props(PropsArgs),

    /// Manage the saved-composition library.
    #[command(subcommand)]
    Saved(SavedCommand),
}

#[derive(Args)]
pub struct TypesArgs {
    /// Only list this category.
    #[arg(long = "category")]
    pub category: Option<String>,
}

#[derive(Args)]
pub struct DescribeArgs {
    #[arg(value_name = "TYPE")]
    pub type_name: String,
}

#[derive(Args)]
pub struct DocumentArg {
    /// Prototype document (JSON).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Args)]
pub struct NewArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Document name (default: file stem).
    #[arg(long = "name")]
    pub name: Option<String>,

    /// Overwrite an existing file.
    #[arg(long = "force")]
    pub force: bool,
}

#[derive(Args)]
pub struct AddArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[arg(value_name = "TYPE")]
    pub type_name: String,

    /// Parent component (default: top level).
    #[arg(long = "parent", value_name = "ID")]
    pub parent: Option<ComponentId>,

    /// Slot of the parent to add into.
    #[arg(long = "slot", requires = "parent")]
    pub slot: Option<String>,
}

#[derive(Args)]
pub struct TargetArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[arg(value_name = "ID")]
    pub id: ComponentId,
}

#[derive(Args)]
pub struct MoveArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Component being dragged.
    #[arg(value_name = "DRAGGED")]
    pub dragged: ComponentId,

    /// Component it is dropped on.
    #[arg(value_name = "TARGET")]
    pub target: ComponentId,

    /// before, after or inside.
    #[arg(long = "placement", conflicts_with = "offset", required_unless_present = "offset")]
    pub placement: Option<DropPlacement>,

    /// Pointer offset from the top of the target row; picks the placement.
    #[arg(long = "offset", allow_negative_numbers = true)]
    pub offset: Option<f64>,

    /// Height of the target row, used with --offset.
    #[arg(long = "height", default_value_t = 40.0)]
    pub height: f64,
}

#[derive(Args)]
pub struct SetArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[arg(value_name = "ID")]
    pub id: ComponentId,

    #[arg(value_name = "PROPERTY")]
    pub property: String,

    /// Parsed according to the property's type.
    #[arg(value_name = "VALUE", allow_hyphen_values = true)]
    pub value: String,
}

#[derive(Args)]
pub struct UnsetArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[arg(value_name = "ID")]
    pub id: ComponentId,

    #[arg(value_name = "PROPERTY")]
    pub property: String,
}

#[derive(Args)]
pub struct ActionArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[arg(value_name = "ID")]
    pub id: ComponentId,

    #[arg(value_name = "PROPERTY")]
    pub property: String,

    /// What should happen. Empty removes the note.
    #[arg(value_name = "DESCRIPTION")]
    pub description: String,
}

#[derive(Args)]
pub struct PropsArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[arg(value_name = "ID")]
    pub id: ComponentId,

    /// Print the resolved property values as JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum SavedCommand {
    /// List saved compositions.
    List,

    /// Save a component subtree to the library.
    Save(SaveArgs),

    /// Insert a fresh copy of a saved composition into a document.
    Use(UseArgs),

    /// Rename or re-describe a saved composition.
    Update(UpdateArgs),

    /// Delete a saved composition.
    Delete(SavedIdArg),
}

#[derive(Args)]
pub struct SaveArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[arg(value_name = "ID")]
    pub id: ComponentId,

    #[arg(long = "name")]
    pub name: String,

    #[arg(long = "description")]
    pub description: Option<String>,
}

#[derive(Args)]
pub struct UseArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[arg(value_name = "SAVED_ID")]
    pub saved: CompositionId,

    /// Parent component (default: top level).
    #[arg(long = "parent", value_name = "ID")]
    pub parent: Option<ComponentId>,

    #[arg(long = "slot", requires = "parent")]
    pub slot: Option<String>,
}

#[derive(Args)]
pub struct UpdateArgs {
    #[arg(value_name = "SAVED_ID")]
    pub saved: CompositionId,

    #[arg(long = "name")]
    pub name: Option<String>,

    #[arg(long = "description")]
    pub description: Option<String>,
}

#[derive(Args)]
pub struct SavedIdArg {
    #[arg(value_name = "SAVED_ID")]
    pub saved: CompositionId,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
