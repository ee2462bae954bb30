//! Argument parsing and end-to-end command runs.

use clap::Parser;
use proto_cli::cli::{Cli, Command, SavedCommand};
use proto_cli::commands::{Context, run};
use proto_cli::config::Settings;
use proto_tree::DropPlacement;
use tempfile::tempdir;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("proto-studio").chain(args.iter().copied())).unwrap()
}

fn context(dir: &std::path::Path) -> Context {
    let mut settings = Settings::default();
    settings.library.path = Some(dir.join("library.json"));
    settings.editor.id_prefix = "node".to_string();
    Context::load(None, settings).unwrap()
}

fn exec(ctx: &Context, args: &[&str]) -> anyhow::Result<String> {
    run(ctx, parse(args).command)
}

#[test]
fn move_takes_placement_or_offset() {
    let cli = parse(&["move", "p.json", "a", "b", "--placement", "into"]);
    let Command::Move(args) = cli.command else {
        panic!("expected move");
    };
    assert_eq!(args.placement, Some(DropPlacement::Inside));

    let cli = parse(&["move", "p.json", "a", "b", "--offset", "-3", "--height", "30"]);
    let Command::Move(args) = cli.command else {
        panic!("expected move");
    };
    assert_eq!(args.offset, Some(-3.0));
    assert_eq!(args.height, 30.0);

    let both = ["proto-studio", "move", "p.json", "a", "b", "--placement", "after", "--offset", "1"];
    assert!(Cli::try_parse_from(both).is_err());
    assert!(Cli::try_parse_from(["proto-studio", "move", "p.json", "a", "b"]).is_err());
}

#[test]
fn slot_requires_parent() {
    assert!(Cli::try_parse_from(["proto-studio", "add", "p.json", "Button", "--slot", "header"]).is_err());
    let cli = parse(&["add", "p.json", "Button", "--parent", "c1", "--slot", "header"]);
    assert!(matches!(cli.command, Command::Add(_)));
}

#[test]
fn global_flags_after_subcommand() {
    let cli = parse(&["saved", "list", "--library", "lib.json", "-v"]);
    assert!(matches!(cli.command, Command::Saved(SavedCommand::List)));
    assert_eq!(cli.library.as_deref(), Some(std::path::Path::new("lib.json")));
}

#[test]
fn empty_document_outline() {
    let dir = tempdir().unwrap();
    let ctx = context(dir.path());
    let file = dir.path().join("landing.json");
    let file = file.to_str().unwrap();

    exec(&ctx, &["new", file]).unwrap();
    insta::assert_snapshot!(exec(&ctx, &["tree", file]).unwrap().trim_end(), @r"
    landing
    (empty)
    ");
}

#[test]
fn compose_a_screen() {
    let dir = tempdir().unwrap();
    let ctx = context(dir.path());
    let file = dir.path().join("screen.json");
    let file = file.to_str().unwrap();
    exec(&ctx, &["new", file, "--name", "Checkout"]).unwrap();

    let screen = exec(&ctx, &["add", file, "Screen"]).unwrap();
    let row = exec(&ctx, &["add", file, "Row", "--parent", &screen]).unwrap();
    let card = exec(&ctx, &["add", file, "Card", "--parent", &screen]).unwrap();
    let button = exec(&ctx, &["add", file, "Button", "--parent", &card, "--slot", "header"]).unwrap();
    assert!(button.starts_with("node-"));

    exec(&ctx, &["set", file, &row, "title", "Toolbar"]).unwrap();
    exec(&ctx, &["move", file, &card, &row, "--placement", "before"]).unwrap();

    let tree = exec(&ctx, &["tree", file]).unwrap();
    let card_line = tree.find(&format!("[{card}]")).unwrap();
    let row_line = tree.find(&format!("[{row}]")).unwrap();
    assert!(card_line < row_line);
    assert!(tree.contains("Row \"Toolbar\""));
    assert!(tree.contains("<Header Buttons> (1)"));

    // A header button cannot leave its slot for the screen's child list.
    assert!(exec(&ctx, &["move", file, &button, &row, "--placement", "after"]).is_err());

    let removed = exec(&ctx, &["remove", file, &card]).unwrap();
    assert!(removed.contains("2 components"));
    assert!(exec(&ctx, &["remove", file, &card]).is_err());
}

#[test]
fn action_notes_need_function_properties() {
    let dir = tempdir().unwrap();
    let ctx = context(dir.path());
    let file = dir.path().join("actions.json");
    let file = file.to_str().unwrap();
    exec(&ctx, &["new", file]).unwrap();
    let row = exec(&ctx, &["add", file, "Row"]).unwrap();
    let button = exec(&ctx, &["add", file, "Button", "--parent", &row]).unwrap();

    assert!(exec(&ctx, &["action", file, &row, "title", "Open settings"]).is_err());

    exec(&ctx, &["action", file, &button, "onClick", "Open settings"]).unwrap();
    let panel = exec(&ctx, &["props", file, &button]).unwrap();
    assert!(panel.contains("Open settings"));

    let cleared = exec(&ctx, &["action", file, &button, "onClick", ""]).unwrap();
    assert!(cleared.starts_with("Removed action note"));
}

#[test]
fn describe_lists_slots() {
    let dir = tempdir().unwrap();
    let ctx = context(dir.path());

    let card = exec(&ctx, &["describe", "Card"]).unwrap();
    assert!(card.starts_with("Card ("));
    assert!(card.contains("Header Buttons"));

    let table = exec(&ctx, &["describe", "DataTable"]).unwrap();
    assert!(table.contains("Slots column1..N follow the 'columnCount' property (at most 20)"));

    assert!(exec(&ctx, &["describe", "Carousel3D"]).is_err());
}
