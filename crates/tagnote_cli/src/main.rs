//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `tagnote_core` linkage without a presentation layer.
//! - Optionally list visible notes from a SQLite-backed notebook.
//!
//! Usage: `tagnote_cli [DB_PATH] [--title TEXT] [--tag LABEL]...`

use std::process::ExitCode;
use std::rc::Rc;
use tagnote_core::{NotebookApi, NotebookService, SqliteMedium, Tag};

#[derive(Debug, Default)]
struct Args {
    db_path: Option<String>,
    title: String,
    tag_labels: Vec<String>,
}

fn main() -> ExitCode {
    println!("tagnote_core ping={}", tagnote_core::ping());
    println!("tagnote_core version={}", tagnote_core::core_version());

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(2);
        }
    };
    let Some(db_path) = args.db_path.as_deref() else {
        return ExitCode::SUCCESS;
    };

    match list_notes(db_path, &args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(mut raw: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut args = Args::default();
    while let Some(arg) = raw.next() {
        match arg.as_str() {
            "--title" => {
                args.title = raw.next().ok_or("--title expects a value")?;
            }
            "--tag" => {
                args.tag_labels.push(raw.next().ok_or("--tag expects a value")?);
            }
            path if args.db_path.is_none() && !path.starts_with("--") => {
                args.db_path = Some(path.to_string());
            }
            other => return Err(format!("unexpected argument `{other}`")),
        }
    }
    Ok(args)
}

fn list_notes(db_path: &str, args: &Args) -> Result<(), String> {
    let medium = SqliteMedium::open(db_path).map_err(|err| format!("open failed: {err}"))?;
    let mut notebook = NotebookService::new(Rc::new(medium));

    let available = notebook
        .available_tags()
        .map_err(|err| format!("tag load failed: {err}"))?;
    let selected = args
        .tag_labels
        .iter()
        .map(|label| {
            available
                .iter()
                .find(|tag| tag.label == *label)
                .cloned()
                .ok_or_else(|| format!("unknown tag `{label}`"))
        })
        .collect::<Result<Vec<Tag>, String>>()?;

    let visible = notebook
        .list_visible_notes(&args.title, &selected)
        .map_err(|err| format!("note load failed: {err}"))?;
    for note in visible {
        let labels = note
            .tags
            .iter()
            .map(|tag| tag.label.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        println!("{}\t{}\t[{}]", note.id, note.title, labels);
    }
    Ok(())
}
