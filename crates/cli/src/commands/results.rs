use std::io::BufRead;

use commitment_core::{format_display_datetime, parse_iso, Config, StoredEnvelope};
use commitment_submit::{DeleteOutcome, ResultsView};

use crate::context::open_store;
use crate::{fail, print_json, OutputFormat};

pub(crate) fn cmd_list(config: &Config, output: OutputFormat, quiet: bool) {
    let view = ResultsView::load(open_store(config));

    match output {
        OutputFormat::Json => print_json(&view.entries()),
        OutputFormat::Text => {
            if quiet {
                return;
            }
            if view.is_empty() {
                println!("no submissions");
                return;
            }
            for entry in view.entries() {
                println!(
                    "{}  {}  {}  {}",
                    entry.id,
                    entry.record.full_name,
                    entry.record.position,
                    display_time(&entry.record.submitted_at)
                );
            }
        }
    }
}

pub(crate) fn cmd_show(config: &Config, id: &str, output: OutputFormat, quiet: bool) {
    let view = ResultsView::load(open_store(config));
    let Some(entry) = view.find(id) else {
        fail(&format!("submission '{}' not found", id), output, quiet);
    };

    match output {
        OutputFormat::Json => print_json(entry),
        OutputFormat::Text => print_entry(entry),
    }
}

pub(crate) fn cmd_delete(config: &Config, id: &str, yes: bool, output: OutputFormat, quiet: bool) {
    let mut view = ResultsView::load(open_store(config));

    let outcome = view.delete(id, |entry| {
        if yes {
            return true;
        }
        eprintln!(
            "Delete the submission from {} ({}), submitted {}?",
            entry.record.full_name,
            entry.record.position,
            display_time(&entry.record.submitted_at)
        );
        eprintln!("Type 'yes' to confirm:");
        let mut input = String::new();
        std::io::stdin().lock().read_line(&mut input).is_ok() && input.trim() == "yes"
    });

    match outcome {
        DeleteOutcome::Deleted => match output {
            OutputFormat::Json => print_json(&serde_json::json!({ "deleted": id })),
            OutputFormat::Text => {
                if !quiet {
                    println!("deleted {}", id);
                }
            }
        },
        DeleteOutcome::Cancelled => {
            if !quiet {
                eprintln!("Delete aborted.");
            }
            std::process::exit(1);
        }
        DeleteOutcome::NotFound => {
            fail(&format!("submission '{}' not found", id), output, quiet);
        }
    }
}

fn print_entry(entry: &StoredEnvelope) {
    let signature = match entry.record.signature_url.as_deref() {
        Some(url) if url.starts_with("data:") => format!("embedded image ({} chars)", url.len()),
        Some(url) => url.to_string(),
        None => "-".to_string(),
    };
    println!("id:           {}", entry.id);
    println!("full name:    {}", entry.record.full_name);
    println!("position:     {}", entry.record.position);
    println!("submitted at: {}", display_time(&entry.record.submitted_at));
    println!("saved at:     {}", display_time(&entry.saved_at));
    println!("signature:    {}", signature);
}

/// Indonesian short date-time for a stored timestamp; the raw value if it
/// does not parse.
fn display_time(raw: &str) -> String {
    parse_iso(raw)
        .map(format_display_datetime)
        .unwrap_or_else(|| raw.to_string())
}
