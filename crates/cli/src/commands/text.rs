use time::macros::format_description;
use time::{Date, OffsetDateTime};

use commitment_core::{commitment_text, format_long_date};

use crate::{fail, print_json, OutputFormat};

pub(crate) fn cmd_text(date: Option<&str>, output: OutputFormat, quiet: bool) {
    let date = match date {
        Some(raw) => Date::parse(raw, format_description!("[year]-[month]-[day]"))
            .unwrap_or_else(|e| fail(&format!("invalid date '{}': {}", raw, e), output, quiet)),
        None => OffsetDateTime::now_utc().date(),
    };

    let text = commitment_text(date);
    match output {
        OutputFormat::Json => print_json(&serde_json::json!({
            "date": format_long_date(date),
            "text": text,
        })),
        OutputFormat::Text => println!("{}", text),
    }
}
