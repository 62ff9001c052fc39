use std::path::Path;

use commitment_signature::{decode_data_uri, render_strokes, StrokeSet};

use crate::{fail, print_json, OutputFormat};

pub(crate) fn cmd_render(strokes: &Path, out: &Path, output: OutputFormat, quiet: bool) {
    let content = std::fs::read_to_string(strokes).unwrap_or_else(|e| {
        fail(
            &format!("error reading file '{}': {}", strokes.display(), e),
            output,
            quiet,
        )
    });
    let set: StrokeSet = serde_json::from_str(&content).unwrap_or_else(|e| {
        fail(
            &format!("invalid stroke set in '{}': {}", strokes.display(), e),
            output,
            quiet,
        )
    });

    let encoded = render_strokes(&set).unwrap_or_else(|e| fail(&e.to_string(), output, quiet));
    if encoded.is_empty() {
        fail("no strokes to render", output, quiet);
    }
    let png = decode_data_uri(&encoded).unwrap_or_else(|e| fail(&e.to_string(), output, quiet));
    if let Err(e) = std::fs::write(out, &png) {
        fail(
            &format!("error writing '{}': {}", out.display(), e),
            output,
            quiet,
        );
    }

    match output {
        OutputFormat::Json => print_json(&serde_json::json!({
            "path": out.display().to_string(),
            "bytes": png.len(),
        })),
        OutputFormat::Text => {
            if !quiet {
                println!("wrote {} ({} bytes)", out.display(), png.len());
            }
        }
    }
}
