use std::path::Path;

use commitment_core::{Config, FormDraft};
use commitment_signature::{encode_png_data_uri, render_strokes, StrokeSet};
use commitment_submit::{NotifyOutcome, SubmitReport, UploadOutcome};

use crate::context::{build_orchestrator, open_store};
use crate::{fail, print_json, OutputFormat};

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

pub(crate) struct SubmitArgs<'a> {
    pub(crate) full_name: String,
    pub(crate) position: String,
    pub(crate) signature: Option<&'a Path>,
    pub(crate) strokes: Option<&'a Path>,
}

pub(crate) fn cmd_submit(config: &Config, args: SubmitArgs<'_>, output: OutputFormat, quiet: bool) {
    let signature = load_signature(&args, output, quiet);
    let draft = FormDraft::new(&args.full_name, &args.position, &signature);

    let orchestrator = build_orchestrator(config, open_store(config));
    let rt = tokio::runtime::Runtime::new().expect("failed to create tokio runtime");
    let report = match rt.block_on(orchestrator.submit(&draft)) {
        Ok(report) => report,
        Err(e) => fail(&e.to_string(), output, quiet),
    };
    orchestrator.reset();

    match output {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            if !quiet {
                print_report(&report);
            }
        }
    }
}

/// Resolve the signature argument to an encoded image string. No argument
/// yields an empty signature, which validation then rejects.
fn load_signature(args: &SubmitArgs<'_>, output: OutputFormat, quiet: bool) -> String {
    if let Some(path) = args.strokes {
        let content = std::fs::read_to_string(path).unwrap_or_else(|e| {
            fail(
                &format!("error reading file '{}': {}", path.display(), e),
                output,
                quiet,
            )
        });
        let set: StrokeSet = serde_json::from_str(&content).unwrap_or_else(|e| {
            fail(
                &format!("invalid stroke set in '{}': {}", path.display(), e),
                output,
                quiet,
            )
        });
        return render_strokes(&set).unwrap_or_else(|e| fail(&e.to_string(), output, quiet));
    }

    let Some(path) = args.signature else {
        return String::new();
    };
    let bytes = std::fs::read(path).unwrap_or_else(|e| {
        fail(
            &format!("error reading file '{}': {}", path.display(), e),
            output,
            quiet,
        )
    });
    if bytes.starts_with(PNG_MAGIC) {
        return encode_png_data_uri(&bytes);
    }
    match String::from_utf8(bytes) {
        Ok(text) => text.trim().to_string(),
        Err(_) => fail(
            &format!("'{}' is neither a PNG nor a data URI", path.display()),
            output,
            quiet,
        ),
    }
}

fn print_report(report: &SubmitReport) {
    println!("submitted {}", report.id);
    match &report.upload {
        UploadOutcome::Delivered { url } => println!("  upload: delivered ({})", url),
        UploadOutcome::Degraded { reason, .. } => println!("  upload: degraded ({})", reason),
    }
    match &report.notify {
        NotifyOutcome::Delivered { status } => println!("  notify: delivered ({})", status),
        NotifyOutcome::Suppressed { reason } => println!("  notify: suppressed ({})", reason),
    }
}
