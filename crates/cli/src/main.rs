mod commands;
mod context;
mod serve;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Bank commitment form: sign, submit and review commitments.
#[derive(Parser)]
#[command(
    name = "commitment",
    version,
    about = "Bank commitment form: sign, submit and review commitments"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP form service
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "8080")]
        port: u16,
    },

    /// Submit a signed commitment form
    Submit {
        /// Full name of the signer
        #[arg(long, default_value = "")]
        full_name: String,
        /// Position of the signer
        #[arg(long, default_value = "")]
        position: String,
        /// Signature image: a PNG file or a text file holding a data URI
        #[arg(long, conflicts_with = "strokes")]
        signature: Option<PathBuf>,
        /// Signature as recorded strokes (JSON: {width, height, strokes})
        #[arg(long)]
        strokes: Option<PathBuf>,
    },

    /// List stored submissions
    List,

    /// Show one stored submission
    Show {
        /// Submission identifier
        id: String,
    },

    /// Delete a stored submission
    Delete {
        /// Submission identifier
        id: String,
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Print the commitment text
    Text {
        /// Signing date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// Render recorded strokes to a PNG file
    Render {
        /// Stroke set JSON file
        #[arg(long)]
        strokes: PathBuf,
        /// Output PNG path
        #[arg(long)]
        out: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match (&cli.command, cli.quiet) {
        (_, true) => "error",
        (Commands::Serve { .. }, false) => "info",
        _ => "warn",
    };
    init_tracing(default_level);

    let config = context::load_config(cli.config.as_deref(), cli.output, cli.quiet);

    match cli.command {
        Commands::Serve { port } => {
            let rt = tokio::runtime::Runtime::new().expect("failed to create tokio runtime");
            if let Err(e) = rt.block_on(serve::start_server(config, port)) {
                eprintln!("Server error: {}", e);
                process::exit(1);
            }
        }
        Commands::Submit {
            full_name,
            position,
            signature,
            strokes,
        } => {
            commands::submit::cmd_submit(
                &config,
                commands::submit::SubmitArgs {
                    full_name,
                    position,
                    signature: signature.as_deref(),
                    strokes: strokes.as_deref(),
                },
                cli.output,
                cli.quiet,
            );
        }
        Commands::List => {
            commands::results::cmd_list(&config, cli.output, cli.quiet);
        }
        Commands::Show { id } => {
            commands::results::cmd_show(&config, &id, cli.output, cli.quiet);
        }
        Commands::Delete { id, yes } => {
            commands::results::cmd_delete(&config, &id, yes, cli.output, cli.quiet);
        }
        Commands::Text { date } => {
            commands::text::cmd_text(date.as_deref(), cli.output, cli.quiet);
        }
        Commands::Render { strokes, out } => {
            commands::render::cmd_render(&strokes, &out, cli.output, cli.quiet);
        }
    }
}

/// Log to stderr, filtered by `RUST_LOG` when set.
fn init_tracing(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("error: {}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}

/// Report `msg` and exit with status 1.
pub(crate) fn fail(msg: &str, output: OutputFormat, quiet: bool) -> ! {
    report_error(msg, output, quiet);
    process::exit(1);
}

/// Pretty-print a serializable value to stdout.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) {
    let pretty = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
    println!("{}", pretty);
}
