//! Bookmark Titles: entry point.

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use bookmark_titles::RewriterOptions;
use bookmark_titles_cli::config::{resolve_output_path, write_page};
use bookmark_titles_cli::script::ReplayScript;
use bookmark_titles_cli::session::RewriteSession;

#[derive(Parser)]
#[command(
    name = "bookmark-titles",
    about = "Prefix feed titles with channel name and duration in saved feed pages",
    version
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// Report skipped items and missing feed structure in the log.
    #[arg(long, global = true)]
    diagnostics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite the titles of a saved feed page.
    Rewrite {
        /// Saved HTML page.
        input: PathBuf,

        /// Output file. Also reads from BOOKMARK_TITLES_OUT; stdout otherwise.
        #[arg(short, long)]
        output: Option<String>,

        /// JSON script of insertions to replay after the initial scan.
        #[arg(long)]
        script: Option<PathBuf>,

        /// Print the summary as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the detected page mode and the locator used for each role.
    Inspect {
        /// Saved HTML page.
        input: PathBuf,

        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   bookmark-titles completions bash > ~/.local/share/bash-completion/completions/bookmark-titles
    ///   bookmark-titles completions zsh > ~/.zfunc/_bookmark-titles
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let options = RewriterOptions {
        diagnostics: cli.diagnostics,
    };

    match cli.command {
        Commands::Rewrite {
            input,
            output,
            script,
            json,
        } => {
            let script = script
                .as_deref()
                .map(ReplayScript::load)
                .transpose()?;
            let mut session = RewriteSession::open(&input, options)?;
            let summary = session.run(script.as_ref())?;

            let out_path = resolve_output_path(output.as_deref());
            match &out_path {
                Some(path) => {
                    write_page(path, &session.html())?;
                    tracing::info!("Wrote {}", path.display());
                }
                None => println!("{}", session.html()),
            }

            let text = if json {
                serde_json::to_string_pretty(&summary)?
            } else {
                let mut lines = vec![format!("Mode: {}", summary.mode)];
                match &summary.initial {
                    Some(r) => lines.push(format!(
                        "Initial scan: {} items, {} rewritten, {} skipped",
                        r.items, r.rewritten, r.failed
                    )),
                    None => lines.push("Initial scan: no feed container".to_string()),
                }
                if let Some(replay) = &summary.replay {
                    lines.push(format!(
                        "Replay: {} steps applied, {} skipped, {} rescans, {} rewritten",
                        replay.steps_applied,
                        replay.steps_skipped,
                        replay.rescans,
                        replay.report.rewritten
                    ));
                }
                lines.push(format!("Total rewritten: {}", summary.total_rewritten()));
                lines.join("\n")
            };

            // keep stdout clean when it carries the page
            if out_path.is_some() {
                println!("{text}");
            } else {
                eprintln!("{text}");
            }
        }

        Commands::Inspect { input, json } => {
            let session = RewriteSession::open(&input, options)?;
            let info = session.inspect();
            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Mode: {}", info.label);
                for entry in &info.locators {
                    println!(
                        "  {:<14} {}",
                        entry.role.to_string(),
                        entry.locator.unwrap_or("(unresolved)")
                    );
                }
            }
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "bookmark-titles", &mut std::io::stdout());
        }
    }

    Ok(())
}
