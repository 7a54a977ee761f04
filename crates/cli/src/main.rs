use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crashlog_core::{render, CrashReport};

/// Pretty-printer for Apple crash/panic report (.ips) files.
///
/// This CLI is a thin wrapper around `crashlog-core` (exposed in code as
/// `crashlog_core`). All substantive logic lives in the library so it can
/// be tested thoroughly and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "crashlog",
    version,
    about = "Parse and pretty-print Apple crash/panic reports",
    long_about = None
)]
struct Cli {
    /// Crash report files to parse.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Emit a JSON summary instead of human-readable text.
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    for path in &cli.files {
        let buf = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let filename = path.display().to_string();

        let report = CrashReport::from_str(&buf, filename)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        if cli.json {
            let summary = report
                .summary()
                .with_context(|| format!("Failed to summarize {}", path.display()))?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            let text = render(&report)
                .with_context(|| format!("Failed to render {}", path.display()))?;
            print!("{text}");
        }
    }

    Ok(())
}
