//! CLI command definitions and handlers

use clap::Subcommand;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

use crate::core::gateway::TranslationGateway;
use crate::core::models::{Lang, TranslationResult};

/// Commands for TMT Translator
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate English text to Chinese
    En2zh {
        /// Text to translate
        text: String,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Translate Chinese text to English
    Zh2en {
        /// Text to translate
        text: String,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Translate a text file line by line
    File {
        /// Input file (required)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (default: <input>_translated)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Source language
        #[arg(long, default_value = "en")]
        from: Lang,

        /// Target language
        #[arg(long, default_value = "zh")]
        to: Lang,
    },
}

/// Handle a single-text translation command
pub async fn handle_text(
    gateway: &TranslationGateway,
    source: Lang,
    target: Lang,
    text: &str,
    json: bool,
) -> anyhow::Result<()> {
    let result = gateway.translate(source, target, text).await?;
    println!("{}", render(&result, json)?);
    Ok(())
}

/// Format a result for stdout
fn render(result: &TranslationResult, json: bool) -> anyhow::Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(result)?)
    } else {
        Ok(result.translated_text.clone())
    }
}

/// Default output path: `<name>_translated` next to the input
pub fn default_output(input: &Path) -> PathBuf {
    let mut filename = input
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_default();
    filename.push("_translated");
    if let Some(ext) = input.extension() {
        filename.push(".");
        filename.push(ext);
    }
    input.with_file_name(filename)
}

/// Split a line into its content and its original terminator (`\r\n`, `\n`, or none)
fn split_line_ending(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}

/// Handle file translation command
pub async fn handle_file(
    gateway: &TranslationGateway,
    input: PathBuf,
    output: Option<PathBuf>,
    source: Lang,
    target: Lang,
) -> anyhow::Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};

    let start_time = Instant::now();
    let output = output.unwrap_or_else(|| default_output(&input));

    info!("Starting file translation");
    info!("Input: {}", input.display());
    info!("Output: {}", output.display());
    info!("Direction: {} -> {}", source, target);

    let content = std::fs::read_to_string(&input)?;
    let lines: Vec<(&str, &str)> = content.split_inclusive('\n').map(split_line_ending).collect();

    let pb = ProgressBar::new(lines.len() as u64);
    pb.set_style(ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
        .progress_chars("=>-"));

    let mut out = String::with_capacity(content.len());
    let mut processed = 0;
    let mut failed = 0;

    for (idx, (line, ending)) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            out.push_str(line);
        } else {
            match gateway.translate(source, target, line).await {
                Ok(result) => {
                    processed += 1;
                    out.push_str(&result.translated_text);
                }
                Err(e) => {
                    failed += 1;
                    warn!("Line {} failed: {}", idx + 1, e);
                    pb.set_message(format!("Line {} failed: {}", idx + 1, e));
                    out.push_str(line);
                }
            }
        }
        out.push_str(ending);
        pb.inc(1);
    }

    pb.finish_with_message("Completed");

    std::fs::write(&output, out)?;

    let duration = start_time.elapsed();
    info!(
        "Completed: {} translated, {} failed in {:?}",
        processed, failed, duration
    );

    println!("\n✅ Translation completed!");
    println!("   Translated: {}", processed);
    println!("   Failed: {}", failed);
    println!("   Output: {}", output.display());
    println!("   Time: {:?}", duration);

    Ok(())
}
