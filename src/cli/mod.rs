//! # CLI Module
//!
//! Command-line interface for the label decode pipeline. Decodes a local
//! photo the same way the service would, without touching any storage.
//!
//! ## Usage
//! ```bash
//! # Full pipeline: symbol strategy, then OCR fallback if configured
//! label-decode decode label.jpg
//!
//! # JSON output for scripting
//! label-decode decode label.jpg --output json
//!
//! # Probe only the OCR fallback (requires OPENAI_API_KEY)
//! label-decode ocr label.jpg
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use label_decode::core::{LabelDecoder, OcrConfig, OpenAiExtractor, TextExtractor};
use label_decode::error::{LabelError, OcrError};
use label_decode::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Label Decode - read asset labels from photos
#[derive(Parser, Debug)]
#[command(name = "label-decode")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a photographed label into a model code + asset tag
    Decode {
        /// Image file to decode
        file: PathBuf,

        /// Content type; inferred from the file extension when omitted
        #[arg(long)]
        content_type: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Disable the OCR fallback even when credentials are configured
        #[arg(long)]
        no_ocr: bool,
    },

    /// Run only the OCR fallback stage and print its field diagnostics
    Ocr {
        /// Image file to submit
        file: PathBuf,

        /// Content type; inferred from the file extension when omitted
        #[arg(long)]
        content_type: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
}

/// Infer a content type from the file extension, the way the upload layer
/// would; the pipeline itself never interprets it.
fn infer_content_type(path: &Path) -> String {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("jpg" | "jpeg") => "image/jpeg".to_string(),
        Some("png") => "image/png".to_string(),
        Some("webp") => "image/webp".to_string(),
        Some("heic" | "heif") => "image/heic".to_string(),
        _ => "application/octet-stream".to_string(),
    }
}

fn filename_of(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string()
}

fn read_photo(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        LabelError::Image(label_decode::error::ImageError::Unreadable {
            reason: format!("failed to read {}: {e}", path.display()),
        })
    })
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Decode {
            file,
            content_type,
            output,
            no_ocr,
        } => run_decode(file, content_type, output, no_ocr).await,
        Commands::Ocr {
            file,
            content_type,
            output,
        } => run_ocr(file, content_type, output).await,
    }
}

async fn run_decode(
    file: PathBuf,
    content_type: Option<String>,
    output: OutputFormat,
    no_ocr: bool,
) -> Result<()> {
    let bytes = read_photo(&file)?;
    let content_type = content_type.unwrap_or_else(|| infer_content_type(&file));
    let filename = filename_of(&file);

    let mut builder = LabelDecoder::builder();
    if !no_ocr {
        let config = OcrConfig::from_env();
        if config.is_available() {
            let extractor = OpenAiExtractor::new(config).map_err(LabelError::Ocr)?;
            builder = builder.extractor(Arc::new(extractor));
        }
    }
    let decoder = builder.build();

    match decoder.decode(&bytes, &filename, &content_type).await {
        Ok(scan) => {
            match output {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&scan).unwrap_or_default());
                }
                OutputFormat::Pretty => {
                    println!("{}", style("Label decoded").green().bold());
                    println!("  Model code:  {}", style(&scan.identifiers.model_code).cyan());
                    println!("  Asset tag:   {}", style(&scan.identifiers.asset_tag).cyan());
                    println!("  Combined:    {}", scan.identifiers.combined_code);
                    println!("  Raw text:    {}", scan.identifiers.raw_code);
                    match &scan.symbology {
                        Some(symbology) => println!("  Strategy:    symbol ({symbology})"),
                        None => println!("  Strategy:    ocr"),
                    }
                }
            }
            Ok(())
        }
        Err(e) => {
            report_failure(&e, output);
            Err(e)
        }
    }
}

async fn run_ocr(
    file: PathBuf,
    content_type: Option<String>,
    output: OutputFormat,
) -> Result<()> {
    let bytes = read_photo(&file)?;
    let content_type = content_type.unwrap_or_else(|| infer_content_type(&file));
    let filename = filename_of(&file);

    let config = OcrConfig::from_env();
    if !config.is_available() {
        eprintln!(
            "{}",
            style("OPENAI_API_KEY is not set; the OCR fallback is unavailable").red()
        );
        return Err(LabelError::Ocr(OcrError::Unavailable));
    }

    let extractor = OpenAiExtractor::new(config).map_err(LabelError::Ocr)?;
    let extraction = extractor
        .extract_text(&bytes, &filename, &content_type)
        .await
        .map_err(LabelError::Ocr)?;

    match output {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&extraction).unwrap_or_default()
            );
        }
        OutputFormat::Pretty => {
            println!("{}", style("OCR extraction").green().bold());
            println!("  Combined text: {}", extraction.combined_text);
            for (name, diagnostic) in &extraction.field_diagnostics {
                println!(
                    "  {:<12} value={:?} status={:?} confidence={:.2}",
                    name, diagnostic.value, diagnostic.status, diagnostic.confidence
                );
            }
        }
    }
    Ok(())
}

fn report_failure(error: &LabelError, output: OutputFormat) {
    match output {
        OutputFormat::Json => {
            let body = serde_json::json!({
                "errorKind": error.kind(),
                "message": error.to_string(),
            });
            eprintln!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
        }
        OutputFormat::Pretty => {
            eprintln!("{} {}", style("Decode failed:").red().bold(), error);
        }
    }
}
