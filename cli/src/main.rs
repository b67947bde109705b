//! docparse CLI - document extraction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docparse::render::{to_json, to_json_array};
use docparse::{DecodeErrorPolicy, ExtractionEngine, ExtractionResult, JsonFormat, ProcessingOptions};

#[derive(Parser)]
#[command(name = "docparse")]
#[command(author = "DocParse Team")]
#[command(version)]
#[command(about = "Extract PDF, TXT and DOCX documents to paginated JSON", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Input documents
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    #[command(flatten)]
    extract: ExtractArgs,

    /// Output compact JSON
    #[arg(long, env = "DOCPARSE_COMPACT")]
    compact: bool,

    /// Output file (stdout if not specified)
    #[arg(short, long, value_name = "FILE", env = "DOCPARSE_OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Clone)]
struct ExtractArgs {
    /// Maximum number of pages to extract (0 means no limit)
    #[arg(long, value_name = "N", env = "DOCPARSE_MAX_PAGES")]
    max_pages: Option<usize>,

    /// Skip table detection for PDF files
    #[arg(long, env = "DOCPARSE_NO_TABLES")]
    no_tables: bool,

    /// Text encoding label for TXT files
    #[arg(long, value_name = "LABEL", default_value = "utf-8", env = "DOCPARSE_ENCODING")]
    encoding: String,

    /// What to do with undecodable bytes in TXT files
    #[arg(long, value_enum, default_value = "ignore", env = "DOCPARSE_ERRORS")]
    errors: ErrorMode,
}

impl ExtractArgs {
    fn to_options(&self) -> ProcessingOptions {
        let mut options = ProcessingOptions::new()
            .with_tables(!self.no_tables)
            .with_encoding(self.encoding.clone())
            .with_error_handling(self.errors.into());
        if let Some(max) = self.max_pages {
            options = options.with_max_pages(max);
        }
        options
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List supported document formats
    Formats {
        /// Print as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Show a summary of a document's extraction
    Info {
        /// Input document
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ErrorMode {
    /// Drop undecodable bytes
    Ignore,
    /// Fail on the first undecodable byte
    Strict,
    /// Substitute U+FFFD for undecodable bytes
    Replace,
}

impl From<ErrorMode> for DecodeErrorPolicy {
    fn from(mode: ErrorMode) -> Self {
        match mode {
            ErrorMode::Ignore => DecodeErrorPolicy::Ignore,
            ErrorMode::Strict => DecodeErrorPolicy::Strict,
            ErrorMode::Replace => DecodeErrorPolicy::Replace,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Formats { json }) => cmd_formats(json),
        Some(Commands::Info { input, extract }) => cmd_info(&input, &extract.to_options()),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            if cli.files.is_empty() {
                println!("{}", "Usage: docparse [OPTIONS] <FILE>...".yellow());
                println!("       docparse --help for more information");
                Ok(())
            } else {
                let format = if cli.compact {
                    JsonFormat::Compact
                } else {
                    JsonFormat::Pretty
                };
                cmd_extract(
                    &cli.files,
                    &cli.extract.to_options(),
                    format,
                    cli.output.as_deref(),
                )
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Extract every file and print or save the JSON. Fails if any file failed.
fn cmd_extract(
    files: &[PathBuf],
    options: &ProcessingOptions,
    format: JsonFormat,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    log::debug!("Extracting {} file(s) with {:?}", files.len(), options);

    let engine = ExtractionEngine::new();
    let results = extract_all(&engine, files, options)?;

    let json = if let [single] = results.as_slice() {
        to_json(single, format)?
    } else {
        to_json_array(&results, format)?
    };

    if let Some(path) = output {
        fs::write(path, &json)?;
        eprintln!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    let failures: Vec<&ExtractionResult> = results.iter().filter(|r| !r.success).collect();
    for failure in &failures {
        eprintln!(
            "{} {}: {}",
            "Failed".red(),
            failure.metadata.filename,
            failure.error_message.as_deref().unwrap_or_default()
        );
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(format!("{} of {} file(s) failed", failures.len(), results.len()).into())
    }
}

/// Run the engine over all files, with a progress bar when there are several.
fn extract_all(
    engine: &ExtractionEngine,
    files: &[PathBuf],
    options: &ProcessingOptions,
) -> Result<Vec<ExtractionResult>, Box<dyn std::error::Error>> {
    if files.len() == 1 {
        return Ok(vec![engine.extract(&files[0], options)]);
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut results = Vec::with_capacity(files.len());
    for file in files {
        pb.set_message(file.display().to_string());
        results.push(engine.extract(file, options));
        pb.inc(1);
    }
    pb.finish_with_message("Done!");

    Ok(results)
}

fn cmd_formats(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let formats = docparse::supported_formats();

    if json {
        println!("{}", serde_json::to_string(&formats)?);
    } else {
        println!("{}", "Supported formats".cyan().bold());
        for (i, ext) in formats.iter().enumerate() {
            let branch = if i + 1 == formats.len() { "└─" } else { "├─" };
            println!("  {} .{}", branch.dimmed(), ext);
        }
    }

    Ok(())
}

fn cmd_info(input: &Path, options: &ProcessingOptions) -> Result<(), Box<dyn std::error::Error>> {
    let result = ExtractionEngine::new().extract(input, options);
    let meta = &result.metadata;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Type".bold(), meta.document_type);
    println!("{}: {} bytes", "Size".bold(), meta.file_size);
    println!("{}: {}", "Method".bold(), meta.extraction_method);
    println!("{}: {}", "Extracted at".bold(), meta.extraction_timestamp);
    println!("{}: {:.3}s", "Time".bold(), meta.processing_time);

    if !result.success {
        return Err(result
            .error_message
            .unwrap_or_else(|| "extraction failed".to_string())
            .into());
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!(
        "{}: {} of {}",
        "Pages".bold(),
        meta.pages_processed,
        meta.total_pages
    );
    println!("{}: {}", "Words".bold(), result.total_words());
    println!("{}: {}", "Characters".bold(), result.total_characters());
    println!("{}: {}", "Tables".bold(), result.total_tables());

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docparse".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Document extraction tool (library {})", docparse::version());
    println!();
    println!("Formats: {}", docparse::supported_formats().join(", ").dimmed());
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_files_and_options() {
        let cli = Cli::try_parse_from([
            "docparse",
            "a.pdf",
            "b.txt",
            "--max-pages",
            "3",
            "--no-tables",
            "--encoding",
            "latin1",
            "--errors",
            "replace",
            "--compact",
        ])
        .unwrap();

        assert_eq!(cli.files.len(), 2);
        assert!(cli.compact);

        let options = cli.extract.to_options();
        assert_eq!(options.max_pages, Some(3));
        assert!(!options.extract_tables);
        assert_eq!(options.encoding, "latin1");
        assert_eq!(options.error_handling, DecodeErrorPolicy::Replace);
    }

    #[test]
    fn test_defaults_match_library() {
        let cli = Cli::try_parse_from(["docparse", "a.pdf"]).unwrap();
        assert_eq!(cli.extract.to_options(), ProcessingOptions::default());
    }

    #[test]
    fn test_subcommands() {
        let cli = Cli::try_parse_from(["docparse", "formats", "--json"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Formats { json: true })));

        let cli = Cli::try_parse_from(["docparse", "info", "doc.docx", "--max-pages", "1"]).unwrap();
        match cli.command {
            Some(Commands::Info { input, extract }) => {
                assert_eq!(input, PathBuf::from("doc.docx"));
                assert_eq!(extract.max_pages, Some(1));
            }
            _ => panic!("expected info subcommand"),
        }
    }

    #[test]
    fn test_invalid_error_mode_rejected() {
        assert!(Cli::try_parse_from(["docparse", "a.txt", "--errors", "loud"]).is_err());
    }

    #[test]
    fn test_extract_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.txt");
        let mut file = fs::File::create(&input).unwrap();
        file.write_all(b"first\x0csecond").unwrap();

        let output = dir.path().join("out.json");
        cmd_extract(
            &[input],
            &ProcessingOptions::default(),
            JsonFormat::Compact,
            Some(&output),
        )
        .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(value["success"], serde_json::json!(true));
        assert_eq!(value["pages"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_extract_fails_when_any_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("ok.txt");
        fs::write(&good, "fine").unwrap();
        let missing = dir.path().join("missing.pdf");

        let output = dir.path().join("out.json");
        let result = cmd_extract(
            &[good, missing],
            &ProcessingOptions::default(),
            JsonFormat::Pretty,
            Some(&output),
        );
        assert!(result.is_err());

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
        assert_eq!(value[1]["error_message"], "File not found");
    }
}
