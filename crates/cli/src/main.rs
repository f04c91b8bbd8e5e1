//! `fxml`: parse, check, and format fxml markup files.

mod render;

use std::fs;
use std::io::{self, Read};
use std::process;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use fxml_core::{
    DEFAULT_MAX_DEPTH, Document, EmitConfig, ParseOptions, TrailingContent, emit_fxml, emit_xml,
    parse_collecting, to_pretty_json,
};
use fxml_diagnostics::{Diagnostic, Severity};
use serde::Serialize;

use crate::render::{Format, print_summary, render_diagnostics};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "fxml",
    version,
    about = "fxml toolchain: parse, check, and format fxml markup files"
)]
struct Cli {
    /// Diagnostic output: "plain" for the caret formatter, "pretty" for
    /// coloured reports, "json" for machine-readable JSON. Defaults to
    /// "pretty" when stderr is a TTY, "plain" otherwise.
    #[arg(long, global = true, value_parser = ["plain", "pretty", "json"])]
    output: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Parse an fxml file and print its tree.
    Parse {
        /// Input file, or `-` for standard input.
        file: String,
        #[command(flatten)]
        parse: ParseFlags,
        /// Output representation of the tree.
        #[arg(long, value_enum, default_value_t = EmitFormat::Json)]
        emit: EmitFormat,
        /// Spaces per nesting level for xml/fxml output (0 = single line).
        #[arg(long, default_value_t = 2)]
        indent: usize,
    },

    /// Syntax-check an fxml file.
    Check {
        /// Input file, or `-` for standard input.
        file: String,
        #[command(flatten)]
        parse: ParseFlags,
    },

    /// Format an fxml file (canonical quoting, one child per line).
    Format {
        /// Input file, or `-` for standard input (not with `--write`).
        file: String,
        #[command(flatten)]
        parse: ParseFlags,
        /// Write formatted output back to the file (in-place).
        #[arg(long, short, conflicts_with = "check")]
        write: bool,
        /// Check if the file is already formatted (exit 1 if not). For CI.
        #[arg(long, conflicts_with = "write")]
        check: bool,
        /// Spaces per nesting level (0 = single line).
        #[arg(long, default_value_t = 2)]
        indent: usize,
    },
}

/// Parser options shared by every subcommand.
#[derive(Args, Debug, Clone)]
struct ParseFlags {
    /// What to do with input after the root element.
    #[arg(long, value_enum, default_value_t = TrailingMode::Ignore)]
    trailing: TrailingMode,
    /// Warn when an attribute name repeats within one element.
    #[arg(long)]
    warn_duplicates: bool,
    /// Deepest element nesting accepted.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

impl ParseFlags {
    fn options(&self, file: &str) -> ParseOptions {
        ParseOptions::new()
            .with_source_name(display_name(file))
            .with_trailing(self.trailing.into())
            .with_duplicate_attribute_warnings(self.warn_duplicates)
            .with_max_depth(self.max_depth)
    }
}

/// Handling of trailing input for `--trailing`.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum TrailingMode {
    /// Stop at the end of the root element.
    Ignore,
    /// Warn about trailing content.
    Warn,
    /// Reject trailing content.
    Error,
}

impl From<TrailingMode> for TrailingContent {
    fn from(m: TrailingMode) -> Self {
        match m {
            TrailingMode::Ignore => TrailingContent::Ignore,
            TrailingMode::Warn => TrailingContent::Warn,
            TrailingMode::Error => TrailingContent::Error,
        }
    }
}

/// Tree representation for `parse --emit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EmitFormat {
    /// The tree as JSON.
    Json,
    /// XML-like markup.
    Xml,
    /// fxml surface syntax.
    Fxml,
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    let format = Format::resolve_or_detect(cli.output.as_deref());
    log::debug!("diagnostic format: {format:?}");

    match cli.cmd {
        Cmd::Parse {
            file,
            parse,
            emit,
            indent,
        } => cmd_parse(&file, &parse, emit, indent, format)?,
        Cmd::Check { file, parse } => cmd_check(&file, &parse, format)?,
        Cmd::Format {
            file,
            parse,
            write,
            check,
            indent,
        } => cmd_format(&file, &parse, write, check, indent, format)?,
    }

    Ok(())
}

// ── Commands ────────────────────────────────────────────────────────────

/// JSON envelope for `parse --output json`.
#[derive(Serialize)]
struct ParseOutput<'a> {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    document: Option<serde_json::Value>,
    diagnostics: &'a [Diagnostic],
}

fn cmd_parse(
    file: &str,
    flags: &ParseFlags,
    emit: EmitFormat,
    indent: usize,
    format: Format,
) -> Result<()> {
    let input = read_source(file)?;
    let (result, diagnostics) = parse_collecting(&input, &flags.options(file));
    let emitted = result.as_ref().ok().map(|doc| render_document(doc, emit, indent));

    match format {
        Format::Json => {
            // Single valid JSON object to stdout.
            let document = match (&result, emitted) {
                (Ok(doc), _) if emit == EmitFormat::Json => Some(serde_json::to_value(doc)?),
                (_, text) => text.map(serde_json::Value::String),
            };
            let out = ParseOutput {
                ok: result.is_ok(),
                document,
                diagnostics: &diagnostics,
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Plain | Format::Pretty => {
            // Tree to stdout, diagnostics to stderr.
            if let Some(text) = emitted {
                print!("{text}");
            }
            render_diagnostics(&input, display_name(file), &diagnostics, format);
            print_summary(&diagnostics, format);
        }
    }

    exit_on_errors(&diagnostics);
    Ok(())
}

fn cmd_check(file: &str, flags: &ParseFlags, format: Format) -> Result<()> {
    let input = read_source(file)?;
    let (result, diagnostics) = parse_collecting(&input, &flags.options(file));

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "ok": result.is_ok(),
                "diagnostics": diagnostics,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Plain | Format::Pretty => {
            render_diagnostics(&input, display_name(file), &diagnostics, format);
            print_summary(&diagnostics, format);
            if result.is_ok() {
                eprintln!("ok");
            }
        }
    }

    exit_on_errors(&diagnostics);
    Ok(())
}

fn cmd_format(
    file: &str,
    flags: &ParseFlags,
    write: bool,
    check: bool,
    indent: usize,
    format: Format,
) -> Result<()> {
    if write && file == "-" {
        anyhow::bail!("--write needs a file path, not standard input");
    }
    let input = read_source(file)?;
    let (result, diagnostics) = parse_collecting(&input, &flags.options(file));

    // Surface parse diagnostics so the user knows if the input has issues.
    if !diagnostics.is_empty() {
        render_diagnostics(&input, display_name(file), &diagnostics, format);
        print_summary(&diagnostics, format);
    }
    let Ok(doc) = result else {
        process::exit(1);
    };

    let formatted = emit_fxml(&doc, &emit_config(indent));
    let already_formatted = formatted == input;

    if check {
        status_message(
            format,
            "check",
            already_formatted,
            "already formatted",
            "not formatted",
            file,
        );
        if !already_formatted {
            process::exit(1);
        }
    } else if write {
        if !already_formatted {
            fs::write(file, &formatted).with_context(|| format!("failed to write '{file}'"))?;
        }
        status_message(
            format,
            "write",
            !already_formatted,
            "formatted",
            "already formatted",
            file,
        );
    } else {
        // Default: print formatted output to stdout.
        print!("{formatted}");
    }

    Ok(())
}

/// Emit a status message for --check / --write in the appropriate format.
fn status_message(
    format: Format,
    mode: &str,
    condition: bool,
    if_true: &str,
    if_false: &str,
    file: &str,
) {
    let msg = if condition { if_true } else { if_false };
    match format {
        Format::Json => {
            let out = serde_json::json!({ "mode": mode, "status": msg, "file": file });
            println!(
                "{}",
                serde_json::to_string_pretty(&out).expect("status JSON serialization cannot fail")
            );
        }
        Format::Plain | Format::Pretty => {
            eprintln!("{msg}: {file}");
        }
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────

fn emit_config(indent: usize) -> EmitConfig {
    if indent == 0 {
        EmitConfig::default()
    } else {
        EmitConfig::indented(indent)
    }
}

fn render_document(doc: &Document, emit: EmitFormat, indent: usize) -> String {
    match emit {
        EmitFormat::Json => format!("{}\n", to_pretty_json(doc)),
        EmitFormat::Xml => emit_xml(doc, &emit_config(indent)),
        EmitFormat::Fxml => emit_fxml(doc, &emit_config(indent)),
    }
}

/// Name shown in diagnostics for `file`.
fn display_name(file: &str) -> &str {
    if file == "-" { "<stdin>" } else { file }
}

/// Read the input file, or standard input for `-`.
fn read_source(file: &str) -> Result<String> {
    if file == "-" {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("failed to read standard input")?;
        return Ok(input);
    }
    fs::read_to_string(file).with_context(|| format!("failed to read '{file}'"))
}

/// Exit with code 1 if any diagnostic is an error.
/// Warnings do not cause a non-zero exit.
fn exit_on_errors(diagnostics: &[Diagnostic]) {
    if diagnostics
        .iter()
        .any(|d| matches!(d.severity, Severity::Error))
    {
        process::exit(1);
    }
}
