//! wiregen - Compile message-schema ASTs into wire-format accessor source
//!
//! This tool reads a schema AST serialized as JSON (the schema parser's
//! output format), compiles it, and writes the generated read/write
//! accessor source to a file or stdout.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;
use wiregen_core::{compile, compile_raw, CompileOptions, Schema};

/// Compile message-schema ASTs into wire-format accessor source
#[derive(Parser, Debug)]
#[command(name = "wiregen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the schema AST (JSON) produced by the schema parser
    #[arg(short, long)]
    input: PathBuf,

    /// Output file for the generated source (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress read-function generation
    #[arg(long)]
    no_read: bool,

    /// Suppress write-function generation
    #[arg(long)]
    no_write: bool,

    /// Symbol under which top-level types are exported
    #[arg(long, default_value = "exports")]
    exports: String,

    /// Emit the evaluable module body instead of the raw unit
    #[arg(long, conflicts_with_all = ["no_read", "no_write", "exports"])]
    wrapped: bool,

    /// Overwrite an existing output file
    #[arg(long)]
    force: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .init();

    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    if !cli.input.exists() {
        bail!("Input file does not exist: {}", cli.input.display());
    }

    let data = fs::read_to_string(&cli.input)
        .with_context(|| format!("Failed to read input file: {}", cli.input.display()))?;
    let schema: Schema = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse schema AST: {}", cli.input.display()))?;

    debug!(
        "parsed schema: {} top-level messages, {} top-level enums",
        schema.messages.len(),
        schema.enums.len()
    );

    let source = if cli.wrapped {
        compile(&schema)
            .with_context(|| format!("Failed to compile schema: {}", cli.input.display()))?
            .into_source()
    } else {
        let options = CompileOptions::new()
            .no_read(cli.no_read)
            .no_write(cli.no_write)
            .exports(cli.exports.clone());
        compile_raw(&schema, &options)
            .with_context(|| format!("Failed to compile schema: {}", cli.input.display()))?
    };

    match &cli.output {
        Some(path) => {
            write_output(path, &source, cli.force)?;
            println!("Wrote {}", path.display());
        }
        None => print!("{source}"),
    }

    Ok(())
}

/// Write the generated source to disk, refusing to overwrite without --force
fn write_output(output_path: &Path, content: &str, force: bool) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    if output_path.exists() && !force {
        bail!(
            "File already exists: {} (use --force to overwrite)",
            output_path.display()
        );
    }

    let mut file = fs::File::create(output_path)
        .with_context(|| format!("Failed to create file: {}", output_path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write file: {}", output_path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_schema(dir: &TempDir, json: &str) -> PathBuf {
        let path = dir.path().join("schema.json");
        fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn test_compile_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_schema(
            &temp_dir,
            r#"{"messages": [{"name": "Point", "fields": [
                {"name": "x", "tag": 1, "type": "sint32"}
            ]}]}"#,
        );
        let output = temp_dir.path().join("out").join("point.js");

        let cli = Cli::parse_from([
            "wiregen",
            "--input",
            input.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ]);
        run(&cli).unwrap();

        let source = fs::read_to_string(&output).unwrap();
        assert!(source.starts_with("'use strict';\n"));
        assert!(source.contains("var Point = exports.Point = {};"));

        // a second run without --force refuses to overwrite
        assert!(run(&cli).is_err());

        let cli = Cli::parse_from([
            "wiregen",
            "--input",
            input.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
            "--force",
        ]);
        run(&cli).unwrap();
    }

    #[test]
    fn test_wrapped_output() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_schema(&temp_dir, r#"{"messages": [{"name": "M"}]}"#);
        let output = temp_dir.path().join("m.js");

        let cli = Cli::parse_from([
            "wiregen",
            "--input",
            input.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
            "--wrapped",
        ]);
        run(&cli).unwrap();

        let source = fs::read_to_string(&output).unwrap();
        assert!(source.starts_with("var exports = {};\n"));
        assert!(source.ends_with("return exports;\n"));
    }

    #[test]
    fn test_missing_input_fails() {
        let cli = Cli::parse_from(["wiregen", "--input", "/nonexistent/schema.json"]);
        assert!(run(&cli).is_err());
    }

    #[test]
    fn test_invalid_schema_fails() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_schema(&temp_dir, "not json");
        let cli = Cli::parse_from(["wiregen", "--input", input.to_str().unwrap()]);
        assert!(run(&cli).is_err());
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
