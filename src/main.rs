// ABOUTME: Main entry point for the udl-export program.
// ABOUTME: Provides CLI interface and executes exports from the library.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use udl_export::errors::ExportError;
use udl_export::{AssignmentRecord, Config, VersionKey};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export one version to a Word document
    Docx(VersionExportArgs),

    /// Export one version to a paginated PDF
    Pdf(VersionExportArgs),

    /// Export one version to a PowerPoint presentation
    Pptx(VersionExportArgs),

    /// Export all versions to a single Excel workbook
    Xlsx(WorkbookExportArgs),
}

#[derive(Args)]
struct VersionExportArgs {
    /// Path to the assignment record JSON
    #[arg(short, long)]
    input: PathBuf,

    /// Version to export (simplified, on_level, enriched, visual_heavy, scaffolded)
    #[arg(short, long)]
    version: String,

    /// Output directory (defaults to the configured output directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Override the artifact filename prefix
    #[arg(long)]
    prefix: Option<String>,
}

#[derive(Args)]
struct WorkbookExportArgs {
    /// Path to the assignment record JSON
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory (defaults to the configured output directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Override the artifact filename prefix
    #[arg(long)]
    prefix: Option<String>,
}

fn load_record(path: &PathBuf) -> anyhow::Result<AssignmentRecord> {
    if !path.exists() {
        return Err(ExportError::PathNotFoundError(path.clone()).into());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read assignment record {:?}", path))?;
    let record: AssignmentRecord = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse assignment record {:?}", path))?;
    Ok(record)
}

fn parse_version(s: &str) -> anyhow::Result<VersionKey> {
    VersionKey::parse(s).ok_or_else(|| ExportError::UnknownVersionKey(s.to_string()).into())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = Config::from_env();

    let written = match &cli.command {
        Commands::Docx(args) => {
            let record = load_record(&args.input)?;
            let version = parse_version(&args.version)?;
            let output = args.output.clone().unwrap_or_else(|| config.default_output_dir.clone());
            udl_export::export_docx(
                &record.materials,
                &record.form_data,
                version,
                &output,
                &config.get_export_options(args.prefix.clone()),
            )?
        }
        Commands::Pdf(args) => {
            let record = load_record(&args.input)?;
            let version = parse_version(&args.version)?;
            let output = args.output.clone().unwrap_or_else(|| config.default_output_dir.clone());
            udl_export::export_pdf(
                &record.materials,
                &record.form_data,
                version,
                &output,
                &config.get_export_options(args.prefix.clone()),
            )?
        }
        Commands::Pptx(args) => {
            let record = load_record(&args.input)?;
            let version = parse_version(&args.version)?;
            let output = args.output.clone().unwrap_or_else(|| config.default_output_dir.clone());
            udl_export::export_pptx(
                &record.materials,
                &record.form_data,
                version,
                &output,
                &config.get_export_options(args.prefix.clone()),
            )?
        }
        Commands::Xlsx(args) => {
            let record = load_record(&args.input)?;
            let output = args.output.clone().unwrap_or_else(|| config.default_output_dir.clone());
            udl_export::export_all_xlsx(
                &record.materials,
                &record.form_data,
                &output,
                &config.get_export_options(args.prefix.clone()),
            )?
        }
    };

    println!("Exported: {}", written.display());
    Ok(())
}
