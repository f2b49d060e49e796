use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};

use catalog_import::{ImportConfig, ImportError, ImportReport, ImportRunner, Lookups, RawRecord};
use catalog_infra::{CatalogSnapshot, InMemoryCatalog};

#[derive(Parser, Debug)]
#[command(name = "catalog-import", version, about = "Reconcile import records into a catalog snapshot")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import product and variant records
    Products(RunArgs),
    /// Import cross-sell association records
    Associations(RunArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Catalog snapshot (JSON) to import into
    #[arg(long)]
    catalog: PathBuf,
    /// Records, one JSON object per line
    #[arg(long)]
    records: PathBuf,
    /// Optional JSON config; CATALOG_IMPORT_* variables are applied on top
    #[arg(long)]
    config: Option<PathBuf>,
    /// Where to write the updated snapshot (defaults to --catalog)
    #[arg(long)]
    out: Option<PathBuf>,
    /// Reconcile without writing the snapshot
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    catalog_observability::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Products(args) => run(&args, |runner, records| runner.run_products(records)),
        Command::Associations(args) => {
            run(&args, |runner, records| runner.run_associations(records))
        }
    }
}

fn run<F>(args: &RunArgs, pipeline: F) -> Result<()>
where
    F: FnOnce(&ImportRunner<'_>, Vec<RawRecord>) -> Result<ImportReport, ImportError>,
{
    let config = load_config(args.config.as_deref())?;
    let catalog = load_catalog(&args.catalog)?;
    let records = load_records(&args.records)?;
    info!(records = records.len(), catalog = %args.catalog.display(), "starting import");

    let runner = ImportRunner::new(Lookups::from_catalog(&catalog), &catalog, &catalog, config);
    let result = pipeline(&runner, records);

    // Records applied before a fatal error stay applied.
    if !args.dry_run {
        let out = args.out.as_deref().unwrap_or(&args.catalog);
        write_catalog(&catalog, out)?;
    }

    match result {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Err(err) => {
            error!(error = %err, "import aborted");
            bail!("import aborted: {err}")
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<ImportConfig> {
    let config = match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))?
        }
        None => ImportConfig::default(),
    };
    Ok(config.with_overrides(|key| std::env::var(key).ok()))
}

fn load_catalog(path: &Path) -> Result<InMemoryCatalog> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading catalog {}", path.display()))?;
    let snapshot: CatalogSnapshot = serde_json::from_str(&raw)
        .with_context(|| format!("parsing catalog {}", path.display()))?;
    InMemoryCatalog::from_snapshot(snapshot).context("loading catalog snapshot")
}

fn write_catalog(catalog: &InMemoryCatalog, path: &Path) -> Result<()> {
    let snapshot = catalog.snapshot().context("reading catalog snapshot")?;
    let json = serde_json::to_string_pretty(&snapshot)?;
    fs::write(path, json).with_context(|| format!("writing catalog {}", path.display()))
}

fn load_records(path: &Path) -> Result<Vec<RawRecord>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading records {}", path.display()))?;
    parse_records(&raw).with_context(|| format!("parsing records {}", path.display()))
}

/// JSON lines; blank lines are ignored.
fn parse_records(input: &str) -> Result<Vec<RawRecord>> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).with_context(|| format!("line {}", idx + 1))
        })
        .collect()
}
