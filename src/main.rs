//! asset-manifest CLI - write manifests for content-hashed build outputs
//!
//! Usage: asset-manifest <COMMAND>
//!
//! Commands:
//!   write      Resolve a build's metafile into a manifest and persist it
//!   templates  Print the naming templates the bundler must be configured with

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

use asset_manifest::{
    JsonManifestRepository, Manifest, ManifestBuilder, ManifestOptions, MetafileReader, Side,
};

/// asset-manifest - write manifests for content-hashed build outputs
#[derive(Parser, Debug)]
#[command(name = "asset-manifest")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output format for CI
    #[arg(long, global = true)]
    json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve a build's metafile into a manifest and persist it
    Write(WriteArgs),

    /// Print the naming templates the bundler must be configured with
    Templates {
        /// Options file (default: ./asset-manifest.toml, then the user config)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory relative paths are resolved against
        #[arg(long)]
        cwd: Option<PathBuf>,

        /// Request unhashed output names
        #[arg(long)]
        no_hash: bool,

        /// Entry naming template to start from
        #[arg(long)]
        entry_names: Option<String>,

        /// Asset naming template to start from
        #[arg(long)]
        asset_names: Option<String>,
    },
}

#[derive(Args, Debug)]
struct WriteArgs {
    /// Metafile or build-result JSON written by the bundler
    #[arg(short, long)]
    metafile: PathBuf,

    /// Directory the metafile's paths are relative to
    #[arg(long)]
    cwd: Option<PathBuf>,

    /// Options file (default: ./asset-manifest.toml, then the user config)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bundler output directory
    #[arg(long)]
    outdir: Option<String>,

    /// Bundler single output file (used when there is no outdir)
    #[arg(long)]
    outfile: Option<String>,

    /// Manifest file name inside the output directory
    #[arg(long)]
    filename: Option<String>,

    /// Merge into an existing manifest instead of replacing it
    #[arg(long)]
    append: bool,

    /// Outputs were built without hashes in their names
    #[arg(long)]
    no_hash: bool,

    /// Drop directories: true, false, input or output
    #[arg(long, value_name = "SIDE")]
    short_names: Option<Side>,

    /// Drop extensions: true, false, input or output
    #[arg(long, value_name = "SIDE")]
    extensionless: Option<Side>,

    /// Strip the output directory: true, false, input or output
    #[arg(long, value_name = "SIDE")]
    relative: Option<Side>,

    /// Key entries by their declared entry point
    #[arg(long)]
    use_entrypoint_keys: bool,

    /// Only record output paths matching this regex
    #[arg(long)]
    filter: Option<String>,

    /// Entry naming template the bundler used
    #[arg(long)]
    entry_names: Option<String>,

    /// Asset naming template the bundler used
    #[arg(long)]
    asset_names: Option<String>,

    /// Document layout written to disk
    #[arg(long, value_enum, default_value_t = Shape::Entries)]
    shape: Shape,
}

/// Layout of the written manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Shape {
    /// key -> {file, source, etag, integrity}
    Entries,
    /// key -> file
    Paths,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Write(args) => cmd_write(args, cli.json),
        Commands::Templates {
            config,
            cwd,
            no_hash,
            entry_names,
            asset_names,
        } => cmd_templates(config, cwd, no_hash, entry_names, asset_names, cli.json),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn working_dir(cwd: Option<PathBuf>) -> Result<PathBuf> {
    match cwd {
        Some(dir) => Ok(dir),
        None => std::env::current_dir().context("cannot determine the working directory"),
    }
}

fn load_options(config: Option<&Path>, cwd: &Path) -> Result<ManifestOptions> {
    let (options, warnings, used) =
        ManifestOptions::discover(config, cwd).context("failed to load options")?;
    if let Some(path) = used {
        tracing::info!(config = %path.display(), warnings = warnings.len(), "using options file");
    }
    Ok(options)
}

fn cmd_write(args: WriteArgs, json: bool) -> Result<()> {
    let cwd = working_dir(args.cwd)?;
    let mut options = load_options(args.config.as_deref(), &cwd)?;

    // CLI flags win over files and environment.
    if args.append {
        options.append = true;
    }
    if args.no_hash {
        options.hash = false;
    }
    if args.use_entrypoint_keys {
        options.use_entrypoint_keys = true;
    }
    if let Some(side) = args.short_names {
        options.short_names = side;
    }
    if let Some(side) = args.extensionless {
        options.extensionless = side;
    }
    if let Some(side) = args.relative {
        options.relative = side;
    }
    if let Some(filename) = args.filename {
        options.filename = filename;
    }
    if args.filter.is_some() {
        options.filter = args.filter;
    }
    if args.entry_names.is_some() {
        options.entry_names = args.entry_names;
    }
    if args.asset_names.is_some() {
        options.asset_names = args.asset_names;
    }
    if args.outdir.is_some() {
        options.outdir = args.outdir;
    }
    if args.outfile.is_some() {
        options.outfile = args.outfile;
    }

    options.validate()?;
    let policy = options.naming_policy()?;
    let (entry_names, asset_names) = options.templates()?;

    let mut build = MetafileReader::new(&cwd).load(&args.metafile, entry_names, asset_names)?;
    if let Some(outdir) = &options.outdir {
        build = build.with_outdir(outdir);
    }
    if let Some(outfile) = &options.outfile {
        build = build.with_outfile(outfile);
    }
    for error in build.errors() {
        eprintln!("error: {}", error);
    }

    let repo = JsonManifestRepository::with_lock_timeout(options.lock_timeout());
    let mut builder = ManifestBuilder::new(repo, policy)?
        .with_filename(options.filename.clone())
        .with_append(options.append)
        .with_working_dir(&cwd);
    if let Some(filter) = options.filter_regex()? {
        builder = builder.with_filter(move |path| filter.is_match(path));
    }
    if args.shape == Shape::Paths {
        builder = builder.with_generate(paths_document);
    }

    let outcome = builder.run(&build)?;

    if json {
        let output = json!({
            "manifest": outcome.path.display().to_string(),
            "entries": outcome.manifest.len(),
            "append": options.append,
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!(
            "Wrote {} entries to {}",
            outcome.manifest.len(),
            outcome.path.display()
        );
    }
    Ok(())
}

fn cmd_templates(
    config: Option<PathBuf>,
    cwd: Option<PathBuf>,
    no_hash: bool,
    entry_names: Option<String>,
    asset_names: Option<String>,
    json: bool,
) -> Result<()> {
    let cwd = working_dir(cwd)?;
    let mut options = load_options(config.as_deref(), &cwd)?;
    if no_hash {
        options.hash = false;
    }
    if entry_names.is_some() {
        options.entry_names = entry_names;
    }
    if asset_names.is_some() {
        options.asset_names = asset_names;
    }

    let (entry, asset) = options.templates()?;

    if json {
        let output = json!({
            "entryNames": entry.as_str(),
            "assetNames": asset.as_str(),
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("entryNames = {}", entry);
        println!("assetNames = {}", asset);
    }
    Ok(())
}

/// `key -> file` layout for `--shape paths`
fn paths_document(manifest: &Manifest) -> Value {
    Value::Object(
        manifest
            .iter()
            .map(|(key, entry)| (key.to_string(), Value::String(entry.file().to_string())))
            .collect(),
    )
}
