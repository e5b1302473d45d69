use clap::Parser;
use dynamic_wallpaper_importer::importer::ImporterRegistry;
use dynamic_wallpaper_importer::package::{PackageOptions, PackageWriter, Quality};
use dynamic_wallpaper_importer::{config, output};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "dynamic-wallpaper-importer")]
#[command(about = "Convert HEIF dynamic wallpapers into wallpaper packages")]
#[command(long_about = "\
Convert HEIF dynamic wallpapers into wallpaper packages

Reads a multi-image HEIF file with a solar or time-of-day schedule and writes
a package the dynamic wallpaper plugin can load:

  <target>/<id>/
  ├── metadata.json                # Id, name, type, preview, per-frame schedule
  └── contents/images/
      ├── 0.png .. N-1.png         # Frames in container order
      └── preview.png              # Left half midnight, right half noon

Re-running with the same id replaces the package.

Run with --print-config to see a documented config file.")]
#[command(version = version_string())]
struct Cli {
    /// HEIF file to import
    #[arg(long, required_unless_present = "print_config")]
    source: Option<PathBuf>,

    /// Package id, also the package directory name
    #[arg(long, required_unless_present = "print_config")]
    id: Option<String>,

    /// Human-readable wallpaper name
    #[arg(long, required_unless_present = "print_config")]
    label: Option<String>,

    /// Image format for frames and preview (overrides config)
    #[arg(long)]
    format: Option<String>,

    /// Directory the package is created in [default: current directory]
    #[arg(long)]
    target: Option<PathBuf>,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print a stock config file with all options documented
    #[arg(long)]
    print_config: bool,

    /// Log debug details
    #[arg(long, short)]
    verbose: bool,
}

/// `RUST_LOG` wins when set and parseable; otherwise `info`, or `debug`
/// with `--verbose`.
fn log_filter(rust_log: Option<&str>, verbose: bool) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(if verbose { "debug" } else { "info" }))
}

fn init_tracing(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter(rust_log.as_deref(), verbose))
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    init_tracing(cli.verbose);

    let (Some(source), Some(id), Some(label)) = (cli.source, cli.id, cli.label) else {
        return Err("--source, --id and --label are required".into());
    };

    let mut settings = config::load_config(cli.config.as_deref())?;
    if let Some(format) = cli.format {
        settings.output.format = format;
    }
    debug!(
        format = %settings.output.format,
        quality = settings.output.quality,
        "resolved output settings"
    );

    let writer = PackageWriter::new(PackageOptions {
        id: id.clone(),
        name: label,
        format: settings.output.format,
        quality: Quality::new(settings.output.quality),
    })?;

    let registry = ImporterRegistry::with_default_importers();
    let wallpaper = registry.load(&source)?;
    output::print_import_output(&wallpaper, &source);

    let summary = writer.write(wallpaper, cli.target.as_deref())?;
    output::print_package_output(&id, &summary);

    Ok(())
}
