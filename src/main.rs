use clap::{Parser, Subcommand};
use festsite::{config, data, discover, generate, manifest, output, process};
use std::path::PathBuf;

/// Shared flags for commands that encode images.
#[derive(clap::Args, Clone)]
struct CacheArgs {
    /// Disable the encode cache — force re-encoding of all images
    #[arg(long)]
    no_cache: bool,
}

fn version_string() -> &'static str {
    let hash = env!("GIT_HASH");
    if hash.is_empty() {
        env!("CARGO_PKG_VERSION")
    } else {
        // Leaked once at startup — trivial, called exactly once
        Box::leak(format!("{} ({hash})", env!("CARGO_PKG_VERSION")).into_boxed_str())
    }
}

#[derive(Parser)]
#[command(name = "festsite")]
#[command(about = "Static site generator for campus festival microsites")]
#[command(long_about = "\
Static site generator for campus festival microsites

Your filesystem is the data source. Photos dropped into the gallery
directory are discovered, verified, and laid out automatically; rosters
and results live in TOML tables; long-form documents are markdown.

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  ├── events.toml                  # Event roster (optional)
  ├── committee.toml               # Organising committee (optional)
  ├── schedule.toml                # Day-by-day schedule (optional)
  ├── points.toml                  # Event results; standings are computed
  ├── gallery/                     # Photo discovery namespace
  │   ├── g1.jpg
  │   ├── g1.txt                   # Optional sidecar caption
  │   └── g2.png
  ├── assets/                      # Copied verbatim (favicons, portraits)
  ├── 010-rule-book.md             # Numbered page → header navigation
  └── privacy-policy.md            # Unnumbered page → footer link

Gallery discovery lists the directory once, probes every candidate by
decoding its image header, and keeps only confirmed images; unreadable
files are skipped silently, an empty gallery renders an explicit empty
state. Arrow keys and Escape drive the generated lightbox.

Run 'festsite gen-config' to print a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (manifests, processed images)
    #[arg(long, default_value = ".festsite-temp", global = true)]
    temp_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Discover gallery images, pages, and data tables into a manifest
    Discover,
    /// Encode gallery thumbnails and display images
    Process(CacheArgs),
    /// Produce the final HTML site from processed images
    Generate,
    /// Run the full pipeline: discover → process → generate
    Build(CacheArgs),
    /// Validate content directory without building
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Discover => {
            let m = discover::discover(&cli.source)?;
            std::fs::create_dir_all(&cli.temp_dir)?;
            manifest::save(&m, &cli.temp_dir.join("manifest.json"))?;
            output::print_discover_output(&m);
        }
        Command::Process(cache_args) => {
            let manifest_path = cli.temp_dir.join("manifest.json");
            let m: manifest::Manifest = manifest::load(&manifest_path)?;
            init_worker_pool(&m.site.processing);
            let stats = run_process_stage(
                &manifest_path,
                &cli.source,
                &cli.temp_dir.join("processed"),
                !cache_args.no_cache,
            )?;
            println!("Cache: {stats}");
        }
        Command::Generate => {
            let processed_dir = cli.temp_dir.join("processed");
            let processed_manifest_path = processed_dir.join("manifest.json");
            generate::generate(
                &processed_manifest_path,
                &processed_dir,
                &cli.output,
                &cli.source,
            )?;
            let m: manifest::ProcessedManifest = manifest::load(&processed_manifest_path)?;
            output::print_generate_output(&m);
        }
        Command::Build(cache_args) => {
            std::fs::create_dir_all(&cli.temp_dir)?;

            println!("==> Stage 1: Discovering {}", cli.source.display());
            let m = discover::discover(&cli.source)?;
            let manifest_path = cli.temp_dir.join("manifest.json");
            manifest::save(&m, &manifest_path)?;
            output::print_discover_output(&m);

            println!("==> Stage 2: Processing gallery images");
            init_worker_pool(&m.site.processing);
            let processed_dir = cli.temp_dir.join("processed");
            let stats = run_process_stage(
                &manifest_path,
                &cli.source,
                &processed_dir,
                !cache_args.no_cache,
            )?;
            println!("Cache: {stats}");

            println!("==> Stage 3: Generating HTML -> {}", cli.output.display());
            let processed_manifest_path = processed_dir.join("manifest.json");
            generate::generate(
                &processed_manifest_path,
                &processed_dir,
                &cli.output,
                &cli.source,
            )?;
            let processed: manifest::ProcessedManifest =
                manifest::load(&processed_manifest_path)?;
            output::print_generate_output(&processed);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let m = discover::discover(&cli.source)?;
            data::validate(&m.data)?;
            output::print_discover_output(&m);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Run the process stage with a printer thread draining progress events.
fn run_process_stage(
    manifest_path: &std::path::Path,
    source: &std::path::Path,
    processed_dir: &std::path::Path,
    use_cache: bool,
) -> Result<festsite::cache::CacheStats, Box<dyn std::error::Error>> {
    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_process_event(&event) {
                println!("{line}");
            }
        }
    });
    let result = process::process(manifest_path, source, processed_dir, use_cache, Some(tx))?;
    printer.join().expect("printer thread never panics");
    manifest::save(&result.manifest, &processed_dir.join("manifest.json"))?;
    Ok(result.cache_stats)
}

/// Initialize the rayon pool from processing config.
///
/// Caps at the number of available CPU cores — user can constrain down,
/// not up.
fn init_worker_pool(processing: &config::ProcessingConfig) {
    let workers = config::effective_workers(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build_global()
        .ok();
}
