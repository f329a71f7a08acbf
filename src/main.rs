use blurhint::analyze::{Outcome, analyze_image};
use blurhint::annotate::{Report, annotate, write_manifest};
use blurhint::config::Config;
use blurhint::imaging::RustBackend;
use blurhint::resolve::{NoLookup, SourceLookup, StemScanLookup};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "blurhint")]
#[command(about = "Build-time LQIP generator for markdown content")]
#[command(long_about = "\
Build-time LQIP generator for markdown content

Scans a content directory of markdown documents, analyzes every local
image reference, and writes a JSON manifest mapping each image to its
dimensions plus one encoded integer. A stylesheet decodes that integer
(inlined as --lqip on the <img>) into a blurred color preview shown
before the real image loads.

Image references handled:

  ![hero](./hero.jpg)           relative to the document
  ![map](~/images/map.png)      relative to the content root
  ![abs](/srv/photos/a.jpg)     absolute path
  ![cdn](https://…/x.png)       remote — always ignored

Skipped images (missing file, no decoder for the extension, undecodable,
not fully opaque, degenerate palette) are reported but never fail the
build; they simply render without a placeholder.

Optional blurhint.toml in the content root tunes sampling stride,
palette size, the alias prefix, and thread count.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Manifest output path
    #[arg(long, default_value = "lqip-manifest.json", global = true)]
    manifest: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze all referenced images and write the manifest
    Annotate,
    /// Run the full analysis without writing anything
    Check,
    /// Analyze a single image file and print the result
    Analyze {
        /// Path to the image
        image: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::load(&cli.source)?;
    init_thread_pool(&config);

    let backend = RustBackend::new();
    let lookup: Box<dyn SourceLookup> = match &config.lookup_dir {
        Some(dir) => Box::new(StemScanLookup::new(cli.source.join(dir))),
        None => Box::new(NoLookup),
    };

    match cli.command {
        Command::Annotate => {
            println!("==> Annotating {}", cli.source.display());
            let report = annotate(&backend, &cli.source, &config, lookup.as_ref())?;
            print_report(&report);
            write_manifest(&report.to_manifest(), &cli.manifest)?;
            println!("==> Manifest written to {}", cli.manifest.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let report = annotate(&backend, &cli.source, &config, lookup.as_ref())?;
            print_report(&report);
            println!("==> Check complete, nothing written");
        }
        Command::Analyze { image } => match analyze_image(&backend, &image, &config)? {
            Outcome::Annotated(p) => {
                println!("{} {}x{}", image.display(), p.width, p.height);
                println!("--lqip:{}", p.lqip);
            }
            Outcome::Skipped(reason) => {
                println!("{}: skipped ({reason})", image.display());
            }
        },
    }

    Ok(())
}

/// Initialize the rayon thread pool from config.
///
/// `threads = 0` keeps rayon's default (one per core).
fn init_thread_pool(config: &Config) {
    if config.threads > 0 {
        // Ignore failure: pool may already be initialized (e.g. in tests)
        let _ = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build_global();
    }
}

fn print_report(report: &Report) {
    for doc in &report.documents {
        if doc.images.is_empty() {
            continue;
        }
        println!("{}", doc.path);
        for (url, outcome) in &doc.images {
            match outcome {
                Outcome::Annotated(p) => {
                    println!("  {url} → --lqip:{} ({}x{})", p.lqip, p.width, p.height);
                }
                Outcome::Skipped(reason) => {
                    println!("  {url} → skipped: {reason}");
                }
            }
        }
    }
    println!(
        "{} annotated, {} skipped",
        report.annotated_count(),
        report.skipped_count()
    );
}
