use clap::{Parser, Subcommand};
use log::error;
use map_gallery::config::{self, SiteConfig};
use map_gallery::lifecycle::{self, BuildMode};
use map_gallery::thumbnails::{self, ThumbnailEvent};
use map_gallery::{enrich, output};
use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};

/// Shared flag for commands that compile CSS.
#[derive(clap::Args, Clone)]
struct ModeArgs {
    /// Development build: expanded CSS, no purge
    #[arg(long)]
    dev: bool,
}

impl ModeArgs {
    fn mode(&self) -> BuildMode {
        BuildMode::from_dev_flag(self.dev)
    }
}

#[derive(Parser)]
#[command(name = "map-gallery")]
#[command(about = "Post-build steps for a static site with a maps gallery")]
#[command(long_about = "\
Post-build steps for a static site with a maps gallery

Run after the site generator has written its output directory.

Project structure:

  .
  ├── config.toml          # Optional, see 'map-gallery gen-config'
  ├── _maps.json           # Maps by category: featured, collaborations, crap, ports
  ├── map_images/          # alps_1.avif, alps_2.avif, ... (prefix = map name)
  ├── css/                 # main.scss, blog.scss, front.scss
  ├── misc/                # CNAME, .nojekyll, robots.txt
  └── _site/               # Generator output, updated in place
      ├── assets/          # Compiled CSS
      └── maps/            # *_thumb.avif (600px featured, 400px otherwise)

Set RUST_LOG=debug for more detail.")]
#[command(version)]
struct Cli {
    /// Project root
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Config file (default: <root>/config.toml, optional)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run everything: passthrough → HTML minify → CSS → purge → thumbnails
    Build(ModeArgs),
    /// Run the after-build hook: CSS → purge → thumbnails
    AfterBuild(ModeArgs),
    /// Generate map thumbnails only
    Thumbnails,
    /// Compile stylesheets (and purge them unless --dev)
    Css(ModeArgs),
    /// Print the enriched maps manifest as JSON
    Maps {
        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Report placeholders, prefix collisions and unused images
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let root = &cli.root;

    match &cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Build(args) => {
            let site_config = load_config(cli)?;
            init_thread_pool(&site_config.processing);
            let output_dir = site_config.resolve_paths(root).output;
            println!("==> Building {} ({})", root.display(), args.mode());
            let report = with_thumbnail_printer(|tx| {
                lifecycle::build(&site_config, root, args.mode(), Some(tx))
            })?;
            output::print_build_report(&report, &output_dir, root);
            println!("==> Build complete: {}", output_dir.display());
        }
        Command::AfterBuild(args) => {
            let site_config = load_config(cli)?;
            init_thread_pool(&site_config.processing);
            let report = with_thumbnail_printer(|tx| {
                lifecycle::after_build(&site_config, root, args.mode(), Some(tx))
            })?;
            output::print_after_build_report(&report, root);
        }
        Command::Thumbnails => {
            let site_config = load_config(cli)?;
            init_thread_pool(&site_config.processing);
            with_thumbnail_printer(|tx| {
                thumbnails::generate_thumbnails(&site_config, root, Some(tx))
            })?;
        }
        Command::Css(args) => {
            let site_config = load_config(cli)?;
            let report = lifecycle::compile_css(&site_config, root, args.mode())?;
            output::print_css_report(&report, root);
        }
        Command::Maps { out } => {
            let site_config = load_config(cli)?;
            let maps = enrich::read_maps(&site_config, root)?;
            let json = serde_json::to_string_pretty(&maps)?;
            match out {
                Some(path) => std::fs::write(path, json)?,
                None => println!("{}", json),
            }
        }
        Command::Check => {
            let site_config = load_config(cli)?;
            println!("==> Checking {}", root.display());
            let report = enrich::check_maps(&site_config, root)?;
            output::print_check_report(&report);
            if report.has_warnings() {
                println!("==> Builds, with warnings");
            } else {
                println!("==> Maps are valid");
            }
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<SiteConfig, config::ConfigError> {
    match &cli.config {
        Some(path) => config::load_config_file(path),
        None => config::load_config(&cli.root),
    }
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores: user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

/// Run `stage` while a printer thread writes its thumbnail events to stdout.
fn with_thumbnail_printer<T>(stage: impl FnOnce(Sender<ThumbnailEvent>) -> T) -> T {
    let (tx, rx) = mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_thumbnail_event(&event) {
                println!("{}", line);
            }
        }
    });
    let result = stage(tx);
    // The sender is gone once the stage returns, which ends the printer loop.
    printer.join().ok();
    result
}
