//! bbb-level: command-line front end for brick-breaker level files
//!
//! Checks, normalizes, creates, resizes and dumps level files using the
//! piece and item catalogs named in the editor configuration.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use bbb_level::config::CONFIG_FILE_NAME;
use bbb_level::level_file::discover_levels;
use bbb_level::{load_level, save_level, Catalog, EditorConfig, LevelDocument, VERSION};

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Editor configuration file (RON)
    #[arg(long, global = true, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    /// Log decoding details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Decode and validate level files; directories are scanned for .lvl files
    Check {
        /// Files or directories (defaults to the configured levels directory)
        paths: Vec<PathBuf>,
    },
    /// Rewrite a level in the newest file layout
    Normalize {
        input: PathBuf,
        /// Write here instead of over the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Create a level filled with the default piece
    New {
        output: PathBuf,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long)]
        width: usize,
        #[arg(long)]
        height: usize,
    },
    /// Change a level's dimensions (columns on the right, rows at the top)
    Resize {
        input: PathBuf,
        #[arg(long)]
        width: usize,
        #[arg(long)]
        height: usize,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a decoded level as RON
    Dump { input: PathBuf },
}

fn main() -> Result<()> {
    let args = CliArgs::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();
    log::debug!("bbb-level v{}", VERSION);

    let config = EditorConfig::load(&args.config)
        .with_context(|| format!("reading config {}", args.config.display()))?;
    let catalog = config
        .load_catalog()
        .with_context(|| format!("loading piece catalog {}", config.block_types.display()))?;

    match args.command {
        Command::Check { paths } => {
            let paths = if paths.is_empty() {
                vec![config.levels_dir.clone()]
            } else {
                paths
            };
            check(&paths, &catalog)
        }
        Command::Normalize { input, output } => {
            let doc = load(&input, &catalog)?;
            save(&doc, output.as_deref().unwrap_or(&input))
        }
        Command::New {
            output,
            name,
            width,
            height,
        } => {
            let mut doc = LevelDocument::create_empty(width, height, &catalog)?;
            doc.set_name(name);
            save(&doc, &output)
        }
        Command::Resize {
            input,
            width,
            height,
            output,
        } => {
            let mut doc = load(&input, &catalog)?;
            doc.resize(width, height, &catalog)?;
            save(&doc, output.as_deref().unwrap_or(&input))
        }
        Command::Dump { input } => {
            let doc = load(&input, &catalog)?;
            let pretty = ron::ser::PrettyConfig::new()
                .depth_limit(4)
                .indentor("  ".to_string());
            println!("{}", ron::ser::to_string_pretty(&doc, pretty)?);
            Ok(())
        }
    }
}

fn load(path: &Path, catalog: &Catalog) -> Result<LevelDocument> {
    load_level(path, catalog).with_context(|| format!("loading {}", path.display()))
}

fn save(doc: &LevelDocument, path: &Path) -> Result<()> {
    save_level(doc, path).with_context(|| format!("saving {}", path.display()))
}

/// Check every level, printing one line per file
fn check(paths: &[PathBuf], catalog: &Catalog) -> Result<()> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(discover_levels(path).into_iter().map(|info| info.path));
        } else {
            files.push(path.clone());
        }
    }

    let mut failed = 0;
    for file in &files {
        match load_level(file, catalog) {
            Ok(doc) => match doc.validate() {
                Ok(()) => println!("ok    {} ({}x{})", file.display(), doc.width(), doc.height()),
                Err(problems) => {
                    failed += 1;
                    println!("FAIL  {}", file.display());
                    for problem in problems {
                        println!("      {}", problem);
                    }
                }
            },
            Err(e) => {
                failed += 1;
                println!("FAIL  {}: {}", file.display(), e);
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} level(s) failed", failed, files.len());
    }
    Ok(())
}
