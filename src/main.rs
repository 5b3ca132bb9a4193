use clap::{Parser, Subcommand};
use parable_site::{catalog, config, generate, output, slug};
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
            // Leaked once at startup, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "parable-site")]
#[command(about = "Static site generator for a catalog of parables")]
#[command(long_about = "\
Static site generator for a catalog of parables

Reads parables.json from the content directory and writes a listing page
plus one detail page per parable. Passage text is fetched from the verse
service at build time and cached in the output directory.

Content structure:

  content/
  ├── parables.json    # [{\"title\", \"book\", \"chapter\", \"startVerse\", \"endVerse\"}]
  └── config.toml      # Optional site config

Output:

  dist/
  ├── index.html
  └── parable/<slug>/index.html

Run 'parable-site gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory (holds parables.json and config.toml)
    #[arg(long, default_value = ".", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch passages and write the site
    Build {
        /// Ignore the verse cache and fetch every passage
        #[arg(long)]
        no_cache: bool,
    },
    /// Validate config and catalog without fetching or writing anything
    Check,
    /// Print the detail page paths, one per line
    Paths,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build { no_cache } => {
            let site_config = config::load_config(&cli.source)?;
            init_thread_pool(&site_config.processing);

            println!("==> Building {} → {}", cli.source.display(), cli.output.display());
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_generate_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = generate::build(
                &cli.source,
                &cli.output,
                &site_config,
                !no_cache,
                Some(tx),
            );
            printer.join().ok();
            let result = result?;

            output::print_generate_summary(&result.report);
            println!("Cache: {}", result.cache_stats);
            result.report.into_result()?;
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            config::load_config(&cli.source)?;
            let parables = catalog::load_catalog(&cli.source)?;
            output::print_catalog_output(&parables);
            println!("==> Catalog is valid");
        }
        Command::Paths => {
            let parables = catalog::load_catalog(&cli.source)?;
            for path in slug::enumerate_paths(&parables) {
                println!("{}", path);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
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
