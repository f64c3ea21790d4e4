use clap::{Parser, Subcommand};
use hx_press::{config, generate, logging, output, site};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hx-press")]
#[command(about = "Static site generator for a personal blog with htmx fragments")]
#[command(long_about = "\
Static site generator for a personal blog with htmx fragments

A JSON config names the site and its sections. The home section reads one
Markdown file; the blog section reads every post in a directory. Each page is
written twice: a complete HTML document and an _hx fragment that htmx swaps
into the page.

Content structure:

  site.json                        # Site config
  content/
  ├── index.md                     # Home page body
  └── blog/
      ├── hello_world.md           # Post → /blog/hello-world.html
      └── notes.md                 # YAML front matter between --- fences

Output structure:

  website/
  ├── index.html, index_hx.html
  ├── blog.html, blog_hx.html
  ├── blog/hello-world.html        # Complete post
  ├── blog/hello-world.json        # Post data for machine readers
  └── blog_hx/hello-world.html     # Post fragment

Run 'hx-press gen-config' to print a starter site.json.")]
#[command(version)]
struct Cli {
    /// Site config file
    #[arg(long, default_value = "site.json", global = true)]
    config: PathBuf,

    /// Output directory (removed and recreated on build)
    #[arg(long, default_value = "website", global = true)]
    output: PathBuf,

    /// Log level used when RUST_LOG is unset
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate config and content, then write the site
    Build,
    /// Validate config and content without writing anything
    Check,
    /// Print a stock site.json
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(&cli.log_level)?;

    match cli.command {
        Command::Build => {
            println!("==> Loading {}", cli.config.display());
            let site_config = config::load_config(&cli.config)?;
            let website = site::assemble_website(&site_config)?;

            println!("==> Generating HTML → {}", cli.output.display());
            let report = generate::generate(&website, &cli.output)?;
            output::print_build_output(&report);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.config.display());
            let site_config = config::load_config(&cli.config)?;
            let website = site::assemble_website(&site_config)?;
            output::print_check_output(&website);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_json());
        }
    }

    Ok(())
}
