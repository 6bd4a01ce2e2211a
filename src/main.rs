//! Page Composer CLI
//!
//! Usage:
//!   page-composer [OPTIONS] [LAYOUT]
//!
//! Options:
//!   -c, --config <FILE>         Config file declaring templates and blocks (TOML format)
//!   -t, --templates <DIR>       Template directory
//!   -x, --extension <EXT>       Extension appended to template locators
//!       --placeholder-missing   Bind placeholders for unregistered blocks
//!   -v, --verbose               Debug logging on stderr
//!   -h, --help                  Print help

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use page_composer::{
    add_blocks, render_layout_with_config, ConfigFile, MissingBlockPolicy, RenderConfig,
};

#[derive(Parser)]
#[command(name = "page-composer")]
#[command(about = "Compose pages out of named, nestable template blocks")]
struct Cli {
    /// Layout file (reads from stdin if not provided)
    layout: Option<PathBuf>,

    /// Config file declaring templates and blocks (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Template directory
    #[arg(short, long)]
    templates: Option<PathBuf>,

    /// Extension appended to template locators
    #[arg(short = 'x', long)]
    extension: Option<String>,

    /// Bind placeholders for blocks with no registered view-model
    #[arg(long)]
    placeholder_missing: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    // If no layout file and stdin is a terminal (interactive), show intro help
    if cli.layout.is_none() && io::stdin().is_terminal() {
        print_intro();
        return;
    }

    // Load config
    let config_file = match &cli.config {
        Some(path) => match ConfigFile::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => ConfigFile::default(),
    };

    let models = config_file.view_models();
    debug!(blocks = models.len(), "registering configured blocks");
    if let Err(e) = add_blocks(&models) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Command-line flags win over the config file
    let mut config = config_file.render_config();
    if let Some(dir) = cli.templates {
        config = config.with_template_dir(dir);
    }
    if let Some(ext) = cli.extension {
        config = config.with_template_extension(ext);
    }
    if cli.placeholder_missing {
        config = config.with_missing_block(MissingBlockPolicy::Placeholder);
    }

    // Read layout
    let layout = match &cli.layout {
        Some(path) => match fs::read(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = Vec::new();
            match io::stdin().read_to_end(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    match render(&layout, &config) {
        Ok(html) => print!("{}", html),
        Err(message) => {
            eprintln!("{}", message);
            std::process::exit(1);
        }
    }
}

fn render(layout: &[u8], config: &RenderConfig) -> Result<String, String> {
    render_layout_with_config(layout, config).map_err(|e| match e.report() {
        Some(report) => format!("Error: {}\n{}", e, report),
        None => format!("Error: {}", e),
    })
}

fn print_intro() {
    println!(
        r#"Page Composer - compose pages out of named, nestable template blocks

USAGE:
    page-composer [OPTIONS] [LAYOUT]
    cat layout.toml | page-composer -c composer.toml

OPTIONS:
    -c, --config <FILE>        Config file (templates, compose policy, blocks)
    -t, --templates <DIR>      Template directory
    -x, --extension <EXT>      Extension appended to template locators
    --placeholder-missing      Bind placeholders for unregistered blocks
    -v, --verbose              Debug logging on stderr
    -h, --help                 Print help

LAYOUT:
    [[layout]]
    block = "header"
    template = "header"

    [[layout.children]]
    block = "nav"
    template = "nav"

TEMPLATES:
    {{{{ child "nav" }}}}      rendered child bound to "nav" (empty if absent)
    {{{{ children }}}}         every child, in declaration order
    {{{{ name }}}}             bound block name
    {{{{ template }}}}         template locator
    {{{{ field "title" }}}}    view-model field from the config's [blocks] table"#
    );
}
