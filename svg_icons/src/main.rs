//! svg_icons - render and prefetch front-end icons
//!
//! Resolves icons through the same deduplicating cache the front-end uses,
//! either from a running asset server or from an asset directory on disk.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use svg_icons::{IconConfig, IconInputs, IconSize, IconView};

#[derive(Parser, Debug)]
#[command(name = "svg_icons")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Asset server origin (overrides the config file)
    #[arg(long)]
    base_url: Option<String>,

    /// Read icons from this directory instead of over HTTP
    #[arg(long)]
    asset_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the host HTML for one icon
    Render {
        /// Icon name, with or without the .svg extension
        name: String,

        /// xs, sm, md, lg, xl or a pixel count
        #[arg(long, default_value_t = IconSize::Md)]
        size: IconSize,

        /// Accessible label; omit to hide the icon from assistive tech
        #[arg(long)]
        label: Option<String>,

        /// Inline SVG rendered instead of the named icon
        #[arg(long)]
        svg: Option<String>,
    },
    /// Fetch icons concurrently and report which ones resolve
    Prefetch {
        #[arg(required = true)]
        names: Vec<String>,
    },
}

fn load_config(args: &Args) -> IconConfig {
    let path = args.config.clone().unwrap_or_else(IconConfig::default_path);
    let mut config = IconConfig::load_or_default(&path);
    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(root) = &args.asset_root {
        config.asset_root = Some(root.clone());
    }
    config
}

#[tokio::main]
async fn main() {
    // Set RUST_LOG to control log level, e.g. RUST_LOG=svg_icons=debug
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = load_config(&args);
    if let Err(e) = config.validate() {
        log::error!("{}", e);
        std::process::exit(1);
    }

    let cache = match config.build_cache() {
        Ok(cache) => Arc::new(cache),
        Err(e) => {
            log::error!("Failed to set up icon fetcher: {}", e);
            std::process::exit(1);
        }
    };

    match args.command {
        Command::Render {
            name,
            size,
            label,
            svg,
        } => {
            let inputs = IconInputs {
                name,
                svg: svg.unwrap_or_default(),
                size,
                aria_label: label,
            };
            let mut view = IconView::with_inputs(cache, inputs);
            view.settled().await;
            println!("{}", view.render().to_html());
        }
        Command::Prefetch { names } => {
            let handles: Vec<_> = names.iter().map(|name| cache.get(name)).collect();
            let results = futures::future::join_all(handles).await;

            let mut failed = 0usize;
            for (name, result) in names.iter().zip(results) {
                match result {
                    Ok(markup) => println!("ok      {} ({} bytes)", name, markup.as_str().len()),
                    Err(e) => {
                        failed += 1;
                        println!("failed  {}: {}", name, e);
                    }
                }
            }

            log::info!(
                "Prefetched {} icon(s), {} cached, {} failed",
                names.len(),
                cache.len(),
                failed
            );
            if failed > 0 {
                std::process::exit(1);
            }
        }
    }
}
