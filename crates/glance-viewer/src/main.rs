//! Glance - native launcher
//!
//! Reads `glance.toml`, applies command line overrides and opens the viewer
//! in a desktop window.

#[cfg(not(target_arch = "wasm32"))]
mod launcher {
    use anyhow::{Context, Result};
    use clap::Parser;
    use glance_core::{load_config, save_default_config, Variant, Viewport};
    use std::path::PathBuf;
    use tracing::{info, Level};
    use tracing_subscriber::FmtSubscriber;

    /// Initial window size before the first resize arrives
    const DEFAULT_VIEWPORT: (f32, f32) = (1280.0, 720.0);

    #[derive(Parser, Debug)]
    #[command(name = "glance")]
    #[command(about = "glTF model viewer")]
    #[command(version)]
    struct Args {
        /// Path to configuration file
        #[arg(short, long, default_value = "glance.toml")]
        config: PathBuf,

        /// Viewer variant (basic, panel)
        #[arg(long)]
        variant: Option<Variant>,

        /// Model file, relative to the asset directory
        #[arg(short, long)]
        model: Option<String>,

        /// Directory models are loaded from
        #[arg(short, long, default_value = ".")]
        assets: PathBuf,

        /// Log level (trace, debug, info, warn, error)
        #[arg(short, long, default_value = "info")]
        log_level: String,

        /// Write a default configuration file to --config and exit
        #[arg(long)]
        write_default_config: bool,
    }

    pub fn main() -> Result<()> {
        let args = Args::parse();

        let level = match args.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(true)
            .finish();

        tracing::subscriber::set_global_default(subscriber)?;

        info!("Glance v{}", env!("CARGO_PKG_VERSION"));

        if args.write_default_config {
            save_default_config(&args.config)
                .with_context(|| format!("writing {}", args.config.display()))?;
            info!(path = %args.config.display(), "Default configuration written");
            return Ok(());
        }

        let mut config = load_config(&args.config)
            .with_context(|| format!("loading {}", args.config.display()))?;

        if let Some(variant) = args.variant {
            config.viewer.variant = variant;
        }
        if let Some(model) = args.model {
            config.model.path = Some(model);
        }

        let assets = if args.assets.is_absolute() {
            args.assets
        } else {
            std::env::current_dir()
                .context("resolving the asset directory")?
                .join(args.assets)
        };

        info!(
            variant = %config.variant(),
            model = config.model_path(),
            "Configuration loaded"
        );

        let (width, height) = DEFAULT_VIEWPORT;
        glance_viewer::app::run(
            config,
            Viewport::new(width, height),
            assets.to_string_lossy().into_owned(),
        );

        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    launcher::main()
}

// The browser build starts from the library's wasm entry point
#[cfg(target_arch = "wasm32")]
fn main() {}
