use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use qremblem::{generate, render, Anchor, Config, ECLevel, GenerationRequest, SymbolBuilder};

/// Generate a QR code image, optionally stamped with a logo.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Text or URL to encode
    text: String,

    /// Output PNG path
    #[arg(short, long, default_value = "qr.png")]
    output: PathBuf,

    /// Pixels per module
    #[arg(long, default_value_t = 40)]
    module_size: u32,

    /// Quiet zone width in modules
    #[arg(long, default_value_t = 4)]
    border: u32,

    /// Error correction level (L, M, Q or H)
    #[arg(long)]
    ec_level: Option<ECLevel>,

    /// Fill color, a name or #RRGGBB
    #[arg(long)]
    fill: Option<String>,

    /// Background color, a name or #RRGGBB
    #[arg(long)]
    back: Option<String>,

    /// Logo image to overlay
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Logo anchor (center, top-left, top-right, bottom-left, bottom-right)
    #[arg(long)]
    anchor: Option<Anchor>,

    /// Settings file
    #[arg(long, default_value = "qremblem.json")]
    config: PathBuf,

    /// Persist the effective settings back to the settings file
    #[arg(long)]
    save_settings: bool,

    /// Skip the terminal preview
    #[arg(long)]
    no_preview: bool,
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let mut config = Config::load(&cli.config);

    // Command line flags override persisted settings
    if let Some(level) = cli.ec_level {
        config.error_level = level;
    }
    if let Some(fill) = &cli.fill {
        qremblem::config::parse_color(fill).with_context(|| format!("bad fill color {fill:?}"))?;
        config.fill_color = fill.clone();
    }
    if let Some(back) = &cli.back {
        qremblem::config::parse_color(back).with_context(|| format!("bad back color {back:?}"))?;
        config.back_color = back.clone();
    }
    if let Some(logo) = &cli.logo {
        config.logo_path = Some(logo.clone());
        config.use_logo = true;
    }
    if let Some(anchor) = cli.anchor {
        config.logo_position = anchor;
    }

    let mut request = GenerationRequest::from_config(&cli.text, &config);
    request.module_size = cli.module_size;
    request.border_modules = cli.border;

    let output = generate(&request)?;
    if let Some(warning) = &output.logo_warning {
        eprintln!("warning: generated without logo: {warning}");
    }

    if !cli.no_preview {
        let grid = SymbolBuilder::new(cli.text.as_bytes())
            .ec_level(config.error_level)
            .build()?
            .to_module_grid();
        println!("{}", render::to_str(&grid, 2));
    }

    output
        .export_png(&cli.output)
        .with_context(|| format!("writing {}", cli.output.display()))?;
    println!("QR code saved to {}", cli.output.display());

    if cli.save_settings {
        config.save(&cli.config).context("saving settings")?;
        println!("Settings saved to {}", cli.config.display());
    }

    Ok(())
}
