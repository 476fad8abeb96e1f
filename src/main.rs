use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;

use pagemark::config::PagemarkConfig;
use pagemark::markup;
use pagemark::raster::AutoDecoder;
use pagemark::raster::decoder::is_pdf;
use pagemark::session::{DocumentLoader, Session};

#[derive(Parser)]
#[command(name = "pagemark", version, about = "Render a document page with highlight and line markup")]
struct Cli {
    /// PDF or raster image to render
    document: PathBuf,
    /// Zero-based page index
    #[arg(long, default_value_t = 0)]
    page: usize,
    /// Display zoom, clamped to the configured range
    #[arg(long, default_value_t = 1.0)]
    zoom: f32,
    /// JSON file with `[{ "page": N, "annotation": { ... } }]` entries
    #[arg(long)]
    markup: Option<PathBuf>,
    /// Output PNG path (default: page{N}_{timestamp}.png)
    #[arg(long)]
    out: Option<PathBuf>,
    /// Config file to use instead of the per-user one
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => PagemarkConfig::load_from(path)?,
        None => PagemarkConfig::load(),
    };
    // Binds the PDF backend once; without it PDF input is refused up front
    let decoder = AutoDecoder::new();
    let bytes = std::fs::read(&cli.document)
        .with_context(|| format!("Failed to read {}", cli.document.display()))?;
    if is_pdf(&bytes) && !decoder.supports_pdf() {
        bail!(
            "{} is a PDF, but PDF rendering is unavailable on this system",
            cli.document.display()
        );
    }

    let mut session = Session::new(config);
    let (loader, mut ready_rx) = DocumentLoader::new(Arc::new(decoder), session.config.render_scale);
    let ticket = session.begin_load();
    loader.spawn(ticket, bytes);
    let ready = ready_rx
        .recv()
        .await
        .context("Document loader stopped without a result")?;
    if !session.finish_load(ready)? {
        bail!("Document load was superseded");
    }

    if let Some(path) = &cli.markup {
        let entries = markup::load_markup(path)?;
        let count = markup::apply_markup(&mut session, entries)?;
        log::info!("Imported {} annotation(s)", count);
    }

    session.set_page(cli.page)?;
    session.set_zoom(cli.zoom);

    let out = cli.out.unwrap_or_else(|| {
        let stamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
        PathBuf::from(format!("page{}_{}.png", cli.page, stamp))
    });
    if !session.save_page_image(&out, session.current_page(), session.zoom()) {
        bail!("Failed to write {}", out.display());
    }
    println!("{}", out.display());
    Ok(())
}
