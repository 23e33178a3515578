use std::io;
use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use slidedeck::config::{Args, Config, Mode};
use slidedeck::{headless, Page, PresentationHandle, SlideController};

fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    // --- Configuration & Logging ---
    let config = Config::from(Args::parse());
    init_logging(&config.log_level); // RUST_LOG wins over --log-level

    // --- Load Deck ---
    let deck = config
        .deck
        .load()
        .with_context(|| format!("failed to load deck from {:?}", config.deck))?;
    // --- Attach Controller ---
    // The page is checked against the markup contract before any input is wired
    let page = Page::for_deck(&deck);
    let controller = SlideController::attach(deck.len(), page, config.policy)?;
    let handle = PresentationHandle::new(controller);

    info!(slides = deck.len(), "presentation initialized");
    info!("controls: arrow keys navigate, space next, home/end first/last, escape first, swipe left/right");

    // --- Run Front-end ---
    match config.mode {
        Mode::Headless => headless::run(&handle, io::stdin().lock(), io::stdout().lock()),
        #[cfg(feature = "viewer")]
        Mode::Window => slidedeck::viewer::run(&handle, &deck, config.window),
        #[cfg(not(feature = "viewer"))]
        Mode::Window => anyhow::bail!("window mode requires the viewer feature"),
    }
}
