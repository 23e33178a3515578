use std::path::PathBuf;
use clap::Parser;
use clap::builder::TypedValueParser;
use crate::constants::*;
use crate::controller::HostPolicy;
use crate::deck::{Deck, DeckError};

#[derive(Debug, Parser)]
#[command(name = "slidedeck", about = "Keyboard, click and swipe driven slide presenter")]
pub struct Args {
    /// Directory of slide images, shown in file name order
    pub deck_dir: Option<PathBuf>,

    /// Text file with one slide title per line
    #[arg(long, conflicts_with = "deck_dir")]
    pub titles: Option<PathBuf>,

    /// Number of untitled slides when no deck is given
    #[arg(long, default_value_t = DEFAULT_SLIDE_COUNT,
          value_parser = clap::value_parser!(u16).range(1..).map(usize::from))]
    pub slides: usize,

    /// Read input events from stdin instead of opening a window
    #[arg(long)]
    pub headless: bool,

    /// Refuse to start when the page lacks any expected element
    #[arg(long)]
    pub strict: bool,

    #[arg(long, default_value_t = RENDER_WIDTH / 2)]
    pub width: i32,

    #[arg(long, default_value_t = RENDER_HEIGHT / 2)]
    pub height: i32,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeckSource {
    Directory(PathBuf),
    TitlesFile(PathBuf),
    Synthetic(usize),
}

impl DeckSource {
    pub fn load(&self) -> Result<Deck, DeckError> {
        match self {
            DeckSource::Directory(dir) => Deck::from_directory(dir),
            DeckSource::TitlesFile(path) => Deck::from_titles_file(path),
            DeckSource::Synthetic(count) => Deck::synthetic(*count),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Window,
    Headless,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub deck: DeckSource,
    pub policy: HostPolicy,
    pub mode: Mode,
    pub window: (i32, i32),
    pub log_level: String,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        let deck = match (args.deck_dir, args.titles) {
            (Some(dir), _) => DeckSource::Directory(dir),
            (None, Some(path)) => DeckSource::TitlesFile(path),
            (None, None) => DeckSource::Synthetic(args.slides),
        };
        let mode = if args.headless || !cfg!(feature = "viewer") {
            Mode::Headless
        } else {
            Mode::Window
        };
        Self {
            deck,
            policy: if args.strict { HostPolicy::Strict } else { HostPolicy::Lenient },
            mode,
            window: (args.width, args.height),
            log_level: args.log_level,
        }
    }
}
