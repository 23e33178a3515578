use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use crate::constants::IMAGE_EXTENSIONS;

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("failed to read deck directory {path}: {source}")]
    ReadDir { path: PathBuf, source: std::io::Error },
    #[error("failed to read titles file {path}: {source}")]
    ReadTitles { path: PathBuf, source: std::io::Error },
    #[error("no image files found in directory: {0}")]
    NoImages(PathBuf),
    #[error("titles file {0} lists no slides")]
    NoTitles(PathBuf),
    #[error("a deck needs at least one slide")]
    Empty,
}

/// One slide as the controller sees it: a marker and an optional title.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SlideMeta {
    pub title: Option<String>,
    pub image: Option<PathBuf>,
}

impl SlideMeta {
    pub fn titled(title: impl Into<String>) -> Self {
        Self { title: Some(title.into()), image: None }
    }
}

/// Ordered, fixed sequence of slides. Positions are 1-indexed.
#[derive(Debug, Clone, PartialEq)]
pub struct Deck {
    slides: Vec<SlideMeta>,
}

impl Deck {
    pub fn new(slides: Vec<SlideMeta>) -> Result<Self, DeckError> {
        if slides.is_empty() {
            return Err(DeckError::Empty);
        }
        Ok(Self { slides })
    }

    /// `count` untitled slides; announcements fall back to "Slide {n}".
    pub fn synthetic(count: usize) -> Result<Self, DeckError> {
        Self::new(vec![SlideMeta::default(); count])
    }

    /// One title per line, blank lines are untitled slides.
    pub fn from_titles_file(path: &Path) -> Result<Self, DeckError> {
        let text = fs::read_to_string(path)
            .map_err(|source| DeckError::ReadTitles { path: path.to_path_buf(), source })?;
        let slides = parse_titles(&text);
        if slides.is_empty() {
            return Err(DeckError::NoTitles(path.to_path_buf()));
        }
        Self::new(slides)
    }

    pub fn from_directory(dir: &Path) -> Result<Self, DeckError> {
        let paths = load_sorted_image_paths(dir)?;
        let slides = paths
            .into_iter()
            .map(|path| SlideMeta {
                title: title_from_path(&path),
                image: Some(path),
            })
            .collect();
        Self::new(slides)
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &SlideMeta)> {
        self.slides.iter().enumerate().map(|(i, s)| (i + 1, s))
    }
}

fn parse_titles(text: &str) -> Vec<SlideMeta> {
    let mut lines: Vec<&str> = text.lines().map(str::trim).collect();
    // Trailing blank lines are file padding, not untitled slides
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
        .into_iter()
        .map(|line| SlideMeta {
            title: (!line.is_empty()).then(|| line.to_string()),
            image: None,
        })
        .collect()
}

fn title_from_path(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let title = stem.replace(['_', '-'], " ");
    let title = title.trim();
    (!title.is_empty()).then(|| title.to_string())
}

pub fn load_sorted_image_paths(dir: &Path) -> Result<Vec<PathBuf>, DeckError> {
    let read_err = |source| DeckError::ReadDir { path: dir.to_path_buf(), source };
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        if !path.is_file() {
            continue;
        }
        let is_image = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()));
        if is_image {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    if paths.is_empty() {
        Err(DeckError::NoImages(dir.to_path_buf()))
    } else {
        Ok(paths)
    }
}
