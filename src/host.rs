use std::fmt;
use crate::deck::Deck;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NavControl {
    pub disabled: bool,
    pub label: String,
}

/// Proportional fill of the progress bar, as a CSS width percentage.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProgressFill {
    pub width_percent: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlideElement {
    pub position: usize,
    pub title: Option<String>,
    pub active: bool,
}

/// Text sink watched by assistive technology without taking focus.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveRegion {
    pub aria_live: &'static str,
    pub atomic: bool,
    pub text: String,
}

impl LiveRegion {
    pub fn polite() -> Self {
        Self { aria_live: "polite", atomic: true, text: String::new() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostElement {
    PreviousControl,
    NextControl,
    CurrentIndex,
    TotalCount,
    ProgressFill,
    Slide(usize),
}

impl fmt::Display for HostElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostElement::PreviousControl => write!(f, "previous control"),
            HostElement::NextControl => write!(f, "next control"),
            HostElement::CurrentIndex => write!(f, "current-index display"),
            HostElement::TotalCount => write!(f, "total-count display"),
            HostElement::ProgressFill => write!(f, "progress fill"),
            HostElement::Slide(n) => write!(f, "slide {}", n),
        }
    }
}

/// The markup the controller drives. Every element may be absent; the
/// controller skips updates to absent elements. The live region is created
/// on first use and stays attached.
pub trait Host {
    fn prev_control(&mut self) -> Option<&mut NavControl>;
    fn next_control(&mut self) -> Option<&mut NavControl>;
    fn current_index_display(&mut self) -> Option<&mut String>;
    fn total_count_display(&mut self) -> Option<&mut String>;
    fn progress_fill(&mut self) -> Option<&mut ProgressFill>;
    fn slide(&mut self, position: usize) -> Option<&mut SlideElement>;
    fn live_region(&mut self) -> &mut LiveRegion;

    fn missing_elements(&mut self, total: usize) -> Vec<HostElement> {
        let mut missing = Vec::new();
        if self.prev_control().is_none() {
            missing.push(HostElement::PreviousControl);
        }
        if self.next_control().is_none() {
            missing.push(HostElement::NextControl);
        }
        if self.current_index_display().is_none() {
            missing.push(HostElement::CurrentIndex);
        }
        if self.total_count_display().is_none() {
            missing.push(HostElement::TotalCount);
        }
        if self.progress_fill().is_none() {
            missing.push(HostElement::ProgressFill);
        }
        for position in 1..=total {
            if self.slide(position).is_none() {
                missing.push(HostElement::Slide(position));
            }
        }
        missing
    }
}

/// In-memory document: what the viewer renders and what tests inspect.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub prev_button: Option<NavControl>,
    pub next_button: Option<NavControl>,
    pub current_slide: Option<String>,
    pub total_slides: Option<String>,
    pub progress: Option<ProgressFill>,
    pub slides: Vec<SlideElement>,
    pub announcement: Option<LiveRegion>,
}

impl Page {
    pub fn for_deck(deck: &Deck) -> Self {
        Self {
            prev_button: Some(NavControl::default()),
            next_button: Some(NavControl::default()),
            current_slide: Some(String::new()),
            total_slides: Some(String::new()),
            progress: Some(ProgressFill::default()),
            slides: deck
                .iter()
                .map(|(position, meta)| SlideElement {
                    position,
                    title: meta.title.clone(),
                    active: false,
                })
                .collect(),
            announcement: None,
        }
    }

    /// Drops an element, as a page whose markup lacks it would.
    pub fn without(mut self, element: HostElement) -> Self {
        match element {
            HostElement::PreviousControl => self.prev_button = None,
            HostElement::NextControl => self.next_button = None,
            HostElement::CurrentIndex => self.current_slide = None,
            HostElement::TotalCount => self.total_slides = None,
            HostElement::ProgressFill => self.progress = None,
            HostElement::Slide(n) => self.slides.retain(|s| s.position != n),
        }
        self
    }

    pub fn active_slides(&self) -> Vec<usize> {
        self.slides.iter().filter(|s| s.active).map(|s| s.position).collect()
    }

    pub fn announcement_text(&self) -> Option<&str> {
        self.announcement.as_ref().map(|a| a.text.as_str())
    }
}

impl Host for Page {
    fn prev_control(&mut self) -> Option<&mut NavControl> {
        self.prev_button.as_mut()
    }

    fn next_control(&mut self) -> Option<&mut NavControl> {
        self.next_button.as_mut()
    }

    fn current_index_display(&mut self) -> Option<&mut String> {
        self.current_slide.as_mut()
    }

    fn total_count_display(&mut self) -> Option<&mut String> {
        self.total_slides.as_mut()
    }

    fn progress_fill(&mut self) -> Option<&mut ProgressFill> {
        self.progress.as_mut()
    }

    fn slide(&mut self, position: usize) -> Option<&mut SlideElement> {
        // Slides normally sit at index position - 1; pages with gaps fall back to a scan
        let direct = position
            .checked_sub(1)
            .filter(|&i| self.slides.get(i).is_some_and(|s| s.position == position));
        match direct {
            Some(i) => self.slides.get_mut(i),
            None => self.slides.iter_mut().find(|s| s.position == position),
        }
    }

    fn live_region(&mut self) -> &mut LiveRegion {
        self.announcement.get_or_insert_with(LiveRegion::polite)
    }
}
