use std::fmt;
use thiserror::Error;
use tracing::{debug, trace, warn};
use crate::constants::*;
use crate::gesture::{Swipe, SwipeTracker};
use crate::host::{Host, HostElement};
use crate::input::{Control, Dispatch, InputEvent, Key, Visibility};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HostPolicy {
    /// Missing elements are logged and their updates skipped.
    #[default]
    Lenient,
    /// Every contract element must be present before attaching.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingElements(pub Vec<HostElement>);

impl fmt::Display for MissingElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, element) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", element)?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum AttachError {
    #[error("a deck needs at least one slide")]
    EmptyDeck,
    #[error("host markup is missing: {0}")]
    MissingElements(MissingElements),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideInfo {
    pub position: usize,
    pub total: usize,
    pub is_first: bool,
    pub is_last: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlState {
    pub disabled: bool,
    pub label: &'static str,
}

/// Everything on screen that follows from the position alone.
#[derive(Debug, Clone, PartialEq)]
pub struct NavState {
    pub prev: ControlState,
    pub next: ControlState,
    pub progress: f32,
    pub counter: String,
}

impl NavState {
    pub fn at(position: usize, total: usize) -> Self {
        let is_first = position == 1;
        let is_last = position == total;
        Self {
            prev: ControlState {
                disabled: is_first,
                label: if is_first { LABEL_START } else { LABEL_PREVIOUS },
            },
            next: ControlState {
                disabled: is_last,
                label: if is_last { LABEL_END } else { LABEL_NEXT },
            },
            progress: position as f32 / total as f32,
            counter: position.to_string(),
        }
    }

    pub fn progress_percent(&self) -> f32 {
        self.progress * 100.0
    }
}

pub struct SlideController<H: Host> {
    host: H,
    position: usize,
    total: usize,
    swipe: SwipeTracker,
}

impl<H: Host> SlideController<H> {
    /// Checks the host against the markup contract, then renders slide 1.
    pub fn attach(total: usize, mut host: H, policy: HostPolicy) -> Result<Self, AttachError> {
        if total == 0 {
            return Err(AttachError::EmptyDeck);
        }

        let missing = host.missing_elements(total);
        if !missing.is_empty() {
            match policy {
                HostPolicy::Strict => {
                    return Err(AttachError::MissingElements(MissingElements(missing)));
                }
                HostPolicy::Lenient => {
                    for element in &missing {
                        warn!(%element, "host element missing, updates to it will be skipped");
                    }
                }
            }
        }

        let mut controller = Self { host, position: 1, total, swipe: SwipeTracker::new() };
        for position in 2..=total {
            controller.set_active(position, false);
        }
        controller.refresh();
        debug!(total, "slide controller attached");
        Ok(controller)
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn info(&self) -> SlideInfo {
        SlideInfo {
            position: self.position,
            total: self.total,
            is_first: self.position == 1,
            is_last: self.position == self.total,
        }
    }

    pub fn nav_state(&self) -> NavState {
        NavState::at(self.position, self.total)
    }

    /// Moves to `target`. Out-of-range targets are ignored; returns whether
    /// the move happened.
    pub fn go_to(&mut self, target: usize) -> bool {
        if target < 1 || target > self.total {
            debug!(target, total = self.total, "navigation target out of range, ignored");
            return false;
        }

        let from = self.position;
        self.set_active(from, false);
        self.position = target;
        self.set_active(target, true);
        self.render_nav();
        self.announce();
        debug!(from, to = target, "navigated");
        true
    }

    pub fn next(&mut self) -> bool {
        if self.position >= self.total {
            return false;
        }
        self.go_to(self.position + 1)
    }

    pub fn previous(&mut self) -> bool {
        if self.position <= 1 {
            return false;
        }
        self.go_to(self.position - 1)
    }

    pub fn reset(&mut self) -> bool {
        self.go_to(1)
    }

    /// Re-renders the display from the current position. No transition and
    /// no announcement; safe to call any number of times.
    pub fn refresh(&mut self) {
        let total = self.total.to_string();
        match self.host.total_count_display() {
            Some(text) => *text = total,
            None => trace!("no total-count display"),
        }
        self.set_active(self.position, true);
        self.render_nav();
    }

    pub fn handle(&mut self, event: InputEvent) -> Dispatch {
        match event {
            InputEvent::Click(Control::Previous) => {
                self.previous();
                Dispatch::Consumed
            }
            InputEvent::Click(Control::Next) => {
                self.next();
                Dispatch::Consumed
            }
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::TouchStart { x, y } => {
                self.swipe.start(x, y);
                Dispatch::Consumed
            }
            InputEvent::TouchEnd { x, y } => match self.swipe.end(x, y) {
                Some(Swipe::Right) => {
                    self.previous();
                    Dispatch::Consumed
                }
                Some(Swipe::Left) => {
                    self.next();
                    Dispatch::Consumed
                }
                None => Dispatch::Ignored,
            },
            InputEvent::VisibilityChange(Visibility::Visible) | InputEvent::Resize => {
                self.refresh();
                Dispatch::Ignored
            }
            InputEvent::VisibilityChange(Visibility::Hidden) => Dispatch::Ignored,
        }
    }

    fn handle_key(&mut self, key: Key) -> Dispatch {
        match key {
            Key::ArrowRight | Key::Space | Key::PageDown => {
                self.next();
            }
            Key::ArrowLeft | Key::PageUp => {
                self.previous();
            }
            Key::Home | Key::Escape => {
                self.go_to(1);
            }
            Key::End => {
                self.go_to(self.total);
            }
            Key::Other => return Dispatch::Ignored,
        }
        Dispatch::Consumed
    }

    fn set_active(&mut self, position: usize, active: bool) {
        match self.host.slide(position) {
            Some(slide) => slide.active = active,
            None => trace!(position, "no slide element"),
        }
    }

    fn render_nav(&mut self) {
        let state = self.nav_state();

        match self.host.current_index_display() {
            Some(text) => *text = state.counter.clone(),
            None => trace!("no current-index display"),
        }
        match self.host.progress_fill() {
            Some(fill) => fill.width_percent = state.progress_percent(),
            None => trace!("no progress fill"),
        }
        match self.host.prev_control() {
            Some(button) => {
                button.disabled = state.prev.disabled;
                button.label = state.prev.label.to_string();
            }
            None => trace!("no previous control"),
        }
        match self.host.next_control() {
            Some(button) => {
                button.disabled = state.next.disabled;
                button.label = state.next.label.to_string();
            }
            None => trace!("no next control"),
        }
    }

    fn announce(&mut self) {
        let position = self.position;
        let title = self
            .host
            .slide(position)
            .and_then(|slide| slide.title.clone())
            .filter(|title| !title.trim().is_empty())
            .unwrap_or_else(|| format!("Slide {}", position));
        let text = format!("{}. Slide {} of {}", title, position, self.total);
        self.host.live_region().text = text;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{Deck, SlideMeta};
    use crate::host::Page;

    fn controller(total: usize) -> SlideController<Page> {
        let deck = Deck::synthetic(total).unwrap();
        SlideController::attach(total, Page::for_deck(&deck), HostPolicy::Lenient).unwrap()
    }

    #[test]
    fn test_attach_renders_first_slide() {
        let c = controller(10);
        let page = c.host();
        assert_eq!(c.position(), 1);
        assert_eq!(page.active_slides(), vec![1]);
        assert_eq!(page.current_slide.as_deref(), Some("1"));
        assert_eq!(page.total_slides.as_deref(), Some("10"));
        assert_eq!(page.prev_button.as_ref().unwrap().label, "Start");
        assert!(page.prev_button.as_ref().unwrap().disabled);
        assert!((page.progress.unwrap().width_percent - 10.0).abs() < 1e-4);
        assert!(page.announcement.is_none());
    }

    #[test]
    fn test_attach_empty_deck() {
        let result = SlideController::attach(0, Page::default(), HostPolicy::Lenient);
        assert!(matches!(result, Err(AttachError::EmptyDeck)));
    }

    #[test]
    fn test_attach_strict_rejects_missing() {
        let deck = Deck::synthetic(3).unwrap();
        let page = Page::for_deck(&deck).without(HostElement::ProgressFill);
        let err = SlideController::attach(3, page, HostPolicy::Strict).err().unwrap();
        assert_eq!(err.to_string(), "host markup is missing: progress fill");
    }

    #[test]
    fn test_attach_clears_stale_active_markers() {
        let deck = Deck::synthetic(3).unwrap();
        let mut page = Page::for_deck(&deck);
        page.slides[2].active = true;
        let c = SlideController::attach(3, page, HostPolicy::Lenient).unwrap();
        assert_eq!(c.host().active_slides(), vec![1]);
    }

    #[test]
    fn test_go_to_out_of_range_is_noop() {
        let mut c = controller(5);
        c.go_to(3);
        assert!(!c.go_to(0));
        assert!(!c.go_to(6));
        assert!(!c.go_to(usize::MAX));
        assert_eq!(c.position(), 3);
        assert_eq!(c.host().active_slides(), vec![3]);
    }

    #[test]
    fn test_go_to_current_position_is_idempotent() {
        let mut c = controller(5);
        c.go_to(2);
        let before = (c.nav_state(), c.host().announcement_text().map(str::to_string));
        assert!(c.go_to(2));
        let after = (c.nav_state(), c.host().announcement_text().map(str::to_string));
        assert_eq!(before, after);
        assert_eq!(c.host().active_slides(), vec![2]);
    }

    #[test]
    fn test_next_and_previous_clamp() {
        let mut c = controller(3);
        assert!(!c.previous());
        assert!(c.next());
        assert!(c.next());
        assert!(!c.next());
        assert_eq!(c.position(), 3);
        assert!(c.previous());
        assert_eq!(c.position(), 2);
    }

    #[test]
    fn test_nav_state_table() {
        let first = NavState::at(1, 10);
        assert_eq!(first.prev, ControlState { disabled: true, label: "Start" });
        assert_eq!(first.next, ControlState { disabled: false, label: "Next →" });

        let middle = NavState::at(5, 10);
        assert_eq!(middle.prev, ControlState { disabled: false, label: "← Previous" });
        assert_eq!(middle.next, ControlState { disabled: false, label: "Next →" });

        let last = NavState::at(10, 10);
        assert_eq!(last.prev, ControlState { disabled: false, label: "← Previous" });
        assert_eq!(last.next, ControlState { disabled: true, label: "End" });
        assert_eq!(last.progress, 1.0);
    }

    #[test]
    fn test_single_slide_deck() {
        let mut c = controller(1);
        let state = c.nav_state();
        assert!(state.prev.disabled && state.next.disabled);
        assert_eq!(state.prev.label, "Start");
        assert_eq!(state.next.label, "End");
        assert!(!c.next());
        assert!(!c.previous());
        assert_eq!(c.info(), SlideInfo { position: 1, total: 1, is_first: true, is_last: true });
    }

    #[test]
    fn test_announcement_uses_title() {
        let deck = Deck::new(vec![
            SlideMeta::titled("Welcome"),
            SlideMeta::titled("Threat Landscape"),
            SlideMeta::default(),
        ])
        .unwrap();
        let mut c = SlideController::attach(3, Page::for_deck(&deck), HostPolicy::Lenient).unwrap();
        c.next();
        assert_eq!(c.host().announcement_text(), Some("Threat Landscape. Slide 2 of 3"));
        c.next();
        assert_eq!(c.host().announcement_text(), Some("Slide 3. Slide 3 of 3"));
    }

    #[test]
    fn test_keys() {
        let mut c = controller(10);
        assert_eq!(c.handle(InputEvent::Key(Key::End)), Dispatch::Consumed);
        assert_eq!(c.position(), 10);
        c.handle(InputEvent::Key(Key::PageUp));
        c.handle(InputEvent::Key(Key::ArrowLeft));
        assert_eq!(c.position(), 8);
        c.handle(InputEvent::Key(Key::Space));
        c.handle(InputEvent::Key(Key::PageDown));
        c.handle(InputEvent::Key(Key::ArrowRight));
        assert_eq!(c.position(), 10);
        c.handle(InputEvent::Key(Key::Escape));
        assert_eq!(c.position(), 1);
        c.go_to(4);
        c.handle(InputEvent::Key(Key::Home));
        assert_eq!(c.position(), 1);
    }

    #[test]
    fn test_unmapped_key_ignored() {
        let mut c = controller(4);
        assert_eq!(c.handle(InputEvent::Key(Key::Other)), Dispatch::Ignored);
        assert_eq!(c.position(), 1);
    }

    #[test]
    fn test_boundary_keys_still_consumed() {
        let mut c = controller(4);
        assert_eq!(c.handle(InputEvent::Key(Key::ArrowLeft)), Dispatch::Consumed);
        assert_eq!(c.position(), 1);
    }

    #[test]
    fn test_clicks() {
        let mut c = controller(4);
        assert_eq!(c.handle(InputEvent::Click(Control::Next)), Dispatch::Consumed);
        c.handle(InputEvent::Click(Control::Next));
        c.handle(InputEvent::Click(Control::Previous));
        assert_eq!(c.position(), 2);
    }

    #[test]
    fn test_touch_swipes() {
        let mut c = controller(10);
        c.handle(InputEvent::TouchStart { x: 100.0, y: 50.0 });
        assert_eq!(c.handle(InputEvent::TouchEnd { x: 20.0, y: 55.0 }), Dispatch::Consumed);
        assert_eq!(c.position(), 2);

        c.handle(InputEvent::TouchStart { x: 100.0, y: 50.0 });
        assert_eq!(c.handle(InputEvent::TouchEnd { x: 95.0, y: 120.0 }), Dispatch::Ignored);
        assert_eq!(c.position(), 2);

        c.handle(InputEvent::TouchStart { x: 20.0, y: 50.0 });
        c.handle(InputEvent::TouchEnd { x: 200.0, y: 50.0 });
        assert_eq!(c.position(), 1);
    }

    #[test]
    fn test_refresh_restores_display_without_announcing() {
        let mut c = controller(5);
        c.go_to(3);
        let announced = c.host().announcement_text().map(str::to_string);

        let page = c.host_mut();
        page.current_slide = Some("garbage".to_string());
        page.progress = Some(Default::default());
        page.live_region().text.clear();

        assert_eq!(c.handle(InputEvent::Resize), Dispatch::Ignored);
        assert_eq!(c.host().current_slide.as_deref(), Some("3"));
        assert!((c.host().progress.unwrap().width_percent - 60.0).abs() < 1e-4);
        assert_eq!(c.host().announcement_text(), Some(""));
        assert_ne!(announced.as_deref(), Some(""));

        c.handle(InputEvent::VisibilityChange(Visibility::Visible));
        assert_eq!(c.position(), 3);
    }

    #[test]
    fn test_hidden_does_not_rerender() {
        let mut c = controller(5);
        c.go_to(3);
        c.host_mut().current_slide = Some("stale".to_string());

        assert_eq!(c.handle(InputEvent::VisibilityChange(Visibility::Hidden)), Dispatch::Ignored);
        assert_eq!(c.host().current_slide.as_deref(), Some("stale"));
        assert_eq!(c.position(), 3);
    }

    #[test]
    fn test_touch_end_without_start_ignored() {
        let mut c = controller(5);
        assert_eq!(c.handle(InputEvent::TouchEnd { x: 0.0, y: 0.0 }), Dispatch::Ignored);
        assert_eq!(c.position(), 1);
        assert!(c.host().announcement.is_none());
    }

    #[test]
    fn test_missing_elements_degrade_gracefully() {
        let deck = Deck::synthetic(4).unwrap();
        let page = Page::for_deck(&deck)
            .without(HostElement::PreviousControl)
            .without(HostElement::ProgressFill)
            .without(HostElement::Slide(2));
        let mut c = SlideController::attach(4, page, HostPolicy::Lenient).unwrap();

        assert!(c.next());
        assert_eq!(c.position(), 2);
        assert!(c.host().active_slides().is_empty());
        assert_eq!(c.host().current_slide.as_deref(), Some("2"));
        assert_eq!(c.host().announcement_text(), Some("Slide 2. Slide 2 of 4"));
        assert!(c.next());
        assert_eq!(c.host().active_slides(), vec![3]);
    }

    #[test]
    fn test_info() {
        let mut c = controller(3);
        assert_eq!(c.info(), SlideInfo { position: 1, total: 3, is_first: true, is_last: false });
        c.go_to(3);
        assert_eq!(c.info(), SlideInfo { position: 3, total: 3, is_first: false, is_last: true });
        assert_eq!(c.info(), c.info());
    }
}
