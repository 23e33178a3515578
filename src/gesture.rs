use crate::constants::SWIPE_THRESHOLD;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    Left,  // finger moved leftwards: advance
    Right, // finger moved rightwards: go back
}

/// Classifies a completed touch by its displacement. Near-vertical or short
/// motions are not swipes.
pub fn classify(dx: f32, dy: f32) -> Option<Swipe> {
    if dx.abs() > dy.abs() && dx.abs() > SWIPE_THRESHOLD {
        if dx > 0.0 { Some(Swipe::Right) } else { Some(Swipe::Left) }
    } else {
        None
    }
}

#[derive(Debug, Default)]
pub struct SwipeTracker {
    start: Option<(f32, f32)>,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, x: f32, y: f32) {
        self.start = Some((x, y));
    }

    /// Ends the gesture. Without a recorded start there is nothing to classify.
    pub fn end(&mut self, x: f32, y: f32) -> Option<Swipe> {
        let (sx, sy) = self.start.take()?;
        classify(x - sx, y - sy)
    }
}
