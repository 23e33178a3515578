pub const RENDER_WIDTH: i32 = 1920;           // Width of the presenter window at full size
pub const RENDER_HEIGHT: i32 = 1080;          // Height of the presenter window at full size
pub const FPS: u32 = 60;                      // Frames per second

pub const DEFAULT_SLIDE_COUNT: usize = 10;    // Deck size when no deck source is given
pub const SWIPE_THRESHOLD: f32 = 50.0;        // Horizontal dead-zone for swipes (pixels)

pub const LABEL_START: &str = "Start";
pub const LABEL_PREVIOUS: &str = "← Previous";
pub const LABEL_NEXT: &str = "Next →";
pub const LABEL_END: &str = "End";

pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];
