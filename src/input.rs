#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Previous,
    Next,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Space,
    PageUp,
    PageDown,
    Home,
    End,
    Escape,
    Other,
}

impl Key {
    /// Maps a DOM `KeyboardEvent.key` value. Unknown names become `Other`.
    pub fn from_name(name: &str) -> Key {
        match name {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "Space" | " " => Key::Space,
            "PageUp" => Key::PageUp,
            "PageDown" => Key::PageDown,
            "Home" => Key::Home,
            "End" => Key::End,
            "Escape" => Key::Escape,
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Click(Control),
    Key(Key),
    TouchStart { x: f32, y: f32 },
    TouchEnd { x: f32, y: f32 },
    VisibilityChange(Visibility),
    Resize,
}

/// Whether the host should still run its default handling for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Consumed,
    Ignored,
}

impl Dispatch {
    pub fn prevents_default(self) -> bool {
        self == Dispatch::Consumed
    }
}
