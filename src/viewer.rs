use anyhow::Result;
use raylib::prelude::*;
use tracing::{debug, info, warn};
use crate::api::PresentationHandle;
use crate::constants::*;
use crate::deck::Deck;
use crate::host::{NavControl, Page};
use crate::input::{Control, InputEvent, Key, Visibility};
use crate::texture_loader::load_texture_with_exif_rotation;

const BAR_HEIGHT: f32 = 0.1;       // Bottom navigation bar, fraction of screen height
const PROGRESS_HEIGHT: f32 = 6.0;  // Progress strip along the top (pixels)
const BUTTON_WIDTH: f32 = 0.18;    // Fraction of screen width

#[derive(Debug, Clone, Copy, PartialEq)]
struct Rect {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

impl Rect {
    fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.w && py >= self.y && py <= self.y + self.h
    }

    fn to_raylib(self) -> Rectangle {
        Rectangle::new(self.x, self.y, self.w, self.h)
    }
}

// Screen regions for a given window size
#[derive(Debug, Clone, Copy, PartialEq)]
struct Layout {
    slide: Rect,
    prev: Rect,
    next: Rect,
    progress: Rect,
    counter_y: f32,
}

impl Layout {
    fn new(width: f32, height: f32) -> Self {
        let bar_h = height * BAR_HEIGHT;
        let bar_y = height - bar_h;
        let button_w = width * BUTTON_WIDTH;
        let pad = bar_h * 0.15;
        Self {
            slide: Rect { x: 0.0, y: PROGRESS_HEIGHT, w: width, h: bar_y - PROGRESS_HEIGHT },
            prev: Rect { x: pad, y: bar_y + pad, w: button_w, h: bar_h - 2.0 * pad },
            next: Rect { x: width - pad - button_w, y: bar_y + pad, w: button_w, h: bar_h - 2.0 * pad },
            progress: Rect { x: 0.0, y: 0.0, w: width, h: PROGRESS_HEIGHT },
            counter_y: bar_y + bar_h * 0.3,
        }
    }

    fn control_at(&self, x: f32, y: f32) -> Option<Control> {
        if self.prev.contains(x, y) {
            Some(Control::Previous)
        } else if self.next.contains(x, y) {
            Some(Control::Next)
        } else {
            None
        }
    }
}

fn key_event(key: KeyboardKey) -> Option<InputEvent> {
    let key = match key {
        KeyboardKey::KEY_RIGHT => Key::ArrowRight,
        KeyboardKey::KEY_LEFT => Key::ArrowLeft,
        KeyboardKey::KEY_SPACE => Key::Space,
        KeyboardKey::KEY_PAGE_DOWN => Key::PageDown,
        KeyboardKey::KEY_PAGE_UP => Key::PageUp,
        KeyboardKey::KEY_HOME => Key::Home,
        KeyboardKey::KEY_END => Key::End,
        KeyboardKey::KEY_ESCAPE => Key::Escape,
        _ => return None,
    };
    Some(InputEvent::Key(key))
}

// The default raylib font has no arrow glyphs
fn ascii_label(label: &str) -> String {
    label.replace('←', "<").replace('→', ">")
}

fn fit_scale(texture: &Texture2D, area: Rect) -> f32 {
    let sx = area.w * 0.9 / texture.width() as f32;
    let sy = area.h * 0.9 / texture.height() as f32;
    sx.min(sy).min(1.0)
}

fn draw_button(d: &mut RaylibDrawHandle, rect: Rect, control: &Option<NavControl>, font: i32) {
    let Some(control) = control else { return };
    let (fill, text) = if control.disabled {
        (Color::DARKGRAY, Color::GRAY)
    } else {
        (Color::SKYBLUE, Color::BLACK)
    };
    d.draw_rectangle_rec(rect.to_raylib(), fill);
    d.draw_text(
        &ascii_label(&control.label),
        (rect.x + rect.h * 0.3) as i32,
        (rect.y + (rect.h - font as f32) * 0.5) as i32,
        font,
        text,
    );
}

fn draw_page(d: &mut RaylibDrawHandle, page: &Page, textures: &[Option<Texture2D>], layout: &Layout) {
    d.clear_background(Color::BLACK);

    let font = (layout.prev.h * 0.45).max(10.0) as i32;

    if let Some(slide) = page.slides.iter().find(|s| s.active) {
        let texture = slide.position.checked_sub(1).and_then(|i| textures.get(i)).and_then(Option::as_ref);
        match texture {
            Some(texture) => {
                let scale = fit_scale(texture, layout.slide);
                let w = texture.width() as f32 * scale;
                let h = texture.height() as f32 * scale;
                let dest = Rectangle::new(
                    layout.slide.x + (layout.slide.w - w) * 0.5,
                    layout.slide.y + (layout.slide.h - h) * 0.5,
                    w,
                    h,
                );
                d.draw_texture_pro(
                    texture,
                    Rectangle::new(0.0, 0.0, texture.width() as f32, texture.height() as f32),
                    dest,
                    Vector2::new(0.0, 0.0),
                    0.0,
                    Color::WHITE,
                );
            }
            None => {
                let title = slide.title.clone().unwrap_or_else(|| format!("Slide {}", slide.position));
                d.draw_text(
                    &title,
                    (layout.slide.x + layout.slide.w * 0.08) as i32,
                    (layout.slide.y + layout.slide.h * 0.4) as i32,
                    font * 2,
                    Color::RAYWHITE,
                );
            }
        }
    }

    if let Some(fill) = page.progress {
        let mut bar = layout.progress;
        d.draw_rectangle_rec(bar.to_raylib(), Color::DARKGRAY);
        bar.w *= fill.width_percent / 100.0;
        d.draw_rectangle_rec(bar.to_raylib(), Color::SKYBLUE);
    }

    draw_button(d, layout.prev, &page.prev_button, font);
    draw_button(d, layout.next, &page.next_button, font);

    let counter = format!(
        "{} / {}",
        page.current_slide.as_deref().unwrap_or("-"),
        page.total_slides.as_deref().unwrap_or("-"),
    );
    d.draw_text(
        &counter,
        (layout.progress.w * 0.47) as i32,
        layout.counter_y as i32,
        font,
        Color::LIGHTGRAY,
    );
}

pub fn run(handle: &PresentationHandle<Page>, deck: &Deck, window: (i32, i32)) -> Result<()> {
    // --- Window Setup ---
    let (mut rl, thread) = raylib::init()
        .size(window.0, window.1)
        .title("Slide Deck")
        .vsync()
        .resizable()
        .build();
    rl.set_target_fps(FPS);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);
    // Escape returns to the first slide instead of closing
    rl.set_exit_key(None);

    // --- Load Slide Images ---
    // Indexed by position - 1; a slide without a texture shows its title instead
    let mut textures: Vec<Option<Texture2D>> = Vec::with_capacity(deck.len());
    for (position, meta) in deck.iter() {
        let texture = match &meta.image {
            Some(path) => match load_texture_with_exif_rotation(&mut rl, &thread, path) {
                Ok(texture) => Some(texture),
                Err(e) => {
                    warn!(position, error = %e, "slide image unavailable, showing its title");
                    None
                }
            },
            None => None,
        };
        textures.push(texture);
    }
    info!(slides = deck.len(), "presenter window open");

    let mut focused = rl.is_window_focused();
    let mut pointer_down = false; // a swipe is in progress

    // --- Main Loop ---
    while !rl.window_should_close() {
        let layout = Layout::new(rl.get_screen_width() as f32, rl.get_screen_height() as f32);
        let mut events = Vec::new();

        // 1. Collect raylib input as host events
        while let Some(key) = rl.get_key_pressed() {
            events.extend(key_event(key));
        }

        // The mouse stands in for touch: presses outside the buttons start a swipe
        let pointer = rl.get_mouse_position();
        if rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT) {
            match layout.control_at(pointer.x, pointer.y) {
                Some(control) => events.push(InputEvent::Click(control)),
                None => {
                    pointer_down = true;
                    events.push(InputEvent::TouchStart { x: pointer.x, y: pointer.y });
                }
            }
        }
        if pointer_down && rl.is_mouse_button_released(MouseButton::MOUSE_BUTTON_LEFT) {
            pointer_down = false;
            events.push(InputEvent::TouchEnd { x: pointer.x, y: pointer.y });
        }

        if rl.is_window_resized() {
            events.push(InputEvent::Resize);
        }
        // Focus stands in for page visibility
        let now_focused = rl.is_window_focused();
        if now_focused != focused {
            focused = now_focused;
            let visibility = if focused { Visibility::Visible } else { Visibility::Hidden };
            events.push(InputEvent::VisibilityChange(visibility));
        }

        // 2. Feed every event through the controller, in arrival order
        for event in events {
            let dispatch = handle.handle(event);
            debug!(?event, prevents_default = dispatch.prevents_default(), "window input");
        }

        // 3. Draw the page as the controller left it
        let mut d = rl.begin_drawing(&thread);
        handle.inspect(|c| draw_page(&mut d, c.host(), &textures, &layout));
    }

    Ok(())
}
