pub mod api;
pub mod config;
pub mod constants;
pub mod controller;
pub mod deck;
pub mod gesture;
pub mod headless;
pub mod host;
pub mod input;
#[cfg(feature = "viewer")]
mod texture_loader;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use api::PresentationHandle;
pub use controller::{AttachError, HostPolicy, NavState, SlideController, SlideInfo};
pub use deck::{Deck, DeckError, SlideMeta};
pub use host::{Host, HostElement, Page};
pub use input::{Control, Dispatch, InputEvent, Key, Visibility};
