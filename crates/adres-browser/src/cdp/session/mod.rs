//! CDP page session for interacting with a single page.

mod core;
mod frames;
mod input;
mod js;
mod navigation;

pub use self::core::PageSession;
pub use self::frames::FrameOwner;
