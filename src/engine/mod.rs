//! The lesson engine
//!
//! UI-independent core: given a normalized document, a progress store, and
//! the per-session interaction state, `view::render` produces a view tree
//! and `event::handle_event` applies user interactions and reports effects.

pub mod event;
pub mod sequencer;
pub mod state;
pub mod view;

pub use event::{handle_event, Effect, LessonEvent};
pub use state::LessonState;
pub use view::{render, ViewTree};
