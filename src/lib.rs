//! Trilha - a terminal player for gamified lesson content
//!
//! Trilha renders schema-versioned lesson documents (sections, tabs, cards,
//! multimedia, exercises, quizzes) in the terminal while tracking per-user
//! completion, awarding points and badges, and sequencing "go to next"
//! navigation across tabs and sections.

pub mod app;
pub mod config;
pub mod engine;
pub mod lesson;
pub mod progress;
pub mod theme;
pub mod ui;

pub use app::App;
pub use config::Config;
pub use theme::Theme;
