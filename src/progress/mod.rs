//! Progress tracking and gamification

pub mod badges;
pub mod store;

pub use store::{ProgressSnapshot, ProgressStore};
