//! Lesson documents: model, normalization, catalog

pub mod catalog;
pub mod model;
pub mod schema;

pub use catalog::{Catalog, LessonLibrary, LessonSummary};
pub use model::LessonDocument;
pub use schema::SchemaError;
