pub mod json_store;
pub mod progress;
pub mod schema;

pub use json_store::{JsonStore, ProgressStore};
pub use progress::ProgressBook;
pub use schema::Progress;
