pub mod edit_engine;

pub use edit_engine::{CustomerEdits, EditEngine, EditReport};
