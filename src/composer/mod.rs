pub mod compose;
pub mod templates;

pub use compose::{compose, ComposedSentence};
pub use templates::{templates_for, TimeBand};
