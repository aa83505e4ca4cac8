pub mod learner;
pub mod persist;
pub mod weights;

pub use learner::{evolution_level_for, FeedbackLearner, FEEDBACK_HISTORY_CAPACITY};
pub use weights::{weighted_index, TemplateWeightTable};
