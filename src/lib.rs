//! Adaptive status briefing engine.
//!
//! Turns activity and calendar signals into a status label, a short status
//! sentence and a message-density tier, and tunes its sentence choice from
//! user feedback over time.

pub mod classifier;
pub mod composer;
pub mod db;
pub mod density;
pub mod learning;
pub mod models;
pub mod scheduler;
pub mod settings;
mod utils;

pub use classifier::{classify, ClassifierConfig};
pub use db::{Database, MemoryStore, StateStore};
pub use density::DensityAdapter;
pub use learning::{FeedbackLearner, TemplateWeightTable};
pub use models::{
    ActivitySignals, BriefingSnapshot, Density, DensitySetting, EvolutionCounters,
    FeedbackRecord, FeedbackType, Status, Timestamp, TriggerType, UpcomingEvent,
};
pub use scheduler::{
    BriefingEngine, CalendarProvider, Clock, FixedClock, NoCalendar, StaticCalendar, SystemClock,
};
pub use settings::EngineSettings;
pub use utils::{describe_elapsed, init_logging};
