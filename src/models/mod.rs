pub mod density;
pub mod feedback;
pub mod signals;
pub mod snapshot;
pub mod status;

pub use density::{Density, DensitySetting};
pub use feedback::{EvolutionCounters, FeedbackRecord, FeedbackTally, FeedbackType};
pub use signals::{ActivitySignals, Timestamp, UpcomingEvent, RECENT_ACTIONS_CAPACITY};
pub use snapshot::BriefingSnapshot;
pub use status::{Status, TriggerType};
