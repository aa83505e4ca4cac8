pub mod clock;
pub mod controller;
pub mod provider;
pub mod state;

pub use clock::{Clock, FixedClock, SystemClock};
pub use controller::BriefingEngine;
pub use provider::{CalendarProvider, NoCalendar, StaticCalendar};
pub use state::EngineState;
