use std::sync::RwLock;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::models::UpcomingEvent;

/// Source of near-term calendar events, ideally in ascending start order.
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    async fn fetch_upcoming_events(&self) -> Result<Vec<UpcomingEvent>>;
}

/// For users without a connected calendar.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCalendar;

#[async_trait]
impl CalendarProvider for NoCalendar {
    async fn fetch_upcoming_events(&self) -> Result<Vec<UpcomingEvent>> {
        Ok(Vec::new())
    }
}

/// Serves whatever list was last handed to it.
#[derive(Debug, Default)]
pub struct StaticCalendar {
    events: RwLock<Vec<UpcomingEvent>>,
}

impl StaticCalendar {
    pub fn new(events: Vec<UpcomingEvent>) -> Self {
        Self {
            events: RwLock::new(events),
        }
    }

    pub fn replace(&self, events: Vec<UpcomingEvent>) -> Result<()> {
        let mut guard = self
            .events
            .write()
            .map_err(|_| anyhow!("static calendar lock poisoned"))?;
        *guard = events;
        Ok(())
    }
}

#[async_trait]
impl CalendarProvider for StaticCalendar {
    async fn fetch_upcoming_events(&self) -> Result<Vec<UpcomingEvent>> {
        let guard = self
            .events
            .read()
            .map_err(|_| anyhow!("static calendar lock poisoned"))?;
        Ok(guard.clone())
    }
}
