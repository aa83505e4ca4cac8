use crate::models::Status;

pub fn templates_for(status: Status) -> &'static [&'static str] {
    match status {
        Status::Observing => &[
            "Getting a feel for how your day is going.",
            "Watching quietly until there is more to go on.",
            "Nothing new from you for a while, so just keeping an eye on things.",
            "Standing by. Check in whenever you are ready.",
        ],
        Status::Stable => &[
            "Things look steady right now.",
            "Your schedule has room to breathe.",
            "A calm stretch. Good time for something you have been putting off.",
            "All on track, nothing needs your attention.",
            "Smooth going so far.",
        ],
        Status::Focused => &[
            "Focus session in progress. Holding everything else back.",
            "You are in the zone. Notifications can wait.",
            "Deep work underway. Keeping interruptions away.",
            "Staying quiet while you focus.",
        ],
        Status::NeedsAdjust => &[
            "Your upcoming schedule is packed. Worth moving something?",
            "Meetings are stacking up back to back.",
            "Little slack between events ahead. Consider a buffer.",
            "The next few hours look crowded.",
            "A small adjustment now could save a rough afternoon.",
        ],
        Status::NearOverload => &[
            "A lot has been pushed back. Time to trim the list?",
            "You look stretched thin. Pick one thing and let the rest go.",
            "Several tasks slipped. That is a signal to lighten the load.",
            "Running close to the limit. Protect some rest.",
        ],
        Status::Recovery => &[
            "It is late and tomorrow is busy. Rest is part of the plan.",
            "Wind down for tonight. The schedule will keep.",
            "A full day ahead. Sleep is the best preparation.",
            "Time to recharge before a packed stretch.",
        ],
    }
}

/// Hour bands that get a greeting prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBand {
    Morning,
    Lunch,
    Evening,
    LateNight,
}

impl TimeBand {
    /// Morning 06-10, lunch 12-14, evening 17-20, late night 22-06.
    pub fn from_hour(hour: u32) -> Option<Self> {
        match hour {
            6..=9 => Some(TimeBand::Morning),
            12..=13 => Some(TimeBand::Lunch),
            17..=19 => Some(TimeBand::Evening),
            22..=23 | 0..=5 => Some(TimeBand::LateNight),
            _ => None,
        }
    }

    pub fn greeting(&self) -> &'static str {
        match self {
            TimeBand::Morning => "Good morning.",
            TimeBand::Lunch => "Around lunchtime.",
            TimeBand::Evening => "Evening check-in.",
            TimeBand::LateNight => "Late night.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_status_has_four_or_five_templates() {
        for status in Status::ALL {
            let count = templates_for(status).len();
            assert!((4..=5).contains(&count), "{status} has {count} templates");
        }
    }

    #[test]
    fn bands_cover_expected_hours() {
        assert_eq!(TimeBand::from_hour(6), Some(TimeBand::Morning));
        assert_eq!(TimeBand::from_hour(9), Some(TimeBand::Morning));
        assert_eq!(TimeBand::from_hour(10), None);
        assert_eq!(TimeBand::from_hour(12), Some(TimeBand::Lunch));
        assert_eq!(TimeBand::from_hour(14), None);
        assert_eq!(TimeBand::from_hour(17), Some(TimeBand::Evening));
        assert_eq!(TimeBand::from_hour(20), None);
        assert_eq!(TimeBand::from_hour(22), Some(TimeBand::LateNight));
        assert_eq!(TimeBand::from_hour(3), Some(TimeBand::LateNight));
        assert_eq!(TimeBand::from_hour(21), None);
    }
}
