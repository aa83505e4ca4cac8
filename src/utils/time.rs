use crate::models::Timestamp;

/// Human-readable age of the last update, e.g. "12 min ago".
pub fn describe_elapsed(since: Option<Timestamp>, now: Timestamp) -> String {
    let Some(since) = since else {
        return "not updated yet".to_string();
    };

    let minutes = (now - since).num_minutes().max(0);
    match minutes {
        0 => "just now".to_string(),
        1..=59 => format!("{minutes} min ago"),
        60..=1439 => format!("{} h ago", minutes / 60),
        _ => format!("{} d ago", minutes / 1440),
    }
}
