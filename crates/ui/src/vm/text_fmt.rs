use chrono::NaiveDate;

use portal_core::model::generated_avatar_url;

pub const DESCRIPTION_PREVIEW_CHARS: usize = 100;

/// First `max` characters followed by `...` when the text is longer.
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_owned(),
    }
}

#[must_use]
pub fn preview(text: &str) -> String {
    truncate(text, DESCRIPTION_PREVIEW_CHARS)
}

/// Picture URL, or an initials avatar when none is set.
#[must_use]
pub fn avatar_or_generated(image: Option<&str>, name: &str) -> String {
    match image {
        Some(url) if !url.trim().is_empty() => url.to_owned(),
        _ => generated_avatar_url(name),
    }
}

/// Day of month and short month name for date badges.
#[must_use]
pub fn date_badge(day: Option<NaiveDate>) -> (String, String) {
    day.map_or_else(
        || ("--".to_owned(), String::new()),
        |day| (day.format("%-d").to_string(), day.format("%b").to_string()),
    )
}

/// Badge class for a project or request status.
#[must_use]
pub fn status_badge_class(status: &str) -> &'static str {
    match status.trim().to_ascii_lowercase().as_str() {
        "approved" | "active" | "completed" => "badge-success",
        "pending" | "review" | "in-review" => "badge-warning",
        "rejected" | "archived" => "badge-danger",
        _ => "badge-info",
    }
}

#[must_use]
pub fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_owned(),
        _ => "-".to_owned(),
    }
}
