use serde::{Deserialize, Deserializer, Serialize};

use crate::model::ids::{EventId, FacultyId, ProgramId, ProjectId};

/// Accepts a JSON number, a numeric string, or null.
pub(crate) fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => Some(n),
        Some(Raw::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

/// Headline counters on the landing page.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub students: u64,
    pub faculty: u64,
    pub projects: u64,
    pub placement: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct About {
    pub university: String,
    pub department: String,
    pub vision: String,
    pub mission: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: ProgramId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub seats: Option<f64>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyMember {
    pub id: FacultyId,
    pub name: String,
    #[serde(default)]
    pub designation: String,
    #[serde(default)]
    pub qualification: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub expertise: Vec<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "techStack")]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub demo: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
}

/// Event category as the API labels it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    #[default]
    Upcoming,
    Past,
    Cultural,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// ISO date (`YYYY-MM-DD`, optionally with a time part).
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: EventKind,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub current_participants: u32,
    #[serde(default)]
    pub max_participants: Option<u32>,
}

impl Event {
    /// Parsed calendar date, if the API sent one.
    #[must_use]
    pub fn day(&self) -> Option<chrono::NaiveDate> {
        let head = self.date.get(..10).unwrap_or(&self.date);
        chrono::NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.max_participants
            .is_some_and(|max| self.current_participants >= max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topper {
    pub name: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub course: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub cgpa: Option<f64>,
    #[serde(default)]
    pub achievements: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactInfo {
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub hours: Option<String>,
}

impl ContactInfo {
    #[must_use]
    pub fn address_or_default(&self) -> &str {
        self.address.as_deref().unwrap_or("University Campus, Tech City")
    }

    #[must_use]
    pub fn phone_or_default(&self) -> &str {
        self.phone.as_deref().unwrap_or("+91-123-456-7890")
    }

    #[must_use]
    pub fn email_or_default(&self) -> &str {
        self.email.as_deref().unwrap_or("cse.department@university.edu")
    }

    #[must_use]
    pub fn hours_or_default(&self) -> &str {
        self.hours.as_deref().unwrap_or("Mon-Fri: 9:00 AM - 5:00 PM")
    }
}

/// Message sent through the public contact form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_accepts_tech_stack_alias() {
        let project: Project = serde_json::from_str(
            r#"{"id":3,"title":"Crop AI","category":"ai-ml","techStack":["Rust","ONNX"]}"#,
        )
        .unwrap();
        assert_eq!(project.technologies, vec!["Rust", "ONNX"]);
        assert_eq!(project.id, ProjectId::new("3"));
    }

    #[test]
    fn event_type_maps_to_kind() {
        let event: Event = serde_json::from_str(
            r#"{"id":"e1","title":"Fest","date":"2026-03-01T10:00:00Z","type":"cultural","maxParticipants":2,"currentParticipants":2}"#,
        )
        .unwrap();
        assert_eq!(event.kind, EventKind::Cultural);
        assert_eq!(event.day(), chrono::NaiveDate::from_ymd_opt(2026, 3, 1));
        assert!(event.is_full());
        assert!(event.is_active);
    }

    #[test]
    fn unknown_event_type_is_other() {
        let event: Event =
            serde_json::from_str(r#"{"id":1,"title":"Talk","type":"webinar"}"#).unwrap();
        assert_eq!(event.kind, EventKind::Other);
        assert_eq!(event.day(), None);
    }

    #[test]
    fn topper_cgpa_accepts_strings() {
        let topper: Topper =
            serde_json::from_str(r#"{"name":"R","year":"2025","course":"BCA","cgpa":"9.4"}"#)
                .unwrap();
        assert_eq!(topper.cgpa, Some(9.4));
    }

    #[test]
    fn contact_info_has_fallbacks() {
        let info: ContactInfo = serde_json::from_str(r#"{"phone":"+1"}"#).unwrap();
        assert_eq!(info.phone_or_default(), "+1");
        assert_eq!(info.hours_or_default(), "Mon-Fri: 9:00 AM - 5:00 PM");
    }
}
