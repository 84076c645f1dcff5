use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::content::{Event, lenient_number};
use crate::model::ids::{MessageId, UserId};
use crate::model::user::Role;

// ─── Student ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub icon: Option<String>,
}

impl Activity {
    #[must_use]
    pub fn icon_class(&self) -> &str {
        self.icon.as_deref().unwrap_or("fa-bell")
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StudentDashboard {
    #[serde(deserialize_with = "lenient_number")]
    pub cgpa: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub attendance: Option<f64>,
    pub projects: u32,
    pub events: u32,
    pub activities: Vec<Activity>,
    pub upcoming_events: Vec<Event>,
}

/// Student profile as returned by and sent to `/student/profile`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StudentProfile {
    pub full_name: String,
    pub email: String,
    pub registration_no: Option<String>,
    pub course: Option<String>,
    pub year: Option<String>,
    pub semester: Option<String>,
    pub gender: Option<String>,
    pub dob: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
}

// ─── Faculty ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FacultyDashboard {
    pub courses: u32,
    pub students: u32,
    pub projects: u32,
    pub publications: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FacultyProfile {
    pub full_name: String,
    pub email: String,
    pub designation: Option<String>,
    pub qualification: Option<String>,
    pub specialization: Option<String>,
    pub experience: Option<String>,
    pub office: Option<String>,
    pub office_hours: Option<String>,
    pub research_interests: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
}

// ─── Admin ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdminStats {
    pub total_students: u64,
    pub total_teachers: u64,
    pub total_projects: u64,
    pub unread_messages: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdminSummary {
    pub total_users: u64,
    pub verified_users: u64,
    pub active_users: u64,
    pub today_visits: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecentStudent {
    pub name: String,
    pub registration_no: String,
    pub course: String,
    pub joined: String,
}

/// Time series behind the admin analytics chart.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Analytics {
    pub dates: Vec<String>,
    pub students: Vec<u64>,
    pub teachers: Vec<u64>,
    pub projects: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdminDashboard {
    pub stats: AdminStats,
    pub summary: AdminSummary,
    pub recent_students: Vec<RecentStudent>,
    pub analytics: Option<Analytics>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: UserId,
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminUsers {
    pub users: Vec<AdminUser>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminMessage {
    pub id: MessageId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub replied: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdminMessages {
    pub unread_count: u32,
    pub messages: Vec<AdminMessage>,
}

/// Editable department settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DepartmentInfo {
    pub university: String,
    pub department: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub office_hours: String,
    pub vision: String,
    pub mission: String,
    pub description: String,
}

/// Profile updates are free-form maps of field name to value.
pub type ProfileUpdate = Map<String, Value>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_dashboard_tolerates_sparse_payload() {
        let dashboard: StudentDashboard =
            serde_json::from_str(r#"{"cgpa":"8.7","projects":2}"#).unwrap();
        assert_eq!(dashboard.cgpa, Some(8.7));
        assert_eq!(dashboard.attendance, None);
        assert!(dashboard.activities.is_empty());
    }

    #[test]
    fn admin_dashboard_reads_nested_stats() {
        let dashboard: AdminDashboard = serde_json::from_str(
            r#"{"stats":{"totalStudents":120,"unreadMessages":3},"recentStudents":[{"name":"S","registrationNo":"R1","course":"MCA","joined":"2026-01-02"}]}"#,
        )
        .unwrap();
        assert_eq!(dashboard.stats.total_students, 120);
        assert_eq!(dashboard.stats.unread_messages, 3);
        assert_eq!(dashboard.recent_students.len(), 1);
        assert!(dashboard.analytics.is_none());
    }

    #[test]
    fn admin_messages_default_flags() {
        let messages: AdminMessages = serde_json::from_str(
            r#"{"unreadCount":1,"messages":[{"id":5,"name":"N","subject":"Hi"}]}"#,
        )
        .unwrap();
        assert!(!messages.messages[0].is_read);
        assert_eq!(messages.messages[0].id, MessageId::new("5"));
    }

    #[test]
    fn activity_icon_defaults_to_bell() {
        let activity: Activity = serde_json::from_str(r#"{"title":"Graded"}"#).unwrap();
        assert_eq!(activity.icon_class(), "fa-bell");
    }
}
