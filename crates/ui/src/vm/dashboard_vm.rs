use portal_core::model::{AdminDashboard, FacultyDashboard, Role, Stats, StudentDashboard};
use portal_core::section::{DashboardSection, dashboard_links};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatCardVm {
    pub value: String,
    pub label: &'static str,
    pub icon: &'static str,
}

fn card(value: impl ToString, label: &'static str, icon: &'static str) -> StatCardVm {
    StatCardVm {
        value: value.to_string(),
        label,
        icon,
    }
}

fn number(value: Option<f64>) -> Option<String> {
    value.filter(|v| *v != 0.0).map(|v| format!("{v}"))
}

#[must_use]
pub fn landing_stat_cards(stats: &Stats) -> Vec<StatCardVm> {
    vec![
        card(format!("{}+", stats.students), "Students", "fa-user-graduate"),
        card(format!("{}+", stats.faculty), "Faculty", "fa-chalkboard-teacher"),
        card(format!("{}+", stats.projects), "Projects", "fa-project-diagram"),
        card(format!("{}%", stats.placement), "Placement", "fa-briefcase"),
    ]
}

#[must_use]
pub fn student_stat_cards(data: &StudentDashboard) -> Vec<StatCardVm> {
    vec![
        card(number(data.cgpa).unwrap_or_else(|| "N/A".into()), "CGPA", "fa-star"),
        card(
            format!("{}%", number(data.attendance).unwrap_or_else(|| "0".into())),
            "Attendance",
            "fa-calendar-check",
        ),
        card(data.projects, "Projects", "fa-project-diagram"),
        card(data.events, "Events", "fa-calendar-alt"),
    ]
}

#[must_use]
pub fn faculty_stat_cards(data: &FacultyDashboard) -> Vec<StatCardVm> {
    vec![
        card(data.courses, "Courses", "fa-book"),
        card(data.students, "Students", "fa-users"),
        card(data.projects, "Projects", "fa-project-diagram"),
        card(data.publications, "Publications", "fa-file-alt"),
    ]
}

#[must_use]
pub fn admin_stat_cards(data: &AdminDashboard) -> Vec<StatCardVm> {
    let stats = &data.stats;
    let summary = &data.summary;
    vec![
        card(stats.total_students, "Total Students", "fa-user-graduate"),
        card(stats.total_teachers, "Total Teachers", "fa-chalkboard-teacher"),
        card(stats.total_projects, "Total Projects", "fa-project-diagram"),
        card(stats.unread_messages, "Unread Messages", "fa-envelope"),
        card(summary.total_users, "Total Users", "fa-users"),
        card(summary.verified_users, "Verified Users", "fa-user-check"),
        card(summary.active_users, "Active Users", "fa-user-clock"),
        card(summary.today_visits, "Today's Visits", "fa-eye"),
    ]
}

/// Heading for a dashboard section, taken from its navbar link when it has one.
#[must_use]
pub fn section_title(section: DashboardSection) -> &'static str {
    let owner = section.audience();
    if let Some(link) = dashboard_links(owner).iter().find(|l| l.section == section) {
        return link.text;
    }
    match section {
        DashboardSection::StudentEditProfile | DashboardSection::FacultyEditProfile => {
            "Edit Profile"
        }
        DashboardSection::AdminAnalytics => "Analytics",
        DashboardSection::AdminToppers => "Toppers",
        DashboardSection::AdminSettings => "Settings",
        _ => match owner {
            Role::Student => "Student Area",
            Role::Teacher => "Faculty Area",
            Role::Admin => "Administration",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_cards_show_placeholders() {
        let cards = student_stat_cards(&StudentDashboard::default());
        assert_eq!(cards[0].value, "N/A");
        assert_eq!(cards[1].value, "0%");

        let data = StudentDashboard {
            cgpa: Some(8.5),
            attendance: Some(91.0),
            ..StudentDashboard::default()
        };
        let cards = student_stat_cards(&data);
        assert_eq!(cards[0].value, "8.5");
        assert_eq!(cards[1].value, "91%");
    }

    #[test]
    fn titles_follow_navbar_links() {
        assert_eq!(section_title(DashboardSection::StudentProjects), "My Projects");
        assert_eq!(section_title(DashboardSection::StudentEditProfile), "Edit Profile");
    }
}
