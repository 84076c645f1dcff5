//! Section identifiers and the registry of lazily materialized dashboard sections.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use crate::model::Role;

/// Id of any section the shell can show, public or dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(String);

impl SectionId {
    pub const HOME: &'static str = "home";

    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn home() -> Self {
        Self::new(Self::HOME)
    }

    /// Section id carried by a URL fragment (`#about` or `about`).
    ///
    /// An empty fragment means the home section.
    #[must_use]
    pub fn from_fragment(fragment: &str) -> Self {
        let id = fragment.trim().trim_start_matches('#').trim();
        if id.is_empty() {
            Self::home()
        } else {
            Self::new(id)
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_home(&self) -> bool {
        self.0 == Self::HOME
    }

    /// Registry entry when this id names a dashboard section.
    #[must_use]
    pub fn dashboard(&self) -> Option<DashboardSection> {
        self.0.parse().ok()
    }

    #[must_use]
    pub fn fragment(&self) -> String {
        format!("#{}", self.0)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<DashboardSection> for SectionId {
    fn from(value: DashboardSection) -> Self {
        Self::new(value.as_str())
    }
}

impl From<PublicSection> for SectionId {
    fn from(value: PublicSection) -> Self {
        Self::new(value.as_str())
    }
}

impl Borrow<str> for SectionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// ─── Public sections ────────────────────────────────────────────────────────────

/// Sections present in the shell from startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PublicSection {
    Home,
    About,
    Programs,
    Faculty,
    Projects,
    Events,
    Toppers,
    Contact,
}

impl PublicSection {
    pub const ALL: [PublicSection; 8] = [
        Self::Home,
        Self::About,
        Self::Programs,
        Self::Faculty,
        Self::Projects,
        Self::Events,
        Self::Toppers,
        Self::Contact,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::About => "about",
            Self::Programs => "programs",
            Self::Faculty => "faculty",
            Self::Projects => "projects",
            Self::Events => "events",
            Self::Toppers => "toppers",
            Self::Contact => "contact",
        }
    }

    /// Label shown in the top navigation bar.
    #[must_use]
    pub fn nav_label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::About => "About",
            Self::Programs => "Programs",
            Self::Faculty => "Faculty",
            Self::Projects => "Projects",
            Self::Events => "Events",
            Self::Toppers => "Toppers",
            Self::Contact => "Contact",
        }
    }
}

// ─── Dashboard registry ─────────────────────────────────────────────────────────

/// Dashboard sections whose markup is fetched on first visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DashboardSection {
    StudentDashboard,
    StudentProfile,
    StudentEditProfile,
    StudentProjects,
    StudentEvents,
    FacultyDashboard,
    FacultyProfile,
    FacultyEditProfile,
    FacultyStudents,
    FacultyCourses,
    FacultyProjects,
    AdminDashboard,
    AdminUsers,
    AdminFaculty,
    AdminPrograms,
    AdminProjects,
    AdminEvents,
    AdminMessages,
    AdminAnalytics,
    AdminSettings,
    AdminToppers,
}

impl DashboardSection {
    pub const ALL: [DashboardSection; 21] = [
        Self::StudentDashboard,
        Self::StudentProfile,
        Self::StudentEditProfile,
        Self::StudentProjects,
        Self::StudentEvents,
        Self::FacultyDashboard,
        Self::FacultyProfile,
        Self::FacultyEditProfile,
        Self::FacultyStudents,
        Self::FacultyCourses,
        Self::FacultyProjects,
        Self::AdminDashboard,
        Self::AdminUsers,
        Self::AdminFaculty,
        Self::AdminPrograms,
        Self::AdminProjects,
        Self::AdminEvents,
        Self::AdminMessages,
        Self::AdminAnalytics,
        Self::AdminSettings,
        Self::AdminToppers,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StudentDashboard => "student-dashboard",
            Self::StudentProfile => "student-profile",
            Self::StudentEditProfile => "student-edit-profile",
            Self::StudentProjects => "student-projects",
            Self::StudentEvents => "student-events",
            Self::FacultyDashboard => "faculty-dashboard",
            Self::FacultyProfile => "faculty-profile",
            Self::FacultyEditProfile => "faculty-edit-profile",
            Self::FacultyStudents => "faculty-students",
            Self::FacultyCourses => "faculty-courses",
            Self::FacultyProjects => "faculty-projects",
            Self::AdminDashboard => "admin-dashboard",
            Self::AdminUsers => "admin-users",
            Self::AdminFaculty => "admin-faculty",
            Self::AdminPrograms => "admin-programs",
            Self::AdminProjects => "admin-projects",
            Self::AdminEvents => "admin-events",
            Self::AdminMessages => "admin-messages",
            Self::AdminAnalytics => "admin-analytics",
            Self::AdminSettings => "admin-settings",
            Self::AdminToppers => "admin-toppers",
        }
    }

    /// Role whose dashboard this section belongs to.
    #[must_use]
    pub fn audience(self) -> Role {
        match self {
            Self::StudentDashboard
            | Self::StudentProfile
            | Self::StudentEditProfile
            | Self::StudentProjects
            | Self::StudentEvents => Role::Student,
            Self::FacultyDashboard
            | Self::FacultyProfile
            | Self::FacultyEditProfile
            | Self::FacultyStudents
            | Self::FacultyCourses
            | Self::FacultyProjects => Role::Teacher,
            _ => Role::Admin,
        }
    }

    /// Landing section of a role's dashboard.
    #[must_use]
    pub fn home_for(role: Role) -> Self {
        match role {
            Role::Student => Self::StudentDashboard,
            Role::Teacher => Self::FacultyDashboard,
            Role::Admin => Self::AdminDashboard,
        }
    }

    /// Profile section of a role. Admins have none and land on their dashboard.
    #[must_use]
    pub fn profile_for(role: Role) -> Self {
        match role {
            Role::Student => Self::StudentProfile,
            Role::Teacher => Self::FacultyProfile,
            Role::Admin => Self::AdminDashboard,
        }
    }
}

impl fmt::Display for DashboardSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSection(pub String);

impl fmt::Display for UnknownSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown dashboard section `{}`", self.0)
    }
}

impl std::error::Error for UnknownSection {}

impl FromStr for DashboardSection {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| UnknownSection(s.to_owned()))
    }
}

// ─── Role links ─────────────────────────────────────────────────────────────────

/// Entry in the signed-in user's navbar and dropdown menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardLink {
    pub section: DashboardSection,
    pub icon: &'static str,
    pub text: &'static str,
}

const fn link(section: DashboardSection, icon: &'static str, text: &'static str) -> DashboardLink {
    DashboardLink {
        section,
        icon,
        text,
    }
}

const STUDENT_LINKS: &[DashboardLink] = &[
    link(DashboardSection::StudentDashboard, "fa-tachometer-alt", "Dashboard"),
    link(DashboardSection::StudentProfile, "fa-user", "Profile"),
    link(DashboardSection::StudentProjects, "fa-project-diagram", "My Projects"),
    link(DashboardSection::StudentEvents, "fa-calendar-alt", "Events"),
];

const FACULTY_LINKS: &[DashboardLink] = &[
    link(DashboardSection::FacultyDashboard, "fa-tachometer-alt", "Dashboard"),
    link(DashboardSection::FacultyProfile, "fa-user", "Profile"),
    link(DashboardSection::FacultyStudents, "fa-user-graduate", "Students"),
    link(DashboardSection::FacultyCourses, "fa-book", "Courses"),
    link(DashboardSection::FacultyProjects, "fa-project-diagram", "Projects"),
];

const ADMIN_LINKS: &[DashboardLink] = &[
    link(DashboardSection::AdminDashboard, "fa-tachometer-alt", "Dashboard"),
    link(DashboardSection::AdminUsers, "fa-users", "Users"),
    link(DashboardSection::AdminFaculty, "fa-chalkboard-teacher", "Faculty"),
    link(DashboardSection::AdminPrograms, "fa-graduation-cap", "Programs"),
    link(DashboardSection::AdminProjects, "fa-project-diagram", "Projects"),
    link(DashboardSection::AdminEvents, "fa-calendar-alt", "Events"),
    link(DashboardSection::AdminMessages, "fa-envelope", "Messages"),
];

#[must_use]
pub fn dashboard_links(role: Role) -> &'static [DashboardLink] {
    match role {
        Role::Student => STUDENT_LINKS,
        Role::Teacher => FACULTY_LINKS,
        Role::Admin => ADMIN_LINKS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_every_dashboard_section_once() {
        let mut ids: Vec<_> = DashboardSection::ALL.iter().map(|s| s.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 21);
    }

    #[test]
    fn parse_round_trips_known_ids() {
        for section in DashboardSection::ALL {
            assert_eq!(section.as_str().parse::<DashboardSection>(), Ok(section));
        }
        assert!("about".parse::<DashboardSection>().is_err());
    }

    #[test]
    fn fragment_parsing() {
        assert_eq!(SectionId::from_fragment("#admin-users").as_str(), "admin-users");
        assert!(SectionId::from_fragment("").is_home());
        assert!(SectionId::from_fragment("#").is_home());
    }

    #[test]
    fn teacher_maps_to_faculty_sections() {
        assert_eq!(
            DashboardSection::home_for(Role::Teacher),
            DashboardSection::FacultyDashboard
        );
        assert_eq!(
            DashboardSection::profile_for(Role::Admin),
            DashboardSection::AdminDashboard
        );
        assert_eq!(DashboardSection::AdminToppers.audience(), Role::Admin);
    }

    #[test]
    fn role_links_belong_to_role() {
        for role in [Role::Student, Role::Teacher, Role::Admin] {
            let links = dashboard_links(role);
            assert!(!links.is_empty());
            assert!(links.iter().all(|l| l.section.audience() == role));
        }
        assert_eq!(dashboard_links(Role::Student)[2].text, "My Projects");
    }

    #[test]
    fn public_sections_are_not_dashboards() {
        for section in PublicSection::ALL {
            assert!(SectionId::from(section).dashboard().is_none());
        }
    }
}
