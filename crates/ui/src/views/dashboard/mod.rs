mod admin;
mod faculty;
mod forms;
mod student;

use dioxus::prelude::*;
use portal_core::DashboardSection;

use crate::views::common::EmptyState;
use crate::views::state::use_portal_state;
use crate::vm::section_title;

use admin::{
    AdminAnalyticsPanel, AdminDashboardPanel, AdminEventsPanel, AdminFacultyPanel,
    AdminMessagesPanel, AdminProgramsPanel, AdminProjectsPanel, AdminSettingsPanel,
    AdminToppersPanel, AdminUsersPanel,
};
use faculty::{
    FacultyDashboardPanel, FacultyEditProfilePanel, FacultyProfilePanel, FacultyWorkloadPanel,
};
use student::{
    StudentDashboardPanel, StudentEditProfilePanel, StudentEventsPanel, StudentProfilePanel,
    StudentProjectsPanel,
};

/// Frame for every signed-in area; the body only renders for the owning role.
#[component]
pub fn DashboardView(section: DashboardSection) -> Element {
    let role = use_portal_state().auth.read().role();
    let allowed = role == Some(section.audience());

    rsx! {
        div { class: "dashboard",
            div { class: "dashboard-header",
                h2 { "{section_title(section)}" }
            }
            if allowed {
                DashboardBody { section }
            } else {
                EmptyState { icon: "fa-lock", message: "Sign in as {section.audience().label()} to view this page." }
            }
        }
    }
}

#[component]
fn DashboardBody(section: DashboardSection) -> Element {
    use DashboardSection as S;
    match section {
        S::StudentDashboard => rsx! { StudentDashboardPanel {} },
        S::StudentProfile => rsx! { StudentProfilePanel {} },
        S::StudentEditProfile => rsx! { StudentEditProfilePanel {} },
        S::StudentProjects => rsx! { StudentProjectsPanel {} },
        S::StudentEvents => rsx! { StudentEventsPanel {} },
        S::FacultyDashboard => rsx! { FacultyDashboardPanel {} },
        S::FacultyProfile => rsx! { FacultyProfilePanel {} },
        S::FacultyEditProfile => rsx! { FacultyEditProfilePanel {} },
        S::FacultyStudents | S::FacultyCourses | S::FacultyProjects => {
            rsx! { FacultyWorkloadPanel { section } }
        }
        S::AdminDashboard => rsx! { AdminDashboardPanel {} },
        S::AdminUsers => rsx! { AdminUsersPanel {} },
        S::AdminFaculty => rsx! { AdminFacultyPanel {} },
        S::AdminPrograms => rsx! { AdminProgramsPanel {} },
        S::AdminProjects => rsx! { AdminProjectsPanel {} },
        S::AdminEvents => rsx! { AdminEventsPanel {} },
        S::AdminMessages => rsx! { AdminMessagesPanel {} },
        S::AdminAnalytics => rsx! { AdminAnalyticsPanel {} },
        S::AdminSettings => rsx! { AdminSettingsPanel {} },
        S::AdminToppers => rsx! { AdminToppersPanel {} },
    }
}
