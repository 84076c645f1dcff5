use dioxus::prelude::*;
use portal_core::model::FacultyProfile;
use portal_core::{DashboardSection, SectionId};

use crate::context::AppContext;
use crate::views::common::{EmptyState, ErrorNotice, LoadingBlock, StatGrid};
use crate::views::dashboard::forms::FieldsForm;
use crate::views::state::{ViewState, feed_state, use_portal_state};
use crate::vm::{
    ProfileField, faculty_profile_fields, faculty_profile_rows, faculty_stat_cards, profile_update,
};

#[component]
pub fn FacultyDashboardPanel() -> Element {
    let content = use_portal_state().content;
    let feed = {
        let content = content.read();
        feed_state(
            content.faculty_dashboard.as_ref(),
            content.error(&SectionId::from(DashboardSection::FacultyDashboard)),
        )
    };

    rsx! {
        match feed {
            ViewState::Loading => rsx! { LoadingBlock { label: "your dashboard" } },
            ViewState::Error(message) => rsx! { ErrorNotice { message } },
            ViewState::Ready(data) => rsx! { StatGrid { cards: faculty_stat_cards(&data) } },
        }
    }
}

#[component]
pub fn FacultyProfilePanel() -> Element {
    let ctx = use_context::<AppContext>();
    let state = use_portal_state();
    let fallback_avatar = state
        .auth
        .read()
        .session
        .current_user
        .as_ref()
        .map(portal_core::model::User::avatar_url)
        .unwrap_or_default();
    let feed = {
        let content = state.content.read();
        feed_state(
            content.faculty_profile.as_ref(),
            content.error(&SectionId::from(DashboardSection::FacultyProfile)),
        )
    };

    rsx! {
        match feed {
            ViewState::Loading => rsx! { LoadingBlock { label: "your profile" } },
            ViewState::Error(message) => rsx! { ErrorNotice { message } },
            ViewState::Ready(profile) => {
                let image = profile
                    .avatar
                    .clone()
                    .filter(|url| !url.is_empty())
                    .unwrap_or(fallback_avatar);
                rsx! {
                    div { class: "profile-card",
                        img { class: "profile-avatar", src: "{image}", alt: "{profile.full_name}" }
                        h3 { "{profile.full_name}" }
                        dl { class: "profile-details",
                            for (label, value) in faculty_profile_rows(&profile) {
                                div { class: "profile-row", key: "{label}",
                                    dt { "{label}" }
                                    dd { "{value}" }
                                }
                            }
                        }
                        button {
                            class: "btn btn-primary",
                            onclick: move |_| ctx.go(DashboardSection::FacultyEditProfile),
                            i { class: "fas fa-edit" }
                            " Edit Profile"
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn FacultyEditProfilePanel() -> Element {
    let ctx = use_context::<AppContext>();
    let state = use_portal_state();
    let mut saving = use_signal(|| false);
    let profile = state.content.read().faculty_profile.clone().unwrap_or_else(|| {
        let auth = state.auth.read();
        let user = auth.session.current_user.as_ref();
        FacultyProfile {
            full_name: user.map(|u| u.full_name.clone()).unwrap_or_default(),
            email: user.map(|u| u.email.clone()).unwrap_or_default(),
            ..FacultyProfile::default()
        }
    });
    let cancel_ctx = ctx.clone();

    rsx! {
        FieldsForm {
            fields: faculty_profile_fields(&profile),
            submit_label: "Save Changes",
            busy: saving(),
            on_submit: move |fields: Vec<ProfileField>| {
                let content = ctx.content();
                let ctx = ctx.clone();
                saving.set(true);
                spawn(async move {
                    let saved = content.update_faculty_profile(profile_update(&fields)).await;
                    saving.set(false);
                    if saved.is_ok() {
                        ctx.go(DashboardSection::FacultyProfile);
                    }
                });
            },
            on_cancel: move |()| cancel_ctx.go(DashboardSection::FacultyProfile),
        }
    }
}

/// Students, courses and projects share one layout: the headline count from
/// the dashboard feed, then the listing once the API provides it.
#[component]
pub fn FacultyWorkloadPanel(section: DashboardSection) -> Element {
    let content = use_portal_state().content;
    let data = content.read().faculty_dashboard.clone().unwrap_or_default();
    let (count, noun, icon) = match section {
        DashboardSection::FacultyStudents => (data.students, "students", "fa-user-graduate"),
        DashboardSection::FacultyCourses => (data.courses, "courses", "fa-book"),
        _ => (data.projects, "projects", "fa-project-diagram"),
    };

    rsx! {
        div { class: "dashboard-card workload",
            i { class: "fas {icon} stat-icon" }
            div { class: "stat-number", "{count}" }
            div { class: "stat-label", "Assigned {noun}" }
        }
        EmptyState { icon, message: format!("Detailed {noun} listings are not available yet.") }
    }
}
