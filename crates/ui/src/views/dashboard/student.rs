use dioxus::prelude::*;
use portal_core::model::StudentProfile;
use portal_core::{DashboardSection, SectionId};

use crate::context::AppContext;
use crate::views::common::{EmptyState, ErrorNotice, LoadingBlock, StatGrid};
use crate::views::dashboard::forms::FieldsForm;
use crate::views::showcase::{EventCard, ProjectCard};
use crate::views::state::{ViewState, feed_state, use_portal_state};
use crate::vm::{
    ProfileField, ProjectCardVm, map_event_cards, profile_update, student_profile_fields,
    student_profile_rows, student_stat_cards,
};

#[component]
pub fn StudentDashboardPanel() -> Element {
    let state = use_portal_state();
    let name = state
        .auth
        .read()
        .session
        .current_user
        .as_ref()
        .map(|user| user.full_name.clone())
        .unwrap_or_default();
    let feed = {
        let content = state.content.read();
        feed_state(
            content.student_dashboard.as_ref(),
            content.error(&SectionId::from(DashboardSection::StudentDashboard)),
        )
    };

    rsx! {
        p { class: "dashboard-welcome", "Welcome back, {name}!" }
        match feed {
            ViewState::Loading => rsx! { LoadingBlock { label: "your dashboard" } },
            ViewState::Error(message) => rsx! { ErrorNotice { message } },
            ViewState::Ready(data) => rsx! {
                StatGrid { cards: student_stat_cards(&data) }
                div { class: "dashboard-columns",
                    div { class: "dashboard-card",
                        h3 { "Recent Activity" }
                        if data.activities.is_empty() {
                            EmptyState { icon: "fa-stream", message: "No recent activity." }
                        } else {
                            ul { class: "activity-list",
                                for activity in data.activities.iter() {
                                    li { class: "activity-item",
                                        i { class: "fas {activity.icon_class()}" }
                                        div {
                                            strong { "{activity.title}" }
                                            p { "{activity.description}" }
                                            small { "{activity.date}" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                    div { class: "dashboard-card",
                        h3 { "Upcoming Events" }
                        if data.upcoming_events.is_empty() {
                            EmptyState { icon: "fa-calendar", message: "No upcoming events." }
                        } else {
                            for card in map_event_cards(&data.upcoming_events) {
                                EventCard { key: "{card.id}", card, registrable: false }
                            }
                        }
                    }
                }
            },
        }
    }
}

#[component]
pub fn StudentProfilePanel() -> Element {
    let ctx = use_context::<AppContext>();
    let state = use_portal_state();
    let avatar = state
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
            content.student_profile.as_ref(),
            content.error(&SectionId::from(DashboardSection::StudentProfile)),
        )
    };

    rsx! {
        match feed {
            ViewState::Loading => rsx! { LoadingBlock { label: "your profile" } },
            ViewState::Error(message) => rsx! { ErrorNotice { message } },
            ViewState::Ready(profile) => {
                let image = profile.avatar.clone().filter(|url| !url.is_empty()).unwrap_or(avatar);
                rsx! {
                    div { class: "profile-card",
                        img { class: "profile-avatar", src: "{image}", alt: "{profile.full_name}" }
                        h3 { "{profile.full_name}" }
                        dl { class: "profile-details",
                            for (label, value) in student_profile_rows(&profile) {
                                div { class: "profile-row", key: "{label}",
                                    dt { "{label}" }
                                    dd { "{value}" }
                                }
                            }
                        }
                        button {
                            class: "btn btn-primary",
                            onclick: move |_| ctx.go(DashboardSection::StudentEditProfile),
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
pub fn StudentEditProfilePanel() -> Element {
    let ctx = use_context::<AppContext>();
    let state = use_portal_state();
    let mut saving = use_signal(|| false);
    let profile = state.content.read().student_profile.clone().unwrap_or_else(|| {
        let auth = state.auth.read();
        let user = auth.session.current_user.as_ref();
        StudentProfile {
            full_name: user.map(|u| u.full_name.clone()).unwrap_or_default(),
            email: user.map(|u| u.email.clone()).unwrap_or_default(),
            ..StudentProfile::default()
        }
    });
    let fields = student_profile_fields(&profile);
    let cancel_ctx = ctx.clone();

    rsx! {
        FieldsForm {
            fields,
            submit_label: "Save Changes",
            busy: saving(),
            on_submit: move |fields: Vec<ProfileField>| {
                let content = ctx.content();
                let ctx = ctx.clone();
                saving.set(true);
                spawn(async move {
                    let saved = content.update_student_profile(profile_update(&fields)).await;
                    saving.set(false);
                    if saved.is_ok() {
                        ctx.go(DashboardSection::StudentProfile);
                    }
                });
            },
            on_cancel: move |()| cancel_ctx.go(DashboardSection::StudentProfile),
        }
    }
}

/// Projects the student owns, matched by name against the public listing.
#[component]
pub fn StudentProjectsPanel() -> Element {
    let state = use_portal_state();
    let name = state
        .auth
        .read()
        .session
        .current_user
        .as_ref()
        .map(|user| user.full_name.clone())
        .unwrap_or_default();
    let cards: Vec<ProjectCardVm> = state
        .content
        .read()
        .projects
        .iter()
        .flatten()
        .filter(|project| project.owner.as_deref() == Some(name.as_str()))
        .map(ProjectCardVm::from)
        .collect();

    rsx! {
        if cards.is_empty() {
            EmptyState { icon: "fa-project-diagram", message: "You have no projects listed yet." }
        } else {
            div { class: "projects-grid",
                for card in cards {
                    ProjectCard { key: "{card.id}", card }
                }
            }
        }
    }
}

#[component]
pub fn StudentEventsPanel() -> Element {
    let state = use_portal_state();
    let events = state
        .content
        .read()
        .student_dashboard
        .as_ref()
        .map(|data| map_event_cards(&data.upcoming_events))
        .unwrap_or_default();

    rsx! {
        if events.is_empty() {
            EmptyState { icon: "fa-calendar-alt", message: "No events you can register for right now." }
        } else {
            div { class: "events-grid",
                for card in events {
                    EventCard { key: "{card.id}", card, registrable: true }
                }
            }
        }
    }
}
