use std::future::Future;
use std::sync::Arc;

use dioxus::prelude::*;
use portal_core::model::Analytics;
use portal_core::{DashboardSection, SectionId};
use services::{ContentError, ContentService};
use tracing::debug;

use crate::context::AppContext;
use crate::views::common::{
    Badge, ConfirmButton, EmptyState, ErrorNotice, LoadingBlock, StatGrid,
};
use crate::views::dashboard::forms::FieldsForm;
use crate::views::state::{ViewState, feed_state, use_portal_state};
use crate::vm::{
    ProfileField, ProjectCardVm, TopperFilter, admin_stat_cards, department_fields,
    department_info, map_event_cards, or_dash, status_badge_class, topper_cards, truncate,
};

/// Run an admin mutation off the render path. Server rejections are already
/// toasted; anything else is reported as unexpected.
fn run<F, Fut>(ctx: &AppContext, action: &'static str, op: F)
where
    F: FnOnce(Arc<ContentService>) -> Fut + 'static,
    Fut: Future<Output = Result<(), ContentError>> + 'static,
{
    let content = ctx.content();
    let toasts = ctx.toasts();
    spawn(async move {
        match op(content).await {
            Ok(()) => {}
            Err(err @ ContentError::Api(_)) => debug!(action, error = %err, "admin action failed"),
            Err(err) => toasts.report_unexpected(&err),
        }
    });
}

fn seats(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_owned(), |seats| seats.to_string())
}

fn feed<T: Clone>(
    content: &services::ContentState,
    data: Option<&T>,
    section: DashboardSection,
) -> ViewState<T> {
    feed_state(data, content.error(&SectionId::from(section)))
}

#[component]
pub fn AdminDashboardPanel() -> Element {
    let content = use_portal_state().content;
    let state = {
        let content = content.read();
        feed(&content, content.admin_dashboard.as_ref(), DashboardSection::AdminDashboard)
    };

    rsx! {
        match state {
            ViewState::Loading => rsx! { LoadingBlock { label: "admin dashboard" } },
            ViewState::Error(message) => rsx! { ErrorNotice { message } },
            ViewState::Ready(data) => rsx! {
                StatGrid { cards: admin_stat_cards(&data) }
                div { class: "dashboard-card",
                    h3 { "Recent Students" }
                    if data.recent_students.is_empty() {
                        EmptyState { icon: "fa-user-graduate", message: "No recent registrations." }
                    } else {
                        table { class: "data-table",
                            thead { tr { th { "Name" } th { "Registration No" } th { "Course" } th { "Joined" } } }
                            tbody {
                                for (index, student) in data.recent_students.iter().enumerate() {
                                    tr { key: "{index}",
                                        td { "{student.name}" }
                                        td { "{student.registration_no}" }
                                        td { "{student.course}" }
                                        td { "{student.joined}" }
                                    }
                                }
                            }
                        }
                    }
                }
                if let Some(analytics) = data.analytics.clone() {
                    AnalyticsTable { analytics }
                }
            },
        }
    }
}

#[component]
fn AnalyticsTable(analytics: Analytics) -> Element {
    let count = |values: &[u64], index: usize| values.get(index).copied().unwrap_or_default();
    let rows: Vec<(String, u64, u64, u64)> = analytics
        .dates
        .iter()
        .enumerate()
        .map(|(i, date)| {
            (
                date.clone(),
                count(&analytics.students, i),
                count(&analytics.teachers, i),
                count(&analytics.projects, i),
            )
        })
        .collect();

    rsx! {
        div { class: "dashboard-card",
            h3 { "Registrations" }
            if rows.is_empty() {
                EmptyState { icon: "fa-chart-line", message: "No analytics recorded yet." }
            } else {
                table { class: "data-table",
                    thead { tr { th { "Date" } th { "Students" } th { "Teachers" } th { "Projects" } } }
                    tbody {
                        for (date, students, teachers, projects) in rows {
                            tr { key: "{date}",
                                td { "{date}" }
                                td { "{students}" }
                                td { "{teachers}" }
                                td { "{projects}" }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn AdminAnalyticsPanel() -> Element {
    let content = use_portal_state().content;
    let analytics = content
        .read()
        .admin_dashboard
        .as_ref()
        .and_then(|data| data.analytics.clone());

    rsx! {
        match analytics {
            Some(analytics) => rsx! { AnalyticsTable { analytics } },
            None => rsx! {
                EmptyState { icon: "fa-chart-line", message: "Open the dashboard to load analytics." }
            },
        }
    }
}

#[component]
pub fn AdminUsersPanel() -> Element {
    let ctx = use_context::<AppContext>();
    let content = use_portal_state().content;
    let state = {
        let content = content.read();
        feed(&content, content.admin_users.as_ref(), DashboardSection::AdminUsers)
    };

    rsx! {
        match state {
            ViewState::Loading => rsx! { LoadingBlock { label: "users" } },
            ViewState::Error(message) => rsx! { ErrorNotice { message } },
            ViewState::Ready(data) if data.users.is_empty() => rsx! {
                EmptyState { icon: "fa-users", message: "No users found." }
            },
            ViewState::Ready(data) => rsx! {
                table { class: "data-table",
                    thead { tr { th { "Name" } th { "Email" } th { "Role" } th { "Status" } th { "Joined" } th {} } }
                    tbody {
                        for user in data.users {
                            tr { key: "{user.id}",
                                td { "{user.full_name}" }
                                td { "{user.email}" }
                                td { Badge { class: "badge-info", text: user.role.label() } }
                                td {
                                    if user.is_verified {
                                        Badge { class: "badge-success", text: "Verified" }
                                    } else {
                                        Badge { class: "badge-warning", text: "Unverified" }
                                    }
                                    if !user.is_active {
                                        Badge { class: "badge-danger", text: "Inactive" }
                                    }
                                }
                                td { "{or_dash(user.created_at.as_deref())}" }
                                td {
                                    ConfirmButton {
                                        label: "Delete",
                                        on_confirm: {
                                            let ctx = ctx.clone();
                                            let id = user.id.clone();
                                            move |()| {
                                                let id = id.clone();
                                                run(&ctx, "delete user", move |content| async move {
                                                    content.delete_user(&id).await
                                                });
                                            }
                                        },
                                    }
                                }
                            }
                        }
                    }
                }
            },
        }
    }
}

#[component]
pub fn AdminFacultyPanel() -> Element {
    let ctx = use_context::<AppContext>();
    let content = use_portal_state().content;
    let state = {
        let content = content.read();
        feed(&content, content.admin_faculty.as_ref(), DashboardSection::AdminFaculty)
    };

    rsx! {
        match state {
            ViewState::Loading => rsx! { LoadingBlock { label: "faculty" } },
            ViewState::Error(message) => rsx! { ErrorNotice { message } },
            ViewState::Ready(members) if members.is_empty() => rsx! {
                EmptyState { icon: "fa-chalkboard-teacher", message: "No faculty members yet." }
            },
            ViewState::Ready(members) => rsx! {
                table { class: "data-table",
                    thead { tr { th { "Name" } th { "Designation" } th { "Qualification" } th { "Email" } th {} } }
                    tbody {
                        for member in members {
                            tr { key: "{member.id}",
                                td { "{member.name}" }
                                td { "{member.designation}" }
                                td { "{member.qualification}" }
                                td { "{or_dash(member.email.as_deref())}" }
                                td {
                                    ConfirmButton {
                                        label: "Delete",
                                        on_confirm: {
                                            let ctx = ctx.clone();
                                            let id = member.id.clone();
                                            move |()| {
                                                let id = id.clone();
                                                run(&ctx, "delete faculty", move |content| async move {
                                                    content.delete_faculty_member(&id).await
                                                });
                                            }
                                        },
                                    }
                                }
                            }
                        }
                    }
                }
            },
        }
    }
}

#[component]
pub fn AdminProgramsPanel() -> Element {
    let ctx = use_context::<AppContext>();
    let content = use_portal_state().content;
    let state = {
        let content = content.read();
        feed(&content, content.admin_programs.as_ref(), DashboardSection::AdminPrograms)
    };

    rsx! {
        match state {
            ViewState::Loading => rsx! { LoadingBlock { label: "programs" } },
            ViewState::Error(message) => rsx! { ErrorNotice { message } },
            ViewState::Ready(programs) if programs.is_empty() => rsx! {
                EmptyState { icon: "fa-graduation-cap", message: "No programs yet." }
            },
            ViewState::Ready(programs) => rsx! {
                table { class: "data-table",
                    thead { tr { th { "Program" } th { "Duration" } th { "Seats" } th { "Status" } th {} } }
                    tbody {
                        for program in programs {
                            tr { key: "{program.id}",
                                td { "{program.name}" }
                                td { "{or_dash(program.duration.as_deref())}" }
                                td { "{seats(program.seats)}" }
                                td {
                                    if program.is_active {
                                        Badge { class: "badge-success", text: "Active" }
                                    } else {
                                        Badge { class: "badge-secondary", text: "Inactive" }
                                    }
                                }
                                td {
                                    ConfirmButton {
                                        label: "Delete",
                                        on_confirm: {
                                            let ctx = ctx.clone();
                                            let id = program.id.clone();
                                            move |()| {
                                                let id = id.clone();
                                                run(&ctx, "delete program", move |content| async move {
                                                    content.delete_program(&id).await
                                                });
                                            }
                                        },
                                    }
                                }
                            }
                        }
                    }
                }
            },
        }
    }
}

#[component]
pub fn AdminProjectsPanel() -> Element {
    let ctx = use_context::<AppContext>();
    let content = use_portal_state().content;
    let state = {
        let content = content.read();
        feed(&content, content.admin_projects.as_ref(), DashboardSection::AdminProjects)
    };

    rsx! {
        match state {
            ViewState::Loading => rsx! { LoadingBlock { label: "projects" } },
            ViewState::Error(message) => rsx! { ErrorNotice { message } },
            ViewState::Ready(projects) if projects.is_empty() => rsx! {
                EmptyState { icon: "fa-project-diagram", message: "No projects submitted yet." }
            },
            ViewState::Ready(projects) => rsx! {
                table { class: "data-table",
                    thead { tr { th { "Title" } th { "Category" } th { "Owner" } th { "Status" } th {} } }
                    tbody {
                        for card in projects.iter().map(ProjectCardVm::from) {
                            tr { key: "{card.id}",
                                td { "{card.title}" }
                                td { "{card.category}" }
                                td { "{or_dash(card.owner.as_deref())}" }
                                td { Badge { class: card.badge_class, text: card.status.clone() } }
                                td {
                                    ConfirmButton {
                                        label: "Delete",
                                        on_confirm: {
                                            let ctx = ctx.clone();
                                            let id = card.id.clone();
                                            move |()| {
                                                let id = id.clone();
                                                run(&ctx, "delete project", move |content| async move {
                                                    content.delete_project(&id).await
                                                });
                                            }
                                        },
                                    }
                                }
                            }
                        }
                    }
                }
            },
        }
    }
}

#[component]
pub fn AdminEventsPanel() -> Element {
    let ctx = use_context::<AppContext>();
    let content = use_portal_state().content;
    let state = {
        let content = content.read();
        feed(&content, content.admin_events.as_ref(), DashboardSection::AdminEvents)
    };

    rsx! {
        match state {
            ViewState::Loading => rsx! { LoadingBlock { label: "events" } },
            ViewState::Error(message) => rsx! { ErrorNotice { message } },
            ViewState::Ready(events) if events.is_empty() => rsx! {
                EmptyState { icon: "fa-calendar-alt", message: "No events scheduled." }
            },
            ViewState::Ready(events) => rsx! {
                table { class: "data-table",
                    thead { tr { th { "Event" } th { "Date" } th { "Location" } th { "Seats" } th { "Status" } th {} } }
                    tbody {
                        for card in map_event_cards(&events) {
                            tr { key: "{card.id}",
                                td { "{card.title}" }
                                td { "{card.day} {card.month}" }
                                td { "{card.location}" }
                                td { "{card.seats_label.clone().unwrap_or_default()}" }
                                td {
                                    if card.is_active {
                                        Badge { class: "badge-success", text: "Active" }
                                    } else {
                                        Badge { class: "badge-secondary", text: "Inactive" }
                                    }
                                }
                                td {
                                    ConfirmButton {
                                        label: "Delete",
                                        on_confirm: {
                                            let ctx = ctx.clone();
                                            let id = card.id.clone();
                                            move |()| {
                                                let id = id.clone();
                                                run(&ctx, "delete event", move |content| async move {
                                                    content.delete_event(&id).await
                                                });
                                            }
                                        },
                                    }
                                }
                            }
                        }
                    }
                }
            },
        }
    }
}

#[component]
pub fn AdminMessagesPanel() -> Element {
    let ctx = use_context::<AppContext>();
    let content = use_portal_state().content;
    let state = {
        let content = content.read();
        feed(&content, content.admin_messages.as_ref(), DashboardSection::AdminMessages)
    };

    rsx! {
        match state {
            ViewState::Loading => rsx! { LoadingBlock { label: "messages" } },
            ViewState::Error(message) => rsx! { ErrorNotice { message } },
            ViewState::Ready(inbox) => rsx! {
                p { class: "inbox-summary",
                    Badge { class: "badge-info", text: format!("{} unread", inbox.unread_count) }
                }
                if inbox.messages.is_empty() {
                    EmptyState { icon: "fa-envelope-open", message: "No unread messages." }
                } else {
                    div { class: "message-list",
                        for message in inbox.messages {
                            div {
                                key: "{message.id}",
                                class: if message.is_read { "message-card" } else { "message-card unread" },
                                div { class: "message-head",
                                    strong { "{message.subject}" }
                                    span { class: "message-from", "{message.name} <{message.email}>" }
                                    small { "{or_dash(message.created_at.as_deref())}" }
                                }
                                p { "{truncate(&message.message, 240)}" }
                                div { class: "message-actions",
                                    if message.replied {
                                        Badge { class: status_badge_class("completed"), text: "Replied" }
                                    }
                                    if !message.is_read {
                                        button {
                                            class: "btn btn-sm btn-secondary",
                                            onclick: {
                                                let ctx = ctx.clone();
                                                let id = message.id.clone();
                                                move |_| {
                                                    let id = id.clone();
                                                    run(&ctx, "mark message read", move |content| async move {
                                                        content.mark_message_read(&id).await
                                                    });
                                                }
                                            },
                                            "Mark as read"
                                        }
                                    }
                                    button {
                                        class: "btn btn-sm btn-outline",
                                        onclick: {
                                            let ctx = ctx.clone();
                                            let mailto = format!(
                                                "mailto:{}?subject=Re:%20{}",
                                                message.email,
                                                message.subject.replace(' ', "%20")
                                            );
                                            move |_| ctx.open_link(&mailto)
                                        },
                                        "Reply"
                                    }
                                }
                            }
                        }
                    }
                }
            },
        }
    }
}

#[component]
pub fn AdminSettingsPanel() -> Element {
    let ctx = use_context::<AppContext>();
    let content = use_portal_state().content;
    let mut saving = use_signal(|| false);
    let state = {
        let content = content.read();
        feed(&content, content.department_info.as_ref(), DashboardSection::AdminSettings)
    };

    rsx! {
        match state {
            ViewState::Loading => rsx! { LoadingBlock { label: "settings" } },
            ViewState::Error(message) => rsx! { ErrorNotice { message } },
            ViewState::Ready(info) => rsx! {
                FieldsForm {
                    fields: department_fields(&info),
                    submit_label: "Save Settings",
                    busy: saving(),
                    on_submit: move |fields: Vec<ProfileField>| {
                        let info = department_info(&fields);
                        saving.set(true);
                        let content = ctx.content();
                        spawn(async move {
                            let _ = content.update_department_info(info).await;
                            saving.set(false);
                        });
                    },
                }
            },
        }
    }
}

#[component]
pub fn AdminToppersPanel() -> Element {
    let content = use_portal_state().content;
    let cards = content
        .read()
        .toppers
        .as_deref()
        .map(|toppers| topper_cards(toppers, &TopperFilter::default()))
        .unwrap_or_default();

    rsx! {
        if cards.is_empty() {
            EmptyState { icon: "fa-trophy", message: "No toppers loaded." }
        } else {
            table { class: "data-table",
                thead { tr { th { "Rank" } th { "Name" } th { "Course" } th { "Year" } th { "CGPA" } } }
                tbody {
                    for card in cards {
                        tr { key: "{card.rank}",
                            td { "{card.rank}" }
                            td { "{card.name}" }
                            td { "{card.course}" }
                            td { "{card.year}" }
                            td { "{card.cgpa}" }
                        }
                    }
                }
            }
        }
    }
}
