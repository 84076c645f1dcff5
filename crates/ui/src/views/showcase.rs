use dioxus::prelude::*;
use portal_core::{PublicSection, SectionId};

use crate::context::AppContext;
use crate::views::common::{EmptyState, ErrorNotice, ExternalLink, LoadingBlock, SectionHeader};
use crate::views::state::{ViewState, feed_state, use_portal_state};
use crate::vm::{
    ALL_CATEGORIES, EventCardVm, EventTab, ProjectCardVm, TopperCardVm, TopperFilter,
    academic_years, courses, filter_projects, project_categories, split_events, topper_cards,
};

#[component]
pub fn ProjectsSection() -> Element {
    let content = use_portal_state().content;
    let mut category = use_signal(|| ALL_CATEGORIES.to_owned());
    let state = {
        let content = content.read();
        feed_state(
            content.projects.as_ref(),
            content.error(&SectionId::from(PublicSection::Projects)),
        )
    };

    rsx! {
        SectionHeader { title: "Student Projects", subtitle: "Innovation built by our students" }
        match state {
            ViewState::Loading => rsx! { LoadingBlock { label: "projects" } },
            ViewState::Error(message) => rsx! { ErrorNotice { message } },
            ViewState::Ready(projects) => {
                let selected = category();
                let mut filters = vec![ALL_CATEGORIES.to_owned()];
                filters.extend(project_categories(&projects));
                let cards = filter_projects(&projects, &selected);
                rsx! {
                    div { class: "filter-bar",
                        for filter in filters {
                            button {
                                key: "{filter}",
                                class: if filter == selected { "filter-btn active" } else { "filter-btn" },
                                onclick: {
                                    let filter = filter.clone();
                                    move |_| category.set(filter.clone())
                                },
                                if filter == ALL_CATEGORIES { "All" } else { "{filter}" }
                            }
                        }
                    }
                    if cards.is_empty() {
                        EmptyState { icon: "fa-project-diagram", message: "No projects in this category yet." }
                    } else {
                        div { class: "projects-grid",
                            for card in cards {
                                ProjectCard { key: "{card.id}", card }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn ProjectCard(card: ProjectCardVm) -> Element {
    rsx! {
        div { class: "project-card",
            img { class: "project-image", src: "{card.image}", alt: "{card.title}" }
            div { class: "project-body",
                div { class: "project-meta",
                    span { class: "project-category", "{card.category}" }
                    span { class: "badge {card.badge_class}", "{card.status}" }
                }
                h3 { "{card.title}" }
                p { "{card.description}" }
                if let Some(owner) = card.owner.as_deref() {
                    p { class: "project-owner", i { class: "fas fa-user" } " {owner}" }
                }
                div { class: "tag-list",
                    for tech in card.technologies.iter() {
                        span { class: "tag", "{tech}" }
                    }
                }
                div { class: "project-links",
                    if let Some(github) = card.github.clone() {
                        ExternalLink { href: github, icon: "fab fa-github", label: "Code" }
                    }
                    if let Some(demo) = card.demo.clone() {
                        ExternalLink { href: demo, icon: "fas fa-external-link-alt", label: "Demo" }
                    }
                }
            }
        }
    }
}

#[component]
pub fn EventsSection() -> Element {
    let ctx = use_context::<AppContext>();
    let content = use_portal_state().content;
    let mut tab = use_signal(EventTab::default);
    let state = {
        let content = content.read();
        feed_state(
            content.events.as_ref(),
            content.error(&SectionId::from(PublicSection::Events)),
        )
    };
    let today = ctx.clock().today();

    rsx! {
        SectionHeader { title: "Events", subtitle: "Workshops, talks and celebrations" }
        div { class: "tab-bar",
            for option in EventTab::ALL {
                button {
                    key: "{option.label()}",
                    class: if tab() == option { "tab-btn active" } else { "tab-btn" },
                    onclick: move |_| tab.set(option),
                    "{option.label()}"
                }
            }
        }
        match state {
            ViewState::Loading => rsx! { LoadingBlock { label: "events" } },
            ViewState::Error(message) => rsx! { ErrorNotice { message } },
            ViewState::Ready(events) => {
                let buckets = split_events(&events, today);
                let cards = buckets.tab(tab()).to_vec();
                rsx! {
                    if cards.is_empty() {
                        EmptyState { icon: "fa-calendar-times", message: "No events to show." }
                    } else {
                        div { class: "events-grid",
                            for card in cards {
                                EventCard { key: "{card.id}", card, registrable: tab() == EventTab::Upcoming }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn EventCard(card: EventCardVm, registrable: bool) -> Element {
    let ctx = use_context::<AppContext>();
    let mut registering = use_signal(|| false);
    let can_register = registrable && card.is_active && !card.is_full;

    let register = {
        let id = card.id.clone();
        move |_: MouseEvent| {
            if registering() {
                return;
            }
            registering.set(true);
            let content = ctx.content();
            let id = id.clone();
            spawn(async move {
                let _ = content.register_for_event(&id).await;
                registering.set(false);
            });
        }
    };

    rsx! {
        div { class: "event-card",
            div { class: "event-date",
                span { class: "event-day", "{card.day}" }
                span { class: "event-month", "{card.month}" }
            }
            div { class: "event-body",
                h3 { "{card.title}" }
                div { class: "event-meta",
                    span { i { class: "fas fa-clock" } " {card.time}" }
                    span { i { class: "fas fa-map-marker-alt" } " {card.location}" }
                    if let Some(seats) = card.seats_label.as_deref() {
                        span { i { class: "fas fa-users" } " {seats}" }
                    }
                }
                p { "{card.description}" }
                div { class: "event-actions",
                    if registrable {
                        button {
                            class: "btn btn-primary btn-sm",
                            disabled: !can_register || registering(),
                            onclick: register,
                            if card.is_full { "Event Full" } else { "Register" }
                        }
                    }
                    if let Some(link) = card.link.clone() {
                        ExternalLink { href: link, icon: "fas fa-info-circle", label: "Learn More" }
                    }
                }
            }
        }
    }
}

#[component]
pub fn ToppersSection() -> Element {
    let content = use_portal_state().content;
    let mut filter = use_signal(TopperFilter::default);
    let state = {
        let content = content.read();
        feed_state(
            content.toppers.as_ref(),
            content.error(&SectionId::from(PublicSection::Toppers)),
        )
    };

    rsx! {
        SectionHeader { title: "Our Toppers", subtitle: "Celebrating academic excellence" }
        match state {
            ViewState::Loading => rsx! { LoadingBlock { label: "toppers" } },
            ViewState::Error(message) => rsx! { ErrorNotice { message } },
            ViewState::Ready(toppers) => {
                let current = filter();
                let cards = topper_cards(&toppers, &current);
                rsx! {
                    div { class: "filter-bar",
                        select {
                            value: "{current.year}",
                            onchange: move |evt| filter.write().year = evt.value(),
                            option { value: "", "All Years" }
                            for year in academic_years(&toppers) {
                                option { key: "{year}", value: "{year}", "{year}" }
                            }
                        }
                        select {
                            value: "{current.course}",
                            onchange: move |evt| filter.write().course = evt.value(),
                            option { value: "", "All Courses" }
                            for course in courses(&toppers) {
                                option { key: "{course}", value: "{course}", "{course}" }
                            }
                        }
                    }
                    if cards.is_empty() {
                        EmptyState { icon: "fa-trophy", message: "No toppers match these filters." }
                    } else {
                        div { class: "toppers-grid",
                            for card in cards {
                                TopperCard { key: "{card.rank}", card }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn TopperCard(card: TopperCardVm) -> Element {
    rsx! {
        div { class: "topper-card",
            div { class: "topper-rank", "#{card.rank}" }
            img { class: "topper-image", src: "{card.image}", alt: "{card.name}" }
            h3 { "{card.name}" }
            p { class: "topper-course", "{card.course} · {card.year}" }
            div { class: "topper-cgpa", "CGPA: {card.cgpa}" }
            p { class: "topper-achievements", "{card.achievements}" }
            div { class: "social-links",
                if let Some(linkedin) = card.linkedin.clone() {
                    ExternalLink { href: linkedin, icon: "fab fa-linkedin" }
                }
                if let Some(github) = card.github.clone() {
                    ExternalLink { href: github, icon: "fab fa-github" }
                }
                if let Some(email) = card.email.as_deref() {
                    ExternalLink { href: format!("mailto:{email}"), icon: "fas fa-envelope" }
                }
            }
        }
    }
}
