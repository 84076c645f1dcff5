use dioxus::prelude::*;
use portal_core::model::{ContactInfo, ContactSubmission, Program};
use portal_core::{PublicSection, SectionId};

use crate::context::AppContext;
use crate::views::common::{
    EmptyState, ErrorNotice, ExternalLink, LoadingBlock, SectionHeader, StatGrid,
};
use crate::views::state::{ViewState, feed_state, use_portal_state};
use crate::vm::{avatar_or_generated, landing_stat_cards};

#[component]
pub fn HomeSection() -> Element {
    let ctx = use_context::<AppContext>();
    let content = use_portal_state().content;
    let stats = content.read().stats.clone();

    rsx! {
        div { class: "hero",
            div { class: "hero-content",
                h1 { class: "hero-title", "Department of Computer Science & Engineering" }
                p { class: "hero-subtitle", "Innovating the future through technology, research and excellence." }
                div { class: "hero-actions",
                    button {
                        class: "btn btn-primary",
                        onclick: {
                            let ctx = ctx.clone();
                            move |_| ctx.go(PublicSection::Programs)
                        },
                        "Explore Programs"
                    }
                    button {
                        class: "btn btn-outline",
                        onclick: move |_| ctx.go(PublicSection::Contact),
                        "Contact Us"
                    }
                }
            }
        }
        match stats {
            Some(stats) => rsx! { StatGrid { cards: landing_stat_cards(&stats) } },
            None => rsx! { LoadingBlock { label: "statistics" } },
        }
    }
}

#[component]
pub fn AboutSection() -> Element {
    let content = use_portal_state().content;
    let about = content.read().about.clone();

    rsx! {
        SectionHeader { title: "About Us" }
        match about {
            None => rsx! { LoadingBlock { label: "department details" } },
            Some(about) => rsx! {
                div { class: "about-grid",
                    div { class: "about-text",
                        h3 { "{about.university}" }
                        h4 { "{about.department}" }
                        p { "{about.description}" }
                    }
                    div { class: "about-cards",
                        div { class: "about-card",
                            i { class: "fas fa-eye" }
                            h4 { "Vision" }
                            p { "{about.vision}" }
                        }
                        div { class: "about-card",
                            i { class: "fas fa-bullseye" }
                            h4 { "Mission" }
                            p { "{about.mission}" }
                        }
                    }
                }
            },
        }
    }
}

#[component]
pub fn ProgramsSection() -> Element {
    let content = use_portal_state().content;
    let programs = content.read().programs.clone();

    rsx! {
        SectionHeader { title: "Academic Programs" }
        match programs {
            None => rsx! { EmptyState { icon: "fa-graduation-cap", message: "Program details are not available right now." } },
            Some(programs) if programs.is_empty() => rsx! {
                EmptyState { icon: "fa-graduation-cap", message: "No programs listed yet." }
            },
            Some(programs) => rsx! {
                div { class: "programs-grid",
                    for program in programs.into_iter().filter(|p| p.is_active) {
                        ProgramCard { key: "{program.id}", program }
                    }
                }
            },
        }
    }
}

#[component]
fn ProgramCard(program: Program) -> Element {
    let icon = program.icon.as_deref().unwrap_or("fa-graduation-cap");
    rsx! {
        div { class: "program-card",
            i { class: "fas {icon} program-icon" }
            h3 { "{program.name}" }
            p { "{program.description}" }
            if !program.highlights.is_empty() {
                ul { class: "program-highlights",
                    for highlight in program.highlights.iter() {
                        li { "{highlight}" }
                    }
                }
            }
            div { class: "program-meta",
                if let Some(duration) = program.duration.as_deref() {
                    span { i { class: "fas fa-clock" } " {duration}" }
                }
                if let Some(seats) = program.seats {
                    span { i { class: "fas fa-chair" } " {seats} seats" }
                }
            }
        }
    }
}

#[component]
pub fn FacultySection() -> Element {
    let content = use_portal_state().content;
    let state = {
        let content = content.read();
        feed_state(
            content.faculty.as_ref(),
            content.error(&SectionId::from(PublicSection::Faculty)),
        )
    };

    rsx! {
        SectionHeader { title: "Our Faculty", subtitle: "Meet the people who teach and mentor our students" }
        match state {
            ViewState::Loading => rsx! { LoadingBlock { label: "faculty" } },
            ViewState::Error(message) => rsx! { ErrorNotice { message } },
            ViewState::Ready(members) if members.is_empty() => rsx! {
                EmptyState { icon: "fa-chalkboard-teacher", message: "No faculty members listed yet." }
            },
            ViewState::Ready(members) => rsx! {
                div { class: "faculty-grid",
                    for member in members {
                        div { class: "faculty-card", key: "{member.id}",
                            img {
                                class: "faculty-image",
                                src: "{avatar_or_generated(member.image.as_deref(), &member.name)}",
                                alt: "{member.name}",
                            }
                            h3 { "{member.name}" }
                            p { class: "faculty-designation", "{member.designation}" }
                            p { class: "faculty-qualification", "{member.qualification}" }
                            if !member.expertise.is_empty() {
                                div { class: "tag-list",
                                    for area in member.expertise.iter() {
                                        span { class: "tag", "{area}" }
                                    }
                                }
                            }
                            div { class: "social-links",
                                if let Some(linkedin) = member.linkedin.clone() {
                                    ExternalLink { href: linkedin, icon: "fab fa-linkedin" }
                                }
                                if let Some(email) = member.email.as_deref() {
                                    ExternalLink { href: format!("mailto:{email}"), icon: "fas fa-envelope" }
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
pub fn ContactSection() -> Element {
    let content = use_portal_state().content;
    let info = content.read().contact.clone().unwrap_or_default();

    rsx! {
        SectionHeader { title: "Contact Us", subtitle: "We would love to hear from you" }
        div { class: "contact-grid",
            ContactDetails { info }
            ContactForm {}
        }
    }
}

#[component]
fn ContactDetails(info: ContactInfo) -> Element {
    let items = [
        ("fa-map-marker-alt", "Address", info.address_or_default().to_owned()),
        ("fa-phone", "Phone", info.phone_or_default().to_owned()),
        ("fa-envelope", "Email", info.email_or_default().to_owned()),
        ("fa-clock", "Office Hours", info.hours_or_default().to_owned()),
    ];
    rsx! {
        div { class: "contact-info",
            for (icon, label, value) in items {
                div { class: "contact-item", key: "{label}",
                    i { class: "fas {icon}" }
                    div {
                        h4 { "{label}" }
                        p { "{value}" }
                    }
                }
            }
        }
    }
}

#[component]
fn ContactForm() -> Element {
    let ctx = use_context::<AppContext>();
    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut subject = use_signal(String::new);
    let mut message = use_signal(String::new);
    let mut sending = use_signal(|| false);

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        if sending() {
            return;
        }
        let content = ctx.content();
        let submission = ContactSubmission {
            name: name(),
            email: email(),
            subject: subject(),
            message: message(),
        };
        sending.set(true);
        spawn(async move {
            if content.submit_contact(submission).await.is_ok() {
                name.set(String::new());
                email.set(String::new());
                subject.set(String::new());
                message.set(String::new());
            }
            sending.set(false);
        });
    };

    rsx! {
        form { class: "contact-form", onsubmit: submit,
            input { r#type: "text", placeholder: "Your Name", value: "{name}", oninput: move |evt| name.set(evt.value()) }
            input { r#type: "email", placeholder: "Your Email", value: "{email}", oninput: move |evt| email.set(evt.value()) }
            input { r#type: "text", placeholder: "Subject", value: "{subject}", oninput: move |evt| subject.set(evt.value()) }
            textarea { placeholder: "Your Message", rows: "5", value: "{message}", oninput: move |evt| message.set(evt.value()) }
            button { class: "btn btn-primary", r#type: "submit", disabled: sending(),
                if sending() { "Sending..." } else { "Send Message" }
            }
        }
    }
}
