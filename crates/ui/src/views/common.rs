use dioxus::prelude::*;

use crate::context::AppContext;
use crate::vm::StatCardVm;

#[component]
pub fn SectionHeader(
    #[props(into)] title: String,
    #[props(into)] subtitle: Option<String>,
) -> Element {
    rsx! {
        div { class: "section-header",
            h2 { class: "section-title", "{title}" }
            if let Some(subtitle) = subtitle {
                p { class: "section-subtitle", "{subtitle}" }
            }
        }
    }
}

#[component]
pub fn StatGrid(cards: Vec<StatCardVm>) -> Element {
    rsx! {
        div { class: "stats-grid",
            for card in cards {
                div { class: "stat-card", key: "{card.label}",
                    i { class: "fas {card.icon} stat-icon" }
                    div { class: "stat-number", "{card.value}" }
                    div { class: "stat-label", "{card.label}" }
                }
            }
        }
    }
}

#[component]
pub fn LoadingBlock(#[props(into)] label: String) -> Element {
    rsx! {
        div { class: "loading-block",
            i { class: "fas fa-spinner fa-spin" }
            span { "Loading {label}..." }
        }
    }
}

#[component]
pub fn ErrorNotice(#[props(into)] message: String) -> Element {
    rsx! {
        div { class: "error-notice",
            i { class: "fas fa-exclamation-triangle" }
            span { "{message}" }
        }
    }
}

#[component]
pub fn EmptyState(#[props(into)] icon: String, #[props(into)] message: String) -> Element {
    rsx! {
        div { class: "empty-state",
            i { class: "fas {icon}" }
            p { "{message}" }
        }
    }
}

/// Button that opens `href` with the system handler.
#[component]
pub fn ExternalLink(
    #[props(into)] href: String,
    #[props(into)] icon: String,
    #[props(into)] label: Option<String>,
) -> Element {
    let ctx = use_context::<AppContext>();
    rsx! {
        button {
            class: "link-button",
            r#type: "button",
            title: "{href}",
            onclick: move |_| ctx.open_link(&href),
            i { class: "{icon}" }
            if let Some(label) = label {
                span { "{label}" }
            }
        }
    }
}

/// Two-step destructive button: the first click arms it, the second runs `on_confirm`.
#[component]
pub fn ConfirmButton(#[props(into)] label: String, on_confirm: EventHandler<()>) -> Element {
    let mut armed = use_signal(|| false);
    rsx! {
        if armed() {
            span { class: "confirm-group",
                button {
                    class: "btn btn-danger btn-sm",
                    onclick: move |_| {
                        armed.set(false);
                        on_confirm.call(());
                    },
                    "Confirm"
                }
                button { class: "btn btn-secondary btn-sm", onclick: move |_| armed.set(false), "Cancel" }
            }
        } else {
            button { class: "btn btn-outline-danger btn-sm", onclick: move |_| armed.set(true), "{label}" }
        }
    }
}

#[component]
pub fn Badge(#[props(into)] class: String, #[props(into)] text: String) -> Element {
    rsx! {
        span { class: "badge {class}", "{text}" }
    }
}
