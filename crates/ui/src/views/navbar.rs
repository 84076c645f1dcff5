use dioxus::prelude::*;
use portal_core::{PublicSection, SectionId, dashboard_links};
use tracing::warn;

use crate::context::AppContext;
use crate::views::state::{Modal, use_portal_state};

#[component]
pub fn Navbar() -> Element {
    let ctx = use_context::<AppContext>();
    let state = use_portal_state();
    let mut menu_open = use_signal(|| false);

    let mut modal = state.modal;
    let highlighted = state.host.read().highlighted.clone();
    let user = state.auth.read().session.current_user.clone();
    let theme = *state.theme.read();

    let theme_ctx = ctx.clone();
    let toggle_theme = move |_: MouseEvent| {
        let theme = theme_ctx.theme();
        let toasts = theme_ctx.toasts();
        spawn(async move {
            if let Err(err) = theme.toggle().await {
                warn!(error = %err, "theme preference not saved");
                toasts.report_unexpected(&err);
            }
        });
    };

    rsx! {
        nav { class: "navbar",
            div { class: "nav-brand",
                i { class: "fas fa-laptop-code" }
                span { "CSE Department" }
            }
            ul { class: "nav-menu",
                for section in PublicSection::ALL {
                    li { key: "{section.as_str()}",
                        button {
                            class: if highlighted.as_ref().is_some_and(|id| id.as_str() == section.as_str()) { "nav-link active" } else { "nav-link" },
                            onclick: {
                                let ctx = ctx.clone();
                                move |_| ctx.go(section)
                            },
                            "{section.nav_label()}"
                        }
                    }
                }
            }
            div { class: "nav-actions",
                button {
                    class: "theme-toggle",
                    title: "Toggle theme",
                    onclick: toggle_theme,
                    i { class: "fas {theme.icon()}" }
                }
                match user {
                    None => rsx! {
                        button {
                            class: "btn btn-outline",
                            onclick: move |_| modal.set(Some(Modal::Login)),
                            "Login"
                        }
                        button {
                            class: "btn btn-primary",
                            onclick: move |_| modal.set(Some(Modal::Register)),
                            "Register"
                        }
                    },
                    Some(user) => rsx! {
                        div { class: "user-menu",
                            button {
                                class: "user-menu-toggle",
                                onclick: move |_| menu_open.toggle(),
                                img { class: "avatar-sm", src: "{user.avatar_url()}", alt: "{user.full_name}" }
                                span { class: "user-name", "{user.full_name}" }
                                span { class: "badge badge-info", "{user.role.label()}" }
                            }
                            if menu_open() {
                                div { class: "dropdown",
                                    for link in dashboard_links(user.role) {
                                        button {
                                            key: "{link.section}",
                                            class: "dropdown-item",
                                            onclick: {
                                                let ctx = ctx.clone();
                                                let target = SectionId::from(link.section);
                                                move |_| {
                                                    menu_open.set(false);
                                                    ctx.go(target.clone());
                                                }
                                            },
                                            i { class: "fas {link.icon}" }
                                            span { "{link.text}" }
                                        }
                                    }
                                    button {
                                        class: "dropdown-item logout",
                                        onclick: {
                                            let auth = ctx.auth();
                                            move |_| {
                                                menu_open.set(false);
                                                let auth = auth.clone();
                                                spawn(async move { auth.logout().await });
                                            }
                                        },
                                        i { class: "fas fa-sign-out-alt" }
                                        span { "Logout" }
                                    }
                                }
                            }
                        }
                    },
                }
            }
        }
    }
}
