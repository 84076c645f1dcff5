use dioxus::prelude::*;
use portal_core::DashboardSection;
use services::AuthEvent;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::context::AppContext;
use crate::views::{Modal, ModalHost, Navbar, SectionOutlet, ToastStack, use_provide_portal_state};

const FONT_AWESOME: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.4.0/css/all.min.css";

#[component]
pub fn App() -> Element {
    let ctx = use_context::<AppContext>();
    let state = use_provide_portal_state(&ctx);

    use_hook(|| {
        if ctx.take_bootstrap() {
            let services = ctx.services();
            let fragment = ctx.initial_fragment().to_owned();
            spawn(async move {
                match services.bootstrap(&fragment).await {
                    Ok((outcome, _watchers)) => debug!(?outcome, "bootstrap finished"),
                    Err(err) => warn!(error = %err, "bootstrap failed"),
                }
            });
        }
    });

    let events_ctx = ctx.clone();
    use_future(move || {
        let ctx = events_ctx.clone();
        let mut modal = state.modal;
        async move {
            let mut events = ctx.auth().subscribe_events();
            loop {
                let event = match events.recv().await {
                    Ok(event) => event,
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(skipped, "shell missed auth events");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };
                match event {
                    AuthEvent::SignedIn(role) => {
                        // A restored session signs in with no dialog open; stay put.
                        if matches!(modal(), Some(Modal::Login | Modal::Otp)) {
                            modal.set(None);
                            ctx.go(DashboardSection::home_for(role));
                        }
                    }
                    AuthEvent::VerificationRequired { .. } => modal.set(Some(Modal::Otp)),
                    AuthEvent::LoginRequired => modal.set(Some(Modal::Login)),
                    AuthEvent::SignedOut | AuthEvent::NavigateHome => {}
                }
            }
        }
    });

    let theme = state.theme.read().as_str();

    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }
        document::Stylesheet { href: FONT_AWESOME }
        document::Title { "Department Portal" }

        div { class: "app-root", "data-theme": theme,
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Something went wrong" }
                        pre { "{errors:?}" }
                    }
                },
                Navbar {}
                main { class: "portal-main", SectionOutlet {} }
                ModalHost {}
                ToastStack {}
            }
        }
    }
}
