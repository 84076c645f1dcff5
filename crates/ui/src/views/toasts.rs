use dioxus::prelude::*;

use crate::context::AppContext;
use crate::views::state::use_portal_state;

#[component]
pub fn ToastStack() -> Element {
    let ctx = use_context::<AppContext>();
    let toasts = use_portal_state().toasts;

    rsx! {
        div { class: "toast-container",
            for toast in toasts() {
                div {
                    key: "{toast.id}",
                    class: "toast toast-{toast.kind.as_str()}",
                    role: "alert",
                    i { class: "fas {toast.kind.icon()}" }
                    span { class: "toast-message", "{toast.message}" }
                    button {
                        class: "toast-close",
                        onclick: {
                            let manager = ctx.toasts();
                            let id = toast.id.clone();
                            move |_| manager.hide(&id)
                        },
                        i { class: "fas fa-times" }
                    }
                }
            }
        }
    }
}
