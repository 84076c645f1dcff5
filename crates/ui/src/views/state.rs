use dioxus::prelude::*;
use services::{AuthSnapshot, ContentState, HostSnapshot, Theme, Toast};
use tokio::sync::watch;

use crate::context::AppContext;

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Ready(T),
    Error(String),
}

/// Data wins over a stale error; neither means the feed is still loading.
#[must_use]
pub fn feed_state<T: Clone>(data: Option<&T>, error: Option<&str>) -> ViewState<T> {
    match (data, error) {
        (Some(data), _) => ViewState::Ready(data.clone()),
        (None, Some(message)) => ViewState::Error(message.to_owned()),
        (None, None) => ViewState::Loading,
    }
}

/// Mirror a watch channel into a signal for as long as the component lives.
pub fn use_watch<T: Clone + 'static>(subscribe: impl FnOnce() -> watch::Receiver<T>) -> Signal<T> {
    let receiver = use_hook(subscribe);
    let mut value = use_signal(|| receiver.borrow().clone());
    use_future(move || {
        let mut receiver = receiver.clone();
        async move {
            while receiver.changed().await.is_ok() {
                let next = receiver.borrow_and_update().clone();
                value.set(next);
            }
        }
    });
    value
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Modal {
    Login,
    Register,
    Otp,
    ForgotPassword,
}

/// Service state mirrored into signals, shared with every view.
#[derive(Clone, Copy)]
pub struct PortalState {
    pub auth: Signal<AuthSnapshot>,
    pub content: Signal<ContentState>,
    pub host: Signal<HostSnapshot>,
    pub theme: Signal<Theme>,
    pub toasts: Signal<Vec<Toast>>,
    pub modal: Signal<Option<Modal>>,
}

pub fn use_provide_portal_state(ctx: &AppContext) -> PortalState {
    let auth = use_watch(|| ctx.auth().subscribe());
    let content = use_watch(|| ctx.content().subscribe());
    let host = use_watch(|| ctx.host().subscribe());
    let theme = use_watch(|| ctx.theme().subscribe());
    let toasts = use_watch(|| ctx.toasts().subscribe());
    let modal = use_signal(|| None);
    use_context_provider(|| PortalState {
        auth,
        content,
        host,
        theme,
        toasts,
        modal,
    })
}

#[must_use]
pub fn use_portal_state() -> PortalState {
    use_context::<PortalState>()
}
