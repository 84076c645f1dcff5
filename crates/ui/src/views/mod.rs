mod common;
mod dashboard;
mod modals;
mod navbar;
mod public;
mod sections;
mod showcase;
mod state;
mod toasts;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use dashboard::DashboardView;
pub use modals::ModalHost;
pub use navbar::Navbar;
pub use sections::SectionOutlet;
pub use state::{
    Modal, PortalState, ViewState, feed_state, use_portal_state, use_provide_portal_state,
    use_watch,
};
pub use toasts::ToastStack;
