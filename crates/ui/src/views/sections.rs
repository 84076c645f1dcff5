use dioxus::prelude::*;
use portal_core::{PublicSection, SectionId};

use crate::views::dashboard::DashboardView;
use crate::views::public::{
    AboutSection, ContactSection, FacultySection, HomeSection, ProgramsSection,
};
use crate::views::showcase::{EventsSection, ProjectsSection, ToppersSection};
use crate::views::state::use_portal_state;

/// Every mounted section keeps its slot; only active ones render a body.
#[component]
pub fn SectionOutlet() -> Element {
    let snapshot = use_portal_state().host.read().clone();

    rsx! {
        for id in snapshot.mounted.iter().cloned() {
            if snapshot.is_active(&id) {
                section { key: "{id}", id: "{id}", class: "page-section active",
                    SectionBody { id }
                }
            } else {
                section { key: "{id}", id: "{id}", class: "page-section", hidden: true }
            }
        }
    }
}

#[component]
fn SectionBody(id: SectionId) -> Element {
    if let Some(section) = id.dashboard() {
        return rsx! { DashboardView { section } };
    }
    let public = PublicSection::ALL
        .into_iter()
        .find(|section| section.as_str() == id.as_str());
    match public {
        Some(PublicSection::Home) => rsx! { HomeSection {} },
        Some(PublicSection::About) => rsx! { AboutSection {} },
        Some(PublicSection::Programs) => rsx! { ProgramsSection {} },
        Some(PublicSection::Faculty) => rsx! { FacultySection {} },
        Some(PublicSection::Projects) => rsx! { ProjectsSection {} },
        Some(PublicSection::Events) => rsx! { EventsSection {} },
        Some(PublicSection::Toppers) => rsx! { ToppersSection {} },
        Some(PublicSection::Contact) => rsx! { ContactSection {} },
        None => rsx! {},
    }
}
