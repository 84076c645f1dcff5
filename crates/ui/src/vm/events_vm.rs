use chrono::NaiveDate;

use portal_core::model::{Event, EventId, EventKind};

use crate::vm::text_fmt::{date_badge, preview};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EventTab {
    #[default]
    Upcoming,
    Past,
    Cultural,
}

impl EventTab {
    pub const ALL: [EventTab; 3] = [Self::Upcoming, Self::Past, Self::Cultural];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Upcoming => "Upcoming",
            Self::Past => "Past",
            Self::Cultural => "Cultural",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventCardVm {
    pub id: EventId,
    pub title: String,
    pub day: String,
    pub month: String,
    pub time: String,
    pub location: String,
    pub description: String,
    pub link: Option<String>,
    pub is_active: bool,
    pub seats_label: Option<String>,
    pub is_full: bool,
}

impl From<&Event> for EventCardVm {
    fn from(event: &Event) -> Self {
        let (day, month) = date_badge(event.day());
        let seats_label = event
            .max_participants
            .map(|max| format!("{}/{max} registered", event.current_participants));
        Self {
            id: event.id.clone(),
            title: event.title.clone(),
            day,
            month,
            time: event.time.clone().unwrap_or_else(|| "TBA".to_owned()),
            location: event.location.clone().unwrap_or_else(|| "TBA".to_owned()),
            description: preview(&event.description),
            link: event.link.clone().filter(|link| !link.trim().is_empty()),
            is_active: event.is_active,
            seats_label,
            is_full: event.is_full(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct EventBuckets {
    pub upcoming: Vec<EventCardVm>,
    pub past: Vec<EventCardVm>,
    pub cultural: Vec<EventCardVm>,
}

impl EventBuckets {
    #[must_use]
    pub fn tab(&self, tab: EventTab) -> &[EventCardVm] {
        match tab {
            EventTab::Upcoming => &self.upcoming,
            EventTab::Past => &self.past,
            EventTab::Cultural => &self.cultural,
        }
    }
}

/// Sort events into tabs relative to `today`.
///
/// Cultural events also appear under their date tab. An event without a
/// readable date is neither upcoming nor past.
#[must_use]
pub fn split_events(events: &[Event], today: NaiveDate) -> EventBuckets {
    let mut buckets = EventBuckets::default();
    for event in events {
        let card = EventCardVm::from(event);
        match event.day() {
            Some(day) if day >= today => buckets.upcoming.push(card.clone()),
            Some(_) => buckets.past.push(card.clone()),
            None => {}
        }
        if event.kind == EventKind::Cultural {
            buckets.cultural.push(card);
        }
    }
    buckets
}

#[must_use]
pub fn map_event_cards(events: &[Event]) -> Vec<EventCardVm> {
    events.iter().map(EventCardVm::from).collect()
}
