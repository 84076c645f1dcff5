use std::sync::{Arc, Mutex};

mod desktop;

pub trait UiLinkOpener: Send + Sync {
    fn open_url(&self, url: &str);
}

pub type LinkOpenerRef = Arc<dyn UiLinkOpener>;

pub use desktop::DesktopLinkOpener;

/// Only web and mail links leave the app.
#[must_use]
pub fn is_external_link(url: &str) -> bool {
    let url = url.trim();
    ["http://", "https://", "mailto:"]
        .iter()
        .any(|scheme| {
            url.len() > scheme.len()
                && url
                    .get(..scheme.len())
                    .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
        })
}

/// Remembers opened links instead of launching anything.
#[derive(Default)]
pub struct RecordingLinkOpener {
    opened: Mutex<Vec<String>>,
}

impl RecordingLinkOpener {
    #[must_use]
    pub fn opened(&self) -> Vec<String> {
        self.opened
            .lock()
            .map(|links| links.clone())
            .unwrap_or_default()
    }
}

impl UiLinkOpener for RecordingLinkOpener {
    fn open_url(&self, url: &str) {
        if let Ok(mut links) = self.opened.lock() {
            links.push(url.to_owned());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_links_need_a_web_or_mail_scheme() {
        assert!(is_external_link("https://github.com/dept"));
        assert!(is_external_link("MAILTO:office@university.edu"));
        assert!(!is_external_link("#student-profile"));
        assert!(!is_external_link("https://"));
        assert!(!is_external_link("file:///etc/passwd"));
    }
}
