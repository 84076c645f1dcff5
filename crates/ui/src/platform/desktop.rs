use std::process::Command;

use tracing::warn;

use super::{UiLinkOpener, is_external_link};

/// Hands external links to the operating system's default handler.
pub struct DesktopLinkOpener;

impl UiLinkOpener for DesktopLinkOpener {
    fn open_url(&self, url: &str) {
        let url = url.trim();
        if !is_external_link(url) {
            warn!(url, "refusing to open non-external link");
            return;
        }
        let spawned = if cfg!(target_os = "macos") {
            Command::new("open").arg(url).spawn()
        } else if cfg!(target_os = "windows") {
            Command::new("cmd").args(["/C", "start", "", url]).spawn()
        } else {
            Command::new("xdg-open").arg(url).spawn()
        };
        if let Err(err) = spawned {
            warn!(error = %err, url, "failed to launch link handler");
        }
    }
}
