use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use portal_core::Clock;
use services::{MemorySectionHost, PortalConfig, PortalServices};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt as log_fmt};
use ui::{App, ComponentFragmentLoader, DesktopLinkOpener, LinkOpenerRef, UiApp, build_app_context};

const ENV_DB_URL: &str = "PORTAL_DB_URL";
const ENV_LOG: &str = "PORTAL_LOG";
const DEFAULT_DB: &str = "portal.sqlite3";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    services: PortalServices,
    links: LinkOpenerRef,
    fragment: String,
}

impl UiApp for DesktopApp {
    fn services(&self) -> PortalServices {
        self.services.clone()
    }

    fn link_opener(&self) -> LinkOpenerRef {
        Arc::clone(&self.links)
    }

    fn initial_fragment(&self) -> String {
        self.fragment.clone()
    }
}

#[derive(Debug)]
struct Args {
    db_url: String,
    api_base_url: Option<String>,
    section: String,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--db <sqlite_url>] [--api <base_url>] [--section <id>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB}");
    eprintln!("  --section home");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  {ENV_DB_URL}, PORTAL_API_BASE_URL, PORTAL_REQUEST_TIMEOUT_SECS");
    eprintln!("  {ENV_LOG} (falls back to RUST_LOG, then info)");
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Option<Self>, ArgsError> {
        let mut args = args.into_iter();
        let mut db_url = normalize_sqlite_url(
            std::env::var(ENV_DB_URL)
                .ok()
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DB.to_owned()),
        );
        let mut api_base_url = None;
        let mut section = String::new();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--api" => api_base_url = Some(require_value(&mut args, "--api")?),
                "--section" => {
                    let value = require_value(&mut args, "--section")?;
                    section = value.trim().trim_start_matches('#').to_owned();
                }
                "--help" | "-h" => return Ok(None),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Some(Self {
            db_url,
            api_base_url,
            section,
        }))
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim();
    let path = Path::new(trimmed.strip_prefix("sqlite:").unwrap_or(trimmed));
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Create the database file and its parent directories if they are missing.
fn prepare_sqlite_file(db_url: &str) -> Result<(), ArgsError> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }
    let invalid = || ArgsError::InvalidDbUrl {
        raw: db_url.to_owned(),
    };

    let path = db_url.strip_prefix("sqlite://").ok_or_else(invalid)?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(invalid());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|_| invalid())?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .map_err(|_| invalid())?;
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(ENV_LOG)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));
    log_fmt().with_env_filter(filter).init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let Some(args) = Args::parse(std::env::args().skip(1)).inspect_err(|_| print_usage())? else {
        print_usage();
        return Ok(());
    };

    init_tracing();

    let mut config = PortalConfig::from_env()?;
    if let Some(api) = args.api_base_url.as_deref() {
        config = config.with_api_base_url(api)?;
    }

    // Binary glue owns the filesystem; storage only sees a URL.
    prepare_sqlite_file(&args.db_url)?;
    let host = Arc::new(MemorySectionHost::with_public_sections());
    let fragments = Arc::new(ComponentFragmentLoader::new(Arc::clone(&host)));
    let services =
        PortalServices::open(config, Clock::System, &args.db_url, host, fragments)
            .await?;
    info!(db = %args.db_url, api = %services.config().api_base_url, "starting portal");

    let app = DesktopApp {
        services,
        links: Arc::new(DesktopLinkOpener),
        fragment: args.section,
    };
    let app: Arc<dyn UiApp> = Arc::new(app);
    let context = build_app_context(&app);

    // Some dev setups open tao windows always-on-top; keep it a normal window.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Department Portal")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Option<Args>, ArgsError> {
        Args::parse(args.iter().map(|arg| (*arg).to_owned()))
    }

    #[test]
    fn section_flag_drops_leading_hash() {
        let args = parse(&["--section", "#student-profile"]).unwrap().unwrap();
        assert_eq!(args.section, "student-profile");
    }

    #[test]
    fn relative_db_path_becomes_absolute_url() {
        let args = parse(&["--db", "data/portal.db"]).unwrap().unwrap();
        assert!(args.db_url.starts_with("sqlite:///"), "{}", args.db_url);
        assert!(args.db_url.ends_with("data/portal.db"));
    }

    #[test]
    fn flags_without_values_are_rejected() {
        assert!(matches!(
            parse(&["--api"]),
            Err(ArgsError::MissingValue { flag: "--api" })
        ));
        assert!(matches!(parse(&["--nope"]), Err(ArgsError::UnknownArg(_))));
        assert!(parse(&["--help"]).unwrap().is_none());
    }
}
