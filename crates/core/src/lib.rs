#![forbid(unsafe_code)]

pub mod model;
pub mod section;
pub mod time;
pub mod validation;

pub use section::{DashboardLink, DashboardSection, PublicSection, SectionId, dashboard_links};
pub use time::Clock;
pub use validation::ValidationError;
