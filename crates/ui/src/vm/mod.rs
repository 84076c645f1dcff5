mod dashboard_vm;
mod events_vm;
mod profile_vm;
mod projects_vm;
mod text_fmt;
mod toppers_vm;

pub use dashboard_vm::{
    StatCardVm, admin_stat_cards, faculty_stat_cards, landing_stat_cards, section_title,
    student_stat_cards,
};
pub use events_vm::{EventBuckets, EventCardVm, EventTab, map_event_cards, split_events};
pub use profile_vm::{
    ProfileField, department_fields, department_info, faculty_profile_fields, faculty_profile_rows,
    profile_update, student_profile_fields, student_profile_rows,
};
pub use projects_vm::{
    ALL_CATEGORIES, ProjectCardVm, filter_projects, project_categories,
};
pub use text_fmt::{avatar_or_generated, date_badge, or_dash, preview, status_badge_class, truncate};
pub use toppers_vm::{TopperCardVm, TopperFilter, academic_years, courses, topper_cards};
