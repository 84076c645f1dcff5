pub mod content;
pub mod dashboard;
mod ids;
pub mod session;
mod user;

pub use content::{
    About, ContactInfo, ContactSubmission, Event, EventKind, FacultyMember, Program, Project,
    Stats, Topper,
};
pub use dashboard::{
    Activity, AdminDashboard, AdminMessage, AdminMessages, AdminStats, AdminSummary, AdminUser,
    AdminUsers, Analytics, DepartmentInfo, FacultyDashboard, FacultyProfile, ProfileUpdate,
    RecentStudent, StudentDashboard, StudentProfile,
};
pub use ids::{EventId, FacultyId, MessageId, ParseIdError, ProgramId, ProjectId, UserId};
pub use session::{AuthPayload, PersistScope, Session, VerificationResponse};
pub use user::{Role, User, generated_avatar_url};
