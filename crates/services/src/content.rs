//! Section data: fetches what each section shows and the mutations behind its buttons.

use std::collections::{BTreeMap, HashSet};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use portal_core::model::{
    About, AdminDashboard, AdminMessages, AdminUsers, ContactInfo, ContactSubmission,
    DepartmentInfo, Event, EventId, FacultyDashboard, FacultyId, FacultyMember, FacultyProfile,
    MessageId, ProfileUpdate, Program, ProgramId, Project, ProjectId, Role, Stats,
    StudentDashboard, StudentProfile, Topper, UserId,
};
use portal_core::section::{DashboardSection, PublicSection, SectionId};
use portal_core::validation::{validate_contact, validate_profile_update};

use crate::api::ApiService;
use crate::auth::AuthManager;
use crate::error::{ApiError, ContentError};
use crate::navigation::SectionLoader;
use crate::toast::ToastManager;

pub const EVENT_LOGIN_PROMPT: &str = "Please login to register for events";

/// Everything the section views render.
///
/// `None` means not loaded yet; a failed load records its message in `errors`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentState {
    pub stats: Option<Stats>,
    pub about: Option<About>,
    pub programs: Option<Vec<Program>>,
    pub contact: Option<ContactInfo>,
    pub faculty: Option<Vec<FacultyMember>>,
    pub projects: Option<Vec<Project>>,
    pub events: Option<Vec<Event>>,
    pub toppers: Option<Vec<Topper>>,
    pub student_dashboard: Option<StudentDashboard>,
    pub student_profile: Option<StudentProfile>,
    pub faculty_dashboard: Option<FacultyDashboard>,
    pub faculty_profile: Option<FacultyProfile>,
    pub admin_dashboard: Option<AdminDashboard>,
    pub admin_users: Option<AdminUsers>,
    pub admin_faculty: Option<Vec<FacultyMember>>,
    pub admin_programs: Option<Vec<Program>>,
    pub admin_projects: Option<Vec<Project>>,
    pub admin_events: Option<Vec<Event>>,
    pub admin_messages: Option<AdminMessages>,
    pub department_info: Option<DepartmentInfo>,
    pub errors: BTreeMap<SectionId, String>,
}

impl ContentState {
    #[must_use]
    pub fn error(&self, section: &SectionId) -> Option<&str> {
        self.errors.get(section).map(String::as_str)
    }
}

/// Sections with a data loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Feed {
    Faculty,
    Projects,
    Events,
    Toppers,
    StudentDashboard,
    StudentProfile,
    FacultyDashboard,
    FacultyProfile,
    AdminDashboard,
    AdminUsers,
    AdminFaculty,
    AdminPrograms,
    AdminProjects,
    AdminEvents,
    AdminMessages,
    AdminSettings,
}

impl Feed {
    const ALL: [Feed; 16] = [
        Feed::Faculty,
        Feed::Projects,
        Feed::Events,
        Feed::Toppers,
        Feed::StudentDashboard,
        Feed::StudentProfile,
        Feed::FacultyDashboard,
        Feed::FacultyProfile,
        Feed::AdminDashboard,
        Feed::AdminUsers,
        Feed::AdminFaculty,
        Feed::AdminPrograms,
        Feed::AdminProjects,
        Feed::AdminEvents,
        Feed::AdminMessages,
        Feed::AdminSettings,
    ];

    fn section(self) -> SectionId {
        match self {
            Feed::Faculty => PublicSection::Faculty.into(),
            Feed::Projects => PublicSection::Projects.into(),
            Feed::Events => PublicSection::Events.into(),
            Feed::Toppers => PublicSection::Toppers.into(),
            Feed::StudentDashboard => DashboardSection::StudentDashboard.into(),
            Feed::StudentProfile => DashboardSection::StudentProfile.into(),
            Feed::FacultyDashboard => DashboardSection::FacultyDashboard.into(),
            Feed::FacultyProfile => DashboardSection::FacultyProfile.into(),
            Feed::AdminDashboard => DashboardSection::AdminDashboard.into(),
            Feed::AdminUsers => DashboardSection::AdminUsers.into(),
            Feed::AdminFaculty => DashboardSection::AdminFaculty.into(),
            Feed::AdminPrograms => DashboardSection::AdminPrograms.into(),
            Feed::AdminProjects => DashboardSection::AdminProjects.into(),
            Feed::AdminEvents => DashboardSection::AdminEvents.into(),
            Feed::AdminMessages => DashboardSection::AdminMessages.into(),
            Feed::AdminSettings => DashboardSection::AdminSettings.into(),
        }
    }

    fn for_section(section: &SectionId) -> Option<Feed> {
        Feed::ALL.into_iter().find(|feed| &feed.section() == section)
    }

    /// Role required to fetch this feed; public feeds need none.
    fn audience(self) -> Option<Role> {
        self.section().dashboard().map(DashboardSection::audience)
    }

    fn failure_toast(self) -> Option<&'static str> {
        match self {
            Feed::StudentDashboard => Some("Failed to load student dashboard"),
            Feed::AdminProjects => Some("Failed to load admin projects"),
            _ => None,
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Running<'a> {
    set: &'a Mutex<HashSet<Feed>>,
    feed: Feed,
}

impl Drop for Running<'_> {
    fn drop(&mut self) {
        lock(self.set).remove(&self.feed);
    }
}

pub struct ContentService {
    api: Arc<ApiService>,
    auth: AuthManager,
    toasts: Arc<ToastManager>,
    state: watch::Sender<ContentState>,
    running: Mutex<HashSet<Feed>>,
}

impl ContentService {
    #[must_use]
    pub fn new(api: Arc<ApiService>, auth: AuthManager, toasts: Arc<ToastManager>) -> Self {
        let (state, _) = watch::channel(ContentState::default());
        Self {
            api,
            auth,
            toasts,
            state,
            running: Mutex::new(HashSet::new()),
        }
    }

    /// Sections this service loads data for.
    #[must_use]
    pub fn sections() -> Vec<SectionId> {
        Feed::ALL.into_iter().map(Feed::section).collect()
    }

    #[must_use]
    pub fn snapshot(&self) -> ContentState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ContentState> {
        self.state.subscribe()
    }

    fn update(&self, apply: impl FnOnce(&mut ContentState)) {
        self.state.send_modify(apply);
    }

    /// Landing-page data fetched once at startup.
    pub async fn startup_loads(&self) {
        let (stats, about, programs, contact) = futures::join!(
            self.api.stats(),
            self.api.about(),
            self.api.programs(),
            self.api.contact(),
        );
        self.update(|state| {
            if let Ok(stats) = &stats {
                state.stats = Some(stats.clone());
            }
            if let Ok(about) = &about {
                state.about = Some(about.clone());
            }
            if let Ok(programs) = &programs {
                state.programs = Some(programs.clone());
            }
            // The contact panel falls back to built-in details.
            state.contact = Some(contact.as_ref().cloned().unwrap_or_default());
        });

        for (what, err) in [
            ("stats", stats.err()),
            ("about", about.err()),
            ("programs", programs.err()),
            ("contact", contact.err()),
        ] {
            if let Some(err) = err {
                warn!(what, status = err.status(), message = err.message(), "startup load failed");
            }
        }
    }

    fn begin(&self, feed: Feed) -> Option<Running<'_>> {
        let mut running = lock(&self.running);
        running.insert(feed).then(|| Running {
            set: &self.running,
            feed,
        })
    }

    async fn load(&self, feed: Feed) {
        if let Some(role) = feed.audience() {
            if self.auth.current_role() != Some(role) {
                debug!(section = %feed.section(), "skipping dashboard load for another role");
                return;
            }
        }
        let Some(_running) = self.begin(feed) else {
            debug!(section = %feed.section(), "load already running");
            return;
        };

        let section = feed.section();
        match self.fetch(feed).await {
            Ok(()) => {
                self.update(|state| {
                    state.errors.remove(&section);
                });
            }
            Err(err) => {
                warn!(%section, status = err.status(), message = err.message(), "section load failed");
                self.update(|state| {
                    state.errors.insert(section.clone(), err.message().to_owned());
                });
                if !err.is_unauthorized() {
                    if let Some(message) = feed.failure_toast() {
                        self.toasts.error(message);
                    }
                }
            }
        }
    }

    async fn fetch(&self, feed: Feed) -> Result<(), ApiError> {
        let api = &self.api;
        match feed {
            Feed::Faculty => {
                let faculty = api.faculty().await?;
                self.update(|state| state.faculty = Some(faculty));
            }
            Feed::Projects => {
                let projects = api.projects().await?;
                self.update(|state| state.projects = Some(projects));
            }
            Feed::Events => {
                let events = api.events().await?;
                self.update(|state| state.events = Some(events));
            }
            Feed::Toppers => {
                let toppers = api.toppers().await?;
                self.update(|state| state.toppers = Some(toppers));
            }
            Feed::StudentDashboard => {
                let dashboard = api.student_dashboard().await?;
                self.update(|state| state.student_dashboard = Some(dashboard));
            }
            Feed::StudentProfile => {
                let profile = api.student_profile().await?;
                self.update(|state| state.student_profile = Some(profile));
            }
            Feed::FacultyDashboard => {
                let dashboard = api.faculty_dashboard().await?;
                self.update(|state| state.faculty_dashboard = Some(dashboard));
            }
            Feed::FacultyProfile => {
                let profile = api.faculty_profile().await?;
                self.update(|state| state.faculty_profile = Some(profile));
            }
            Feed::AdminDashboard => {
                let dashboard = api.admin_dashboard().await?;
                self.update(|state| state.admin_dashboard = Some(dashboard));
            }
            Feed::AdminUsers => {
                let users = api.admin_users().await?;
                self.update(|state| state.admin_users = Some(users));
            }
            Feed::AdminFaculty => {
                let faculty = api.faculty().await?;
                self.update(|state| state.admin_faculty = Some(faculty));
            }
            Feed::AdminPrograms => {
                let programs = api.programs().await?;
                self.update(|state| state.admin_programs = Some(programs));
            }
            Feed::AdminProjects => {
                let projects = api.admin_projects().await?;
                self.update(|state| state.admin_projects = Some(projects));
            }
            Feed::AdminEvents => {
                let events = api.admin_events().await?;
                self.update(|state| state.admin_events = Some(events));
            }
            Feed::AdminMessages => {
                let messages = api.admin_messages(true).await?;
                self.update(|state| state.admin_messages = Some(messages));
            }
            Feed::AdminSettings => {
                let info = api.department_info().await?;
                self.update(|state| state.department_info = Some(info));
            }
        }
        Ok(())
    }

    // ─── Mutations ──────────────────────────────────────────────────────────────

    fn require_role(&self, role: Role) -> Result<(), ContentError> {
        match self.auth.current_role() {
            None => Err(ContentError::LoginRequired),
            Some(current) if current == role => Ok(()),
            Some(_) => Err(ContentError::Forbidden),
        }
    }

    /// Run a mutation, toast its outcome and refresh the feed it touched.
    async fn mutate<F>(
        &self,
        reload: Option<Feed>,
        success: &str,
        call: F,
    ) -> Result<(), ContentError>
    where
        F: Future<Output = Result<Value, ApiError>>,
    {
        if let Err(err) = call.await {
            warn!(status = err.status(), message = err.message(), "mutation failed");
            self.toasts.error(err.message());
            return Err(err.into());
        }
        info!(success, "mutation applied");
        self.toasts.success(success);
        if let Some(feed) = reload {
            self.load(feed).await;
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ContentError::Validation` before any request when a field is
    /// missing or the email is malformed.
    pub async fn submit_contact(&self, submission: ContactSubmission) -> Result<(), ContentError> {
        validate_contact(&submission).inspect_err(|err| {
            self.toasts.error(err.to_string());
        })?;
        self.mutate(None, "Message sent successfully!", self.api.submit_contact(&submission))
            .await
    }

    /// # Errors
    ///
    /// Returns `ContentError::LoginRequired` without a request when signed out;
    /// the shell is asked to open the login form.
    pub async fn register_for_event(&self, event_id: &EventId) -> Result<(), ContentError> {
        if !self.auth.is_authenticated() {
            self.toasts.info(EVENT_LOGIN_PROMPT);
            self.auth.request_login();
            return Err(ContentError::LoginRequired);
        }
        self.mutate(
            Some(Feed::Events),
            "Successfully registered for event!",
            self.api.register_for_event(event_id),
        )
        .await
    }

    /// # Errors
    ///
    /// Returns `ContentError` when not signed in as a student, on invalid
    /// fields, or if the API rejects the update.
    pub async fn update_student_profile(&self, update: ProfileUpdate) -> Result<(), ContentError> {
        self.require_role(Role::Student)?;
        self.update_profile(Feed::StudentProfile, update).await
    }

    /// # Errors
    ///
    /// Returns `ContentError` when not signed in as faculty, on invalid
    /// fields, or if the API rejects the update.
    pub async fn update_faculty_profile(&self, update: ProfileUpdate) -> Result<(), ContentError> {
        self.require_role(Role::Teacher)?;
        self.update_profile(Feed::FacultyProfile, update).await
    }

    async fn update_profile(&self, feed: Feed, update: ProfileUpdate) -> Result<(), ContentError> {
        validate_profile_update(&update).inspect_err(|err| {
            self.toasts.error(err.to_string());
        })?;
        let call = async {
            if feed == Feed::StudentProfile {
                self.api.update_student_profile(&update).await
            } else {
                self.api.update_faculty_profile(&update).await
            }
        };
        self.mutate(Some(feed), "Profile updated successfully!", call)
            .await
    }

    /// # Errors
    ///
    /// Returns `ContentError` when not signed in as an admin or if the API
    /// rejects the update.
    pub async fn update_department_info(&self, info: DepartmentInfo) -> Result<(), ContentError> {
        self.require_role(Role::Admin)?;
        self.mutate(
            Some(Feed::AdminSettings),
            "Settings updated successfully!",
            self.api.update_department_info(&info),
        )
        .await
    }

    /// # Errors
    ///
    /// Returns `ContentError` when not an admin or if the delete fails.
    pub async fn delete_user(&self, user_id: &UserId) -> Result<(), ContentError> {
        self.require_role(Role::Admin)?;
        self.mutate(
            Some(Feed::AdminUsers),
            "User deleted successfully!",
            self.api.delete_user(user_id),
        )
        .await
    }

    /// # Errors
    ///
    /// Returns `ContentError` when not an admin or if the delete fails.
    pub async fn delete_faculty_member(&self, faculty_id: &FacultyId) -> Result<(), ContentError> {
        self.require_role(Role::Admin)?;
        self.mutate(
            Some(Feed::AdminFaculty),
            "Faculty member deleted successfully!",
            self.api.delete_faculty_member(faculty_id),
        )
        .await
    }

    /// # Errors
    ///
    /// Returns `ContentError` when not an admin or if the delete fails.
    pub async fn delete_program(&self, program_id: &ProgramId) -> Result<(), ContentError> {
        self.require_role(Role::Admin)?;
        self.mutate(
            Some(Feed::AdminPrograms),
            "Program deleted successfully!",
            self.api.delete_program(program_id),
        )
        .await
    }

    /// # Errors
    ///
    /// Returns `ContentError` when not an admin or if the delete fails.
    pub async fn delete_project(&self, project_id: &ProjectId) -> Result<(), ContentError> {
        self.require_role(Role::Admin)?;
        self.mutate(
            Some(Feed::AdminProjects),
            "Project deleted successfully!",
            self.api.delete_project(project_id),
        )
        .await
    }

    /// # Errors
    ///
    /// Returns `ContentError` when not an admin or if the delete fails.
    pub async fn delete_event(&self, event_id: &EventId) -> Result<(), ContentError> {
        self.require_role(Role::Admin)?;
        self.mutate(
            Some(Feed::AdminEvents),
            "Event deleted successfully!",
            self.api.delete_event(event_id),
        )
        .await
    }

    /// # Errors
    ///
    /// Returns `ContentError` when not an admin or if the update fails.
    pub async fn mark_message_read(&self, message_id: &MessageId) -> Result<(), ContentError> {
        self.require_role(Role::Admin)?;
        self.mutate(
            Some(Feed::AdminMessages),
            "Message marked as read",
            self.api.mark_message_read(message_id),
        )
        .await
    }
}

#[async_trait]
impl SectionLoader for ContentService {
    async fn load_section(&self, section: &SectionId) {
        match Feed::for_section(section) {
            Some(feed) => self.load(feed).await,
            None => debug!(%section, "section has no data"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_feed_maps_back_to_itself() {
        for feed in Feed::ALL {
            assert_eq!(Feed::for_section(&feed.section()), Some(feed));
        }
        assert_eq!(Feed::for_section(&SectionId::from("about")), None);
        assert_eq!(ContentService::sections().len(), 16);
    }

    #[test]
    fn dashboard_feeds_carry_their_role() {
        assert_eq!(Feed::Events.audience(), None);
        assert_eq!(Feed::StudentProfile.audience(), Some(Role::Student));
        assert_eq!(Feed::FacultyDashboard.audience(), Some(Role::Teacher));
        assert_eq!(Feed::AdminSettings.audience(), Some(Role::Admin));
    }
}
