use portal_core::model::{Project, ProjectId};

use crate::vm::text_fmt::{preview, status_badge_class};

pub const ALL_CATEGORIES: &str = "all";
pub const DEFAULT_PROJECT_IMAGE: &str =
    "https://images.unsplash.com/photo-1555066931-4365d14bab8c?w=400&h=200&fit=crop";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectCardVm {
    pub id: ProjectId,
    pub title: String,
    pub category: String,
    pub description: String,
    pub image: String,
    pub technologies: Vec<String>,
    pub github: Option<String>,
    pub demo: Option<String>,
    pub status: String,
    pub badge_class: &'static str,
    pub owner: Option<String>,
}

impl From<&Project> for ProjectCardVm {
    fn from(project: &Project) -> Self {
        let status = project
            .status
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "pending".to_owned());
        let description = if project.description.trim().is_empty() {
            "No description provided".to_owned()
        } else {
            preview(&project.description)
        };
        Self {
            id: project.id.clone(),
            title: project.title.clone(),
            category: if project.category.trim().is_empty() {
                "Uncategorized".to_owned()
            } else {
                project.category.clone()
            },
            description,
            image: project
                .image
                .clone()
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PROJECT_IMAGE.to_owned()),
            technologies: project.technologies.clone(),
            github: project.github.clone(),
            demo: project.demo.clone(),
            badge_class: status_badge_class(&status),
            status,
            owner: project.owner.clone(),
        }
    }
}

/// Distinct categories in first-seen order.
#[must_use]
pub fn project_categories(projects: &[Project]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for project in projects {
        let category = project.category.trim();
        if !category.is_empty() && !seen.iter().any(|c| c == category) {
            seen.push(category.to_owned());
        }
    }
    seen
}

/// Cards whose category equals `filter`; `all` keeps everything.
#[must_use]
pub fn filter_projects(projects: &[Project], filter: &str) -> Vec<ProjectCardVm> {
    projects
        .iter()
        .filter(|p| filter == ALL_CATEGORIES || p.category == filter)
        .map(ProjectCardVm::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: &str, category: &str, description: &str) -> Project {
        serde_json::from_value(serde_json::json!({
            "id": id, "title": format!("P{id}"), "category": category, "description": description
        }))
        .unwrap()
    }

    #[test]
    fn filters_by_category() {
        let projects = [
            project("1", "ai", "x"),
            project("2", "web", "y"),
            project("3", "ai", "z"),
        ];
        assert_eq!(project_categories(&projects), ["ai", "web"]);
        let ai: Vec<_> = filter_projects(&projects, "ai").into_iter().map(|p| p.title).collect();
        assert_eq!(ai, ["P1", "P3"]);
        assert_eq!(filter_projects(&projects, ALL_CATEGORIES).len(), 3);
    }

    #[test]
    fn card_fallbacks() {
        let card = ProjectCardVm::from(&project("4", "", ""));
        assert_eq!(card.category, "Uncategorized");
        assert_eq!(card.description, "No description provided");
        assert_eq!(card.status, "pending");
        assert_eq!(card.badge_class, "badge-warning");
        assert_eq!(card.image, DEFAULT_PROJECT_IMAGE);

        let long = ProjectCardVm::from(&project("5", "ai", &"x".repeat(150)));
        assert_eq!(long.description.len(), 103);
    }
}
