use std::collections::BTreeSet;

use portal_core::model::Topper;

use crate::vm::text_fmt::avatar_or_generated;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopperCardVm {
    /// Position in the unfiltered list.
    pub rank: usize,
    pub name: String,
    pub course: String,
    pub year: String,
    pub cgpa: String,
    pub achievements: String,
    pub image: String,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub email: Option<String>,
}

/// Empty fields match everything.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct TopperFilter {
    pub year: String,
    pub course: String,
}

impl TopperFilter {
    #[must_use]
    pub fn matches(&self, topper: &Topper) -> bool {
        (self.year.is_empty() || topper.year == self.year)
            && (self.course.is_empty() || topper.course == self.course)
    }
}

/// Distinct academic years, newest first.
#[must_use]
pub fn academic_years(toppers: &[Topper]) -> Vec<String> {
    let years: BTreeSet<&str> = toppers.iter().map(|t| t.year.as_str()).collect();
    years.into_iter().rev().map(str::to_owned).collect()
}

#[must_use]
pub fn courses(toppers: &[Topper]) -> Vec<String> {
    let courses: BTreeSet<&str> = toppers
        .iter()
        .map(|t| t.course.as_str())
        .filter(|c| !c.is_empty())
        .collect();
    courses.into_iter().map(str::to_owned).collect()
}

#[must_use]
pub fn topper_cards(toppers: &[Topper], filter: &TopperFilter) -> Vec<TopperCardVm> {
    toppers
        .iter()
        .enumerate()
        .filter(|(_, topper)| filter.matches(topper))
        .map(|(index, topper)| TopperCardVm {
            rank: index + 1,
            name: topper.name.clone(),
            course: topper.course.clone(),
            year: topper.year.clone(),
            cgpa: topper
                .cgpa
                .map_or_else(|| "N/A".to_owned(), |cgpa| format!("{cgpa}")),
            achievements: topper
                .achievements
                .clone()
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| "Outstanding academic performance".to_owned()),
            image: avatar_or_generated(topper.image.as_deref(), &topper.name),
            linkedin: topper.linkedin.clone(),
            github: topper.github.clone(),
            email: topper.email.clone(),
        })
        .collect()
}
