use portal_core::model::{DepartmentInfo, FacultyProfile, ProfileUpdate, StudentProfile};
use serde_json::Value;

use crate::vm::text_fmt::or_dash;

/// One editable profile input; `key` is the API field name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileField {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
    pub multiline: bool,
}

fn field(key: &'static str, label: &'static str, value: Option<&str>) -> ProfileField {
    ProfileField {
        key,
        label,
        value: value.unwrap_or_default().to_owned(),
        multiline: false,
    }
}

fn long_field(key: &'static str, label: &'static str, value: Option<&str>) -> ProfileField {
    ProfileField {
        multiline: true,
        ..field(key, label, value)
    }
}

#[must_use]
pub fn student_profile_fields(profile: &StudentProfile) -> Vec<ProfileField> {
    vec![
        field("fullName", "Full Name", Some(&profile.full_name)),
        field("phone", "Phone", profile.phone.as_deref()),
        field("course", "Course", profile.course.as_deref()),
        field("year", "Year", profile.year.as_deref()),
        field("semester", "Semester", profile.semester.as_deref()),
        field("dob", "Date of Birth", profile.dob.as_deref()),
        long_field("address", "Address", profile.address.as_deref()),
        long_field("bio", "Bio", profile.bio.as_deref()),
    ]
}

#[must_use]
pub fn faculty_profile_fields(profile: &FacultyProfile) -> Vec<ProfileField> {
    vec![
        field("fullName", "Full Name", Some(&profile.full_name)),
        field("phone", "Phone", profile.phone.as_deref()),
        field("designation", "Designation", profile.designation.as_deref()),
        field("qualification", "Qualification", profile.qualification.as_deref()),
        field("specialization", "Specialization", profile.specialization.as_deref()),
        field("experience", "Experience", profile.experience.as_deref()),
        field("office", "Office", profile.office.as_deref()),
        field("officeHours", "Office Hours", profile.office_hours.as_deref()),
        long_field(
            "researchInterests",
            "Research Interests",
            profile.research_interests.as_deref(),
        ),
        long_field("bio", "Bio", profile.bio.as_deref()),
    ]
}

/// Trimmed, non-empty fields keyed by their API names.
#[must_use]
pub fn profile_update(fields: &[ProfileField]) -> ProfileUpdate {
    fields
        .iter()
        .filter_map(|f| {
            let value = f.value.trim();
            (!value.is_empty()).then(|| (f.key.to_owned(), Value::String(value.to_owned())))
        })
        .collect()
}

/// Label/value pairs for the read-only profile card.
#[must_use]
pub fn student_profile_rows(profile: &StudentProfile) -> Vec<(&'static str, String)> {
    let mut rows = vec![("Email", profile.email.clone())];
    rows.extend(
        student_profile_fields(profile)
            .into_iter()
            .filter(|f| f.key != "fullName")
            .map(|f| (f.label, f.value)),
    );
    rows.insert(1, ("Registration No", profile.registration_no.clone().unwrap_or_default()));
    rows.push(("Gender", profile.gender.clone().unwrap_or_default()));
    rows.into_iter()
        .map(|(label, value)| (label, or_dash(Some(&value))))
        .collect()
}

#[must_use]
pub fn faculty_profile_rows(profile: &FacultyProfile) -> Vec<(&'static str, String)> {
    let mut rows = vec![("Email", profile.email.clone())];
    rows.extend(
        faculty_profile_fields(profile)
            .into_iter()
            .filter(|f| f.key != "fullName")
            .map(|f| (f.label, f.value)),
    );
    rows.into_iter()
        .map(|(label, value)| (label, or_dash(Some(&value))))
        .collect()
}

#[must_use]
pub fn department_fields(info: &DepartmentInfo) -> Vec<ProfileField> {
    vec![
        field("university", "University", Some(&info.university)),
        field("department", "Department", Some(&info.department)),
        field("address", "Address", Some(&info.address)),
        field("phone", "Phone", Some(&info.phone)),
        field("email", "Email", Some(&info.email)),
        field("officeHours", "Office Hours", Some(&info.office_hours)),
        long_field("vision", "Vision", Some(&info.vision)),
        long_field("mission", "Mission", Some(&info.mission)),
        long_field("description", "Description", Some(&info.description)),
    ]
}

/// Rebuild department settings from the edited fields; unknown keys are ignored.
#[must_use]
pub fn department_info(fields: &[ProfileField]) -> DepartmentInfo {
    let mut info = DepartmentInfo::default();
    for f in fields {
        let value = f.value.trim().to_owned();
        match f.key {
            "university" => info.university = value,
            "department" => info.department = value,
            "address" => info.address = value,
            "phone" => info.phone = value,
            "email" => info.email = value,
            "officeHours" => info.office_hours = value,
            "vision" => info.vision = value,
            "mission" => info.mission = value,
            "description" => info.description = value,
            _ => {}
        }
    }
    info
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_skips_blank_fields() {
        let profile = StudentProfile {
            full_name: " Asha Rao ".into(),
            phone: Some("9876543210".into()),
            ..StudentProfile::default()
        };
        let mut fields = student_profile_fields(&profile);
        fields[2].value = "   ".into();

        let update = profile_update(&fields);
        assert_eq!(update.get("fullName"), Some(&Value::String("Asha Rao".into())));
        assert_eq!(update.get("phone"), Some(&Value::String("9876543210".into())));
        assert!(!update.contains_key("course"));
        assert!(!update.contains_key("bio"));
    }

    #[test]
    fn profile_rows_use_dashes_for_gaps() {
        let profile = StudentProfile {
            email: "asha@university.edu".into(),
            registration_no: Some("CSE-21-004".into()),
            ..StudentProfile::default()
        };
        let rows = student_profile_rows(&profile);
        assert_eq!(rows[0], ("Email", "asha@university.edu".to_owned()));
        assert_eq!(rows[1], ("Registration No", "CSE-21-004".to_owned()));
        assert!(rows.iter().any(|(label, value)| *label == "Phone" && value == "-"));
    }

    #[test]
    fn department_round_trips_through_fields() {
        let info = DepartmentInfo {
            university: "State University".into(),
            office_hours: "9-5".into(),
            ..DepartmentInfo::default()
        };
        let mut fields = department_fields(&info);
        fields[1].value = " CSE ".into();

        let edited = department_info(&fields);
        assert_eq!(edited.university, "State University");
        assert_eq!(edited.department, "CSE");
        assert_eq!(edited.office_hours, "9-5");
    }
}
