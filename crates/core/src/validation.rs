//! Client-side form validation. Nothing here touches the network.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::model::{ContactSubmission, ProfileUpdate, Role};

pub const MIN_PASSWORD_LEN: usize = 6;
pub const OTP_LENGTH: usize = 6;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex compiles"));

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+]?[(]?[0-9]{1,4}[)]?[-\s.]?[0-9]{1,4}[-\s.]?[0-9]{1,9}$")
        .expect("phone regex compiles")
});

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },
    #[error("Email and password are required")]
    MissingCredentials,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Please agree to the Terms and Conditions")]
    TermsNotAccepted,
    #[error("Course, Year, and Semester are required for students")]
    MissingStudentFields,
    #[error("Designation and Qualification are required for teachers")]
    MissingTeacherFields,
    #[error("Only students and teachers can register")]
    UnsupportedRole,
    #[error("{field} must be a whole number")]
    NotANumber { field: &'static str },
    #[error("Please enter a valid 6-digit OTP")]
    InvalidOtp,
    #[error("Please enter a valid phone number")]
    InvalidPhone,
}

#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

#[must_use]
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

/// Trimmed, well-formed email address; used by the forgot-password form.
pub fn require_email(email: &str) -> Result<String, ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::Required { field: "Email" });
    }
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(email.to_owned())
}

// ─── Login ──────────────────────────────────────────────────────────────────────

/// Validated login form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
    /// Persist the session across restarts.
    #[serde(skip)]
    pub remember: bool,
}

impl LoginCredentials {
    pub fn parse(email: &str, password: &str, remember: bool) -> Result<Self, ValidationError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ValidationError::MissingCredentials);
        }
        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(Self {
            email: email.to_owned(),
            password: password.to_owned(),
            remember,
        })
    }
}

// ─── Registration ───────────────────────────────────────────────────────────────

/// Raw registration form as the user typed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationDraft {
    pub user_type: Role,
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub gender: String,
    pub registration_no: String,
    pub course: String,
    pub year: String,
    pub semester: String,
    pub caste: String,
    pub date_of_birth: String,
    pub designation: String,
    pub qualification: String,
    pub experience_years: String,
    pub bio: String,
    /// Cropped avatar as a `data:` URL.
    pub profile_pic: Option<String>,
    pub accepted_terms: bool,
}

impl Default for RegistrationDraft {
    fn default() -> Self {
        Self {
            user_type: Role::Student,
            full_name: String::new(),
            email: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            gender: String::new(),
            registration_no: String::new(),
            course: String::new(),
            year: String::new(),
            semester: String::new(),
            caste: String::new(),
            date_of_birth: String::new(),
            designation: String::new(),
            qualification: String::new(),
            experience_years: String::new(),
            bio: String::new(),
            profile_pic: None,
            accepted_terms: false,
        }
    }
}

/// Registration body sent to `/auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub user_type: Role,
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub gender: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub registration_no: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub course: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester: Option<u32>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub caste: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub date_of_birth: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub designation: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub qualification: String,
    pub experience_years: u32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub bio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_pic: Option<String>,
}

fn parse_count(raw: &str, field: &'static str) -> Result<Option<u32>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse()
        .map(Some)
        .map_err(|_| ValidationError::NotANumber { field })
}

impl RegistrationDraft {
    /// Checks the form in the order the user sees the messages.
    pub fn validate(self) -> Result<Registration, ValidationError> {
        let required = [
            ("Full Name", &self.full_name),
            ("Email", &self.email),
            ("Password", &self.password),
            ("Confirm Password", &self.confirm_password),
            ("Gender", &self.gender),
        ];
        if let Some((field, _)) = required
            .into_iter()
            .find(|(_, value)| value.trim().is_empty())
        {
            return Err(ValidationError::Required { field });
        }

        let email = self.email.trim();
        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail);
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort);
        }
        if !self.accepted_terms {
            return Err(ValidationError::TermsNotAccepted);
        }

        match self.user_type {
            Role::Student => {
                if [&self.course, &self.year, &self.semester]
                    .iter()
                    .any(|v| v.trim().is_empty())
                {
                    return Err(ValidationError::MissingStudentFields);
                }
            }
            Role::Teacher => {
                if [&self.designation, &self.qualification]
                    .iter()
                    .any(|v| v.trim().is_empty())
                {
                    return Err(ValidationError::MissingTeacherFields);
                }
            }
            Role::Admin => return Err(ValidationError::UnsupportedRole),
        }

        Ok(Registration {
            user_type: self.user_type,
            full_name: self.full_name.trim().to_owned(),
            email: email.to_owned(),
            year: parse_count(&self.year, "Year")?,
            semester: parse_count(&self.semester, "Semester")?,
            experience_years: parse_count(&self.experience_years, "Experience")?.unwrap_or(0),
            password: self.password,
            gender: self.gender,
            registration_no: self.registration_no,
            course: self.course,
            caste: self.caste,
            date_of_birth: self.date_of_birth,
            designation: self.designation,
            qualification: self.qualification,
            bio: self.bio,
            profile_pic: self.profile_pic.filter(|pic| !pic.is_empty()),
        })
    }
}

// ─── OTP ────────────────────────────────────────────────────────────────────────

/// Exactly six ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpCode(String);

impl OtpCode {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let code = raw.trim();
        if code.len() == OTP_LENGTH && code.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(code.to_owned()))
        } else {
            Err(ValidationError::InvalidOtp)
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ─── Other forms ────────────────────────────────────────────────────────────────

pub fn validate_contact(submission: &ContactSubmission) -> Result<(), ValidationError> {
    if submission.name.trim().is_empty() {
        return Err(ValidationError::Required { field: "Name" });
    }
    if submission.email.trim().is_empty() {
        return Err(ValidationError::Required { field: "Email" });
    }
    if !is_valid_email(submission.email.trim()) {
        return Err(ValidationError::InvalidEmail);
    }
    if submission.subject.trim().is_empty() {
        return Err(ValidationError::Required { field: "Subject" });
    }
    if submission.message.trim().is_empty() {
        return Err(ValidationError::Required { field: "Message" });
    }
    Ok(())
}

/// Email and phone, when present, must be well formed.
pub fn validate_profile_update(update: &ProfileUpdate) -> Result<(), ValidationError> {
    let text = |key: &str| {
        update
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };
    if text("email").is_some_and(|email| !is_valid_email(email)) {
        return Err(ValidationError::InvalidEmail);
    }
    if text("phone").is_some_and(|phone| !is_valid_phone(phone)) {
        return Err(ValidationError::InvalidPhone);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student_draft() -> RegistrationDraft {
        RegistrationDraft {
            user_type: Role::Student,
            full_name: "Asha Rao".into(),
            email: "asha@dept.edu".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
            gender: "female".into(),
            course: "MCA".into(),
            year: "2".into(),
            semester: "3".into(),
            accepted_terms: true,
            ..RegistrationDraft::default()
        }
    }

    #[test]
    fn login_requires_both_fields() {
        assert_eq!(
            LoginCredentials::parse("  ", "x", false),
            Err(ValidationError::MissingCredentials)
        );
        assert_eq!(
            LoginCredentials::parse("a@b.com", "", false),
            Err(ValidationError::MissingCredentials)
        );
    }

    #[test]
    fn login_rejects_malformed_email() {
        assert_eq!(
            LoginCredentials::parse("a@b", "secret1", true),
            Err(ValidationError::InvalidEmail)
        );
        let creds = LoginCredentials::parse(" a@b.com ", "secret1", true).unwrap();
        assert_eq!(creds.email, "a@b.com");
        let body = serde_json::to_value(&creds).unwrap();
        assert!(body.get("remember").is_none());
    }

    #[test]
    fn registration_reports_first_missing_field() {
        let draft = RegistrationDraft {
            gender: String::new(),
            ..student_draft()
        };
        let err = draft.validate().unwrap_err();
        assert_eq!(err.to_string(), "Gender is required");
    }

    #[test]
    fn registration_checks_password_rules() {
        let mismatch = RegistrationDraft {
            confirm_password: "secret2".into(),
            ..student_draft()
        };
        assert_eq!(mismatch.validate(), Err(ValidationError::PasswordMismatch));

        let short = RegistrationDraft {
            password: "abc".into(),
            confirm_password: "abc".into(),
            ..student_draft()
        };
        assert_eq!(short.validate(), Err(ValidationError::PasswordTooShort));
    }

    #[test]
    fn registration_requires_terms_and_role_fields() {
        let no_terms = RegistrationDraft {
            accepted_terms: false,
            ..student_draft()
        };
        assert_eq!(no_terms.validate(), Err(ValidationError::TermsNotAccepted));

        let no_semester = RegistrationDraft {
            semester: String::new(),
            ..student_draft()
        };
        assert_eq!(
            no_semester.validate(),
            Err(ValidationError::MissingStudentFields)
        );

        let teacher = RegistrationDraft {
            user_type: Role::Teacher,
            designation: "Professor".into(),
            ..student_draft()
        };
        assert_eq!(
            teacher.validate(),
            Err(ValidationError::MissingTeacherFields)
        );
    }

    #[test]
    fn registration_body_has_numbers_and_no_confirmation() {
        let registration = student_draft().validate().unwrap();
        assert_eq!(registration.year, Some(2));
        let body = serde_json::to_value(&registration).unwrap();
        assert_eq!(body["userType"], "student");
        assert_eq!(body["semester"], 3);
        assert_eq!(body["experienceYears"], 0);
        assert!(body.get("confirmPassword").is_none());
    }

    #[test]
    fn otp_must_be_six_digits() {
        assert!(OtpCode::parse("12345").is_err());
        assert!(OtpCode::parse("12345a").is_err());
        assert!(OtpCode::parse("1234567").is_err());
        assert_eq!(OtpCode::parse(" 123456 ").unwrap().as_str(), "123456");
    }

    #[test]
    fn contact_and_profile_checks() {
        let mut submission = ContactSubmission {
            name: "N".into(),
            email: "n@x.io".into(),
            subject: "S".into(),
            message: String::new(),
        };
        assert_eq!(
            validate_contact(&submission),
            Err(ValidationError::Required { field: "Message" })
        );
        submission.message = "hello".into();
        assert_eq!(validate_contact(&submission), Ok(()));

        let mut update = ProfileUpdate::new();
        update.insert("phone".into(), Value::from("+1 555 1234567"));
        assert_eq!(validate_profile_update(&update), Ok(()));
        update.insert("phone".into(), Value::from("call me"));
        assert_eq!(
            validate_profile_update(&update),
            Err(ValidationError::InvalidPhone)
        );
    }

    #[test]
    fn forgot_password_email() {
        assert_eq!(
            require_email(""),
            Err(ValidationError::Required { field: "Email" })
        );
        assert_eq!(require_email(" x@y.org ").unwrap(), "x@y.org");
    }
}
