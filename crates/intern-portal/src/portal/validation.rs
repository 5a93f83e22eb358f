//! Declarative field rules for the login, registration, and application forms.
//!
//! Each form has a typed field enum. Rules are looked up per field and checked against the
//! field's current value, so the wizard can validate one field on edit, one step on advance,
//! or the whole draft on submit with the same table.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use url::Url;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::domain::{LoginCredentials, RegisterData};

/// Typed key for a form field, serialized as its dotted form path (e.g. `education.degree`).
pub trait FieldKey: Copy + Ord {
    fn path(self) -> &'static str;
}

/// Value of a single field handed to a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Flag(bool),
}

/// Declarative rule for a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    MinLength { min: usize, message: &'static str },
    Email { message: &'static str },
    MustBeTrue { message: &'static str },
}

impl Rule {
    /// Returns the failure message, or `None` when the value satisfies the rule.
    pub fn check(&self, value: FieldValue<'_>) -> Option<&'static str> {
        match (*self, value) {
            (Rule::MinLength { min, message }, FieldValue::Text(text)) => {
                (text.chars().count() < min).then_some(message)
            }
            (Rule::Email { message }, FieldValue::Text(text)) => {
                (!is_valid_email(text)).then_some(message)
            }
            (Rule::MustBeTrue { message }, FieldValue::Flag(flag)) => (!flag).then_some(message),
            (Rule::MinLength { message, .. }, FieldValue::Flag(_))
            | (Rule::Email { message }, FieldValue::Flag(_))
            | (Rule::MustBeTrue { message }, FieldValue::Text(_)) => Some(message),
        }
    }
}

/// Field-scoped validation messages keyed by a typed field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrors<K: FieldKey> {
    errors: BTreeMap<K, String>,
}

impl<K: FieldKey> Default for FieldErrors<K> {
    fn default() -> Self {
        Self {
            errors: BTreeMap::new(),
        }
    }
}

impl<K: FieldKey> FieldErrors<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: K) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: K) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn insert(&mut self, field: K, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    pub fn remove(&mut self, field: K) -> Option<String> {
        self.errors.remove(&field)
    }

    /// Record or clear the error for `field` based on a rule outcome.
    pub fn apply(&mut self, field: K, outcome: Option<&str>) {
        match outcome {
            Some(message) => self.insert(field, message),
            None => {
                self.remove(field);
            }
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = K> + '_ {
        self.errors.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, &str)> + '_ {
        self.errors
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }
}

impl<K: FieldKey> Serialize for FieldErrors<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.errors.len()))?;
        for (field, message) in &self.errors {
            map.serialize_entry(field.path(), message)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LoginField {
    Email,
    Password,
}

impl FieldKey for LoginField {
    fn path(self) -> &'static str {
        match self {
            LoginField::Email => "email",
            LoginField::Password => "password",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RegisterField {
    FirstName,
    LastName,
    Email,
    Password,
    ConfirmPassword,
}

impl FieldKey for RegisterField {
    fn path(self) -> &'static str {
        match self {
            RegisterField::FirstName => "firstName",
            RegisterField::LastName => "lastName",
            RegisterField::Email => "email",
            RegisterField::Password => "password",
            RegisterField::ConfirmPassword => "confirmPassword",
        }
    }
}

/// Every field of the application draft, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ApplicationField {
    FirstName,
    LastName,
    Email,
    Phone,
    DateOfBirth,
    Address,
    City,
    State,
    ZipCode,
    Degree,
    FieldOfStudy,
    University,
    GraduationYear,
    Gpa,
    HasExperience,
    PreviousInternships,
    Projects,
    Skills,
    CoverLetter,
    WhyInterested,
    Availability,
    TermsAccepted,
}

impl ApplicationField {
    pub const ALL: [ApplicationField; 22] = [
        ApplicationField::FirstName,
        ApplicationField::LastName,
        ApplicationField::Email,
        ApplicationField::Phone,
        ApplicationField::DateOfBirth,
        ApplicationField::Address,
        ApplicationField::City,
        ApplicationField::State,
        ApplicationField::ZipCode,
        ApplicationField::Degree,
        ApplicationField::FieldOfStudy,
        ApplicationField::University,
        ApplicationField::GraduationYear,
        ApplicationField::Gpa,
        ApplicationField::HasExperience,
        ApplicationField::PreviousInternships,
        ApplicationField::Projects,
        ApplicationField::Skills,
        ApplicationField::CoverLetter,
        ApplicationField::WhyInterested,
        ApplicationField::Availability,
        ApplicationField::TermsAccepted,
    ];

    /// Human label used by the CLI prompts and review screen.
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationField::FirstName => "First Name",
            ApplicationField::LastName => "Last Name",
            ApplicationField::Email => "Email Address",
            ApplicationField::Phone => "Phone Number",
            ApplicationField::DateOfBirth => "Date of Birth",
            ApplicationField::Address => "Address",
            ApplicationField::City => "City",
            ApplicationField::State => "State",
            ApplicationField::ZipCode => "ZIP Code",
            ApplicationField::Degree => "Degree",
            ApplicationField::FieldOfStudy => "Field of Study",
            ApplicationField::University => "University / College",
            ApplicationField::GraduationYear => "Graduation Year",
            ApplicationField::Gpa => "GPA (Optional)",
            ApplicationField::HasExperience => "Has Relevant Experience",
            ApplicationField::PreviousInternships => "Previous Internships / Work Experience",
            ApplicationField::Projects => "Projects",
            ApplicationField::Skills => "Relevant Skills",
            ApplicationField::CoverLetter => "Cover Letter",
            ApplicationField::WhyInterested => "Why are you interested in this internship?",
            ApplicationField::Availability => "Availability",
            ApplicationField::TermsAccepted => "Terms and Conditions",
        }
    }
}

impl FieldKey for ApplicationField {
    fn path(self) -> &'static str {
        match self {
            ApplicationField::FirstName => "firstName",
            ApplicationField::LastName => "lastName",
            ApplicationField::Email => "email",
            ApplicationField::Phone => "phone",
            ApplicationField::DateOfBirth => "dateOfBirth",
            ApplicationField::Address => "address",
            ApplicationField::City => "city",
            ApplicationField::State => "state",
            ApplicationField::ZipCode => "zipCode",
            ApplicationField::Degree => "education.degree",
            ApplicationField::FieldOfStudy => "education.field",
            ApplicationField::University => "education.university",
            ApplicationField::GraduationYear => "education.graduationYear",
            ApplicationField::Gpa => "education.gpa",
            ApplicationField::HasExperience => "experience.hasExperience",
            ApplicationField::PreviousInternships => "experience.previousInternships",
            ApplicationField::Projects => "experience.projects",
            ApplicationField::Skills => "experience.skills",
            ApplicationField::CoverLetter => "coverLetter",
            ApplicationField::WhyInterested => "whyInterested",
            ApplicationField::Availability => "availability",
            ApplicationField::TermsAccepted => "termsAccepted",
        }
    }
}

const EMAIL_MESSAGE: &str = "Please enter a valid email address";
const PASSWORD_MESSAGE: &str = "Password must be at least 6 characters";
const PASSWORD_MISMATCH: &str = "Passwords don't match";

const fn min(min: usize, message: &'static str) -> Rule {
    Rule::MinLength { min, message }
}

pub fn login_rule(field: LoginField) -> Rule {
    match field {
        LoginField::Email => Rule::Email {
            message: EMAIL_MESSAGE,
        },
        LoginField::Password => min(6, PASSWORD_MESSAGE),
    }
}

pub fn register_rule(field: RegisterField) -> Rule {
    match field {
        RegisterField::FirstName => min(2, "First name must be at least 2 characters"),
        RegisterField::LastName => min(2, "Last name must be at least 2 characters"),
        RegisterField::Email => Rule::Email {
            message: EMAIL_MESSAGE,
        },
        RegisterField::Password | RegisterField::ConfirmPassword => min(6, PASSWORD_MESSAGE),
    }
}

/// Rule for an application field, or `None` for optional fields.
pub fn application_rule(field: ApplicationField) -> Option<Rule> {
    let rule = match field {
        ApplicationField::FirstName => min(2, "First name is required"),
        ApplicationField::LastName => min(2, "Last name is required"),
        ApplicationField::Email => Rule::Email {
            message: EMAIL_MESSAGE,
        },
        ApplicationField::Phone => min(10, "Phone number must be at least 10 digits"),
        ApplicationField::DateOfBirth => min(1, "Date of birth is required"),
        ApplicationField::Address => min(5, "Address is required"),
        ApplicationField::City => min(2, "City is required"),
        ApplicationField::State => min(2, "State is required"),
        ApplicationField::ZipCode => min(5, "ZIP code is required"),
        ApplicationField::Degree => min(1, "Degree is required"),
        ApplicationField::FieldOfStudy => min(1, "Field of study is required"),
        ApplicationField::University => min(1, "University is required"),
        ApplicationField::GraduationYear => min(4, "Graduation year is required"),
        ApplicationField::Skills => min(10, "Please describe your relevant skills"),
        ApplicationField::CoverLetter => min(10, "Cover letter must be at least 10 characters"),
        ApplicationField::WhyInterested => min(
            5,
            "Please explain why you are interested (min 5 characters)",
        ),
        ApplicationField::Availability => min(1, "Availability is required"),
        ApplicationField::TermsAccepted => Rule::MustBeTrue {
            message: "You must accept the terms and conditions",
        },
        ApplicationField::Gpa
        | ApplicationField::HasExperience
        | ApplicationField::PreviousInternships
        | ApplicationField::Projects => return None,
    };
    Some(rule)
}

pub fn validate_login(credentials: &LoginCredentials) -> FieldErrors<LoginField> {
    let mut errors = FieldErrors::new();
    for (field, value) in [
        (LoginField::Email, credentials.email.as_str()),
        (LoginField::Password, credentials.password.as_str()),
    ] {
        errors.apply(field, login_rule(field).check(FieldValue::Text(value)));
    }
    errors
}

pub fn validate_registration(data: &RegisterData) -> FieldErrors<RegisterField> {
    let mut errors = FieldErrors::new();
    for (field, value) in [
        (RegisterField::FirstName, data.first_name.as_str()),
        (RegisterField::LastName, data.last_name.as_str()),
        (RegisterField::Email, data.email.as_str()),
        (RegisterField::Password, data.password.as_str()),
        (RegisterField::ConfirmPassword, data.confirm_password.as_str()),
    ] {
        errors.apply(field, register_rule(field).check(FieldValue::Text(value)));
    }

    // The cross-field check runs only once each field passes on its own.
    if errors.is_empty() && data.password != data.confirm_password {
        errors.insert(RegisterField::ConfirmPassword, PASSWORD_MISMATCH);
    }
    errors
}

pub fn is_valid_email(value: &str) -> bool {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });
    regex.is_match(value)
}

/// Absolute-URL check with WHATWG parsing rules, the same ones a browser's `new URL` applies.
pub fn is_well_formed_url(value: &str) -> bool {
    Url::parse(value.trim()).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_check_requires_a_scheme() {
        assert!(!is_well_formed_url("not a url"));
        assert!(!is_well_formed_url(""));
        assert!(!is_well_formed_url("drive.google.com/file/d/abc"));
        assert!(!is_well_formed_url("1http://example.com"));
    }

    #[test]
    fn url_check_accepts_shareable_links() {
        assert!(is_well_formed_url("https://drive.google.com/file/d/abc/view?usp=sharing"));
        assert!(is_well_formed_url("http://localhost:8080/resume.pdf"));
        assert!(is_well_formed_url("  https://example.com  "));
        assert!(is_well_formed_url("mailto:someone@example.com"));
        assert!(is_well_formed_url("http://[::1]:3000/cv"));
    }

    #[test]
    fn url_check_rejects_broken_hosts_and_ports() {
        assert!(!is_well_formed_url("https://"));
        assert!(!is_well_formed_url("https://[::1/"));
        assert!(!is_well_formed_url("https://exa mple.com"));
        assert!(!is_well_formed_url("https://example.com:99999/"));
        assert!(!is_well_formed_url("https://example.com:port/"));
    }

    #[test]
    fn url_check_follows_whatwg_host_parsing() {
        assert!(!is_well_formed_url("http://1.2.3.999/"));
        assert!(!is_well_formed_url("http://[1::2::3]/"));
        assert!(!is_well_formed_url("https://0x100000000/"));

        assert!(is_well_formed_url("http://ex%41mple.com/"));
        assert!(is_well_formed_url("http://ex\tample.com/"));
    }

    #[test]
    fn min_length_counts_characters_not_bytes() {
        let rule = min(2, "too short");
        assert_eq!(rule.check(FieldValue::Text("é")), Some("too short"));
        assert_eq!(rule.check(FieldValue::Text("éé")), None);
    }

    #[test]
    fn must_be_true_rejects_unchecked_flags() {
        let rule = application_rule(ApplicationField::TermsAccepted).expect("terms rule");
        assert!(rule.check(FieldValue::Flag(false)).is_some());
        assert!(rule.check(FieldValue::Flag(true)).is_none());
    }

    #[test]
    fn field_errors_serialize_by_form_path() {
        let mut errors = FieldErrors::new();
        errors.insert(ApplicationField::Degree, "Degree is required");
        errors.insert(ApplicationField::FirstName, "First name is required");

        let json = serde_json::to_value(&errors).expect("serializes");
        assert_eq!(json["education.degree"], "Degree is required");
        assert_eq!(json["firstName"], "First name is required");
    }
}
