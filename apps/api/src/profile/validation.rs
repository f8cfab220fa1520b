use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use url::Url;

use crate::errors::AppError;
use crate::models::profile::{Basics, Education, Experience, ProfileSections, Project};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

const GPA_MIN: f64 = 0.0;
const GPA_MAX: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every violation found in a payload, in field order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Validates a full upsert payload.
pub fn validate_sections(sections: &ProfileSections) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    check_basics(&sections.basics, &mut errors);
    check_education(&sections.education, &mut errors);
    check_experience(&sections.experience, &mut errors);
    check_projects(&sections.projects, &mut errors);
    errors.into_result()
}

pub fn validate_basics(basics: &Basics) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    check_basics(basics, &mut errors);
    errors.into_result()
}

pub fn validate_education(entries: &[Education]) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    check_education(entries, &mut errors);
    errors.into_result()
}

pub fn validate_experience(entries: &[Experience]) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    check_experience(entries, &mut errors);
    errors.into_result()
}

pub fn validate_projects(entries: &[Project]) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    check_projects(entries, &mut errors);
    errors.into_result()
}

fn check_basics(basics: &Basics, errors: &mut ValidationErrors) {
    require(&basics.full_name, "basics.fullName", errors);
    if !EMAIL_RE.is_match(basics.email.trim()) {
        errors.push("basics.email", "must be a valid email address");
    }
    check_url(basics.linked_in.as_deref(), "basics.linkedIn", errors);
    check_url(basics.github.as_deref(), "basics.github", errors);
    check_url(basics.website.as_deref(), "basics.website", errors);
}

fn check_education(entries: &[Education], errors: &mut ValidationErrors) {
    for (i, e) in entries.iter().enumerate() {
        let at = |f: &str| format!("education[{i}].{f}");
        require(&e.degree, &at("degree"), errors);
        require(&e.institution, &at("institution"), errors);
        require(&e.start_date, &at("startDate"), errors);
        require(&e.end_date, &at("endDate"), errors);
        if let Some(gpa) = e.gpa {
            if !(GPA_MIN..=GPA_MAX).contains(&gpa) {
                errors.push(at("gpa"), "GPA must be between 0 and 10");
            }
        }
    }
}

fn check_experience(entries: &[Experience], errors: &mut ValidationErrors) {
    for (i, e) in entries.iter().enumerate() {
        let at = |f: &str| format!("experience[{i}].{f}");
        require(&e.job_title, &at("jobTitle"), errors);
        require(&e.company, &at("company"), errors);
        require(&e.start_date, &at("startDate"), errors);
    }
}

fn check_projects(entries: &[Project], errors: &mut ValidationErrors) {
    for (i, p) in entries.iter().enumerate() {
        let at = |f: &str| format!("projects[{i}].{f}");
        require(&p.title, &at("title"), errors);
        require(&p.description, &at("description"), errors);
        check_url(p.live_demo_url.as_deref(), &at("liveDemoUrl"), errors);
        check_url(p.repo_url.as_deref(), &at("repoUrl"), errors);
    }
}

fn require(value: &str, field: &str, errors: &mut ValidationErrors) {
    if value.trim().is_empty() {
        errors.push(field, "is required");
    }
}

/// Blank values count as absent. Present values must be absolute http(s) URLs.
fn check_url(value: Option<&str>, field: &str, errors: &mut ValidationErrors) {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return;
    };
    let ok = Url::parse(raw)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
        .unwrap_or(false);
    if !ok {
        errors.push(field, "must be a URL including http:// or https://");
    }
}
