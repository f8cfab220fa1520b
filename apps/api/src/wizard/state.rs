use serde::{Deserialize, Serialize};

use crate::models::profile::{Basics, Education, Experience, ProfileSections, Project, Skills};
use crate::profile::normalize::normalize_sections;
use crate::profile::validation::{
    validate_basics, validate_education, validate_experience, validate_projects, ValidationErrors,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WizardStep {
    #[default]
    Basics,
    Education,
    Experience,
    Projects,
    Skills,
    Review,
}

impl WizardStep {
    pub const ORDER: [WizardStep; 6] = [
        WizardStep::Basics,
        WizardStep::Education,
        WizardStep::Experience,
        WizardStep::Projects,
        WizardStep::Skills,
        WizardStep::Review,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|s| *s == self).unwrap_or(0)
    }

    /// Saturates at `Review`.
    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1).min(Self::ORDER.len() - 1)]
    }

    /// Saturates at `Basics`.
    pub fn previous(self) -> Self {
        Self::ORDER[self.index().saturating_sub(1)]
    }
}

/// Experience as typed into the form: bullets are one free-text block, one per line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExperienceForm {
    pub job_title: String,
    pub company: String,
    pub location: String,
    pub start_date: String,
    /// Empty means "Present".
    pub end_date: String,
    pub bullets_text: String,
}

impl ExperienceForm {
    fn to_experience(&self) -> Experience {
        Experience {
            job_title: self.job_title.clone(),
            company: self.company.clone(),
            location: Some(self.location.clone()),
            start_date: self.start_date.clone(),
            end_date: Some(self.end_date.clone()),
            bullets: self.bullets_text.lines().map(str::to_string).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfileForm {
    pub basics: Basics,
    pub education: Vec<Education>,
    pub experience: Vec<ExperienceForm>,
    pub projects: Vec<Project>,
    pub skills: Skills,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WizardState {
    pub step: WizardStep,
    pub form: ProfileForm,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum StepInput {
    Basics(Basics),
    Education(Vec<Education>),
    Experience(Vec<ExperienceForm>),
    Projects(Vec<Project>),
    Skills(Skills),
    Back,
    GoTo(WizardStep),
}

/// Applies one wizard interaction.
///
/// A section submission replaces that section and moves to the step after it.
/// Invalid submissions return the errors and leave the caller's state untouched.
pub fn advance(state: WizardState, input: StepInput) -> Result<WizardState, ValidationErrors> {
    let WizardState { step, mut form } = state;

    let step = match input {
        StepInput::Basics(basics) => {
            validate_basics(&basics)?;
            form.basics = basics;
            WizardStep::Basics.next()
        }
        StepInput::Education(education) => {
            validate_education(&education)?;
            form.education = education;
            WizardStep::Education.next()
        }
        StepInput::Experience(experience) => {
            let converted: Vec<Experience> =
                experience.iter().map(ExperienceForm::to_experience).collect();
            validate_experience(&converted)?;
            form.experience = experience;
            WizardStep::Experience.next()
        }
        StepInput::Projects(projects) => {
            validate_projects(&projects)?;
            form.projects = projects;
            WizardStep::Projects.next()
        }
        StepInput::Skills(skills) => {
            form.skills = skills;
            WizardStep::Skills.next()
        }
        StepInput::Back => step.previous(),
        StepInput::GoTo(target) => target,
    };

    Ok(WizardState { step, form })
}

/// Converts the form into the profile upsert payload: bullet text is split per
/// line with blank lines dropped, and empty optional fields become absent.
pub fn to_upsert_payload(form: &ProfileForm) -> ProfileSections {
    normalize_sections(ProfileSections {
        basics: form.basics.clone(),
        education: form.education.clone(),
        experience: form
            .experience
            .iter()
            .map(ExperienceForm::to_experience)
            .collect(),
        projects: form.projects.clone(),
        skills: form.skills.clone(),
    })
}
