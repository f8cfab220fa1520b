use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::profile::normalize::normalize_sections;

/// Step 1: personal information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Basics {
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_in: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Education {
    pub degree: String,
    pub institution: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start_date: String,
    pub end_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpa: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Experience {
    pub job_title: String,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start_date: String,
    /// Absent means the position is current ("Present").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_demo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
    pub description: String,
    pub technologies: Vec<String>,
}

/// Always serialized as `{"items": [...]}`.
///
/// Rows written by early builds stored a bare JSON array; both shapes are
/// accepted on the way in.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Skills {
    pub items: Vec<String>,
}

impl<'de> Deserialize<'de> for Skills {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum StoredSkills {
            Wrapped {
                #[serde(default)]
                items: Vec<String>,
            },
            Legacy(Vec<String>),
        }

        let items = match StoredSkills::deserialize(deserializer)? {
            StoredSkills::Wrapped { items } => items,
            StoredSkills::Legacy(items) => items,
        };
        Ok(Skills { items })
    }
}

/// The five independent form sections. Doubles as the upsert payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfileSections {
    pub basics: Basics,
    pub education: Vec<Education>,
    pub experience: Vec<Experience>,
    pub projects: Vec<Project>,
    pub skills: Skills,
}

/// A persisted profile as returned to clients and handed to templates.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Uuid,
    #[serde(flatten)]
    pub sections: ProfileSections,
    pub revision: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub basics: Json<Basics>,
    pub education: Json<Vec<Education>>,
    pub experience: Json<Vec<Experience>>,
    pub projects: Json<Vec<Project>>,
    pub skills: Json<Skills>,
    pub revision: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        let sections = ProfileSections {
            basics: row.basics.0,
            education: row.education.0,
            experience: row.experience.0,
            projects: row.projects.0,
            skills: row.skills.0,
        };
        Profile {
            id: row.id,
            sections: normalize_sections(sections),
            revision: row.revision,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
