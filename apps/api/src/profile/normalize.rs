//! Canonical shape for stored profiles.
//!
//! Optional strings are trimmed and empty ones become `None`; list fields
//! (bullets, technologies, skills) lose their blank entries. Applying
//! `normalize_sections` twice yields the same value as applying it once.

use crate::models::profile::{Basics, Education, Experience, ProfileSections, Project, Skills};

/// Trims an optional string, coercing blank values to `None`.
pub fn clean_str(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trims every entry and drops the blank ones, preserving order.
pub fn clean_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

pub fn normalize_sections(sections: ProfileSections) -> ProfileSections {
    let ProfileSections {
        basics,
        education,
        experience,
        projects,
        skills,
    } = sections;

    ProfileSections {
        basics: Basics {
            phone: clean_str(basics.phone),
            location: clean_str(basics.location),
            linked_in: clean_str(basics.linked_in),
            github: clean_str(basics.github),
            website: clean_str(basics.website),
            summary: clean_str(basics.summary),
            ..basics
        },
        education: education
            .into_iter()
            .map(|e| Education {
                location: clean_str(e.location),
                ..e
            })
            .collect(),
        experience: experience
            .into_iter()
            .map(|e| Experience {
                location: clean_str(e.location),
                end_date: clean_str(e.end_date),
                bullets: clean_list(e.bullets),
                ..e
            })
            .collect(),
        projects: projects
            .into_iter()
            .map(|p| Project {
                live_demo_url: clean_str(p.live_demo_url),
                repo_url: clean_str(p.repo_url),
                technologies: clean_list(p.technologies),
                ..p
            })
            .collect(),
        skills: Skills {
            items: clean_list(skills.items),
        },
    }
}
