//! Fixed-layout DOCX résumé: name, contact line, then the experience section.

use std::io::Cursor;
use std::path::Path;

use docx_rs::{Docx, Paragraph, Run, Style, StyleType};
use tracing::debug;

use crate::models::profile::ProfileSections;
use crate::render::RenderError;

const HEADING_STYLE_ID: &str = "Heading1";
/// Sizes are in half-points.
const NAME_SIZE: usize = 32;
const HEADING_SIZE: usize = 28;

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Name(String),
    Line(String),
    Heading(String),
    EntryTitle(String),
    Bullet(String),
    Blank,
}

/// Lays out the document as a flat list of paragraphs.
pub fn layout_blocks(profile: &ProfileSections) -> Vec<Block> {
    let basics = &profile.basics;
    let contact: Vec<&str> = [
        Some(basics.email.as_str()),
        basics.phone.as_deref(),
        basics.location.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter(|s| !s.trim().is_empty())
    .collect();

    let mut blocks = vec![
        Block::Name(basics.full_name.clone()),
        Block::Line(contact.join(" · ")),
        Block::Blank,
        Block::Heading("Experience".to_string()),
    ];

    for e in &profile.experience {
        let end = e.end_date.as_deref().unwrap_or("Present");
        blocks.push(Block::EntryTitle(format!(
            "{} — {} ({} – {})",
            e.job_title, e.company, e.start_date, end
        )));
        blocks.extend(e.bullets.iter().map(|b| Block::Bullet(format!("• {b}"))));
        blocks.push(Block::Blank);
    }
    blocks
}

/// Serializes the profile into DOCX bytes.
pub fn build_docx(profile: &ProfileSections) -> Result<Vec<u8>, RenderError> {
    let mut doc = Docx::new().add_style(
        Style::new(HEADING_STYLE_ID, StyleType::Paragraph)
            .name("Heading 1")
            .size(HEADING_SIZE)
            .bold(),
    );

    for block in layout_blocks(profile) {
        let paragraph = match block {
            Block::Name(text) => {
                Paragraph::new().add_run(Run::new().add_text(text).bold().size(NAME_SIZE))
            }
            Block::Heading(text) => Paragraph::new()
                .style(HEADING_STYLE_ID)
                .add_run(Run::new().add_text(text)),
            Block::EntryTitle(text) => Paragraph::new().add_run(Run::new().add_text(text).bold()),
            Block::Line(text) | Block::Bullet(text) => {
                Paragraph::new().add_run(Run::new().add_text(text))
            }
            Block::Blank => Paragraph::new(),
        };
        doc = doc.add_paragraph(paragraph);
    }

    let mut buffer = Cursor::new(Vec::new());
    doc.build()
        .pack(&mut buffer)
        .map_err(|e| RenderError::Docx(e.to_string()))?;
    Ok(buffer.into_inner())
}

pub async fn write_docx(profile: &ProfileSections, out_path: &Path) -> Result<(), RenderError> {
    let bytes = build_docx(profile)?;
    tokio::fs::write(out_path, &bytes).await?;
    debug!("Wrote {} byte DOCX to {}", bytes.len(), out_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::{Basics, Experience};

    fn sample() -> ProfileSections {
        ProfileSections {
            basics: Basics {
                full_name: "Ada Lovelace".into(),
                email: "ada@example.com".into(),
                location: Some("London".into()),
                ..Default::default()
            },
            experience: vec![
                Experience {
                    job_title: "Analyst".into(),
                    company: "Engine Co".into(),
                    start_date: "1842".into(),
                    end_date: Some("1843".into()),
                    bullets: vec!["Annotated the engine".into(), "Wrote the first program".into()],
                    ..Default::default()
                },
                Experience {
                    job_title: "Correspondent".into(),
                    company: "Royal Society".into(),
                    start_date: "1844".into(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_layout_skeleton() {
        let blocks = layout_blocks(&sample());
        assert_eq!(
            blocks,
            vec![
                Block::Name("Ada Lovelace".into()),
                Block::Line("ada@example.com · London".into()),
                Block::Blank,
                Block::Heading("Experience".into()),
                Block::EntryTitle("Analyst — Engine Co (1842 – 1843)".into()),
                Block::Bullet("• Annotated the engine".into()),
                Block::Bullet("• Wrote the first program".into()),
                Block::Blank,
                Block::EntryTitle("Correspondent — Royal Society (1844 – Present)".into()),
                Block::Blank,
            ]
        );
    }

    #[test]
    fn test_build_produces_zip_container() {
        let bytes = build_docx(&sample()).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[tokio::test]
    async fn test_write_docx_to_disk() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("resume-simple-ats-v1.docx");
        write_docx(&sample(), &path).await.unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
