//! Filename grammar for generated documents.
//!
//! `<resume|cover>-<templateId>-v<digits>.<pdf|docx>`, case-insensitive, with
//! `templateId` restricted to ASCII word characters and dashes.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// ASCII-only case folding: `ſ` must not stand in for `s`, nor `K` for `k`.
static FILE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(r"^(resume|cover)-([A-Za-z0-9_-]+)-v([0-9]+)\.(pdf|docx)$")
        .case_insensitive(true)
        .unicode(false)
        .build()
        .expect("valid file name regex")
});

static TEMPLATE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid template id regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Resume,
    Cover,
}

impl DocumentKind {
    pub fn prefix(self) -> &'static str {
        match self {
            DocumentKind::Resume => "resume",
            DocumentKind::Cover => "cover",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileExt {
    Pdf,
    Docx,
}

impl FileExt {
    pub fn as_str(self) -> &'static str {
        match self {
            FileExt::Pdf => "pdf",
            FileExt::Docx => "docx",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            FileExt::Pdf => "application/pdf",
            FileExt::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFileName {
    pub kind: DocumentKind,
    pub template_id: String,
    pub ext: FileExt,
    /// `None` when the digits overflow `u64`.
    pub version: Option<u64>,
}

/// Classifies a filename. Anything outside the grammar yields `None`.
pub fn parse_file_name(name: &str) -> Option<ParsedFileName> {
    let caps = FILE_NAME_RE.captures(name)?;
    let kind = if caps[1].eq_ignore_ascii_case("resume") {
        DocumentKind::Resume
    } else {
        DocumentKind::Cover
    };
    let ext = if caps[4].eq_ignore_ascii_case("pdf") {
        FileExt::Pdf
    } else {
        FileExt::Docx
    };
    Some(ParsedFileName {
        kind,
        template_id: caps[2].to_string(),
        ext,
        version: caps[3].parse().ok(),
    })
}

pub fn generated_file_name(
    kind: DocumentKind,
    template_id: &str,
    version: i64,
    ext: FileExt,
) -> String {
    format!("{}-{}-v{}.{}", kind.prefix(), template_id, version, ext.as_str())
}

pub fn is_valid_template_id(template_id: &str) -> bool {
    TEMPLATE_ID_RE.is_match(template_id)
}

/// Directory name for a user: every character outside `[A-Za-z0-9@.]` becomes `_`.
/// Returns `None` for names that would escape the generated root (`""`, `.`, `..`).
pub fn user_dir_name(email: &str) -> Option<String> {
    let name: String = email
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '@' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if name.chars().all(|c| c == '.') {
        return None;
    }
    Some(name)
}
