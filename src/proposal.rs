//! Proposed section boundaries supplied by the document analysis service.
//!
//! The service answers with one output file per proposed section. Only the start pages seed
//! markers; the names (given, or derived from the output file path) label the sections that
//! start on those pages.

use crate::error::SplitResult;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Trailing page-range suffix such as `_12`, ` 3-4` or `_5_6`.
static PAGE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(_|\s)\d+([-_\d]*)$").expect("PAGE_SUFFIX is a valid regex pattern")
});

/// Word separators in file names.
static NAME_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[_\s]+").expect("NAME_SEPARATOR is a valid regex pattern"));

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// A candidate section: where it starts and what to call it.
pub struct Proposal {
    /// First page (1-based).
    pub start_page: usize,
    /// Last page (inclusive, never before `start_page`).
    pub end_page: usize,
    /// Proposed display name.
    pub name: String,
}

#[derive(Clone, Debug, Deserialize)]
/// Response body of the analysis service.
pub struct ProposalResponse {
    /// One entry per proposed output file.
    #[serde(alias = "outputFiles")]
    pub output_files: Vec<OutputFile>,
}

#[derive(Clone, Debug, Deserialize)]
/// A proposed output file and the pages it would hold.
pub struct OutputFile {
    /// First page of the file.
    #[serde(alias = "startPage")]
    pub start_page: usize,
    /// Last page, only meaningful for multi-page files.
    #[serde(default, alias = "endPage")]
    pub end_page: Option<usize>,
    /// Whether the file spans more than its start page.
    #[serde(default, alias = "isMultipage")]
    pub is_multipage: bool,
    /// Path the service would write the file to.
    pub path: String,
    /// Explicit name; derived from `path` when absent.
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
/// Proposals for one document together with the output paths they came from.
pub struct ProposalStore {
    proposals: Vec<Proposal>,
    source_paths: Vec<String>,
}

impl ProposalStore {
    #[must_use]
    /// Store holding the given proposals and no source paths.
    pub fn new(proposals: Vec<Proposal>) -> Self {
        Self {
            proposals,
            source_paths: Vec::new(),
        }
    }

    #[must_use]
    /// Convert a service response, naming unnamed files after their paths.
    ///
    /// Entries with a start page of 0 are dropped. Single-page entries end on their start page.
    pub fn from_response(response: ProposalResponse, boilerplate: &[String]) -> Self {
        let mut store = Self::default();
        for file in response.output_files {
            store.source_paths.push(file.path.clone());
            if file.start_page == 0 {
                warn!(path = %file.path, "ignoring proposal without a start page");
                continue;
            }
            let end_page = if file.is_multipage {
                file.end_page.unwrap_or(file.start_page).max(file.start_page)
            } else {
                file.start_page
            };
            let name = file
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| name_from_path(&file.path, boilerplate));
            store.proposals.push(Proposal {
                start_page: file.start_page,
                end_page,
                name,
            });
        }
        debug!(proposals = store.proposals.len(), "loaded proposals");
        store
    }

    /// Parse a service response from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not match the response shape.
    pub fn from_json(json: &str, boilerplate: &[String]) -> SplitResult<Self> {
        let response: ProposalResponse = serde_json::from_str(json)?;
        Ok(Self::from_response(response, boilerplate))
    }

    /// Read a service response from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path, boilerplate: &[String]) -> SplitResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents, boilerplate)
    }

    #[must_use]
    /// Proposals in the order the service listed them.
    pub fn proposals(&self) -> &[Proposal] {
        &self.proposals
    }

    /// Start page of each proposal.
    pub fn start_pages(&self) -> impl Iterator<Item = usize> + '_ {
        self.proposals.iter().map(|p| p.start_page)
    }

    #[must_use]
    /// Output paths named in the response, including dropped entries.
    pub fn source_paths(&self) -> &[String] {
        &self.source_paths
    }

    #[must_use]
    /// Whether there are no proposals.
    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }
}

#[must_use]
/// Derive a section name from an output file path.
///
/// Takes the file name without its `.pdf` extension, strips a trailing page-range suffix, splits
/// on underscores and whitespace, drops `boilerplate` words (case-insensitively) and joins the
/// rest with `-`. Falls back to `Section` when nothing remains.
pub fn name_from_path(path: &str, boilerplate: &[String]) -> String {
    let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let stem = strip_pdf_extension(file_name);
    let trimmed = PAGE_SUFFIX.replace(stem, "");
    let words: Vec<&str> = NAME_SEPARATOR
        .split(&trimmed)
        .filter(|word| !word.is_empty())
        .filter(|word| !boilerplate.iter().any(|b| b.eq_ignore_ascii_case(word)))
        .collect();
    if words.is_empty() {
        "Section".to_string()
    } else {
        words.join("-")
    }
}

fn strip_pdf_extension(file_name: &str) -> &str {
    let split = file_name.len().saturating_sub(4);
    match (file_name.get(..split), file_name.get(split..)) {
        (Some(stem), Some(ext)) if ext.eq_ignore_ascii_case(".pdf") => stem,
        _ => file_name,
    }
}

#[cfg(test)]
#[path = "tests/proposal.rs"]
mod tests;
