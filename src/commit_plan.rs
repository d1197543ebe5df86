//! The commit plan turns reviewed sections into a request to cut the document.
//!
//! This module defines the hand-off from the review session to whatever performs the split. The
//! plan names the source document, one cut per section and the output files the analysis service
//! had proposed, so the splitter can replace them. splitreview only produces the plan; sending it
//! is up to the caller.

use crate::error::SplitResult;
use crate::section::Section;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
/// Serialisable request to split one or more documents along reviewed sections.
pub struct CommitPlan {
    /// One entry per source document.
    pub final_paths: Vec<DocumentCuts>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
/// Cuts to apply to a single source document.
pub struct DocumentCuts {
    /// Document being split.
    pub original_file_path: String,
    /// Page ranges to extract, in document order.
    pub cuts: Vec<Cut>,
    /// Previously proposed output files superseded by these cuts.
    pub old_file_paths: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
/// One output file: an inclusive page range and its name.
pub struct Cut {
    /// First page (1-based).
    pub start_page: usize,
    /// Last page (inclusive).
    pub end_page: usize,
    /// Name of the output file.
    pub pdf_name: String,
    /// Whether this cut replaces proposed output rather than adding to it.
    pub is_modify: bool,
}

impl From<&Section> for Cut {
    fn from(section: &Section) -> Self {
        Self {
            start_page: section.start_page,
            end_page: section.end_page,
            pdf_name: section.name.clone(),
            is_modify: true,
        }
    }
}

impl CommitPlan {
    #[must_use]
    /// Plan for a single document cut along `sections`.
    pub fn for_document(
        original_file_path: impl Into<String>,
        sections: &[Section],
        old_file_paths: &[String],
    ) -> Self {
        Self {
            final_paths: vec![DocumentCuts {
                original_file_path: original_file_path.into(),
                cuts: sections.iter().map(Cut::from).collect(),
                old_file_paths: old_file_paths.to_vec(),
            }],
        }
    }

    /// Pretty-printed JSON form of the plan.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation fails.
    pub fn to_json(&self) -> SplitResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the plan as JSON to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation or the file write fails.
    pub fn write_to(&self, path: &Path) -> SplitResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/commit_plan.rs"]
mod tests;
