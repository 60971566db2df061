use std::path::PathBuf;

use thiserror::Error;

use crate::data::{ResumeSnapshot, keys};
use crate::navigation::NavigationError;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown template '{0}'")]
    UnknownTemplate(String),
    #[error("rendering failed: {0}")]
    Failed(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("writing the document failed: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("document written but the wizard could not advance: {0}")]
    Navigation(#[from] NavigationError),
}

/// Turns a snapshot into display text. Renderers only ever see a snapshot,
/// so they cannot touch wizard progress.
pub trait PreviewRenderer {
    fn render(&self, snapshot: &ResumeSnapshot) -> Result<String, RenderError>;
}

/// Produces the final artifact and returns where it was written.
///
/// A failing exporter must leave persisted state as it found it.
pub trait DocumentExporter {
    fn export(&self, snapshot: &ResumeSnapshot) -> Result<PathBuf, ExportError>;
}

/// `resume_<lastName>`, or `resume_document` when no usable last name exists.
pub fn export_file_stem(snapshot: &ResumeSnapshot) -> String {
    let name: String = snapshot
        .field(keys::LAST_NAME)
        .trim()
        .chars()
        .map(|ch| {
            if ch.is_alphanumeric() || ch == '-' || ch == '_' {
                ch
            } else {
                '_'
            }
        })
        .collect();
    let name = name.trim_matches('_');
    if name.is_empty() {
        "resume_document".to_string()
    } else {
        format!("resume_{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(last: &str) -> ResumeSnapshot {
        ResumeSnapshot {
            data: [("lastName", last)].into_iter().collect(),
            profile_image: None,
            accent_color: "#3498db".into(),
        }
    }

    #[test]
    fn stem_uses_last_name() {
        assert_eq!(export_file_stem(&snapshot("Müller")), "resume_Müller");
        assert_eq!(export_file_stem(&snapshot("van der Berg")), "resume_van_der_Berg");
    }

    #[test]
    fn stem_falls_back_without_name() {
        assert_eq!(export_file_stem(&snapshot("  ")), "resume_document");
        assert_eq!(export_file_stem(&snapshot("../")), "resume_document");
    }
}
