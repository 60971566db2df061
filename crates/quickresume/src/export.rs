use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use resume_form::{
    Catalog, DocumentExporter, ExportError, RenderError, ResumeSnapshot, export_file_stem,
};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::render::{DOCUMENT_TEMPLATE, Templates};

/// Writes the résumé as a Markdown document into a directory.
#[derive(Debug)]
pub struct MarkdownExporter {
    templates: Templates,
    out_dir: PathBuf,
}

impl MarkdownExporter {
    pub fn new(catalog: &Catalog, out_dir: impl Into<PathBuf>) -> Result<Self, RenderError> {
        Ok(Self {
            templates: Templates::new(catalog)?,
            out_dir: out_dir.into(),
        })
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Where a snapshot would be written.
    pub fn target(&self, snapshot: &ResumeSnapshot) -> PathBuf {
        self.out_dir
            .join(format!("{}.md", export_file_stem(snapshot)))
    }
}

impl DocumentExporter for MarkdownExporter {
    fn export(&self, snapshot: &ResumeSnapshot) -> Result<PathBuf, ExportError> {
        let document = self.templates.render(DOCUMENT_TEMPLATE, snapshot)?;
        let target = self.target(snapshot);
        fs::create_dir_all(&self.out_dir)?;
        let mut tmp = NamedTempFile::new_in(&self.out_dir)?;
        tmp.write_all(document.as_bytes())?;
        tmp.persist(&target).map_err(|err| err.error)?;
        debug!(path = %target.display(), bytes = document.len(), "document written");
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_markdown_named_after_last_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        let exporter = MarkdownExporter::new(&Catalog::english(), dir.path()).expect("exporter");
        let snapshot = ResumeSnapshot {
            data: [("firstName", "Ada"), ("lastName", "Lovelace"), ("position", "Analyst")]
                .into_iter()
                .collect(),
            profile_image: Some("data:image/jpeg;base64,AAAA".into()),
            accent_color: "#2ecc71".into(),
        };

        let path = exporter.export(&snapshot).expect("export");
        assert_eq!(path, dir.path().join("resume_Lovelace.md"));
        let written = fs::read_to_string(&path).expect("read");
        assert!(written.contains("# Ada Lovelace"));
        assert!(written.contains("accent_color: \"#2ecc71\""));
        assert!(written.contains("profile_picture: true"));
        assert!(written.contains("**Position:** Analyst"));
    }
}
