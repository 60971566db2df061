use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::data::{ResumeData, ResumeSnapshot, keys};
use crate::progress::Progress;
use crate::store::{KeyValueStore, StoreError};

pub const RESUME_DATA_KEY: &str = "resumeData";
pub const PROFILE_IMAGE_KEY: &str = "profileImage";
pub const FORM_PROGRESS_KEY: &str = "formProgress";
pub const ACCENT_COLOR_KEY: &str = "accentColor";

pub const DEFAULT_ACCENT_COLOR: &str = "#3498db";

static HEX_COLOR: OnceLock<Regex> = OnceLock::new();

fn hex_color() -> &'static Regex {
    HEX_COLOR.get_or_init(|| {
        Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("hex color pattern")
    })
}

/// Successful outcomes of [`ResumeRepository::save_resume_data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// Storage was full; the profile image was dropped and the rest saved.
    SavedWithoutImage,
}

/// Keys that could not be removed by [`ResumeRepository::clear_all_data`].
#[derive(Debug, Error)]
#[error("failed to clear {} storage key(s)", .failures.len())]
pub struct ClearError {
    pub failures: Vec<(&'static str, StoreError)>,
}

#[derive(Debug, Error)]
pub enum AccentColorError {
    #[error("'{0}' is not a hex color")]
    Invalid(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Résumé-specific access to a [`KeyValueStore`].
#[derive(Debug)]
pub struct ResumeRepository<S> {
    store: S,
}

impl<S: KeyValueStore> ResumeRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Persisted résumé data; unreadable records are treated as empty.
    pub fn resume_data(&self) -> ResumeData {
        let Some(raw) = self.store.get(RESUME_DATA_KEY) else {
            return ResumeData::default();
        };
        match serde_json::from_str(&raw) {
            Ok(data) => data,
            Err(err) => {
                warn!(error = %err, "stored resume data is unreadable, treating it as empty");
                ResumeData::default()
            }
        }
    }

    /// Merges `partial` over the stored data and writes the result in one step.
    ///
    /// When storage is full the profile image is removed from storage and from
    /// the merged document, and the write is retried once.
    pub fn save_resume_data(&mut self, partial: &ResumeData) -> Result<SaveOutcome, StoreError> {
        let merged = self.resume_data().merged(partial);
        match self.write_resume_data(&merged) {
            Ok(()) => {
                debug!(fields = merged.len(), "resume data saved");
                Ok(SaveOutcome::Saved)
            }
            Err(err) if err.is_quota_exceeded() => self.save_without_image(merged, err),
            Err(err) => {
                error!(error = %err, "saving resume data failed");
                Err(err)
            }
        }
    }

    fn save_without_image(
        &mut self,
        mut merged: ResumeData,
        cause: StoreError,
    ) -> Result<SaveOutcome, StoreError> {
        warn!(error = %cause, "storage full, retrying without the profile image");
        if let Err(err) = self.remove_profile_image() {
            warn!(error = %err, "could not drop stored profile image");
        }
        merged.remove(keys::PROFILE_IMAGE);
        match self.write_resume_data(&merged) {
            Ok(()) => Ok(SaveOutcome::SavedWithoutImage),
            Err(err) => {
                error!(error = %err, "saving resume data without the profile image failed");
                Err(err)
            }
        }
    }

    fn write_resume_data(&mut self, data: &ResumeData) -> Result<(), StoreError> {
        let payload = serde_json::to_string(data)?;
        self.store.set(RESUME_DATA_KEY, &payload)
    }

    pub fn profile_image(&self) -> Option<String> {
        self.store.get(PROFILE_IMAGE_KEY)
    }

    pub fn save_profile_image(&mut self, data_url: &str) -> Result<(), StoreError> {
        self.store
            .set(PROFILE_IMAGE_KEY, data_url)
            .inspect_err(|err| error!(error = %err, "saving profile image failed"))
    }

    pub fn remove_profile_image(&mut self) -> Result<(), StoreError> {
        self.store.remove(PROFILE_IMAGE_KEY)
    }

    /// Stored progress, or the first checkpoint when absent or unrecognised.
    pub fn form_progress(&self) -> Progress {
        let Some(raw) = self.store.get(FORM_PROGRESS_KEY) else {
            return Progress::default();
        };
        raw.parse::<Progress>().unwrap_or_else(|err| {
            warn!(error = %err, "stored form progress is invalid, starting over");
            Progress::default()
        })
    }

    pub fn save_form_progress(&mut self, progress: Progress) -> Result<(), StoreError> {
        self.store.set(FORM_PROGRESS_KEY, &progress.to_string())
    }

    pub fn accent_color(&self) -> String {
        self.store
            .get(ACCENT_COLOR_KEY)
            .filter(|color| hex_color().is_match(color))
            .unwrap_or_else(|| DEFAULT_ACCENT_COLOR.to_string())
    }

    pub fn save_accent_color(&mut self, color: &str) -> Result<(), AccentColorError> {
        let color = color.trim();
        if !hex_color().is_match(color) {
            return Err(AccentColorError::Invalid(color.to_string()));
        }
        self.store.set(ACCENT_COLOR_KEY, color)?;
        Ok(())
    }

    /// Forgets the chosen color and returns the default.
    pub fn reset_accent_color(&mut self) -> Result<&'static str, StoreError> {
        self.store.remove(ACCENT_COLOR_KEY)?;
        Ok(DEFAULT_ACCENT_COLOR)
    }

    /// Removes résumé data, profile image and progress. Each key is removed on
    /// its own, so one failure does not keep the others.
    pub fn clear_all_data(&mut self) -> Result<(), ClearError> {
        let mut failures = Vec::new();
        for key in [RESUME_DATA_KEY, PROFILE_IMAGE_KEY, FORM_PROGRESS_KEY] {
            if let Err(err) = self.store.remove(key) {
                warn!(key, error = %err, "could not remove storage key");
                failures.push((key, err));
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(ClearError { failures })
        }
    }

    pub fn snapshot(&self) -> ResumeSnapshot {
        ResumeSnapshot {
            data: self.resume_data(),
            profile_image: self.profile_image(),
            accent_color: self.accent_color(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn repo() -> ResumeRepository<MemoryStore> {
        ResumeRepository::new(MemoryStore::new())
    }

    #[test]
    fn corrupt_record_reads_as_empty() {
        let mut repo = repo();
        repo.store_mut().set(RESUME_DATA_KEY, "{not json").unwrap();
        assert!(repo.resume_data().is_empty());
    }

    #[test]
    fn progress_defaults_and_rejects_garbage() {
        let mut repo = repo();
        assert_eq!(repo.form_progress(), Progress::PersonalInfo);
        repo.store_mut().set(FORM_PROGRESS_KEY, "60").unwrap();
        assert_eq!(repo.form_progress(), Progress::PersonalInfo);
        repo.save_form_progress(Progress::Experience).unwrap();
        assert_eq!(repo.store().get(FORM_PROGRESS_KEY).as_deref(), Some("75"));
        assert_eq!(repo.form_progress(), Progress::Experience);
    }

    #[test]
    fn accent_color_round_trip_and_reset() {
        let mut repo = repo();
        assert_eq!(repo.accent_color(), DEFAULT_ACCENT_COLOR);
        repo.save_accent_color("#e74c3c").unwrap();
        assert_eq!(repo.accent_color(), "#e74c3c");
        assert!(matches!(
            repo.save_accent_color("red"),
            Err(AccentColorError::Invalid(_))
        ));
        assert_eq!(repo.reset_accent_color().unwrap(), DEFAULT_ACCENT_COLOR);
        assert_eq!(repo.store().get(ACCENT_COLOR_KEY), None);
    }

    #[test]
    fn clear_keeps_accent_color() {
        let mut repo = repo();
        repo.save_resume_data(&[("firstName", "Ana")].into_iter().collect())
            .unwrap();
        repo.save_profile_image("data:image/jpeg;base64,AAAA").unwrap();
        repo.save_form_progress(Progress::Education).unwrap();
        repo.save_accent_color("#000").unwrap();
        repo.clear_all_data().unwrap();
        assert!(repo.resume_data().is_empty());
        assert_eq!(repo.profile_image(), None);
        assert_eq!(repo.form_progress(), Progress::PersonalInfo);
        assert_eq!(repo.accent_color(), "#000");
    }
}
