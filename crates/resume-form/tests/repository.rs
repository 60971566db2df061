use std::collections::BTreeMap;

use resume_form::{
    FORM_PROGRESS_KEY, KeyValueStore, MemoryStore, PROFILE_IMAGE_KEY, Progress, RESUME_DATA_KEY,
    ResumeData, ResumeRepository, SaveOutcome, StoreError, keys,
};

/// Rejects any value mentioning a profile image, like a browser whose quota
/// only fits the text fields.
#[derive(Default)]
struct NoRoomForImages {
    entries: BTreeMap<String, String>,
    fail_all: bool,
}

impl KeyValueStore for NoRoomForImages {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.fail_all || value.contains(keys::PROFILE_IMAGE) || value.starts_with("data:") {
            return Err(StoreError::QuotaExceeded {
                needed: value.len(),
                quota: 0,
            });
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.entries.clear();
        Ok(())
    }
}

/// Memory store whose `remove` refuses one key.
struct StuckKey {
    inner: MemoryStore,
    stuck: &'static str,
}

impl KeyValueStore for StuckKey {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if key == self.stuck {
            return Err(StoreError::Backend(format!("{key} is locked")));
        }
        self.inner.remove(key)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.inner.clear()
    }
}

fn data(pairs: &[(&str, &str)]) -> ResumeData {
    pairs.iter().copied().collect()
}

#[test]
fn saves_merge_instead_of_replacing() {
    let mut repo = ResumeRepository::new(MemoryStore::new());
    repo.save_resume_data(&data(&[("a", "1")])).expect("first save");
    repo.save_resume_data(&data(&[("b", "2")])).expect("second save");
    assert_eq!(repo.resume_data(), data(&[("a", "1"), ("b", "2")]));
}

#[test]
fn reading_twice_yields_the_same_data() {
    let mut repo = ResumeRepository::new(MemoryStore::new());
    repo.save_resume_data(&data(&[("firstName", "Ana")]))
        .expect("save");
    assert_eq!(repo.resume_data(), repo.resume_data());
}

#[test]
fn quota_failure_drops_the_image_and_retries() {
    let mut repo = ResumeRepository::new(NoRoomForImages::default());
    let outcome = repo
        .save_resume_data(&data(&[
            ("firstName", "Ana"),
            (keys::PROFILE_IMAGE, "data:image/jpeg;base64,AAAA"),
        ]))
        .expect("fallback save succeeds");

    assert_eq!(outcome, SaveOutcome::SavedWithoutImage);
    let stored = repo.resume_data();
    assert_eq!(stored.get("firstName"), Some("Ana"));
    assert!(!stored.contains_key(keys::PROFILE_IMAGE));
    assert_eq!(repo.store().get(PROFILE_IMAGE_KEY), None);
}

#[test]
fn total_failure_is_reported_not_raised() {
    let mut repo = ResumeRepository::new(NoRoomForImages {
        fail_all: true,
        ..Default::default()
    });
    let err = repo
        .save_resume_data(&data(&[("firstName", "Ana")]))
        .unwrap_err();
    assert!(err.is_quota_exceeded());
    assert_eq!(repo.store().get(RESUME_DATA_KEY), None);
}

#[test]
fn image_failure_does_not_touch_resume_data() {
    let mut repo = ResumeRepository::new(NoRoomForImages::default());
    repo.save_resume_data(&data(&[("lastName", "Lovelace")]))
        .expect("save");
    assert!(repo.save_profile_image("data:image/jpeg;base64,AAAA").is_err());
    assert_eq!(repo.resume_data().get("lastName"), Some("Lovelace"));
}

#[test]
fn snapshot_carries_defaults() {
    let repo = ResumeRepository::new(MemoryStore::new());
    let snapshot = repo.snapshot();
    assert!(snapshot.data.is_empty());
    assert_eq!(snapshot.profile_image, None);
    assert_eq!(snapshot.accent_color, "#3498db");
}

#[test]
fn clearing_continues_past_a_failed_key() {
    let mut repo = ResumeRepository::new(StuckKey {
        inner: MemoryStore::new(),
        stuck: RESUME_DATA_KEY,
    });
    repo.save_resume_data(&data(&[("firstName", "Ana")]))
        .expect("save");
    repo.save_profile_image("data:image/jpeg;base64,AAAA")
        .expect("image");
    repo.save_form_progress(Progress::Experience)
        .expect("progress");

    let err = repo.clear_all_data().unwrap_err();
    assert_eq!(err.failures.len(), 1);
    assert_eq!(err.failures[0].0, RESUME_DATA_KEY);
    assert_eq!(repo.store().get(PROFILE_IMAGE_KEY), None);
    assert_eq!(repo.store().get(FORM_PROGRESS_KEY), None);
    assert_eq!(repo.resume_data().get("firstName"), Some("Ana"));
}
