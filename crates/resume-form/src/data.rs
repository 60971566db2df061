use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Storage keys of the résumé fields.
pub mod keys {
    pub const FIRST_NAME: &str = "firstName";
    pub const LAST_NAME: &str = "lastName";
    pub const PHONE: &str = "phone";
    pub const MAIL: &str = "mail";
    pub const SCHOOL: &str = "school";
    pub const DEGREE: &str = "degree";
    pub const GRADUATION_YEAR: &str = "graduationYear";
    pub const COMPANY: &str = "company";
    pub const POSITION: &str = "position";
    pub const WORK_PERIOD: &str = "workPeriod";
    pub const DESCRIPTION: &str = "description";
    pub const PROFILE_IMAGE: &str = "profileImage";
    pub const IMAGE_UPLOAD: &str = "imageUpload";
}

/// Field key to string value. Missing keys are absent, not empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResumeData(BTreeMap<String, String>);

impl ResumeData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Shallow union; values from `other` win on conflicts.
    pub fn merge(&mut self, other: &ResumeData) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    pub fn merged(mut self, other: &ResumeData) -> Self {
        self.merge(other);
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ResumeData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl From<BTreeMap<String, String>> for ResumeData {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

/// Read-only view handed to preview and export collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResumeSnapshot {
    pub data: ResumeData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    pub accent_color: String,
}

impl ResumeSnapshot {
    /// Value of a field, or the empty string when absent.
    pub fn field(&self, key: &str) -> &str {
        self.data.get(key).unwrap_or_default()
    }

    pub fn full_name(&self) -> String {
        let first = self.field(keys::FIRST_NAME).trim();
        let last = self.field(keys::LAST_NAME).trim();
        match (first.is_empty(), last.is_empty()) {
            (false, false) => format!("{first} {last}"),
            (false, true) => first.to_string(),
            (true, false) => last.to_string(),
            (true, true) => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_existing_keys_and_overwrites_conflicts() {
        let base: ResumeData = [("firstName", "Ana"), ("mail", "old@example.com")]
            .into_iter()
            .collect();
        let update: ResumeData = [("mail", "new@example.com"), ("school", "TU")]
            .into_iter()
            .collect();
        let merged = base.merged(&update);
        assert_eq!(merged.get("firstName"), Some("Ana"));
        assert_eq!(merged.get("mail"), Some("new@example.com"));
        assert_eq!(merged.get("school"), Some("TU"));
    }

    #[test]
    fn serializes_as_plain_object() {
        let data: ResumeData = [("a", "1")].into_iter().collect();
        assert_eq!(serde_json::to_string(&data).unwrap(), r#"{"a":"1"}"#);
    }

    #[test]
    fn full_name_skips_missing_parts() {
        let snapshot = ResumeSnapshot {
            data: [("lastName", "Lovelace")].into_iter().collect(),
            profile_image: None,
            accent_color: "#3498db".into(),
        };
        assert_eq!(snapshot.full_name(), "Lovelace");
        assert_eq!(snapshot.field("phone"), "");
    }
}
