use serde::{Deserialize, Serialize};

use crate::data::keys;
use crate::i18n::Catalog;
use crate::progress::Step;

/// Kind of the input control backing a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Text,
    Email,
    Tel,
    TextArea,
    /// File selection; never populated programmatically.
    File,
}

/// One rendered input of a step form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSpec {
    pub id: String,
    pub label: String,
    pub kind: InputKind,
    #[serde(default)]
    pub optional: bool,
}

impl InputSpec {
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: InputKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            optional: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Declared optional, or labelled as such.
    pub fn is_optional(&self) -> bool {
        self.optional || label_marks_optional(&self.label)
    }

    /// Label text used in messages: colons removed, trimmed, id as fallback.
    pub fn display_label(&self) -> String {
        let cleaned = self.label.replace(':', "");
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            self.id.clone()
        } else {
            cleaned.to_string()
        }
    }
}

/// Case-insensitive "optional" marker in label text.
pub fn label_marks_optional(label: &str) -> bool {
    label.to_lowercase().contains("optional")
}

/// The inputs a rendered step offers, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormLayout {
    pub id: String,
    inputs: Vec<InputSpec>,
}

impl FormLayout {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            inputs: Vec::new(),
        }
    }

    pub fn with_input(mut self, input: InputSpec) -> Self {
        self.inputs.push(input);
        self
    }

    pub fn input(&self, id: &str) -> Option<&InputSpec> {
        self.inputs.iter().find(|input| input.id == id)
    }

    pub fn inputs(&self) -> &[InputSpec] {
        &self.inputs
    }
}

fn field(catalog: &Catalog, id: &str, kind: InputKind) -> InputSpec {
    InputSpec::new(id, catalog.tr(&format!("field.{id}.label")), kind)
}

/// Layout of a wizard step with labels from `catalog`.
///
/// Every education and experience field is optional.
pub fn step_layout(step: Step, catalog: &Catalog) -> FormLayout {
    let layout = FormLayout::new(step.id());
    match step {
        Step::PersonalInfo => layout
            .with_input(field(catalog, keys::IMAGE_UPLOAD, InputKind::File).optional())
            .with_input(field(catalog, keys::FIRST_NAME, InputKind::Text))
            .with_input(field(catalog, keys::LAST_NAME, InputKind::Text))
            .with_input(field(catalog, keys::PHONE, InputKind::Tel))
            .with_input(field(catalog, keys::MAIL, InputKind::Email)),
        Step::Education => layout
            .with_input(field(catalog, keys::SCHOOL, InputKind::Text).optional())
            .with_input(field(catalog, keys::DEGREE, InputKind::Text).optional())
            .with_input(field(catalog, keys::GRADUATION_YEAR, InputKind::Text).optional()),
        Step::Experience => layout
            .with_input(field(catalog, keys::COMPANY, InputKind::Text).optional())
            .with_input(field(catalog, keys::POSITION, InputKind::Text).optional())
            .with_input(field(catalog, keys::WORK_PERIOD, InputKind::Text).optional())
            .with_input(field(catalog, keys::DESCRIPTION, InputKind::TextArea).optional()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_marker_is_case_insensitive() {
        assert!(label_marks_optional("Profile picture (Optional)"));
        assert!(!label_marks_optional("First name:"));
    }

    #[test]
    fn display_label_strips_colon() {
        let input = InputSpec::new("mail", "Email:", InputKind::Email);
        assert_eq!(input.display_label(), "Email");
        let bare = InputSpec::new("mail", " : ", InputKind::Email);
        assert_eq!(bare.display_label(), "mail");
    }

    #[test]
    fn personal_step_has_required_text_fields_and_optional_upload() {
        let layout = step_layout(Step::PersonalInfo, &Catalog::english());
        assert!(layout.input(keys::IMAGE_UPLOAD).unwrap().is_optional());
        assert!(!layout.input(keys::FIRST_NAME).unwrap().is_optional());
        assert_eq!(layout.inputs().len(), 5);
    }

    #[test]
    fn education_and_experience_fields_are_optional() {
        let catalog = Catalog::english();
        for step in [Step::Education, Step::Experience] {
            let layout = step_layout(step, &catalog);
            assert!(layout.inputs().iter().all(InputSpec::is_optional));
        }
    }
}
