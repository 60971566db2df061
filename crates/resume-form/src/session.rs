use tracing::{debug, error};

use crate::data::ResumeData;
use crate::i18n::Catalog;
use crate::layout::{FormLayout, InputKind};
use crate::rules::rule_for;
use crate::validate::{FieldRule, Validation, Validator};

/// Inline error area next to the active form.
pub trait ErrorDisplay {
    fn show(&mut self, message: &str);
    fn hide(&mut self);
}

/// Modal-style channel used when no inline display is bound.
pub trait AlertChannel {
    fn alert(&mut self, message: &str);
}

/// Alert channel that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAlert;

impl AlertChannel for LogAlert {
    fn alert(&mut self, message: &str) {
        error!(message, "form error");
    }
}

pub type SubmitCallback<'a> = Box<dyn FnMut(&ResumeData) + 'a>;

/// A registered field: its backing input, current value and rule.
#[derive(Debug, Clone)]
pub struct FieldState {
    name: String,
    label: String,
    kind: InputKind,
    value: String,
    rule: FieldRule,
}

impl FieldState {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> InputKind {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn rule(&self) -> &FieldRule {
        &self.rule
    }
}

/// Fields of one rendered step bound to their validators.
///
/// A session lives exactly as long as its step is on screen; the next step
/// gets a fresh session, so nothing registered here outlives it.
pub struct FormSession<'a> {
    layout: &'a FormLayout,
    validator: Validator<'a>,
    fields: Vec<FieldState>,
    error_display: Option<Box<dyn ErrorDisplay + 'a>>,
    alert: Box<dyn AlertChannel + 'a>,
    on_submit: Option<SubmitCallback<'a>>,
    last_error: Option<String>,
}

impl<'a> FormSession<'a> {
    pub fn new(layout: &'a FormLayout, catalog: &'a Catalog) -> Self {
        Self {
            layout,
            validator: Validator::new(catalog),
            fields: Vec::new(),
            error_display: None,
            alert: Box::new(LogAlert),
            on_submit: None,
            last_error: None,
        }
    }

    pub fn layout(&self) -> &FormLayout {
        self.layout
    }

    pub fn set_error_display(&mut self, display: impl ErrorDisplay + 'a) {
        self.error_display = Some(Box::new(display));
    }

    pub fn set_alert_channel(&mut self, alert: impl AlertChannel + 'a) {
        self.alert = Box::new(alert);
    }

    pub fn on_submit(&mut self, callback: impl FnMut(&ResumeData) + 'a) {
        self.on_submit = Some(Box::new(callback));
    }

    /// Registers `name` with `rule`. Returns false when the layout has no such
    /// input; the field is then simply not part of the session.
    pub fn add_field(&mut self, name: &str, rule: FieldRule) -> bool {
        let Some(input) = self.layout.input(name) else {
            debug!(field = name, form = %self.layout.id, "no input for field, skipping");
            return false;
        };
        if let Some(existing) = self.fields.iter_mut().find(|field| field.name == name) {
            existing.rule = rule;
            return true;
        }
        self.fields.push(FieldState {
            name: name.to_string(),
            label: input.display_label(),
            kind: input.kind,
            value: String::new(),
            rule,
        });
        true
    }

    /// Registers every non-file input of the layout with its résumé rule.
    pub fn register_layout_fields(&mut self) -> usize {
        let catalog = self.validator.catalog();
        let layout = self.layout;
        layout
            .inputs()
            .iter()
            .filter(|input| input.kind != InputKind::File)
            .filter(|input| self.add_field(&input.id, rule_for(input, catalog)))
            .count()
    }

    pub fn field(&self, name: &str) -> Option<&FieldState> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.field(name).map(FieldState::value)
    }

    /// Sets a field's value without validating. False for unknown fields.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.fields.iter_mut().find(|field| field.name == name) {
            Some(field) => {
                field.value = value.into();
                true
            }
            None => false,
        }
    }

    /// Change event: store the value and, for live fields, validate it alone.
    pub fn input(&mut self, name: &str, value: impl Into<String>) {
        if !self.set_value(name, value) {
            return;
        }
        if self.field(name).is_some_and(|field| field.rule.live_validate) {
            self.validate_field(name);
        }
    }

    /// Focus-loss event: validate once the user has typed something.
    ///
    /// Returns false only when a filled-in value failed its rule.
    pub fn blur(&mut self, name: &str) -> bool {
        if self
            .field(name)
            .is_some_and(|field| !field.value.trim().is_empty())
        {
            return self.validate_field(name);
        }
        true
    }

    /// Validates one field and publishes its error. Unknown fields are valid.
    pub fn validate_field(&mut self, name: &str) -> bool {
        match self.fields.iter().position(|field| field.name == name) {
            Some(idx) => self.validate_index(idx),
            None => true,
        }
    }

    /// Validates in registration order and stops at the first failure.
    pub fn validate_all(&mut self) -> bool {
        for idx in 0..self.fields.len() {
            if !self.validate_index(idx) {
                return false;
            }
        }
        self.hide_error();
        true
    }

    fn validate_index(&mut self, idx: usize) -> bool {
        let field = &self.fields[idx];
        match self.validator.validate(&field.value, &field.rule, &field.label) {
            Validation::Valid => true,
            Validation::Invalid(message) => {
                debug!(field = %field.name, %message, "field failed validation");
                self.show_error(message);
                false
            }
        }
    }

    fn show_error(&mut self, message: String) {
        match self.error_display.as_mut() {
            Some(display) => display.show(&message),
            None => self.alert.alert(&message),
        }
        self.last_error = Some(message);
    }

    fn hide_error(&mut self) {
        if let Some(display) = self.error_display.as_mut() {
            display.hide();
        }
        self.last_error = None;
    }

    /// Most recent message published by this session, if still shown.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// One entry per registered field; untouched fields are empty strings.
    pub fn collect_data(&self) -> ResumeData {
        self.fields
            .iter()
            .map(|field| (field.name.clone(), field.value.clone()))
            .collect()
    }

    /// Copies matching values into registered fields. File inputs are skipped.
    pub fn fill_with_data(&mut self, data: &ResumeData) {
        for field in &mut self.fields {
            if field.kind == InputKind::File {
                continue;
            }
            if let Some(value) = data.get(&field.name) {
                field.value = value.to_string();
            }
        }
    }

    /// Validated data, or `None` with the first error published.
    pub fn try_submit(&mut self) -> Option<ResumeData> {
        self.validate_all().then(|| self.collect_data())
    }

    /// Validates everything and hands the data to the submit callback.
    pub fn submit(&mut self) -> bool {
        let Some(data) = self.try_submit() else {
            return false;
        };
        if let Some(callback) = self.on_submit.as_mut() {
            callback(&data);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::layout::InputSpec;

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<String>>>);

    impl ErrorDisplay for Recorder {
        fn show(&mut self, message: &str) {
            self.0.borrow_mut().push(message.to_string());
        }

        fn hide(&mut self) {
            self.0.borrow_mut().push("<hidden>".to_string());
        }
    }

    impl AlertChannel for Recorder {
        fn alert(&mut self, message: &str) {
            self.0.borrow_mut().push(format!("alert: {message}"));
        }
    }

    fn layout() -> FormLayout {
        FormLayout::new("userForm")
            .with_input(InputSpec::new("firstName", "First name:", InputKind::Text))
            .with_input(InputSpec::new("lastName", "Last name:", InputKind::Text))
            .with_input(InputSpec::new("imageUpload", "Picture", InputKind::File).optional())
    }

    #[test]
    fn missing_input_is_not_registered() {
        let layout = layout();
        let catalog = Catalog::english();
        let mut session = FormSession::new(&layout, &catalog);
        assert!(!session.add_field("nope", FieldRule::required()));
        assert_eq!(session.field_names().count(), 0);
        assert!(session.validate_field("nope"));
    }

    #[test]
    fn falls_back_to_alert_without_display() {
        let layout = layout();
        let catalog = Catalog::english();
        let recorder = Recorder::default();
        let mut session = FormSession::new(&layout, &catalog);
        session.set_alert_channel(recorder.clone());
        session.add_field("firstName", FieldRule::required());
        assert!(!session.validate_field("firstName"));
        assert_eq!(
            recorder.0.borrow().as_slice(),
            ["alert: First name is required"]
        );
    }

    #[test]
    fn blur_skips_empty_fields() {
        let layout = layout();
        let catalog = Catalog::english();
        let recorder = Recorder::default();
        let mut session = FormSession::new(&layout, &catalog);
        session.set_error_display(recorder.clone());
        let digits = regex::Regex::new("^[0-9]+$").unwrap();
        session.add_field("firstName", FieldRule::required().with_pattern(digits));
        assert!(session.blur("firstName"));
        assert!(recorder.0.borrow().is_empty());
        session.set_value("firstName", "abc");
        assert!(!session.blur("firstName"));
        assert_eq!(recorder.0.borrow().len(), 1);
        session.set_value("firstName", "42");
        assert!(session.blur("firstName"));
    }

    #[test]
    fn live_validation_checks_only_the_changed_field() {
        let layout = layout();
        let catalog = Catalog::english();
        let recorder = Recorder::default();
        let mut session = FormSession::new(&layout, &catalog);
        session.set_error_display(recorder.clone());
        session.add_field("firstName", FieldRule::required().live());
        session.add_field("lastName", FieldRule::required());
        session.input("firstName", " ");
        session.input("lastName", "");
        assert_eq!(
            recorder.0.borrow().as_slice(),
            ["First name is required"]
        );
    }

    #[test]
    fn re_registering_replaces_rule_in_place() {
        let layout = layout();
        let catalog = Catalog::english();
        let mut session = FormSession::new(&layout, &catalog);
        session.add_field("firstName", FieldRule::required());
        session.add_field("lastName", FieldRule::required());
        session.add_field("firstName", FieldRule::optional());
        assert_eq!(
            session.field_names().collect::<Vec<_>>(),
            ["firstName", "lastName"]
        );
        assert!(!session.field("firstName").unwrap().rule().required);
    }

    #[test]
    fn register_layout_fields_skips_file_inputs() {
        let layout = layout();
        let catalog = Catalog::english();
        let mut session = FormSession::new(&layout, &catalog);
        assert_eq!(session.register_layout_fields(), 2);
        assert!(session.field("imageUpload").is_none());
    }
}
