use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::i18n::Catalog;

/// Caller-supplied predicate run after the pattern check.
pub type CustomCheck = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Validation contract for one field.
#[derive(Clone, Default)]
pub struct FieldRule {
    pub required: bool,
    pub pattern: Option<Regex>,
    pub error_message: Option<String>,
    pub custom_check: Option<CustomCheck>,
    /// Validate on every change instead of only on blur and submit.
    pub live_validate: bool,
}

impl fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRule")
            .field("required", &self.required)
            .field("pattern", &self.pattern.as_ref().map(Regex::as_str))
            .field("error_message", &self.error_message)
            .field("custom_check", &self.custom_check.is_some())
            .field("live_validate", &self.live_validate)
            .finish()
    }
}

impl FieldRule {
    pub fn required() -> Self {
        Self {
            required: true,
            ..Self::default()
        }
    }

    pub fn optional() -> Self {
        Self::default()
    }

    pub fn with_pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn with_check(mut self, check: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        self.custom_check = Some(Arc::new(check));
        self
    }

    pub fn live(mut self) -> Self {
        self.live_validate = true;
        self
    }
}

/// Outcome of validating one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid,
    Invalid(String),
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Validation::Valid => None,
            Validation::Invalid(message) => Some(message),
        }
    }
}

/// Rule evaluation bound to a message catalog.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    catalog: &'a Catalog,
}

impl<'a> Validator<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Checks run in order and the first failure wins: emptiness, pattern,
    /// custom check. An empty value on an optional field is always valid.
    pub fn validate(&self, value: &str, rule: &FieldRule, label: &str) -> Validation {
        if value.trim().is_empty() {
            if rule.required {
                return Validation::Invalid(
                    self.catalog
                        .trf("validation.required", &[("label", label)]),
                );
            }
            return Validation::Valid;
        }

        if let Some(pattern) = &rule.pattern
            && !pattern.is_match(value)
        {
            return Validation::Invalid(self.message_or(rule, "validation.format", label));
        }

        if let Some(check) = &rule.custom_check
            && !check(value)
        {
            return Validation::Invalid(self.message_or(rule, "validation.invalid", label));
        }

        Validation::Valid
    }

    fn message_or(&self, rule: &FieldRule, key: &str, label: &str) -> String {
        rule.error_message
            .clone()
            .unwrap_or_else(|| self.catalog.trf(key, &[("label", label)]))
    }
}

/// Validates with the English catalog.
pub fn validate(value: &str, rule: &FieldRule, label: &str) -> Validation {
    Validator::new(Catalog::english_ref()).validate(value, rule, label)
}

pub fn is_empty(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn is_valid_email(value: &str) -> bool {
    crate::rules::email_pattern().is_match(value)
}

pub fn is_valid_phone(value: &str) -> bool {
    crate::rules::phone_pattern().is_match(value)
}

/// Years from 1900 up to ten years past `current_year`.
pub fn is_valid_year_at(value: &str, current_year: i32) -> bool {
    match value.trim().parse::<i32>() {
        Ok(year) => (1900..=current_year + 10).contains(&year),
        Err(_) => false,
    }
}

pub fn is_valid_year(value: &str) -> bool {
    is_valid_year_at(value, time::OffsetDateTime::now_utc().year())
}

pub fn has_min_length(value: &str, min_length: usize) -> bool {
    value.chars().count() >= min_length
}
