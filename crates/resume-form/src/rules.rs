use std::sync::OnceLock;

use regex::Regex;

use crate::data::keys;
use crate::i18n::Catalog;
use crate::layout::InputSpec;
use crate::validate::{FieldRule, is_valid_year};

static EMAIL: OnceLock<Regex> = OnceLock::new();
static PHONE: OnceLock<Regex> = OnceLock::new();
static YEAR: OnceLock<Regex> = OnceLock::new();

pub(crate) fn email_pattern() -> &'static Regex {
    EMAIL.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern")
    })
}

pub(crate) fn phone_pattern() -> &'static Regex {
    PHONE.get_or_init(|| Regex::new(r"^[0-9]{6,}$").expect("phone pattern"))
}

pub(crate) fn year_pattern() -> &'static Regex {
    YEAR.get_or_init(|| Regex::new(r"^(19|20)\d{2}$").expect("year pattern"))
}

pub fn email(catalog: &Catalog) -> FieldRule {
    FieldRule::required()
        .with_pattern(email_pattern().clone())
        .with_error_message(catalog.tr("validation.email"))
        .live()
}

/// Digits only, at least six.
pub fn phone(catalog: &Catalog) -> FieldRule {
    FieldRule::required()
        .with_pattern(phone_pattern().clone())
        .with_error_message(catalog.tr("validation.phone"))
        .live()
}

/// Four-digit year from 1900 up to ten years ahead. Years are optional.
pub fn year(catalog: &Catalog) -> FieldRule {
    FieldRule::optional()
        .with_pattern(year_pattern().clone())
        .with_check(is_valid_year)
        .with_error_message(catalog.tr("validation.year"))
        .live()
}

/// Rule for a résumé input, resolved when the field is registered.
///
/// Optionality comes from the input declaration. Wizard fields validate on
/// blur and submit only, so a half-typed address does not flash an error.
pub fn rule_for(input: &InputSpec, catalog: &Catalog) -> FieldRule {
    let mut rule = match input.id.as_str() {
        keys::PHONE => phone(catalog),
        keys::MAIL => email(catalog),
        keys::GRADUATION_YEAR => year(catalog),
        _ => FieldRule::default(),
    };
    rule.required = !input.is_optional();
    rule.live_validate = false;
    rule
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{InputKind, step_layout};
    use crate::progress::Step;
    use crate::validate::validate;

    #[test]
    fn phone_rule_requires_six_digits() {
        let rule = phone(&Catalog::english());
        assert!(validate("123456", &rule, "Phone").is_valid());
        assert_eq!(
            validate("12-34", &rule, "Phone").message(),
            Some("Please enter a valid phone number (digits only, at least 6).")
        );
    }

    #[test]
    fn year_rule_is_optional() {
        let rule = year(&Catalog::english());
        assert!(!rule.required);
        assert!(validate("", &rule, "Year").is_valid());
        assert!(!validate("1850", &rule, "Year").is_valid());
    }

    #[test]
    fn year_rule_rejects_far_future_years() {
        let rule = year(&Catalog::english());
        assert!(validate("2015", &rule, "Year").is_valid());
        assert_eq!(
            validate("2099", &rule, "Year").message(),
            Some("Please enter a valid year (e.g. 2020).")
        );
    }

    #[test]
    fn rule_for_resolves_optionality_from_declaration() {
        let catalog = Catalog::english();
        let layout = step_layout(Step::Education, &catalog);
        let rule = rule_for(layout.input(keys::GRADUATION_YEAR).unwrap(), &catalog);
        assert!(!rule.required);
        assert!(rule.pattern.is_some());
        assert!(!rule.live_validate);

        let personal = step_layout(Step::PersonalInfo, &catalog);
        let mail = rule_for(personal.input(keys::MAIL).unwrap(), &catalog);
        assert!(mail.required);
    }

    #[test]
    fn rule_for_honours_optional_label() {
        let catalog = Catalog::english();
        let input = InputSpec::new("phone", "Phone (optional)", InputKind::Tel);
        assert!(!rule_for(&input, &catalog).required);
    }
}
