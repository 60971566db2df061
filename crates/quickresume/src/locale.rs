use std::collections::BTreeMap;
use std::env;
use std::ffi::OsString;
use std::sync::OnceLock;

use resume_form::{Catalog, SUPPORTED_LOCALES};
use unic_langid::LanguageIdentifier;

static SELECTED: OnceLock<Catalog> = OnceLock::new();
static EN_VALUE_TO_KEY: OnceLock<BTreeMap<String, String>> = OnceLock::new();

fn en_value_to_key() -> &'static BTreeMap<String, String> {
    EN_VALUE_TO_KEY.get_or_init(|| {
        let english = Catalog::english_ref();
        english
            .keys()
            .map(|key| (english.tr(key), key.to_string()))
            .collect()
    })
}

fn detect_env_locale() -> Option<String> {
    for key in ["LC_ALL", "LC_MESSAGES", "LANG"] {
        if let Ok(val) = env::var(key) {
            let trimmed = val.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

fn normalize_locale(raw: &str) -> Option<String> {
    let mut cleaned = raw.trim();
    if cleaned.is_empty() {
        return None;
    }
    if let Some((head, _)) = cleaned.split_once('.') {
        cleaned = head;
    }
    if let Some((head, _)) = cleaned.split_once('@') {
        cleaned = head;
    }
    let cleaned = cleaned.replace('_', "-");
    cleaned
        .parse::<LanguageIdentifier>()
        .ok()
        .map(|lid| lid.language.as_str().to_ascii_lowercase())
}

fn resolve_supported_locale(candidate: &str) -> Option<String> {
    let base = normalize_locale(candidate)?;
    SUPPORTED_LOCALES
        .iter()
        .any(|supported| *supported == base)
        .then_some(base)
}

/// `explicit`, then the environment, then the OS setting, then English.
pub fn select_locale(explicit: Option<&str>) -> String {
    if let Some(explicit) = explicit
        && let Some(found) = resolve_supported_locale(explicit)
    {
        return found;
    }
    if let Some(env_loc) = detect_env_locale()
        && let Some(found) = resolve_supported_locale(&env_loc)
    {
        return found;
    }
    if let Some(sys_loc) = sys_locale::get_locale()
        && let Some(found) = resolve_supported_locale(&sys_loc)
    {
        return found;
    }
    "en".to_string()
}

/// Fixes the process-wide catalog. Only the first call has an effect.
pub fn init(explicit: Option<&str>) -> &'static Catalog {
    SELECTED.get_or_init(|| Catalog::for_locale(&select_locale(explicit)))
}

pub fn catalog() -> &'static Catalog {
    SELECTED.get().unwrap_or_else(Catalog::english_ref)
}

pub fn tr(key: &str) -> String {
    catalog().tr(key)
}

pub fn trf(key: &str, args: &[(&str, &str)]) -> String {
    catalog().trf(key, args)
}

/// Translates an English literal, such as clap help text, through `catalog`.
pub fn tr_lit(catalog: &Catalog, english_literal: &str) -> String {
    match en_value_to_key().get(english_literal) {
        Some(key) => catalog.tr(key),
        None => english_literal.to_string(),
    }
}

/// `--locale` value from raw arguments, before clap has run.
pub fn cli_locale_from_argv(args: &[OsString]) -> Option<String> {
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        let raw = arg.to_string_lossy();
        if raw == "--locale" {
            return iter.next().map(|value| value.to_string_lossy().to_string());
        }
        if let Some(rest) = raw.strip_prefix("--locale=") {
            return Some(rest.to_string());
        }
    }
    None
}
