use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Locales with an embedded message catalog.
pub const SUPPORTED_LOCALES: &[&str] = &["en", "de"];

static EN_MESSAGES: OnceLock<BTreeMap<String, String>> = OnceLock::new();
static ENGLISH: OnceLock<Catalog> = OnceLock::new();

fn en_messages() -> &'static BTreeMap<String, String> {
    EN_MESSAGES.get_or_init(|| {
        serde_json::from_str(include_str!("../../../i18n/en.json"))
            .expect("parse embedded i18n/en.json catalog")
    })
}

fn embedded_catalog(locale: &str) -> Option<&'static str> {
    match locale {
        "de" => Some(include_str!("../../../i18n/de.json")),
        _ => None,
    }
}

/// Resolved messages for one locale, English filling any gaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    locale: String,
    messages: BTreeMap<String, String>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::english_ref().clone()
    }
}

impl Catalog {
    pub fn english() -> Self {
        Self::english_ref().clone()
    }

    /// Shared English catalog used by the context-free helpers.
    pub fn english_ref() -> &'static Catalog {
        ENGLISH.get_or_init(|| Catalog {
            locale: "en".to_string(),
            messages: en_messages().clone(),
        })
    }

    /// Catalog for `locale`; unknown locales fall back to English.
    pub fn for_locale(locale: &str) -> Self {
        let base = locale
            .split(['-', '_'])
            .next()
            .unwrap_or("en")
            .to_ascii_lowercase();
        let Some(raw) = embedded_catalog(&base) else {
            return Self::english();
        };
        let overrides = match serde_json::from_str::<BTreeMap<String, String>>(raw) {
            Ok(map) => map,
            Err(err) => {
                tracing::warn!(locale = %base, error = %err, "embedded catalog is malformed");
                return Self::english();
            }
        };
        let mut messages = en_messages().clone();
        messages.extend(overrides);
        Self {
            locale: base,
            messages,
        }
    }

    /// Adds or replaces messages, e.g. from a user-supplied catalog file.
    pub fn extend(&mut self, messages: BTreeMap<String, String>) {
        self.messages.extend(messages);
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn contains(&self, key: &str) -> bool {
        self.messages.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.messages.keys().map(String::as_str)
    }

    pub fn tr(&self, key: &str) -> String {
        self.messages
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// Looks up `key` and substitutes `{name}` placeholders.
    pub fn trf(&self, key: &str, args: &[(&str, &str)]) -> String {
        let mut output = self.tr(key);
        for (name, value) in args {
            output = output.replace(&format!("{{{name}}}"), value);
        }
        output
    }
}
