use std::collections::BTreeMap;
use std::path::Path;

fn catalog(locale: &str) -> BTreeMap<String, String> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../..")
        .join(format!("i18n/{locale}.json"));
    let raw = std::fs::read_to_string(&path).expect("read catalog");
    serde_json::from_str(&raw).expect("parse catalog")
}

#[test]
fn german_catalog_covers_every_english_key() {
    let en = catalog("en");
    let de = catalog("de");
    let missing: Vec<_> = en.keys().filter(|key| !de.contains_key(*key)).collect();
    let extra: Vec<_> = de.keys().filter(|key| !en.contains_key(*key)).collect();
    assert!(missing.is_empty(), "missing in de.json: {missing:?}");
    assert!(extra.is_empty(), "unknown in de.json: {extra:?}");
}

#[test]
fn cli_message_keys_exist() {
    let en = catalog("en");
    let required = [
        "cli.help.print_help",
        "cli.help.print_version",
        "cli.nav.step",
        "cli.nav.page",
        "cli.nav.stay",
        "cli.page.landing",
        "cli.page.input",
        "cli.page.preview",
        "cli.page.final",
        "cli.prompt.answer_yes_no",
        "cli.wizard.page.landing",
        "cli.wizard.page.final",
        "cli.wizard.needs_terminal",
        "cli.wizard.answers_invalid",
        "cli.export.incomplete",
        "cli.home.cancelled",
        "cli.reset.done",
        "cli.reset.failed",
        "nav.save_failed",
        "nav.confirm_leave",
        "image.no_file",
        "image.process_failed",
        "image.too_large",
        "export.failed",
    ];
    for key in required {
        assert!(en.contains_key(key), "missing i18n key {key}");
    }
}

#[test]
fn help_literals_are_unique() {
    let en = catalog("en");
    let mut seen = BTreeMap::new();
    for (key, value) in en.iter().filter(|(key, _)| key.starts_with("cli.help.")) {
        if let Some(previous) = seen.insert(value.clone(), key.clone()) {
            panic!("{key} and {previous} share the text {value:?}");
        }
    }
}
