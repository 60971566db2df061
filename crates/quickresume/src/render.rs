use std::fmt;

use clap::ValueEnum;
use handlebars::Handlebars;
use resume_form::{
    Catalog, PreviewRenderer, RenderError, ResumeSnapshot, Step, keys, step_layout,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue, json};
use tracing::debug;

const CLASSIC: &str = include_str!("../templates/classic.hbs");
const MODERN: &str = include_str!("../templates/modern.hbs");
const COMPACT: &str = include_str!("../templates/compact.hbs");
const DOCUMENT: &str = include_str!("../templates/document.md.hbs");

/// Name under which the exported document template is registered.
pub const DOCUMENT_TEMPLATE: &str = "document";

/// Preview styles, in switcher order.
#[derive(
    ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TemplateName {
    #[default]
    Classic,
    Modern,
    Compact,
}

impl TemplateName {
    pub const ALL: [TemplateName; 3] = [
        TemplateName::Classic,
        TemplateName::Modern,
        TemplateName::Compact,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateName::Classic => "classic",
            TemplateName::Modern => "modern",
            TemplateName::Compact => "compact",
        }
    }

    fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|name| *name == self)
            .unwrap_or_default()
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

impl fmt::Display for TemplateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registered résumé templates plus the localized labels they print.
#[derive(Debug)]
pub struct Templates {
    registry: Handlebars<'static>,
    labels: JsonValue,
    titles: JsonValue,
}

impl Templates {
    pub fn new(catalog: &Catalog) -> Result<Self, RenderError> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        for (name, source) in [
            (TemplateName::Classic.as_str(), CLASSIC),
            (TemplateName::Modern.as_str(), MODERN),
            (TemplateName::Compact.as_str(), COMPACT),
            (DOCUMENT_TEMPLATE, DOCUMENT),
        ] {
            registry
                .register_template_string(name, source)
                .map_err(|err| RenderError::Failed(format!("template {name}: {err}")))?;
        }

        let mut labels = JsonMap::new();
        let mut titles = JsonMap::new();
        for step in [Step::PersonalInfo, Step::Education, Step::Experience] {
            titles.insert(step.id().to_string(), json!(catalog.tr(step.title_key())));
            for input in step_layout(step, catalog).inputs() {
                labels.insert(input.id.clone(), json!(input.display_label()));
            }
        }

        Ok(Self {
            registry,
            labels: JsonValue::Object(labels),
            titles: JsonValue::Object(titles),
        })
    }

    fn context(&self, snapshot: &ResumeSnapshot) -> JsonValue {
        let mut data = JsonMap::new();
        for (key, value) in snapshot.data.iter() {
            let value = value.trim();
            if !value.is_empty() {
                data.insert(key.to_string(), json!(value));
            }
        }
        let has_any = |fields: &[&str]| fields.iter().any(|key| data.contains_key(*key));
        let has_education = has_any(&[keys::SCHOOL, keys::DEGREE, keys::GRADUATION_YEAR]);
        let has_experience = has_any(&[
            keys::COMPANY,
            keys::POSITION,
            keys::WORK_PERIOD,
            keys::DESCRIPTION,
        ]);
        json!({
            "full_name": snapshot.full_name(),
            "accent_color": snapshot.accent_color,
            "has_profile_image": snapshot.profile_image.is_some(),
            "has_education": has_education,
            "has_experience": has_experience,
            "data": data,
            "labels": self.labels,
            "titles": self.titles,
        })
    }

    pub fn render(&self, name: &str, snapshot: &ResumeSnapshot) -> Result<String, RenderError> {
        if !self.registry.has_template(name) {
            return Err(RenderError::UnknownTemplate(name.to_string()));
        }
        let rendered = self
            .registry
            .render(name, &self.context(snapshot))
            .map_err(|err| RenderError::Failed(err.to_string()))?;
        debug!(template = name, bytes = rendered.len(), "resume rendered");
        Ok(rendered)
    }
}

/// Terminal preview in one of the switchable styles.
#[derive(Debug)]
pub struct TemplatePreview {
    templates: Templates,
    template: TemplateName,
}

impl TemplatePreview {
    pub fn new(catalog: &Catalog, template: TemplateName) -> Result<Self, RenderError> {
        Ok(Self {
            templates: Templates::new(catalog)?,
            template,
        })
    }

    pub fn template(&self) -> TemplateName {
        self.template
    }

    pub fn set_template(&mut self, template: TemplateName) {
        self.template = template;
    }

    pub fn next_template(&mut self) -> TemplateName {
        self.template = self.template.next();
        self.template
    }

    pub fn previous_template(&mut self) -> TemplateName {
        self.template = self.template.previous();
        self.template
    }

    /// Switcher caption, e.g. `Template 2/3 (modern)`.
    pub fn indicator(&self, catalog: &Catalog) -> String {
        catalog.trf(
            "cli.preview.indicator",
            &[
                ("index", &(self.template.index() + 1).to_string()),
                ("count", &TemplateName::ALL.len().to_string()),
                ("name", self.template.as_str()),
            ],
        )
    }
}

impl PreviewRenderer for TemplatePreview {
    fn render(&self, snapshot: &ResumeSnapshot) -> Result<String, RenderError> {
        self.templates.render(self.template.as_str(), snapshot)
    }
}
