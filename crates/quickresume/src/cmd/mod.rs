pub mod color;
pub mod export;
pub mod image;
pub mod navigate;
pub mod preview;
pub mod reset;
pub mod status;
pub mod wizard;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use resume_form::{
    Catalog, NavigationController, NavigationError, Page, ResumeRepository, Transition,
};

use crate::config::Config;
use crate::locale::tr;
use crate::render::{TemplateName, TemplatePreview};
use crate::storage::FileStore;

/// Everything a command needs: settings, storage location and messages.
#[derive(Debug)]
pub struct App {
    config: Config,
    storage_path: PathBuf,
    catalog: &'static Catalog,
}

impl App {
    pub fn new(config: Config, storage_override: Option<&Path>, catalog: &'static Catalog) -> Self {
        let storage_path = config.storage_path(storage_override);
        Self {
            config,
            storage_path,
            catalog,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &'static Catalog {
        self.catalog
    }

    pub fn storage_path(&self) -> &Path {
        &self.storage_path
    }

    /// A quota of zero disables the limit.
    pub fn repository(&self) -> Result<ResumeRepository<FileStore>> {
        let quota = Some(self.config.storage.quota_bytes).filter(|quota| *quota > 0);
        let store = FileStore::open(&self.storage_path, quota).with_context(|| {
            format!("failed to open storage {}", self.storage_path.display())
        })?;
        Ok(ResumeRepository::new(store))
    }

    pub fn controller(&self, page: Page) -> Result<NavigationController<FileStore>> {
        Ok(NavigationController::new(self.repository()?, page))
    }

    pub fn preview(&self, template: Option<TemplateName>) -> Result<TemplatePreview> {
        let template = template.unwrap_or(self.config.preview.template);
        TemplatePreview::new(self.catalog, template).context("failed to load résumé templates")
    }
}

/// The user-facing message for a navigation failure, with the cause kept.
pub(crate) fn navigation_failed(err: NavigationError) -> anyhow::Error {
    let message = tr(err.message_key());
    anyhow::Error::new(err).context(message)
}

pub(crate) fn page_name(page: Page, catalog: &Catalog) -> String {
    catalog.tr(&format!("cli.page.{}", page.as_str()))
}

/// One line telling the user where a transition led.
pub(crate) fn describe(transition: Transition, catalog: &Catalog) -> String {
    match transition {
        Transition::Render(step) => {
            let percent = step.progress().value().to_string();
            catalog.trf(
                "cli.nav.step",
                &[("step", &catalog.tr(step.title_key())), ("percent", &percent)],
            )
        }
        Transition::Navigate(page) => {
            catalog.trf("cli.nav.page", &[("page", &page_name(page, catalog))])
        }
        Transition::ConfirmLeave => catalog.tr("nav.confirm_leave"),
        Transition::Stay => catalog.tr("cli.nav.stay"),
    }
}

pub(crate) fn prompt_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    let read = io::stdin().read_line(&mut line)?;
    if read == 0 {
        bail!("stdin closed");
    }
    Ok(line.trim().to_string())
}

pub(crate) fn prompt_yes_no(prompt: String, default_yes: bool) -> Result<bool> {
    let suffix = if default_yes { "[Y/n]" } else { "[y/N]" };
    loop {
        let token = prompt_line(&format!("{prompt} {suffix}: "))?.to_ascii_lowercase();
        if token.is_empty() {
            return Ok(default_yes);
        }
        match token.as_str() {
            "y" | "yes" | "j" | "ja" => return Ok(true),
            "n" | "no" | "nein" => return Ok(false),
            _ => println!("{}", tr("cli.prompt.answer_yes_no")),
        }
    }
}

#[cfg(test)]
mod tests {
    use resume_form::Step;

    use super::*;

    #[test]
    fn describes_every_transition() {
        let english = Catalog::english();
        assert_eq!(
            describe(Transition::Render(Step::Education), &english),
            "Now at Education (50%)."
        );
        assert_eq!(
            describe(Transition::Navigate(Page::Preview), &english),
            "Now on the preview."
        );
        assert_eq!(
            describe(Transition::ConfirmLeave, &english),
            english.tr("nav.confirm_leave")
        );
    }

    #[test]
    fn zero_quota_means_unlimited() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = Config::default();
        config.storage.quota_bytes = 0;
        let app = App::new(
            config,
            Some(&dir.path().join("storage.json")),
            Catalog::english_ref(),
        );
        let mut repository = app.repository().expect("repository");
        repository
            .save_profile_image(&"x".repeat(64 * 1024))
            .expect("no quota");
    }
}
