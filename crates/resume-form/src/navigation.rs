use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::collab::{DocumentExporter, ExportError};
use crate::data::ResumeData;
use crate::progress::{Page, Progress, Step};
use crate::repository::{ResumeRepository, SaveOutcome};
use crate::store::{KeyValueStore, StoreError};

/// What the host has to do after a controller operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "target", rename_all = "snake_case")]
pub enum Transition {
    /// Replace the form on the input page with this step.
    Render(Step),
    /// Leave the current page.
    Navigate(Page),
    /// Ask the user before leaving the wizard; answer via `confirm_action`.
    ConfirmLeave,
    Stay,
}

/// Result of a successful [`NavigationController::next_step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    pub transition: Transition,
    pub saved: SaveOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WizardState {
    pub page: Page,
    pub progress: Progress,
    /// A leave prompt is showing and waits for `confirm_action`.
    pub confirm_pending: bool,
}

#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("form data could not be saved")]
    Save(#[source] StoreError),
    #[error("progress could not be saved")]
    Progress(#[source] StoreError),
}

impl NavigationError {
    /// Message catalog key shown to the user.
    pub fn message_key(&self) -> &'static str {
        "nav.save_failed"
    }
}

/// Step and page state machine of the wizard.
///
/// Owns the repository, so every progress change goes through it. The page is
/// held here rather than derived from the environment, which lets hosts drive
/// the machine without a browser.
#[derive(Debug)]
pub struct NavigationController<S> {
    repository: ResumeRepository<S>,
    state: WizardState,
}

impl<S: KeyValueStore> NavigationController<S> {
    pub fn new(repository: ResumeRepository<S>, page: Page) -> Self {
        let progress = repository.form_progress();
        Self {
            repository,
            state: WizardState {
                page,
                progress,
                confirm_pending: false,
            },
        }
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    pub fn page(&self) -> Page {
        self.state.page
    }

    pub fn progress(&self) -> Progress {
        self.state.progress
    }

    pub fn repository(&self) -> &ResumeRepository<S> {
        &self.repository
    }

    pub fn repository_mut(&mut self) -> &mut ResumeRepository<S> {
        &mut self.repository
    }

    pub fn into_repository(self) -> ResumeRepository<S> {
        self.repository
    }

    /// Page-load behaviour: the input page always shows the form for the
    /// stored progress, and a finished wizard goes to the preview instead.
    pub fn load(&mut self) -> Transition {
        self.state.progress = self.repository.form_progress();
        if self.state.page != Page::Input {
            return Transition::Stay;
        }
        match self.state.progress.step() {
            Some(step) => Transition::Render(step),
            None => self.go(Page::Preview),
        }
    }

    /// A page opened directly rather than reached through a transition.
    pub fn open(&mut self, page: Page) -> Transition {
        self.state.page = page;
        self.state.confirm_pending = false;
        self.load()
    }

    /// Entry point from the landing page.
    pub fn start_progress(&mut self) -> Result<Transition, NavigationError> {
        self.update_progress(Progress::PersonalInfo)?;
        Ok(self.go(Page::Input))
    }

    /// Persists `form_data`, then moves one checkpoint forward.
    ///
    /// When saving fails nothing else happens: progress stays and the page
    /// does not change.
    pub fn next_step(&mut self, form_data: &ResumeData) -> Result<Advance, NavigationError> {
        let saved = self
            .repository
            .save_resume_data(form_data)
            .map_err(NavigationError::Save)?;
        if saved == SaveOutcome::SavedWithoutImage {
            warn!("form data saved without the profile image");
        }

        let transition = match self.state.progress.next() {
            Some(next) => {
                self.update_progress(next)?;
                match next.step() {
                    Some(step) => Transition::Render(step),
                    None => self.go(Page::Preview),
                }
            }
            None => self.go(Page::Final),
        };
        Ok(Advance { transition, saved })
    }

    /// The back button of whatever page is showing.
    pub fn navigate_back(&mut self) -> Result<Transition, NavigationError> {
        match self.state.page {
            Page::Preview => self.navigate_back_from_preview(),
            Page::Input => self.navigate_to_landing(false),
            Page::Final => Ok(self.go(Page::Preview)),
            Page::Landing => Ok(Transition::Stay),
        }
    }

    /// Always returns to the experience step, whatever was stored before.
    pub fn navigate_back_from_preview(&mut self) -> Result<Transition, NavigationError> {
        self.update_progress(Progress::Experience)?;
        Ok(self.go(Page::Input))
    }

    /// Home link, logo and first-step back button.
    ///
    /// Inside the wizard, the nav bar and the first step ask before leaving.
    /// Later steps step back one form in place instead.
    pub fn navigate_to_landing(
        &mut self,
        from_nav_bar: bool,
    ) -> Result<Transition, NavigationError> {
        let progress = self.state.progress;
        match self.state.page {
            Page::Landing => Ok(Transition::Stay),
            Page::Final if from_nav_bar => Ok(self.ask_to_leave()),
            Page::Final => Ok(Transition::Stay),
            _ if from_nav_bar || progress == Progress::PersonalInfo => Ok(self.ask_to_leave()),
            Page::Preview => self.navigate_back_from_preview(),
            Page::Input => {
                let Some(previous) = progress.previous() else {
                    return Ok(self.ask_to_leave());
                };
                self.update_progress(previous)?;
                Ok(previous
                    .step()
                    .map(Transition::Render)
                    .unwrap_or(Transition::Stay))
            }
        }
    }

    fn ask_to_leave(&mut self) -> Transition {
        self.state.confirm_pending = true;
        Transition::ConfirmLeave
    }

    /// Answer to the leave prompt. Cancelling changes nothing.
    pub fn confirm_action(&mut self, confirmed: bool) -> Transition {
        if !std::mem::take(&mut self.state.confirm_pending) {
            debug!("no leave prompt pending");
            return Transition::Stay;
        }
        if confirmed {
            self.go(Page::Landing)
        } else {
            Transition::Stay
        }
    }

    /// Persists `progress` and adopts it once the write succeeded.
    pub fn update_progress(&mut self, progress: Progress) -> Result<(), NavigationError> {
        self.repository
            .save_form_progress(progress)
            .map_err(NavigationError::Progress)?;
        debug!(from = %self.state.progress, to = %progress, "progress updated");
        self.state.progress = progress;
        Ok(())
    }

    /// Hands a snapshot to `exporter` and, once the document exists, finishes
    /// the wizard. A failed export leaves progress and page alone.
    pub fn export(
        &mut self,
        exporter: &dyn DocumentExporter,
    ) -> Result<(PathBuf, Transition), ExportError> {
        let path = exporter.export(&self.repository.snapshot())?;
        info!(path = %path.display(), "resume exported");
        if self.state.progress != Progress::Complete {
            self.update_progress(Progress::Complete)?;
        }
        Ok((path, self.go(Page::Final)))
    }

    fn go(&mut self, page: Page) -> Transition {
        self.state.page = page;
        self.state.confirm_pending = false;
        Transition::Navigate(page)
    }
}
