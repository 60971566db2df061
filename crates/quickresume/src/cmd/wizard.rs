use std::collections::BTreeMap;
use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Args;
use resume_form::{
    ErrorDisplay, FormSession, KeyValueStore, NavigationController, Page, PreviewRenderer,
    SaveOutcome, Step, Transition, keys, step_layout,
};
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use super::export::download;
use super::image::store_picture;
use super::navigate::settle;
use super::{App, describe, navigation_failed, prompt_line, prompt_yes_no};
use crate::locale::{tr, trf};
use crate::render::{TemplateName, TemplatePreview};
use crate::storage::FileStore;

#[derive(Args, Debug, Clone)]
pub struct WizardArgs {
    /// JSON object with field values; fills every remaining step without prompting
    #[arg(long = "answers", value_name = "answers.json")]
    pub answers: Option<PathBuf>,
    /// Directory the document is written to
    #[arg(long = "out", value_name = "DIR")]
    pub out: Option<PathBuf>,
}

pub fn run(app: &App, args: WizardArgs) -> Result<()> {
    if let Some(path) = args.answers.as_deref() {
        return run_answers(app, path);
    }
    if !(io::stdin().is_terminal() && io::stdout().is_terminal()) {
        bail!(tr("cli.wizard.needs_terminal"));
    }
    let out_dir = args.out.unwrap_or_else(|| PathBuf::from("."));
    Wizard::new(app, out_dir)?.run()
}

/// Prints field errors below the prompt.
struct TerminalErrors;

impl ErrorDisplay for TerminalErrors {
    fn show(&mut self, message: &str) {
        eprintln!("  ! {message}");
    }

    fn hide(&mut self) {}
}

fn read_answers(path: &Path) -> Result<BTreeMap<String, String>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read answers {}", path.display()))?;
    let parsed: BTreeMap<String, JsonValue> = serde_json::from_str(&raw)
        .with_context(|| format!("answers {} must be a JSON object", path.display()))?;
    Ok(parsed
        .into_iter()
        .filter_map(|(key, value)| match value {
            JsonValue::Null => None,
            JsonValue::String(text) => Some((key, text)),
            other => Some((key, other.to_string())),
        })
        .collect())
}

fn run_answers(app: &App, path: &Path) -> Result<()> {
    let answers = read_answers(path)?;
    let catalog = app.catalog();
    let mut controller = app.controller(Page::Input)?;
    let mut transition = controller.load();
    if !matches!(transition, Transition::Render(_)) {
        println!("{}", describe(transition, catalog));
    }

    while let Transition::Render(step) = transition {
        if step == Step::PersonalInfo
            && let Some(picture) = answers.get(keys::IMAGE_UPLOAD)
            && !picture.trim().is_empty()
        {
            store_picture(app, controller.repository_mut(), Path::new(picture.trim()))?;
        }

        let layout = step_layout(step, catalog);
        let mut session = FormSession::new(&layout, catalog);
        session.set_error_display(TerminalErrors);
        session.register_layout_fields();
        session.fill_with_data(&controller.repository().resume_data());
        let names: Vec<String> = session.field_names().map(str::to_string).collect();
        for name in &names {
            if let Some(value) = answers.get(name) {
                session.set_value(name, value.as_str());
            }
        }

        let Some(data) = session.try_submit() else {
            bail!(trf(
                "cli.wizard.answers_invalid",
                &[("step", &catalog.tr(step.title_key()))]
            ));
        };
        let advance = controller.next_step(&data).map_err(navigation_failed)?;
        if advance.saved == SaveOutcome::SavedWithoutImage {
            println!("{}", tr("nav.saved_without_image"));
        }
        transition = advance.transition;
        println!("{}", describe(transition, catalog));
    }
    Ok(())
}

/// What a field prompt produced.
enum FieldInput {
    Value,
    Navigate(Transition),
    Quit,
}

/// Interactive walk through the pages, one transition at a time.
struct Wizard<'a, S> {
    app: &'a App,
    controller: NavigationController<S>,
    preview: TemplatePreview,
    out_dir: PathBuf,
}

impl<'a> Wizard<'a, FileStore> {
    fn new(app: &'a App, out_dir: PathBuf) -> Result<Self> {
        Ok(Self {
            app,
            controller: app.controller(Page::Landing)?,
            preview: app.preview(None)?,
            out_dir,
        })
    }
}

impl<S: KeyValueStore> Wizard<'_, S> {
    fn run(mut self) -> Result<()> {
        let mut next = Some(Transition::Navigate(Page::Landing));
        while let Some(transition) = next {
            next = match transition {
                Transition::Render(step) => self.fill_step(step)?,
                Transition::Navigate(Page::Landing) => self.landing()?,
                Transition::Navigate(Page::Input) => Some(self.controller.load()),
                Transition::Navigate(Page::Preview) => self.show_preview()?,
                Transition::Navigate(Page::Final) => {
                    println!("{}", tr("cli.wizard.page.final"));
                    None
                }
                Transition::ConfirmLeave => {
                    let confirmed = settle(&mut self.controller, transition, false)?;
                    Some(self.current_view(confirmed))
                }
                Transition::Stay => Some(self.current_view(Transition::Stay)),
            };
        }
        Ok(())
    }

    /// Turns `Stay` into the view of the page the controller is on.
    fn current_view(&self, transition: Transition) -> Transition {
        if transition != Transition::Stay {
            return transition;
        }
        let state = self.controller.state();
        match (state.page, state.progress.step()) {
            (Page::Input, Some(step)) => Transition::Render(step),
            (Page::Input, None) => Transition::Navigate(Page::Preview),
            (page, _) => Transition::Navigate(page),
        }
    }

    fn landing(&mut self) -> Result<Option<Transition>> {
        self.controller.open(Page::Landing);
        println!("{}", tr("cli.wizard.page.landing"));
        loop {
            let command = prompt_line("> ")?.to_ascii_lowercase();
            match command.as_str() {
                "start" => {
                    return self
                        .controller
                        .start_progress()
                        .map(Some)
                        .map_err(navigation_failed);
                }
                "resume" => return Ok(Some(self.controller.open(Page::Input))),
                "quit" | "q" => return Ok(None),
                "" => {}
                other => println!("{}", trf("cli.wizard.unknown_command", &[("command", other)])),
            }
        }
    }

    fn fill_step(&mut self, step: Step) -> Result<Option<Transition>> {
        let catalog = self.app.catalog();
        let layout = step_layout(step, catalog);
        let mut session = FormSession::new(&layout, catalog);
        session.set_error_display(TerminalErrors);
        session.register_layout_fields();
        session.fill_with_data(&self.controller.repository().resume_data());
        let names: Vec<String> = session.field_names().map(str::to_string).collect();

        println!();
        println!("{}", catalog.tr(step.title_key()));
        println!(
            "{}",
            trf(
                "cli.wizard.progress",
                &[("percent", &step.progress().value().to_string())]
            )
        );
        println!("{}", tr("cli.wizard.field_hint"));

        if step == Step::PersonalInfo
            && let Some(input) = layout.input(keys::IMAGE_UPLOAD)
        {
            let path = prompt_line(&format!("{} {}: ", input.label, tr("cli.wizard.image_hint")))?;
            if !path.is_empty()
                && let Err(err) = store_picture(
                    self.app,
                    self.controller.repository_mut(),
                    Path::new(&path),
                )
            {
                eprintln!("  ! {err}");
            }
        }

        let data = loop {
            for name in &names {
                match self.prompt_field(&mut session, name)? {
                    FieldInput::Value => {}
                    FieldInput::Navigate(transition) => return Ok(Some(transition)),
                    FieldInput::Quit => return Ok(None),
                }
            }
            if let Some(data) = session.try_submit() {
                break data;
            }
        };

        match self.controller.next_step(&data) {
            Ok(advance) => {
                if advance.saved == SaveOutcome::SavedWithoutImage {
                    println!("{}", tr("nav.saved_without_image"));
                }
                Ok(Some(advance.transition))
            }
            Err(err) => {
                warn!(error = %err, "step not saved");
                eprintln!("  ! {}", tr(err.message_key()));
                Ok(Some(Transition::Render(step)))
            }
        }
    }

    /// Asks for one field until the entry passes validation. Required fields
    /// left empty are caught when the whole form is submitted.
    fn prompt_field(&mut self, session: &mut FormSession<'_>, name: &str) -> Result<FieldInput> {
        loop {
            let Some(field) = session.field(name) else {
                return Ok(FieldInput::Value);
            };
            let prompt = if field.value().is_empty() {
                format!("{}: ", field.label())
            } else {
                format!("{} [{}]: ", field.label(), field.value())
            };
            let entry = prompt_line(&prompt)?;
            match entry.as_str() {
                ":quit" => return Ok(FieldInput::Quit),
                ":back" => {
                    let transition = self.controller.navigate_back().map_err(navigation_failed)?;
                    return Ok(FieldInput::Navigate(transition));
                }
                ":home" => {
                    let transition = self
                        .controller
                        .navigate_to_landing(true)
                        .map_err(navigation_failed)?;
                    return Ok(FieldInput::Navigate(transition));
                }
                "" => {}
                value => session.input(name, value),
            }
            if session.blur(name) {
                return Ok(FieldInput::Value);
            }
        }
    }

    fn show_preview(&mut self) -> Result<Option<Transition>> {
        self.controller.open(Page::Preview);
        loop {
            let snapshot = self.controller.repository().snapshot();
            let rendered = self
                .preview
                .render(&snapshot)
                .with_context(|| format!("failed to render template {}", self.preview.template()))?;
            println!();
            println!("{}", self.preview.indicator(self.app.catalog()));
            println!();
            print!("{rendered}");
            println!("{}", tr("cli.wizard.preview_hint"));

            let line = prompt_line("> ")?;
            let (command, argument) = match line.split_once(' ') {
                Some((command, argument)) => (command.to_ascii_lowercase(), argument.trim()),
                None => (line.to_ascii_lowercase(), ""),
            };
            match command.as_str() {
                "download" | "export" => {
                    match download(self.app, &mut self.controller, &self.out_dir) {
                        Ok((path, transition)) => {
                            println!(
                                "{}",
                                trf("export.done", &[("path", &path.display().to_string())])
                            );
                            return Ok(Some(transition));
                        }
                        Err(err) => eprintln!("  ! {err:#}"),
                    }
                }
                "back" => {
                    return self
                        .controller
                        .navigate_back()
                        .map(Some)
                        .map_err(navigation_failed);
                }
                "home" => {
                    return self
                        .controller
                        .navigate_to_landing(true)
                        .map(Some)
                        .map_err(navigation_failed);
                }
                "template" => match TemplateName::parse(argument) {
                    Some(template) => self.preview.set_template(template),
                    None if argument.is_empty() => {
                        self.preview.next_template();
                    }
                    None => println!(
                        "{}",
                        trf("cli.wizard.unknown_command", &[("command", argument)])
                    ),
                },
                "next" => {
                    self.preview.next_template();
                }
                "prev" | "previous" => {
                    self.preview.previous_template();
                }
                "color" => {
                    if let Err(err) = self
                        .controller
                        .repository_mut()
                        .save_accent_color(argument)
                    {
                        debug!(error = %err, "accent color rejected");
                        eprintln!("  ! {}", trf("color.invalid", &[("color", argument)]));
                    }
                }
                "quit" | "q" => {
                    if prompt_yes_no(tr("cli.wizard.confirm_quit"), true)? {
                        return Ok(None);
                    }
                }
                "" => {}
                other => println!("{}", trf("cli.wizard.unknown_command", &[("command", other)])),
            }
        }
    }
}
