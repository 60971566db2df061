use std::path::Path;

use anyhow::Result;
use clap::Args;
use resume_form::{Catalog, ResumeSnapshot, Step, step_layout};
use serde::Serialize;

use super::App;

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    /// Print the report as JSON
    #[arg(long = "json", default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct StatusReport<'a> {
    progress: u8,
    step: Option<Step>,
    storage: &'a Path,
    #[serde(flatten)]
    resume: ResumeSnapshot,
}

pub fn run(app: &App, args: StatusArgs) -> Result<()> {
    let repository = app.repository()?;
    let progress = repository.form_progress();
    let report = StatusReport {
        progress: progress.value(),
        step: progress.step(),
        storage: app.storage_path(),
        resume: repository.snapshot(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    print!("{}", render_text(&report, app.catalog()));
    Ok(())
}

fn render_text(report: &StatusReport<'_>, catalog: &Catalog) -> String {
    let mut out = String::new();
    let mut line = |text: String| {
        out.push_str(&text);
        out.push('\n');
    };
    line(catalog.trf(
        "cli.wizard.progress",
        &[("percent", &report.progress.to_string())],
    ));
    match report.step {
        Some(step) => line(catalog.trf(
            "cli.status.page",
            &[("step", &catalog.tr(step.title_key()))],
        )),
        None => line(catalog.tr("cli.status.complete")),
    }
    line(catalog.trf("color.current", &[("color", &report.resume.accent_color)]));
    let picture = if report.resume.profile_image.is_some() {
        catalog.tr("cli.status.yes")
    } else {
        catalog.tr("cli.status.no")
    };
    line(catalog.trf("cli.status.picture", &[("state", &picture)]));
    line(catalog.trf(
        "cli.status.storage",
        &[("path", &report.storage.display().to_string())],
    ));

    for step in [Step::PersonalInfo, Step::Education, Step::Experience] {
        for input in step_layout(step, catalog).inputs() {
            let value = report.resume.field(&input.id).trim();
            if !value.is_empty() {
                line(format!("  {} {value}", input.label));
            }
        }
    }
    out
}
