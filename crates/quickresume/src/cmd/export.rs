use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Args;
use resume_form::{KeyValueStore, NavigationController, Page, Progress, Transition};

use super::{App, describe};
use crate::export::MarkdownExporter;
use crate::locale::{tr, trf};

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Directory the document is written to
    #[arg(long = "out", value_name = "DIR")]
    pub out: Option<PathBuf>,
}

pub fn run(app: &App, args: ExportArgs) -> Result<()> {
    let mut controller = app.controller(Page::Preview)?;
    if controller.progress() != Progress::Complete {
        bail!(tr("cli.export.incomplete"));
    }
    let out_dir = args.out.unwrap_or_else(|| PathBuf::from("."));
    let (path, transition) = download(app, &mut controller, &out_dir)?;
    println!("{}", trf("export.done", &[("path", &path.display().to_string())]));
    println!("{}", describe(transition, app.catalog()));
    Ok(())
}

/// The preview's download button.
pub(crate) fn download<S: KeyValueStore>(
    app: &App,
    controller: &mut NavigationController<S>,
    out_dir: &Path,
) -> Result<(PathBuf, Transition)> {
    let exporter = MarkdownExporter::new(app.catalog(), out_dir)
        .context("failed to load the document template")?;
    controller
        .export(&exporter)
        .context(tr("export.failed"))
}
