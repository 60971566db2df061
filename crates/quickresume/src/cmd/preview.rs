use anyhow::{Context, Result};
use clap::Args;
use resume_form::PreviewRenderer;

use super::App;
use crate::render::TemplateName;

#[derive(Args, Debug, Clone)]
pub struct PreviewArgs {
    /// Template to render with
    #[arg(long = "template", value_enum)]
    pub template: Option<TemplateName>,
}

pub fn run(app: &App, args: PreviewArgs) -> Result<()> {
    let repository = app.repository()?;
    let preview = app.preview(args.template)?;
    let rendered = preview
        .render(&repository.snapshot())
        .with_context(|| format!("failed to render template {}", preview.template()))?;
    println!("{}", preview.indicator(app.catalog()));
    println!();
    print!("{rendered}");
    Ok(())
}
