use anyhow::{Context, Result, anyhow};
use clap::Subcommand;
use resume_form::AccentColorError;

use super::App;
use crate::locale::trf;

#[derive(Subcommand, Debug, Clone)]
pub enum ColorCommand {
    /// Print the current accent color
    Show,
    /// Store a new accent color
    Set {
        /// Hex color such as #e74c3c
        #[arg(value_name = "COLOR")]
        color: String,
    },
    /// Go back to the default accent color
    Reset,
}

pub fn run(app: &App, command: ColorCommand) -> Result<()> {
    let mut repository = app.repository()?;
    let color = match command {
        ColorCommand::Show => repository.accent_color(),
        ColorCommand::Set { color } => {
            repository
                .save_accent_color(&color)
                .map_err(|err| match err {
                    AccentColorError::Invalid(color) => {
                        anyhow!(trf("color.invalid", &[("color", &color)]))
                    }
                    AccentColorError::Store(err) => {
                        anyhow::Error::new(err).context("failed to store the accent color")
                    }
                })?;
            repository.accent_color()
        }
        ColorCommand::Reset => repository
            .reset_accent_color()
            .context("failed to reset the accent color")?
            .to_string(),
    };
    println!("{}", trf("color.current", &[("color", &color)]));
    Ok(())
}
