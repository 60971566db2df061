use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use resume_form::{KeyValueStore, ProfileImagePipeline, ResumeRepository};
use tracing::info;

use super::App;
use crate::codec::JpegCodec;
use crate::locale::tr;

#[derive(Subcommand, Debug, Clone)]
pub enum ImageCommand {
    /// Resize a picture and store it as the profile picture
    Set {
        /// Picture file (JPEG, PNG, GIF or WebP)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Remove the stored profile picture
    Remove,
}

pub fn run(app: &App, command: ImageCommand) -> Result<()> {
    let mut repository = app.repository()?;
    match command {
        ImageCommand::Set { file } => store_picture(app, &mut repository, &file)?,
        ImageCommand::Remove => {
            repository
                .remove_profile_image()
                .context("failed to remove the profile picture")?;
            println!("{}", tr("image.removed"));
        }
    }
    Ok(())
}

/// Reads `file`, re-encodes it and stores it under the picture key only.
pub(crate) fn store_picture<S: KeyValueStore>(
    app: &App,
    repository: &mut ResumeRepository<S>,
    file: &Path,
) -> Result<()> {
    let raw = fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    let pipeline = ProfileImagePipeline::new(JpegCodec::from_config(&app.config().image));
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the image runtime")?;
    match runtime.block_on(pipeline.process(raw, repository)) {
        Ok(encoded) => {
            info!(path = %file.display(), bytes = encoded.as_str().len(), "profile picture stored");
            println!("{}", tr("image.saved"));
            Ok(())
        }
        Err(err) => {
            let message = tr(err.message_key());
            Err(anyhow::Error::new(err).context(message))
        }
    }
}
