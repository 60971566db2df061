use anyhow::{Result, bail};

use super::App;
use crate::locale::tr;

pub fn run(app: &App) -> Result<()> {
    let mut repository = app.repository()?;
    if let Err(err) = repository.clear_all_data() {
        bail!("{}: {err}", tr("cli.reset.failed"));
    }
    println!("{}", tr("cli.reset.done"));
    Ok(())
}
