use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::Args;
use resume_form::{KeyValueStore, NavigationController, Page, Transition};
use tracing::debug;

use super::{App, describe, navigation_failed, prompt_yes_no};
use crate::locale::tr;

#[derive(Args, Debug, Clone)]
pub struct BackArgs {
    /// Page the back button is pressed on
    #[arg(long = "from", value_name = "PAGE", default_value = "input")]
    pub from: Page,
    /// Leave the wizard without asking
    #[arg(long = "yes", short = 'y', default_value_t = false)]
    pub yes: bool,
}

#[derive(Args, Debug, Clone)]
pub struct HomeArgs {
    /// Page the back button is pressed on
    #[arg(long = "from", value_name = "PAGE", default_value = "input")]
    pub from: Page,
    /// Use the navigation bar link instead of the back button
    #[arg(long = "nav-bar", default_value_t = false)]
    pub nav_bar: bool,
    /// Leave the wizard without asking
    #[arg(long = "yes", short = 'y', default_value_t = false)]
    pub yes: bool,
}

pub fn start(app: &App) -> Result<()> {
    let mut controller = app.controller(Page::Landing)?;
    let transition = controller.start_progress().map_err(navigation_failed)?;
    let transition = match transition {
        Transition::Navigate(Page::Input) => controller.load(),
        other => other,
    };
    println!("{}", describe(transition, app.catalog()));
    Ok(())
}

pub fn back(app: &App, args: BackArgs) -> Result<()> {
    let mut controller = app.controller(args.from)?;
    let transition = controller.navigate_back().map_err(navigation_failed)?;
    finish(app, &mut controller, transition, args.yes)
}

pub fn home(app: &App, args: HomeArgs) -> Result<()> {
    let mut controller = app.controller(args.from)?;
    let transition = controller
        .navigate_to_landing(args.nav_bar)
        .map_err(navigation_failed)?;
    finish(app, &mut controller, transition, args.yes)
}

fn finish<S: KeyValueStore>(
    app: &App,
    controller: &mut NavigationController<S>,
    transition: Transition,
    yes: bool,
) -> Result<()> {
    let transition = settle(controller, transition, yes)?;
    if transition != Transition::Stay {
        println!("{}", describe(transition, app.catalog()));
    }
    Ok(())
}

/// Answers a pending leave prompt: `--yes`, an interactive question, or a
/// cancel when nobody can be asked.
pub(crate) fn settle<S: KeyValueStore>(
    controller: &mut NavigationController<S>,
    transition: Transition,
    yes: bool,
) -> Result<Transition> {
    if transition != Transition::ConfirmLeave {
        return Ok(transition);
    }
    let confirmed = if yes {
        true
    } else if io::stdin().is_terminal() {
        prompt_yes_no(tr("nav.confirm_leave"), false)?
    } else {
        debug!("no terminal to confirm leaving, staying");
        false
    };
    let settled = controller.confirm_action(confirmed);
    if !confirmed {
        println!("{}", tr("cli.home.cancelled"));
    }
    Ok(settled)
}
