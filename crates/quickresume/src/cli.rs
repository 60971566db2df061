use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{Error, Result};
use clap::{Arg, ArgAction, CommandFactory, FromArgMatches, Parser, Subcommand};
use resume_form::Catalog;

use crate::cmd::{
    self, App,
    color::ColorCommand,
    export::ExportArgs,
    image::ImageCommand,
    navigate::{BackArgs, HomeArgs},
    preview::PreviewArgs,
    status::StatusArgs,
    wizard::WizardArgs,
};
use crate::config::Config;
use crate::{locale, logging};

#[derive(Parser, Debug)]
#[command(
    name = "quickresume",
    about = "Build a résumé step by step in the terminal",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Language for messages (en, de)
    #[arg(long = "locale", value_name = "LOCALE", global = true)]
    locale: Option<String>,

    /// Configuration file (TOML)
    #[arg(long = "config", value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Storage file holding the résumé data
    #[arg(long = "storage", value_name = "FILE", global = true)]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start a new résumé at the first step
    Start,
    /// Fill in the current step interactively or from an answers file
    Wizard(WizardArgs),
    /// Go back from a page
    Back(BackArgs),
    /// Return to the start page
    Home(HomeArgs),
    /// Show progress and stored data
    Status(StatusArgs),
    /// Render the résumé preview
    Preview(PreviewArgs),
    /// Write the résumé document and finish the wizard
    Export(ExportArgs),
    /// Show or change the accent color
    #[command(subcommand)]
    Color(ColorCommand),
    /// Set or remove the profile picture
    #[command(subcommand)]
    Image(ImageCommand),
    /// Remove all résumé data, the picture and the progress
    Reset,
}

pub fn main() -> Result<()> {
    let argv: Vec<OsString> = std::env::args_os().collect();
    let help_locale = locale::select_locale(locale::cli_locale_from_argv(&argv).as_deref());
    let help_catalog = Catalog::for_locale(&help_locale);

    let mut command = localize_help(Cli::command(), &help_catalog, true);
    let matches = match command.try_get_matches_from_mut(argv) {
        Ok(matches) => matches,
        Err(err) => err.exit(),
    };
    let cli = Cli::from_arg_matches(&matches).map_err(|err| Error::msg(err.to_string()))?;
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    logging::init(config.log.filter.as_deref());
    let catalog = locale::init(cli.locale.as_deref().or(config.locale.as_deref()));
    let app = App::new(config, cli.storage.as_deref(), catalog);

    match cli.command {
        Commands::Start => cmd::navigate::start(&app),
        Commands::Wizard(args) => cmd::wizard::run(&app, args),
        Commands::Back(args) => cmd::navigate::back(&app, args),
        Commands::Home(args) => cmd::navigate::home(&app, args),
        Commands::Status(args) => cmd::status::run(&app, args),
        Commands::Preview(args) => cmd::preview::run(&app, args),
        Commands::Export(args) => cmd::export::run(&app, args),
        Commands::Color(command) => cmd::color::run(&app, command),
        Commands::Image(command) => cmd::image::run(&app, command),
        Commands::Reset => cmd::reset::run(&app),
    }
}

fn localize_help(mut command: clap::Command, catalog: &Catalog, is_root: bool) -> clap::Command {
    let tr = |text: &str| locale::tr_lit(catalog, text);
    if let Some(about) = command.get_about().map(|s| s.to_string()) {
        command = command.about(tr(&about));
    }
    if let Some(long_about) = command.get_long_about().map(|s| s.to_string()) {
        command = command.long_about(tr(&long_about));
    }

    command = command
        .disable_help_subcommand(true)
        .disable_help_flag(true)
        .arg(
            Arg::new("help")
                .short('h')
                .long("help")
                .action(ArgAction::Help)
                .help(tr("Print help")),
        );
    if is_root {
        command = command.disable_version_flag(true).arg(
            Arg::new("version")
                .short('V')
                .long("version")
                .action(ArgAction::Version)
                .help(tr("Print version")),
        );
    }

    let arg_ids = command
        .get_arguments()
        .map(|arg| arg.get_id().clone())
        .collect::<Vec<_>>();
    for arg_id in arg_ids {
        command = command.mut_arg(arg_id, |arg| {
            let mut arg = arg;
            if let Some(help) = arg.get_help().map(ToString::to_string) {
                arg = arg.help(tr(&help));
            }
            if let Some(long_help) = arg.get_long_help().map(ToString::to_string) {
                arg = arg.long_help(tr(&long_help));
            }
            arg
        });
    }

    let sub_names = command
        .get_subcommands()
        .map(|sub| sub.get_name().to_string())
        .collect::<Vec<_>>();
    for name in sub_names {
        command = command.mut_subcommand(name, |sub| localize_help(sub, catalog, false));
    }
    command
}

#[cfg(test)]
mod tests {
    use resume_form::Page;

    use super::*;
    use crate::render::TemplateName;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "quickresume",
            "status",
            "--json",
            "--storage",
            "/tmp/resume.json",
            "--locale",
            "de",
        ])
        .expect("expected CLI to parse");
        assert_eq!(cli.locale.as_deref(), Some("de"));
        assert_eq!(cli.storage, Some(PathBuf::from("/tmp/resume.json")));
        match cli.command {
            Commands::Status(args) => assert!(args.json),
            _ => panic!("expected status args"),
        }
    }

    #[test]
    fn parses_back_from_page() {
        let cli = Cli::try_parse_from(["quickresume", "back", "--from", "preview"])
            .expect("expected CLI to parse");
        match cli.command {
            Commands::Back(args) => assert_eq!(args.from, Page::Preview),
            _ => panic!("expected back args"),
        }
        assert!(Cli::try_parse_from(["quickresume", "back", "--from", "nowhere"]).is_err());
    }

    #[test]
    fn parses_home_flags() {
        let cli = Cli::try_parse_from(["quickresume", "home", "--nav-bar", "--yes"])
            .expect("expected CLI to parse");
        match cli.command {
            Commands::Home(args) => {
                assert!(args.nav_bar);
                assert!(args.yes);
                assert_eq!(args.from, Page::Input);
            }
            _ => panic!("expected home args"),
        }
    }

    #[test]
    fn parses_preview_template() {
        let cli = Cli::try_parse_from(["quickresume", "preview", "--template", "compact"])
            .expect("expected CLI to parse");
        match cli.command {
            Commands::Preview(args) => assert_eq!(args.template, Some(TemplateName::Compact)),
            _ => panic!("expected preview args"),
        }
    }

    #[test]
    fn parses_color_subcommands() {
        let cli = Cli::try_parse_from(["quickresume", "color", "set", "#e74c3c"])
            .expect("expected CLI to parse");
        assert!(matches!(
            cli.command,
            Commands::Color(ColorCommand::Set { ref color }) if color == "#e74c3c"
        ));
    }

    #[test]
    fn help_is_localized() {
        let german = Catalog::for_locale("de");
        let command = localize_help(Cli::command(), &german, true);
        let about = command.get_about().map(|s| s.to_string());
        assert_eq!(
            about.as_deref(),
            Some(german.tr("cli.help.about").as_str())
        );
    }
}
