use clap::{App, AppSettings, Arg};
use colored::Colorize;

mod catalog;
mod cmd;
mod config;
mod copy;
mod git;
mod manifest;
mod scaffold;
mod template;
mod userpath;
mod verbosity;
mod walkdir;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const TEMPLATES_DIR_ARG: &str = "templates_dir";

fn main() {
    let matches = App::new("kris")
        .version(VERSION)
        .about("Scaffold new projects from local templates or remote repositories.")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("v")
                .short("v")
                .multiple(true)
                .help("Sets the level of verbosity")
                .global(true),
        )
        .arg(
            Arg::with_name(TEMPLATES_DIR_ARG)
                .long("templates-dir")
                .takes_value(true)
                .hidden(true)
                .env(config::TEMPLATES_ENV)
                .validator(|dir| {
                    userpath::resolve(&dir)
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                }),
        )
        .subcommand(App::new(cmd::list::CMD_STR).about("Lists the available templates."))
        .subcommand(
            App::new(cmd::create::CMD_STR)
                .about("Creates a new project from a template.")
                .arg(
                    Arg::with_name(cmd::create::NAME_ARG)
                        .help("The name for the new project")
                        .long_help(
                            "The name for the new project. \
                            This will be the name of the created folder, inside \
                            the current directory. Prompted for if not given.",
                        ),
                )
                .arg(
                    Arg::with_name(cmd::create::TEMPLATE_ARG)
                        .short("t")
                        .long(cmd::create::TEMPLATE_ARG)
                        .takes_value(true)
                        .value_name("TEMPLATE")
                        .help("The project template to use")
                        .long_help(
                            "The project template to use. Use the `list` command \
                            to find what templates are available. Prompted for if \
                            not given.",
                        ),
                ),
        )
        .get_matches();

    let verbose = matches.occurrences_of("v").max(
        matches
            .subcommand()
            .1
            .map_or(0, |sub_matches| sub_matches.occurrences_of("v")),
    );
    verbosity::Verbosity::from(verbose).init_tracing();

    println!();
    println!("{}", format!("kris(version: {})", VERSION).green());
    println!();

    // Already validated by clap.
    let user_dir = matches
        .value_of(TEMPLATES_DIR_ARG)
        .and_then(|dir| userpath::resolve(dir).ok());
    let templates_dir = config::templates_dir(user_dir);

    let catalog = match catalog::Catalog::scan(&templates_dir) {
        Ok(catalog) => catalog,
        Err(err) => {
            clap::Error::with_description(&err.to_string(), clap::ErrorKind::InvalidValue).exit()
        }
    };

    match matches.subcommand() {
        (cmd::create::CMD_STR, Some(sub_matches)) => cmd::create::create(
            &catalog,
            &templates_dir,
            sub_matches.value_of(cmd::create::NAME_ARG),
            sub_matches.value_of(cmd::create::TEMPLATE_ARG),
        ),
        (cmd::list::CMD_STR, Some(_)) => cmd::list::list(&catalog),
        _ => unreachable!("a subcommand is required"),
    }
}
