use crate::{
    catalog::Catalog,
    config::{DEFAULT_PROJECT_NAME, INSTALL_COMMAND},
    git::GitCloner,
    scaffold::{ScaffoldError, TargetProject},
    template::Template,
};
use colored::Colorize;
use read_input::prelude::*;
use std::path::Path;

pub const CMD_STR: &str = "create";
pub const NAME_ARG: &str = "NAME";
pub const TEMPLATE_ARG: &str = "template";

const ERR_CHOICE: &str = "Please pick one of the listed numbers.";

pub fn create(
    catalog: &Catalog,
    templates_dir: &Path,
    name: Option<&str>,
    template: Option<&str>,
) {
    let name = match name {
        Some(name) => name.to_string(),
        None => prompt_name(),
    };

    let template = match template {
        Some(template_name) => match catalog.get(template_name) {
            Some(template) => template,
            None => {
                println!("{}", format!("{} does not exist.", template_name).red());
                println!(
                    "{} {}{}",
                    "You can list existing templates with".dimmed(),
                    "kris list".yellow(),
                    ".".dimmed()
                );
                std::process::exit(exitcode::USAGE);
            }
        },
        None => {
            if catalog.is_empty() {
                println!("{}", "There are no templates to choose from.".red());
                println!(
                    "{} {}",
                    "Templates are read from".dimmed(),
                    templates_dir.to_string_lossy().yellow()
                );
                std::process::exit(exitcode::CONFIG);
            }
            prompt_template(catalog)
        }
    };

    let base_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(err) => {
            println!("{} {}", "Could not read the current directory:".red(), err);
            std::process::exit(exitcode::IOERR);
        }
    };
    let project = TargetProject::new(&base_dir, &name, template);

    let result = project.ensure_free().and_then(|_| {
        if template.is_remote() {
            println!("Please wait, cloning the project template...");
        }
        project.create(&GitCloner)
    });

    match result {
        Ok(path) => {
            println!();
            println!("{}", "Project initialized".green());
            println!();
            println!(
                "Enter {} and run {} to install the project dependencies...",
                path.to_string_lossy().green(),
                INSTALL_COMMAND.green()
            );
        }
        Err(err) => {
            let code = match &err {
                ScaffoldError::TargetExists(_) => exitcode::CANTCREAT,
                ScaffoldError::Clone(_) => exitcode::SOFTWARE,
                _ => exitcode::IOERR,
            };
            println!("{}", "Could not create the project:".red());
            println!("{}", err);
            std::process::exit(code);
        }
    }
}

fn prompt_name() -> String {
    input::<String>()
        .msg(format!(
            "Project name {}: ",
            format!("[default: {}]", DEFAULT_PROJECT_NAME).dimmed()
        ))
        .default(DEFAULT_PROJECT_NAME.to_string())
        .get()
        .trim()
        .to_string()
}

fn prompt_template(catalog: &Catalog) -> &Template {
    println!("{}", "Choose a project template:".bold());
    for (i, template) in catalog.iter().enumerate() {
        println!("{:>3}. {}", i + 1, template.name.bold());
        println!("     {}", describe(template).dimmed());
    }

    let default = catalog.default_choice() + 1;
    let prompt = format!("Template {}: ", format!("[default: {}]", default).dimmed());
    loop {
        let choice = input::<usize>()
            .repeat_msg(prompt.clone())
            .default(default)
            .err(ERR_CHOICE.red())
            .get();

        match choice.checked_sub(1).and_then(|i| catalog.iter().nth(i)) {
            Some(template) => return template,
            None => println!("{}", ERR_CHOICE.red()),
        }
    }
}

fn describe(template: &Template) -> String {
    let description = if template.description.is_empty() {
        "none"
    } else {
        &template.description
    };
    format!("Description: {}", description)
}
