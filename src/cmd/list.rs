use crate::catalog::Catalog;
use colored::Colorize;

pub const CMD_STR: &str = "list";

pub fn list(catalog: &Catalog) {
    if catalog.is_empty() {
        println!("{}", "No templates available.".italic());
        return;
    }
    for template in catalog.iter() {
        let description = if template.description.is_empty() {
            "No description.".italic().to_string()
        } else {
            template.description.clone()
        };
        match &template.repository {
            Some(url) => println!(
                "{} {}\n  {}",
                template.name.bold(),
                format!("(remote: {})", url).dimmed(),
                description
            ),
            None => println!("{}\n  {}", template.name.bold(), description),
        }
    }
}
