//! `contentdef types`: content type commands.

use clap::Subcommand;
use contentdef_service::ContentDefinitionService;

use super::{form, print_errors};

#[derive(Subcommand)]
pub enum TypesCommand {
    /// List all types
    List {
        /// Only types created through contentdef
        #[arg(long)]
        user_defined: bool,
    },

    /// Show a type with its parts, fields, and editor templates
    Show { name: String },

    /// Add a type
    Add {
        display_name: String,

        /// Technical name; generated from the display name when omitted
        #[arg(long)]
        name: Option<String>,
    },

    /// Remove a type and its own part
    Remove {
        name: String,

        /// Also remove every content item of the type
        #[arg(long)]
        delete_content: bool,
    },

    /// Alter a type, posting form values to the editor hooks
    Alter {
        name: String,

        #[arg(long)]
        display: Option<String>,

        /// Form value as `full.dotted.key=value`
        #[arg(long = "set", value_parser = super::parse_key_val)]
        values: Vec<(String, String)>,
    },
}

pub fn run(service: &ContentDefinitionService, command: TypesCommand) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        TypesCommand::List { user_defined } => {
            let types = if user_defined {
                service.list_user_defined_types()?
            } else {
                service.list_types()?
            };
            if types.is_empty() {
                println!("   No types defined.");
            }
            for t in &types {
                println!(
                    "  {:<24} {:<24} parts={} creatable={} draftable={}",
                    t.name,
                    t.display_name,
                    t.parts.len(),
                    t.is_creatable(),
                    t.is_draftable()
                );
            }
        }

        TypesCommand::Show { name } => {
            let view = service.get_type(&name)?;
            println!("{}", serde_json::to_string_pretty(&view)?);
        }

        TypesCommand::Add { display_name, name } => {
            let definition = service.add_type(name.as_deref().unwrap_or_default(), &display_name)?;
            println!("✅ Added type '{}' ({})", definition.name, definition.display_name);
        }

        TypesCommand::Remove { name, delete_content } => {
            service.remove_type(&name, delete_content)?;
            println!("🗑️  Removed type '{name}'");
        }

        TypesCommand::Alter { name, display, values } => {
            // get_type hands back a placeholder for unknown names
            if !service.list_types()?.iter().any(|t| t.name == name) {
                return Err(format!("No type named '{name}'").into());
            }
            let mut view = service.get_type(&name)?;
            if let Some(display) = display {
                view.display_name = display;
            }
            let updater = form(values);
            let outcome = service.alter_type(&mut view, &updater)?;
            print_errors(&outcome.errors);
            println!("✅ Altered type '{name}'");
        }
    }

    Ok(())
}
