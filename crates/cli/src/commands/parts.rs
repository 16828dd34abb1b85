//! `contentdef parts`: part commands.

use clap::Subcommand;
use contentdef_service::ContentDefinitionService;

use super::{form, print_errors};

#[derive(Subcommand)]
pub enum PartsCommand {
    /// List all parts
    List,

    /// Show a part with its fields and editor templates
    Show { name: String },

    /// Add an attachable part
    Add { name: String },

    /// Alter a part, posting form values to the editor hooks
    Alter {
        name: String,

        /// Form value as `full.dotted.key=value`
        #[arg(long = "set", value_parser = super::parse_key_val)]
        values: Vec<(String, String)>,
    },

    /// Remove a part and all its fields
    Remove { name: String },

    /// Attach a part to a type
    Attach { part: String, type_name: String },

    /// Detach a part from a type
    Detach { part: String, type_name: String },
}

pub fn run(service: &ContentDefinitionService, command: PartsCommand) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        PartsCommand::List => {
            let parts = service.list_parts()?;
            if parts.is_empty() {
                println!("   No parts defined.");
            }
            for p in &parts {
                println!(
                    "  {:<24} fields={} attachable={}",
                    p.name,
                    p.fields.len(),
                    p.is_attachable()
                );
            }
        }

        PartsCommand::Show { name } => match service.get_part(&name)? {
            Some(view) => println!("{}", serde_json::to_string_pretty(&view)?),
            None => return Err(format!("No part named '{name}'").into()),
        },

        PartsCommand::Add { name } => match service.add_part(&name)? {
            Some(view) => println!("✅ Added part '{}'", view.name),
            None => println!("   Nothing added: the part name is empty."),
        },

        PartsCommand::Alter { name, values } => {
            let Some(mut view) = service.get_part(&name)? else {
                return Err(format!("No part named '{name}'").into());
            };
            let updater = form(values);
            let outcome = service.alter_part(&mut view, &updater)?;
            print_errors(&outcome.errors);
            println!("✅ Altered part '{name}'");
        }

        PartsCommand::Remove { name } => {
            service.remove_part(&name)?;
            println!("🗑️  Removed part '{name}'");
        }

        PartsCommand::Attach { part, type_name } => {
            service.add_part_to_type(&part, &type_name)?;
            println!("🔗 Attached '{part}' to '{type_name}'");
        }

        PartsCommand::Detach { part, type_name } => {
            service.remove_part_from_type(&part, &type_name)?;
            println!("✂️  Detached '{part}' from '{type_name}'");
        }
    }

    Ok(())
}
