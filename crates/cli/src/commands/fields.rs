//! `contentdef fields`: field commands.

use clap::Subcommand;
use contentdef_core::Error;
use contentdef_service::ContentDefinitionService;

use super::{form, print_errors};

#[derive(Subcommand)]
pub enum FieldsCommand {
    /// List installable field types
    Catalog,

    /// Add a field to a part, creating the part if needed
    Add {
        part: String,
        display_name: String,
        field_type: String,

        /// Technical name; generated from the display name when omitted
        #[arg(long)]
        name: Option<String>,
    },

    /// Alter a field, posting form values to the editor hooks
    Alter {
        part: String,
        field: String,

        /// Form value as `key=value`, relative to the field
        #[arg(long = "set", value_parser = super::parse_key_val)]
        values: Vec<(String, String)>,
    },

    /// Remove a field from a part
    Remove { part: String, field: String },

    /// Suggest a free field name for a part or type
    Suggest { container: String, display_name: String },
}

pub fn run(service: &ContentDefinitionService, command: FieldsCommand) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        FieldsCommand::Catalog => {
            for entry in service.field_type_catalog() {
                let label = entry.model["display_name"].as_str().unwrap_or_default().to_string();
                println!("  {:<16} {label}", entry.template_name);
            }
        }

        FieldsCommand::Add { part, display_name, field_type, name } => {
            let name = match name {
                Some(name) => name,
                None => match service.generate_field_name(&part, &display_name) {
                    Ok(name) => name,
                    // The part is created by the add below
                    Err(Error::InvalidArgument(_)) => display_name.clone(),
                    Err(e) => return Err(e.into()),
                },
            };
            let stored = service.add_field_to_part(&name, &display_name, &field_type, &part)?;
            println!("✅ Added {field_type} '{stored}' to '{part}'");
        }

        FieldsCommand::Alter { part, field, values } => {
            let updater = form(values);
            let outcome = service.alter_field(&part, &field, &updater)?;
            print_errors(&outcome.errors);
            println!("✅ Altered field '{part}.{field}'");
        }

        FieldsCommand::Remove { part, field } => {
            service.remove_field_from_part(&field, &part)?;
            println!("🗑️  Removed field '{field}' from '{part}'");
        }

        FieldsCommand::Suggest { container, display_name } => {
            println!("{}", service.generate_field_name(&container, &display_name)?);
        }
    }

    Ok(())
}
