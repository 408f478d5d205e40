//! Delivery address commands.

use clap::Subcommand;

use medicart_client::GatewayError;
use medicart_client::api::AddressDto;
use medicart_core::AddressId;

use crate::context::Context;

#[derive(Subcommand)]
pub enum AddressAction {
    /// List saved addresses
    List,
    /// Add an address
    Add {
        /// Recipient full name
        #[arg(long)]
        name: String,

        /// Street address
        #[arg(long)]
        street: String,

        /// Address line 1
        #[arg(long)]
        line1: String,

        /// Address line 2
        #[arg(long)]
        line2: Option<String>,

        /// City
        #[arg(long)]
        city: String,

        /// State
        #[arg(long)]
        state: String,

        /// Postal (PIN) code, six digits
        #[arg(long)]
        postal_code: String,

        /// Contact phone, ten digits
        #[arg(long)]
        phone: String,

        /// Mark as the default delivery address
        #[arg(long)]
        default: bool,
    },
    /// Delete an address
    Delete {
        /// Address id
        id: i64,
    },
}

pub async fn run(action: AddressAction, ctx: &Context) -> Result<(), GatewayError> {
    match action {
        AddressAction::List => {
            let addresses = ctx.client().list_addresses().await?;
            for address in &addresses {
                println!(
                    "{:<6} {:<24} {}, {}, {} {} {}{}",
                    address.id.map_or_else(|| "-".to_owned(), |id| id.to_string()),
                    address.name,
                    address.street_address,
                    address.city,
                    address.state,
                    address.postal_code,
                    address.phone,
                    if address.is_default { " (default)" } else { "" },
                );
            }
            println!("{} addresses", addresses.len());
        }
        AddressAction::Add {
            name,
            street,
            line1,
            line2,
            city,
            state,
            postal_code,
            phone,
            default,
        } => {
            let address = AddressDto {
                name,
                street_address: street,
                address_line1: line1,
                address_line2: line2,
                city,
                state,
                postal_code,
                phone,
                is_default: default,
                ..AddressDto::default()
            };
            // create_address validates locally before issuing the request
            let created = ctx.client().create_address(&address).await?;
            println!(
                "Created address {}",
                created.id.map_or_else(|| "?".to_owned(), |id| id.to_string())
            );
        }
        AddressAction::Delete { id } => {
            ctx.client().delete_address(AddressId::new(id)).await?;
            println!("Deleted address {id}");
        }
    }
    Ok(())
}
