//! Catalog browsing commands.

use clap::Subcommand;

use medicart_client::GatewayError;
use medicart_core::MedicineId;

use crate::context::Context;

#[derive(Subcommand)]
pub enum CatalogAction {
    /// List the full catalog
    List,
    /// Search medicines by name
    Search {
        /// Search term
        #[arg(short, long)]
        query: String,
    },
    /// Show one medicine
    Show {
        /// Medicine id
        id: i64,
    },
}

pub async fn run(action: CatalogAction, ctx: &Context) -> Result<(), GatewayError> {
    match action {
        CatalogAction::List => {
            let medicines = ctx.client().list_medicines().await?;
            print_medicines(&medicines);
        }
        CatalogAction::Search { query } => {
            let medicines = ctx.client().search_medicines(&query).await?;
            print_medicines(&medicines);
        }
        CatalogAction::Show { id } => {
            let medicine = ctx.client().get_medicine(MedicineId::new(id)).await?;
            println!("{:<6} {:<30} {:>10} {:>12} {:<12}", "ID", "NAME", "PRICE", "AVAILABLE", "STATUS");
            print_medicine_row(&medicine);
            if let Some(description) = medicine.description {
                println!("\n{description}");
            }
        }
    }
    Ok(())
}

fn print_medicines(medicines: &[medicart_client::api::MedicineDto]) {
    println!("{:<6} {:<30} {:>10} {:>12} {:<12}", "ID", "NAME", "PRICE", "AVAILABLE", "STATUS");
    for medicine in medicines {
        print_medicine_row(medicine);
    }
    println!("{} medicines", medicines.len());
}

fn print_medicine_row(medicine: &medicart_client::api::MedicineDto) {
    println!(
        "{:<6} {:<30} {:>10} {:>12} {:<12}",
        medicine.id,
        medicine.name,
        medicine
            .price
            .map_or_else(|| "-".to_owned(), |p| p.to_string()),
        medicine
            .total_quantity
            .map_or_else(|| "-".to_owned(), |q| q.to_string()),
        medicine.stock_status.as_deref().unwrap_or("-"),
    );
}
