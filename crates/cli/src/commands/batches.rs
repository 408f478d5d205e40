//! Admin batch management commands.
//!
//! Listing renders the same searched, paged table the admin panel shows,
//! including the expiry badge (expired / warning within 60 days / active).

use clap::Subcommand;

use medicart_client::GatewayError;
use medicart_client::api::{BatchDto, BatchTable, ExpiryStatus};
use medicart_core::{BatchId, MedicineId};

use crate::context::Context;

#[derive(Subcommand)]
pub enum BatchAction {
    /// List batches in a searched, paged table
    List {
        /// Filter by medicine name or batch number
        #[arg(short, long)]
        search: Option<String>,

        /// Zero-based page to show
        #[arg(short, long, default_value_t = 0)]
        page: usize,
    },
    /// Create a batch
    Create {
        /// Medicine id this batch belongs to
        #[arg(short, long)]
        medicine_id: i64,

        /// Manufacturer batch number
        #[arg(short, long)]
        batch_no: String,

        /// Expiry date (YYYY-MM-DD)
        #[arg(short, long)]
        expiry: String,

        /// Units in the batch
        #[arg(short, long)]
        quantity: i64,
    },
    /// Update a batch's quantity and expiry
    Update {
        /// Batch id
        id: i64,

        /// New expiry date (YYYY-MM-DD)
        #[arg(short, long)]
        expiry: Option<String>,

        /// New unit count
        #[arg(short, long)]
        quantity: Option<i64>,
    },
    /// Delete a batch
    Delete {
        /// Batch id
        id: i64,
    },
}

pub async fn run(action: BatchAction, ctx: &Context) -> Result<(), GatewayError> {
    match action {
        BatchAction::List { search, page } => {
            let batches = ctx.client().list_batches().await?;
            let mut table = BatchTable::new(batches);
            if let Some(term) = search {
                table.set_search(&term);
            }
            for _ in 0..page {
                table.next_page();
            }
            print_table(&table);
        }
        BatchAction::Create {
            medicine_id,
            batch_no,
            expiry,
            quantity,
        } => {
            let batch = BatchDto {
                medicine_id: Some(MedicineId::new(medicine_id)),
                batch_no: Some(batch_no),
                expiry_date: Some(parse_date(&expiry)?),
                qty_available: Some(quantity),
                ..BatchDto::default()
            };
            let created = ctx.client().create_batch(&batch).await?;
            println!(
                "Created batch {}",
                created.id.map_or_else(|| "?".to_owned(), |id| id.to_string())
            );
        }
        BatchAction::Update {
            id,
            expiry,
            quantity,
        } => {
            let batch_id = BatchId::new(id);
            let expiry_date = expiry.as_deref().map(parse_date).transpose()?;
            let batch = BatchDto {
                id: Some(batch_id),
                expiry_date,
                qty_available: quantity,
                ..BatchDto::default()
            };
            ctx.client().update_batch(batch_id, &batch).await?;
            println!("Updated batch {id}");
        }
        BatchAction::Delete { id } => {
            ctx.client().delete_batch(BatchId::new(id)).await?;
            println!("Deleted batch {id}");
        }
    }
    Ok(())
}

fn parse_date(s: &str) -> Result<chrono::NaiveDate, GatewayError> {
    s.parse()
        .map_err(|_| GatewayError::InvalidInput(format!("invalid date (want YYYY-MM-DD): {s}")))
}

fn print_table(table: &BatchTable) {
    let today = chrono::Utc::now().date_naive();

    println!(
        "{:<6} {:<24} {:<12} {:<12} {:>8} {:<8}",
        "ID", "MEDICINE", "BATCH NO", "EXPIRY", "QTY", "STATUS"
    );
    for batch in table.page_rows() {
        let status = match ExpiryStatus::classify(batch.expiry_date, today) {
            ExpiryStatus::Expired => "EXPIRED",
            ExpiryStatus::Warning => "WARNING",
            ExpiryStatus::Active => "ACTIVE",
        };
        println!(
            "{:<6} {:<24} {:<12} {:<12} {:>8} {:<8}",
            batch.id.map_or_else(|| "-".to_owned(), |id| id.to_string()),
            batch.medicine_name.as_deref().unwrap_or("Unknown Medicine"),
            batch.batch_no.as_deref().unwrap_or("-"),
            batch
                .expiry_date
                .map_or_else(|| "-".to_owned(), |d| d.to_string()),
            batch
                .qty_available
                .map_or_else(|| "-".to_owned(), |q| q.to_string()),
            status,
        );
    }

    let (first, last, total) = table.page_bounds();
    println!(
        "Showing {first} - {last} of {total} (page {} of {})",
        table.page() + 1,
        table.total_pages().max(1),
    );
}
