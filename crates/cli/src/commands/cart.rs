//! Cart commands.
//!
//! Every mutation goes through the reconciliation store, so what gets
//! printed afterwards is always the server's view, never a local guess.

use clap::Subcommand;

use medicart_client::{CartState, CartStatus, GatewayError};
use medicart_core::MedicineId;

use crate::context::Context;

#[derive(Subcommand)]
pub enum CartAction {
    /// Fetch and display the cart
    Show,
    /// Add one unit of a medicine
    Add {
        /// Medicine id
        medicine_id: i64,
    },
    /// Add another unit of a medicine already in the cart
    Increment {
        /// Medicine id
        medicine_id: i64,
    },
    /// Remove one unit of a medicine (removes the line at quantity one)
    Decrement {
        /// Medicine id
        medicine_id: i64,
    },
    /// Empty the cart on the server
    Clear,
    /// Show the cart total
    Total,
}

pub async fn run(action: CartAction, ctx: &Context) -> Result<(), GatewayError> {
    let store = ctx.cart_store();

    match action {
        CartAction::Show => {
            store.refresh().await?;
        }
        CartAction::Add { medicine_id } => {
            store.add(MedicineId::new(medicine_id)).await?;
        }
        CartAction::Increment { medicine_id } => {
            store.increment(MedicineId::new(medicine_id)).await?;
        }
        CartAction::Decrement { medicine_id } => {
            // Decrement resolves the line item from local state
            store.refresh().await?;
            store.decrement(MedicineId::new(medicine_id)).await?;
        }
        CartAction::Clear => {
            ctx.client().clear_cart().await?;
            store.refresh().await?;
        }
        CartAction::Total => {
            let total = ctx.client().cart_total().await?;
            println!("Cart total: {total}");
            return Ok(());
        }
    }

    print_cart(&store.state().await);
    Ok(())
}

fn print_cart(state: &CartState) {
    if state.status != CartStatus::Succeeded {
        println!("Cart status: {:?}", state.status);
    }
    if state.items.is_empty() {
        println!("Cart is empty");
        return;
    }

    println!("{:<8} {:<30} {:>6} {:>10}", "ITEM", "MEDICINE", "QTY", "PRICE");
    for item in &state.items {
        println!(
            "{:<8} {:<30} {:>6} {:>10}",
            item.id,
            item.product.name,
            item.qty,
            item.product
                .price
                .map_or_else(|| "-".to_owned(), |p| p.to_string()),
        );
    }
    println!("{} lines", state.items.len());
}
