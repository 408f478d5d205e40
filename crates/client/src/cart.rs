//! Cart reconciliation store.
//!
//! A client-side cache of cart contents kept eventually consistent with the
//! server by refetching after every mutation. There are no optimistic local
//! inserts: correctness depends on the server being the single source of
//! truth, trading latency for consistency. Item contents are only ever
//! replaced wholesale, never patched, so local state cannot drift.
//!
//! Within one mutating operation the mutation strictly precedes its trailing
//! refresh. Across concurrently issued operations there is no ordering
//! guarantee: both proceed, and the store reflects whichever refresh resolves
//! last. The state lock is never held across an await, so nothing can
//! deadlock or serialize the requests themselves.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::instrument;

use medicart_core::{CartItemId, MedicineId};

use crate::api::cart::CartItemDto;
use crate::api::medicines::MedicineDto;
use crate::error::GatewayError;
use crate::gateway::GatewayClient;

/// Fetch lifecycle state of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CartStatus {
    /// No fetch has happened yet (or the cart was cleared locally).
    #[default]
    Idle,
    /// A refresh is in flight.
    Loading,
    /// The last refresh replaced the items successfully.
    Succeeded,
    /// The last refresh failed; items are whatever the previous refresh left.
    Failed,
}

/// A cart line as the store exposes it.
#[derive(Debug, Clone)]
pub struct CartItem {
    /// Server-assigned line-item id. Updates and removals must use this id,
    /// not the medicine id.
    pub id: CartItemId,
    /// The medicine in this line.
    pub product: MedicineDto,
    /// Units in the cart.
    pub qty: u32,
}

/// Snapshot of the store state.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    /// Current cart lines, in server order.
    pub items: Vec<CartItem>,
    /// Fetch lifecycle state.
    pub status: CartStatus,
}

/// The reconciliation store. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    client: GatewayClient,
    state: RwLock<CartState>,
}

impl CartStore {
    /// Create a store over a gateway client. Starts idle and empty.
    #[must_use]
    pub fn new(client: GatewayClient) -> Self {
        Self {
            inner: Arc::new(CartStoreInner {
                client,
                state: RwLock::new(CartState::default()),
            }),
        }
    }

    /// Snapshot of the current state.
    pub async fn state(&self) -> CartState {
        self.inner.state.read().await.clone()
    }

    /// Fetch the authoritative cart and replace local state wholesale.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the fetch fails; the store is marked
    /// `Failed` and keeps its previous items.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<(), GatewayError> {
        {
            let mut state = self.inner.state.write().await;
            state.status = CartStatus::Loading;
        }

        match self.inner.client.fetch_cart().await {
            Ok(dtos) => {
                let items = map_items(dtos);
                let mut state = self.inner.state.write().await;
                state.items = items;
                state.status = CartStatus::Succeeded;
                Ok(())
            }
            Err(err) => {
                let mut state = self.inner.state.write().await;
                state.status = CartStatus::Failed;
                Err(err)
            }
        }
    }

    /// Add one unit of a medicine, then refresh.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the mutation or the trailing refresh fails.
    #[instrument(skip(self))]
    pub async fn add(&self, medicine_id: MedicineId) -> Result<(), GatewayError> {
        self.inner.client.add_to_cart(medicine_id, 1).await?;
        self.refresh().await
    }

    /// Add another unit of a medicine already in the cart, then refresh.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the mutation or the trailing refresh fails.
    #[instrument(skip(self))]
    pub async fn increment(&self, medicine_id: MedicineId) -> Result<(), GatewayError> {
        self.inner.client.add_to_cart(medicine_id, 1).await?;
        self.refresh().await
    }

    /// Remove one unit of a medicine, then refresh.
    ///
    /// A quantity above one becomes a quantity update to one less; a quantity
    /// of exactly one removes the line item. Both calls address the line-item
    /// id. Decrementing a medicine that is not in the cart is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the mutation or the trailing refresh fails.
    #[instrument(skip(self))]
    pub async fn decrement(&self, medicine_id: MedicineId) -> Result<(), GatewayError> {
        let plan = {
            let state = self.inner.state.read().await;
            decrement_plan(&state.items, medicine_id)
        };

        match plan {
            Some(DecrementAction::Update { item, quantity }) => {
                self.inner.client.update_cart_item(item, quantity).await?;
            }
            Some(DecrementAction::Remove { item }) => {
                self.inner.client.remove_cart_item(item).await?;
            }
            None => return Ok(()),
        }
        self.refresh().await
    }

    /// Drop local state without touching the server (logout path).
    pub async fn clear_local(&self) {
        let mut state = self.inner.state.write().await;
        state.items.clear();
        state.status = CartStatus::Idle;
    }
}

/// What a decrement will ask the server to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecrementAction {
    Update { item: CartItemId, quantity: u32 },
    Remove { item: CartItemId },
}

/// Resolve a decrement against the current local items.
fn decrement_plan(items: &[CartItem], medicine_id: MedicineId) -> Option<DecrementAction> {
    let item = items.iter().find(|i| i.product.id == medicine_id)?;
    if item.qty > 1 {
        Some(DecrementAction::Update {
            item: item.id,
            quantity: item.qty - 1,
        })
    } else {
        Some(DecrementAction::Remove { item: item.id })
    }
}

/// Map the wire shape onto store items (`medicine` becomes `product`,
/// `quantity` becomes `qty`). Lines the gateway serves without any medicine
/// reference cannot be rendered or mutated and are dropped.
fn map_items(dtos: Vec<CartItemDto>) -> Vec<CartItem> {
    dtos.into_iter()
        .filter_map(|dto| {
            let product = match dto.medicine {
                Some(medicine) => medicine,
                None => MedicineDto {
                    id: dto.medicine_id?,
                    name: dto.medicine_name.unwrap_or_default(),
                    description: None,
                    price: dto.price,
                    category: None,
                    stock_status: None,
                    in_stock: dto.in_stock,
                    total_quantity: None,
                    batches: Vec::new(),
                },
            };
            Some(CartItem {
                id: dto.id,
                product,
                qty: dto.quantity,
            })
        })
        .collect()
}
