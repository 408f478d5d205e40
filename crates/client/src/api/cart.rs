//! Cart endpoints under `/api/cart`.
//!
//! Mutations are driven by query parameters; update and remove address the
//! server-assigned line-item id, never the medicine id.

use rust_decimal::Decimal;
use serde::Deserialize;

use medicart_core::{CartItemId, MedicineId};

use crate::error::GatewayError;
use crate::gateway::GatewayClient;

use super::medicines::MedicineDto;

/// A cart line item as served by the gateway.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemDto {
    /// Server-assigned line-item id.
    pub id: CartItemId,
    /// Owning user.
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Medicine in the line.
    #[serde(default)]
    pub medicine_id: Option<MedicineId>,
    /// Denormalized medicine name.
    #[serde(default)]
    pub medicine_name: Option<String>,
    /// Unit price at the time of adding.
    #[serde(default)]
    pub price: Option<Decimal>,
    /// Units of this medicine in the cart.
    pub quantity: u32,
    /// Whether the medicine is currently in stock.
    #[serde(default)]
    pub in_stock: Option<bool>,
    /// Full medicine record, when the gateway expands it.
    #[serde(default)]
    pub medicine: Option<MedicineDto>,
}

impl GatewayClient {
    /// Fetch the authoritative cart.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails.
    pub async fn fetch_cart(&self) -> Result<Vec<CartItemDto>, GatewayError> {
        self.get_json("/api/cart").await
    }

    /// Add units of a medicine to the cart.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails.
    pub async fn add_to_cart(
        &self,
        medicine_id: MedicineId,
        quantity: u32,
    ) -> Result<CartItemDto, GatewayError> {
        self.post(&format!(
            "/api/cart/add?medicineId={medicine_id}&quantity={quantity}"
        ))
        .await
    }

    /// Set the quantity of an existing line item.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails.
    pub async fn update_cart_item(
        &self,
        item_id: CartItemId,
        quantity: u32,
    ) -> Result<CartItemDto, GatewayError> {
        self.put(&format!("/api/cart/update/{item_id}?quantity={quantity}"))
            .await
    }

    /// Remove a line item.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails.
    pub async fn remove_cart_item(&self, item_id: CartItemId) -> Result<(), GatewayError> {
        self.delete(&format!("/api/cart/remove/{item_id}")).await
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails.
    pub async fn clear_cart(&self) -> Result<(), GatewayError> {
        self.delete("/api/cart/clear").await
    }

    /// Fetch the cart total.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails.
    pub async fn cart_total(&self) -> Result<Decimal, GatewayError> {
        self.get_json("/api/cart/total").await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_item_deserializes_with_expanded_medicine() {
        let json = r#"{
            "id": 42,
            "userId": 7,
            "medicineId": 5,
            "medicineName": "Paracetamol",
            "price": 12.5,
            "quantity": 1,
            "inStock": true,
            "medicine": { "id": 5, "name": "Paracetamol" }
        }"#;
        let item: CartItemDto = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, CartItemId::new(42));
        assert_eq!(item.quantity, 1);
        assert_eq!(item.medicine.unwrap().id, MedicineId::new(5));
    }

    #[test]
    fn test_cart_item_deserializes_flat_shape() {
        let json = r#"{ "id": 42, "medicineId": 5, "quantity": 2 }"#;
        let item: CartItemDto = serde_json::from_str(json).unwrap();
        assert!(item.medicine.is_none());
        assert_eq!(item.medicine_id, Some(MedicineId::new(5)));
    }
}
