//! Catalog browsing against `/medicines`.
//!
//! Catalog routes are public: the gateway serves them without a session, so
//! these calls work before login.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use medicart_core::MedicineId;

use crate::error::GatewayError;
use crate::gateway::GatewayClient;

use super::batches::BatchDto;

/// A medicine as served by the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineDto {
    /// Catalog id.
    pub id: MedicineId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unit price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// Catalog category (drives the storefront icon set).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Coarse stock state reported by the catalog (`IN_STOCK`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_status: Option<String>,
    /// Whether the medicine is orderable at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
    /// Units available across all batches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_quantity: Option<i64>,
    /// Batches backing the stock figures (admin views).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub batches: Vec<BatchDto>,
}

impl GatewayClient {
    /// Fetch the full catalog.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails.
    pub async fn list_medicines(&self) -> Result<Vec<MedicineDto>, GatewayError> {
        self.get_json("/medicines").await
    }

    /// Fetch one medicine by id.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails.
    pub async fn get_medicine(&self, id: MedicineId) -> Result<MedicineDto, GatewayError> {
        self.get_json(&format!("/medicines/{id}")).await
    }

    /// Search the catalog by name.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails.
    pub async fn search_medicines(&self, query: &str) -> Result<Vec<MedicineDto>, GatewayError> {
        let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
        self.get_json(&format!("/medicines/search?query={encoded}"))
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_medicine_deserializes_from_gateway_shape() {
        let json = r#"{
            "id": 5,
            "name": "Paracetamol 500mg",
            "price": 12.5,
            "category": "Pain Relief",
            "stockStatus": "IN_STOCK",
            "inStock": true,
            "totalQuantity": 120
        }"#;
        let medicine: MedicineDto = serde_json::from_str(json).unwrap();
        assert_eq!(medicine.id, MedicineId::new(5));
        assert_eq!(medicine.stock_status.as_deref(), Some("IN_STOCK"));
        assert!(medicine.batches.is_empty());
    }

    #[test]
    fn test_minimal_medicine_shape() {
        let medicine: MedicineDto =
            serde_json::from_str(r#"{"id": 1, "name": "Ibuprofen"}"#).unwrap();
        assert_eq!(medicine.name, "Ibuprofen");
        assert!(medicine.price.is_none());
    }
}
