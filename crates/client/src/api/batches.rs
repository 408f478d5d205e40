//! Admin batch management against `/batches`, plus the batch table
//! view-model (search, pagination, expiry status) the admin UI renders.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use medicart_core::{BatchId, MedicineId};

use crate::error::GatewayError;
use crate::gateway::GatewayClient;

/// Rows shown per page in the batch table.
pub const PAGE_SIZE: usize = 5;

/// Days before expiry at which a batch is flagged.
const EXPIRY_WARNING_DAYS: i64 = 60;

/// A stock batch as managed by the admin catalogue service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDto {
    /// Server-assigned id; absent when creating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BatchId>,
    /// Manufacturer batch number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_no: Option<String>,
    /// Expiry date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
    /// Units remaining in this batch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qty_available: Option<i64>,
    /// Medicine this batch belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medicine_id: Option<MedicineId>,
    /// Denormalized medicine name for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medicine_name: Option<String>,
}

impl GatewayClient {
    /// List all batches.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails.
    pub async fn list_batches(&self) -> Result<Vec<BatchDto>, GatewayError> {
        self.get_json("/batches").await
    }

    /// Create a batch.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails.
    pub async fn create_batch(&self, batch: &BatchDto) -> Result<BatchDto, GatewayError> {
        self.post_json("/batches", batch).await
    }

    /// Update a batch.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails.
    pub async fn update_batch(
        &self,
        id: BatchId,
        batch: &BatchDto,
    ) -> Result<BatchDto, GatewayError> {
        self.put_json(&format!("/batches/{id}"), batch).await
    }

    /// Delete a batch.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails.
    pub async fn delete_batch(&self, id: BatchId) -> Result<(), GatewayError> {
        self.delete(&format!("/batches/{id}")).await
    }
}

// =============================================================================
// Table view-model
// =============================================================================

/// Freshness classification of a batch relative to its expiry date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpiryStatus {
    /// Expiry date has passed.
    Expired,
    /// Expires within the warning window.
    Warning,
    /// No expiry concern (including batches with no expiry date on record).
    Active,
}

impl ExpiryStatus {
    /// Classify an expiry date as of `today`.
    #[must_use]
    pub fn classify(expiry: Option<NaiveDate>, today: NaiveDate) -> Self {
        let Some(expiry) = expiry else {
            return Self::Active;
        };
        let days = (expiry - today).num_days();
        if days < 0 {
            Self::Expired
        } else if days <= EXPIRY_WARNING_DAYS {
            Self::Warning
        } else {
            Self::Active
        }
    }
}

/// Paged, searchable view over a batch list.
///
/// Pure presentation state: filtering and paging happen locally over the
/// last fetched list, and a new search always snaps back to the first page.
#[derive(Debug, Default)]
pub struct BatchTable {
    batches: Vec<BatchDto>,
    search: String,
    page: usize,
}

impl BatchTable {
    /// Build a table over a fetched batch list.
    #[must_use]
    pub fn new(batches: Vec<BatchDto>) -> Self {
        Self {
            batches,
            search: String::new(),
            page: 0,
        }
    }

    /// Replace the backing list, keeping search but resetting the page.
    pub fn set_batches(&mut self, batches: Vec<BatchDto>) {
        self.batches = batches;
        self.page = 0;
    }

    /// Set the search term. Resets to the first page.
    pub fn set_search(&mut self, term: &str) {
        self.search = term.to_owned();
        self.page = 0;
    }

    /// Batches matching the current search term, by medicine name or batch
    /// number, case-insensitively.
    #[must_use]
    pub fn filtered(&self) -> Vec<&BatchDto> {
        let term = self.search.to_lowercase();
        self.batches
            .iter()
            .filter(|b| {
                let name = b.medicine_name.as_deref().unwrap_or("").to_lowercase();
                let batch_no = b.batch_no.as_deref().unwrap_or("").to_lowercase();
                name.contains(&term) || batch_no.contains(&term)
            })
            .collect()
    }

    /// Rows on the current page.
    #[must_use]
    pub fn page_rows(&self) -> Vec<&BatchDto> {
        self.filtered()
            .into_iter()
            .skip(self.page * PAGE_SIZE)
            .take(PAGE_SIZE)
            .collect()
    }

    /// Number of pages for the current filter.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.filtered().len().div_ceil(PAGE_SIZE)
    }

    /// Current zero-based page index.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Advance one page, clamped to the last page.
    pub fn next_page(&mut self) {
        let last = self.total_pages().saturating_sub(1);
        self.page = (self.page + 1).min(last);
    }

    /// Go back one page, clamped to the first page.
    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    /// One-based display bounds: `(first_row, last_row, total_rows)`.
    ///
    /// `first_row` is 0 when nothing matches.
    #[must_use]
    pub fn page_bounds(&self) -> (usize, usize, usize) {
        let total = self.filtered().len();
        if total == 0 {
            return (0, 0, 0);
        }
        let start = self.page * PAGE_SIZE;
        let end = (start + PAGE_SIZE).min(total);
        (start + 1, end, total)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn batch(id: i64, medicine: &str, batch_no: &str) -> BatchDto {
        BatchDto {
            id: Some(BatchId::new(id)),
            batch_no: Some(batch_no.to_owned()),
            medicine_name: Some(medicine.to_owned()),
            ..BatchDto::default()
        }
    }

    fn table_with(count: usize) -> BatchTable {
        let batches = (0..count)
            .map(|i| {
                batch(
                    i64::try_from(i).unwrap(),
                    &format!("Medicine {i}"),
                    &format!("BN-{i:03}"),
                )
            })
            .collect();
        BatchTable::new(batches)
    }

    #[test]
    fn test_expiry_classification() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();

        let expired = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        assert_eq!(
            ExpiryStatus::classify(Some(expired), today),
            ExpiryStatus::Expired
        );

        let soon = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        assert_eq!(
            ExpiryStatus::classify(Some(soon), today),
            ExpiryStatus::Warning
        );

        // Exactly at the warning boundary counts as a warning
        let boundary = today + chrono::Days::new(60);
        assert_eq!(
            ExpiryStatus::classify(Some(boundary), today),
            ExpiryStatus::Warning
        );

        let far = NaiveDate::from_ymd_opt(2027, 8, 6).unwrap();
        assert_eq!(
            ExpiryStatus::classify(Some(far), today),
            ExpiryStatus::Active
        );

        assert_eq!(ExpiryStatus::classify(None, today), ExpiryStatus::Active);
    }

    #[test]
    fn test_search_matches_name_and_batch_no() {
        let mut table = BatchTable::new(vec![
            batch(1, "Paracetamol", "BN-001"),
            batch(2, "Ibuprofen", "BN-002"),
        ]);

        table.set_search("paracet");
        assert_eq!(table.filtered().len(), 1);

        table.set_search("bn-002");
        assert_eq!(table.filtered().len(), 1);
        assert_eq!(
            table.filtered()[0].medicine_name.as_deref(),
            Some("Ibuprofen")
        );

        table.set_search("nothing");
        assert!(table.filtered().is_empty());
    }

    #[test]
    fn test_search_resets_page() {
        let mut table = table_with(12);
        table.next_page();
        assert_eq!(table.page(), 1);

        table.set_search("Medicine");
        assert_eq!(table.page(), 0);
    }

    #[test]
    fn test_pagination() {
        let mut table = table_with(12);
        assert_eq!(table.total_pages(), 3);
        assert_eq!(table.page_rows().len(), PAGE_SIZE);
        assert_eq!(table.page_bounds(), (1, 5, 12));

        table.next_page();
        table.next_page();
        assert_eq!(table.page(), 2);
        assert_eq!(table.page_rows().len(), 2);
        assert_eq!(table.page_bounds(), (11, 12, 12));

        // Clamped at the last page
        table.next_page();
        assert_eq!(table.page(), 2);

        table.prev_page();
        table.prev_page();
        table.prev_page();
        assert_eq!(table.page(), 0);
    }

    #[test]
    fn test_empty_table_bounds() {
        let table = BatchTable::new(vec![]);
        assert_eq!(table.total_pages(), 0);
        assert_eq!(table.page_bounds(), (0, 0, 0));
        assert!(table.page_rows().is_empty());
    }

    #[test]
    fn test_batch_serde_wire_names() {
        let json = r#"{
            "id": 3,
            "batchNo": "BN-010",
            "expiryDate": "2026-12-31",
            "qtyAvailable": 40,
            "medicineId": 5,
            "medicineName": "Paracetamol"
        }"#;
        let parsed: BatchDto = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.id, Some(BatchId::new(3)));
        assert_eq!(
            parsed.expiry_date,
            NaiveDate::from_ymd_opt(2026, 12, 31)
        );

        let out = serde_json::to_value(&parsed).unwrap();
        assert_eq!(out["batchNo"], "BN-010");
        assert_eq!(out["qtyAvailable"], 40);
    }
}
