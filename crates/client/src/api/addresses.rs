//! Delivery address book under `/api/address`.
//!
//! Address input is validated locally before any request is issued; the
//! gateway never sees a payload that would fail its own required-field
//! checks.

use serde::{Deserialize, Serialize};

use medicart_core::AddressId;

use crate::error::GatewayError;
use crate::gateway::GatewayClient;

/// A delivery address.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressDto {
    /// Server-assigned id; absent when creating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AddressId>,
    /// Recipient full name.
    #[serde(default)]
    pub name: String,
    /// Street address.
    #[serde(default)]
    pub street_address: String,
    /// Address line 1.
    #[serde(default)]
    pub address_line1: String,
    /// Address line 2 (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    /// City.
    #[serde(default)]
    pub city: String,
    /// State.
    #[serde(default)]
    pub state: String,
    /// Postal (PIN) code, six digits.
    #[serde(default)]
    pub postal_code: String,
    /// Country.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Contact phone, ten digits.
    #[serde(default)]
    pub phone: String,
    /// Whether this is the default delivery address.
    #[serde(default)]
    pub is_default: bool,
}

impl AddressDto {
    /// Validate the required fields the delivery form enforces: non-empty
    /// name, street address, address line 1, city, and state; a 10-digit
    /// phone; a 6-digit PIN code.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::InvalidInput` naming the first failed field.
    pub fn validate(&self) -> Result<(), GatewayError> {
        let required = [
            (self.name.trim(), "full name is required"),
            (self.street_address.trim(), "street address is required"),
            (self.address_line1.trim(), "address line 1 is required"),
            (self.city.trim(), "city is required"),
            (self.state.trim(), "state is required"),
        ];
        for (value, message) in required {
            if value.is_empty() {
                return Err(GatewayError::InvalidInput(message.to_owned()));
            }
        }

        if !is_digits(&self.phone, 10) {
            return Err(GatewayError::InvalidInput(
                "phone must be 10 digits".to_owned(),
            ));
        }
        if !is_digits(&self.postal_code, 6) {
            return Err(GatewayError::InvalidInput(
                "PIN code must be 6 digits".to_owned(),
            ));
        }
        Ok(())
    }
}

fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.chars().all(|c| c.is_ascii_digit())
}

impl GatewayClient {
    /// List the current user's addresses.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails.
    pub async fn list_addresses(&self) -> Result<Vec<AddressDto>, GatewayError> {
        self.get_json("/api/address").await
    }

    /// Fetch one address.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails.
    pub async fn get_address(&self, id: AddressId) -> Result<AddressDto, GatewayError> {
        self.get_json(&format!("/api/address/{id}")).await
    }

    /// Create an address. Validates locally first.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::InvalidInput` on a failed validation, or any
    /// pipeline error.
    pub async fn create_address(&self, address: &AddressDto) -> Result<AddressDto, GatewayError> {
        address.validate()?;
        self.post_json("/api/address", address).await
    }

    /// Update an address. Validates locally first.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::InvalidInput` on a failed validation, or any
    /// pipeline error.
    pub async fn update_address(
        &self,
        id: AddressId,
        address: &AddressDto,
    ) -> Result<AddressDto, GatewayError> {
        address.validate()?;
        self.put_json(&format!("/api/address/{id}"), address).await
    }

    /// Delete an address.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails.
    pub async fn delete_address(&self, id: AddressId) -> Result<(), GatewayError> {
        self.delete(&format!("/api/address/{id}")).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_address() -> AddressDto {
        AddressDto {
            name: "A Customer".to_owned(),
            street_address: "12 High Street".to_owned(),
            address_line1: "Flat 3".to_owned(),
            city: "Pune".to_owned(),
            state: "MH".to_owned(),
            postal_code: "411001".to_owned(),
            phone: "9876543210".to_owned(),
            ..AddressDto::default()
        }
    }

    #[test]
    fn test_valid_address_passes() {
        assert!(valid_address().validate().is_ok());
    }

    #[test]
    fn test_blank_required_field_fails() {
        let mut address = valid_address();
        address.city = "   ".to_owned();
        assert!(matches!(
            address.validate(),
            Err(GatewayError::InvalidInput(msg)) if msg.contains("city")
        ));
    }

    #[test]
    fn test_phone_must_be_ten_digits() {
        let mut address = valid_address();
        address.phone = "12345".to_owned();
        assert!(address.validate().is_err());

        address.phone = "98765432100".to_owned();
        assert!(address.validate().is_err());

        address.phone = "98765abc10".to_owned();
        assert!(address.validate().is_err());
    }

    #[test]
    fn test_pin_must_be_six_digits() {
        let mut address = valid_address();
        address.postal_code = "4110".to_owned();
        assert!(address.validate().is_err());
    }

    #[test]
    fn test_serde_wire_names() {
        let value = serde_json::to_value(valid_address()).unwrap();
        assert_eq!(value["streetAddress"], "12 High Street");
        assert_eq!(value["addressLine1"], "Flat 3");
        assert_eq!(value["postalCode"], "411001");
        assert_eq!(value["isDefault"], false);
    }
}
