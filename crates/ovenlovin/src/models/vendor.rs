use chrono::Utc;
use serde::Deserialize;

use ovenlovin_core::pantry::Vendor;
use ovenlovin_core::serde::deserialize_optional_string;

/// Request payload for updating a vendor profile. Absent fields keep their
/// current values.
#[derive(Debug, Deserialize)]
pub struct UpdateVendor {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub hours: Option<String>,
}

impl UpdateVendor {
    pub fn apply_to(self, vendor: &mut Vendor) {
        if let Some(name) = self.name {
            vendor.name = name;
        }
        if let Some(address) = self.address {
            vendor.address = address;
        }
        if let Some(hours) = self.hours {
            vendor.hours = hours;
        }
        vendor.updated_at = Utc::now();
    }
}
