//! Product record row and draft types.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored product record. `id` and `created_at` are assigned at insert
/// time and never change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i64,
    pub product_name: String,
    pub fg_part: String,
    pub fg_part_rev: String,
    pub pcb_part: String,
    pub pcb_part_rev: String,
    pub smd_top: String,
    pub smd_top_rev: String,
    pub smd_bottom: String,
    pub smd_bottom_rev: String,
    pub sw_wrapper: String,
    pub sw_wrapper_rev: String,
    pub ecu_version: String,
    pub checksum: String,
    pub proto_number: Option<i64>,
    pub status: String,
    pub remark: String,
    pub created_at: String,
}

/// Fields supplied by the caller when creating a product.
///
/// The proto number arrives as a string (it is keyed in like every other
/// field) and is converted to an integer once it validates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewProduct {
    pub product_name: String,
    pub fg_part: String,
    pub fg_part_rev: String,
    pub pcb_part: String,
    pub pcb_part_rev: String,
    pub smd_top: String,
    pub smd_top_rev: String,
    pub smd_bottom: String,
    pub smd_bottom_rev: String,
    pub sw_wrapper: String,
    pub sw_wrapper_rev: String,
    pub ecu_version: String,
    pub checksum: String,
    pub proto_number: Option<String>,
    pub status: String,
    pub remark: String,
}

impl NewProduct {
    /// A copy with leading/trailing whitespace stripped from every field.
    pub fn trimmed(&self) -> NewProduct {
        NewProduct {
            product_name: self.product_name.trim().to_string(),
            fg_part: self.fg_part.trim().to_string(),
            fg_part_rev: self.fg_part_rev.trim().to_string(),
            pcb_part: self.pcb_part.trim().to_string(),
            pcb_part_rev: self.pcb_part_rev.trim().to_string(),
            smd_top: self.smd_top.trim().to_string(),
            smd_top_rev: self.smd_top_rev.trim().to_string(),
            smd_bottom: self.smd_bottom.trim().to_string(),
            smd_bottom_rev: self.smd_bottom_rev.trim().to_string(),
            sw_wrapper: self.sw_wrapper.trim().to_string(),
            sw_wrapper_rev: self.sw_wrapper_rev.trim().to_string(),
            ecu_version: self.ecu_version.trim().to_string(),
            checksum: self.checksum.trim().to_string(),
            proto_number: self
                .proto_number
                .as_ref()
                .map(|p| p.trim().to_string()),
            status: self.status.trim().to_string(),
            remark: self.remark.trim().to_string(),
        }
    }
}
