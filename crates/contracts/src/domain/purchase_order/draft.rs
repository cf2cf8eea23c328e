use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Free-text bank fields attached to the selected bank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BankDetail {
    /// Selected bank id; 0 means no selection.
    pub bank_id: i64,
    pub branch: String,
    pub account: String,
    pub routing: String,
}

/// The editable in-memory representation of one purchase order.
///
/// Dates are kept as `YYYY-MM-DD` strings (or empty) so they bind directly
/// to date inputs; the submission translator turns them into ISO timestamps
/// or null. No chronological ordering between the date fields is enforced
/// anywhere, mirroring the backend.
///
/// `passthrough` holds backend fields the client does not understand, keyed
/// by their original names, so a fetch-edit-save cycle does not drop them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    /// Backend id; `None` until the first save.
    pub internal_id: Option<i64>,
    /// Unique across all orders once set; checked asynchronously while typing.
    pub customer_po_number: String,

    pub customer: String,
    pub supplier: String,
    pub merchants: Vec<String>,
    pub inquiry: String,

    pub proceedings: String,
    pub order_type: String,
    pub transaction: String,
    pub version: String,

    /// Derived from the selected customer; read-only in the form.
    pub commission: f64,

    pub placement_date: String,
    pub eta_date: String,
    pub eta_new_jersey_date: String,
    pub buyer_ship_initial_date: String,
    pub buyer_ship_last_date: String,
    pub vendor_ship_initial_date: String,
    pub vendor_ship_last_date: String,
    pub final_inspection_date: String,

    pub product_portfolio: String,
    pub product_category: String,
    pub product_group: String,
    pub fabric: String,
    pub construction: String,
    pub brand: String,
    pub payment_mode: String,
    pub delivery_type: String,
    pub shipment_mode: String,
    pub ratio: String,
    pub po_special_instructions: String,
    pub costing_ref_no: String,
    pub ams_ref_no: String,

    /// Comma-joined distinct style numbers, written back from the line items.
    pub style_summary: String,
    pub total_quantity: i64,
    pub total_value: f64,
    pub total_ldp_value: f64,

    pub bank: BankDetail,

    pub passthrough: BTreeMap<String, Value>,
}

impl OrderDraft {
    pub fn is_new(&self) -> bool {
        self.internal_id.is_none()
    }
}
