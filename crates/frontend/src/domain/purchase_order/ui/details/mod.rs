pub mod cascade;
pub mod line_items;
pub mod po_check;
pub mod view;
pub mod view_model;

use serde_json::Value;

pub use view::PurchaseOrderDetails;

/// How the details form was opened. Edit and Copy carry the raw list row as
/// a degraded-prefill fallback for when the full fetch fails.
#[derive(Clone)]
pub enum DetailsMode {
    New,
    Edit { id: i64, fallback: Value },
    Copy { id: i64, fallback: Value },
}
