//! Pure state and row-shaping helpers for the orders list.

use contracts::domain::purchase_order::mapping::canonical_draft;
use serde_json::Value;
use std::collections::BTreeSet;

/// What the list table shows for one raw backend row. The raw rows are kept
/// alongside because edit/copy/bulk flows hand them on unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderRowDisplay {
    pub id: Option<i64>,
    pub po_number: String,
    pub customer: String,
    pub supplier: String,
    pub style_summary: String,
    pub placement_date: String,
    pub total_quantity: i64,
    pub total_value: f64,
    pub status: String,
}

/// Shape a raw list row for display. Unknown or missing fields come out as
/// empty strings and zeros, never an error.
pub fn display_row(raw: &Value) -> OrderRowDisplay {
    let draft = canonical_draft(raw);
    OrderRowDisplay {
        id: draft.internal_id,
        po_number: draft.customer_po_number,
        customer: draft.customer,
        supplier: draft.supplier,
        style_summary: draft.style_summary,
        placement_date: draft.placement_date,
        total_quantity: draft.total_quantity,
        total_value: draft.total_value,
        status: raw
            .get("status")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string(),
    }
}

pub fn toggle_selection(selected: &mut BTreeSet<i64>, id: i64) {
    if !selected.remove(&id) {
        selected.insert(id);
    }
}

/// The raw rows behind the current selection, in list order.
pub fn selected_rows(items: &[Value], selected: &BTreeSet<i64>) -> Vec<Value> {
    items
        .iter()
        .filter(|raw| display_row(raw).id.is_some_and(|id| selected.contains(&id)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_row_tolerates_sparse_records() {
        let row = display_row(&json!({
            "poid": 7,
            "pono": "PO-2025-0147",
            "customerName": "Acme Retail",
            "status": "Open",
            "totalQty": "120"
        }));
        assert_eq!(row.id, Some(7));
        assert_eq!(row.po_number, "PO-2025-0147");
        assert_eq!(row.customer, "Acme Retail");
        assert_eq!(row.status, "Open");
        assert_eq!(row.total_quantity, 120);
        assert_eq!(row.supplier, "");

        let empty = display_row(&json!({}));
        assert_eq!(empty.id, None);
        assert_eq!(empty.total_value, 0.0);
    }

    #[test]
    fn test_toggle_selection() {
        let mut selected = BTreeSet::new();
        toggle_selection(&mut selected, 7);
        assert!(selected.contains(&7));
        toggle_selection(&mut selected, 7);
        assert!(selected.is_empty());
    }

    #[test]
    fn test_selected_rows_keeps_list_order() {
        let items = vec![
            json!({"poid": 1, "pono": "A"}),
            json!({"poid": 2, "pono": "B"}),
            json!({"poid": 3, "pono": "C"}),
        ];
        let selected = BTreeSet::from([3, 1]);
        let rows = selected_rows(&items, &selected);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["poid"], json!(1));
        assert_eq!(rows[1]["poid"], json!(3));
    }
}
