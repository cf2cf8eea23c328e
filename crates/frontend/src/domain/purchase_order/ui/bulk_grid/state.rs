//! Pure grid state: editable columns, fill-down, and the save-all summary.

use contracts::domain::purchase_order::draft::OrderDraft;
use contracts::domain::purchase_order::mapping::canonical_draft;
use serde_json::Value;
use uuid::Uuid;

/// Editable grid columns. Cell values are the draft's own strings, so the
/// accessors stay total in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridField {
    Customer,
    Supplier,
    PaymentMode,
    DeliveryType,
    ShipmentMode,
    PlacementDate,
    EtaDate,
    BuyerShipLastDate,
    VendorShipLastDate,
    Ratio,
    SpecialInstructions,
}

impl GridField {
    pub const ALL: [GridField; 11] = [
        GridField::Customer,
        GridField::Supplier,
        GridField::PaymentMode,
        GridField::DeliveryType,
        GridField::ShipmentMode,
        GridField::PlacementDate,
        GridField::EtaDate,
        GridField::BuyerShipLastDate,
        GridField::VendorShipLastDate,
        GridField::Ratio,
        GridField::SpecialInstructions,
    ];

    pub fn label(self) -> &'static str {
        match self {
            GridField::Customer => "Customer",
            GridField::Supplier => "Supplier",
            GridField::PaymentMode => "Payment mode",
            GridField::DeliveryType => "Delivery type",
            GridField::ShipmentMode => "Shipment mode",
            GridField::PlacementDate => "Placement",
            GridField::EtaDate => "ETA",
            GridField::BuyerShipLastDate => "Buyer ship (last)",
            GridField::VendorShipLastDate => "Vendor ship (last)",
            GridField::Ratio => "Ratio",
            GridField::SpecialInstructions => "Special instructions",
        }
    }

    pub fn is_date(self) -> bool {
        matches!(
            self,
            GridField::PlacementDate
                | GridField::EtaDate
                | GridField::BuyerShipLastDate
                | GridField::VendorShipLastDate
        )
    }

    pub fn get(self, d: &OrderDraft) -> String {
        match self {
            GridField::Customer => d.customer.clone(),
            GridField::Supplier => d.supplier.clone(),
            GridField::PaymentMode => d.payment_mode.clone(),
            GridField::DeliveryType => d.delivery_type.clone(),
            GridField::ShipmentMode => d.shipment_mode.clone(),
            GridField::PlacementDate => d.placement_date.clone(),
            GridField::EtaDate => d.eta_date.clone(),
            GridField::BuyerShipLastDate => d.buyer_ship_last_date.clone(),
            GridField::VendorShipLastDate => d.vendor_ship_last_date.clone(),
            GridField::Ratio => d.ratio.clone(),
            GridField::SpecialInstructions => d.po_special_instructions.clone(),
        }
    }

    pub fn set(self, d: &mut OrderDraft, value: String) {
        match self {
            GridField::Customer => d.customer = value,
            GridField::Supplier => d.supplier = value,
            GridField::PaymentMode => d.payment_mode = value,
            GridField::DeliveryType => d.delivery_type = value,
            GridField::ShipmentMode => d.shipment_mode = value,
            GridField::PlacementDate => d.placement_date = value,
            GridField::EtaDate => d.eta_date = value,
            GridField::BuyerShipLastDate => d.buyer_ship_last_date = value,
            GridField::VendorShipLastDate => d.vendor_ship_last_date = value,
            GridField::Ratio => d.ratio = value,
            GridField::SpecialInstructions => d.po_special_instructions = value,
        }
    }
}

/// Per-row save state after (or during) a save-all run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Pending,
    Saving,
    Saved,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridRow {
    pub key: Uuid,
    pub draft: OrderDraft,
    pub outcome: RowOutcome,
}

/// Build grid rows from the raw list rows behind a selection. Rows without
/// a backend id cannot be updated and are skipped.
pub fn rows_from_selection(raw_rows: &[Value]) -> Vec<GridRow> {
    raw_rows
        .iter()
        .map(canonical_draft)
        .filter(|d| d.internal_id.is_some())
        .map(|draft| GridRow {
            key: Uuid::new_v4(),
            draft,
            outcome: RowOutcome::Pending,
        })
        .collect()
}

/// Copy one cell's value into the same column of every row below it. Rows
/// above the source row are untouched.
pub fn fill_down(rows: &mut [GridRow], from_index: usize, field: GridField) {
    if from_index >= rows.len() {
        return;
    }
    let value = field.get(&rows[from_index].draft);
    for row in rows.iter_mut().skip(from_index + 1) {
        field.set(&mut row.draft, value.clone());
        if row.outcome != RowOutcome::Pending {
            row.outcome = RowOutcome::Pending;
        }
    }
}

/// "Saved X of Y" summary for a finished save-all run.
pub fn summarize(rows: &[GridRow]) -> String {
    let saved = rows
        .iter()
        .filter(|r| r.outcome == RowOutcome::Saved)
        .count();
    format!("Saved {} of {}", saved, rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows() -> Vec<GridRow> {
        rows_from_selection(&[
            json!({"poid": 1, "pono": "A", "customerName": "Acme Retail"}),
            json!({"poid": 2, "pono": "B", "customerName": "Northline"}),
            json!({"poid": 3, "pono": "C"}),
        ])
    }

    #[test]
    fn test_rows_from_selection_skips_unsaved() {
        let built = rows_from_selection(&[
            json!({"poid": 1, "pono": "A"}),
            json!({"pono": "draft-only"}),
        ]);
        assert_eq!(built.len(), 1);
        assert_eq!(built[0].draft.internal_id, Some(1));
        assert_eq!(built[0].outcome, RowOutcome::Pending);
    }

    #[test]
    fn test_fill_down_copies_below_only() {
        let mut grid = rows();
        fill_down(&mut grid, 1, GridField::Customer);
        assert_eq!(grid[0].draft.customer, "Acme Retail");
        assert_eq!(grid[1].draft.customer, "Northline");
        assert_eq!(grid[2].draft.customer, "Northline");

        // Source row out of range is a no-op.
        fill_down(&mut grid, 9, GridField::Customer);
    }

    #[test]
    fn test_fill_down_resets_outcome_of_touched_rows() {
        let mut grid = rows();
        grid[2].outcome = RowOutcome::Failed("boom".to_string());
        fill_down(&mut grid, 0, GridField::Ratio);
        assert_eq!(grid[2].outcome, RowOutcome::Pending);
    }

    #[test]
    fn test_field_get_set_round_trip() {
        let mut draft = OrderDraft::default();
        for field in GridField::ALL {
            field.set(&mut draft, format!("v-{}", field.label()));
            assert_eq!(field.get(&draft), format!("v-{}", field.label()));
        }
    }

    #[test]
    fn test_summarize_counts_saved() {
        let mut grid = rows();
        grid[0].outcome = RowOutcome::Saved;
        grid[1].outcome = RowOutcome::Failed("duplicate".to_string());
        grid[2].outcome = RowOutcome::Saved;
        assert_eq!(summarize(&grid), "Saved 2 of 3");
    }
}
