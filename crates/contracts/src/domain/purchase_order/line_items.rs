//! Line-item expansion and totals.
//!
//! A (style, size-range) entry expands into one row per concrete size; the
//! value columns are always derived from quantity and price and are never
//! edited directly.

use crate::domain::reference::SizeRange;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// What the user types into the "add line item" strip of the dialog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItemEntry {
    pub style_no: String,
    pub colorway: String,
    pub product_code: String,
    pub size_range: String,
    pub item_price: f64,
    pub ldp_price: f64,
}

/// One concrete (style, colorway, size) row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemRow {
    /// Client-side key; stable across edits so list rendering stays keyed.
    pub key: Uuid,
    pub style_no: String,
    pub colorway: String,
    pub product_code: String,
    pub size: String,
    pub quantity: i64,
    pub item_price: f64,
    pub value: f64,
    pub ldp_price: f64,
    pub ldp_value: f64,
}

impl LineItemRow {
    /// Recompute the derived value columns for a quantity edit. Pure and
    /// synchronous; negative input clamps to zero.
    pub fn set_quantity(&mut self, quantity: i64) {
        self.quantity = quantity.max(0);
        self.value = round2(self.quantity as f64 * self.item_price);
        self.ldp_value = round2(self.quantity as f64 * self.ldp_price);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LineItemTotals {
    pub quantity: i64,
    pub value: f64,
    pub ldp_value: f64,
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Expand an entry into one row per concrete size of its size range.
///
/// A size range with no registered sizes (or one the reference table does
/// not know at all) degrades to a single row whose size is the range string
/// itself, rather than producing zero rows.
pub fn expand_entry(entry: &LineItemEntry, size_ranges: &[SizeRange]) -> Vec<LineItemRow> {
    let sizes: Vec<String> = size_ranges
        .iter()
        .find(|r| r.name.trim() == entry.size_range.trim())
        .map(|r| r.sizes.clone())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| vec![entry.size_range.clone()]);

    sizes
        .into_iter()
        .map(|size| LineItemRow {
            key: Uuid::new_v4(),
            style_no: entry.style_no.clone(),
            colorway: entry.colorway.clone(),
            product_code: entry.product_code.clone(),
            size,
            quantity: 0,
            item_price: entry.item_price,
            value: 0.0,
            ldp_price: entry.ldp_price,
            ldp_value: 0.0,
        })
        .collect()
}

/// Sum quantity and both value columns across all rows. The single source of
/// truth for the totals display and the header write-back.
pub fn totals(rows: &[LineItemRow]) -> LineItemTotals {
    let quantity = rows.iter().map(|r| r.quantity).sum();
    let value = round2(rows.iter().map(|r| r.value).sum());
    let ldp_value = round2(rows.iter().map(|r| r.ldp_value).sum());
    LineItemTotals {
        quantity,
        value,
        ldp_value,
    }
}

/// Comma-joined distinct style numbers, in first-seen order. Written back
/// into the order header's style field.
pub fn style_summary(rows: &[LineItemRow]) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for row in rows {
        let style = row.style_no.trim();
        if !style.is_empty() && !seen.contains(&style) {
            seen.push(style);
        }
    }
    seen.join(",")
}

fn num(v: &Value, key: &str) -> f64 {
    match v.get(key) {
        Some(Value::Number(n)) => n.as_f64().filter(|f| f.is_finite()).unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().ok().filter(|f: &f64| f.is_finite()).unwrap_or(0.0),
        _ => 0.0,
    }
}

fn text(v: &Value, key: &str) -> String {
    v.get(key).and_then(|x| x.as_str()).unwrap_or("").to_string()
}

/// Hydrate rows from a fetched order's `orderDetails` array. Value columns
/// are recomputed rather than trusted, so the derived-field invariant holds
/// from the first render.
pub fn rows_from_backend(details: &Value) -> Vec<LineItemRow> {
    details
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|v| {
                    let mut row = LineItemRow {
                        key: Uuid::new_v4(),
                        style_no: text(v, "styleNo"),
                        colorway: text(v, "colorway"),
                        product_code: text(v, "productCode"),
                        size: text(v, "size"),
                        quantity: 0,
                        item_price: num(v, "itemPrice"),
                        value: 0.0,
                        ldp_price: num(v, "ldpPrice"),
                        ldp_value: 0.0,
                    };
                    row.set_quantity(num(v, "quantity") as i64);
                    row
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Both save actions reject an empty row set before any network call.
pub fn validate_rows(rows: &[LineItemRow]) -> Result<(), String> {
    if rows.is_empty() {
        Err("Add at least one line item before saving".to_string())
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reference::SizeRange;

    fn entry(style: &str, range: &str, price: f64, ldp: f64) -> LineItemEntry {
        LineItemEntry {
            style_no: style.to_string(),
            colorway: "Indigo".to_string(),
            product_code: "PC-01".to_string(),
            size_range: range.to_string(),
            item_price: price,
            ldp_price: ldp,
        }
    }

    fn ranges() -> Vec<SizeRange> {
        vec![
            SizeRange::new(1, "S-XL", vec!["S".into(), "M".into(), "L".into(), "XL".into()]),
            SizeRange::new(2, "OS", vec![]),
        ]
    }

    #[test]
    fn test_expand_one_row_per_size() {
        let rows = expand_entry(&entry("ST-9", "S-XL", 2.93, 3.15), &ranges());
        assert_eq!(rows.len(), 4);
        let sizes: Vec<&str> = rows.iter().map(|r| r.size.as_str()).collect();
        assert_eq!(sizes, vec!["S", "M", "L", "XL"]);
        for row in &rows {
            assert_eq!(row.quantity, 0);
            assert_eq!(row.value, 0.0);
            assert_eq!(row.ldp_value, 0.0);
        }
    }

    #[test]
    fn test_expand_degrades_to_single_row() {
        // Registered but without sizes.
        let rows = expand_entry(&entry("ST-9", "OS", 5.0, 5.5), &ranges());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].size, "OS");

        // Not registered at all.
        let rows = expand_entry(&entry("ST-9", "38-44", 5.0, 5.5), &ranges());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].size, "38-44");
    }

    #[test]
    fn test_quantity_edit_recomputes_values() {
        let mut rows = expand_entry(&entry("ST-9", "S-XL", 2.93, 3.15), &ranges());
        rows[0].set_quantity(672);
        assert_eq!(rows[0].value, round2(672.0 * 2.93));
        assert_eq!(rows[0].ldp_value, round2(672.0 * 3.15));

        rows[0].set_quantity(-5);
        assert_eq!(rows[0].quantity, 0);
        assert_eq!(rows[0].value, 0.0);
    }

    #[test]
    fn test_size_range_scenario_totals() {
        let mut rows = expand_entry(&entry("ST-9", "S-XL", 2.93, 3.15), &ranges());
        for (row, qty) in rows.iter_mut().zip([672i64, 480, 672, 432]) {
            row.set_quantity(qty);
        }
        let t = totals(&rows);
        assert_eq!(t.quantity, 2256);
        assert_eq!(t.value, round2(2256.0 * 2.93));
        assert_eq!(t.ldp_value, round2(2256.0 * 3.15));
    }

    #[test]
    fn test_totals_match_row_sums_over_edit_sequence() {
        let mut rows = expand_entry(&entry("ST-9", "S-XL", 1.37, 1.52), &ranges());
        rows[1].set_quantity(100);
        rows[1].set_quantity(240);
        rows[3].set_quantity(60);
        let t = totals(&rows);
        let row_sum: f64 = rows.iter().map(|r| r.value).sum();
        assert_eq!(t.value, round2(row_sum));
        assert_eq!(t.quantity, 300);
    }

    #[test]
    fn test_style_summary_distinct_in_order() {
        let mut rows = expand_entry(&entry("ST-9", "S-XL", 1.0, 1.0), &ranges());
        rows.extend(expand_entry(&entry("ST-2", "OS", 2.0, 2.0), &ranges()));
        rows.extend(expand_entry(&entry("ST-9", "OS", 1.0, 1.0), &ranges()));
        assert_eq!(style_summary(&rows), "ST-9,ST-2");
    }

    #[test]
    fn test_rows_from_backend_recomputes_values() {
        let details = serde_json::json!([
            {"styleNo": "ST-9", "colorway": "Indigo", "productCode": "PC-01",
             "size": "M", "quantity": "480", "itemPrice": 2.93,
             "ldpPrice": 3.15, "value": 9999.0}
        ]);
        let rows = rows_from_backend(&details);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].quantity, 480);
        // Stored value column is recomputed, not trusted.
        assert_eq!(rows[0].value, round2(480.0 * 2.93));
        assert_eq!(rows_from_backend(&serde_json::Value::Null).len(), 0);
    }

    #[test]
    fn test_validate_rejects_empty_rows() {
        assert!(validate_rows(&[]).is_err());
        let rows = expand_entry(&entry("ST-9", "OS", 1.0, 1.0), &ranges());
        assert!(validate_rows(&rows).is_ok());
    }
}
