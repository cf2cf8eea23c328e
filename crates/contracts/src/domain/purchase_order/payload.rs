//! Submission translator: canonical draft -> exact wire payload.
//!
//! The backend is strict in awkward ways: it rejects empty date strings but
//! accepts null, requires the attachment scalar fields as non-null strings,
//! and wants display-name selections resolved back to numeric ids. All of
//! that lives here, behind total functions.

use super::draft::OrderDraft;
use super::line_items::{style_summary, totals, LineItemRow};
use super::mapping::{
    self, backend_record, BINARY_FIELDS, IMAGE_NAME_FIELDS, ORDER_DETAILS,
};
use crate::domain::reference::{find_id, ReferenceOption};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::NaiveDate;
use serde_json::{json, Map, Value};

/// One named attachment slot. Content is a bare base64 string, produced only
/// at submission time; an empty content string means "no file".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attachment {
    pub name: String,
    pub content: String,
}

impl Attachment {
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// The five independent attachment slots of an order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttachmentSet {
    pub po_image: Attachment,
    pub product_image: Attachment,
    pub final_specs: Attachment,
    pub pp_comment: Attachment,
    pub size_set_comment: Attachment,
}

impl AttachmentSet {
    fn slots(&self) -> [&Attachment; 5] {
        [
            &self.po_image,
            &self.product_image,
            &self.final_specs,
            &self.pp_comment,
            &self.size_set_comment,
        ]
    }
}

/// The currently loaded option lists needed to resolve display names back to
/// ids at submission time.
#[derive(Debug, Clone, Default)]
pub struct ResolveContext {
    pub customers: Vec<ReferenceOption>,
    pub suppliers: Vec<ReferenceOption>,
    pub merchants: Vec<ReferenceOption>,
    pub inquiries: Vec<ReferenceOption>,
}

/// Parse-or-zero numeric rule for anything user-typed. Never NaN.
pub fn parse_or_zero(input: &str) -> f64 {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Integer variant of the parse-or-zero rule.
pub fn parse_or_zero_int(input: &str) -> i64 {
    input.trim().parse::<i64>().unwrap_or(0)
}

fn finite(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Serialize a form date (`YYYY-MM-DD`, possibly already carrying a time
/// part) as a full ISO-8601 timestamp, or null when absent or unparseable.
/// The backend rejects empty date strings but accepts null.
pub fn iso_or_null(date: &str) -> Value {
    let date_part = date.trim().split('T').next().unwrap_or("");
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(d) => json!(format!("{}T00:00:00.000Z", d.format("%Y-%m-%d"))),
        Err(_) => Value::Null,
    }
}

/// Strip a `data:*;base64,` prefix, leaving the bare base64 content.
pub fn strip_data_uri(content: &str) -> &str {
    match content.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => content,
    }
}

/// Encode raw file bytes for an attachment field.
pub fn encode_attachment(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Resolve a display-name selection against a loaded option list; an
/// unresolved name defaults to 0, never an error.
pub fn resolve_id(name: &str, options: &[ReferenceOption]) -> i64 {
    find_id(options, name).unwrap_or(0)
}

fn base_record(draft: &OrderDraft, ctx: &ResolveContext) -> Map<String, Value> {
    let mut obj = match backend_record(draft) {
        Value::Object(obj) => obj,
        _ => Map::new(),
    };

    for (aliases, value) in [
        (mapping::PLACEMENT_DATE, &draft.placement_date),
        (mapping::ETA_DATE, &draft.eta_date),
        (mapping::ETA_NEW_JERSEY_DATE, &draft.eta_new_jersey_date),
        (mapping::BUYER_SHIP_INITIAL_DATE, &draft.buyer_ship_initial_date),
        (mapping::BUYER_SHIP_LAST_DATE, &draft.buyer_ship_last_date),
        (mapping::VENDOR_SHIP_INITIAL_DATE, &draft.vendor_ship_initial_date),
        (mapping::VENDOR_SHIP_LAST_DATE, &draft.vendor_ship_last_date),
        (mapping::FINAL_INSPECTION_DATE, &draft.final_inspection_date),
    ] {
        obj.insert(aliases[0].to_string(), iso_or_null(value));
    }

    obj.insert("commission".to_string(), json!(finite(draft.commission)));
    obj.insert(
        "customerId".to_string(),
        json!(resolve_id(&draft.customer, &ctx.customers)),
    );
    obj.insert(
        "supplierId".to_string(),
        json!(resolve_id(&draft.supplier, &ctx.suppliers)),
    );
    obj.insert(
        "inquiryId".to_string(),
        json!(resolve_id(&draft.inquiry, &ctx.inquiries)),
    );
    let merchant_ids = draft
        .merchants
        .iter()
        .map(|m| resolve_id(m, &ctx.merchants).to_string())
        .collect::<Vec<_>>()
        .join(",");
    obj.insert("merchantIds".to_string(), json!(merchant_ids));

    obj
}

fn line_item_value(row: &LineItemRow) -> Value {
    json!({
        "styleNo": row.style_no,
        "colorway": row.colorway,
        "productCode": row.product_code,
        "size": row.size,
        "quantity": row.quantity,
        "itemPrice": finite(row.item_price),
        "value": finite(row.value),
        "ldpPrice": finite(row.ldp_price),
        "ldpValue": finite(row.ldp_value),
    })
}

/// Full create/update payload from the form: dates as ISO-or-null, names
/// resolved to ids, attachments inline, totals and the style summary
/// recomputed from the rows actually being submitted.
pub fn build_order_payload(
    draft: &OrderDraft,
    rows: &[LineItemRow],
    attachments: &AttachmentSet,
    ctx: &ResolveContext,
) -> Value {
    let mut obj = base_record(draft, ctx);

    for (i, slot) in attachments.slots().iter().enumerate() {
        obj.insert(
            BINARY_FIELDS[i].to_string(),
            json!(strip_data_uri(&slot.content)),
        );
        obj.insert(IMAGE_NAME_FIELDS[i].to_string(), json!(slot.name));
    }

    let t = totals(rows);
    obj.insert("styleNo".to_string(), json!(style_summary(rows)));
    obj.insert("totalQty".to_string(), json!(t.quantity));
    obj.insert("totalValue".to_string(), json!(finite(t.value)));
    obj.insert("totalLDPValue".to_string(), json!(finite(t.ldp_value)));
    obj.insert(
        ORDER_DETAILS.to_string(),
        Value::Array(rows.iter().map(line_item_value).collect()),
    );

    Value::Object(obj)
}

/// Bulk-grid payload variant: the grid never carries attachment state, so
/// binary fields are stripped entirely while the image-adjacent scalars the
/// backend requires are force-included as empty strings.
pub fn build_grid_payload(draft: &OrderDraft, ctx: &ResolveContext) -> Value {
    let mut obj = base_record(draft, ctx);

    for field in BINARY_FIELDS {
        obj.remove(*field);
    }
    for field in IMAGE_NAME_FIELDS {
        obj.entry(field.to_string()).or_insert_with(|| json!(""));
    }

    Value::Object(obj)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::purchase_order::line_items::{expand_entry, LineItemEntry};
    use crate::domain::reference::SizeRange;

    fn ctx() -> ResolveContext {
        ResolveContext {
            customers: vec![ReferenceOption::new(4, "Acme Retail")],
            suppliers: vec![ReferenceOption::new(11, "Delta Knitwear")],
            merchants: vec![
                ReferenceOption::new(21, "A. Rivera"),
                ReferenceOption::new(22, "K. Osei"),
            ],
            inquiries: vec![ReferenceOption::new(31, "INQ-77")],
        }
    }

    fn draft() -> OrderDraft {
        let mut d = OrderDraft::default();
        d.customer_po_number = "PO-2025-0147".to_string();
        d.customer = "Acme Retail".to_string();
        d.supplier = "Delta Knitwear".to_string();
        d.merchants = vec!["A. Rivera".to_string(), "Unknown".to_string()];
        d.inquiry = "INQ-77".to_string();
        d.placement_date = "2025-04-01".to_string();
        d.eta_date = "not a date".to_string();
        d
    }

    #[test]
    fn test_parse_or_zero_never_nan() {
        assert_eq!(parse_or_zero("abc"), 0.0);
        assert_eq!(parse_or_zero(""), 0.0);
        assert_eq!(parse_or_zero("  12.5 "), 12.5);
        assert_eq!(parse_or_zero("NaN"), 0.0);
        assert_eq!(parse_or_zero_int("abc"), 0);
        assert_eq!(parse_or_zero_int("42"), 42);
    }

    #[test]
    fn test_iso_or_null() {
        assert_eq!(iso_or_null(""), Value::Null);
        assert_eq!(iso_or_null("garbage"), Value::Null);
        assert_eq!(iso_or_null("2025-04-01"), json!("2025-04-01T00:00:00.000Z"));
        // Already-ISO input keeps only the date part.
        assert_eq!(
            iso_or_null("2025-04-01T08:30:00Z"),
            json!("2025-04-01T00:00:00.000Z")
        );
    }

    #[test]
    fn test_strip_data_uri() {
        assert_eq!(strip_data_uri("data:image/png;base64,AAAA"), "AAAA");
        assert_eq!(strip_data_uri("AAAA"), "AAAA");
        assert_eq!(encode_attachment(b"hi"), "aGk=");
    }

    #[test]
    fn test_id_resolution_defaults_to_zero() {
        let c = ctx();
        assert_eq!(resolve_id("Acme Retail", &c.customers), 4);
        assert_eq!(resolve_id("Nobody", &c.customers), 0);
        assert_eq!(resolve_id("", &c.customers), 0);
    }

    #[test]
    fn test_full_payload_shape() {
        let ranges = vec![SizeRange::new(1, "S-XL", vec!["S".into(), "M".into(), "L".into(), "XL".into()])];
        let mut rows = expand_entry(
            &LineItemEntry {
                style_no: "ST-9".to_string(),
                size_range: "S-XL".to_string(),
                item_price: 2.93,
                ldp_price: 3.15,
                ..Default::default()
            },
            &ranges,
        );
        for (row, qty) in rows.iter_mut().zip([672i64, 480, 672, 432]) {
            row.set_quantity(qty);
        }

        let mut attachments = AttachmentSet::default();
        attachments.po_image = Attachment {
            name: "po.png".to_string(),
            content: "data:image/png;base64,QUJD".to_string(),
        };

        let payload = build_order_payload(&draft(), &rows, &attachments, &ctx());

        assert_eq!(payload["customerId"], json!(4));
        assert_eq!(payload["supplierId"], json!(11));
        // Unresolved merchant resolves to 0, not an error.
        assert_eq!(payload["merchantIds"], json!("21,0"));
        assert_eq!(payload["inquiryId"], json!(31));
        assert_eq!(payload["placementDate"], json!("2025-04-01T00:00:00.000Z"));
        assert_eq!(payload["etaDate"], Value::Null);
        assert_eq!(payload["etanjDate"], Value::Null);
        assert_eq!(payload["pO_Image"], json!("QUJD"));
        assert_eq!(payload["pO_ImageName"], json!("po.png"));
        // Missing slots serialize as empty strings, not null.
        assert_eq!(payload["productImage"], json!(""));
        assert_eq!(payload["orderDetails"].as_array().map(|a| a.len()), Some(4));
        assert_eq!(payload["totalQty"], json!(2256));
        assert_eq!(payload["totalValue"], json!((2256.0f64 * 2.93 * 100.0).round() / 100.0));
        assert_eq!(payload["styleNo"], json!("ST-9"));
    }

    #[test]
    fn test_payload_numbers_are_finite() {
        let mut d = draft();
        d.commission = f64::NAN;
        let payload = build_order_payload(&d, &[], &AttachmentSet::default(), &ctx());
        assert_eq!(payload["commission"], json!(0.0));
    }

    #[test]
    fn test_grid_payload_strips_binary_and_forces_scalars() {
        let payload = build_grid_payload(&draft(), &ctx());
        for field in BINARY_FIELDS {
            assert!(payload.get(*field).is_none(), "{} should be stripped", field);
        }
        for field in IMAGE_NAME_FIELDS {
            assert_eq!(payload[*field], json!(""), "{} should be forced empty", field);
        }
        assert!(payload.get(ORDER_DETAILS).is_none());
        assert_eq!(payload["customerId"], json!(4));
    }
}
