//! Field mapping between backend records and the canonical draft.
//!
//! The backend's field names are inconsistent (`pO_Special_Instructions`,
//! `ration`, `etanjDate`, ...) and several fields arrive under more than one
//! name depending on the endpoint. Each canonical field therefore carries a
//! priority-ordered alias list: on intake the first non-empty alias wins, on
//! write-back the first alias is the name the backend gets.
//!
//! Both directions are total. Unknown backend fields are kept verbatim in the
//! draft's passthrough bag so a fetch-edit-save cycle does not drop data the
//! client does not understand.

use super::draft::{BankDetail, OrderDraft};
use once_cell::sync::Lazy;
use serde_json::{json, Map, Value};
use std::collections::BTreeSet;

pub const INTERNAL_ID: &[&str] = &["poid", "id"];
pub const CUSTOMER_PO_NUMBER: &[&str] =
    &["customerPoNumber", "pono", "customer_PO_Number", "pO_Number"];
pub const CUSTOMER: &[&str] = &["customerName", "buyer"];
pub const SUPPLIER: &[&str] = &["supplierName", "vender"];
pub const MERCHANTS: &[&str] = &["merchants", "merchandiser"];
pub const INQUIRY: &[&str] = &["inquirySample", "inquiry"];
pub const PROCEEDINGS: &[&str] = &["proceedings"];
pub const ORDER_TYPE: &[&str] = &["orderType", "order_Type"];
pub const TRANSACTION: &[&str] = &["transaction", "transactionType"];
pub const VERSION: &[&str] = &["version"];
pub const COMMISSION: &[&str] = &["commission", "commisionRate"];
pub const PLACEMENT_DATE: &[&str] = &["placementDate"];
pub const ETA_DATE: &[&str] = &["etaDate"];
pub const ETA_NEW_JERSEY_DATE: &[&str] = &["etanjDate", "etaNewJerseyDate"];
pub const BUYER_SHIP_INITIAL_DATE: &[&str] = &["buyerShipInitialDate"];
pub const BUYER_SHIP_LAST_DATE: &[&str] = &["buyerShipLastDate"];
pub const VENDOR_SHIP_INITIAL_DATE: &[&str] = &["venderShipInitialDate"];
pub const VENDOR_SHIP_LAST_DATE: &[&str] = &["venderShipLastDate"];
pub const FINAL_INSPECTION_DATE: &[&str] = &["finalInspectionDate"];
pub const PRODUCT_PORTFOLIO: &[&str] = &["productPortfolio"];
pub const PRODUCT_CATEGORY: &[&str] = &["productCategory"];
pub const PRODUCT_GROUP: &[&str] = &["productGroup"];
pub const FABRIC: &[&str] = &["fabric"];
pub const CONSTRUCTION: &[&str] = &["construction"];
pub const BRAND: &[&str] = &["brand"];
pub const PAYMENT_MODE: &[&str] = &["paymentMode", "payment_Mode"];
pub const DELIVERY_TYPE: &[&str] = &["deliveryType"];
pub const SHIPMENT_MODE: &[&str] = &["shipmentMode"];
pub const RATIO: &[&str] = &["ration", "ratio"];
pub const PO_SPECIAL_INSTRUCTIONS: &[&str] = &["pO_Special_Instructions"];
pub const COSTING_REF_NO: &[&str] = &["costingRefNo"];
pub const AMS_REF_NO: &[&str] = &["aMS_Ref_No", "amsRefNo"];
pub const STYLE_SUMMARY: &[&str] = &["styleNo"];
pub const TOTAL_QUANTITY: &[&str] = &["totalQty"];
pub const TOTAL_VALUE: &[&str] = &["totalValue"];
pub const TOTAL_LDP_VALUE: &[&str] = &["totalLDPValue"];
pub const BANK_ID: &[&str] = &["bankId"];
pub const BANK_BRANCH: &[&str] = &["bankBranch"];
pub const BANK_ACCOUNT: &[&str] = &["bankAccount"];
pub const BANK_ROUTING: &[&str] = &["bankRouting"];

/// Binary attachment fields. Hydrated and serialized by the payload module,
/// never through the passthrough bag; the bulk grid strips them entirely.
pub const BINARY_FIELDS: &[&str] = &[
    "pO_Image",
    "productImage",
    "finalSpecs",
    "pP_Comment",
    "sizeSetComment",
];

/// Image-adjacent scalars the backend declares as required non-null strings.
/// The bulk grid force-includes these as empty strings when absent.
pub const IMAGE_NAME_FIELDS: &[&str] = &[
    "pO_ImageName",
    "productImageName",
    "finalSpecsName",
    "pP_CommentName",
    "sizeSetCommentName",
];

pub const ORDER_DETAILS: &str = "orderDetails";

const ALL_FIELDS: &[&[&str]] = &[
    INTERNAL_ID,
    CUSTOMER_PO_NUMBER,
    CUSTOMER,
    SUPPLIER,
    MERCHANTS,
    INQUIRY,
    PROCEEDINGS,
    ORDER_TYPE,
    TRANSACTION,
    VERSION,
    COMMISSION,
    PLACEMENT_DATE,
    ETA_DATE,
    ETA_NEW_JERSEY_DATE,
    BUYER_SHIP_INITIAL_DATE,
    BUYER_SHIP_LAST_DATE,
    VENDOR_SHIP_INITIAL_DATE,
    VENDOR_SHIP_LAST_DATE,
    FINAL_INSPECTION_DATE,
    PRODUCT_PORTFOLIO,
    PRODUCT_CATEGORY,
    PRODUCT_GROUP,
    FABRIC,
    CONSTRUCTION,
    BRAND,
    PAYMENT_MODE,
    DELIVERY_TYPE,
    SHIPMENT_MODE,
    RATIO,
    PO_SPECIAL_INSTRUCTIONS,
    COSTING_REF_NO,
    AMS_REF_NO,
    STYLE_SUMMARY,
    TOTAL_QUANTITY,
    TOTAL_VALUE,
    TOTAL_LDP_VALUE,
    BANK_ID,
    BANK_BRANCH,
    BANK_ACCOUNT,
    BANK_ROUTING,
];

/// Every backend key the mapping understands, winning or losing priority.
/// Keys in this set never enter the passthrough bag.
static CONSUMED: Lazy<BTreeSet<&'static str>> = Lazy::new(|| {
    let mut set: BTreeSet<&'static str> = ALL_FIELDS.iter().flat_map(|f| f.iter().copied()).collect();
    set.extend(BINARY_FIELDS.iter().copied());
    set.extend(IMAGE_NAME_FIELDS.iter().copied());
    set.insert(ORDER_DETAILS);
    set
});

fn is_empty_value(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn pick<'a>(raw: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|a| raw.get(*a))
        .find(|v| !is_empty_value(v))
}

fn str_field(raw: &Value, aliases: &[&str]) -> String {
    match pick(raw, aliases) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn num_field(raw: &Value, aliases: &[&str]) -> f64 {
    match pick(raw, aliases) {
        Some(Value::Number(n)) => n.as_f64().filter(|f| f.is_finite()).unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()).unwrap_or(0.0),
        _ => 0.0,
    }
}

fn int_field(raw: &Value, aliases: &[&str]) -> i64 {
    match pick(raw, aliases) {
        Some(Value::Number(n)) => n.as_i64().unwrap_or_else(|| n.as_f64().unwrap_or(0.0) as i64),
        Some(Value::String(s)) => s.trim().parse::<i64>().unwrap_or(0),
        _ => 0,
    }
}

fn opt_int_field(raw: &Value, aliases: &[&str]) -> Option<i64> {
    match pick(raw, aliases) {
        Some(v) => match v {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        },
        None => None,
    }
}

/// Merchants arrive either as an array of names or a comma-joined string.
fn merchants_field(raw: &Value) -> Vec<String> {
    match pick(raw, MERCHANTS) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

/// Build a canonical draft from a raw backend record. Total: every known
/// field is present with an empty/zero default when absent upstream.
pub fn canonical_draft(raw: &Value) -> OrderDraft {
    let passthrough = raw
        .as_object()
        .map(|obj| {
            obj.iter()
                .filter(|(k, _)| !CONSUMED.contains(k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        })
        .unwrap_or_default();

    OrderDraft {
        internal_id: opt_int_field(raw, INTERNAL_ID),
        customer_po_number: str_field(raw, CUSTOMER_PO_NUMBER),
        customer: str_field(raw, CUSTOMER),
        supplier: str_field(raw, SUPPLIER),
        merchants: merchants_field(raw),
        inquiry: str_field(raw, INQUIRY),
        proceedings: str_field(raw, PROCEEDINGS),
        order_type: str_field(raw, ORDER_TYPE),
        transaction: str_field(raw, TRANSACTION),
        version: str_field(raw, VERSION),
        commission: num_field(raw, COMMISSION),
        placement_date: str_field(raw, PLACEMENT_DATE),
        eta_date: str_field(raw, ETA_DATE),
        eta_new_jersey_date: str_field(raw, ETA_NEW_JERSEY_DATE),
        buyer_ship_initial_date: str_field(raw, BUYER_SHIP_INITIAL_DATE),
        buyer_ship_last_date: str_field(raw, BUYER_SHIP_LAST_DATE),
        vendor_ship_initial_date: str_field(raw, VENDOR_SHIP_INITIAL_DATE),
        vendor_ship_last_date: str_field(raw, VENDOR_SHIP_LAST_DATE),
        final_inspection_date: str_field(raw, FINAL_INSPECTION_DATE),
        product_portfolio: str_field(raw, PRODUCT_PORTFOLIO),
        product_category: str_field(raw, PRODUCT_CATEGORY),
        product_group: str_field(raw, PRODUCT_GROUP),
        fabric: str_field(raw, FABRIC),
        construction: str_field(raw, CONSTRUCTION),
        brand: str_field(raw, BRAND),
        payment_mode: str_field(raw, PAYMENT_MODE),
        delivery_type: str_field(raw, DELIVERY_TYPE),
        shipment_mode: str_field(raw, SHIPMENT_MODE),
        ratio: str_field(raw, RATIO),
        po_special_instructions: str_field(raw, PO_SPECIAL_INSTRUCTIONS),
        costing_ref_no: str_field(raw, COSTING_REF_NO),
        ams_ref_no: str_field(raw, AMS_REF_NO),
        style_summary: str_field(raw, STYLE_SUMMARY),
        total_quantity: int_field(raw, TOTAL_QUANTITY),
        total_value: num_field(raw, TOTAL_VALUE),
        total_ldp_value: num_field(raw, TOTAL_LDP_VALUE),
        bank: BankDetail {
            bank_id: int_field(raw, BANK_ID),
            branch: str_field(raw, BANK_BRANCH),
            account: str_field(raw, BANK_ACCOUNT),
            routing: str_field(raw, BANK_ROUTING),
        },
        passthrough,
    }
}

fn put(obj: &mut Map<String, Value>, aliases: &[&str], value: Value) {
    obj.insert(aliases[0].to_string(), value);
}

/// Produce the inverse backend record for a canonical draft. Passthrough
/// fields come first; known fields override them under their primary alias.
pub fn backend_record(draft: &OrderDraft) -> Value {
    let mut obj = Map::new();
    for (k, v) in &draft.passthrough {
        obj.insert(k.clone(), v.clone());
    }

    if let Some(id) = draft.internal_id {
        put(&mut obj, INTERNAL_ID, json!(id));
    }
    put(&mut obj, CUSTOMER_PO_NUMBER, json!(draft.customer_po_number));
    put(&mut obj, CUSTOMER, json!(draft.customer));
    put(&mut obj, SUPPLIER, json!(draft.supplier));
    put(&mut obj, MERCHANTS, json!(draft.merchants.join(",")));
    put(&mut obj, INQUIRY, json!(draft.inquiry));
    put(&mut obj, PROCEEDINGS, json!(draft.proceedings));
    put(&mut obj, ORDER_TYPE, json!(draft.order_type));
    put(&mut obj, TRANSACTION, json!(draft.transaction));
    put(&mut obj, VERSION, json!(draft.version));
    put(&mut obj, COMMISSION, json!(draft.commission));
    put(&mut obj, PLACEMENT_DATE, json!(draft.placement_date));
    put(&mut obj, ETA_DATE, json!(draft.eta_date));
    put(&mut obj, ETA_NEW_JERSEY_DATE, json!(draft.eta_new_jersey_date));
    put(&mut obj, BUYER_SHIP_INITIAL_DATE, json!(draft.buyer_ship_initial_date));
    put(&mut obj, BUYER_SHIP_LAST_DATE, json!(draft.buyer_ship_last_date));
    put(&mut obj, VENDOR_SHIP_INITIAL_DATE, json!(draft.vendor_ship_initial_date));
    put(&mut obj, VENDOR_SHIP_LAST_DATE, json!(draft.vendor_ship_last_date));
    put(&mut obj, FINAL_INSPECTION_DATE, json!(draft.final_inspection_date));
    put(&mut obj, PRODUCT_PORTFOLIO, json!(draft.product_portfolio));
    put(&mut obj, PRODUCT_CATEGORY, json!(draft.product_category));
    put(&mut obj, PRODUCT_GROUP, json!(draft.product_group));
    put(&mut obj, FABRIC, json!(draft.fabric));
    put(&mut obj, CONSTRUCTION, json!(draft.construction));
    put(&mut obj, BRAND, json!(draft.brand));
    put(&mut obj, PAYMENT_MODE, json!(draft.payment_mode));
    put(&mut obj, DELIVERY_TYPE, json!(draft.delivery_type));
    put(&mut obj, SHIPMENT_MODE, json!(draft.shipment_mode));
    put(&mut obj, RATIO, json!(draft.ratio));
    put(&mut obj, PO_SPECIAL_INSTRUCTIONS, json!(draft.po_special_instructions));
    put(&mut obj, COSTING_REF_NO, json!(draft.costing_ref_no));
    put(&mut obj, AMS_REF_NO, json!(draft.ams_ref_no));
    put(&mut obj, STYLE_SUMMARY, json!(draft.style_summary));
    put(&mut obj, TOTAL_QUANTITY, json!(draft.total_quantity));
    put(&mut obj, TOTAL_VALUE, json!(draft.total_value));
    put(&mut obj, TOTAL_LDP_VALUE, json!(draft.total_ldp_value));
    put(&mut obj, BANK_ID, json!(draft.bank.bank_id));
    put(&mut obj, BANK_BRANCH, json!(draft.bank.branch));
    put(&mut obj, BANK_ACCOUNT, json!(draft.bank.account));
    put(&mut obj, BANK_ROUTING, json!(draft.bank.routing));

    Value::Object(obj)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_priority_first_non_empty_wins() {
        let raw = json!({
            "customerName": "",
            "buyer": "Acme Retail",
            "supplierName": "Delta Knitwear",
            "vender": "ignored"
        });
        let draft = canonical_draft(&raw);
        assert_eq!(draft.customer, "Acme Retail");
        assert_eq!(draft.supplier, "Delta Knitwear");
    }

    #[test]
    fn test_po_number_list_row_alias() {
        // List rows carry the PO number under the short name used by the
        // uniqueness-check query param.
        let draft = canonical_draft(&json!({"pono": "PO-2025-0147"}));
        assert_eq!(draft.customer_po_number, "PO-2025-0147");
        // Write-back still uses the primary alias only.
        let record = backend_record(&draft);
        assert_eq!(record["customerPoNumber"], json!("PO-2025-0147"));
        assert!(record.get("pono").is_none());
    }

    #[test]
    fn test_misnamed_backend_fields() {
        let raw = json!({
            "pO_Special_Instructions": "pack separately",
            "ration": "1:2:2:1",
            "etanjDate": "2025-04-01"
        });
        let draft = canonical_draft(&raw);
        assert_eq!(draft.po_special_instructions, "pack separately");
        assert_eq!(draft.ratio, "1:2:2:1");
        assert_eq!(draft.eta_new_jersey_date, "2025-04-01");
    }

    #[test]
    fn test_total_on_empty_and_non_object_input() {
        let draft = canonical_draft(&json!({}));
        assert_eq!(draft.customer, "");
        assert_eq!(draft.commission, 0.0);
        assert_eq!(draft.internal_id, None);

        let draft = canonical_draft(&Value::Null);
        assert_eq!(draft.customer_po_number, "");
    }

    #[test]
    fn test_numeric_strings_coerced() {
        let raw = json!({"commission": "7.5", "totalQty": "120", "bankId": "3"});
        let draft = canonical_draft(&raw);
        assert_eq!(draft.commission, 7.5);
        assert_eq!(draft.total_quantity, 120);
        assert_eq!(draft.bank.bank_id, 3);
    }

    #[test]
    fn test_merchants_array_or_joined_string() {
        let draft = canonical_draft(&json!({"merchants": ["A. Rivera", "K. Osei"]}));
        assert_eq!(draft.merchants, vec!["A. Rivera", "K. Osei"]);

        let draft = canonical_draft(&json!({"merchandiser": "A. Rivera, K. Osei"}));
        assert_eq!(draft.merchants, vec!["A. Rivera", "K. Osei"]);
    }

    #[test]
    fn test_passthrough_preserves_unknown_fields() {
        let raw = json!({
            "buyer": "Acme Retail",
            "legacyWarehouseCode": "W-17",
            "auditFlags": {"reviewed": true}
        });
        let draft = canonical_draft(&raw);
        let record = backend_record(&draft);
        assert_eq!(record["legacyWarehouseCode"], json!("W-17"));
        assert_eq!(record["auditFlags"]["reviewed"], json!(true));
        // Known aliases never leak into passthrough.
        assert!(!draft.passthrough.contains_key("buyer"));
    }

    #[test]
    fn test_round_trip_is_idempotent() {
        let raw = json!({
            "buyer": "Acme Retail",
            "vender": "Delta Knitwear",
            "customer_PO_Number": "PO-2025-0147",
            "ration": "2:2:1",
            "etanjDate": "2025-04-01",
            "commisionRate": "6.25",
            "merchandiser": "A. Rivera,K. Osei",
            "legacyWarehouseCode": "W-17",
            "poid": 912
        });
        let once = backend_record(&canonical_draft(&raw));
        let twice = backend_record(&canonical_draft(&once));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_write_back_uses_primary_alias() {
        let mut draft = OrderDraft::default();
        draft.customer = "Acme Retail".to_string();
        draft.ratio = "1:1".to_string();
        draft.eta_new_jersey_date = "2025-04-01".to_string();
        let record = backend_record(&draft);
        assert_eq!(record["customerName"], json!("Acme Retail"));
        assert_eq!(record["ration"], json!("1:1"));
        assert_eq!(record["etanjDate"], json!("2025-04-01"));
        assert!(record.get("buyer").is_none());
    }
}
