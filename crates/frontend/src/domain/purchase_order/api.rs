//! Typed API layer over the order-management backend.
//!
//! One function per endpoint, `Result<_, String>` errors with the best
//! available message. Every request carries the bearer token when one is
//! present; a missing token sends the request without the header.

use crate::shared::api_utils::api_url;
use crate::shared::auth;
use contracts::domain::reference::{ReferenceOption, SizeRange};
use gloo_net::http::{Request, RequestBuilder, Response};
use serde_json::Value;

fn authorized(req: RequestBuilder) -> RequestBuilder {
    match auth::bearer() {
        Some(header) => req.header("Authorization", &header),
        None => req,
    }
}

/// Best available message for a non-2xx response: server-provided
/// message/title if the body is JSON, else the HTTP status line.
async fn error_message(response: Response) -> String {
    let status = response.status();
    let status_text = response.status_text();
    if let Ok(body) = response.json::<Value>().await {
        for key in ["message", "title", "error"] {
            if let Some(msg) = body.get(key).and_then(|v| v.as_str()) {
                if !msg.trim().is_empty() {
                    return msg.to_string();
                }
            }
        }
    }
    format!("HTTP {} {}", status, status_text)
}

async fn get_json(path: &str) -> Result<Value, String> {
    let response = authorized(Request::get(&api_url(path)))
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;
    if !response.ok() {
        return Err(error_message(response).await);
    }
    response
        .json::<Value>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

async fn post_json(path: &str, payload: &Value) -> Result<(), String> {
    let response = authorized(Request::post(&api_url(path)))
        .json(payload)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;
    if !response.ok() {
        return Err(error_message(response).await);
    }
    Ok(())
}

/// List filter query params. Each defaults to the literal string `All`,
/// which is what the backend expects for "no filter".
#[derive(Debug, Clone, PartialEq)]
pub struct OrderFilters {
    pub status: String,
    pub vender: String,
    pub buyer: String,
    pub shipment: String,
    pub booked: String,
}

impl Default for OrderFilters {
    fn default() -> Self {
        Self {
            status: "All".to_string(),
            vender: "All".to_string(),
            buyer: "All".to_string(),
            shipment: "All".to_string(),
            booked: "All".to_string(),
        }
    }
}

impl OrderFilters {
    /// An emptied-out filter falls back to `All` rather than an empty param.
    fn param(value: &str) -> String {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            "All".to_string()
        } else {
            urlencoding::encode(trimmed).into_owned()
        }
    }

    pub fn query_string(&self) -> String {
        format!(
            "Status={}&Vender={}&Buyer={}&Shipment={}&Booked={}",
            Self::param(&self.status),
            Self::param(&self.vender),
            Self::param(&self.buyer),
            Self::param(&self.shipment),
            Self::param(&self.booked),
        )
    }
}

/// Fetch one order. The endpoint answers with either an object or an array
/// of one; the first element is used when it is an array.
pub async fn get_purchase_order(id: i64) -> Result<Value, String> {
    let value = get_json(&format!("/api/MyOrders/GetPurchaseOrder/{}", id)).await?;
    match value {
        Value::Array(items) => items
            .into_iter()
            .next()
            .ok_or_else(|| format!("Order {} not found", id)),
        other => Ok(other),
    }
}

pub async fn get_purchase_orders(filters: &OrderFilters) -> Result<Vec<Value>, String> {
    let value = get_json(&format!(
        "/api/MyOrders/GetPurchaseOrders?{}",
        filters.query_string()
    ))
    .await?;
    Ok(value.as_array().cloned().unwrap_or_default())
}

/// Uniqueness check for a customer PO number. Returns the raw server
/// message; the caller compares it against the literal "YES".
pub async fn already_exist_po_number(pono: &str) -> Result<String, String> {
    let value = get_json(&format!(
        "/api/MyOrders/AlreadyExistPONumber?PONO={}",
        urlencoding::encode(pono)
    ))
    .await?;
    Ok(value
        .get("message")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string())
}

pub async fn add_purchase_order(payload: &Value) -> Result<(), String> {
    post_json("/api/MyOrders/AddPurchaseOrder", payload).await
}

pub async fn update_purchase_order(poid: i64, payload: &Value) -> Result<(), String> {
    post_json(
        &format!("/api/MyOrders/UpdatePurchaseOrder?poid={}", poid),
        payload,
    )
    .await
}

fn parse_options(value: &Value) -> Vec<ReferenceOption> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|v| ReferenceOption {
                    id: v.get("id").and_then(|x| x.as_i64()).unwrap_or(0),
                    name: v
                        .get("name")
                        .or_else(|| v.get("description"))
                        .and_then(|x| x.as_str())
                        .unwrap_or("")
                        .to_string(),
                })
                .filter(|o| !o.name.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

async fn get_options(path: &str) -> Result<Vec<ReferenceOption>, String> {
    Ok(parse_options(&get_json(path).await?))
}

pub async fn get_customers() -> Result<Vec<ReferenceOption>, String> {
    get_options("/api/MyOrders/GetCustomer").await
}

pub async fn get_suppliers() -> Result<Vec<ReferenceOption>, String> {
    get_options("/api/MyOrders/GetSupplier").await
}

pub async fn get_merchants() -> Result<Vec<ReferenceOption>, String> {
    get_options("/api/MyOrders/GetMerchants").await
}

pub async fn get_product_portfolios() -> Result<Vec<ReferenceOption>, String> {
    get_options("/api/MyOrders/GetProductPortfolio").await
}

pub async fn get_product_categories(portfolio_id: i64) -> Result<Vec<ReferenceOption>, String> {
    get_options(&format!("/api/MyOrders/GetProductCategories/{}", portfolio_id)).await
}

pub async fn get_product_groups(category_id: i64) -> Result<Vec<ReferenceOption>, String> {
    get_options(&format!("/api/MyOrders/GetProductGroups/{}", category_id)).await
}

pub async fn get_payment_modes() -> Result<Vec<ReferenceOption>, String> {
    get_options("/api/MyOrders/GetPaymentModes").await
}

pub async fn get_delivery_types() -> Result<Vec<ReferenceOption>, String> {
    get_options("/api/MyOrders/GetDeliveryTypes").await
}

pub async fn get_shipment_modes() -> Result<Vec<ReferenceOption>, String> {
    get_options("/api/MyOrders/GetShipmentModes").await
}

pub async fn get_banks() -> Result<Vec<ReferenceOption>, String> {
    get_options("/api/MyOrders/GetBanks").await
}

pub async fn get_inquiry_samples() -> Result<Vec<ReferenceOption>, String> {
    get_options("/api/MyOrders/GetInquirySamples").await
}

pub async fn get_costing_ref_nos() -> Result<Vec<ReferenceOption>, String> {
    get_options("/api/MyOrders/GetCostingRefNo").await
}

fn parse_size_ranges(value: &Value) -> Vec<SizeRange> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|v| {
                    let sizes = match v.get("sizes") {
                        Some(Value::Array(list)) => list
                            .iter()
                            .filter_map(|s| s.as_str())
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty())
                            .collect(),
                        Some(Value::String(joined)) => joined
                            .split(',')
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty())
                            .collect(),
                        _ => Vec::new(),
                    };
                    SizeRange {
                        id: v.get("id").and_then(|x| x.as_i64()).unwrap_or(0),
                        name: v.get("name").and_then(|x| x.as_str()).unwrap_or("").to_string(),
                        sizes,
                    }
                })
                .filter(|r| !r.name.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

pub async fn get_size_ranges() -> Result<Vec<SizeRange>, String> {
    Ok(parse_size_ranges(&get_json("/api/MyOrders/GetSizeRange").await?))
}

/// The commission rate of one customer; the answer is either a bare number
/// or `{"commission": n}` depending on the backend version.
pub async fn get_commission(customer_id: i64) -> Result<f64, String> {
    let value = get_json(&format!("/api/MyOrders/GetCommission/{}", customer_id)).await?;
    Ok(value
        .as_f64()
        .or_else(|| value.get("commission").and_then(|v| v.as_f64()))
        .unwrap_or(0.0))
}

/// Next free AMS reference number, prefilled into new orders.
pub async fn get_next_ams_ref_no() -> Result<String, String> {
    let value = get_json("/api/MyOrders/GetNextAMSRefNo").await?;
    Ok(value
        .as_str()
        .or_else(|| value.get("refNo").and_then(|v| v.as_str()))
        .unwrap_or("")
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filters_default_to_all() {
        let filters = OrderFilters::default();
        assert_eq!(
            filters.query_string(),
            "Status=All&Vender=All&Buyer=All&Shipment=All&Booked=All"
        );
    }

    #[test]
    fn test_filters_encode_and_backfill_empty() {
        let filters = OrderFilters {
            status: "In Production".to_string(),
            vender: "".to_string(),
            ..Default::default()
        };
        assert_eq!(
            filters.query_string(),
            "Status=In%20Production&Vender=All&Buyer=All&Shipment=All&Booked=All"
        );
    }

    #[test]
    fn test_parse_options_tolerates_shapes() {
        let opts = parse_options(&json!([
            {"id": 4, "name": "Acme Retail"},
            {"id": 5, "description": "Northline"},
            {"id": 6}
        ]));
        assert_eq!(opts.len(), 2);
        assert_eq!(opts[0].name, "Acme Retail");
        assert_eq!(opts[1].name, "Northline");
    }

    #[test]
    fn test_parse_size_ranges_joined_or_array() {
        let ranges = parse_size_ranges(&json!([
            {"id": 1, "name": "S-XL", "sizes": "S, M, L, XL"},
            {"id": 2, "name": "OS", "sizes": []}
        ]));
        assert_eq!(ranges[0].sizes, vec!["S", "M", "L", "XL"]);
        assert!(ranges[1].sizes.is_empty());
    }
}
