use serde::{Deserialize, Serialize};

/// One entry of a reference-data list (customers, suppliers, banks, ...).
///
/// Every list endpoint returns pairs of a numeric id and a display name;
/// nothing else about the lists is shared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceOption {
    pub id: i64,
    pub name: String,
}

impl ReferenceOption {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Find the display name for a selected id. A selection whose id is not in
/// the loaded list falls back to `None` (the field shows its placeholder).
pub fn find_name(options: &[ReferenceOption], id: i64) -> Option<&str> {
    options
        .iter()
        .find(|o| o.id == id)
        .map(|o| o.name.as_str())
}

/// Resolve a display name back to its id against the loaded list.
pub fn find_id(options: &[ReferenceOption], name: &str) -> Option<i64> {
    let needle = name.trim();
    options
        .iter()
        .find(|o| o.name.trim() == needle)
        .map(|o| o.id)
}

/// A named group of concrete sizes, e.g. "S-XL" -> [S, M, L, XL].
/// Used to bulk-expand line items into one row per size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeRange {
    pub id: i64,
    pub name: String,
    pub sizes: Vec<String>,
}

impl SizeRange {
    pub fn new(id: i64, name: impl Into<String>, sizes: Vec<String>) -> Self {
        Self {
            id,
            name: name.into(),
            sizes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_name_and_id() {
        let opts = vec![
            ReferenceOption::new(1, "Acme Retail"),
            ReferenceOption::new(7, "Northline"),
        ];
        assert_eq!(find_name(&opts, 7), Some("Northline"));
        assert_eq!(find_name(&opts, 99), None);
        assert_eq!(find_id(&opts, "Acme Retail"), Some(1));
        assert_eq!(find_id(&opts, "  Northline "), Some(7));
        assert_eq!(find_id(&opts, "Unknown"), None);
    }
}
