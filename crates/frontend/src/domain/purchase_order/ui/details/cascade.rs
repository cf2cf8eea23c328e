//! Invalidation rule for the product classification cascade.
//!
//! Portfolio, category and group form a strict hierarchy: choosing a value
//! at one level discards every selection below it. The option-list refetch
//! lives in the view model; the draft mutation is pure and lives here.

use contracts::domain::purchase_order::draft::OrderDraft;

pub fn apply_portfolio_selection(draft: &mut OrderDraft, name: String) {
    draft.product_portfolio = name;
    draft.product_category.clear();
    draft.product_group.clear();
}

pub fn apply_category_selection(draft: &mut OrderDraft, name: String) {
    draft.product_category = name;
    draft.product_group.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_selection() -> OrderDraft {
        let mut draft = OrderDraft::default();
        draft.product_portfolio = "Knitwear".to_string();
        draft.product_category = "Tops".to_string();
        draft.product_group = "Polo".to_string();
        draft
    }

    #[test]
    fn test_portfolio_change_clears_category_and_group() {
        let mut draft = full_selection();
        apply_portfolio_selection(&mut draft, "Denim".to_string());
        assert_eq!(draft.product_portfolio, "Denim");
        assert_eq!(draft.product_category, "");
        assert_eq!(draft.product_group, "");
    }

    #[test]
    fn test_category_change_clears_group_only() {
        let mut draft = full_selection();
        apply_category_selection(&mut draft, "Bottoms".to_string());
        assert_eq!(draft.product_portfolio, "Knitwear");
        assert_eq!(draft.product_category, "Bottoms");
        assert_eq!(draft.product_group, "");
    }
}
