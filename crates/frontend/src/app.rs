use crate::domain::purchase_order::ui::bulk_grid::BulkEditGrid;
use crate::domain::purchase_order::ui::details::{DetailsMode, PurchaseOrderDetails};
use crate::domain::purchase_order::ui::list::OrdersList;
use leptos::prelude::*;
use serde_json::Value;

/// The currently shown screen. A plain enum signal; the app has exactly one
/// list and its two editing surfaces, so a router would be dead weight.
#[derive(Clone)]
enum AppView {
    Orders,
    NewOrder,
    EditOrder { id: i64, row: Value },
    CopyOrder { id: i64, row: Value },
    BulkEdit { rows: Vec<Value> },
}

#[component]
pub fn App() -> impl IntoView {
    let current = RwSignal::new(AppView::Orders);

    let back_to_orders = Callback::new(move |_: ()| current.set(AppView::Orders));

    view! {
        <main class="app">
            {move || match current.get() {
                AppView::Orders => view! {
                    <OrdersList
                        on_new=Callback::new(move |_| current.set(AppView::NewOrder))
                        on_edit=Callback::new(move |(id, row)| {
                            current.set(AppView::EditOrder { id, row });
                        })
                        on_copy=Callback::new(move |(id, row)| {
                            current.set(AppView::CopyOrder { id, row });
                        })
                        on_bulk_edit=Callback::new(move |rows| {
                            current.set(AppView::BulkEdit { rows });
                        })
                    />
                }
                .into_any(),
                AppView::NewOrder => view! {
                    <PurchaseOrderDetails
                        mode=DetailsMode::New
                        on_saved=back_to_orders
                        on_cancel=back_to_orders
                    />
                }
                .into_any(),
                AppView::EditOrder { id, row } => view! {
                    <PurchaseOrderDetails
                        mode=DetailsMode::Edit { id, fallback: row }
                        on_saved=back_to_orders
                        on_cancel=back_to_orders
                    />
                }
                .into_any(),
                AppView::CopyOrder { id, row } => view! {
                    <PurchaseOrderDetails
                        mode=DetailsMode::Copy { id, fallback: row }
                        on_saved=back_to_orders
                        on_cancel=back_to_orders
                    />
                }
                .into_any(),
                AppView::BulkEdit { rows } => view! {
                    <BulkEditGrid selection=rows on_close=back_to_orders />
                }
                .into_any(),
            }}
        </main>
    }
}
