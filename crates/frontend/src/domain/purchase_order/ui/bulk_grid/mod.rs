//! Bulk-edit grid over a selection of orders. Header fields only; the grid
//! never touches attachments or line items, and saving walks the rows one
//! by one so each row gets its own verdict.

pub mod state;

use crate::domain::purchase_order::api;
use crate::domain::purchase_order::ui::details::view_model::ReferenceSlice;
use contracts::domain::purchase_order::payload::{build_grid_payload, ResolveContext};
use leptos::prelude::*;
use serde_json::Value;
use state::{fill_down, rows_from_selection, summarize, GridField, GridRow, RowOutcome};
use uuid::Uuid;
use wasm_bindgen_futures::spawn_local;

fn set_outcome(rows: RwSignal<Vec<GridRow>>, key: Uuid, outcome: RowOutcome) {
    rows.update(|r| {
        if let Some(row) = r.iter_mut().find(|x| x.key == key) {
            row.outcome = outcome;
        }
    });
}

fn outcome_text(outcome: &RowOutcome) -> String {
    match outcome {
        RowOutcome::Pending => String::new(),
        RowOutcome::Saving => "Saving...".to_string(),
        RowOutcome::Saved => "Saved".to_string(),
        RowOutcome::Failed(e) => format!("Failed: {}", e),
    }
}

#[component]
pub fn BulkEditGrid(
    /// Raw list rows behind the selection
    selection: Vec<Value>,
    on_close: Callback<()>,
) -> impl IntoView {
    let rows = RwSignal::new(rows_from_selection(&selection));
    let saving = RwSignal::new(false);
    let summary = RwSignal::new(Option::<String>::None);

    let customers = ReferenceSlice::new();
    let suppliers = ReferenceSlice::new();
    let merchants = ReferenceSlice::new();
    let inquiries = ReferenceSlice::new();
    customers.start();
    spawn_local(async move {
        customers.resolve(api::get_customers().await, "customers");
    });
    suppliers.start();
    spawn_local(async move {
        suppliers.resolve(api::get_suppliers().await, "suppliers");
    });
    merchants.start();
    spawn_local(async move {
        merchants.resolve(api::get_merchants().await, "merchants");
    });
    inquiries.start();
    spawn_local(async move {
        inquiries.resolve(api::get_inquiry_samples().await, "inquiry samples");
    });

    let resolve_ctx = move || ResolveContext {
        customers: customers.options.get_untracked(),
        suppliers: suppliers.options.get_untracked(),
        merchants: merchants.options.get_untracked(),
        inquiries: inquiries.options.get_untracked(),
    };

    let save_row = move |key: Uuid| {
        let draft = rows.with_untracked(|r| {
            r.iter().find(|x| x.key == key).map(|x| x.draft.clone())
        });
        let Some(draft) = draft else { return };
        let Some(poid) = draft.internal_id else { return };
        set_outcome(rows, key, RowOutcome::Saving);
        spawn_local(async move {
            let payload = build_grid_payload(&draft, &resolve_ctx());
            let outcome = match api::update_purchase_order(poid, &payload).await {
                Ok(()) => RowOutcome::Saved,
                Err(e) => RowOutcome::Failed(e),
            };
            set_outcome(rows, key, outcome);
        });
    };

    let save_all = move |_| {
        if saving.get_untracked() {
            return;
        }
        saving.set(true);
        summary.set(None);
        spawn_local(async move {
            let ctx = resolve_ctx();
            let keys: Vec<Uuid> = rows.with_untracked(|r| r.iter().map(|x| x.key).collect());
            // One row at a time; a failure marks that row and moves on.
            for key in keys {
                let draft = rows.with_untracked(|r| {
                    r.iter().find(|x| x.key == key).map(|x| x.draft.clone())
                });
                let Some(draft) = draft else { continue };
                let Some(poid) = draft.internal_id else { continue };
                set_outcome(rows, key, RowOutcome::Saving);
                let payload = build_grid_payload(&draft, &ctx);
                let outcome = match api::update_purchase_order(poid, &payload).await {
                    Ok(()) => RowOutcome::Saved,
                    Err(e) => RowOutcome::Failed(e),
                };
                set_outcome(rows, key, outcome);
            }
            summary.set(Some(rows.with_untracked(|r| summarize(r))));
            saving.set(false);
        });
    };

    view! {
        <div class="grid">
            <div class="grid__header">
                <h1 class="grid__title">"Bulk edit"</h1>
                <div class="grid__actions">
                    <button
                        class="button button--primary"
                        disabled=move || saving.get()
                        on:click=save_all
                    >
                        {move || if saving.get() { "Saving..." } else { "Save all" }}
                    </button>
                    <button class="button" on:click=move |_| on_close.run(())>
                        "Back to orders"
                    </button>
                </div>
            </div>

            {move || {
                summary.get().map(|s| view! {
                    <div class="banner">{s}</div>
                })
            }}

            <table class="table table--grid">
                <thead>
                    <tr>
                        <th>"PO number"</th>
                        {GridField::ALL
                            .into_iter()
                            .map(|field| view! { <th>{field.label()}</th> })
                            .collect_view()}
                        <th>"Result"</th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || rows.get()
                        key=|row| row.key
                        children=move |row| {
                            let key = row.key;
                            view! {
                                <tr>
                                    <td>{row.draft.customer_po_number.clone()}</td>
                                    {GridField::ALL
                                        .into_iter()
                                        .map(|field| {
                                            let value = Signal::derive(move || {
                                                rows.with(|r| {
                                                    r.iter()
                                                        .find(|x| x.key == key)
                                                        .map(|x| field.get(&x.draft))
                                                        .unwrap_or_default()
                                                })
                                            });
                                            let input_type =
                                                if field.is_date() { "date" } else { "text" };
                                            view! {
                                                <td>
                                                    <input
                                                        class="form__input form__input--cell"
                                                        type=input_type
                                                        prop:value=value
                                                        on:input=move |ev| {
                                                            let v = event_target_value(&ev);
                                                            rows.update(|r| {
                                                                if let Some(x) =
                                                                    r.iter_mut().find(|x| x.key == key)
                                                                {
                                                                    field.set(&mut x.draft, v);
                                                                }
                                                            });
                                                        }
                                                    />
                                                    <button
                                                        class="button button--icon"
                                                        title="Fill down"
                                                        on:click=move |_| {
                                                            rows.update(|r| {
                                                                if let Some(i) = r
                                                                    .iter()
                                                                    .position(|x| x.key == key)
                                                                {
                                                                    fill_down(r, i, field);
                                                                }
                                                            });
                                                        }
                                                    >
                                                        "↓"
                                                    </button>
                                                </td>
                                            }
                                        })
                                        .collect_view()}
                                    <td>
                                        <button
                                            class="button button--small"
                                            disabled=move || saving.get()
                                            on:click=move |_| save_row(key)
                                        >
                                            "Save"
                                        </button>
                                        {move || {
                                            rows.with(|r| {
                                                r.iter()
                                                    .find(|x| x.key == key)
                                                    .map(|x| outcome_text(&x.outcome))
                                                    .unwrap_or_default()
                                            })
                                        }}
                                    </td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>
        </div>
    }
}
