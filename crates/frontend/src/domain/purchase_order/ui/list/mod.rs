//! Orders list: filters, table, and the entry points into the edit, copy
//! and bulk-edit flows.

pub mod state;

use crate::domain::purchase_order::api::{self, OrderFilters};
use crate::shared::date_utils::{format_date, format_money};
use leptos::prelude::*;
use serde_json::Value;
use state::{display_row, selected_rows, toggle_selection};
use std::collections::BTreeSet;

#[component]
fn FilterInput(
    #[prop(into)] label: String,
    #[prop(into)] value: Signal<String>,
    on_change: Callback<String>,
) -> impl IntoView {
    view! {
        <div class="form__group">
            <label class="form__label">{label}</label>
            <input
                class="form__input"
                type="text"
                prop:value=value
                on:input=move |ev| on_change.run(event_target_value(&ev))
            />
        </div>
    }
}

#[component]
pub fn OrdersList(
    on_new: Callback<()>,
    on_edit: Callback<(i64, Value)>,
    on_copy: Callback<(i64, Value)>,
    on_bulk_edit: Callback<Vec<Value>>,
) -> impl IntoView {
    let items = RwSignal::new(Vec::<Value>::new());
    let filters = RwSignal::new(OrderFilters::default());
    let loading = RwSignal::new(false);
    let error = RwSignal::new(Option::<String>::None);
    let selected = RwSignal::new(BTreeSet::<i64>::new());

    let load_orders = move || {
        loading.set(true);
        error.set(None);
        let current = filters.get_untracked();
        leptos::task::spawn_local(async move {
            match api::get_purchase_orders(&current).await {
                Ok(list) => {
                    items.set(list);
                    selected.set(BTreeSet::new());
                }
                Err(e) => {
                    log::error!("Failed to load orders: {}", e);
                    error.set(Some(e));
                }
            }
            loading.set(false);
        });
    };
    load_orders();

    let filter_value = move |get: fn(&OrderFilters) -> &String| {
        Signal::derive(move || filters.with(|f| get(f).clone()))
    };
    let filter_setter = move |set: fn(&mut OrderFilters, String)| {
        Callback::new(move |v: String| filters.update(|f| set(f, v)))
    };

    let open_bulk_edit = move |_| {
        let rows = items.with_untracked(|list| {
            selected.with_untracked(|sel| selected_rows(list, sel))
        });
        if !rows.is_empty() {
            on_bulk_edit.run(rows);
        }
    };

    view! {
        <div class="list">
            <div class="list__header">
                <h1 class="list__title">"Purchase orders"</h1>
                <div class="list__actions">
                    <button class="button button--primary" on:click=move |_| on_new.run(())>
                        "New order"
                    </button>
                    <button
                        class="button"
                        disabled=move || selected.with(|s| s.is_empty())
                        on:click=open_bulk_edit
                    >
                        {move || format!("Bulk edit ({})", selected.with(|s| s.len()))}
                    </button>
                </div>
            </div>

            <div class="form__row list__filters">
                <FilterInput
                    label="Status"
                    value=filter_value(|f| &f.status)
                    on_change=filter_setter(|f, v| f.status = v)
                />
                <FilterInput
                    label="Vender"
                    value=filter_value(|f| &f.vender)
                    on_change=filter_setter(|f, v| f.vender = v)
                />
                <FilterInput
                    label="Buyer"
                    value=filter_value(|f| &f.buyer)
                    on_change=filter_setter(|f, v| f.buyer = v)
                />
                <FilterInput
                    label="Shipment"
                    value=filter_value(|f| &f.shipment)
                    on_change=filter_setter(|f, v| f.shipment = v)
                />
                <div class="form__group">
                    <label class="form__label">"Booked"</label>
                    <select
                        class="form__select"
                        on:change=move |ev| {
                            filters.update(|f| f.booked = event_target_value(&ev));
                        }
                    >
                        {["All", "Yes", "No"]
                            .into_iter()
                            .map(|opt| {
                                let is_selected = move || {
                                    filters.with(|f| f.booked == opt)
                                };
                                view! {
                                    <option value=opt selected=is_selected>{opt}</option>
                                }
                            })
                            .collect_view()}
                    </select>
                </div>
                <button class="button" on:click=move |_| load_orders()>
                    "Apply"
                </button>
            </div>

            {move || {
                error.get().map(|e| view! {
                    <div class="banner banner--error">{e}</div>
                })
            }}
            {move || {
                loading.get().then(|| view! {
                    <div class="banner">"Loading orders..."</div>
                })
            }}

            <table class="table">
                <thead>
                    <tr>
                        <th></th>
                        <th>"PO number"</th>
                        <th>"Customer"</th>
                        <th>"Supplier"</th>
                        <th>"Styles"</th>
                        <th>"Placement"</th>
                        <th>"Qty"</th>
                        <th>"Value"</th>
                        <th>"Status"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || { items.get().into_iter().enumerate().collect::<Vec<_>>() }
                        key=|(i, _)| *i
                        children=move |(_, raw)| {
                            let row = display_row(&raw);
                            let raw_for_edit = raw.clone();
                            let raw_for_copy = raw;
                            let id = row.id;
                            view! {
                                <tr>
                                    <td>
                                        {id.map(|id| view! {
                                            <input
                                                type="checkbox"
                                                prop:checked=move || {
                                                    selected.with(|s| s.contains(&id))
                                                }
                                                on:change=move |_| {
                                                    selected.update(|s| toggle_selection(s, id));
                                                }
                                            />
                                        })}
                                    </td>
                                    <td>{row.po_number.clone()}</td>
                                    <td>{row.customer.clone()}</td>
                                    <td>{row.supplier.clone()}</td>
                                    <td>{row.style_summary.clone()}</td>
                                    <td>{format_date(&row.placement_date)}</td>
                                    <td>{row.total_quantity}</td>
                                    <td>{format_money(row.total_value)}</td>
                                    <td>{row.status.clone()}</td>
                                    <td>
                                        {id.map(|id| view! {
                                            <button
                                                class="button button--small"
                                                on:click={
                                                    let raw = raw_for_edit.clone();
                                                    move |_| on_edit.run((id, raw.clone()))
                                                }
                                            >
                                                "Edit"
                                            </button>
                                            <button
                                                class="button button--small"
                                                on:click={
                                                    let raw = raw_for_copy.clone();
                                                    move |_| on_copy.run((id, raw.clone()))
                                                }
                                            >
                                                "Copy"
                                            </button>
                                        })}
                                    </td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>
            {move || {
                (!loading.get() && items.with(|i| i.is_empty())).then(|| view! {
                    <div class="list__empty">"No orders match the current filters"</div>
                })
            }}
        </div>
    }
}
