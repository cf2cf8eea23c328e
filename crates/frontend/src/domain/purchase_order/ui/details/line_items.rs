//! Line-item dialog: size-range expansion, per-size quantities, totals.

use crate::shared::components::select::ReferenceSelect;
use crate::shared::date_utils::format_money;
use crate::shared::modal::Modal;
use contracts::domain::purchase_order::line_items::{
    expand_entry, totals, validate_rows, LineItemEntry, LineItemRow,
};
use contracts::domain::purchase_order::payload::{parse_or_zero, parse_or_zero_int};
use contracts::domain::reference::SizeRange;
use leptos::children::ToChildren;
use leptos::prelude::*;

/// What the user has typed into the add-entry strip, still as raw strings.
#[derive(Clone, Default, PartialEq)]
struct EntryForm {
    style_no: String,
    colorway: String,
    product_code: String,
    size_range: String,
    item_price: String,
    ldp_price: String,
}

impl EntryForm {
    fn to_entry(&self) -> LineItemEntry {
        LineItemEntry {
            style_no: self.style_no.trim().to_string(),
            colorway: self.colorway.trim().to_string(),
            product_code: self.product_code.trim().to_string(),
            size_range: self.size_range.trim().to_string(),
            item_price: parse_or_zero(&self.item_price),
            ldp_price: parse_or_zero(&self.ldp_price),
        }
    }
}

#[component]
fn EntryInput(
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

/// The dialog works on its own copy of the rows; nothing reaches the order
/// header until one of the save buttons hands the rows back through
/// `on_apply`.
#[component]
pub fn LineItemsDialog(
    /// Rows at dialog-open time
    initial_rows: Vec<LineItemRow>,
    /// Loaded size ranges for the expansion select
    #[prop(into)]
    size_ranges: Signal<Vec<SizeRange>>,
    #[prop(into)] ranges_loading: Signal<bool>,
    #[prop(into)] ranges_error: Signal<Option<String>>,
    /// Receives the edited rows on either save action
    on_apply: Callback<Vec<LineItemRow>>,
    on_close: Callback<()>,
) -> impl IntoView {
    let rows = RwSignal::new(initial_rows);
    let entry = RwSignal::new(EntryForm::default());
    let error = RwSignal::new(Option::<String>::None);

    let entry_field = move |get: fn(&EntryForm) -> &String| {
        Signal::derive(move || entry.with(|e| get(e).clone()))
    };
    let set_entry = move |set: fn(&mut EntryForm, String)| {
        Callback::new(move |v: String| entry.update(|e| set(e, v)))
    };

    let add_entry = move |_| {
        let form = entry.get_untracked();
        let item = form.to_entry();
        if item.style_no.is_empty() {
            error.set(Some("Style no is required to add line items".to_string()));
            return;
        }
        error.set(None);
        let expanded = size_ranges.with_untracked(|ranges| expand_entry(&item, ranges));
        rows.update(|r| r.extend(expanded));
        entry.update(|e| {
            e.style_no.clear();
            e.colorway.clear();
        });
    };

    let save = move |close: bool| {
        let current = rows.get_untracked();
        match validate_rows(&current) {
            Ok(()) => {
                error.set(None);
                on_apply.run(current);
                if close {
                    on_close.run(());
                }
            }
            Err(e) => error.set(Some(e)),
        }
    };

    let range_names = Signal::derive(move || {
        size_ranges.with(|ranges| ranges.iter().map(|r| r.name.clone()).collect::<Vec<String>>())
    });

    view! {
        <Modal
            title="Line items".to_string()
            on_close=on_close
            action_buttons=ChildrenFn::to_children(move || {
                view! {
                    <button class="button button--primary" on:click=move |_| save(false)>
                        "Save"
                    </button>
                    <button class="button button--primary" on:click=move |_| save(true)>
                        "Save & Close"
                    </button>
                }
                .into_any()
            })
        >
            <div class="form__row">
                <EntryInput
                    label="Style no"
                    value=entry_field(|e| &e.style_no)
                    on_change=set_entry(|e, v| e.style_no = v)
                />
                <EntryInput
                    label="Colorway"
                    value=entry_field(|e| &e.colorway)
                    on_change=set_entry(|e, v| e.colorway = v)
                />
                <EntryInput
                    label="Product code"
                    value=entry_field(|e| &e.product_code)
                    on_change=set_entry(|e, v| e.product_code = v)
                />
                <ReferenceSelect
                    label="Size range"
                    value=entry_field(|e| &e.size_range)
                    on_change=set_entry(|e, v| e.size_range = v)
                    options=range_names
                    loading=ranges_loading
                    load_error=ranges_error
                />
                <EntryInput
                    label="Item price"
                    value=entry_field(|e| &e.item_price)
                    on_change=set_entry(|e, v| e.item_price = v)
                />
                <EntryInput
                    label="LDP price"
                    value=entry_field(|e| &e.ldp_price)
                    on_change=set_entry(|e, v| e.ldp_price = v)
                />
                <button class="button" on:click=add_entry>
                    "Add"
                </button>
            </div>

            {move || {
                error.get().map(|e| view! {
                    <div class="form__hint form__hint--error">{e}</div>
                })
            }}

            <table class="table">
                <thead>
                    <tr>
                        <th>"Style no"</th>
                        <th>"Colorway"</th>
                        <th>"Product code"</th>
                        <th>"Size"</th>
                        <th>"Qty"</th>
                        <th>"Price"</th>
                        <th>"Value"</th>
                        <th>"LDP price"</th>
                        <th>"LDP value"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || rows.get()
                        key=|row| row.key
                        children=move |row| {
                            let key = row.key;
                            let quantity = Signal::derive(move || {
                                rows.with(|r| {
                                    r.iter()
                                        .find(|x| x.key == key)
                                        .map(|x| x.quantity.to_string())
                                        .unwrap_or_default()
                                })
                            });
                            let cell = move |pick: fn(&LineItemRow) -> String| {
                                Signal::derive(move || {
                                    rows.with(|r| {
                                        r.iter().find(|x| x.key == key).map(pick).unwrap_or_default()
                                    })
                                })
                            };
                            view! {
                                <tr>
                                    <td>{row.style_no.clone()}</td>
                                    <td>{row.colorway.clone()}</td>
                                    <td>{row.product_code.clone()}</td>
                                    <td>{row.size.clone()}</td>
                                    <td>
                                        <input
                                            class="form__input form__input--narrow"
                                            type="number"
                                            min="0"
                                            prop:value=quantity
                                            on:input=move |ev| {
                                                let qty = parse_or_zero_int(&event_target_value(&ev));
                                                rows.update(|r| {
                                                    if let Some(x) = r.iter_mut().find(|x| x.key == key) {
                                                        x.set_quantity(qty);
                                                    }
                                                });
                                            }
                                        />
                                    </td>
                                    <td>{format_money(row.item_price)}</td>
                                    <td>{cell(|r| format_money(r.value))}</td>
                                    <td>{format_money(row.ldp_price)}</td>
                                    <td>{cell(|r| format_money(r.ldp_value))}</td>
                                    <td>
                                        <button
                                            class="button button--icon"
                                            on:click=move |_| {
                                                rows.update(|r| r.retain(|x| x.key != key));
                                            }
                                        >
                                            "✕"
                                        </button>
                                    </td>
                                </tr>
                            }
                        }
                    />
                </tbody>
                <tfoot>
                    {move || {
                        let t = rows.with(|r| totals(r));
                        view! {
                            <tr class="table__totals">
                                <td colspan="4">"Totals"</td>
                                <td>{t.quantity}</td>
                                <td></td>
                                <td>{format_money(t.value)}</td>
                                <td></td>
                                <td>{format_money(t.ldp_value)}</td>
                                <td></td>
                            </tr>
                        }
                    }}
                </tfoot>
            </table>
        </Modal>
    }
}
