//! Purchase-order form: header fields, cascading product classification,
//! dates, bank details, attachments and the line-item dialog.

use super::line_items::LineItemsDialog;
use super::po_check::PoCheckState;
use super::view_model::PurchaseOrderViewModel;
use super::DetailsMode;
use crate::shared::components::date_input::DateInput;
use crate::shared::components::select::ReferenceSelect;
use crate::shared::date_utils::format_money;
use contracts::domain::purchase_order::draft::OrderDraft;
use contracts::domain::reference::find_name;
use leptos::prelude::*;

fn text_value(form: RwSignal<OrderDraft>, get: fn(&OrderDraft) -> &String) -> Signal<String> {
    Signal::derive(move || form.with(|f| get(f).clone()))
}

fn text_setter(form: RwSignal<OrderDraft>, set: fn(&mut OrderDraft, String)) -> Callback<String> {
    Callback::new(move |v| form.update(|f| set(f, v)))
}

#[component]
fn TextField(
    #[prop(into)] label: String,
    #[prop(into)] value: Signal<String>,
    on_change: Callback<String>,
    #[prop(optional, into)] error: Signal<Option<String>>,
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
            {move || {
                error.get().map(|e| view! {
                    <span class="form__hint form__hint--error">{e}</span>
                })
            }}
        </div>
    }
}

#[component]
fn ReadonlyField(#[prop(into)] label: String, #[prop(into)] value: Signal<String>) -> impl IntoView {
    view! {
        <div class="form__group">
            <label class="form__label">{label}</label>
            <input class="form__input" type="text" readonly prop:value=value />
        </div>
    }
}

#[component]
pub fn PurchaseOrderDetails(
    mode: DetailsMode,
    on_saved: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let vm = PurchaseOrderViewModel::new();
    vm.load_reference_lists();

    let title = match &mode {
        DetailsMode::New => "New purchase order",
        DetailsMode::Edit { .. } => "Edit purchase order",
        DetailsMode::Copy { .. } => "Copy purchase order",
    };
    match mode {
        DetailsMode::New => vm.init_new(),
        DetailsMode::Edit { id, fallback } => vm.load_existing(id, false, fallback),
        DetailsMode::Copy { id, fallback } => vm.load_existing(id, true, fallback),
    }

    let form = vm.form;
    let show_line_items = RwSignal::new(false);

    let po_state = Signal::derive(move || vm.gate.with(|g| g.state()));
    let po_error = Signal::derive(move || {
        vm.gate
            .with(|g| g.field_error().map(str::to_string))
            .or_else(|| vm.field_errors.with(|e| e.get("customer_po_number").cloned()))
    });

    let bank_name = Signal::derive(move || {
        let bank_id = form.with(|f| f.bank.bank_id);
        vm.banks
            .options
            .with(|opts| find_name(opts, bank_id).map(str::to_string))
            .unwrap_or_default()
    });
    let on_bank_change = Callback::new(move |name: String| {
        let bank_id = vm.banks.id_of(&name).unwrap_or(0);
        form.update(|f| f.bank.bank_id = bank_id);
    });

    let totals_text = Signal::derive(move || {
        form.with(|f| {
            format!(
                "{} pcs, value {}, LDP {}",
                f.total_quantity,
                format_money(f.total_value),
                format_money(f.total_ldp_value)
            )
        })
    });

    let save_disabled = Signal::derive(move || {
        vm.saving.get()
            || vm.loading.get()
            || po_state.get() == PoCheckState::Exists
            || po_state.get() == PoCheckState::Checking
    });

    view! {
        <div class="details">
            <div class="details__header">
                <h1 class="details__title">{title}</h1>
                <div class="details__actions">
                    <button
                        class="button button--primary"
                        disabled=save_disabled
                        on:click=move |_| vm.save_command(on_saved)
                    >
                        {move || if vm.saving.get() { "Saving..." } else { "Save" }}
                    </button>
                    <button class="button" on:click=move |_| on_cancel.run(())>
                        "Cancel"
                    </button>
                </div>
            </div>

            {move || {
                vm.error.get().map(|e| view! {
                    <div class="banner banner--error">{e}</div>
                })
            }}
            {move || {
                vm.notice.get().map(|n| view! {
                    <div class="banner banner--warning">{n}</div>
                })
            }}
            {move || {
                let errors = vm.field_errors.get();
                (!errors.is_empty()).then(|| view! {
                    <div class="banner banner--error">
                        {errors.values().cloned().collect::<Vec<_>>().join("; ")}
                    </div>
                })
            }}
            {move || {
                vm.loading.get().then(|| view! {
                    <div class="banner">"Loading order..."</div>
                })
            }}

            <h2 class="details__section">"Order"</h2>
            <div class="form__row">
                <div class="form__group">
                    <label class="form__label">"Customer PO number"</label>
                    <input
                        class="form__input"
                        type="text"
                        prop:value=text_value(form, |f| &f.customer_po_number)
                        on:input=move |ev| vm.on_po_number_input(event_target_value(&ev))
                    />
                    {move || match po_state.get() {
                        PoCheckState::Checking => Some(view! {
                            <span class="form__hint">"Checking..."</span>
                        }.into_any()),
                        _ => po_error.get().map(|e| view! {
                            <span class="form__hint form__hint--error">{e}</span>
                        }.into_any()),
                    }}
                </div>
                <ReferenceSelect
                    label="Customer"
                    value=text_value(form, |f| &f.customer)
                    on_change=Callback::new(move |name| vm.on_customer_change(name))
                    options=vm.customers.names()
                    loading=vm.customers.loading
                    load_error=vm.customers.error
                />
                <ReferenceSelect
                    label="Supplier"
                    value=text_value(form, |f| &f.supplier)
                    on_change=text_setter(form, |f, v| f.supplier = v)
                    options=vm.suppliers.names()
                    loading=vm.suppliers.loading
                    load_error=vm.suppliers.error
                />
                <ReferenceSelect
                    label="Inquiry / sample"
                    value=text_value(form, |f| &f.inquiry)
                    on_change=text_setter(form, |f, v| f.inquiry = v)
                    options=vm.inquiries.names()
                    loading=vm.inquiries.loading
                    load_error=vm.inquiries.error
                />
                <ReadonlyField
                    label="Commission %"
                    value=Signal::derive(move || form.with(|f| format_money(f.commission)))
                />
            </div>

            <div class="form__row">
                <div class="form__group">
                    <label class="form__label">"Merchants"</label>
                    {move || {
                        vm.merchants.error.get().map(|e| view! {
                            <span class="form__hint form__hint--error">
                                {format!("Unable to load list: {}", e)}
                            </span>
                        })
                    }}
                    <div class="form__checkbox-list">
                        <For
                            each=move || vm.merchants.options.get()
                            key=|opt| opt.id
                            children=move |opt| {
                                let name = opt.name.clone();
                                let checked = {
                                    let name = name.clone();
                                    Signal::derive(move || {
                                        form.with(|f| f.merchants.contains(&name))
                                    })
                                };
                                let toggle = {
                                    let name = name.clone();
                                    move |_| {
                                        let name = name.clone();
                                        form.update(|f| {
                                            match f.merchants.iter().position(|m| *m == name) {
                                                Some(pos) => {
                                                    f.merchants.remove(pos);
                                                }
                                                None => f.merchants.push(name),
                                            }
                                        });
                                    }
                                };
                                view! {
                                    <label class="form__checkbox">
                                        <input
                                            type="checkbox"
                                            prop:checked=checked
                                            on:change=toggle
                                        />
                                        {opt.name.clone()}
                                    </label>
                                }
                            }
                        />
                    </div>
                </div>
                <TextField
                    label="Proceedings"
                    value=text_value(form, |f| &f.proceedings)
                    on_change=text_setter(form, |f, v| f.proceedings = v)
                />
                <TextField
                    label="Order type"
                    value=text_value(form, |f| &f.order_type)
                    on_change=text_setter(form, |f, v| f.order_type = v)
                />
                <TextField
                    label="Transaction"
                    value=text_value(form, |f| &f.transaction)
                    on_change=text_setter(form, |f, v| f.transaction = v)
                />
                <TextField
                    label="Version"
                    value=text_value(form, |f| &f.version)
                    on_change=text_setter(form, |f, v| f.version = v)
                />
            </div>

            <h2 class="details__section">"Product"</h2>
            <div class="form__row">
                <ReferenceSelect
                    label="Product portfolio"
                    value=text_value(form, |f| &f.product_portfolio)
                    on_change=Callback::new(move |name| vm.on_portfolio_change(name))
                    options=vm.portfolios.names()
                    loading=vm.portfolios.loading
                    load_error=vm.portfolios.error
                />
                <ReferenceSelect
                    label="Product category"
                    value=text_value(form, |f| &f.product_category)
                    on_change=Callback::new(move |name| vm.on_category_change(name))
                    options=vm.categories.names()
                    loading=vm.categories.loading
                    load_error=vm.categories.error
                    disabled=Signal::derive(move || {
                        form.with(|f| f.product_portfolio.is_empty())
                    })
                />
                <ReferenceSelect
                    label="Product group"
                    value=text_value(form, |f| &f.product_group)
                    on_change=Callback::new(move |name| vm.on_group_change(name))
                    options=vm.groups.names()
                    loading=vm.groups.loading
                    load_error=vm.groups.error
                    disabled=Signal::derive(move || {
                        form.with(|f| f.product_category.is_empty())
                    })
                />
                <TextField
                    label="Fabric"
                    value=text_value(form, |f| &f.fabric)
                    on_change=text_setter(form, |f, v| f.fabric = v)
                />
                <TextField
                    label="Construction"
                    value=text_value(form, |f| &f.construction)
                    on_change=text_setter(form, |f, v| f.construction = v)
                />
                <TextField
                    label="Brand"
                    value=text_value(form, |f| &f.brand)
                    on_change=text_setter(form, |f, v| f.brand = v)
                />
            </div>

            <div class="form__row">
                <ReferenceSelect
                    label="Payment mode"
                    value=text_value(form, |f| &f.payment_mode)
                    on_change=text_setter(form, |f, v| f.payment_mode = v)
                    options=vm.payment_modes.names()
                    loading=vm.payment_modes.loading
                    load_error=vm.payment_modes.error
                />
                <ReferenceSelect
                    label="Delivery type"
                    value=text_value(form, |f| &f.delivery_type)
                    on_change=text_setter(form, |f, v| f.delivery_type = v)
                    options=vm.delivery_types.names()
                    loading=vm.delivery_types.loading
                    load_error=vm.delivery_types.error
                />
                <ReferenceSelect
                    label="Shipment mode"
                    value=text_value(form, |f| &f.shipment_mode)
                    on_change=text_setter(form, |f, v| f.shipment_mode = v)
                    options=vm.shipment_modes.names()
                    loading=vm.shipment_modes.loading
                    load_error=vm.shipment_modes.error
                />
                <TextField
                    label="Ratio"
                    value=text_value(form, |f| &f.ratio)
                    on_change=text_setter(form, |f, v| f.ratio = v)
                />
                <ReferenceSelect
                    label="Costing ref no"
                    value=text_value(form, |f| &f.costing_ref_no)
                    on_change=text_setter(form, |f, v| f.costing_ref_no = v)
                    options=vm.costing_refs.names()
                    loading=vm.costing_refs.loading
                    load_error=vm.costing_refs.error
                />
                <TextField
                    label="AMS ref no"
                    value=text_value(form, |f| &f.ams_ref_no)
                    on_change=text_setter(form, |f, v| f.ams_ref_no = v)
                />
            </div>

            <div class="form__row">
                <div class="form__group form__group--wide">
                    <label class="form__label">"PO special instructions"</label>
                    <textarea
                        class="form__input"
                        prop:value=text_value(form, |f| &f.po_special_instructions)
                        on:input=move |ev| {
                            form.update(|f| {
                                f.po_special_instructions = event_target_value(&ev);
                            });
                        }
                    ></textarea>
                </div>
            </div>

            <h2 class="details__section">"Dates"</h2>
            <div class="form__row">
                <DateInput
                    label="Placement"
                    value=text_value(form, |f| &f.placement_date)
                    on_change=text_setter(form, |f, v| f.placement_date = v)
                />
                <DateInput
                    label="ETA"
                    value=text_value(form, |f| &f.eta_date)
                    on_change=text_setter(form, |f, v| f.eta_date = v)
                />
                <DateInput
                    label="ETA New Jersey"
                    value=text_value(form, |f| &f.eta_new_jersey_date)
                    on_change=text_setter(form, |f, v| f.eta_new_jersey_date = v)
                />
                <DateInput
                    label="Final inspection"
                    value=text_value(form, |f| &f.final_inspection_date)
                    on_change=text_setter(form, |f, v| f.final_inspection_date = v)
                />
            </div>
            <div class="form__row">
                <DateInput
                    label="Buyer ship (initial)"
                    value=text_value(form, |f| &f.buyer_ship_initial_date)
                    on_change=text_setter(form, |f, v| f.buyer_ship_initial_date = v)
                />
                <DateInput
                    label="Buyer ship (last)"
                    value=text_value(form, |f| &f.buyer_ship_last_date)
                    on_change=text_setter(form, |f, v| f.buyer_ship_last_date = v)
                />
                <DateInput
                    label="Vendor ship (initial)"
                    value=text_value(form, |f| &f.vendor_ship_initial_date)
                    on_change=text_setter(form, |f, v| f.vendor_ship_initial_date = v)
                />
                <DateInput
                    label="Vendor ship (last)"
                    value=text_value(form, |f| &f.vendor_ship_last_date)
                    on_change=text_setter(form, |f, v| f.vendor_ship_last_date = v)
                />
            </div>

            <h2 class="details__section">"Bank"</h2>
            <div class="form__row">
                <ReferenceSelect
                    label="Bank"
                    value=bank_name
                    on_change=on_bank_change
                    options=vm.banks.names()
                    loading=vm.banks.loading
                    load_error=vm.banks.error
                />
                <TextField
                    label="Branch"
                    value=text_value(form, |f| &f.bank.branch)
                    on_change=text_setter(form, |f, v| f.bank.branch = v)
                />
                <TextField
                    label="Account"
                    value=text_value(form, |f| &f.bank.account)
                    on_change=text_setter(form, |f, v| f.bank.account = v)
                />
                <TextField
                    label="Routing"
                    value=text_value(form, |f| &f.bank.routing)
                    on_change=text_setter(form, |f, v| f.bank.routing = v)
                />
            </div>

            <h2 class="details__section">"Attachments"</h2>
            <div class="form__row">
                {vm.attachments
                    .iter()
                    .map(|slot| {
                        let slot = *slot;
                        view! {
                            <div class="form__group">
                                <label class="form__label">{slot.label}</label>
                                <input
                                    class="form__input"
                                    type="file"
                                    on:change=move |ev| {
                                        let input = event_target::<web_sys::HtmlInputElement>(&ev);
                                        if let Some(file) = input.files().and_then(|l| l.get(0)) {
                                            slot.choose_file(file, vm.error);
                                        }
                                    }
                                />
                                <span class="form__hint">{slot.display_name()}</span>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>

            <h2 class="details__section">"Line items"</h2>
            <div class="form__row">
                <ReadonlyField
                    label="Styles"
                    value=text_value(form, |f| &f.style_summary)
                />
                <ReadonlyField label="Totals" value=totals_text />
                <button class="button" on:click=move |_| show_line_items.set(true)>
                    "Edit line items"
                </button>
            </div>

            {move || {
                show_line_items.get().then(|| {
                    view! {
                        <LineItemsDialog
                            initial_rows=vm.rows.get_untracked()
                            size_ranges=vm.size_ranges.options
                            ranges_loading=vm.size_ranges.loading
                            ranges_error=vm.size_ranges.error
                            on_apply=Callback::new(move |rows| vm.apply_rows(rows))
                            on_close=Callback::new(move |_| show_line_items.set(false))
                        />
                    }
                })
            }}
        </div>
    }
}
