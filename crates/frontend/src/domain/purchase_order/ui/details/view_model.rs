use super::cascade;
use super::po_check::UniquenessGate;
use crate::domain::purchase_order::api;
use contracts::domain::purchase_order::draft::OrderDraft;
use contracts::domain::purchase_order::line_items::{
    rows_from_backend, style_summary, totals, LineItemRow,
};
use contracts::domain::purchase_order::mapping::{
    canonical_draft, BINARY_FIELDS, IMAGE_NAME_FIELDS, ORDER_DETAILS,
};
use contracts::domain::purchase_order::payload::{
    build_order_payload, encode_attachment, strip_data_uri, Attachment, AttachmentSet,
    ResolveContext,
};
use contracts::domain::reference::{find_id, ReferenceOption, SizeRange};
use leptos::prelude::*;
use serde_json::Value;
use std::collections::BTreeMap;
use wasm_bindgen_futures::spawn_local;

/// One reference-data list with its own loading and error state, so a
/// failed fetch degrades a single dropdown instead of the whole form.
pub struct ReferenceSlice<T: 'static> {
    pub options: RwSignal<Vec<T>>,
    pub loading: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
}

impl<T> Clone for ReferenceSlice<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for ReferenceSlice<T> {}

impl<T: Clone + Send + Sync + 'static> ReferenceSlice<T> {
    pub fn new() -> Self {
        Self {
            options: RwSignal::new(Vec::new()),
            loading: RwSignal::new(false),
            error: RwSignal::new(None),
        }
    }

    pub fn start(&self) {
        self.loading.set(true);
        self.error.set(None);
    }

    pub fn resolve(&self, result: Result<Vec<T>, String>, what: &'static str) {
        self.loading.set(false);
        match result {
            Ok(items) => self.options.set(items),
            Err(e) => {
                log::error!("Failed to load {}: {}", what, e);
                self.options.set(Vec::new());
                self.error.set(Some(e));
            }
        }
    }

    pub fn clear(&self) {
        self.options.set(Vec::new());
        self.loading.set(false);
        self.error.set(None);
    }
}

impl ReferenceSlice<ReferenceOption> {
    /// Display names for the select component.
    pub fn names(&self) -> Signal<Vec<String>> {
        let options = self.options;
        Signal::derive(move || options.get().iter().map(|o| o.name.clone()).collect())
    }

    pub fn id_of(&self, name: &str) -> Option<i64> {
        self.options.with_untracked(|opts| find_id(opts, name))
    }
}

/// A file picked in the form but not yet submitted. Raw bytes only; base64
/// encoding happens once, when the order is actually saved.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// What one attachment slot sends at submission time: a freshly picked file
/// wins over whatever came with the fetched order, and is encoded here and
/// nowhere earlier.
pub fn resolve_attachment(existing: &Attachment, pending: Option<&PendingFile>) -> Attachment {
    match pending {
        Some(p) => Attachment {
            name: p.name.clone(),
            content: encode_attachment(&p.bytes),
        },
        None => existing.clone(),
    }
}

/// One attachment slot. `existing` holds the base64 content that came with a
/// fetched order; `pending` the raw bytes of a newly picked file.
#[derive(Clone, Copy)]
pub struct AttachmentSlot {
    pub label: &'static str,
    pub existing: RwSignal<Attachment>,
    pub pending: RwSignal<Option<PendingFile>>,
}

impl AttachmentSlot {
    fn new(label: &'static str) -> Self {
        Self {
            label,
            existing: RwSignal::new(Attachment::default()),
            pending: RwSignal::new(None),
        }
    }

    /// File name shown next to the picker: the pending file, else the stored
    /// one.
    pub fn display_name(&self) -> Signal<String> {
        let existing = self.existing;
        let pending = self.pending;
        Signal::derive(move || {
            pending.with(|p| p.as_ref().map(|f| f.name.clone()))
                .unwrap_or_else(|| existing.with(|a| a.name.clone()))
        })
    }

    /// Read a freshly picked file into raw bytes. A read failure surfaces on
    /// the shared error signal and leaves the previous content in place.
    pub fn choose_file(&self, file: web_sys::File, error: RwSignal<Option<String>>) {
        let pending = self.pending;
        spawn_local(async move {
            match read_file_bytes(&file).await {
                Ok(read) => pending.set(Some(read)),
                Err(e) => error.set(Some(e)),
            }
        });
    }

    fn resolve(&self) -> Attachment {
        self.existing.with_untracked(|existing| {
            self.pending
                .with_untracked(|pending| resolve_attachment(existing, pending.as_ref()))
        })
    }

    pub fn clear(&self) {
        self.existing.set(Attachment::default());
        self.pending.set(None);
    }
}

async fn read_file_bytes(file: &web_sys::File) -> Result<PendingFile, String> {
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
        .await
        .map_err(|_| format!("Failed to read file {}", file.name()))?;
    Ok(PendingFile {
        name: file.name(),
        bytes: js_sys::Uint8Array::new(&buffer).to_vec(),
    })
}

/// ViewModel for the purchase-order form.
///
/// Owns the draft, the line-item rows, the reference-data slices, the
/// portfolio -> category -> group cascade and the PO-number uniqueness gate.
#[derive(Clone, Copy)]
pub struct PurchaseOrderViewModel {
    pub form: RwSignal<OrderDraft>,
    pub rows: RwSignal<Vec<LineItemRow>>,
    pub loading: RwSignal<bool>,
    pub saving: RwSignal<bool>,
    /// Submission failure; form state is preserved so the user can retry.
    pub error: RwSignal<Option<String>>,
    /// Degraded-prefill notice (copy flow with a failed base fetch).
    pub notice: RwSignal<Option<String>>,
    pub field_errors: RwSignal<BTreeMap<&'static str, String>>,

    pub customers: ReferenceSlice<ReferenceOption>,
    pub suppliers: ReferenceSlice<ReferenceOption>,
    pub merchants: ReferenceSlice<ReferenceOption>,
    pub portfolios: ReferenceSlice<ReferenceOption>,
    pub categories: ReferenceSlice<ReferenceOption>,
    pub groups: ReferenceSlice<ReferenceOption>,
    pub payment_modes: ReferenceSlice<ReferenceOption>,
    pub delivery_types: ReferenceSlice<ReferenceOption>,
    pub shipment_modes: ReferenceSlice<ReferenceOption>,
    pub banks: ReferenceSlice<ReferenceOption>,
    pub inquiries: ReferenceSlice<ReferenceOption>,
    pub costing_refs: ReferenceSlice<ReferenceOption>,
    pub size_ranges: ReferenceSlice<SizeRange>,

    pub gate: RwSignal<UniquenessGate>,
    /// Debounce generation for the uniqueness check; a keystroke bumps it
    /// and orphans any sleeping check.
    debounce_seq: StoredValue<u64>,

    pub attachments: [AttachmentSlot; 5],
}

impl PurchaseOrderViewModel {
    pub fn new() -> Self {
        Self {
            form: RwSignal::new(OrderDraft::default()),
            rows: RwSignal::new(Vec::new()),
            loading: RwSignal::new(false),
            saving: RwSignal::new(false),
            error: RwSignal::new(None),
            notice: RwSignal::new(None),
            field_errors: RwSignal::new(BTreeMap::new()),
            customers: ReferenceSlice::new(),
            suppliers: ReferenceSlice::new(),
            merchants: ReferenceSlice::new(),
            portfolios: ReferenceSlice::new(),
            categories: ReferenceSlice::new(),
            groups: ReferenceSlice::new(),
            payment_modes: ReferenceSlice::new(),
            delivery_types: ReferenceSlice::new(),
            shipment_modes: ReferenceSlice::new(),
            banks: ReferenceSlice::new(),
            inquiries: ReferenceSlice::new(),
            costing_refs: ReferenceSlice::new(),
            size_ranges: ReferenceSlice::new(),
            gate: RwSignal::new(UniquenessGate::new()),
            debounce_seq: StoredValue::new(0),
            attachments: [
                AttachmentSlot::new("PO image"),
                AttachmentSlot::new("Product image"),
                AttachmentSlot::new("Final specs"),
                AttachmentSlot::new("PP comment"),
                AttachmentSlot::new("Size set comment"),
            ],
        }
    }

    /// Fire the independent reference-list fetches in parallel. Each slice
    /// resolves on its own; one failure never blocks the others.
    pub fn load_reference_lists(&self) {
        macro_rules! load {
            ($slice:expr, $fetch:expr, $what:literal) => {{
                let slice = $slice;
                slice.start();
                spawn_local(async move {
                    slice.resolve($fetch.await, $what);
                });
            }};
        }
        load!(self.customers, api::get_customers(), "customers");
        load!(self.suppliers, api::get_suppliers(), "suppliers");
        load!(self.merchants, api::get_merchants(), "merchants");
        load!(self.portfolios, api::get_product_portfolios(), "product portfolios");
        load!(self.payment_modes, api::get_payment_modes(), "payment modes");
        load!(self.delivery_types, api::get_delivery_types(), "delivery types");
        load!(self.shipment_modes, api::get_shipment_modes(), "shipment modes");
        load!(self.banks, api::get_banks(), "banks");
        load!(self.inquiries, api::get_inquiry_samples(), "inquiry samples");
        load!(self.costing_refs, api::get_costing_ref_nos(), "costing references");
        load!(self.size_ranges, api::get_size_ranges(), "size ranges");
    }

    /// New-order flow: empty draft plus the next AMS reference number.
    pub fn init_new(&self) {
        self.form.set(OrderDraft::default());
        self.rows.set(Vec::new());
        for slot in &self.attachments {
            slot.clear();
        }
        self.gate.update(|g| g.reset());
        let form = self.form;
        spawn_local(async move {
            match api::get_next_ams_ref_no().await {
                Ok(ref_no) if !ref_no.is_empty() => {
                    form.update(|f| f.ams_ref_no = ref_no);
                }
                Ok(_) => {}
                Err(e) => log::warn!("Failed to fetch next AMS ref no: {}", e),
            }
        });
    }

    /// Edit/copy flow. Fetches the full order; if that fails, falls back to
    /// a degraded prefill from the flat fields of the list row the user
    /// clicked, rather than presenting a blank form.
    pub fn load_existing(&self, id: i64, copy: bool, fallback_row: Value) {
        let vm = *self;
        vm.loading.set(true);
        vm.notice.set(None);
        spawn_local(async move {
            match api::get_purchase_order(id).await {
                Ok(raw) => vm.hydrate(&raw, copy).await,
                Err(e) => {
                    log::warn!("Order {} fetch failed, using degraded prefill: {}", id, e);
                    vm.notice.set(Some(
                        "The full order could not be loaded; only summary fields were copied."
                            .to_string(),
                    ));
                    vm.hydrate(&fallback_row, copy).await;
                }
            }
            vm.loading.set(false);
        });
    }

    /// Populate the form from a raw backend record, then re-trigger the
    /// dependent category/group fetches with the source order's ids so the
    /// cascade selects are populated before the user sees the form.
    async fn hydrate(&self, raw: &Value, copy: bool) {
        let mut draft = canonical_draft(raw);
        if copy {
            draft.internal_id = None;
            draft.customer_po_number.clear();
        }

        self.rows.set(rows_from_backend(
            raw.get(ORDER_DETAILS).unwrap_or(&Value::Null),
        ));
        for (i, slot) in self.attachments.iter().enumerate() {
            slot.pending.set(None);
            slot.existing.set(Attachment {
                name: text_at(raw, IMAGE_NAME_FIELDS[i]),
                content: strip_data_uri(&text_at(raw, BINARY_FIELDS[i])).to_string(),
            });
        }

        let portfolio = draft.product_portfolio.clone();
        let category = draft.product_category.clone();
        let customer = draft.customer.clone();
        self.form.set(draft);
        self.gate.update(|g| g.reset());

        if !portfolio.is_empty() {
            self.categories.start();
            let portfolios = match self.portfolios.options.get_untracked() {
                opts if !opts.is_empty() => opts,
                _ => api::get_product_portfolios().await.unwrap_or_default(),
            };
            let portfolio_id = find_id(&portfolios, &portfolio).unwrap_or(0);
            self.categories
                .resolve(api::get_product_categories(portfolio_id).await, "product categories");

            if !category.is_empty() {
                self.groups.start();
                let category_id = self.categories.id_of(&category).unwrap_or(0);
                self.groups
                    .resolve(api::get_product_groups(category_id).await, "product groups");
            }
        }

        if !customer.is_empty() {
            self.refresh_commission(&customer);
        }
    }

    /// Portfolio changed: selecting a higher cascade level always clears the
    /// lower selections and their option lists.
    pub fn on_portfolio_change(&self, name: String) {
        self.form
            .update(|f| cascade::apply_portfolio_selection(f, name.clone()));
        self.categories.clear();
        self.groups.clear();

        let Some(portfolio_id) = self.portfolios.id_of(&name) else {
            return;
        };
        let categories = self.categories;
        categories.start();
        spawn_local(async move {
            categories.resolve(
                api::get_product_categories(portfolio_id).await,
                "product categories",
            );
        });
    }

    pub fn on_category_change(&self, name: String) {
        self.form
            .update(|f| cascade::apply_category_selection(f, name.clone()));
        self.groups.clear();

        let Some(category_id) = self.categories.id_of(&name) else {
            return;
        };
        let groups = self.groups;
        groups.start();
        spawn_local(async move {
            groups.resolve(api::get_product_groups(category_id).await, "product groups");
        });
    }

    pub fn on_group_change(&self, name: String) {
        self.form.update(|f| f.product_group = name);
    }

    /// Customer changed: the commission field is derived, never edited.
    pub fn on_customer_change(&self, name: String) {
        self.form.update(|f| f.customer = name.clone());
        self.refresh_commission(&name);
    }

    fn refresh_commission(&self, customer: &str) {
        let form = self.form;
        match self.customers.id_of(customer) {
            Some(customer_id) if customer_id != 0 => {
                spawn_local(async move {
                    match api::get_commission(customer_id).await {
                        Ok(rate) => form.update(|f| f.commission = rate),
                        // Keep the previous value on a transient failure.
                        Err(e) => log::warn!("Commission lookup failed: {}", e),
                    }
                });
            }
            _ => form.update(|f| f.commission = 0.0),
        }
    }

    /// PO-number keystroke: debounce 500 ms, then issue the uniqueness
    /// check. The gate's token makes stale responses inert; emptying the
    /// field resets the gate with no network call.
    pub fn on_po_number_input(&self, value: String) {
        self.form.update(|f| f.customer_po_number = value.clone());
        let my_generation = self.debounce_seq.with_value(|v| v + 1);
        self.debounce_seq.set_value(my_generation);

        if value.trim().is_empty() {
            self.gate.update(|g| g.reset());
            return;
        }

        let gate = self.gate;
        let debounce_seq = self.debounce_seq;
        spawn_local(async move {
            gloo_timers::future::TimeoutFuture::new(500).await;
            if debounce_seq.get_value() != my_generation {
                return;
            }
            let Some(token) = gate.try_update(|g| g.begin()) else {
                return;
            };
            match api::already_exist_po_number(value.trim()).await {
                Ok(message) => gate.update(|g| g.apply_message(token, &message)),
                Err(e) => {
                    log::warn!("PO number check failed (ignored): {}", e);
                    gate.update(|g| g.apply_failure(token));
                }
            }
        });
    }

    /// Line-item dialog handed back its rows: adopt them and write the
    /// derived header fields from the one source of truth.
    pub fn apply_rows(&self, rows: Vec<LineItemRow>) {
        let t = totals(&rows);
        let styles = style_summary(&rows);
        self.form.update(|f| {
            f.style_summary = styles;
            f.total_quantity = t.quantity;
            f.total_value = t.value;
            f.total_ldp_value = t.ldp_value;
        });
        self.rows.set(rows);
    }

    fn validate(&self) -> bool {
        let mut errors = BTreeMap::new();
        self.form.with_untracked(|f| {
            if f.customer_po_number.trim().is_empty() {
                errors.insert("customer_po_number", "PO number is required".to_string());
            }
            if f.customer.trim().is_empty() {
                errors.insert("customer", "Customer is required".to_string());
            }
            if f.supplier.trim().is_empty() {
                errors.insert("supplier", "Supplier is required".to_string());
            }
        });
        let ok = errors.is_empty();
        self.field_errors.set(errors);
        ok
    }

    fn resolve_context(&self) -> ResolveContext {
        ResolveContext {
            customers: self.customers.options.get_untracked(),
            suppliers: self.suppliers.options.get_untracked(),
            merchants: self.merchants.options.get_untracked(),
            inquiries: self.inquiries.options.get_untracked(),
        }
    }

    /// Validate, encode attachments, translate and POST. A failure surfaces
    /// one notification and leaves the form intact for retry.
    pub fn save_command(&self, on_saved: Callback<()>) {
        if !self.validate() {
            return;
        }
        if self.gate.with_untracked(|g| g.blocks_save()) {
            return;
        }

        let vm = *self;
        vm.saving.set(true);
        vm.error.set(None);
        spawn_local(async move {
            // Base64 encoding happens here, not when the file was picked.
            let attachments = AttachmentSet {
                po_image: vm.attachments[0].resolve(),
                product_image: vm.attachments[1].resolve(),
                final_specs: vm.attachments[2].resolve(),
                pp_comment: vm.attachments[3].resolve(),
                size_set_comment: vm.attachments[4].resolve(),
            };

            let draft = vm.form.get_untracked();
            let rows = vm.rows.get_untracked();
            let payload = build_order_payload(&draft, &rows, &attachments, &vm.resolve_context());

            let result = match draft.internal_id {
                Some(poid) => api::update_purchase_order(poid, &payload).await,
                None => api::add_purchase_order(&payload).await,
            };
            vm.saving.set(false);
            match result {
                Ok(()) => on_saved.run(()),
                Err(e) => vm.error.set(Some(e)),
            }
        });
    }
}

fn text_at(raw: &Value, key: &str) -> String {
    raw.get(key).and_then(|v| v.as_str()).unwrap_or("").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_file_encoded_only_at_resolution() {
        let existing = Attachment {
            name: "old.png".to_string(),
            content: "T0xE".to_string(),
        };
        let pending = PendingFile {
            name: "new.png".to_string(),
            bytes: b"hi".to_vec(),
        };
        // The pending slot holds raw bytes; the base64 form first exists in
        // the resolved attachment.
        let resolved = resolve_attachment(&existing, Some(&pending));
        assert_eq!(resolved.name, "new.png");
        assert_eq!(resolved.content, "aGk=");
    }

    #[test]
    fn test_no_pending_file_keeps_stored_attachment() {
        let existing = Attachment {
            name: "old.png".to_string(),
            content: "T0xE".to_string(),
        };
        assert_eq!(resolve_attachment(&existing, None), existing);
    }
}
