use leptos::prelude::*;

/// Select bound to a reference-data list.
///
/// Each list loads independently; this component renders that list's own
/// loading and unable-to-load states inline so one failed fetch degrades a
/// single dropdown, never the whole form.
#[component]
pub fn ReferenceSelect(
    /// Label text
    #[prop(into)]
    label: String,
    /// Current value (a display name, or empty for the placeholder)
    #[prop(into)]
    value: Signal<String>,
    /// Change event handler, receives the selected display name
    on_change: Callback<String>,
    /// Option display names
    #[prop(into)]
    options: Signal<Vec<String>>,
    /// Whether the backing list is still loading
    #[prop(into)]
    loading: Signal<bool>,
    /// Load error for the backing list, if any
    #[prop(into)]
    load_error: Signal<Option<String>>,
    /// Disabled state
    #[prop(optional, into)]
    disabled: Signal<bool>,
) -> impl IntoView {
    let is_disabled = move || disabled.get() || loading.get() || load_error.get().is_some();

    view! {
        <div class="form__group">
            <label class="form__label">{label}</label>
            <select
                class="form__select"
                disabled=is_disabled
                on:change=move |ev| {
                    on_change.run(event_target_value(&ev));
                }
            >
                <option value="" selected=move || value.get().is_empty()>
                    {move || if loading.get() { "Loading..." } else { "-- select --" }}
                </option>
                <For
                    each=move || options.get()
                    key=|name| name.clone()
                    children=move |name| {
                        let name_for_selected = name.clone();
                        let is_selected = move || value.get() == name_for_selected;
                        view! {
                            <option value=name.clone() selected=is_selected>
                                {name.clone()}
                            </option>
                        }
                    }
                />
            </select>
            {move || {
                load_error.get().map(|e| view! {
                    <span class="form__hint form__hint--error">
                        {format!("Unable to load list: {}", e)}
                    </span>
                })
            }}
        </div>
    }
}
