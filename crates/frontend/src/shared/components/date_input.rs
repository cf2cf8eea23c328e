use leptos::prelude::*;

/// Labeled native date input bound to a `yyyy-mm-dd` string field.
/// An empty value is a valid state; the translator serializes it as null.
#[component]
pub fn DateInput(
    #[prop(into)] label: String,
    /// The date value in yyyy-mm-dd format
    #[prop(into)]
    value: Signal<String>,
    /// Callback when the date changes (receives yyyy-mm-dd format)
    on_change: Callback<String>,
) -> impl IntoView {
    view! {
        <div class="form__group">
            <label class="form__label">{label}</label>
            <input
                class="form__input"
                type="date"
                prop:value=value
                on:input=move |ev| {
                    on_change.run(event_target_value(&ev));
                }
            />
        </div>
    }
}
