use dioxus::prelude::*;

use crate::vm::ProfileField;

/// Edits a list of text fields locally and hands them back on submit.
#[component]
pub fn FieldsForm(
    fields: Vec<ProfileField>,
    submit_label: &'static str,
    busy: bool,
    on_submit: EventHandler<Vec<ProfileField>>,
    on_cancel: Option<EventHandler<()>>,
) -> Element {
    let mut draft = use_signal(|| fields.clone());

    rsx! {
        form {
            class: "fields-form",
            onsubmit: move |evt: FormEvent| {
                evt.prevent_default();
                if busy {
                    return;
                }
                on_submit.call(draft());
            },
            for (index, field) in draft().into_iter().enumerate() {
                div { class: "form-group", key: "{field.key}",
                    label { r#for: "field-{field.key}", "{field.label}" }
                    if field.multiline {
                        textarea {
                            id: "field-{field.key}",
                            rows: "3",
                            value: "{field.value}",
                            oninput: move |evt| draft.write()[index].value = evt.value(),
                        }
                    } else {
                        input {
                            id: "field-{field.key}",
                            r#type: "text",
                            value: "{field.value}",
                            oninput: move |evt| draft.write()[index].value = evt.value(),
                        }
                    }
                }
            }
            div { class: "form-actions",
                button { class: "btn btn-primary", r#type: "submit", disabled: busy, "{submit_label}" }
                if let Some(on_cancel) = on_cancel {
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| on_cancel.call(()),
                        "Cancel"
                    }
                }
            }
        }
    }
}
