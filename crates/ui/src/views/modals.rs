use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use dioxus::document::eval;
use dioxus::prelude::*;
use portal_core::model::Role;
use portal_core::validation::RegistrationDraft;
use services::ImageEditor;
use tracing::{debug, warn};

use crate::context::AppContext;
use crate::views::state::{Modal, use_portal_state, use_watch};

/// Renders whichever auth dialog is open.
#[component]
pub fn ModalHost() -> Element {
    let modal = use_portal_state().modal;
    let Some(open) = modal() else {
        return rsx! {};
    };
    rsx! {
        div { class: "modal-backdrop",
            div { class: "modal", role: "dialog",
                match open {
                    Modal::Login => rsx! { LoginModal {} },
                    Modal::Register => rsx! { RegisterModal {} },
                    Modal::Otp => rsx! { OtpModal {} },
                    Modal::ForgotPassword => rsx! { ForgotPasswordModal {} },
                }
            }
        }
    }
}

#[component]
fn ModalHeader(title: &'static str) -> Element {
    let mut modal = use_portal_state().modal;
    let ctx = use_context::<AppContext>();
    rsx! {
        div { class: "modal-header",
            h3 { "{title}" }
            button {
                class: "modal-close",
                title: "Close",
                onclick: move |_| {
                    if modal() == Some(Modal::Otp) {
                        ctx.auth().cancel_verification();
                    }
                    modal.set(None);
                },
                i { class: "fas fa-times" }
            }
        }
    }
}

#[component]
fn LoginModal() -> Element {
    let ctx = use_context::<AppContext>();
    let mut modal = use_portal_state().modal;
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut remember = use_signal(|| false);
    let mut busy = use_signal(|| false);

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        if busy() {
            return;
        }
        busy.set(true);
        let auth = ctx.auth();
        spawn(async move {
            // Success closes the dialog through the sign-in event.
            if let Err(err) = auth.login(&email(), &password(), remember()).await {
                debug!(error = %err, "login failed");
            }
            busy.set(false);
        });
    };

    rsx! {
        ModalHeader { title: "Login" }
        form { class: "modal-form", onsubmit: submit,
            input { r#type: "email", placeholder: "Email", value: "{email}", oninput: move |evt| email.set(evt.value()) }
            input { r#type: "password", placeholder: "Password", value: "{password}", oninput: move |evt| password.set(evt.value()) }
            label { class: "checkbox",
                input { r#type: "checkbox", checked: remember(), onchange: move |evt| remember.set(evt.checked()) }
                " Remember me"
            }
            button { class: "btn btn-primary btn-block", r#type: "submit", disabled: busy(),
                if busy() { "Signing in..." } else { "Login" }
            }
        }
        div { class: "modal-links",
            button { class: "link", onclick: move |_| modal.set(Some(Modal::ForgotPassword)), "Forgot password?" }
            button { class: "link", onclick: move |_| modal.set(Some(Modal::Register)), "Create an account" }
        }
    }
}

#[component]
fn ForgotPasswordModal() -> Element {
    let ctx = use_context::<AppContext>();
    let mut modal = use_portal_state().modal;
    let mut email = use_signal(String::new);
    let mut busy = use_signal(|| false);

    rsx! {
        ModalHeader { title: "Reset Password" }
        form {
            class: "modal-form",
            onsubmit: move |evt: FormEvent| {
                evt.prevent_default();
                if busy() {
                    return;
                }
                busy.set(true);
                let auth = ctx.auth();
                spawn(async move {
                    let sent = auth.forgot_password(&email()).await;
                    busy.set(false);
                    if sent.is_ok() {
                        modal.set(Some(Modal::Login));
                    }
                });
            },
            p { "Enter your account email and we will send a reset link." }
            input { r#type: "email", placeholder: "Email", value: "{email}", oninput: move |evt| email.set(evt.value()) }
            button { class: "btn btn-primary btn-block", r#type: "submit", disabled: busy(), "Send Reset Link" }
        }
        div { class: "modal-links",
            button { class: "link", onclick: move |_| modal.set(Some(Modal::Login)), "Back to login" }
        }
    }
}

#[component]
fn OtpModal() -> Element {
    let ctx = use_context::<AppContext>();
    let state = use_portal_state();
    let cooldown = use_watch(|| ctx.auth().cooldown().subscribe());
    let mut code = use_signal(String::new);
    let mut busy = use_signal(|| false);
    let mut refocus = use_signal(|| false);
    let email = state.auth.read().pending_email.clone().unwrap_or_default();
    let remaining = cooldown();

    use_effect(move || {
        if !refocus() {
            return;
        }
        refocus.set(false);
        let _ = eval("document.getElementById('otp-code')?.focus();");
    });

    let verify_ctx = ctx.clone();
    let verify = move |evt: FormEvent| {
        evt.prevent_default();
        if busy() {
            return;
        }
        busy.set(true);
        let auth = verify_ctx.auth();
        spawn(async move {
            if let Err(err) = auth.verify_otp(&code()).await {
                debug!(error = %err, "verification failed");
                code.set(String::new());
                refocus.set(true);
            }
            busy.set(false);
        });
    };

    rsx! {
        ModalHeader { title: "Verify Your Email" }
        form { class: "modal-form", onsubmit: verify,
            p { "We sent a 6-digit code to " strong { "{email}" } "." }
            input {
                id: "otp-code",
                class: "otp-input",
                r#type: "text",
                autofocus: true,
                inputmode: "numeric",
                maxlength: "6",
                placeholder: "000000",
                value: "{code}",
                oninput: move |evt| code.set(evt.value().chars().filter(char::is_ascii_digit).take(6).collect()),
            }
            button { class: "btn btn-primary btn-block", r#type: "submit", disabled: busy(), "Verify" }
        }
        div { class: "modal-links",
            button {
                class: "link",
                disabled: remaining > 0,
                onclick: move |_| {
                    let auth = ctx.auth();
                    spawn(async move {
                        if let Err(err) = auth.resend_otp().await {
                            debug!(error = %err, "resend refused");
                        }
                    });
                },
                if remaining > 0 { "Resend code in {remaining}s" } else { "Resend code" }
            }
        }
    }
}

/// MIME type the image editor expects, from the picked file's extension.
fn image_mime(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        _ => None,
    }
}

#[component]
fn RegisterModal() -> Element {
    let ctx = use_context::<AppContext>();
    let mut modal = use_portal_state().modal;
    let mut draft = use_signal(RegistrationDraft::default);
    let mut busy = use_signal(|| false);

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        if busy() {
            return;
        }
        busy.set(true);
        let auth = ctx.auth();
        let registration = draft();
        spawn(async move {
            // Success moves on to the code entry through the verification event.
            if let Err(err) = auth.register(registration).await {
                debug!(error = %err, "registration failed");
            }
            busy.set(false);
        });
    };

    let is_student = draft.read().user_type == Role::Student;

    rsx! {
        ModalHeader { title: "Create Account" }
        form { class: "modal-form register-form", onsubmit: submit,
            div { class: "form-row",
                select {
                    value: "{draft.read().user_type.as_str()}",
                    onchange: move |evt| {
                        draft.write().user_type = if evt.value() == Role::Teacher.as_str() {
                            Role::Teacher
                        } else {
                            Role::Student
                        };
                    },
                    option { value: Role::Student.as_str(), "Student" }
                    option { value: Role::Teacher.as_str(), "Faculty" }
                }
                select {
                    value: "{draft.read().gender}",
                    onchange: move |evt| draft.write().gender = evt.value(),
                    option { value: "", "Gender" }
                    option { value: "male", "Male" }
                    option { value: "female", "Female" }
                    option { value: "other", "Other" }
                }
            }
            input { placeholder: "Full Name", value: "{draft.read().full_name}", oninput: move |evt| draft.write().full_name = evt.value() }
            input { r#type: "email", placeholder: "Email", value: "{draft.read().email}", oninput: move |evt| draft.write().email = evt.value() }
            div { class: "form-row",
                input { r#type: "password", placeholder: "Password", value: "{draft.read().password}", oninput: move |evt| draft.write().password = evt.value() }
                input { r#type: "password", placeholder: "Confirm Password", value: "{draft.read().confirm_password}", oninput: move |evt| draft.write().confirm_password = evt.value() }
            }
            if is_student {
                div { class: "form-row",
                    input { placeholder: "Registration No", value: "{draft.read().registration_no}", oninput: move |evt| draft.write().registration_no = evt.value() }
                    input { placeholder: "Course", value: "{draft.read().course}", oninput: move |evt| draft.write().course = evt.value() }
                }
                div { class: "form-row",
                    input { r#type: "number", min: "1", max: "6", placeholder: "Year", value: "{draft.read().year}", oninput: move |evt| draft.write().year = evt.value() }
                    input { r#type: "number", min: "1", max: "12", placeholder: "Semester", value: "{draft.read().semester}", oninput: move |evt| draft.write().semester = evt.value() }
                }
                div { class: "form-row",
                    input { placeholder: "Category", value: "{draft.read().caste}", oninput: move |evt| draft.write().caste = evt.value() }
                    input { r#type: "date", value: "{draft.read().date_of_birth}", oninput: move |evt| draft.write().date_of_birth = evt.value() }
                }
            } else {
                div { class: "form-row",
                    input { placeholder: "Designation", value: "{draft.read().designation}", oninput: move |evt| draft.write().designation = evt.value() }
                    input { placeholder: "Qualification", value: "{draft.read().qualification}", oninput: move |evt| draft.write().qualification = evt.value() }
                }
                input { r#type: "number", min: "0", placeholder: "Experience (years)", value: "{draft.read().experience_years}", oninput: move |evt| draft.write().experience_years = evt.value() }
                textarea { rows: "3", placeholder: "Short bio", value: "{draft.read().bio}", oninput: move |evt| draft.write().bio = evt.value() }
            }
            ProfilePicturePicker { on_saved: move |image: Option<String>| draft.write().profile_pic = image }
            label { class: "checkbox",
                input { r#type: "checkbox", checked: draft.read().accepted_terms, onchange: move |evt| draft.write().accepted_terms = evt.checked() }
                " I accept the terms and conditions"
            }
            button { class: "btn btn-primary btn-block", r#type: "submit", disabled: busy(),
                if busy() { "Registering..." } else { "Register" }
            }
        }
        div { class: "modal-links",
            button { class: "link", onclick: move |_| modal.set(Some(Modal::Login)), "Already have an account? Login" }
        }
    }
}

/// File picker plus square crop; reports the saved data URL, or `None` when cleared.
#[component]
fn ProfilePicturePicker(on_saved: EventHandler<Option<String>>) -> Element {
    let ctx = use_context::<AppContext>();
    let mut editor = use_signal(ImageEditor::new);
    let mut preview = use_signal(|| None::<String>);

    let toasts = ctx.toasts();
    let pick = move |evt: FormEvent| {
        let toasts = toasts.clone();
        async move {
            let Some(file) = evt.files().into_iter().next() else {
                return;
            };
            let name = file.name();
            let Some(mime) = image_mime(&name) else {
                toasts.error("Please select a valid image file (JPG, PNG)");
                return;
            };
            let bytes = match file.read_bytes().await {
                Ok(bytes) => bytes,
                Err(err) => {
                    warn!(error = %err, file = %name, "could not read picked image");
                    toasts.error("Could not read the selected file");
                    return;
                }
            };
            match editor.write().load(&bytes, mime) {
                Ok(size) => {
                    debug!(?size, "profile picture loaded");
                    preview.set(Some(format!("data:{mime};base64,{}", B64.encode(&bytes))));
                    on_saved.call(None);
                }
                Err(err) => {
                    toasts.error(err.to_string());
                }
            }
        }
    };

    let save_toasts = ctx.toasts();
    let save = move |_: MouseEvent| {
        let saved = editor.write().save();
        match saved {
            Ok(data_url) => on_saved.call(Some(data_url)),
            Err(err) => {
                save_toasts.error(err.to_string());
            }
        }
    };

    let start_toasts = ctx.toasts();
    let snapshot = editor.read();
    let size = snapshot.preview_size();
    let cropping = snapshot.is_cropping();
    let selection = snapshot.selection().map(|rect| rect.normalized());
    let cropped = snapshot.cropped_image().map(str::to_owned);
    drop(snapshot);

    rsx! {
        div { class: "image-picker",
            label { "Profile picture (optional)" }
            input { r#type: "file", accept: "image/png,image/jpeg", onchange: pick }
            if let (Some(src), Some((width, height))) = (preview(), size) {
                div {
                    class: if cropping { "crop-stage cropping" } else { "crop-stage" },
                    style: "width: {width}px; height: {height}px;",
                    onmousedown: move |evt| {
                        let point = evt.element_coordinates();
                        editor.write().begin_drag(point.x, point.y);
                    },
                    onmousemove: move |evt| {
                        let point = evt.element_coordinates();
                        editor.write().drag_to(point.x, point.y);
                    },
                    onmouseup: move |_| editor.write().end_drag(),
                    img { src: "{src}", width: "{width}", height: "{height}", draggable: "false" }
                    if let Some((x, y, side)) = selection {
                        div { class: "crop-selection", style: "left: {x}px; top: {y}px; width: {side}px; height: {side}px;" }
                    }
                }
                div { class: "crop-actions",
                    if cropping {
                        button { class: "btn btn-primary btn-sm", r#type: "button", onclick: save, "Save Crop" }
                        button {
                            class: "btn btn-secondary btn-sm",
                            r#type: "button",
                            onclick: move |_| editor.write().cancel(),
                            "Cancel"
                        }
                    } else {
                        button {
                            class: "btn btn-outline btn-sm",
                            r#type: "button",
                            onclick: move |_| {
                                if let Err(err) = editor.write().start_crop() {
                                    start_toasts.error(err.to_string());
                                }
                            },
                            "Crop Image"
                        }
                    }
                }
            }
            if let Some(cropped) = cropped {
                img { class: "avatar-preview", src: "{cropped}", alt: "Cropped profile picture" }
            }
        }
    }
}
