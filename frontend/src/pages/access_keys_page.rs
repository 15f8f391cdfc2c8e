//! Access keys of the signed-in user.

use common::{
    access_key::{AccessKey, AccessKeySecret},
    alerts::{Alert, AlertStyle},
};
use dioxus::prelude::*;
use dioxus_free_icons::{Icon, icons::{md_action_icons::MdDelete, md_content_icons::MdContentCopy}};

use crate::{
    api::portal_api::{self, api_error},
    components::{error_boundary::ApiErrorDisplay, suspend_boundary::LoadingIndicator},
    data_definitions::app_context::use_app_context,
};

fn copy_to_clipboard(text: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let promise = window.navigator().clipboard().write_text(text);
    spawn(async move {
        if let Err(e) = wasm_bindgen_futures::JsFuture::from(promise).await {
            dioxus::logger::tracing::warn!("clipboard write failed: {:?}", e);
        }
    });
}

#[component]
pub fn AccessKeysPage() -> Element {
    let app = use_app_context();
    let user_uuid = use_memo(move || app.state.read().session.as_ref().map(|u| u.uuid.clone()).filter(|u| !u.is_empty()));
    let mut new_secret = use_signal(|| None::<AccessKeySecret>);

    let mut keys = use_resource(move || {
        let user_uuid = user_uuid();
        async move {
            match user_uuid {
                Some(uuid) => portal_api::list_access_keys(uuid).await.map(Some),
                None => Ok(None),
            }
        }
    });

    let on_secret = Callback::new(move |result: Result<AccessKeySecret, ServerFnError>| match result {
        Ok(secret) => {
            new_secret.set(Some(secret));
            keys.restart();
        }
        Err(e) => app.report(&api_error(&e)),
    });

    let on_delete = Callback::new(move |key: AccessKey| {
        spawn(async move {
            match portal_api::delete_access_key(key.at_id.clone()).await {
                Ok(()) => {
                    app.queue_alert(Alert::new("Access key deleted", vec![key.access_key_id.clone()], AlertStyle::Success));
                    keys.restart();
                }
                Err(e) => app.report(&api_error(&e)),
            }
        });
    });

    let listed = keys.read();
    let key_list = match listed.as_ref() {
        None => return rsx! { LoadingIndicator {} },
        Some(Err(e)) => return rsx! { ApiErrorDisplay { error: api_error(e) } },
        Some(Ok(None)) => return rsx! {
            div { style: "padding: 24px; font-size: 18px;", "Sign in to manage your access keys." }
        },
        Some(Ok(Some(list))) => list.clone(),
    };

    rsx! {
        div {
            style: "display:flex; flex-direction:column; gap: 16px; padding: 24px;",
            div {
                button {
                    style: "height: 34px; padding: 0 12px; border-radius: 8px; border: 1px solid #D1D5DB; background: white;",
                    onclick: move |_| {
                        spawn(async move { on_secret.call(portal_api::create_access_key().await) });
                    },
                    "Add Access Key"
                }
            }
            if let Some(secret) = new_secret() {
                NewSecretPanel { secret, on_close: move |_| new_secret.set(None) }
            }
            table {
                style: "border-collapse: collapse; max-width: 900px;",
                thead {
                    tr {
                        th { style: "text-align: left; padding: 6px;", "Access Key ID" }
                        th { style: "text-align: left; padding: 6px;", "Created" }
                        th { style: "text-align: left; padding: 6px;", "Description" }
                        th {}
                    }
                }
                tbody {
                    for key in key_list.into_iter() {
                        AccessKeyRow { key: "{key.at_id}", access_key: key.clone(), on_secret, on_delete }
                    }
                }
            }
        }
    }
}

#[component]
fn AccessKeyRow(access_key: AccessKey, on_secret: Callback<Result<AccessKeySecret, ServerFnError>>, on_delete: Callback<AccessKey>) -> Element {
    let at_id = access_key.at_id.clone();
    let deleted = access_key.clone();
    rsx! {
        tr {
            style: "border-top: 1px solid #E5E7EB;",
            td { style: "padding: 6px; font-family: monospace;", "{access_key.access_key_id}" }
            td { style: "padding: 6px;", "{access_key.date_created.clone().unwrap_or_default()}" }
            td { style: "padding: 6px;", "{access_key.description.clone().unwrap_or_default()}" }
            td {
                style: "padding: 6px; display:flex; gap: 6px;",
                button {
                    onclick: move |_| {
                        let at_id = at_id.clone();
                        spawn(async move { on_secret.call(portal_api::reset_access_key_secret(at_id).await) });
                    },
                    "Reset secret"
                }
                button {
                    title: "Delete",
                    onclick: move |_| on_delete.call(deleted.clone()),
                    Icon { icon: MdDelete, style: "width: 18px; height: 18px;" }
                }
            }
        }
    }
}

/// Shown once after creating or resetting a key. The portal never returns the
/// secret again.
#[component]
fn NewSecretPanel(secret: AccessKeySecret, on_close: Callback<()>) -> Element {
    let text = format!("{}:{}", secret.access_key_id, secret.secret_access_key);
    rsx! {
        div {
            class: "x-alert-warning",
            style: "display:flex; flex-direction:column; gap: 6px; padding: 12px; border: 1px solid; border-radius: 6px; max-width: 900px;",
            b { "Copy this secret now. It will not be shown again." }
            div { style: "font-family: monospace;", "ID: {secret.access_key_id}" }
            div { style: "font-family: monospace;", "Secret: {secret.secret_access_key}" }
            div {
                style: "display:flex; gap: 8px;",
                button {
                    onclick: move |_| copy_to_clipboard(&text),
                    Icon { icon: MdContentCopy, style: "width: 16px; height: 16px;" }
                    " Copy"
                }
                button { onclick: move |_| on_close.call(()), "Done" }
            }
        }
    }
}
