//! Google Identity Services sign-in button.
//!
//! Loads the GIS script on first use, then asks it to render its button into
//! a container element. The credential (a signed JWT) or a failure is handed
//! back through the supplied callback.
//!
//! ERROR HANDLING
//! ==============
//! A missing script, container or API surface is reported once through the
//! callback as `None`, the same way a failed popup is.

pub const SCRIPT_SRC: &str = "https://accounts.google.com/gsi/client";

/// Options object for `google.accounts.id.renderButton`.
#[cfg(any(test, feature = "csr"))]
fn button_options() -> [(&'static str, &'static str); 4] {
    [("theme", "outline"), ("size", "large"), ("text", "signin_with"), ("shape", "rectangular")]
}

/// Render the sign-in button into `container_id`.
pub fn render_button<F>(container_id: &str, client_id: &str, on_credential: F)
where
    F: Fn(Option<String>) + 'static,
{
    #[cfg(feature = "csr")]
    {
        bridge::render_when_loaded(container_id.to_owned(), client_id.to_owned(), std::rc::Rc::new(on_credential));
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (container_id, client_id, on_credential);
    }
}

#[cfg(feature = "csr")]
mod bridge {
    use std::rc::Rc;

    use js_sys::{Function, Object, Reflect};
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    use super::{SCRIPT_SRC, button_options};

    type Callback = Rc<dyn Fn(Option<String>)>;

    fn get(target: &JsValue, key: &str) -> Result<JsValue, JsValue> {
        let value = Reflect::get(target, &JsValue::from_str(key))?;
        if value.is_undefined() || value.is_null() {
            return Err(JsValue::from_str(&format!("{key} is not available")));
        }
        Ok(value)
    }

    fn id_api() -> Result<JsValue, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let google = get(&window, "google")?;
        let accounts = get(&google, "accounts")?;
        get(&accounts, "id")
    }

    pub(super) fn render_when_loaded(container_id: String, client_id: String, on_credential: Callback) {
        if id_api().is_ok() {
            render(&container_id, &client_id, on_credential);
            return;
        }
        if let Err(e) = inject_script(container_id, client_id, on_credential.clone()) {
            log::error!("could not load Google Identity Services: {e:?}");
            on_credential(None);
        }
    }

    fn inject_script(container_id: String, client_id: String, on_credential: Callback) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let script: web_sys::HtmlScriptElement = document.create_element("script")?.dyn_into()?;
        script.set_src(SCRIPT_SRC);
        script.set_async(true);

        let on_load = Closure::wrap(Box::new(move || {
            render(&container_id, &client_id, on_credential.clone());
        }) as Box<dyn FnMut()>);
        script.set_onload(Some(on_load.as_ref().unchecked_ref()));
        on_load.forget();

        let body = document.body().ok_or_else(|| JsValue::from_str("no body"))?;
        body.append_child(&script)?;
        Ok(())
    }

    fn render(container_id: &str, client_id: &str, on_credential: Callback) {
        if let Err(e) = try_render(container_id, client_id, on_credential.clone()) {
            log::error!("Google sign-in button failed: {e:?}");
            on_credential(None);
        }
    }

    fn try_render(container_id: &str, client_id: &str, on_credential: Callback) -> Result<(), JsValue> {
        let id = id_api()?;

        let callback = Closure::wrap(Box::new(move |response: JsValue| {
            let credential = Reflect::get(&response, &JsValue::from_str("credential"))
                .ok()
                .and_then(|v| v.as_string())
                .filter(|c| !c.is_empty());
            on_credential(credential);
        }) as Box<dyn FnMut(JsValue)>);

        let config = Object::new();
        Reflect::set(&config, &JsValue::from_str("client_id"), &JsValue::from_str(client_id))?;
        Reflect::set(&config, &JsValue::from_str("callback"), callback.as_ref())?;
        let initialize: Function = get(&id, "initialize")?.dyn_into()?;
        initialize.call1(&id, &config)?;
        callback.forget();

        let container = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(container_id))
            .ok_or_else(|| JsValue::from_str("button container missing"))?;
        let options = Object::new();
        for (key, value) in button_options() {
            Reflect::set(&options, &JsValue::from_str(key), &JsValue::from_str(value))?;
        }
        let render_button: Function = get(&id, "renderButton")?.dyn_into()?;
        render_button.call2(&id, &container, &options)?;
        Ok(())
    }
}
