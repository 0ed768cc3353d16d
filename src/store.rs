//! IndexedDB plumbing for the view-history blob: one database, one object
//! store, one well-known key.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Event, IdbDatabase, IdbRequest, IdbTransactionMode};

use peeka_core::VIEW_HISTORY_KEY;

const DB_NAME: &str = "peeka";
const DB_VERSION: u32 = 1;
const STORE_HISTORY: &str = "history";

pub(crate) async fn open() -> Result<IdbDatabase, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("missing window"))?;
    let factory = window
        .indexed_db()?
        .ok_or_else(|| JsValue::from_str("indexeddb unavailable"))?;
    let request = factory.open_with_u32(DB_NAME, DB_VERSION)?;

    let request_for_upgrade = request.clone();
    let on_upgrade = Closure::once(move |_event: Event| {
        let Ok(result) = request_for_upgrade.result() else {
            return;
        };
        let Ok(db) = result.dyn_into::<IdbDatabase>() else {
            return;
        };
        if !db.object_store_names().contains(STORE_HISTORY) {
            let _ = db.create_object_store(STORE_HISTORY);
        }
    });
    request.set_onupgradeneeded(Some(on_upgrade.as_ref().unchecked_ref()));
    on_upgrade.forget();

    let value = wasm_bindgen_futures::JsFuture::from(settle(request.into())).await?;
    value.dyn_into::<IdbDatabase>()
}

pub(crate) async fn read_history(db: &IdbDatabase) -> Result<Option<Vec<u8>>, JsValue> {
    let tx = db.transaction_with_str_and_mode(STORE_HISTORY, IdbTransactionMode::Readonly)?;
    let store = tx.object_store(STORE_HISTORY)?;
    let request = store.get(&JsValue::from_str(VIEW_HISTORY_KEY))?;
    let value = wasm_bindgen_futures::JsFuture::from(settle(request)).await?;
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    Ok(Some(js_sys::Uint8Array::new(&value).to_vec()))
}

pub(crate) async fn write_history(db: &IdbDatabase, bytes: &[u8]) -> Result<(), JsValue> {
    let tx = db.transaction_with_str_and_mode(STORE_HISTORY, IdbTransactionMode::Readwrite)?;
    let store = tx.object_store(STORE_HISTORY)?;
    let array = js_sys::Uint8Array::from(bytes);
    let request = store.put_with_key(&array.buffer(), &JsValue::from_str(VIEW_HISTORY_KEY))?;
    let _ = wasm_bindgen_futures::JsFuture::from(settle(request)).await?;
    Ok(())
}

pub(crate) fn js_err(error: JsValue) -> String {
    if let Some(value) = error.as_string() {
        return value;
    }
    if let Ok(json) = js_sys::JSON::stringify(&error) {
        if let Some(value) = json.as_string() {
            return value;
        }
    }
    "js error".to_string()
}

fn settle(request: IdbRequest) -> js_sys::Promise {
    js_sys::Promise::new(&mut |resolve, reject| {
        let success_request = request.clone();
        let on_success = Closure::once(move |_event: Event| {
            let result = success_request.result().unwrap_or(JsValue::UNDEFINED);
            let _ = resolve.call1(&JsValue::NULL, &result);
        });
        let on_error = Closure::once(move |_event: Event| {
            let _ = reject.call1(&JsValue::NULL, &JsValue::from_str("indexeddb request failed"));
        });
        request.set_onsuccess(Some(on_success.as_ref().unchecked_ref()));
        request.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        on_success.forget();
        on_error.forget();
    })
}
