use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::JsValue;

/// Read a plain JS object into `T` by way of its JSON text. `undefined` and
/// `null` read as an empty object.
pub fn from_js<T: DeserializeOwned>(value: &JsValue) -> anyhow::Result<T> {
    if value.is_undefined() || value.is_null() {
        return Ok(serde_json::from_str("{}")?);
    }
    let text = js_sys::JSON::stringify(value)
        .map_err(|e| anyhow::anyhow!("stringify failed: {:?}", e))?;
    let text = String::from(text);
    Ok(serde_json::from_str(&text)?)
}

pub fn to_js<T: Serialize>(value: &T) -> anyhow::Result<JsValue> {
    let text = serde_json::to_string(value)?;
    js_sys::JSON::parse(&text).map_err(|e| anyhow::anyhow!("parse failed: {:?}", e))
}

pub fn js_err(e: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{:#}", e))
}
