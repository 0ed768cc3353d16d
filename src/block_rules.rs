//! Static network-blocking rule table.
//!
//! The table itself lives in `rules.json` and is registered once at startup
//! with the browser's declarative-net-request API; the preview core never
//! touches it again. The extension API is reached through `Reflect` since it
//! is host-provided and has no typed binding.

use js_sys::{Array, Function, Object, Reflect};
use serde::Deserialize;
use wasm_bindgen::{JsCast, JsValue};

pub(crate) const RULES_JSON: &str = include_str!("../rules.json");

#[derive(Deserialize)]
pub(crate) struct BlockRule {
    pub(crate) id: u32,
    #[allow(dead_code)]
    pub(crate) priority: u32,
    #[allow(dead_code)]
    pub(crate) action: RuleAction,
    #[allow(dead_code)]
    pub(crate) condition: RuleCondition,
}

#[derive(Deserialize)]
pub(crate) struct RuleAction {
    #[serde(rename = "type")]
    #[allow(dead_code)]
    pub(crate) kind: String,
}

#[derive(Deserialize)]
pub(crate) struct RuleCondition {
    #[serde(rename = "urlFilter")]
    #[allow(dead_code)]
    pub(crate) url_filter: String,
    #[serde(rename = "resourceTypes")]
    #[allow(dead_code)]
    pub(crate) resource_types: Vec<String>,
}

/// Register the table, replacing whatever a previous session left behind so
/// startup stays idempotent. Missing extension APIs mean we are not running
/// as an extension; that is not an error.
pub(crate) fn register() {
    let Ok(rules) = serde_json::from_str::<Vec<BlockRule>>(RULES_JSON) else {
        gloo::console::warn!("block rules: invalid table");
        return;
    };

    let Some(update) = update_dynamic_rules_fn() else {
        return;
    };
    let (dnr, update) = update;

    let Ok(add_rules) = js_sys::JSON::parse(RULES_JSON) else {
        return;
    };
    let remove_ids = Array::new();
    for rule in &rules {
        remove_ids.push(&JsValue::from_f64(f64::from(rule.id)));
    }
    let options = Object::new();
    let _ = Reflect::set(&options, &JsValue::from_str("removeRuleIds"), &remove_ids);
    let _ = Reflect::set(&options, &JsValue::from_str("addRules"), &add_rules);

    if update.call1(&dnr, &options).is_err() {
        gloo::console::warn!("block rules: registration failed");
    } else {
        gloo::console::log!("block rules: registered", rules.len());
    }
}

fn update_dynamic_rules_fn() -> Option<(JsValue, Function)> {
    let window = web_sys::window()?;
    let chrome = Reflect::get(&window, &JsValue::from_str("chrome")).ok()?;
    if chrome.is_undefined() || chrome.is_null() {
        return None;
    }
    let dnr = Reflect::get(&chrome, &JsValue::from_str("declarativeNetRequest")).ok()?;
    if dnr.is_undefined() || dnr.is_null() {
        return None;
    }
    let update = Reflect::get(&dnr, &JsValue::from_str("updateDynamicRules")).ok()?;
    let update = update.dyn_into::<Function>().ok()?;
    Some((dnr, update))
}
