//! Validates the static network-blocking rule table shipped in rules.json.
//! The table is registered verbatim with the declarative-net-request API at
//! startup, so malformed entries would fail silently in the browser.

use std::collections::HashSet;

use serde::Deserialize;

const RULES_SRC: &str = include_str!("../rules.json");

const KNOWN_RESOURCE_TYPES: &[&str] = &[
    "main_frame",
    "sub_frame",
    "stylesheet",
    "script",
    "image",
    "font",
    "object",
    "xmlhttprequest",
    "ping",
    "csp_report",
    "media",
    "websocket",
    "other",
];

#[derive(Deserialize)]
struct Rule {
    id: u32,
    priority: u32,
    action: Action,
    condition: Condition,
}

#[derive(Deserialize)]
struct Action {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Deserialize)]
struct Condition {
    #[serde(rename = "urlFilter")]
    url_filter: String,
    #[serde(rename = "resourceTypes")]
    resource_types: Vec<String>,
}

fn rules() -> Vec<Rule> {
    serde_json::from_str(RULES_SRC).expect("rules.json must parse")
}

#[test]
fn table_is_non_empty_with_unique_positive_ids() {
    let rules = rules();
    assert!(!rules.is_empty());
    let mut ids = HashSet::new();
    for rule in &rules {
        assert!(rule.id > 0, "rule ids must be positive");
        assert!(ids.insert(rule.id), "duplicate rule id {}", rule.id);
    }
}

#[test]
fn every_rule_blocks_a_concrete_pattern() {
    for rule in rules() {
        assert_eq!(rule.action.kind, "block", "rule {} must block", rule.id);
        assert_eq!(rule.priority, 1);
        assert!(
            rule.condition.url_filter.contains("://"),
            "rule {} pattern must be scheme-qualified",
            rule.id
        );
        assert!(!rule.condition.resource_types.is_empty());
        for kind in &rule.condition.resource_types {
            assert!(
                KNOWN_RESOURCE_TYPES.contains(&kind.as_str()),
                "rule {} names unknown resource type {kind}",
                rule.id
            );
        }
    }
}

#[test]
fn patterns_are_not_duplicated() {
    let rules = rules();
    let mut patterns = HashSet::new();
    for rule in &rules {
        assert!(
            patterns.insert(rule.condition.url_filter.clone()),
            "duplicate pattern {}",
            rule.condition.url_filter
        );
    }
}
