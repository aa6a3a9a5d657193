use std::sync::Arc;
use serde_json::{Map, Value, json};
use crate::interpreter::{IntentRule, KeywordRule, NodeFragment};

pub const EXCHANGE_RATE_URL: &str = "https://api.exchangerate-api.com/v4/latest/USD";

fn params(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Fetches the current USD exchange rates.
pub fn exchange_rate() -> KeywordRule {
    KeywordRule::new(
        "exchange-rate",
        &["dolar", "exchange rate"],
        NodeFragment {
            name: "HTTP Request".to_string(),
            kind: "n8n-nodes-base.httpRequest".to_string(),
            type_version: 4,
            parameters: params(json!({
                "url": EXCHANGE_RATE_URL,
                "method": "GET",
                "authentication": "none",
                "options": {}
            })),
        },
    )
}

pub fn webhook() -> KeywordRule {
    KeywordRule::new(
        "webhook",
        &["webhook"],
        NodeFragment {
            name: "Webhook".to_string(),
            kind: "n8n-nodes-base.webhook".to_string(),
            type_version: 1,
            parameters: params(json!({
                "httpMethod": "POST",
                "path": "flowgen",
                "options": {}
            })),
        },
    )
}

pub fn slack() -> KeywordRule {
    KeywordRule::new(
        "slack",
        &["slack"],
        NodeFragment {
            name: "Slack".to_string(),
            kind: "n8n-nodes-base.slack".to_string(),
            type_version: 2,
            parameters: params(json!({
                "resource": "message",
                "operation": "post",
                "text": ""
            })),
        },
    )
}

pub fn builtin_rules() -> Vec<Arc<dyn IntentRule>> {
    vec![
        Arc::new(exchange_rate()),
        Arc::new(webhook()),
        Arc::new(slack()),
    ]
}
