//! Canonical request content serialization
//!
//! Every private REST call is signed over a deterministic string built from
//! the timestamp, HTTP method, path and either the request body or the query
//! parameters. The exchange reconstructs the exact same string server-side,
//! so the byte layout here is a compatibility contract, not a convenience.

use std::collections::BTreeMap;

use serde_json::Value;

/// Serialize a structured value into its canonical signing form
///
/// Rules (matching the exchange's own canonicalizer):
/// - null -> empty string
/// - string -> itself, no escaping
/// - bool -> lowercase `true` / `false`
/// - number -> its decimal display form. This must agree byte-for-byte with
///   the formatting the exchange applies; callers should prefer passing
///   amounts and prices as strings to avoid float formatting drift.
/// - array -> elements serialized and joined with `&` (empty -> "")
/// - object -> `key=serialize(value)` pairs, sorted byte-wise by key,
///   joined with `&` (empty -> "")
pub fn serialize_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => if *b { "true" } else { "false" }.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(serialize_value)
            .collect::<Vec<_>>()
            .join("&"),
        Value::Object(map) => {
            let mut pairs: Vec<(&String, String)> = map
                .iter()
                .map(|(key, val)| (key, serialize_value(val)))
                .collect();
            // Sort by key, not by the joined pair string: a pair-level sort
            // would order "a1=x" before "a=y" because '1' < '='.
            pairs.sort_by(|a, b| a.0.cmp(b.0));
            pairs
                .into_iter()
                .map(|(key, val)| format!("{key}={val}"))
                .collect::<Vec<_>>()
                .join("&")
        }
    }
}

fn is_empty_body(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Build the signing content for a request the client assembles itself
///
/// Body takes precedence over query parameters; the two never apply to one
/// request. Query values are signed in their raw (unencoded) form, sorted by
/// key; percent-encoding happens later in the HTTP layer.
pub fn signing_content(
    timestamp_ms: i64,
    method: &str,
    path: &str,
    body: Option<&Value>,
    query: &BTreeMap<String, String>,
) -> String {
    if let Some(body) = body {
        if !is_empty_body(body) {
            return format!("{timestamp_ms}{method}{path}{}", serialize_value(body));
        }
    }

    if !query.is_empty() {
        let joined = query
            .iter()
            .map(|(key, val)| format!("{key}={val}"))
            .collect::<Vec<_>>()
            .join("&");
        return format!("{timestamp_ms}{method}{path}{joined}");
    }

    format!("{timestamp_ms}{method}{path}")
}

/// Build signing content from an already-assembled URL's raw query string
///
/// Alternate path used when signing over a pre-built URL: the query pairs are
/// taken as already-percent-encoded `key=value` tokens and sorted as whole
/// strings, not by key alone. This diverges from [`signing_content`] whenever
/// a value needs escaping; both layouts are accepted by the exchange for
/// their respective call sites and must not be unified.
pub fn signing_content_sorted_pairs(
    timestamp_ms: i64,
    method: &str,
    path: &str,
    raw_query: &str,
) -> String {
    if raw_query.is_empty() {
        return format!("{timestamp_ms}{method}{path}");
    }
    let mut pairs: Vec<&str> = raw_query.split('&').collect();
    pairs.sort_unstable();
    format!("{timestamp_ms}{method}{path}{}", pairs.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serialize_scalars() {
        assert_eq!(serialize_value(&Value::Null), "");
        assert_eq!(serialize_value(&json!(true)), "true");
        assert_eq!(serialize_value(&json!(false)), "false");
        assert_eq!(serialize_value(&json!(42)), "42");
        assert_eq!(serialize_value(&json!("plain string")), "plain string");
    }

    #[test]
    fn serialize_is_order_independent() {
        let first = json!({"a": "1", "b": "2"});
        let second = json!({"b": "2", "a": "1"});
        assert_eq!(serialize_value(&first), "a=1&b=2");
        assert_eq!(serialize_value(&second), "a=1&b=2");
    }

    #[test]
    fn serialize_sorts_by_key_not_pair() {
        // "a1" must sort after "a" even though '=' > '1' byte-wise
        let value = json!({"a1": "x", "a": "y"});
        assert_eq!(serialize_value(&value), "a=y&a1=x");
    }

    #[test]
    fn serialize_nested_structures() {
        let value = json!({
            "accountId": "42",
            "orders": ["first", "second"],
            "meta": {"z": "1", "a": "2"},
        });
        assert_eq!(
            serialize_value(&value),
            "accountId=42&meta=a=2&z=1&orders=first&second"
        );
    }

    #[test]
    fn serialize_empty_collections() {
        assert_eq!(serialize_value(&json!([])), "");
        assert_eq!(serialize_value(&json!({})), "");
    }

    #[test]
    fn content_with_query_matches_exchange_layout() {
        let mut query = BTreeMap::new();
        query.insert("accountId".to_string(), "42".to_string());
        let content = signing_content(
            1_700_000_000_000,
            "GET",
            "/api/v1/private/account/getAccountAsset",
            None,
            &query,
        );
        assert_eq!(
            content,
            "1700000000000GET/api/v1/private/account/getAccountAssetaccountId=42"
        );
    }

    #[test]
    fn content_with_body_ignores_query() {
        let mut query = BTreeMap::new();
        query.insert("ignored".to_string(), "yes".to_string());
        let body = json!({"coinId": "1000", "amount": "1.5"});
        let content = signing_content(1_700_000_000_000, "POST", "/api/v1/private/assets/createNormalWithdraw", Some(&body), &query);
        assert_eq!(
            content,
            "1700000000000POST/api/v1/private/assets/createNormalWithdrawamount=1.5&coinId=1000"
        );
    }

    #[test]
    fn content_bare_when_no_body_or_query() {
        let content = signing_content(1_700_000_000_000, "GET", "/api/v1/public/meta/getServerTime", None, &BTreeMap::new());
        assert_eq!(content, "1700000000000GET/api/v1/public/meta/getServerTime");
    }

    #[test]
    fn empty_body_falls_through_to_query() {
        let mut query = BTreeMap::new();
        query.insert("coinId".to_string(), "1000".to_string());
        let content = signing_content(1, "GET", "/p", Some(&json!({})), &query);
        assert_eq!(content, "1GET/pcoinId=1000");
    }

    #[test]
    fn sorted_pairs_orders_whole_tokens() {
        let content = signing_content_sorted_pairs(1, "GET", "/p", "b=2&a=1");
        assert_eq!(content, "1GET/pa=1&b=2");
    }

    #[test]
    fn sorted_pairs_diverges_from_key_sort_on_encoded_values() {
        // Encoded values participate in the token sort, so the two signing
        // paths legitimately disagree here.
        let content = signing_content_sorted_pairs(1, "GET", "/p", "a1=x&a=%20y");
        assert_eq!(content, "1GET/pa1=x&a=%20y");

        let mut query = BTreeMap::new();
        query.insert("a1".to_string(), "x".to_string());
        query.insert("a".to_string(), " y".to_string());
        let map_content = signing_content(1, "GET", "/p", None, &query);
        assert_eq!(map_content, "1GET/pa= y&a1=x");
    }
}
