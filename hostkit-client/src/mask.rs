//! PII masking for trace logging.
//!
//! Request and response bodies only reach the logs through [`mask_pii`].

use serde_json::{Map, Value};

/// Placeholder for credential values.
const REDACTED: &str = "[REDACTED]";

/// Keys whose values are credentials and are replaced entirely.
const SECRET_KEYS: &[&str] = &[
    "accesstoken",
    "refreshtoken",
    "token",
    "clientsecret",
    "password",
    "secret",
    "authorization",
];

/// Keys whose values identify a guest or host.
const PII_KEYS: &[&str] = &[
    "email",
    "phone",
    "phonenumber",
    "mobile",
    "name",
    "firstname",
    "lastname",
    "fullname",
    "guestname",
    "address",
    "street",
    "postalcode",
    "zip",
    "dateofbirth",
    "passportnumber",
];

/// Lowercase and drop separators so `first_name`, `firstName` and
/// `First-Name` compare equal.
fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Keep the first character of a string, mask the rest.
fn mask_string(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if chars.next().is_some() => format!("{}***", first),
        _ => "***".to_string(),
    }
}

/// Mask a whole value under a PII key, including nested structure.
fn mask_value(value: &Value) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::String(s) => Value::String(mask_string(s)),
        Value::Array(items) => Value::Array(items.iter().map(mask_value).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), mask_value(v)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Bool(_) | Value::Number(_) => Value::String("***".to_string()),
    }
}

/// Return a copy of `value` with sensitive fields masked.
///
/// Credential fields become `[REDACTED]`; personal fields keep their first
/// character. Everything else is copied unchanged.
pub fn mask_pii(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let masked = map
                .iter()
                .map(|(key, v)| {
                    let normalized = normalize_key(key);
                    let masked = if v.is_null() {
                        Value::Null
                    } else if SECRET_KEYS.contains(&normalized.as_str()) {
                        Value::String(REDACTED.to_string())
                    } else if PII_KEYS.contains(&normalized.as_str()) {
                        mask_value(v)
                    } else {
                        mask_pii(v)
                    };
                    (key.clone(), masked)
                })
                .collect::<Map<String, Value>>();
            Value::Object(masked)
        }
        Value::Array(items) => Value::Array(items.iter().map(mask_pii).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_masks_nested_guest_fields() {
        let body = json!({
            "id": "res_1",
            "guest": {
                "firstName": "Alice",
                "last_name": "Smith",
                "email": "alice@example.com",
                "phone": "+15551234567"
            },
            "nights": 3
        });

        let masked = mask_pii(&body);

        assert_eq!(masked["id"], "res_1");
        assert_eq!(masked["nights"], 3);
        assert_eq!(masked["guest"]["firstName"], "A***");
        assert_eq!(masked["guest"]["last_name"], "S***");
        assert_eq!(masked["guest"]["email"], "a***");
        assert_eq!(masked["guest"]["phone"], "+***");
    }

    #[test]
    fn test_redacts_credentials() {
        let body = json!({ "access_token": "abc", "refreshToken": "def", "expires_in": 3600 });
        let masked = mask_pii(&body);

        assert_eq!(masked["access_token"], REDACTED);
        assert_eq!(masked["refreshToken"], REDACTED);
        assert_eq!(masked["expires_in"], 3600);
    }

    #[test]
    fn test_masks_structured_address() {
        let body = json!({ "address": { "street": "1 Main St", "city": "Lisbon", "number": 12 } });
        let masked = mask_pii(&body);

        assert_eq!(masked["address"]["street"], "1***");
        assert_eq!(masked["address"]["city"], "L***");
        assert_eq!(masked["address"]["number"], "***");
    }

    #[test]
    fn test_arrays_and_nulls() {
        let body = json!({ "data": [{ "email": "a@b.c" }, { "email": null }], "short": "x" });
        let masked = mask_pii(&body);

        assert_eq!(masked["data"][0]["email"], "a***");
        assert!(masked["data"][1]["email"].is_null());
        assert_eq!(masked["short"], "x");
        assert_eq!(mask_string("x"), "***");
    }

    #[test]
    fn test_input_unchanged() {
        let body = json!({ "email": "alice@example.com" });
        let _ = mask_pii(&body);
        assert_eq!(body["email"], "alice@example.com");
    }
}
