use std::collections::HashMap;
use std::fs;

const DEFAULT_ADDR: &str = "0.0.0.0:3001";

/// Relay settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub addr: String,
    pub mail_api_url: String,
    pub mail_api_key: String,
    pub from: String,
    pub recipients: HashMap<String, String>,
}

impl RelayConfig {
    /// Read from process environment variables.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read through `lookup`, which maps a variable name to its value.
    ///
    /// Recipients come from the JSON object in `CONTACT_RECIPIENTS_FILE`, or
    /// else from `CONTACT_RECIPIENTS` as `key=address,key=address`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let require = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| format!("{name} is not set"))
        };

        let recipients = match lookup("CONTACT_RECIPIENTS_FILE") {
            Some(path) => {
                let contents = fs::read_to_string(&path)
                    .map_err(|e| format!("Failed to read {path}: {e}"))?;
                serde_json::from_str::<HashMap<String, String>>(&contents)
                    .map_err(|e| format!("Invalid recipients file {path}: {e}"))?
            }
            None => parse_recipients(&require("CONTACT_RECIPIENTS")?)?,
        };

        if recipients.is_empty() {
            return Err("No contact recipients configured".to_string());
        }

        Ok(Self {
            addr: lookup("CONTACT_RELAY_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string()),
            mail_api_url: require("MAIL_API_URL")?,
            mail_api_key: require("MAIL_API_KEY")?,
            from: require("MAIL_FROM")?,
            recipients,
        })
    }
}

fn parse_recipients(value: &str) -> Result<HashMap<String, String>, String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| -> Result<(String, String), String> {
            let (key, address) = pair
                .split_once('=')
                .ok_or_else(|| format!("Invalid recipient entry '{pair}'"))?;
            Ok((key.trim().to_string(), address.trim().to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn reads_inline_recipients() {
        let config = RelayConfig::from_lookup(env(&[
            ("MAIL_API_URL", "https://mail.example.org/emails"),
            ("MAIL_API_KEY", "secret"),
            ("MAIL_FROM", "noreply@example.org"),
            ("CONTACT_RECIPIENTS", "support=help@example.org, data = data@example.org"),
        ]))
        .unwrap();
        assert_eq!(config.addr, DEFAULT_ADDR);
        assert_eq!(config.recipients["data"], "data@example.org");
        assert_eq!(config.recipients.len(), 2);
    }

    #[test]
    fn missing_api_key_is_reported() {
        let err = RelayConfig::from_lookup(env(&[
            ("MAIL_API_URL", "https://mail.example.org/emails"),
            ("MAIL_FROM", "noreply@example.org"),
            ("CONTACT_RECIPIENTS", "support=help@example.org"),
        ]))
        .unwrap_err();
        assert_eq!(err, "MAIL_API_KEY is not set");
    }

    #[test]
    fn malformed_recipient_entry() {
        assert!(parse_recipients("support").is_err());
        assert!(parse_recipients("").unwrap().is_empty());
    }
}
