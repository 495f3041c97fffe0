use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// Checked in order; the first match wins. Opera and Edge agents also contain
// `Chrome`, so the last two rows never match and both are labelled Chrome.
// The order reproduces the platform's existing classification; reordering it
// would change the browser stored on new attempts relative to old ones.
static BROWSER_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)chrome|chromium|crios", "Chrome"),
        (r"(?i)firefox|fxios", "Firefox"),
        (r"(?i)safari", "Safari"),
        (r"(?i)opr/", "Opera"),
        (r"(?i)edg", "Edge"),
    ]
    .into_iter()
    .map(|(pattern, name)| {
        (
            Regex::new(pattern).expect("browser patterns are valid regexes"),
            name,
        )
    })
    .collect()
});

/// Client details recorded passively alongside an attempt.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientMetadata {
    pub device: String,
    pub browser: String,
    #[serde(default)]
    pub ip_address: String,
}

impl ClientMetadata {
    pub fn from_user_agent(user_agent: &str) -> Self {
        Self {
            device: user_agent.to_string(),
            browser: browser_name(user_agent).to_string(),
            ip_address: String::new(),
        }
    }

    pub fn with_ip_address(mut self, ip_address: &str) -> Self {
        self.ip_address = ip_address.to_string();
        self
    }
}

pub fn browser_name(user_agent: &str) -> &'static str {
    BROWSER_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(user_agent))
        .map(|(_, name)| *name)
        .unwrap_or("Unknown")
}
