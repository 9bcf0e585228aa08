//! Credential pool: the ordered set of interchangeable provider API keys.

use std::fmt;

/// A single provider API key. Identified in logs only by its pool position;
/// `Debug` and `Display` never print the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// The raw secret. Only the provider client should call this.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential({})", mask(&self.0))
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&mask(&self.0))
    }
}

/// Keeps the last four characters of long keys, hides everything else.
fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}

/// Ordered credentials, read-only after start-up. May be empty: dispatch then
/// exhausts immediately without touching the network.
#[derive(Debug, Clone, Default)]
pub struct CredentialPool {
    credentials: Vec<Credential>,
}

impl CredentialPool {
    /// Parses a comma-separated key list. Blank segments are dropped, order is kept.
    pub fn from_comma_separated(raw: &str) -> Self {
        let credentials = raw
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(Credential::new)
            .collect();
        Self { credentials }
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    /// Credentials with their pool index, in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Credential)> {
        self.credentials.iter().enumerate()
    }
}
