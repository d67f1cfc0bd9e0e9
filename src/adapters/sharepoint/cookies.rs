//! Session cookie extraction from the sign-in response

use crate::config::CookieSelection;
use crate::domain::AuthError;

/// The two cookies that authenticate later SharePoint requests
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCookies {
    first: String,
    second: String,
}

impl SessionCookies {
    /// Wrap two `name=value` pairs
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }

    /// Both pairs, in order
    pub fn pairs(&self) -> [&str; 2] {
        [&self.first, &self.second]
    }

    /// Value for a `Cookie` request header
    pub fn header_value(&self) -> String {
        format!("{};{}", self.first, self.second)
    }
}

impl std::fmt::Debug for SessionCookies {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.pairs().iter().map(|pair| format!("{}=[REDACTED]", cookie_name(pair))))
            .finish()
    }
}

/// `name=value` of every `Set-Cookie` line in a raw header block
///
/// Header names match case-insensitively. Each line is split on its first
/// `:` and attributes after the first `;` are dropped.
pub fn set_cookie_pairs(raw_headers: &str) -> Vec<String> {
    raw_headers
        .lines()
        .filter_map(|line| line.split_once(':'))
        .filter(|(name, _)| name.trim().eq_ignore_ascii_case("set-cookie"))
        .map(|(_, value)| cookie_pair(value).to_string())
        .collect()
}

/// Pick the two session cookies according to `selection`
pub fn select_session_cookies(
    raw_headers: &str,
    selection: CookieSelection,
    names: &[String],
) -> Result<SessionCookies, AuthError> {
    let pairs = set_cookie_pairs(raw_headers);
    match selection {
        CookieSelection::Positional => select_positional(pairs),
        CookieSelection::Named => select_named(&pairs, names),
    }
}

fn select_positional(mut pairs: Vec<String>) -> Result<SessionCookies, AuthError> {
    // Index 2 is a non-auth cookie the sign-in endpoint always sets
    if pairs.len() > 2 {
        pairs.remove(2);
    }
    pairs.retain(|pair| !pair.is_empty());

    let mut pairs = pairs.into_iter();
    match (pairs.next(), pairs.next()) {
        (Some(first), Some(second)) => Ok(SessionCookies::new(first, second)),
        _ => Err(AuthError::AuthCookies(
            "sign-in response did not set enough cookies".to_string(),
        )),
    }
}

fn select_named(pairs: &[String], names: &[String]) -> Result<SessionCookies, AuthError> {
    let find = |wanted: &str| {
        pairs
            .iter()
            .find(|pair| cookie_name(pair) == wanted)
            .cloned()
            .ok_or_else(|| {
                AuthError::AuthCookies(format!("sign-in response did not set cookie '{wanted}'"))
            })
    };

    match names {
        [first, second] => Ok(SessionCookies::new(find(first)?, find(second)?)),
        _ => Err(AuthError::AuthCookies(format!(
            "expected two cookie names, got {}",
            names.len()
        ))),
    }
}

fn cookie_pair(value: &str) -> &str {
    value.split(';').next().unwrap_or_default().trim()
}

fn cookie_name(pair: &str) -> &str {
    pair.split_once('=').map_or(pair, |(name, _)| name).trim()
}
