//! Cookie plumbing
//!
//! `CookieJar` mirrors the `document.cookie` contract: reads return every
//! live cookie as `a=1; b=2`, writes take one `Set-Cookie` style line.

use std::borrow::Cow;
use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::error::StoreError;

/// Characters `encodeURIComponent` leaves alone
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// `expires=` attribute format (RFC 1123, always GMT)
pub const COOKIE_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Expiry written when clearing a cookie
pub const EPOCH_EXPIRES: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

/// Client-side cookie access
pub trait CookieJar {
    /// All live cookies, `; `-separated
    fn read(&self) -> Result<String, StoreError>;

    /// Apply one cookie assignment with attributes
    fn write(&mut self, cookie: &str) -> Result<(), StoreError>;
}

/// Percent-encode like `encodeURIComponent`
pub fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, URI_COMPONENT).to_string()
}

/// Inverse of [`encode_component`]
pub fn decode_component(encoded: &str) -> Result<Cow<'_, str>, StoreError> {
    Ok(percent_decode_str(encoded).decode_utf8()?)
}

/// Find `name` in a `document.cookie` string
pub fn find_cookie<'a>(raw: &'a str, name: &str) -> Option<&'a str> {
    raw.split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(name)?.strip_prefix('='))
}

/// Expiry timestamp `days` from `now`, formatted for `expires=`
pub fn expires_after(now: DateTime<Utc>, days: u32) -> String {
    (now + Duration::days(i64::from(days)))
        .format(COOKIE_DATE_FORMAT)
        .to_string()
}

/// A stored cookie
#[derive(Debug, Clone, PartialEq)]
pub struct StoredCookie {
    pub value: String,
    pub expires: Option<DateTime<Utc>>,
    /// Raw attributes other than `expires` (`path=/`, `SameSite=Lax`)
    pub attributes: Vec<String>,
}

/// In-memory jar that honours `expires`.
///
/// Used by the native build and tests; browsers use `DocumentCookies`.
#[derive(Debug, Clone, Default)]
pub struct MemoryCookies {
    cookies: HashMap<String, StoredCookie>,
}

impl MemoryCookies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cookie by name, if still live
    pub fn get(&self, name: &str) -> Option<&StoredCookie> {
        self.cookies.get(name).filter(|c| is_live(c, Utc::now()))
    }

    /// Drop cookies as if `days` had passed
    pub fn age_by_days(&mut self, days: i64) {
        let later = Utc::now() + Duration::days(days);
        self.cookies.retain(|_, c| is_live(c, later));
    }
}

fn is_live(cookie: &StoredCookie, at: DateTime<Utc>) -> bool {
    cookie.expires.is_none_or(|e| e > at)
}

impl CookieJar for MemoryCookies {
    fn read(&self) -> Result<String, StoreError> {
        let now = Utc::now();
        let mut pairs: Vec<_> = self
            .cookies
            .iter()
            .filter(|(_, c)| is_live(c, now))
            .map(|(name, c)| format!("{}={}", name, c.value))
            .collect();
        pairs.sort();
        Ok(pairs.join("; "))
    }

    fn write(&mut self, cookie: &str) -> Result<(), StoreError> {
        let mut parts = cookie.split(';').map(str::trim);
        let (name, value) = parts
            .next()
            .and_then(|pair| pair.split_once('='))
            .ok_or_else(|| StoreError::Write(format!("malformed cookie: {cookie}")))?;

        let mut expires = None;
        let mut attributes = Vec::new();
        for attr in parts.filter(|a| !a.is_empty()) {
            match attr.strip_prefix("expires=") {
                Some(date) => {
                    let parsed = NaiveDateTime::parse_from_str(date, COOKIE_DATE_FORMAT)
                        .map_err(|e| StoreError::Write(format!("bad expires '{date}': {e}")))?;
                    expires = Some(parsed.and_utc());
                }
                None => attributes.push(attr.to_string()),
            }
        }

        let stored = StoredCookie {
            value: value.to_string(),
            expires,
            attributes,
        };
        if is_live(&stored, Utc::now()) {
            self.cookies.insert(name.to_string(), stored);
        } else {
            self.cookies.remove(name);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_matches_uri_component() {
        assert_eq!(encode_component("[[1,2,3]]"), "%5B%5B1%2C2%2C3%5D%5D");
        assert_eq!(encode_component("a-b_c.d!e~f*g'h(i)"), "a-b_c.d!e~f*g'h(i)");
        assert_eq!(encode_component("로또"), "%EB%A1%9C%EB%98%90");
        assert_eq!(encode_component("{\"n\": 1}"), "%7B%22n%22%3A%201%7D");
    }

    #[test]
    fn test_decode_roundtrip() {
        let raw = "[{\"number\":7,\"color\":\"from-yellow-400 to-orange-500\"}]";
        assert_eq!(decode_component(&encode_component(raw)).unwrap(), raw);
    }

    #[test]
    fn test_decode_rejects_bad_utf8() {
        assert!(matches!(decode_component("%FF%FE"), Err(StoreError::Encoding(_))));
    }

    #[test]
    fn test_find_cookie() {
        let raw = "theme=dark; lottoSets=%5B%5D;other=1";
        assert_eq!(find_cookie(raw, "lottoSets"), Some("%5B%5D"));
        assert_eq!(find_cookie(raw, "other"), Some("1"));
        assert_eq!(find_cookie(raw, "lotto"), None);
        assert_eq!(find_cookie("", "lottoSets"), None);
    }

    #[test]
    fn test_memory_jar_expiry() {
        let mut jar = MemoryCookies::new();
        let expires = expires_after(Utc::now(), 30);
        jar.write(&format!("k=v; expires={expires}; path=/; SameSite=Lax"))
            .unwrap();

        let cookie = jar.get("k").unwrap();
        assert_eq!(cookie.value, "v");
        assert_eq!(cookie.attributes, vec!["path=/", "SameSite=Lax"]);
        assert_eq!(jar.read().unwrap(), "k=v");

        jar.age_by_days(29);
        assert!(jar.get("k").is_some());
        jar.age_by_days(31);
        assert!(jar.get("k").is_none());
    }

    #[test]
    fn test_memory_jar_epoch_expiry_deletes() {
        let mut jar = MemoryCookies::new();
        jar.write("k=v; path=/").unwrap();
        jar.write(&format!("k=; expires={EPOCH_EXPIRES}; path=/"))
            .unwrap();
        assert_eq!(jar.read().unwrap(), "");
    }

    #[test]
    fn test_memory_jar_rejects_malformed() {
        let mut jar = MemoryCookies::new();
        assert!(matches!(jar.write("novalue"), Err(StoreError::Write(_))));
        assert!(matches!(
            jar.write("k=v; expires=tomorrow"),
            Err(StoreError::Write(_))
        ));
    }
}
