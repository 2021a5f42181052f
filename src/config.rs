use leptos::logging::log;

use crate::error::ConfigError;

pub const DB_PATH_VAR: &str = "TESTIMONIALS_DB_PATH";
pub const CONTACT_NAME_VAR: &str = "TESTIMONIALS_CONTACT_NAME";
pub const CONTACT_EMAIL_VAR: &str = "TESTIMONIALS_CONTACT_EMAIL";
pub const API_BASE_VAR: &str = "TESTIMONIALS_API_BASE";

const DEFAULT_DB_PATH: &str = "testimonials.db";
const DEFAULT_CONTACT_NAME: &str = "Site Owner";
const DEFAULT_CONTACT_EMAIL: &str = "owner@example.com";
pub const DEFAULT_API_BASE: &str = "/api";

/// Settings that are not covered by the Leptos options in `Cargo.toml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: String,
    pub contact_name: String,
    pub contact_email: String,
    pub api_base: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.to_string(),
            contact_name: DEFAULT_CONTACT_NAME.to_string(),
            contact_email: DEFAULT_CONTACT_EMAIL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str, default: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let config = Self {
            db_path: get(DB_PATH_VAR, DEFAULT_DB_PATH),
            contact_name: get(CONTACT_NAME_VAR, DEFAULT_CONTACT_NAME),
            contact_email: get(CONTACT_EMAIL_VAR, DEFAULT_CONTACT_EMAIL),
            api_base: get(API_BASE_VAR, DEFAULT_API_BASE)
                .trim_end_matches('/')
                .to_string(),
        };

        if !config.contact_email.contains('@') {
            return Err(ConfigError::Invalid {
                key: CONTACT_EMAIL_VAR,
                reason: format!("'{}' is not an email address", config.contact_email),
            });
        }

        log!("[CONFIG] Using database at {}", config.db_path);
        Ok(config)
    }
}

/// Name of the `<meta>` tag that carries the API base to the browser.
pub const API_BASE_META: &str = "testimonials-api-base";

/// Where the browser store sends its requests.
///
/// The server provides it as context and renders it into a `<meta>` tag;
/// the browser reads that tag back when it hydrates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBase(String);

impl ApiBase {
    /// Blank values fall back to the default; a trailing `/` is dropped.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            Self::default()
        } else {
            Self(trimmed.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The context value if one was provided, else the page's `<meta>` tag,
    /// else the default.
    pub fn current() -> Self {
        if let Some(base) = leptos::use_context::<ApiBase>() {
            return base;
        }
        #[cfg(any(feature = "hydrate", feature = "csr"))]
        if let Some(base) = Self::from_document() {
            return base;
        }
        Self::default()
    }

    #[cfg(any(feature = "hydrate", feature = "csr"))]
    fn from_document() -> Option<Self> {
        let selector = format!("meta[name=\"{API_BASE_META}\"]");
        let content = leptos::document()
            .query_selector(&selector)
            .ok()
            .flatten()?
            .get_attribute("content")?;
        Some(Self::parse(&content))
    }
}

impl Default for ApiBase {
    fn default() -> Self {
        Self(DEFAULT_API_BASE.to_string())
    }
}

impl From<&AppConfig> for ApiBase {
    fn from(config: &AppConfig) -> Self {
        Self::parse(&config.api_base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset_or_blank() {
        let config = AppConfig::from_lookup(lookup(&[(DB_PATH_VAR, "   ")])).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn values_are_read_and_trimmed() {
        let config = AppConfig::from_lookup(lookup(&[
            (DB_PATH_VAR, " /var/lib/reviews.db "),
            (CONTACT_EMAIL_VAR, "me@site.dev"),
            (API_BASE_VAR, "https://reviews.site.dev/api/"),
        ]))
        .unwrap();
        assert_eq!(config.db_path, "/var/lib/reviews.db");
        assert_eq!(config.contact_email, "me@site.dev");
        assert_eq!(config.api_base, "https://reviews.site.dev/api");
    }

    #[test]
    fn api_base_follows_the_configured_value() {
        let config = AppConfig::from_lookup(lookup(&[(API_BASE_VAR, "https://reviews.site.dev/api/")]))
            .unwrap();
        let base = ApiBase::from(&config);
        assert_eq!(base.as_str(), "https://reviews.site.dev/api");
        assert_eq!(ApiBase::from(&AppConfig::default()), ApiBase::default());
    }

    #[test]
    fn blank_meta_content_falls_back_to_default() {
        assert_eq!(ApiBase::parse("  "), ApiBase::default());
        assert_eq!(ApiBase::parse("/ "), ApiBase::default());
        assert_eq!(ApiBase::parse(" /v2/api/ ").as_str(), "/v2/api");
        assert_eq!(ApiBase::default().as_str(), DEFAULT_API_BASE);
    }

    #[test]
    fn malformed_contact_email_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[(CONTACT_EMAIL_VAR, "nobody")])).unwrap_err();
        assert!(err.to_string().contains(CONTACT_EMAIL_VAR));
    }
}
