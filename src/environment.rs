//! Environment classification.
//!
//! The controller decides once, from its own origin, whether it runs under
//! local development or production. The result gates which event handlers
//! the [`Controller`](crate::Controller) registers: local development never
//! caches and purges any cache state left behind by earlier builds.

use reqwest::Url;

/// Hostnames that always classify as local development.
const LOOPBACK_HOSTS: &[&str] = &["127.0.0.1", "localhost"];

/// Suffix for mDNS-style development hosts (e.g. `laptop.local`).
const LOCAL_SUFFIX: &str = ".local";

/// Runtime mode derived from the controller's origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvironmentMode {
    /// Loopback or `.local` host. Caching is disabled.
    LocalDevelopment,
    /// Any other host. Full caching policy applies.
    Production,
}

impl EnvironmentMode {
    /// Classify a bare hostname.
    pub fn from_hostname(hostname: &str) -> Self {
        if is_local_hostname(hostname) {
            Self::LocalDevelopment
        } else {
            Self::Production
        }
    }

    /// Classify the controller's origin URL.
    ///
    /// A URL without a host (e.g. `data:`) is treated as production.
    pub fn from_origin(origin: &Url) -> Self {
        origin
            .host_str()
            .map(Self::from_hostname)
            .unwrap_or(Self::Production)
    }

    pub fn is_local_development(self) -> bool {
        self == Self::LocalDevelopment
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::LocalDevelopment => "local_development",
            Self::Production => "production",
        }
    }
}

/// Whether `hostname` names a local development host.
///
/// Exact match on `127.0.0.1` / `localhost`, or a `.local` suffix.
/// Malformed input simply classifies as non-local.
pub fn is_local_hostname(hostname: &str) -> bool {
    LOOPBACK_HOSTS.contains(&hostname) || hostname.ends_with(LOCAL_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_hosts_classify_as_development() {
        for host in ["127.0.0.1", "localhost", "foo.local"] {
            assert!(is_local_hostname(host), "{host} should be local");
        }
    }

    #[test]
    fn public_hosts_classify_as_production() {
        for host in ["example.com", "10.0.0.5", "localhost.example.com"] {
            assert!(!is_local_hostname(host), "{host} should not be local");
        }
    }

    #[test]
    fn malformed_hostnames_are_not_local() {
        assert!(!is_local_hostname(""));
        assert!(!is_local_hostname("local"));
        assert!(!is_local_hostname("LOCALHOST"));
    }

    #[test]
    fn origin_classification_uses_host_only() {
        let dev = Url::parse("http://localhost:8080/app/sw.js").unwrap();
        assert_eq!(
            EnvironmentMode::from_origin(&dev),
            EnvironmentMode::LocalDevelopment
        );

        let prod = Url::parse("https://app.example.com/sw.js").unwrap();
        assert_eq!(
            EnvironmentMode::from_origin(&prod),
            EnvironmentMode::Production
        );
    }

    #[test]
    fn hostless_origin_is_production() {
        let url = Url::parse("data:text/plain,hello").unwrap();
        assert_eq!(
            EnvironmentMode::from_origin(&url),
            EnvironmentMode::Production
        );
    }
}
