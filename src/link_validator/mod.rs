//! Acceptance checks for submitted links
//!
//! The validator normalizes the raw text, parses the result and checks that it
//! names a public web page. When a `LinkStore` is attached it also rejects
//! links whose canonical URL another link already holds.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

use thiserror::Error;
use url::{Host, Url};
use uuid::Uuid;

use crate::config::ValidatorConfig;
use crate::error::BoxError;
use crate::persistence::LinkStore;
use crate::url_normalizer::{explicit_scheme, normalize};

/// Opaque schemes that can never point at a job posting.
const OPAQUE_SCHEMES: &[&str] = &[
    "mailto",
    "javascript",
    "data",
    "tel",
    "sms",
    "file",
    "about",
    "blob",
];

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("link is empty")]
    Empty,

    #[error("'{url}' is not a valid URL: {source}")]
    Unparseable {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("scheme '{scheme}' is not allowed, only http and https links are accepted")]
    UnsupportedScheme { scheme: String },

    #[error("'{url}' has no host")]
    MissingHost { url: String },

    #[error("host '{host}' is not a domain name or IP address")]
    InvalidHost { host: String },

    #[error("host '{host}' is local or private")]
    BlockedHost { host: String },

    #[error("'{url}' was already submitted as link {existing_id}")]
    Duplicate { url: String, existing_id: Uuid },

    #[error("duplicate check failed for '{url}': {source}")]
    DuplicateCheck {
        url: String,
        #[source]
        source: BoxError,
    },
}

#[derive(Clone, Default)]
pub struct LinkValidator {
    allow_private_hosts: bool,
    store: Option<Arc<dyn LinkStore>>,
}

impl std::fmt::Debug for LinkValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkValidator")
            .field("allow_private_hosts", &self.allow_private_hosts)
            .field("duplicate_check", &self.store.is_some())
            .finish()
    }
}

impl LinkValidator {
    #[must_use]
    pub fn new(config: &ValidatorConfig) -> Self {
        Self {
            allow_private_hosts: config.allow_private_hosts(),
            store: None,
        }
    }

    /// Check submissions against `store` for duplicate canonical URLs.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn LinkStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Normalize and validate one link, returning its canonical URL.
    pub async fn validate_link(&self, link_id: Uuid, raw: &str) -> Result<String, ValidationError> {
        let canonical = self.check_shape(raw)?;

        if let Some(store) = &self.store {
            let existing = store
                .find_duplicate(link_id, &canonical)
                .await
                .map_err(|e| ValidationError::DuplicateCheck {
                    url: canonical.clone(),
                    source: e.into(),
                })?;
            if let Some(existing_id) = existing {
                return Err(ValidationError::Duplicate {
                    url: canonical,
                    existing_id,
                });
            }
        }

        Ok(canonical)
    }

    /// The synchronous part of validation: everything but the duplicate check.
    pub fn check_shape(&self, raw: &str) -> Result<String, ValidationError> {
        if raw.trim().is_empty() {
            return Err(ValidationError::Empty);
        }

        if let Some((scheme, hierarchical)) = explicit_scheme(raw) {
            let lower = scheme.to_ascii_lowercase();
            let web = lower == "http" || lower == "https";
            if (hierarchical && !web) || OPAQUE_SCHEMES.contains(&lower.as_str()) {
                return Err(ValidationError::UnsupportedScheme { scheme: lower });
            }
        }

        let canonical = normalize(raw);
        if canonical == "https://" {
            return Err(ValidationError::Empty);
        }

        let url = Url::parse(&canonical).map_err(|source| ValidationError::Unparseable {
            url: canonical.clone(),
            source,
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ValidationError::UnsupportedScheme {
                scheme: url.scheme().to_string(),
            });
        }

        match url.host() {
            None => {
                return Err(ValidationError::MissingHost { url: canonical });
            }
            Some(Host::Domain(domain)) => self.check_domain(domain)?,
            Some(Host::Ipv4(ip)) => self.check_ip(IpAddr::V4(ip), &ip.to_string())?,
            Some(Host::Ipv6(ip)) => self.check_ip(IpAddr::V6(ip), &ip.to_string())?,
        }

        Ok(canonical)
    }

    fn check_domain(&self, domain: &str) -> Result<(), ValidationError> {
        let domain = domain.strip_suffix('.').unwrap_or(domain);

        if domain == "localhost" || domain.ends_with(".localhost") {
            return if self.allow_private_hosts {
                Ok(())
            } else {
                Err(ValidationError::BlockedHost {
                    host: domain.to_string(),
                })
            };
        }

        if !domain.contains('.') || domain.split('.').any(str::is_empty) {
            return Err(ValidationError::InvalidHost {
                host: domain.to_string(),
            });
        }

        Ok(())
    }

    fn check_ip(&self, ip: IpAddr, display: &str) -> Result<(), ValidationError> {
        if !self.allow_private_hosts && is_non_public(ip) {
            return Err(ValidationError::BlockedHost {
                host: display.to_string(),
            });
        }
        Ok(())
    }
}

/// Shape checks only, with default options and no duplicate check.
///
/// # Examples
/// ```
/// use jobscrape::link_validator::{validate_link, ValidationError};
///
/// assert_eq!(validate_link("(www.example.com/jobs/42)").unwrap(), "https://example.com/jobs/42");
/// assert!(matches!(validate_link("mailto:hr@example.com"), Err(ValidationError::UnsupportedScheme { .. })));
/// ```
pub fn validate_link(raw: &str) -> Result<String, ValidationError> {
    LinkValidator::default().check_shape(raw)
}

fn is_non_public(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_non_public_v4(v4),
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => is_non_public_v4(v4),
            None => is_non_public_v6(v6),
        },
    }
}

fn is_non_public_v4(ip: Ipv4Addr) -> bool {
    ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        || ip.is_unspecified()
        || ip.is_broadcast()
}

fn is_non_public_v6(ip: Ipv6Addr) -> bool {
    let first = ip.segments()[0];
    ip.is_loopback()
        || ip.is_unspecified()
        // fc00::/7 unique local
        || (first & 0xfe00) == 0xfc00
        // fe80::/10 link local
        || (first & 0xffc0) == 0xfe80
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_public_links() {
        assert_eq!(
            validate_link("HTTP://Jobs.Example.com/listing?id=7&utm_source=x").unwrap(),
            "https://jobs.example.com/listing?id=7"
        );
        assert_eq!(validate_link("8.8.8.8/careers").unwrap(), "https://8.8.8.8/careers");
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(validate_link("   "), Err(ValidationError::Empty)));
        assert!(matches!(validate_link("\"<>\""), Err(ValidationError::Empty)));
    }

    #[test]
    fn rejects_non_web_schemes() {
        for raw in ["ftp://example.com/file", "javascript:alert(1)", "file:///etc/passwd"] {
            assert!(
                matches!(validate_link(raw), Err(ValidationError::UnsupportedScheme { .. })),
                "{raw}"
            );
        }
    }

    #[test]
    fn rejects_unparseable() {
        assert!(matches!(
            validate_link("not a url"),
            Err(ValidationError::Unparseable { .. })
        ));
    }

    #[test]
    fn rejects_dotless_hosts() {
        assert!(matches!(
            validate_link("intranet/jobs"),
            Err(ValidationError::InvalidHost { .. })
        ));
    }

    #[test]
    fn blocks_private_hosts_unless_allowed() {
        for raw in [
            "localhost:3000/jobs",
            "http://127.0.0.1/jobs",
            "192.168.1.10",
            "http://[::1]/",
            "http://[fe80::1]/",
            "169.254.169.254/latest/meta-data",
        ] {
            assert!(
                matches!(validate_link(raw), Err(ValidationError::BlockedHost { .. })),
                "{raw}"
            );
        }

        let permissive = LinkValidator {
            allow_private_hosts: true,
            store: None,
        };
        assert_eq!(
            permissive.check_shape("localhost:3000/jobs").unwrap(),
            "https://localhost:3000/jobs"
        );
    }
}
