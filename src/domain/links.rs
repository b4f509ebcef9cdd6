//! Store URL construction for the partner site and the project domain.

use url::Url;

use crate::domain::place_id::PlaceId;

/// Path prefix shared by every store URL.
pub const STORE_PATH_PREFIX: &str = "/store/";

/// Hosts used to build store URLs.
///
/// Built once at startup and shared read-only between requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSettings {
    /// Host of the partner ("WhatsLeft") site that owns the store page.
    pub partner_domain: String,
    /// Public host of this service, encoded into QR codes and flyers.
    pub project_domain: String,
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            partner_domain: "whatsleft.wirvsvirus.net".to_string(),
            project_domain: "engpass.appspot.com".to_string(),
        }
    }
}

impl LinkSettings {
    /// Store page on the partner site, used as redirect target.
    pub fn partner_url(&self, id: &PlaceId) -> String {
        store_url(&self.partner_domain, id)
    }

    /// Canonical store URL on the project domain, encoded into QR codes.
    pub fn project_url(&self, id: &PlaceId) -> String {
        store_url(&self.project_domain, id)
    }

    /// Checks that both hosts form valid `https://` URLs.
    ///
    /// # Errors
    ///
    /// Returns a message naming the offending domain.
    pub fn validate(&self) -> Result<(), String> {
        for (name, domain) in [
            ("partner domain", &self.partner_domain),
            ("project domain", &self.project_domain),
        ] {
            let parsed = Url::parse(&format!("https://{domain}"))
                .map_err(|e| format!("{name} '{domain}' is not a valid host: {e}"))?;

            if parsed.host_str() != Some(domain.as_str()) || parsed.path() != "/" {
                return Err(format!("{name} '{domain}' must be a bare host name"));
            }
        }

        Ok(())
    }
}

fn store_url(domain: &str, id: &PlaceId) -> String {
    format!("https://{domain}{STORE_PATH_PREFIX}{id}")
}
