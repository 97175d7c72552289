//! Security profiles
//!
//! Maps the OCPP security profile number (0-3) onto the authentication
//! material a connection attempt must present. `credentials_for` returns
//! the minimal correct set; unused fields stay `None`.

pub mod tls;

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ── SecurityProfile ────────────────────────────────────────────

/// OCPP security profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecurityProfile {
    /// Profile 0 — plain WebSocket, no authentication.
    Unsecured,
    /// Profile 1 — plain WebSocket + HTTP Basic authentication.
    BasicAuth,
    /// Profile 2 — TLS with server certificate + HTTP Basic authentication.
    TlsBasicAuth,
    /// Profile 3 — mutual TLS with client certificate.
    MutualTls,
}

impl SecurityProfile {
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            0 => Some(Self::Unsecured),
            1 => Some(Self::BasicAuth),
            2 => Some(Self::TlsBasicAuth),
            3 => Some(Self::MutualTls),
            _ => None,
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            Self::Unsecured => 0,
            Self::BasicAuth => 1,
            Self::TlsBasicAuth => 2,
            Self::MutualTls => 3,
        }
    }

    /// Profiles 2 and 3 require a `wss://` transport.
    pub fn requires_tls(&self) -> bool {
        matches!(self, Self::TlsBasicAuth | Self::MutualTls)
    }

    /// Profiles 1 and 2 present an HTTP Basic `Authorization` header.
    pub fn uses_basic_auth(&self) -> bool {
        matches!(self, Self::BasicAuth | Self::TlsBasicAuth)
    }

    /// Profile 3 authenticates with a client certificate.
    pub fn uses_client_certificate(&self) -> bool {
        matches!(self, Self::MutualTls)
    }
}

impl fmt::Display for SecurityProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "security profile {}", self.number())
    }
}

// ── Credential material ────────────────────────────────────────

/// HTTP Basic credentials. Per OCPP-J the username is the charge-point id.
#[derive(Debug, Clone)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

/// TLS parameters resolved from configuration at connect time.
#[derive(Debug, Clone, Default)]
pub struct TlsParams {
    /// PEM bundle of trusted CA certificates for server validation.
    pub ca_bundle: Option<PathBuf>,
    /// Client certificate chain (profile 3).
    pub client_certificate: Option<PathBuf>,
    /// Private key for the client certificate (profile 3).
    pub client_private_key: Option<PathBuf>,
    /// Skip server certificate validation. Commissioning aid only.
    pub accept_untrusted_certificates: bool,
    /// Allowed TLS 1.2 cipher names; `None` keeps the provider defaults.
    pub tls12_cipher_list: Option<Vec<String>>,
    /// Allowed TLS 1.3 cipher suite names; `None` keeps the provider defaults.
    pub tls13_cipher_suites: Option<Vec<String>>,
}

/// The authentication material for one connection attempt.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub basic: Option<BasicCredentials>,
    pub tls: Option<TlsParams>,
}

/// Source material `credentials_for` selects from.
#[derive(Debug, Clone, Default)]
pub struct SecurityConfig {
    /// Operator-configured HTTP Basic password (profiles 1/2).
    pub basic_auth_password: Option<String>,
    pub tls: TlsParams,
}

/// Resolve the minimal credential set for `profile`.
///
/// `charge_point_id` becomes the Basic username; fields a profile does not
/// use remain unset so the transport never sends stale material after a
/// profile switch.
pub fn credentials_for(
    profile: SecurityProfile,
    charge_point_id: &str,
    config: &SecurityConfig,
) -> Credentials {
    let basic = || {
        Some(BasicCredentials {
            username: charge_point_id.to_string(),
            password: config.basic_auth_password.clone().unwrap_or_default(),
        })
    };

    match profile {
        SecurityProfile::Unsecured => Credentials::default(),
        SecurityProfile::BasicAuth => Credentials {
            basic: basic(),
            tls: None,
        },
        SecurityProfile::TlsBasicAuth => Credentials {
            basic: basic(),
            tls: Some(TlsParams {
                // Profile 2 never presents a client certificate
                client_certificate: None,
                client_private_key: None,
                ..config.tls.clone()
            }),
        },
        SecurityProfile::MutualTls => Credentials {
            basic: None,
            tls: Some(config.tls.clone()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SecurityConfig {
        SecurityConfig {
            basic_auth_password: Some("s3cret".into()),
            tls: TlsParams {
                ca_bundle: Some(PathBuf::from("/etc/ocpp/ca.pem")),
                client_certificate: Some(PathBuf::from("/etc/ocpp/cp.pem")),
                client_private_key: Some(PathBuf::from("/etc/ocpp/cp.key")),
                ..Default::default()
            },
        }
    }

    #[test]
    fn profile_numbers_roundtrip() {
        for n in 0..=3 {
            assert_eq!(SecurityProfile::from_number(n).unwrap().number(), n);
        }
        assert!(SecurityProfile::from_number(4).is_none());
    }

    #[test]
    fn profile_0_has_no_credentials() {
        let creds = credentials_for(SecurityProfile::Unsecured, "CP-1", &config());
        assert!(creds.basic.is_none());
        assert!(creds.tls.is_none());
    }

    #[test]
    fn profile_1_has_basic_only() {
        let creds = credentials_for(SecurityProfile::BasicAuth, "CP-1", &config());
        let basic = creds.basic.unwrap();
        assert_eq!(basic.username, "CP-1");
        assert_eq!(basic.password, "s3cret");
        assert!(creds.tls.is_none());
    }

    #[test]
    fn profile_2_has_basic_and_tls_without_client_cert() {
        let creds = credentials_for(SecurityProfile::TlsBasicAuth, "CP-1", &config());
        assert!(creds.basic.is_some());
        let tls = creds.tls.unwrap();
        assert!(tls.ca_bundle.is_some());
        assert!(tls.client_certificate.is_none());
        assert!(tls.client_private_key.is_none());
    }

    #[test]
    fn profile_3_has_mutual_tls_without_basic() {
        let creds = credentials_for(SecurityProfile::MutualTls, "CP-1", &config());
        assert!(creds.basic.is_none());
        let tls = creds.tls.unwrap();
        assert!(tls.client_certificate.is_some());
        assert!(tls.client_private_key.is_some());
    }
}
