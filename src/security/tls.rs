//! TLS client configuration for security profiles 2 and 3
//!
//! Builds a `rustls::ClientConfig` from the [`TlsParams`] resolved at
//! connect time: trusted CA bundle, optional client certificate (profile 3)
//! and optional cipher restrictions. Cipher names use the rustls spelling
//! (`TLS13_AES_128_GCM_SHA256`, `TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256`).

use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;

use rustls::client::danger::{
    HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier,
};
use rustls::crypto::CryptoProvider;
use rustls::pki_types::{CertificateDer, PrivateKeyDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme};
use thiserror::Error;
use tracing::warn;

use super::TlsParams;

#[derive(Debug, Error)]
pub enum TlsError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("No certificates found in {0}")]
    EmptyBundle(String),

    #[error("No private key found in {0}")]
    NoPrivateKey(String),

    #[error("Profile requires a trusted CA bundle but none is configured")]
    MissingCaBundle,

    #[error("Profile requires a client certificate and key but they are not configured")]
    MissingClientCertificate,

    #[error("TLS setup rejected: {0}")]
    Rustls(#[from] rustls::Error),
}

/// Build the rustls client configuration for one connection attempt.
pub fn client_config(params: &TlsParams) -> Result<ClientConfig, TlsError> {
    let provider = restricted_provider(params);

    let builder = ClientConfig::builder_with_provider(provider.clone())
        .with_safe_default_protocol_versions()?;

    let builder = if params.accept_untrusted_certificates {
        warn!("Server certificate validation is DISABLED (accept_untrusted_certificates)");
        builder
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(AcceptAnyServerCert { provider }))
    } else {
        let ca_path = params.ca_bundle.as_ref().ok_or(TlsError::MissingCaBundle)?;
        let mut roots = RootCertStore::empty();
        for cert in read_certificates(&ca_path.display().to_string())? {
            roots.add(cert)?;
        }
        builder.with_root_certificates(roots)
    };

    let config = match (&params.client_certificate, &params.client_private_key) {
        (Some(cert_path), Some(key_path)) => {
            let certs = read_certificates(&cert_path.display().to_string())?;
            let key = read_private_key(&key_path.display().to_string())?;
            builder.with_client_auth_cert(certs, key)?
        }
        (None, None) => builder.with_no_client_auth(),
        _ => return Err(TlsError::MissingClientCertificate),
    };

    Ok(config)
}

/// Apply the configured cipher restrictions to the default provider.
fn restricted_provider(params: &TlsParams) -> Arc<CryptoProvider> {
    let mut provider = rustls::crypto::ring::default_provider();

    if params.tls12_cipher_list.is_some() || params.tls13_cipher_suites.is_some() {
        provider.cipher_suites.retain(|suite| {
            let name = format!("{:?}", suite.suite());
            let is_tls13 = name.starts_with("TLS13_");
            let allowed = if is_tls13 {
                &params.tls13_cipher_suites
            } else {
                &params.tls12_cipher_list
            };
            match allowed {
                Some(list) => list.iter().any(|allowed| allowed == &name),
                None => true,
            }
        });
    }

    Arc::new(provider)
}

fn read_certificates(path: &str) -> Result<Vec<CertificateDer<'static>>, TlsError> {
    let file = File::open(path).map_err(|source| TlsError::Io {
        path: path.to_string(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    let certs: Vec<_> = rustls_pemfile::certs(&mut reader)
        .collect::<Result<_, _>>()
        .map_err(|source| TlsError::Io {
            path: path.to_string(),
            source,
        })?;
    if certs.is_empty() {
        return Err(TlsError::EmptyBundle(path.to_string()));
    }
    Ok(certs)
}

fn read_private_key(path: &str) -> Result<PrivateKeyDer<'static>, TlsError> {
    let file = File::open(path).map_err(|source| TlsError::Io {
        path: path.to_string(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    rustls_pemfile::private_key(&mut reader)
        .map_err(|source| TlsError::Io {
            path: path.to_string(),
            source,
        })?
        .ok_or_else(|| TlsError::NoPrivateKey(path.to_string()))
}

/// Verifier that accepts any server certificate. Signature checks still run
/// so a broken handshake is caught; only the trust chain is skipped.
#[derive(Debug)]
struct AcceptAnyServerCert {
    provider: Arc<CryptoProvider>,
}

impl ServerCertVerifier for AcceptAnyServerCert {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls12_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls13_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_ca_bundle_is_rejected() {
        let params = TlsParams::default();
        assert!(matches!(
            client_config(&params),
            Err(TlsError::MissingCaBundle)
        ));
    }

    #[test]
    fn untrusted_mode_builds_without_ca() {
        let params = TlsParams {
            accept_untrusted_certificates: true,
            ..Default::default()
        };
        assert!(client_config(&params).is_ok());
    }

    #[test]
    fn cert_without_key_is_rejected() {
        let params = TlsParams {
            accept_untrusted_certificates: true,
            client_certificate: Some("/etc/ocpp/cp.pem".into()),
            client_private_key: None,
            ..Default::default()
        };
        assert!(matches!(
            client_config(&params),
            Err(TlsError::MissingClientCertificate)
        ));
    }

    #[test]
    fn tls13_suites_can_be_restricted() {
        let params = TlsParams {
            accept_untrusted_certificates: true,
            tls13_cipher_suites: Some(vec!["TLS13_AES_256_GCM_SHA384".into()]),
            ..Default::default()
        };
        // Must still build: TLS 1.2 suites untouched, one 1.3 suite left
        assert!(client_config(&params).is_ok());
    }
}
