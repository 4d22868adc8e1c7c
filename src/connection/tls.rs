//! `sslmode` handling and the rustls connector.
//!
//! The driver only understands `disable`, `prefer` and `require`, so the
//! libpq mode is read out of the connection string first and mapped onto
//! one of those. Certificate checking is then decided here, per mode.

use crate::{Error, Result};
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::client::verify_server_cert_signed_by_trust_anchor;
use rustls::crypto::{verify_tls12_signature, verify_tls13_signature, CryptoProvider};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::server::ParsedCertificate;
use rustls::{ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme};
use std::sync::Arc;
use tokio_postgres::config::SslMode as DriverSslMode;
use tokio_postgres_rustls::MakeRustlsConnect;

const SSLMODE_KEY: &str = "sslmode=";

/// SSL/TLS connection mode matching the PostgreSQL `sslmode` parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum SslMode {
    /// No TLS
    Disable,
    /// TLS if the server offers it; treated like `prefer`
    Allow,
    /// TLS if the server offers it, certificate not verified
    #[default]
    Prefer,
    /// TLS required, certificate not verified
    Require,
    /// TLS required, certificate must chain to a trusted root
    VerifyCa,
    /// TLS required, trusted chain and matching hostname
    VerifyFull,
}

impl SslMode {
    /// The mode handed to the driver, which negotiates TLS but never
    /// verifies anything itself.
    pub(crate) fn driver_mode(self) -> DriverSslMode {
        match self {
            Self::Disable => DriverSslMode::Disable,
            Self::Allow | Self::Prefer => DriverSslMode::Prefer,
            Self::Require | Self::VerifyCa | Self::VerifyFull => DriverSslMode::Require,
        }
    }

    fn driver_mode_str(self) -> &'static str {
        match self.driver_mode() {
            DriverSslMode::Disable => "disable",
            DriverSslMode::Require => "require",
            _ => "prefer",
        }
    }
}

impl std::fmt::Display for SslMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disable => write!(f, "disable"),
            Self::Allow => write!(f, "allow"),
            Self::Prefer => write!(f, "prefer"),
            Self::Require => write!(f, "require"),
            Self::VerifyCa => write!(f, "verify-ca"),
            Self::VerifyFull => write!(f, "verify-full"),
        }
    }
}

impl std::str::FromStr for SslMode {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "disable" => Ok(Self::Disable),
            "allow" => Ok(Self::Allow),
            "prefer" => Ok(Self::Prefer),
            "require" => Ok(Self::Require),
            "verify-ca" => Ok(Self::VerifyCa),
            "verify-full" => Ok(Self::VerifyFull),
            _ => Err(Error::Config(format!(
                "invalid sslmode '{}': expected disable, allow, prefer, require, verify-ca, or verify-full",
                s
            ))),
        }
    }
}

/// Read `sslmode` out of a key/value connection string.
///
/// Returns the requested mode and the string rewritten with the mode the
/// driver accepts. Without an `sslmode` key the libpq default `prefer`
/// applies and the string is returned as is.
pub(crate) fn split_sslmode(dsn: &str) -> Result<(SslMode, String)> {
    let start = dsn
        .match_indices(SSLMODE_KEY)
        .map(|(i, _)| i)
        .find(|&i| i == 0 || dsn[..i].ends_with(char::is_whitespace));

    let Some(start) = start else {
        return Ok((SslMode::default(), dsn.to_string()));
    };

    let value_start = start + SSLMODE_KEY.len();
    let value_end = dsn[value_start..]
        .find(char::is_whitespace)
        .map_or(dsn.len(), |i| value_start + i);

    let mode: SslMode = dsn[value_start..value_end].parse()?;
    let rewritten = format!(
        "{}{}{}",
        &dsn[..value_start],
        mode.driver_mode_str(),
        &dsn[value_end..]
    );

    Ok((mode, rewritten))
}

/// Build the rustls connector for `mode`.
///
/// * `allow`, `prefer`, `require`: any server certificate is accepted.
/// * `verify-ca`: the chain must lead to a system (or bundled webpki) root.
/// * `verify-full`: as `verify-ca`, and the certificate must name the host.
pub(crate) fn make_tls_connect(mode: SslMode) -> Result<MakeRustlsConnect> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let builder = ClientConfig::builder_with_provider(provider.clone())
        .with_safe_default_protocol_versions()?;

    let config = match mode {
        SslMode::VerifyFull => builder
            .with_root_certificates(root_store())
            .with_no_client_auth(),
        SslMode::VerifyCa => builder
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(TrustedChainVerifier {
                roots: root_store(),
                provider,
            }))
            .with_no_client_auth(),
        SslMode::Disable | SslMode::Allow | SslMode::Prefer | SslMode::Require => builder
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(AcceptAnyCertificate { provider }))
            .with_no_client_auth(),
    };

    Ok(MakeRustlsConnect::new(config))
}

fn root_store() -> RootCertStore {
    let result = rustls_native_certs::load_native_certs();

    let mut store = RootCertStore::empty();
    let (added, ignored) = store.add_parsable_certificates(result.certs);
    if !result.errors.is_empty() || ignored > 0 {
        tracing::debug!(
            added,
            ignored,
            errors = result.errors.len(),
            "some system root certificates could not be loaded"
        );
    }

    if store.is_empty() {
        tracing::debug!("no system root certificates, using bundled webpki roots");
        store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    }

    store
}

/// Accepts any server certificate. Handshake signatures are still checked.
#[derive(Debug)]
struct AcceptAnyCertificate {
    provider: Arc<CryptoProvider>,
}

impl ServerCertVerifier for AcceptAnyCertificate {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(
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
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(
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

/// Checks the chain against trusted roots but ignores the server name.
#[derive(Debug)]
struct TrustedChainVerifier {
    roots: RootCertStore,
    provider: Arc<CryptoProvider>,
}

impl ServerCertVerifier for TrustedChainVerifier {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, rustls::Error> {
        let cert = ParsedCertificate::try_from(end_entity)?;
        verify_server_cert_signed_by_trust_anchor(
            &cert,
            &self.roots,
            intermediates,
            now,
            self.provider.signature_verification_algorithms.all,
        )?;
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(
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
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(
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
