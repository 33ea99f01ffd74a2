// ABOUTME: rustls client setup for the rendezvous relay.
// ABOUTME: Trusts the operating system's root certificate store.

use std::sync::Arc;
use tokio_rustls::TlsConnector;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};

/// Build a TLS connector backed by the native root store.
pub fn connector() -> std::io::Result<TlsConnector> {
    let mut roots = RootCertStore::empty();
    let certs = rustls_native_certs::load_native_certs()?;
    let (added, ignored) = roots.add_parsable_certificates(certs);
    tracing::debug!(added, ignored, "Loaded native root certificates");

    if roots.is_empty() {
        return Err(std::io::Error::other("no usable root certificates found"));
    }

    let config = ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();

    Ok(TlsConnector::from(Arc::new(config)))
}

/// Server name for SNI and certificate verification.
pub fn server_name(host: &str) -> std::io::Result<ServerName<'static>> {
    ServerName::try_from(host)
        .map(|name| name.to_owned())
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
}
