// src/core/probe/tls.rs

use crate::core::models::TlsProbeResult;
use crate::core::probe::PROBE_TIMEOUT;
use chrono::{DateTime, Utc};
use native_tls::TlsConnector;
use std::net::{TcpStream, ToSocketAddrs};
use tokio::task::spawn_blocking;
use tracing::{debug, error, info};
use url::Url;
use x509_parser::prelude::*;

/// A certificate expiring within this many days is flagged as expiring soon.
const EXPIRY_WARNING_DAYS: i64 = 14;

/// Opens a verified TLS connection to the target and inspects the peer
/// certificate for validity, expiry, and issuer. Connection, handshake, and
/// certificate failures all come back as `valid: false` with the error
/// recorded; nothing is retried.
pub async fn run(target: &Url) -> TlsProbeResult {
    info!(target = %target, "Starting TLS probe.");

    let Some(host) = target.host_str().map(String::from) else {
        return failed("Invalid hostname".to_string());
    };
    let port = target.port().unwrap_or(443);

    debug!(host, port, "Spawning blocking task for TLS handshake.");
    let result = spawn_blocking(move || inspect_certificate(&host, port))
        .await
        .unwrap_or_else(|e| {
            error!(panic = %e, "Blocking TLS probe task panicked.");
            Err(format!("Task panicked: {}", e))
        });

    match result {
        Ok(r) => {
            info!(valid = r.valid, days_remaining = ?r.days_remaining, "TLS probe finished.");
            r
        }
        Err(e) => failed(e),
    }
}

fn failed(error: String) -> TlsProbeResult {
    TlsProbeResult {
        valid: false,
        error: Some(error),
        ..Default::default()
    }
}

fn inspect_certificate(host: &str, port: u16) -> Result<TlsProbeResult, String> {
    debug!(host, port, "Resolving target address.");
    let addr = (host, port)
        .to_socket_addrs()
        .map_err(|e| format!("DNS resolution failed: {}", e))?
        .next()
        .ok_or_else(|| format!("No address found for {}", host))?;

    let connector = TlsConnector::new().map_err(|e| format!("TlsConnector Error: {}", e))?;

    debug!(host, %addr, "Connecting TCP stream.");
    let stream = TcpStream::connect_timeout(&addr, PROBE_TIMEOUT)
        .map_err(|e| format!("TCP Connection Error: {}", e))?;
    stream
        .set_read_timeout(Some(PROBE_TIMEOUT))
        .and_then(|_| stream.set_write_timeout(Some(PROBE_TIMEOUT)))
        .map_err(|e| format!("Socket timeout setup failed: {}", e))?;

    debug!(host, "Performing TLS handshake.");
    let stream = connector
        .connect(host, stream)
        .map_err(|e| format!("TLS Handshake Error: {}", e))?;

    let cert = stream
        .peer_certificate()
        .map_err(|e| format!("Could not get peer certificate: {}", e))?
        .ok_or_else(|| "Server did not provide a certificate.".to_string())?;

    let cert_der = cert
        .to_der()
        .map_err(|e| format!("Could not convert certificate to DER: {}", e))?;
    let (_, x509) =
        parse_x509_certificate(&cert_der).map_err(|e| format!("X.509 Parse Error: {}", e))?;

    info!(subject = %x509.subject(), issuer = %x509.issuer(), "Parsed peer certificate.");

    let validity = x509.validity();
    let not_before = asn1_time_to_chrono_utc(&validity.not_before);
    let not_after = asn1_time_to_chrono_utc(&validity.not_after);
    let now = Utc::now();
    let days_remaining = not_after.signed_duration_since(now).num_days();

    // Organization name of the issuer when present, full DN otherwise.
    let issuer = x509
        .issuer()
        .iter_organization()
        .next()
        .and_then(|attr| attr.as_str().ok())
        .map(String::from)
        .unwrap_or_else(|| x509.issuer().to_string());

    Ok(TlsProbeResult {
        valid: now > not_before && now < not_after,
        days_remaining: Some(days_remaining),
        issuer: Some(issuer),
        expiring_soon: days_remaining < EXPIRY_WARNING_DAYS,
        error: None,
    })
}

fn asn1_time_to_chrono_utc(time: &ASN1Time) -> DateTime<Utc> {
    DateTime::from_timestamp(time.timestamp(), 0).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_target_reports_error_not_panic() {
        let target = Url::parse("https://0.0.0.0:1/").unwrap();
        // Port 1 on 0.0.0.0 refuses immediately on any sane test host.
        let result = run(&target).await;
        assert!(!result.valid);
        assert!(result.error.is_some());
        assert!(result.days_remaining.is_none());
    }
}
