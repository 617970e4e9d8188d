// src/core/orchestrator.rs

use crate::core::catalog;
use crate::core::models::{Grade, Issue, ProbeResults, Report};
use crate::core::probe::{self, PROBE_TIMEOUT};
use chrono::Utc;
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

const USER_AGENT: &str = "AegisScan/0.1";

/// Errors raised while constructing the orchestrator. Probe failures never
/// surface here; they live inside the probe results.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Runs the six probes against one target and turns their results into a
/// scored report. Owns the HTTP clients and DNS resolver and injects them
/// into the probes, so timeouts are configured in exactly one place.
pub struct Orchestrator {
    /// Client that follows redirects (header probe, admin sweep).
    follow: reqwest::Client,
    /// Client that never follows redirects (CORS, sensitive-file and agent
    /// sweeps, where a redirect must not count as reachable content).
    no_redirect: reqwest::Client,
    resolver: TokioAsyncResolver,
}

impl Orchestrator {
    pub fn new() -> Result<Self, ScanError> {
        let follow = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(PROBE_TIMEOUT)
            .build()?;
        let no_redirect = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::none())
            .timeout(PROBE_TIMEOUT)
            .build()?;

        let mut opts = ResolverOpts::default();
        opts.timeout = PROBE_TIMEOUT;
        let resolver = TokioAsyncResolver::tokio(ResolverConfig::default(), opts);

        Ok(Self {
            follow,
            no_redirect,
            resolver,
        })
    }

    /// Runs all probes concurrently, waits for every one of them, then scores
    /// and assembles the report. A failed or timed-out probe degrades only
    /// its own contribution; the scan itself always completes.
    pub async fn scan(&self, target: &Url) -> Report {
        info!(target = %target, "Starting scan.");

        let (tls, headers, cors, exposure, agent, dmarc) = tokio::join!(
            probe::tls::run(target),
            probe::headers::run(&self.follow, target),
            probe::cors::run(&self.no_redirect, target),
            probe::exposure::run(&self.follow, &self.no_redirect, target),
            probe::agent::run(&self.no_redirect, target),
            probe::dmarc::run(&self.resolver, target),
        );

        let probes = ProbeResults {
            tls,
            headers,
            cors,
            exposure,
            agent,
            dmarc,
        };

        let (issues, score) = evaluate(target, &probes);
        let grade = Grade::from_score(score);
        info!(score, grade = %grade, issues = issues.len(), "Scan finished.");

        Report {
            id: None,
            target: target.to_string(),
            score,
            grade,
            issues,
            probes,
            summary: String::new(),
            created_at: Utc::now(),
        }
    }
}

/// Maps probe results to catalog-backed issues and computes the clamped
/// score. Pure and deterministic: identical probe results always produce an
/// identical issue list and score. The evaluation order below is fixed and
/// doubles as the tiebreaker for equal penalties after sorting.
pub fn evaluate(target: &Url, probes: &ProbeResults) -> (Vec<Issue>, u8) {
    let mut issues: Vec<Issue> = Vec::new();

    // TLS: invalid and expiring are mutually exclusive, worse one wins.
    if !probes.tls.valid {
        let mut issue = catalog::instantiate("ssl_invalid");
        if let Some(error) = &probes.tls.error {
            issue.details = Some(json!({ "error": error }));
        }
        issues.push(issue);
    } else if probes.tls.expiring_soon {
        let mut issue = catalog::instantiate("ssl_expiring");
        issue.details = Some(json!({ "days_remaining": probes.tls.days_remaining }));
        issues.push(issue);
    }

    // Headers: only evaluated when the probe actually returned data. A failed
    // header probe fires none of these three.
    if let Some(headers) = probes.headers.headers.as_ref() {
        if !headers.csp.present {
            issues.push(catalog::instantiate("missing_csp"));
        }
        if !headers.hsts.present {
            issues.push(catalog::instantiate("missing_hsts"));
        }
        if !headers.x_frame_options.present {
            issues.push(catalog::instantiate("missing_x_frame"));
        }
    } else {
        debug!("Header probe returned no data, skipping header rules.");
    }

    if probes.cors.vulnerable {
        let mut issue = catalog::instantiate("over_permissive_cors");
        let allowed = probes.cors.allowed_origin.as_deref().unwrap_or("*");
        issue.details = Some(json!({ "allowed_origin": allowed }));
        issues.push(issue);
    }

    if probes.agent.exposed {
        let mut issue = catalog::instantiate("mcp_exposed");
        issue.details = Some(json!({ "exposed_paths": probes.agent.paths }));
        issues.push(issue);
    }

    if probes.exposure.admin_exposed {
        let mut issue = catalog::instantiate("admin_exposed");
        issue.details = Some(json!({ "exposed_paths": probes.exposure.admin_paths }));
        issues.push(issue);
    }

    if !probes.exposure.sensitive_files.is_empty() {
        let mut issue = catalog::instantiate("sensitive_files");
        issue.details = Some(json!({ "exposed_paths": probes.exposure.sensitive_files }));
        issues.push(issue);
    }

    if !probes.dmarc.has_dmarc {
        issues.push(catalog::instantiate("missing_dmarc"));
    }

    // Placeholder heuristic: a plain-HTTP target fires weak_tls regardless of
    // any negotiated protocol version. Kept as a documented approximation.
    if target.scheme() == "http" {
        issues.push(catalog::instantiate("weak_tls"));
    }

    let total_penalty: u32 = issues.iter().map(|i| i.penalty).sum();
    let score = 100i64.saturating_sub(i64::from(total_penalty)).clamp(0, 100) as u8;

    // sort_by is stable, so equal penalties keep evaluation order.
    issues.sort_by(|a, b| b.penalty.cmp(&a.penalty));

    (issues, score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{
        CorsProbeResult, DmarcProbeResult, HeaderCheck, HeaderProbeResult, SecurityHeaders,
        TlsProbeResult,
    };

    fn https_target() -> Url {
        Url::parse("https://example.com/").unwrap()
    }

    fn http_target() -> Url {
        Url::parse("http://example.com/").unwrap()
    }

    fn present() -> HeaderCheck {
        HeaderCheck {
            present: true,
            value: Some("x".to_string()),
        }
    }

    fn healthy_probes() -> ProbeResults {
        ProbeResults {
            tls: TlsProbeResult {
                valid: true,
                days_remaining: Some(90),
                issuer: Some("Let's Encrypt".to_string()),
                expiring_soon: false,
                error: None,
            },
            headers: HeaderProbeResult {
                success: true,
                headers: Some(SecurityHeaders {
                    csp: present(),
                    hsts: present(),
                    x_frame_options: present(),
                    x_content_type_options: present(),
                }),
                error: None,
            },
            cors: CorsProbeResult {
                vulnerable: false,
                allowed_origin: Some("https://app.example.com".to_string()),
                detail: "CORS policy restricts origin correctly.".to_string(),
                error: None,
            },
            dmarc: DmarcProbeResult {
                has_dmarc: true,
                record: Some("v=DMARC1; p=reject;".to_string()),
                error: None,
            },
            ..Default::default()
        }
    }

    #[test]
    fn healthy_target_scores_perfect() {
        let (issues, score) = evaluate(&https_target(), &healthy_probes());
        assert!(issues.is_empty());
        assert_eq!(score, 100);
        assert_eq!(Grade::from_score(score), Grade::A);
    }

    #[test]
    fn bare_http_target_scores_35_f() {
        let mut probes = healthy_probes();
        probes.headers.headers = Some(SecurityHeaders::default());
        probes.dmarc = DmarcProbeResult {
            has_dmarc: false,
            record: None,
            error: Some("No DMARC record found".to_string()),
        };

        let (issues, score) = evaluate(&http_target(), &probes);
        let keys: Vec<&str> = issues.iter().map(|i| i.key.as_str()).collect();
        // Sorted by descending penalty; ties keep evaluation order.
        assert_eq!(
            keys,
            vec![
                "missing_csp",
                "missing_dmarc",
                "weak_tls",
                "missing_hsts",
                "missing_x_frame"
            ]
        );
        assert_eq!(score, 35);
        assert_eq!(Grade::from_score(score), Grade::F);
    }

    #[test]
    fn invalid_and_expiring_are_mutually_exclusive() {
        let mut probes = healthy_probes();
        probes.tls = TlsProbeResult {
            valid: false,
            days_remaining: Some(5),
            issuer: None,
            expiring_soon: true,
            error: Some("TLS Handshake Error: certificate expired".to_string()),
        };

        let (issues, _) = evaluate(&https_target(), &probes);
        let keys: Vec<&str> = issues.iter().map(|i| i.key.as_str()).collect();
        assert!(keys.contains(&"ssl_invalid"));
        assert!(!keys.contains(&"ssl_expiring"));
        let invalid = issues.iter().find(|i| i.key == "ssl_invalid").unwrap();
        assert_eq!(
            invalid.details.as_ref().unwrap()["error"],
            "TLS Handshake Error: certificate expired"
        );
    }

    #[test]
    fn expiring_issue_carries_days_remaining() {
        let mut probes = healthy_probes();
        probes.tls.days_remaining = Some(12);
        probes.tls.expiring_soon = true;

        let (issues, score) = evaluate(&https_target(), &probes);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].key, "ssl_expiring");
        assert_eq!(issues[0].details.as_ref().unwrap()["days_remaining"], 12);
        assert_eq!(score, 80);
    }

    #[test]
    fn failed_header_probe_fires_no_header_issues() {
        let mut probes = healthy_probes();
        probes.headers = HeaderProbeResult {
            success: false,
            headers: None,
            error: Some("HTTP request failed: timed out".to_string()),
        };

        let (issues, score) = evaluate(&https_target(), &probes);
        assert!(issues.is_empty());
        assert_eq!(score, 100);
    }

    #[test]
    fn cors_issue_defaults_allowed_origin_to_wildcard() {
        let mut probes = healthy_probes();
        probes.cors = CorsProbeResult {
            vulnerable: true,
            allowed_origin: None,
            detail: "CORS policy is overly permissive, allowing any origin.".to_string(),
            error: None,
        };

        let (issues, _) = evaluate(&https_target(), &probes);
        assert_eq!(issues[0].key, "over_permissive_cors");
        assert_eq!(issues[0].details.as_ref().unwrap()["allowed_origin"], "*");
    }

    #[test]
    fn exposure_issues_carry_matched_paths() {
        let mut probes = healthy_probes();
        probes.exposure.sensitive_files = vec!["/.env".to_string()];
        probes.exposure.admin_exposed = true;
        probes.exposure.admin_paths = vec!["/wp-admin".to_string()];
        probes.agent.exposed = true;
        probes.agent.paths = vec!["/mcp".to_string(), "/api/mcp".to_string()];

        let (issues, score) = evaluate(&https_target(), &probes);
        let keys: Vec<&str> = issues.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["sensitive_files", "mcp_exposed", "admin_exposed"]);
        let mcp = issues.iter().find(|i| i.key == "mcp_exposed").unwrap();
        assert_eq!(
            mcp.details.as_ref().unwrap()["exposed_paths"],
            serde_json::json!(["/mcp", "/api/mcp"])
        );
        // 100 - 50 - 35 - 30 goes negative and clamps.
        assert_eq!(score, 0);
    }

    #[test]
    fn score_clamps_at_zero_when_everything_fires() {
        let probes = ProbeResults {
            tls: TlsProbeResult {
                valid: false,
                error: Some("TCP Connection Error: refused".to_string()),
                ..Default::default()
            },
            headers: HeaderProbeResult {
                success: true,
                headers: Some(SecurityHeaders::default()),
                error: None,
            },
            cors: CorsProbeResult {
                vulnerable: true,
                allowed_origin: Some("*".to_string()),
                ..Default::default()
            },
            exposure: crate::core::models::ExposureProbeResult {
                sensitive_files: vec!["/.env".to_string()],
                admin_exposed: true,
                admin_paths: vec!["/admin".to_string()],
            },
            agent: crate::core::models::AgentProbeResult {
                exposed: true,
                paths: vec!["/mcp".to_string()],
            },
            dmarc: DmarcProbeResult::default(),
        };

        let (issues, score) = evaluate(&http_target(), &probes);
        assert_eq!(score, 0);
        assert_eq!(Grade::from_score(score), Grade::F);
        // All ten scoreable rules fired.
        assert_eq!(issues.len(), 10);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let mut probes = healthy_probes();
        probes.headers.headers = Some(SecurityHeaders::default());
        probes.exposure.sensitive_files = vec!["/.git/config".to_string()];

        let first = evaluate(&http_target(), &probes);
        let second = evaluate(&http_target(), &probes);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first.0).unwrap(),
            serde_json::to_string(&second.0).unwrap()
        );
    }

    #[test]
    fn issues_sorted_by_descending_penalty() {
        let mut probes = healthy_probes();
        probes.headers.headers = Some(SecurityHeaders::default());
        probes.exposure.sensitive_files = vec!["/.env".to_string()];

        let (issues, _) = evaluate(&https_target(), &probes);
        for pair in issues.windows(2) {
            assert!(pair[0].penalty >= pair[1].penalty);
        }
        assert_eq!(issues[0].key, "sensitive_files");
    }
}
