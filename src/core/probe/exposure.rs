// src/core/probe/exposure.rs

use crate::core::models::ExposureProbeResult;
use crate::core::probe::fetch_path;
use tracing::{debug, info};
use url::Url;

/// Candidate paths for leaked configuration and VCS files. Checked without
/// following redirects so a catch-all redirect to a landing page cannot
/// produce a false positive.
const SENSITIVE_PATHS: &[&str] = &["/.env", "/.git/config"];

/// Candidate admin panel locations. Redirects are followed here since login
/// pages frequently sit behind one.
const ADMIN_PATHS: &[&str] = &["/wp-admin", "/admin", "/administrator", "/login"];

/// Body markers that identify a real dotenv or git config file.
const SENSITIVE_MARKERS: &[&str] = &["DB_", "repositoryformatversion"];

/// Login-form keywords matched against the lowercased body.
const ADMIN_KEYWORDS: &[&str] = &["login", "password", "username", "sign in"];

/// Sweeps the sensitive-file and admin-panel candidate paths. A path counts
/// only on a 200 response whose body passes the content heuristic; every
/// sensitive path is probed, while the admin sweep stops at the first hit
/// (one reachable panel is enough for scoring).
pub async fn run(
    follow: &reqwest::Client,
    no_redirect: &reqwest::Client,
    target: &Url,
) -> ExposureProbeResult {
    info!(target = %target, "Starting exposure sweep.");

    let mut sensitive_files = Vec::new();
    for path in SENSITIVE_PATHS {
        let Ok(url) = target.join(path) else {
            continue;
        };
        if let Some(response) = fetch_path(no_redirect, url).await {
            if looks_like_sensitive_file(&response.body) {
                debug!(path, "Sensitive file marker matched.");
                sensitive_files.push(path.to_string());
            }
        }
    }

    let mut admin_paths = Vec::new();
    for path in ADMIN_PATHS {
        let Ok(url) = target.join(path) else {
            continue;
        };
        if let Some(response) = fetch_path(follow, url).await {
            if looks_like_login_page(&response.body) {
                debug!(path, "Admin login page matched.");
                admin_paths.push(path.to_string());
                break;
            }
        }
    }

    info!(
        sensitive = sensitive_files.len(),
        admin = admin_paths.len(),
        "Exposure sweep finished."
    );
    ExposureProbeResult {
        sensitive_files,
        admin_exposed: !admin_paths.is_empty(),
        admin_paths,
    }
}

fn looks_like_sensitive_file(body: &str) -> bool {
    SENSITIVE_MARKERS.iter().any(|marker| body.contains(marker))
}

fn looks_like_login_page(body: &str) -> bool {
    let lowered = body.to_lowercase();
    ADMIN_KEYWORDS.iter().any(|keyword| lowered.contains(keyword))
}
