//! Static catalog of every issue the scanner can report, keyed by issue key.
//! Each entry carries the human-readable impact text, the remediation
//! snippet, and the score penalty applied when the issue fires.
//! Lookup is total: unknown keys resolve to a fixed fallback template.

use crate::core::models::{Difficulty, Issue};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// An immutable catalog entry. `Issue` values are stamped out from these.
pub struct IssueTemplate {
    /// Short, human-readable title.
    pub title: &'static str,
    /// Plain-English business impact of the finding.
    pub impact: &'static str,
    /// Remediation difficulty tier.
    pub difficulty: Difficulty,
    /// Points subtracted from the score when this issue fires (0..=100).
    pub penalty: u32,
    /// Grouping category for presentation.
    pub category: &'static str,
    /// Title of the remediation step.
    pub fix_title: &'static str,
    /// Copy-paste remediation snippet.
    pub fix_snippet: &'static str,
}

/// Fallback entry returned for keys the catalog does not know.
static UNKNOWN: IssueTemplate = IssueTemplate {
    title: "Unknown Vulnerability",
    impact: "This poses an undefined risk to your website.",
    difficulty: Difficulty::Medium,
    penalty: 5,
    category: "General",
    fix_title: "Review Access Logs",
    fix_snippet: "Run a comprehensive audit or contact a security professional.",
};

/// The catalog itself, built once at first use.
static TEMPLATES: Lazy<HashMap<&'static str, IssueTemplate>> = Lazy::new(|| {
    HashMap::from([
        ("missing_csp", IssueTemplate {
            title: "Missing Content Security Policy",
            impact: "This allows attackers to inject malicious scripts that steal your visitors' data.",
            difficulty: Difficulty::Easy,
            penalty: 15,
            category: "Security Headers",
            fix_title: "Add CSP Header",
            fix_snippet: "add_header Content-Security-Policy \"default-src 'self'; script-src 'self' 'unsafe-inline';\"; # Nginx config snippet",
        }),
        ("missing_hsts", IssueTemplate {
            title: "Missing HTTP Strict Transport Security (HSTS)",
            impact: "Attackers can intercept traffic by forcing users to use unencrypted HTTP connections.",
            difficulty: Difficulty::Easy,
            penalty: 10,
            category: "Security Headers",
            fix_title: "Configure HSTS",
            fix_snippet: "add_header Strict-Transport-Security \"max-age=31536000; includeSubDomains\" always; # Nginx config snippet",
        }),
        ("missing_x_frame", IssueTemplate {
            title: "Missing X-Frame-Options",
            impact: "Attackers can trick users by embedding your site into a hidden iframe (Clickjacking).",
            difficulty: Difficulty::Easy,
            penalty: 10,
            category: "Security Headers",
            fix_title: "Add X-Frame-Options",
            fix_snippet: "add_header X-Frame-Options \"SAMEORIGIN\" always; # Nginx config snippet",
        }),
        ("ssl_invalid", IssueTemplate {
            title: "Invalid SSL Certificate",
            impact: "Browsers currently block users from visiting your site, throwing an 'Insecure' warning.",
            difficulty: Difficulty::Medium,
            penalty: 40,
            category: "SSL and Encryption",
            fix_title: "Install Valid SSL",
            fix_snippet: "# Install certbot to issue certificates\nsudo apt install certbot python3-certbot-nginx\nsudo certbot --nginx -d yourdomain.com",
        }),
        ("ssl_expiring", IssueTemplate {
            title: "SSL Certificate Expiring Soon",
            impact: "In 14 days your site will show a security warning and visitors will leave.",
            difficulty: Difficulty::Medium,
            penalty: 20,
            category: "SSL and Encryption",
            fix_title: "Renew SSL",
            fix_snippet: "# Run certbot for Let's Encrypt\nsudo certbot renew --force-renewal",
        }),
        ("weak_tls", IssueTemplate {
            title: "Weak TLS Version Detected",
            impact: "Older encryption standards allow attackers to decrypt traffic between users and your site.",
            difficulty: Difficulty::Medium,
            penalty: 15,
            category: "SSL and Encryption",
            fix_title: "Disable TLS 1.0/1.1",
            fix_snippet: "# Nginx: Only allow TLS 1.2 and 1.3\nssl_protocols TLSv1.2 TLSv1.3;",
        }),
        ("admin_exposed", IssueTemplate {
            title: "Admin Panel Exposed",
            impact: "Anyone can attempt to brute-force their way into your admin account.",
            difficulty: Difficulty::Medium,
            penalty: 30,
            category: "Information Exposure",
            fix_title: "Restrict Admin Access",
            fix_snippet: "# Nginx: Restrict /admin to specific IPs\nlocation /admin {\n    allow 192.168.1.0/24;\n    deny all;\n}",
        }),
        ("sensitive_files", IssueTemplate {
            title: "Sensitive Files Exposed",
            impact: "Hackers can read your .env file or config, stealing database passwords or API keys.",
            difficulty: Difficulty::Easy,
            penalty: 50,
            category: "Information Exposure",
            fix_title: "Block Dotfile Access",
            fix_snippet: "# Nginx: Deny access to hidden files\nlocation ~ /\\. {\n    deny all;\n    access_log off;\n    log_not_found off;\n}",
        }),
        ("over_permissive_cors", IssueTemplate {
            title: "Over-permissive CORS",
            impact: "Other websites can make requests to your site pretending to be your users.",
            difficulty: Difficulty::Easy,
            penalty: 20,
            category: "Vibe Coding Audit",
            fix_title: "Restrict CORS Origin",
            fix_snippet: "// Express.js: Restrict CORS\napp.use(cors({\n  origin: ['https://yourfrontend.com']\n}));",
        }),
        ("mcp_exposed", IssueTemplate {
            title: "MCP Server Exposed",
            impact: "Your AI agent connection is publicly visible and can be hijacked.",
            difficulty: Difficulty::Medium,
            penalty: 35,
            category: "AI Security 2026",
            fix_title: "Block Public MCP Access",
            fix_snippet: "# Nginx: Deny access to MCP routes from outside\nlocation /mcp {\n    allow 127.0.0.1;\n    deny all;\n}",
        }),
        ("missing_dmarc", IssueTemplate {
            title: "Missing DMARC Record",
            impact: "Attackers can send emails pretending to be you and scam your customers.",
            difficulty: Difficulty::Medium,
            penalty: 15,
            category: "Email Security",
            fix_title: "Add DMARC Record",
            fix_snippet: "Type: TXT\nName: _dmarc.yourdomain.com\nValue: v=DMARC1; p=quarantine; rua=mailto:postmaster@yourdomain.com;",
        }),
    ])
});

/// Retrieves the template for an issue key. Total: unknown keys fall back to
/// the `UNKNOWN` template instead of failing.
pub fn lookup(key: &str) -> &'static IssueTemplate {
    TEMPLATES.get(key).unwrap_or(&UNKNOWN)
}

/// Stamps out a fresh `Issue` from the catalog entry for `key`, with no
/// evidence attached yet.
pub fn instantiate(key: &str) -> Issue {
    let template = lookup(key);
    Issue {
        key: key.to_string(),
        title: template.title.to_string(),
        impact: template.impact.to_string(),
        difficulty: template.difficulty,
        penalty: template.penalty,
        category: template.category.to_string(),
        fix_title: template.fix_title.to_string(),
        fix_snippet: template.fix_snippet.to_string(),
        details: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_total() {
        let template = lookup("definitely_not_a_known_key");
        assert_eq!(template.title, "Unknown Vulnerability");
        assert_eq!(template.penalty, 5);
        assert_eq!(template.difficulty, Difficulty::Medium);
    }

    #[test]
    fn known_penalties() {
        assert_eq!(lookup("missing_csp").penalty, 15);
        assert_eq!(lookup("missing_hsts").penalty, 10);
        assert_eq!(lookup("missing_x_frame").penalty, 10);
        assert_eq!(lookup("ssl_invalid").penalty, 40);
        assert_eq!(lookup("ssl_expiring").penalty, 20);
        assert_eq!(lookup("weak_tls").penalty, 15);
        assert_eq!(lookup("admin_exposed").penalty, 30);
        assert_eq!(lookup("sensitive_files").penalty, 50);
        assert_eq!(lookup("over_permissive_cors").penalty, 20);
        assert_eq!(lookup("mcp_exposed").penalty, 35);
        assert_eq!(lookup("missing_dmarc").penalty, 15);
    }

    #[test]
    fn penalties_stay_in_range() {
        for template in TEMPLATES.values() {
            assert!(template.penalty <= 100);
        }
        assert!(UNKNOWN.penalty <= 100);
    }

    #[test]
    fn instantiate_copies_template_fields() {
        let issue = instantiate("missing_dmarc");
        assert_eq!(issue.key, "missing_dmarc");
        assert_eq!(issue.title, "Missing DMARC Record");
        assert_eq!(issue.penalty, 15);
        assert_eq!(issue.category, "Email Security");
        assert!(issue.details.is_none());
    }
}
