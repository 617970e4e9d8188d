// src/core/summary.rs

use crate::core::models::{Difficulty, Grade, Issue};

/// Boundary for narrative report summaries. Implementations must always
/// return text; an AI-backed implementation is expected to fall back to
/// `TemplateSummarizer` output when its external call fails.
pub trait Summarizer {
    fn summarize(&self, score: u8, grade: Grade, issues: &[Issue]) -> String;
}

/// Deterministic template-based summarizer. Serves both as the default
/// implementation and as the fallback for external summarizers.
pub struct TemplateSummarizer;

impl Summarizer for TemplateSummarizer {
    fn summarize(&self, score: u8, grade: Grade, issues: &[Issue]) -> String {
        // Easy issues are excluded from the "critical" count on purpose.
        let critical_count = issues
            .iter()
            .filter(|i| matches!(i.difficulty, Difficulty::Medium | Difficulty::Advanced))
            .count();

        let mut summary = format!("Your website scored a {}/100 ({}). ", score, grade);
        if score >= 80 {
            summary.push_str("Your outer perimeter looks solid, though some minor issues remain.");
        } else if score >= 50 {
            summary.push_str(&format!(
                "We found {} critical issues that hackers could exploit. Fixing these will raise your score significantly.",
                critical_count
            ));
        } else {
            summary.push_str(&format!(
                "Hackers see a vulnerable target. With {} critical issues openly exposed, you are heavily at risk of automated exploitation.",
                critical_count
            ));
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog;

    #[test]
    fn high_score_is_reassuring() {
        let text = TemplateSummarizer.summarize(95, Grade::A, &[]);
        assert!(text.starts_with("Your website scored a 95/100 (A). "));
        assert!(text.contains("looks solid"));
    }

    #[test]
    fn mid_score_counts_medium_and_advanced_only() {
        // One Easy (missing_csp) and two Medium (missing_dmarc, admin_exposed).
        let issues = vec![
            catalog::instantiate("missing_csp"),
            catalog::instantiate("missing_dmarc"),
            catalog::instantiate("admin_exposed"),
        ];
        let text = TemplateSummarizer.summarize(60, Grade::C, &issues);
        assert!(text.contains("We found 2 critical issues"));
    }

    #[test]
    fn low_score_is_urgent_and_excludes_easy_issues() {
        let issues = vec![
            catalog::instantiate("sensitive_files"), // Easy
            catalog::instantiate("ssl_invalid"),     // Medium
            catalog::instantiate("mcp_exposed"),     // Medium
        ];
        let text = TemplateSummarizer.summarize(45, Grade::D, &issues);
        assert!(text.contains("With 2 critical issues openly exposed"));
        assert!(text.contains("automated exploitation"));
    }

    #[test]
    fn boundary_at_80_and_50() {
        assert!(TemplateSummarizer.summarize(80, Grade::B, &[]).contains("looks solid"));
        assert!(TemplateSummarizer.summarize(79, Grade::B, &[]).contains("We found"));
        assert!(TemplateSummarizer.summarize(50, Grade::D, &[]).contains("We found"));
        assert!(TemplateSummarizer.summarize(49, Grade::D, &[]).contains("vulnerable target"));
    }
}
