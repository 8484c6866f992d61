//! Deterministic keyword expansion, used whenever the model cannot extract
//! keywords.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Most keywords a search may use.
pub const MAX_KEYWORDS: usize = 12;

/// Most tokens taken verbatim from the query.
const MAX_DIRECT_KEYWORDS: usize = 8;

/// Topic → related terms, matched as substrings of the lowercased query.
const ENHANCEMENTS: &[(&str, &str)] = &[
    ("web dev", "web development frontend backend javascript react nodejs"),
    ("web development", "web development frontend backend javascript react nodejs"),
    ("devops", "devops development operations infrastructure deployment automation cloud"),
    ("react", "react javascript frontend development programming web ui"),
    ("marketing", "marketing advertising digital promotion branding social media"),
    ("fintech", "fintech financial technology banking payments digital finance"),
    ("healthtech", "healthtech healthcare medical technology digital health"),
    ("edtech", "edtech education technology learning digital education"),
    ("agritech", "agritech agriculture technology farming digital agriculture"),
    ("startup", "startup entrepreneur business founder venture"),
    ("ai", "artificial intelligence machine learning data science AI ML"),
    ("blockchain", "blockchain cryptocurrency crypto distributed ledger"),
    ("mobile", "mobile app android ios flutter react native"),
    ("design", "design UI UX user interface user experience graphic"),
    ("sales", "sales business development customer acquisition revenue"),
    ("hr", "human resources talent management recruitment hiring"),
    ("legal", "legal compliance law regulatory corporate legal"),
    ("consulting", "consulting advisory strategy business consulting"),
    ("finance", "finance accounting financial analysis investment banking"),
];

static STOPWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(help|need|want|looking|find|search|connect|assistance|support|with|for|in)\b",
    )
    .unwrap()
});

static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[,\s]+").unwrap());

/// Expand `query` into at most [`MAX_KEYWORDS`] distinct keywords.
pub fn fallback_keywords(query: &str) -> Vec<String> {
    let normalized = query.to_lowercase();
    let mut keywords: Vec<String> = Vec::new();

    for (topic, related) in ENHANCEMENTS {
        if normalized.contains(topic) {
            keywords.extend(related.split_whitespace().map(str::to_string));
        }
    }

    let stripped = STOPWORDS.replace_all(&normalized, "");
    keywords.extend(
        SEPARATORS
            .split(&stripped)
            .filter(|word| word.chars().count() > 2)
            .take(MAX_DIRECT_KEYWORDS)
            .map(str::to_string),
    );

    dedupe_capped(keywords)
}

/// Trim, drop blanks and duplicates (case-insensitively), keep order, cap.
pub fn dedupe_capped(keywords: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    keywords
        .into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty() && seen.insert(k.to_lowercase()))
        .take(MAX_KEYWORDS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_expansion_comes_first() {
        let keywords = fallback_keywords("Need fintech help");
        assert_eq!(&keywords[..3], ["fintech", "financial", "technology"]);
        assert!(keywords.len() <= MAX_KEYWORDS);
    }

    #[test]
    fn stopwords_and_short_tokens_are_dropped() {
        let keywords = fallback_keywords("looking for a potter in goa");
        assert_eq!(keywords, vec!["potter", "goa"]);
    }

    #[test]
    fn keywords_are_distinct_and_capped() {
        let keywords = fallback_keywords("web development react devops startup mobile design");
        assert_eq!(keywords.len(), MAX_KEYWORDS);
        let unique: HashSet<_> = keywords.iter().map(|k| k.to_lowercase()).collect();
        assert_eq!(unique.len(), keywords.len());
    }

    #[test]
    fn dedupe_ignores_case_and_blanks() {
        let cleaned = dedupe_capped(["AI".to_string(), " ".into(), "ai".into(), "ml".into()]);
        assert_eq!(cleaned, vec!["AI", "ml"]);
    }
}
