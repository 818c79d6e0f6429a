//! Key name resolution: exact, then ranked fuzzy, then substring.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::Keychain;

/// Outcome of resolving a user-supplied key name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The query is a stored name verbatim (case-sensitive).
    Exact(String),
    /// Candidates in ranked order; may hold a single name.
    Fuzzy(Vec<String>),
    /// Nothing matched.
    NoMatch,
}

impl Resolution {
    /// Matched names in order, empty for [`Resolution::NoMatch`].
    #[must_use]
    pub fn into_names(self) -> Vec<String> {
        match self {
            Self::Exact(name) => vec![name],
            Self::Fuzzy(names) => names,
            Self::NoMatch => Vec::new(),
        }
    }
}

/// Resolve `query` against the names stored in `keychain`.
#[must_use]
pub fn resolve(keychain: &Keychain, query: &str) -> Resolution {
    let names: Vec<&str> = keychain.names().collect();
    resolve_names(&names, query)
}

/// Resolve `query` against `names`.
///
/// 1. Exact, case-sensitive match wins outright.
/// 2. Case-insensitive subsequence match (query characters appear in
///    order in the name), best score first, ties by name.
/// 3. If nothing matched as a subsequence, case-insensitive substring
///    containment, lexicographic.
#[must_use]
pub fn resolve_names(names: &[&str], query: &str) -> Resolution {
    if names.contains(&query) {
        return Resolution::Exact(query.to_string());
    }

    let ranked = rank_subsequence_matches(names, query);
    if !ranked.is_empty() {
        return Resolution::Fuzzy(ranked);
    }

    let needle = query.to_lowercase();
    let mut contained: Vec<String> = names
        .iter()
        .filter(|name| name.to_lowercase().contains(&needle))
        .map(|name| (*name).to_string())
        .collect();
    contained.sort();

    if contained.is_empty() {
        Resolution::NoMatch
    } else {
        Resolution::Fuzzy(contained)
    }
}

fn rank_subsequence_matches(names: &[&str], query: &str) -> Vec<String> {
    let matcher = SkimMatcherV2::default().ignore_case();
    let pattern = query.to_lowercase();

    let mut scored: Vec<(i64, &str)> = names
        .iter()
        .filter_map(|name| {
            matcher
                .fuzzy_match(&name.to_lowercase(), &pattern)
                .map(|score| (score, *name))
        })
        .collect();
    scored.sort_by(|(score_a, name_a), (score_b, name_b)| {
        score_b.cmp(score_a).then_with(|| name_a.cmp(name_b))
    });
    scored.into_iter().map(|(_, name)| name.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMES: [&str; 3] = ["github", "google", "gojek"];

    #[test]
    fn exact_match_short_circuits() {
        assert_eq!(
            resolve_names(&NAMES, "google"),
            Resolution::Exact("google".to_string())
        );
    }

    #[test]
    fn exact_match_is_case_sensitive() {
        let names = ["GitHub", "gitlab"];
        assert_eq!(
            resolve_names(&names, "GitHub"),
            Resolution::Exact("GitHub".to_string())
        );
        // Lowercase query is not an exact hit but still finds it fuzzily.
        assert_eq!(
            resolve_names(&names, "github"),
            Resolution::Fuzzy(vec!["GitHub".to_string()])
        );
    }

    #[test]
    fn prefix_query_returns_all_candidates() {
        let Resolution::Fuzzy(mut names) = resolve_names(&NAMES, "go") else {
            panic!("expected fuzzy matches");
        };
        names.sort();
        assert_eq!(names, vec!["gojek".to_string(), "google".to_string()]);
    }

    #[test]
    fn abbreviation_resolves_single_candidate() {
        assert_eq!(
            resolve_names(&NAMES, "gthb"),
            Resolution::Fuzzy(vec!["github".to_string()])
        );
    }

    #[test]
    fn fuzzy_match_ignores_case() {
        assert_eq!(
            resolve_names(&NAMES, "GTHB"),
            Resolution::Fuzzy(vec!["github".to_string()])
        );
    }

    #[test]
    fn unrelated_query_is_no_match() {
        assert_eq!(resolve_names(&NAMES, "nomatch"), Resolution::NoMatch);
        assert!(resolve_names(&[], "anything").into_names().is_empty());
    }

    #[test]
    fn ranking_is_deterministic() {
        let first = resolve_names(&NAMES, "go");
        let reversed: Vec<&str> = NAMES.iter().rev().copied().collect();
        assert_eq!(first, resolve_names(&reversed, "go"));
    }
}
