//! Heuristic ReDoS gate for pattern rules.
//!
//! Every pattern passes through [`PatternAnalyzer::admit`] once, while a plan
//! is compiled. The checks run in order:
//!
//! 1. length ceiling;
//! 2. nested quantifiers, a repeated group whose body ends in a repeated
//!    sub-expression (`(a+)+`, `(\d*)*`, `((x+))+`);
//! 3. two or more unbounded wildcards (`.*`, `.+`, lazy forms included);
//! 4. a repeated alternation whose branches share a prefix (`(a|ab)+`);
//! 5. compilation by the regex engine.
//!
//! A pattern the structural parser cannot read is rejected as invalid
//! syntax before any heuristic runs. Accepted patterns carry a warning when
//! they contain exactly one unbounded wildcard or exactly one quantified
//! character class.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::pattern::syntax::{self, Atom, Branch, Piece};

/// Default ceiling on pattern length, in characters.
pub const DEFAULT_MAX_PATTERN_LEN: usize = 10_000;

/// Analyzer limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub max_pattern_len: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_pattern_len: DEFAULT_MAX_PATTERN_LEN,
        }
    }
}

/// Result of analyzing one pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternVerdict {
    Accept,
    AcceptWithWarning(String),
    Reject(String),
}

impl PatternVerdict {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Self::Reject(_))
    }
}

/// Why a pattern was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    TooLong,
    NestedQuantifiers,
    MultipleWildcards,
    OverlappingAlternation,
    InvalidSyntax,
}

/// A rejected pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct PatternRejection {
    pub reason: RejectReason,
    pub message: String,
}

impl PatternRejection {
    fn new(reason: RejectReason, message: String) -> Self {
        Self { reason, message }
    }
}

/// An accepted, compiled pattern.
#[derive(Debug, Clone)]
pub struct AdmittedPattern {
    pub regex: Regex,
    pub warning: Option<String>,
}

/// Applies the safety heuristics with a given configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternAnalyzer {
    config: AnalyzerConfig,
}

impl PatternAnalyzer {
    #[must_use]
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> AnalyzerConfig {
        self.config
    }

    /// Classifies `pattern` without keeping the compiled regex.
    #[must_use]
    pub fn analyze(&self, pattern: &str) -> PatternVerdict {
        match self.admit(pattern) {
            Ok(AdmittedPattern {
                warning: Some(warning),
                ..
            }) => PatternVerdict::AcceptWithWarning(warning),
            Ok(_) => PatternVerdict::Accept,
            Err(rejection) => PatternVerdict::Reject(rejection.message),
        }
    }

    /// Runs every check and compiles the pattern.
    pub fn admit(&self, pattern: &str) -> Result<AdmittedPattern, PatternRejection> {
        self.check_length(pattern)?;

        let branches = syntax::parse(pattern).map_err(invalid_syntax)?;
        let warning = inspect(&branches)?;
        let regex = Regex::new(pattern).map_err(invalid_syntax)?;

        Ok(AdmittedPattern { regex, warning })
    }

    /// The length ceiling alone.
    pub fn check_length(&self, pattern: &str) -> Result<(), PatternRejection> {
        let len = pattern.chars().count();
        if len > self.config.max_pattern_len {
            return Err(PatternRejection::new(
                RejectReason::TooLong,
                format!(
                    "pattern is {len} characters long, exceeding the limit of {}",
                    self.config.max_pattern_len
                ),
            ));
        }
        Ok(())
    }
}

/// Analyzes `pattern` with the default configuration.
#[must_use]
pub fn analyze(pattern: &str) -> PatternVerdict {
    PatternAnalyzer::default().analyze(pattern)
}

fn invalid_syntax(err: impl std::fmt::Display) -> PatternRejection {
    PatternRejection::new(
        RejectReason::InvalidSyntax,
        format!("invalid pattern syntax: {err}"),
    )
}

#[derive(Default)]
struct Findings<'p> {
    nested: Option<&'p Piece>,
    overlap: Option<(&'p Piece, String)>,
    wildcards: Vec<&'p Piece>,
    classes: Vec<&'p Piece>,
}

fn inspect(branches: &[Branch]) -> Result<Option<String>, PatternRejection> {
    let mut findings = Findings::default();
    walk(branches, &mut findings);

    if let Some(piece) = findings.nested {
        return Err(PatternRejection::new(
            RejectReason::NestedQuantifiers,
            format!(
                "nested quantifiers in `{}` can cause catastrophic backtracking",
                piece.text
            ),
        ));
    }
    if findings.wildcards.len() >= 2 {
        let listed: Vec<&str> = findings.wildcards.iter().map(|p| p.text.as_str()).collect();
        return Err(PatternRejection::new(
            RejectReason::MultipleWildcards,
            format!(
                "{} unbounded wildcards ({}) can cause superlinear matching",
                listed.len(),
                listed.join(", ")
            ),
        ));
    }
    if let Some((piece, prefix)) = findings.overlap {
        return Err(PatternRejection::new(
            RejectReason::OverlappingAlternation,
            format!(
                "quantified alternation `{}` has branches sharing the prefix `{prefix}`",
                piece.text
            ),
        ));
    }

    let warning = match (findings.wildcards.as_slice(), findings.classes.as_slice()) {
        ([wildcard], _) => Some(format!(
            "unbounded wildcard `{}` may scan the whole input",
            wildcard.text
        )),
        ([], [class]) => Some(format!(
            "quantified character class `{}` is accepted but flagged",
            class.text
        )),
        _ => None,
    };
    Ok(warning)
}

fn walk<'p>(branches: &'p [Branch], findings: &mut Findings<'p>) {
    for piece in branches.iter().flatten() {
        match piece.core() {
            Atom::Any if piece.unbounded() => findings.wildcards.push(piece),
            Atom::Class if piece.quantifier.is_some() => findings.classes.push(piece),
            _ => {}
        }
        if let Atom::Group(inner) = &piece.atom {
            if piece.repeats() {
                if findings.nested.is_none() && inner.iter().any(ends_repeated) {
                    findings.nested = Some(piece);
                }
                if findings.overlap.is_none()
                    && let Some(prefix) = shared_prefix(inner)
                {
                    findings.overlap = Some((piece, prefix));
                }
            }
            walk(inner, findings);
        }
    }
}

/// The branch's last matching piece repeats, looking through
/// non-repeating groups and trailing anchors.
fn ends_repeated(branch: &Branch) -> bool {
    let Some(last) = branch.iter().rev().find(|p| p.atom != Atom::Anchor) else {
        return false;
    };
    if last.repeats() {
        return true;
    }
    match &last.atom {
        Atom::Group(inner) => inner.iter().any(ends_repeated),
        _ => false,
    }
}

/// Two branches that start with the same piece.
fn shared_prefix(branches: &[Branch]) -> Option<String> {
    let firsts: Vec<&str> = branches
        .iter()
        .filter_map(|b| b.first())
        .map(|p| p.atom_text.as_str())
        .collect();
    firsts.iter().enumerate().find_map(|(i, first)| {
        firsts[i + 1..]
            .contains(first)
            .then(|| (*first).to_owned())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn rejection(pattern: &str) -> PatternRejection {
        PatternAnalyzer::default().admit(pattern).unwrap_err()
    }

    #[rstest]
    #[case("(a+)+")]
    #[case(r"(\d*)*")]
    #[case("((x+))+")]
    #[case("(a+)+b")]
    #[case("(?:[a-z]+)*$")]
    #[case("(ab+){2,}")]
    #[case("(a+){1, 5}")]
    #[case("(?x)(a+) +")]
    fn nested_quantifiers_are_rejected(#[case] pattern: &str) {
        let err = rejection(pattern);
        assert_eq!(err.reason, RejectReason::NestedQuantifiers);
        assert!(err.message.contains("nested quantifiers"), "{}", err.message);
    }

    #[rstest]
    #[case("a.*b.*c")]
    #[case(".+x.+")]
    #[case("(.*?)=(.*?)")]
    #[case("(?:.)*x(?:.)*")]
    #[case("(?s)(.)+ : .*")]
    fn multiple_wildcards_are_rejected(#[case] pattern: &str) {
        assert_eq!(rejection(pattern).reason, RejectReason::MultipleWildcards);
    }

    #[rstest]
    #[case("(a|ab)+")]
    #[case("(foo|foobar)*")]
    #[case(r"(\d|\d\d)+")]
    fn overlapping_alternation_is_rejected(#[case] pattern: &str) {
        assert_eq!(
            rejection(pattern).reason,
            RejectReason::OverlappingAlternation
        );
    }

    #[rstest]
    #[case("(a|b)", PatternVerdict::Accept)]
    #[case("(cat|dog)+", PatternVerdict::Accept)]
    #[case(r"^\d{3}-\d{4}$", PatternVerdict::Accept)]
    #[case("(ab)+", PatternVerdict::Accept)]
    fn safe_patterns_are_accepted(#[case] pattern: &str, #[case] expected: PatternVerdict) {
        assert_eq!(analyze(pattern), expected);
    }

    #[test]
    fn single_class_is_accepted_with_warning() {
        let verdict = analyze("^[a-z]+$");
        assert!(
            matches!(&verdict, PatternVerdict::AcceptWithWarning(w) if w.contains("[a-z]+")),
            "{verdict:?}"
        );
    }

    #[rstest]
    #[case(r"^[a-z]{2,5}$")]
    #[case(r"^id-\d?$")]
    #[case("^(?:[A-Z])+$")]
    fn any_quantified_class_warns(#[case] pattern: &str) {
        let verdict = analyze(pattern);
        assert!(
            matches!(&verdict, PatternVerdict::AcceptWithWarning(w) if w.contains("character class")),
            "{verdict:?}"
        );
    }

    #[test]
    fn single_wildcard_is_accepted_with_warning() {
        let verdict = analyze("^prefix.*$");
        assert!(matches!(verdict, PatternVerdict::AcceptWithWarning(w) if w.contains(".*")));
    }

    #[test]
    fn long_patterns_are_rejected_before_parsing() {
        let analyzer = PatternAnalyzer::new(AnalyzerConfig {
            max_pattern_len: 8,
        });
        let err = analyzer.admit("abcdefghi").unwrap_err();
        assert_eq!(err.reason, RejectReason::TooLong);
        assert!(analyzer.admit("abcdefgh").is_ok());
    }

    #[test]
    fn default_ceiling_is_ten_thousand() {
        let long = "a".repeat(DEFAULT_MAX_PATTERN_LEN + 1);
        assert!(matches!(analyze(&long), PatternVerdict::Reject(_)));
    }

    #[test]
    fn invalid_syntax_is_rejected_by_the_engine() {
        assert_eq!(rejection("(abc").reason, RejectReason::InvalidSyntax);
        assert_eq!(rejection(r"(?=x)y").reason, RejectReason::InvalidSyntax);
        assert_eq!(rejection(r"\p{NotAScript}").reason, RejectReason::InvalidSyntax);
    }

    #[test]
    fn admitted_pattern_matches() {
        let admitted = PatternAnalyzer::default().admit("^[a-z]+$").unwrap();
        assert!(admitted.regex.is_match("hello"));
        assert!(!admitted.regex.is_match("Hello"));
    }
}
