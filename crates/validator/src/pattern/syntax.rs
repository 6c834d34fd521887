//! A light structural view of regex patterns.
//!
//! Patterns are parsed by `regex_syntax`, the same front end the `regex`
//! engine uses, so verbose mode, inline flags and counted repetitions read
//! exactly as they will match. The AST is then lowered into a tree only as
//! detailed as the safety heuristics need: literals, character classes, the
//! `.` wildcard, zero-width items and groups with alternatives, each
//! optionally followed by a quantifier.

use regex_syntax::ast::{self, Ast, RepetitionKind, RepetitionRange};

/// One alternative of a group: pieces matched in sequence.
pub(crate) type Branch = Vec<Piece>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Atom {
    Literal,
    /// `[...]` or a class escape such as `\d`.
    Class,
    /// The `.` wildcard.
    Any,
    Group(Vec<Branch>),
    /// `^`, `$`, `\b` and other zero-width assertions, including inline
    /// flag groups like `(?i)`.
    Anchor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Quantifier {
    pub min: u32,
    pub max: Option<u32>,
}

impl Quantifier {
    /// Matches the atom more than once.
    pub fn repeats(self) -> bool {
        self.max.is_none_or(|max| max > 1)
    }

    pub fn unbounded(self) -> bool {
        self.max.is_none()
    }
}

impl From<&RepetitionKind> for Quantifier {
    fn from(kind: &RepetitionKind) -> Self {
        let (min, max) = match kind {
            RepetitionKind::ZeroOrOne => (0, Some(1)),
            RepetitionKind::ZeroOrMore => (0, None),
            RepetitionKind::OneOrMore => (1, None),
            RepetitionKind::Range(RepetitionRange::Exactly(n)) => (*n, Some(*n)),
            RepetitionKind::Range(RepetitionRange::AtLeast(n)) => (*n, None),
            RepetitionKind::Range(RepetitionRange::Bounded(min, max)) => (*min, Some(*max)),
        };
        Self { min, max }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Piece {
    pub atom: Atom,
    pub quantifier: Option<Quantifier>,
    /// Source text of the atom alone.
    pub atom_text: String,
    /// Source text of the atom and its quantifier.
    pub text: String,
}

impl Piece {
    /// Repeated more than once by its own quantifier.
    pub fn repeats(&self) -> bool {
        self.quantifier.is_some_and(Quantifier::repeats)
    }

    pub fn unbounded(&self) -> bool {
        self.quantifier.is_some_and(Quantifier::unbounded)
    }

    /// The atom, looking through groups that hold one unquantified piece,
    /// so `(?:.)` reads as `.` and `((\d))` as `\d`.
    pub fn core(&self) -> &Atom {
        if let Atom::Group(branches) = &self.atom
            && let [branch] = branches.as_slice()
            && let [only] = branch.as_slice()
            && only.quantifier.is_none()
        {
            return only.core();
        }
        &self.atom
    }

    /// Wraps an already quantified piece so another quantifier can apply
    /// to it (`a**` reads as `(?:a*)*`).
    fn grouped(self) -> Self {
        let text = self.text.clone();
        Self {
            atom: Atom::Group(vec![vec![self]]),
            quantifier: None,
            atom_text: text.clone(),
            text,
        }
    }
}

/// Parses `pattern` into its top-level alternatives.
pub(crate) fn parse(pattern: &str) -> Result<Vec<Branch>, ast::Error> {
    let ast = ast::parse::Parser::new().parse(pattern)?;
    Ok(Lowering { pattern }.alternatives(&ast))
}

struct Lowering<'p> {
    pattern: &'p str,
}

impl Lowering<'_> {
    fn text(&self, span: &ast::Span) -> String {
        self.pattern
            .get(span.start.offset..span.end.offset)
            .unwrap_or_default()
            .to_owned()
    }

    fn alternatives(&self, ast: &Ast) -> Vec<Branch> {
        match ast {
            Ast::Alternation(alternation) => alternation
                .asts
                .iter()
                .map(|branch| self.branch(branch))
                .collect(),
            other => vec![self.branch(other)],
        }
    }

    fn branch(&self, ast: &Ast) -> Branch {
        match ast {
            Ast::Empty(_) => Vec::new(),
            Ast::Concat(concat) => concat
                .asts
                .iter()
                .flat_map(|item| self.branch(item))
                .collect(),
            other => vec![self.piece(other)],
        }
    }

    fn piece(&self, ast: &Ast) -> Piece {
        let atom = match ast {
            Ast::Repetition(repetition) => {
                let inner = self.piece(&repetition.ast);
                let mut piece = if inner.quantifier.is_some() {
                    inner.grouped()
                } else {
                    inner
                };
                piece.quantifier = Some(Quantifier::from(&repetition.op.kind));
                piece.text = self.text(&repetition.span);
                return piece;
            }
            Ast::Group(group) => Atom::Group(self.alternatives(&group.ast)),
            Ast::Alternation(_) | Ast::Concat(_) => Atom::Group(self.alternatives(ast)),
            Ast::Dot(_) => Atom::Any,
            Ast::Literal(_) => Atom::Literal,
            Ast::ClassUnicode(_) | Ast::ClassPerl(_) | Ast::ClassBracketed(_) => Atom::Class,
            Ast::Empty(_) | Ast::Flags(_) | Ast::Assertion(_) => Atom::Anchor,
        };
        let text = self.text(ast.span());
        Piece {
            atom,
            quantifier: None,
            atom_text: text.clone(),
            text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_branch(pattern: &str) -> Branch {
        let mut branches = parse(pattern).unwrap();
        assert_eq!(branches.len(), 1);
        branches.remove(0)
    }

    #[test]
    fn parses_anchored_class() {
        let pieces = single_branch("^[a-z]+$");
        assert_eq!(pieces.len(), 3);
        assert_eq!(pieces[0].atom, Atom::Anchor);
        assert_eq!(pieces[1].atom, Atom::Class);
        assert_eq!(pieces[1].text, "[a-z]+");
        assert!(pieces[1].unbounded());
    }

    #[test]
    fn parses_counted_repetition() {
        let pieces = single_branch(r"\d{3,5}x{2}y{1,}z{1, 4}");
        let quantifiers: Vec<_> = pieces.iter().map(|p| p.quantifier).collect();
        assert_eq!(
            quantifiers,
            vec![
                Some(Quantifier {
                    min: 3,
                    max: Some(5)
                }),
                Some(Quantifier {
                    min: 2,
                    max: Some(2)
                }),
                Some(Quantifier { min: 1, max: None }),
                Some(Quantifier {
                    min: 1,
                    max: Some(4)
                }),
            ]
        );
    }

    #[test]
    fn parses_groups_and_alternatives() {
        let pieces = single_branch("(?:foo|foobar)*");
        let Atom::Group(branches) = &pieces[0].atom else {
            panic!("expected a group");
        };
        assert_eq!(branches.len(), 2);
        assert_eq!(branches[1].len(), 6);
        assert!(pieces[0].repeats());
    }

    #[test]
    fn verbose_mode_ignores_whitespace() {
        let pieces = single_branch("(?x) (a+) +");
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0].atom, Atom::Anchor);
        assert!(matches!(pieces[1].atom, Atom::Group(_)));
        assert!(pieces[1].repeats());
    }

    #[test]
    fn named_groups_and_flags() {
        assert!(parse(r"(?P<year>\d{4})-(?<month>\d{2})").is_ok());
        let pieces = single_branch("(?i)abc");
        assert_eq!(pieces[0].atom, Atom::Anchor);
    }

    #[test]
    fn classes_may_contain_brackets() {
        let pieces = single_branch(r"[]a-z\]]+[[:alpha:][0-9]]");
        assert_eq!(pieces.len(), 2);
        assert!(pieces.iter().all(|p| p.atom == Atom::Class));
    }

    #[test]
    fn singleton_groups_expose_their_core() {
        let pieces = single_branch(r"(?:.)*((\d))+");
        assert_eq!(pieces[0].core(), &Atom::Any);
        assert_eq!(pieces[1].core(), &Atom::Class);
    }

    #[test]
    fn malformed_patterns_do_not_parse() {
        assert!(parse("(abc").is_err());
        assert!(parse("abc)").is_err());
        assert!(parse("[abc").is_err());
        assert!(parse("*a").is_err());
        assert!(parse("a{2,").is_err());
    }
}
