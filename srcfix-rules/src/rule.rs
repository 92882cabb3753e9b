use camino::Utf8Path;
use regex::Regex;

/// File kinds the rule engine understands.
///
/// Eligibility is extension-based; anything else is not a candidate and is
/// silently excluded during target resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    TypeScript,
    Vue,
}

impl FileKind {
    pub fn from_path(path: &Utf8Path) -> Option<Self> {
        match path.extension()? {
            "ts" | "tsx" | "mts" | "cts" => Some(FileKind::TypeScript),
            "vue" => Some(FileKind::Vue),
            _ => None,
        }
    }
}

/// Applicability guard restricting a rule to certain file kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleScope {
    Any,
    VueOnly,
}

impl RuleScope {
    pub fn applies_to(self, kind: FileKind) -> bool {
        match self {
            RuleScope::Any => true,
            RuleScope::VueOnly => kind == FileKind::Vue,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RuleScope::Any => "any",
            RuleScope::VueOnly => "vue-only",
        }
    }
}

/// A single pattern/replacement mapping targeting one malformed text shape.
///
/// Immutable once built. The replacement may reference capture groups
/// positionally (`$1`) and must never reintroduce the malformation the
/// pattern targets.
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: &'static str,
    pub pattern: Regex,
    pub replacement: &'static str,
    pub scope: RuleScope,
    pub summary: &'static str,
    pub example_before: &'static str,
    pub example_after: &'static str,
}

/// Upper bound on rescans per rule; a rule that has not stabilized by then
/// is re-matching its own replacement output.
const MAX_SCANS: usize = 8;

impl Rule {
    /// Replaces all non-overlapping matches, left to right, rescanning until
    /// the buffer is stable.
    ///
    /// A single scan is not enough for chained malformations: matching
    /// resumes after each replacement, so `=>>>` becomes `=>>` and a second
    /// `:,` immediately after a repaired annotation survives. Rescanning to
    /// a fixpoint keeps one application equal to two.
    pub fn apply(&self, input: &str) -> String {
        let mut buf = input.to_string();
        for _ in 0..MAX_SCANS {
            match self.pattern.replace_all(&buf, self.replacement) {
                std::borrow::Cow::Borrowed(_) => break,
                std::borrow::Cow::Owned(next) => buf = next,
            }
        }
        buf
    }
}

/// Builds a rule from a pattern known to be valid.
///
/// Rule tables are static data; an invalid pattern is a programming error
/// caught by the registry tests, not a runtime condition.
pub(crate) fn rule(
    id: &'static str,
    pattern: &str,
    replacement: &'static str,
    scope: RuleScope,
    summary: &'static str,
    example: (&'static str, &'static str),
) -> Rule {
    Rule {
        id,
        pattern: Regex::new(pattern).expect("builtin rule pattern must compile"),
        replacement,
        scope,
        summary,
        example_before: example.0,
        example_after: example.1,
    }
}

/// An ordered, named group of rules sharing a repair goal.
///
/// Passes execute in declaration order; rules within a pass execute in
/// declaration order. The output buffer of one rule is the input of the
/// next.
#[derive(Debug, Clone)]
pub struct Pass {
    pub name: &'static str,
    pub rules: Vec<Rule>,
}

/// An ordered sequence of passes, keyed by profile name.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub profile: &'static str,
    pub passes: Vec<Pass>,
}

impl RuleSet {
    /// Applies every in-scope rule, pass by pass, to `input`.
    ///
    /// Rule application is infallible: a pattern that fails to match simply
    /// contributes no change.
    pub fn apply(&self, kind: FileKind, input: &str) -> String {
        let mut buf = input.to_string();
        for pass in &self.passes {
            for rule in &pass.rules {
                if !rule.scope.applies_to(kind) {
                    continue;
                }
                buf = rule.apply(&buf);
            }
        }
        buf
    }

    /// All rules across all passes, in execution order.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.passes.iter().flat_map(|p| p.rules.iter())
    }

    pub fn rule_count(&self) -> usize {
        self.rules().count()
    }
}
