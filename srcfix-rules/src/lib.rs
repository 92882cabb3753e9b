//! Declarative repair-rule tables for srcfix.
//!
//! A profile is a named, ordered list of [`Pass`]es; a pass is an ordered
//! list of [`Rule`]s sharing one repair goal. Profiles are data: the engine
//! that applies them lives in `srcfix-engine`, so adding a repair profile
//! never adds a code path.
//!
//! # Authoring discipline
//!
//! Every pattern must target a specific, structurally identifiable
//! malformation (`:,` in an annotation, `=>>`, a `[0]` initializer after an
//! array type). Patterns broad enough to match valid text are the primary
//! failure mode of regex-based repair and are rejected at review time; the
//! non-overreach tests in `tests/non_overreach.rs` hold the line.

mod profiles;
mod rule;

pub use profiles::{PROFILE_DEFAULT, PROFILE_PRECISE, load_profile, profile_names};
pub use rule::{FileKind, Pass, Rule, RuleScope, RuleSet};
