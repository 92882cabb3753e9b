//! Built-in repair profiles.
//!
//! Rule content is distilled from the corruption patterns this tool exists
//! to undo: comma tokens where comparison operators belong, `:,` inside
//! annotations, `[0]` literals where `[]` belongs, broken arrow tokens, and
//! mangled callback separators. Each malformation class gets exactly one
//! canonical rule.

use crate::rule::{Pass, Rule, RuleScope, RuleSet, rule};

/// The full repair profile.
pub const PROFILE_DEFAULT: &str = "default";

/// Narrow cleanup profile for targeted re-runs on stubborn files.
pub const PROFILE_PRECISE: &str = "precise";

pub fn profile_names() -> &'static [&'static str] {
    &[PROFILE_DEFAULT, PROFILE_PRECISE]
}

/// Looks up a built-in profile by name.
pub fn load_profile(name: &str) -> Option<RuleSet> {
    match name {
        PROFILE_DEFAULT => Some(default_profile()),
        PROFILE_PRECISE => Some(precise_profile()),
        _ => None,
    }
}

fn default_profile() -> RuleSet {
    RuleSet {
        profile: PROFILE_DEFAULT,
        passes: vec![
            Pass {
                name: "operators",
                rules: vec![
                    arrow_extra_gt(),
                    comparison_gte_arrow(),
                    comparison_lte_arrow(),
                    augmented_plus_arrow(),
                    assign_comma_arrow(),
                    // Must run before if-comma-comparison so length guards
                    // get `>` rather than the generic `>=`.
                    length_comma_guard(),
                    if_comma_comparison(),
                ],
            },
            Pass {
                name: "type-annotations",
                rules: vec![
                    annotation_colon_comma(),
                    record_gt_separator(),
                    assertion_index_zero(),
                ],
            },
            Pass {
                name: "array-literals",
                rules: vec![array_init_zero(), get_default_zero()],
            },
            Pass {
                name: "callbacks",
                rules: vec![
                    watch_missing_callback(),
                    listener_gt_separator(),
                    emit_colon_comma(),
                ],
            },
        ],
    }
}

fn precise_profile() -> RuleSet {
    RuleSet {
        profile: PROFILE_PRECISE,
        passes: vec![
            Pass {
                name: "annotations",
                rules: vec![annotation_colon_comma()],
            },
            Pass {
                name: "callbacks",
                rules: vec![watch_missing_callback()],
            },
            Pass {
                name: "guards",
                rules: vec![length_comma_guard()],
            },
            Pass {
                name: "indexing",
                rules: vec![empty_index_member()],
            },
        ],
    }
}

// ── operators ────────────────────────────────────────────────────────────

fn arrow_extra_gt() -> Rule {
    rule(
        "arrow-extra-gt",
        r"=>>",
        "=>",
        RuleScope::Any,
        "Collapse a doubled arrow token to a single arrow.",
        ("items.map(x =>> x.id)", "items.map(x => x.id)"),
    )
}

fn comparison_gte_arrow() -> Rule {
    rule(
        "comparison-gte-arrow",
        r">=>",
        ">=",
        RuleScope::Any,
        "Strip the stray bracket fused onto a >= comparison.",
        ("if (count >=> 10) {", "if (count >= 10) {"),
    )
}

fn comparison_lte_arrow() -> Rule {
    rule(
        "comparison-lte-arrow",
        r"<=>",
        "<=",
        RuleScope::Any,
        "Strip the stray bracket fused onto a <= comparison.",
        ("while (i <=> max) {", "while (i <= max) {"),
    )
}

fn augmented_plus_arrow() -> Rule {
    rule(
        "augmented-plus-arrow",
        r"\+=>",
        "+=",
        RuleScope::Any,
        "Restore a += assignment mangled into an arrow.",
        ("i +=> chunk.length;", "i += chunk.length;"),
    )
}

fn assign_comma_arrow() -> Rule {
    rule(
        "assign-comma-arrow",
        r" =, ",
        " => ",
        RuleScope::Any,
        "Restore an arrow token flattened to `=,`.",
        ("items.filter(x =, x.valid)", "items.filter(x => x.valid)"),
    )
}

fn length_comma_guard() -> Rule {
    rule(
        "length-comma-guard",
        r"length,\s*0\)",
        "length > 0)",
        RuleScope::Any,
        "Restore the `>` in a length truthiness guard turned into a comma.",
        ("if (list.length, 0) {", "if (list.length > 0) {"),
    )
}

fn if_comma_comparison() -> Rule {
    rule(
        "if-comma-comparison",
        r"if \((\w+), (\d+(?:\.\d+)?)\)",
        "if ($1 >= $2)",
        RuleScope::Any,
        "Restore a numeric comparison inside an if-guard turned into a comma.",
        ("if (cleanedSize, 10) {", "if (cleanedSize >= 10) {"),
    )
}

// ── type annotations ─────────────────────────────────────────────────────

fn annotation_colon_comma() -> Rule {
    rule(
        "annotation-colon-comma",
        r"(\w+):,\s*(\w+)",
        "$1: $2",
        RuleScope::Any,
        "Remove the comma wedged into a `name: Type` annotation.",
        ("function load(path:, string) {", "function load(path: string) {"),
    )
}

fn record_gt_separator() -> Rule {
    rule(
        "record-gt-separator",
        r"Record<(\w+) > (\w+)>",
        "Record<$1, $2>",
        RuleScope::Any,
        "Restore the comma between Record type parameters.",
        (
            "data as Record<string > unknown>",
            "data as Record<string, unknown>",
        ),
    )
}

fn assertion_index_zero() -> Rule {
    rule(
        "assertion-index-zero",
        r"as ((?:\{[^{}]*\}|[A-Za-z_][\w.]*(?:<[^<>]*>)?))\[0\]",
        "as $1[]",
        RuleScope::Any,
        "Turn a `[0]` fused onto a type assertion back into an array type.",
        (
            "entries as { name: string }[0]",
            "entries as { name: string }[]",
        ),
    )
}

// ── array literals ───────────────────────────────────────────────────────

fn array_init_zero() -> Rule {
    rule(
        "array-init-zero",
        r"(\[\]\s*=\s*)\[0\];",
        "$1[];",
        RuleScope::Any,
        "Empty out a `[0]` initializer assigned to an array-typed binding.",
        (
            "const toDelete: string[] = [0];",
            "const toDelete: string[] = [];",
        ),
    )
}

fn get_default_zero() -> Rule {
    rule(
        "get-default-zero",
        r"\.get\('([^']*)', \[0\]\)",
        ".get('$1', [])",
        RuleScope::Any,
        "Empty out a `[0]` fallback passed to a store lookup.",
        (
            "downloadStore.get('history', [0])",
            "downloadStore.get('history', [])",
        ),
    )
}

// ── callbacks ────────────────────────────────────────────────────────────

fn watch_missing_callback() -> Rule {
    rule(
        "watch-missing-callback",
        r"watch\(\(\)\s*=>\s*([\w.]+),\s*=>\s*\{",
        "watch(() => $1, () => {",
        RuleScope::Any,
        "Reinsert the callback head dropped from a watch() call.",
        ("watch(() => props.id, => {", "watch(() => props.id, () => {"),
    )
}

fn listener_gt_separator() -> Rule {
    rule(
        "listener-gt-separator",
        r"\b(on|handle)\('([^']*)' > ",
        "$1('$2', ",
        RuleScope::Any,
        "Restore the argument comma after an event-listener channel name.",
        (
            "ipcMain.on('window-close' > () => win.close())",
            "ipcMain.on('window-close', () => win.close())",
        ),
    )
}

fn emit_colon_comma() -> Rule {
    rule(
        "emit-colon-comma",
        r"\((\w+):,\s*([^)]+)\): void;",
        "($1: $2): void;",
        RuleScope::VueOnly,
        "Repair the emit signature annotation in a single-file component.",
        (
            "(e:, 'update:modelValue', value: string): void;",
            "(e: 'update:modelValue', value: string): void;",
        ),
    )
}

// ── precise-only ─────────────────────────────────────────────────────────

fn empty_index_member() -> Rule {
    rule(
        "empty-index-member",
        r"(\w+)\[\]\.",
        "$1[0].",
        RuleScope::Any,
        "Restore the element index on a member access mangled to `[]`.",
        (
            "const scale = displays[].scaleFactor;",
            "const scale = displays[0].scaleFactor;",
        ),
    )
}
