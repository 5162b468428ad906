//! Enzyme alias tables and query expansion for the PETase literature.
//!
//! The corpus names the same handful of engineered enzymes in wildly
//! inconsistent ways (FAST-PETase vs FastPETase, LCC vs LC-Cutinase vs
//! ICCG), and short natural-language questions rarely use the exact
//! surface form that appears in the extracted edges. These tables bias
//! both search directions: queries are expanded with the variants they
//! probably meant, and graph expansion seeds are reordered so known
//! high-value entities are scanned before long-tail ones.

use std::collections::BTreeSet;

/// Canonical entity labels ordered by how often they carry useful
/// edges. Used to pad graph-expansion seed lists after the labels the
/// caller has already seen.
pub const ALIAS_PRIORITY: &[&str] = &[
    "FAST-PETase",
    "FastPETase",
    "DuraPETase",
    "ThermoPETase",
    "TS-PETase",
    "HotPETase",
    "LC-Cutinase",
    "LCC",
    "ICCG",
    "LCC-ICCG",
];

/// Keyword -> extra search terms appended to semantic queries.
const QUERY_EXPANSIONS: &[(&str, &[&str])] = &[
    (
        "semi-crystalline",
        &["FAST-PETase", "DuraPETase", "LC-Cutinase", "LCC-ICCG"],
    ),
    (
        "semicrystalline",
        &["FAST-PETase", "DuraPETase", "LC-Cutinase", "LCC-ICCG"],
    ),
    (
        "thermostable",
        &["ThermoPETase", "DuraPETase", "TS-PETase", "HotPETase"],
    ),
    (
        "industrial",
        &["FAST-PETase", "DuraPETase", "LC-Cutinase", "LCC"],
    ),
    ("biofilm", &["surface-display", "yeast FAST-PETase"]),
    (
        "enzyme comparison",
        &["FAST-PETase", "DuraPETase", "LCC", "ICCG"],
    ),
];

/// Keyword -> entities an answer to such a question should mention.
const QUESTION_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "semi-crystalline",
        &["FAST-PETase", "DuraPETase", "LC-Cutinase"],
    ),
    (
        "semicrystalline",
        &["FAST-PETase", "DuraPETase", "LC-Cutinase"],
    ),
    ("thermostable", &["ThermoPETase", "DuraPETase", "HotPETase"]),
    ("stability", &["N233K", "R224Q", "T140D", "S121E"]),
    ("temperature", &["ThermoPETase", "DuraPETase", "FAST-PETase"]),
    ("rate", &["N233K", "S121E", "R224Q"]),
];

/// Expand a semantic query with alias terms for any keyword it
/// contains. The extras are sorted and deduplicated before being
/// appended, so the expansion is stable for a given query. Queries
/// that trip no keyword are returned unchanged.
pub fn expand_query(query: &str) -> String {
    let lowered = query.to_lowercase();
    let mut extras: Vec<&str> = Vec::new();
    for (keyword, terms) in QUERY_EXPANSIONS {
        if lowered.contains(keyword) {
            extras.extend_from_slice(terms);
        }
    }
    // Generic PETase questions get the wild-type lineage unless they
    // already single out the FAST variant.
    if lowered.contains("petase") && !lowered.contains("fast") {
        extras.extend_from_slice(&["IsPETase", "WT PETase", "Combinatorial PETase"]);
    }
    if extras.is_empty() {
        return query.to_string();
    }
    let unique: BTreeSet<&str> = extras.into_iter().collect();
    let joined: Vec<&str> = unique.into_iter().collect();
    format!("{} {}", query, joined.join(" "))
}

/// Entities a complete answer to `question` is expected to cite, in
/// first-mention order, capped at six.
pub fn expected_entities(question: &str) -> Vec<String> {
    let lowered = question.to_lowercase();
    let mut expected: Vec<&str> = Vec::new();
    for (keyword, entities) in QUESTION_KEYWORDS {
        if lowered.contains(keyword) {
            expected.extend_from_slice(entities);
        }
    }
    // "semi crystalline", "semi-crystallinity" and friends miss the
    // exact keyword spellings above.
    if lowered.contains("semi") && lowered.contains("crystal") {
        expected.extend_from_slice(&["FAST-PETase", "DuraPETase", "LC-Cutinase"]);
    }
    if expected.is_empty() && lowered.contains("petase") {
        expected.extend_from_slice(&["FAST-PETase", "ThermoPETase", "DuraPETase"]);
    }
    let mut ordered: Vec<String> = Vec::new();
    for entity in expected {
        if !ordered.iter().any(|seen| seen == entity) {
            ordered.push(entity.to_string());
        }
    }
    ordered.truncate(6);
    ordered
}

/// Deterministic seed ordering for diverse graph expansion: labels the
/// caller has already seen (first-seen order, empties dropped), then
/// the canonical priority list, then any extras. No label appears
/// twice; a label present in both the caller's list and the priority
/// list keeps its caller position.
pub fn preferred_sources(context_sources: &[String], extra: Option<&[String]>) -> Vec<String> {
    let mut ordered: Vec<String> = Vec::new();
    for source in context_sources {
        if !source.is_empty() && !ordered.iter().any(|seen| seen == source) {
            ordered.push(source.clone());
        }
    }
    for alias in ALIAS_PRIORITY {
        if !ordered.iter().any(|seen| seen == alias) {
            ordered.push((*alias).to_string());
        }
    }
    if let Some(extra) = extra {
        for source in extra {
            if !ordered.iter().any(|seen| seen == source) {
                ordered.push(source.clone());
            }
        }
    }
    ordered
}
