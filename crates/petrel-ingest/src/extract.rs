//! Rule-based relation extraction over extracted paper text.
//!
//! The corpus follows tight naming conventions: enzymes are
//! capitalized `-ase` tokens, point mutations are single-letter
//! substitution codes, and the conditions worth graphing (temperature,
//! pH, conversion) sit next to their numbers. One pass per sentence;
//! a sentence with no enzyme mention yields nothing, otherwise every
//! detected condition becomes a typed edge from each enzyme named in
//! it, scored by how strongly the sentence supports the relation.

use std::collections::{BTreeSet, HashSet};
use std::ffi::OsStr;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use petrel_core::errors::{PetrelError, PetrelResult};
use petrel_core::models::GraphEdge;

/// Stored evidence sentences are capped at this many characters.
const MAX_SENTENCE_CHARS: usize = 400;

static SENTENCE_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]\s+").unwrap());

static ENZYME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Z][A-Za-z0-9-]{2,}ase)\b").unwrap());

static MUTATION_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Z]\d{1,4}[A-Z]\b").unwrap());

static TEMPERATURE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(-?\d+(?:\.\d+)?)\s*(?:°\s?C|ºC|degrees C|C)\b").unwrap());

static PH_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bpH\s*(\d+(?:\.\d+)?)").unwrap());

static CONVERSION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*(?:%|percent)\s+(?:degradation|degraded|conversion|hydrolysis)")
        .unwrap()
});

static DURATION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*(?:h|hours)\b").unwrap());

/// Substrate label and the surface forms that name it, lowercased.
const SUBSTRATES: &[(&str, &[&str])] = &[
    ("PET", &["pet", "polyethylene terephthalate"]),
    ("BHET", &["bhet", "bis(2-hydroxyethyl) terephthalate"]),
    ("TPA", &["tpa", "terephthalic acid"]),
    ("MHET", &["mhet", "mono(2-hydroxyethyl) terephthalate"]),
];

/// Metric label and the keywords that signal a sentence discusses it.
const METRIC_KEYWORDS: &[(&str, &[&str])] = &[
    ("activity", &["activity", "kinetics", "turnover"]),
    ("stability", &["stability", "half-life", "melting temperature", "tm"]),
    (
        "engineering",
        &["mutation", "engineer", "variant", "designed", "evolved"],
    ),
];

/// Alphanumeric-folded surface form to canonical enzyme label.
const CANONICAL_ENZYMES: &[(&str, &str)] = &[
    ("petase", "PETase"),
    ("ispetase", "IsPETase"),
    ("wtpetase", "WT-PETase"),
    ("fastpetase", "FAST-PETase"),
    ("hotpetase", "HotPETase"),
    ("durapetase", "DuraPETase"),
    ("thermopetase", "ThermoPETase"),
    ("turbopetase", "TurboPETase"),
    ("tspetase", "TS-PETase"),
    ("bhpetase", "BhrPETase"),
];

/// Relation kind and the keywords that strengthen an extraction of it.
const RELATION_KEYWORDS: &[(&str, &[&str])] = &[
    ("has_mutation", &["mutation", "variant", "substitution"]),
    ("targets_substrate", &["hydrolysis", "degrade", "substrate"]),
    ("active_temperature", &["°c", "temperature"]),
    ("active_pH", &["ph"]),
    ("achieves_conversion", &["conversion", "degradation", "%"]),
    ("discusses_metric", &["activity", "stability", "kinetic"]),
];

/// Split text on sentence-final punctuation followed by whitespace,
/// keeping the punctuation with the sentence it closes.
pub fn sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    for boundary in SENTENCE_BOUNDARY.find_iter(text) {
        let end = boundary.start() + 1;
        let sentence = text[start..end].trim();
        if !sentence.is_empty() {
            out.push(sentence);
        }
        start = boundary.end();
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        out.push(tail);
    }
    out
}

/// Fold a surface form to its canonical enzyme label when it is a
/// known variant spelling, otherwise return it trimmed.
pub fn normalize_enzyme(label: &str) -> String {
    let folded: String = label
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect();
    CANONICAL_ENZYMES
        .iter()
        .find(|(key, _)| *key == folded)
        .map(|(_, canonical)| (*canonical).to_string())
        .unwrap_or_else(|| label.trim().to_string())
}

/// Score an extraction by sentence length and relation wording.
/// Clamped to 0.99 and rounded to two decimals.
pub fn compute_confidence(sentence: &str, relation: &str) -> f64 {
    let mut score: f64 = 0.35;
    let text = sentence.to_lowercase();
    let length = sentence.chars().count();
    if (60..=400).contains(&length) {
        score += 0.2;
    } else if (30..=500).contains(&length) {
        score += 0.1;
    }
    if let Some((_, keywords)) = RELATION_KEYWORDS.iter().find(|(r, _)| *r == relation) {
        if keywords.iter().any(|keyword| text.contains(keyword)) {
            score += 0.15;
        }
    }
    if relation == "has_mutation" && sentence.chars().any(|c| c.is_ascii_digit()) {
        score += 0.1;
    }
    if relation == "targets_substrate" && text.contains("pet") {
        score += 0.1;
    }
    (score.min(0.99) * 100.0).round() / 100.0
}

/// Accumulates edges across documents, deduplicating on the full
/// (source, relation, target, paper) identity for the whole run.
#[derive(Default)]
pub struct EdgeExtractor {
    edges: Vec<GraphEdge>,
    seen: HashSet<(String, String, String, String)>,
}

impl EdgeExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of edges collected so far.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Scan one document's text, attributing edges to `paper`.
    pub fn scan_text(&mut self, text: &str, paper: &str) {
        for sentence in sentences(text) {
            self.scan_sentence(sentence, paper);
        }
    }

    fn scan_sentence(&mut self, sentence: &str, paper: &str) {
        let enzymes: BTreeSet<&str> = ENZYME_REGEX
            .captures_iter(sentence)
            .map(|cap| cap.get(1).map_or("", |m| m.as_str()))
            .collect();
        if enzymes.is_empty() {
            return;
        }
        let mutations: Vec<&str> = MUTATION_REGEX
            .find_iter(sentence)
            .map(|m| m.as_str())
            .collect();
        let temperatures: Vec<String> = TEMPERATURE_REGEX
            .captures_iter(sentence)
            .map(|cap| format!("{} °C", &cap[1]))
            .collect();
        let ph_values: Vec<String> = PH_REGEX
            .captures_iter(sentence)
            .map(|cap| format!("pH {}", &cap[1]))
            .collect();
        let conversions: Vec<String> = CONVERSION_REGEX
            .captures_iter(sentence)
            .map(|cap| format!("{}% degradation", &cap[1]))
            .collect();
        let durations: Vec<&str> = DURATION_REGEX
            .captures_iter(sentence)
            .map(|cap| cap.get(1).map_or("", |m| m.as_str()))
            .collect();
        let lowered = sentence.to_lowercase();

        for enzyme in &enzymes {
            for mutation in &mutations {
                self.add(enzyme, "has_mutation", mutation, paper, sentence);
            }
            for temperature in &temperatures {
                self.add(enzyme, "active_temperature", temperature, paper, sentence);
            }
            for ph in &ph_values {
                self.add(enzyme, "active_pH", ph, paper, sentence);
            }
            for conversion in &conversions {
                let target = match durations.first() {
                    Some(hours) => format!("{conversion} in {hours} h"),
                    None => conversion.clone(),
                };
                self.add(enzyme, "achieves_conversion", &target, paper, sentence);
            }
            for (label, terms) in SUBSTRATES {
                if terms.iter().any(|term| lowered.contains(term)) {
                    self.add(enzyme, "targets_substrate", label, paper, sentence);
                }
            }
            for (label, keywords) in METRIC_KEYWORDS {
                if keywords.iter().any(|keyword| lowered.contains(keyword)) {
                    self.add(enzyme, "discusses_metric", label, paper, sentence);
                }
            }
        }
    }

    fn add(&mut self, source: &str, relation: &str, target: &str, paper: &str, sentence: &str) {
        let source = normalize_enzyme(source);
        let key = (
            source.clone(),
            relation.to_string(),
            target.to_string(),
            paper.to_string(),
        );
        if !self.seen.insert(key) {
            return;
        }
        self.edges.push(GraphEdge {
            source,
            relation: relation.to_string(),
            target: target.to_string(),
            paper: paper.to_string(),
            sentence: truncate_chars(sentence, MAX_SENTENCE_CHARS),
            confidence: compute_confidence(sentence, relation),
        });
    }

    pub fn into_edges(self) -> Vec<GraphEdge> {
        self.edges
    }
}

/// Extract edges from every `.txt` file under `text_dir`, in filename
/// order. Each file's edges are attributed to the PDF of the same stem.
pub fn extract_dir(text_dir: &Path) -> PetrelResult<Vec<GraphEdge>> {
    if !text_dir.is_dir() {
        return Err(PetrelError::ConfigError(format!(
            "text directory not found: {}",
            text_dir.display()
        )));
    }
    let mut paths: Vec<_> = std::fs::read_dir(text_dir)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(OsStr::to_str) == Some("txt"))
        .collect();
    paths.sort();

    let mut extractor = EdgeExtractor::new();
    for path in &paths {
        let bytes = std::fs::read(path)?;
        let text = String::from_utf8_lossy(&bytes);
        let paper = paper_for(path);
        let before = extractor.len();
        extractor.scan_text(&text, &paper);
        debug!(file = %path.display(), edges = extractor.len() - before, "scanned");
    }
    let edges = extractor.into_edges();
    info!(files = paths.len(), edges = edges.len(), "extraction finished");
    Ok(edges)
}

/// The PDF a text file was extracted from: same stem, `.pdf` suffix.
fn paper_for(path: &Path) -> String {
    match path.file_stem() {
        Some(stem) => format!("{}.pdf", stem.to_string_lossy()),
        None => String::new(),
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
