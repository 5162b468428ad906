//! Answer composition: citations, evidence windows, and the summary.
//!
//! The composed answer cites up to five context chunks and five graph
//! edges. Each cited paper gets one numbered entry, resolved to a
//! human-readable title where the corpus metadata has one, and each
//! evidence line can carry a window of surrounding document text
//! pulled from the extracted paper.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use petrel_core::config::StoreConfig;
use petrel_core::constants::{EVIDENCE_WINDOW, SUMMARY_CONTEXT_LIMIT, SUMMARY_GRAPH_LIMIT};
use petrel_core::errors::PetrelResult;
use petrel_core::models::{AgentState, Citation};
use petrel_core::traits::IGenerator;
use petrel_retrieval::aliases;
use serde_json::Value;

/// Characters of the evidence sentence used to locate it in the paper.
const SNIPPET_PROBE: usize = 120;

/// Corpus-side inputs to answer composition: extracted paper text and
/// the title metadata.
#[derive(Debug, Clone)]
pub struct AnswerContext {
    text_dir: PathBuf,
    titles: HashMap<String, String>,
}

impl AnswerContext {
    /// Scan the corpus directories from the store configuration.
    pub fn load(config: &StoreConfig) -> Self {
        Self::from_dirs(config.text_dir(), config.metadata_dir())
    }

    /// Build from explicit directories. Missing directories and
    /// unreadable metadata files are skipped; a corpus without
    /// metadata just resolves every title to the filename.
    pub fn from_dirs(text_dir: PathBuf, metadata_dir: PathBuf) -> Self {
        let mut titles = HashMap::new();
        if let Ok(entries) = std::fs::read_dir(&metadata_dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().and_then(OsStr::to_str) != Some("json") {
                    continue;
                }
                let Ok(content) = std::fs::read_to_string(&path) else {
                    continue;
                };
                let Ok(data) = serde_json::from_str::<Value>(&content) else {
                    continue;
                };
                let Some(pdf) = data
                    .get("pdf_file")
                    .and_then(Value::as_str)
                    .filter(|p| !p.is_empty())
                else {
                    continue;
                };
                let title = data
                    .get("title_candidate")
                    .and_then(Value::as_str)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| {
                        path.file_stem()
                            .and_then(OsStr::to_str)
                            .unwrap_or(pdf)
                            .to_string()
                    });
                titles.insert(pdf.to_string(), title);
            }
        }
        Self { text_dir, titles }
    }

    /// Human-readable title for a paper, or the filename itself when
    /// the metadata has nothing better.
    pub fn resolve_title(&self, pdf_file: &str) -> String {
        self.titles
            .get(pdf_file)
            .cloned()
            .unwrap_or_else(|| pdf_file.to_string())
    }

    /// A window of surrounding document text for an evidence sentence,
    /// from the extracted paper keyed by the paper's file stem.
    ///
    /// The sentence is located case-insensitively by its first 120
    /// characters; when it cannot be found the window is taken from
    /// the start of the document. Offsets are measured in the
    /// lowercased copy and clamped to character boundaries before
    /// slicing.
    pub fn fetch_pdf_context(&self, paper: Option<&str>, sentence: &str) -> String {
        let Some(paper) = paper.filter(|p| !p.is_empty()) else {
            return String::new();
        };
        let stem = Path::new(paper)
            .file_stem()
            .and_then(OsStr::to_str)
            .unwrap_or(paper);
        let path = self.text_dir.join(format!("{stem}.txt"));
        let Ok(bytes) = std::fs::read(&path) else {
            return String::new();
        };
        let content = String::from_utf8_lossy(&bytes);
        let probe: String = sentence
            .trim()
            .to_lowercase()
            .chars()
            .take(SNIPPET_PROBE)
            .collect();
        let found = if probe.is_empty() {
            None
        } else {
            content.to_lowercase().find(&probe)
        };
        match found {
            None => {
                let end = floor_char_boundary(&content, EVIDENCE_WINDOW);
                content[..end].trim().to_string()
            }
            Some(idx) => {
                let half = EVIDENCE_WINDOW / 2;
                let start = floor_char_boundary(&content, idx.saturating_sub(half));
                let end = floor_char_boundary(&content, idx.saturating_add(half));
                content[start..end].trim().to_string()
            }
        }
    }
}

/// Answer text plus the citations it references.
#[derive(Debug, Clone)]
pub struct ComposedAnswer {
    pub text: String,
    pub citations: Vec<Citation>,
}

struct EvidenceBlock {
    entry: String,
    context: String,
    citation: Option<usize>,
}

struct CitationBook<'a> {
    ctx: &'a AnswerContext,
    citations: Vec<Citation>,
    index: HashMap<String, usize>,
}

impl CitationBook<'_> {
    fn register(&mut self, paper: &str) -> usize {
        if let Some(&id) = self.index.get(paper) {
            return id;
        }
        let id = self.citations.len() + 1;
        self.citations.push(Citation {
            id,
            paper: paper.to_string(),
            title: self.ctx.resolve_title(paper),
        });
        self.index.insert(paper.to_string(), id);
        id
    }
}

/// Compose the final answer from the gathered evidence.
///
/// With a generator, the evidence is rendered into a prompt and the
/// model writes the summary; a generation failure propagates, there is
/// no silent fallback to the extractive path. Without a generator the
/// answer is the joined evidence statements. Both paths share the
/// numbered citations and the sources footer.
pub fn compose_answer(
    state: &AgentState,
    question: &str,
    generator: Option<&dyn IGenerator>,
    ctx: &AnswerContext,
) -> PetrelResult<ComposedAnswer> {
    let mut book = CitationBook {
        ctx,
        citations: Vec::new(),
        index: HashMap::new(),
    };
    let mut sentences: Vec<String> = Vec::new();
    let mut blocks: Vec<EvidenceBlock> = Vec::new();

    for hit in state.context.iter().take(SUMMARY_CONTEXT_LIMIT) {
        let snippet = hit.evidence_snippet();
        let entry = format_entry(&hit.metadata);
        sentences.push(entry.clone());
        let paper = hit.paper().filter(|p| !p.is_empty());
        let pdf_file = hit
            .metadata
            .get("pdf_file")
            .and_then(Value::as_str)
            .filter(|p| !p.is_empty());
        let citation = paper.or(pdf_file).map(|p| book.register(p));
        // The surrounding text is keyed by the paper field only; a
        // chunk carrying just pdf_file still gets a citation but no
        // context window.
        let context = ctx.fetch_pdf_context(paper, snippet);
        blocks.push(EvidenceBlock {
            entry,
            context,
            citation,
        });
    }

    for edge in state.graph_nodes.iter().take(SUMMARY_GRAPH_LIMIT) {
        let entry = edge.statement();
        sentences.push(entry.clone());
        let paper = (!edge.paper.is_empty()).then_some(edge.paper.as_str());
        let citation = paper.map(|p| book.register(p));
        let context = ctx.fetch_pdf_context(paper, &edge.sentence);
        blocks.push(EvidenceBlock {
            entry,
            context,
            citation,
        });
    }

    if sentences.is_empty() {
        return Ok(ComposedAnswer {
            text: "No evidence gathered.".to_string(),
            citations: Vec::new(),
        });
    }

    let answer = match generator {
        Some(generator) => {
            let prompt = build_prompt(question, &blocks);
            generator.generate(&prompt)?
        }
        None => sentences.join(" "),
    };

    let text = if book.citations.is_empty() {
        answer
    } else {
        let lines: Vec<String> = book
            .citations
            .iter()
            .map(|c| format!("[{}] {} ({})", c.id, c.title, c.paper))
            .collect();
        format!("{}\n\nSources:\n{}", answer.trim(), lines.join("\n"))
    };

    Ok(ComposedAnswer {
        text,
        citations: book.citations,
    })
}

/// Render the evidence blocks into the summarization prompt.
fn build_prompt(question: &str, blocks: &[EvidenceBlock]) -> String {
    let expected = aliases::expected_entities(question);
    let mut lines: Vec<String> = Vec::with_capacity(blocks.len());
    for block in blocks {
        let prefix = match block.citation {
            Some(id) => format!("[{id}] "),
            None => String::new(),
        };
        let context_part = if block.context.is_empty() {
            String::new()
        } else {
            format!("\n  Context: {}", block.context)
        };
        lines.push(format!("- {prefix}{}{context_part}", block.entry));
    }
    let evidence_text = lines.join("\n");
    let expected_text = if expected.is_empty() {
        "the enzymes already cited".to_string()
    } else {
        expected.join(", ")
    };
    format!(
        "You are a PETase research assistant. Read the evidence snippets (with citations like [1], [2]) and respond in natural paragraphs.\n\
         Goals:\n\
         - Summarize what is already known.\n\
         - Identify limitations or knowledge gaps (note if an expected enzyme is missing: {expected_text}).\n\
         - Recommend concrete computational and experimental next steps.\n\
         Write fluid prose (no bullet headings) and reference citations inline using [n].\n\
         Evidence:\n\
         {evidence_text}"
    )
}

/// One evidence line for a context chunk's metadata: the relation
/// triple when the chunk was built from one, otherwise the best
/// available document label.
fn format_entry(metadata: &serde_json::Map<String, Value>) -> String {
    let source = metadata.get("source").and_then(Value::as_str);
    let relation = metadata.get("relation").and_then(Value::as_str);
    if let (Some(source), Some(relation)) = (source, relation) {
        let target = metadata.get("target").and_then(Value::as_str).unwrap_or("");
        return format!("{source} {relation} {target}").trim().to_string();
    }
    for key in ["title", "pdf_file", "chunk_id"] {
        if let Some(label) = metadata.get(key).and_then(Value::as_str) {
            if !label.is_empty() {
                return label.to_string();
            }
        }
    }
    "evidence".to_string()
}

/// Largest byte index `<= index` that sits on a character boundary.
fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    while !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use petrel_core::errors::{GenerationError, PetrelError};
    use petrel_core::models::{GraphEdge, SemanticHit};
    use serde_json::json;
    use std::sync::Mutex;

    fn empty_ctx(dir: &tempfile::TempDir) -> AnswerContext {
        AnswerContext::from_dirs(dir.path().join("text"), dir.path().join("metadata"))
    }

    fn hit(meta: serde_json::Value) -> SemanticHit {
        let metadata = match meta {
            Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        SemanticHit {
            text: "FAST-PETase degrades PET. Evidence: near-complete depolymerization."
                .to_string(),
            score: 0.9,
            metadata,
        }
    }

    fn edge(paper: &str) -> GraphEdge {
        GraphEdge {
            source: "FAST-PETase".to_string(),
            relation: "degrades".to_string(),
            target: "PET".to_string(),
            paper: paper.to_string(),
            sentence: "FAST-PETase degraded 51 films.".to_string(),
            confidence: 0.8,
        }
    }

    #[derive(Debug)]
    struct CapturingGenerator {
        prompt: Mutex<Option<String>>,
        reply: String,
    }

    impl IGenerator for CapturingGenerator {
        fn generate(&self, prompt: &str) -> PetrelResult<String> {
            if let Ok(mut slot) = self.prompt.lock() {
                *slot = Some(prompt.to_string());
            }
            Ok(self.reply.clone())
        }

        fn name(&self) -> &str {
            "capturing"
        }

        fn is_available(&self) -> bool {
            true
        }
    }

    #[derive(Debug)]
    struct FailingGenerator;

    impl IGenerator for FailingGenerator {
        fn generate(&self, _prompt: &str) -> PetrelResult<String> {
            Err(GenerationError::RequestFailed {
                message: "boom".to_string(),
            }
            .into())
        }

        fn name(&self) -> &str {
            "failing"
        }

        fn is_available(&self) -> bool {
            false
        }
    }

    #[test]
    fn format_entry_prefers_the_relation_triple() {
        let meta = json!({"source": "FAST-PETase", "relation": "degrades", "target": "PET"});
        if let Value::Object(map) = meta {
            assert_eq!(format_entry(&map), "FAST-PETase degrades PET");
        }
    }

    #[test]
    fn format_entry_falls_back_to_document_labels() {
        let meta = json!({"pdf_file": "lu2022.pdf"});
        if let Value::Object(map) = meta {
            assert_eq!(format_entry(&map), "lu2022.pdf");
        }
        assert_eq!(format_entry(&serde_json::Map::new()), "evidence");
    }

    #[test]
    fn empty_state_yields_the_fixed_answer() {
        let dir = tempfile::tempdir().unwrap();
        let state = AgentState::new("q");
        let composed = compose_answer(&state, "q", None, &empty_ctx(&dir)).unwrap();
        assert_eq!(composed.text, "No evidence gathered.");
        assert!(composed.citations.is_empty());
    }

    #[test]
    fn extractive_answer_joins_statements_and_appends_sources() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AgentState::new("q");
        state.context.push(hit(json!({
            "source": "FAST-PETase", "relation": "degrades", "target": "PET",
            "paper": "lu2022.pdf",
        })));
        state.graph_nodes.push(edge("lu2022.pdf"));

        let composed = compose_answer(&state, "q", None, &empty_ctx(&dir)).unwrap();
        assert_eq!(
            composed.text,
            "FAST-PETase degrades PET FAST-PETase degrades PET\n\n\
             Sources:\n[1] lu2022.pdf (lu2022.pdf)"
        );
        // Same paper cited from a chunk and an edge collapses to one
        // numbered source.
        assert_eq!(composed.citations.len(), 1);
        assert_eq!(composed.citations[0].id, 1);
    }

    #[test]
    fn distinct_papers_get_distinct_citation_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AgentState::new("q");
        state.context.push(hit(json!({
            "source": "FAST-PETase", "relation": "degrades", "target": "PET",
            "paper": "lu2022.pdf",
        })));
        state.graph_nodes.push(edge("tournier2020.pdf"));

        let composed = compose_answer(&state, "q", None, &empty_ctx(&dir)).unwrap();
        assert_eq!(composed.citations.len(), 2);
        assert_eq!(composed.citations[0].paper, "lu2022.pdf");
        assert_eq!(composed.citations[1].paper, "tournier2020.pdf");
        assert!(composed.text.contains("[2] tournier2020.pdf (tournier2020.pdf)"));
    }

    #[test]
    fn titles_resolve_from_corpus_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let meta_dir = dir.path().join("metadata");
        std::fs::create_dir_all(&meta_dir).unwrap();
        std::fs::write(
            meta_dir.join("lu2022.json"),
            json!({"pdf_file": "lu2022.pdf", "title_candidate": "Machine learning-aided engineering of hydrolases"})
                .to_string(),
        )
        .unwrap();
        let ctx = AnswerContext::from_dirs(dir.path().join("text"), meta_dir);
        assert_eq!(
            ctx.resolve_title("lu2022.pdf"),
            "Machine learning-aided engineering of hydrolases"
        );
        assert_eq!(ctx.resolve_title("unknown.pdf"), "unknown.pdf");
    }

    #[test]
    fn metadata_without_a_title_uses_the_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let meta_dir = dir.path().join("metadata");
        std::fs::create_dir_all(&meta_dir).unwrap();
        std::fs::write(
            meta_dir.join("tournier2020.json"),
            json!({"pdf_file": "tournier2020.pdf"}).to_string(),
        )
        .unwrap();
        let ctx = AnswerContext::from_dirs(dir.path().join("text"), meta_dir);
        assert_eq!(ctx.resolve_title("tournier2020.pdf"), "tournier2020");
    }

    #[test]
    fn llm_prompt_carries_numbered_evidence_and_goals() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AgentState::new("What mutations improve PETase thermostability?");
        state.context.push(hit(json!({
            "source": "FAST-PETase", "relation": "degrades", "target": "PET",
            "paper": "lu2022.pdf",
        })));
        let generator = CapturingGenerator {
            prompt: Mutex::new(None),
            reply: "Engineered PETases degrade PET rapidly [1].".to_string(),
        };

        let composed = compose_answer(
            &state,
            "What mutations improve PETase thermostability?",
            Some(&generator),
            &empty_ctx(&dir),
        )
        .unwrap();

        let prompt = generator.prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.starts_with("You are a PETase research assistant."));
        assert!(prompt.contains("- [1] FAST-PETase degrades PET"));
        assert!(prompt.contains("- Recommend concrete computational and experimental next steps."));
        // Stability questions expect the named mutations.
        assert!(prompt.contains("N233K"));
        assert!(composed
            .text
            .starts_with("Engineered PETases degrade PET rapidly [1]."));
        assert!(composed.text.contains("\n\nSources:\n[1]"));
    }

    #[test]
    fn generation_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AgentState::new("q");
        state.context.push(hit(json!({
            "source": "FAST-PETase", "relation": "degrades", "target": "PET",
            "paper": "lu2022.pdf",
        })));
        let err = compose_answer(&state, "q", Some(&FailingGenerator), &empty_ctx(&dir))
            .unwrap_err();
        assert!(matches!(err, PetrelError::GenerationError(_)));
    }

    #[test]
    fn pdf_context_windows_around_the_sentence() {
        let dir = tempfile::tempdir().unwrap();
        let text_dir = dir.path().join("text");
        std::fs::create_dir_all(&text_dir).unwrap();
        let padding = "x".repeat(2000);
        let content = format!("{padding}The enzyme degraded 51 PET films in one week.{padding}");
        std::fs::write(text_dir.join("lu2022.txt"), &content).unwrap();
        let ctx = AnswerContext::from_dirs(text_dir, dir.path().join("metadata"));

        let window =
            ctx.fetch_pdf_context(Some("lu2022.pdf"), "The enzyme degraded 51 PET films");
        assert!(window.contains("degraded 51 PET films"));
        assert!(window.len() <= EVIDENCE_WINDOW);
    }

    #[test]
    fn pdf_context_falls_back_to_the_document_head() {
        let dir = tempfile::tempdir().unwrap();
        let text_dir = dir.path().join("text");
        std::fs::create_dir_all(&text_dir).unwrap();
        std::fs::write(text_dir.join("lu2022.txt"), "a".repeat(1200)).unwrap();
        let ctx = AnswerContext::from_dirs(text_dir, dir.path().join("metadata"));

        let window = ctx.fetch_pdf_context(Some("lu2022.pdf"), "sentence that is not present");
        assert_eq!(window.len(), EVIDENCE_WINDOW);
    }

    #[test]
    fn pdf_context_is_empty_without_a_paper_or_file() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = empty_ctx(&dir);
        assert_eq!(ctx.fetch_pdf_context(None, "s"), "");
        assert_eq!(ctx.fetch_pdf_context(Some(""), "s"), "");
        assert_eq!(ctx.fetch_pdf_context(Some("missing.pdf"), "s"), "");
    }

    #[test]
    fn pdf_context_clamps_multibyte_boundaries() {
        let dir = tempfile::tempdir().unwrap();
        let text_dir = dir.path().join("text");
        std::fs::create_dir_all(&text_dir).unwrap();
        // Multibyte padding so a naive byte slice would split a char.
        let content = "é".repeat(1000);
        std::fs::write(text_dir.join("p.txt"), &content).unwrap();
        let ctx = AnswerContext::from_dirs(text_dir, dir.path().join("metadata"));

        let window = ctx.fetch_pdf_context(Some("p.pdf"), "not present");
        assert!(window.chars().all(|c| c == 'é'));
    }
}
