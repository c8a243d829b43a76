use docqa_core::types::{QueryAnalysis, QueryType, SearchHit};
use docqa_extract::{
    clean_text, extract_highlights, extract_structured_content, format_for_display,
};

fn analysis(query: &str, query_type: QueryType, key_terms: &[&str]) -> QueryAnalysis {
    QueryAnalysis {
        original_query: query.to_string(),
        query_type,
        key_terms: key_terms.iter().map(|t| (*t).to_string()).collect(),
        expanded_terms: key_terms.iter().map(|t| (*t).to_string()).collect(),
        entities: Default::default(),
        is_question: false,
    }
}

fn hit(section: &str, content: &str, highlights: &[&str]) -> SearchHit {
    SearchHit {
        content: content.to_string(),
        document_title: "Technology Stack".to_string(),
        section_title: section.to_string(),
        document_path: "docs/technology_stack.md".to_string(),
        score: 1.0,
        chunk_id: "technology_stack.md_section_0".to_string(),
        highlights: highlights.iter().map(|h| (*h).to_string()).collect(),
    }
}

#[test]
fn clean_text_strips_markdown_artifacts() {
    let cleaned = clean_text("## Heading\n\n- item one\n* item two\n***\nplain  text");
    assert!(!cleaned.contains("##"));
    assert!(!cleaned.contains("***"));
    assert!(cleaned.contains("\u{2022} item one"));
    assert!(cleaned.contains("\u{2022} item two"));
    assert!(!cleaned.contains("  "), "double spaces collapsed: {cleaned:?}");
}

#[test]
fn clean_text_is_idempotent() {
    let once = clean_text("## Title\n\n\n\n- bullet point\n**bold**  spaced");
    let twice = clean_text(&once);
    assert_eq!(once, twice);
}

#[test]
fn clean_text_unescapes_literal_sequences() {
    let cleaned = clean_text("line one\\nline two\\tend");
    assert!(cleaned.contains("line one\nline two"));
    assert!(!cleaned.contains('\\'));
}

#[test]
fn highlights_prefer_sentences_with_query_terms() {
    let content = "The weather was nice that day for everyone. \
        The deployment pipeline runs on every merge to main. \
        Nothing interesting happens in this other sentence at all.";
    let highlights = extract_highlights(content, ["deployment", "pipeline"], 2);
    assert!(!highlights.is_empty());
    assert!(
        highlights[0].contains("deployment pipeline"),
        "best sentence first: {highlights:?}"
    );
}

#[test]
fn highlights_respect_the_cap_and_length_gate() {
    let content = "Short. \
        The deployment process is documented here in detail for new engineers. \
        Deployment happens nightly and is fully automated end to end. \
        A third deployment sentence that also easily clears the length gate.";
    let highlights = extract_highlights(content, ["deployment"], 2);
    assert_eq!(highlights.len(), 2);
    assert!(highlights.iter().all(|h| h.len() > 20 && h.len() < 300));
}

#[test]
fn highlights_ignore_terms_of_two_chars_or_less() {
    let content = "An ML system is described here with enough words to count.";
    let with_short = extract_highlights(content, ["ml"], 3);
    let without = extract_highlights(content, Vec::<String>::new(), 3);
    assert_eq!(with_short, without, "two-char terms contribute no score");
}

#[test]
fn structured_extraction_finds_key_values_and_lists() {
    let content = "**Language**: Python 3.11\nFramework: FastAPI\n\n- first item\n- second item\nnot a bullet\n\u{2022} lone item";
    let structured = extract_structured_content(content);

    assert_eq!(structured.value_for("Language"), Some("Python 3.11"));
    assert_eq!(structured.value_for("Framework"), Some("FastAPI"));
    // The run broken by "not a bullet" and the trailing run at EOF.
    assert_eq!(structured.lists.len(), 2);
    assert_eq!(structured.lists[0], vec!["first item", "second item"]);
    assert_eq!(structured.lists[1], vec!["lone item"]);
}

#[test]
fn duplicate_keys_keep_position_and_take_last_value() {
    let content = "Language: Python\nFramework: FastAPI\nLanguage: Rust";
    let structured = extract_structured_content(content);

    assert_eq!(structured.key_values.len(), 2);
    assert_eq!(structured.key_values[0].0, "Language");
    assert_eq!(structured.value_for("Language"), Some("Rust"));
}

#[test]
fn list_items_are_not_key_values() {
    let content = "- Database: PostgreSQL\nCache: Redis";
    let structured = extract_structured_content(content);

    assert_eq!(structured.value_for("Database"), None);
    assert_eq!(structured.value_for("Cache"), Some("Redis"));
    assert_eq!(structured.lists[0], vec!["Database: PostgreSQL"]);
}

#[test]
fn section_headers_are_collected() {
    let structured = extract_structured_content("### Embedding Models\ntext\n### Vector Store");
    assert_eq!(structured.sections, vec!["Embedding Models", "Vector Store"]);
}

#[test]
fn technology_display_prefers_structured_pairs() {
    let the_hit = hit(
        "Machine Learning Stack",
        "Embedding Model: BGE-M3\nVector Store: LanceDB\nRuntime: Candle",
        &[],
    );
    let analysis = analysis("machine learning stack", QueryType::Technology, &["machine learning"]);
    let formatted = format_for_display(&the_hit, &analysis, 2000);

    assert!(formatted.starts_with("**Machine Learning Stack**"));
    assert!(formatted.contains("Embedding Model: BGE-M3"));
    assert!(formatted.contains("Vector Store: LanceDB"));
}

#[test]
fn non_technology_display_leads_with_highlights() {
    let the_hit = hit(
        "Leadership",
        "Alexandra Chen leads engineering.\nCTO: Alexandra Chen",
        &["Alexandra Chen leads engineering and owns the technical roadmap."],
    );
    let analysis = analysis("who is the cto", QueryType::Person, &["cto"]);
    let formatted = format_for_display(&the_hit, &analysis, 2000);

    assert!(formatted.contains("\u{2022} Alexandra Chen leads engineering"));
    assert!(
        formatted.contains("CTO: Alexandra Chen"),
        "key-term keyed pair included: {formatted}"
    );
}

#[test]
fn display_never_exceeds_the_budget() {
    let long_content =
        "Framework: FastAPI\nLanguage: Python\nDatabase: PostgreSQL\nCache: Redis\nQueue: Kafka";
    let the_hit = hit("Backend", long_content, &[]);
    let analysis = analysis("backend stack", QueryType::Technology, &["backend"]);

    for budget in [50usize, 120, 400] {
        let formatted = format_for_display(&the_hit, &analysis, budget);
        assert!(
            formatted.len() <= budget,
            "budget {budget} exceeded: {}",
            formatted.len()
        );
    }
}

#[test]
fn display_budget_counts_characters_not_bytes() {
    let the_hit = hit(
        "Deployment",
        "The deployment pipeline runs on every merge to the main branch.",
        &[
            "The deployment pipeline runs on every merge to the main branch",
            "Deployments are fully automated and audited end to end",
        ],
    );
    let analysis = analysis("deployment process", QueryType::Process, &["deployment"]);

    let full = format_for_display(&the_hit, &analysis, usize::MAX);
    assert!(full.len() > full.chars().count(), "bullet markers are multibyte");

    // A budget equal to the character count must not truncate anything.
    let fitted = format_for_display(&the_hit, &analysis, full.chars().count());
    assert_eq!(fitted, full);
}

#[test]
fn display_falls_back_to_an_excerpt() {
    let the_hit = hit("Overview", "A plain paragraph with no structure worth extracting.", &[]);
    let analysis = analysis("overview", QueryType::General, &[]);
    let formatted = format_for_display(&the_hit, &analysis, 2000);

    assert!(formatted.contains("A plain paragraph with no structure worth extracting."));
}
