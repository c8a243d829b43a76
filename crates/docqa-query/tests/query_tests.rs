use docqa_core::types::{ConversationTurn, QueryType};
use docqa_query::{ConversationalContext, QueryAnalyzer};

#[test]
fn classifies_person_queries() {
    let analyzer = QueryAnalyzer::new();
    let analysis = analyzer.analyze("Who is the CTO?");
    assert_eq!(analysis.query_type, QueryType::Person);
    assert!(analysis.is_question);
}

#[test]
fn classifies_technology_queries() {
    let analyzer = QueryAnalyzer::new();
    let analysis = analyzer.analyze("What frameworks are in the technology stack?");
    assert_eq!(analysis.query_type, QueryType::Technology);
}

#[test]
fn classifies_process_and_architecture_queries() {
    let analyzer = QueryAnalyzer::new();
    assert_eq!(
        analyzer.analyze("How to deploy a release through the pipeline?").query_type,
        QueryType::Process
    );
    assert_eq!(
        analyzer.analyze("Describe the system architecture and its components").query_type,
        QueryType::Architecture
    );
}

#[test]
fn unmatched_queries_fall_back_to_general() {
    let analyzer = QueryAnalyzer::new();
    let analysis = analyzer.analyze("good morning everyone");
    assert_eq!(analysis.query_type, QueryType::General);
    assert!(!analysis.is_question);
}

#[test]
fn key_terms_drop_stop_words_and_short_tokens() {
    let analyzer = QueryAnalyzer::new();
    let analysis = analyzer.analyze("What is the deployment of an API?");
    assert!(analysis.key_terms.iter().any(|t| t == "deployment"));
    assert!(!analysis.key_terms.iter().any(|t| t == "the"));
    assert!(!analysis.key_terms.iter().any(|t| t == "of"));
}

#[test]
fn multi_word_phrases_become_key_terms() {
    let analyzer = QueryAnalyzer::new();
    let analysis = analyzer.analyze("What is in the machine learning stack?");
    assert!(analysis.key_terms.iter().any(|t| t == "machine learning"));

    let analysis = analyzer.analyze("show the tech stack");
    assert!(analysis.key_terms.iter().any(|t| t == "technology stack"));

    let analysis = analyzer.analyze("who is the chief technology officer");
    assert!(analysis.key_terms.iter().any(|t| t == "cto"));
}

#[test]
fn expanded_terms_contain_every_key_term() {
    let analyzer = QueryAnalyzer::new();
    for query in [
        "Who is the CTO?",
        "What is the machine learning stack?",
        "how to deploy the backend",
        "tell me about the database",
    ] {
        let analysis = analyzer.analyze(query);
        for term in &analysis.key_terms {
            assert!(
                analysis.expanded_terms.contains(term),
                "expanded terms must be a superset of key terms, missing {term:?} for {query:?}"
            );
        }
    }
}

#[test]
fn synonym_expansion_adds_known_variants() {
    let analyzer = QueryAnalyzer::new();
    let analysis = analyzer.analyze("who is the cto");
    assert!(analysis.expanded_terms.contains("chief technology officer"));

    let analysis = analyzer.analyze("how to deploy the api");
    assert!(analysis.expanded_terms.contains("deployment"));
}

#[test]
fn extracts_people_roles_and_technologies() {
    let analyzer = QueryAnalyzer::new();
    let analysis = analyzer.analyze("Does Alexandra Chen use Python and React?");
    assert!(analysis.entities.people.contains(&"Alexandra Chen".to_string()));
    assert!(analysis.entities.technologies.contains(&"python".to_string()));
    assert!(analysis.entities.technologies.contains(&"react".to_string()));

    let analysis = analyzer.analyze("who is the lead engineer");
    assert!(analysis.entities.roles.contains(&"lead".to_string()));
    assert!(analysis.entities.roles.contains(&"engineer".to_string()));
}

#[test]
fn question_words_are_not_people() {
    let analyzer = QueryAnalyzer::new();
    let analysis = analyzer.analyze("Who Is the manager");
    assert!(
        !analysis.entities.people.iter().any(|p| p.starts_with("Who")),
        "got people: {:?}",
        analysis.entities.people
    );
}

#[test]
fn expand_query_without_history_is_a_no_op() {
    let context = ConversationalContext::default();
    let (expanded, was_expanded) = context.expand_query("tell me more");
    assert_eq!(expanded, "tell me more");
    assert!(!was_expanded);
}

#[test]
fn tell_me_more_rewrites_to_previous_topic() {
    let mut context = ConversationalContext::default();
    context.add_interaction("Who is the CTO", "Alexandra Chen is the CTO.");

    let (expanded, was_expanded) = context.expand_query("tell me more");
    assert!(was_expanded);
    assert_eq!(expanded, "cto - provide more detailed information");
}

#[test]
fn what_about_carries_the_topic_forward() {
    let mut context = ConversationalContext::default();
    context.add_interaction("What is the deployment process", "We deploy via CI.");

    let (expanded, was_expanded) = context.expand_query("what about testing");
    assert!(was_expanded);
    assert_eq!(expanded, "testing related to deployment process");
}

#[test]
fn bare_pronouns_resolve_to_the_topic() {
    let mut context = ConversationalContext::default();
    context.add_interaction("What is the technology stack", "React and Python.");

    let (expanded, was_expanded) = context.expand_query("how does it compare");
    assert!(was_expanded);
    assert_eq!(expanded, "how does technology stack compare");
}

#[test]
fn non_follow_up_queries_pass_through_unchanged() {
    let mut context = ConversationalContext::default();
    context.add_interaction("Who is the CTO?", "Alexandra Chen.");

    let (expanded, was_expanded) = context.expand_query("list the deployment steps");
    assert_eq!(expanded, "list the deployment steps");
    assert!(!was_expanded);
}

#[test]
fn window_evicts_oldest_turn() {
    let mut context = ConversationalContext::new(2);
    context.add_interaction("first question regarding react", "a");
    context.add_interaction("second question regarding python", "b");
    context.add_interaction("third question regarding docker", "c");

    // Topic must come from the most recent turn, and the first turn is
    // gone from the window.
    let (expanded, _) = context.expand_query("tell me more");
    assert_eq!(expanded, "third question regarding - provide more detailed information");
}

#[test]
fn context_prompt_truncates_long_responses() {
    let mut context = ConversationalContext::default();
    let long_response = "x".repeat(2000);
    context.add_interaction("query about kubernetes", &long_response);

    let prompt = context.context_prompt();
    assert!(prompt.contains("Previous Q: query about kubernetes"));
    assert!(prompt.len() < 300, "answers are capped in the prompt: {}", prompt.len());
}

#[test]
fn seed_replays_external_turns() {
    let mut context = ConversationalContext::default();
    context.seed(&[ConversationTurn {
        query: "What is the machine learning stack".to_string(),
        response: "BGE-M3 embeddings.".to_string(),
    }]);
    assert!(!context.is_empty());

    let (expanded, was_expanded) = context.expand_query("tell me more");
    assert!(was_expanded);
    assert_eq!(expanded, "machine learning stack - provide more detailed information");
}
