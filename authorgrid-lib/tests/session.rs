//! Integration tests for focus, suggestions and submission through a session.

use async_trait::async_trait;
use tokio::sync::Mutex;

use authorgrid_lib::GridConfig;
use authorgrid_lib::Session;
use authorgrid_lib::error::GridWarning;
use authorgrid_lib::error::SubmitError;
use authorgrid_lib::focus::Direction;
use authorgrid_lib::focus::FieldKind;
use authorgrid_lib::model::Record;
use authorgrid_lib::submit::SubmitPayload;
use authorgrid_lib::submit::SubmitSink;
use authorgrid_lib::suggest::StaticSuggestions;

fn cols(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn three_rows() -> Session {
    Session::load(
        vec![
            Record::new("Alice", ["CERN"]),
            Record::new("Bob", ["DESY"]),
            Record::new("Carol", ["CERN", "SLAC"]),
        ],
        GridConfig::default(),
    )
}

#[derive(Default)]
struct MemorySink {
    saved: Mutex<Vec<SubmitPayload>>,
}

#[async_trait]
impl SubmitSink for MemorySink {
    async fn submit(&self, payload: &SubmitPayload) -> Result<(), SubmitError> {
        self.saved.lock().await.push(payload.clone());
        Ok(())
    }
}

struct RejectingSink;

#[async_trait]
impl SubmitSink for RejectingSink {
    async fn submit(&self, _payload: &SubmitPayload) -> Result<(), SubmitError> {
        Err(SubmitError::rejected("read-only record"))
    }
}

// =============================================================================
// Focus and commit
// =============================================================================

#[test]
fn test_commit_only_when_text_changed() {
    let mut session = three_rows();
    assert!(session.focus(0, FieldKind::Author));
    assert_eq!(session.captured_text(), Some("Alice"));

    assert!(!session.commit("Alice"));
    assert!(session.commit("Alicia"));
    assert_eq!(session.grid().record_at(0).unwrap().author, "Alicia");
    assert_eq!(session.captured_text(), Some("Alicia"));
}

#[test]
fn test_commit_without_focus_is_noop() {
    let mut session = three_rows();
    assert!(!session.commit("Zed"));
    assert!(!session.focus(9, FieldKind::Author));
}

#[test]
fn test_commit_affiliations_refreshes_columns() {
    let mut session = three_rows();
    session.focus(1, FieldKind::Affiliations);
    assert!(session.commit("1; Fermilab"));

    let record = session.grid().record_at(1).unwrap();
    assert_eq!(record.affiliations, cols(&["CERN", "Fermilab"]));
    assert_eq!(session.grid().columns(), cols(&["CERN", "Fermilab", "SLAC"]));
    assert_eq!(session.captured_text(), Some("CERN;Fermilab;"));
}

#[test]
fn test_checkbox_updates_captured_text() {
    let mut session = three_rows();
    session.focus(0, FieldKind::Affiliations);
    session.toggle_checkbox(0, "SLAC", true);
    assert_eq!(session.captured_text(), Some("CERN;SLAC;"));
}

#[test]
fn test_move_focus_stays_on_page() {
    let mut session = Session::load(
        vec![
            Record::new("Alice", ["CERN"]),
            Record::new("Bob", ["DESY"]),
            Record::new("Carol", ["SLAC"]),
        ],
        GridConfig::default().with_page_size(2),
    );
    session.focus(0, FieldKind::Affiliations);
    assert!(!session.move_focus(Direction::Up));
    assert!(session.move_focus(Direction::Down));

    let field = session.focused().unwrap();
    assert_eq!(field.kind, FieldKind::Affiliations);
    assert_eq!(Some(field.row), session.grid().row_id(1));

    assert!(!session.move_focus(Direction::Down));
}

#[test]
fn test_cut_moves_focus_to_next_or_previous_row() {
    let mut session = three_rows();
    session.focus(1, FieldKind::Affiliations);
    session.delete_row(1);

    let field = session.focused().unwrap();
    assert_eq!(Some(field.row), session.grid().row_id(1));
    assert_eq!(field.kind, FieldKind::Affiliations);
    assert_eq!(session.captured_text(), Some("CERN;SLAC;"));

    session.delete_row(1);
    let field = session.focused().unwrap();
    assert_eq!(Some(field.row), session.grid().row_id(0));
}

#[test]
fn test_cut_last_remaining_row_clears_focus() {
    let mut session = Session::load(vec![Record::new("Alice", ["CERN"])], GridConfig::default());
    session.focus(0, FieldKind::Author);
    session.delete_row(0);
    assert!(session.focused().is_none());
    assert!(session.grid().is_empty());
    assert!(session.grid().columns().is_empty());
}

#[test]
fn test_insert_focuses_new_author_box() {
    let mut session = three_rows();
    let id = session.insert_row_after(Some(2)).unwrap();
    let field = session.focused().unwrap();
    assert_eq!(field.row, id);
    assert_eq!(field.kind, FieldKind::Author);
    assert_eq!(session.captured_text(), Some(""));
}

#[test]
fn test_insert_reveals_row_on_later_page() {
    let mut session = Session::load(
        vec![Record::new("Alice", ["CERN"]), Record::new("Bob", ["DESY"])],
        GridConfig::default().with_page_size(2),
    );
    session.insert_row_after(Some(1));
    assert_eq!(session.grid().visible_range(), 2..3);
}

// =============================================================================
// Suggestions
// =============================================================================

#[test]
fn test_request_needs_focus_and_min_length() {
    let mut session = three_rows();
    assert!(session.request_suggestions("Fermi").is_none());

    session.focus(0, FieldKind::Affiliations);
    assert!(session.request_suggestions("CERN; Fe").is_none());

    let request = session.request_suggestions("CERN; Fer").unwrap();
    assert_eq!(request.query, "Fer");
}

#[test]
fn test_affiliation_suggestion_replaces_last_segment() {
    let mut session = three_rows();
    session.focus(0, FieldKind::Affiliations);
    let request = session.request_suggestions("CERN; Fer").unwrap();

    assert!(session.apply_suggestion(&request, "Fermilab"));
    let record = session.grid().record_at(0).unwrap();
    assert_eq!(record.affiliations, cols(&["CERN", "Fermilab"]));
    assert!(session.grid().columns().contains(&"Fermilab".to_string()));

    // A ticket is consumed on use.
    assert!(!session.apply_suggestion(&request, "Fermilab"));
}

#[test]
fn test_author_suggestion_replaces_text() {
    let mut session = three_rows();
    session.focus(1, FieldKind::Author);
    let request = session.request_suggestions("Bob S").unwrap();
    assert!(session.apply_suggestion(&request, "Bob Smith"));
    assert_eq!(session.grid().record_at(1).unwrap().author, "Bob Smith");
}

#[test]
fn test_superseded_suggestion_is_discarded() {
    let mut session = three_rows();
    session.focus(0, FieldKind::Affiliations);
    let old = session.request_suggestions("Fer").unwrap();
    let new = session.request_suggestions("Ferm").unwrap();
    assert!(new.generation() > old.generation());

    assert!(!session.apply_suggestion(&old, "Fermilab"));
    assert!(session.apply_suggestion(&new, "Fermilab"));
}

#[test]
fn test_suggestion_after_blur_is_discarded() {
    let mut session = three_rows();
    session.focus(0, FieldKind::Affiliations);
    let request = session.request_suggestions("Fer").unwrap();
    session.blur();

    assert!(!session.apply_suggestion(&request, "Fermilab"));
    assert_eq!(session.grid().record_at(0).unwrap().affiliations, cols(&["CERN"]));
}

#[test]
fn test_suggestion_after_focus_moved_is_discarded() {
    let mut session = three_rows();
    session.focus(0, FieldKind::Affiliations);
    let request = session.request_suggestions("Fer").unwrap();
    session.focus(0, FieldKind::Author);

    assert!(!session.apply_suggestion(&request, "Fermilab"));
}

#[test]
fn test_suggestion_for_removed_row_is_discarded() {
    let mut session = three_rows();
    session.focus(0, FieldKind::Affiliations);
    let request = session.request_suggestions("Fer").unwrap();
    session.delete_row(0);

    assert!(!session.apply_suggestion(&request, "Fermilab"));
    assert!(session.grid().rows().all(|(_, r)| !r.has_affiliation("Fermilab")));
}

#[test]
fn test_apply_suggestion_at_checks_row_and_focus() {
    let mut session = three_rows();
    session.focus(2, FieldKind::Affiliations);
    let request = session.request_suggestions("CERN; SLAC; DES").unwrap();

    assert!(!session.apply_suggestion_at(0, &request, "DESY"));
    assert!(session.apply_suggestion_at(2, &request, "DESY"));
    // The typed segment is replaced, not the text captured at focus.
    assert_eq!(
        session.grid().record_at(2).unwrap().affiliations,
        cols(&["CERN", "SLAC", "DESY"])
    );
    // Applied tickets are spent.
    assert!(!session.apply_suggestion_at(2, &request, "DESY"));
}

#[test]
fn test_apply_suggestion_at_after_cut_misses_neighbour() {
    let mut session = three_rows();
    session.focus(0, FieldKind::Affiliations);
    let request = session.request_suggestions("Fer").unwrap();
    session.delete_row(0);

    // Focus moved to the row now at index 0, which is not the ticket's row.
    assert!(session.focused().is_some());
    assert!(!session.apply_suggestion_at(0, &request, "Fermilab"));
    assert!(session.grid().rows().all(|(_, r)| !r.has_affiliation("Fermilab")));
}

#[test]
fn test_apply_suggestion_at_ignores_superseded_ticket() {
    let mut session = three_rows();
    session.focus(1, FieldKind::Author);
    let first = session.request_suggestions("Bob").unwrap();
    let second = session.request_suggestions("Bob S").unwrap();

    assert!(!session.apply_suggestion_at(1, &first, "Bob Jones"));
    assert!(session.apply_suggestion_at(1, &second, "Bob Smith"));
    assert_eq!(session.grid().record_at(1).unwrap().author, "Bob Smith");
}

#[tokio::test]
async fn test_lookup_through_session() {
    let mut session = three_rows();
    let source = StaticSuggestions::new(["CERN", "DESY", "Fermilab"]);
    session.focus(1, FieldKind::Affiliations);

    let request = session.request_suggestions("DESY; ferm").unwrap();
    let hits = session.suggestions(&source, &request).await;
    assert_eq!(hits, vec!["Fermilab".to_string()]);

    assert!(session.apply_suggestion(&request, &hits[0]));
    assert_eq!(
        session.grid().record_at(1).unwrap().affiliations,
        cols(&["DESY", "Fermilab"])
    );
}

// =============================================================================
// Submission
// =============================================================================

#[tokio::test]
async fn test_submit_sends_all_rows() {
    let mut session = Session::load(
        vec![
            Record::new("Alice", ["CERN"]),
            Record::new("Bob", ["DESY"]),
            Record::new("Carol", ["SLAC"]),
        ],
        GridConfig::default().with_page_size(1),
    );
    let sink = MemorySink::default();
    let payload = session.submit(&sink, Some(7)).await.unwrap();

    assert_eq!(payload.authors.len(), 3);
    assert_eq!(payload.record_id, Some(7));
    let saved = sink.saved.lock().await;
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0], payload);
}

#[tokio::test]
async fn test_submit_warns_but_saves_missing_author() {
    let mut session = three_rows();
    session.set_author_name(1, "");
    session.take_warnings();

    let sink = MemorySink::default();
    session.submit(&sink, None).await.unwrap();

    assert_eq!(session.take_warnings(), vec![GridWarning::missing_author(1)]);
    assert_eq!(sink.saved.lock().await.len(), 1);
}

#[tokio::test]
async fn test_submit_error_is_returned() {
    let mut session = three_rows();
    let err = session.submit(&RejectingSink, None).await.unwrap_err();
    assert!(matches!(err, SubmitError::Rejected(_)));
}

#[test]
fn test_payload_form_fields_follow_display_order() {
    let mut session = three_rows();
    session.delete_row(0);
    session.paste_after(Some(1));

    let fields = session.payload(Some(3)).form_fields();
    let names: Vec<&str> = fields
        .iter()
        .filter(|(k, _)| k.starts_with("autho"))
        .map(|(_, v)| v.as_str())
        .collect();
    assert_eq!(names, vec!["Bob", "Carol", "Alice"]);
    assert_eq!(fields.last().unwrap(), &("recid".to_string(), "3".to_string()));
}
