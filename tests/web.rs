//! Browser-side checks of the exported session. Run with `wasm-pack test --headless`.
#![cfg(target_arch = "wasm32")]

use game_editor::{Alert, EditorSession, Game, Selection};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn session() -> EditorSession {
    EditorSession::new(None, None).expect("sample session should open")
}

#[wasm_bindgen_test]
fn sample_session_opens_first_deck() {
    let session = session();
    assert_eq!(session.deck_index(), Some(0));

    let game: Game =
        serde_json::from_str(&session.game_json().expect("game serializes")).expect("game parses");
    assert_eq!(game, Game::sample());
}

#[wasm_bindgen_test]
fn out_of_range_deck_raises_one_alert() {
    let mut session = session();
    assert!(session.select_deck(2).is_err());
    assert_eq!(session.deck_index(), Some(0));

    let alerts: Vec<Alert> =
        serde_json::from_str(&session.take_alerts_json().expect("alerts serialize"))
            .expect("alerts parse");
    assert_eq!(
        alerts,
        vec![Alert::danger("Invalid card index. Please, reload the page")]
    );
}

#[wasm_bindgen_test]
fn editing_a_state_selects_it() {
    let mut session = session();
    session.edit_state(1).expect("state 1 exists");

    let selection: Selection =
        serde_json::from_str(&session.state_selection_json().expect("selection serializes"))
            .expect("selection parses");
    assert_eq!(selection, Selection::Editing { index: 1 });
}

#[wasm_bindgen_test]
fn protected_state_messages_are_reported() {
    let mut session = session();
    session.edit_state(0).expect("state 0 exists");

    let messages: Vec<String> =
        serde_json::from_str(&session.validate_state_json().expect("messages serialize"))
            .expect("messages parse");
    assert_eq!(
        messages,
        vec!["You can't create or edit neither states 'Game Start' or 'Game Over'"]
    );
}
