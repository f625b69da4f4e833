//! Save/load integration tests against the file-backed store.

use std::fs;
use std::rc::Rc;
use std::time::Duration;

use memory_match::persistence::{FileStorage, SaveStore, Storage};
use memory_match::{CardId, GameSettings, ImageId, LoadOutcome, RoundState, Session};

const DELAY: Duration = Duration::from_millis(500);

fn settings() -> GameSettings {
    GameSettings::new(2, 4)
        .with_images((0..6).map(ImageId::new))
        .with_seed(77)
}

fn file_session(dir: &tempfile::TempDir) -> (Session, Rc<FileStorage>) {
    let storage = Rc::new(FileStorage::new(dir.path()).unwrap());
    (Session::new(settings(), storage.clone()).unwrap(), storage)
}

/// Find and play one matching pair.
fn play_match(session: &mut Session) -> (CardId, CardId) {
    let cards = session.round().cards();
    let a = cards.iter().find(|c| !c.is_matched()).unwrap().clone();
    let b = cards.iter().find(|c| a.pairs_with(c)).unwrap().id();
    session.click(a.id()).unwrap();
    session.click(b).unwrap();
    assert!(session.update(DELAY).unwrap().unwrap().is_match);
    (a.id(), b)
}

/// Test the on-disk record layout.
#[test]
fn test_record_files() {
    let dir = tempfile::tempdir().unwrap();
    let (mut session, storage) = file_session(&dir);

    session.new_game().unwrap();
    play_match(&mut session);

    let round_path = storage.path_for(SaveStore::ROUND_KEY);
    let score_path = storage.path_for(SaveStore::SCORE_KEY);
    assert!(round_path.ends_with("RoundData.json"));
    assert!(score_path.exists());

    let score_json = fs::read_to_string(score_path).unwrap();
    assert_eq!(score_json, r#"{"score":10,"consecutiveMatches":1,"comboMultiplier":1}"#);

    let round: serde_json::Value = serde_json::from_str(&fs::read_to_string(round_path).unwrap()).unwrap();
    assert_eq!(round["rows"], 2);
    assert_eq!(round["cols"], 4);
    let cards = round["cards"].as_array().unwrap();
    assert_eq!(cards.len(), 8);
    assert_eq!(cards[5]["id"], 5);
    assert_eq!(cards[5]["position"]["x"], 1);
    assert_eq!(cards[5]["position"]["y"], 1);
    assert!(cards[5]["isMatched"].is_boolean());
}

/// Test a round resumed by a second session on the same directory.
#[test]
fn test_resume_across_sessions() {
    let dir = tempfile::tempdir().unwrap();

    let (saved, matched) = {
        let (mut session, _) = file_session(&dir);
        session.new_game().unwrap();
        let matched = play_match(&mut session);
        (session.round().round_state(), matched)
    };

    let (mut session, _) = file_session(&dir);
    assert!(session.has_saved_game());
    assert_eq!(session.continue_game().unwrap(), LoadOutcome::Restored);

    assert_eq!(session.round().round_state(), saved);
    assert_eq!(session.score().score(), 10);
    for id in [matched.0, matched.1] {
        let card = session.round().card(id).unwrap();
        assert!(card.is_matched());
        assert!(card.is_face_up());
    }
}

/// Test the high score surviving a finished game and a restart.
#[test]
fn test_high_score_persists() {
    let dir = tempfile::tempdir().unwrap();

    {
        let (mut session, _) = file_session(&dir);
        session.new_game().unwrap();
        while !session.round().is_complete() {
            play_match(&mut session);
        }
        // 10 + 20 + 20 + 30
        assert_eq!(session.score().score(), 80);
        assert!(!session.has_saved_game());
    }

    let (session, storage) = file_session(&dir);
    assert_eq!(session.score().high_score(), 80);
    assert!(!storage.contains(SaveStore::SCORE_KEY).unwrap());
    assert!(!storage.path_for(SaveStore::ROUND_KEY).exists());
}

/// Test that a damaged round file falls back to a new round.
#[test]
fn test_corrupt_round_file() {
    let dir = tempfile::tempdir().unwrap();
    let (mut session, storage) = file_session(&dir);
    fs::write(storage.path_for(SaveStore::ROUND_KEY), "{\"rows\": 2, \"cols\":").unwrap();

    match session.continue_game().unwrap() {
        LoadOutcome::StartedFresh { reason } => assert!(reason.contains("RoundData")),
        other => panic!("expected a fresh round, got {:?}", other),
    }
    assert_eq!(session.round().cards().len(), 8);
    assert!(!session.has_saved_game());
}

/// Test that a record that parses but cannot be played is rejected.
#[test]
fn test_tampered_round_file() {
    let dir = tempfile::tempdir().unwrap();
    let (mut session, storage) = file_session(&dir);
    session.new_game().unwrap();

    let mut round: RoundState = session.round().round_state();
    round.cards[0].image = ImageId::new(99);
    storage
        .write(SaveStore::ROUND_KEY, &serde_json::to_string(&round).unwrap())
        .unwrap();

    let outcome = session.continue_game().unwrap();
    assert!(matches!(outcome, LoadOutcome::StartedFresh { .. }));
    assert_ne!(session.round().round_state(), round);
}
