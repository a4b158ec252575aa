use taja::combat::PLAYER_MAX_HP;
use taja::corpus::{CharStream, ANTHEM_LINES};
use taja::session::{Session, SessionConfig, SessionPhase};

fn battle(lines: &[&str]) -> Session {
    let config = SessionConfig {
        motion_seed: Some(42),
        ..SessionConfig::default()
    };
    Session::new(lines, config).unwrap()
}

#[test]
fn two_line_corpus_damage_progression() {
    let mut session = battle(&["AB", "CD"]);
    let snap = session.snapshot();
    assert_eq!(snap.total_chars, 4);
    assert_eq!(snap.remaining_hits, 4);

    let snap = session.handle_input("A");
    assert_eq!(snap.current_index, 1);
    assert!((snap.boss_health - 75.0).abs() < 1e-6);

    let snap = session.handle_input("X");
    assert_eq!(snap.current_index, 1);
    assert_eq!(snap.last_wrong, Some(('X', 'B')));
    assert_eq!(snap.player_health, Some(PLAYER_MAX_HP - 10));

    let snap = session.handle_input("B");
    assert_eq!(snap.current_index, 2);
    assert!((snap.boss_health - 50.0).abs() < 1e-6);
    assert_eq!(snap.line.unwrap().line_index, 1);

    let snap = session.handle_input("CD");
    assert_eq!(snap.current_index, 4);
    assert_eq!(snap.boss_health, 0.0);
    assert_eq!(snap.phase, SessionPhase::Victory);
}

#[test]
fn accuracy_and_error_after_mixed_attempts() {
    let mut session = battle(&["abcd"]);
    session.handle_input("abx");
    let snap = session.handle_input("c");

    assert_eq!(snap.accuracy, 75.0);
    assert_eq!(snap.error_rate, 25.0);
}

#[test]
fn speed_metric_matches_hand_computation() {
    let mut session = battle(&["abcdefghij"]);
    for c in "abcde".chars() {
        session.handle_char(c);
    }
    session.tick(1.0);
    for c in "fghij".chars() {
        session.handle_char(c);
    }
    session.tick(1.0);

    // Victory fired on the final 'j', so only the first tick counted:
    // 10 correct in 1.0s of running clock.
    let snap = session.snapshot();
    assert!((snap.elapsed_secs - 1.0).abs() < 1e-9);
    assert!((snap.chars_per_min - 600.0).abs() < 1e-6);
}

#[test]
fn boss_health_after_k_hits_matches_formula() {
    let mut session = battle(&["abcdefg"]);
    let unit = 100.0 / 7.0;

    for (k, c) in "abcde".chars().enumerate() {
        let snap = session.handle_input(&c.to_string());
        let expected = (100.0 - (k as f64 + 1.0) * unit).max(0.0);
        assert!((snap.boss_health - expected).abs() < 1e-6);
    }
}

#[test]
fn defeat_path_and_reset_recovery() {
    let mut session = battle(&["hello world"]);

    for _ in 0..10 {
        session.handle_input("q");
    }
    let snap = session.snapshot();
    assert_eq!(snap.phase, SessionPhase::Defeat);
    assert_eq!(snap.player_health, Some(0));
    assert_eq!(snap.current_index, 0);

    session.reset();
    let snap = session.snapshot();
    assert_eq!(snap.phase, SessionPhase::Running);
    assert_eq!(snap.player_health, Some(PLAYER_MAX_HP));
    assert_eq!(snap.accuracy, 100.0);
}

#[test]
fn anthem_corpus_wires_up_end_to_end() {
    let stream = CharStream::build(ANTHEM_LINES);
    let expected: usize = ANTHEM_LINES.iter().map(|l| l.chars().count()).sum();
    assert_eq!(stream.total_chars(), expected);

    let mut session = battle(ANTHEM_LINES);
    let flat: String = ANTHEM_LINES.concat();
    let snap = session.handle_input(&flat);

    assert_eq!(snap.phase, SessionPhase::Victory);
    assert_eq!(snap.current_index, expected);
    assert_eq!(snap.boss_health, 0.0);
    assert_eq!(snap.accuracy, 100.0);
}
