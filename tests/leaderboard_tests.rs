//! Leaderboard tests - sorted-set semantics and wire compatibility

use numberdrop::adapter::{LeaderboardRequest, LeaderboardStore};

#[test]
fn test_submit_top_rank_lifecycle() {
    let mut store = LeaderboardStore::new();

    store.submit("ada", 300, Some("Ada"));
    store.submit("bob", 100, Some("Bob"));
    store.submit("cyd", 200, None);

    let top = store.top(10);
    assert_eq!(
        top.iter().map(|e| e.user_id.as_str()).collect::<Vec<_>>(),
        vec!["ada", "cyd", "bob"]
    );
    assert_eq!(
        top.iter().map(|e| e.rank).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );

    assert_eq!(store.rank("bob"), Some(3));
    assert_eq!(store.rank("nobody"), None);
    assert_eq!(store.total_players(), 3);

    // Bob improves past Cyd
    let outcome = store.submit("bob", 250, Some("Bob"));
    assert!(outcome.is_new_best);
    assert_eq!(outcome.rank, 2);
    assert_eq!(store.rank("cyd"), Some(3));
}

#[test]
fn test_lower_resubmission_is_ignored() {
    let mut store = LeaderboardStore::new();
    store.submit("ada", 300, Some("Ada"));

    let outcome = store.submit("ada", 10, Some("Renamed"));
    assert!(!outcome.is_new_best);
    assert_eq!(outcome.rank, 1);

    let top = store.top(1);
    assert_eq!(top[0].score, 300);
    // Name only updates with a new best
    assert_eq!(top[0].username, "Ada");
}

#[test]
fn test_rank_for_hypothetical_score() {
    let mut store = LeaderboardStore::new();
    for (id, score) in [("a", 100), ("b", 200), ("c", 200), ("d", 300)] {
        store.submit(id, score, None);
    }

    // Strictly-higher count + 1
    assert_eq!(store.rank_for_score(500), 1);
    assert_eq!(store.rank_for_score(300), 1);
    assert_eq!(store.rank_for_score(200), 2);
    assert_eq!(store.rank_for_score(150), 4);
    assert_eq!(store.rank_for_score(1), 5);
}

#[test]
fn test_top_limit_clamps() {
    let mut store = LeaderboardStore::new();
    store.submit("a", 1, None);
    store.submit("b", 2, None);

    assert_eq!(store.top(1).len(), 1);
    assert_eq!(store.top(100).len(), 2);
    assert!(store.top(0).is_empty());
}

#[test]
fn test_request_wire_format_is_stable() {
    // These exact strings are what deployed clients send; parsing them must
    // not drift.
    let cases = [
        r#"{"type":"submit","userId":"u","score":1}"#,
        r#"{"type":"top"}"#,
        r#"{"type":"rank","userId":"u"}"#,
        r#"{"type":"rank-for-score","score":9}"#,
        r#"{"type":"stats"}"#,
    ];
    for case in cases {
        let parsed: Result<LeaderboardRequest, _> = serde_json::from_str(case);
        assert!(parsed.is_ok(), "failed to parse {case}");
    }
}
