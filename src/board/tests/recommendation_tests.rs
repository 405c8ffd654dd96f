//! Recommendation decoding, indexing, and store refresh tests.

use super::support::{board, project_id, seeded_remote, task_id, wait_for_fetches};
use crate::board::domain::{Recommendation, RecommendationIndex, Status, is_meaningful, percent};
use crate::board::services::{BoardError, ErrorCategory, FetchTarget};
use rstest::rstest;
use serde_json::json;
use std::sync::Arc;

#[rstest]
fn lenient_decoding_tolerates_bad_fields() {
    let rec: Recommendation = serde_json::from_value(json!({
        "taskId": "7",
        "suggestedStatus": "SHIPPED",
        "currentStatus": null,
        "confidence": "0.8",
        "reasons": ["commit mentions task", 3],
        "evidence": "not a list"
    }))
    .expect("recommendation decodes");

    assert_eq!(rec.task_id, Some(task_id(7)));
    assert_eq!(rec.suggested_status, Some(Status::Todo));
    assert_eq!(rec.current_status, None);
    assert_eq!(rec.confidence, Some(0.8));
    assert_eq!(rec.reasons, vec!["commit mentions task".to_owned()]);
    assert!(rec.evidence.is_empty());
}

#[rstest]
#[case(json!({"taskId": 0}))]
#[case(json!({"taskId": null}))]
#[case(json!({"taskId": "abc"}))]
#[case(json!({}))]
fn unusable_task_ids_decode_as_none(#[case] raw: serde_json::Value) {
    let rec: Recommendation = serde_json::from_value(raw).expect("recommendation decodes");
    assert_eq!(rec.task_id, None);
}

#[rstest]
#[case(json!(""))]
#[case(json!(null))]
#[case(json!(false))]
#[case(json!(0))]
fn blank_suggested_status_decodes_as_none(#[case] suggested: serde_json::Value) {
    let raw = json!({"taskId": 1, "suggestedStatus": suggested, "currentStatus": "DONE"});
    let rec: Recommendation = serde_json::from_value(raw).expect("recommendation decodes");

    assert_eq!(rec.suggested_status, None);
    assert_eq!(rec.current_status, Some(Status::Done));
    assert!(!rec.is_meaningful());
}

#[rstest]
fn blank_current_status_decodes_as_none() {
    let raw = json!({"taskId": 1, "suggestedStatus": "DONE", "currentStatus": ""});
    let rec: Recommendation = serde_json::from_value(raw).expect("recommendation decodes");

    assert_eq!(rec.current_status, None);
    assert!(rec.is_meaningful());
}

#[rstest]
#[case(Some(Status::Done), Some(Status::InProgress), true)]
#[case(Some(Status::Done), None, true)]
#[case(Some(Status::Done), Some(Status::Done), false)]
#[case(None, Some(Status::Todo), false)]
fn meaningful_requires_a_different_suggestion(
    #[case] suggested: Option<Status>,
    #[case] current: Option<Status>,
    #[case] expected: bool,
) {
    let rec = Recommendation {
        task_id: Some(task_id(1)),
        suggested_status: suggested,
        current_status: current,
        ..Recommendation::default()
    };
    assert_eq!(rec.is_meaningful(), expected);
    assert_eq!(is_meaningful(Some(&rec)), expected);
}

#[rstest]
fn absent_recommendation_is_not_meaningful() {
    assert!(!is_meaningful(None));
}

#[rstest]
#[case(Some(0.5), "50%")]
#[case(Some(0.876), "88%")]
#[case(Some(1.0), "100%")]
#[case(Some(f64::NAN), "")]
#[case(None, "")]
fn percent_formats_confidence(#[case] confidence: Option<f64>, #[case] expected: &str) {
    assert_eq!(percent(confidence), expected);
}

#[rstest]
fn index_keeps_latest_entry_and_drops_missing_ids() {
    let list = vec![
        Recommendation::suggest(task_id(1), Status::InProgress),
        Recommendation {
            task_id: None,
            suggested_status: Some(Status::Done),
            ..Recommendation::default()
        },
        Recommendation::suggest(task_id(2), Status::Done),
        Recommendation::suggest(task_id(1), Status::Done),
    ];
    let index = RecommendationIndex::from_list(list);

    assert_eq!(index.len(), 2);
    assert_eq!(
        index.get(task_id(1)).and_then(|rec| rec.suggested_status),
        Some(Status::Done)
    );
    let order: Vec<_> = index.iter().filter_map(|rec| rec.task_id).collect();
    assert_eq!(order, vec![task_id(1), task_id(2)]);
}

#[rstest]
fn summary_counts_meaningful_suggestions() {
    let index = RecommendationIndex::from_list(vec![
        Recommendation::suggest(task_id(1), Status::Done),
        Recommendation::suggest(task_id(2), Status::Done),
        Recommendation::suggest(task_id(3), Status::InProgress)
            .with_current_status(Status::InProgress),
        Recommendation::suggest(task_id(4), Status::InProgress),
    ]);
    let summary = index.summary();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.by_status.get(&Status::Done), Some(&2));
    assert_eq!(summary.by_status.get(&Status::InProgress), Some(&1));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn refresh_replaces_index_and_stamps_fetch_time() {
    let remote = seeded_remote();
    remote.set_recommendations(
        project_id(),
        vec![Recommendation::suggest(task_id(1), Status::InProgress).with_confidence(0.9)],
    );
    let board = board(&remote);

    let index = board
        .refresh_recommendations()
        .await
        .expect("refresh is allowed");

    assert_eq!(index.len(), 1);
    assert!(board.recommendation(task_id(1)).is_some());
    assert!(board.snapshot().recommendations_fetched_at.is_some());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_refresh_empties_store_and_records_error() {
    let remote = seeded_remote();
    remote.set_recommendations(
        project_id(),
        vec![Recommendation::suggest(task_id(1), Status::Done)],
    );
    let board = board(&remote);
    board
        .refresh_recommendations()
        .await
        .expect("refresh is allowed");
    assert_eq!(board.recommendations().len(), 1);

    remote.fail_recommendations(true);
    let index = board
        .refresh_recommendations()
        .await
        .expect("refresh is allowed");

    assert!(index.is_empty());
    assert!(board.recommendations().is_empty());
    assert!(matches!(
        board.error(ErrorCategory::Recommendations),
        Some(BoardError::Fetch {
            target: FetchTarget::Recommendations,
            ..
        })
    ));

    remote.fail_recommendations(false);
    board
        .refresh_recommendations()
        .await
        .expect("refresh is allowed");
    assert!(board.error(ErrorCategory::Recommendations).is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_refresh_response_is_discarded() {
    let remote = seeded_remote();
    remote.set_recommendations(
        project_id(),
        vec![Recommendation::suggest(task_id(1), Status::InProgress)],
    );
    let board = Arc::new(board(&remote));

    let gate = remote.pause_recommendations();
    let slow = {
        let board = Arc::clone(&board);
        tokio::spawn(async move { board.refresh_recommendations().await })
    };
    wait_for_fetches(&remote, 1).await;

    remote.resume_recommendations();
    remote.set_recommendations(
        project_id(),
        vec![Recommendation::suggest(task_id(2), Status::Done)],
    );
    board
        .refresh_recommendations()
        .await
        .expect("refresh is allowed");

    gate.notify_one();
    let stale = slow
        .await
        .expect("refresh task joins")
        .expect("refresh is allowed");

    assert!(stale.get(task_id(1)).is_none());
    assert!(board.recommendation(task_id(1)).is_none());
    assert!(board.recommendation(task_id(2)).is_some());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn previous_error_clears_while_refresh_is_in_flight() {
    let remote = seeded_remote();
    remote.set_recommendations(
        project_id(),
        vec![Recommendation::suggest(task_id(1), Status::Done)],
    );
    let board = Arc::new(board(&remote));
    remote.fail_recommendations(true);
    board
        .refresh_recommendations()
        .await
        .expect("refresh is allowed");
    assert!(board.error(ErrorCategory::Recommendations).is_some());

    remote.fail_recommendations(false);
    let gate = remote.pause_recommendations();
    let pending = {
        let board = Arc::clone(&board);
        tokio::spawn(async move { board.refresh_recommendations().await })
    };
    wait_for_fetches(&remote, 2).await;

    assert!(board.error(ErrorCategory::Recommendations).is_none());

    gate.notify_one();
    let index = pending
        .await
        .expect("refresh task joins")
        .expect("refresh is allowed");
    assert_eq!(index.len(), 1);
    assert!(board.error(ErrorCategory::Recommendations).is_none());
}
