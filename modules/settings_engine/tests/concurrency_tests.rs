//! Optimistic-concurrency tests: version-guard retries, conflict
//! exhaustion, and racing writers against one key

mod common;

use common::{create_test_harness, create_test_harness_with_config};
use serde_json::json;
use settings_engine::config::Config;
use settings_engine::contract::{AuthContext, SettingsError, UpdateOutcome};
use std::sync::Arc;

#[tokio::test]
async fn retry_commits_after_guard_miss() {
    let harness = create_test_harness();
    let actor = AuthContext::supervisor(7);

    harness
        .service
        .create_setting(1, "Rejector.DelayMS", json!(500), &actor)
        .await
        .expect("create should succeed");

    // First commit attempt loses its guard; the retry wins.
    harness.product_repo.force_guard_misses(1);
    let outcome = harness
        .service
        .update_setting(1, "Rejector.DelayMS", json!(750), &actor)
        .await
        .expect("update should succeed after retry");

    assert!(outcome.is_committed());
    let updated = outcome.into_setting();
    assert_eq!(updated.version, 2);
    assert_eq!(updated.value, json!(750));

    // The lost attempt must leave no trace in the changelog.
    let entries = harness.changelog_repo.all_entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].version, 2);
}

#[tokio::test]
async fn conflict_surfaces_after_retry_budget() {
    let harness = create_test_harness();
    let actor = AuthContext::supervisor(7);

    harness
        .service
        .create_setting(1, "Rejector.DelayMS", json!(500), &actor)
        .await
        .expect("create should succeed");

    // Every attempt in the budget loses.
    harness.product_repo.force_guard_misses(Config::default().cas_retry_limit);
    let err = harness
        .service
        .update_setting(1, "Rejector.DelayMS", json!(750), &actor)
        .await
        .expect_err("exhausted retries should fail");

    match err {
        SettingsError::Conflict {
            product_id,
            name,
            attempts,
        } => {
            assert_eq!(product_id, 1);
            assert_eq!(name, "Rejector.DelayMS");
            assert_eq!(attempts, Config::default().cas_retry_limit);
        }
        other => panic!("expected Conflict, got {other:?}"),
    }

    // The losing writer must not have changed anything.
    let current = harness
        .service
        .get_setting(1, "Rejector.DelayMS")
        .await
        .expect("get should succeed");
    assert_eq!(current.version, 1);
    assert_eq!(current.value, json!(500));
    assert!(harness.changelog_repo.all_entries().is_empty());
}

#[tokio::test]
async fn retry_budget_is_configurable() {
    let config = Config {
        cas_retry_limit: 5,
        ..Config::default()
    };
    let harness = create_test_harness_with_config(config);
    let actor = AuthContext::supervisor(7);

    harness
        .service
        .create_setting(1, "Rejector.DelayMS", json!(500), &actor)
        .await
        .expect("create should succeed");

    // Four misses still fit inside a budget of five.
    harness.product_repo.force_guard_misses(4);
    let outcome = harness
        .service
        .update_setting(1, "Rejector.DelayMS", json!(750), &actor)
        .await
        .expect("update should succeed within budget");
    assert!(outcome.is_committed());
    assert_eq!(outcome.setting().version, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_writers_never_lose_updates() {
    let harness = create_test_harness();
    let actor = AuthContext::supervisor(7);

    harness
        .service
        .create_setting(1, "Rejector.DelayMS", json!(0), &actor)
        .await
        .expect("create should succeed");

    let service = Arc::new(harness.service);
    let mut handles = Vec::new();
    for value in 1..=8_i64 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            let actor = AuthContext::supervisor(100 + value);
            service
                .update_setting(1, "Rejector.DelayMS", json!(value), &actor)
                .await
        }));
    }

    let mut committed = 0_i64;
    for handle in handles {
        match handle.await.expect("writer task should not panic") {
            Ok(UpdateOutcome::Committed(_)) => committed += 1,
            // Distinct candidate values can never no-op.
            Ok(UpdateOutcome::Unchanged(setting)) => {
                panic!("unexpected no-op at version {}", setting.version)
            }
            Err(SettingsError::Conflict { .. }) => {}
            Err(other) => panic!("unexpected error {other:?}"),
        }
    }
    assert!(committed >= 1, "at least one writer must win");

    // Every accepted write got its own version, with no gaps and no
    // overwritten history.
    let current = service
        .get_setting(1, "Rejector.DelayMS")
        .await
        .expect("get should succeed");
    assert_eq!(current.version, 1 + committed);

    let mut versions: Vec<i64> = harness
        .changelog_repo
        .all_entries()
        .iter()
        .map(|e| e.version)
        .collect();
    versions.sort_unstable();
    assert_eq!(versions, (2..=1 + committed).collect::<Vec<_>>());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn distinct_keys_update_independently() {
    let harness = create_test_harness();
    let actor = AuthContext::supervisor(7);

    harness
        .service
        .create_setting(1, "Rejector.DelayMS", json!(500), &actor)
        .await
        .expect("create should succeed");
    harness
        .service
        .create_setting(1, "Rejector.OpenMS", json!(50), &actor)
        .await
        .expect("create should succeed");

    let service = Arc::new(harness.service);
    let delay = {
        let service = service.clone();
        tokio::spawn(async move {
            service
                .update_setting(1, "Rejector.DelayMS", json!(750), &AuthContext::supervisor(8))
                .await
        })
    };
    let open = {
        let service = service.clone();
        tokio::spawn(async move {
            service
                .update_setting(1, "Rejector.OpenMS", json!(75), &AuthContext::supervisor(9))
                .await
        })
    };

    // Writers on different keys never contend for a version guard.
    let delay_outcome = delay
        .await
        .expect("task should not panic")
        .expect("update should succeed");
    let open_outcome = open
        .await
        .expect("task should not panic")
        .expect("update should succeed");
    assert!(delay_outcome.is_committed());
    assert!(open_outcome.is_committed());
    assert_eq!(delay_outcome.setting().version, 2);
    assert_eq!(open_outcome.setting().version, 2);
}
