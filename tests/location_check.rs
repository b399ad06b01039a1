mod common;

use std::sync::atomic::Ordering;

use common::{Harness, incident_at};
use geofence_backend::error::AppError;
use uuid::Uuid;

#[tokio::test]
async fn point_inside_zone_is_matched_and_enqueued() {
    let zone = incident_at(0.0, 0.0, 1000.0);
    let h = Harness::new(vec![zone.clone()]);
    let user = Uuid::new_v4();

    let check = h.locations.check_location(user, 0.0, 0.005).await.unwrap();

    assert!(check.matched);
    assert_eq!(check.incident_ids, vec![zone.id]);
    assert_eq!(h.location_repo.checks.lock().unwrap().len(), 1);

    let enqueued = h.queue.enqueued.lock().unwrap().clone();
    assert_eq!(enqueued.len(), 1);
    assert_eq!(enqueued[0].user_id, user);
    assert_eq!(enqueued[0].incident_ids, vec![zone.id]);
    assert_eq!(enqueued[0].retry, 0);
}

#[tokio::test]
async fn point_outside_zone_is_recorded_without_enqueue() {
    let h = Harness::new(vec![incident_at(0.0, 0.0, 1000.0)]);

    let check = h
        .locations
        .check_location(Uuid::new_v4(), 0.0, 0.02)
        .await
        .unwrap();

    assert!(!check.matched);
    assert!(check.incident_ids.is_empty());
    assert_eq!(h.location_repo.checks.lock().unwrap().len(), 1);
    assert_eq!(h.queue.enqueued_count(), 0);
}

#[tokio::test]
async fn overlapping_zones_all_match_in_store_order() {
    let big = incident_at(0.0, 0.0, 5000.0);
    let far = incident_at(10.0, 10.0, 100.0);
    let small = incident_at(0.0, 0.001, 300.0);
    let h = Harness::new(vec![big.clone(), far, small.clone()]);

    let check = h
        .locations
        .check_location(Uuid::new_v4(), 0.0, 0.002)
        .await
        .unwrap();

    assert_eq!(check.incident_ids, vec![big.id, small.id]);
}

#[tokio::test]
async fn repeated_checks_are_order_stable_with_fresh_ids() {
    let a = incident_at(0.0, 0.0, 1000.0);
    let b = incident_at(0.0, 0.003, 1000.0);
    let h = Harness::new(vec![a, b]);
    let user = Uuid::new_v4();

    let first = h.locations.check_location(user, 0.0, 0.001).await.unwrap();
    let second = h.locations.check_location(user, 0.0, 0.001).await.unwrap();

    assert_eq!(first.incident_ids, second.incident_ids);
    assert_eq!(first.incident_ids.len(), 2);
    assert_ne!(first.id, second.id);
    assert_eq!(h.location_repo.checks.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn inactive_incidents_are_ignored() {
    let mut zone = incident_at(0.0, 0.0, 1000.0);
    zone.is_active = false;
    let h = Harness::new(vec![zone]);

    let check = h
        .locations
        .check_location(Uuid::new_v4(), 0.0, 0.0)
        .await
        .unwrap();

    assert!(!check.matched);
}

#[tokio::test]
async fn store_failure_fails_the_check_and_persists_nothing() {
    let h = Harness::new(vec![incident_at(0.0, 0.0, 1000.0)]);
    h.incident_repo.fail_loads.store(true, Ordering::SeqCst);

    let err = h
        .locations
        .check_location(Uuid::new_v4(), 0.0, 0.0)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Database(_)));
    assert!(h.location_repo.checks.lock().unwrap().is_empty());
    assert_eq!(h.queue.enqueued_count(), 0);
}

#[tokio::test]
async fn save_failure_prevents_enqueue() {
    let h = Harness::new(vec![incident_at(0.0, 0.0, 1000.0)]);
    h.location_repo.fail_saves.store(true, Ordering::SeqCst);

    let result = h.locations.check_location(Uuid::new_v4(), 0.0, 0.0).await;

    assert!(result.is_err());
    assert_eq!(h.queue.enqueued_count(), 0);
}

#[tokio::test]
async fn enqueue_failure_is_surfaced_to_the_caller() {
    let h = Harness::new(vec![incident_at(0.0, 0.0, 1000.0)]);
    h.queue.fail_enqueue.store(true, Ordering::SeqCst);

    let err = h
        .locations
        .check_location(Uuid::new_v4(), 0.0, 0.0)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Enqueue(_)));
    // 记录已经写入，只是通知没能入队
    assert_eq!(h.location_repo.checks.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn enqueue_failure_does_not_matter_without_a_match() {
    let h = Harness::new(vec![incident_at(0.0, 0.0, 1000.0)]);
    h.queue.fail_enqueue.store(true, Ordering::SeqCst);

    let check = h
        .locations
        .check_location(Uuid::new_v4(), 45.0, 45.0)
        .await
        .unwrap();

    assert!(!check.matched);
}

#[tokio::test]
async fn cache_outage_falls_back_to_store() {
    let zone = incident_at(0.0, 0.0, 1000.0);
    let h = Harness::new(vec![zone.clone()]);
    h.cache.fail_reads.store(true, Ordering::SeqCst);
    h.cache.fail_writes.store(true, Ordering::SeqCst);

    let check = h
        .locations
        .check_location(Uuid::new_v4(), 0.0, 0.0)
        .await
        .unwrap();

    assert_eq!(check.incident_ids, vec![zone.id]);
}

#[tokio::test]
async fn out_of_range_coordinates_are_rejected() {
    let h = Harness::new(vec![]);

    let err = h
        .locations
        .check_location(Uuid::new_v4(), 91.0, 0.0)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(h.incident_repo.active_loads.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn history_and_stats_reflect_recorded_checks() {
    let h = Harness::new(vec![]);
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    h.locations.check_location(alice, 1.0, 1.0).await.unwrap();
    h.locations.check_location(alice, 2.0, 2.0).await.unwrap();
    h.locations.check_location(bob, 3.0, 3.0).await.unwrap();

    let history = h.locations.history(alice, 10).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].lat, 2.0);

    assert_eq!(h.stats.user_count().await.unwrap(), 2);
    assert_eq!(h.stats.window_minutes(), 5);

    assert!(matches!(
        h.locations.history(alice, 0).await,
        Err(AppError::Validation(_))
    ));
}
