use super::common::*;
use std::sync::Arc;

use crate::workflows::careers::domain::OrgId;
use crate::workflows::careers::quota::{PlanResolver, QuotaError, QuotaEvaluator};
use crate::workflows::careers::repository::{OrganizationRecord, RepositoryError, SlotValue};
use crate::workflows::careers::InMemoryCareerStore;

#[tokio::test]
async fn plan_and_extra_slots_sum_into_total() {
    let store = Arc::new(seeded_store(3, 2, 0).await);
    let resolver = PlanResolver::new(store);

    let allowance = resolver.resolve(&org_id()).await.expect("resolves");

    assert_eq!(allowance.job_limit, 3.0);
    assert_eq!(allowance.extra_job_slots, 2.0);
    assert_eq!(allowance.job_limit_total(), 5.0);
}

#[tokio::test]
async fn non_numeric_sides_fall_back_before_summing() {
    let store = Arc::new(seeded_store("unlimited", SlotValue::Other, 0).await);
    let resolver = PlanResolver::new(store);

    let allowance = resolver.resolve(&org_id()).await.expect("resolves");

    assert_eq!(allowance.job_limit, 3.0);
    assert_eq!(allowance.extra_job_slots, 0.0);
    assert_eq!(allowance.job_limit_total(), 3.0);
}

#[tokio::test]
async fn non_numeric_plan_still_adds_purchased_slots() {
    let store = Arc::new(seeded_store("n/a", 4, 0).await);
    let resolver = PlanResolver::new(store);

    let allowance = resolver.resolve(&org_id()).await.expect("resolves");

    assert_eq!(allowance.job_limit_total(), 7.0);
}

#[tokio::test]
async fn unresolved_plan_uses_default_limit() {
    let store = InMemoryCareerStore::new();
    store
        .insert_organization(OrganizationRecord {
            id: org_id(),
            plan_id: Some("missing-plan".to_string()),
            extra_job_slots: SlotValue::Missing,
        })
        .expect("seed");
    let resolver = PlanResolver::new(Arc::new(store));

    let allowance = resolver.resolve(&org_id()).await.expect("resolves");

    assert_eq!(allowance.job_limit_total(), 3.0);
}

#[tokio::test]
async fn malformed_identifier_is_rejected_before_lookup() {
    let resolver = PlanResolver::new(Arc::new(UnavailableStore));

    match resolver.resolve_raw("not-an-object-id").await {
        Err(QuotaError::InvalidIdentifier) => {}
        other => panic!("expected invalid identifier, got {other:?}"),
    }
}

#[tokio::test]
async fn unknown_organization_is_not_found() {
    let store = Arc::new(seeded_store(3, 0, 0).await);
    let resolver = PlanResolver::new(store);
    let unknown = OrgId::parse(UNKNOWN_ORG).expect("valid");

    assert_eq!(
        resolver.resolve(&unknown).await,
        Err(QuotaError::OrganizationNotFound)
    );
}

#[tokio::test]
async fn evaluator_blocks_when_active_reaches_total() {
    let store = Arc::new(seeded_store(3, 0, 3).await);
    let evaluator = QuotaEvaluator::new(store.clone(), store);

    let snapshot = evaluator.evaluate(ORG).await.expect("evaluates");

    assert_eq!(snapshot.decision.active_count, 3);
    assert_eq!(snapshot.decision.job_limit_total, 3.0);
    assert!(!snapshot.decision.can_publish);
}

#[tokio::test]
async fn evaluator_allows_with_extra_slots() {
    let store = Arc::new(seeded_store(3, 2, 4).await);
    let evaluator = QuotaEvaluator::new(store.clone(), store);

    let snapshot = evaluator.evaluate(ORG).await.expect("evaluates");

    assert!(snapshot.decision.can_publish);
    assert_eq!(snapshot.decision.available_slots(), 1);
}

#[tokio::test]
async fn fractional_plan_limit_is_compared_exactly() {
    let store = Arc::new(seeded_store(2.5, 0, 2).await);
    let evaluator = QuotaEvaluator::new(store.clone(), store);

    let snapshot = evaluator.evaluate(ORG).await.expect("evaluates");

    assert_eq!(snapshot.decision.job_limit_total, 2.5);
    assert!(snapshot.decision.can_publish);
}

#[tokio::test]
async fn blank_plan_limit_leaves_only_purchased_slots() {
    let store = Arc::new(seeded_store("", 1, 1).await);
    let evaluator = QuotaEvaluator::new(store.clone(), store);

    let snapshot = evaluator.evaluate(ORG).await.expect("evaluates");

    assert_eq!(snapshot.allowance.job_limit, 0.0);
    assert_eq!(snapshot.decision.job_limit_total, 1.0);
    assert!(!snapshot.decision.can_publish);
}

#[tokio::test]
async fn storage_failures_propagate() {
    let store = Arc::new(UnavailableStore);
    let evaluator = QuotaEvaluator::new(store.clone(), store);

    match evaluator.evaluate(ORG).await {
        Err(QuotaError::Repository(RepositoryError::Transport(message))) => {
            assert!(message.contains("ECONNREFUSED"));
        }
        other => panic!("expected transport failure, got {other:?}"),
    }
}
