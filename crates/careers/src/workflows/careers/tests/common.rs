use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use chrono::Utc;
use serde_json::{json, Value};

use crate::workflows::careers::domain::{Career, CareerId, CareerStatus, Editor, OrgId};
use crate::workflows::careers::repository::{
    CareerStore, OrganizationProfile, OrganizationStore, RepositoryError, SlotValue,
};
use crate::workflows::careers::{
    career_router, AddCareerRequest, CareerService, InMemoryCareerStore, WizardStepRequest,
};

pub(super) const ORG: &str = "65f1c2a9e4b0a1b2c3d4e5f6";
pub(super) const PLAN: &str = "65f1c2a9e4b0a1b2c3d4e5aa";
pub(super) const UNKNOWN_ORG: &str = "65f1c2a9e4b0a1b2c3d4e5ff";

pub(super) type MemoryService = CareerService<InMemoryCareerStore, InMemoryCareerStore>;

pub(super) fn org_id() -> OrgId {
    OrgId::parse(ORG).expect("valid org id")
}

pub(super) fn recruiter() -> Editor {
    Editor {
        name: Some("Ana Reyes".to_string()),
        email: Some("ana@example.com".to_string()),
        image: None,
    }
}

/// Store with one organization on a plan, already holding `active` active careers.
pub(super) async fn seeded_store(
    job_limit: impl Into<SlotValue>,
    extra_job_slots: impl Into<SlotValue>,
    active: usize,
) -> InMemoryCareerStore {
    let store = InMemoryCareerStore::new()
        .with_plan(PLAN, job_limit)
        .expect("plan seeded")
        .with_organization(org_id(), Some(PLAN), extra_job_slots)
        .expect("organization seeded");

    for index in 0..active {
        let mut career = Career::draft(
            CareerId(format!("seed-{index}")),
            ORG,
            recruiter(),
            Utc::now(),
        );
        career.job_title = format!("Seeded role {index}");
        career.status = if index % 2 == 0 {
            CareerStatus::Active
        } else {
            CareerStatus::Published
        };
        store.insert(career).await.expect("seed career");
    }
    store
}

pub(super) fn build_service(store: &InMemoryCareerStore) -> MemoryService {
    let store = Arc::new(store.clone());
    CareerService::new(store.clone(), store)
}

pub(super) fn add_career_body(org: &str) -> Value {
    json!({
        "jobTitle": "Senior Data Engineer",
        "description": "<p>Own the analytics platform.</p>",
        "questions": [{ "id": "q1", "text": "Years with Spark?" }],
        "location": "Makati City",
        "workSetup": "Hybrid",
        "workSetupRemarks": "",
        "orgID": org,
        "createdBy": { "name": "Ana Reyes", "email": "ana@example.com" },
        "salaryNegotiable": false,
        "minimumSalary": 80000,
        "maximumSalary": 120000,
        "country": "Philippines",
        "province": "Metro Manila",
        "employmentType": "Full-Time"
    })
}

pub(super) fn add_career_request(org: &str) -> AddCareerRequest {
    serde_json::from_value(add_career_body(org)).expect("valid add career body")
}

pub(super) fn wizard_body(career_id: Option<&str>) -> Value {
    let mut body = json!({
        "step": 1,
        "orgID": ORG,
        "editor": { "name": "Ana Reyes", "email": "ana@example.com" },
        "jobTitle": "Product Designer",
        "description": "<p>Shape the recruiter experience.</p>",
        "location": "Pasig",
        "workSetup": "Onsite",
        "employmentType": "Full-Time",
        "province": "Metro Manila",
        "country": "Philippines",
        "salaryNegotiable": true
    });
    if let Some(id) = career_id {
        body["careerId"] = json!(id);
    }
    body
}

pub(super) fn wizard_request(career_id: Option<&str>) -> WizardStepRequest {
    serde_json::from_value(wizard_body(career_id)).expect("valid wizard body")
}

pub(super) fn router_for(store: &InMemoryCareerStore) -> axum::Router {
    career_router(Arc::new(build_service(store)))
}

pub(super) fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("serialize")))
        .expect("request")
}

pub(super) fn post_raw(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub(super) fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Store whose every call fails the way an unreachable MongoDB does.
pub(super) struct UnavailableStore;

#[async_trait]
impl OrganizationStore for UnavailableStore {
    async fn organization_profile(
        &self,
        _org_id: &OrgId,
    ) -> Result<Option<OrganizationProfile>, RepositoryError> {
        Err(RepositoryError::from_backend_message(
            "connect ECONNREFUSED 127.0.0.1:27017",
        ))
    }
}

#[async_trait]
impl CareerStore for UnavailableStore {
    async fn count_by_status(
        &self,
        _org_ref: &str,
        _statuses: &[CareerStatus],
    ) -> Result<u64, RepositoryError> {
        Err(RepositoryError::from_backend_message(
            "MongoNetworkTimeoutError: connection timed out",
        ))
    }

    async fn insert(&self, _career: Career) -> Result<Career, RepositoryError> {
        Err(RepositoryError::Backend("write concern failed".to_string()))
    }

    async fn update(&self, _career: Career) -> Result<(), RepositoryError> {
        Err(RepositoryError::Backend("write concern failed".to_string()))
    }

    async fn fetch(&self, _id: &CareerId) -> Result<Option<Career>, RepositoryError> {
        Ok(None)
    }
}

/// Store that resolves organizations but cannot persist careers.
pub(super) struct ReadOnlyCareers {
    pub(super) inner: InMemoryCareerStore,
}

#[async_trait]
impl CareerStore for ReadOnlyCareers {
    async fn count_by_status(
        &self,
        org_ref: &str,
        statuses: &[CareerStatus],
    ) -> Result<u64, RepositoryError> {
        self.inner.count_by_status(org_ref, statuses).await
    }

    async fn insert(&self, _career: Career) -> Result<Career, RepositoryError> {
        Err(RepositoryError::Backend("not master".to_string()))
    }

    async fn update(&self, _career: Career) -> Result<(), RepositoryError> {
        Err(RepositoryError::Backend("not master".to_string()))
    }

    async fn fetch(&self, id: &CareerId) -> Result<Option<Career>, RepositoryError> {
        self.inner.fetch(id).await
    }
}
