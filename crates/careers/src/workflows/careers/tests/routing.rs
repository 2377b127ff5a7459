use super::common::*;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::careers::router::add_career_handler;
use crate::workflows::careers::CareerService;

#[tokio::test]
async fn scenario_full_plan_rejects_add_career() {
    let store = seeded_store(3, 0, 3).await;
    let router = router_for(&store);

    let response = router
        .oneshot(post_json("/api/add-career", &add_career_body(ORG)))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(
        body,
        json!({ "error": "You have reached the maximum number of jobs for your plan" })
    );
}

#[tokio::test]
async fn scenario_extra_slots_admit_add_career() {
    let store = seeded_store(3, 2, 4).await;
    let router = router_for(&store);

    let response = router
        .oneshot(post_json("/api/add-career", &add_career_body(ORG)))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["message"], "Career added successfully");
    assert_eq!(body["career"]["status"], "active");
    assert_eq!(body["careerId"], body["career"]["id"]);
}

#[tokio::test]
async fn scenario_malformed_org_id_is_bad_request() {
    let store = seeded_store(3, 0, 0).await;
    let router = router_for(&store);

    let response = router
        .oneshot(post_json("/api/add-career", &add_career_body("acme-corp")))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json_body(response).await, json!({ "error": "Invalid orgID" }));
}

#[tokio::test]
async fn scenario_unknown_org_is_not_found() {
    let store = seeded_store(3, 0, 0).await;
    let router = router_for(&store);

    let response = router
        .oneshot(post_json("/api/add-career", &add_career_body(UNKNOWN_ORG)))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        read_json_body(response).await,
        json!({ "error": "Organization not found" })
    );
}

#[tokio::test]
async fn missing_required_field_names_it() {
    let store = seeded_store(3, 0, 0).await;
    let router = router_for(&store);
    let mut body = add_career_body(ORG);
    body.as_object_mut().expect("object").remove("createdBy");

    let response = router
        .oneshot(post_json("/api/add-career", &body))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json_body(response).await,
        json!({ "error": "createdBy is required" })
    );
}

#[tokio::test]
async fn falsy_required_fields_are_reported_as_missing() {
    let store = seeded_store(3, 0, 0).await;

    for (field, value) in [("jobTitle", json!(false)), ("questions", json!(0))] {
        let mut body = add_career_body(ORG);
        body[field] = value;

        let response = router_for(&store)
            .oneshot(post_json("/api/add-career", &body))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            read_json_body(response).await,
            json!({ "error": format!("{field} is required") })
        );
    }
    assert!(store.careers().expect("careers").is_empty());
}

#[tokio::test]
async fn numeric_org_id_is_invalid() {
    let store = seeded_store(3, 0, 0).await;
    let mut body = add_career_body(ORG);
    body["orgID"] = json!(12345);

    let response = router_for(&store)
        .oneshot(post_json("/api/add-career", &body))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json_body(response).await, json!({ "error": "Invalid orgID" }));
}

#[tokio::test]
async fn padded_org_id_is_invalid() {
    let store = seeded_store(3, 0, 0).await;
    let padded = format!(" {ORG}");

    let response = router_for(&store)
        .oneshot(post_json("/api/add-career", &add_career_body(&padded)))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json_body(response).await, json!({ "error": "Invalid orgID" }));
}

#[tokio::test]
async fn unknown_status_label_is_bad_request() {
    let store = seeded_store(3, 0, 0).await;
    let mut body = add_career_body(ORG);
    body["status"] = json!("draft");

    let response = router_for(&store)
        .oneshot(post_json("/api/add-career", &body))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json_body(response).await,
        json!({ "error": "Invalid status 'draft'" })
    );
}

#[tokio::test]
async fn unreadable_bodies_answer_json_bad_request() {
    let store = seeded_store(3, 0, 1).await;
    let router = router_for(&store);

    for uri in [
        "/api/add-career",
        "/api/update-career",
        "/api/careers/wizard",
        "/api/careers/wizard/unpublished",
        "/api/fetch-org-details",
    ] {
        let response = router
            .clone()
            .oneshot(post_raw(uri, "{\"jobTitle\": "))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let body = read_json_body(response).await;
        assert!(body["error"].is_string(), "{uri}");
    }

    let response = router
        .oneshot(post_json(
            "/api/careers/wizard",
            &json!({ "step": 9, "orgID": ORG }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(read_json_body(response).await["error"].is_string());
}

#[tokio::test]
async fn add_career_handler_maps_transport_failures() {
    let store = Arc::new(UnavailableStore);
    let service = Arc::new(CareerService::new(store.clone(), store));

    let response = add_career_handler::<UnavailableStore, UnavailableStore>(
        State(service),
        Ok(Json(add_career_request(ORG))),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        read_json_body(response).await,
        json!({
            "error": "Database connection failed. Check your MONGODB_URI and network connectivity."
        })
    );
}

#[tokio::test]
async fn wizard_route_demotes_and_fetch_returns_the_draft() {
    let store = seeded_store(3, 0, 3).await;
    let router = router_for(&store);

    let response = router
        .clone()
        .oneshot(post_json("/api/careers/wizard", &wizard_body(None)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let saved = read_json_body(response).await;
    assert_eq!(saved["status"], "Unpublished");
    assert_eq!(saved["jobLimitReached"], true);
    assert_eq!(saved["progress"].as_array().map(Vec::len), Some(5));

    let career_id = saved["careerId"].as_str().expect("career id").to_string();
    let response = router
        .oneshot(get(&format!("/api/careers/{career_id}")))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = read_json_body(response).await;
    assert_eq!(fetched["careerId"], career_id.as_str());
    assert_eq!(fetched["career"]["jobTitle"], "Product Designer");
}

#[tokio::test]
async fn wizard_route_lists_incomplete_fields() {
    let store = seeded_store(3, 0, 0).await;
    let router = router_for(&store);
    let mut body = wizard_body(None);
    body["location"] = json!("");

    let response = router
        .oneshot(post_json("/api/careers/wizard/unpublished", &body))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "Please complete required fields.");
    assert_eq!(payload["fields"]["location"], "This is a required field.");
}

#[tokio::test]
async fn update_route_accepts_underscore_id() {
    let store = seeded_store(3, 0, 1).await;
    let router = router_for(&store);

    let response = router
        .oneshot(post_json(
            "/api/update-career",
            &json!({ "_id": "seed-0", "aiInterviewSecretPrompt": "Ask about system design" }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["careerId"], "seed-0");
    assert_eq!(
        body["career"]["aiInterviewSecretPrompt"],
        "Ask about system design"
    );
}

#[tokio::test]
async fn unknown_career_is_not_found() {
    let store = seeded_store(3, 0, 0).await;
    let router = router_for(&store);

    let response = router
        .oneshot(get("/api/careers/does-not-exist"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        read_json_body(response).await,
        json!({ "error": "Career not found" })
    );
}

#[tokio::test]
async fn org_details_and_totals_routes() {
    let store = seeded_store(3, 2, 4).await;
    let router = router_for(&store);

    let response = router
        .clone()
        .oneshot(post_json("/api/fetch-org-details", &json!({ "orgID": ORG })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        read_json_body(response).await,
        json!({ "orgID": ORG, "jobLimit": 3, "extraJobSlots": 2, "jobLimitTotal": 5 })
    );

    let response = router
        .oneshot(get(&format!("/api/get-careers?orgID={ORG}")))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        read_json_body(response).await,
        json!({
            "orgID": ORG,
            "totalActiveCareers": 4,
            "jobLimitTotal": 5,
            "availableJobSlots": 1
        })
    );
}

#[tokio::test]
async fn fractional_plan_limit_is_reported_as_stored() {
    let store = seeded_store(2.5, 0, 2).await;
    let router = router_for(&store);

    let response = router
        .clone()
        .oneshot(get(&format!("/api/get-careers?orgID={ORG}")))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let totals = read_json_body(response).await;
    assert_eq!(totals["jobLimitTotal"], json!(2.5));
    assert_eq!(totals["availableJobSlots"], 1);

    let response = router
        .oneshot(post_json("/api/add-career", &add_career_body(ORG)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn pipeline_and_team_routes_edit_the_career() {
    let store = seeded_store(3, 0, 1).await;
    let router = router_for(&store);

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/careers/seed-0/pipeline",
            &json!({ "action": "addStage", "title": "Portfolio Review" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["career"]["pipelineStages"][4]["title"], "Portfolio Review");

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/careers/seed-0/pipeline",
            &json!({ "action": "removeStage", "stageId": "cv-screening" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json_body(response).await,
        json!({ "error": "core pipeline stage 'cv-screening' cannot be removed" })
    );

    let response = router
        .oneshot(post_json(
            "/api/careers/seed-0/team",
            &json!({ "action": "addMember", "memberId": "ben@example.com", "name": "Ben" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json_body(response).await,
        json!({ "error": "Career must have a job owner. Please assign a job owner." })
    );
}

#[tokio::test]
async fn team_roles_are_listed_with_descriptions() {
    let store = seeded_store(3, 0, 0).await;

    let response = router_for(&store)
        .oneshot(get("/api/team-roles"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let roles = read_json_body(response).await;
    assert_eq!(roles[0]["role"], "owner");
    assert_eq!(roles[0]["title"], "Job Owner");
    assert_eq!(roles.as_array().map(Vec::len), Some(3));
}
