use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::error;

use super::domain::CareerId;
use super::repository::{CareerStore, OrganizationStore};
use super::request::{
    AddCareerRequest, OrganizationQuery, PipelineEditRequest, TeamEditRequest,
    UpdateCareerRequest, WizardStepRequest,
};
use super::service::{CareerService, CareerServiceError};
use super::wizard::team::{RoleDescription, TeamRole};

/// Router builder exposing the career and quota endpoints.
pub fn career_router<O, C>(service: Arc<CareerService<O, C>>) -> Router
where
    O: OrganizationStore + 'static,
    C: CareerStore + 'static,
{
    Router::new()
        .route("/api/add-career", post(add_career_handler::<O, C>))
        .route("/api/update-career", post(update_career_handler::<O, C>))
        .route("/api/careers/wizard", post(wizard_step_handler::<O, C>))
        .route(
            "/api/careers/wizard/unpublished",
            post(wizard_unpublished_handler::<O, C>),
        )
        .route("/api/careers/:career_id", get(career_handler::<O, C>))
        .route(
            "/api/careers/:career_id/pipeline",
            post(pipeline_edit_handler::<O, C>),
        )
        .route("/api/careers/:career_id/team", post(team_edit_handler::<O, C>))
        .route("/api/team-roles", get(team_roles_handler))
        .route(
            "/api/fetch-org-details",
            post(organization_details_handler::<O, C>),
        )
        .route("/api/get-careers", get(career_totals_handler::<O, C>))
        .with_state(service)
}

pub(crate) async fn add_career_handler<O, C>(
    State(service): State<Arc<CareerService<O, C>>>,
    payload: Result<Json<AddCareerRequest>, JsonRejection>,
) -> Response
where
    O: OrganizationStore + 'static,
    C: CareerStore + 'static,
{
    let Json(request) = match payload {
        Ok(body) => body,
        Err(rejection) => return rejection_response(rejection),
    };
    match service.add_career(request).await {
        Ok(created) => (StatusCode::OK, Json(created)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_career_handler<O, C>(
    State(service): State<Arc<CareerService<O, C>>>,
    payload: Result<Json<UpdateCareerRequest>, JsonRejection>,
) -> Response
where
    O: OrganizationStore + 'static,
    C: CareerStore + 'static,
{
    let Json(request) = match payload {
        Ok(body) => body,
        Err(rejection) => return rejection_response(rejection),
    };
    match service.update_career(request).await {
        Ok(updated) => (StatusCode::OK, Json(updated)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn wizard_step_handler<O, C>(
    State(service): State<Arc<CareerService<O, C>>>,
    payload: Result<Json<WizardStepRequest>, JsonRejection>,
) -> Response
where
    O: OrganizationStore + 'static,
    C: CareerStore + 'static,
{
    let Json(request) = match payload {
        Ok(body) => body,
        Err(rejection) => return rejection_response(rejection),
    };
    match service.save_wizard_step(request).await {
        Ok(saved) => (StatusCode::OK, Json(saved)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn wizard_unpublished_handler<O, C>(
    State(service): State<Arc<CareerService<O, C>>>,
    payload: Result<Json<WizardStepRequest>, JsonRejection>,
) -> Response
where
    O: OrganizationStore + 'static,
    C: CareerStore + 'static,
{
    let Json(request) = match payload {
        Ok(body) => body,
        Err(rejection) => return rejection_response(rejection),
    };
    match service.save_as_unpublished(request).await {
        Ok(saved) => (StatusCode::OK, Json(saved)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn career_handler<O, C>(
    State(service): State<Arc<CareerService<O, C>>>,
    Path(career_id): Path<String>,
) -> Response
where
    O: OrganizationStore + 'static,
    C: CareerStore + 'static,
{
    let id = CareerId(career_id);
    match service.get_career(&id).await {
        Ok(career) => (
            StatusCode::OK,
            Json(json!({ "careerId": id, "career": career })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn pipeline_edit_handler<O, C>(
    State(service): State<Arc<CareerService<O, C>>>,
    Path(career_id): Path<String>,
    payload: Result<Json<PipelineEditRequest>, JsonRejection>,
) -> Response
where
    O: OrganizationStore + 'static,
    C: CareerStore + 'static,
{
    let Json(request) = match payload {
        Ok(body) => body,
        Err(rejection) => return rejection_response(rejection),
    };
    match service.edit_pipeline(&CareerId(career_id), request).await {
        Ok(updated) => (StatusCode::OK, Json(updated)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn team_edit_handler<O, C>(
    State(service): State<Arc<CareerService<O, C>>>,
    Path(career_id): Path<String>,
    payload: Result<Json<TeamEditRequest>, JsonRejection>,
) -> Response
where
    O: OrganizationStore + 'static,
    C: CareerStore + 'static,
{
    let Json(request) = match payload {
        Ok(body) => body,
        Err(rejection) => return rejection_response(rejection),
    };
    match service.edit_team(&CareerId(career_id), request).await {
        Ok(updated) => (StatusCode::OK, Json(updated)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn team_roles_handler() -> Json<Vec<RoleDescription>> {
    Json(TeamRole::ALL.into_iter().map(RoleDescription::from).collect())
}

pub(crate) async fn organization_details_handler<O, C>(
    State(service): State<Arc<CareerService<O, C>>>,
    payload: Result<Json<OrganizationQuery>, JsonRejection>,
) -> Response
where
    O: OrganizationStore + 'static,
    C: CareerStore + 'static,
{
    let Json(query) = match payload {
        Ok(body) => body,
        Err(rejection) => return rejection_response(rejection),
    };
    match service.organization_details(&query.org_id).await {
        Ok(details) => (StatusCode::OK, Json(details)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn career_totals_handler<O, C>(
    State(service): State<Arc<CareerService<O, C>>>,
    Query(query): Query<OrganizationQuery>,
) -> Response
where
    O: OrganizationStore + 'static,
    C: CareerStore + 'static,
{
    match service.career_totals(&query.org_id).await {
        Ok(totals) => (StatusCode::OK, Json(totals)).into_response(),
        Err(err) => error_response(err),
    }
}

/// Unreadable or mistyped JSON bodies answer 400 in the same `{ "error": ... }` shape.
pub fn rejection_response(rejection: JsonRejection) -> Response {
    let payload = json!({ "error": rejection.body_text() });
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}

/// Render a service failure as `{ "error": ... }` with its status code.
pub fn error_response(err: CareerServiceError) -> Response {
    let status = err.status_code();
    if status.is_server_error() {
        error!(error = %err, "career request failed");
    }

    let payload = match &err {
        CareerServiceError::IncompleteStep(fields) => json!({
            "error": err.public_message(),
            "fields": fields,
        }),
        _ => json!({ "error": err.public_message() }),
    };
    (status, Json(payload)).into_response()
}
