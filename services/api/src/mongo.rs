use async_trait::async_trait;
use careers::config::StorageConfig;
use careers::workflows::careers::{
    Career, CareerId, CareerStatus, CareerStore, OrgId, OrganizationProfile, OrganizationRecord,
    OrganizationStore, PlanRecord, RepositoryError, SlotValue,
};
use futures::TryStreamExt;
use mongodb::bson::{self, doc, Bson, Document};
use mongodb::error::{Error as MongoError, ErrorKind};
use mongodb::{Client, Collection, Database};
use tracing::{debug, info};

const ORGANIZATIONS: &str = "organizations";
const PLANS: &str = "organization-plans";
const CAREERS: &str = "careers";

/// MongoDB-backed organization and career store sharing one pooled client.
#[derive(Clone)]
pub(crate) struct MongoCareerStore {
    client: Client,
    database: Database,
}

impl MongoCareerStore {
    pub(crate) async fn connect(config: &StorageConfig) -> Result<Self, RepositoryError> {
        let uri = config
            .mongodb_uri
            .as_deref()
            .ok_or_else(|| RepositoryError::Backend("MONGODB_URI is not set".to_string()))?;
        let client = Client::with_uri_str(uri).await.map_err(map_driver_error)?;
        let database = client.database(&config.database);
        info!(database = %config.database, "mongodb client configured");
        Ok(Self { client, database })
    }

    pub(crate) async fn ping(&self) -> Result<(), RepositoryError> {
        self.database
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(map_driver_error)?;
        Ok(())
    }

    pub(crate) async fn shutdown(self) {
        self.client.shutdown().await;
    }

    fn careers(&self) -> Collection<Document> {
        self.database.collection(CAREERS)
    }
}

#[async_trait]
impl OrganizationStore for MongoCareerStore {
    async fn organization_profile(
        &self,
        org_id: &OrgId,
    ) -> Result<Option<OrganizationProfile>, RepositoryError> {
        let pipeline = vec![
            doc! { "$match": { "_id": org_id.object_id() } },
            doc! {
                "$lookup": {
                    "from": PLANS,
                    "let": { "planId": "$planId" },
                    "pipeline": [
                        { "$addFields": { "_idStr": { "$toString": "$_id" } } },
                        { "$match": { "$expr": { "$eq": ["$_idStr", { "$toString": "$$planId" }] } } },
                    ],
                    "as": "plan",
                }
            },
            doc! { "$unwind": { "path": "$plan", "preserveNullAndEmptyArrays": true } },
            doc! { "$limit": 1 },
        ];

        let mut cursor = self
            .database
            .collection::<Document>(ORGANIZATIONS)
            .aggregate(pipeline, None)
            .await
            .map_err(map_driver_error)?;
        let Some(document) = cursor.try_next().await.map_err(map_driver_error)? else {
            return Ok(None);
        };

        debug!(org_id = %org_id, "organization document loaded");
        Ok(Some(profile_from_document(*org_id, &document)))
    }
}

#[async_trait]
impl CareerStore for MongoCareerStore {
    async fn count_by_status(
        &self,
        org_ref: &str,
        statuses: &[CareerStatus],
    ) -> Result<u64, RepositoryError> {
        let labels: Vec<&str> = statuses.iter().map(|status| status.label()).collect();
        self.careers()
            .count_documents(doc! { "orgID": org_ref, "status": { "$in": labels } }, None)
            .await
            .map_err(map_driver_error)
    }

    async fn insert(&self, career: Career) -> Result<Career, RepositoryError> {
        let document = to_document(&career)?;
        self.careers()
            .insert_one(document, None)
            .await
            .map_err(map_driver_error)?;
        Ok(career)
    }

    async fn update(&self, career: Career) -> Result<(), RepositoryError> {
        let document = to_document(&career)?;
        let result = self
            .careers()
            .replace_one(doc! { "id": career.id.as_str() }, document, None)
            .await
            .map_err(map_driver_error)?;
        if result.matched_count == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn fetch(&self, id: &CareerId) -> Result<Option<Career>, RepositoryError> {
        let document = self
            .careers()
            .find_one(doc! { "id": id.as_str() }, None)
            .await
            .map_err(map_driver_error)?;
        document
            .map(|document| {
                bson::from_document::<Career>(document)
                    .map_err(|err| RepositoryError::Backend(err.to_string()))
            })
            .transpose()
    }
}

fn to_document(career: &Career) -> Result<Document, RepositoryError> {
    bson::to_document(career).map_err(|err| RepositoryError::Backend(err.to_string()))
}

fn profile_from_document(org_id: OrgId, document: &Document) -> OrganizationProfile {
    let plan = document.get_document("plan").ok().map(|plan| PlanRecord {
        id: plan.get("_id").and_then(reference_string).unwrap_or_default(),
        job_limit: slot_value(plan.get("jobLimit")),
    });

    OrganizationProfile {
        organization: OrganizationRecord {
            id: org_id,
            plan_id: document.get("planId").and_then(reference_string),
            extra_job_slots: slot_value(document.get("extraJobSlots")),
        },
        plan,
    }
}

/// Plan references are stored as either ObjectIds or strings.
fn reference_string(value: &Bson) -> Option<String> {
    match value {
        Bson::ObjectId(id) => Some(id.to_hex()),
        Bson::String(raw) => Some(raw.clone()),
        Bson::Int32(value) => Some(value.to_string()),
        Bson::Int64(value) => Some(value.to_string()),
        _ => None,
    }
}

fn slot_value(value: Option<&Bson>) -> SlotValue {
    match value {
        None | Some(Bson::Null) | Some(Bson::Undefined) => SlotValue::Missing,
        Some(Bson::Double(value)) => SlotValue::Number(*value),
        Some(Bson::Int32(value)) => SlotValue::Number(f64::from(*value)),
        Some(Bson::Int64(value)) => SlotValue::Number(*value as f64),
        Some(Bson::String(raw)) => SlotValue::Text(raw.clone()),
        Some(_) => SlotValue::Other,
    }
}

/// Translate driver failures, treating network and server-selection errors as transport failures.
fn map_driver_error(err: MongoError) -> RepositoryError {
    match err.kind.as_ref() {
        ErrorKind::Io(_)
        | ErrorKind::ServerSelection { .. }
        | ErrorKind::ConnectionPoolCleared { .. } => RepositoryError::Transport(err.to_string()),
        _ => RepositoryError::from_backend_message(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    #[test]
    fn reads_mixed_plan_and_slot_types() {
        let plan_id = ObjectId::new();
        let org_id = OrgId::generate();
        let document = doc! {
            "_id": org_id.object_id(),
            "planId": plan_id.to_hex(),
            "extraJobSlots": "2",
            "plan": { "_id": plan_id, "jobLimit": 5_i32 },
        };

        let profile = profile_from_document(org_id, &document);

        assert_eq!(profile.organization.plan_id, Some(plan_id.to_hex()));
        assert_eq!(profile.organization.extra_job_slots, SlotValue::Text("2".to_string()));
        let plan = profile.plan.expect("joined plan");
        assert_eq!(plan.id, plan_id.to_hex());
        assert_eq!(plan.job_limit, SlotValue::Number(5.0));
    }

    #[test]
    fn missing_plan_and_slots_are_reported_missing() {
        let org_id = OrgId::generate();
        let document = doc! { "_id": org_id.object_id(), "extraJobSlots": Bson::Null };

        let profile = profile_from_document(org_id, &document);

        assert!(profile.plan.is_none());
        assert!(profile.organization.plan_id.is_none());
        assert_eq!(profile.organization.extra_job_slots, SlotValue::Missing);
        assert_eq!(slot_value(Some(&Bson::Boolean(true))), SlotValue::Other);
    }
}
