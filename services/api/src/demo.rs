use careers::error::AppError;
use careers::workflows::careers::{
    AddCareerRequest, Career, CareerId, CareerService, CareerServiceError, CareerStatus,
    CareerStore, Editor, InMemoryCareerStore, OrgId, WizardStepRequest,
};
use chrono::Utc;
use clap::Args;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

const DEMO_PLAN: &str = "plan-starter";

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Job limit of the demo organization's plan
    #[arg(long, default_value_t = 3)]
    pub(crate) plan_limit: i64,
    /// Extra job slots purchased on top of the plan
    #[arg(long, default_value_t = 2)]
    pub(crate) extra_slots: i64,
    /// Print compact JSON instead of pretty output
    #[arg(long)]
    pub(crate) compact: bool,
}

#[derive(Debug, Serialize)]
struct ScenarioOutcome {
    scenario: &'static str,
    status: u16,
    body: Value,
}

type DemoService = CareerService<InMemoryCareerStore, InMemoryCareerStore>;

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let full_org = OrgId::generate();
    let roomy_org = OrgId::generate();

    let store = InMemoryCareerStore::new()
        .with_plan(DEMO_PLAN, args.plan_limit)?
        .with_organization(full_org, Some(DEMO_PLAN), 0)?
        .with_organization(roomy_org, Some(DEMO_PLAN), args.extra_slots)?;
    seed_active(&store, &full_org, args.plan_limit).await?;
    seed_active(&store, &roomy_org, args.plan_limit + args.extra_slots - 1).await?;

    let shared = Arc::new(store.clone());
    let service: DemoService = CareerService::new(shared.clone(), shared);

    let mut outcomes = vec![
        add(&service, "full plan", &full_org.to_hex()).await,
        add(&service, "purchased slots", &roomy_org.to_hex()).await,
        add(&service, "malformed orgID", "not-an-object-id").await,
        add(&service, "unknown organization", &OrgId::generate().to_hex()).await,
    ];

    let first = service
        .save_wizard_step(wizard_request(&full_org, None)?)
        .await;
    let career_id = first.as_ref().ok().map(|saved| saved.career_id.clone());
    outcomes.push(outcome("wizard on full plan", first));
    if let Some(career_id) = career_id {
        let resubmitted = service
            .save_wizard_step(wizard_request(&full_org, Some(&career_id))?)
            .await;
        outcomes.push(outcome("wizard resubmission", resubmitted));
    }

    let totals = service.career_totals(&full_org.to_hex()).await;
    outcomes.push(outcome("full plan totals", totals));

    for entry in &outcomes {
        let rendered = if args.compact {
            serde_json::to_string(entry)?
        } else {
            serde_json::to_string_pretty(entry)?
        };
        println!("{rendered}");
    }
    Ok(())
}

async fn seed_active(
    store: &InMemoryCareerStore,
    org_id: &OrgId,
    count: i64,
) -> Result<(), AppError> {
    let recruiter = demo_recruiter();
    for index in 0..count.max(0) {
        let mut career = Career::draft(
            CareerId::generate(),
            org_id.to_hex(),
            recruiter.clone(),
            Utc::now(),
        );
        career.job_title = format!("Existing role {}", index + 1);
        career.status = CareerStatus::Active;
        store.insert(career).await?;
    }
    Ok(())
}

async fn add(service: &DemoService, scenario: &'static str, org_id: &str) -> ScenarioOutcome {
    let request = AddCareerRequest {
        job_title: Some(json!("Customer Success Lead")),
        description: Some(json!("Own onboarding for enterprise accounts.")),
        questions: Some(json!([])),
        location: Some(json!("Quezon City")),
        work_setup: Some(json!("Hybrid")),
        org_id: Some(json!(org_id)),
        created_by: Some(json!(demo_recruiter())),
        ..AddCareerRequest::default()
    };
    outcome(scenario, service.add_career(request).await)
}

fn wizard_request(
    org_id: &OrgId,
    career_id: Option<&CareerId>,
) -> Result<WizardStepRequest, AppError> {
    let mut body = json!({
        "step": 1,
        "orgID": org_id.to_hex(),
        "editor": demo_recruiter(),
        "jobTitle": "Support Engineer",
        "description": "Keep customers unblocked.",
        "location": "Taguig",
        "workSetup": "Remote",
        "employmentType": "Full-Time",
        "province": "Metro Manila",
        "salaryNegotiable": true
    });
    if let Some(id) = career_id {
        body["careerId"] = json!(id);
    }
    Ok(serde_json::from_value(body)?)
}

fn outcome<T: Serialize>(
    scenario: &'static str,
    result: Result<T, CareerServiceError>,
) -> ScenarioOutcome {
    match result {
        Ok(value) => ScenarioOutcome {
            scenario,
            status: 200,
            body: serde_json::to_value(value)
                .unwrap_or_else(|err| json!({ "error": err.to_string() })),
        },
        Err(err) => ScenarioOutcome {
            scenario,
            status: err.status_code().as_u16(),
            body: json!({ "error": err.public_message() }),
        },
    }
}

fn demo_recruiter() -> Editor {
    Editor {
        name: Some("Demo Recruiter".to_string()),
        email: Some("recruiter@example.com".to_string()),
        image: None,
    }
}
