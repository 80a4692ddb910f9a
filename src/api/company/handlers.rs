use actix_web::{
    get,
    web::{Data, Query, ServiceConfig},
    HttpResponse, Responder,
};

use super::dto::{FetchCompanyQuery, FetchCompanyResponse, JobsInProgressResponse};
use super::service::CompanyService;
use crate::jobs::JobRegistry;

/// Run a company lookup job and return its id
///
/// The pipeline is awaited before responding, so the returned id already
/// refers to a settled job. The response is 200 regardless of the lookup's
/// outcome; callers learn the result via `/jobsInProgress` or the webhook.
#[get("/fetchCompany")]
async fn fetch_company(
    service: Data<CompanyService>,
    query: Query<FetchCompanyQuery>,
) -> impl Responder {
    let job_id = service.run_lookup(&query.siren).await;
    HttpResponse::Ok().json(FetchCompanyResponse { job_id })
}

/// Snapshot of job ids still in progress, in creation order
#[get("/jobsInProgress")]
async fn jobs_in_progress(registry: Data<JobRegistry>) -> impl Responder {
    let jobs_in_progress = registry.in_progress();
    HttpResponse::Ok().json(JobsInProgressResponse { jobs_in_progress })
}

pub fn company_config(config: &mut ServiceConfig) {
    config.service(fetch_company).service(jobs_in_progress);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::company::service::tests::{harness, MockRegistry};
    use actix_web::{test, App};
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn fetch_company_returns_job_id_on_success() {
        let h = harness(MockRegistry::with_company(json!({
            "siren": "123456789",
            "representants": [{ "prenom": "Jean", "personne_morale": false }]
        })));
        let registry = h.registry.clone();

        let app = test::init_service(
            App::new()
                .app_data(Data::new(h.service))
                .app_data(Data::from(registry.clone()))
                .configure(company_config),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/fetchCompany?siren=123456789")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        let job_id = body["jobId"].as_str().unwrap();
        assert!(!job_id.is_empty());
        assert_eq!(
            registry.status(job_id),
            Some(crate::jobs::JobStatus::Completed)
        );
    }

    #[actix_web::test]
    async fn fetch_company_returns_200_and_job_id_on_failure() {
        let h = harness(MockRegistry::failing());
        let registry = h.registry.clone();

        let app = test::init_service(
            App::new()
                .app_data(Data::new(h.service))
                .app_data(Data::from(registry.clone()))
                .configure(company_config),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/fetchCompany?siren=000000000")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body: Value = test::read_body_json(resp).await;
        let job_id = body["jobId"].as_str().unwrap();
        assert_eq!(
            registry.status(job_id),
            Some(crate::jobs::JobStatus::Failed)
        );
    }

    #[actix_web::test]
    async fn jobs_in_progress_excludes_settled_jobs() {
        let h = harness(MockRegistry::with_company(json!({ "siren": "123456789" })));
        let registry = h.registry.clone();

        let app = test::init_service(
            App::new()
                .app_data(Data::new(h.service))
                .app_data(Data::from(registry.clone()))
                .configure(company_config),
        )
        .await;

        // Settle one job through the handler; leave one in progress directly
        let req = test::TestRequest::get()
            .uri("/fetchCompany?siren=123456789")
            .to_request();
        let _: Value = test::call_and_read_body_json(&app, req).await;
        let pending = registry.create();

        let req = test::TestRequest::get().uri("/jobsInProgress").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let listed: Vec<&str> = body["jobsInProgress"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(listed, vec![pending.as_str()]);

        // Snapshot is stable when no new work arrives
        let req = test::TestRequest::get().uri("/jobsInProgress").to_request();
        let again: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, again);
    }
}
