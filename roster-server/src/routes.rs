//! HTTP handlers: thin wrappers that call the engine and shape the envelope

use actix_web::{web, HttpResponse};
use roster_db::{Database, TeamMember};

use crate::api::{
    CreatePullRequestRequest, CreateTeamResponse, GetPullRequestQuery, GetTeamQuery, MergeRequest,
    PullRequestResponse, ReassignRequest, ReassignResponse, ReviewQueueQuery, ReviewQueueResponse,
    SetIsActiveRequest, SetIsActiveResponse, TeamBody,
};
use crate::error::ApiError;

/// Mount every route of the service
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/team/add", web::post().to(create_team))
        .route("/team/get", web::get().to(get_team))
        .route("/users/setIsActive", web::post().to(set_is_active))
        .route("/users/getReview", web::get().to(review_queue))
        .route("/pullRequest/create", web::post().to(create_pull_request))
        .route("/pullRequest/get", web::get().to(get_pull_request))
        .route("/pullRequest/merge", web::post().to(merge_pull_request))
        .route("/pullRequest/reassign", web::post().to(reassign_reviewer))
        .route("/health", web::get().to(health));
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().body("OK")
}

pub async fn create_team(
    db: web::Data<Database>,
    body: web::Json<TeamBody>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    let members: Vec<TeamMember> = body.members.into_iter().map(Into::into).collect();
    let team = db.teams().create_team(&body.team_name, &members).await?;
    Ok(HttpResponse::Created().json(CreateTeamResponse { team: team.into() }))
}

pub async fn get_team(
    db: web::Data<Database>,
    query: web::Query<GetTeamQuery>,
) -> Result<HttpResponse, ApiError> {
    let team = db.teams().get_team(&query.team_name).await?;
    Ok(HttpResponse::Ok().json(TeamBody::from(team)))
}

pub async fn set_is_active(
    db: web::Data<Database>,
    body: web::Json<SetIsActiveRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = db
        .teams()
        .set_user_active(&body.user_id, body.is_active)
        .await?;
    Ok(HttpResponse::Ok().json(SetIsActiveResponse { user: user.into() }))
}

pub async fn review_queue(
    db: web::Data<Database>,
    query: web::Query<ReviewQueueQuery>,
) -> Result<HttpResponse, ApiError> {
    let prs = db.pull_requests().list_by_reviewer(&query.user_id).await?;
    Ok(HttpResponse::Ok().json(ReviewQueueResponse {
        user_id: query.into_inner().user_id,
        pull_requests: prs.into_iter().map(Into::into).collect(),
    }))
}

pub async fn create_pull_request(
    db: web::Data<Database>,
    body: web::Json<CreatePullRequestRequest>,
) -> Result<HttpResponse, ApiError> {
    let pr = db
        .pull_requests()
        .create(&body.pull_request_id, &body.pull_request_name, &body.author_id)
        .await?;
    Ok(HttpResponse::Created().json(PullRequestResponse { pr: pr.into() }))
}

pub async fn get_pull_request(
    db: web::Data<Database>,
    query: web::Query<GetPullRequestQuery>,
) -> Result<HttpResponse, ApiError> {
    let pr = db.pull_requests().get(&query.pull_request_id).await?;
    Ok(HttpResponse::Ok().json(PullRequestResponse { pr: pr.into() }))
}

pub async fn merge_pull_request(
    db: web::Data<Database>,
    body: web::Json<MergeRequest>,
) -> Result<HttpResponse, ApiError> {
    let pr = db.pull_requests().merge(&body.pull_request_id).await?;
    Ok(HttpResponse::Ok().json(PullRequestResponse { pr: pr.into() }))
}

pub async fn reassign_reviewer(
    db: web::Data<Database>,
    body: web::Json<ReassignRequest>,
) -> Result<HttpResponse, ApiError> {
    let (pr, replaced_by) = db
        .pull_requests()
        .reassign(&body.pull_request_id, &body.old_user_id)
        .await?;
    Ok(HttpResponse::Ok().json(ReassignResponse {
        pr: pr.into(),
        replaced_by,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{PullRequestShortBody, TeamMemberBody};
    use crate::error::ErrorEnvelope;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use roster_core::Selector;
    use roster_db::{DatabaseConfig, PrStatus};
    use tempfile::TempDir;

    async fn setup_db() -> (Database, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = DatabaseConfig::new(temp_dir.path().join("test.db"));
        let db = Database::connect_with_selector(config, Selector::seeded(1))
            .await
            .unwrap();
        (db, temp_dir)
    }

    fn team_body(name: &str, members: &[(&str, bool)]) -> TeamBody {
        TeamBody {
            team_name: name.to_string(),
            members: members
                .iter()
                .map(|(id, active)| TeamMemberBody {
                    user_id: id.to_string(),
                    username: id.to_string(),
                    is_active: *active,
                })
                .collect(),
        }
    }

    #[actix_web::test]
    async fn test_health() {
        let (db, _tmp) = setup_db().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .configure(configure),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request())
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_create_team_then_pull_request_flow() {
        let (db, _tmp) = setup_db().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .configure(configure),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/team/add")
                .set_json(team_body("t", &[("a", true), ("b", true), ("c", true)]))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: CreateTeamResponse = test::read_body_json(resp).await;
        assert_eq!(created.team.members.len(), 3);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/pullRequest/create")
                .set_json(CreatePullRequestRequest {
                    pull_request_id: "p1".to_string(),
                    pull_request_name: "feature".to_string(),
                    author_id: "a".to_string(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: PullRequestResponse = test::read_body_json(resp).await;
        assert_eq!(created.pr.status, PrStatus::Open);
        assert_eq!(created.pr.assigned_reviewers.len(), 2);
        assert!(created.pr.merged_at.is_none());

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/pullRequest/merge")
                .set_json(MergeRequest {
                    pull_request_id: "p1".to_string(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let merged: PullRequestResponse = test::read_body_json(resp).await;
        assert_eq!(merged.pr.status, PrStatus::Merged);
        assert!(merged.pr.merged_at.is_some());

        let reviewer = merged.pr.assigned_reviewers[0].clone();
        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/users/getReview?user_id={}", reviewer))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let queue: ReviewQueueResponse = test::read_body_json(resp).await;
        assert_eq!(queue.pull_requests.len(), 1);
        let entry: &PullRequestShortBody = &queue.pull_requests[0];
        assert_eq!(entry.pull_request_id, "p1");
    }

    #[actix_web::test]
    async fn test_duplicate_team_renders_envelope() {
        let (db, _tmp) = setup_db().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .configure(configure),
        )
        .await;

        let body = team_body("t", &[("a", true)]);
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/team/add")
                .set_json(&body)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/team/add")
                .set_json(&body)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let envelope: ErrorEnvelope = test::read_body_json(resp).await;
        assert_eq!(envelope.error.code, "TEAM_EXISTS");
    }

    #[actix_web::test]
    async fn test_reassign_without_candidates_conflicts() {
        let (db, _tmp) = setup_db().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .configure(configure),
        )
        .await;

        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/team/add")
                .set_json(team_body("t", &[("a", true), ("b", true)]))
                .to_request(),
        )
        .await;
        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/pullRequest/create")
                .set_json(CreatePullRequestRequest {
                    pull_request_id: "p1".to_string(),
                    pull_request_name: "fix".to_string(),
                    author_id: "a".to_string(),
                })
                .to_request(),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/pullRequest/reassign")
                .set_json(ReassignRequest {
                    pull_request_id: "p1".to_string(),
                    old_user_id: "b".to_string(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let envelope: ErrorEnvelope = test::read_body_json(resp).await;
        assert_eq!(envelope.error.code, "NO_CANDIDATE");
    }

    #[actix_web::test]
    async fn test_unknown_team_is_not_found() {
        let (db, _tmp) = setup_db().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .configure(configure),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/team/get?team_name=missing")
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let envelope: ErrorEnvelope = test::read_body_json(resp).await;
        assert_eq!(envelope.error.code, "NOT_FOUND");
    }
}
