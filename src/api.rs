//! REST API: thin actix-web handlers over [`League`].

use crate::auth::AdminAuth;
use crate::logic::{League, NewClash, NewNotification, NewPlayer, NewTeam, ScoreSubmission};
use crate::models::{ClashStatus, Stage, TeamId, TournamentError};
use actix_web::{
    delete, error, get,
    http::StatusCode,
    post, put,
    web::{self, Bytes, Data, Json, Path, Query},
    HttpMessage, HttpRequest, HttpResponse, ResponseError,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Upper bound for photo uploads.
const MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;

/// Everything the handlers share.
pub struct AppContext {
    pub league: League,
    pub auth: AdminAuth,
}

type AppState = Data<AppContext>;

impl ResponseError for TournamentError {
    fn status_code(&self) -> StatusCode {
        if self.is_not_found() {
            StatusCode::NOT_FOUND
        } else if self.is_invalid_state() {
            StatusCode::BAD_REQUEST
        } else {
            match self {
                TournamentError::Validation(_) => StatusCode::BAD_REQUEST,
                TournamentError::Unauthorized => StatusCode::UNAUTHORIZED,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("{self}");
        }
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": self.to_string() }))
    }
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Serialize)]
struct SuccessResponse {
    success: bool,
}

#[derive(Deserialize)]
struct AdminLoginBody {
    password: String,
}

#[derive(Deserialize)]
struct PlayerQuery {
    team_id: Option<TeamId>,
}

#[derive(Deserialize)]
struct ClashQuery {
    stage: Option<Stage>,
    status: Option<ClashStatus>,
}

#[derive(Deserialize)]
struct LeaderboardQuery {
    pool: Option<String>,
}

#[derive(Serialize)]
struct PhotoResponse {
    success: bool,
    photo_url: String,
}

#[derive(Serialize)]
struct KnockoutResponse {
    message: &'static str,
    clashes: Vec<String>,
}

fn success() -> HttpResponse {
    HttpResponse::Ok().json(SuccessResponse { success: true })
}

#[get("/api/health")]
async fn api_health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "badminton-league",
    })
}

#[post("/api/admin/login")]
async fn api_admin_login(state: AppState, body: Json<AdminLoginBody>) -> Result<HttpResponse, TournamentError> {
    state.auth.verify(&body.password)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true, "message": "Login successful" })))
}

#[post("/api/teams")]
async fn api_create_team(state: AppState, body: Json<NewTeam>) -> Result<HttpResponse, TournamentError> {
    let team = state.league.create_team(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(team))
}

#[get("/api/teams")]
async fn api_get_teams(state: AppState) -> Result<HttpResponse, TournamentError> {
    Ok(HttpResponse::Ok().json(state.league.teams().await?))
}

#[get("/api/teams/{id}")]
async fn api_get_team(state: AppState, path: Path<Uuid>) -> Result<HttpResponse, TournamentError> {
    Ok(HttpResponse::Ok().json(state.league.team(path.into_inner()).await?))
}

#[put("/api/teams/{id}")]
async fn api_update_team(
    state: AppState,
    path: Path<Uuid>,
    body: Json<NewTeam>,
) -> Result<HttpResponse, TournamentError> {
    let team = state.league.update_team(path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(team))
}

#[delete("/api/teams/{id}")]
async fn api_delete_team(state: AppState, path: Path<Uuid>) -> Result<HttpResponse, TournamentError> {
    state.league.delete_team(path.into_inner()).await?;
    Ok(success())
}

#[post("/api/players")]
async fn api_create_player(state: AppState, body: Json<NewPlayer>) -> Result<HttpResponse, TournamentError> {
    let player = state.league.create_player(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(player))
}

#[get("/api/players")]
async fn api_get_players(state: AppState, query: Query<PlayerQuery>) -> Result<HttpResponse, TournamentError> {
    Ok(HttpResponse::Ok().json(state.league.players(query.team_id).await?))
}

#[get("/api/players/{id}")]
async fn api_get_player(state: AppState, path: Path<Uuid>) -> Result<HttpResponse, TournamentError> {
    Ok(HttpResponse::Ok().json(state.league.player(path.into_inner()).await?))
}

/// Canonical partner-pair keys recorded for a player.
#[get("/api/players/{id}/pairs")]
async fn api_get_player_pairs(state: AppState, path: Path<Uuid>) -> Result<HttpResponse, TournamentError> {
    Ok(HttpResponse::Ok().json(state.league.pairing_history(path.into_inner()).await?))
}

#[put("/api/players/{id}")]
async fn api_update_player(
    state: AppState,
    path: Path<Uuid>,
    body: Json<NewPlayer>,
) -> Result<HttpResponse, TournamentError> {
    let player = state.league.update_player(path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(player))
}

#[delete("/api/players/{id}")]
async fn api_delete_player(state: AppState, path: Path<Uuid>) -> Result<HttpResponse, TournamentError> {
    state.league.delete_player(path.into_inner()).await?;
    Ok(success())
}

#[post("/api/generate-fixtures")]
async fn api_generate_fixtures(state: AppState) -> Result<HttpResponse, TournamentError> {
    Ok(HttpResponse::Ok().json(state.league.generate_fixtures().await?))
}

#[post("/api/clashes")]
async fn api_create_clash(state: AppState, body: Json<NewClash>) -> Result<HttpResponse, TournamentError> {
    let clash = state.league.create_clash(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(clash))
}

#[get("/api/clashes")]
async fn api_get_clashes(state: AppState, query: Query<ClashQuery>) -> Result<HttpResponse, TournamentError> {
    Ok(HttpResponse::Ok().json(state.league.clashes(query.stage, query.status).await?))
}

#[get("/api/clashes/{id}")]
async fn api_get_clash(state: AppState, path: Path<Uuid>) -> Result<HttpResponse, TournamentError> {
    Ok(HttpResponse::Ok().json(state.league.clash(path.into_inner()).await?))
}

/// Submit game scores for a clash. Rejected once the clash is locked.
#[put("/api/clashes/{id}/score")]
async fn api_submit_score(
    state: AppState,
    path: Path<Uuid>,
    body: Json<ScoreSubmission>,
) -> Result<HttpResponse, TournamentError> {
    let outcome = state.league.submit_score(path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

/// Raw image bytes in the body; the request's content type is kept in the data URL.
#[put("/api/clashes/{id}/photo")]
async fn api_upload_photo(
    state: AppState,
    path: Path<Uuid>,
    req: HttpRequest,
    body: Bytes,
) -> Result<HttpResponse, TournamentError> {
    let content_type = match req.content_type() {
        "" => "application/octet-stream",
        ct => ct,
    };
    let photo_url = state
        .league
        .upload_photo(path.into_inner(), content_type, &body)
        .await?;
    Ok(HttpResponse::Ok().json(PhotoResponse {
        success: true,
        photo_url,
    }))
}

#[delete("/api/clashes/{id}")]
async fn api_delete_clash(state: AppState, path: Path<Uuid>) -> Result<HttpResponse, TournamentError> {
    state.league.delete_clash(path.into_inner()).await?;
    Ok(success())
}

#[get("/api/leaderboard")]
async fn api_leaderboard(state: AppState, query: Query<LeaderboardQuery>) -> Result<HttpResponse, TournamentError> {
    Ok(HttpResponse::Ok().json(state.league.leaderboard(query.pool.as_deref()).await?))
}

#[get("/api/pool-status/{pool}")]
async fn api_pool_status(state: AppState, path: Path<String>) -> Result<HttpResponse, TournamentError> {
    Ok(HttpResponse::Ok().json(state.league.pool_status(&path).await?))
}

#[post("/api/knockouts/generate-semifinals")]
async fn api_generate_semifinals(state: AppState) -> Result<HttpResponse, TournamentError> {
    let semis = state.league.generate_semifinals().await?;
    Ok(HttpResponse::Ok().json(KnockoutResponse {
        message: "Semi-finals generated successfully",
        clashes: semis.into_iter().map(|c| c.clash_name).collect(),
    }))
}

#[post("/api/knockouts/generate-finals")]
async fn api_generate_finals(state: AppState) -> Result<HttpResponse, TournamentError> {
    let finals = state.league.generate_finals().await?;
    Ok(HttpResponse::Ok().json(KnockoutResponse {
        message: "Finals generated successfully",
        clashes: finals.into_iter().map(|c| c.clash_name).collect(),
    }))
}

#[post("/api/notifications")]
async fn api_create_notification(
    state: AppState,
    body: Json<NewNotification>,
) -> Result<HttpResponse, TournamentError> {
    let notification = state.league.create_notification(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(notification))
}

#[get("/api/notifications")]
async fn api_get_notifications(state: AppState) -> Result<HttpResponse, TournamentError> {
    Ok(HttpResponse::Ok().json(state.league.notifications().await?))
}

/// Malformed bodies are rejected with the same `{"error": ...}` shape as domain errors.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(serde_json::json!({ "error": message })),
        )
        .into()
    })
}

/// Register every route. The caller supplies `Data<AppContext>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(web::PayloadConfig::new(MAX_PHOTO_BYTES))
        .service(api_health)
        .service(api_admin_login)
        .service(api_create_team)
        .service(api_get_teams)
        .service(api_get_team)
        .service(api_update_team)
        .service(api_delete_team)
        .service(api_create_player)
        .service(api_get_players)
        .service(api_get_player_pairs)
        .service(api_get_player)
        .service(api_update_player)
        .service(api_delete_player)
        .service(api_generate_fixtures)
        .service(api_create_clash)
        .service(api_get_clashes)
        .service(api_get_clash)
        .service(api_submit_score)
        .service(api_upload_photo)
        .service(api_delete_clash)
        .service(api_leaderboard)
        .service(api_pool_status)
        .service(api_generate_semifinals)
        .service(api_generate_finals)
        .service(api_create_notification)
        .service(api_get_notifications);
}
