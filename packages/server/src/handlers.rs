//! HTTP handler functions for the RO-PE API.

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, Scope, web};
use chrono::Utc;
use rope_auth::{AuthError, Identity};
use rope_occurrence_models::{GeoPoint, NewOccurrence, OccurrenceType};
use rope_query::{OccurrenceFilter, RawOccurrenceQuery};
use rope_server_models::{
    ApiError, ApiHealth, ApiOccurrence, AuthResponse, CreateOccurrenceRequest, LoginRequest,
    RegisterRequest,
};

use crate::AppState;

/// Builds the `/api` route scope.
pub fn api_scope() -> Scope {
    web::scope("/api")
        .route("/health", web::get().to(health))
        .route("/occurrences", web::get().to(list_occurrences))
        .route("/occurrences", web::post().to(create_occurrence))
        .route("/auth/register", web::post().to(register))
        .route("/auth/login", web::post().to(login))
}

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        occurrences: state.store.len(),
    })
}

/// `GET /api/occurrences`
///
/// Lists occurrences filtered by type, trailing time window, and
/// geographic radius. The evaluation instant is captured once per request
/// so all window math within it is self-consistent.
pub async fn list_occurrences(
    state: web::Data<AppState>,
    params: web::Query<RawOccurrenceQuery>,
) -> HttpResponse {
    let filter = match OccurrenceFilter::from_raw(&params, Utc::now()) {
        Ok(filter) => filter,
        Err(e) => {
            return HttpResponse::BadRequest().json(ApiError::new(e));
        }
    };

    let results: Vec<ApiOccurrence> = state
        .store
        .search(&filter)
        .into_iter()
        .map(ApiOccurrence::from)
        .collect();

    HttpResponse::Ok().json(results)
}

/// `POST /api/occurrences`
///
/// Creates a new occurrence report. Requires a bearer token.
pub async fn create_occurrence(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<CreateOccurrenceRequest>,
) -> HttpResponse {
    let Some(identity) = caller_identity(&state, &req) else {
        return HttpResponse::Unauthorized().json(ApiError::new("missing or invalid token"));
    };

    let body = body.into_inner();

    let Ok(occurrence_type) = body.occurrence_type.parse::<OccurrenceType>() else {
        return HttpResponse::BadRequest().json(ApiError::new(format!(
            "unknown occurrence type {:?}",
            body.occurrence_type
        )));
    };

    let location = match GeoPoint::new(body.lng, body.lat) {
        Ok(location) => location,
        Err(e) => {
            return HttpResponse::BadRequest().json(ApiError::new(e));
        }
    };

    let new = NewOccurrence {
        occurrence_type,
        description: body.description,
        location,
        photo_url: body.photo_url,
    };

    if let Err(e) = new.validate(&state.config.description_policy) {
        return HttpResponse::BadRequest().json(ApiError::new(e));
    }

    let created = state.store.insert(new, Utc::now());
    log::info!(
        "{} reported a {} occurrence at [{}, {}]",
        identity.email,
        created.occurrence_type,
        created.location.longitude(),
        created.location.latitude()
    );

    HttpResponse::Created().json(ApiOccurrence::from(created))
}

/// `POST /api/auth/register`
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> HttpResponse {
    match state.auth.register(&body.name, &body.email, &body.password) {
        Ok(session) => HttpResponse::Created().json(AuthResponse::from(session)),
        Err(e @ AuthError::EmailTaken) => HttpResponse::Conflict().json(ApiError::new(e)),
        Err(e) => HttpResponse::BadRequest().json(ApiError::new(e)),
    }
}

/// `POST /api/auth/login`
pub async fn login(state: web::Data<AppState>, body: web::Json<LoginRequest>) -> HttpResponse {
    match state.auth.login(&body.email, &body.password) {
        Ok(session) => HttpResponse::Ok().json(AuthResponse::from(session)),
        Err(e) => HttpResponse::Unauthorized().json(ApiError::new(e)),
    }
}

/// Resolves the caller's bearer token to an identity, if any.
fn caller_identity(state: &AppState, req: &HttpRequest) -> Option<Identity> {
    let token = bearer_token(req)?;
    state.auth.authenticate(token)
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
fn bearer_token(req: &HttpRequest) -> Option<&str> {
    let header = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}
