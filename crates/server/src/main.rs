// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod config;
mod session;

#[cfg(test)]
mod tests;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use clap::Parser;
use gymhours::{Applications, Clock, NoOpMetrics, Observability, Repositories, SystemClock};
use gymhours_api::{
    ApiError, AvailableHoursRequest, CreateUserRequest, CreateUserResponse, CurrentUserResponse,
    DateResponse, HourAvailabilityRequest, HourAvailabilityResponse, HourUpdateRequest,
    PostTrainingRequest, PostTrainingResponse, RescheduleTrainingRequest, TrainingsResponse,
    UpdateTrainingBalanceRequest, approve_training_reschedule, cancel_training, create_training,
    create_user, get_current_user, get_hour_availability, get_trainer_available_hours,
    get_trainings, make_hours_available, make_hours_unavailable, reject_training_reschedule,
    request_training_reschedule, reschedule_training, update_training_balance,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::{Args, ServerConfig};
use crate::session::SessionUser;

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    apps: Applications,
    clock: Arc<dyn Clock>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct HealthResponse {
    status: String,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Stable identifier of the failure.
    slug: String,
    /// Error message.
    message: String,
    /// Whether the same request may succeed later.
    retryable: bool,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    status: StatusCode,
    slug: String,
    message: String,
    retryable: bool,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            slug: self.slug,
            message: self.message,
            retryable: self.retryable,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } | ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::InvalidInput { .. } | ApiError::DomainRuleViolation { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!(error = %err, "Request failed");
        } else {
            debug!(error = %err, "Request rejected");
        }

        Self {
            status,
            slug: err.slug().to_string(),
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }
}

/// Runs a synchronous API call on the blocking pool.
async fn run_blocking<T, F>(work: F) -> Result<T, HttpError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(result) => result.map_err(HttpError::from),
        Err(e) => {
            error!(error = %e, "Blocking task failed");
            Err(HttpError::from(ApiError::Internal {
                message: String::from("request task failed"),
            }))
        }
    }
}

/// Handler for GET `/health`.
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: String::from("ok"),
    })
}

/// Handler for GET `/trainer/calendar`.
async fn handle_get_calendar(
    AxumState(app_state): AxumState<AppState>,
    _session: SessionUser,
    Query(req): Query<AvailableHoursRequest>,
) -> Result<Json<Vec<DateResponse>>, HttpError> {
    let dates = run_blocking(move || get_trainer_available_hours(&app_state.apps, &req)).await?;
    Ok(Json(dates))
}

/// Handler for GET `/trainer/calendar/hour`.
async fn handle_get_hour_availability(
    AxumState(app_state): AxumState<AppState>,
    _session: SessionUser,
    Query(req): Query<HourAvailabilityRequest>,
) -> Result<Json<HourAvailabilityResponse>, HttpError> {
    let response = run_blocking(move || get_hour_availability(&app_state.apps, &req)).await?;
    Ok(Json(response))
}

/// Handler for PUT `/trainer/calendar/make-hours-available`.
async fn handle_make_hours_available(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { user, .. }: SessionUser,
    Json(req): Json<HourUpdateRequest>,
) -> Result<StatusCode, HttpError> {
    info!(trainer = user.uuid(), hours = req.hours.len(), "Handling make_hours_available");
    run_blocking(move || make_hours_available(&app_state.apps, &user, &req)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for PUT `/trainer/calendar/make-hours-unavailable`.
async fn handle_make_hours_unavailable(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { user, .. }: SessionUser,
    Json(req): Json<HourUpdateRequest>,
) -> Result<StatusCode, HttpError> {
    info!(trainer = user.uuid(), hours = req.hours.len(), "Handling make_hours_unavailable");
    run_blocking(move || make_hours_unavailable(&app_state.apps, &user, &req)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET `/trainings`.
async fn handle_get_trainings(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { user, .. }: SessionUser,
) -> Result<Json<TrainingsResponse>, HttpError> {
    let now = app_state.clock.now();
    let trainings = run_blocking(move || get_trainings(&app_state.apps, &user, now)).await?;
    Ok(Json(trainings))
}

/// Handler for POST `/trainings`.
async fn handle_create_training(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { user, .. }: SessionUser,
    Json(req): Json<PostTrainingRequest>,
) -> Result<(StatusCode, Json<PostTrainingResponse>), HttpError> {
    info!(user_uuid = user.uuid(), time = %req.time, "Handling create_training");
    let response = run_blocking(move || create_training(&app_state.apps, &user, &req)).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for DELETE `/trainings/{uuid}`.
async fn handle_cancel_training(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { user, .. }: SessionUser,
    Path(training_uuid): Path<String>,
) -> Result<StatusCode, HttpError> {
    info!(user_uuid = user.uuid(), training_uuid = %training_uuid, "Handling cancel_training");
    run_blocking(move || cancel_training(&app_state.apps, &user, &training_uuid)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for PUT `/trainings/{uuid}/reschedule`.
async fn handle_reschedule_training(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { user, .. }: SessionUser,
    Path(training_uuid): Path<String>,
    Json(req): Json<RescheduleTrainingRequest>,
) -> Result<StatusCode, HttpError> {
    info!(user_uuid = user.uuid(), training_uuid = %training_uuid, "Handling reschedule_training");
    run_blocking(move || reschedule_training(&app_state.apps, &user, &training_uuid, &req))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for PUT `/trainings/{uuid}/request-reschedule`.
async fn handle_request_reschedule(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { user, .. }: SessionUser,
    Path(training_uuid): Path<String>,
    Json(req): Json<RescheduleTrainingRequest>,
) -> Result<StatusCode, HttpError> {
    info!(user_uuid = user.uuid(), training_uuid = %training_uuid, "Handling request_reschedule");
    run_blocking(move || {
        request_training_reschedule(&app_state.apps, &user, &training_uuid, &req)
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for PUT `/trainings/{uuid}/approve-reschedule`.
async fn handle_approve_reschedule(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { user, .. }: SessionUser,
    Path(training_uuid): Path<String>,
) -> Result<StatusCode, HttpError> {
    info!(user_uuid = user.uuid(), training_uuid = %training_uuid, "Handling approve_reschedule");
    run_blocking(move || approve_training_reschedule(&app_state.apps, &user, &training_uuid))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for PUT `/trainings/{uuid}/reject-reschedule`.
async fn handle_reject_reschedule(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { user, .. }: SessionUser,
    Path(training_uuid): Path<String>,
) -> Result<StatusCode, HttpError> {
    info!(user_uuid = user.uuid(), training_uuid = %training_uuid, "Handling reject_reschedule");
    run_blocking(move || reject_training_reschedule(&app_state.apps, &user, &training_uuid))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET `/users/current`.
///
/// Records the caller's address as a side effect.
async fn handle_get_current_user(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { user, remote_ip }: SessionUser,
) -> Result<Json<CurrentUserResponse>, HttpError> {
    let current = run_blocking(move || {
        get_current_user(&app_state.apps, &user, remote_ip.as_deref())
    })
    .await?;
    Ok(Json(current))
}

/// Handler for POST `/users`.
async fn handle_create_user(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { user, .. }: SessionUser,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreateUserResponse>), HttpError> {
    info!(trainer = user.uuid(), role = %req.role, "Handling create_user");
    let response = run_blocking(move || create_user(&app_state.apps, &user, &req)).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for PUT `/users/{uuid}/training-balance`.
async fn handle_update_training_balance(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { user, .. }: SessionUser,
    Path(user_uuid): Path<String>,
    Json(req): Json<UpdateTrainingBalanceRequest>,
) -> Result<StatusCode, HttpError> {
    info!(
        trainer = user.uuid(),
        user_uuid = %user_uuid,
        amount_change = req.amount_change,
        "Handling update_training_balance"
    );
    run_blocking(move || update_training_balance(&app_state.apps, &user, &user_uuid, &req))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/trainer/calendar", get(handle_get_calendar))
        .route("/trainer/calendar/hour", get(handle_get_hour_availability))
        .route(
            "/trainer/calendar/make-hours-available",
            put(handle_make_hours_available),
        )
        .route(
            "/trainer/calendar/make-hours-unavailable",
            put(handle_make_hours_unavailable),
        )
        .route(
            "/trainings",
            get(handle_get_trainings).post(handle_create_training),
        )
        .route("/trainings/{uuid}", delete(handle_cancel_training))
        .route(
            "/trainings/{uuid}/reschedule",
            put(handle_reschedule_training),
        )
        .route(
            "/trainings/{uuid}/request-reschedule",
            put(handle_request_reschedule),
        )
        .route(
            "/trainings/{uuid}/approve-reschedule",
            put(handle_approve_reschedule),
        )
        .route(
            "/trainings/{uuid}/reject-reschedule",
            put(handle_reject_reschedule),
        )
        .route("/users", post(handle_create_user))
        .route("/users/current", get(handle_get_current_user))
        .route(
            "/users/{uuid}/training-balance",
            put(handle_update_training_balance),
        )
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Gym Hours Server");

    let config: ServerConfig = ServerConfig::validate(&args).inspect_err(|e| {
        warn!(error = %e, "Refusing to start");
    })?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    info!(storage = ?config.storage, "Opening stores");
    let persistence = config
        .storage
        .open(config.factory, Arc::clone(&clock), config.persistence)?;
    let store = Arc::new(persistence);

    let observability = Observability::new(tracing::info_span!("gymhours"), Arc::new(NoOpMetrics));
    let apps = Applications::new(
        &Repositories::from_store(&store),
        Arc::clone(&clock),
        &observability,
    );

    let app: Router = build_router(AppState { apps, clock });

    info!("Server listening on {}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
