// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::path::Path;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode},
};
use gymhours::{Applications, Clock, FixedClock, Observability, Repositories};
use gymhours_domain::{FactoryConfig, HourFactory};
use gymhours_persistence::{Persistence, PersistenceOptions};
use serde_json::Value;
use time::OffsetDateTime;
use time::macros::datetime;
use tower::ServiceExt;

use crate::session::{USER_ID_HEADER, USER_NAME_HEADER, USER_ROLE_HEADER};
use crate::{AppState, build_router};

/// Monday 2025-11-24, 09:30 UTC.
pub const NOW: OffsetDateTime = datetime!(2025-11-24 09:30 UTC);

pub const HOUR: &str = "2025-12-01T13:00:00Z";
pub const OTHER_HOUR: &str = "2025-12-01T15:00:00Z";

pub const TRAINER: Caller = Caller {
    id: "trainer-1",
    role: "trainer",
    name: "Trainer",
};
pub const ATTENDEE: Caller = Caller {
    id: "attendee-1",
    role: "attendee",
    name: "Mariusz",
};

/// Identity forwarded by the proxy.
#[derive(Debug, Clone, Copy)]
pub struct Caller {
    pub id: &'static str,
    pub role: &'static str,
    pub name: &'static str,
}

fn app_state(persistence: Persistence, clock: &Arc<FixedClock>) -> AppState {
    let apps = Applications::new(
        &Repositories::from_store(&Arc::new(persistence)),
        Arc::clone(clock) as Arc<dyn Clock>,
        &Observability::disabled(),
    );
    AppState {
        apps,
        clock: Arc::clone(clock) as Arc<dyn Clock>,
    }
}

fn factory() -> HourFactory {
    HourFactory::new(FactoryConfig::default()).expect("default config is valid")
}

/// A router over fresh in-memory stores.
pub fn create_test_app() -> Router {
    let clock = Arc::new(FixedClock::new(NOW));
    let persistence = Persistence::new_in_memory(
        factory(),
        Arc::clone(&clock) as Arc<dyn Clock>,
        PersistenceOptions::default(),
    )
    .expect("in-memory stores open");
    build_router(app_state(persistence, &clock))
}

/// A router over file stores in `dir`.
pub fn create_test_app_in(dir: &Path) -> Router {
    let clock = Arc::new(FixedClock::new(NOW));
    let persistence = Persistence::new_with_dir(
        dir,
        factory(),
        Arc::clone(&clock) as Arc<dyn Clock>,
        PersistenceOptions {
            pool_size: 24,
            ..PersistenceOptions::default()
        },
    )
    .expect("file stores open");
    build_router(app_state(persistence, &clock))
}

/// Sends one request as `caller`, with an optional JSON body.
pub async fn send(
    app: &Router,
    caller: Option<Caller>,
    method: &str,
    uri: &str,
    body: Option<&Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(caller) = caller {
        builder = builder
            .header(USER_ID_HEADER, caller.id)
            .header(USER_ROLE_HEADER, caller.role)
            .header(USER_NAME_HEADER, caller.name);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_string(json).unwrap())
        }
        None => Body::empty(),
    };
    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

/// Reads a JSON response body.
pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Asserts the status and error slug of a failed request.
pub async fn assert_error(response: Response<Body>, status: StatusCode, slug: &str) -> Value {
    assert_eq!(response.status(), status);
    let body = json_body(response).await;
    assert_eq!(body["error"], Value::Bool(true));
    assert_eq!(body["slug"], slug);
    body
}

/// Registers the attendee and opens both test hours.
pub async fn open_calendar(app: &Router, balance: i64) {
    let response = send(
        app,
        Some(TRAINER),
        "POST",
        "/users",
        Some(&serde_json::json!({
            "user_uuid": ATTENDEE.id,
            "role": "attendee",
            "display_name": ATTENDEE.name,
            "balance": balance,
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(
        app,
        Some(TRAINER),
        "PUT",
        "/trainer/calendar/make-hours-available",
        Some(&serde_json::json!({ "hours": [HOUR, OTHER_HOUR] })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

/// Books `time` as the attendee, returning the training id.
pub async fn book(app: &Router, time: &str) -> String {
    let response = send(
        app,
        Some(ATTENDEE),
        "POST",
        "/trainings",
        Some(&serde_json::json!({ "time": time, "notes": "legs" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response).await["training_uuid"]
        .as_str()
        .unwrap()
        .to_string()
}
