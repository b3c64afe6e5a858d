//! Shared helpers for the HTTP integration tests.
//!
//! Every test builds the router through [`build_app_router`] so it exercises
//! the same middleware stack as the binary.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use janasamparka_api::auth::jwt::{generate_access_token, JwtConfig};
use janasamparka_api::auth::password::hash_password;
use janasamparka_api::config::ServerConfig;
use janasamparka_api::router::build_app_router;
use janasamparka_api::state::AppState;
use janasamparka_core::complaint::{AssignmentType, Priority};
use janasamparka_core::roles::Role;
use janasamparka_db::models::complaint::{Complaint, CreateComplaint};
use janasamparka_db::models::jurisdiction::CreateUnit;
use janasamparka_db::models::user::{CreateUser, User};
use janasamparka_db::repositories::{ComplaintRepo, JurisdictionRepo, UserRepo};
use janasamparka_events::EventBus;
use sqlx::PgPool;
use tower::ServiceExt;

/// Plaintext password given to every seeded user.
pub const TEST_PASSWORD: &str = "test_password_123!";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router against `pool`.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_bus(pool, Arc::new(EventBus::default()))
}

/// Same as [`build_test_app`], publishing to a bus the test can subscribe to.
pub fn build_test_app_with_bus(pool: PgPool, event_bus: Arc<EventBus>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus,
    };
    build_app_router(state, &config)
}

/// Mint an access token for `user` signed with the test secret.
pub fn token_for(user: &User) -> String {
    let role: Role = user.role.parse().unwrap();
    generate_access_token(user.id, role, &test_config().jwt).unwrap()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::get(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Seed data
// ---------------------------------------------------------------------------

/// One constituency with a ward, two departments and a full panchayat chain,
/// an officer for each unit, a citizen, and a moderator. A second
/// constituency has its own moderator.
pub struct World {
    pub constituency_id: i64,
    pub ward_id: i64,
    pub department_id: i64,
    pub other_department_id: i64,
    pub zilla_id: i64,
    pub taluk_id: i64,
    pub gram_panchayat_id: i64,
    pub citizen: User,
    pub ward_officer: User,
    pub department_officer: User,
    pub gp_officer: User,
    pub tp_officer: User,
    pub zp_officer: User,
    pub moderator: User,
    pub admin: User,
    pub other_constituency_id: i64,
    pub other_moderator: User,
}

fn unit(constituency_id: i64, name: &str, parent_id: Option<i64>) -> CreateUnit {
    CreateUnit {
        constituency_id,
        name: name.to_string(),
        code: None,
        number: None,
        parent_id,
    }
}

async fn create_unit(pool: &PgPool, kind: AssignmentType, input: CreateUnit) -> i64 {
    JurisdictionRepo::create_unit(pool, kind, &input).await.unwrap()
}

/// Insert a user with [`TEST_PASSWORD`]; `input` supplies the unit bindings.
pub async fn create_user(pool: &PgPool, username: &str, role: Role, input: CreateUser) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
            role: role.as_str().to_string(),
            ..input
        },
    )
    .await
    .unwrap()
}

pub async fn seed_world(pool: &PgPool) -> World {
    let constituency = JurisdictionRepo::create_constituency(pool, "Puttur", "PTR")
        .await
        .unwrap();
    let c = constituency.id;

    let ward_id = create_unit(pool, AssignmentType::Ward, unit(c, "Ward 1", None)).await;
    let department_id =
        create_unit(pool, AssignmentType::Department, unit(c, "Public Works", None)).await;
    let other_department_id =
        create_unit(pool, AssignmentType::Department, unit(c, "Water Supply", None)).await;
    let zilla_id = create_unit(
        pool,
        AssignmentType::ZillaPanchayat,
        unit(c, "Dakshina Kannada ZP", None),
    )
    .await;
    let taluk_id = create_unit(
        pool,
        AssignmentType::TalukPanchayat,
        unit(c, "Puttur TP", Some(zilla_id)),
    )
    .await;
    let gram_panchayat_id = create_unit(
        pool,
        AssignmentType::GramPanchayat,
        unit(c, "Kabaka GP", Some(taluk_id)),
    )
    .await;

    let citizen = create_user(
        pool,
        "citizen",
        Role::Citizen,
        CreateUser {
            constituency_id: Some(c),
            ..Default::default()
        },
    )
    .await;
    let ward_officer = create_user(
        pool,
        "ward_officer",
        Role::WardOfficer,
        CreateUser {
            constituency_id: Some(c),
            ward_id: Some(ward_id),
            ..Default::default()
        },
    )
    .await;
    let department_officer = create_user(
        pool,
        "dept_officer",
        Role::DepartmentOfficer,
        CreateUser {
            constituency_id: Some(c),
            department_id: Some(department_id),
            ..Default::default()
        },
    )
    .await;
    let gp_officer = create_user(
        pool,
        "gp_officer",
        Role::GpOfficer,
        CreateUser {
            constituency_id: Some(c),
            gram_panchayat_id: Some(gram_panchayat_id),
            ..Default::default()
        },
    )
    .await;
    let tp_officer = create_user(
        pool,
        "tp_officer",
        Role::TpOfficer,
        CreateUser {
            constituency_id: Some(c),
            taluk_panchayat_id: Some(taluk_id),
            ..Default::default()
        },
    )
    .await;
    let zp_officer = create_user(
        pool,
        "zp_officer",
        Role::ZpOfficer,
        CreateUser {
            constituency_id: Some(c),
            zilla_panchayat_id: Some(zilla_id),
            ..Default::default()
        },
    )
    .await;
    let moderator = create_user(
        pool,
        "moderator",
        Role::Moderator,
        CreateUser {
            constituency_id: Some(c),
            ..Default::default()
        },
    )
    .await;
    let admin = create_user(pool, "admin", Role::Admin, CreateUser::default()).await;

    let other = JurisdictionRepo::create_constituency(pool, "Sullia", "SUL")
        .await
        .unwrap();
    let other_moderator = create_user(
        pool,
        "other_moderator",
        Role::Moderator,
        CreateUser {
            constituency_id: Some(other.id),
            ..Default::default()
        },
    )
    .await;

    World {
        constituency_id: c,
        ward_id,
        department_id,
        other_department_id,
        zilla_id,
        taluk_id,
        gram_panchayat_id,
        citizen,
        ward_officer,
        department_officer,
        gp_officer,
        tp_officer,
        zp_officer,
        moderator,
        admin,
        other_constituency_id: other.id,
        other_moderator,
    }
}

/// File a complaint for the world's citizen directly through the repository.
pub async fn file_complaint(
    pool: &PgPool,
    world: &World,
    ward_id: Option<i64>,
    gram_panchayat_id: Option<i64>,
) -> Complaint {
    ComplaintRepo::create(
        pool,
        &CreateComplaint {
            constituency_id: world.constituency_id,
            user_id: world.citizen.id,
            title: "Broken streetlight".to_string(),
            description: "Streetlight out near the bus stand for a week".to_string(),
            category: Some("electricity".to_string()),
            location_text: None,
            priority: Priority::Medium,
            ward_id,
            gram_panchayat_id,
        },
    )
    .await
    .unwrap()
}
