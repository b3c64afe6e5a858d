//! Integration tests for complaint persistence and the status workflow.
//!
//! Exercises the repository layer against a real database:
//! - Filing a complaint writes the initial status log entry
//! - Each applied transition appends exactly one log entry
//! - Work approval and work rejection update the lifecycle columns
//! - Ownership changes leave the status untouched
//! - Listing filters

use assert_matches::assert_matches;
use chrono::Utc;
use janasamparka_core::complaint::{AssignmentType, ComplaintStatus, Priority};
use janasamparka_core::jurisdiction::AssignmentChange;
use janasamparka_core::roles::Role;
use janasamparka_core::workflow::{TransitionRequest, WorkflowValidator};
use janasamparka_db::models::complaint::{Complaint, CreateComplaint};
use janasamparka_db::models::jurisdiction::CreateUnit;
use janasamparka_db::models::user::{CreateUser, User};
use janasamparka_db::repositories::{
    ComplaintFilter, ComplaintRepo, JurisdictionRepo, StatusLogRepo, UserRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Fixture {
    constituency_id: i64,
    ward_id: i64,
    department_id: i64,
    citizen: User,
    officer: User,
    admin: User,
}

fn unit(constituency_id: i64, name: &str) -> CreateUnit {
    CreateUnit {
        constituency_id,
        name: name.to_string(),
        code: None,
        number: None,
        parent_id: None,
    }
}

async fn new_user(pool: &PgPool, username: &str, role: Role, input: CreateUser) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "not-a-real-hash".to_string(),
            role: role.as_str().to_string(),
            ..input
        },
    )
    .await
    .unwrap()
}

async fn seed(pool: &PgPool) -> Fixture {
    let constituency = JurisdictionRepo::create_constituency(pool, "Puttur", "PTR")
        .await
        .unwrap();
    let ward_id = JurisdictionRepo::create_unit(
        pool,
        AssignmentType::Ward,
        &unit(constituency.id, "Ward 1"),
    )
    .await
    .unwrap();
    let department_id = JurisdictionRepo::create_unit(
        pool,
        AssignmentType::Department,
        &unit(constituency.id, "Public Works"),
    )
    .await
    .unwrap();

    let citizen = new_user(
        pool,
        "citizen",
        Role::Citizen,
        CreateUser {
            constituency_id: Some(constituency.id),
            ..Default::default()
        },
    )
    .await;
    let officer = new_user(
        pool,
        "ward_officer",
        Role::WardOfficer,
        CreateUser {
            constituency_id: Some(constituency.id),
            ward_id: Some(ward_id),
            ..Default::default()
        },
    )
    .await;
    let admin = new_user(pool, "admin", Role::Admin, CreateUser::default()).await;

    Fixture {
        constituency_id: constituency.id,
        ward_id,
        department_id,
        citizen,
        officer,
        admin,
    }
}

fn new_complaint(fx: &Fixture, title: &str) -> CreateComplaint {
    CreateComplaint {
        constituency_id: fx.constituency_id,
        user_id: fx.citizen.id,
        title: title.to_string(),
        description: "Streetlight out near the bus stand".to_string(),
        category: Some("electricity".to_string()),
        location_text: None,
        priority: Priority::High,
        ward_id: Some(fx.ward_id),
        gram_panchayat_id: None,
    }
}

/// Run one transition the way the API does: lock, plan, apply, commit.
async fn transition(
    pool: &PgPool,
    id: i64,
    target: ComplaintStatus,
    role: Role,
    changed_by: i64,
    note: Option<&str>,
) -> Complaint {
    let mut tx = pool.begin().await.unwrap();
    let current = ComplaintRepo::find_for_update(&mut tx, id)
        .await
        .unwrap()
        .expect("complaint exists");
    let plan = WorkflowValidator::plan_transition(
        TransitionRequest {
            current: current.status().unwrap(),
            target,
            role,
            note,
            rejection_reason: None,
        },
        Utc::now(),
    )
    .unwrap();
    let updated = ComplaintRepo::apply_transition(&mut tx, &current, &plan, changed_by)
        .await
        .unwrap();
    tx.commit().await.unwrap();
    updated
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_writes_initial_log(pool: PgPool) {
    let fx = seed(&pool).await;
    let complaint = ComplaintRepo::create(&pool, &new_complaint(&fx, "Streetlight"))
        .await
        .unwrap();

    assert_eq!(complaint.status().unwrap(), ComplaintStatus::Submitted);
    assert_eq!(complaint.priority().unwrap(), Priority::High);
    assert_eq!(
        complaint.owner().unwrap(),
        Some((AssignmentType::Ward, fx.ward_id))
    );
    assert!(complaint.assigned_at.is_none());

    let logs = StatusLogRepo::list_for_complaint(&pool, complaint.id)
        .await
        .unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].old_status, None);
    assert_eq!(logs[0].new_status, "submitted");
    assert_eq!(logs[0].changed_by, Some(fx.citizen.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn each_transition_appends_one_log(pool: PgPool) {
    let fx = seed(&pool).await;
    let complaint = ComplaintRepo::create(&pool, &new_complaint(&fx, "Pothole"))
        .await
        .unwrap();

    let assigned = transition(
        &pool,
        complaint.id,
        ComplaintStatus::Assigned,
        Role::WardOfficer,
        fx.officer.id,
        None,
    )
    .await;
    assert_eq!(assigned.status, "assigned");
    assert!(assigned.assigned_at.is_some());

    let started = transition(
        &pool,
        complaint.id,
        ComplaintStatus::InProgress,
        Role::WardOfficer,
        fx.officer.id,
        Some("Crew dispatched"),
    )
    .await;
    assert_eq!(started.status, "in_progress");
    assert_eq!(started.assigned_at, assigned.assigned_at);

    let logs = StatusLogRepo::list_for_complaint(&pool, complaint.id)
        .await
        .unwrap();
    assert_eq!(logs.len(), 3);
    assert_eq!(logs[1].old_status.as_deref(), Some("submitted"));
    assert_eq!(logs[1].new_status, "assigned");
    assert_eq!(logs[1].note.as_deref(), Some("Complaint assigned for action"));
    assert_eq!(logs[2].old_status.as_deref(), Some("assigned"));
    assert_eq!(logs[2].new_status, "in_progress");
    assert_eq!(logs[2].note.as_deref(), Some("Crew dispatched"));
    assert_eq!(logs[2].changed_by, Some(fx.officer.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn approval_closes_and_records_approver(pool: PgPool) {
    let fx = seed(&pool).await;
    let complaint = ComplaintRepo::create(&pool, &new_complaint(&fx, "Drain"))
        .await
        .unwrap();
    for target in [
        ComplaintStatus::Assigned,
        ComplaintStatus::InProgress,
        ComplaintStatus::Resolved,
    ] {
        transition(&pool, complaint.id, target, Role::WardOfficer, fx.officer.id, None).await;
    }

    let mut tx = pool.begin().await.unwrap();
    let current = ComplaintRepo::find_for_update(&mut tx, complaint.id)
        .await
        .unwrap()
        .unwrap();
    assert!(current.resolved_at.is_some());
    let plan = WorkflowValidator::plan_approval(
        current.status().unwrap(),
        Role::Admin,
        Some("Verified on site"),
        Utc::now(),
    )
    .unwrap();
    let closed = ComplaintRepo::apply_transition(&mut tx, &current, &plan, fx.admin.id)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(closed.status, "closed");
    assert_eq!(closed.work_approved, Some(true));
    assert_eq!(closed.approved_by, Some(fx.admin.id));
    assert!(closed.closed_at.is_some());
    assert_eq!(closed.approved_at, closed.closed_at);
    assert_eq!(closed.resolved_at, current.resolved_at);

    let count = StatusLogRepo::count_for_complaint(&pool, complaint.id)
        .await
        .unwrap();
    assert_eq!(count, 5);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn work_rejection_reopens(pool: PgPool) {
    let fx = seed(&pool).await;
    let complaint = ComplaintRepo::create(&pool, &new_complaint(&fx, "Water leak"))
        .await
        .unwrap();
    for target in [
        ComplaintStatus::Assigned,
        ComplaintStatus::InProgress,
        ComplaintStatus::Resolved,
    ] {
        transition(&pool, complaint.id, target, Role::WardOfficer, fx.officer.id, None).await;
    }

    let mut tx = pool.begin().await.unwrap();
    let current = ComplaintRepo::find_for_update(&mut tx, complaint.id)
        .await
        .unwrap()
        .unwrap();
    let plan = WorkflowValidator::plan_work_rejection(
        current.status().unwrap(),
        Role::Mla,
        "Pipe still leaking",
        Utc::now(),
    )
    .unwrap();
    let reopened = ComplaintRepo::apply_transition(&mut tx, &current, &plan, fx.admin.id)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(reopened.status, "in_progress");
    assert_eq!(reopened.resolved_at, None);
    assert_eq!(reopened.work_approved, Some(false));
    assert_eq!(reopened.rejection_reason.as_deref(), Some("Pipe still leaking"));
    assert_eq!(reopened.approved_by, None);

    let logs = StatusLogRepo::list_for_complaint(&pool, complaint.id)
        .await
        .unwrap();
    let last = logs.last().unwrap();
    assert_eq!(last.old_status.as_deref(), Some("resolved"));
    assert_eq!(last.new_status, "in_progress");
    assert_eq!(last.note.as_deref(), Some("Pipe still leaking"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn assignment_change_keeps_status(pool: PgPool) {
    let fx = seed(&pool).await;
    let complaint = ComplaintRepo::create(&pool, &new_complaint(&fx, "Garbage"))
        .await
        .unwrap();

    let mut tx = pool.begin().await.unwrap();
    let moved = ComplaintRepo::apply_assignment(
        &mut tx,
        complaint.id,
        &AssignmentChange {
            assignment_type: AssignmentType::Department,
            unit_id: fx.department_id,
        },
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(moved.status, "submitted");
    assert_eq!(
        moved.owner().unwrap(),
        Some((AssignmentType::Department, fx.department_id))
    );
    // The previous unit link is kept for history.
    assert_eq!(moved.ward_id, Some(fx.ward_id));

    let count = StatusLogRepo::count_for_complaint(&pool, complaint.id)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_status_and_owner(pool: PgPool) {
    let fx = seed(&pool).await;
    let first = ComplaintRepo::create(&pool, &new_complaint(&fx, "First"))
        .await
        .unwrap();
    let second = ComplaintRepo::create(&pool, &new_complaint(&fx, "Second"))
        .await
        .unwrap();
    transition(
        &pool,
        second.id,
        ComplaintStatus::Assigned,
        Role::WardOfficer,
        fx.officer.id,
        None,
    )
    .await;

    let all = ComplaintRepo::list(
        &pool,
        &ComplaintFilter {
            constituency_id: Some(fx.constituency_id),
            ..Default::default()
        },
        25,
        0,
    )
    .await
    .unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, second.id, "newest first");

    let submitted = ComplaintRepo::list(
        &pool,
        &ComplaintFilter {
            status: Some(ComplaintStatus::Submitted),
            owner: Some((AssignmentType::Ward, fx.ward_id)),
            ..Default::default()
        },
        25,
        0,
    )
    .await
    .unwrap();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].id, first.id);

    let by_department = ComplaintRepo::list(
        &pool,
        &ComplaintFilter {
            owner: Some((AssignmentType::Department, fx.department_id)),
            ..Default::default()
        },
        25,
        0,
    )
    .await
    .unwrap();
    assert!(by_department.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_status_is_rejected_by_check_constraint(pool: PgPool) {
    let fx = seed(&pool).await;
    let complaint = ComplaintRepo::create(&pool, &new_complaint(&fx, "Noise"))
        .await
        .unwrap();

    let result = sqlx::query("UPDATE complaints SET status = 'pending' WHERE id = $1")
        .bind(complaint.id)
        .execute(&pool)
        .await;
    assert_matches!(result, Err(sqlx::Error::Database(e)) if e.constraint() == Some("ck_complaints_status"));
}
