//! Behavioural tests for the generic data-access operations over the
//! in-memory row store.

use std::sync::Arc;

use clientflow::domain::ports::TableAccess;
use clientflow::domain::{
    DataAccessError, DataAccessService, FieldPolicy, QuerySpec, Row, RowPayload, SortDirection,
    TableName, TableRegistry,
};
use clientflow::test_support::{MutableClock, in_memory_service};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

struct World {
    clock: Arc<MutableClock>,
    service: DataAccessService,
}

#[fixture]
fn world() -> World {
    let clock = Arc::new(MutableClock::at_monday_morning());
    let service = in_memory_service(clock.clone());
    World { clock, service }
}

fn payload(value: Value) -> RowPayload {
    serde_json::from_value(value).expect("object payload")
}

fn id_of(row: &Row) -> String {
    row.get("id")
        .and_then(Value::as_str)
        .expect("string id")
        .to_owned()
}

#[rstest]
#[tokio::test]
async fn acme_scenario_reads_back_in_the_external_vocabulary(world: World) {
    world
        .service
        .insert(
            "clients",
            payload(json!({ "full_name": "Acme Co", "status": "active" })),
        )
        .await
        .expect("insert");

    let rows = world
        .service
        .query("clients", &QuerySpec::new().filter("status", "active"))
        .await
        .expect("query");

    assert_eq!(rows.len(), 1);
    let row = rows.first().expect("one row");
    assert_eq!(row.get("full_name"), Some(&json!("Acme Co")));
    assert!(row.get("fullName").is_none());
}

#[rstest]
fn every_aliased_field_round_trips_through_every_table() {
    let registry = TableRegistry::clientflow().expect("registry");
    for table in TableName::ALL {
        let registered = registry.get(table).expect("registered");
        for (external, internal) in registered.aliases().pairs() {
            let mut row = Row::new();
            row.insert(external.to_owned(), json!("value"));
            let internal_row = registered.aliases().to_internal(row.clone());
            assert!(internal_row.contains_key(internal), "{table}: {external}");
            assert_eq!(registered.aliases().to_external(internal_row), row);
        }
    }
}

#[rstest]
#[tokio::test]
async fn soft_deleted_rows_stay_but_drop_out_of_is_null_queries(world: World) {
    let created = world
        .service
        .insert("budgets", payload(json!({ "client_id": "c-1", "amount": 500 })))
        .await
        .expect("insert");
    let id = id_of(&created);

    world.clock.advance_seconds(60);
    world.service.delete("budgets", &id).await.expect("delete");

    let kept = world.service.get("budgets", &id).await.expect("row kept");
    assert_eq!(kept.get("deleted_at"), Some(&json!("2026-01-05T08:01:00.000000Z")));

    let live = world
        .service
        .query("budgets", &QuerySpec::new().filter("deleted_at", Value::Null))
        .await
        .expect("query");
    assert!(live.is_empty());
}

#[rstest]
#[tokio::test]
async fn hard_deleted_rows_are_gone(world: World) {
    let created = world
        .service
        .insert(
            "timesheets",
            payload(json!({ "employee_id": "e-1", "client_id": "c-1", "hours": 7.5 })),
        )
        .await
        .expect("insert");
    let id = id_of(&created);

    world.service.delete("timesheets", &id).await.expect("delete");

    let err = world
        .service
        .get("timesheets", &id)
        .await
        .expect_err("row removed");
    assert!(matches!(err, DataAccessError::NotFound { .. }));
    let again = world.service.delete("timesheets", &id).await;
    assert!(matches!(again, Err(DataAccessError::NotFound { .. })));
}

#[rstest]
#[tokio::test]
async fn updates_stamp_updated_at_with_the_clock(world: World) {
    let created = world
        .service
        .insert("clients", payload(json!({ "full_name": "Acme Co" })))
        .await
        .expect("insert");
    let id = id_of(&created);
    let before = created.get("updated_at").cloned().expect("defaulted updated_at");

    world.clock.advance_seconds(3_600);
    let updated = world
        .service
        .update("clients", &id, payload(json!({ "status": "paused" })))
        .await
        .expect("update");

    let after = updated.get("updated_at").expect("stamped updated_at");
    assert_ne!(after, &before);
    assert_eq!(after, &json!("2026-01-05T09:00:00.000000Z"));
    assert_eq!(updated.get("status"), Some(&json!("paused")));
}

#[rstest]
#[tokio::test]
async fn upsert_twice_leaves_one_row_with_the_second_payload(world: World) {
    for (score, trend) in [(40, "down"), (82, "up")] {
        world
            .service
            .upsert(
                "health_scores",
                payload(json!({ "client_id": "c-9", "score": score, "trend": trend })),
                Some("client_id"),
            )
            .await
            .expect("upsert");
    }

    let rows = world
        .service
        .query("health_scores", &QuerySpec::new())
        .await
        .expect("query");
    assert_eq!(rows.len(), 1);
    let row = rows.first().expect("one row");
    assert_eq!(row.get("score"), Some(&json!(82)));
    assert_eq!(row.get("trend"), Some(&json!("up")));
}

#[rstest]
#[tokio::test]
async fn partial_upserts_keep_the_fields_they_omit(world: World) {
    world
        .service
        .upsert(
            "health_scores",
            payload(json!({ "client_id": "c-9", "score": 40, "trend": "down" })),
            Some("client_id"),
        )
        .await
        .expect("first upsert");

    let merged = world
        .service
        .upsert(
            "health_scores",
            payload(json!({ "client_id": "c-9", "trend": "up" })),
            Some("client_id"),
        )
        .await
        .expect("partial upsert");

    assert_eq!(merged.get("score"), Some(&json!(40)));
    assert_eq!(merged.get("trend"), Some(&json!("up")));
}

#[rstest]
#[tokio::test]
async fn updating_a_missing_row_is_not_found(world: World) {
    let err = world
        .service
        .update(
            "clients",
            "00000000-0000-0000-0000-000000000000",
            payload(json!({ "status": "paused" })),
        )
        .await
        .expect_err("no such client");

    assert_eq!(
        err,
        DataAccessError::not_found("clients", "00000000-0000-0000-0000-000000000000")
    );
}

#[rstest]
#[tokio::test]
async fn filters_are_conjunctive(world: World) {
    for (name, status, industry) in [
        ("Acme Co", "active", "retail"),
        ("Globex", "active", "energy"),
        ("Initech", "churned", "retail"),
    ] {
        world
            .service
            .insert(
                "clients",
                payload(json!({ "full_name": name, "status": status, "industry": industry })),
            )
            .await
            .expect("insert");
    }

    let rows = world
        .service
        .query(
            "clients",
            &QuerySpec::new()
                .filter("status", "active")
                .filter("industry", "retail"),
        )
        .await
        .expect("query");

    let names: Vec<_> = rows.iter().filter_map(|row| row.get("full_name")).collect();
    assert_eq!(names, vec![&json!("Acme Co")]);
}

#[rstest]
#[tokio::test]
async fn sort_and_limit_shape_the_result(world: World) {
    for name in ["Bravo", "Alpha", "Charlie"] {
        world
            .service
            .insert("clients", payload(json!({ "full_name": name })))
            .await
            .expect("insert");
    }

    let rows = world
        .service
        .query(
            "clients",
            &QuerySpec::new()
                .sort_by("full_name", SortDirection::Desc)
                .limit(2),
        )
        .await
        .expect("query");

    let names: Vec<_> = rows.iter().filter_map(|row| row.get("full_name")).collect();
    assert_eq!(names, vec![&json!("Charlie"), &json!("Bravo")]);
}

#[rstest]
#[case("invoices")]
#[case("Clients")]
#[case("")]
#[tokio::test]
async fn unknown_tables_are_rejected_before_the_store(world: World, #[case] table: &str) {
    let err = world
        .service
        .query(table, &QuerySpec::new())
        .await
        .expect_err("unknown table");
    assert_eq!(
        err,
        DataAccessError::UnknownTable {
            name: table.to_owned()
        }
    );
}

#[rstest]
#[tokio::test]
async fn strict_policy_rejects_undeclared_fields(world: World) {
    let strict = world.service.clone().with_policy(FieldPolicy::Strict);

    let err = strict
        .insert("clients", payload(json!({ "full_name": "Acme Co", "nickname": "A" })))
        .await
        .expect_err("unmapped field");
    assert_eq!(err, DataAccessError::unmapped_field("clients", "nickname"));

    let lenient = world
        .service
        .insert("clients", payload(json!({ "full_name": "Acme Co", "nickname": "A" })))
        .await
        .expect("lenient insert");
    assert!(lenient.get("nickname").is_none());
}

#[rstest]
#[tokio::test]
async fn profiles_are_addressed_by_user_id(world: World) {
    world
        .service
        .insert(
            "profiles",
            payload(json!({ "user_id": "u-1", "email": "ada@example.com" })),
        )
        .await
        .expect("insert");

    let updated = world
        .service
        .update("profiles", "u-1", payload(json!({ "full_name": "Ada" })))
        .await
        .expect("update");
    assert_eq!(updated.get("user_id"), Some(&json!("u-1")));
    assert_eq!(updated.get("full_name"), Some(&json!("Ada")));
}

#[rstest]
#[tokio::test]
async fn duplicate_unique_values_surface_as_store_constraints(world: World) {
    let first = payload(json!({ "full_name": "Ada", "email": "ada@example.com" }));
    world
        .service
        .insert("employees", first.clone())
        .await
        .expect("first insert");

    let err = world
        .service
        .insert("employees", first)
        .await
        .expect_err("duplicate email");
    assert!(matches!(err, DataAccessError::Store(_)));
}
