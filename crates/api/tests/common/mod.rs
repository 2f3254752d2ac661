use std::sync::Arc;

use api::schema::{build_schema, AppSchema};
use api::search::AcronymDictionary;
use api::seed::{seed_hr_demo, SeededHrRecords};
use async_graphql::{Response, Schema};
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement,
};
use url::Url;
use uuid::Uuid;

pub struct TestContext {
    pub db: Arc<DatabaseConnection>,
    pub schema: Schema<
        api::schema::QueryRoot,
        api::schema::MutationRoot,
        async_graphql::EmptySubscription,
    >,
    pub seeded: SeededHrRecords,
    admin_url: Option<String>,
    db_name: Option<String>,
}

/// Migrated and seeded database per test. Points at a throwaway
/// Postgres database when TEST_DATABASE_URL is set, otherwise at
/// in-memory SQLite so the suite runs without infrastructure.
pub async fn setup_seeded() -> TestContext {
    let (test_url, admin_url, db_name) = match std::env::var("TEST_DATABASE_URL") {
        Ok(base) => {
            let (admin_url, db_name, test_url) =
                build_urls(&base).expect("parse TEST_DATABASE_URL");
            let admin = Database::connect(&admin_url)
                .await
                .expect("connect admin database");
            let drop_sql = format!("DROP DATABASE IF EXISTS \"{}\" WITH (FORCE);", db_name);
            let create_sql = format!("CREATE DATABASE \"{}\";", db_name);
            let _ = admin
                .execute(Statement::from_string(DatabaseBackend::Postgres, drop_sql))
                .await;
            admin
                .execute(Statement::from_string(
                    DatabaseBackend::Postgres,
                    create_sql,
                ))
                .await
                .expect("create test database");
            (test_url, Some(admin_url), Some(db_name))
        }
        Err(_) => ("sqlite::memory:".to_string(), None, None),
    };

    // Single connection so an in-memory SQLite database survives
    // across pool checkouts.
    let mut options = ConnectOptions::new(test_url);
    options.max_connections(1);
    let conn = Database::connect(options)
        .await
        .expect("connect test database");
    Migrator::up(&conn, None).await.expect("run migrations");
    let seeded = seed_hr_demo(&conn).await.expect("seed demo directory");

    let db = Arc::new(conn);
    let AppSchema(schema) = build_schema(db.clone(), Arc::new(AcronymDictionary::default()));
    TestContext {
        db,
        schema,
        seeded,
        admin_url,
        db_name,
    }
}

impl TestContext {
    pub async fn cleanup(self) {
        let Self {
            db,
            admin_url,
            db_name,
            ..
        } = self;
        drop(db);
        if let (Some(admin_url), Some(db_name)) = (admin_url, db_name) {
            if let Ok(admin) = Database::connect(&admin_url).await {
                let drop_sql = format!("DROP DATABASE IF EXISTS \"{}\" WITH (FORCE);", db_name);
                let _ = admin
                    .execute(Statement::from_string(DatabaseBackend::Postgres, drop_sql))
                    .await;
            }
        }
    }
}

fn build_urls(base: &str) -> Option<(String, String, String)> {
    let url = Url::parse(base).ok()?;
    let db_path = url.path().trim_start_matches('/').to_string();
    let base_name = if db_path.is_empty() {
        "hr_directory_test".to_string()
    } else {
        db_path
    };
    let db_name = format!("{}_{}", base_name, Uuid::new_v4().simple());
    let mut admin_url = url.clone();
    admin_url.set_path("/postgres");
    let mut test_url = url.clone();
    test_url.set_path(&format!("/{}", db_name));
    Some((admin_url.to_string(), db_name, test_url.to_string()))
}

/// True when any error in the response carries the given `code`
/// extension.
pub fn has_error_code(resp: &Response, code: &str) -> bool {
    resp.errors.iter().any(|e| {
        e.extensions
            .as_ref()
            .and_then(|ext| ext.get("code"))
            .and_then(|value| match value {
                async_graphql::Value::String(inner) => Some(inner == code),
                _ => None,
            })
            .unwrap_or(false)
    })
}
