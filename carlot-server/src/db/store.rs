//! Car queries
//!
//! Three fixed, parameterized statements. Each one folds the matching rows
//! into a single JSON array with `json_agg`, which is NULL when nothing
//! matched.

use async_trait::async_trait;
use carlot_core::Car;
use sqlx::types::Json;
use sqlx::PgPool;

use super::DbError;

const SELECT_ALL: &str = "SELECT json_agg(cars) AS cars FROM cars";
const SELECT_BY_ID: &str = "SELECT json_agg(cars) AS cars FROM cars WHERE id = $1";
const SELECT_BY_NAME: &str = "SELECT json_agg(cars) AS cars FROM cars WHERE name = $1";

/// The lookups the API supports
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarQuery {
    All,
    ById(i64),
    /// Exact, case-sensitive match
    ByName(String),
}

impl CarQuery {
    pub fn sql(&self) -> &'static str {
        match self {
            Self::All => SELECT_ALL,
            Self::ById(_) => SELECT_BY_ID,
            Self::ByName(_) => SELECT_BY_NAME,
        }
    }
}

/// Read access to the cars table.
///
/// `Ok(None)` is the NULL aggregate: the query ran and matched no rows.
#[async_trait]
pub trait CarStore: Send + Sync {
    async fn fetch(&self, query: &CarQuery) -> Result<Option<Vec<Car>>, DbError>;
}

/// Postgres-backed store. Each query checks a connection out of the pool
/// and returns it when the query finishes, whatever the result.
#[derive(Debug, Clone)]
pub struct PgCarStore {
    pool: PgPool,
}

impl PgCarStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CarStore for PgCarStore {
    async fn fetch(&self, query: &CarQuery) -> Result<Option<Vec<Car>>, DbError> {
        let statement = sqlx::query_scalar::<_, Option<Json<Vec<Car>>>>(query.sql());
        let statement = match query {
            CarQuery::All => statement,
            CarQuery::ById(id) => statement.bind(*id),
            CarQuery::ByName(name) => statement.bind(name.as_str()),
        };

        let cars = statement.fetch_one(&self.pool).await?;
        Ok(cars.map(|Json(cars)| cars))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statements_are_parameterized() {
        assert_eq!(CarQuery::All.sql(), "SELECT json_agg(cars) AS cars FROM cars");
        assert!(CarQuery::ById(1).sql().ends_with("WHERE id = $1"));
        assert!(CarQuery::ByName("Toyota".into()).sql().ends_with("WHERE name = $1"));
    }

    // Integration tests require a real database with a populated `cars` table
    // Run with: DATABASE_URL=postgres://... cargo test -p carlot-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn fetches_existing_car_by_id() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = PgPool::connect(&url).await.expect("pool creation failed");
        let store = PgCarStore::new(pool);

        let all = store.fetch(&CarQuery::All).await.expect("query failed");
        let first = all.and_then(|cars| cars.into_iter().next()).expect("empty table");

        let found = store
            .fetch(&CarQuery::ById(first.id))
            .await
            .expect("query failed")
            .expect("row vanished");
        assert_eq!(found, vec![first]);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn unknown_name_aggregates_to_null() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = PgPool::connect(&url).await.expect("pool creation failed");
        let store = PgCarStore::new(pool);

        let result = store
            .fetch(&CarQuery::ByName("no such car, surely".into()))
            .await
            .expect("query failed");
        assert!(result.is_none());
    }
}
