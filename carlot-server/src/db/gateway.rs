//! Query execution and result normalization
//!
//! Turns whatever the store reports into a [`QueryOutcome`] the HTTP layer
//! can map without knowing anything about the driver.

use std::time::Duration;

use carlot_core::Car;

use super::store::{CarQuery, CarStore};

/// Result of one car query
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// Query succeeded. For single lookups this holds exactly one car.
    Rows(Vec<Car>),
    /// A single lookup matched nothing
    NotFound,
    /// Driver failure, with its diagnostic text
    Error(String),
    /// The configured query timeout elapsed
    TimedOut(Duration),
}

/// Runs the three supported lookups against an ensured store.
pub struct QueryGateway<'a> {
    store: &'a dyn CarStore,
    timeout: Option<Duration>,
}

impl<'a> QueryGateway<'a> {
    pub fn new(store: &'a dyn CarStore) -> Self {
        Self {
            store,
            timeout: None,
        }
    }

    /// Bound each query; `None` waits indefinitely
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Every car. An empty table is an empty list, never `NotFound`.
    pub async fn list_all(&self) -> QueryOutcome {
        match self.run(CarQuery::All).await {
            Ok(cars) => QueryOutcome::Rows(cars.unwrap_or_default()),
            Err(outcome) => outcome,
        }
    }

    pub async fn get_by_id(&self, id: i64) -> QueryOutcome {
        self.single(CarQuery::ById(id)).await
    }

    /// Exact name match; `toyota` does not find `Toyota`
    pub async fn get_by_name(&self, name: &str) -> QueryOutcome {
        self.single(CarQuery::ByName(name.to_owned())).await
    }

    async fn single(&self, query: CarQuery) -> QueryOutcome {
        match self.run(query).await {
            Ok(Some(cars)) => match cars.into_iter().next() {
                Some(car) => QueryOutcome::Rows(vec![car]),
                None => QueryOutcome::NotFound,
            },
            Ok(None) => QueryOutcome::NotFound,
            Err(outcome) => outcome,
        }
    }

    async fn run(&self, query: CarQuery) -> Result<Option<Vec<Car>>, QueryOutcome> {
        let fetch = self.store.fetch(&query);
        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, fetch)
                .await
                .map_err(|_| QueryOutcome::TimedOut(limit))?,
            None => fetch.await,
        };

        result.map_err(|err| {
            tracing::debug!(?query, error = %err, "car query failed");
            QueryOutcome::Error(err.diagnostic())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{showroom, FailingStore, MemoryStore, StallingStore};

    #[tokio::test]
    async fn list_all_returns_every_row() {
        let store = showroom();
        let outcome = QueryGateway::new(&store).list_all().await;

        let QueryOutcome::Rows(cars) = outcome else {
            panic!("expected rows, got {outcome:?}");
        };
        assert_eq!(cars.len(), 4);
    }

    #[tokio::test]
    async fn empty_table_lists_nothing() {
        let store = MemoryStore::default();
        let outcome = QueryGateway::new(&store).list_all().await;
        assert_eq!(outcome, QueryOutcome::Rows(vec![]));
    }

    #[tokio::test]
    async fn id_lookup_returns_single_car() {
        let store = showroom();
        let outcome = QueryGateway::new(&store).get_by_id(1).await;
        assert_eq!(outcome, QueryOutcome::Rows(vec![Car::new(1, "Toyota", 20500)]));
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let store = showroom();
        assert_eq!(
            QueryGateway::new(&store).get_by_id(99).await,
            QueryOutcome::NotFound
        );
    }

    #[tokio::test]
    async fn name_lookup_is_case_sensitive() {
        let store = showroom();
        let gateway = QueryGateway::new(&store);

        assert!(matches!(
            gateway.get_by_name("Toyota").await,
            QueryOutcome::Rows(cars) if cars[0].id == 1
        ));
        assert_eq!(gateway.get_by_name("toyota").await, QueryOutcome::NotFound);
        assert_eq!(gateway.get_by_name("Toy").await, QueryOutcome::NotFound);
    }

    #[tokio::test]
    async fn driver_error_text_passes_through() {
        let store = FailingStore::new("relation \"cars\" does not exist");
        let outcome = QueryGateway::new(&store).get_by_id(1).await;
        assert_eq!(
            outcome,
            QueryOutcome::Error("relation \"cars\" does not exist".into())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn slow_query_times_out() {
        let store = StallingStore;
        let limit = Duration::from_secs(2);
        let outcome = QueryGateway::new(&store)
            .with_timeout(Some(limit))
            .list_all()
            .await;
        assert_eq!(outcome, QueryOutcome::TimedOut(limit));
    }
}
