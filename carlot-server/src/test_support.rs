//! In-memory stand-ins for the database and the secret mount

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use carlot_core::Car;

use crate::credentials::{ConnectionDescriptor, CredentialError, CredentialSource};
use crate::db::{CarQuery, CarStore, DbError, StoreConnector};

/// Table contents held in memory, matched the way Postgres would
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    cars: Vec<Car>,
}

impl MemoryStore {
    pub fn new(cars: Vec<Car>) -> Self {
        Self { cars }
    }
}

#[async_trait]
impl CarStore for MemoryStore {
    async fn fetch(&self, query: &CarQuery) -> Result<Option<Vec<Car>>, DbError> {
        let matched: Vec<Car> = self
            .cars
            .iter()
            .filter(|car| match query {
                CarQuery::All => true,
                CarQuery::ById(id) => car.id == *id,
                CarQuery::ByName(name) => car.name == *name,
            })
            .cloned()
            .collect();
        // json_agg over zero rows is NULL
        Ok((!matched.is_empty()).then_some(matched))
    }
}

/// The four cars from the API examples
pub fn showroom() -> MemoryStore {
    MemoryStore::new(vec![
        Car::new(1, "Toyota", 20500),
        Car::new(2, "BMW", 47000),
        Car::new(3, "Volvo", 52100),
        Car::new(4, "Tesla", 63900),
    ])
}

/// Every query fails with the same driver message
pub struct FailingStore {
    message: String,
}

impl FailingStore {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl CarStore for FailingStore {
    async fn fetch(&self, _query: &CarQuery) -> Result<Option<Vec<Car>>, DbError> {
        Err(DbError::Backend(self.message.clone()))
    }
}

/// Never answers
pub struct StallingStore;

#[async_trait]
impl CarStore for StallingStore {
    async fn fetch(&self, _query: &CarQuery) -> Result<Option<Vec<Car>>, DbError> {
        std::future::pending().await
    }
}

/// Credential source whose secret can appear and disappear mid-test
#[derive(Default)]
pub struct SwitchableCredentials {
    value: Mutex<Option<String>>,
    pub loads: AtomicUsize,
}

impl SwitchableCredentials {
    pub fn missing() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn present(value: &str) -> Arc<Self> {
        let source = Self::missing();
        source.set(value);
        source
    }

    pub fn set(&self, value: &str) {
        *self.value.lock().unwrap() = Some(value.to_owned());
    }

    pub fn clear(&self) {
        *self.value.lock().unwrap() = None;
    }
}

#[async_trait]
impl CredentialSource for SwitchableCredentials {
    async fn load(&self) -> Result<ConnectionDescriptor, CredentialError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let value = self.value.lock().unwrap().clone();
        value
            .map(ConnectionDescriptor::new)
            .ok_or_else(|| CredentialError::Empty {
                path: "/secrets/connection.txt".into(),
            })
    }
}

/// Hands out one shared store and counts how often it was asked to
pub struct CountingConnector {
    store: Result<Arc<dyn CarStore>, String>,
    delay: Option<Duration>,
    pub connects: AtomicUsize,
}

impl CountingConnector {
    pub fn new(store: impl CarStore + 'static) -> Self {
        Self::with_store(Arc::new(store))
    }

    pub fn with_store(store: Arc<dyn CarStore>) -> Self {
        Self {
            store: Ok(store),
            delay: None,
            connects: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            store: Err(message.to_owned()),
            delay: None,
            connects: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl StoreConnector for CountingConnector {
    async fn connect(
        &self,
        _descriptor: &ConnectionDescriptor,
    ) -> Result<Arc<dyn CarStore>, DbError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.store
            .as_ref()
            .map(Arc::clone)
            .map_err(|message| DbError::Backend(message.clone()))
    }
}
