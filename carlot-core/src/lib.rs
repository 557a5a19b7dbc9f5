//! carlot-core: the `Car` model, service configuration and shared errors.

pub mod car;
pub mod config;
pub mod error;

pub use car::Car;
pub use config::{CarlotConfig, DatabaseSection, LoggingSection, ServerSection};
pub use error::{CarlotError, Result};
