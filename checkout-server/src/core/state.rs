use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::core::Config;
use crate::db::DbService;
use crate::payment::{PaymentProvider, StripeClient};
use crate::utils::AppError;

/// Shared server state
///
/// Holds the handles every request handler needs. `Clone` is shallow: the
/// database handle and payment client are shared references.
///
/// The payment provider is an injected dependency behind a trait object so
/// tests can substitute a fake without touching the network.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
    /// Payment provider client (Stripe in production)
    pub payments: Arc<dyn PaymentProvider>,
}

impl ServerState {
    /// Build state from pre-constructed parts.
    ///
    /// Used by tests to inject an in-memory database and a fake payment
    /// provider. Production code goes through [`ServerState::initialize`].
    pub fn new(config: Config, db: Surreal<Db>, payments: Arc<dyn PaymentProvider>) -> Self {
        Self {
            config,
            db,
            payments,
        }
    }

    /// Initialize server state from configuration.
    ///
    /// 1. Ensure the working directory structure exists
    /// 2. Open the embedded database at `work_dir/database`
    /// 3. Construct the Stripe client
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {}", e)))?;

        let db_path = config.database_dir().join("checkout.db");
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;

        if config.stripe_secret_key.is_empty() {
            tracing::warn!("STRIPE_SECRET_KEY is not set; payment session creation will fail");
        }

        let payments = Arc::new(StripeClient::new(
            config.stripe_secret_key.clone(),
            config.stripe_api_base.clone(),
        ));

        Ok(Self::new(config.clone(), db_service.db, payments))
    }
}
