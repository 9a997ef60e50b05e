//! Checkout Server - cart to priced order + hosted payment session
//!
//! # Module Structure
//!
//! ```text
//! checkout-server/src/
//! ├── core/          # Config, server state, HTTP server
//! ├── api/           # HTTP routes and handlers
//! ├── checkout/      # Order total computation (pure)
//! ├── db/            # Embedded SurrealDB: models + repositories
//! ├── payment/       # Payment provider trait + Stripe client
//! └── utils/         # Errors, logging, validation helpers
//! ```

pub mod api;
pub mod checkout;
pub mod core;
pub mod db;
pub mod payment;
pub mod utils;

// Re-export public types
pub use core::{Config, Server, ServerState};
pub use payment::{PaymentProvider, StripeClient};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Set up process environment: dotenv + logging.
///
/// Call once from `main` before anything else.
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    init_logger();
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   ________              __             __
  / ____/ /_  ___  _____/ /______  __  / /_
 / /   / __ \/ _ \/ ___/ //_/ __ \/ / / / __/
/ /___/ / / /  __/ /__/ ,< / /_/ / /_/ / /_
\____/_/ /_/\___/\___/_/|_|\____/\__,_/\__/
    "#
    );
}
