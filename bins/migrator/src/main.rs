//! Migration runner for the Dovita budgeting schema.
//!
//! Usage: `cargo run --bin migrator -- up` (reads `DATABASE_URL`).

use dovita_db::migration::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    cli::run_cli(Migrator).await;
}
