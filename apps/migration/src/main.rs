//! Migration CLI tool.
//!
//! Reads `DATABASE_URL` (a `.env` file is honoured) and runs
//! `up`, `down`, `fresh`, `status` and friends against the blog schema.

use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt().with_env_filter("info").init();

    tracing::info!("Running blog schema migrations");
    cli::run_cli(migration::Migrator).await;
}
