//! Hero service binary
//!
//! Configuration comes from `config.toml` files, `SQLITE_DB_PATH` and
//! `HERO_*` environment variables, e.g. `HERO_SERVICE__PORT=9000`.

use anyhow::Context;
use hero_service::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    init_tracing(&config)?;

    let pool = create_pool(&config.database)
        .await
        .context("failed to open the hero database")?;
    ensure_schema(&pool)
        .await
        .context("failed to create the hero schema")?;

    Server::new(AppState::new(config, pool)).serve().await?;
    Ok(())
}
