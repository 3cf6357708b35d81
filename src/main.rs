use color_eyre::eyre::Result;
use courtside_api::config::ApiConfig;
use courtside_db::{create_pool, schema::initialize_database};
use dotenv::dotenv;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv().ok();

    let config = ApiConfig::from_env()?;

    let db_pool = create_pool(&config.database_url).await?;
    initialize_database(&db_pool).await?;

    courtside_api::start_server(config, db_pool).await?;

    Ok(())
}
