use restaurant_service::{fixtures, Config, Database};
use tracing::info;

pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    if config.is_in_memory() {
        info!("seeding an in-memory database; the rows are gone when this process exits");
    }

    let db = Database::connect(&config)?;
    let summary = db.run(fixtures::seed).await?;
    info!(
        restaurants = summary.restaurants,
        items = summary.items,
        menus = summary.menus,
        database_url = %config.database_url,
        "seed finished"
    );

    db.close();
    Ok(())
}
