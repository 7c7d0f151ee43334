//! Subcommand implementations.

use anyhow::Context;
use sqlx::PgPool;

use storefind_core::{
    load_families, AppConfig, FamilyIndex, LatLng, StoreGeocodeMetadata,
};
use storefind_db::{connect_pool, count_cached_locations, purge_expired_locations, PoolConfig};
use storefind_maps::MapsClient;
use storefind_resolver::{ResolveRequest, ResolverConfig, StoreResolver};

async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    connect_pool(&config.database_url, PoolConfig::from_app_config(config))
        .await
        .context("failed to connect to Postgres")
}

fn build_resolver(config: &AppConfig, pool: PgPool) -> anyhow::Result<StoreResolver> {
    let maps = MapsClient::new(
        &config.maps_base_url,
        &config.maps_api_key,
        config.maps_timeout_secs,
        config.maps_max_retries,
        config.maps_backoff_base_ms,
    )
    .context("failed to construct maps client")?;

    let families_file = load_families(&config.families_path)
        .with_context(|| format!("failed to load {}", config.families_path.display()))?;
    let families = FamilyIndex::new(&families_file);

    Ok(StoreResolver::new(
        maps,
        pool,
        families,
        ResolverConfig::from_app_config(config),
    ))
}

pub async fn resolve(
    config: &AppConfig,
    name: String,
    zip: Option<String>,
    coordinates: Option<(f64, f64)>,
    hint: Option<String>,
) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    let resolver = build_resolver(config, pool)?;

    let request = ResolveRequest {
        name,
        postal_code: zip,
        coordinates: coordinates.map(|(lat, lng)| LatLng { lat, lng }),
        metadata: StoreGeocodeMetadata {
            hint,
            aliases: Vec::new(),
        },
    };

    match resolver.resolve(&request).await? {
        Some(result) => println!("{}", serde_json::to_string_pretty(&result)?),
        None => {
            tracing::warn!(name = %request.name, "store could not be resolved");
            println!("no location found");
        }
    }
    Ok(())
}

pub async fn batch(config: &AppConfig, brand: &str, zip: &str) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    let stores = storefind_db::list_stores_by_brand(&pool, brand)
        .await
        .context("failed to list stores")?;
    if stores.is_empty() {
        println!("no stores found for brand '{brand}'");
        return Ok(());
    }

    let resolver = build_resolver(config, pool)?;
    let requests: Vec<ResolveRequest> = stores
        .iter()
        .map(|store| ResolveRequest::from_store(store, zip))
        .collect();

    let results = resolver.resolve_batch(&requests).await?;

    let mut resolved = 0usize;
    for (store, result) in stores.iter().zip(&results) {
        match result {
            Some(location) => {
                resolved += 1;
                println!(
                    "{}: {} ({}, {})",
                    store.display_name, location.formatted_address, location.lat, location.lng
                );
            }
            None => println!("{}: omitted (no acceptable location)", store.display_name),
        }
    }
    println!(
        "resolved {resolved}/{} stores for brand '{brand}' near {zip}",
        stores.len()
    );
    Ok(())
}

pub async fn cache_stats(config: &AppConfig) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    let total = count_cached_locations(&pool)
        .await
        .context("failed to count cache entries")?;
    println!("store_locations_cache: {total} entries (TTL {} days)", config.cache_ttl_days);
    Ok(())
}

pub async fn cache_purge(config: &AppConfig) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    let removed = purge_expired_locations(&pool, config.cache_ttl_days)
        .await
        .context("failed to purge cache")?;
    println!("purged {removed} expired cache entries");
    Ok(())
}

pub async fn migrate(config: &AppConfig) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    let applied = storefind_db::run_migrations(&pool)
        .await
        .context("migrations failed")?;
    println!("applied {applied} migrations");
    Ok(())
}
