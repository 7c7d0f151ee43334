use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    pub families_path: PathBuf,

    pub maps_base_url: String,
    pub maps_api_key: String,
    pub maps_timeout_secs: u64,
    pub maps_max_retries: u32,
    pub maps_backoff_base_ms: u64,

    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,

    pub search_radius_meters: f64,
    pub radius_expansion_factor: f64,
    pub travel_budget_meters: f64,
    pub strict_travel_multiplier: f64,
    pub relaxed_travel_multiplier: f64,
    pub cache_ttl_days: i64,
    pub memory_cache_capacity: u64,
    pub batch_inter_request_delay_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("families_path", &self.families_path)
            .field("database_url", &"[redacted]")
            .field("maps_base_url", &self.maps_base_url)
            .field("maps_api_key", &"[redacted]")
            .field("maps_timeout_secs", &self.maps_timeout_secs)
            .field("maps_max_retries", &self.maps_max_retries)
            .field("maps_backoff_base_ms", &self.maps_backoff_base_ms)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("search_radius_meters", &self.search_radius_meters)
            .field("radius_expansion_factor", &self.radius_expansion_factor)
            .field("travel_budget_meters", &self.travel_budget_meters)
            .field("strict_travel_multiplier", &self.strict_travel_multiplier)
            .field(
                "relaxed_travel_multiplier",
                &self.relaxed_travel_multiplier,
            )
            .field("cache_ttl_days", &self.cache_ttl_days)
            .field("memory_cache_capacity", &self.memory_cache_capacity)
            .field(
                "batch_inter_request_delay_ms",
                &self.batch_inter_request_delay_ms,
            )
            .finish()
    }
}
