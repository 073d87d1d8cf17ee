use clap::Parser;

#[derive(Parser, Clone)]
pub struct Config {
    #[clap(env, long)]
    pub database_url: String,

    /// JSON file the restaurants table is repopulated from on every boot.
    #[clap(env, long, default_value = "restaurants.json")]
    pub seed_file: String,

    #[clap(env, long, default_value_t = 3000)]
    pub port: u16,

    /// Comma-separated list of allowed CORS origins.
    #[clap(env, long, default_value = "http://localhost:5173")]
    pub origin_urls: String,
}
