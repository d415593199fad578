//! Web server for the league API.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default; see `badminton_league::config` for the
//! environment variables it reads.

use actix_web::{middleware::Logger, web::Data, App, HttpServer};
use badminton_league::{api, AdminAuth, Config, League, MemoryStore};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e));
        }
    };
    let auth = AdminAuth::new(config.admin_password_hash.clone());
    if !auth.is_configured() {
        log::warn!("ADMIN_PASSWORD_HASH is not set; admin login is disabled");
    }
    log::info!(
        "Scoring: {:?}, {} games per clash, pools {:?}",
        config.league.policy,
        config.league.games_per_clash,
        config.league.pools
    );

    let league = League::new(Arc::new(MemoryStore::new()), config.league.clone());
    let state = Data::new(api::AppContext { league, auth });

    let bind = (config.host.as_str(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(api::configure)
    })
    .bind(bind)?
    .run()
    .await
}
