use actix_web::middleware::Logger;
use actix_web::{App, HttpServer};
use backend::config::{Args, Settings};
use backend::sessions::SystemClock;
use backend::store::Store;
use backend::AppState;
use clap::Parser;
use env_logger::Env;
use log::{info, warn};
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let args = Args::parse();
    let settings = Settings::load(&args).map_err(io::Error::other)?;
    let store = Store::open(&settings.database).map_err(io::Error::other)?;

    let tokens = settings.access_tokens();
    if tokens.is_open() {
        warn!("No api_tokens configured: every request is accepted without a role check");
    }
    let state = AppState::new(store, Arc::new(SystemClock), tokens);

    let url = format!("http://{}:{}", settings.host, settings.port);
    info!("Server running at {}", url);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .configure(|cfg| state.configure(cfg))
    })
    .bind((settings.host.as_str(), settings.port))?
    .run()
    .await
}
