#[macro_use]
extern crate diesel;
#[macro_use]
extern crate diesel_migrations;

use actix_web::{middleware, web, App, HttpServer};
use clap::Parser;

mod cache;
mod cli;
mod config;
mod db;
mod error;
mod models;
mod query;
mod routes;
mod schema;
mod units;

use crate::cache::FoodCache;
use crate::cli::{Cli, Commands};
use crate::config::Config;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let command = Cli::parse().command();
    let config = Config::from_env()?;

    // set up database connection pool
    let pool = db::create_pool(&config.database_url)?;

    match command {
        Commands::Migrate => {
            db::run_migrations(&*pool.get()?)?;
            return Ok(());
        }
        Commands::Serve { skip_migrations } => {
            if skip_migrations {
                log::warn!("skipping migrations, serving against the current schema");
            } else {
                db::run_migrations(&*pool.get()?)?;
            }
        }
    }

    let redis_pool = cache::create_redis_pool(&config)?;
    let food_cache = FoodCache::new(redis_pool, failsafe::Config::new().build(), config.cache_ttl);

    log::info!(
        "starting HTTP server at http://{}:{}",
        config.bind_address,
        config.port
    );

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            // set up DB pool to be used with web::Data<Pool> extractor
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(food_cache.clone()))
            .wrap(middleware::Logger::default())
            .configure(routes::configure)
    })
    .bind((config.bind_address.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
