use actix_web::{App, HttpServer, middleware::Logger, web};
use clap::Parser;
use sqlx::{Pool, Postgres};
use std::sync::Arc;
use tracing::info;

mod api;
mod cli;
mod config;
mod db;
mod logging;
mod shutdown;

use crate::api::{
    auth::JwtAuth,
    health::health_config,
    job::{JobService, job_config},
    validation,
};
use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::db::job_repository::{JobRepository, PgJobRepository};
use crate::shutdown::ShutdownCoordinator;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    // Load configuration from environment
    let config = Config::from_env().map_err(std::io::Error::other)?;

    let command = cli.command.unwrap_or(Command::Serve);

    if let Command::Token { username, admin } = &command {
        let token = JwtAuth::new(&config.secret_key)
            .issue(
                username,
                *admin,
                chrono::Duration::hours(config.token_ttl_hours),
            )
            .map_err(std::io::Error::other)?;
        println!("{}", token);
        return Ok(());
    }

    logging::init(&config.log_dir)?;

    let pool = db::connection::get_connection(&config.database_url, config.max_db_connections)
        .await
        .map_err(std::io::Error::other)?;
    info!("Database connection pool established");

    db::migrations::run_migrations(&pool)
        .await
        .map_err(std::io::Error::other)?;

    match command {
        Command::Migrate => {
            pool.close().await;
            Ok(())
        }
        _ => serve(config, pool).await,
    }
}

async fn serve(config: Config, pool: Pool<Postgres>) -> std::io::Result<()> {
    info!("Starting jobboard application");
    info!("  - Max payload size: {} bytes", config.max_payload_size);
    info!("  - Max database connections: {}", config.max_db_connections);

    let repo: Arc<dyn JobRepository> = Arc::new(PgJobRepository::new(pool.clone()));
    let job_service = web::Data::new(JobService::new(repo.clone()));
    let repo_data = web::Data::from(repo);
    let jwt = web::Data::new(JwtAuth::new(&config.secret_key));
    let max_payload_size = config.max_payload_size;

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(job_service.clone())
            .app_data(repo_data.clone())
            .app_data(jwt.clone())
            .app_data(web::PayloadConfig::default().limit(max_payload_size))
            .app_data(validation::json_config())
            .app_data(validation::query_config())
            .configure(health_config)
            .configure(job_config)
    });

    info!("Server starting on http://{}:{}", config.host, config.port);

    let server = server.bind((config.host.as_str(), config.port))?.run();
    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    ShutdownCoordinator::new(server_handle, server_task, pool)
        .wait_for_shutdown()
        .await
}
