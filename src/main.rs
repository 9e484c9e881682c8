use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use roulette_backend::{
    config::Config,
    database::{create_pool, run_migrations, seed_default_roster},
    handlers,
    middlewares::create_cors,
    services::*,
    swagger::swagger_config,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().expect("Failed to load configuration file");

    // 创建数据库连接池
    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    // 运行数据库迁移
    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    if config.database.seed_on_empty {
        if let Err(e) = seed_default_roster(&pool).await {
            log::error!("Failed to seed default roster: {e:?}");
        }
    }

    // 创建服务
    let person_service = PersonService::new(pool.clone());
    let roulette_service = RouletteService::new(pool.clone(), config.draw.clone());

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    let cors_config = config.cors.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors(&cors_config))
            .app_data(web::Data::new(person_service.clone()))
            .app_data(web::Data::new(roulette_service.clone()))
            .configure(swagger_config)
            .service(web::scope("/api").configure(handlers::api_config))
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
