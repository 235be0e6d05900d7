use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Context;
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use chrono::Local;  // timestamp in log lines

use travel_agency::{
    config::Config,
    database::{create_pool, run_migrations},
    handlers,
    middlewares::{IdentityMiddleware, session_key, session_middleware},
    services::*,
    swagger::swagger_config,
    utils::ImageStore,
    views::Views,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
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
    let config = Config::from_toml()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {e}"))?;

    // 创建数据库连接池
    let pool = create_pool(&config.database)
        .await
        .context("Failed to create database connection pool")?;

    // 运行数据库迁移
    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    // 创建服务
    let auth_service = AuthService::new(pool.clone());
    let user_service = UserService::new(pool.clone());
    let catalog_service = CatalogService::new(pool.clone());
    let cart_service = CartService::new(pool.clone());
    let admin_service = AdminService::new(pool.clone());
    let site_content_service = SiteContentService::new(pool.clone());

    // 初始数据
    site_content_service
        .ensure_default()
        .await
        .context("Failed to seed homepage content")?;
    match &config.admin {
        Some(admin) => {
            auth_service
                .ensure_admin(admin)
                .await
                .context("Failed to ensure admin account")?;
        }
        None => log::warn!("No [admin] configured; the admin panel is unreachable until one exists"),
    }

    let key = session_key(&config.session);
    let cookie_secure = config.session.cookie_secure;
    let image_store = ImageStore::new(&config.uploads);
    let views = Views::json();

    // 启动HTTP服务器
    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(IdentityMiddleware::new(user_service.clone()))
            .wrap(session_middleware(key.clone(), cookie_secure))
            .wrap(Logger::default())
            .app_data(web::Data::new(views.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(catalog_service.clone()))
            .app_data(web::Data::new(cart_service.clone()))
            .app_data(web::Data::new(admin_service.clone()))
            .app_data(web::Data::new(site_content_service.clone()))
            .app_data(web::Data::new(image_store.clone()))
            .configure(swagger_config)
            .service(handlers::upload_resource(image_store.url_prefix()))
            .configure(handlers::configure_routes)
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await?;

    Ok(())
}
