use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use gym_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    handlers,
    middlewares::create_cors,
    services::*,
    swagger::swagger_config,
    tasks,
    utils::JwtService,
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

    let config = Config::from_toml().map_err(|e| {
        log::error!("Failed to load configuration: {e}");
        std::io::Error::other(e.to_string())
    })?;

    let pool = create_pool(&config.database).await.map_err(|e| {
        log::error!("Failed to create database connection pool: {e}");
        std::io::Error::other(e.to_string())
    })?;

    run_migrations(&pool).await.map_err(|e| {
        log::error!("Failed to run database migrations: {e}");
        std::io::Error::other(e.to_string())
    })?;

    let jwt_service = JwtService::new(&config.jwt.secret, config.jwt.expires_in);

    let auth_service = AuthService::new(pool.clone(), jwt_service.clone());
    let member_service = MemberService::new(pool.clone());
    let attendance_service = AttendanceService::new(pool.clone());
    let invoice_service = InvoiceService::new(pool.clone());
    let inventory_service = InventoryService::new(pool.clone());
    let class_service = ClassService::new(pool.clone());
    let exercise_service = ExerciseService::new(pool.clone());
    let routine_service = RoutineService::new(pool.clone());
    let report_service = ReportService::new(pool.clone());
    let membership_service = MembershipService::new(pool.clone());

    if let (Some(email), Some(password)) = (&config.admin.email, &config.admin.password) {
        member_service
            .ensure_admin(email, password)
            .await
            .map_err(|e| {
                log::error!("Failed to create bootstrap administrator: {e}");
                std::io::Error::other(e.to_string())
            })?;
    }

    tasks::spawn_all(membership_service, config.sweep.clone());

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
            .app_data(handlers::json_config())
            .app_data(handlers::query_config())
            .app_data(web::Data::new(jwt_service.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(member_service.clone()))
            .app_data(web::Data::new(attendance_service.clone()))
            .app_data(web::Data::new(invoice_service.clone()))
            .app_data(web::Data::new(inventory_service.clone()))
            .app_data(web::Data::new(class_service.clone()))
            .app_data(web::Data::new(exercise_service.clone()))
            .app_data(web::Data::new(routine_service.clone()))
            .app_data(web::Data::new(report_service.clone()))
            .configure(swagger_config)
            .service(web::scope("/api").configure(handlers::api_config))
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
