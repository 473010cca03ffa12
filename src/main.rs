use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use movebid_api::config::AppConfig;
use movebid_api::routes;
use movebid_api::services::forecast::client::HttpForecastClient;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    println!("Application starting...");

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    let config = AppConfig::from_env();
    println!("Attempting to bind to {}:{}", config.host, config.port);

    let forecast_client = HttpForecastClient::new(&config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    let bind_addr = (config.host.clone(), config.port);

    println!("Starting HTTP server...");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(forecast_client.clone()))
            .route("/health", web::get().to(routes::health::health_check))
            .service(
                web::scope("/api")
                    .route(
                        "/price-forecast/{request_id}",
                        web::get().to(routes::forecast::get_price_forecast),
                    )
                    .route(
                        "/accept-price",
                        web::post().to(routes::forecast::accept_price),
                    ),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
