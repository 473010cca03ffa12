use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::collections::HashMap;
use std::env;
use url::Url;

use crate::config::AppConfig;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check(config: web::Data<AppConfig>) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let pricing = check_upstream("PRICING_API_URL", &config.pricing_api_url);
    health
        .services
        .insert("pricing_engine".to_string(), pricing.clone());

    let booking = check_upstream("BOOKING_API_URL", &config.booking_api_url);
    health
        .services
        .insert("booking_service".to_string(), booking.clone());

    if pricing.status != "ok" || booking.status != "ok" {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}

fn check_upstream(var_name: &str, base_url: &str) -> ServiceStatus {
    if base_url.is_empty() {
        return ServiceStatus {
            status: "error".to_string(),
            details: Some(format!("{} not configured", var_name)),
        };
    }

    match Url::parse(base_url) {
        Ok(url) => ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!("Configured upstream: {}", url)),
        },
        Err(e) => ServiceStatus {
            status: "error".to_string(),
            details: Some(format!("{} is not a valid URL: {}", var_name, e)),
        },
    }
}
