pub mod forecast;
pub mod pricing_service;
