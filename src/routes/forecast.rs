use std::collections::BTreeMap;

use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::models::forecast::{BaseParameters, DayPrice};
use crate::models::scenario::PricingScenario;
use crate::services::forecast::client::HttpForecastClient;
use crate::services::forecast::flow::{AcceptError, ForecastFlow, ForecastScreen, SelectError};
use crate::services::forecast::interface::{LoadError, SubmitError};
use crate::services::pricing_service::PricingService;

// UI clients may send a price drifted by display rounding; anything beyond
// half a cent means they quoted stale data.
const PRICE_DRIFT_TOLERANCE: f64 = 0.005;

#[derive(Serialize)]
pub struct ScenarioQuote {
    #[serde(flatten)]
    pub scenario: PricingScenario,
    pub total_price: f64,
    pub total_display: String,
}

#[derive(Serialize)]
pub struct DayView {
    #[serde(flatten)]
    pub day: DayPrice,
    /// Minimum bookable price for the day; absent when every staff option
    /// is unavailable (the day renders disabled).
    pub best_price: Option<f64>,
    pub best_staff_count: Option<u32>,
}

#[derive(Serialize)]
pub struct ForecastView {
    pub request_id: String,
    pub pricing_configuration: String,
    pub base_parameters: BaseParameters,
    pub staff_options: Vec<u32>,
    pub scenarios: Vec<ScenarioQuote>,
    pub monthly_calendar: BTreeMap<String, Vec<DayView>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AcceptPriceInput {
    pub request_id: String,
    #[serde(default)]
    pub scenario_id: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub staff_count: Option<u32>,
    /// Price the UI displayed when the user accepted, for drift detection.
    #[serde(default)]
    pub price: Option<f64>,
}

pub async fn get_price_forecast(
    data: web::Data<HttpForecastClient>,
    path: web::Path<String>,
) -> impl Responder {
    let request_id = path.into_inner();

    let mut flow = ForecastFlow::new(data.get_ref().clone(), request_id.clone());
    let state = flow.load().await.clone();

    match state {
        ForecastScreen::Failed(LoadError::NotFound) => {
            return HttpResponse::NotFound().body("Price forecast not found");
        }
        ForecastScreen::Failed(e) => {
            return HttpResponse::BadGateway().body(e.to_string());
        }
        _ => {}
    }

    let forecast = match flow.forecast() {
        Some(forecast) => forecast,
        None => {
            return HttpResponse::InternalServerError().body("Forecast data missing after load");
        }
    };

    let scenarios = flow
        .scenarios()
        .iter()
        .map(|scenario| {
            let total_price = PricingService::compute_total(scenario);
            ScenarioQuote {
                scenario: scenario.clone(),
                total_price,
                total_display: PricingService::format_currency(total_price),
            }
        })
        .collect();

    let monthly_calendar = forecast
        .monthly_calendar
        .iter()
        .map(|(month, days)| {
            let views = days
                .iter()
                .map(|day| {
                    let best = PricingService::best_price_for_day(day);
                    DayView {
                        day: day.clone(),
                        best_price: best.index.map(|_| best.value),
                        best_staff_count: best.staff_count,
                    }
                })
                .collect();
            (month.clone(), views)
        })
        .collect();

    let view = ForecastView {
        request_id,
        pricing_configuration: forecast.pricing_configuration.clone(),
        base_parameters: forecast.base_parameters.clone(),
        staff_options: forecast.staff_options(),
        scenarios,
        monthly_calendar,
    };

    HttpResponse::Ok().json(view)
}

pub async fn accept_price(
    data: web::Data<HttpForecastClient>,
    input: web::Json<AcceptPriceInput>,
) -> impl Responder {
    let input = input.into_inner();

    let mut flow = ForecastFlow::new(data.get_ref().clone(), input.request_id.clone());
    let state = flow.load().await.clone();

    match state {
        ForecastScreen::Failed(LoadError::NotFound) => {
            return HttpResponse::NotFound().body("Price forecast not found");
        }
        ForecastScreen::Failed(e) => {
            return HttpResponse::BadGateway().body(e.to_string());
        }
        _ => {}
    }

    let selected = match (&input.scenario_id, &input.date, input.staff_count) {
        (Some(scenario_id), None, None) => flow.select_scenario(scenario_id),
        (None, Some(date), Some(staff_count)) => flow.select_day(date, staff_count),
        _ => {
            return HttpResponse::BadRequest()
                .body("Provide either scenario_id or date with staff_count");
        }
    };

    let total_price = match selected {
        Ok(selection) => selection.total_price,
        Err(SelectError::Unavailable) => {
            return HttpResponse::Conflict()
                .body("No bookable price for the requested day and staff count");
        }
        Err(SelectError::UnknownDate) => {
            return HttpResponse::NotFound().body("Date is not part of this forecast");
        }
        Err(SelectError::UnknownScenario) => {
            return HttpResponse::NotFound().body("Unknown pricing scenario");
        }
        Err(e) => {
            return HttpResponse::InternalServerError()
                .body(format!("Selection failed unexpectedly: {:?}", e));
        }
    };

    if let Some(displayed) = input.price {
        if (displayed - total_price).abs() > PRICE_DRIFT_TOLERANCE {
            return HttpResponse::Conflict().json(json!({
                "error": "price_changed",
                "displayed_price": displayed,
                "current_price": total_price,
                "current_display": PricingService::format_currency(total_price),
            }));
        }
    }

    match flow.accept().await {
        Ok(confirmation) => HttpResponse::Ok().json(json!({
            "success": true,
            "confirmation": confirmation,
            "total_price": total_price,
            "total_display": PricingService::format_currency(total_price),
        })),
        Err(AcceptError::Submission(SubmitError::Rejected(msg))) => {
            HttpResponse::Conflict().json(json!({
                "success": false,
                "error": format!("Booking service rejected the acceptance: {}", msg),
                "retryable": false,
            }))
        }
        Err(AcceptError::Submission(e)) => HttpResponse::BadGateway().json(json!({
            "success": false,
            "error": format!("{}", e),
            "retryable": true,
        })),
        Err(e) => HttpResponse::InternalServerError()
            .body(format!("Acceptance failed unexpectedly: {:?}", e)),
    }
}
