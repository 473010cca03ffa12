use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::scenario::PricingScenario;

/// Additive cost components the upstream pricing engine already summed into
/// `StaffPrice::price`. Carried for the breakdown modal, never recomputed.
/// Partial objects deserialize with zeroed omissions.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PriceComponents {
    pub base_price: f64,
    pub distance_cost: f64,
    pub weight_cost: f64,
    pub property_cost: f64,
    pub staff_cost: f64,
    pub vehicle_cost: f64,
    pub service_cost: f64,
    pub time_cost: f64,
    pub weather_cost: f64,
    pub insurance_cost: f64,
    pub fuel_surcharge: f64,
    pub carbon_offset: f64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PriceMultipliers {
    pub service_multiplier: f64,
    pub time_multiplier: f64,
    pub weather_multiplier: f64,
    pub vehicle_multiplier: f64,
}

/// Price for one staff-count option on one day.
///
/// An unavailable combination is carried as `null` on the wire and as NaN in
/// memory. serde_json already serializes non-finite floats back to `null`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StaffPrice {
    pub staff_count: u32,
    #[serde(deserialize_with = "price_or_unavailable", default = "unavailable")]
    pub price: f64,
    #[serde(default)]
    pub components: PriceComponents,
    #[serde(default)]
    pub multipliers: PriceMultipliers,
}

fn unavailable() -> f64 {
    f64::NAN
}

fn price_or_unavailable<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.unwrap_or(f64::NAN))
}

/// One calendar day of the forecast. Weekend/holiday flags only affect how
/// the day is displayed; the prices were already adjusted upstream.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DayPrice {
    pub date: String,
    pub day: u32,
    pub is_weekend: bool,
    pub is_holiday: bool,
    pub holiday_name: Option<String>,
    #[serde(default)]
    pub weather_type: String,
    #[serde(default)]
    pub staff_prices: Vec<StaffPrice>,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BaseParameters {
    pub distance: f64,
    pub weight: f64,
    pub service_level: String,
    pub property_type: String,
    pub vehicle_type: String,
}

/// The full forecast resource for one moving request, as served by the
/// upstream pricing engine.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PriceForecast {
    pub pricing_configuration: String,
    #[serde(default)]
    pub base_parameters: BaseParameters,
    /// Month key ("2026-09") to the days of that month, in calendar order.
    #[serde(default)]
    pub monthly_calendar: BTreeMap<String, Vec<DayPrice>>,
    /// Scenario table, when the upstream sends one. Empty means the caller
    /// falls back to the built-in catalog.
    #[serde(default)]
    pub scenarios: Vec<PricingScenario>,
}

impl PriceForecast {
    pub fn day(&self, date: &str) -> Option<&DayPrice> {
        self.monthly_calendar
            .values()
            .flatten()
            .find(|d| d.date == date)
    }

    /// Staff options offered by this forecast, taken from the first day that
    /// has any. The calendar is uniform in practice but days with no prices
    /// are skipped rather than trusted.
    pub fn staff_options(&self) -> Vec<u32> {
        self.monthly_calendar
            .values()
            .flatten()
            .find(|d| !d.staff_prices.is_empty())
            .map(|d| d.staff_prices.iter().map(|p| p.staff_count).collect())
            .unwrap_or_default()
    }
}
