use crate::models::forecast::{DayPrice, StaffPrice};
use crate::models::scenario::PricingScenario;

/// Minimum valid price across a set of alternatives.
///
/// `index.is_none()` means every candidate was unavailable; `value` is then
/// positive infinity and callers must not render a best-price affordance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestPrice {
    pub value: f64,
    pub index: Option<usize>,
    pub staff_count: Option<u32>,
}

impl BestPrice {
    pub fn unavailable() -> Self {
        Self {
            value: f64::INFINITY,
            index: None,
            staff_count: None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        self.index.is_none()
    }
}

pub struct PricingService;

impl PricingService {
    /// Total price of a scenario: base price plus fees minus discounts.
    ///
    /// Amounts are accumulated as-is; negative or oversized entries are a
    /// data problem upstream and surface in the total unclamped. Rounding
    /// happens only at presentation time.
    pub fn compute_total(scenario: &PricingScenario) -> f64 {
        let fees: f64 = scenario.additional_fees.iter().map(|f| f.amount).sum();
        let discounts: f64 = scenario.discounts.iter().map(|d| d.amount).sum();
        scenario.base_price + fees - discounts
    }

    /// Scan priced options for the minimum non-NaN price. First occurrence
    /// wins on exact ties. Never panics, including on empty input.
    pub fn select_best_price(options: &[StaffPrice]) -> BestPrice {
        let mut best = BestPrice::unavailable();

        for (index, option) in options.iter().enumerate() {
            if option.price.is_nan() {
                continue;
            }
            if option.price < best.value {
                best = BestPrice {
                    value: option.price,
                    index: Some(index),
                    staff_count: Some(option.staff_count),
                };
            }
        }

        best
    }

    pub fn best_price_for_day(day: &DayPrice) -> BestPrice {
        Self::select_best_price(&day.staff_prices)
    }

    /// Look up a day's price entry by its explicit staff count, not by array
    /// position, so reordered upstream data cannot shift selections.
    pub fn staff_price<'a>(day: &'a DayPrice, staff_count: u32) -> Option<&'a StaffPrice> {
        day.staff_prices
            .iter()
            .find(|p| p.staff_count == staff_count)
    }

    /// How much a chosen day price beats the day's most expensive bookable
    /// option. Zero when it is the only (or the priciest) valid option.
    pub fn day_savings(day: &DayPrice, chosen_price: f64) -> f64 {
        let worst = day
            .staff_prices
            .iter()
            .map(|p| p.price)
            .filter(|p| !p.is_nan())
            .fold(f64::NEG_INFINITY, f64::max);

        if worst.is_finite() {
            (worst - chosen_price).max(0.0)
        } else {
            0.0
        }
    }

    /// Two-decimal currency formatting, applied at display time only.
    pub fn format_currency(amount: f64) -> String {
        if amount.is_nan() {
            return "unavailable".to_string();
        }
        if amount < 0.0 {
            format!("-${:.2}", amount.abs())
        } else {
            format!("${:.2}", amount)
        }
    }
}
