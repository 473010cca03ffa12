use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::forecast::PriceComponents;
use crate::models::scenario::PriceLineItem;

/// What the user committed to: a service tier, or a calendar day with a
/// staff count.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectedOption {
    Scenario { scenario_id: String },
    CalendarDay { date: String, staff_count: u32 },
}

/// The acceptance payload sent to the booking service.
///
/// Built only when the user explicitly accepts a selection, never mutated
/// afterwards. `total_price` is exactly the calculator's output for the
/// selection at acceptance time.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SelectionResult {
    pub selection_id: Uuid,
    pub request_id: String,
    #[serde(flatten)]
    pub option: SelectedOption,
    pub base_price: f64,
    pub total_price: f64,
    pub savings: f64,
    #[serde(default)]
    pub additional_fees: Vec<PriceLineItem>,
    #[serde(default)]
    pub discounts: Vec<PriceLineItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<PriceComponents>,
    pub accepted_at: DateTime<Utc>,
}

/// Booking service response to an acceptance. Tolerant of sparse bodies so
/// a 2xx with a minimal payload still counts as confirmed.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AcceptanceConfirmation {
    #[serde(default)]
    pub confirmation_id: String,
    #[serde(default)]
    pub status: String,
}
