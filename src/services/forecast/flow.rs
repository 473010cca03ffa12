use chrono::Utc;
use uuid::Uuid;

use crate::models::forecast::{PriceComponents, PriceForecast};
use crate::models::scenario::{default_catalog, PriceLineItem, PricingScenario};
use crate::models::selection::{AcceptanceConfirmation, SelectedOption, SelectionResult};
use crate::services::forecast::interface::{ForecastOperations, LoadError, SubmitError};
use crate::services::pricing_service::PricingService;

/// The forecast screen, from first paint to a committed booking.
#[derive(Debug, Clone)]
pub enum ForecastScreen {
    Loading,
    Ready,
    Selected(Selection),
    Accepted(AcceptanceConfirmation),
    Failed(LoadError),
}

/// A priced choice the user is looking at. Derived from the loaded data on
/// every selection, never cached across loads.
#[derive(Debug, Clone)]
pub struct Selection {
    pub option: SelectedOption,
    pub base_price: f64,
    pub total_price: f64,
    pub savings: f64,
    pub additional_fees: Vec<PriceLineItem>,
    pub discounts: Vec<PriceLineItem>,
    pub components: Option<PriceComponents>,
    pub show_breakdown: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectError {
    NotLoaded,
    AlreadyAccepted,
    UnknownScenario,
    UnknownDate,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AcceptError {
    NothingSelected,
    AlreadyAccepted,
    Submission(SubmitError),
}

/// Selection flow for one forecast screen instance.
///
/// Owns the screen state machine and the loaded data; all I/O goes through
/// the injected [`ForecastOperations`] transport. One instance serves one
/// screen; dropping it discards any in-flight fetch result via the epoch
/// guard.
pub struct ForecastFlow<T: ForecastOperations> {
    ops: T,
    request_id: String,
    epoch: u64,
    state: ForecastScreen,
    forecast: Option<PriceForecast>,
    scenarios: Vec<PricingScenario>,
    last_submit_error: Option<SubmitError>,
}

impl<T: ForecastOperations> ForecastFlow<T> {
    pub fn new(ops: T, request_id: impl Into<String>) -> Self {
        Self {
            ops,
            request_id: request_id.into(),
            epoch: 0,
            state: ForecastScreen::Loading,
            forecast: None,
            scenarios: default_catalog(),
            last_submit_error: None,
        }
    }

    pub fn state(&self) -> &ForecastScreen {
        &self.state
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn forecast(&self) -> Option<&PriceForecast> {
        self.forecast.as_ref()
    }

    /// Scenario table in effect: the upstream's if it sent one, otherwise
    /// the built-in catalog.
    pub fn scenarios(&self) -> &[PricingScenario] {
        &self.scenarios
    }

    pub fn selection(&self) -> Option<&Selection> {
        match &self.state {
            ForecastScreen::Selected(selection) => Some(selection),
            _ => None,
        }
    }

    pub fn last_submit_error(&self) -> Option<&SubmitError> {
        self.last_submit_error.as_ref()
    }

    /// Fetch the forecast data. This is the screen's only inbound I/O: once
    /// the screen left `Loading`, further calls are no-ops and a fresh fetch
    /// requires [`reset`](Self::reset).
    pub async fn load(&mut self) -> &ForecastScreen {
        if !matches!(self.state, ForecastScreen::Loading) {
            return &self.state;
        }

        let epoch = self.epoch;
        let result = self.ops.load_forecast(&self.request_id).await;
        self.finish_load(epoch, result);
        &self.state
    }

    /// Discard the screen's data and return to `Loading`. Any fetch still in
    /// flight for the previous epoch is dropped when it completes.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.forecast = None;
        self.scenarios = default_catalog();
        self.last_submit_error = None;
        self.state = ForecastScreen::Loading;
    }

    fn finish_load(&mut self, epoch: u64, result: Result<PriceForecast, LoadError>) {
        if epoch != self.epoch {
            // Completion for a screen that was reset while the fetch was in
            // flight; its data must not land on the current screen.
            log::debug!(
                "dropping stale forecast load for request {} (epoch {} != {})",
                self.request_id,
                epoch,
                self.epoch
            );
            return;
        }

        match result {
            Ok(forecast) => {
                if !forecast.scenarios.is_empty() {
                    self.scenarios = forecast.scenarios.clone();
                }
                self.forecast = Some(forecast);
                self.state = ForecastScreen::Ready;
            }
            Err(e) => {
                log::error!("forecast load failed for request {}: {}", self.request_id, e);
                self.state = ForecastScreen::Failed(e);
            }
        }
    }

    fn ensure_selectable(&self) -> Result<(), SelectError> {
        match self.state {
            ForecastScreen::Ready | ForecastScreen::Selected(_) => Ok(()),
            ForecastScreen::Accepted(_) => Err(SelectError::AlreadyAccepted),
            ForecastScreen::Loading | ForecastScreen::Failed(_) => Err(SelectError::NotLoaded),
        }
    }

    /// Choose a service tier. The quote is computed from the scenario table
    /// on the spot.
    pub fn select_scenario(&mut self, scenario_id: &str) -> Result<&Selection, SelectError> {
        self.ensure_selectable()?;

        let scenario = self
            .scenarios
            .iter()
            .find(|s| s.id == scenario_id)
            .ok_or(SelectError::UnknownScenario)?
            .clone();

        let selection = Selection {
            option: SelectedOption::Scenario {
                scenario_id: scenario.id.clone(),
            },
            base_price: scenario.base_price,
            total_price: PricingService::compute_total(&scenario),
            savings: scenario.savings,
            additional_fees: scenario.additional_fees,
            discounts: scenario.discounts,
            components: None,
            show_breakdown: false,
        };

        self.state = ForecastScreen::Selected(selection);
        Ok(self.selection().unwrap())
    }

    /// Choose a calendar day and staff count. A combination with no bookable
    /// price is rejected and the screen state is left untouched.
    pub fn select_day(&mut self, date: &str, staff_count: u32) -> Result<&Selection, SelectError> {
        self.ensure_selectable()?;

        let forecast = self.forecast.as_ref().ok_or(SelectError::NotLoaded)?;
        let day = forecast.day(date).ok_or(SelectError::UnknownDate)?;
        let staff = PricingService::staff_price(day, staff_count).ok_or(SelectError::Unavailable)?;

        if staff.price.is_nan() {
            return Err(SelectError::Unavailable);
        }

        let selection = Selection {
            option: SelectedOption::CalendarDay {
                date: day.date.clone(),
                staff_count,
            },
            base_price: staff.components.base_price,
            total_price: staff.price,
            savings: PricingService::day_savings(day, staff.price),
            additional_fees: vec![],
            discounts: vec![],
            components: Some(staff.components.clone()),
            show_breakdown: false,
        };

        self.state = ForecastScreen::Selected(selection);
        Ok(self.selection().unwrap())
    }

    /// Expand or collapse the price breakdown. Returns the new visibility;
    /// meaningless (and false) outside of a selection.
    pub fn toggle_breakdown(&mut self) -> bool {
        if let ForecastScreen::Selected(selection) = &mut self.state {
            selection.show_breakdown = !selection.show_breakdown;
            selection.show_breakdown
        } else {
            false
        }
    }

    /// Commit the current selection: build the immutable acceptance payload
    /// and submit it once. Success ends the screen; failure keeps the
    /// selection so the user can retry manually.
    pub async fn accept(&mut self) -> Result<AcceptanceConfirmation, AcceptError> {
        let selection = match &self.state {
            ForecastScreen::Selected(selection) => selection.clone(),
            ForecastScreen::Accepted(_) => return Err(AcceptError::AlreadyAccepted),
            _ => return Err(AcceptError::NothingSelected),
        };

        let result = SelectionResult {
            selection_id: Uuid::new_v4(),
            request_id: self.request_id.clone(),
            option: selection.option,
            base_price: selection.base_price,
            total_price: selection.total_price,
            savings: selection.savings,
            additional_fees: selection.additional_fees,
            discounts: selection.discounts,
            components: selection.components,
            accepted_at: Utc::now(),
        };

        match self.ops.submit_acceptance(&result).await {
            Ok(confirmation) => {
                log::info!(
                    "acceptance confirmed for request {} at {}",
                    self.request_id,
                    PricingService::format_currency(result.total_price)
                );
                self.last_submit_error = None;
                self.state = ForecastScreen::Accepted(confirmation.clone());
                Ok(confirmation)
            }
            Err(e) => {
                log::warn!(
                    "acceptance submission failed for request {}: {}",
                    self.request_id,
                    e
                );
                self.last_submit_error = Some(e.clone());
                Err(AcceptError::Submission(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use serde_json::json;

    #[derive(Default)]
    struct FakeOps {
        forecast: Option<PriceForecast>,
        load_calls: Mutex<u32>,
        fail_submissions: Mutex<u32>,
        submissions: Mutex<Vec<SelectionResult>>,
    }

    impl FakeOps {
        fn with_forecast(forecast: PriceForecast) -> Self {
            Self {
                forecast: Some(forecast),
                ..Self::default()
            }
        }

        fn submission_count(&self) -> usize {
            self.submissions.lock().unwrap().len()
        }
    }

    impl ForecastOperations for &FakeOps {
        async fn load_forecast(&self, _request_id: &str) -> Result<PriceForecast, LoadError> {
            *self.load_calls.lock().unwrap() += 1;
            self.forecast
                .clone()
                .ok_or_else(|| LoadError::Upstream("pricing engine down".to_string()))
        }

        async fn submit_acceptance(
            &self,
            result: &SelectionResult,
        ) -> Result<AcceptanceConfirmation, SubmitError> {
            self.submissions.lock().unwrap().push(result.clone());

            let mut remaining = self.fail_submissions.lock().unwrap();
            if *remaining > 0 {
                *remaining -= 1;
                return Err(SubmitError::Upstream("booking service down".to_string()));
            }

            Ok(AcceptanceConfirmation {
                confirmation_id: "conf-1".to_string(),
                status: "confirmed".to_string(),
            })
        }
    }

    fn fixture_forecast() -> PriceForecast {
        serde_json::from_value(json!({
            "pricing_configuration": "standard",
            "base_parameters": {
                "distance": 12.0,
                "weight": 350.0,
                "service_level": "standard",
                "property_type": "apartment",
                "vehicle_type": "van"
            },
            "monthly_calendar": {
                "2026-09": [
                    {
                        "date": "2026-09-01",
                        "day": 1,
                        "is_weekend": false,
                        "is_holiday": false,
                        "holiday_name": null,
                        "weather_type": "clear",
                        "staff_prices": [
                            { "staff_count": 1, "price": 120.5, "components": { "base_price": 80.0 } },
                            { "staff_count": 2, "price": null },
                            { "staff_count": 3, "price": 99.0, "components": { "base_price": 80.0 } },
                            { "staff_count": 4, "price": null }
                        ],
                        "status": "available"
                    },
                    {
                        "date": "2026-09-02",
                        "day": 2,
                        "is_weekend": false,
                        "is_holiday": true,
                        "holiday_name": "Labor Day",
                        "weather_type": "clear",
                        "staff_prices": [
                            { "staff_count": 1, "price": null },
                            { "staff_count": 2, "price": null }
                        ],
                        "status": "blocked"
                    }
                ]
            }
        }))
        .unwrap()
    }

    #[actix_rt::test]
    async fn test_load_reaches_ready_once() {
        let ops = FakeOps::with_forecast(fixture_forecast());
        let mut flow = ForecastFlow::new(&ops, "req-1");

        assert!(matches!(flow.state(), ForecastScreen::Loading));
        flow.load().await;
        assert!(matches!(flow.state(), ForecastScreen::Ready));

        // Data is fetched once per screen; a second call must not refetch.
        flow.load().await;
        assert_eq!(*ops.load_calls.lock().unwrap(), 1);
    }

    #[actix_rt::test]
    async fn test_load_failure_is_terminal_until_reset() {
        let ops = FakeOps::default();
        let mut flow = ForecastFlow::new(&ops, "req-1");

        flow.load().await;
        assert!(matches!(flow.state(), ForecastScreen::Failed(_)));
        assert_eq!(
            flow.select_scenario("instant").unwrap_err(),
            SelectError::NotLoaded
        );

        flow.load().await;
        assert_eq!(*ops.load_calls.lock().unwrap(), 1);

        flow.reset();
        assert!(matches!(flow.state(), ForecastScreen::Loading));
        flow.load().await;
        assert_eq!(*ops.load_calls.lock().unwrap(), 2);
    }

    #[actix_rt::test]
    async fn test_stale_load_completion_is_dropped() {
        let ops = FakeOps::with_forecast(fixture_forecast());
        let mut flow = ForecastFlow::new(&ops, "req-1");

        flow.reset();
        flow.finish_load(0, Ok(fixture_forecast()));
        assert!(matches!(flow.state(), ForecastScreen::Loading));
        assert!(flow.forecast().is_none());

        flow.finish_load(1, Ok(fixture_forecast()));
        assert!(matches!(flow.state(), ForecastScreen::Ready));
    }

    #[actix_rt::test]
    async fn test_scenario_fallback_catalog() {
        let ops = FakeOps::with_forecast(fixture_forecast());
        let mut flow = ForecastFlow::new(&ops, "req-1");
        flow.load().await;

        let ids: Vec<&str> = flow.scenarios().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["instant", "bidding", "journey"]);
    }

    #[actix_rt::test]
    async fn test_select_day_builds_quote() {
        let ops = FakeOps::with_forecast(fixture_forecast());
        let mut flow = ForecastFlow::new(&ops, "req-1");
        flow.load().await;

        let selection = flow.select_day("2026-09-01", 3).unwrap();
        assert_eq!(selection.total_price, 99.0);
        assert_eq!(selection.base_price, 80.0);
        assert!((selection.savings - 21.5).abs() < 1e-9);
        assert_eq!(
            selection.option,
            SelectedOption::CalendarDay {
                date: "2026-09-01".to_string(),
                staff_count: 3
            }
        );
    }

    #[actix_rt::test]
    async fn test_unavailable_day_is_rejected() {
        let ops = FakeOps::with_forecast(fixture_forecast());
        let mut flow = ForecastFlow::new(&ops, "req-1");
        flow.load().await;

        assert_eq!(
            flow.select_day("2026-09-01", 2).unwrap_err(),
            SelectError::Unavailable
        );
        assert!(matches!(flow.state(), ForecastScreen::Ready));

        assert_eq!(
            flow.select_day("2026-09-02", 1).unwrap_err(),
            SelectError::Unavailable
        );
        assert_eq!(
            flow.select_day("2026-09-15", 1).unwrap_err(),
            SelectError::UnknownDate
        );
    }

    #[actix_rt::test]
    async fn test_accept_scenario_submits_exactly_once() {
        let ops = FakeOps::with_forecast(fixture_forecast());
        let mut flow = ForecastFlow::new(&ops, "req-1");
        flow.load().await;

        let total = flow.select_scenario("bidding").unwrap().total_price;
        assert!((total - 289.99).abs() < 1e-9);

        let confirmation = flow.accept().await.unwrap();
        assert_eq!(confirmation.status, "confirmed");
        assert!(matches!(flow.state(), ForecastScreen::Accepted(_)));

        let submissions = ops.submissions.lock().unwrap();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].request_id, "req-1");
        assert_eq!(submissions[0].total_price, total);
        assert_eq!(
            submissions[0].option,
            SelectedOption::Scenario {
                scenario_id: "bidding".to_string()
            }
        );
    }

    #[actix_rt::test]
    async fn test_accepted_is_terminal() {
        let ops = FakeOps::with_forecast(fixture_forecast());
        let mut flow = ForecastFlow::new(&ops, "req-1");
        flow.load().await;

        flow.select_scenario("instant").unwrap();
        flow.accept().await.unwrap();

        assert_eq!(flow.accept().await.unwrap_err(), AcceptError::AlreadyAccepted);
        assert_eq!(
            flow.select_scenario("journey").unwrap_err(),
            SelectError::AlreadyAccepted
        );
        assert_eq!(ops.submission_count(), 1);
    }

    #[actix_rt::test]
    async fn test_failed_submission_keeps_selection_for_retry() {
        let ops = FakeOps::with_forecast(fixture_forecast());
        *ops.fail_submissions.lock().unwrap() = 1;

        let mut flow = ForecastFlow::new(&ops, "req-1");
        flow.load().await;
        flow.select_day("2026-09-01", 3).unwrap();

        let err = flow.accept().await.unwrap_err();
        assert!(matches!(err, AcceptError::Submission(SubmitError::Upstream(_))));
        assert!(flow.selection().is_some());
        assert!(flow.last_submit_error().is_some());

        // No auto-retry happened; the manual retry is a fresh single submit.
        assert_eq!(ops.submission_count(), 1);
        flow.accept().await.unwrap();
        assert_eq!(ops.submission_count(), 2);
        assert!(flow.last_submit_error().is_none());
    }

    #[actix_rt::test]
    async fn test_accept_without_selection() {
        let ops = FakeOps::with_forecast(fixture_forecast());
        let mut flow = ForecastFlow::new(&ops, "req-1");
        flow.load().await;

        assert_eq!(flow.accept().await.unwrap_err(), AcceptError::NothingSelected);
        assert_eq!(ops.submission_count(), 0);
    }

    #[actix_rt::test]
    async fn test_breakdown_toggle() {
        let ops = FakeOps::with_forecast(fixture_forecast());
        let mut flow = ForecastFlow::new(&ops, "req-1");
        flow.load().await;

        assert!(!flow.toggle_breakdown());

        flow.select_scenario("instant").unwrap();
        assert!(flow.toggle_breakdown());
        assert!(!flow.toggle_breakdown());
    }
}
