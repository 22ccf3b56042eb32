//! End-to-end coordinator tests against a scripted pricing gateway.
//!
//! All tests run on a paused tokio clock, so the throttle window and the
//! pacing delay between range-derivation requests are deterministic.

use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::time::Instant;

use paircalc_sdk::prelude::*;

const DELAY: Duration = Duration::from_millis(1000);

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn test_config() -> CalculatorConfig {
    CalculatorConfig {
        pair_id: 133,
        in_amount_min: dec("10000"),
        in_amount_max: dec("70000000"),
        step_in: dec("100"),
        step_out: dec("0.000001"),
        request_delay: DELAY,
    }
}

/// Gateway fake: solves the open side at a fixed (mutable) rate and records
/// every request with its arrival time.
struct ScriptedGateway {
    rate: Mutex<Decimal>,
    calls: Mutex<Vec<(CalcRequest, Instant)>>,
    failing: AtomicBool,
}

impl ScriptedGateway {
    fn new(rate: &str) -> Arc<Self> {
        Arc::new(Self {
            rate: Mutex::new(dec(rate)),
            calls: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
        })
    }

    fn set_rate(&self, rate: &str) {
        *self.rate.lock().unwrap() = dec(rate);
    }

    fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn calls(&self) -> Vec<(CalcRequest, Instant)> {
        self.calls.lock().unwrap().clone()
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl PricingGateway for ScriptedGateway {
    async fn pair_calc(&self, request: CalcRequest) -> Result<Quote, HttpError> {
        self.calls
            .lock()
            .unwrap()
            .push((request.clone(), Instant::now()));

        if self.failing.load(Ordering::SeqCst) {
            return Err(HttpError::Timeout);
        }

        let rate = *self.rate.lock().unwrap();
        let (in_amount, out_amount) = match (request.in_amount, request.out_amount) {
            (Some(v), None) => (v, v * rate),
            (None, Some(v)) => (v / rate, v),
            _ => {
                return Err(HttpError::BadRequest(
                    "exactly one side must be set".to_string(),
                ))
            }
        };

        Ok(Quote {
            in_amount,
            out_amount,
            price: RateFingerprint([rate.to_string(), (Decimal::ONE / rate).to_string()]),
        })
    }
}

async fn ready_calculator(gateway: Arc<ScriptedGateway>) -> Calculator {
    let calculator = Calculator::builder()
        .gateway(gateway)
        .config(test_config())
        .build()
        .expect("build should succeed");

    let mut states = calculator.subscribe();
    states
        .wait_for(|s| !s.is_loading)
        .await
        .expect("coordinator dropped");
    calculator
}

#[test]
fn build_without_gateway_fails() {
    let err = Calculator::builder().config(test_config()).build();
    assert!(matches!(err, Err(SdkError::Validation(_))));
}

#[tokio::test(start_paused = true)]
async fn init_derives_out_range_with_two_paced_requests() {
    let gateway = ScriptedGateway::new("0.01");
    let calculator = ready_calculator(gateway.clone()).await;

    let calls = gateway.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0.in_amount, Some(dec("10000")));
    assert_eq!(calls[0].0.out_amount, None);
    assert_eq!(calls[1].0.in_amount, Some(dec("70000000")));
    assert_eq!(calls[1].0.out_amount, None);
    // min-fetch and max-fetch separated by at least the pacing delay
    assert!(calls[1].1 - calls[0].1 >= DELAY);

    let state = calculator.state().await;
    assert!(!state.is_loading);
    assert_eq!(state.field(Field::Out).min, Some(dec("100")));
    assert_eq!(state.field(Field::Out).max, Some(dec("700000")));
    // initial strings come from the min-side response
    assert_eq!(state.field(Field::In).value, "10000");
    assert_eq!(state.field(Field::Out).value, "100");
}

#[tokio::test(start_paused = true)]
async fn init_failure_leaves_range_unset_but_clears_loading() {
    let gateway = ScriptedGateway::new("0.01");
    gateway.set_failing(true);

    let calculator = Calculator::builder()
        .gateway(gateway.clone())
        .config(test_config())
        .build()
        .unwrap();

    let mut states = calculator.subscribe();
    states.wait_for(|s| !s.is_loading).await.unwrap();

    let state = calculator.state().await;
    assert_eq!(state.field(Field::Out).min, None);
    assert_eq!(state.field(Field::Out).max, None);
    assert!(state.input_rules(Field::Out).disabled);
}

#[tokio::test(start_paused = true)]
async fn rapid_edits_collapse_to_one_trailing_request() {
    let gateway = ScriptedGateway::new("0.01");
    let calculator = ready_calculator(gateway.clone()).await;
    let before = gateway.call_count();

    calculator.handle_input_change("20000", Field::In).await;
    calculator.handle_input_change("25000", Field::In).await;
    calculator.handle_input_change("30000", Field::In).await;

    // the raw string is displayed immediately, before any round trip
    assert_eq!(calculator.state().await.field(Field::In).value, "30000");

    let mut states = calculator.subscribe();
    states
        .wait_for(|s| s.field(Field::Out).value == "300")
        .await
        .unwrap();

    let calls = gateway.calls();
    assert_eq!(calls.len() - before, 1, "edits within the window must coalesce");
    assert_eq!(calls[before].0.in_amount, Some(dec("30000")));
    assert_eq!(calls[before].0.out_amount, None);
}

#[tokio::test(start_paused = true)]
async fn out_edit_solves_for_in() {
    let gateway = ScriptedGateway::new("0.01");
    let calculator = ready_calculator(gateway.clone()).await;
    let before = gateway.call_count();

    calculator.handle_input_change("350000", Field::Out).await;

    let mut states = calculator.subscribe();
    states
        .wait_for(|s| s.field(Field::In).value == "35000000")
        .await
        .unwrap();

    let calls = gateway.calls();
    assert_eq!(calls[before].0.in_amount, None);
    assert_eq!(calls[before].0.out_amount, Some(dec("350000")));
}

#[tokio::test(start_paused = true)]
async fn invalid_input_snaps_to_minimum_and_still_recalculates() {
    let gateway = ScriptedGateway::new("0.01");
    let calculator = ready_calculator(gateway.clone()).await;
    let before = gateway.call_count();

    calculator.handle_input_change("30000", Field::In).await;
    calculator.handle_input_change("abc", Field::In).await;

    let state = calculator.state().await;
    assert_eq!(state.field(Field::In).value, "10000");
    assert_eq!(state.field(Field::In).percentage, Decimal::ZERO);

    // let the throttle window elapse and the request fire
    let mut waited = Duration::ZERO;
    while gateway.call_count() == before && waited < DELAY * 4 {
        tokio::time::advance(Duration::from_millis(100)).await;
        tokio::task::yield_now().await;
        waited += Duration::from_millis(100);
    }

    // trailing edge: the invalid edit's snap value wins the window
    assert_eq!(gateway.call_count() - before, 1);
    assert_eq!(gateway.calls()[before].0.in_amount, Some(dec("10000")));
}

#[tokio::test(start_paused = true)]
async fn percentage_change_is_eager_and_funnels_through_input_path() {
    let gateway = ScriptedGateway::new("0.01");
    let calculator = ready_calculator(gateway.clone()).await;

    calculator
        .handle_percentage_change(dec("100"), Field::In)
        .await;

    let state = calculator.state().await;
    assert_eq!(state.field(Field::In).percentage, dec("100"));
    assert_eq!(state.field(Field::In).value, "70000000");

    let mut states = calculator.subscribe();
    states
        .wait_for(|s| s.field(Field::Out).value == "700000")
        .await
        .unwrap();
}

#[tokio::test(start_paused = true)]
async fn percentage_change_ignored_while_out_range_unknown() {
    let gateway = ScriptedGateway::new("0.01");
    gateway.set_failing(true);

    let calculator = Calculator::builder()
        .gateway(gateway.clone())
        .config(test_config())
        .build()
        .unwrap();
    let mut states = calculator.subscribe();
    states.wait_for(|s| !s.is_loading).await.unwrap();
    let before = gateway.call_count();

    calculator
        .handle_percentage_change(dec("50"), Field::Out)
        .await;

    // percentage reflected, but no value to compute and nothing dispatched
    let state = calculator.state().await;
    assert_eq!(state.field(Field::Out).percentage, dec("50"));
    assert_eq!(state.field(Field::Out).value, "0");
    tokio::time::advance(DELAY * 2).await;
    tokio::task::yield_now().await;
    assert_eq!(gateway.call_count(), before);
}

#[tokio::test(start_paused = true)]
async fn transport_failure_preserves_displayed_state() {
    let gateway = ScriptedGateway::new("0.01");
    let calculator = ready_calculator(gateway.clone()).await;

    calculator.handle_input_change("30000", Field::In).await;
    let mut states = calculator.subscribe();
    states
        .wait_for(|s| s.field(Field::Out).value == "300")
        .await
        .unwrap();

    gateway.set_failing(true);
    let before = gateway.call_count();
    calculator.handle_input_change("40000", Field::In).await;

    // let the throttle fire and the request fail
    let mut waited = Duration::ZERO;
    while gateway.call_count() == before && waited < DELAY * 4 {
        tokio::time::advance(Duration::from_millis(100)).await;
        tokio::task::yield_now().await;
        waited += Duration::from_millis(100);
    }
    assert_eq!(gateway.call_count(), before + 1);

    let state = calculator.state().await;
    // the edited string stays responsive, the counterpart keeps last-good
    assert_eq!(state.field(Field::In).value, "40000");
    assert_eq!(state.field(Field::Out).value, "300");
}

#[tokio::test(start_paused = true)]
async fn rate_change_rebases_out_range() {
    let gateway = ScriptedGateway::new("0.01");
    let calculator = ready_calculator(gateway.clone()).await;

    gateway.set_rate("0.02");
    calculator.handle_input_change("30000", Field::In).await;

    let mut states = calculator.subscribe();
    // counterpart applies at the new rate first, without waiting for rebase
    states
        .wait_for(|s| s.field(Field::Out).value == "600")
        .await
        .unwrap();
    // the fingerprint change then re-derives the OUT range in the background
    states
        .wait_for(|s| s.field(Field::Out).max == Some(dec("1400000")))
        .await
        .unwrap();

    let state = calculator.state().await;
    assert_eq!(state.field(Field::Out).min, Some(dec("200")));

    // recalc + rebase min/max: three requests beyond the initial two
    assert_eq!(gateway.call_count(), 5);
}

#[tokio::test(start_paused = true)]
async fn steady_rate_does_not_rebase() {
    let gateway = ScriptedGateway::new("0.01");
    let calculator = ready_calculator(gateway.clone()).await;

    calculator.handle_input_change("30000", Field::In).await;
    let mut states = calculator.subscribe();
    states
        .wait_for(|s| s.field(Field::Out).value == "300")
        .await
        .unwrap();

    tokio::time::advance(DELAY * 3).await;
    tokio::task::yield_now().await;
    // initial two + one recalc, no range re-derivation
    assert_eq!(gateway.call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn close_cancels_background_work() {
    let gateway = ScriptedGateway::new("0.01");
    let calculator = ready_calculator(gateway.clone()).await;

    calculator.handle_input_change("30000", Field::In).await;
    calculator.close();

    tokio::time::advance(DELAY * 4).await;
    tokio::task::yield_now().await;
    // nothing fired after teardown
    assert_eq!(gateway.call_count(), 2);
}
