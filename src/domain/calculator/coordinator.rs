//! Calculator coordinator — owns the two linked fields and orchestrates
//! throttled recalculation against the pricing gateway.
//!
//! Built around a background tokio task fed through an mpsc queue:
//! - Edits enqueue jobs; the worker coalesces jobs inside the throttle window
//!   (trailing edge) and fires at most one request per window.
//! - Every job carries a monotonic sequence number; responses older than the
//!   last one applied for a field are discarded.
//! - On construction a second task derives the OUT range (min-fetch → pacing
//!   delay → max-fetch). A rate-fingerprint change on any later quote spawns
//!   the same derivation again without blocking the field update.
//! - Subscribers observe state through a `watch` channel; a snapshot is
//!   published after every atomic mutation.

use crate::config::CalculatorConfig;
use crate::domain::calculator::{percent, CalculatorState};
use crate::domain::quote::wire::CalcRequest;
use crate::domain::quote::{PricingGateway, RateFingerprint};
use crate::error::SdkError;
use crate::shared::{format_amount, parse_amount, Field};

use async_lock::RwLock;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// A pending recalculation: the edited side, its numeric value, and the
/// dispatch sequence number used to drop stale responses.
struct RecalcJob {
    seq: u64,
    field: Field,
    value: Decimal,
}

fn field_index(field: Field) -> usize {
    match field {
        Field::In => 0,
        Field::Out => 1,
    }
}

struct Inner {
    gateway: Arc<dyn PricingGateway>,
    config: CalculatorConfig,
    state: RwLock<CalculatorState>,
    state_tx: watch::Sender<CalculatorState>,
    /// Fingerprint of the rate behind the current OUT range.
    last_price: RwLock<Option<RateFingerprint>>,
    /// Monotonic dispatch counter.
    seq: AtomicU64,
    /// Highest sequence applied per field (IN, OUT).
    applied: [AtomicU64; 2],
    rebasing: AtomicBool,
    rebase_task: Mutex<Option<JoinHandle<()>>>,
}

impl Inner {
    async fn publish(&self) {
        let snapshot = self.state.read().await.clone();
        self.state_tx.send_replace(snapshot);
    }

    /// The throttled callback: one gateway round trip, last-writer-wins.
    async fn recalculate(self: &Arc<Self>, job: &RecalcJob) {
        let request = CalcRequest::solve_for(self.config.pair_id, job.field, job.value);

        let quote = match self.gateway.pair_calc(request).await {
            Ok(quote) => quote,
            Err(err) => {
                tracing::warn!(field = %job.field, error = %err, "recalculation failed, keeping last state");
                return;
            }
        };

        // A newer response already landed for this field.
        let prev = self.applied[field_index(job.field)].fetch_max(job.seq, Ordering::AcqRel);
        if prev > job.seq {
            tracing::debug!(seq = job.seq, newest = prev, "discarding stale quote");
            return;
        }

        {
            let mut state = self.state.write().await;
            state.apply_counterpart(job.field, &quote);
        }
        self.publish().await;
        self.note_price(quote.price).await;
    }

    /// Record the latest fingerprint; a change means the OUT range is stale.
    async fn note_price(self: &Arc<Self>, price: RateFingerprint) {
        let changed = {
            let mut last = self.last_price.write().await;
            let changed = last.as_ref() != Some(&price);
            if changed {
                *last = Some(price);
            }
            changed
        };
        if changed {
            self.spawn_rebase();
        }
    }

    fn spawn_rebase(self: &Arc<Self>) {
        // One rebase in flight at a time.
        if self
            .rebasing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        let inner = self.clone();
        let handle = tokio::spawn(async move {
            inner.derive_out_range(false).await;
            inner.rebasing.store(false, Ordering::Release);
        });
        *self.rebase_task.lock().expect("rebase task lock poisoned") = Some(handle);
    }

    /// Derive the OUT range by pricing the IN minimum, waiting one pacing
    /// delay, then pricing the IN maximum.
    ///
    /// On the initial run this also seeds the field strings from the
    /// min-side response and clears the loading flag — even when a fetch
    /// fails, leaving the range unset and the UI degraded but alive.
    async fn derive_out_range(self: &Arc<Self>, initial: bool) {
        let min_quote = self
            .gateway
            .pair_calc(CalcRequest::solve_for(
                self.config.pair_id,
                Field::In,
                self.config.in_amount_min,
            ))
            .await
            .map_err(|err| tracing::warn!(error = %err, "range derivation min-fetch failed"))
            .ok();

        if let Some(quote) = &min_quote {
            let mut last = self.last_price.write().await;
            if last.is_none() {
                *last = Some(quote.price.clone());
            }
        }

        sleep(self.config.request_delay).await;

        let max_quote = self
            .gateway
            .pair_calc(CalcRequest::solve_for(
                self.config.pair_id,
                Field::In,
                self.config.in_amount_max,
            ))
            .await
            .map_err(|err| tracing::warn!(error = %err, "range derivation max-fetch failed"))
            .ok();

        {
            let mut state = self.state.write().await;
            if initial {
                state.is_loading = false;
            }

            if let (Some(min_quote), Some(max_quote)) = (min_quote, max_quote) {
                state.set_out_range(min_quote.out_amount, max_quote.out_amount);
                if initial {
                    state.set_value(Field::In, format_amount(min_quote.in_amount));
                    state.set_value(Field::Out, format_amount(min_quote.out_amount));
                }
            }
        }
        self.publish().await;
    }
}

/// The calculator coordinator: single owner of all mutable calculator state.
///
/// Create one per widget session via [`Calculator::builder`]; dropping it
/// cancels the worker and any in-flight range derivation.
pub struct Calculator {
    inner: Arc<Inner>,
    job_tx: mpsc::Sender<RecalcJob>,
    worker: JoinHandle<()>,
    init: JoinHandle<()>,
}

impl Calculator {
    pub fn builder() -> CalculatorBuilder {
        CalculatorBuilder::default()
    }

    /// Watch the calculator state; the receiver holds the latest snapshot and
    /// wakes after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<CalculatorState> {
        self.inner.state_tx.subscribe()
    }

    /// Current state snapshot.
    pub async fn state(&self) -> CalculatorState {
        self.inner.state.read().await.clone()
    }

    /// A field's value changed on the edit surface.
    ///
    /// Non-parseable input snaps the field to its minimum bound so the linked
    /// field still converges; parseable input is displayed immediately. Either
    /// way a throttled recalculation is scheduled.
    pub async fn handle_input_change(&self, value: &str, field: Field) {
        let numeric = {
            let mut state = self.inner.state.write().await;
            match parse_amount(value) {
                Some(v) => {
                    state.set_value(field, value.to_string());
                    v
                }
                None => state.snap_to_min(field),
            }
        };
        self.inner.publish().await;
        self.dispatch(field, numeric).await;
    }

    /// A percentage control (button/slider) changed.
    ///
    /// The percentage is reflected eagerly; the corresponding value funnels
    /// through [`Self::handle_input_change`] so throttling and snapping apply
    /// uniformly. Ignored while the field's range is unknown.
    pub async fn handle_percentage_change(&self, percent: Decimal, field: Field) {
        debug_assert!(
            percent >= Decimal::ZERO && percent <= Decimal::ONE_HUNDRED,
            "percentage out of [0, 100]: {percent}"
        );
        let percent = percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);

        let value = {
            let mut state = self.inner.state.write().await;
            state.set_percentage(field, percent);
            let f = state.field(field);
            f.range()
                .map(|(min, max)| percent::value_from_percentage(min, max, percent, f.decimal_limit))
        };
        self.inner.publish().await;

        if let Some(value) = value {
            self.handle_input_change(&value, field).await;
        }
    }

    async fn dispatch(&self, field: Field, value: Decimal) {
        let seq = self.inner.seq.fetch_add(1, Ordering::AcqRel) + 1;
        if self
            .job_tx
            .send(RecalcJob { seq, field, value })
            .await
            .is_err()
        {
            tracing::warn!("recalculation worker is gone; dropping job");
        }
    }

    /// Cancel all background work. Also runs on drop.
    pub fn close(&self) {
        self.worker.abort();
        self.init.abort();
        if let Some(rebase) = self
            .inner
            .rebase_task
            .lock()
            .expect("rebase task lock poisoned")
            .take()
        {
            rebase.abort();
        }
    }
}

impl Drop for Calculator {
    fn drop(&mut self) {
        self.close();
    }
}

/// Trailing-edge throttle loop: jobs arriving within one window coalesce to
/// the last, which fires once the window elapses.
async fn run_worker(inner: Arc<Inner>, mut rx: mpsc::Receiver<RecalcJob>) {
    while let Some(mut job) = rx.recv().await {
        let window = sleep(inner.config.request_delay);
        tokio::pin!(window);
        loop {
            tokio::select! {
                () = &mut window => break,
                next = rx.recv() => match next {
                    Some(newer) => job = newer,
                    None => break,
                },
            }
        }
        inner.recalculate(&job).await;
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct CalculatorBuilder {
    gateway: Option<Arc<dyn PricingGateway>>,
    config: CalculatorConfig,
}

impl CalculatorBuilder {
    /// Inject the pricing gateway (production HTTP adapter or a test fake).
    pub fn gateway(mut self, gateway: Arc<dyn PricingGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Use the production HTTP gateway against `base_url`.
    #[cfg(feature = "http")]
    pub fn http_gateway(self, base_url: &str, serial: &str) -> Self {
        self.gateway(Arc::new(crate::domain::quote::HttpGateway::connect(
            base_url, serial,
        )))
    }

    pub fn config(mut self, config: CalculatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the coordinator, spawning the throttle worker and the initial
    /// OUT-range derivation. Must be called within a tokio runtime.
    pub fn build(self) -> Result<Calculator, SdkError> {
        let gateway = self
            .gateway
            .ok_or_else(|| SdkError::Validation("a pricing gateway is required".to_string()))?;
        self.config.validate()?;

        let state = CalculatorState::new(&self.config);
        let (state_tx, _) = watch::channel(state.clone());

        let inner = Arc::new(Inner {
            gateway,
            config: self.config,
            state: RwLock::new(state),
            state_tx,
            last_price: RwLock::new(None),
            seq: AtomicU64::new(0),
            applied: [AtomicU64::new(0), AtomicU64::new(0)],
            rebasing: AtomicBool::new(false),
            rebase_task: Mutex::new(None),
        });

        let (job_tx, job_rx) = mpsc::channel(32);
        let worker = tokio::spawn(run_worker(inner.clone(), job_rx));
        let init = tokio::spawn({
            let inner = inner.clone();
            async move { inner.derive_out_range(true).await }
        });

        Ok(Calculator {
            inner,
            job_tx,
            worker,
            init,
        })
    }
}
