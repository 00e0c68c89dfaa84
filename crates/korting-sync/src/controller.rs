//! The synchronization controller.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use korting_commerce::search::{FilterChange, FilterCriteria, FilterField, OfferList, ParamSet};
use korting_commerce::{Stats, ValidationError};
use korting_data::{DataSource, DataSourceError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::SyncConfig;
use crate::slot::Slot;
use crate::state::{DashboardSnapshot, DashboardState, Phase, OFFERS_ERROR, STARTUP_ERROR};

/// The answer of a spawned fetch.
#[derive(Debug)]
pub enum Completion {
    Offers {
        generation: u64,
        params: ParamSet,
        result: Result<OfferList, DataSourceError>,
    },
    Supermarkets(Result<BTreeSet<String>, DataSourceError>),
    Categories(Result<BTreeSet<String>, DataSourceError>),
    Stats(Result<Stats, DataSourceError>),
}

/// The fetches issued once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StartupFetch {
    Supermarkets,
    Categories,
    Stats,
}

/// What applying a completion did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Offers of the current generation were committed.
    Committed { generation: u64 },
    /// The current generation failed; previous offers kept.
    Failed { generation: u64 },
    /// A superseded generation answered and was ignored.
    Discarded { generation: u64 },
    /// A startup slot settled.
    Startup(StartupFetch),
}

/// Result of a filter change request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// A query was issued with this generation.
    Issued(u64),
    /// Criteria updated but the query would be the same as the last one.
    Unchanged,
    /// The edit was rejected; criteria are untouched.
    Rejected(ValidationError),
}

/// Keeps the dashboard in step with the user's filters.
///
/// Every offer query is tagged with a generation. Only the answer to the
/// most recently issued query is committed; older answers are dropped on
/// arrival, whatever order they come back in.
pub struct SyncController<S> {
    source: Arc<S>,
    config: SyncConfig,
    state: DashboardState,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    /// Offer tasks not yet answered, by generation.
    offer_tasks: BTreeMap<u64, JoinHandle<()>>,
    startup_pending: usize,
    last_issued: Option<ParamSet>,
    started: bool,
}

impl<S: DataSource + 'static> SyncController<S> {
    /// Create a new controller over `source`.
    pub fn new(source: S) -> Self {
        Self::with_config(Arc::new(source), SyncConfig::default())
    }

    /// Create a controller with explicit configuration.
    pub fn with_config(source: Arc<S>, config: SyncConfig) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            source,
            config,
            state: DashboardState::default(),
            completions_tx,
            completions_rx,
            offer_tasks: BTreeMap::new(),
            startup_pending: 0,
            last_issued: None,
            started: false,
        }
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.state.criteria
    }

    /// Generation of the most recently issued offer query.
    pub fn generation(&self) -> u64 {
        self.state.sync.generation
    }

    /// Check whether any fetch is still outstanding.
    pub fn is_settled(&self) -> bool {
        self.startup_pending == 0 && self.offer_tasks.is_empty()
    }

    /// Read-only copy of the current state.
    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot::new(&self.state, self.config.stats_fallback)
    }

    /// Load facets and stats, then issue the unconstrained offer query.
    ///
    /// Must be called inside a Tokio runtime. Calling it twice is a no-op.
    pub fn start(&mut self) {
        if self.started {
            tracing::debug!("controller already started");
            return;
        }
        self.started = true;
        tracing::info!("starting dashboard");

        let source = Arc::clone(&self.source);
        self.spawn_startup(async move {
            Completion::Supermarkets(source.fetch_supermarkets().await)
        });
        let source = Arc::clone(&self.source);
        self.spawn_startup(async move {
            Completion::Categories(source.fetch_categories().await)
        });
        let source = Arc::clone(&self.source);
        self.spawn_startup(async move { Completion::Stats(source.fetch_stats().await) });

        let params = self.state.criteria.to_params();
        self.issue(params);
    }

    /// Handle a `(field, value)` change from the UI.
    ///
    /// The field name `reset` restores the empty criteria. A missing or
    /// blank value clears the field.
    pub fn on_filter_change(&mut self, field: &str, value: Option<&str>) -> ChangeOutcome {
        match FilterChange::parse(field, value) {
            Ok(change) => self.apply_change(change),
            Err(e) => self.reject(e),
        }
    }

    /// Set one field from a raw value.
    pub fn edit(&mut self, field: FilterField, raw: &str) -> ChangeOutcome {
        self.apply_change(FilterChange::edit(field, raw))
    }

    /// Clear all filters and re-query.
    pub fn reset(&mut self) -> ChangeOutcome {
        self.apply_change(FilterChange::Reset)
    }

    /// Apply a parsed filter change.
    pub fn apply_change(&mut self, change: FilterChange) -> ChangeOutcome {
        let next = match change.apply(&self.state.criteria) {
            Ok(next) => next,
            Err(e) => return self.reject(e),
        };
        if let FilterChange::Edit { field, .. } = &change {
            if let Err(e) = self.check_facet(*field, &next) {
                return self.reject(e);
            }
        }

        self.state.criteria = next;
        let params = self.state.criteria.to_params();
        // Identical criteria still re-issue after a failed query.
        // After a failed query the same criteria re-issue, so they act as a retry.
        let is_reset = matches!(change, FilterChange::Reset);
        let failed = self.state.sync.phase == Phase::Failed;
        if !is_reset && !failed && self.last_issued.as_ref() == Some(&params) {
            tracing::debug!(query = %params, "criteria unchanged, no query issued");
            return ChangeOutcome::Unchanged;
        }

        ChangeOutcome::Issued(self.issue(params))
    }

    /// Wait for the next completion and apply it.
    ///
    /// Returns `None` when nothing is outstanding.
    pub async fn next_completion(&mut self) -> Option<Applied> {
        if self.is_settled() {
            return None;
        }
        let completion = self.completions_rx.recv().await?;
        Some(self.apply(completion))
    }

    /// Apply completions until no fetch is outstanding.
    pub async fn settle(&mut self) {
        while self.next_completion().await.is_some() {}
    }

    /// Apply completions until the startup fetches have all settled.
    pub async fn settle_startup(&mut self) {
        while self.startup_pending > 0 {
            if self.next_completion().await.is_none() {
                break;
            }
        }
    }

    fn reject(&self, error: ValidationError) -> ChangeOutcome {
        tracing::debug!(error = %error, "filter edit rejected");
        ChangeOutcome::Rejected(error)
    }

    /// A supermarket or category must be one of the loaded facet values.
    /// Unloaded facets accept anything.
    fn check_facet(&self, field: FilterField, next: &FilterCriteria) -> Result<(), ValidationError> {
        let Some(kind) = field.facet() else {
            return Ok(());
        };
        match (self.state.facet(kind).ready(), next.get(field)) {
            (Some(values), Some(value)) if !values.contains(&value) => {
                Err(ValidationError::UnknownFacetValue {
                    field: field.as_str(),
                    value,
                })
            }
            _ => Ok(()),
        }
    }

    fn spawn_startup<F>(&mut self, fetch: F)
    where
        F: std::future::Future<Output = Completion> + Send + 'static,
    {
        let tx = self.completions_tx.clone();
        self.startup_pending += 1;
        tokio::spawn(async move {
            let _ = tx.send(fetch.await);
        });
    }

    fn issue(&mut self, params: ParamSet) -> u64 {
        self.state.sync.generation += 1;
        let generation = self.state.sync.generation;
        self.state.sync.loading = true;
        self.state.sync.phase = Phase::Loading;
        self.last_issued = Some(params.clone());

        if self.config.abort_superseded {
            for (superseded, handle) in std::mem::take(&mut self.offer_tasks) {
                tracing::debug!(generation = superseded, "aborting superseded query");
                handle.abort();
            }
        }

        tracing::debug!(generation, key = %params.cache_key(), "issuing offer query");
        let source = Arc::clone(&self.source);
        let tx = self.completions_tx.clone();
        let handle = tokio::spawn(async move {
            let result = source.fetch_offers(&params).await;
            let _ = tx.send(Completion::Offers {
                generation,
                params,
                result,
            });
        });
        self.offer_tasks.insert(generation, handle);
        generation
    }

    fn apply(&mut self, completion: Completion) -> Applied {
        match completion {
            Completion::Offers {
                generation,
                params,
                result,
            } => {
                self.offer_tasks.remove(&generation);
                self.apply_offers(generation, &params, result)
            }
            Completion::Supermarkets(result) => {
                let slot = self.startup_slot(StartupFetch::Supermarkets, result);
                self.state.supermarkets = slot;
                Applied::Startup(StartupFetch::Supermarkets)
            }
            Completion::Categories(result) => {
                let slot = self.startup_slot(StartupFetch::Categories, result);
                self.state.categories = slot;
                Applied::Startup(StartupFetch::Categories)
            }
            Completion::Stats(result) => {
                let slot = self.startup_slot(StartupFetch::Stats, result);
                self.state.stats = slot;
                Applied::Startup(StartupFetch::Stats)
            }
        }
    }

    fn apply_offers(
        &mut self,
        generation: u64,
        params: &ParamSet,
        result: Result<OfferList, DataSourceError>,
    ) -> Applied {
        let sync = &mut self.state.sync;
        if generation != sync.generation {
            // Loading stays as it is: the current query is still outstanding.
            tracing::debug!(
                generation,
                current = sync.generation,
                "discarding superseded offers"
            );
            return Applied::Discarded { generation };
        }

        sync.loading = false;
        match result {
            Ok(list) => {
                tracing::info!(
                    generation,
                    query = %params,
                    count = list.len(),
                    total = list.total,
                    "offers loaded"
                );
                sync.offers = list.offers;
                sync.total = list.total;
                sync.error = None;
                sync.phase = Phase::Loaded;
                Applied::Committed { generation }
            }
            Err(e) => {
                tracing::warn!(generation, query = %params, error = %e, "offer query failed");
                sync.error = Some(format!("{}: {}", OFFERS_ERROR, e));
                sync.phase = Phase::Failed;
                Applied::Failed { generation }
            }
        }
    }

    fn startup_slot<T>(&mut self, fetch: StartupFetch, result: Result<T, DataSourceError>) -> Slot<T> {
        self.startup_pending = self.startup_pending.saturating_sub(1);
        if let Err(e) = &result {
            tracing::warn!(fetch = ?fetch, error = %e, "startup fetch failed");
            self.state.startup_error = Some(STARTUP_ERROR.to_string());
        }
        Slot::from_result(result)
    }
}
