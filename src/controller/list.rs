//! Generic list-page controller.
//!
//! One [`ListController`] backs one list page: it owns the page's
//! [`QueryState`], the last applied [`PaginatedResponse`] and a single error
//! slot, and it talks to the backend only through a [`ResourceClient`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Deserialize;
use tokio::sync::broadcast::{self, error::RecvError};

use crate::controller::binder::{self, QueryChange, Transition};
use crate::controller::events::{MutationAction, MutationBus, MutationEvent};
use crate::controller::query::QueryState;
use crate::domain::resource::{Resource, ResourceKind};
use crate::forms::FormError;
use crate::models::config::ConsoleConfig;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, PaginatedResponse};
use crate::resources::errors::{ClientError, ClientResult};
use crate::resources::{FileUpload, QueryParams, ResourceClient, UploadResource};

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

/// Which list response is shown when several fetches overlap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseOrdering {
    /// Only the response to the most recently issued request is applied.
    #[default]
    LatestIssued,
    /// Every successful response is applied as it settles; the last one to
    /// settle wins even if it answers an older query.
    LastSettled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListSettings {
    pub page_size: usize,
    pub ordering: ResponseOrdering,
}

impl Default for ListSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_ITEMS_PER_PAGE,
            ordering: ResponseOrdering::default(),
        }
    }
}

impl From<&ConsoleConfig> for ListSettings {
    fn from(config: &ConsoleConfig) -> Self {
        Self {
            page_size: config.page_size,
            ordering: config.response_ordering,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response replaced the displayed result.
    Applied,
    /// A newer request was issued meanwhile; the response was dropped.
    Discarded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Refresh {
    /// The query did not change, nothing was requested.
    Unchanged,
    Fetched(FetchOutcome),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Deletion {
    Deleted,
    /// The user declined the confirmation; nothing was sent.
    Cancelled,
}

/// Blocking confirmation asked before destructive operations.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Point-in-time copy of everything a list page renders from.
#[derive(Clone, Debug, PartialEq)]
pub struct ListSnapshot<T> {
    pub query: QueryState,
    pub result: PaginatedResponse<T>,
    pub error: Option<ClientError>,
}

struct ListState<T> {
    query: QueryState,
    result: PaginatedResponse<T>,
    error: Option<ClientError>,
    in_flight: usize,
    latest_token: u64,
}

fn lock<T>(state: &Mutex<ListState<T>>) -> MutexGuard<'_, ListState<T>> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Keeps `loading` true while a list request is outstanding, including when
/// the fetch future is dropped before it settles.
struct InFlight<'a, T> {
    state: &'a Mutex<ListState<T>>,
    armed: bool,
}

impl<'a, T> InFlight<'a, T> {
    fn settle(mut self) -> MutexGuard<'a, ListState<T>> {
        self.armed = false;
        let mut state = lock(self.state);
        state.in_flight = state.in_flight.saturating_sub(1);
        state.query.loading = state.in_flight > 0;
        state
    }
}

impl<T> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        if self.armed {
            let mut state = lock(self.state);
            state.in_flight = state.in_flight.saturating_sub(1);
            state.query.loading = state.in_flight > 0;
        }
    }
}

pub struct ListController<C: ResourceClient> {
    client: C,
    settings: ListSettings,
    state: Mutex<ListState<C::Item>>,
    bus: Option<MutationBus>,
    instance: u64,
}

impl<C> ListController<C>
where
    C: ResourceClient,
    C::Item: Resource,
{
    /// Creates a controller in its initial state: page 1, no search, no
    /// filters, `loading = true`. Call [`ListController::mount`] to issue the
    /// first fetch.
    pub fn new(client: C, settings: ListSettings) -> Self {
        Self {
            client,
            settings,
            state: Mutex::new(ListState {
                query: QueryState::default(),
                result: PaginatedResponse::default(),
                error: None,
                in_flight: 0,
                latest_token: 0,
            }),
            bus: None,
            instance: NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Starts from a restored query (e.g. parsed from the page URL) instead
    /// of the initial one. Takes effect on the next fetch.
    pub fn with_query(self, query: QueryState) -> Self {
        {
            let mut state = lock(&self.state);
            let loading = state.query.loading;
            state.query = QueryState {
                page: query.page.max(1),
                loading,
                ..query
            };
        }
        self
    }

    /// Publishes this controller's successful mutations on `bus`.
    pub fn with_bus(mut self, bus: MutationBus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Builds the controller and immediately issues its first fetch.
    pub async fn mounted(client: C, settings: ListSettings) -> Self {
        let controller = Self::new(client, settings);
        // A failed first fetch is kept in the error slot.
        let _ = controller.mount().await;
        controller
    }

    pub async fn mount(&self) -> ClientResult<FetchOutcome> {
        log::debug!("Mounting {} list", Self::kind());
        self.fetch().await
    }

    pub fn kind() -> ResourceKind {
        C::Item::KIND
    }

    pub fn settings(&self) -> ListSettings {
        self.settings
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn query(&self) -> QueryState {
        lock(&self.state).query.clone()
    }

    pub fn loading(&self) -> bool {
        lock(&self.state).query.loading
    }

    pub fn error(&self) -> Option<ClientError> {
        lock(&self.state).error.clone()
    }

    pub fn dismiss_error(&self) {
        lock(&self.state).error = None;
    }

    pub fn count(&self) -> usize {
        lock(&self.state).result.count
    }

    pub fn snapshot(&self) -> ListSnapshot<C::Item>
    where
        C::Item: Clone,
    {
        let state = lock(&self.state);
        ListSnapshot {
            query: state.query.clone(),
            result: state.result.clone(),
            error: state.error.clone(),
        }
    }

    fn begin_fetch(&self) -> (InFlight<'_, C::Item>, u64, QueryParams) {
        let mut state = lock(&self.state);
        state.latest_token += 1;
        state.in_flight += 1;
        state.query.loading = true;
        let token = state.latest_token;
        let params = state.query.to_params();
        drop(state);

        (
            InFlight {
                state: &self.state,
                armed: true,
            },
            token,
            params,
        )
    }

    /// Fetches the page described by the current query and applies it.
    ///
    /// On failure the previous result stays in place and the error lands in
    /// the error slot.
    pub async fn fetch(&self) -> ClientResult<FetchOutcome> {
        let (in_flight, token, params) = self.begin_fetch();

        let result = self.client.list(&params).await;

        let mut state = in_flight.settle();
        let current = match self.settings.ordering {
            ResponseOrdering::LatestIssued => token == state.latest_token,
            ResponseOrdering::LastSettled => true,
        };

        match result {
            Ok(page) if current => {
                state.result = page;
                state.error = None;
                Ok(FetchOutcome::Applied)
            }
            Ok(_) => {
                log::debug!(
                    "Discarding stale {} response for request #{token}",
                    Self::kind()
                );
                Ok(FetchOutcome::Discarded)
            }
            Err(err) => {
                log::warn!("Failed to fetch {} {params:?}: {err}", Self::kind());
                if current {
                    state.error = Some(err.clone());
                }
                Err(err)
            }
        }
    }

    /// Applies a query change and fetches once if anything changed.
    pub async fn change(&self, change: QueryChange) -> ClientResult<Refresh> {
        let transition = {
            let mut state = lock(&self.state);
            binder::apply(&mut state.query, change)
        };

        match transition {
            Transition::Unchanged => Ok(Refresh::Unchanged),
            Transition::Refetch => self.fetch().await.map(Refresh::Fetched),
        }
    }

    pub async fn set_search(&self, search: impl Into<String>) -> ClientResult<Refresh> {
        self.change(QueryChange::Search(search.into())).await
    }

    pub async fn set_filter(
        &self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> ClientResult<Refresh> {
        self.change(QueryChange::filter(name, Some(value))).await
    }

    pub async fn clear_filter(&self, name: impl Into<String>) -> ClientResult<Refresh> {
        self.change(QueryChange::filter(name, None::<String>)).await
    }

    pub async fn clear_filters(&self) -> ClientResult<Refresh> {
        self.change(QueryChange::ClearFilters).await
    }

    pub async fn set_page(&self, page: u32) -> ClientResult<Refresh> {
        self.change(QueryChange::Page(page)).await
    }

    /// Moves to the next page unless the last known result ends here.
    pub async fn next_page(&self) -> ClientResult<Refresh> {
        let target = {
            let state = lock(&self.state);
            let total = state.result.total_pages(self.settings.page_size);
            let page = state.query.page as usize;
            (page < total).then_some(state.query.page + 1)
        };

        match target {
            Some(page) => self.set_page(page).await,
            None => Ok(Refresh::Unchanged),
        }
    }

    pub async fn previous_page(&self) -> ClientResult<Refresh> {
        let page = lock(&self.state).query.page;
        if page <= 1 {
            return Ok(Refresh::Unchanged);
        }
        self.set_page(page - 1).await
    }

    /// Re-fetches after a successful mutation. A failing refresh only lands in
    /// the error slot; the mutation itself succeeded.
    async fn refresh_after_mutation(&self) {
        if let Err(err) = self.fetch().await {
            log::warn!("Refresh after {} mutation failed: {err}", Self::kind());
        }
    }

    fn mutation_failed(&self, action: MutationAction, err: ClientError) -> ClientError {
        log::error!("Failed to {} {}: {err}", action.verb(), Self::kind());
        lock(&self.state).error = Some(err.clone());
        err
    }

    fn publish(&self, action: MutationAction, id: String) {
        if let Some(bus) = &self.bus {
            bus.publish(MutationEvent {
                kind: Self::kind(),
                action,
                id,
                origin: Some(self.instance),
            });
        }
    }

    async fn mutated(&self, action: MutationAction, id: String) {
        log::info!("{} {id} {action}", Self::kind());
        self.publish(action, id);
        self.refresh_after_mutation().await;
    }

    pub async fn create(&self, payload: &C::Create) -> ClientResult<C::Item> {
        match self.client.create(payload).await {
            Ok(item) => {
                self.mutated(MutationAction::Created, item.id_string()).await;
                Ok(item)
            }
            Err(err) => Err(self.mutation_failed(MutationAction::Created, err)),
        }
    }

    pub async fn update(&self, id: &str, payload: &C::Update) -> ClientResult<C::Item> {
        match self.client.update(id, payload).await {
            Ok(item) => {
                self.mutated(MutationAction::Updated, item.id_string()).await;
                Ok(item)
            }
            Err(err) => Err(self.mutation_failed(MutationAction::Updated, err)),
        }
    }

    /// Deletes `id` after the user accepts the confirmation.
    pub async fn delete(&self, id: &str, confirm: &dyn Confirm) -> ClientResult<Deletion> {
        let prompt = format!("Delete {} {id}? This cannot be undone.", Self::kind());
        if !confirm.confirm(&prompt) {
            log::debug!("Deletion of {} {id} cancelled", Self::kind());
            return Ok(Deletion::Cancelled);
        }

        match self.client.delete(id).await {
            Ok(()) => {
                self.mutated(MutationAction::Deleted, id.to_string()).await;
                Ok(Deletion::Deleted)
            }
            Err(err) => Err(self.mutation_failed(MutationAction::Deleted, err)),
        }
    }

    /// Validates `form` locally and creates the resource only when it passes.
    pub async fn create_validated<F>(&self, form: F) -> ClientResult<C::Item>
    where
        C::Create: TryFrom<F, Error = FormError>,
    {
        let payload = C::Create::try_from(form)
            .map_err(|err| self.rejected(MutationAction::Created, err))?;
        self.create(&payload).await
    }

    pub async fn update_validated<F>(&self, id: &str, form: F) -> ClientResult<C::Item>
    where
        C::Update: TryFrom<F, Error = FormError>,
    {
        let payload = C::Update::try_from(form)
            .map_err(|err| self.rejected(MutationAction::Updated, err))?;
        self.update(id, &payload).await
    }

    fn rejected(&self, action: MutationAction, err: FormError) -> ClientError {
        log::debug!("Rejected {} {} form: {err}", action.verb(), Self::kind());
        let err = ClientError::from(err);
        lock(&self.state).error = Some(err.clone());
        err
    }

    /// Refreshes whenever another component reports a mutation of this
    /// controller's resource. Returns once the bus is closed.
    pub async fn follow(&self, mut events: broadcast::Receiver<MutationEvent>) {
        loop {
            match events.recv().await {
                Ok(event) => {
                    if event.kind != Self::kind() || event.origin == Some(self.instance) {
                        continue;
                    }
                    log::debug!("{} {} {}, refreshing", event.kind, event.id, event.action);
                    let _ = self.fetch().await;
                }
                Err(RecvError::Lagged(skipped)) => {
                    log::warn!("Missed {skipped} mutation events, refreshing {}", Self::kind());
                    let _ = self.fetch().await;
                }
                Err(RecvError::Closed) => break,
            }
        }
    }
}

impl<C> ListController<C>
where
    C: UploadResource,
    C::Item: Resource,
{
    pub async fn upload(&self, upload: &FileUpload) -> ClientResult<C::Item> {
        match self.client.upload(upload).await {
            Ok(item) => {
                self.mutated(MutationAction::Uploaded, item.id_string()).await;
                Ok(item)
            }
            Err(err) => Err(self.mutation_failed(MutationAction::Uploaded, err)),
        }
    }
}
