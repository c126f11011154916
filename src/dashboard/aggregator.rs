//! Dashboard aggregation
//!
//! Pulls the caller's products and, once a pitch deck resolves, its shares,
//! analytics and commitments plus the investor directory they are joined
//! against, and folds them into one [`DashboardView`]. With no pitch deck the
//! product fetch is the only request. Every sub-fetch is fault-isolated: a
//! failing section degrades to an empty state and never blocks its siblings,
//! so a refresh always yields a view.
//!
//! Mentor and filtered investor listings are loaded on demand and are not
//! part of a refresh.

use super::activity::{ActivityEvent, build_activity_feed};
use super::interested::{InterestedInvestor, build_interested_investors};
use super::pitch_deck::resolve_eligible_pitch_deck;
use super::render::summary_line;
use super::state::{APPROVAL_PENDING_MESSAGE, DashboardView, PitchDeckRef, Section};
use crate::api::MarketplaceApi;
use crate::api::error::ApiError;
use crate::consts::cli_consts::RECENT_ACTIVITY_LIMIT;
use crate::environment::Environment;
use crate::error_classifier::ErrorClassifier;
use crate::events::{Event, EventType, Source};
use crate::ids::ResourceId;
use crate::logging::LogLevel;
use crate::model::{
    Commitment, DocumentAnalytics, InvestorFilter, InvestorProfile, MentorFilter, MentorProfile,
    Product, ShareRecord,
};
use crate::polling::{PollMode, PollState};
use crate::workers::core::EventSender;
use chrono::Utc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// The new view was stored and is returned.
    Applied(Box<DashboardView>),
    /// Another refresh was already in flight.
    Skipped,
    /// The context changed while fetching; results were dropped.
    Discarded,
}

/// Everything that hangs off the resolved pitch deck.
#[derive(Debug, Default)]
struct PitchDeckData {
    pitch_deck: Option<PitchDeckRef>,
    shares: Vec<ShareRecord>,
    analytics: DocumentAnalytics,
    commitments: Vec<Commitment>,
    investors: Section<InvestorProfile>,
    interested_investors: Vec<InterestedInvestor>,
    recent_activity: Vec<ActivityEvent>,
}

struct Inner {
    api: Arc<dyn MarketplaceApi>,
    view: RwLock<DashboardView>,
    /// Bumped on every context switch; results from older generations are stale.
    generation: AtomicU64,
    cancel: Mutex<CancellationToken>,
    refreshing: AtomicBool,
    events: EventSender,
    classifier: ErrorClassifier,
}

/// Clears the in-flight flag when a refresh ends, however it ends.
struct RefreshGuard<'a>(&'a AtomicBool);

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Clone)]
pub struct DashboardAggregator {
    inner: Arc<Inner>,
}

impl DashboardAggregator {
    pub fn new(api: Arc<dyn MarketplaceApi>, events: EventSender) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                view: RwLock::new(DashboardView::default()),
                generation: AtomicU64::new(0),
                cancel: Mutex::new(CancellationToken::new()),
                refreshing: AtomicBool::new(false),
                events,
                classifier: ErrorClassifier::new(),
            }),
        }
    }

    pub fn environment(&self) -> &Environment {
        self.inner.api.environment()
    }

    /// Snapshot of the current view model.
    pub async fn view(&self) -> DashboardView {
        self.inner.view.read().await.clone()
    }

    fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::Acquire)
    }

    async fn report(&self, what: &str, error: &ApiError) {
        let level = self.inner.classifier.classify_fetch_error(error);
        self.inner
            .events
            .send(
                Source::Aggregator,
                format!("Failed to load {}: {}", what, error),
                EventType::Error,
                level,
            )
            .await;
    }

    // =========================================================================
    // LOADS
    // =========================================================================

    /// The caller's products; empty on failure.
    pub async fn load_products(&self) -> Vec<Product> {
        match self.inner.api.my_products().await {
            Ok(products) => products,
            Err(e) => {
                self.report("products", &e).await;
                Vec::new()
            }
        }
    }

    /// Investor directory. A 403 becomes [`Section::PendingApproval`].
    pub async fn load_investors(&self, filter: &InvestorFilter) -> Section<InvestorProfile> {
        match self.inner.api.investors(filter).await {
            Ok(investors) => Section::Ready(investors),
            Err(e) if e.is_not_yet_approved() => {
                self.report("investors", &e).await;
                Section::PendingApproval(APPROVAL_PENDING_MESSAGE.to_string())
            }
            Err(e) => {
                self.report("investors", &e).await;
                Section::Unavailable(
                    "Investors could not be loaded. Please try again later.".into(),
                )
            }
        }
    }

    pub async fn load_mentors(&self, filter: &MentorFilter) -> Section<MentorProfile> {
        match self.inner.api.mentors(filter).await {
            Ok(mentors) => Section::Ready(mentors),
            Err(e) => {
                self.report("mentors", &e).await;
                Section::Unavailable("Mentors could not be loaded. Please try again later.".into())
            }
        }
    }

    /// Everything that hangs off the resolved pitch deck: shares, analytics,
    /// commitments, and the investor directory the shares are joined against.
    ///
    /// Issues no requests when nothing resolves. The four requests start
    /// together; only the interested-investor join waits for the directory.
    async fn load_pitch_deck_data(&self, products: &[Product]) -> PitchDeckData {
        let Some((product, document)) = resolve_eligible_pitch_deck(products) else {
            return PitchDeckData::default();
        };
        let (product_id, document_id) = (product.id, document.id);
        let api = &self.inner.api;
        let directory_filter = InvestorFilter::default();

        let (shares, analytics, commitments, investors) = tokio::join!(
            api.document_shares(product_id, document_id),
            api.document_analytics(product_id, document_id),
            api.product_commitments(product_id),
            self.load_investors(&directory_filter),
        );

        let shares = match shares {
            Ok(shares) => shares,
            Err(e) => {
                self.report("pitch deck shares", &e).await;
                Vec::new()
            }
        };
        let analytics = match analytics {
            Ok(analytics) => analytics,
            Err(e) => {
                self.report("pitch deck analytics", &e).await;
                DocumentAnalytics::default()
            }
        };
        let commitments = match commitments {
            Ok(commitments) => commitments,
            Err(e) => {
                self.report("commitments", &e).await;
                Vec::new()
            }
        };

        PitchDeckData {
            pitch_deck: Some(PitchDeckRef {
                product_id,
                document_id,
                product_name: product.name.clone(),
                document_title: document.title.clone(),
            }),
            interested_investors: build_interested_investors(&shares, investors.items()),
            recent_activity: build_activity_feed(Some((product, document)), &shares)
                .take(RECENT_ACTIVITY_LIMIT)
                .collect(),
            shares,
            analytics,
            commitments,
            investors,
        }
    }

    async fn assemble(&self) -> DashboardView {
        let products = self.load_products().await;
        let deck = self.load_pitch_deck_data(&products).await;

        DashboardView {
            products,
            pitch_deck: deck.pitch_deck,
            shares: deck.shares,
            analytics: deck.analytics,
            interested_investors: deck.interested_investors,
            investors: deck.investors,
            commitments: deck.commitments,
            recent_activity: deck.recent_activity,
            unread_count: 0,
            refreshed_at: Some(Utc::now()),
        }
    }

    // =========================================================================
    // REFRESH & CONTEXT
    // =========================================================================

    /// Re-fetches the dashboard and stores the result, unless a refresh is
    /// already running or the context changes before it completes.
    pub async fn refresh(&self) -> RefreshOutcome {
        if self.inner.refreshing.swap(true, Ordering::AcqRel) {
            return RefreshOutcome::Skipped;
        }
        let _guard = RefreshGuard(&self.inner.refreshing);

        let generation = self.generation();
        let token = self.inner.cancel.lock().await.clone();

        let assembled = tokio::select! {
            _ = token.cancelled() => None,
            view = self.assemble() => Some(view),
        };
        let Some(mut view) = assembled else {
            self.inner
                .events
                .send(
                    Source::Aggregator,
                    "Refresh cancelled by context change".to_string(),
                    EventType::Refresh,
                    LogLevel::Debug,
                )
                .await;
            return RefreshOutcome::Discarded;
        };

        let mut current = self.inner.view.write().await;
        if self.generation() != generation {
            return RefreshOutcome::Discarded;
        }
        view.unread_count = current.unread_count;
        *current = view.clone();
        drop(current);

        self.inner
            .events
            .send(
                Source::Aggregator,
                summary_line(&view),
                EventType::Success,
                LogLevel::Info,
            )
            .await;
        RefreshOutcome::Applied(Box::new(view))
    }

    /// Drops the current view and invalidates anything still in flight.
    /// Call when the data owner or view context changes.
    pub async fn switch_context(&self) {
        let mut view = self.inner.view.write().await;
        self.inner.generation.fetch_add(1, Ordering::AcqRel);
        let mut cancel = self.inner.cancel.lock().await;
        cancel.cancel();
        *cancel = CancellationToken::new();
        *view = DashboardView::default();
    }

    // =========================================================================
    // UNREAD COUNT
    // =========================================================================

    /// One poll step. Sends a request only if `state` allows it at this
    /// instant and returns the current count either way.
    pub async fn poll_unread_count(&self, state: &mut PollState) -> u64 {
        if !state.can_request(Instant::now()) {
            return self.inner.view.read().await.unread_count;
        }

        let generation = self.generation();
        match self.inner.api.unread_count().await {
            Ok(count) => {
                state.record_success(Instant::now());
                let mut view = self.inner.view.write().await;
                if self.generation() == generation {
                    view.unread_count = count;
                }
                view.unread_count
            }
            Err(e) if e.is_rate_limited() => {
                let now = Instant::now();
                state.record_rate_limited(now);
                self.inner
                    .events
                    .send_event(Event::poll_mode_change(
                        PollMode::Suppressed,
                        format!(
                            "Rate limited; pausing unread checks for {}s",
                            state.time_until_next(now).as_secs()
                        ),
                    ))
                    .await;
                self.inner.view.read().await.unread_count
            }
            Err(e) => {
                state.record_failure(Instant::now());
                self.report("unread count", &e).await;
                self.inner.view.read().await.unread_count
            }
        }
    }

    // =========================================================================
    // ACTIONS
    // =========================================================================

    /// Shares the resolved pitch deck with an investor.
    pub async fn share_pitch_deck(&self, investor_id: &str) -> Result<ShareRecord, ApiError> {
        let investor_id = ResourceId::parse("investor_id", investor_id)?;
        let generation = self.generation();

        let deck = {
            let view = self.inner.view.read().await;
            let deck = view.pitch_deck.clone().ok_or_else(|| {
                ApiError::InvalidInput("There is no approved pitch deck to share yet".into())
            })?;
            if view.shares.iter().any(|s| s.investor_id == investor_id) {
                return Err(ApiError::InvalidInput(
                    "The pitch deck is already shared with this investor".into(),
                ));
            }
            deck
        };

        let share = self
            .inner
            .api
            .share_document(deck.product_id, deck.document_id, investor_id)
            .await?;

        let mut guard = self.inner.view.write().await;
        let view = &mut *guard;
        if self.generation() == generation && view.pitch_deck.as_ref() == Some(&deck) {
            view.shares.push(share.clone());
            view.interested_investors =
                build_interested_investors(&view.shares, view.investors.items());
            view.recent_activity =
                build_activity_feed(resolve_eligible_pitch_deck(&view.products), &view.shares)
                    .take(RECENT_ACTIVITY_LIMIT)
                    .collect();
        }
        Ok(share)
    }

    pub async fn accept_commitment(
        &self,
        product_id: &str,
        commitment_id: &str,
    ) -> Result<Commitment, ApiError> {
        let product_id = ResourceId::parse("product_id", product_id)?;
        let commitment_id = ResourceId::parse("commitment_id", commitment_id)?;
        let generation = self.generation();

        let commitment = self
            .inner
            .api
            .accept_commitment(product_id, commitment_id)
            .await?;
        self.apply_commitment(generation, product_id, &commitment).await;
        Ok(commitment)
    }

    pub async fn renegotiate_commitment(
        &self,
        product_id: &str,
        commitment_id: &str,
        message: &str,
    ) -> Result<Commitment, ApiError> {
        let product_id = ResourceId::parse("product_id", product_id)?;
        let commitment_id = ResourceId::parse("commitment_id", commitment_id)?;
        let message = message.trim();
        if message.is_empty() {
            return Err(ApiError::InvalidInput(
                "A message is required to renegotiate a commitment".into(),
            ));
        }
        let generation = self.generation();

        let commitment = self
            .inner
            .api
            .renegotiate_commitment(product_id, commitment_id, message.to_string())
            .await?;
        self.apply_commitment(generation, product_id, &commitment).await;
        Ok(commitment)
    }

    async fn apply_commitment(
        &self,
        generation: u64,
        product_id: ResourceId,
        commitment: &Commitment,
    ) {
        let mut view = self.inner.view.write().await;
        let same_product = view
            .pitch_deck
            .as_ref()
            .is_some_and(|deck| deck.product_id == product_id);
        if self.generation() == generation && same_product {
            view.upsert_commitment(commitment.clone());
        }
    }
}
