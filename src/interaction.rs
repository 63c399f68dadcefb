//! Pin click handling: card placement, async detail resolution, staleness.

use crate::core::bounds::ScreenRect;
use crate::core::config::CardLayout;
use crate::core::listing::{Listing, ListingDetail};
use crate::ui::card::{place_card, CardContent, CardState, OpenCard};
use crate::{MarkerError, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Resolves a listing row into its full record. Supplied by the host's data
/// layer; used only on pin click.
#[async_trait::async_trait]
pub trait ListingResolver: Send + Sync {
    async fn fetch_detail(&self, listing_id: &str) -> Result<ListingDetail>;
}

/// Handles pin clicks: computes an anchored card position, shows the
/// summary immediately, then swaps in the asynchronously fetched detail.
///
/// The card state is shared behind a mutex so overlapping clicks (a second
/// pin clicked before the first fetch resolves) serialize on it; each fetch
/// is tagged with the listing id and click generation it was issued for and
/// a response that no longer matches the open card is discarded, never
/// painted.
#[derive(Clone)]
pub struct PinInteractionController {
    state: Arc<Mutex<CardState>>,
    clicks: Arc<AtomicU64>,
    layout: CardLayout,
}

impl PinInteractionController {
    pub fn new(layout: CardLayout) -> Self {
        Self {
            state: Arc::new(Mutex::new(CardState::Hidden)),
            clicks: Arc::new(AtomicU64::new(0)),
            layout,
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, CardState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Snapshot of the current card state
    pub fn card_state(&self) -> CardState {
        self.lock_state().clone()
    }

    /// Opens the card for a clicked pin and resolves its detail.
    ///
    /// The card becomes visible with the listing's summary fields before the
    /// fetch starts, so the UI responds immediately. On fetch success the
    /// summary is replaced with the detailed record; on failure the card is
    /// hidden and the error surfaced rather than leaving partial data on
    /// screen. Opening a card implicitly closes any previous one.
    pub async fn open(
        &self,
        listing: &Listing,
        marker_rect: ScreenRect,
        container_rect: ScreenRect,
        resolver: &dyn ListingResolver,
    ) -> Result<()> {
        let (position, placement) = place_card(&marker_rect, &container_rect, &self.layout);
        let generation = self.clicks.fetch_add(1, Ordering::SeqCst) + 1;

        *self.lock_state() = CardState::Open(OpenCard {
            listing_id: listing.id.clone(),
            position,
            placement,
            content: CardContent::Summary(listing.clone()),
            generation,
        });

        match resolver.fetch_detail(&listing.id).await {
            Ok(detail) => {
                let mut state = self.lock_state();
                match &mut *state {
                    CardState::Open(card)
                        if card.listing_id == listing.id && card.generation == generation =>
                    {
                        card.content = CardContent::Detail(detail);
                    }
                    _ => {
                        log::debug!("discarding stale detail response for {}", listing.id);
                    }
                }
                Ok(())
            }
            Err(err) => {
                let mut state = self.lock_state();
                let still_current = matches!(
                    &*state,
                    CardState::Open(card)
                        if card.listing_id == listing.id && card.generation == generation
                );
                if still_current {
                    *state = CardState::Hidden;
                    log::warn!("detail fetch failed for {}: {err}", listing.id);
                    Err(MarkerError::DetailFetch {
                        listing_id: listing.id.clone(),
                        reason: err.to_string(),
                    })
                } else {
                    // The card moved on; a late failure is not an error.
                    log::debug!("ignoring stale fetch failure for {}", listing.id);
                    Ok(())
                }
            }
        }
    }

    /// Closes any open card immediately. An in-flight fetch for the closed
    /// card completes but its result is discarded.
    pub fn close(&self) {
        *self.lock_state() = CardState::Hidden;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::Point;
    use std::time::Duration;

    struct InstantResolver;

    #[async_trait::async_trait]
    impl ListingResolver for InstantResolver {
        async fn fetch_detail(&self, listing_id: &str) -> Result<ListingDetail> {
            Ok(ListingDetail {
                id: listing_id.to_string(),
                title: format!("detail {listing_id}"),
                description: "resolved".to_string(),
                price_starting: Some(99.0),
                images: vec![],
                region: None,
            })
        }
    }

    /// Resolver that sleeps a per-listing delay before answering
    struct DelayedResolver {
        delays_ms: Vec<(&'static str, u64)>,
    }

    #[async_trait::async_trait]
    impl ListingResolver for DelayedResolver {
        async fn fetch_detail(&self, listing_id: &str) -> Result<ListingDetail> {
            let delay = self
                .delays_ms
                .iter()
                .find(|(id, _)| *id == listing_id)
                .map(|(_, ms)| *ms)
                .unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(ListingDetail {
                id: listing_id.to_string(),
                title: format!("detail {listing_id}"),
                description: String::new(),
                price_starting: None,
                images: vec![],
                region: None,
            })
        }
    }

    struct FailingResolver;

    #[async_trait::async_trait]
    impl ListingResolver for FailingResolver {
        async fn fetch_detail(&self, listing_id: &str) -> Result<ListingDetail> {
            Err(MarkerError::DetailFetch {
                listing_id: listing_id.to_string(),
                reason: "backend down".to_string(),
            })
        }
    }

    fn pin() -> ScreenRect {
        ScreenRect::from_center_and_size(Point::new(400.0, 300.0), 64.0, 28.0)
    }

    fn container() -> ScreenRect {
        ScreenRect::from_coords(0.0, 0.0, 800.0, 600.0)
    }

    #[tokio::test]
    async fn test_open_resolves_detail() {
        let controller = PinInteractionController::new(CardLayout::default());
        let listing = Listing::new("l1", "Loft").at(40.7, -74.0).priced(150.0);

        controller
            .open(&listing, pin(), container(), &InstantResolver)
            .await
            .unwrap();

        let state = controller.card_state();
        let card = state.open_card().unwrap();
        assert_eq!(card.listing_id, "l1");
        assert!(matches!(card.content, CardContent::Detail(_)));
    }

    #[tokio::test]
    async fn test_second_click_wins_race() {
        let controller = PinInteractionController::new(CardLayout::default());
        let resolver = Arc::new(DelayedResolver {
            delays_ms: vec![("a", 80), ("b", 5)],
        });

        let listing_a = Listing::new("a", "Slow").at(40.7, -74.0);
        let listing_b = Listing::new("b", "Fast").at(40.8, -73.9);

        let first = {
            let controller = controller.clone();
            let resolver = Arc::clone(&resolver);
            tokio::spawn(async move {
                controller
                    .open(&listing_a, pin(), container(), resolver.as_ref())
                    .await
            })
        };
        // Let click A land before B arrives.
        tokio::time::sleep(Duration::from_millis(20)).await;
        controller
            .open(&listing_b, pin(), container(), resolver.as_ref())
            .await
            .unwrap();
        first.await.unwrap().unwrap();

        // A's late response must not have painted over B's card.
        let state = controller.card_state();
        let card = state.open_card().unwrap();
        assert_eq!(card.listing_id, "b");
        assert!(matches!(card.content, CardContent::Detail(ref d) if d.id == "b"));
    }

    #[tokio::test]
    async fn test_fetch_failure_hides_card() {
        let controller = PinInteractionController::new(CardLayout::default());
        let listing = Listing::new("l1", "Loft").at(40.7, -74.0);

        let result = controller
            .open(&listing, pin(), container(), &FailingResolver)
            .await;
        assert!(matches!(result, Err(MarkerError::DetailFetch { .. })));
        assert!(!controller.card_state().is_open());
    }

    #[tokio::test]
    async fn test_close_discards_inflight_result() {
        let controller = PinInteractionController::new(CardLayout::default());
        let resolver = Arc::new(DelayedResolver {
            delays_ms: vec![("a", 60)],
        });
        let listing = Listing::new("a", "Slow").at(40.7, -74.0);

        let open = {
            let controller = controller.clone();
            let resolver = Arc::clone(&resolver);
            tokio::spawn(async move {
                controller
                    .open(&listing, pin(), container(), resolver.as_ref())
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(controller.card_state().is_open());
        controller.close();

        open.await.unwrap().unwrap();
        assert!(!controller.card_state().is_open());
    }

    #[tokio::test]
    async fn test_stale_failure_is_silent() {
        let controller = PinInteractionController::new(CardLayout::default());
        let listing_a = Listing::new("a", "Broken").at(40.7, -74.0);
        let listing_b = Listing::new("b", "Fine").at(40.8, -73.9);

        // Open B first so A's failure arrives stale.
        controller
            .open(&listing_b, pin(), container(), &InstantResolver)
            .await
            .unwrap();

        // Simulate A's click having been superseded: open A, then B, with A
        // failing after B took over the card.
        let slow_fail = {
            struct SlowFail;
            #[async_trait::async_trait]
            impl ListingResolver for SlowFail {
                async fn fetch_detail(&self, listing_id: &str) -> Result<ListingDetail> {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    Err(MarkerError::DetailFetch {
                        listing_id: listing_id.to_string(),
                        reason: "late failure".to_string(),
                    })
                }
            }
            SlowFail
        };

        let first = {
            let controller = controller.clone();
            let listing_a = listing_a.clone();
            tokio::spawn(async move {
                controller
                    .open(&listing_a, pin(), container(), &slow_fail)
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        controller
            .open(&listing_b, pin(), container(), &InstantResolver)
            .await
            .unwrap();

        // The stale failure neither errors nor closes B's card.
        assert!(first.await.unwrap().is_ok());
        let state = controller.card_state();
        assert_eq!(state.open_listing_id(), Some("b"));
    }
}
