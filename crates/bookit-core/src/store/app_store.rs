// ── AppStore ──
//
// Copy-on-write state container. Each setter clones the current snapshot,
// applies one bounded edit, recomputes derived UI state, publishes the
// new `Arc<AppState>`, then calls every subscriber in subscription order.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use arc_swap::ArcSwap;
use chrono::Utc;
use secrecy::SecretString;
use tokio::sync::watch;
use tracing::trace;

use super::state::{AppState, DashboardTab, ResourceFilter, ViewKind};
use super::stream::StateStream;
use crate::model::{Reservation, Resource, SystemStatus, User};

type Callback = Arc<dyn Fn(&Arc<AppState>) + Send + Sync>;
type SubscriberList = Mutex<Vec<(u64, Callback)>>;

/// The single authoritative state container.
pub struct AppStore {
    state: ArcSwap<AppState>,
    /// Serializes writers so no edit is lost between load and store.
    write: Mutex<()>,
    subscribers: Arc<SubscriberList>,
    next_id: AtomicU64,
    snapshot: watch::Sender<Arc<AppState>>,
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new(AppState::default())
    }
}

impl AppStore {
    pub fn new(initial: AppState) -> Self {
        let mut initial = initial;
        initial.recompute();
        let initial = Arc::new(initial);
        let (snapshot, _) = watch::channel(Arc::clone(&initial));
        Self {
            state: ArcSwap::new(initial),
            write: Mutex::new(()),
            subscribers: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicU64::new(0),
            snapshot,
        }
    }

    /// Store whose pagination starts at `items_per_page`.
    pub fn with_page_size(items_per_page: usize) -> Self {
        Self::new(AppState::with_page_size(items_per_page))
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Current snapshot (cheap `Arc` clone).
    pub fn state(&self) -> Arc<AppState> {
        self.state.load_full()
    }

    pub fn upcoming_reservations(&self) -> Vec<Reservation> {
        self.state.load().upcoming_reservations_at(Utc::now())
    }

    pub fn current_page_resources(&self) -> Vec<Resource> {
        self.state.load().current_page_resources().to_vec()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    /// Register a callback invoked after every write with the new snapshot.
    ///
    /// Callbacks run synchronously on the writer's thread, in the order
    /// they subscribed. Dropping the returned handle unsubscribes.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Arc<AppState>) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(callback)));
        trace!(id, "store subscriber added");
        Subscription {
            id,
            subscribers: Arc::downgrade(&self.subscribers),
        }
    }

    /// Async view of the same snapshots.
    pub fn watch(&self) -> StateStream {
        StateStream::new(self.snapshot.subscribe())
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    // ── Session ──────────────────────────────────────────────────────

    pub fn set_current_user(&self, user: Option<User>) {
        self.update(|s| s.current_user = user);
    }

    pub fn set_auth_token(&self, token: Option<SecretString>) {
        self.update(|s| s.auth_token = token);
    }

    pub fn set_current_view(&self, view: ViewKind) {
        self.update(|s| s.current_view = view);
    }

    /// Record a freshly authenticated session in one write.
    pub fn login(&self, user: User, token: SecretString) {
        self.update(|s| {
            s.current_user = Some(user);
            s.auth_token = Some(token);
        });
    }

    /// Reset session and domain data and return to the login view.
    /// Page size survives so the user's preference is kept.
    pub fn logout(&self) {
        self.update(|s| {
            *s = AppState::with_page_size(s.items_per_page);
        });
    }

    // ── Domain lists ─────────────────────────────────────────────────

    pub fn set_resources(&self, resources: Vec<Resource>) {
        self.update(|s| s.resources = resources);
    }

    pub fn set_reservations(&self, reservations: Vec<Reservation>) {
        self.update(|s| s.reservations = reservations);
    }

    /// Edit the reservation list in place.
    pub fn update_reservations(&self, edit: impl FnOnce(&mut Vec<Reservation>)) {
        self.update(|s| edit(&mut s.reservations));
    }

    /// Edit the resource list in place.
    pub fn update_resources(&self, edit: impl FnOnce(&mut Vec<Resource>)) {
        self.update(|s| edit(&mut s.resources));
    }

    pub fn set_system_status(&self, status: SystemStatus) {
        self.update(|s| s.system_status = Some(status));
    }

    // ── UI state ─────────────────────────────────────────────────────

    pub fn set_search_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.update(|s| {
            s.search_query = query;
            s.current_page = 1;
        });
    }

    pub fn set_filter(&self, filter: ResourceFilter) {
        self.update(|s| {
            s.current_filter = filter;
            s.current_page = 1;
        });
    }

    pub fn set_active_tab(&self, tab: DashboardTab) {
        self.update(|s| s.active_tab = tab);
    }

    /// Jump to a page; out-of-range values are clamped.
    pub fn set_page(&self, page: usize) {
        self.update(|s| s.current_page = page);
    }

    pub fn set_items_per_page(&self, items_per_page: usize) {
        self.update(|s| {
            s.items_per_page = items_per_page;
            s.current_page = 1;
        });
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn update(&self, edit: impl FnOnce(&mut AppState)) {
        let snapshot = {
            let _guard = self.write.lock().unwrap_or_else(PoisonError::into_inner);
            let mut next = AppState::clone(&self.state.load());
            edit(&mut next);
            next.recompute();
            let snapshot = Arc::new(next);
            self.state.store(Arc::clone(&snapshot));
            self.snapshot.send_replace(Arc::clone(&snapshot));
            snapshot
        };

        // Callbacks may write back into the store, so neither lock is held
        // while they run. A nested write publishes and delivers its own
        // snapshot to every subscriber; the rest of this round is stale.
        let callbacks: Vec<Callback> = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for callback in callbacks {
            if !Arc::ptr_eq(&snapshot, &self.state.load()) {
                trace!("snapshot superseded; stopping delivery");
                break;
            }
            callback(&snapshot);
        }
    }
}

// ── Subscription ─────────────────────────────────────────────────────

/// Handle returned by [`AppStore::subscribe`].
///
/// Unsubscribes on [`unsubscribe`](Self::unsubscribe) or when dropped.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    subscribers: Weak<SubscriberList>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        drop(self);
    }

    fn detach(&self) {
        if let Some(list) = self.subscribers.upgrade() {
            list.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|(id, _)| *id != self.id);
            trace!(id = self.id, "store subscriber removed");
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;

    use super::*;

    fn resource(id: i64, name: &str) -> Resource {
        Resource {
            id,
            name: name.into(),
            tags: vec!["desk".into()],
            available: true,
        }
    }

    #[test]
    fn subscriber_receives_the_published_snapshot() {
        let store = AppStore::default();
        let seen: Arc<Mutex<Vec<Arc<AppState>>>> = Arc::default();
        let sink = Arc::clone(&seen);
        let _sub = store.subscribe(move |s| sink.lock().unwrap().push(Arc::clone(s)));

        store.set_search_query("room");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(Arc::ptr_eq(&seen[0], &store.state()));
        assert_eq!(seen[0].search_query, "room");
    }

    #[test]
    fn subscribers_run_in_subscription_order() {
        let store = AppStore::default();
        let order: Arc<Mutex<Vec<&'static str>>> = Arc::default();
        let a = Arc::clone(&order);
        let b = Arc::clone(&order);
        let _first = store.subscribe(move |_| a.lock().unwrap().push("first"));
        let _second = store.subscribe(move |_| b.lock().unwrap().push("second"));

        store.set_active_tab(DashboardTab::Upcoming);

        assert_eq!(*order.lock().unwrap(), ["first", "second"]);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let store = AppStore::default();
        let count = Arc::new(AtomicU64::new(0));
        let c = Arc::clone(&count);
        let sub = store.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        store.set_page(1);
        sub.unsubscribe();
        store.set_page(1);

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn subscription_outliving_store_is_harmless() {
        let store = AppStore::default();
        let sub = store.subscribe(|_| {});
        drop(store);
        drop(sub);
    }

    #[test]
    fn callbacks_may_write_back() {
        let store = Arc::new(AppStore::default());
        let inner = Arc::clone(&store);
        let _sub = store.subscribe(move |s| {
            if s.current_view == ViewKind::Dashboard && s.active_tab != DashboardTab::Upcoming {
                inner.set_active_tab(DashboardTab::Upcoming);
            }
        });

        store.set_current_view(ViewKind::Dashboard);

        assert_eq!(store.state().active_tab, DashboardTab::Upcoming);
    }

    #[test]
    fn later_subscribers_never_see_a_superseded_snapshot() {
        let store = Arc::new(AppStore::default());
        let inner = Arc::clone(&store);
        let _writer = store.subscribe(move |s| {
            if s.current_view == ViewKind::Dashboard && s.active_tab != DashboardTab::Upcoming {
                inner.set_active_tab(DashboardTab::Upcoming);
            }
        });
        let seen: Arc<Mutex<Vec<Arc<AppState>>>> = Arc::default();
        let sink = Arc::clone(&seen);
        let _reader = store.subscribe(move |s| sink.lock().unwrap().push(Arc::clone(s)));

        store.set_current_view(ViewKind::Dashboard);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let last = seen.last().unwrap();
        assert!(Arc::ptr_eq(last, &store.state()));
        assert_eq!(last.active_tab, DashboardTab::Upcoming);
        assert_eq!(last.current_view, ViewKind::Dashboard);
    }

    #[test]
    fn poisoned_subscriber_lock_does_not_wedge_the_store() {
        let store = Arc::new(AppStore::default());
        let poisoner = Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.subscribers.lock().unwrap();
            panic!("subscriber registration failed");
        })
        .join();

        let count = Arc::new(AtomicU64::new(0));
        let c = Arc::clone(&count);
        let _sub = store.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        store.set_page(1);

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(store.subscriber_count(), 1);
    }

    #[test]
    fn search_resets_page_and_filters() {
        let store = AppStore::with_page_size(1);
        store.set_resources(vec![resource(1, "Room A"), resource(2, "Van")]);
        store.set_page(2);
        assert_eq!(store.state().current_page, 2);

        store.set_search_query("van");

        let s = store.state();
        assert_eq!(s.current_page, 1);
        assert_eq!(s.total_pages, 1);
        assert_eq!(s.filtered_resources.len(), 1);
        assert_eq!(store.current_page_resources()[0].name, "Van");
    }

    #[test]
    fn set_page_clamps() {
        let store = AppStore::with_page_size(2);
        store.set_resources((1..=5).map(|i| resource(i, "Desk")).collect());
        store.set_page(99);
        assert_eq!(store.state().current_page, 3);
        store.set_page(0);
        assert_eq!(store.state().current_page, 1);
    }

    #[test]
    fn logout_resets_everything_but_page_size() {
        let store = AppStore::with_page_size(25);
        store.login(
            User {
                id: Some(1),
                username: "alice".into(),
                email: None,
                is_admin: false,
                roles: vec![],
            },
            SecretString::from("tok".to_string()),
        );
        store.set_resources(vec![resource(1, "Room A")]);
        store.set_current_view(ViewKind::Dashboard);

        store.logout();

        let s = store.state();
        assert!(s.current_user.is_none());
        assert!(s.auth_token.is_none());
        assert!(s.resources.is_empty());
        assert_eq!(s.current_view, ViewKind::Login);
        assert_eq!(s.items_per_page, 25);
    }

    #[tokio::test]
    async fn watch_sees_latest_snapshot() {
        let store = AppStore::default();
        let mut stream = store.watch();
        store.set_filter(ResourceFilter::Unavailable);
        let snap = stream.changed().await.unwrap();
        assert_eq!(snap.current_filter, ResourceFilter::Unavailable);
    }

    #[tokio::test]
    async fn into_stream_starts_with_current_snapshot() {
        use futures_util::StreamExt;

        let store = AppStore::default();
        store.set_search_query("desk");
        let mut stream = store.watch().into_stream();
        let first = stream.next().await.unwrap();
        assert!(Arc::ptr_eq(&first, &store.state()));
    }
}
