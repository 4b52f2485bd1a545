// ── Application controller ──
//
// Top-level orchestrator. Owns the store, the services and the view host;
// restores a persisted session on start and keeps the mounted view in
// step with `AppState::current_view`.

use std::sync::{Arc, Mutex, PoisonError};

use secrecy::SecretString;
use tracing::{debug, info, warn};

use bookit_api::ApiClient;

use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::model::User;
use crate::notify::Notifier;
use crate::service::Services;
use crate::session::TokenStore;
use crate::store::{AppState, AppStore, Subscription, ViewKind};

// ── Views ────────────────────────────────────────────────────────────

/// Surface that draws the two top-level views.
///
/// Called with the view host locked: implementations must not write to
/// the store from inside `mount` or `unmount`.
pub trait ViewRenderer: Send {
    fn mount(&mut self, view: ViewKind, state: &AppState);
    fn unmount(&mut self, view: ViewKind);
}

/// Renderer that draws nothing, for callers that only use the services.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessRenderer;

impl ViewRenderer for HeadlessRenderer {
    fn mount(&mut self, _view: ViewKind, _state: &AppState) {}
    fn unmount(&mut self, _view: ViewKind) {}
}

/// What the view host must do to show `requested`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Already showing it.
    Stay,
    Swap {
        unmount: Option<ViewKind>,
        mount: ViewKind,
    },
}

/// Pure transition rule over (mounted view, requested view).
pub fn transition(mounted: Option<ViewKind>, requested: ViewKind) -> Transition {
    match mounted {
        Some(current) if current == requested => Transition::Stay,
        current => Transition::Swap {
            unmount: current,
            mount: requested,
        },
    }
}

struct ViewHost {
    renderer: Box<dyn ViewRenderer>,
    mounted: Option<ViewKind>,
}

impl ViewHost {
    fn sync(&mut self, state: &AppState) {
        if let Transition::Swap { unmount, mount } = transition(self.mounted, state.current_view) {
            if let Some(old) = unmount {
                debug!(view = %old, "unmounting view");
                self.renderer.unmount(old);
            }
            debug!(view = %mount, "mounting view");
            self.renderer.mount(mount, state);
            self.mounted = Some(mount);
        }
    }

    fn unmount_all(&mut self) {
        if let Some(old) = self.mounted.take() {
            self.renderer.unmount(old);
        }
    }
}

// ── AppController ────────────────────────────────────────────────────

/// Cheaply cloneable via `Arc<ControllerInner>`.
#[derive(Clone)]
pub struct AppController {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: ClientConfig,
    services: Services,
    sessions: Arc<dyn TokenStore>,
    views: Arc<Mutex<ViewHost>>,
    subscription: Mutex<Option<Subscription>>,
}

impl AppController {
    /// Build the API client from `config` and wire everything together.
    /// Does not touch the network until [`start`](Self::start).
    pub fn new(
        config: ClientConfig,
        sessions: Arc<dyn TokenStore>,
        renderer: Box<dyn ViewRenderer>,
    ) -> Result<Self, CoreError> {
        let api = ApiClient::new(&config.url, &config.transport())?;
        Ok(Self::with_api(config, api, sessions, renderer))
    }

    /// Wire the controller around an existing API client.
    pub fn with_api(
        config: ClientConfig,
        api: ApiClient,
        sessions: Arc<dyn TokenStore>,
        renderer: Box<dyn ViewRenderer>,
    ) -> Self {
        let store = Arc::new(AppStore::with_page_size(config.items_per_page));
        let notifier = Notifier::new(config.notifications.clone());
        let services = Services::new(Arc::new(api), store, notifier, &config);
        Self {
            inner: Arc::new(ControllerInner {
                config,
                services,
                sessions,
                views: Arc::new(Mutex::new(ViewHost {
                    renderer,
                    mounted: None,
                })),
                subscription: Mutex::new(None),
            }),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn services(&self) -> &Services {
        &self.inner.services
    }

    pub fn store(&self) -> &Arc<AppStore> {
        self.inner.services.store()
    }

    pub fn notifier(&self) -> &Notifier {
        self.inner.services.notifier()
    }

    /// View currently mounted by the host, if any.
    pub fn mounted_view(&self) -> Option<ViewKind> {
        self.inner.views.lock().unwrap_or_else(PoisonError::into_inner).mounted
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Mount the initial view and restore a persisted session if present.
    ///
    /// Any failure while validating the session or loading dashboard data
    /// forces a logout (store and persisted token cleared) and lands on
    /// the login view. Returns the view the controller settled on.
    pub async fn start(&self) -> ViewKind {
        self.attach();

        let token = match self.inner.sessions.load() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "could not read stored session");
                None
            }
        };
        let Some(token) = token else {
            info!("no stored session");
            self.store().set_current_view(ViewKind::Login);
            return ViewKind::Login;
        };

        match self.enter_with_token(token).await {
            Ok(user) => {
                info!(username = %user.username, "session restored");
                ViewKind::Dashboard
            }
            Err(e) => {
                warn!(error = %e, "stored session rejected");
                self.force_logout();
                ViewKind::Login
            }
        }
    }

    /// Fetch resources, reservations and system status concurrently.
    ///
    /// Fails if any fetch fails; fetches that already succeeded have
    /// written their slice of the store.
    pub async fn load_dashboard_data(&self) -> Result<(), CoreError> {
        let s = &self.inner.services;
        tokio::try_join!(
            s.resources.load_resources(),
            s.reservations.load_reservations(false),
            s.system.load_status(),
        )?;
        Ok(())
    }

    /// Interactive login: authenticate, persist the token, load data and
    /// switch to the dashboard.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<User, CoreError> {
        self.attach();
        let (user, token) = self.inner.services.auth.login(username, password).await?;
        if let Err(e) = self.inner.sessions.save(&token) {
            warn!(error = %e, "could not persist session token");
        }
        if let Err(e) = self.load_dashboard_data().await {
            self.force_logout();
            return Err(e);
        }
        self.store().set_current_view(ViewKind::Dashboard);
        self.notifier()
            .success(format!("Welcome, {}", user.username));
        Ok(user)
    }

    pub fn logout(&self) {
        self.force_logout();
        self.notifier().info("Logged out");
    }

    /// Validate the persisted token without loading dashboard data.
    ///
    /// A rejected token is cleared everywhere; a network failure leaves
    /// it in place.
    pub async fn resume_session(&self) -> Result<User, CoreError> {
        let token = self
            .inner
            .sessions
            .load()?
            .ok_or(CoreError::NotLoggedIn)?;
        match self.inner.services.auth.restore_session(token).await {
            Ok(user) => Ok(user),
            Err(e) => {
                if e.is_auth() {
                    self.force_logout();
                }
                Err(e)
            }
        }
    }

    /// Stop reacting to the store and unmount whatever is showing.
    pub fn destroy(&self) {
        if let Some(sub) = self
            .inner
            .subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            sub.unsubscribe();
        }
        self.inner
            .views
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .unmount_all();
        debug!("controller destroyed");
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn attach(&self) {
        let mut slot = self
            .inner
            .subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            return;
        }

        let views = Arc::clone(&self.inner.views);
        *slot = Some(self.store().subscribe(move |state| {
            views.lock().unwrap_or_else(PoisonError::into_inner).sync(state);
        }));
        drop(slot);

        let state = self.store().state();
        self.inner
            .views
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .sync(&state);
    }

    async fn enter_with_token(&self, token: SecretString) -> Result<User, CoreError> {
        let user = self.inner.services.auth.restore_session(token).await?;
        self.load_dashboard_data().await?;
        self.store().set_current_view(ViewKind::Dashboard);
        Ok(user)
    }

    fn force_logout(&self) {
        self.inner.services.auth.logout();
        if let Err(e) = self.inner.sessions.clear() {
            warn!(error = %e, "could not clear stored session");
        }
    }
}
