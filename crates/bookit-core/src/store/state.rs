// ── State snapshot ──

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::config::DEFAULT_ITEMS_PER_PAGE;
use crate::model::{Reservation, Resource, SystemStatus, User};

/// Top-level screen the client is showing.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ViewKind {
    #[default]
    Login,
    Dashboard,
}

/// Availability filter applied to the resource list.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ResourceFilter {
    #[default]
    All,
    Available,
    Unavailable,
}

impl ResourceFilter {
    pub fn accepts(self, resource: &Resource) -> bool {
        match self {
            Self::All => true,
            Self::Available => resource.available,
            Self::Unavailable => !resource.available,
        }
    }
}

/// Dashboard section in focus.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DashboardTab {
    #[default]
    Resources,
    Reservations,
    Upcoming,
    Admin,
}

/// Everything the client knows at one instant.
///
/// Snapshots are immutable once published; the store clones, edits and
/// republishes on every write.
#[derive(Debug, Clone)]
pub struct AppState {
    // session
    pub current_user: Option<User>,
    pub auth_token: Option<SecretString>,
    pub current_view: ViewKind,

    // domain lists
    pub resources: Vec<Resource>,
    pub reservations: Vec<Reservation>,
    pub filtered_resources: Vec<Resource>,
    pub system_status: Option<SystemStatus>,

    // ui
    pub search_query: String,
    pub current_filter: ResourceFilter,
    pub active_tab: DashboardTab,
    /// 1-based, always within `1..=total_pages`.
    pub current_page: usize,
    pub items_per_page: usize,
    pub total_pages: usize,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_ITEMS_PER_PAGE)
    }
}

impl AppState {
    pub fn with_page_size(items_per_page: usize) -> Self {
        Self {
            current_user: None,
            auth_token: None,
            current_view: ViewKind::Login,
            resources: Vec::new(),
            reservations: Vec::new(),
            filtered_resources: Vec::new(),
            system_status: None,
            search_query: String::new(),
            current_filter: ResourceFilter::All,
            active_tab: DashboardTab::Resources,
            current_page: 1,
            items_per_page: items_per_page.max(1),
            total_pages: 1,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth_token.is_some()
    }

    /// Reservations that start strictly after `now`, soonest first.
    pub fn upcoming_reservations_at(&self, now: DateTime<Utc>) -> Vec<Reservation> {
        let mut upcoming: Vec<Reservation> = self
            .reservations
            .iter()
            .filter(|r| r.is_upcoming_at(now))
            .cloned()
            .collect();
        upcoming.sort_by_key(|r| r.start_time);
        upcoming
    }

    /// The slice of `filtered_resources` on the current page.
    pub fn current_page_resources(&self) -> &[Resource] {
        let start = (self.current_page - 1) * self.items_per_page;
        let end = (start + self.items_per_page).min(self.filtered_resources.len());
        self.filtered_resources.get(start..end).unwrap_or(&[])
    }

    /// Recompute the filtered list and pagination from their inputs.
    pub(crate) fn recompute(&mut self) {
        let query = self.search_query.as_str();
        let filter = self.current_filter;
        self.filtered_resources = self
            .resources
            .iter()
            .filter(|r| filter.accepts(r) && r.matches_query(query))
            .cloned()
            .collect();

        self.items_per_page = self.items_per_page.max(1);
        self.total_pages = self
            .filtered_resources
            .len()
            .div_ceil(self.items_per_page)
            .max(1);
        self.current_page = self.current_page.clamp(1, self.total_pages);
    }
}
