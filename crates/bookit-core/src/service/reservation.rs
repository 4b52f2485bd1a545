// ── ReservationService ──
//
// Listing, creating and cancelling the current user's reservations.
// Writes are followed by a store refresh according to the configured
// `RefreshPolicy`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use bookit_api::models::CreateReservationRequest;

use super::ServiceContext;
use crate::config::RefreshPolicy;
use crate::error::CoreError;
use crate::model::{Reservation, ReservationHistory, ReservationStatus};

/// A completed write, used to patch the store without a reload.
enum Written {
    Created(Reservation),
    Cancelled(i64),
}

#[derive(Clone)]
pub struct ReservationService {
    ctx: ServiceContext,
    notify_create_failure: bool,
    /// `include_cancelled` of the last listing, reused by refreshes.
    include_cancelled: Arc<AtomicBool>,
}

impl ReservationService {
    pub(crate) fn new(ctx: ServiceContext, notify_create_failure: bool) -> Self {
        Self {
            ctx,
            notify_create_failure,
            include_cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replace the store's reservation list with the backend's.
    pub async fn load_reservations(
        &self,
        include_cancelled: bool,
    ) -> Result<Vec<Reservation>, CoreError> {
        self.include_cancelled
            .store(include_cancelled, Ordering::Relaxed);
        match self.ctx.api.my_reservations(include_cancelled).await {
            Ok(list) => {
                let list: Vec<Reservation> = list.into_iter().map(Reservation::from).collect();
                debug!(count = list.len(), include_cancelled, "reservations loaded");
                self.ctx.store.set_reservations(list.clone());
                Ok(list)
            }
            Err(e) => {
                let e = CoreError::from(e);
                warn!(error = %e, "failed to load reservations");
                self.ctx
                    .notifier
                    .error(format!("Failed to load reservations: {e}"));
                Err(e)
            }
        }
    }

    /// Book `resource_id` for `[start, end)`.
    ///
    /// Rejected locally, without touching the network, unless
    /// `end > start` and `start` lies in the future.
    pub async fn create_reservation(
        &self,
        resource_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Reservation, CoreError> {
        validate_window(start, end, Utc::now())?;

        let request = CreateReservationRequest {
            resource_id,
            start_time: start,
            end_time: end,
        };
        let result = async {
            let created = Reservation::from(self.ctx.api.create_reservation(&request).await?);
            self.after_write(Written::Created(created.clone())).await?;
            Ok::<_, CoreError>(created)
        }
        .await;

        match result {
            Ok(created) => {
                self.ctx
                    .notifier
                    .success("Reservation created successfully");
                Ok(created)
            }
            Err(e) => {
                warn!(resource_id, error = %e, "failed to create reservation");
                if self.notify_create_failure {
                    self.ctx
                        .notifier
                        .error(format!("Failed to create reservation: {e}"));
                }
                Err(e)
            }
        }
    }

    pub async fn cancel_reservation(&self, id: i64) -> Result<(), CoreError> {
        let result = async {
            self.ctx.api.cancel_reservation(id).await?;
            self.after_write(Written::Cancelled(id)).await
        }
        .await;

        match result {
            Ok(()) => {
                self.ctx
                    .notifier
                    .success("Reservation cancelled successfully");
                Ok(())
            }
            Err(e) => {
                warn!(id, error = %e, "failed to cancel reservation");
                self.ctx
                    .notifier
                    .error(format!("Failed to cancel reservation: {e}"));
                Err(e)
            }
        }
    }

    /// Audit trail of one reservation. Does not touch the store.
    pub async fn get_reservation_history(
        &self,
        id: i64,
    ) -> Result<Vec<ReservationHistory>, CoreError> {
        let history = self.ctx.api.reservation_history(id).await?;
        Ok(history.into_iter().map(ReservationHistory::from).collect())
    }

    /// Stored reservations that have not started yet, soonest first.
    pub fn get_upcoming_reservations(&self) -> Vec<Reservation> {
        self.ctx.store.upcoming_reservations()
    }

    pub fn is_reservation_upcoming(&self, reservation: &Reservation) -> bool {
        reservation.is_upcoming_at(Utc::now())
    }

    pub fn can_cancel_reservation(&self, reservation: &Reservation) -> bool {
        reservation.can_cancel_at(Utc::now())
    }

    // ── Private helpers ──────────────────────────────────────────────

    async fn after_write(&self, written: Written) -> Result<(), CoreError> {
        match self.ctx.refresh_policy {
            RefreshPolicy::Refetch => {
                let include_cancelled = self.include_cancelled.load(Ordering::Relaxed);
                self.load_reservations(include_cancelled).await.map(|_| ())
            }
            RefreshPolicy::OptimisticMerge => {
                let include_cancelled = self.include_cancelled.load(Ordering::Relaxed);
                self.ctx.store.update_reservations(|list| match written {
                    Written::Created(r) => {
                        list.retain(|x| x.id != r.id);
                        list.push(r);
                    }
                    Written::Cancelled(id) if include_cancelled => {
                        for r in list.iter_mut().filter(|r| r.id == id) {
                            r.status = ReservationStatus::Cancelled;
                        }
                    }
                    Written::Cancelled(id) => list.retain(|r| r.id != id),
                });
                Ok(())
            }
        }
    }
}

/// `end > start` and `start > now`.
pub(crate) fn validate_window(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), CoreError> {
    if end <= start {
        return Err(CoreError::validation("End time must be after start time"));
    }
    if start <= now {
        return Err(CoreError::validation("Start time must be in the future"));
    }
    Ok(())
}
