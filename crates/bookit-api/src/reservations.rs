// Reservation endpoints

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{CreateReservationRequest, ReservationHistoryResponse, ReservationResponse};

impl ApiClient {
    /// Reservations owned by the current user.
    ///
    /// `GET /api/v1/reservations/me?include_cancelled=`
    pub async fn my_reservations(
        &self,
        include_cancelled: bool,
    ) -> Result<Vec<ReservationResponse>, Error> {
        self.get(
            "api/v1/reservations/me",
            &[("include_cancelled", include_cancelled.to_string())],
        )
        .await
    }

    /// `POST /api/v1/reservations`
    pub async fn create_reservation(
        &self,
        request: &CreateReservationRequest,
    ) -> Result<ReservationResponse, Error> {
        debug!(resource_id = request.resource_id, "creating reservation");
        self.post("api/v1/reservations", request).await
    }

    /// Cancel a reservation. The backend answers 204 or a JSON ack.
    ///
    /// `DELETE /api/v1/reservations/{id}`
    pub async fn cancel_reservation(&self, id: i64) -> Result<(), Error> {
        debug!(id, "cancelling reservation");
        self.delete(&format!("api/v1/reservations/{id}")).await
    }

    /// `GET /api/v1/reservations/{id}/history`
    pub async fn reservation_history(
        &self,
        id: i64,
    ) -> Result<Vec<ReservationHistoryResponse>, Error> {
        self.get(&format!("api/v1/reservations/{id}/history"), &[])
            .await
    }
}
