// ── API-to-domain type conversions ──
//
// Bridges raw `bookit_api::models` response types into the canonical
// domain types. Status strings become enums; unknown values are kept as
// `Unknown` instead of failing the conversion.

use bookit_api::models::{
    AvailabilityResponse, HealthResponse, ReservationHistoryResponse, ReservationResponse,
    ResourceResponse, RoleRef, RoleResponse, SetupStatusResponse, UserResponse,
};

use crate::model::{
    AvailabilityInfo, HealthState, Reservation, ReservationHistory, ReservationStatus, Resource,
    Role, SetupStatus, SystemStatus, User,
};

// ── Users ──────────────────────────────────────────────────────────

impl From<UserResponse> for User {
    fn from(u: UserResponse) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            is_admin: u.is_admin,
            roles: u.roles.iter().map(RoleRef::name).map(str::to_owned).collect(),
        }
    }
}

// ── Resources ──────────────────────────────────────────────────────

impl From<ResourceResponse> for Resource {
    fn from(r: ResourceResponse) -> Self {
        Self {
            id: r.id,
            name: r.name,
            tags: r.tags,
            available: r.available,
        }
    }
}

impl From<AvailabilityResponse> for AvailabilityInfo {
    fn from(a: AvailabilityResponse) -> Self {
        Self {
            is_currently_available: a.is_currently_available,
            base_available: a.base_available,
            current_time: a.current_time,
            reservations: a.reservations.into_iter().map(Reservation::from).collect(),
        }
    }
}

// ── Reservations ───────────────────────────────────────────────────

impl From<ReservationResponse> for Reservation {
    fn from(r: ReservationResponse) -> Self {
        Self {
            id: r.id,
            resource_id: r.resource_id,
            resource: r.resource.map(Resource::from),
            user_id: r.user_id,
            start_time: r.start_time,
            end_time: r.end_time,
            status: ReservationStatus::from_api(&r.status),
            created_at: r.created_at,
        }
    }
}

impl From<ReservationHistoryResponse> for ReservationHistory {
    fn from(h: ReservationHistoryResponse) -> Self {
        Self {
            id: h.id,
            reservation_id: h.reservation_id,
            action: h.action,
            user_id: h.user_id,
            timestamp: h.timestamp,
            details: h.details,
        }
    }
}

// ── System ─────────────────────────────────────────────────────────

impl From<HealthResponse> for SystemStatus {
    fn from(h: HealthResponse) -> Self {
        let status = if h.status.eq_ignore_ascii_case("healthy") {
            HealthState::Healthy
        } else {
            HealthState::Error
        };
        Self {
            status,
            timestamp: h.timestamp,
            background_tasks: h.background_tasks,
            error: h.error,
        }
    }
}

impl From<SetupStatusResponse> for SetupStatus {
    fn from(s: SetupStatusResponse) -> Self {
        Self {
            user_count: s.user_count,
            setup_complete: s.setup_complete,
        }
    }
}

impl From<RoleResponse> for Role {
    fn from(r: RoleResponse) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: r.description,
            permissions: r.permissions,
        }
    }
}
