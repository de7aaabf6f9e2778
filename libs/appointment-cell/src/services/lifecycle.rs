use tracing::{debug, warn};

use shared_models::AppointmentStatus;

use crate::models::AppointmentError;

/// Decides which status changes are allowed. The relaxed lifecycle accepts
/// any change among the four statuses; the strict one follows the booking
/// flow and treats `Canceled` and `Completed` as terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppointmentLifecycle {
    strict: bool,
}

impl AppointmentLifecycle {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn parse_status(raw: Option<&str>) -> Result<AppointmentStatus, AppointmentError> {
        raw.map(str::trim)
            .ok_or(AppointmentError::InvalidStatus)?
            .parse::<AppointmentStatus>()
            .map_err(|_| AppointmentError::InvalidStatus)
    }

    /// Statuses reachable from `current` under the strict table.
    pub fn strict_transitions(current: AppointmentStatus) -> &'static [AppointmentStatus] {
        match current {
            AppointmentStatus::Booked => &[AppointmentStatus::Confirmed, AppointmentStatus::Canceled],
            AppointmentStatus::Confirmed => {
                &[AppointmentStatus::Completed, AppointmentStatus::Canceled]
            }
            // Terminal states
            AppointmentStatus::Canceled | AppointmentStatus::Completed => &[],
        }
    }

    pub fn validate_transition(
        &self,
        current: AppointmentStatus,
        next: AppointmentStatus,
    ) -> Result<(), AppointmentError> {
        debug!("Validating status transition {} -> {}", current, next);

        if !self.strict || current == next {
            return Ok(());
        }

        if Self::strict_transitions(current).contains(&next) {
            Ok(())
        } else {
            warn!("Invalid status transition attempted: {} -> {}", current, next);
            Err(AppointmentError::InvalidStatusTransition {
                from: current,
                to: next,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use AppointmentStatus::*;

    #[test]
    fn test_parse_status() {
        assert_eq!(AppointmentLifecycle::parse_status(Some("Confirmed")), Ok(Confirmed));
        assert_eq!(
            AppointmentLifecycle::parse_status(Some("Done")),
            Err(AppointmentError::InvalidStatus)
        );
        assert_eq!(
            AppointmentLifecycle::parse_status(None),
            Err(AppointmentError::InvalidStatus)
        );
    }

    #[test]
    fn test_relaxed_lifecycle_allows_any_change() {
        let lifecycle = AppointmentLifecycle::new(false);
        for from in AppointmentStatus::ALL {
            for to in AppointmentStatus::ALL {
                assert!(lifecycle.validate_transition(from, to).is_ok());
            }
        }
    }

    #[test]
    fn test_strict_lifecycle_table() {
        let lifecycle = AppointmentLifecycle::new(true);

        assert!(lifecycle.validate_transition(Booked, Confirmed).is_ok());
        assert!(lifecycle.validate_transition(Booked, Canceled).is_ok());
        assert!(lifecycle.validate_transition(Confirmed, Completed).is_ok());
        assert!(lifecycle.validate_transition(Confirmed, Canceled).is_ok());
        assert!(lifecycle.validate_transition(Completed, Completed).is_ok());

        assert_matches!(
            lifecycle.validate_transition(Booked, Completed),
            Err(AppointmentError::InvalidStatusTransition { from: Booked, to: Completed })
        );
        assert!(lifecycle.validate_transition(Canceled, Booked).is_err());
        assert!(lifecycle.validate_transition(Completed, Confirmed).is_err());
        assert!(lifecycle.validate_transition(Confirmed, Booked).is_err());
    }
}
