//! Lifecycle service for event state transitions.

use super::reasons::LostReasonCatalog;
use crate::context::{CommandContext, Notification, Outcome};
use crate::error::DomainError;
use crate::event::{Event, EventState, EventStatus, LostDetails, StateChangeEntry};
use crate::permissions::{PermissionGate, Scope};

/// A requested state change and the data it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionRequest {
    /// Book the event.
    Confirm {
        /// Optional note stored on the history entry.
        reason: Option<String>,
    },
    /// The enquiry did not convert.
    Lose {
        /// Code from the configured reason list.
        reason_code: String,
        /// Required when the code is competition-flagged.
        competitor: Option<String>,
        /// Free-text notes.
        notes: Option<String>,
    },
    /// The booking was called off.
    Cancel {
        /// Required free-text reason.
        reason: String,
    },
}

impl TransitionRequest {
    /// Confirm without a note.
    #[must_use]
    pub fn confirm() -> Self {
        Self::Confirm { reason: None }
    }

    /// Lose with a reason code only.
    #[must_use]
    pub fn lose(reason_code: impl Into<String>) -> Self {
        Self::Lose {
            reason_code: reason_code.into(),
            competitor: None,
            notes: None,
        }
    }

    /// Cancel with a reason.
    #[must_use]
    pub fn cancel(reason: impl Into<String>) -> Self {
        Self::Cancel {
            reason: reason.into(),
        }
    }

    /// The state this request moves to.
    #[must_use]
    pub fn target(&self) -> EventState {
        match self {
            Self::Confirm { .. } => EventState::Confirmed,
            Self::Lose { .. } => EventState::Lost,
            Self::Cancel { .. } => EventState::Cancelled,
        }
    }
}

/// Stateless service for event state transitions.
pub struct LifecycleService;

impl LifecycleService {
    /// Move an event to a new commercial state.
    ///
    /// # Arguments
    /// * `event` - The event as read from the store
    /// * `ctx` - Caller identity, permissions and clock
    /// * `catalog` - Accepted reason codes for `lost`
    /// * `request` - Target state and its data
    ///
    /// # Returns
    /// * `Ok(Outcome)` with a new `StateChangeEntry` appended
    /// * `Err(DomainError::PermissionDenied)` without events modify
    /// * `Err(DomainError::CancellationNotAllowed)` when cancelling without the capability
    /// * `Err(DomainError::EventLocked)` if the event is already lost or cancelled
    /// * `Err(DomainError::InvalidTransition)` for any other disallowed move
    /// * Validation errors for a missing cancel reason or an unusable lost reason
    pub fn transition(
        event: &Event,
        ctx: &CommandContext,
        catalog: &LostReasonCatalog,
        request: TransitionRequest,
    ) -> Result<Outcome<Event>, DomainError> {
        let to = request.target();
        if to == EventState::Cancelled {
            PermissionGate::require_cancellation(ctx.permissions())?;
        } else {
            PermissionGate::require_modify(ctx.permissions(), Scope::ClientsAndEvents)?;
        }

        let from = event.state;
        if from.is_terminal() {
            return Err(DomainError::EventLocked(from));
        }
        if !Self::is_valid_transition(from, to) {
            return Err(DomainError::InvalidTransition { from, to });
        }

        let (reason, lost_details) = match request {
            TransitionRequest::Confirm { reason } => (non_blank(reason), None),
            TransitionRequest::Cancel { reason } => {
                let reason = non_blank(Some(reason)).ok_or(DomainError::ReasonRequired)?;
                (Some(reason), None)
            }
            TransitionRequest::Lose {
                reason_code,
                competitor,
                notes,
            } => {
                let details = lost_details(catalog, &reason_code, competitor, notes, ctx)?;
                let composed = Self::compose_lost_reason(
                    &details.reason_code,
                    details.competitor.as_deref(),
                    details.notes.as_deref(),
                );
                (Some(composed), Some(details))
            }
        };

        let mut next = event.clone();
        next.state = to;
        next.state_history.push(StateChangeEntry {
            timestamp: ctx.now(),
            actor_id: ctx.actor().id,
            actor_name: ctx.actor().name.clone(),
            from_state: from,
            to_state: to,
            reason,
        });
        if to.is_terminal() {
            next.status = EventStatus::Finalized;
        }
        next.lost_details = lost_details;
        next.updated_at = ctx.now();

        Ok(Outcome::event_saved(
            next,
            Notification::StateChanged {
                event_id: event.id,
                from,
                to,
            },
        ))
    }

    /// Check if a state transition is valid.
    #[must_use]
    pub fn is_valid_transition(from: EventState, to: EventState) -> bool {
        matches!(
            (from, to),
            (EventState::Lead, EventState::Confirmed | EventState::Lost)
                | (EventState::Confirmed, EventState::Lost | EventState::Cancelled)
        )
    }

    /// Human-readable reason stored on a `lost` history entry.
    ///
    /// `Competition (competitor: Royal Caterers) - quoted 15% lower`
    #[must_use]
    pub fn compose_lost_reason(code: &str, competitor: Option<&str>, notes: Option<&str>) -> String {
        let mut reason = code.to_string();
        if let Some(competitor) = competitor {
            reason.push_str(&format!(" (competitor: {competitor})"));
        }
        if let Some(notes) = notes {
            reason.push_str(&format!(" - {notes}"));
        }
        reason
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn lost_details(
    catalog: &LostReasonCatalog,
    reason_code: &str,
    competitor: Option<String>,
    notes: Option<String>,
    ctx: &CommandContext,
) -> Result<LostDetails, DomainError> {
    if reason_code.trim().is_empty() {
        return Err(DomainError::LostReasonRequired);
    }
    let reason = catalog
        .find(reason_code)
        .ok_or_else(|| DomainError::UnknownLostReason(reason_code.trim().to_string()))?;
    let competitor = non_blank(competitor);
    if reason.requires_competitor && competitor.is_none() {
        return Err(DomainError::CompetitorRequired(reason.code.clone()));
    }

    Ok(LostDetails {
        reason_code: reason.code.clone(),
        competitor,
        notes: non_blank(notes),
        lost_at: ctx.now(),
    })
}
