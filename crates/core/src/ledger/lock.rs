//! Lock rules for ledger lines.

use crate::charges::ChargeType;
use crate::error::DomainError;
use crate::event::Event;

/// Fails if the event is lost or cancelled.
///
/// # Errors
///
/// Returns `DomainError::EventLocked`.
pub fn ensure_ledger_open(event: &Event) -> Result<(), DomainError> {
    if event.is_locked() {
        return Err(DomainError::EventLocked(event.state));
    }
    Ok(())
}

/// Fails if a charge of `charge_type` may not be touched.
///
/// Menu-gating charges are additionally frozen while the menu is finalized.
///
/// # Errors
///
/// Returns `DomainError::EventLocked` or `DomainError::MenuFinalized`.
pub fn ensure_charge_open(event: &Event, charge_type: &ChargeType) -> Result<(), DomainError> {
    ensure_ledger_open(event)?;
    if charge_type.gates_menu() && event.is_menu_finalized() {
        return Err(DomainError::MenuFinalized);
    }
    Ok(())
}
