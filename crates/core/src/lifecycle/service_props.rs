//! Property-based tests for LifecycleService.

use caterbook_shared::types::UserId;
use chrono::Utc;
use proptest::prelude::*;

use super::reasons::LostReasonCatalog;
use super::service::{LifecycleService, TransitionRequest};
use crate::context::{Actor, CommandContext};
use crate::event::types::fixtures::lead_event;
use crate::event::{EventState, EventStatus};
use crate::permissions::AppPermissions;

fn arb_state() -> impl Strategy<Value = EventState> {
    prop_oneof![
        Just(EventState::Lead),
        Just(EventState::Confirmed),
        Just(EventState::Lost),
        Just(EventState::Cancelled),
    ]
}

fn arb_request() -> impl Strategy<Value = TransitionRequest> {
    prop_oneof![
        Just(TransitionRequest::confirm()),
        Just(TransitionRequest::lose("Budget")),
        Just(TransitionRequest::Lose {
            reason_code: "Competition".to_string(),
            competitor: Some("Spice Route".to_string()),
            notes: None,
        }),
        Just(TransitionRequest::cancel("client relocated")),
    ]
}

fn ctx() -> CommandContext {
    CommandContext::new(
        Some(Actor::new(UserId::new(), "Property Tester")),
        AppPermissions::full(),
        Utc::now(),
    )
    .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A sequence of requests only ever succeeds along the transition table,
    /// and every success appends exactly one history entry.
    #[test]
    fn prop_transitions_follow_table(requests in prop::collection::vec(arb_request(), 1..6)) {
        let catalog = LostReasonCatalog::default();
        let mut event = lead_event();

        for request in requests {
            let from = event.state;
            let to = request.target();
            let before = event.state_history.len();

            match LifecycleService::transition(&event, &ctx(), &catalog, request) {
                Ok(outcome) => {
                    prop_assert!(LifecycleService::is_valid_transition(from, to));
                    event = outcome.into_aggregate();
                    prop_assert_eq!(event.state, to);
                    prop_assert_eq!(event.state_history.len(), before + 1);
                }
                Err(_) => {
                    prop_assert!(!LifecycleService::is_valid_transition(from, to));
                    prop_assert_eq!(event.state_history.len(), before);
                }
            }

            if event.state.is_terminal() {
                prop_assert_eq!(event.status, EventStatus::Finalized);
            }
            prop_assert_eq!(event.lost_details.is_some(), event.state == EventState::Lost);
        }
    }

    /// Nothing leaves a terminal state.
    #[test]
    fn prop_terminal_states_have_no_exits(from in arb_state(), to in arb_state()) {
        if from.is_terminal() {
            prop_assert!(!LifecycleService::is_valid_transition(from, to));
        }
    }
}
