//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::state::*;
use super::transition::*;
use super::*;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn context_with(form_url: Option<String>) -> SessionContext {
    SessionContext::new(UserId(7), form_url)
}

fn generation_requests(effects: &[Effect]) -> Vec<(PhotoRef, BagColor)> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::RequestGeneration { photo, choice } => Some((photo.clone(), *choice)),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_color() -> impl Strategy<Value = BagColor> {
    prop_oneof![
        Just(BagColor::White),
        Just(BagColor::Black),
        Just(BagColor::Lilac),
    ]
}

fn arb_photo() -> impl Strategy<Value = PhotoRef> {
    "[A-Za-z0-9_-]{8,32}".prop_map(PhotoRef::new)
}

fn arb_form_url() -> impl Strategy<Value = Option<String>> {
    proptest::option::of("https://[a-z]{3,10}\\.example/[a-z]{0,8}")
}

fn arb_session() -> impl Strategy<Value = Session> {
    prop_oneof![
        Just(Session::default()),
        arb_photo().prop_map(Session::awaiting_choice),
        Just(Session {
            state: SessionState::AwaitingChoice,
            pending_photo: None,
        }),
    ]
}

/// Strings that are not one of the enumerated tags
fn arb_garbled_choice() -> impl Strategy<Value = String> {
    any::<String>().prop_filter("must not be a valid tag", |s| s.parse::<BagColor>().is_err())
}

fn arb_user_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        Just(Event::Start),
        Just(Event::Other),
        arb_photo().prop_map(|photo| Event::Photo { photo }),
        arb_color().prop_map(Event::choice_of),
        arb_garbled_choice().prop_map(Event::choice),
        arb_color().prop_map(|color| Event::form_choice(color.as_str())),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn valid_choice_with_photo_requests_exactly_one_generation(
        photo in arb_photo(),
        color in arb_color(),
        form_url in arb_form_url(),
    ) {
        let session = Session::awaiting_choice(photo.clone());
        let result = transition(&session, &context_with(form_url), Event::choice_of(color)).unwrap();

        prop_assert_eq!(generation_requests(&result.effects), vec![(photo, color)]);
        prop_assert_eq!(result.new_session, session);
    }

    #[test]
    fn valid_choice_without_photo_always_clears(color in arb_color(), form_url in arb_form_url()) {
        let session = Session {
            state: SessionState::AwaitingChoice,
            pending_photo: None,
        };
        let result = transition(&session, &context_with(form_url), Event::choice_of(color)).unwrap();

        prop_assert!(result.new_session.is_fresh());
        prop_assert!(result.effects.contains(&Effect::PersistSession));
        prop_assert!(generation_requests(&result.effects).is_empty());
    }

    #[test]
    fn garbled_choice_never_generates(photo in arb_photo(), raw in arb_garbled_choice()) {
        let session = Session::awaiting_choice(photo);
        let result = transition(&session, &context_with(None), Event::choice(raw)).unwrap();

        prop_assert_eq!(&result.new_session, &session);
        prop_assert!(generation_requests(&result.effects).is_empty());
        prop_assert!(!result.effects.contains(&Effect::PersistSession));
    }

    #[test]
    fn non_image_while_awaiting_input_changes_nothing(form_url in arb_form_url()) {
        let result = transition(&Session::default(), &context_with(form_url), Event::Other).unwrap();

        prop_assert!(result.new_session.is_fresh());
        prop_assert!(!result.effects.contains(&Effect::PersistSession));
        prop_assert_eq!(result.effects.len(), 1);
    }

    #[test]
    fn latest_photo_always_wins(session in arb_session(), photo in arb_photo()) {
        let result = transition(&session, &context_with(None), Event::Photo { photo: photo.clone() }).unwrap();

        prop_assert_eq!(result.new_session, Session::awaiting_choice(photo));
        prop_assert_eq!(result.effects.first(), Some(&Effect::PersistSession));
    }

    #[test]
    fn start_always_resets(session in arb_session(), form_url in arb_form_url()) {
        let result = transition(&session, &context_with(form_url), Event::Start).unwrap();

        prop_assert!(result.new_session.is_fresh());
        prop_assert_eq!(result.effects.first(), Some(&Effect::PersistSession));
    }

    #[test]
    fn user_events_never_fail(session in arb_session(), event in arb_user_event()) {
        prop_assert!(transition(&session, &context_with(None), event).is_ok());
    }

    #[test]
    fn generation_only_requested_from_awaiting_choice_with_photo(
        session in arb_session(),
        event in arb_user_event(),
    ) {
        let result = transition(&session, &context_with(None), event).unwrap();
        let requests = generation_requests(&result.effects);

        if !requests.is_empty() {
            prop_assert_eq!(session.state, SessionState::AwaitingChoice);
            prop_assert_eq!(Some(&requests[0].0), session.pending_photo.as_ref());
        }
    }

    #[test]
    fn outcomes_always_clear_choosing_session(photo in arb_photo(), image in proptest::collection::vec(any::<u8>(), 0..64)) {
        let session = Session::awaiting_choice(photo);
        for event in [
            Event::GenerationSucceeded { image: image.clone() },
            Event::GenerationFailed,
            Event::InputFetchFailed,
        ] {
            let result = transition(&session, &context_with(None), event).unwrap();
            prop_assert!(result.new_session.is_fresh());
            prop_assert_eq!(result.effects.first(), Some(&Effect::PersistSession));
        }
    }
}
