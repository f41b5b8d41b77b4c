//! Session registry lifecycle: storing, driving, and expiring live
//! sessions the way the HTTP layer does between requests.

use chrono::Duration;
use lexmem_core::{build_session, rebuild_queue, SessionRegistry};
use lexmem_e2e_tests::fixtures;

#[test]
fn test_session_driven_through_the_registry() {
    let (storage, _dir) = fixtures::temp_storage();
    let registry = SessionRegistry::new();
    let user = fixtures::user_id();

    for text in ["halcyon", "maudlin"] {
        fixtures::seed_fresh_word(&storage, &user, text);
    }
    rebuild_queue(&storage, &user).unwrap();
    let session = build_session(&storage, &user).unwrap();
    let total = session.len();
    assert_eq!(total, 2);

    let session_id = registry.insert(session);

    // Ownership check the handlers perform on every lookup
    let owner = registry
        .with_session(&session_id, |s| s.user_id().to_string())
        .unwrap();
    assert_eq!(owner, user);

    // Drive the cursor to completion across separate lookups
    for expected_position in 1..=total {
        let position = registry
            .with_session(&session_id, |s| {
                s.advance();
                s.position()
            })
            .unwrap();
        assert_eq!(position, expected_position);
    }

    // Done sessions still answer lookups instead of erroring
    let done = registry.with_session(&session_id, |s| s.done()).unwrap();
    assert!(done);
    let current = registry
        .with_session(&session_id, |s| s.current().cloned())
        .unwrap();
    assert!(current.is_none());

    // A finished session advances as a no-op
    let position = registry
        .with_session(&session_id, |s| {
            s.advance();
            s.position()
        })
        .unwrap();
    assert_eq!(position, total);
}

#[test]
fn test_two_users_run_independent_sessions() {
    let (storage, _dir) = fixtures::temp_storage();
    let registry = SessionRegistry::new();
    let alice = fixtures::user_id();
    let bob = fixtures::user_id();

    fixtures::seed_fresh_word(&storage, &alice, "garrulous");
    fixtures::seed_fresh_word(&storage, &bob, "taciturn");

    rebuild_queue(&storage, &alice).unwrap();
    rebuild_queue(&storage, &bob).unwrap();

    let alice_session = registry.insert(build_session(&storage, &alice).unwrap());
    let bob_session = registry.insert(build_session(&storage, &bob).unwrap());

    assert!(registry
        .with_session(&alice_session, |s| s.advance())
        .is_some());

    assert_eq!(
        registry.with_session(&alice_session, |s| s.done()),
        Some(true)
    );
    assert_eq!(
        registry.with_session(&bob_session, |s| s.done()),
        Some(false)
    );
}

#[test]
fn test_idle_sessions_expire() {
    let (storage, _dir) = fixtures::temp_storage();
    let registry = SessionRegistry::with_limits(Duration::zero(), 64);
    let user = fixtures::user_id();

    fixtures::seed_fresh_word(&storage, &user, "evanescent");
    rebuild_queue(&storage, &user).unwrap();
    let session_id = registry.insert(build_session(&storage, &user).unwrap());

    std::thread::sleep(std::time::Duration::from_millis(5));
    assert!(registry.with_session(&session_id, |_| ()).is_none());
}
