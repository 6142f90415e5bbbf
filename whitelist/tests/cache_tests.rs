//! Whitelist cache behavior against a nullable source and clock.

use quadfund_nullables::{NullClock, NullWhitelistSource};
use quadfund_types::Address;
use quadfund_whitelist::{Whitelist, DEFAULT_TTL_SECS, FAILURE_BACKOFF_SECS};
use std::sync::Arc;

fn addr(s: &str) -> Address {
    Address::new(s).unwrap()
}

fn whitelist(members: &[&str]) -> (Whitelist<NullWhitelistSource>, Arc<NullClock>) {
    let clock = Arc::new(NullClock::default());
    let source = NullWhitelistSource::new(members.iter().copied());
    (
        Whitelist::with_clock(source, clock.clone(), DEFAULT_TTL_SECS),
        clock,
    )
}

#[tokio::test]
async fn membership_is_case_insensitive() {
    let (wl, _) = whitelist(&["0xAbC"]);
    assert!(wl.is_allowed(&addr("0xabc")).await);
    assert!(wl.is_allowed(&addr("0XABC")).await);
    assert!(!wl.is_allowed(&addr("0xdef")).await);
}

#[tokio::test]
async fn cached_within_ttl() {
    let (wl, clock) = whitelist(&["0xa"]);
    assert!(wl.is_allowed(&addr("0xa")).await);
    clock.advance(DEFAULT_TTL_SECS - 1);
    assert!(wl.is_allowed(&addr("0xa")).await);
    assert!(!wl.is_allowed(&addr("0xb")).await);
    assert_eq!(wl.source().fetch_count(), 1);
}

#[tokio::test]
async fn refreshes_after_ttl() {
    let (wl, clock) = whitelist(&["0xa"]);
    assert!(!wl.is_allowed(&addr("0xb")).await);

    wl.source().set_members(["0xa", "0xb"]);
    clock.advance(DEFAULT_TTL_SECS);
    assert!(wl.is_allowed(&addr("0xb")).await);
    assert_eq!(wl.source().fetch_count(), 2);
    assert_eq!(wl.cached_len().await, 2);
}

#[tokio::test]
async fn serves_last_good_list_on_failure() {
    let (wl, clock) = whitelist(&["0xa"]);
    assert!(wl.is_allowed(&addr("0xa")).await);

    wl.source().set_failing(true);
    clock.advance(DEFAULT_TTL_SECS * 2);
    assert!(wl.is_allowed(&addr("0xa")).await);
    assert!(!wl.is_allowed(&addr("0xz")).await);
    // The second lookup falls inside the failure backoff.
    assert_eq!(wl.source().fetch_count(), 2);

    clock.advance(FAILURE_BACKOFF_SECS);
    assert!(wl.is_allowed(&addr("0xa")).await);
    assert_eq!(wl.source().fetch_count(), 3);
}

#[tokio::test]
async fn denies_everyone_before_first_successful_fetch() {
    let (wl, clock) = whitelist(&["0xa"]);
    wl.source().set_failing(true);
    assert!(!wl.is_allowed(&addr("0xa")).await);
    assert_eq!(wl.cached_len().await, 0);

    wl.source().set_failing(false);
    assert!(!wl.is_allowed(&addr("0xa")).await);
    clock.advance(FAILURE_BACKOFF_SECS);
    assert!(wl.is_allowed(&addr("0xa")).await);
    assert_eq!(wl.source().fetch_count(), 2);
}

#[tokio::test]
async fn invalidate_forces_refetch() {
    let (wl, _) = whitelist(&["0xa"]);
    assert!(wl.is_allowed(&addr("0xa")).await);
    wl.source().set_members(Vec::<String>::new());
    wl.invalidate().await;
    assert!(!wl.is_allowed(&addr("0xa")).await);
    assert_eq!(wl.source().fetch_count(), 2);
}

#[tokio::test]
async fn disabled_whitelist_admits_everyone_without_fetching() {
    let wl = Whitelist::disabled(NullWhitelistSource::default());
    assert!(!wl.is_enabled());
    assert!(wl.is_allowed(&addr("0xanyone")).await);
    assert_eq!(wl.source().fetch_count(), 0);
}

#[tokio::test]
async fn concurrent_lookups_share_one_fetch() {
    let (wl, _) = whitelist(&["0xa"]);
    let wl = Arc::new(wl);
    let mut handles = Vec::new();
    for _ in 0..16 {
        let wl = wl.clone();
        handles.push(tokio::spawn(async move { wl.is_allowed(&addr("0xa")).await }));
    }
    for h in handles {
        assert!(h.await.unwrap());
    }
    assert_eq!(wl.source().fetch_count(), 1);
}

#[tokio::test]
async fn outage_is_fetched_once_by_concurrent_lookups() {
    let (wl, clock) = whitelist(&["0xa"]);
    assert!(wl.is_allowed(&addr("0xa")).await);

    wl.source().set_failing(true);
    clock.advance(DEFAULT_TTL_SECS);
    let wl = Arc::new(wl);
    let mut handles = Vec::new();
    for _ in 0..10 {
        let wl = wl.clone();
        handles.push(tokio::spawn(async move { wl.is_allowed(&addr("0xa")).await }));
    }
    for h in handles {
        assert!(h.await.unwrap());
    }
    assert_eq!(wl.source().fetch_count(), 2);
}

#[tokio::test]
async fn invalidate_skips_the_failure_backoff() {
    let (wl, _) = whitelist(&["0xa"]);
    wl.source().set_failing(true);
    assert!(!wl.is_allowed(&addr("0xa")).await);

    wl.source().set_failing(false);
    wl.invalidate().await;
    assert!(wl.is_allowed(&addr("0xa")).await);
    assert_eq!(wl.source().fetch_count(), 2);
}
