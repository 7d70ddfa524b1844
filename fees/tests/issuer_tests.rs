//! End-to-end issuance behaviour against nullable infrastructure.

use std::collections::HashSet;
use std::sync::Arc;

use vsp_fees::{
    FeeAddressAllocator, FeeCalculator, FeeError, FeePolicy, IssuerConfig, RequestContext,
    TicketFeeIssuer,
};
use vsp_nullables::{NullClock, NullDeriver, NullNode, NullStore};
use vsp_store::{AddressIndexStore, TicketStore};
use vsp_types::{FeeStatus, NetworkProfile, TicketHash};

type Issuer = TicketFeeIssuer<NullStore, NullNode, NullDeriver>;

const START: u64 = 1_700_000_000;
const WINDOW: u64 = 3_600;

fn build(store: Arc<NullStore>, node: Arc<NullNode>) -> Issuer {
    let allocator =
        FeeAddressAllocator::open(Arc::clone(&store), Arc::new(NullDeriver::new())).unwrap();
    TicketFeeIssuer::new(
        store,
        node,
        allocator,
        FeeCalculator::new(FeePolicy::new(0.0001, 1.0).unwrap()),
        NetworkProfile::simnet(),
        IssuerConfig {
            vsp_closed: false,
            required_confirmations: 6,
            fee_expiration_secs: WINDOW,
        },
    )
}

fn hash(n: u32) -> TicketHash {
    let mut bytes = [0u8; 32];
    bytes[..4].copy_from_slice(&n.to_be_bytes());
    TicketHash::new(bytes)
}

#[tokio::test]
async fn simnet_scenario_new_ticket() {
    let store = Arc::new(NullStore::new());
    let node = Arc::new(NullNode::new(50, 1.0));
    node.add_ticket(hash(1), 0, "Sscommit1");
    let issuer = build(Arc::clone(&store), node);
    let clock = NullClock::new(START);

    let resp = issuer
        .request_fee_address(&RequestContext::new(clock.now()), &hash(1), "Sscommit1", None)
        .await
        .unwrap();

    assert_eq!(resp.fee_amount.atoms(), 100);
    assert_eq!(resp.fee_address, NullDeriver::address_for(1));
    assert_eq!(resp.expiration.as_secs(), START + WINDOW);
    assert_eq!(resp.timestamp.as_secs(), START);

    let row = store.get_ticket(&hash(1)).unwrap().unwrap();
    assert_eq!(row.fee_status, FeeStatus::NoFee);
    assert_eq!(row.fee_address_index, 1);
    assert_eq!(row.commitment_address, "Sscommit1");
    assert!(!row.confirmed);
    assert_eq!(store.get_last_address_index().unwrap(), 1);
}

#[tokio::test]
async fn replay_within_window_is_idempotent() {
    let store = Arc::new(NullStore::new());
    let node = Arc::new(NullNode::new(50, 1.0));
    node.add_ticket(hash(1), 3, "Sscommit");
    let issuer = build(Arc::clone(&store), Arc::clone(&node));
    let clock = NullClock::new(START);

    let first = issuer
        .request_fee_address(&RequestContext::new(clock.now()), &hash(1), "Sscommit", None)
        .await
        .unwrap();

    clock.advance(WINDOW - 1);
    // Difficulty moved, but the issued fee has not expired.
    node.set_best_block(60, 2.0);
    let existing = store.get_ticket(&hash(1)).unwrap();
    let second = issuer
        .request_fee_address(&RequestContext::new(clock.now()), &hash(1), "Sscommit", existing)
        .await
        .unwrap();

    assert_eq!(first.fee_address, second.fee_address);
    assert_eq!(first.fee_amount, second.fee_amount);
    assert_eq!(first.expiration, second.expiration);
    assert_eq!(store.count_tickets().unwrap(), 1);
    assert_eq!(store.get_last_address_index().unwrap(), 1);
}

#[tokio::test]
async fn expired_fee_is_renewed_at_current_difficulty() {
    let store = Arc::new(NullStore::new());
    let node = Arc::new(NullNode::new(50, 1.0));
    node.add_ticket(hash(1), 3, "Sscommit");
    let issuer = build(Arc::clone(&store), Arc::clone(&node));
    let clock = NullClock::new(START);

    node.set_best_block(200, 1.0);
    let first = issuer
        .request_fee_address(&RequestContext::new(clock.now()), &hash(1), "Sscommit", None)
        .await
        .unwrap();
    assert_eq!(first.fee_amount.atoms(), 988_669);

    clock.advance(WINDOW);
    node.set_best_block(200, 2.0);
    let existing = store.get_ticket(&hash(1)).unwrap();
    let renewed = issuer
        .request_fee_address(&RequestContext::new(clock.now()), &hash(1), "Sscommit", existing)
        .await
        .unwrap();

    assert_eq!(renewed.fee_address, first.fee_address);
    assert_eq!(renewed.fee_amount.atoms(), 1_955_182);
    assert_eq!(renewed.expiration.as_secs(), START + 2 * WINDOW);

    let row = store.get_ticket(&hash(1)).unwrap().unwrap();
    assert_eq!(row.fee_address_index, 1);
    assert_eq!(row.fee_expiration, renewed.expiration);
    assert_eq!(store.get_last_address_index().unwrap(), 1);
}

#[tokio::test]
async fn renewal_tracks_vote_subsidy() {
    let store = Arc::new(NullStore::new());
    let node = Arc::new(NullNode::new(50, 1.0));
    node.add_ticket(hash(1), 3, "Sscommit");
    let issuer = build(Arc::clone(&store), Arc::clone(&node));
    let clock = NullClock::new(START);

    issuer
        .request_fee_address(&RequestContext::new(clock.now()), &hash(1), "Sscommit", None)
        .await
        .unwrap();

    clock.advance(WINDOW + 10);
    node.set_best_block(200, 1.0);
    let existing = store.get_ticket(&hash(1)).unwrap();
    let renewed = issuer
        .request_fee_address(&RequestContext::new(clock.now()), &hash(1), "Sscommit", existing)
        .await
        .unwrap();
    assert_eq!(renewed.fee_amount.atoms(), 988_669);
}

#[tokio::test]
async fn terminal_statuses_are_rejected_without_mutation() {
    for status in [
        FeeStatus::FeeReceived,
        FeeStatus::FeeBroadcast,
        FeeStatus::FeeConfirmed,
    ] {
        let store = Arc::new(NullStore::new());
        let node = Arc::new(NullNode::new(50, 1.0));
        node.add_ticket(hash(1), 3, "Sscommit");
        let issuer = build(Arc::clone(&store), Arc::clone(&node));
        let clock = NullClock::new(START);

        issuer
            .request_fee_address(&RequestContext::new(clock.now()), &hash(1), "Sscommit", None)
            .await
            .unwrap();
        let mut row = store.get_ticket(&hash(1)).unwrap().unwrap();
        row.fee_status = status;
        store.update_ticket(&row).unwrap();
        let writes = store.writes();

        clock.advance(2 * WINDOW);
        let err = issuer
            .request_fee_address(
                &RequestContext::new(clock.now()),
                &hash(1),
                "Sscommit",
                Some(row.clone()),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, FeeError::FeeAlreadyReceived));
        assert_eq!(store.writes(), writes);
        assert_eq!(store.get_ticket(&hash(1)).unwrap(), Some(row));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_new_tickets_get_distinct_gap_free_indices() {
    const N: u32 = 64;
    let store = Arc::new(NullStore::with_last_address_index(10));
    let node = Arc::new(NullNode::new(50, 1.0));
    for i in 0..N {
        node.add_ticket(hash(i), 1, "Sscommit");
    }
    let issuer = Arc::new(build(Arc::clone(&store), node));
    let ctx = RequestContext::new(NullClock::new(START).now());

    let mut handles = Vec::new();
    for i in 0..N {
        let issuer = Arc::clone(&issuer);
        handles.push(tokio::spawn(async move {
            issuer
                .request_fee_address(&ctx, &hash(i), "Sscommit", None)
                .await
                .unwrap()
        }));
    }
    let mut addresses = HashSet::new();
    for h in handles {
        addresses.insert(h.await.unwrap().fee_address);
    }

    let mut indices: Vec<u32> = (0..N)
        .map(|i| store.get_ticket(&hash(i)).unwrap().unwrap().fee_address_index)
        .collect();
    indices.sort_unstable();
    assert_eq!(indices, (11..=10 + N).collect::<Vec<_>>());
    assert_eq!(addresses.len(), N as usize);
    assert_eq!(store.get_last_address_index().unwrap(), 10 + N);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_for_one_unseen_ticket_agree() {
    let store = Arc::new(NullStore::new());
    let node = Arc::new(NullNode::new(50, 1.0));
    node.add_ticket(hash(7), 3, "Sscommit");
    let issuer = Arc::new(build(Arc::clone(&store), node));
    let ctx = RequestContext::new(NullClock::new(START).now());

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let issuer = Arc::clone(&issuer);
            tokio::spawn(async move {
                issuer
                    .request_fee_address(&ctx, &hash(7), "Sscommit", None)
                    .await
            })
        })
        .collect();

    let mut addresses = HashSet::new();
    for h in handles {
        let resp = h.await.unwrap().unwrap();
        assert_eq!(resp.fee_amount.atoms(), 100);
        addresses.insert(resp.fee_address);
    }
    assert_eq!(addresses.len(), 1);
    assert_eq!(store.count_tickets().unwrap(), 1);
    let row = store.get_ticket(&hash(7)).unwrap().unwrap();
    assert!(addresses.contains(&row.fee_address));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_allocations_are_gap_free() {
    const N: u32 = 200;
    let store = Arc::new(NullStore::with_last_address_index(5));
    let allocator = Arc::new(
        FeeAddressAllocator::open(Arc::clone(&store), Arc::new(NullDeriver::new())).unwrap(),
    );

    let mut handles = Vec::new();
    for _ in 0..N {
        let allocator = Arc::clone(&allocator);
        handles.push(tokio::spawn(async move { allocator.allocate().await.unwrap() }));
    }
    let mut indices = Vec::new();
    for h in handles {
        let (address, index) = h.await.unwrap();
        assert_eq!(address, NullDeriver::address_for(index));
        indices.push(index);
    }
    indices.sort_unstable();
    assert_eq!(indices, (6..=5 + N).collect::<Vec<_>>());
}

#[tokio::test]
async fn failed_persist_then_retry_issues_same_index() {
    let store = Arc::new(NullStore::with_last_address_index(3));
    let allocator =
        FeeAddressAllocator::open(Arc::clone(&store), Arc::new(NullDeriver::new())).unwrap();

    store.fail_next_set_index();
    assert!(matches!(
        allocator.allocate().await,
        Err(FeeError::AllocationPersistFailed(_))
    ));
    let (address, index) = allocator.allocate().await.unwrap();
    assert_eq!(index, 4);
    assert_eq!(address, NullDeriver::address_for(4));
}

#[tokio::test]
async fn renewal_storage_failure_leaves_row_untouched() {
    let store = Arc::new(NullStore::new());
    let node = Arc::new(NullNode::new(50, 1.0));
    node.add_ticket(hash(1), 3, "Sscommit");
    let issuer = build(Arc::clone(&store), Arc::clone(&node));
    let clock = NullClock::new(START);

    issuer
        .request_fee_address(&RequestContext::new(clock.now()), &hash(1), "Sscommit", None)
        .await
        .unwrap();
    let before = store.get_ticket(&hash(1)).unwrap();

    clock.advance(WINDOW);
    store.fail_next_renew();
    let err = issuer
        .request_fee_address(&RequestContext::new(clock.now()), &hash(1), "Sscommit", before.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, FeeError::InternalError(_)));
    assert_eq!(store.get_ticket(&hash(1)).unwrap(), before);
}
