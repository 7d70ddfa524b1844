//! The issuer against the real LMDB store: the cursor and ticket rows
//! survive a restart.

use std::sync::Arc;

use vsp_crypto::{AddressDeriver, FeeKeyChain, FeeSeed};
use vsp_fees::{FeeAddressAllocator, FeeCalculator, FeePolicy, IssuerConfig, RequestContext, TicketFeeIssuer};
use vsp_nullables::NullNode;
use vsp_store::{AddressIndexStore, TicketStore};
use vsp_store_lmdb::LmdbEnvironment;
use vsp_types::{NetworkProfile, TicketHash, Timestamp};

const MAP_SIZE: usize = 16 * 1024 * 1024;

fn issuer(
    env: Arc<LmdbEnvironment>,
    node: Arc<NullNode>,
) -> TicketFeeIssuer<LmdbEnvironment, NullNode, FeeKeyChain> {
    let net = NetworkProfile::simnet();
    let keys = Arc::new(FeeKeyChain::new(FeeSeed::new([7; 32]), net.address_prefix.clone()));
    let allocator = FeeAddressAllocator::open(Arc::clone(&env), keys).unwrap();
    TicketFeeIssuer::new(
        env,
        node,
        allocator,
        FeeCalculator::new(FeePolicy::new(0.0001, 1.0).unwrap()),
        net,
        IssuerConfig::default(),
    )
}

#[tokio::test]
async fn issuance_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let node = Arc::new(NullNode::new(50, 1.0));
    let first_hash = TicketHash::new([1; 32]);
    let second_hash = TicketHash::new([2; 32]);
    node.add_ticket(first_hash, 1, "Sscommit");
    node.add_ticket(second_hash, 1, "Sscommit");
    let ctx = RequestContext::new(Timestamp::new(1_000));

    let first = {
        let env = Arc::new(LmdbEnvironment::open(dir.path(), MAP_SIZE).unwrap());
        let issuer = issuer(Arc::clone(&env), Arc::clone(&node));
        issuer
            .request_fee_address(&ctx, &first_hash, "Sscommit", None)
            .await
            .unwrap()
    };

    let env = Arc::new(LmdbEnvironment::open(dir.path(), MAP_SIZE).unwrap());
    assert_eq!(env.get_last_address_index().unwrap(), 1);
    let issuer = issuer(Arc::clone(&env), node);

    let existing = issuer.existing_ticket(&first_hash).unwrap();
    let replay = issuer
        .request_fee_address(&ctx, &first_hash, "Sscommit", existing)
        .await
        .unwrap();
    assert_eq!(replay.fee_address, first.fee_address);

    let second = issuer
        .request_fee_address(&ctx, &second_hash, "Sscommit", None)
        .await
        .unwrap();
    let keys = FeeKeyChain::new(FeeSeed::new([7; 32]), "Ss");
    assert_eq!(second.fee_address, keys.derive(2).unwrap());
    assert_eq!(env.get_ticket(&second_hash).unwrap().unwrap().fee_address_index, 2);
    assert_eq!(issuer.ticket_count().unwrap(), 2);
}
