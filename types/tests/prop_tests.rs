use proptest::prelude::*;

use vsp_types::{Agenda, Amount, NetworkProfile, Ticket, TicketHash, Timestamp};

fn any_agenda() -> impl Strategy<Value = Agenda> {
    prop_oneof![
        Just(Agenda::Dcp0005),
        Just(Agenda::Dcp0010),
        Just(Agenda::Dcp0012),
    ]
}

fn any_network() -> impl Strategy<Value = NetworkProfile> {
    prop_oneof![
        Just(NetworkProfile::mainnet()),
        Just(NetworkProfile::testnet()),
        Just(NetworkProfile::simnet()),
    ]
}

proptest! {
    /// Below the activation height an agenda is inactive at every pair of heights.
    #[test]
    fn agenda_inactive_below_activation(
        net in any_network(),
        agenda in any_agenda(),
        a in 0i64..2_000_000,
        b in 0i64..2_000_000,
    ) {
        let activation = net.agenda_heights.get(agenda);
        let (h1, h2) = (a.min(b), a.max(b));
        prop_assume!(h2 < activation);
        prop_assert!(!net.is_agenda_active(agenda, h1));
        prop_assert!(!net.is_agenda_active(agenda, h2));
    }

    /// At and beyond the activation height an agenda stays active.
    #[test]
    fn agenda_active_from_activation(
        net in any_network(),
        agenda in any_agenda(),
        offset in 0i64..10_000_000,
    ) {
        let activation = net.agenda_heights.get(agenda);
        prop_assert!(net.is_agenda_active(agenda, activation));
        prop_assert!(net.is_agenda_active(agenda, activation + offset));
    }

    /// Monotonic: once active at h, active at every later height.
    #[test]
    fn agenda_gating_is_monotonic(
        net in any_network(),
        agenda in any_agenda(),
        h in 0i64..2_000_000,
        step in 0i64..2_000_000,
    ) {
        if net.is_agenda_active(agenda, h) {
            prop_assert!(net.is_agenda_active(agenda, h + step));
        }
    }

    /// Whole-atom coin values convert exactly.
    #[test]
    fn amount_from_coins_exact_for_whole_atoms(atoms in 0i64..2_000_000_000_000_000) {
        let coins = atoms as f64 / 100_000_000.0;
        let amount = Amount::from_coins(coins).unwrap();
        prop_assert!((amount.atoms() - atoms).abs() <= 1);
    }

    /// Negative coin values are always rejected.
    #[test]
    fn amount_rejects_negative(coins in -1.0e9f64..-1.0e-9) {
        prop_assert!(Amount::from_coins(coins).is_err());
    }

    /// Hex parsing accepts exactly what display produces.
    #[test]
    fn ticket_hash_display_parses(bytes in prop::array::uniform32(0u8..)) {
        let hash = TicketHash::new(bytes);
        prop_assert_eq!(TicketHash::from_hex(&hash.to_string()).unwrap(), hash);
    }

    /// Tickets survive the storage encoding unchanged.
    #[test]
    fn ticket_bincode_preserves_fields(
        bytes in prop::array::uniform32(0u8..),
        index in 0u32..u32::MAX,
        amount in 0i64..i64::MAX,
        expiry in 0u64..u64::MAX,
    ) {
        let ticket = Ticket {
            hash: TicketHash::new(bytes),
            commitment_address: "Sscommitment".to_string(),
            fee_address_index: index,
            fee_address: vsp_types::FeeAddress::new("Ssfee"),
            fee_amount: Amount::from_atoms(amount),
            fee_expiration: Timestamp::new(expiry),
            fee_status: vsp_types::FeeStatus::NoFee,
            confirmed: index % 2 == 0,
        };
        let encoded = bincode::serialize(&ticket).unwrap();
        let decoded: Ticket = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, ticket);
    }
}
