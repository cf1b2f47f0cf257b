/// Integration tests for master authority
/// These tests verify that only the current master's decisions are applied,
/// whoever sends them and whenever the master changes

use stateline_shared::{ChannelNames, LifeTime, PayloadSize, SendTarget, Transport};
use stateline_test::{assert_converged, exchange_messages, Counter, LocalHub, TestPeer};

fn session() -> (LocalHub, TestPeer, TestPeer, TestPeer) {
    let hub = LocalHub::new();
    hub.set_master(Some(1));
    let mut peers = (
        TestPeer::new(&hub, 1),
        TestPeer::new(&hub, 2),
        TestPeer::new(&hub, 3),
    );
    for peer in [&mut peers.0, &mut peers.1, &mut peers.2] {
        peer.context
            .create(7, Counter::new(1), LifeTime::Session, None)
            .unwrap();
    }
    (hub, peers.0, peers.1, peers.2)
}

#[test]
fn forged_broadcast_from_client_is_ignored() {
    let (hub, mut master, mut client_a, mut client_b) = session();
    let names = ChannelNames::of::<Counter>();
    let payload = PayloadSize::for_state::<Counter>()
        .unwrap()
        .encode(7, &Counter::new(66));

    client_b
        .context
        .transport_mut()
        .send(SendTarget::All, names.master_set_state(), payload.clone());
    client_b
        .context
        .transport_mut()
        .send(SendTarget::All, names.master_set_recall_state(), payload);
    exchange_messages(&hub, &mut [&mut master, &mut client_a, &mut client_b]);

    assert_converged!(Counter, 7, Counter::new(1), master, client_a, client_b);
}

#[test]
fn change_request_without_master_is_dropped() {
    let (hub, _master, mut client_a, _) = session();
    hub.set_master(None);

    client_a.context.request_change(7, Counter::new(9));

    assert!(hub.is_idle());
    assert_eq!(client_a.context.state::<Counter>(7), Some(&Counter::new(1)));
}

#[test]
fn new_master_takes_over_authority() {
    let (hub, mut old_master, mut client_a, mut client_b) = session();
    hub.set_master(Some(2));

    // the new master applies its own change at once
    client_a.context.request_change(7, Counter::new(20));
    assert_eq!(client_a.context.state::<Counter>(7), Some(&Counter::new(20)));
    exchange_messages(&hub, &mut [&mut old_master, &mut client_a, &mut client_b]);
    assert_converged!(Counter, 7, Counter::new(20), old_master, client_a, client_b);

    // the old master is now just a client
    old_master.context.request_change(7, Counter::new(30));
    assert_eq!(old_master.context.state::<Counter>(7), Some(&Counter::new(20)));
    exchange_messages(&hub, &mut [&mut old_master, &mut client_a, &mut client_b]);
    assert_converged!(Counter, 7, Counter::new(30), old_master, client_a, client_b);
}

#[test]
fn stale_request_at_former_master_is_ignored() {
    let (hub, mut old_master, mut client_a, mut client_b) = session();

    client_b.context.request_change(7, Counter::new(5));
    assert_eq!(hub.pending(1), 1);
    hub.set_master(Some(2));

    exchange_messages(&hub, &mut [&mut old_master, &mut client_a, &mut client_b]);

    assert_converged!(Counter, 7, Counter::new(1), old_master, client_a, client_b);
}

#[test]
fn broadcast_from_former_master_is_ignored() {
    let (hub, mut old_master, mut client_a, mut client_b) = session();

    old_master.context.request_change(7, Counter::new(8));
    hub.set_master(Some(2));
    exchange_messages(&hub, &mut [&mut old_master, &mut client_a, &mut client_b]);

    // the change stuck locally on peer 1 only
    assert_eq!(old_master.context.state::<Counter>(7), Some(&Counter::new(8)));
    assert_converged!(Counter, 7, Counter::new(1), client_a, client_b);
}
