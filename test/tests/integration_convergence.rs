/// Integration tests for end-to-end convergence
/// These tests run several peers over one LocalHub and verify that every
/// peer ends up holding the master's decision

use stateline_shared::{LifeTime, PeerRole, Transport};
use stateline_test::{
    assert_converged, exchange_messages, Counter, Door, LocalHub, RecordingHolder, TestPeer,
};

fn init_logging() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init()
        .ok();
}

fn session() -> (LocalHub, TestPeer, TestPeer, TestPeer) {
    let hub = LocalHub::new();
    hub.set_master(Some(1));
    let master = TestPeer::new(&hub, 1);
    let client_a = TestPeer::new(&hub, 2);
    let client_b = TestPeer::new(&hub, 3);
    (hub, master, client_a, client_b)
}

#[test]
fn all_peers_converge_on_master_decisions() {
    init_logging();
    let (hub, mut master, mut client_a, mut client_b) = session();
    for peer in [&mut master, &mut client_a, &mut client_b] {
        peer.context
            .create(7, Counter::new(0), LifeTime::Session, None)
            .unwrap();
    }

    // master changes apply locally at once
    master.context.request_change(7, Counter::new(5));
    assert_eq!(master.context.state::<Counter>(7), Some(&Counter::new(5)));
    assert_eq!(client_a.context.state::<Counter>(7), Some(&Counter::new(0)));

    exchange_messages(&hub, &mut [&mut master, &mut client_a, &mut client_b]);
    assert_converged!(Counter, 7, Counter::new(5), master, client_a, client_b);

    // client changes wait for the master's broadcast
    client_a.context.request_change(7, Counter::new(9));
    assert_eq!(client_a.context.state::<Counter>(7), Some(&Counter::new(5)));

    exchange_messages(&hub, &mut [&mut master, &mut client_a, &mut client_b]);
    assert_converged!(Counter, 7, Counter::new(9), master, client_a, client_b);
}

#[test]
fn rejoining_peer_catches_up_from_drop_in_state() {
    init_logging();
    let (hub, mut master, mut client_a, mut client_b) = session();
    for peer in [&mut master, &mut client_a, &mut client_b] {
        peer.context
            .create(7, Counter::new(0), LifeTime::Session, None)
            .unwrap();
    }
    client_b.context.request_change(7, Counter::new(9));
    exchange_messages(&hub, &mut [&mut master, &mut client_a, &mut client_b]);

    // peer 3 drops out and comes back with a freshly constructed value
    hub.disconnect(3);
    let mut rejoined = TestPeer::new(&hub, 3);
    let holder = RecordingHolder::<Counter>::new();
    rejoined
        .context
        .create(
            7,
            Counter::new(0),
            LifeTime::Session,
            Some(RecordingHolder::handle(&holder)),
        )
        .unwrap();

    assert_eq!(master.context.on_peer_joined(3), 1);
    exchange_messages(&hub, &mut [&mut master, &mut client_a, &mut rejoined]);

    assert_converged!(Counter, 7, Counter::new(9), master, client_a, rejoined);
    let holder = holder.read().unwrap();
    assert_eq!(holder.changes, vec![(Counter::new(0), Counter::new(9), true)]);
}

#[test]
fn joining_peer_pulls_state_with_sync_request() {
    init_logging();
    let (hub, mut master, mut client_a, _) = session();
    hub.disconnect(3);
    master
        .context
        .create(1, Counter::new(11), LifeTime::Session, None)
        .unwrap();
    master
        .context
        .create(2, Door::new(true, 90.0, 2), LifeTime::Permanent, None)
        .unwrap();
    client_a
        .context
        .create(1, Counter::new(0), LifeTime::Session, None)
        .unwrap();
    client_a
        .context
        .create(2, Door::default(), LifeTime::Permanent, None)
        .unwrap();

    client_a.context.request_sync();
    // one empty request per State type of the protocol
    assert_eq!(hub.pending(1), 3);

    exchange_messages(&hub, &mut [&mut master, &mut client_a]);

    assert_converged!(Counter, 1, Counter::new(11), master, client_a);
    assert_converged!(Door, 2, Door::new(true, 90.0, 2), master, client_a);
}

#[test]
fn drop_in_state_from_non_master_is_ignored() {
    init_logging();
    let (hub, mut master, mut client_a, mut client_b) = session();
    client_a
        .context
        .create(4, Counter::new(40), LifeTime::Session, None)
        .unwrap();
    client_b
        .context
        .create(4, Counter::new(0), LifeTime::Session, None)
        .unwrap();

    // any peer may answer a join, only the master's answer counts
    assert_eq!(client_a.context.on_peer_joined(3), 1);
    exchange_messages(&hub, &mut [&mut master, &mut client_a, &mut client_b]);

    assert_eq!(client_b.context.state::<Counter>(4), Some(&Counter::new(0)));
}

#[test]
fn peer_role_follows_the_hub() {
    let (hub, master, client_a, _) = session();

    assert!(master.context.is_master());
    assert!(!client_a.context.is_master());
    assert_eq!(client_a.context.transport().master(), Some(1));

    hub.set_master(Some(2));
    assert!(!master.context.is_master());
    assert!(client_a.context.is_master());
    let role = if client_a.context.is_master() {
        PeerRole::Master
    } else {
        PeerRole::Client
    };
    assert!(role.is_master());
}
