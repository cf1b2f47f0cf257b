/// Integration tests for session lifetime and handshake catch-up
/// These tests verify what survives a session teardown and which
/// replicators a joining peer is sent

use stateline_shared::{
    CheckpointTag, HandshakePolicy, LifeTime, ReplicationConfig, ReplicatorStatus, Signal,
};
use stateline_test::{
    assert_converged, assert_unloaded, exchange_messages, Counter, Door, LocalHub,
    RecordingHolder, TestPeer,
};

fn session_only() -> ReplicationConfig {
    ReplicationConfig {
        handshake_policy: HandshakePolicy::SessionOnly,
        ..ReplicationConfig::default()
    }
}

#[test]
fn teardown_unloads_session_and_keeps_permanent() {
    let hub = LocalHub::new();
    hub.set_master(Some(1));
    let mut master = TestPeer::new(&hub, 1);
    master
        .context
        .create(1, Counter::new(1), LifeTime::Session, None)
        .unwrap();
    master
        .context
        .create(2, Counter::new(2), LifeTime::Permanent, None)
        .unwrap();
    master
        .context
        .create(1, Door::default(), LifeTime::Session, None)
        .unwrap();

    master.context.handle_signal(Signal::SessionTeardown);

    assert_unloaded!(Counter, 1, master);
    assert_unloaded!(Door, 1, master);
    assert_converged!(Counter, 2, Counter::new(2), master);
    let registry = master.context.registry::<Counter>().unwrap();
    assert!(registry.handshake().is_idle());
    assert_eq!(registry.get(&2).map(|r| r.status()), Some(ReplicatorStatus::Active));

    // unloaded ids can be created again for the next session
    assert!(master
        .context
        .create(1, Counter::new(5), LifeTime::Session, None)
        .is_ok());
}

#[test]
fn teardown_stops_holder_notifications() {
    let hub = LocalHub::new();
    hub.set_master(Some(1));
    let mut master = TestPeer::new(&hub, 1);
    let holder = RecordingHolder::<Counter>::new();
    master
        .context
        .create(
            1,
            Counter::new(1),
            LifeTime::Session,
            Some(RecordingHolder::handle(&holder)),
        )
        .unwrap();
    let tag = CheckpointTag::from("before");
    master.context.capture(&tag);

    assert_eq!(master.context.teardown_session(), 1);
    master.context.request_change(1, Counter::new(3));
    assert_eq!(master.context.recall(&tag), 0);

    assert!(holder.read().unwrap().changes.is_empty());
    assert!(hub.is_idle());
}

#[test]
fn dropped_holder_is_never_notified() {
    let hub = LocalHub::new();
    hub.set_master(Some(1));
    let mut master = TestPeer::new(&hub, 1);
    let holder = RecordingHolder::<Counter>::new();
    let handle = RecordingHolder::handle(&holder);
    master
        .context
        .create(1, Counter::new(1), LifeTime::Session, Some(handle.clone()))
        .unwrap();

    drop(holder);
    assert!(!handle.is_alive());

    master.context.request_change(1, Counter::new(2));
    assert_converged!(Counter, 1, Counter::new(2), master);
}

#[test]
fn all_valid_policy_replays_permanent_replicators() {
    let hub = LocalHub::new();
    hub.set_master(Some(1));
    let mut master = TestPeer::new(&hub, 1);
    let mut joiner = TestPeer::new(&hub, 2);
    for peer in [&mut master, &mut joiner] {
        peer.context
            .create(1, Counter::new(0), LifeTime::Session, None)
            .unwrap();
        peer.context
            .create(2, Counter::new(0), LifeTime::Permanent, None)
            .unwrap();
    }
    master.context.request_change(1, Counter::new(10));
    master.context.request_change(2, Counter::new(20));
    hub.drain(2);

    assert_eq!(master.context.on_peer_joined(2), 2);
    exchange_messages(&hub, &mut [&mut master, &mut joiner]);

    assert_converged!(Counter, 1, Counter::new(10), master, joiner);
    assert_converged!(Counter, 2, Counter::new(20), master, joiner);
}

#[test]
fn session_only_policy_skips_permanent_replicators() {
    let hub = LocalHub::new();
    hub.set_master(Some(1));
    let mut master = TestPeer::with_config(&hub, 1, session_only());
    let mut joiner = TestPeer::with_config(&hub, 2, session_only());
    for peer in [&mut master, &mut joiner] {
        peer.context
            .create(1, Counter::new(0), LifeTime::Session, None)
            .unwrap();
        peer.context
            .create(2, Counter::new(0), LifeTime::Permanent, None)
            .unwrap();
    }
    master.context.request_change(1, Counter::new(10));
    master.context.request_change(2, Counter::new(20));
    hub.drain(2);

    assert_eq!(master.context.on_peer_joined(2), 1);
    exchange_messages(&hub, &mut [&mut master, &mut joiner]);

    assert_converged!(Counter, 1, Counter::new(10), master, joiner);
    assert_converged!(Counter, 2, Counter::new(0), joiner);
}

#[test]
fn joined_signal_for_self_sends_nothing() {
    let hub = LocalHub::new();
    hub.set_master(Some(1));
    let mut master = TestPeer::new(&hub, 1);
    master
        .context
        .create(1, Counter::new(0), LifeTime::Session, None)
        .unwrap();

    master.context.handle_signal(Signal::PeerJoined(1));

    assert!(hub.is_idle());
}
