use pretty_assertions::assert_eq;
use shardlib::library::{CatalogStore, Identifier, Shard, ShardContent, ShardType};
use shardlib::operations::ShardLibrary;
use shardlib::persistence::PersistenceGate;
use shardlib::replication::{ChannelSessions, ReplicaMessage, ReplicaMirror};
use shardlib::LibraryError;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

fn id(s: &str) -> Identifier {
    s.parse().unwrap()
}

fn drain(rx: &mut UnboundedReceiver<Arc<ReplicaMessage>>) -> Vec<ReplicaMessage> {
    let mut received = Vec::new();
    while let Ok(message) = rx.try_recv() {
        received.push((*message).clone());
    }
    received
}

/// Library holding `mymod:note1` (type `lore:letter`, source `mymod:quest_a`)
fn quest_library() -> (ShardLibrary, Arc<ChannelSessions>) {
    let mut store = CatalogStore::new();
    store.register_type(id("lore:letter"), ShardType::default());
    store.register_type(
        id("lore:diary"),
        ShardType {
            text_color: 0x8B4513,
            glow_color: 0xFFD700,
        },
    );
    store.insert(
        id("mymod:note1"),
        Shard::new(
            id("lore:letter"),
            id("mymod:quest_a"),
            ShardContent {
                name: "Unsent letter".to_string(),
                lore: "The ink has run".to_string(),
                hint: "Check the mailbox".to_string(),
                icon: None,
            },
        ),
    );

    let sessions = Arc::new(ChannelSessions::new());
    let library = ShardLibrary::new(store, Arc::new(PersistenceGate::new()), sessions.clone());
    (library, sessions)
}

#[test]
fn test_delete_scenario() {
    let (mut library, sessions) = quest_library();
    let (_session, mut rx) = sessions.connect();

    library.delete(&id("mymod:note1")).unwrap();

    assert!(library.store().is_empty());
    assert_eq!(library.store().group(&id("mymod:quest_a")).count(), 0);
    assert!(library.gate().is_dirty());
    assert_eq!(
        drain(&mut rx),
        vec![ReplicaMessage::Delete {
            id: id("mymod:note1")
        }]
    );
}

#[test]
fn test_migrate_scenario() {
    let (mut library, sessions) = quest_library();
    let (_first, mut rx_first) = sessions.connect();
    let (_second, mut rx_second) = sessions.connect();

    let outcome = library
        .migrate(&id("mymod:note1"), "othermod", &id("lore:diary"))
        .unwrap();

    assert_eq!(outcome.new_id, id("lore:diary_othermod"));
    let ids: Vec<Identifier> = library.store().iter().map(|(id, _)| id.clone()).collect();
    assert_eq!(ids, vec![id("lore:diary_othermod")]);

    let shard = library.store().get(&outcome.new_id).unwrap().clone();
    assert_eq!(shard.shard_type, id("lore:diary"));
    assert_eq!(shard.source, id("mymod:quest_a"));

    // Old id removed from the group, new id never added
    assert_eq!(library.store().group(&id("mymod:quest_a")).count(), 0);

    let expected = vec![
        ReplicaMessage::Delete {
            id: id("mymod:note1"),
        },
        ReplicaMessage::UpsertOne {
            id: id("lore:diary_othermod"),
            shard,
        },
    ];
    assert_eq!(drain(&mut rx_first), expected);
    assert_eq!(drain(&mut rx_second), expected);
}

#[test]
fn test_group_index_never_dangles() {
    let (mut library, _sessions) = quest_library();
    for n in 2..6 {
        library.insert(
            id(&format!("mymod:note{}", n)),
            Shard::new(
                id("lore:letter"),
                id(if n % 2 == 0 { "mymod:quest_a" } else { "mymod:quest_b" }),
                ShardContent::default(),
            ),
        );
    }
    assert!(library.store().consistency().is_consistent());

    library.delete(&id("mymod:note2")).unwrap();
    assert!(library.store().consistency().is_consistent());

    library
        .migrate(&id("mymod:note3"), "othermod", &id("lore:diary"))
        .unwrap();
    let report = library.store().consistency();
    assert!(report.dangling.is_empty());
    assert_eq!(report.ungrouped, vec![id("lore:diary_othermod")]);

    library.delete(&id("lore:diary_othermod")).unwrap();
    assert!(library.store().consistency().is_consistent());

    library.delete_all();
    let report = library.store().consistency();
    assert!(report.is_consistent());
    assert_eq!(library.store().sources().count(), 0);
    assert_eq!(library.store().type_count(), 2);
}

#[test]
fn test_delete_all_with_many_shards() {
    let (mut library, sessions) = quest_library();
    for n in 0..25 {
        library.insert(
            id(&format!("mymod:extra{}", n)),
            Shard::new(id("lore:letter"), id("mymod:quest_c"), ShardContent::default()),
        );
    }
    let (_session, mut rx) = sessions.connect();

    let outcome = library.delete_all();

    assert_eq!(outcome.count, 26);
    assert!(library.store().is_empty());
    assert_eq!(library.store().type_count(), 2);
    assert_eq!(drain(&mut rx).len(), 1);
}

#[test]
fn test_failed_operations_leave_no_trace() {
    let (mut library, sessions) = quest_library();
    let (_session, mut rx) = sessions.connect();
    let before = library.store().snapshot();

    assert!(matches!(
        library.delete(&id("mymod:ghost")),
        Err(LibraryError::UnknownShard(_))
    ));
    assert!(matches!(
        library.migrate(&id("mymod:note1"), "othermod", &id("lore:scroll")),
        Err(LibraryError::UnknownShardType(_))
    ));

    assert_eq!(library.store().snapshot(), before);
    assert!(!library.gate().is_dirty());
    assert!(drain(&mut rx).is_empty());
}

#[test]
fn test_replicas_converge() {
    let (mut library, sessions) = quest_library();
    let (early, mut rx_early) = sessions.connect();
    library.connect_replica(early);

    library.insert(
        id("mymod:note2"),
        Shard::new(id("lore:letter"), id("mymod:quest_b"), ShardContent::default()),
    );
    library
        .migrate(&id("mymod:note1"), "othermod", &id("lore:diary"))
        .unwrap();

    // A replica joining mid-stream only catches up through its bootstrap
    let (late, mut rx_late) = sessions.connect();
    library.connect_replica(late);
    library.delete(&id("mymod:note2")).unwrap();

    let mut early_mirror = ReplicaMirror::new();
    for message in drain(&mut rx_early) {
        early_mirror.apply(&message);
    }
    let mut late_mirror = ReplicaMirror::new();
    for message in drain(&mut rx_late) {
        late_mirror.apply(&message);
    }

    let server = library.store().snapshot();
    assert_eq!(early_mirror.snapshot().shards, server.shards);
    assert_eq!(early_mirror.snapshot().shard_types, server.shard_types);
    // The bootstrap carries the server's grouping index as is
    assert_eq!(late_mirror.snapshot(), server);
}

#[test]
fn test_bootstrap_after_migrate_keeps_group_gap() {
    let (mut library, sessions) = quest_library();
    library
        .migrate(&id("mymod:note1"), "othermod", &id("lore:diary"))
        .unwrap();

    let (late, mut rx) = sessions.connect();
    assert!(library.connect_replica(late));
    let mut mirror = ReplicaMirror::new();
    for message in drain(&mut rx) {
        mirror.apply(&message);
    }

    assert_eq!(mirror.snapshot(), library.store().snapshot());
    assert!(mirror.snapshot().groups.is_empty());
    assert_eq!(mirror.library().consistency().ungrouped, vec![id("lore:diary_othermod")]);
}
