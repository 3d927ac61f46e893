//! Registry behavior seen from the front end and card back end

mod common;

use std::sync::{Arc, OnceLock, Weak};

use parking_lot::Mutex;
use vcard_reader::{Event, EventKind, NullSink, Reader, ReaderId, Registry};

use common::{FixedCard, kinds, recording_sink};

fn names(registry: &Registry) -> Vec<String> {
    registry
        .snapshot()
        .iter()
        .filter_map(|r| r.name().map(str::to_owned))
        .collect()
}

#[test]
fn test_snapshot_isolation() {
    let registry = Registry::new(NullSink);
    let a = Reader::new("A");
    let b = Reader::new("B");
    let c = Reader::new("C");
    for reader in [&a, &b, &c] {
        registry.add(reader).unwrap();
    }
    let card = FixedCard::new("3B00", "");
    registry.insert_card(&b, Some(card)).unwrap();

    let snapshot = registry.snapshot();
    registry.remove(&b).unwrap();

    // The creator's handle goes too; the snapshot alone keeps B alive
    drop(b);

    let seen: Vec<_> = snapshot.iter().filter_map(Reader::name).collect();
    assert_eq!(seen, ["A", "B", "C"]);
    let b_entry = snapshot.iter().nth(1).unwrap();
    assert!(b_entry.card_is_present());
    assert_eq!(b_entry.reference_count(), 1);

    assert_eq!(names(&registry), ["A", "C"]);
}

#[test]
fn test_refcount_audit() {
    let registry = Registry::new(NullSink);
    let reader = Reader::new("A"); // create: 1
    let acquired = reader.clone(); // acquire: 2
    registry.add(&reader).unwrap(); // registry entry: 3
    let snapshot = registry.snapshot(); // snapshot entry: 4
    let found = registry.lookup_by_name("A").unwrap(); // lookup: 5
    assert_eq!(reader.reference_count(), 5);

    drop(found);
    drop(snapshot);
    registry.remove(&reader).unwrap();
    drop(acquired);
    assert_eq!(reader.reference_count(), 1);
}

#[test]
fn test_order_after_adds_and_removes() {
    let registry = Registry::new(NullSink);
    let readers: Vec<_> = (0..6).map(|i| Reader::new(format!("R{i}"))).collect();
    for reader in &readers {
        registry.add(reader).unwrap();
    }
    registry.remove(&readers[0]).unwrap();
    registry.remove(&readers[3]).unwrap();
    registry.remove(&readers[5]).unwrap();
    registry.add(&readers[0]).unwrap();

    assert_eq!(names(&registry), ["R1", "R2", "R4", "R0"]);
}

#[test]
fn test_lookup_follows_last_set_id() {
    let registry = Registry::new(NullSink);
    let a = Reader::new("A");
    let b = Reader::new("B");
    registry.add(&a).unwrap();
    registry.add(&b).unwrap();

    a.set_id(ReaderId::new(5));
    assert!(Reader::same(&registry.lookup_by_id(ReaderId::new(5)).unwrap(), &a));

    a.set_id(ReaderId::new(6));
    b.set_id(ReaderId::new(5));
    assert!(Reader::same(&registry.lookup_by_id(ReaderId::new(5)).unwrap(), &b));
    assert!(Reader::same(&registry.lookup_by_id(ReaderId::new(6)).unwrap(), &a));
    assert!(registry.lookup_by_id(ReaderId::new(7)).is_none());
    assert!(registry.lookup_by_id(ReaderId::UNASSIGNED).is_none());

    // Unregistered readers are not found even with a matching id
    registry.remove(&b).unwrap();
    assert!(registry.lookup_by_id(ReaderId::new(5)).is_none());
}

#[test]
fn test_reader_events() {
    let (sink, log) = recording_sink();
    let registry = Registry::new(sink);
    let reader = Reader::builder().name("A").id(ReaderId::new(2)).build();

    registry.add(&reader).unwrap();
    registry.remove(&reader).unwrap();

    let log = log.lock();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].kind, EventKind::ReaderInserted);
    assert_eq!(log[1].kind, EventKind::ReaderRemoved);
    assert_eq!(log[1].name.as_deref(), Some("A"));
    assert_eq!(log[1].id, ReaderId::new(2));
}

#[test]
fn test_card_membership_idempotence() {
    let (sink, log) = recording_sink();
    let registry = Registry::new(sink);
    let reader = Reader::new("A");

    registry.insert_card(&reader, None).unwrap();
    registry.insert_card(&reader, None).unwrap();

    assert_eq!(kinds(&log), [EventKind::CardRemoved, EventKind::CardRemoved]);
    assert!(!reader.card_is_present());
}

#[test]
fn test_card_swap_releases_previous_card() {
    let (sink, log) = recording_sink();
    let registry = Registry::new(sink);
    let reader = Reader::new("A");
    let first = FixedCard::new("3B01", "");
    let second = FixedCard::new("3B02", "");

    registry.insert_card(&reader, Some(first.clone())).unwrap();
    registry.insert_card(&reader, Some(second.clone())).unwrap();
    assert_eq!(Arc::strong_count(&first), 1);
    assert_eq!(Arc::strong_count(&second), 2);

    let mut atr = [0u8; 8];
    let len = reader.power_on(Some(&mut atr)).unwrap();
    assert_eq!(&atr[..len], &[0x3B, 0x02]);

    let recorded = log.lock().clone();
    assert!(recorded.iter().all(|r| r.kind == EventKind::CardInserted && r.with_card));
    assert_eq!(recorded.len(), 2);
}

#[test]
fn test_event_causality() {
    // The sink looks the reader up in the very registry that emitted the event
    let slot: Arc<OnceLock<Weak<Registry>>> = Arc::default();
    let observed: Arc<Mutex<Vec<(EventKind, bool)>>> = Arc::default();

    let sink_slot = Arc::clone(&slot);
    let sink_observed = Arc::clone(&observed);
    let registry = Arc::new(Registry::new(move |event: Event| {
        let registry = sink_slot.get().and_then(Weak::upgrade).unwrap();
        let found = registry.lookup_by_id(event.reader().id());
        sink_observed
            .lock()
            .push((event.kind(), found.is_some()));
    }));
    slot.set(Arc::downgrade(&registry)).unwrap();

    let reader = Reader::new("A");
    reader.set_id(ReaderId::new(1));
    registry.add(&reader).unwrap();
    registry.remove(&reader).unwrap();

    assert_eq!(
        *observed.lock(),
        [(EventKind::ReaderInserted, true), (EventKind::ReaderRemoved, false)]
    );
}

#[test]
fn test_channel_sink_consumer() {
    let (tx, rx) = vcard_reader::event::channel();
    let registry = Registry::new(tx);
    let reader = Reader::new("A");
    let card = FixedCard::new("3B00", "");

    registry.add(&reader).unwrap();
    registry.insert_card(&reader, Some(card)).unwrap();
    registry.insert_card(&reader, None).unwrap();
    registry.remove(&reader).unwrap();

    let kinds: Vec<_> = rx.try_iter().map(|e| e.kind()).collect();
    assert_eq!(
        kinds,
        [
            EventKind::ReaderInserted,
            EventKind::CardInserted,
            EventKind::CardRemoved,
            EventKind::ReaderRemoved,
        ]
    );
    assert_eq!(reader.reference_count(), 1);
}
