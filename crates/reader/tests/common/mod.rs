//! Shared helpers for reader integration tests
#![allow(dead_code, unreachable_pub)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use vcard_reader::{
    Bytes, Card, Command, Event, EventKind, EventSink, Power, ReaderId, Response,
};

/// What a recording sink saw, without keeping the reader alive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub kind: EventKind,
    pub name: Option<String>,
    pub id: ReaderId,
    pub with_card: bool,
}

/// Event log shared between a test and its recording sink
pub type EventLog = Arc<Mutex<Vec<Recorded>>>;

/// Create a sink that records events into the returned log
pub fn recording_sink() -> (impl EventSink + 'static, EventLog) {
    let log = EventLog::default();
    let sink_log = Arc::clone(&log);
    let sink = move |event: Event| {
        sink_log.lock().push(Recorded {
            kind: event.kind(),
            name: event.reader().name().map(str::to_owned),
            id: event.reader().id(),
            with_card: event.card().is_some(),
        });
    };
    (sink, log)
}

/// Kinds of the recorded events, in emission order
pub fn kinds(log: &EventLog) -> Vec<EventKind> {
    log.lock().iter().map(|r| r.kind).collect()
}

/// Card answering every command with a fixed payload followed by 90 00
#[derive(Debug)]
pub struct FixedCard {
    pub atr: Bytes,
    pub payload: Bytes,
    pub resets: Mutex<Vec<Power>>,
    pub commands: Mutex<Vec<Command>>,
    pub processed: AtomicUsize,
}

impl FixedCard {
    pub fn new(atr: &str, payload: &str) -> Arc<Self> {
        Arc::new(Self {
            atr: Bytes::from(hex::decode(atr).unwrap()),
            payload: Bytes::from(hex::decode(payload).unwrap()),
            resets: Mutex::new(Vec::new()),
            commands: Mutex::new(Vec::new()),
            processed: AtomicUsize::new(0),
        })
    }

    pub fn processed(&self) -> usize {
        self.processed.load(Ordering::SeqCst)
    }

    /// Wire form of the response this card produces
    pub fn response_bytes(&self) -> Vec<u8> {
        Response::success(Some(self.payload.clone()))
            .to_bytes()
            .to_vec()
    }
}

impl Card for FixedCard {
    fn reset(&self, power: Power) {
        self.resets.lock().push(power);
    }

    fn atr(&self) -> Bytes {
        self.atr.clone()
    }

    fn process_command(&self, command: &Command) -> Response {
        self.processed.fetch_add(1, Ordering::SeqCst);
        self.commands.lock().push(command.clone());
        Response::success(Some(self.payload.clone()))
    }
}
