//! Supabase Realtime over one shared Phoenix socket.
//!
//! Every [`RealtimeClient::subscribe`] call joins its own channel topic on the
//! shared socket. The socket is opened lazily on the first subscription and
//! reopened with exponential backoff; all registered channels are re-joined on
//! every (re)connect. A channel the server errors, closes or refuses is
//! re-joined on its own with the same backoff.

use super::dto::{
    EVENT_CLOSE, EVENT_ERROR, EVENT_POSTGRES_CHANGES, EVENT_REPLY, EVENT_SYSTEM, PHOENIX_TOPIC,
    PhoenixMessage, PostgresChangePayload, ReplyPayload,
};
use crate::config::DashboardConfig;
use crate::domain::account::{ChangeFilter, ChangeListener, Subscription};
use crate::domain::logging::{LogComponent, get_logger};
use futures::channel::mpsc::{UnboundedSender, unbounded};
use futures::task::{LocalSpawn, LocalSpawnExt};
use futures::{SinkExt, StreamExt, future, stream};
use gloo_net::websocket::{Message, WebSocketError, futures::WebSocket};
use gloo_timers::future::{IntervalStream, sleep};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use std::time::Duration;

const COMPONENT: LogComponent = LogComponent::Infrastructure("Realtime");

struct Channel {
    topic: String,
    filter: ChangeFilter,
    listener: ChangeListener,
    failures: u32,
    rejoin_pending: bool,
}

/// Seconds to wait before retry number `attempt` (0-based): 1, 2, 4, ... capped at `max_secs`.
fn backoff_secs(attempt: u32, max_secs: u64) -> u64 {
    1u64.checked_shl(attempt.min(32)).unwrap_or(u64::MAX).min(max_secs.max(1))
}

struct RealtimeInner {
    socket_url: String,
    access_token: String,
    heartbeat_ms: u32,
    max_backoff_secs: u64,
    spawner: Rc<dyn LocalSpawn>,
    channels: RefCell<BTreeMap<u64, Channel>>,
    outgoing: RefCell<Option<UnboundedSender<String>>>,
    next_channel: Cell<u64>,
    next_ref: Cell<u64>,
    started: Cell<bool>,
}

enum Wake {
    Incoming(Result<Message, WebSocketError>),
    Closed,
    Outgoing(String),
    Heartbeat,
}

impl RealtimeInner {
    fn next_ref(&self) -> u64 {
        let reference = self.next_ref.get() + 1;
        self.next_ref.set(reference);
        reference
    }

    /// Queues a frame on the live connection. Dropped while disconnected;
    /// joins are replayed on reconnect.
    fn send(&self, message: PhoenixMessage) {
        let Some(sender) = self.outgoing.borrow().clone() else {
            return;
        };
        match message.to_text() {
            Ok(text) => {
                let _ = sender.unbounded_send(text);
            }
            Err(e) => get_logger().error(COMPONENT, &format!("❌ Failed to encode frame: {e}")),
        }
    }

    fn join(&self, channel: &Channel) {
        let reference = self.next_ref();
        self.send(PhoenixMessage::join(&channel.topic, &channel.filter, &self.access_token, reference));
    }

    fn channel_id(&self, topic: &str) -> Option<u64> {
        self.channels.borrow().iter().find(|(_, channel)| channel.topic == topic).map(|(id, _)| *id)
    }

    /// Joins every registered channel on a fresh connection.
    fn rejoin_all(&self) {
        let mut channels = self.channels.borrow_mut();
        for channel in channels.values_mut() {
            channel.rejoin_pending = false;
            self.join(channel);
        }
    }

    /// Schedules a single-channel re-join after a server-side channel failure.
    /// Unknown topics (already left) are ignored.
    fn channel_failed(self: &Rc<Self>, topic: &str) {
        let Some(id) = self.channel_id(topic) else {
            return;
        };
        let delay = {
            let mut channels = self.channels.borrow_mut();
            let Some(channel) = channels.get_mut(&id) else {
                return;
            };
            if channel.rejoin_pending {
                return;
            }
            channel.rejoin_pending = true;
            let delay = backoff_secs(channel.failures, self.max_backoff_secs);
            channel.failures = channel.failures.saturating_add(1);
            delay
        };
        get_logger().warn(COMPONENT, &format!("🔁 Re-joining {topic} in {delay}s"));

        let weak = Rc::downgrade(self);
        let retry = async move {
            sleep(Duration::from_secs(delay)).await;
            if let Some(inner) = weak.upgrade() {
                inner.rejoin(id);
            }
        };
        if let Err(e) = self.spawner.spawn_local(retry) {
            get_logger().error(COMPONENT, &format!("❌ Could not schedule re-join of {topic}: {e}"));
        }
    }

    /// Re-joins one channel if it is still registered and still waiting.
    fn rejoin(&self, id: u64) {
        let mut channels = self.channels.borrow_mut();
        let Some(channel) = channels.get_mut(&id) else {
            return;
        };
        if !channel.rejoin_pending {
            return;
        }
        channel.rejoin_pending = false;
        self.join(channel);
    }

    fn joined(&self, topic: &str) {
        get_logger().debug(COMPONENT, &format!("✅ Joined {topic}"));
        if let Some(channel) = self.channels.borrow_mut().values_mut().find(|channel| channel.topic == topic) {
            channel.failures = 0;
        }
    }

    fn handle_frame(self: &Rc<Self>, text: &str) {
        let frame: PhoenixMessage = match serde_json::from_str(text) {
            Ok(frame) => frame,
            Err(e) => {
                get_logger().warn(COMPONENT, &format!("⚠️ Unreadable frame: {e}"));
                return;
            }
        };

        match frame.event.as_str() {
            EVENT_POSTGRES_CHANGES => self.dispatch_change(frame),
            EVENT_REPLY if frame.topic == PHOENIX_TOPIC => {}
            EVENT_REPLY => match serde_json::from_value::<ReplyPayload>(frame.payload) {
                Ok(reply) if reply.is_ok() => self.joined(&frame.topic),
                Ok(reply) => {
                    get_logger().warn(COMPONENT, &format!("⚠️ {} rejected: {}", frame.topic, reply.response));
                    self.channel_failed(&frame.topic);
                }
                Err(e) => get_logger().warn(COMPONENT, &format!("⚠️ Bad reply on {}: {e}", frame.topic)),
            },
            EVENT_SYSTEM => {
                get_logger().debug(COMPONENT, &format!("ℹ️ {}: {}", frame.topic, frame.payload));
            }
            EVENT_ERROR | EVENT_CLOSE if frame.topic != PHOENIX_TOPIC => {
                get_logger().warn(COMPONENT, &format!("⚠️ {} on {}", frame.event, frame.topic));
                self.channel_failed(&frame.topic);
            }
            _ => {}
        }
    }

    fn dispatch_change(&self, frame: PhoenixMessage) {
        let event = match serde_json::from_value::<PostgresChangePayload>(frame.payload) {
            Ok(payload) => match payload.into_change_event() {
                Some(event) => event,
                None => return,
            },
            Err(e) => {
                get_logger().warn(COMPONENT, &format!("⚠️ Bad change payload on {}: {e}", frame.topic));
                return;
            }
        };

        // Listeners may unsubscribe while running; collect them first.
        let listeners: Vec<ChangeListener> = self
            .channels
            .borrow()
            .values()
            .filter(|channel| channel.topic == frame.topic && channel.filter.matches(&event))
            .map(|channel| Rc::clone(&channel.listener))
            .collect();

        for listener in listeners {
            listener(event.clone());
        }
    }

    async fn serve(self: &Rc<Self>, socket: WebSocket) {
        let (mut write, read) = socket.split();
        let (sender, receiver) = unbounded::<String>();
        *self.outgoing.borrow_mut() = Some(sender);
        self.rejoin_all();

        let incoming = read.map(Wake::Incoming).chain(stream::once(future::ready(Wake::Closed)));
        let heartbeat = IntervalStream::new(self.heartbeat_ms).map(|_| Wake::Heartbeat);
        let outgoing = receiver.map(Wake::Outgoing);
        let mut wakes = stream::select(incoming, stream::select(heartbeat, outgoing)).boxed_local();

        while let Some(wake) = wakes.next().await {
            match wake {
                Wake::Incoming(Ok(Message::Text(text))) => self.handle_frame(&text),
                Wake::Incoming(Ok(Message::Bytes(_))) => {}
                Wake::Incoming(Err(e)) => {
                    get_logger().error(COMPONENT, &format!("❌ WebSocket error: {e:?}"));
                    break;
                }
                Wake::Closed => {
                    get_logger().warn(COMPONENT, "🔌 Socket closed by server");
                    break;
                }
                Wake::Heartbeat => {
                    let reference = self.next_ref();
                    self.send(PhoenixMessage::heartbeat(reference));
                }
                Wake::Outgoing(text) => {
                    if let Err(e) = write.send(Message::Text(text)).await {
                        get_logger().error(COMPONENT, &format!("❌ Send failed: {e:?}"));
                        break;
                    }
                }
            }
        }

        self.outgoing.borrow_mut().take();
    }

    async fn run(self: Rc<Self>) {
        let mut attempt = 0u32;
        loop {
            get_logger().info(COMPONENT, "🔌 Connecting to Supabase Realtime");
            match WebSocket::open(&self.socket_url) {
                Ok(socket) => {
                    get_logger().info(COMPONENT, "✅ Realtime socket open");
                    attempt = 0;
                    self.serve(socket).await;
                }
                Err(e) => {
                    get_logger().error(COMPONENT, &format!("❌ Connection error: {e:?}"));
                }
            }

            let delay = backoff_secs(attempt, self.max_backoff_secs);
            attempt = attempt.saturating_add(1);
            get_logger().warn(COMPONENT, &format!("🔌 Reconnecting in {delay}s"));
            sleep(Duration::from_secs(delay)).await;
        }
    }
}

/// Push side of the Supabase adapter.
#[derive(Clone)]
pub struct RealtimeClient {
    inner: Rc<RealtimeInner>,
}

impl RealtimeClient {
    pub fn new(config: &DashboardConfig, spawner: Rc<dyn LocalSpawn>) -> Self {
        Self {
            inner: Rc::new(RealtimeInner {
                socket_url: config.realtime_url(),
                access_token: config.anon_key.clone(),
                heartbeat_ms: config.heartbeat_secs.saturating_mul(1000),
                max_backoff_secs: u64::from(config.max_backoff_secs),
                spawner,
                channels: RefCell::new(BTreeMap::new()),
                outgoing: RefCell::new(None),
                next_channel: Cell::new(0),
                next_ref: Cell::new(0),
                started: Cell::new(false),
            }),
        }
    }

    fn ensure_started(&self) {
        if self.inner.started.replace(true) {
            return;
        }
        let inner = Rc::clone(&self.inner);
        if let Err(e) = self.inner.spawner.spawn_local(inner.run()) {
            self.inner.started.set(false);
            get_logger().error(COMPONENT, &format!("❌ Could not start realtime loop: {e}"));
        }
    }

    pub fn subscribe(&self, filter: ChangeFilter, listener: ChangeListener) -> Subscription {
        let id = self.inner.next_channel.get() + 1;
        self.inner.next_channel.set(id);
        let channel = Channel {
            topic: format!("realtime:{}_changes_{}", filter.table, id),
            filter,
            listener,
            failures: 0,
            rejoin_pending: false,
        };
        get_logger().info(COMPONENT, &format!("📡 Subscribing {}", channel.topic));

        self.inner.join(&channel);
        self.inner.channels.borrow_mut().insert(id, channel);
        self.ensure_started();

        let weak: Weak<RealtimeInner> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if let Some(channel) = inner.channels.borrow_mut().remove(&id) {
                get_logger().info(COMPONENT, &format!("📴 Leaving {}", channel.topic));
                let reference = inner.next_ref();
                inner.send(PhoenixMessage::leave(&channel.topic, reference));
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::{ChangeEvent, ChangeKind};
    use futures::channel::mpsc::UnboundedReceiver;
    use futures::executor::LocalPool;
    use serde_json::{Value, json};

    const CLOCK_TOPIC: &str = "realtime:clock_snapshot_changes_1";
    const POSITIONS_TOPIC: &str = "realtime:positions_snapshot_changes_2";

    /// Client wired to an in-memory outbox; the connection loop is spawned but never polled.
    struct Harness {
        _pool: LocalPool,
        client: RealtimeClient,
        outbox: UnboundedReceiver<String>,
    }

    impl Harness {
        fn new() -> Self {
            let pool = LocalPool::new();
            let spawner: Rc<dyn LocalSpawn> = Rc::new(pool.spawner());
            let client = RealtimeClient::new(&DashboardConfig::new("https://demo.supabase.co", "anon"), spawner);
            let (sender, outbox) = unbounded();
            *client.inner.outgoing.borrow_mut() = Some(sender);
            Self { _pool: pool, client, outbox }
        }

        fn sent(&mut self) -> Vec<PhoenixMessage> {
            let mut frames = Vec::new();
            while let Ok(Some(text)) = self.outbox.try_next() {
                frames.push(serde_json::from_str(&text).unwrap());
            }
            frames
        }

        fn receive(&self, frame: Value) {
            self.client.inner.handle_frame(&frame.to_string());
        }

        fn channel<T>(&self, id: u64, read: impl FnOnce(&Channel) -> T) -> Option<T> {
            self.client.inner.channels.borrow().get(&id).map(read)
        }
    }

    fn recorder() -> (ChangeListener, Rc<RefCell<Vec<ChangeEvent>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let listener: ChangeListener = Rc::new(move |event: ChangeEvent| sink.borrow_mut().push(event));
        (listener, seen)
    }

    fn change(topic: &str, table: &str, kind: &str) -> Value {
        json!({
            "topic": topic,
            "event": "postgres_changes",
            "payload": {
                "data": {
                    "type": kind,
                    "schema": "public",
                    "table": table,
                    "record": { "is_open": true },
                    "commit_timestamp": "2024-03-13T19:45:00Z"
                },
                "ids": [1]
            },
            "ref": null
        })
    }

    fn channel_event(topic: &str, event: &str) -> Value {
        json!({ "topic": topic, "event": event, "payload": {}, "ref": null })
    }

    fn reply(topic: &str, status: &str) -> Value {
        json!({
            "topic": topic,
            "event": "phx_reply",
            "payload": { "status": status, "response": {} },
            "ref": "1"
        })
    }

    #[test]
    fn subscribing_joins_a_topic_of_its_own() {
        let mut harness = Harness::new();
        let (listener, _) = recorder();
        let _subscription =
            harness.client.subscribe(ChangeFilter::new("clock_snapshot", &[ChangeKind::Insert]), listener);

        let sent = harness.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].topic, CLOCK_TOPIC);
        assert_eq!(sent[0].event, "phx_join");
        assert_eq!(sent[0].payload["config"]["postgres_changes"][0]["table"], "clock_snapshot");
        assert_eq!(sent[0].payload["config"]["postgres_changes"][0]["event"], "INSERT");
    }

    #[test]
    fn changes_reach_only_the_channel_named_by_the_frame() {
        let harness = Harness::new();
        let (clock, clock_seen) = recorder();
        let (positions, positions_seen) = recorder();
        let _clock = harness.client.subscribe(ChangeFilter::new("clock_snapshot", &[ChangeKind::Insert]), clock);
        let _positions = harness.client.subscribe(
            ChangeFilter::new("positions_snapshot", &[ChangeKind::Insert, ChangeKind::Update, ChangeKind::Delete]),
            positions,
        );

        harness.receive(change(CLOCK_TOPIC, "clock_snapshot", "INSERT"));
        assert_eq!(clock_seen.borrow().len(), 1);
        assert_eq!(clock_seen.borrow()[0].record["is_open"], true);
        assert!(positions_seen.borrow().is_empty());

        harness.receive(change(CLOCK_TOPIC, "clock_snapshot", "UPDATE"));
        harness.receive(change("realtime:unknown", "clock_snapshot", "INSERT"));
        harness.receive(change(CLOCK_TOPIC, "clock_snapshot", "TRUNCATE"));
        harness.receive(json!("not a frame"));
        assert_eq!(clock_seen.borrow().len(), 1);

        harness.receive(change(POSITIONS_TOPIC, "positions_snapshot", "UPDATE"));
        assert_eq!(positions_seen.borrow().len(), 1);
    }

    #[test]
    fn dropping_the_subscription_leaves_the_channel() {
        let mut harness = Harness::new();
        let (listener, seen) = recorder();
        let subscription =
            harness.client.subscribe(ChangeFilter::new("clock_snapshot", &[ChangeKind::Insert]), listener);
        harness.sent();

        drop(subscription);
        let sent = harness.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].topic, CLOCK_TOPIC);
        assert_eq!(sent[0].event, "phx_leave");

        harness.receive(change(CLOCK_TOPIC, "clock_snapshot", "INSERT"));
        harness.receive(channel_event(CLOCK_TOPIC, "phx_close"));
        assert!(seen.borrow().is_empty());
        assert!(harness.sent().is_empty());
    }

    #[test]
    fn listener_may_unsubscribe_while_it_runs() {
        let mut harness = Harness::new();
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let calls = Rc::new(Cell::new(0));
        let listener: ChangeListener = {
            let slot = Rc::clone(&slot);
            let calls = Rc::clone(&calls);
            Rc::new(move |_: ChangeEvent| {
                calls.set(calls.get() + 1);
                drop(slot.borrow_mut().take());
            })
        };
        let subscription =
            harness.client.subscribe(ChangeFilter::new("clock_snapshot", &[ChangeKind::Insert]), listener);
        *slot.borrow_mut() = Some(subscription);
        harness.sent();

        harness.receive(change(CLOCK_TOPIC, "clock_snapshot", "INSERT"));
        harness.receive(change(CLOCK_TOPIC, "clock_snapshot", "INSERT"));
        assert_eq!(calls.get(), 1);
        assert_eq!(harness.sent().iter().filter(|frame| frame.event == "phx_leave").count(), 1);
    }

    #[test]
    fn reconnect_rejoins_every_registered_channel() {
        let mut harness = Harness::new();
        let (clock, _) = recorder();
        let (positions, _) = recorder();
        let _clock = harness.client.subscribe(ChangeFilter::new("clock_snapshot", &[ChangeKind::Insert]), clock);
        let positions =
            harness.client.subscribe(ChangeFilter::new("positions_snapshot", &[ChangeKind::Insert]), positions);
        harness.sent();

        harness.client.inner.rejoin_all();
        let topics: Vec<String> = harness.sent().into_iter().map(|frame| frame.topic).collect();
        assert_eq!(topics, [CLOCK_TOPIC, POSITIONS_TOPIC]);

        drop(positions);
        harness.sent();
        harness.client.inner.rejoin_all();
        let topics: Vec<String> = harness.sent().into_iter().map(|frame| frame.topic).collect();
        assert_eq!(topics, [CLOCK_TOPIC]);
    }

    #[test]
    fn channel_error_schedules_one_rejoin_with_backoff() {
        let mut harness = Harness::new();
        let (listener, _) = recorder();
        let _subscription =
            harness.client.subscribe(ChangeFilter::new("clock_snapshot", &[ChangeKind::Insert]), listener);
        harness.sent();

        harness.receive(channel_event(CLOCK_TOPIC, "phx_error"));
        harness.receive(channel_event(CLOCK_TOPIC, "phx_close"));
        assert_eq!(harness.channel(1, |channel| (channel.rejoin_pending, channel.failures)), Some((true, 1)));
        assert!(harness.sent().is_empty());

        harness.client.inner.rejoin(1);
        let sent = harness.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!((sent[0].topic.as_str(), sent[0].event.as_str()), (CLOCK_TOPIC, "phx_join"));
        assert_eq!(harness.channel(1, |channel| channel.rejoin_pending), Some(false));

        harness.receive(reply(CLOCK_TOPIC, "ok"));
        assert_eq!(harness.channel(1, |channel| channel.failures), Some(0));
    }

    #[test]
    fn refused_join_is_retried() {
        let mut harness = Harness::new();
        let (listener, _) = recorder();
        let _subscription =
            harness.client.subscribe(ChangeFilter::new("clock_snapshot", &[ChangeKind::Insert]), listener);
        harness.sent();

        harness.receive(reply(CLOCK_TOPIC, "error"));
        assert_eq!(harness.channel(1, |channel| channel.rejoin_pending), Some(true));

        harness.client.inner.rejoin_all();
        assert_eq!(harness.channel(1, |channel| channel.rejoin_pending), Some(false));
        harness.sent();
        harness.client.inner.rejoin(1);
        assert!(harness.sent().is_empty());
    }

    #[test]
    fn socket_level_errors_do_not_touch_channels() {
        let harness = Harness::new();
        let (listener, _) = recorder();
        let _subscription =
            harness.client.subscribe(ChangeFilter::new("clock_snapshot", &[ChangeKind::Insert]), listener);

        harness.receive(channel_event(PHOENIX_TOPIC, "phx_error"));
        harness.receive(reply(PHOENIX_TOPIC, "error"));
        assert_eq!(harness.channel(1, |channel| channel.rejoin_pending), Some(false));
    }

    #[test]
    fn backoff_doubles_up_to_the_cap() {
        let delays: Vec<u64> = (0..7).map(|attempt| backoff_secs(attempt, 30)).collect();
        assert_eq!(delays, [1, 2, 4, 8, 16, 30, 30]);
        assert_eq!(backoff_secs(200, 30), 30);
        assert_eq!(backoff_secs(3, 0), 1);
    }
}
