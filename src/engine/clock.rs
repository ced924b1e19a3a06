//! Frame clock: the heartbeat validation runs on.
//!
//! The clock keeps the set of roots whose subtree needs validation and the
//! receiving end of a channel that other threads post notifications to.
//! Nothing here blocks; the host drives the clock by calling
//! [`StyleEngine::tick`](crate::engine::StyleEngine::tick).

use slotmap::SecondaryMap;
use tokio::sync::mpsc;

use crate::node::NodeId;

/// Out-of-band events posted to the engine from any thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    /// Font configuration changed; cached font metrics are stale.
    FontsChanged,
    /// The theme changed; every style must be recomputed.
    ThemeChanged,
}

/// Sending half of the notification channel.
///
/// Cheap to clone and `Send`, so font loaders and settings watchers can hold
/// one. Notifications are applied at the next frame tick.
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: mpsc::UnboundedSender<Notification>,
}

impl Notifier {
    /// Post a notification. Returns `false` when the engine is gone.
    pub fn notify(&self, notification: Notification) -> bool {
        self.sender.send(notification).is_ok()
    }
}

/// Work done during one frame tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frame counter after the tick.
    pub frame: u64,
    /// Styles produced by the cascade (cache hits excluded).
    pub styles_computed: usize,
    /// Styles served from a parent's cache.
    pub cache_hits: usize,
    /// Style listener and gadget notifications delivered.
    pub listeners_notified: usize,
}

#[derive(Debug)]
pub struct FrameClock {
    frame_time_us: i64,
    frame_counter: u64,
    interval_us: i64,
    /// Scheduled roots with the sequence number they were scheduled at.
    scheduled: SecondaryMap<NodeId, u64>,
    next_sequence: u64,
    sender: mpsc::UnboundedSender<Notification>,
    receiver: mpsc::UnboundedReceiver<Notification>,
}

impl FrameClock {
    pub fn new(interval_us: i64) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            frame_time_us: 0,
            frame_counter: 0,
            interval_us: interval_us.max(1),
            scheduled: SecondaryMap::new(),
            next_sequence: 0,
            sender,
            receiver,
        }
    }

    /// Time of the current frame in microseconds.
    pub fn frame_time(&self) -> i64 {
        self.frame_time_us
    }

    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    /// When the next frame is expected.
    pub fn next_frame_time(&self) -> i64 {
        self.frame_time_us + self.interval_us
    }

    pub fn notifier(&self) -> Notifier {
        Notifier {
            sender: self.sender.clone(),
        }
    }

    /// Whether any root waits for validation.
    pub fn has_scheduled(&self) -> bool {
        !self.scheduled.is_empty()
    }

    pub fn is_scheduled(&self, root: NodeId) -> bool {
        self.scheduled.contains_key(root)
    }

    /// Start a new frame. Time never runs backwards.
    pub(crate) fn advance(&mut self, frame_time_us: i64) {
        if frame_time_us < self.frame_time_us {
            log::debug!(
                "frame time {frame_time_us} is before the current frame {}, keeping it",
                self.frame_time_us
            );
        } else {
            self.frame_time_us = frame_time_us;
        }
        self.frame_counter += 1;
    }

    pub(crate) fn schedule(&mut self, root: NodeId) {
        if !self.scheduled.contains_key(root) {
            log::trace!("scheduling root {root:?}");
            self.scheduled.insert(root, self.next_sequence);
            self.next_sequence += 1;
        }
    }

    pub(crate) fn unschedule(&mut self, root: NodeId) {
        self.scheduled.remove(root);
    }

    /// Roots to validate, in scheduling order.
    pub(crate) fn take_scheduled(&mut self) -> Vec<NodeId> {
        let mut roots: Vec<(u64, NodeId)> = self.scheduled.drain().map(|(root, seq)| (seq, root)).collect();
        roots.sort_unstable();
        roots.into_iter().map(|(_, root)| root).collect()
    }

    pub(crate) fn drain_notifications(&mut self) -> Vec<Notification> {
        let mut drained = Vec::new();
        while let Ok(notification) = self.receiver.try_recv() {
            drained.push(notification);
        }
        drained
    }
}
