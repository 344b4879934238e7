//! BLE Peripheral for Vitals and Alert Delivery
//!
//! GATT service definitions and peripheral-side state for the AffectLink
//! band. The control loop publishes through [`BleTelemetry`]; a radio task
//! drains the notification queue and answers reads from the staged values.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    BLE Peripheral                       │
//! ├─────────────────────────────────────────────────────────┤
//! │  Generic Access Service (0x1800)                        │
//! │  ├── Device Name (0x2A00)                               │
//! │  └── Appearance (0x2A01)                                │
//! ├─────────────────────────────────────────────────────────┤
//! │  Vitals Service (0x180D)                                │
//! │  ├── Heart Rate Mean (0x2A37) [Notify]     - i32 counts │
//! │  ├── GSR Mean (0x2A38)        [Notify]     - i32 counts │
//! │  ├── Emotional State (0x2A39) [Read+Ntfy]  - UTF-8 text │
//! │  └── Alert (0x2A3B)           [Notify]     - UTF-8 text │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Data Rates
//!
//! Telemetry is cycle-driven, not sample-driven:
//! - Heart rate mean: 4 bytes per minute
//! - GSR mean: 4 bytes per minute
//! - State text: up to 20 bytes per minute
//! - Alert text: up to 32 bytes, only on a fresh trigger
//!
//! Raw 50 Hz / 200 Hz samples never leave the device, so the link idles
//! well under the default 23-byte MTU budget.

use core::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, Ordering};

use heapless::{Deque, String, Vec};

use affectlink_core::TelemetrySink;

// ============================================================================
// Service and Characteristic UUIDs
// ============================================================================

/// Vitals Service (heart rate profile shape)
pub const VITALS_SERVICE_UUID: u16 = 0x180D;

/// Heart Rate Mean Characteristic - i32 counts, big-endian
pub const HEART_RATE_MEAN_CHAR_UUID: u16 = 0x2A37;

/// GSR Mean Characteristic - i32 counts, big-endian
pub const GSR_MEAN_CHAR_UUID: u16 = 0x2A38;

/// Emotional State Characteristic - UTF-8 state text
pub const STATE_CHAR_UUID: u16 = 0x2A39;

/// Alert Characteristic - UTF-8 alert text
pub const ALERT_CHAR_UUID: u16 = 0x2A3B;

/// Bluetooth base UUID, with the 16-bit slot zeroed
const BLUETOOTH_BASE_UUID: u128 = 0x00000000_0000_1000_8000_00805F9B34FB;

/// Expand a 16-bit assigned number to its 128-bit form
#[must_use]
pub const fn uuid128(short: u16) -> u128 {
    BLUETOOTH_BASE_UUID | ((short as u128) << 96)
}

// ============================================================================
// Value Sizes and Constraints
// ============================================================================

/// Mean characteristic value size (i32, big-endian)
pub const MEAN_VALUE_LEN: usize = 4;

/// Maximum state text length ("Neutral", "Joy", "Tension")
pub const STATE_VALUE_MAX_LEN: usize = 20;

/// Maximum alert text length ("Valid Tension Period Detected" is 29 bytes)
pub const ALERT_VALUE_MAX_LEN: usize = 32;

/// Maximum BLE MTU (negotiated, default 23, max 517)
pub const DEFAULT_MTU: usize = 23;

/// Maximum notification queue depth
pub const NOTIFY_QUEUE_DEPTH: usize = 16;

// ============================================================================
// Notifications
// ============================================================================

/// One queued GATT notification, ready for the radio task
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    /// Heart-rate window mean in counts (0x2A37)
    HeartRateMean(i32),
    /// GSR window mean in counts (0x2A38)
    GsrMean(i32),
    /// Sustained state text (0x2A39)
    State(String<STATE_VALUE_MAX_LEN>),
    /// Alert text (0x2A3B)
    Alert(String<ALERT_VALUE_MAX_LEN>),
}

impl Notification {
    /// Characteristic this notification targets
    #[must_use]
    pub const fn char_uuid(&self) -> u16 {
        match self {
            Self::HeartRateMean(_) => HEART_RATE_MEAN_CHAR_UUID,
            Self::GsrMean(_) => GSR_MEAN_CHAR_UUID,
            Self::State(_) => STATE_CHAR_UUID,
            Self::Alert(_) => ALERT_CHAR_UUID,
        }
    }

    /// Wire value for the notification payload
    #[must_use]
    pub fn value(&self) -> Vec<u8, ALERT_VALUE_MAX_LEN> {
        let mut buf = Vec::new();
        // All payloads fit the capacity by construction
        let _ = match self {
            Self::HeartRateMean(mean) | Self::GsrMean(mean) => {
                buf.extend_from_slice(&mean.to_be_bytes())
            }
            Self::State(text) => buf.extend_from_slice(text.as_bytes()),
            Self::Alert(text) => buf.extend_from_slice(text.as_bytes()),
        };
        buf
    }
}

// ============================================================================
// Link State
// ============================================================================

/// Shared peripheral link state (lock-free atomics for ISR safety)
pub struct LinkState {
    /// Connection handle (0 = disconnected)
    conn_handle: AtomicU16,
    /// Negotiated MTU
    mtu: AtomicU16,
    /// Heart-rate mean notification enabled (CCCD)
    heart_notify_enabled: AtomicBool,
    /// GSR mean notification enabled (CCCD)
    gsr_notify_enabled: AtomicBool,
    /// State notification enabled (CCCD)
    state_notify_enabled: AtomicBool,
    /// Alert notification enabled (CCCD)
    alert_notify_enabled: AtomicBool,
    /// Notifications handed to the radio
    notifications_sent: AtomicU32,
    /// Notifications dropped (queue full)
    notifications_dropped: AtomicU32,
    /// Uptime counter (seconds)
    uptime: AtomicU32,
}

impl LinkState {
    /// Create new link state
    #[must_use]
    pub const fn new() -> Self {
        Self {
            conn_handle: AtomicU16::new(0),
            mtu: AtomicU16::new(DEFAULT_MTU as u16),
            heart_notify_enabled: AtomicBool::new(false),
            gsr_notify_enabled: AtomicBool::new(false),
            state_notify_enabled: AtomicBool::new(false),
            alert_notify_enabled: AtomicBool::new(false),
            notifications_sent: AtomicU32::new(0),
            notifications_dropped: AtomicU32::new(0),
            uptime: AtomicU32::new(0),
        }
    }

    /// Check if connected
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.conn_handle.load(Ordering::Relaxed) != 0
    }

    /// Set connection handle (0 = disconnected)
    pub fn set_connection(&self, handle: u16) {
        self.conn_handle.store(handle, Ordering::Relaxed);
        if handle == 0 {
            // Disable all notifications
            self.heart_notify_enabled.store(false, Ordering::Relaxed);
            self.gsr_notify_enabled.store(false, Ordering::Relaxed);
            self.state_notify_enabled.store(false, Ordering::Relaxed);
            self.alert_notify_enabled.store(false, Ordering::Relaxed);
        }
    }

    /// Get negotiated MTU
    #[must_use]
    pub fn mtu(&self) -> usize {
        self.mtu.load(Ordering::Relaxed) as usize
    }

    /// Set negotiated MTU
    pub fn set_mtu(&self, mtu: u16) {
        self.mtu.store(mtu, Ordering::Relaxed);
    }

    /// Set a characteristic's notification-enable flag (CCCD write)
    pub fn set_notify(&self, char_uuid: u16, enabled: bool) {
        if let Some(flag) = self.notify_flag(char_uuid) {
            flag.store(enabled, Ordering::Relaxed);
        }
    }

    /// Check a characteristic's notification-enable flag
    #[must_use]
    pub fn notify_enabled(&self, char_uuid: u16) -> bool {
        match self.notify_flag(char_uuid) {
            Some(flag) => flag.load(Ordering::Relaxed),
            None => false,
        }
    }

    /// Record a notification handed to the radio
    pub fn record_sent(&self) {
        self.notifications_sent.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a notification dropped on queue overflow
    pub fn record_dropped(&self) {
        self.notifications_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Notifications handed to the radio so far
    #[must_use]
    pub fn sent(&self) -> u32 {
        self.notifications_sent.load(Ordering::Relaxed)
    }

    /// Notifications dropped so far
    #[must_use]
    pub fn dropped(&self) -> u32 {
        self.notifications_dropped.load(Ordering::Relaxed)
    }

    /// Increment uptime (call once per second)
    pub fn tick_uptime(&self) {
        self.uptime.fetch_add(1, Ordering::Relaxed);
    }

    /// Get uptime in seconds
    #[must_use]
    pub fn uptime_sec(&self) -> u32 {
        self.uptime.load(Ordering::Relaxed)
    }

    fn notify_flag(&self, char_uuid: u16) -> Option<&AtomicBool> {
        match char_uuid {
            HEART_RATE_MEAN_CHAR_UUID => Some(&self.heart_notify_enabled),
            GSR_MEAN_CHAR_UUID => Some(&self.gsr_notify_enabled),
            STATE_CHAR_UUID => Some(&self.state_notify_enabled),
            ALERT_CHAR_UUID => Some(&self.alert_notify_enabled),
            _ => None,
        }
    }
}

impl Default for LinkState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Telemetry Sink
// ============================================================================

/// BLE-backed telemetry sink for the control loop.
///
/// Publishes stage the latest value per characteristic (served to GATT
/// reads) and, when the link has the characteristic's notifications
/// enabled, queue a [`Notification`] for the radio task. The queue is
/// bounded; overflow drops the new notification and counts it on the
/// shared [`LinkState`].
pub struct BleTelemetry<'a> {
    link: &'a LinkState,
    queue: Deque<Notification, NOTIFY_QUEUE_DEPTH>,
    heart_rate_mean: Option<i32>,
    gsr_mean: Option<i32>,
    state: String<STATE_VALUE_MAX_LEN>,
    alert: Option<String<ALERT_VALUE_MAX_LEN>>,
}

impl<'a> BleTelemetry<'a> {
    /// Create a sink over shared link state
    #[must_use]
    pub const fn new(link: &'a LinkState) -> Self {
        Self {
            link,
            queue: Deque::new(),
            heart_rate_mean: None,
            gsr_mean: None,
            state: String::new(),
            alert: None,
        }
    }

    /// Shared link state
    #[must_use]
    pub const fn link(&self) -> &LinkState {
        self.link
    }

    /// Latest staged heart-rate mean (0x2A37 read value)
    #[must_use]
    pub const fn heart_rate_mean(&self) -> Option<i32> {
        self.heart_rate_mean
    }

    /// Latest staged GSR mean (0x2A38 read value)
    #[must_use]
    pub const fn gsr_mean(&self) -> Option<i32> {
        self.gsr_mean
    }

    /// Latest staged state text (0x2A39 read value)
    #[must_use]
    pub fn state_value(&self) -> &str {
        self.state.as_str()
    }

    /// Latest staged alert text, if any fired yet
    #[must_use]
    pub fn alert_value(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Queued notifications awaiting the radio
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Take the oldest queued notification for transmission
    pub fn pop_notification(&mut self) -> Option<Notification> {
        let notification = self.queue.pop_front();
        if notification.is_some() {
            self.link.record_sent();
        }
        notification
    }

    /// Discard all queued notifications (connection teardown)
    pub fn clear_queue(&mut self) {
        self.queue.clear();
    }

    fn enqueue(&mut self, notification: Notification) {
        if !self.link.notify_enabled(notification.char_uuid()) {
            return;
        }
        if self.queue.push_back(notification).is_err() {
            self.link.record_dropped();
        }
    }
}

impl TelemetrySink for BleTelemetry<'_> {
    fn publish_heart_rate(&mut self, mean: i32) {
        self.heart_rate_mean = Some(mean);
        self.enqueue(Notification::HeartRateMean(mean));
    }

    fn publish_gsr(&mut self, mean: i32) {
        self.gsr_mean = Some(mean);
        self.enqueue(Notification::GsrMean(mean));
    }

    fn publish_state(&mut self, state: &str) {
        self.state = bounded(state);
        self.enqueue(Notification::State(bounded(state)));
    }

    fn publish_alert(&mut self, alert: &str) {
        let text = bounded(alert);
        self.alert = Some(text.clone());
        self.enqueue(Notification::Alert(text));
    }
}

/// Copy text into a bounded string, truncating at a char boundary
fn bounded<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    for ch in text.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn connected_link() -> LinkState {
        let link = LinkState::new();
        link.set_connection(1);
        link.set_notify(HEART_RATE_MEAN_CHAR_UUID, true);
        link.set_notify(GSR_MEAN_CHAR_UUID, true);
        link.set_notify(STATE_CHAR_UUID, true);
        link.set_notify(ALERT_CHAR_UUID, true);
        link
    }

    #[test]
    fn test_uuid128_expansion() {
        assert_eq!(
            uuid128(VITALS_SERVICE_UUID),
            0x0000180D_0000_1000_8000_00805F9B34FB
        );
        assert_eq!(
            uuid128(ALERT_CHAR_UUID),
            0x00002A3B_0000_1000_8000_00805F9B34FB
        );
    }

    #[test]
    fn test_mean_value_big_endian() {
        let value = Notification::HeartRateMean(80).value();
        assert_eq!(value.as_slice(), &[0x00, 0x00, 0x00, 0x50]);

        let value = Notification::GsrMean(-1).value();
        assert_eq!(value.as_slice(), &[0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(value.len(), MEAN_VALUE_LEN);
    }

    #[test]
    fn test_alert_texts_fit_characteristic() {
        let longest = "Valid Tension Period Detected";
        assert!(longest.len() <= ALERT_VALUE_MAX_LEN);
        assert!(longest.len() > STATE_VALUE_MAX_LEN);
    }

    #[test]
    fn test_publish_round_trip() {
        let link = connected_link();
        let mut sink = BleTelemetry::new(&link);

        sink.publish_heart_rate(80);
        sink.publish_gsr(400);
        sink.publish_state("Neutral");
        sink.publish_alert("Alert: Joy");

        assert_eq!(sink.pending(), 4);
        assert_eq!(
            sink.pop_notification(),
            Some(Notification::HeartRateMean(80))
        );
        assert_eq!(sink.pop_notification(), Some(Notification::GsrMean(400)));

        let state = sink.pop_notification().unwrap();
        assert_eq!(state.char_uuid(), STATE_CHAR_UUID);
        assert_eq!(state.value().as_slice(), b"Neutral");

        let alert = sink.pop_notification().unwrap();
        assert_eq!(alert.char_uuid(), ALERT_CHAR_UUID);
        assert_eq!(alert.value().as_slice(), b"Alert: Joy");

        assert_eq!(sink.pop_notification(), None);
        assert_eq!(link.sent(), 4);
    }

    #[test]
    fn test_queue_overflow_counts_drops() {
        let link = connected_link();
        let mut sink = BleTelemetry::new(&link);

        for i in 0..(NOTIFY_QUEUE_DEPTH + 3) {
            sink.publish_heart_rate(i as i32);
        }

        assert_eq!(sink.pending(), NOTIFY_QUEUE_DEPTH);
        assert_eq!(link.dropped(), 3);
        // Staged value still tracks the latest publish
        assert_eq!(sink.heart_rate_mean(), Some(NOTIFY_QUEUE_DEPTH as i32 + 2));
    }

    #[test]
    fn test_staged_values_without_subscription() {
        let link = LinkState::new();
        link.set_connection(1);
        let mut sink = BleTelemetry::new(&link);

        sink.publish_state("Tension");
        sink.publish_heart_rate(91);

        // Reads are served, nothing is queued
        assert_eq!(sink.state_value(), "Tension");
        assert_eq!(sink.heart_rate_mean(), Some(91));
        assert_eq!(sink.pending(), 0);
        assert_eq!(link.dropped(), 0);
    }

    #[test]
    fn test_disconnect_clears_notify_flags() {
        let link = connected_link();
        assert!(link.notify_enabled(ALERT_CHAR_UUID));

        link.set_connection(0);
        assert!(!link.is_connected());
        assert!(!link.notify_enabled(HEART_RATE_MEAN_CHAR_UUID));
        assert!(!link.notify_enabled(ALERT_CHAR_UUID));
    }

    #[test]
    fn test_state_text_truncated_to_capacity() {
        let text: String<STATE_VALUE_MAX_LEN> =
            bounded("a string that is definitely longer than twenty bytes");
        assert_eq!(text.len(), STATE_VALUE_MAX_LEN);
    }
}
