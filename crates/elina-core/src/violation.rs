//! In-process channel carrying business-rule violations to a display.
//!
//! The transport publishes every violation it detects on a
//! [`ViolationChannel`]. Views that want to show violations mount a
//! [`GlobalViolationListener`], which owns a subscription for as long as it
//! lives and feeds a [`ViolationDisplay`]. Views that already hold a
//! violation value (for example the day-wise grid's local guard) drive a
//! `ViolationDisplay` directly.
//!
//! Publishing is fire-and-forget. With no live subscriber the event is
//! dropped; nothing is queued for subscribers that mount later.
//!
//! ```rust
//! use elina_core::models::BusinessRuleViolation;
//! use elina_core::violation::{GlobalViolationListener, ViolationChannel};
//!
//! let channel = ViolationChannel::new();
//!
//! // nobody listening: dropped silently
//! assert_eq!(channel.publish(BusinessRuleViolation::actual_exceeds_planned(1)), 0);
//!
//! let mut listener = GlobalViolationListener::mount(&channel);
//! channel.publish(BusinessRuleViolation::actual_exceeds_planned(2));
//! assert!(listener.poll());
//! assert!(listener.display().is_open());
//! ```

use std::fmt;

use log::{debug, warn};
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

use crate::models::BusinessRuleViolation;

const CHANNEL_CAPACITY: usize = 16;

/// Publish/subscribe handle. Cloning yields another handle to the same
/// channel.
#[derive(Debug, Clone)]
pub struct ViolationChannel {
    tx: broadcast::Sender<BusinessRuleViolation>,
}

impl ViolationChannel {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Announces a violation to every live subscriber and returns how many
    /// received it.
    pub fn publish(&self, violation: BusinessRuleViolation) -> usize {
        warn!("Business rule violation: {violation}");
        match self.tx.send(violation) {
            Ok(receivers) => receivers,
            Err(_) => {
                debug!("No violation subscriber mounted, event dropped");
                0
            }
        }
    }

    /// Opens a subscription. Dropping it unsubscribes.
    pub fn subscribe(&self) -> ViolationSubscription {
        ViolationSubscription {
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ViolationChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// A live subscription to the violation channel.
#[derive(Debug)]
pub struct ViolationSubscription {
    rx: broadcast::Receiver<BusinessRuleViolation>,
}

impl ViolationSubscription {
    /// Returns the next pending violation without waiting.
    pub fn try_next(&mut self) -> Option<BusinessRuleViolation> {
        loop {
            match self.rx.try_recv() {
                Ok(violation) => return Some(violation),
                Err(TryRecvError::Lagged(skipped)) => {
                    debug!("Violation subscriber lagged, skipped {skipped} event(s)");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }

    /// Waits for the next violation. Returns `None` once every channel
    /// handle has been dropped.
    pub async fn next(&mut self) -> Option<BusinessRuleViolation> {
        loop {
            match self.rx.recv().await {
                Ok(violation) => return Some(violation),
                Err(RecvError::Lagged(skipped)) => {
                    debug!("Violation subscriber lagged, skipped {skipped} event(s)");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

/// Local violation display: shows the value it is given, or nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViolationDisplay {
    current: Option<BusinessRuleViolation>,
}

impl ViolationDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces whatever is shown with `violation`.
    pub fn show(&mut self, violation: BusinessRuleViolation) {
        self.current = Some(violation);
    }

    /// Closes the display ("I Understand").
    pub fn dismiss(&mut self) -> Option<BusinessRuleViolation> {
        self.current.take()
    }

    pub fn current(&self) -> Option<&BusinessRuleViolation> {
        self.current.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }
}

impl fmt::Display for ViolationDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(violation) = &self.current else {
            return Ok(());
        };
        writeln!(f, "# Business Rule Violation")?;
        writeln!(f)?;
        writeln!(f, "**{}**", violation.rule)?;
        writeln!(f)?;
        writeln!(f, "{}", violation.message)?;
        if let Some(hint) = &violation.hint {
            writeln!(f)?;
            writeln!(f, "*Hint:* {hint}")?;
        }
        Ok(())
    }
}

/// The single top-level subscriber that renders channel violations.
///
/// Mounting subscribes; dropping the listener (unmounting) unsubscribes.
#[derive(Debug)]
pub struct GlobalViolationListener {
    subscription: ViolationSubscription,
    display: ViolationDisplay,
}

impl GlobalViolationListener {
    pub fn mount(channel: &ViolationChannel) -> Self {
        Self {
            subscription: channel.subscribe(),
            display: ViolationDisplay::new(),
        }
    }

    /// Moves pending violations into the display, the latest one winning.
    /// Returns true if anything new arrived.
    pub fn poll(&mut self) -> bool {
        let mut received = false;
        while let Some(violation) = self.subscription.try_next() {
            self.display.show(violation);
            received = true;
        }
        received
    }

    /// Waits for the next violation and shows it.
    pub async fn wait(&mut self) -> Option<&BusinessRuleViolation> {
        let violation = self.subscription.next().await?;
        self.display.show(violation);
        self.display.current()
    }

    pub fn display(&self) -> &ViolationDisplay {
        &self.display
    }

    pub fn dismiss(&mut self) -> Option<BusinessRuleViolation> {
        self.display.dismiss()
    }

    /// Explicit unmount.
    pub fn unmount(self) {}
}
