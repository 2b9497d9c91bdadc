//! Tracking of clients that asked to receive every published frame.
//!
//! A subscriber stays registered as long as it keeps sending packets (any
//! packet refreshes it). Silent subscribers are dropped after
//! [`SUBSCRIBER_TIMEOUT`], so a renderer that goes away without unsubscribing
//! stops costing bandwidth.

use log::info;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

pub const SUBSCRIBER_TIMEOUT: Duration = Duration::from_secs(5);

/// A client receiving the frame stream.
#[derive(Debug)]
pub struct Subscriber {
    /// Where frames are sent.
    pub addr: SocketAddr,
    /// Last time any packet arrived from this address.
    pub last_seen: Instant,
}

impl Subscriber {
    /// A subscriber seen just now.
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            last_seen: Instant::now(),
        }
    }

    /// Whether nothing has arrived from this subscriber for longer than `timeout`.
    pub fn is_timed_out(&self, timeout: Duration) -> bool {
        self.last_seen.elapsed() > timeout
    }
}

/// Outcome of a subscription request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subscription {
    /// The address was registered as a new subscriber.
    Added,
    /// The address was already subscribed; its timeout was refreshed.
    Refreshed,
    /// The roster is at capacity; the address was not added.
    Full,
}

/// Bounded set of subscribers keyed by address.
///
/// Addresses are the only identity: a client that rebinds its socket is a
/// new subscriber and the old entry simply times out.
pub struct SubscriberRoster {
    /// Active subscribers keyed by their source address.
    subscribers: HashMap<SocketAddr, Subscriber>,
    /// Capacity; further subscriptions are refused with [`Subscription::Full`].
    max_subscribers: usize,
}

impl SubscriberRoster {
    /// An empty roster accepting at most `max_subscribers` addresses.
    pub fn new(max_subscribers: usize) -> Self {
        Self {
            subscribers: HashMap::new(),
            max_subscribers,
        }
    }

    /// Registers `addr`, or refreshes it if it is already subscribed.
    ///
    /// Refreshing never counts against capacity, so a subscriber repeating its
    /// request on a full roster keeps its slot.
    pub fn subscribe(&mut self, addr: SocketAddr) -> Subscription {
        if let Some(subscriber) = self.subscribers.get_mut(&addr) {
            subscriber.last_seen = Instant::now();
            return Subscription::Refreshed;
        }

        if self.subscribers.len() >= self.max_subscribers {
            return Subscription::Full;
        }

        self.subscribers.insert(addr, Subscriber::new(addr));
        info!("Subscriber {} added", addr);
        Subscription::Added
    }

    /// Removes `addr`. Returns false if it was not subscribed.
    pub fn unsubscribe(&mut self, addr: &SocketAddr) -> bool {
        if self.subscribers.remove(addr).is_some() {
            info!("Subscriber {} removed", addr);
            true
        } else {
            false
        }
    }

    /// Marks `addr` as alive. Returns false if it is not subscribed.
    pub fn touch(&mut self, addr: &SocketAddr) -> bool {
        match self.subscribers.get_mut(addr) {
            Some(subscriber) => {
                subscriber.last_seen = Instant::now();
                true
            }
            None => false,
        }
    }

    /// Removes subscribers silent for longer than `timeout` and returns them.
    pub fn expire(&mut self, timeout: Duration) -> Vec<SocketAddr> {
        let expired: Vec<SocketAddr> = self
            .subscribers
            .values()
            .filter(|subscriber| subscriber.is_timed_out(timeout))
            .map(|subscriber| subscriber.addr)
            .collect();

        for addr in &expired {
            self.subscribers.remove(addr);
            info!("Subscriber {} timed out", addr);
        }

        expired
    }

    /// Snapshot of every subscribed address, in no particular order.
    ///
    /// Returned by value so the broadcaster can release the roster lock
    /// before sending.
    pub fn addrs(&self) -> Vec<SocketAddr> {
        self.subscribers.keys().copied().collect()
    }

    /// Whether `addr` is currently subscribed.
    pub fn contains(&self, addr: &SocketAddr) -> bool {
        self.subscribers.contains_key(addr)
    }

    /// Number of active subscribers.
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_addr() -> SocketAddr {
        "127.0.0.1:8080".parse().unwrap()
    }

    fn test_addr2() -> SocketAddr {
        "127.0.0.1:8081".parse().unwrap()
    }

    #[test]
    fn test_subscribe_and_refresh() {
        let mut roster = SubscriberRoster::new(2);

        assert_eq!(roster.subscribe(test_addr()), Subscription::Added);
        assert_eq!(roster.subscribe(test_addr()), Subscription::Refreshed);
        assert_eq!(roster.len(), 1);
        assert!(roster.contains(&test_addr()));
    }

    #[test]
    fn test_capacity_is_enforced() {
        let mut roster = SubscriberRoster::new(1);

        assert_eq!(roster.subscribe(test_addr()), Subscription::Added);
        assert_eq!(roster.subscribe(test_addr2()), Subscription::Full);
        assert_eq!(roster.len(), 1);
        assert!(!roster.contains(&test_addr2()));
    }

    #[test]
    fn test_unsubscribe() {
        let mut roster = SubscriberRoster::new(2);
        roster.subscribe(test_addr());

        assert!(roster.unsubscribe(&test_addr()));
        assert!(!roster.unsubscribe(&test_addr()));
        assert!(roster.is_empty());
    }

    #[test]
    fn test_touch_only_known_addresses() {
        let mut roster = SubscriberRoster::new(2);
        roster.subscribe(test_addr());

        assert!(roster.touch(&test_addr()));
        assert!(!roster.touch(&test_addr2()));
    }

    #[test]
    fn test_expire_removes_silent_subscribers() {
        let mut roster = SubscriberRoster::new(3);
        roster.subscribe(test_addr());
        roster.subscribe(test_addr2());

        assert!(roster.expire(Duration::from_secs(60)).is_empty());

        std::thread::sleep(Duration::from_millis(20));
        roster.touch(&test_addr2());

        let expired = roster.expire(Duration::from_millis(10));
        assert_eq!(expired, vec![test_addr()]);
        assert_eq!(roster.addrs(), vec![test_addr2()]);
    }

    #[test]
    fn test_subscriber_timeout() {
        let mut subscriber = Subscriber::new(test_addr());
        assert!(!subscriber.is_timed_out(Duration::from_secs(1)));

        subscriber.last_seen = Instant::now() - Duration::from_secs(2);
        assert!(subscriber.is_timed_out(Duration::from_secs(1)));
    }
}
