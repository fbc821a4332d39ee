//! Network and broker connectivity state
//!
//! The steady states are re-derived from the link and broker on every poll,
//! but only changes (edges) are reported so the panel redraws each status
//! line once per transition.

use core::net::Ipv4Addr;

use crate::traits::{BrokerProvider, LinkProvider};

/// Network link state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IpState {
    #[default]
    Unknown,
    Up,
    Down,
}

/// Broker connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MqttState {
    #[default]
    Unknown,
    Up,
    /// Up, with rx or tx traffic shown
    Active,
    Down,
}

impl MqttState {
    /// Whether activity LEDs may be lit
    pub const fn accepts_activity(self) -> bool {
        matches!(self, MqttState::Up | MqttState::Active)
    }
}

/// Direction of broker traffic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Activity {
    Rx,
    Tx,
}

/// State changes found by one poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnectivityEdges {
    /// New IP state, if it changed
    pub ip: Option<IpState>,
    /// New steady broker state, if it changed
    pub mqtt: Option<MqttState>,
}

impl ConnectivityEdges {
    /// Check if nothing changed
    pub const fn is_empty(&self) -> bool {
        self.ip.is_none() && self.mqtt.is_none()
    }

    /// Whether pending activity timers must be dropped
    pub const fn cancels_activity(&self) -> bool {
        matches!(self.mqtt, Some(MqttState::Down | MqttState::Unknown))
    }
}

/// Derive the IP state from the link
pub fn ip_state(link_up: bool, address: Ipv4Addr) -> IpState {
    if link_up && !address.is_unspecified() {
        IpState::Up
    } else {
        IpState::Down
    }
}

/// Connectivity tracker
#[derive(Debug, Clone, Default)]
pub struct ConnectivityStateMachine {
    ip: IpState,
    mqtt: MqttState,
    rx_active: bool,
    tx_active: bool,
}

impl ConnectivityStateMachine {
    /// Create a tracker with both states unknown
    pub const fn new() -> Self {
        Self {
            ip: IpState::Unknown,
            mqtt: MqttState::Unknown,
            rx_active: false,
            tx_active: false,
        }
    }

    /// Current IP state
    pub fn ip(&self) -> IpState {
        self.ip
    }

    /// Current broker state, `Active` while traffic is shown
    pub fn mqtt(&self) -> MqttState {
        if self.mqtt == MqttState::Up && (self.rx_active || self.tx_active) {
            MqttState::Active
        } else {
            self.mqtt
        }
    }

    /// Broker state ignoring activity
    pub fn steady_mqtt(&self) -> MqttState {
        self.mqtt
    }

    /// Whether an activity LED is currently lit
    pub fn is_active(&self, activity: Activity) -> bool {
        match activity {
            Activity::Rx => self.rx_active,
            Activity::Tx => self.tx_active,
        }
    }

    /// Re-evaluate the steady states and report edges
    pub fn poll(
        &mut self,
        link: &impl LinkProvider,
        broker: &impl BrokerProvider,
    ) -> ConnectivityEdges {
        let ip = ip_state(link.is_link_up(), link.address());
        let mqtt = if ip == IpState::Up && broker.is_connected() {
            MqttState::Up
        } else {
            MqttState::Down
        };
        self.apply(ip, mqtt)
    }

    /// Apply already-derived steady states
    pub fn apply(&mut self, ip: IpState, mqtt: MqttState) -> ConnectivityEdges {
        let mut edges = ConnectivityEdges::default();

        if ip != self.ip {
            debug!("ip state {:?} -> {:?}", self.ip, ip);
            self.ip = ip;
            edges.ip = Some(ip);
        }
        if mqtt != self.mqtt {
            debug!("mqtt state {:?} -> {:?}", self.mqtt, mqtt);
            self.mqtt = mqtt;
            edges.mqtt = Some(mqtt);
        }
        if edges.mqtt.is_some() {
            // A steady change preempts pending activity
            self.rx_active = false;
            self.tx_active = false;
        }

        edges
    }

    /// Arm an activity indicator
    ///
    /// Returns `false` and changes nothing unless the broker is up.
    pub fn trigger(&mut self, activity: Activity) -> bool {
        if !self.mqtt.accepts_activity() {
            trace!("{:?} trigger ignored, broker {:?}", activity, self.mqtt);
            return false;
        }
        match activity {
            Activity::Rx => self.rx_active = true,
            Activity::Tx => self.tx_active = true,
        }
        true
    }

    /// Drop an activity indicator after its timer expired
    ///
    /// Returns `true` if the indicator was lit.
    pub fn revert(&mut self, activity: Activity) -> bool {
        let flag = match activity {
            Activity::Rx => &mut self.rx_active,
            Activity::Tx => &mut self.tx_active,
        };
        core::mem::replace(flag, false)
    }
}
