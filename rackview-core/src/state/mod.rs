//! Connectivity state tracking

mod connectivity;

pub use connectivity::{
    ip_state, Activity, ConnectivityEdges, ConnectivityStateMachine, IpState, MqttState,
};
