//! Network link and broker queries

use core::net::Ipv4Addr;

/// Network interface queried once per tick
pub trait LinkProvider {
    /// Check if the physical link (or Wi-Fi association) is up
    fn is_link_up(&self) -> bool;

    /// Current address, `0.0.0.0` if none was assigned
    fn address(&self) -> Ipv4Addr;

    /// Interface MAC address
    fn mac(&self) -> [u8; 6];
}

/// Message broker client queried once per tick
pub trait BrokerProvider {
    /// Check if the client holds a broker session
    fn is_connected(&self) -> bool;

    /// Topic prefix shown on the status lines
    fn topic(&self) -> &str;
}

impl<T: LinkProvider + ?Sized> LinkProvider for &T {
    fn is_link_up(&self) -> bool {
        (**self).is_link_up()
    }

    fn address(&self) -> Ipv4Addr {
        (**self).address()
    }

    fn mac(&self) -> [u8; 6] {
        (**self).mac()
    }
}

impl<T: BrokerProvider + ?Sized> BrokerProvider for &T {
    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn topic(&self) -> &str {
        (**self).topic()
    }
}
