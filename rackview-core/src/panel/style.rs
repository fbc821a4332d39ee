//! Screen regions, colors and status line text

use core::fmt::Write;
use core::net::Ipv4Addr;

use rackview_display::{Color, Rect, TextLine, SCREEN_HEIGHT, SCREEN_WIDTH};

use crate::io::{PinState, SecurityState};
use crate::layout::geometry::{EVENT_LINE_Y, PORT_AREA_TOP};
use crate::state::{IpState, MqttState};

/// Characters per status line
pub const STATUS_CHARS: usize = 36;

/// Status line text buffer
pub type StatusText = TextLine<STATUS_CHARS>;

/// Height reserved for one line of text
pub const LINE_HEIGHT: u16 = 11;

/// Left margin of text lines
pub const TEXT_X: u16 = 10;

/// Header (logo and firmware identity)
pub const HEADER: Rect = Rect::new(0, 0, SCREEN_WIDTH, 52);
pub const HEADER_MARGIN: u16 = 4;

pub const IP_LINE_Y: u16 = 60;
pub const MAC_LINE_Y: u16 = 75;
pub const TOPIC_LINE_Y: u16 = 90;
pub const TEMPERATURE_LINE_Y: u16 = 105;

/// Status LEDs right of the IP and topic lines
pub const LED_SIZE: u16 = 8;
pub const LINK_LED: Rect = Rect::new(226, IP_LINE_Y + 1, LED_SIZE, LED_SIZE);
pub const RX_LED: Rect = Rect::new(214, TOPIC_LINE_Y + 1, LED_SIZE, LED_SIZE);
pub const TX_LED: Rect = Rect::new(226, TOPIC_LINE_Y + 1, LED_SIZE, LED_SIZE);
pub const LED_RADIUS: u16 = 2;

/// Text width left of the status LEDs
pub const LINE_WIDTH: u16 = RX_LED.x - 4;

/// Everything between the status lines and the event line
pub const PORT_AREA: Rect = Rect::new(
    0,
    PORT_AREA_TOP,
    SCREEN_WIDTH,
    EVENT_LINE_Y - PORT_AREA_TOP,
);

/// Bottom event line
pub const EVENT_LINE: Rect = Rect::new(
    0,
    EVENT_LINE_Y,
    SCREEN_WIDTH,
    SCREEN_HEIGHT - EVENT_LINE_Y,
);
pub const EVENT_TEXT_Y: u16 = EVENT_LINE_Y + 2;

/// Rounding of pin LEDs inside port cells
pub const PIN_RADIUS: u16 = 2;

/// Status line rectangle at row `y`
pub const fn line(y: u16) -> Rect {
    Rect::new(0, y, LINE_WIDTH, LINE_HEIGHT)
}

/// Port frame color by expander presence
pub const fn frame_color(present: bool) -> Color {
    if present {
        Color::White
    } else {
        Color::DarkGrey
    }
}

/// Fill color of a pin LED
pub const fn pin_color(state: PinState) -> Color {
    match state {
        PinState::Active => Color::Yellow,
        PinState::Inactive => Color::DarkGrey,
        PinState::Disabled => Color::Black,
    }
}

/// Fill color of a security port
pub const fn security_color(state: SecurityState) -> Color {
    match state {
        SecurityState::Normal => Color::Green,
        SecurityState::Alarm => Color::Red,
        SecurityState::TamperOrShort => Color::Orange,
        SecurityState::Fault => Color::Red,
    }
}

/// Fill of a flashing port during the off phase
pub const FLASH_NEUTRAL: Color = Color::DarkGrey;

/// Fill of a security port that is disabled or not yet sampled
pub const PORT_NEUTRAL: Color = Color::Black;

/// Link LED color
pub const fn link_led_color(state: IpState) -> Color {
    match state {
        IpState::Up => Color::Green,
        IpState::Down => Color::Red,
        IpState::Unknown => Color::DarkGrey,
    }
}

/// Broker LED color (rx and tx share it while idle)
pub const fn broker_led_color(state: MqttState) -> Color {
    match state {
        MqttState::Up => Color::Green,
        MqttState::Active => Color::Yellow,
        MqttState::Down => Color::Red,
        MqttState::Unknown => Color::DarkGrey,
    }
}

/// Status text color: white when up, grey otherwise
pub const fn status_text_color(up: bool) -> Color {
    if up {
        Color::White
    } else {
        Color::DarkGrey
    }
}

/// `IP : 192.168.001.020`
pub fn ip_text(address: Ipv4Addr) -> StatusText {
    let [a, b, c, d] = address.octets();
    StatusText::from_fmt(format_args!("IP : {:03}.{:03}.{:03}.{:03}", a, b, c, d))
}

/// `MAC: 02:00:5E:10:00:01`
pub fn mac_text(mac: [u8; 6]) -> StatusText {
    let mut text = StatusText::from_str_truncated("MAC: ");
    for (i, byte) in mac.iter().enumerate() {
        let sep = if i == 0 { "" } else { ":" };
        let _ = write!(text, "{}{:02X}", sep, byte);
    }
    text
}

/// `TEMP: 23.4 C`, dashes for readings that are not finite
pub fn temperature_text(celsius: f32) -> StatusText {
    if celsius.is_finite() {
        StatusText::from_fmt(format_args!("TEMP: {:.1} C", celsius))
    } else {
        StatusText::from_str_truncated("TEMP: --.- C")
    }
}

/// Interior of a port cell, filled for security ports
pub const fn port_interior(frame: Rect) -> Rect {
    Rect::new(frame.x + 2, frame.y + 2, frame.width - 4, frame.height - 4)
}
