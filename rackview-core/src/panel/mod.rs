//! Status panel
//!
//! `StatusPanel` owns every component (layout, change detection, pin
//! configuration, connectivity, timers) and the draw surface. Hosts feed it
//! expander samples and call `tick` from their main loop; it decides what
//! to redraw.
//!
//! Draw errors are never propagated. A failed primitive is logged and
//! counted (`draw_failures`) and the panel carries on; the next change
//! redraws the affected area.

mod ports;
pub mod style;

use rackview_display::{Bitmap, Color, DisplayError, DrawSurface, Rect, TextLine};

use crate::config::PanelSettings;
use crate::io::{ChangedPins, DiffEngine, PinConfigStore, PinType, PINS_PER_PORT};
use crate::layout::{resolve, LayoutError, PortLayout, ResolvedLayout};
use crate::state::{Activity, ConnectivityEdges, ConnectivityStateMachine, IpState, MqttState};
use crate::timer::{flash_key, TimerActions, TimerSet};
use crate::traits::{BrokerProvider, Clock, LinkProvider};

use style::{
    StatusText, EVENT_LINE, EVENT_TEXT_Y, HEADER, HEADER_MARGIN, IP_LINE_Y, LED_RADIUS,
    LINE_HEIGHT, LINK_LED, MAC_LINE_Y, RX_LED, TEMPERATURE_LINE_Y, TEXT_X, TOPIC_LINE_Y, TX_LED,
};

/// Characters shown on the event line
pub const EVENT_CHARS: usize = 38;

/// What one `tick` did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickOutcome {
    pub edges: ConnectivityEdges,
    pub actions: TimerActions,
}

/// Rack status display
pub struct StatusPanel<D, C> {
    surface: D,
    clock: C,
    settings: PanelSettings,
    layout: Option<ResolvedLayout>,
    presence_mask: u8,
    diff: DiffEngine,
    pins: PinConfigStore,
    connectivity: ConnectivityStateMachine,
    timers: TimerSet,
    /// Level last written to the surface
    backlight: Option<u8>,
    dimmed: bool,
    draw_failures: u32,
}

impl<D: DrawSurface, C: Clock> StatusPanel<D, C> {
    /// Create a panel with default settings
    pub fn new(surface: D, clock: C) -> Self {
        Self::with_settings(surface, clock, PanelSettings::default())
    }

    /// Create a panel with explicit settings
    pub fn with_settings(surface: D, clock: C, settings: PanelSettings) -> Self {
        let settings = settings.validated();
        let mut timers = TimerSet::new();
        timers.set_timeouts(settings.display_timeout_ms, settings.event_timeout_ms);

        Self {
            surface,
            clock,
            settings,
            layout: None,
            presence_mask: 0,
            diff: DiffEngine::new(),
            pins: PinConfigStore::new(),
            connectivity: ConnectivityStateMachine::new(),
            timers,
            backlight: None,
            dimmed: false,
            draw_failures: 0,
        }
    }

    /// Clear the screen and switch the backlight fully on
    pub fn begin(&mut self) {
        let (width, height) = self.surface.pixel_dimensions();
        self.fill(Rect::new(0, 0, width, height), Color::Black);
        self.dimmed = false;
        self.write_backlight(self.settings.backlight_on_pct);
        info!("panel started, {}x{}", width, height);
    }

    /// Draw the firmware identity header, with an optional logo on the left
    pub fn draw_header(
        &mut self,
        maker: &str,
        name: &str,
        version: &str,
        platform: &str,
        logo: Option<&Bitmap<'_>>,
    ) {
        self.fill(HEADER, Color::Black);

        let mut x = TEXT_X;
        if let Some(logo) = logo {
            let result = self.surface.draw_bitmap(
                HEADER_MARGIN,
                HEADER_MARGIN,
                logo,
                Color::White,
                Color::Black,
            );
            self.note(result);
            x = HEADER_MARGIN + logo.width() + 2 * HEADER_MARGIN;
        }

        let version = StatusText::from_fmt(format_args!("v{}", version));
        let lines = [name, version.as_str(), maker, platform];
        for (row, text) in (0u16..).zip(lines) {
            let text = StatusText::from_str_truncated(text);
            self.text(
                x,
                HEADER_MARGIN + row * LINE_HEIGHT,
                text.as_str(),
                Color::White,
                Color::Black,
            );
        }
    }

    /// Select the port layout and the expanders present
    ///
    /// Every expander is marked dirty, so its next sample repaints all of
    /// its pins; the port area is redrawn with empty frames right away.
    pub fn configure(&mut self, layout: PortLayout, presence_mask: u8) -> ResolvedLayout {
        let resolved = resolve(layout, presence_mask);
        info!(
            "layout {} resolved to {}, expanders {=u8:#x}",
            layout.code(),
            resolved.layout.code(),
            presence_mask
        );

        self.layout = Some(resolved);
        self.presence_mask = presence_mask;
        self.diff.mark_all_dirty();
        self.redraw_ports();
        resolved
    }

    /// Select the port layout by numeric code
    ///
    /// Unknown codes leave the layout unresolved: the port area is blanked,
    /// samples are still tracked but nothing is drawn there.
    pub fn configure_code(
        &mut self,
        code: u16,
        presence_mask: u8,
    ) -> Result<ResolvedLayout, LayoutError> {
        match PortLayout::try_from(code) {
            Ok(layout) => Ok(self.configure(layout, presence_mask)),
            Err(err) => {
                warn!("unknown layout code {}", code);
                self.layout = None;
                self.presence_mask = presence_mask;
                self.diff.mark_all_dirty();
                self.redraw_ports();
                Err(err)
            }
        }
    }

    /// Ingest a 16-bit sample from one expander
    ///
    /// Returns the changed pins, or `None` if the expander id is beyond the
    /// fixed maximum. Any change switches the backlight on and restarts the
    /// display timeout.
    pub fn ingest(&mut self, expander: u8, sample: u16) -> Option<ChangedPins> {
        let Some(changed) = self.diff.ingest(expander, sample) else {
            warn!("sample from expander {} dropped", expander);
            return None;
        };
        if changed.is_empty() {
            return Some(changed);
        }
        trace!("expander {} changed {=u16:#x}", expander, changed.bits());

        self.wake();
        if let Some(layout) = self.layout {
            self.render_expander(&layout, expander, changed, false);
        }
        Some(changed)
    }

    /// Advance connectivity and timers; call once per main loop pass
    pub fn tick(
        &mut self,
        link: &impl LinkProvider,
        broker: &impl BrokerProvider,
    ) -> TickOutcome {
        let edges = self.connectivity.poll(link, broker);
        if let Some(ip) = edges.ip {
            self.show_link(ip, link);
        }
        if edges.cancels_activity() {
            self.timers.cancel_activity();
        }
        if let Some(mqtt) = edges.mqtt {
            self.show_broker(mqtt, broker);
        }

        let now = self.clock.now_ms();
        let actions = self.timers.poll(now);
        if actions.dim_backlight {
            debug!("display timeout, dimming");
            self.dimmed = true;
            self.write_backlight(self.settings.backlight_dim_pct);
        }
        if actions.clear_event {
            self.fill(EVENT_LINE, Color::Black);
        }
        if actions.revert_rx {
            self.revert_activity(Activity::Rx);
        }
        if actions.revert_tx {
            self.revert_activity(Activity::Tx);
        }
        if let Some(phase) = actions.flash {
            self.render_flash_phase(phase);
        }

        TickOutcome { edges, actions }
    }

    /// Set a pin's type
    ///
    /// Like every pin mutator this marks the expander dirty (its next sample
    /// repaints all of its pins) and drops the owning port from the flash
    /// list. Returns `false` for out-of-range addresses.
    pub fn set_pin_type(&mut self, expander: u8, pin: u8, pin_type: PinType) -> bool {
        let applied = self.pins.set_pin_type(expander, pin, pin_type);
        self.pin_config_changed(applied, expander, pin)
    }

    /// Set a pin's invert flag
    pub fn set_pin_invert(&mut self, expander: u8, pin: u8, invert: bool) -> bool {
        let applied = self.pins.set_pin_invert(expander, pin, invert);
        self.pin_config_changed(applied, expander, pin)
    }

    /// Set a pin's disabled flag
    pub fn set_pin_disabled(&mut self, expander: u8, pin: u8, disabled: bool) -> bool {
        let applied = self.pins.set_pin_disabled(expander, pin, disabled);
        self.pin_config_changed(applied, expander, pin)
    }

    /// Light the rx LED for a short while; ignored unless the broker is up
    pub fn trigger_rx_activity(&mut self) -> bool {
        self.trigger_activity(Activity::Rx)
    }

    /// Light the tx LED for a short while; ignored unless the broker is up
    pub fn trigger_tx_activity(&mut self) -> bool {
        self.trigger_activity(Activity::Tx)
    }

    /// Change the backlight levels (percent, clamped to 100)
    pub fn set_backlight(&mut self, on_pct: u8, dim_pct: u8) {
        self.settings = PanelSettings {
            backlight_on_pct: on_pct,
            backlight_dim_pct: dim_pct,
            ..self.settings
        }
        .validated();

        if self.backlight.is_some() {
            let level = if self.dimmed {
                self.settings.backlight_dim_pct
            } else {
                self.settings.backlight_on_pct
            };
            self.write_backlight(level);
        }
    }

    /// Change the display and event timeouts (0 disables either)
    pub fn set_timeouts(&mut self, display_ms: u32, event_ms: u32) {
        self.settings.display_timeout_ms = display_ms;
        self.settings.event_timeout_ms = event_ms;
        self.timers.set_timeouts(display_ms, event_ms);
    }

    /// Show a message on the bottom line until the event timeout expires
    pub fn show_event(&mut self, text: &str) {
        let text = TextLine::<EVENT_CHARS>::from_str_truncated(text);
        self.fill(EVENT_LINE, Color::White);
        self.text(TEXT_X, EVENT_TEXT_Y, text.as_str(), Color::Black, Color::White);

        let now = self.clock.now_ms();
        self.timers.event.start(now);
    }

    /// Show the broker topic line
    pub fn show_mqtt_topic(&mut self, topic: &str) {
        let up = self.connectivity.steady_mqtt() == MqttState::Up;
        self.show_topic(topic, style::status_text_color(up));
    }

    /// Show the rack temperature line
    pub fn show_temperature(&mut self, celsius: f32) {
        let text = style::temperature_text(celsius);
        self.status_line(TEMPERATURE_LINE_Y, text.as_str(), Color::White);
    }

    /// Resolved layout, `None` until configured (or after an unknown code)
    pub fn layout(&self) -> Option<&ResolvedLayout> {
        self.layout.as_ref()
    }

    /// Active settings
    pub fn settings(&self) -> &PanelSettings {
        &self.settings
    }

    /// Pin configuration
    pub fn pins(&self) -> &PinConfigStore {
        &self.pins
    }

    /// Connectivity state
    pub fn connectivity(&self) -> &ConnectivityStateMachine {
        &self.connectivity
    }

    /// Timer state
    pub fn timers(&self) -> &TimerSet {
        &self.timers
    }

    /// Check if the backlight is at its dim level
    pub fn is_dimmed(&self) -> bool {
        self.dimmed
    }

    /// Draw primitives that failed since creation
    pub fn draw_failures(&self) -> u32 {
        self.draw_failures
    }

    /// Get the draw surface
    pub fn surface(&self) -> &D {
        &self.surface
    }

    /// Get the draw surface mutably
    pub fn surface_mut(&mut self) -> &mut D {
        &mut self.surface
    }

    /// Give back the surface and clock
    pub fn release(self) -> (D, C) {
        (self.surface, self.clock)
    }

    fn pin_config_changed(&mut self, applied: bool, expander: u8, pin: u8) -> bool {
        if !applied {
            warn!("pin {}.{} out of range", expander, pin);
            return false;
        }
        self.diff.mark_dirty(expander);
        self.timers
            .flash
            .unregister(flash_key(expander, pin / PINS_PER_PORT));
        true
    }

    fn trigger_activity(&mut self, activity: Activity) -> bool {
        if !self.connectivity.trigger(activity) {
            return false;
        }
        let now = self.clock.now_ms();
        self.timers.activity(activity).start(now);
        self.round_fill(
            activity_led(activity),
            LED_RADIUS,
            style::broker_led_color(MqttState::Active),
        );
        true
    }

    fn revert_activity(&mut self, activity: Activity) {
        if self.connectivity.revert(activity) {
            let color = style::broker_led_color(self.connectivity.steady_mqtt());
            self.round_fill(activity_led(activity), LED_RADIUS, color);
        }
    }

    /// Backlight on, display timeout restarted
    fn wake(&mut self) {
        let now = self.clock.now_ms();
        self.timers.backlight.start(now);
        self.dimmed = false;
        self.write_backlight(self.settings.backlight_on_pct);
    }

    fn write_backlight(&mut self, level: u8) {
        if self.backlight == Some(level) {
            return;
        }
        let result = self.surface.set_backlight(level);
        if result.is_ok() {
            self.backlight = Some(level);
        }
        self.note(result);
    }

    fn show_link(&mut self, ip: IpState, link: &impl LinkProvider) {
        let color = style::status_text_color(ip == IpState::Up);
        let address = style::ip_text(link.address());
        let mac = style::mac_text(link.mac());

        self.status_line(IP_LINE_Y, address.as_str(), color);
        self.status_line(MAC_LINE_Y, mac.as_str(), color);
        self.round_fill(LINK_LED, LED_RADIUS, style::link_led_color(ip));
    }

    fn show_broker(&mut self, mqtt: MqttState, broker: &impl BrokerProvider) {
        self.show_topic(broker.topic(), style::status_text_color(mqtt == MqttState::Up));
        let color = style::broker_led_color(mqtt);
        self.round_fill(RX_LED, LED_RADIUS, color);
        self.round_fill(TX_LED, LED_RADIUS, color);
    }

    fn show_topic(&mut self, topic: &str, color: Color) {
        let text = StatusText::from_str_truncated(topic);
        self.status_line(TOPIC_LINE_Y, text.as_str(), color);
    }

    fn status_line(&mut self, y: u16, text: &str, color: Color) {
        self.fill(style::line(y), Color::Black);
        self.text(TEXT_X, y, text, color, Color::Black);
    }

    fn fill(&mut self, rect: Rect, color: Color) {
        let result = self.surface.fill_rect(rect, color);
        self.note(result);
    }

    fn outline(&mut self, rect: Rect, color: Color) {
        let result = self.surface.draw_rect(rect, color);
        self.note(result);
    }

    fn round_fill(&mut self, rect: Rect, radius: u16, color: Color) {
        let result = self.surface.fill_round_rect(rect, radius, color);
        self.note(result);
    }

    fn text(&mut self, x: u16, y: u16, text: &str, fg: Color, bg: Color) {
        let result = self.surface.draw_text(x, y, text, fg, bg);
        self.note(result);
    }

    fn note(&mut self, result: Result<(), DisplayError>) {
        if let Err(err) = result {
            self.draw_failures = self.draw_failures.saturating_add(1);
            warn!("draw failed: {:?}", err);
        }
    }
}

const fn activity_led(activity: Activity) -> Rect {
    match activity {
        Activity::Rx => RX_LED,
        Activity::Tx => TX_LED,
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell as ClockCell;
    use core::net::Ipv4Addr;

    use rackview_display::{DrawOp, RecordingSurface};

    use super::*;
    use crate::layout::cell_for;
    use crate::timer::FlashPhase;

    struct TestClock(ClockCell<u32>);

    impl TestClock {
        fn new() -> Self {
            Self(ClockCell::new(0))
        }

        fn set(&self, ms: u32) {
            self.0.set(ms);
        }
    }

    impl Clock for TestClock {
        fn now_ms(&self) -> u32 {
            self.0.get()
        }
    }

    struct Link {
        up: bool,
        address: Ipv4Addr,
    }

    impl LinkProvider for Link {
        fn is_link_up(&self) -> bool {
            self.up
        }

        fn address(&self) -> Ipv4Addr {
            self.address
        }

        fn mac(&self) -> [u8; 6] {
            [0x02, 0x00, 0x5E, 0x10, 0x00, 0x01]
        }
    }

    struct Broker(bool);

    impl BrokerProvider for Broker {
        fn is_connected(&self) -> bool {
            self.0
        }

        fn topic(&self) -> &str {
            "rack/conf/RACK-33C0AA"
        }
    }

    const LINK_UP: Link = Link {
        up: true,
        address: Ipv4Addr::new(10, 0, 0, 7),
    };
    const LINK_DOWN: Link = Link {
        up: false,
        address: Ipv4Addr::new(10, 0, 0, 7),
    };

    type TestPanel<'a> = StatusPanel<RecordingSurface, &'a TestClock>;

    fn panel(clock: &TestClock) -> TestPanel<'_> {
        let mut panel = StatusPanel::new(RecordingSurface::new(), clock);
        panel.begin();
        panel
    }

    fn led(panel: &TestPanel<'_>, index: u8) -> Rect {
        let layout = panel.layout().unwrap();
        cell_for(layout, index).unwrap().led()
    }

    fn frame(panel: &TestPanel<'_>, index: u8) -> Rect {
        let layout = panel.layout().unwrap();
        cell_for(layout, index).unwrap().frame()
    }

    #[test]
    fn test_begin_clears_and_lights() {
        let clock = TestClock::new();
        let panel = panel(&clock);
        assert_eq!(
            panel.surface().last_fill(Rect::new(0, 0, 240, 240)),
            Some(Color::Black)
        );
        assert_eq!(panel.surface().backlight(), Some(100));
    }

    #[test]
    fn test_configure_draws_frames_by_presence() {
        let clock = TestClock::new();
        let mut panel = panel(&clock);
        panel.configure(PortLayout::INPUT_32, 0x01);

        // Expander 0 is present, expander 1 is not
        assert_eq!(panel.surface().last_outline(frame(&panel, 1)), Some(Color::White));
        assert_eq!(panel.surface().last_outline(frame(&panel, 17)), Some(Color::DarkGrey));
        let outlines = panel
            .surface()
            .count(|op| matches!(op, DrawOp::Outline { .. }));
        assert_eq!(outlines, 8);
        assert_eq!(panel.surface().last_fill(led(&panel, 1)), Some(Color::DarkGrey));
    }

    #[test]
    fn test_sparse_auto_mask_draws_every_present_expander() {
        let clock = TestClock::new();
        let mut panel = panel(&clock);
        let resolved = panel.configure(PortLayout::INPUT_AUTO, 0x05);
        assert_eq!(resolved.layout, PortLayout::INPUT_32);

        // Expander 2 takes the second slot, both slots are present
        assert_eq!(panel.surface().last_outline(frame(&panel, 1)), Some(Color::White));
        assert_eq!(panel.surface().last_outline(frame(&panel, 17)), Some(Color::White));
        panel.surface_mut().clear();

        panel.ingest(2, 0x0000);
        let leds = panel
            .surface()
            .count(|op| matches!(op, DrawOp::RoundFill { .. }));
        assert_eq!(leds, 16);
        assert_eq!(panel.surface().last_fill(led(&panel, 17)), Some(Color::Yellow));
        assert_eq!(panel.surface().last_fill(led(&panel, 32)), Some(Color::Yellow));
    }

    #[test]
    fn test_auto_layout_shows_empty_slots_as_absent() {
        let clock = TestClock::new();
        let mut panel = panel(&clock);
        panel.configure(PortLayout::INPUT_AUTO, 0x01);

        assert_eq!(panel.surface().last_outline(frame(&panel, 1)), Some(Color::White));
        assert_eq!(panel.surface().last_outline(frame(&panel, 17)), Some(Color::DarkGrey));
        assert_eq!(panel.surface().last_fill(led(&panel, 17)), Some(Color::DarkGrey));
    }

    #[test]
    fn test_first_ingest_renders_every_pin() {
        let clock = TestClock::new();
        let mut panel = panel(&clock);
        panel.configure(PortLayout::INPUT_32, 0x03);
        panel.surface_mut().clear();

        let changed = panel.ingest(0, 0xFFFE).unwrap();
        assert_eq!(changed.count(), 16);
        let fills = panel
            .surface()
            .count(|op| matches!(op, DrawOp::RoundFill { .. }));
        assert_eq!(fills, 16);
        assert_eq!(panel.surface().last_fill(led(&panel, 1)), Some(Color::Yellow));
        assert_eq!(panel.surface().last_fill(led(&panel, 2)), Some(Color::DarkGrey));
    }

    #[test]
    fn test_repeated_sample_draws_nothing() {
        let clock = TestClock::new();
        let mut panel = panel(&clock);
        panel.configure(PortLayout::INPUT_32, 0x03);
        panel.ingest(0, 0x1234);
        panel.surface_mut().clear();

        assert!(panel.ingest(0, 0x1234).unwrap().is_empty());
        assert!(panel.surface().ops().is_empty());

        // One bit flips, one LED redraws
        assert_eq!(panel.ingest(0, 0x1235).unwrap().count(), 1);
        assert_eq!(panel.surface().ops().len(), 1);
    }

    #[test]
    fn test_out_of_range_expander_is_dropped() {
        let clock = TestClock::new();
        let mut panel = panel(&clock);
        panel.configure(PortLayout::INPUT_128, 0xFF);
        panel.surface_mut().clear();

        assert_eq!(panel.ingest(8, 0x0000), None);
        assert!(panel.surface().ops().is_empty());
    }

    #[test]
    fn test_pins_beyond_layout_are_not_drawn() {
        let clock = TestClock::new();
        let mut panel = panel(&clock);
        panel.configure(PortLayout::INPUT_32, 0xFF);
        panel.surface_mut().clear();

        // Expander 2 feeds indices 33..48, beyond a 32-pin layout
        assert!(panel.ingest(2, 0x0000).is_some());
        let draws = panel
            .surface()
            .count(|op| !matches!(op, DrawOp::Backlight(_)));
        assert_eq!(draws, 0);
    }

    #[test]
    fn test_ip_down_redraws_once_and_cancels_activity() {
        let clock = TestClock::new();
        let mut panel = panel(&clock);
        panel.tick(&LINK_UP, &Broker(true));
        assert!(panel.trigger_rx_activity());
        assert!(panel.trigger_tx_activity());
        assert!(panel.timers().rx.is_armed());

        panel.surface_mut().clear();
        clock.set(100);
        let outcome = panel.tick(&LINK_DOWN, &Broker(true));
        assert_eq!(outcome.edges.ip, Some(IpState::Down));
        assert_eq!(outcome.edges.mqtt, Some(MqttState::Down));
        assert_eq!(panel.surface().texts_at(IP_LINE_Y).count(), 1);
        assert!(!panel.timers().rx.is_armed());
        assert!(!panel.timers().tx.is_armed());
        assert_eq!(panel.surface().last_fill(LINK_LED), Some(Color::Red));
        assert_eq!(panel.surface().last_fill(RX_LED), Some(Color::Red));

        // Cancelled timers never fire
        panel.surface_mut().clear();
        clock.set(1_000);
        let outcome = panel.tick(&LINK_DOWN, &Broker(true));
        assert!(outcome.edges.is_empty());
        assert!(!outcome.actions.revert_rx);
        assert_eq!(panel.surface().texts_at(IP_LINE_Y).count(), 0);
    }

    #[test]
    fn test_status_lines_on_link_up() {
        let clock = TestClock::new();
        let mut panel = panel(&clock);
        panel.tick(&LINK_UP, &Broker(true));

        let ip: heapless::Vec<&str, 4> = panel.surface().texts_at(IP_LINE_Y).collect();
        assert_eq!(ip.as_slice(), &["IP : 010.000.000.007"]);
        let mac: heapless::Vec<&str, 4> = panel.surface().texts_at(MAC_LINE_Y).collect();
        assert_eq!(mac.as_slice(), &["MAC: 02:00:5E:10:00:01"]);
        let topic: heapless::Vec<&str, 4> = panel.surface().texts_at(TOPIC_LINE_Y).collect();
        assert_eq!(topic.as_slice(), &["rack/conf/RACK-33C0AA"]);
        assert_eq!(panel.surface().last_fill(LINK_LED), Some(Color::Green));
        assert_eq!(panel.surface().last_fill(TX_LED), Some(Color::Green));
    }

    #[test]
    fn test_unassigned_address_counts_as_down() {
        let clock = TestClock::new();
        let mut panel = panel(&clock);
        let link = Link {
            up: true,
            address: Ipv4Addr::UNSPECIFIED,
        };
        let outcome = panel.tick(&link, &Broker(true));
        assert_eq!(outcome.edges.ip, Some(IpState::Down));
        assert!(!panel.trigger_rx_activity());
    }

    #[test]
    fn test_activity_led_reverts_after_timeout() {
        let clock = TestClock::new();
        let mut panel = panel(&clock);
        panel.tick(&LINK_UP, &Broker(true));

        assert!(panel.trigger_rx_activity());
        assert_eq!(panel.surface().last_fill(RX_LED), Some(Color::Yellow));
        assert_eq!(panel.connectivity().mqtt(), MqttState::Active);

        clock.set(300);
        assert!(!panel.tick(&LINK_UP, &Broker(true)).actions.revert_rx);
        clock.set(301);
        assert!(panel.tick(&LINK_UP, &Broker(true)).actions.revert_rx);
        assert_eq!(panel.surface().last_fill(RX_LED), Some(Color::Green));
        assert_eq!(panel.connectivity().mqtt(), MqttState::Up);
    }

    #[test]
    fn test_trigger_ignored_while_broker_down() {
        let clock = TestClock::new();
        let mut panel = panel(&clock);
        panel.tick(&LINK_UP, &Broker(false));
        panel.surface_mut().clear();

        assert!(!panel.trigger_rx_activity());
        assert!(!panel.trigger_tx_activity());
        assert!(panel.surface().ops().is_empty());
        assert!(!panel.timers().rx.is_armed());
    }

    #[test]
    fn test_backlight_dims_and_wakes() {
        let clock = TestClock::new();
        let mut panel = panel(&clock);
        panel.configure(PortLayout::INPUT_32, 0x01);
        panel.ingest(0, 0xFFFF);

        clock.set(10_000);
        panel.tick(&LINK_DOWN, &Broker(false));
        assert!(!panel.is_dimmed());

        clock.set(10_001);
        assert!(panel.tick(&LINK_DOWN, &Broker(false)).actions.dim_backlight);
        assert!(panel.is_dimmed());
        assert_eq!(panel.surface().backlight(), Some(10));

        clock.set(20_000);
        panel.ingest(0, 0xFFFE);
        assert!(!panel.is_dimmed());
        assert_eq!(panel.surface().backlight(), Some(100));
    }

    #[test]
    fn test_zero_display_timeout_never_dims() {
        let clock = TestClock::new();
        let mut panel = panel(&clock);
        panel.set_timeouts(0, 3_000);
        panel.ingest(0, 0x0000);
        clock.set(1_000_000);
        panel.tick(&LINK_DOWN, &Broker(false));
        assert!(!panel.is_dimmed());
    }

    #[test]
    fn test_set_backlight_reapplies_level() {
        let clock = TestClock::new();
        let mut panel = panel(&clock);
        panel.set_backlight(80, 0);
        assert_eq!(panel.surface().backlight(), Some(80));

        panel.ingest(0, 0);
        clock.set(10_001);
        panel.tick(&LINK_DOWN, &Broker(false));
        assert_eq!(panel.surface().backlight(), Some(0));

        panel.set_backlight(150, 20);
        assert_eq!(panel.settings().backlight_on_pct, 100);
        assert_eq!(panel.surface().backlight(), Some(20));
    }

    #[test]
    fn test_event_line_clears_after_timeout() {
        let clock = TestClock::new();
        let mut panel = panel(&clock);
        panel.show_event("port 3 closed");
        assert_eq!(panel.surface().last_fill(EVENT_LINE), Some(Color::White));
        {
            let texts: heapless::Vec<&str, 4> =
                panel.surface().texts_at(EVENT_TEXT_Y).collect();
            assert_eq!(texts.as_slice(), &["port 3 closed"]);
        }

        clock.set(3_000);
        assert!(!panel.tick(&LINK_DOWN, &Broker(false)).actions.clear_event);
        clock.set(3_001);
        assert!(panel.tick(&LINK_DOWN, &Broker(false)).actions.clear_event);
        assert_eq!(panel.surface().last_fill(EVENT_LINE), Some(Color::Black));
    }

    #[test]
    fn test_disabled_pin_always_renders_disabled() {
        let clock = TestClock::new();
        let mut panel = panel(&clock);
        panel.configure(PortLayout::INPUT_32, 0x01);
        assert!(panel.set_pin_disabled(0, 0, true));

        for sample in [0x0000, 0xFFFF, 0xFFFE, 0x0001] {
            panel.ingest(0, sample);
            assert_eq!(panel.surface().last_fill(led(&panel, 1)), Some(Color::Black));
        }
    }

    #[test]
    fn test_pin_config_change_repaints_on_next_sample() {
        let clock = TestClock::new();
        let mut panel = panel(&clock);
        panel.configure(PortLayout::INPUT_32, 0x01);
        panel.ingest(0, 0xFFFE);
        assert_eq!(panel.surface().last_fill(led(&panel, 1)), Some(Color::Yellow));

        assert!(panel.set_pin_invert(0, 0, true));
        assert_eq!(panel.ingest(0, 0xFFFE), Some(ChangedPins::ALL));
        assert_eq!(panel.surface().last_fill(led(&panel, 1)), Some(Color::DarkGrey));

        assert!(!panel.set_pin_invert(8, 0, true));
        assert!(!panel.set_pin_invert(0, 16, true));
    }

    #[test]
    fn test_security_port_flashes() {
        let clock = TestClock::new();
        let mut panel = panel(&clock);
        panel.configure(PortLayout::INPUT_32, 0x01);
        panel.set_pin_type(0, 0, PinType::Security);
        let interior = style::port_interior(frame(&panel, 1));

        // Tamper/short on port 0
        panel.ingest(0, 0xFFF2);
        assert_eq!(panel.surface().last_fill(interior), Some(Color::Orange));
        assert!(panel.timers().flash.contains(flash_key(0, 0)));

        clock.set(699);
        assert_eq!(panel.tick(&LINK_DOWN, &Broker(false)).actions.flash, None);
        clock.set(700);
        let outcome = panel.tick(&LINK_DOWN, &Broker(false));
        assert_eq!(outcome.actions.flash, Some(FlashPhase::Off));
        assert_eq!(panel.surface().last_fill(interior), Some(style::FLASH_NEUTRAL));

        clock.set(1_000);
        let outcome = panel.tick(&LINK_DOWN, &Broker(false));
        assert_eq!(outcome.actions.flash, Some(FlashPhase::On));
        assert_eq!(panel.surface().last_fill(interior), Some(Color::Orange));

        // Back to normal: steady green, off the flash list
        panel.ingest(0, 0xFFF5);
        assert_eq!(panel.surface().last_fill(interior), Some(Color::Green));
        assert!(panel.timers().flash.is_empty());
    }

    #[test]
    fn test_retyped_security_port_clears_its_block() {
        let clock = TestClock::new();
        let mut panel = panel(&clock);
        panel.configure(PortLayout::INPUT_32, 0x01);
        panel.set_pin_type(0, 0, PinType::Security);
        let interior = style::port_interior(frame(&panel, 1));

        panel.ingest(0, 0xFFF5);
        assert_eq!(panel.surface().last_fill(interior), Some(Color::Green));

        panel.set_pin_type(0, 0, PinType::Default);
        panel.surface_mut().clear();
        panel.ingest(0, 0xFFF5);
        assert_eq!(panel.surface().last_fill(interior), Some(style::PORT_NEUTRAL));

        // The block is cleared before the LEDs are drawn over it
        let ops = panel.surface().ops();
        let cleared = ops
            .iter()
            .position(|op| matches!(op, DrawOp::Fill { rect, .. } if *rect == interior))
            .unwrap();
        let lit = ops
            .iter()
            .position(|op| matches!(op, DrawOp::RoundFill { rect, .. } if *rect == led(&panel, 2)))
            .unwrap();
        assert!(cleared < lit);
        assert_eq!(panel.surface().last_fill(led(&panel, 2)), Some(Color::Yellow));
    }

    #[test]
    fn test_steady_security_states_do_not_flash() {
        let clock = TestClock::new();
        let mut panel = panel(&clock);
        panel.configure(PortLayout::INPUT_32, 0x01);
        panel.set_pin_type(0, 4, PinType::Security);
        let interior = style::port_interior(frame(&panel, 5));

        panel.ingest(0, 0xFF1F);
        assert_eq!(panel.surface().last_fill(interior), Some(Color::Red));
        assert!(panel.timers().flash.is_empty());
    }

    #[test]
    fn test_pin_config_change_stops_flashing() {
        let clock = TestClock::new();
        let mut panel = panel(&clock);
        panel.configure(PortLayout::INPUT_32, 0x01);
        panel.set_pin_type(0, 0, PinType::Security);
        panel.ingest(0, 0xFFF0);
        assert!(panel.timers().flash.contains(flash_key(0, 0)));

        panel.set_pin_invert(0, 2, true);
        assert!(!panel.timers().flash.contains(flash_key(0, 0)));
        assert!(!panel.timers().flash.is_running());
    }

    #[test]
    fn test_disabled_security_port_never_flashes() {
        let clock = TestClock::new();
        let mut panel = panel(&clock);
        panel.configure(PortLayout::INPUT_32, 0x01);
        panel.set_pin_type(0, 0, PinType::Security);
        panel.set_pin_disabled(0, 0, true);

        for sample in [0xFFF0, 0xFFF2, 0xFFFD] {
            panel.ingest(0, sample);
            assert!(panel.timers().flash.is_empty());
        }
        let interior = style::port_interior(frame(&panel, 1));
        assert_eq!(panel.surface().last_fill(interior), Some(style::PORT_NEUTRAL));
    }

    #[test]
    fn test_output_layout_draws_cells() {
        let clock = TestClock::new();
        let mut panel = panel(&clock);
        panel.configure(PortLayout::OUTPUT_64_8, 0xFF);
        panel.surface_mut().clear();

        // Narrow chips: expander 1 pin 0 is index 9
        panel.ingest(1, 0x00FE);
        assert_eq!(panel.surface().last_fill(led(&panel, 9)), Some(Color::Yellow));
        assert_eq!(panel.surface().last_fill(led(&panel, 10)), Some(Color::DarkGrey));
    }

    #[test]
    fn test_unknown_layout_code_leaves_panel_unresolved() {
        let clock = TestClock::new();
        let mut panel = panel(&clock);
        assert_eq!(
            panel.configure_code(1234, 0xFF),
            Err(LayoutError::UnknownLayout(1234))
        );
        assert!(panel.layout().is_none());
        panel.surface_mut().clear();

        assert!(panel.ingest(0, 0x0000).is_some());
        let draws = panel
            .surface()
            .count(|op| !matches!(op, DrawOp::Backlight(_)));
        assert_eq!(draws, 0);

        assert!(panel.configure_code(1096, 0x3F).is_ok());
        assert!(panel.layout().is_some());
    }

    #[test]
    fn test_unknown_layout_code_blanks_port_area() {
        let clock = TestClock::new();
        let mut panel = panel(&clock);
        panel.configure(PortLayout::INPUT_32, 0x03);
        panel.ingest(0, 0x0000);
        panel.surface_mut().clear();

        assert!(panel.configure_code(1234, 0x03).is_err());
        assert_eq!(
            panel.surface().last_fill(style::PORT_AREA),
            Some(Color::Black)
        );
        assert_eq!(panel.surface().ops().len(), 1);
    }

    #[test]
    fn test_every_layout_code_configures() {
        let clock = TestClock::new();
        let mut panel = panel(&clock);
        for layout in PortLayout::ALL {
            let resolved = panel.configure_code(layout.code(), 0xFF);
            assert!(resolved.is_ok(), "code {}", layout.code());
        }
        assert_eq!(
            panel.configure_code(2128, 0x01).map(|r| r.layout),
            Ok(PortLayout::OUTPUT_128)
        );
    }

    #[test]
    fn test_draw_failures_are_counted() {
        let clock = TestClock::new();
        let mut panel = panel(&clock);
        panel.configure(PortLayout::INPUT_32, 0x01);
        panel.surface_mut().set_failing(true);

        panel.ingest(0, 0x0000);
        panel.show_event("lost");
        assert!(panel.draw_failures() >= 17);

        panel.surface_mut().set_failing(false);
        let before = panel.draw_failures();
        panel.ingest(0, 0xFFFF);
        assert_eq!(panel.draw_failures(), before);
    }

    #[test]
    fn test_header_with_logo() {
        const LOGO: [u8; 8] = [0xFF; 8];
        let clock = TestClock::new();
        let mut panel = panel(&clock);
        let logo = Bitmap::new(8, 8, &LOGO).unwrap();
        panel.draw_header("ACME", "rack32", "1.2.0", "esp32", Some(&logo));

        let bitmaps = panel
            .surface()
            .count(|op| matches!(op, DrawOp::Bitmap { .. }));
        assert_eq!(bitmaps, 1);
        let names: heapless::Vec<&str, 2> =
            panel.surface().texts_at(HEADER_MARGIN).collect();
        assert_eq!(names.as_slice(), &["rack32"]);
        let versions: heapless::Vec<&str, 2> = panel
            .surface()
            .texts_at(HEADER_MARGIN + LINE_HEIGHT)
            .collect();
        assert_eq!(versions.as_slice(), &["v1.2.0"]);
    }

    #[test]
    fn test_temperature_and_topic_lines() {
        let clock = TestClock::new();
        let mut panel = panel(&clock);
        panel.show_temperature(21.34);
        panel.show_mqtt_topic("rack/stat/RACK-1");

        let temp: heapless::Vec<&str, 2> =
            panel.surface().texts_at(TEMPERATURE_LINE_Y).collect();
        assert_eq!(temp.as_slice(), &["TEMP: 21.3 C"]);
        let topic: heapless::Vec<&str, 2> = panel.surface().texts_at(TOPIC_LINE_Y).collect();
        assert_eq!(topic.as_slice(), &["rack/stat/RACK-1"]);
    }
}
