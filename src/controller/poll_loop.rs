use chrono::{DateTime, Duration as ChronoDuration, Local};
use std::collections::BTreeSet;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::controller::pad::InputSource;
use crate::host::message::Inbound;
use crate::mapping::edge_detector::EdgeDetector;
use crate::menu::{MenuController, MenuError};

// Loop statistics, reported periodically
#[derive(Debug, Clone)]
pub struct LoopStats {
    pub ticks: u64,
    pub actions: u64,
    pub started: DateTime<Local>,
    last_report: DateTime<Local>,
}

impl Default for LoopStats {
    fn default() -> Self {
        let now = Local::now();
        Self {
            ticks: 0,
            actions: 0,
            started: now,
            last_report: now,
        }
    }
}

impl LoopStats {
    fn report_due(&mut self, every: ChronoDuration) -> bool {
        let now = Local::now();
        if now - self.last_report >= every {
            self.last_report = now;
            true
        } else {
            false
        }
    }
}

/// Single timer driving sampling, edge detection and the menu.
///
/// Everything runs on the caller's task. Each tick drains inbound host
/// messages, samples every pad once and feeds the resulting actions to the
/// menu before returning.
pub struct PollLoop<S> {
    source: S,
    edges: EdgeDetector,
    period: Duration,
    connected: BTreeSet<usize>,
    inbound: Option<mpsc::Receiver<Inbound>>,
    stats: LoopStats,
}

impl<S: InputSource> PollLoop<S> {
    pub fn new(source: S, edges: EdgeDetector, period: Duration) -> Self {
        info!("Creating poll loop with {}ms period", period.as_millis());
        Self {
            source,
            edges,
            period,
            connected: BTreeSet::new(),
            inbound: None,
            stats: LoopStats::default(),
        }
    }

    pub fn with_inbound(mut self, inbound: mpsc::Receiver<Inbound>) -> Self {
        self.inbound = Some(inbound);
        self
    }

    pub fn stats(&self) -> &LoopStats {
        &self.stats
    }

    pub fn connected(&self) -> impl Iterator<Item = usize> + '_ {
        self.connected.iter().copied()
    }

    /// One sample-and-dispatch cycle. Returns the number of actions handled.
    pub fn tick<C: MenuController>(&mut self, menu: &mut C) -> Result<usize, MenuError> {
        self.stats.ticks += 1;
        let mut handled = self.drain_inbound(menu)?;

        let snapshots = self.source.sample();
        self.track_devices(snapshots.iter().map(|s| s.slot).collect());

        for snapshot in &snapshots {
            for action in self.edges.on_poll(snapshot.slot, snapshot) {
                if menu.is_closed() {
                    debug!("Menu closed, dropping {}", action);
                    continue;
                }
                menu.handle(action)?;
                handled += 1;
            }
        }

        self.stats.actions += handled as u64;
        Ok(handled)
    }

    /// Ticks until the menu closes.
    pub async fn run<C: MenuController>(&mut self, menu: &mut C) -> Result<LoopStats, MenuError> {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!("Poll loop running");

        while !menu.is_closed() {
            ticker.tick().await;
            self.tick(menu)?;

            if self.stats.report_due(ChronoDuration::seconds(30)) {
                info!(
                    "Poll loop: {} ticks, {} actions since {}, pads on slots {:?}",
                    self.stats.ticks,
                    self.stats.actions,
                    self.stats.started.format("%H:%M:%S"),
                    self.connected
                );
            }
        }

        info!(
            "Menu closed after {} ticks and {} actions",
            self.stats.ticks, self.stats.actions
        );
        Ok(self.stats.clone())
    }

    fn drain_inbound<C: MenuController>(&mut self, menu: &mut C) -> Result<usize, MenuError> {
        let Some(receiver) = self.inbound.as_mut() else {
            return Ok(0);
        };

        let mut handled = 0;
        loop {
            match receiver.try_recv() {
                Ok(Inbound::Update(update)) => menu.apply_update(update),
                Ok(Inbound::Footer(button)) if !menu.is_closed() => {
                    if menu.footer(button)? {
                        debug!("Footer {:?} pressed", button);
                        handled += 1;
                    } else {
                        debug!("Footer {:?} has no action here", button);
                    }
                }
                Ok(Inbound::Footer(button)) => debug!("Menu closed, dropping footer {:?}", button),
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    warn!("Inbound host channel closed");
                    self.inbound = None;
                    break;
                }
            }
        }
        Ok(handled)
    }

    fn track_devices(&mut self, present: BTreeSet<usize>) {
        for slot in present.difference(&self.connected) {
            info!("Pad connected on slot {}", slot);
            self.edges.connect(*slot);
        }
        for slot in self.connected.difference(&present) {
            warn!("Pad on slot {} went away", slot);
            self.edges.disconnect(*slot);
        }
        self.connected = present;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MenuConfig;
    use crate::controller::pad::{PadButton, PadSnapshot, ScriptedSource};
    use crate::host::message::{HostRequest, HostUpdate};
    use crate::mapping::bindings::{ButtonBindings, FooterButton};
    use crate::mapping::edge_detector::EdgeSettings;
    use crate::menu::item::Item;
    use crate::menu::view::ViewEffect;
    use crate::menu::ModMenu;

    type TestMenu = ModMenu<Vec<HostRequest>, Vec<ViewEffect>>;

    fn menu() -> TestMenu {
        let items = (0..3).map(|i| Item::new(i, format!("Mod {}", i), "Misc")).collect();
        ModMenu::new(items, &MenuConfig::default(), Vec::new(), Vec::new())
    }

    fn poll_loop(frames: Vec<Vec<PadSnapshot>>) -> PollLoop<ScriptedSource> {
        PollLoop::new(
            ScriptedSource::new(frames),
            EdgeDetector::new(ButtonBindings::default(), EdgeSettings::default()),
            Duration::from_millis(100),
        )
    }

    fn pressed(slot: usize, button: PadButton) -> PadSnapshot {
        PadSnapshot::idle(slot).with_button(button)
    }

    #[test]
    fn holding_activate_for_five_ticks_toggles_once() {
        let frames = vec![vec![pressed(0, PadButton::A)]; 5];
        let mut poll = poll_loop(frames);
        let mut menu = menu();

        for _ in 0..5 {
            poll.tick(&mut menu).unwrap();
        }
        assert_eq!(
            menu.bridge(),
            &vec![HostRequest::ToggleModRequest { id: 0, state: true }]
        );
    }

    #[test]
    fn release_and_press_toggles_again() {
        let frames = vec![
            vec![pressed(0, PadButton::A)],
            vec![PadSnapshot::idle(0)],
            vec![pressed(0, PadButton::A)],
        ];
        let mut poll = poll_loop(frames);
        let mut menu = menu();
        for _ in 0..3 {
            poll.tick(&mut menu).unwrap();
        }
        assert_eq!(menu.bridge().len(), 2);
    }

    #[test]
    fn two_pads_are_debounced_independently() {
        let frames = vec![
            vec![pressed(0, PadButton::A), PadSnapshot::idle(1)],
            vec![pressed(0, PadButton::A), pressed(1, PadButton::A)],
        ];
        let mut poll = poll_loop(frames);
        let mut menu = menu();
        poll.tick(&mut menu).unwrap();
        poll.tick(&mut menu).unwrap();

        assert_eq!(menu.bridge().len(), 2);
        assert_eq!(poll.connected().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn unplugging_resets_hold_state() {
        let frames = vec![
            vec![pressed(0, PadButton::A)],
            vec![],
            vec![pressed(0, PadButton::A)],
        ];
        let mut poll = poll_loop(frames);
        let mut menu = menu();
        for _ in 0..3 {
            poll.tick(&mut menu).unwrap();
        }
        assert_eq!(menu.bridge().len(), 2);
    }

    #[test]
    fn inbound_updates_and_footer_presses_are_merged() {
        let (tx, rx) = mpsc::channel(8);
        let mut poll = poll_loop(vec![]).with_inbound(rx);
        let mut menu = menu();

        tx.try_send(Inbound::Update(HostUpdate::EnabledSize { bytes: 2048 }))
            .unwrap();
        tx.try_send(Inbound::Footer(FooterButton::X)).unwrap();
        tx.try_send(Inbound::Footer(FooterButton::A)).unwrap();

        assert_eq!(poll.tick(&mut menu).unwrap(), 1);
        assert_eq!(
            menu.bridge(),
            &vec![HostRequest::ToggleModRequest { id: 0, state: true }]
        );
        assert!(menu
            .sink()
            .iter()
            .any(|e| matches!(e, ViewEffect::Status(s) if s.contains("2.0 KB"))));

        drop(tx);
        assert_eq!(poll.tick(&mut menu).unwrap(), 0);
    }

    #[test]
    fn footer_x_reaches_the_workspace_menu() {
        use crate::host::prompt::ScriptedPrompt;
        use crate::menu::item::WorkspaceListing;
        use crate::menu::WorkspaceMenu;

        let listing = WorkspaceListing {
            workspaces: vec!["Default".into(), "Solo".into()],
            active_workspace: "Default".into(),
        };
        let mut menu = WorkspaceMenu::new(
            listing,
            &MenuConfig::default(),
            Vec::<HostRequest>::new(),
            Vec::<ViewEffect>::new(),
            ScriptedPrompt::answering(&[Some("Copy")]),
        );
        let (tx, rx) = mpsc::channel(8);
        let mut poll = poll_loop(vec![]).with_inbound(rx);

        tx.try_send(Inbound::Footer(FooterButton::X)).unwrap();
        assert_eq!(poll.tick(&mut menu).unwrap(), 1);
        assert_eq!(
            menu.bridge(),
            &vec![HostRequest::Duplicate {
                source_name: "Default".into(),
                target_name: "Copy".into()
            }]
        );
    }

    #[test]
    fn footers_are_dropped_once_closed() {
        let (tx, rx) = mpsc::channel(8);
        let mut poll = poll_loop(vec![]).with_inbound(rx);
        let mut menu = menu();

        tx.try_send(Inbound::Footer(FooterButton::B)).unwrap();
        tx.try_send(Inbound::Footer(FooterButton::A)).unwrap();
        assert_eq!(poll.tick(&mut menu).unwrap(), 1);
        assert!(menu.is_closed());
        assert_eq!(menu.bridge(), &vec![HostRequest::ClosureRequest]);
    }

    #[tokio::test]
    async fn run_stops_when_menu_closes() {
        let frames = vec![
            vec![pressed(0, PadButton::DPadDown)],
            vec![pressed(0, PadButton::B)],
            vec![pressed(0, PadButton::A)],
        ];
        let mut poll = poll_loop(frames);
        let mut menu = menu();

        let stats = poll.run(&mut menu).await.unwrap();
        assert_eq!(stats.ticks, 2);
        assert_eq!(menu.bridge(), &vec![HostRequest::ClosureRequest]);
    }
}
