use ratatui::widgets::ListState;

use crate::config::Settings;
use crate::device::{ConnectionResult, DeviceError, NoteOn, PadSender};
use crate::illumination::illuminate;
use crate::scale::{Root, Scale};

// ── Events ────────────────────────────────────────────────────────────────────

/// Everything the event loop feeds into [`App::handle`].
pub enum AppEvent {
    /// Outcome of the one-shot background connect.
    Connected(ConnectionResult),
    PrevRoot,
    NextRoot,
    /// Scale list navigation, forwarded to the list state.
    Scale(ListNav),
    /// Light the pads for the current root and scale.
    Activate,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListNav {
    Up,
    Down,
    First,
    Last,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

// ── Session ───────────────────────────────────────────────────────────────────

/// Device connection state. Leaves `Pending` at most once; `Ready` is final.
pub enum Session {
    Uninitialized,
    Pending,
    Ready(Box<dyn PadSender>),
    Failed(DeviceError),
}

/// What the renderer shows about the connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus<'a> {
    Idle,
    Connecting,
    Connected,
    Failed(&'a DeviceError),
}

/// Outcome of the last pad batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub sent:   usize,
    pub failed: usize,
}

// ── Scale list ────────────────────────────────────────────────────────────────

/// Selection state of the scale list widget; always points at a valid row.
pub struct ScaleList {
    state: ListState,
    len:   usize,
}

impl ScaleList {
    fn new(len: usize) -> Self {
        Self { state: ListState::default().with_selected(Some(0)), len }
    }

    pub fn selected(&self) -> usize {
        self.state.selected().unwrap_or(0)
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    fn navigate(&mut self, nav: ListNav) {
        let last = self.len.saturating_sub(1);
        let current = self.selected();
        let next = match nav {
            ListNav::Up    => current.saturating_sub(1),
            ListNav::Down  => (current + 1).min(last),
            ListNav::First => 0,
            ListNav::Last  => last,
        };
        self.state.select(Some(next));
    }
}

// ── Render snapshot ───────────────────────────────────────────────────────────

pub struct Snapshot<'a> {
    pub root_name:   &'static str,
    pub scale_name:  &'a str,
    pub scale_names: Vec<&'a str>,
    pub device_name: &'a str,
    pub session:     SessionStatus<'a>,
    pub last_batch:  Option<BatchReport>,
}

// ── App state ─────────────────────────────────────────────────────────────────

pub struct App {
    settings:       Settings,
    root:           Root,
    pub scale_list: ScaleList,
    session:        Session,
    last_batch:     Option<BatchReport>,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        let scale_list = ScaleList::new(settings.scales.len());
        Self {
            settings,
            root: Root::C,
            scale_list,
            session: Session::Uninitialized,
            last_batch: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn root(&self) -> Root {
        self.root
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn selected_scale(&self) -> &Scale {
        self.settings.scales.get_clamped(self.scale_list.selected())
    }

    /// Mark the background connect as issued.
    pub fn begin_connect(&mut self) {
        if matches!(self.session, Session::Uninitialized) {
            log::info!("Connecting to '{}'", self.settings.device_name);
            self.session = Session::Pending;
        }
    }

    pub fn handle(&mut self, event: AppEvent) -> Flow {
        match event {
            AppEvent::Connected(result) => self.on_connected(result),
            AppEvent::PrevRoot          => self.root = self.root.prev(),
            AppEvent::NextRoot          => self.root = self.root.next(),
            AppEvent::Scale(nav)        => self.scale_list.navigate(nav),
            AppEvent::Activate          => self.activate(),
            AppEvent::Quit              => return Flow::Quit,
        }
        Flow::Continue
    }

    fn on_connected(&mut self, result: ConnectionResult) {
        if !matches!(self.session, Session::Pending) {
            log::warn!("Ignoring connection result outside of a pending connect");
            return;
        }
        self.session = match result {
            Ok(sender) => Session::Ready(sender),
            Err(e) => {
                log::error!("Device unavailable: {}", e);
                Session::Failed(e)
            }
        };
    }

    /// Send one note-on per pad. Does nothing unless the session is ready.
    fn activate(&mut self) {
        let Session::Ready(sender) = &mut self.session else {
            log::debug!("Activate ignored, device not connected");
            return;
        };

        let scale = self.settings.scales.get_clamped(self.scale_list.selected());
        let pads = illuminate(self.root, scale, self.settings.pads);

        let mut report = BatchReport::default();
        for (note, illumination) in pads {
            let message = NoteOn {
                channel:  self.settings.channel,
                note,
                velocity: self.settings.colors.encode(illumination),
            };
            match sender.send(message) {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    log::warn!("Pad {}: {}", note, e);
                    report.failed += 1;
                }
            }
        }

        log::info!(
            "Lit {} {}: {} sent, {} failed",
            self.root.name(),
            scale.name(),
            report.sent,
            report.failed
        );
        self.last_batch = Some(report);
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        let session = match &self.session {
            Session::Uninitialized => SessionStatus::Idle,
            Session::Pending       => SessionStatus::Connecting,
            Session::Ready(_)      => SessionStatus::Connected,
            Session::Failed(e)     => SessionStatus::Failed(e),
        };
        Snapshot {
            root_name:   self.root.name(),
            scale_name:  self.selected_scale().name(),
            scale_names: self.settings.scales.names(),
            device_name: &self.settings.device_name,
            session,
            last_batch:  self.last_batch,
        }
    }

    /// Release the output port, if one was opened.
    pub fn shutdown(&mut self) {
        if let Session::Ready(sender) = std::mem::replace(&mut self.session, Session::Uninitialized) {
            sender.close();
        }
    }
}
