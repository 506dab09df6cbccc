//! Event-driven visibility gates: the boot splash, collapsible panels and the
//! device carousel. Nothing here is frame-driven; hosts feed timer and input
//! events in and apply the resulting state to the page.

use crate::constants::{BOOT_EXIT_FADE_MS, BOOT_FLAG_KEY, BOOT_TOTAL_MS, CAROUSEL_INTERVAL_MS};
use crate::session::SessionStore;
use fnv::FnvHashSet;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BootLine {
    pub text: &'static str,
    pub delay_ms: u32,
    pub highlight: bool,
}

const fn line(text: &'static str, delay_ms: u32) -> BootLine {
    BootLine {
        text,
        delay_ms,
        highlight: false,
    }
}

pub static BOOT_LINES: [BootLine; 15] = [
    line("BIOS v2.4.1 — Initializing...", 0),
    line("Memory: 32768 MB OK | CPU: 8 cores @ 3.2GHz", 100),
    line("", 180),
    line("Loading kernel...", 250),
    line("  [OK] net.core | fs.ext4 | crypto.aes256", 350),
    line("", 420),
    line("Mounting /dev/sda1... OK", 500),
    line("Network: eth0 up — 192.168.1.42", 620),
    line("", 700),
    line("Loading portfolio.sys...", 800),
    line("  [OK] Config | Assets | Shaders", 950),
    line("", 1050),
    line("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━", 1150),
    BootLine {
        text: "SYSTEM READY",
        delay_ms: 1250,
        highlight: true,
    },
    line("Launching interface...", 1400),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineStyle {
    Highlight,
    Ok,
    Muted,
    Normal,
}

impl BootLine {
    pub fn style(&self) -> LineStyle {
        if self.highlight {
            LineStyle::Highlight
        } else if self.text.starts_with("  [OK]") {
            LineStyle::Ok
        } else if self.text.starts_with("  ") {
            LineStyle::Muted
        } else {
            LineStyle::Normal
        }
    }
}

/// Number of boot lines shown `elapsed_ms` after the splash appeared.
pub fn visible_lines(elapsed_ms: f64) -> usize {
    BOOT_LINES
        .iter()
        .take_while(|l| l.delay_ms as f64 <= elapsed_ms)
        .count()
}

/// Progress bar fill in \[0, 1\].
pub fn progress(elapsed_ms: f64) -> f32 {
    (elapsed_ms / BOOT_TOTAL_MS as f64).clamp(0.0, 1.0) as f32
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BootPhase {
    Booting,
    Revealed,
}

/// What the host should do after the boot timer fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    /// Fade the splash out, then call [`BootController::finish`].
    AfterFade { fade_ms: u32 },
}

type CompleteFn = Box<dyn FnOnce()>;

/// `Booting -> Revealed`, once per session.
///
/// Completion happens through the boot timer or a skip, whichever comes
/// first. Either way the session flag is written and the completion callback
/// runs exactly once.
pub struct BootController<S: SessionStore> {
    store: S,
    phase: BootPhase,
    on_complete: Option<CompleteFn>,
    timers: SmallVec<[i32; 16]>,
    flag_written: bool,
}

impl<S: SessionStore> BootController<S> {
    /// Reads the session flag once. A session that already booted skips the
    /// splash and completes immediately.
    pub fn start(store: S, on_complete: impl FnOnce() + 'static) -> Self {
        let already_booted = store.get_flag(BOOT_FLAG_KEY);
        let mut controller = Self {
            store,
            phase: BootPhase::Booting,
            on_complete: Some(Box::new(on_complete)),
            timers: SmallVec::new(),
            flag_written: already_booted,
        };
        if already_booted {
            log::info!("[boot] session already booted; skipping splash");
            controller.phase = BootPhase::Revealed;
            controller.fire();
        } else {
            log::info!("[boot] starting boot sequence");
        }
        controller
    }

    pub fn phase(&self) -> BootPhase {
        self.phase
    }

    /// Whether the splash should be on screen.
    pub fn shows_splash(&self) -> bool {
        self.phase == BootPhase::Booting
    }

    pub fn is_complete(&self) -> bool {
        self.on_complete.is_none()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Remember a host timer id so a skip can cancel it.
    pub fn track_timer(&mut self, id: i32) {
        if !self.is_complete() {
            self.timers.push(id);
        }
    }

    pub fn pending_timers(&self) -> &[i32] {
        &self.timers
    }

    /// The boot timer fired. Returns `None` if the splash was already
    /// dismissed.
    pub fn complete_by_timer(&mut self) -> Option<Completion> {
        if self.phase != BootPhase::Booting {
            return None;
        }
        self.write_flag();
        self.phase = BootPhase::Revealed;
        log::info!("[boot] sequence complete");
        Some(Completion::AfterFade {
            fade_ms: BOOT_EXIT_FADE_MS,
        })
    }

    /// The exit fade finished.
    pub fn finish(&mut self) {
        self.timers.clear();
        self.fire();
    }

    /// User dismissed the splash. Returns the timer ids the host must cancel,
    /// or `None` when completion already happened.
    pub fn skip(&mut self) -> Option<SmallVec<[i32; 16]>> {
        if self.is_complete() {
            return None;
        }
        self.write_flag();
        self.phase = BootPhase::Revealed;
        log::info!("[boot] skipped");
        let timers = std::mem::take(&mut self.timers);
        self.fire();
        Some(timers)
    }

    fn write_flag(&mut self) {
        if !self.flag_written {
            self.store.set_flag(BOOT_FLAG_KEY, true);
            self.flag_written = true;
        }
    }

    fn fire(&mut self) {
        if let Some(on_complete) = self.on_complete.take() {
            on_complete();
        }
    }
}

/// Named `Collapsed <-> Expanded` toggles.
#[derive(Clone, Debug, Default)]
pub struct PanelSet {
    expanded: FnvHashSet<String>,
}

impl PanelSet {
    pub fn new<'a>(initially_expanded: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            expanded: initially_expanded.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn is_expanded(&self, name: &str) -> bool {
        self.expanded.contains(name)
    }

    /// Flip `name` and return its new state.
    pub fn toggle(&mut self, name: &str) -> bool {
        if self.expanded.remove(name) {
            false
        } else {
            self.expanded.insert(name.to_string());
            true
        }
    }
}

/// Auto-advancing slide index that pauses while hovered.
#[derive(Clone, Debug, PartialEq)]
pub struct Carousel {
    len: usize,
    index: usize,
    direction: i8,
    interval_ms: f32,
    timer_ms: f64,
    hovered: bool,
}

impl Carousel {
    pub fn new(len: usize) -> Self {
        Self::with_interval(len, CAROUSEL_INTERVAL_MS)
    }

    pub fn with_interval(len: usize, interval_ms: f32) -> Self {
        Self {
            len,
            index: 0,
            direction: 0,
            interval_ms: interval_ms.max(1.0),
            timer_ms: 0.0,
            hovered: false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// +1 when the last change moved forward, -1 when backward, 0 initially.
    pub fn direction(&self) -> i8 {
        self.direction
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Run the auto-advance timer. Returns `true` if the slide changed.
    pub fn advance(&mut self, dt_ms: f32) -> bool {
        if self.hovered || self.len < 2 {
            return false;
        }
        self.timer_ms += dt_ms.max(0.0) as f64;
        let interval = self.interval_ms as f64;
        let steps = (self.timer_ms / interval).floor();
        if steps < 1.0 {
            return false;
        }
        self.timer_ms = self.timer_ms.rem_euclid(interval);
        let skip = (steps % self.len as f64) as usize;
        self.index = (self.index + skip) % self.len;
        self.direction = 1;
        true
    }

    /// Hover pauses the timer; leaving restarts a full interval.
    pub fn set_hovered(&mut self, hovered: bool) {
        if self.hovered != hovered {
            self.hovered = hovered;
            self.timer_ms = 0.0;
        }
    }

    /// Jump to `index`. Out-of-range indices are ignored.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        self.direction = if index > self.index { 1 } else { -1 };
        self.index = index;
        true
    }
}
