//! Presentational widget state. Nothing here is persisted.

use showcase_core::config::WidgetConfig;
use std::time::Duration;

/// Mobile navigation drawer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavDrawer {
    open: bool,
}

impl NavDrawer {
    /// Flip the drawer; returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// Closing is what a link click, a backdrop click, or Escape does.
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn on_escape(&mut self) {
        if self.open {
            self.close();
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Value for the toggle's `aria-expanded` attribute.
    pub fn aria_expanded(&self) -> &'static str {
        if self.open {
            "true"
        } else {
            "false"
        }
    }
}

/// Header that slides away while scrolling down and returns on scroll up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoHideHeader {
    hide_offset: f64,
    last_offset: f64,
    hidden: bool,
}

impl AutoHideHeader {
    pub fn new(hide_offset: f64) -> Self {
        Self {
            hide_offset,
            last_offset: 0.0,
            hidden: false,
        }
    }

    /// Feed the current scroll offset; returns whether the header is hidden.
    pub fn on_scroll(&mut self, offset: f64) -> bool {
        self.hidden = offset > self.last_offset && offset > self.hide_offset;
        self.last_offset = offset.max(0.0);
        self.hidden
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }
}

/// Linear count-up animation for a metric value.
#[derive(Debug, Clone, PartialEq)]
pub struct CountUp {
    pub target: f64,
    pub decimals: usize,
    pub suffix: String,
    pub duration: Duration,
}

impl CountUp {
    pub fn new(target: f64, decimals: usize, suffix: impl Into<String>, duration: Duration) -> Self {
        Self {
            target,
            decimals,
            suffix: suffix.into(),
            duration,
        }
    }

    /// Progress in `[0, 1]` after `elapsed`.
    pub fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Rendered text after `elapsed`, e.g. `"4.2★"`.
    pub fn text_at(&self, elapsed: Duration) -> String {
        let value = self.target * self.progress(elapsed);
        format!("{:.*}{}", self.decimals, value, self.suffix)
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        self.progress(elapsed) >= 1.0
    }
}

/// Video ad shown once the page loads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdOverlay {
    visible: bool,
    playing: bool,
}

impl AdOverlay {
    pub fn on_load(&mut self) {
        self.visible = true;
        self.playing = true;
    }

    /// Close button or backdrop click: hide and pause.
    pub fn dismiss(&mut self) {
        self.visible = false;
        self.playing = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

/// All presentational widgets for one page.
#[derive(Debug, Clone)]
pub struct PageChrome {
    pub drawer: NavDrawer,
    pub header: AutoHideHeader,
    pub ad: AdOverlay,
    count_up_duration: Duration,
}

impl PageChrome {
    pub fn new(config: &WidgetConfig) -> Self {
        Self {
            drawer: NavDrawer::default(),
            header: AutoHideHeader::new(config.header_hide_offset),
            ad: AdOverlay::default(),
            count_up_duration: Duration::from_millis(config.count_up_ms),
        }
    }

    /// Count-up animation for a metric using the configured duration.
    pub fn count_up(&self, target: f64, decimals: usize, suffix: &str) -> CountUp {
        CountUp::new(target, decimals, suffix, self.count_up_duration)
    }
}
