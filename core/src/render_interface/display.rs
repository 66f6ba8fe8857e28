use crate::render_interface::frame::FrameReport;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_TITLE: &str =
    "Computer Vision Expert | Transforming Pixels into Actionable Insights";

/// One-directional sink for per-tick frame output.
pub trait DisplayAdapter {
    fn present(&mut self, frame: &FrameReport);
}

pub fn counter_label(count: u64) -> String {
    format!("SHIPS DETECTED: {}", count)
}

/// Page colour scheme; only affects overlay colours.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn counter_color(&self) -> &'static str {
        match self {
            Theme::Dark => "#00d4e0",
            Theme::Light => "#00a4b0",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// Keeps the counter text and colour the overlay should currently show.
#[derive(Debug, Clone)]
pub struct CounterOverlay {
    theme: Theme,
    text: String,
    frames: u64,
}

impl CounterOverlay {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            text: counter_label(0),
            frames: 0,
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn color(&self) -> &'static str {
        self.theme.counter_color()
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames
    }
}

impl Default for CounterOverlay {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

impl DisplayAdapter for CounterOverlay {
    fn present(&mut self, frame: &FrameReport) {
        self.text.clear();
        self.text.push_str(&frame.label);
        self.frames += 1;
    }
}

/// Title text revealed one character per interval, sampled by elapsed time.
#[derive(Debug, Clone)]
pub struct Typewriter {
    text: String,
    char_interval: Duration,
}

/// What the title overlay shows at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypewriterFrame<'a> {
    pub visible: &'a str,
    pub cursor: bool,
}

impl Typewriter {
    pub fn new(text: impl Into<String>, char_interval: Duration) -> Self {
        Self {
            text: text.into(),
            char_interval,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// While typing, the prefix of `elapsed / interval` characters plus a
    /// cursor; afterwards the whole text without one.
    pub fn sample(&self, elapsed: Duration) -> TypewriterFrame<'_> {
        let interval = self.char_interval.as_millis().max(1);
        let typed = usize::try_from(elapsed.as_millis() / interval).unwrap_or(usize::MAX);
        let length = self.text.chars().count();

        if typed > length {
            return TypewriterFrame {
                visible: &self.text,
                cursor: false,
            };
        }

        let end = self
            .text
            .char_indices()
            .nth(typed)
            .map(|(index, _)| index)
            .unwrap_or(self.text.len());
        TypewriterFrame {
            visible: &self.text[..end],
            cursor: true,
        }
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        !self.sample(elapsed).cursor
    }
}

impl Default for Typewriter {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE, Duration::from_millis(100))
    }
}
