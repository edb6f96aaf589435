//! Show/hide state machine for the drop-down panel.
//!
//! ```text
//!            toggle                update (offset = height)
//!   Hidden ─────────▶ Showing ─────────────────────────▶ Shown
//!     ▲                                                   │
//!     │ update (offset = 0)                toggle / close │
//!     └──────────────── Hiding ◀──────────────────────────┘
//! ```
//!
//! A transition in flight cannot be interrupted.

/// Visibility state of the console panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisibilityState {
    #[default]
    Hidden,
    Showing,
    Shown,
    Hiding,
}

/// A transition started by [`PanelVisibility::toggle`] or
/// [`PanelVisibility::close`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The panel started sliding open. Gameplay should pause and the mouse be
    /// released.
    Opening,
    /// The panel started sliding closed. Gameplay resumes and the mouse is
    /// recaptured.
    Closing,
}

/// Animated visibility of the console panel.
#[derive(Debug, Clone)]
pub struct PanelVisibility {
    state: VisibilityState,
    offset: f32,
    height: f32,
    speed: f32,
}

impl PanelVisibility {
    /// Create a hidden panel of `height` that slides at `speed` units per
    /// second. A `speed` that is not positive makes every slide finish on the
    /// next update.
    pub fn new(height: f32, speed: f32) -> Self {
        Self {
            state: VisibilityState::Hidden,
            offset: 0.0,
            height: height.max(0.0),
            speed,
        }
    }

    #[inline]
    pub fn state(&self) -> VisibilityState {
        self.state
    }

    /// How far the panel has slid down, in `[0, height]`.
    #[inline]
    pub fn panel_offset(&self) -> f32 {
        self.offset
    }

    #[inline]
    pub fn panel_height(&self) -> f32 {
        self.height
    }

    /// Fraction of the panel visible, in `[0, 1]`.
    pub fn openness(&self) -> f32 {
        if self.height > 0.0 {
            self.offset / self.height
        } else if matches!(self.state, VisibilityState::Shown) {
            1.0
        } else {
            0.0
        }
    }

    /// Keystrokes belong to the console only once fully open.
    #[inline]
    pub fn accepts_input(&self) -> bool {
        self.state == VisibilityState::Shown
    }

    /// Gameplay is paused from the moment the panel starts opening until it
    /// starts closing.
    #[inline]
    pub fn gameplay_paused(&self) -> bool {
        matches!(self.state, VisibilityState::Showing | VisibilityState::Shown)
    }

    /// Start opening from `Hidden` or closing from `Shown`. Ignored mid-slide.
    pub fn toggle(&mut self) -> Option<Transition> {
        match self.state {
            VisibilityState::Hidden => {
                self.state = VisibilityState::Showing;
                Some(Transition::Opening)
            }
            VisibilityState::Shown => self.close(),
            VisibilityState::Showing | VisibilityState::Hiding => None,
        }
    }

    /// Start closing if fully shown.
    pub fn close(&mut self) -> Option<Transition> {
        if self.state != VisibilityState::Shown {
            return None;
        }
        self.state = VisibilityState::Hiding;
        Some(Transition::Closing)
    }

    /// Advance the slide animation by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        let step = if self.speed > 0.0 {
            self.speed * dt.max(0.0)
        } else {
            f32::INFINITY
        };
        match self.state {
            VisibilityState::Showing => {
                self.offset = (self.offset + step).min(self.height);
                if self.offset >= self.height {
                    self.state = VisibilityState::Shown;
                }
            }
            VisibilityState::Hiding => {
                self.offset = (self.offset - step).max(0.0);
                if self.offset <= 0.0 {
                    self.state = VisibilityState::Hidden;
                }
            }
            VisibilityState::Hidden | VisibilityState::Shown => {}
        }
    }
}
