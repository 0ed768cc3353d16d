//! Floating preview lifecycle.
//!
//! `FloatingController` is the pure state machine behind the single floating
//! preview surface. It consumes pointer, timer, PIP, and keyboard signals and
//! answers with directives for the shell to execute; it never touches the
//! DOM and never reads a clock. Delays are expressed as `Schedule`
//! directives carrying a generation token, and a fired timer whose token is
//! no longer expected is stale and ignored, so a cancellation that raced the
//! browser's timer queue still cannot act on outdated state.
//!
//! Native PIP is an external signal the controller cannot influence. The
//! bridge owns that truth (`PipWatch`) and passes `pip_active` into every
//! decision that must branch on it.

use crate::channel::ChannelId;
use crate::tuning::{HIDE_DELAY_MS, HOVER_DELAY_MS, PIP_EXIT_GRACE_MS, VIEW_RECORD_DELAY_MS};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloatingTimer {
    Show,
    Hide,
    Record,
    PipExit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FloatingDirective {
    Schedule {
        timer: FloatingTimer,
        token: u64,
        delay_ms: u32,
    },
    Cancel {
        timer: FloatingTimer,
    },
    /// Point the surface at the channel's embed endpoint.
    SetEmbed { channel: ChannelId },
    ClearEmbed,
    /// Position the surface next to the current anchor and show it.
    Reveal,
    /// Keep the surface mounted but invisible and click-through, so a PIP
    /// video backed by its embed keeps playing.
    Conceal,
    /// Fully hide the surface.
    Hide,
    RecordView { channel: ChannelId },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FloatingPhase {
    Idle,
    PendingShow {
        channel: ChannelId,
    },
    Visible {
        channel: ChannelId,
        /// Hover-confirm pending for a different channel while the surface
        /// stays up; resolving it re-targets in place.
        retarget: Option<ChannelId>,
    },
    /// Container concealed while the embed feeds a native PIP video.
    PipSuspended {
        channel: ChannelId,
        rehover: Option<ChannelId>,
    },
}

pub struct FloatingController {
    phase: FloatingPhase,
    over_anchor: bool,
    over_surface: bool,
    next_token: u64,
    show_token: Option<u64>,
    hide_token: Option<u64>,
    record_token: Option<u64>,
    pip_exit_token: Option<u64>,
    record_channel: Option<ChannelId>,
}

impl FloatingController {
    pub fn new() -> Self {
        Self {
            phase: FloatingPhase::Idle,
            over_anchor: false,
            over_surface: false,
            next_token: 1,
            show_token: None,
            hide_token: None,
            record_token: None,
            pip_exit_token: None,
            record_channel: None,
        }
    }

    pub fn phase(&self) -> &FloatingPhase {
        &self.phase
    }

    /// Pointer entered a sidebar hoverable resolving to `channel`.
    pub fn hover_enter(&mut self, channel: ChannelId) -> Vec<FloatingDirective> {
        let mut out = Vec::new();
        self.over_anchor = true;
        self.cancel(FloatingTimer::Hide, &mut out);
        self.cancel(FloatingTimer::Show, &mut out);

        let same_visible = matches!(
            &self.phase,
            FloatingPhase::Visible { channel: current, .. } if *current == channel
        );
        if same_visible {
            // Re-hovering the channel already on screen: nothing to re-arm.
            if let FloatingPhase::Visible { retarget, .. } = &mut self.phase {
                *retarget = None;
            }
            return out;
        }

        match &mut self.phase {
            FloatingPhase::Visible { retarget, .. } => *retarget = Some(channel),
            FloatingPhase::PipSuspended { rehover, .. } => *rehover = Some(channel),
            FloatingPhase::Idle | FloatingPhase::PendingShow { .. } => {
                self.phase = FloatingPhase::PendingShow { channel };
            }
        }
        self.schedule(FloatingTimer::Show, HOVER_DELAY_MS, &mut out);
        out
    }

    /// Pointer left the sidebar hoverable that owned the current hover.
    pub fn hover_leave(&mut self) -> Vec<FloatingDirective> {
        let mut out = Vec::new();
        self.over_anchor = false;
        self.cancel(FloatingTimer::Show, &mut out);
        match &mut self.phase {
            FloatingPhase::PendingShow { .. } => self.phase = FloatingPhase::Idle,
            FloatingPhase::Visible { retarget, .. } => {
                *retarget = None;
                self.schedule(FloatingTimer::Hide, HIDE_DELAY_MS, &mut out);
            }
            FloatingPhase::PipSuspended { rehover, .. } => *rehover = None,
            FloatingPhase::Idle => {}
        }
        out
    }

    /// Pointer moved onto the floating surface itself.
    pub fn surface_enter(&mut self) -> Vec<FloatingDirective> {
        let mut out = Vec::new();
        self.over_surface = true;
        self.cancel(FloatingTimer::Hide, &mut out);
        out
    }

    pub fn surface_leave(&mut self) -> Vec<FloatingDirective> {
        let mut out = Vec::new();
        self.over_surface = false;
        if matches!(
            self.phase,
            FloatingPhase::Visible { .. } | FloatingPhase::PipSuspended { .. }
        ) {
            self.schedule(FloatingTimer::Hide, HIDE_DELAY_MS, &mut out);
        }
        out
    }

    pub fn timer_fired(
        &mut self,
        timer: FloatingTimer,
        token: u64,
        pip_active: bool,
    ) -> Vec<FloatingDirective> {
        if !self.take_token(timer, token) {
            return Vec::new();
        }
        match timer {
            FloatingTimer::Show => self.confirm_show(pip_active),
            FloatingTimer::Hide => self.hide_elapsed(pip_active),
            FloatingTimer::Record => self.record_elapsed(),
            FloatingTimer::PipExit => self.pip_exit_elapsed(),
        }
    }

    /// The embed behind this surface entered native PIP.
    pub fn pip_entered(&mut self) -> Vec<FloatingDirective> {
        let mut out = Vec::new();
        if matches!(self.phase, FloatingPhase::Visible { .. }) {
            self.conceal_visible(&mut out);
        }
        out
    }

    /// The PIP video backed by this surface's embed closed.
    pub fn pip_left(&mut self) -> Vec<FloatingDirective> {
        let mut out = Vec::new();
        if matches!(self.phase, FloatingPhase::PipSuspended { .. }) {
            // Short grace so the container does not flash back mid-transition.
            self.schedule(FloatingTimer::PipExit, PIP_EXIT_GRACE_MS, &mut out);
        }
        out
    }

    /// Escape clears the visual container; a still-active native PIP keeps
    /// playing.
    pub fn escape(&mut self, pip_active: bool) -> Vec<FloatingDirective> {
        let mut out = Vec::new();
        match &self.phase {
            FloatingPhase::Visible { .. } => {
                if pip_active {
                    self.conceal_visible(&mut out);
                } else {
                    self.full_hide(&mut out);
                }
            }
            FloatingPhase::PendingShow { .. } => {
                self.cancel(FloatingTimer::Show, &mut out);
                self.phase = FloatingPhase::Idle;
            }
            FloatingPhase::PipSuspended { .. } => {
                self.cancel(FloatingTimer::Show, &mut out);
                if let FloatingPhase::PipSuspended { rehover, .. } = &mut self.phase {
                    *rehover = None;
                }
                out.push(FloatingDirective::Conceal);
            }
            FloatingPhase::Idle => {}
        }
        out
    }

    /// Page scrolled. Ignored while the pointer is over the surface.
    pub fn scroll(&mut self, pip_active: bool) -> Vec<FloatingDirective> {
        let mut out = Vec::new();
        if self.over_surface {
            return out;
        }
        if matches!(self.phase, FloatingPhase::Visible { .. }) {
            if pip_active {
                self.conceal_visible(&mut out);
            } else {
                self.full_hide(&mut out);
            }
        }
        out
    }

    fn confirm_show(&mut self, pip_active: bool) -> Vec<FloatingDirective> {
        let mut out = Vec::new();
        if !self.over_anchor {
            // Pointer already moved on; the leave raced the timer.
            return out;
        }
        match std::mem::replace(&mut self.phase, FloatingPhase::Idle) {
            FloatingPhase::PendingShow { channel } => {
                self.reveal(channel, pip_active, &mut out);
            }
            FloatingPhase::Visible { channel, retarget } => match retarget {
                Some(next) => self.reveal(next, pip_active, &mut out),
                None => {
                    self.phase = FloatingPhase::Visible {
                        channel,
                        retarget: None,
                    };
                }
            },
            FloatingPhase::PipSuspended { channel, rehover } => match rehover {
                Some(next) => self.reveal(next, pip_active, &mut out),
                None => {
                    self.phase = FloatingPhase::PipSuspended {
                        channel,
                        rehover: None,
                    };
                }
            },
            FloatingPhase::Idle => {}
        }
        out
    }

    fn reveal(&mut self, channel: ChannelId, pip_active: bool, out: &mut Vec<FloatingDirective>) {
        if !pip_active {
            out.push(FloatingDirective::SetEmbed {
                channel: channel.clone(),
            });
            self.record_channel = Some(channel.clone());
            self.schedule(FloatingTimer::Record, VIEW_RECORD_DELAY_MS, out);
        }
        out.push(FloatingDirective::Reveal);
        self.phase = FloatingPhase::Visible {
            channel,
            retarget: None,
        };
    }

    fn hide_elapsed(&mut self, pip_active: bool) -> Vec<FloatingDirective> {
        let mut out = Vec::new();
        if self.over_surface || self.over_anchor {
            return out;
        }
        match &self.phase {
            FloatingPhase::Visible { .. } => {
                if pip_active {
                    self.conceal_visible(&mut out);
                } else {
                    self.full_hide(&mut out);
                }
            }
            FloatingPhase::PipSuspended { .. } => out.push(FloatingDirective::Conceal),
            _ => {}
        }
        out
    }

    fn record_elapsed(&mut self) -> Vec<FloatingDirective> {
        let Some(channel) = self.record_channel.take() else {
            return Vec::new();
        };
        // Valid only if the same channel is still the one on screen.
        match &self.phase {
            FloatingPhase::Visible { channel: current, .. } if *current == channel => {
                vec![FloatingDirective::RecordView { channel }]
            }
            _ => Vec::new(),
        }
    }

    fn pip_exit_elapsed(&mut self) -> Vec<FloatingDirective> {
        let mut out = Vec::new();
        if matches!(self.phase, FloatingPhase::PipSuspended { .. }) {
            self.full_hide(&mut out);
        }
        out
    }

    fn conceal_visible(&mut self, out: &mut Vec<FloatingDirective>) {
        if let FloatingPhase::Visible { channel, .. } = &self.phase {
            let channel = channel.clone();
            self.cancel(FloatingTimer::Show, out);
            self.cancel(FloatingTimer::Hide, out);
            self.phase = FloatingPhase::PipSuspended {
                channel,
                rehover: None,
            };
            out.push(FloatingDirective::Conceal);
        }
    }

    fn full_hide(&mut self, out: &mut Vec<FloatingDirective>) {
        self.cancel(FloatingTimer::Show, out);
        self.cancel(FloatingTimer::Hide, out);
        self.cancel(FloatingTimer::Record, out);
        self.cancel(FloatingTimer::PipExit, out);
        self.record_channel = None;
        self.over_anchor = false;
        self.over_surface = false;
        self.phase = FloatingPhase::Idle;
        out.push(FloatingDirective::Hide);
        out.push(FloatingDirective::ClearEmbed);
    }

    fn schedule(&mut self, timer: FloatingTimer, delay_ms: u32, out: &mut Vec<FloatingDirective>) {
        let token = self.next_token;
        self.next_token += 1;
        *self.token_slot(timer) = Some(token);
        out.push(FloatingDirective::Schedule {
            timer,
            token,
            delay_ms,
        });
    }

    fn cancel(&mut self, timer: FloatingTimer, out: &mut Vec<FloatingDirective>) {
        if self.token_slot(timer).take().is_some() {
            out.push(FloatingDirective::Cancel { timer });
        }
        if timer == FloatingTimer::Record {
            self.record_channel = None;
        }
    }

    fn take_token(&mut self, timer: FloatingTimer, token: u64) -> bool {
        let slot = self.token_slot(timer);
        if *slot == Some(token) {
            *slot = None;
            true
        } else {
            false
        }
    }

    fn token_slot(&mut self, timer: FloatingTimer) -> &mut Option<u64> {
        match timer {
            FloatingTimer::Show => &mut self.show_token,
            FloatingTimer::Hide => &mut self.hide_token,
            FloatingTimer::Record => &mut self.record_token,
            FloatingTimer::PipExit => &mut self.pip_exit_token,
        }
    }
}

impl Default for FloatingController {
    fn default() -> Self {
        Self::new()
    }
}
