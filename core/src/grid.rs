//! Inline grid preview slots.
//!
//! One `GridSlot` per content card with a pending or active inline preview.
//! Unlike the floating preview, an inline preview that reached `Active` is
//! sticky: hover-leave only cancels a pending show, and teardown happens on
//! an explicit restore (Escape or the global sweep).

use crate::channel::ChannelId;
use crate::tuning::{EMBED_RETRY_DELAY_MS, HOVER_DELAY_MS, VIEW_RECORD_DELAY_MS};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridTimer {
    Show,
    Reload,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridDirective {
    Schedule {
        timer: GridTimer,
        token: u64,
        delay_ms: u32,
    },
    Cancel {
        timer: GridTimer,
    },
    /// Build the overlay and embed surface inside the card.
    Mount { channel: ChannelId },
    /// Fade the loaded embed in over the loading overlay.
    CrossFade,
    /// Re-point the embed with a fresh cache buster; recovers embeds that
    /// failed to initialize cleanly on first load.
    ReloadEmbed,
    /// Best-effort view record. Deliberately has no token: it outlives even
    /// a restore of the slot.
    ScheduleRecord { channel: ChannelId, delay_ms: u32 },
    /// Tear the surface down and put the card back as it was.
    Restore,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridPhase {
    Idle,
    PendingShow,
    Active,
}

pub struct GridSlot {
    channel: ChannelId,
    phase: GridPhase,
    next_token: u64,
    show_token: Option<u64>,
    reload_token: Option<u64>,
}

impl GridSlot {
    pub fn new(channel: ChannelId) -> Self {
        Self {
            channel,
            phase: GridPhase::Idle,
            next_token: 1,
            show_token: None,
            reload_token: None,
        }
    }

    pub fn phase(&self) -> GridPhase {
        self.phase
    }

    pub fn channel(&self) -> &ChannelId {
        &self.channel
    }

    pub fn hover_enter(&mut self) -> Vec<GridDirective> {
        let mut out = Vec::new();
        match self.phase {
            GridPhase::Active => {
                // Already showing; never mount a second surface.
                self.cancel(GridTimer::Show, &mut out);
            }
            GridPhase::Idle | GridPhase::PendingShow => {
                self.cancel(GridTimer::Show, &mut out);
                self.phase = GridPhase::PendingShow;
                self.schedule(GridTimer::Show, HOVER_DELAY_MS, &mut out);
            }
        }
        out
    }

    /// Cancels only a pending show; an active preview stays up.
    pub fn hover_leave(&mut self) -> Vec<GridDirective> {
        let mut out = Vec::new();
        if self.phase == GridPhase::PendingShow {
            self.cancel(GridTimer::Show, &mut out);
            self.phase = GridPhase::Idle;
        }
        out
    }

    pub fn timer_fired(&mut self, timer: GridTimer, token: u64) -> Vec<GridDirective> {
        if !self.take_token(timer, token) {
            return Vec::new();
        }
        match timer {
            GridTimer::Show => self.confirm_show(),
            GridTimer::Reload => {
                if self.phase == GridPhase::Active {
                    vec![GridDirective::ReloadEmbed]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// The embed surface finished its initial load.
    pub fn surface_loaded(&mut self) -> Vec<GridDirective> {
        if self.phase == GridPhase::Active {
            vec![GridDirective::CrossFade]
        } else {
            Vec::new()
        }
    }

    /// Idempotent teardown; safe on a slot that never reached `Active`.
    pub fn restore(&mut self) -> Vec<GridDirective> {
        let mut out = Vec::new();
        self.cancel(GridTimer::Show, &mut out);
        self.cancel(GridTimer::Reload, &mut out);
        self.phase = GridPhase::Idle;
        out.push(GridDirective::Restore);
        out
    }

    fn confirm_show(&mut self) -> Vec<GridDirective> {
        if self.phase != GridPhase::PendingShow {
            return Vec::new();
        }
        self.phase = GridPhase::Active;
        let mut out = vec![GridDirective::Mount {
            channel: self.channel.clone(),
        }];
        self.schedule(GridTimer::Reload, EMBED_RETRY_DELAY_MS, &mut out);
        out.push(GridDirective::ScheduleRecord {
            channel: self.channel.clone(),
            delay_ms: VIEW_RECORD_DELAY_MS,
        });
        out
    }

    fn schedule(&mut self, timer: GridTimer, delay_ms: u32, out: &mut Vec<GridDirective>) {
        let token = self.next_token;
        self.next_token += 1;
        *self.token_slot(timer) = Some(token);
        out.push(GridDirective::Schedule {
            timer,
            token,
            delay_ms,
        });
    }

    fn cancel(&mut self, timer: GridTimer, out: &mut Vec<GridDirective>) {
        if self.token_slot(timer).take().is_some() {
            out.push(GridDirective::Cancel { timer });
        }
    }

    fn take_token(&mut self, timer: GridTimer, token: u64) -> bool {
        let slot = self.token_slot(timer);
        if *slot == Some(token) {
            *slot = None;
            true
        } else {
            false
        }
    }

    fn token_slot(&mut self, timer: GridTimer) -> &mut Option<u64> {
        match timer {
            GridTimer::Show => &mut self.show_token,
            GridTimer::Reload => &mut self.reload_token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot() -> GridSlot {
        GridSlot::new(ChannelId::new("foo").unwrap())
    }

    fn show_token(directives: &[GridDirective]) -> Option<u64> {
        directives.iter().find_map(|d| match d {
            GridDirective::Schedule {
                timer: GridTimer::Show,
                token,
                ..
            } => Some(*token),
            _ => None,
        })
    }

    #[test]
    fn leave_before_confirm_cancels() {
        let mut slot = slot();
        let out = slot.hover_enter();
        let token = show_token(&out).unwrap();
        let _ = slot.hover_leave();
        assert!(slot.timer_fired(GridTimer::Show, token).is_empty());
        assert_eq!(slot.phase(), GridPhase::Idle);
    }

    #[test]
    fn active_slot_never_mounts_twice() {
        let mut slot = slot();
        let out = slot.hover_enter();
        let token = show_token(&out).unwrap();
        let out = slot.timer_fired(GridTimer::Show, token);
        assert!(matches!(out[0], GridDirective::Mount { .. }));

        let out = slot.hover_enter();
        assert!(show_token(&out).is_none());
        assert!(!out.iter().any(|d| matches!(d, GridDirective::Mount { .. })));
    }

    #[test]
    fn leave_does_not_tear_down_an_active_preview() {
        let mut slot = slot();
        let out = slot.hover_enter();
        let token = show_token(&out).unwrap();
        let _ = slot.timer_fired(GridTimer::Show, token);
        assert!(slot.hover_leave().is_empty());
        assert_eq!(slot.phase(), GridPhase::Active);
    }

    #[test]
    fn confirm_schedules_reload_and_record() {
        let mut slot = slot();
        let out = slot.hover_enter();
        let token = show_token(&out).unwrap();
        let out = slot.timer_fired(GridTimer::Show, token);
        assert!(out.iter().any(|d| matches!(
            d,
            GridDirective::Schedule {
                timer: GridTimer::Reload,
                delay_ms: EMBED_RETRY_DELAY_MS,
                ..
            }
        )));
        assert!(out.iter().any(|d| matches!(
            d,
            GridDirective::ScheduleRecord {
                delay_ms: VIEW_RECORD_DELAY_MS,
                ..
            }
        )));
    }

    #[test]
    fn restore_is_idempotent_and_kills_the_reload() {
        let mut slot = slot();
        let out = slot.hover_enter();
        let token = show_token(&out).unwrap();
        let out = slot.timer_fired(GridTimer::Show, token);
        let reload_token = out.iter().find_map(|d| match d {
            GridDirective::Schedule {
                timer: GridTimer::Reload,
                token,
                ..
            } => Some(*token),
            _ => None,
        });

        let out = slot.restore();
        assert!(out.contains(&GridDirective::Restore));
        assert_eq!(slot.phase(), GridPhase::Idle);
        assert!(slot
            .timer_fired(GridTimer::Reload, reload_token.unwrap())
            .is_empty());

        let out = slot.restore();
        assert_eq!(out, vec![GridDirective::Restore]);
    }
}
