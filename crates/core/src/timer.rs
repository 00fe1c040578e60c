use serde::{Deserialize, Serialize};

use crate::model::PomodoroSettings;

//
// ─── PHASES & EVENTS ───────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerPhase {
    Idle,
    Working,
    ShortBreak,
    LongBreak,
}

impl TimerPhase {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            TimerPhase::Idle => "Ready",
            TimerPhase::Working => "Focus",
            TimerPhase::ShortBreak => "Short Break",
            TimerPhase::LongBreak => "Long Break",
        }
    }
}

/// Emitted by [`PomodoroTimer::tick`] when a phase runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    WorkCompleted { cycle: u32 },
    BreakCompleted,
}

//
// ─── TIMER ─────────────────────────────────────────────────────────────────────
//

/// Single-threaded focus/break countdown.
///
/// The caller drives it with one `tick()` per second. Nothing here is
/// persisted; a restart begins again at `Idle`.
#[derive(Debug, Clone)]
pub struct PomodoroTimer {
    settings: PomodoroSettings,
    phase: TimerPhase,
    remaining_secs: u32,
    completed_cycles: u32,
    running: bool,
}

impl PomodoroTimer {
    #[must_use]
    pub fn new(settings: PomodoroSettings) -> Self {
        Self {
            settings,
            phase: TimerPhase::Idle,
            remaining_secs: settings.work_minutes() * 60,
            completed_cycles: 0,
            running: false,
        }
    }

    /// Begins the first work interval, or resumes a paused one.
    pub fn start(&mut self) {
        if self.phase == TimerPhase::Idle {
            self.enter(TimerPhase::Working);
        }
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Advances the countdown by one second.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if !self.running || self.phase == TimerPhase::Idle {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return None;
        }
        match self.phase {
            TimerPhase::Working => {
                self.completed_cycles += 1;
                let next = if self.completed_cycles % self.settings.cycles_before_long_break() == 0
                {
                    TimerPhase::LongBreak
                } else {
                    TimerPhase::ShortBreak
                };
                self.enter(next);
                Some(TimerEvent::WorkCompleted {
                    cycle: self.completed_cycles,
                })
            }
            TimerPhase::ShortBreak | TimerPhase::LongBreak => {
                self.enter(TimerPhase::Working);
                Some(TimerEvent::BreakCompleted)
            }
            TimerPhase::Idle => None,
        }
    }

    /// Ends the current phase early. A skipped work interval is not counted.
    pub fn skip(&mut self) {
        match self.phase {
            TimerPhase::Idle => {}
            TimerPhase::Working => self.enter(TimerPhase::ShortBreak),
            TimerPhase::ShortBreak | TimerPhase::LongBreak => self.enter(TimerPhase::Working),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.settings);
    }

    fn enter(&mut self, phase: TimerPhase) {
        let minutes = match phase {
            TimerPhase::Idle | TimerPhase::Working => self.settings.work_minutes(),
            TimerPhase::ShortBreak => self.settings.short_break_minutes(),
            TimerPhase::LongBreak => self.settings.long_break_minutes(),
        };
        self.phase = phase;
        self.remaining_secs = minutes * 60;
    }

    #[must_use]
    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    #[must_use]
    pub fn completed_cycles(&self) -> u32 {
        self.completed_cycles
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn settings(&self) -> &PomodoroSettings {
        &self.settings
    }

    /// Remaining time as `mm:ss`.
    #[must_use]
    pub fn remaining_label(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.remaining_secs / 60,
            self.remaining_secs % 60
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick() -> PomodoroTimer {
        PomodoroTimer::new(PomodoroSettings::new(1, 1, 2, 2).unwrap())
    }

    fn run(timer: &mut PomodoroTimer, secs: u32) -> Vec<TimerEvent> {
        (0..secs).filter_map(|_| timer.tick()).collect()
    }

    #[test]
    fn idle_timer_ignores_ticks() {
        let mut timer = quick();
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.phase(), TimerPhase::Idle);
        assert_eq!(timer.remaining_label(), "01:00");
    }

    #[test]
    fn work_then_short_then_long_break() {
        let mut timer = quick();
        timer.start();
        assert_eq!(run(&mut timer, 60), vec![TimerEvent::WorkCompleted { cycle: 1 }]);
        assert_eq!(timer.phase(), TimerPhase::ShortBreak);

        assert_eq!(run(&mut timer, 60), vec![TimerEvent::BreakCompleted]);
        assert_eq!(timer.phase(), TimerPhase::Working);

        assert_eq!(run(&mut timer, 60), vec![TimerEvent::WorkCompleted { cycle: 2 }]);
        assert_eq!(timer.phase(), TimerPhase::LongBreak);
        assert_eq!(timer.remaining_secs(), 120);
    }

    #[test]
    fn pause_holds_remaining_time() {
        let mut timer = quick();
        timer.start();
        run(&mut timer, 10);
        timer.pause();
        run(&mut timer, 30);
        assert_eq!(timer.remaining_label(), "00:50");
        timer.start();
        assert_eq!(timer.phase(), TimerPhase::Working);
        timer.tick();
        assert_eq!(timer.remaining_secs(), 49);
    }

    #[test]
    fn skip_does_not_count_cycle() {
        let mut timer = quick();
        timer.start();
        timer.skip();
        assert_eq!(timer.phase(), TimerPhase::ShortBreak);
        assert_eq!(timer.completed_cycles(), 0);
        timer.skip();
        assert_eq!(timer.phase(), TimerPhase::Working);
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut timer = quick();
        timer.start();
        run(&mut timer, 60);
        timer.reset();
        assert_eq!(timer.phase(), TimerPhase::Idle);
        assert_eq!(timer.completed_cycles(), 0);
        assert!(!timer.is_running());
    }
}
