use alloc::vec::Vec;
use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::Player;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Waveform {
    Sine,
    Sawtooth,
    Triangle,
}

/// A single decaying beep.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    pub frequency_hz: f32,
    pub duration: Duration,
    pub waveform: Waveform,
}

impl Tone {
    pub const START_GAIN: f32 = 0.03;
    pub const END_GAIN: f32 = 0.0001;
    /// Extra time the oscillator keeps running after the ramp ends.
    pub const STOP_PADDING: Duration = Duration::from_millis(20);

    pub const fn new(frequency_hz: f32, duration: Duration, waveform: Waveform) -> Self {
        Self {
            frequency_hz,
            duration,
            waveform,
        }
    }

    /// Total time from start until the oscillator is stopped.
    pub fn lifetime(&self) -> Duration {
        self.duration + Self::STOP_PADDING
    }
}

/// Something worth a sound.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cue {
    Move(Player),
    Win,
}

const MOVE_LENGTH: Duration = Duration::from_millis(60);
const WIN_LENGTH: Duration = Duration::from_millis(120);

const MOVE_X: [(Duration, Tone); 1] = [(
    Duration::ZERO,
    Tone::new(420.0, MOVE_LENGTH, Waveform::Sine),
)];
const MOVE_O: [(Duration, Tone); 1] = [(
    Duration::ZERO,
    Tone::new(320.0, MOVE_LENGTH, Waveform::Sine),
)];
const WIN: [(Duration, Tone); 3] = [
    (Duration::ZERO, Tone::new(880.0, WIN_LENGTH, Waveform::Sine)),
    (
        Duration::from_millis(120),
        Tone::new(660.0, WIN_LENGTH, Waveform::Sawtooth),
    ),
    (
        Duration::from_millis(260),
        Tone::new(520.0, WIN_LENGTH, Waveform::Triangle),
    ),
];

impl Cue {
    /// Tones making up the cue, as offsets from the moment it is cued.
    pub fn tones(self) -> impl Iterator<Item = (Duration, Tone)> {
        let tones: &'static [(Duration, Tone)] = match self {
            Cue::Move(Player::X) => &MOVE_X,
            Cue::Move(Player::O) => &MOVE_O,
            Cue::Win => &WIN,
        };
        tones.iter().copied()
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScheduledTone {
    pub due: Duration,
    pub tone: Tone,
}

/// Deferred tones keyed by a caller-supplied clock.
///
/// Nothing is ever cancelled: every cued tone eventually comes due, and whether it
/// sounds is decided by the mute flag at that moment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ToneScheduler {
    pending: Vec<ScheduledTone>,
    muted: bool,
}

impl ToneScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn pending(&self) -> &[ScheduledTone] {
        &self.pending
    }

    pub fn cue(&mut self, cue: Cue, now: Duration) {
        for (offset, tone) in cue.tones() {
            let due = now + offset;
            // keep `pending` sorted by due time, ties in cue order
            let at = self.pending.partition_point(|scheduled| scheduled.due <= due);
            self.pending.insert(at, ScheduledTone { due, tone });
        }
        log::trace!("cued {:?}, {} tone(s) pending", cue, self.pending.len());
    }

    /// Removes every tone due at `now` and returns those that should sound.
    pub fn drain_due(&mut self, now: Duration) -> Vec<Tone> {
        let ready = self.pending.partition_point(|scheduled| scheduled.due <= now);
        let due = self.pending.drain(..ready);
        if self.muted {
            if ready > 0 {
                log::trace!("muted, dropping {} tone(s)", ready);
            }
            Vec::new()
        } else {
            due.map(|scheduled| scheduled.tone).collect()
        }
    }
}

/// Output device for tones.
pub trait ToneSink {
    type Error: core::fmt::Debug;

    fn play(&mut self, tone: &Tone) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn move_pitch_depends_on_player() {
        let x: Vec<_> = Cue::Move(Player::X).tones().collect();
        let o: Vec<_> = Cue::Move(Player::O).tones().collect();

        assert_eq!(x.len(), 1);
        assert_eq!(x[0].1.frequency_hz, 420.0);
        assert_eq!(o[0].1.frequency_hz, 320.0);
        assert_eq!(x[0].1.duration, ms(60));
    }

    #[test]
    fn win_is_three_descending_tones() {
        let win: Vec<_> = Cue::Win.tones().collect();

        let offsets: Vec<_> = win.iter().map(|(offset, _)| *offset).collect();
        assert_eq!(offsets, [ms(0), ms(120), ms(260)]);
        assert!(win.windows(2).all(|w| w[0].1.frequency_hz > w[1].1.frequency_hz));
        let waveforms: Vec<_> = win.iter().map(|(_, tone)| tone.waveform).collect();
        assert_eq!(
            waveforms,
            [Waveform::Sine, Waveform::Sawtooth, Waveform::Triangle]
        );
    }

    #[test]
    fn drain_releases_tones_as_they_come_due() {
        let mut scheduler = ToneScheduler::new();
        scheduler.cue(Cue::Win, ms(1000));

        assert_eq!(scheduler.drain_due(ms(1000)).len(), 1);
        assert!(scheduler.drain_due(ms(1119)).is_empty());
        assert_eq!(scheduler.drain_due(ms(1120))[0].frequency_hz, 660.0);
        assert_eq!(scheduler.drain_due(ms(5000))[0].frequency_hz, 520.0);
        assert!(scheduler.pending().is_empty());
    }

    #[test]
    fn late_drain_returns_tones_in_due_order() {
        let mut scheduler = ToneScheduler::new();
        scheduler.cue(Cue::Win, ms(0));
        scheduler.cue(Cue::Move(Player::O), ms(100));

        let frequencies: Vec<_> = scheduler
            .drain_due(ms(300))
            .iter()
            .map(|tone| tone.frequency_hz)
            .collect();
        assert_eq!(frequencies, [880.0, 320.0, 660.0, 520.0]);
    }

    #[test]
    fn muting_mid_sequence_only_silences_later_tones() {
        let mut scheduler = ToneScheduler::new();
        scheduler.cue(Cue::Win, ms(0));

        assert_eq!(scheduler.drain_due(ms(0)).len(), 1);
        scheduler.set_muted(true);
        assert!(scheduler.drain_due(ms(130)).is_empty());
        scheduler.set_muted(false);
        assert_eq!(scheduler.drain_due(ms(300)).len(), 1);
        assert!(scheduler.pending().is_empty());
    }

    #[test]
    fn oscillator_outlives_the_ramp() {
        let tone = Tone::new(440.0, ms(100), Waveform::Sine);
        assert_eq!(tone.lifetime(), ms(120));
        assert!(Tone::END_GAIN < Tone::START_GAIN);
    }
}
