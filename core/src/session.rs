use core::time::Duration;

use crate::*;

/// Particles per cell of a winning line.
pub const CELL_BURST: usize = 12;
/// Particles thrown from the middle of the board on a win.
pub const BOARD_BURST: usize = 100;
/// Particles scattered over the canvas on a tie.
pub const TIE_BURST: usize = 30;

/// Where on the canvas bursts should originate. `None` scatters the burst.
pub trait BurstAnchors {
    fn board_center(&self) -> Option<Point>;
    fn cell_center(&self, index: CellIndex) -> Option<Point>;
}

/// Scatters every burst.
#[derive(Copy, Clone, Debug, Default)]
pub struct Unanchored;

impl BurstAnchors for Unanchored {
    fn board_center(&self) -> Option<Point> {
        None
    }

    fn cell_center(&self, _index: CellIndex) -> Option<Point> {
        None
    }
}

/// One game table: the rules engine plus the confetti and sound it triggers.
#[derive(Clone, Debug)]
pub struct Session {
    engine: PlayEngine,
    confetti: ConfettiField,
    tones: ToneScheduler,
}

impl Session {
    pub fn new(confetti: ConfettiField) -> Self {
        Self {
            engine: PlayEngine::new(),
            confetti,
            tones: ToneScheduler::new(),
        }
    }

    pub fn engine(&self) -> &PlayEngine {
        &self.engine
    }

    pub fn confetti(&self) -> &ConfettiField {
        &self.confetti
    }

    pub fn confetti_mut(&mut self) -> &mut ConfettiField {
        &mut self.confetti
    }

    pub fn tones(&self) -> &ToneScheduler {
        &self.tones
    }

    pub fn is_muted(&self) -> bool {
        self.tones.is_muted()
    }

    pub fn set_muted(&mut self, muted: bool) {
        log::debug!("muted: {}", muted);
        self.tones.set_muted(muted);
    }

    /// Plays at `index` and fires whatever sound and confetti the move earned.
    pub fn activate(
        &mut self,
        index: usize,
        now: Duration,
        anchors: &impl BurstAnchors,
    ) -> MoveOutcome {
        let outcome = self.engine.apply_move(index);

        if let Some(player) = outcome.mover() {
            self.tones.cue(Cue::Move(player), now);
        }

        match &outcome {
            MoveOutcome::Won { lines, .. } => {
                for index in lines.iter().flatten() {
                    self.confetti
                        .spawn_burst(anchors.cell_center(*index), CELL_BURST);
                }
                self.tones.cue(Cue::Win, now);
                self.confetti
                    .spawn_burst(anchors.board_center(), BOARD_BURST);
            }
            MoveOutcome::Tied(_) => {
                self.confetti.spawn_burst(None, TIE_BURST);
            }
            MoveOutcome::Placed(_) | MoveOutcome::NoChange => {}
        }

        outcome
    }

    pub fn reset_all(&mut self) {
        self.engine.reset_all();
    }

    pub fn restart_round(&mut self) {
        self.engine.restart_round();
    }

    /// Advances the confetti by `dt` frames.
    pub fn frame(&mut self, dt: f32) -> bool {
        self.confetti.tick(dt)
    }

    /// Sends every due tone to `sink`. A failing sink costs only that tone.
    pub fn pump_tones<S: ToneSink>(&mut self, now: Duration, sink: &mut S) {
        for tone in self.tones.drain_due(now) {
            if let Err(err) = sink.play(&tone) {
                log::debug!("tone {:?} not played: {:?}", tone, err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    struct Grid;

    impl BurstAnchors for Grid {
        fn board_center(&self) -> Option<Point> {
            Some((150.0, 150.0))
        }

        fn cell_center(&self, index: CellIndex) -> Option<Point> {
            Some((
                f32::from(index.col()) * 100.0 + 50.0,
                f32::from(index.row()) * 100.0 + 50.0,
            ))
        }
    }

    #[derive(Default)]
    struct Recorder(Vec<Tone>);

    impl ToneSink for Recorder {
        type Error = ();

        fn play(&mut self, tone: &Tone) -> core::result::Result<(), ()> {
            self.0.push(*tone);
            Ok(())
        }
    }

    struct Broken;

    impl ToneSink for Broken {
        type Error = &'static str;

        fn play(&mut self, _tone: &Tone) -> core::result::Result<(), &'static str> {
            Err("no audio device")
        }
    }

    fn session() -> Session {
        Session::new(ConfettiField::new(1, 300.0, 300.0))
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn each_move_cues_its_own_pitch() {
        let mut session = session();
        let mut sink = Recorder::default();

        session.activate(0, ms(0), &Grid);
        session.activate(4, ms(10), &Grid);
        session.pump_tones(ms(10), &mut sink);

        let pitches: Vec<_> = sink.0.iter().map(|t| t.frequency_hz).collect();
        assert_eq!(pitches, [420.0, 320.0]);
        assert!(session.confetti().is_empty());
    }

    #[test]
    fn win_celebrates_on_every_winning_cell_and_the_board() {
        let mut session = session();

        for index in [0, 3, 1, 4] {
            session.activate(index, ms(0), &Grid);
        }
        session.activate(2, ms(0), &Grid);

        let confetti = session.confetti();
        assert_eq!(confetti.len(), 3 * CELL_BURST + BOARD_BURST);
        let at = |point: Point| {
            confetti
                .particles()
                .iter()
                .filter(|p| (p.x, p.y) == point)
                .count()
        };
        assert_eq!(at((50.0, 50.0)), CELL_BURST);
        assert_eq!(at((250.0, 50.0)), CELL_BURST);
        assert_eq!(at((150.0, 150.0)), BOARD_BURST);
        // five move tones plus the three win tones
        assert_eq!(session.tones().pending().len(), 5 + 3);
    }

    #[test]
    fn win_sequence_plays_over_time() {
        let mut session = session();
        let mut sink = Recorder::default();

        for index in [0, 3, 1, 4, 2] {
            session.activate(index, ms(1000), &Grid);
        }
        session.pump_tones(ms(1000), &mut sink);
        assert_eq!(sink.0.len(), 5 + 1);

        session.pump_tones(ms(1260), &mut sink);
        let tail: Vec<_> = sink.0[6..].iter().map(|t| t.frequency_hz).collect();
        assert_eq!(tail, [660.0, 520.0]);
    }

    #[test]
    fn tie_scatters_a_small_burst() {
        let mut session = session();

        for index in [0, 1, 2, 4, 3, 5, 7, 6, 8] {
            session.activate(index, ms(0), &Grid);
        }

        assert_eq!(session.engine().state(), GameState::Tied);
        assert_eq!(session.confetti().len(), TIE_BURST);
        assert!(
            session
                .confetti()
                .particles()
                .iter()
                .all(|p| p.y < 300.0 * 0.3)
        );
    }

    #[test]
    fn ignored_moves_are_silent() {
        let mut session = session();
        session.activate(0, ms(0), &Grid);
        let pending = session.tones().pending().len();

        session.activate(0, ms(0), &Grid);
        session.activate(17, ms(0), &Grid);

        assert_eq!(session.tones().pending().len(), pending);
    }

    #[test]
    fn muting_silences_but_keeps_playing() {
        let mut session = session();
        let mut sink = Recorder::default();
        session.set_muted(true);

        session.activate(4, ms(0), &Grid);
        session.pump_tones(ms(0), &mut sink);

        assert!(sink.0.is_empty());
        assert_eq!(session.engine().board().taken_count(), 1);
    }

    #[test]
    fn broken_audio_is_swallowed() {
        let mut session = session();
        session.activate(4, ms(0), &Unanchored);
        session.pump_tones(ms(0), &mut Broken);
        assert!(session.tones().pending().is_empty());
    }

    #[test]
    fn confetti_outlives_a_reset() {
        let mut session = session();
        for index in [0, 3, 1, 4, 2] {
            session.activate(index, ms(0), &Grid);
        }

        session.reset_all();

        assert!(!session.confetti().is_empty());
        assert!(session.frame(1.0));
        assert_eq!(session.engine().scores(), Scores::default());
    }
}
