use crate::combat::CombatModel;
use crate::corpus::{CharStream, CorpusError};
use crate::input::{InputOutcome, InputProcessor};
use crate::motion::{MotionEngine, ProjectileParams, Vec2};
use crate::stats::StatsTracker;

/// Logical battlefield geometry; the renderer scales these to the terminal.
pub const CANVAS_WIDTH: f64 = 520.0;
pub const CANVAS_HEIGHT: f64 = 220.0;
pub const PLAYER_ANCHOR: Vec2 = Vec2 { x: 90.0, y: 170.0 };
pub const BOSS_ANCHOR: Vec2 = Vec2 { x: 440.0, y: 90.0 };

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum SessionPhase {
    Idle,
    Running,
    Victory,
    Defeat,
}

impl SessionPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionPhase::Victory | SessionPhase::Defeat)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// When false the battle cannot be lost: wrong input still counts
    /// against accuracy but no player health pool exists.
    pub player_health_enabled: bool,
    /// Fixed seed for reproducible animation; `None` seeds from entropy.
    pub motion_seed: Option<u64>,
    pub projectile: ProjectileParams,
    pub jitter_radius: f64,
    pub jitter_alpha: f64,
    pub jitter_retarget_secs: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            player_health_enabled: true,
            motion_seed: None,
            projectile: ProjectileParams::default(),
            jitter_radius: 3.0,
            jitter_alpha: 0.8,
            jitter_retarget_secs: 0.25,
        }
    }
}

/// Current-line view for the renderer: `column` chars of `text` are typed,
/// the char at `column` is the cursor, the rest is pending.
#[derive(Debug, Clone, PartialEq)]
pub struct LineView {
    pub line_index: usize,
    pub text: String,
    pub column: usize,
    pub line_len: usize,
}

/// Everything the renderer needs for one frame; the renderer holds no
/// engine state of its own.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub boss_health: f64,
    pub remaining_hits: usize,
    pub total_chars: usize,
    pub current_index: usize,
    pub player_health: Option<u32>,
    pub accuracy: f64,
    pub error_rate: f64,
    pub chars_per_min: f64,
    pub elapsed_secs: f64,
    pub line: Option<LineView>,
    /// Active line-bridge effect as `(from_line, to_line, progress)`.
    pub transition: Option<(usize, usize, f64)>,
    pub last_wrong: Option<(char, char)>,
    pub player_pos: Vec2,
    pub boss_pos: Vec2,
    pub projectiles: Vec<Vec2>,
    pub boss_flash: bool,
    pub player_flash: bool,
}

/// The one mutable object of the game: wires keystrokes through input
/// validation, combat, stats, and motion, and hands frames to the renderer.
#[derive(Debug)]
pub struct Session {
    stream: CharStream,
    input: InputProcessor,
    combat: CombatModel,
    stats: StatsTracker,
    motion: MotionEngine,
    phase: SessionPhase,
    last_wrong: Option<(char, char)>,
}

impl Session {
    /// Fails on a corpus with no typable characters; the damage unit would
    /// be undefined and the battle already over.
    pub fn new<S: AsRef<str>>(lines: &[S], config: SessionConfig) -> Result<Self, CorpusError> {
        let stream = CharStream::build(lines);
        if stream.is_empty() {
            return Err(CorpusError::Empty);
        }

        let combat = CombatModel::new(stream.total_chars(), config.player_health_enabled);
        let motion = MotionEngine::new(
            config.projectile,
            config.jitter_radius,
            config.jitter_alpha,
            config.jitter_retarget_secs,
            config.motion_seed,
        );

        Ok(Self {
            stream,
            input: InputProcessor::new(),
            combat,
            stats: StatsTracker::new(),
            motion,
            phase: SessionPhase::Idle,
            last_wrong: None,
        })
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn stream(&self) -> &CharStream {
        &self.stream
    }

    pub fn current_index(&self) -> usize {
        self.input.current_index()
    }

    pub fn start(&mut self) {
        if self.phase == SessionPhase::Idle {
            self.phase = SessionPhase::Running;
        }
    }

    /// Back to a fresh battle. Valid from any phase, including both
    /// terminal ones; the clock restarts immediately.
    pub fn reset(&mut self) {
        self.input.reset();
        self.combat.reset();
        self.stats.reset();
        self.motion.cancel_all();
        self.last_wrong = None;
        self.phase = SessionPhase::Running;
    }

    /// Processes an ordered batch of characters left-to-right, each one
    /// fully resolved before the next; stops as soon as the battle ends.
    pub fn handle_input(&mut self, text: &str) -> SessionSnapshot {
        for c in text.chars() {
            self.handle_char(c);
            if self.phase.is_terminal() {
                break;
            }
        }
        self.snapshot()
    }

    pub fn handle_char(&mut self, c: char) {
        // First keystroke starts the battle.
        if self.phase == SessionPhase::Idle {
            self.start();
        }
        if self.phase != SessionPhase::Running {
            return;
        }

        match self.input.process(c, &self.stream) {
            InputOutcome::Ignored => {}
            InputOutcome::Correct { index } => self.on_correct(index),
            InputOutcome::Wrong { typed, expected } => self.on_wrong(typed, expected),
        }
    }

    fn on_correct(&mut self, index: usize) {
        let cleared = self
            .stream
            .line_of(index)
            .map(|pos| (pos.line, pos.column, pos.line_len));

        self.combat.apply_correct_hit(self.input.current_index());
        self.stats.record_correct();
        self.last_wrong = None;
        self.motion.launch(PLAYER_ANCHOR, BOSS_ANCHOR);

        if let Some((line, column, line_len)) = cleared {
            if column + 1 == line_len {
                // Empty lines hold no characters, so the next character may
                // live several lines down; bridge straight to its line.
                if let Some(next) = self.stream.line_of(self.input.current_index()) {
                    self.motion.begin_transition(line, next.line);
                }
            }
        }

        if self.input.current_index() == self.stream.total_chars() {
            self.finish(SessionPhase::Victory);
        }
    }

    fn on_wrong(&mut self, typed: char, expected: char) {
        self.combat.apply_wrong_hit();
        self.stats.record_wrong();
        self.last_wrong = Some((typed, expected));
        self.motion.flash_player();

        if self.combat.player_defeated() {
            self.finish(SessionPhase::Defeat);
        }
    }

    fn finish(&mut self, phase: SessionPhase) {
        self.phase = phase;
        self.motion.cancel_all();
    }

    /// One fast timer tick. Animation and the clock only advance while the
    /// battle runs; terminal phases freeze everything.
    pub fn tick(&mut self, dt_secs: f64) -> SessionSnapshot {
        if self.phase == SessionPhase::Running {
            self.stats.advance(dt_secs);
            self.motion.tick(dt_secs);
        }
        self.snapshot()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let current_index = self.input.current_index();
        let line = self.stream.line_of(current_index).map(|pos| LineView {
            line_index: pos.line,
            text: self.stream.line(pos.line).unwrap_or_default().to_owned(),
            column: pos.column,
            line_len: pos.line_len,
        });

        SessionSnapshot {
            phase: self.phase,
            boss_health: self.combat.boss_health(),
            remaining_hits: self.stream.total_chars() - current_index,
            total_chars: self.stream.total_chars(),
            current_index,
            player_health: self.combat.player_health(),
            accuracy: self.stats.accuracy(),
            error_rate: self.stats.error_rate(),
            chars_per_min: self.stats.chars_per_min(),
            elapsed_secs: self.stats.elapsed_secs(),
            line,
            transition: self
                .motion
                .transition()
                .map(|t| (t.from_line, t.to_line, t.progress())),
            last_wrong: self.last_wrong,
            player_pos: PLAYER_ANCHOR.add(self.motion.player_offset()),
            boss_pos: BOSS_ANCHOR.add(self.motion.boss_offset()),
            projectiles: self.motion.projectile_positions(),
            boss_flash: self.motion.boss_flash.active(),
            player_flash: self.motion.player_flash.active(),
        }
    }
}
