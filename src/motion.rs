use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 2D point/offset in logical canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x + other.x, self.y + other.y)
    }

    pub fn scale(self, k: f64) -> Vec2 {
        Vec2::new(self.x * k, self.y * k)
    }

    fn lerp(self, other: Vec2, t: f64) -> Vec2 {
        Vec2::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

/// Tuning knobs for projectile flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileParams {
    /// Animation steps from launch to arrival, one per fast tick.
    pub steps: u32,
    /// Easing exponent applied to linear progress; > 1 accelerates
    /// toward the target.
    pub easing: f64,
    /// Maximum per-axis offset of the two Bézier control points from the
    /// straight flight line; 0 gives a straight shot.
    pub arc_radius: f64,
}

impl Default for ProjectileParams {
    fn default() -> Self {
        Self {
            steps: 20,
            easing: 2.0,
            arc_radius: 40.0,
        }
    }
}

/// One missile in flight along a cubic Bézier arc.
#[derive(Debug, Clone)]
pub struct Projectile {
    start: Vec2,
    ctrl1: Vec2,
    ctrl2: Vec2,
    target: Vec2,
    steps: u32,
    step: u32,
    easing: f64,
}

impl Projectile {
    fn new(start: Vec2, target: Vec2, params: ProjectileParams, rng: &mut StdRng) -> Self {
        let r = params.arc_radius;
        let ctrl1 = start
            .lerp(target, 1.0 / 3.0)
            .add(Vec2::new(rng.gen_range(-r..=r), rng.gen_range(-r..=r)));
        let ctrl2 = start
            .lerp(target, 2.0 / 3.0)
            .add(Vec2::new(rng.gen_range(-r..=r), rng.gen_range(-r..=r)));

        Self {
            start,
            ctrl1,
            ctrl2,
            target,
            steps: params.steps.max(1),
            step: 0,
            easing: params.easing,
        }
    }

    /// Position at eased progress for the current step.
    pub fn position(&self) -> Vec2 {
        let t = self.step as f64 / self.steps as f64;
        self.at(t.powf(self.easing))
    }

    pub fn finished(&self) -> bool {
        self.step >= self.steps
    }

    /// Advances one step; returns false once the flight is over.
    fn update(&mut self) -> bool {
        if self.step < self.steps {
            self.step += 1;
        }
        !self.finished()
    }

    fn at(&self, t: f64) -> Vec2 {
        let u = 1.0 - t;
        self.start
            .scale(u * u * u)
            .add(self.ctrl1.scale(3.0 * u * u * t))
            .add(self.ctrl2.scale(3.0 * u * t * t))
            .add(self.target.scale(t * t * t))
    }
}

/// Smoothed random wobble applied to an otherwise static entity.
///
/// The displayed offset is pulled toward a periodically resampled target:
/// `offset <- offset * alpha + target * (1 - alpha)`. Targets are sampled
/// per axis in `[-radius, radius]`, and the smoothing is a convex
/// combination, so the offset never leaves that box no matter how long the
/// session runs.
#[derive(Debug, Clone)]
pub struct IdleJitter {
    offset: Vec2,
    target: Vec2,
    radius: f64,
    alpha: f64,
}

impl IdleJitter {
    fn new(radius: f64, alpha: f64) -> Self {
        Self {
            offset: Vec2::default(),
            target: Vec2::default(),
            radius,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    fn retarget(&mut self, rng: &mut StdRng) {
        let r = self.radius;
        self.target = Vec2::new(rng.gen_range(-r..=r), rng.gen_range(-r..=r));
    }

    fn update(&mut self) {
        self.offset = self
            .offset
            .scale(self.alpha)
            .add(self.target.scale(1.0 - self.alpha));
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }
}

/// Cosmetic bridge between a completed line and the next one.
#[derive(Debug, Clone)]
pub struct LineTransition {
    pub from_line: usize,
    pub to_line: usize,
    steps: u32,
    step: u32,
}

impl LineTransition {
    fn new(from_line: usize, to_line: usize, steps: u32) -> Self {
        Self {
            from_line,
            to_line,
            steps: steps.max(1),
            step: 0,
        }
    }

    pub fn progress(&self) -> f64 {
        self.step as f64 / self.steps as f64
    }

    fn update(&mut self) -> bool {
        self.step += 1;
        self.step < self.steps
    }
}

/// Short highlight countdown after a hit lands.
#[derive(Debug, Clone, Copy, Default)]
pub struct HitFlash {
    ticks_left: u32,
}

impl HitFlash {
    pub fn trigger(&mut self, ticks: u32) {
        self.ticks_left = ticks;
    }

    pub fn active(&self) -> bool {
        self.ticks_left > 0
    }

    fn update(&mut self) {
        self.ticks_left = self.ticks_left.saturating_sub(1);
    }
}

const FLASH_TICKS: u32 = 6;
const TRANSITION_STEPS: u32 = 10;

/// Time-parametric animation state for the battlefield.
///
/// Runs on the fast tick cadence; the slower jitter-retarget period is
/// derived internally by accumulating tick deltas. The RNG is injected and
/// seedable so every flight path and wobble is reproducible in tests.
#[derive(Debug)]
pub struct MotionEngine {
    rng: StdRng,
    params: ProjectileParams,
    projectiles: Vec<Projectile>,
    player_jitter: IdleJitter,
    boss_jitter: IdleJitter,
    transition: Option<LineTransition>,
    pub boss_flash: HitFlash,
    pub player_flash: HitFlash,
    retarget_period: f64,
    retarget_accum: f64,
}

impl MotionEngine {
    pub fn new(
        params: ProjectileParams,
        jitter_radius: f64,
        jitter_alpha: f64,
        retarget_period: f64,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            params,
            projectiles: Vec::new(),
            player_jitter: IdleJitter::new(jitter_radius, jitter_alpha),
            boss_jitter: IdleJitter::new(jitter_radius, jitter_alpha),
            transition: None,
            boss_flash: HitFlash::default(),
            player_flash: HitFlash::default(),
            retarget_period,
            retarget_accum: 0.0,
        }
    }

    pub fn launch(&mut self, start: Vec2, target: Vec2) {
        let projectile = Projectile::new(start, target, self.params, &mut self.rng);
        self.projectiles.push(projectile);
    }

    pub fn begin_transition(&mut self, from_line: usize, to_line: usize) {
        self.transition = Some(LineTransition::new(from_line, to_line, TRANSITION_STEPS));
    }

    pub fn flash_player(&mut self) {
        self.player_flash.trigger(FLASH_TICKS);
    }

    pub fn projectile_positions(&self) -> Vec<Vec2> {
        self.projectiles.iter().map(Projectile::position).collect()
    }

    pub fn player_offset(&self) -> Vec2 {
        self.player_jitter.offset()
    }

    pub fn boss_offset(&self) -> Vec2 {
        self.boss_jitter.offset()
    }

    pub fn transition(&self) -> Option<&LineTransition> {
        self.transition.as_ref()
    }

    /// Advances every live animation by one fast tick. Arrived projectiles
    /// trigger the boss hit-flash and are dropped.
    pub fn tick(&mut self, dt_secs: f64) {
        let mut arrivals = 0;
        self.projectiles.retain_mut(|p| {
            let alive = p.update();
            if !alive {
                arrivals += 1;
            }
            alive
        });
        if arrivals > 0 {
            self.boss_flash.trigger(FLASH_TICKS);
        }

        self.retarget_accum += dt_secs;
        if self.retarget_accum >= self.retarget_period {
            self.retarget_accum = 0.0;
            self.player_jitter.retarget(&mut self.rng);
            self.boss_jitter.retarget(&mut self.rng);
        }
        self.player_jitter.update();
        self.boss_jitter.update();

        if let Some(t) = self.transition.as_mut() {
            if !t.update() {
                self.transition = None;
            }
        }

        self.boss_flash.update();
        self.player_flash.update();
    }

    /// Terminal-phase cancellation: in-flight projectiles are discarded
    /// without their arrival effect, the transition is dropped, and the
    /// jitter stops retargeting.
    pub fn cancel_all(&mut self) {
        self.projectiles.clear();
        self.transition = None;
        self.boss_flash = HitFlash::default();
        self.player_flash = HitFlash::default();
        self.retarget_accum = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(seed: u64) -> MotionEngine {
        MotionEngine::new(ProjectileParams::default(), 3.0, 0.8, 0.25, Some(seed))
    }

    #[test]
    fn test_projectile_starts_at_source_and_ends_at_target() {
        let mut engine = engine(7);
        let start = Vec2::new(90.0, 170.0);
        let target = Vec2::new(440.0, 90.0);
        engine.launch(start, target);

        let positions = engine.projectile_positions();
        assert_eq!(positions.len(), 1);
        assert!((positions[0].x - start.x).abs() < 1e-9);
        assert!((positions[0].y - start.y).abs() < 1e-9);

        for _ in 0..19 {
            engine.tick(0.02);
            assert_eq!(engine.projectile_positions().len(), 1);
        }
        // The final step lands the projectile; it is dropped and the boss
        // flash fires.
        engine.tick(0.02);
        assert!(engine.projectile_positions().is_empty());
        assert!(engine.boss_flash.active());
    }

    #[test]
    fn test_projectile_path_is_deterministic_under_seed() {
        let sample = |seed| {
            let mut e = engine(seed);
            e.launch(Vec2::new(0.0, 0.0), Vec2::new(100.0, 100.0));
            e.tick(0.02);
            e.tick(0.02);
            e.projectile_positions()[0]
        };

        assert_eq!(sample(42), sample(42));
        assert_ne!(sample(42), sample(43));
    }

    #[test]
    fn test_easing_accelerates_toward_target() {
        let mut engine = engine(1);
        let target = Vec2::new(100.0, 0.0);
        engine.launch(Vec2::new(0.0, 0.0), target);

        // Halfway through the steps, eased progress t^2 = 0.25 keeps the
        // projectile in the first half of the arc.
        for _ in 0..10 {
            engine.tick(0.02);
        }
        let mid = engine.projectile_positions()[0];
        assert!(mid.x < 60.0);
    }

    #[test]
    fn test_jitter_stays_within_radius() {
        let radius = 3.0;
        let mut engine = MotionEngine::new(
            ProjectileParams::default(),
            radius,
            0.8,
            0.05,
            Some(11),
        );

        for _ in 0..5_000 {
            engine.tick(0.02);
            for offset in [engine.player_offset(), engine.boss_offset()] {
                assert!(offset.x.abs() <= radius + 1e-9);
                assert!(offset.y.abs() <= radius + 1e-9);
            }
        }
    }

    #[test]
    fn test_jitter_actually_moves() {
        let mut engine = engine(3);
        for _ in 0..100 {
            engine.tick(0.02);
        }
        let offset = engine.boss_offset();
        assert!(offset.x != 0.0 || offset.y != 0.0);
    }

    #[test]
    fn test_line_transition_runs_to_completion() {
        let mut engine = engine(5);
        engine.begin_transition(0, 1);

        let t = engine.transition().unwrap();
        assert_eq!((t.from_line, t.to_line), (0, 1));
        assert_eq!(t.progress(), 0.0);

        for _ in 0..TRANSITION_STEPS {
            engine.tick(0.02);
        }
        assert!(engine.transition().is_none());
    }

    #[test]
    fn test_cancel_discards_projectiles_without_arrival_flash() {
        let mut engine = engine(9);
        engine.launch(Vec2::new(0.0, 0.0), Vec2::new(100.0, 100.0));
        engine.begin_transition(2, 3);
        engine.tick(0.02);

        engine.cancel_all();
        assert!(engine.projectile_positions().is_empty());
        assert!(engine.transition().is_none());
        assert!(!engine.boss_flash.active());
        assert!(!engine.player_flash.active());
    }

    #[test]
    fn test_flash_countdown_expires() {
        let mut engine = engine(13);
        engine.flash_player();
        assert!(engine.player_flash.active());

        for _ in 0..FLASH_TICKS {
            engine.tick(0.02);
        }
        assert!(!engine.player_flash.active());
    }
}
