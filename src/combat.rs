pub const PLAYER_MAX_HP: u32 = 100;
pub const WRONG_HIT_DAMAGE: u32 = 10;

/// Health pools and damage arithmetic for one battle.
///
/// Boss health is always re-derived from the typing index rather than
/// accumulated by repeated subtraction, so it cannot drift from the index
/// over a long corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct CombatModel {
    total_chars: usize,
    damage_unit: f64,
    boss_health: f64,
    player_health: Option<u32>,
}

impl CombatModel {
    /// `total_chars` must be non-zero; the session guards this at
    /// construction (see `Session::new`).
    pub fn new(total_chars: usize, player_health_enabled: bool) -> Self {
        Self {
            total_chars,
            damage_unit: 100.0 / total_chars as f64,
            boss_health: 100.0,
            player_health: player_health_enabled.then_some(PLAYER_MAX_HP),
        }
    }

    /// Percentage points of boss health removed per correct character.
    pub fn damage_unit(&self) -> f64 {
        self.damage_unit
    }

    pub fn boss_health(&self) -> f64 {
        self.boss_health
    }

    /// `None` in boss-only mode, where wrong input cannot end the battle.
    pub fn player_health(&self) -> Option<u32> {
        self.player_health
    }

    pub fn player_health_enabled(&self) -> bool {
        self.player_health.is_some()
    }

    /// Re-derives boss health from the authoritative typing index.
    pub fn apply_correct_hit(&mut self, current_index: usize) {
        let remaining = 1.0 - current_index as f64 / self.total_chars as f64;
        self.boss_health = (100.0 * remaining).max(0.0);
    }

    pub fn apply_wrong_hit(&mut self) {
        if let Some(hp) = self.player_health.as_mut() {
            *hp = hp.saturating_sub(WRONG_HIT_DAMAGE);
        }
    }

    pub fn boss_defeated(&self) -> bool {
        self.boss_health <= 0.0
    }

    pub fn player_defeated(&self) -> bool {
        self.player_health == Some(0)
    }

    pub fn reset(&mut self) {
        self.boss_health = 100.0;
        if let Some(hp) = self.player_health.as_mut() {
            *hp = PLAYER_MAX_HP;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_unit_from_corpus_length() {
        let combat = CombatModel::new(4, false);
        assert!((combat.damage_unit() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_boss_health_derived_from_index() {
        let mut combat = CombatModel::new(4, false);

        combat.apply_correct_hit(1);
        assert!((combat.boss_health() - 75.0).abs() < 1e-6);

        combat.apply_correct_hit(2);
        assert!((combat.boss_health() - 50.0).abs() < 1e-6);

        combat.apply_correct_hit(4);
        assert_eq!(combat.boss_health(), 0.0);
        assert!(combat.boss_defeated());
    }

    #[test]
    fn test_no_drift_over_long_corpus() {
        let total = 100_000;
        let mut combat = CombatModel::new(total, false);

        for i in 1..=total {
            combat.apply_correct_hit(i);
            let expected = 100.0 * (1.0 - i as f64 / total as f64);
            assert!((combat.boss_health() - expected).abs() < 1e-6);
        }
        assert!(combat.boss_defeated());
    }

    #[test]
    fn test_wrong_hit_damages_player_in_hp_mode() {
        let mut combat = CombatModel::new(10, true);
        assert_eq!(combat.player_health(), Some(PLAYER_MAX_HP));

        combat.apply_wrong_hit();
        assert_eq!(combat.player_health(), Some(PLAYER_MAX_HP - WRONG_HIT_DAMAGE));
        assert!(!combat.player_defeated());
    }

    #[test]
    fn test_player_health_clamps_at_zero() {
        let mut combat = CombatModel::new(10, true);

        for _ in 0..20 {
            combat.apply_wrong_hit();
        }
        assert_eq!(combat.player_health(), Some(0));
        assert!(combat.player_defeated());
    }

    #[test]
    fn test_boss_only_mode_ignores_wrong_hits() {
        let mut combat = CombatModel::new(10, false);

        for _ in 0..100 {
            combat.apply_wrong_hit();
        }
        assert_eq!(combat.player_health(), None);
        assert!(!combat.player_defeated());
    }

    #[test]
    fn test_reset_restores_full_health() {
        let mut combat = CombatModel::new(4, true);
        combat.apply_correct_hit(3);
        combat.apply_wrong_hit();

        combat.reset();
        assert_eq!(combat.boss_health(), 100.0);
        assert_eq!(combat.player_health(), Some(PLAYER_MAX_HP));
    }
}
