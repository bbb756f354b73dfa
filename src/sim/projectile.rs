//! Projectile kinematics: homing steer, integration, range and expiry

use glam::Vec2;

use super::entity::{Enemy, Projectile};
use crate::consts::*;

impl Projectile {
    /// Advance one tick. Returns false once the projectile should be removed.
    pub fn update(&mut self, enemies: &[Enemy]) -> bool {
        if let Some(turn) = self.homing {
            self.steer(enemies, turn);
        }

        self.body.advance(1.0);
        self.lifetime -= 1;
        self.distance_traveled += self.body.vel.length();

        if self
            .max_range
            .is_some_and(|max_range| self.distance_traveled >= max_range)
        {
            self.lifetime = 0;
        }

        !self.is_expired()
    }

    /// Bend velocity toward the nearest live enemy without changing speed
    fn steer(&mut self, enemies: &[Enemy], turn: f32) {
        let speed = self.body.vel.length();
        if speed <= f32::EPSILON {
            return;
        }
        let Some(target) = nearest_live(enemies, self.body.pos) else {
            return;
        };
        let Some(to_target) = (target - self.body.pos).try_normalize() else {
            return;
        };
        let bent = self.body.vel + to_target * turn * speed;
        if let Some(dir) = bent.try_normalize() {
            self.body.vel = dir * speed;
        }
    }

    pub fn is_expired(&self) -> bool {
        self.lifetime <= 0 || self.out_of_bounds()
    }

    fn out_of_bounds(&self) -> bool {
        let p = self.body.pos;
        p.x < -OUT_OF_BOUNDS_MARGIN
            || p.x > ARENA_WIDTH + OUT_OF_BOUNDS_MARGIN
            || p.y < -OUT_OF_BOUNDS_MARGIN
            || p.y > ARENA_HEIGHT + OUT_OF_BOUNDS_MARGIN
    }
}

fn nearest_live(enemies: &[Enemy], from: Vec2) -> Option<Vec2> {
    enemies
        .iter()
        .filter(|e| !e.is_dead())
        .map(|e| e.pos())
        .min_by(|a, b| a.distance_squared(from).total_cmp(&b.distance_squared(from)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{EnemyArchetype, Faction, ProjectileTag};
    use proptest::prelude::*;

    fn shot(pos: Vec2, dir: Vec2) -> Projectile {
        Projectile::new(pos, dir, 10.0, Faction::Player, ProjectileTag::Magic)
    }

    #[test]
    fn test_max_range_expires_on_reaching_distance() {
        let mut p = shot(Vec2::new(100.0, 320.0), Vec2::X);
        p.body.vel = Vec2::X * 10.0;
        p.max_range = Some(350.0);
        for _ in 0..34 {
            assert!(p.update(&[]));
        }
        // 35th tick reaches exactly 350
        assert!(!p.update(&[]));
        assert_eq!(p.distance_traveled, 350.0);
    }

    #[test]
    fn test_lifetime_expiry() {
        let mut p = shot(Vec2::new(480.0, 320.0), Vec2::ZERO);
        p.lifetime = 2;
        assert!(p.update(&[]));
        assert!(!p.update(&[]));
    }

    #[test]
    fn test_out_of_bounds_culls() {
        let mut p = shot(Vec2::new(ARENA_WIDTH + 45.0, 320.0), Vec2::X);
        assert!(!p.update(&[]));
    }

    #[test]
    fn test_homing_turns_toward_nearest_enemy() {
        let mut p = shot(Vec2::new(100.0, 100.0), Vec2::X);
        p.homing = Some(0.2);
        let enemies = [
            Enemy::minion(1, Vec2::new(100.0, 400.0), 1, EnemyArchetype::Slime),
            Enemy::minion(2, Vec2::new(100.0, 600.0), 1, EnemyArchetype::Slime),
        ];
        p.update(&enemies);
        assert!(p.body.vel.y > 0.0);
    }

    #[test]
    fn test_homing_ignores_dead_enemies() {
        let mut p = shot(Vec2::new(100.0, 100.0), Vec2::X);
        p.homing = Some(0.2);
        let mut dead = Enemy::minion(1, Vec2::new(100.0, 300.0), 1, EnemyArchetype::Slime);
        dead.hp = 0.0;
        p.update(&[dead]);
        assert_eq!(p.body.vel, Vec2::X * BULLET_SPEED);
    }

    proptest! {
        #[test]
        fn prop_homing_preserves_speed(
            angle in -3.1f32..3.1,
            speed in 0.5f32..20.0,
            tx in 0.0f32..960.0,
            ty in 0.0f32..640.0,
            turn in 0.01f32..1.0,
        ) {
            let mut p = shot(Vec2::new(480.0, 320.0), Vec2::from_angle(angle));
            p.body.vel = Vec2::from_angle(angle) * speed;
            p.homing = Some(turn);
            let enemies = [Enemy::minion(1, Vec2::new(tx, ty), 1, EnemyArchetype::Bat)];
            p.update(&enemies);
            prop_assert!((p.body.vel.length() - speed).abs() < 1e-3 * speed.max(1.0));
        }
    }
}
