//! Movement integration and movement commands.

use emberfall_domain::{Direction, Player, Vec3};

/// Below this speed a mover is considered standing still.
pub const IDLE_SPEED: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementParams {
    /// Velocity multiplier applied once per tick.
    pub friction: f32,
    pub max_speed: f32,
    /// Positions are clamped to `[-bound, bound]` on every axis.
    pub bound: f32,
}

impl Default for MovementParams {
    fn default() -> Self {
        Self {
            friction: 0.95,
            max_speed: 5.0,
            bound: 50.0,
        }
    }
}

/// One fixed step: friction, speed clamp, integrate, bounds clamp.
pub fn integrate(position: &mut Vec3, velocity: &mut Vec3, dt: f32, params: &MovementParams) {
    *velocity = *velocity * params.friction;
    let speed = velocity.length();
    if speed > params.max_speed && speed > 0.0 {
        *velocity = *velocity * (params.max_speed / speed);
    }
    *position = (*position + *velocity * dt).clamp_axes(params.bound);
}

/// Integrates a player and settles the animation tag.
pub fn step_player(player: &mut Player, dt: f32, params: &MovementParams) {
    integrate(&mut player.position, &mut player.velocity, dt, params);
    if player.velocity.length() < IDLE_SPEED {
        player.animation = "idle".to_string();
    }
}

/// `go <dir>`: full speed along a compass direction.
pub fn apply_direction(player: &mut Player, direction: Direction, max_speed: f32) {
    set_heading(player, direction.unit(), max_speed);
}

/// Analog input on the ground plane. A zero vector stops the player.
pub fn apply_input(player: &mut Player, dx: f32, dz: f32, max_speed: f32) {
    let input = Vec3::ground(dx, dz);
    let length = input.length();
    if !length.is_finite() || length <= f32::EPSILON {
        player.velocity = Vec3::ZERO;
        player.animation = "idle".to_string();
        return;
    }
    set_heading(player, input * (1.0 / length), max_speed);
}

fn set_heading(player: &mut Player, unit: Vec3, max_speed: f32) {
    player.velocity = unit * max_speed;
    // Facing 0 looks north (-z); angles grow toward east.
    player.facing = unit.x.atan2(-unit.z);
    player.animation = "run".to_string();
}

#[cfg(test)]
mod tests {
    use super::*;
    use emberfall_domain::{CharacterClass, PlayerId, PlayerName};

    fn player() -> Player {
        Player::new(
            PlayerId::new(),
            PlayerName::new("Aria").unwrap(),
            CharacterClass::Ranger,
            Vec3::ZERO,
        )
    }

    #[test]
    fn clamps_speed_and_position_at_the_boundary() {
        let params = MovementParams {
            friction: 0.95,
            max_speed: 4.0,
            bound: 20.0,
        };
        let mut position = Vec3::ground(19.9, 0.0);
        let mut velocity = Vec3::ground(10.0, 0.0);
        for _ in 0..5 {
            integrate(&mut position, &mut velocity, 1.0 / 60.0, &params);
            assert!(position.x <= 20.0);
            assert!(velocity.x.hypot(velocity.z) <= 4.0 + 1e-4);
        }
        assert!((position.x - 20.0).abs() < 1e-4);
    }

    #[test]
    fn friction_decays_velocity() {
        let params = MovementParams::default();
        let mut position = Vec3::ZERO;
        let mut velocity = Vec3::ground(2.0, 0.0);
        integrate(&mut position, &mut velocity, 0.1, &params);
        assert!((velocity.x - 1.9).abs() < 1e-5);
        assert!((position.x - 0.19).abs() < 1e-5);
    }

    #[test]
    fn go_north_moves_along_negative_z() {
        let mut p = player();
        apply_direction(&mut p, Direction::North, 5.0);
        assert_eq!(p.velocity, Vec3::ground(0.0, -5.0));
        assert_eq!(p.animation, "run");
        assert!(p.facing.abs() < 1e-6);

        apply_direction(&mut p, Direction::East, 5.0);
        assert!((p.facing - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn animation_returns_to_idle_when_slow() {
        let mut p = player();
        p.velocity = Vec3::ground(0.04, 0.0);
        p.animation = "run".to_string();
        step_player(&mut p, 1.0 / 60.0, &MovementParams::default());
        assert_eq!(p.animation, "idle");
    }

    #[test]
    fn analog_input_is_normalized_and_zero_stops() {
        let mut p = player();
        apply_input(&mut p, 3.0, 4.0, 5.0);
        assert!((p.velocity.length() - 5.0).abs() < 1e-5);
        apply_input(&mut p, 0.0, 0.0, 5.0);
        assert_eq!(p.velocity, Vec3::ZERO);
        assert_eq!(p.animation, "idle");
    }
}
