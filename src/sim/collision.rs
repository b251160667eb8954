//! Collision detection and spawn-placement safety
//!
//! Two families of predicate: the forgiving rectangular test that decides
//! whether the dragon struck an obstacle, and circle overlap for everything
//! else. The same geometry backs the spawn-safety check that keeps new
//! entities from materializing on top of the player.

use glam::Vec2;

use super::state::{Dragon, FireBreath, Obstacle, TailSegment};
use crate::consts::*;

/// Dragon-vs-obstacle. The dragon's box is shrunk by
/// [`COLLISION_REDUCTION`] on both axes; a hit requires horizontal overlap
/// with the obstacle column and the shrunken box poking outside the gap band.
pub fn dragon_hits_obstacle(dragon: &Dragon, obstacle: &Obstacle) -> bool {
    let effective_width = dragon.width * (1.0 - COLLISION_REDUCTION);
    let effective_height = dragon.height * (1.0 - COLLISION_REDUCTION);

    let in_column = dragon.pos.x + effective_width / 2.0 > obstacle.x
        && dragon.pos.x - effective_width / 2.0 < obstacle.x + OBSTACLE_WIDTH;
    if !in_column {
        return false;
    }

    dragon.pos.y - effective_height / 2.0 < obstacle.gap_y
        || dragon.pos.y + effective_height / 2.0 > obstacle.gap_y + obstacle.gap_size
}

/// Circle overlap: centers closer than the sum of radii
#[inline]
pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    a.distance(b) < radius_a + radius_b
}

/// Projectile-vs-obstacle. A breath passing through the gap band does not
/// strike the structure.
pub fn fire_hits_obstacle(fire: &FireBreath, obstacle: &Obstacle) -> bool {
    fire.pos.x + fire.size > obstacle.x
        && fire.pos.x < obstacle.x + OBSTACLE_WIDTH
        && !obstacle.gap_contains(fire.pos.y)
}

/// Placement safety for new collectibles and power-ups. A candidate point is
/// rejected when it crowds the dragon, any tail segment, or the solid part
/// of an obstacle column.
pub fn is_safe_spawn_position(
    point: Vec2,
    dragon: &Dragon,
    tail: &[TailSegment],
    obstacles: &[Obstacle],
) -> bool {
    if point.distance(dragon.pos) < SAFE_RADIUS_DRAGON {
        return false;
    }

    for segment in tail {
        if point.distance(segment.pos) < SAFE_RADIUS_TAIL {
            return false;
        }
    }

    for obstacle in obstacles {
        if (point.x - obstacle.x).abs() < SAFE_OBSTACLE_MARGIN && !obstacle.gap_contains(point.y) {
            return false;
        }
    }

    true
}
