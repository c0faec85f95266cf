//! Sparks and the bursts that emit them.

use std::f32::consts::{PI, TAU};

use glam::Vec2;

use crate::color::Rgba;
use crate::entropy::Entropy;
use crate::surface::{StrokeStyle, Surface};

/// Below this speed friction stops applying.
pub const IDLE_SPEED: f32 = 0.2;
pub const SPARK_COLOR: Rgba = Rgba::rgb(0xfe, 0xca, 0x32);

const FRICTION: f32 = 0.88;
const SPEED: (f32, f32) = (2.0, 16.0);
const STEER_DRIFT: f32 = 0.2;
const STEER_SPREAD: f32 = PI * 0.4;
const GRAVITY_JITTER: f32 = 0.2;
const GRAVITY_WEIGHT: (f32, f32) = (0.25, 0.5);
const WIDTH_MAX: f32 = 3.0;
const LIFESPAN: (f32, f32) = (40.0, 60.0);
const BURST_SIZE: (f32, f32) = (10.0, 20.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Velocity {
    pub direction: f32,
    pub magnitude: f32,
    pub friction: f32,
}

/// Angular acceleration: `drift` is added to the heading every frame and
/// reverses when the heading leaves `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Steering {
    pub drift: f32,
    pub min: f32,
    pub max: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gravity {
    pub direction: f32,
    pub magnitude: f32,
}

#[derive(Debug, Clone)]
pub struct Spark {
    position: Vec2,
    previous: Vec2,
    velocity: Velocity,
    steering: Steering,
    gravity: Gravity,
    width: f32,
    lifespan: u32,
    max_lifespan: u32,
    color: Rgba,
}

impl Spark {
    pub fn new<E: Entropy + ?Sized>(origin: Vec2, rng: &mut E) -> Self {
        let velocity = Velocity {
            direction: rng.range(0.0, TAU),
            magnitude: rng.range(SPEED.0, SPEED.1),
            friction: FRICTION,
        };
        let steering = Steering {
            drift: rng.range(-STEER_DRIFT, STEER_DRIFT),
            min: velocity.direction - STEER_SPREAD,
            max: velocity.direction + STEER_SPREAD,
        };
        let gravity = Gravity {
            direction: PI * 0.5 + rng.range(-GRAVITY_JITTER, GRAVITY_JITTER),
            magnitude: rng.range(GRAVITY_WEIGHT.0, GRAVITY_WEIGHT.1),
        };
        let width = rng.range(0.0, WIDTH_MAX);
        let lifespan = rng.range(LIFESPAN.0, LIFESPAN.1).round() as u32;

        let mut spark = Self::with_motion(origin, velocity, steering, gravity, lifespan);
        spark.width = width;
        spark
    }

    pub fn with_motion(
        origin: Vec2,
        velocity: Velocity,
        steering: Steering,
        gravity: Gravity,
        lifespan: u32,
    ) -> Self {
        Self {
            position: origin,
            previous: origin,
            velocity,
            steering,
            gravity,
            width: 1.0,
            lifespan,
            max_lifespan: lifespan,
            color: SPARK_COLOR,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn previous(&self) -> Vec2 {
        self.previous
    }

    pub fn velocity(&self) -> Velocity {
        self.velocity
    }

    pub fn steering(&self) -> Steering {
        self.steering
    }

    pub fn lifespan(&self) -> u32 {
        self.lifespan
    }

    pub fn is_spent(&self) -> bool {
        self.lifespan == 0
    }

    /// Advance one frame. Returns `false` on the update after the lifespan
    /// ran out.
    pub fn update(&mut self) -> bool {
        self.previous = self.position;
        self.position += Vec2::from_angle(self.velocity.direction) * self.velocity.magnitude;
        self.position += Vec2::from_angle(self.gravity.direction) * self.gravity.magnitude;

        if self.velocity.magnitude > IDLE_SPEED {
            self.velocity.magnitude *= self.velocity.friction;
        }

        self.velocity.direction += self.steering.drift;
        if self.velocity.direction > self.steering.max || self.velocity.direction < self.steering.min
        {
            self.steering.drift = -self.steering.drift;
        }

        if self.lifespan > 0 {
            self.lifespan -= 1;
            true
        } else {
            false
        }
    }

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        if self.is_spent() {
            return;
        }
        surface.set_alpha(self.lifespan as f32 / self.max_lifespan as f32);
        surface.stroke_path(
            &[self.position, self.previous],
            &StrokeStyle {
                color: self.color,
                width: self.width,
                glow: None,
            },
        );
    }
}

/// A batch of sparks emitted from one point. Spent once every spark is.
#[derive(Debug, Clone)]
pub struct Burst {
    origin: Vec2,
    sparks: Vec<Spark>,
}

impl Burst {
    pub fn new<E: Entropy + ?Sized>(origin: Vec2, rng: &mut E) -> Self {
        let count = rng.range(BURST_SIZE.0, BURST_SIZE.1).round() as usize;
        Self::with_count(origin, count, rng)
    }

    pub fn with_count<E: Entropy + ?Sized>(origin: Vec2, count: usize, rng: &mut E) -> Self {
        let sparks = (0..count).map(|_| Spark::new(origin, rng)).collect();
        Self { origin, sparks }
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn sparks(&self) -> &[Spark] {
        &self.sparks
    }

    pub fn is_spent(&self) -> bool {
        self.sparks.is_empty()
    }

    pub fn update(&mut self) {
        self.sparks.retain_mut(Spark::update);
    }

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        for spark in &self.sparks {
            spark.render(surface);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::SeededEntropy;
    use crate::testing::{ConstEntropy, DrawOp, RecordingSurface};

    fn still_spark(lifespan: u32) -> Spark {
        Spark::with_motion(
            Vec2::ZERO,
            Velocity { direction: 0.0, magnitude: 0.0, friction: FRICTION },
            Steering { drift: 0.0, min: -1.0, max: 1.0 },
            Gravity { direction: 0.0, magnitude: 0.0 },
            lifespan,
        )
    }

    #[test]
    fn displacement_is_velocity_plus_gravity() {
        let mut spark = Spark::with_motion(
            Vec2::new(10.0, 10.0),
            Velocity { direction: 0.0, magnitude: 4.0, friction: 0.5 },
            Steering { drift: 0.0, min: -1.0, max: 1.0 },
            Gravity { direction: PI * 0.5, magnitude: 1.0 },
            10,
        );
        spark.update();
        assert!(spark.position().abs_diff_eq(Vec2::new(14.0, 11.0), 1e-4));
        assert_eq!(spark.previous(), Vec2::new(10.0, 10.0));
        assert_eq!(spark.velocity().magnitude, 2.0);

        spark.update();
        assert!(spark.position().abs_diff_eq(Vec2::new(16.0, 12.0), 1e-4));
        assert!(spark.previous().abs_diff_eq(Vec2::new(14.0, 11.0), 1e-4));
    }

    #[test]
    fn friction_stops_below_idle_speed() {
        let mut spark = Spark::with_motion(
            Vec2::ZERO,
            Velocity { direction: 0.0, magnitude: 1.0, friction: 0.5 },
            Steering { drift: 0.0, min: -1.0, max: 1.0 },
            Gravity { direction: 0.0, magnitude: 0.0 },
            50,
        );
        let mut last = spark.velocity().magnitude;
        for _ in 0..10 {
            spark.update();
            let now = spark.velocity().magnitude;
            assert!(now <= last);
            last = now;
        }
        // 1.0 -> 0.5 -> 0.25 -> 0.125, then friction no longer applies
        assert_eq!(last, 0.125);
    }

    #[test]
    fn steering_reverses_outside_range() {
        let mut spark = Spark::with_motion(
            Vec2::ZERO,
            Velocity { direction: 0.0, magnitude: 0.0, friction: FRICTION },
            Steering { drift: 0.3, min: -0.5, max: 0.5 },
            Gravity { direction: 0.0, magnitude: 0.0 },
            50,
        );
        spark.update();
        assert_eq!(spark.steering().drift, 0.3);
        spark.update();
        assert!(spark.velocity().direction > 0.5);
        assert_eq!(spark.steering().drift, -0.3);
    }

    #[test]
    fn lifespan_removal_matches_bolts() {
        let mut spark = still_spark(2);
        assert!(spark.update());
        assert!(spark.update());
        assert!(spark.is_spent());
        assert!(!spark.update());
    }

    #[test]
    fn random_sparks_stay_in_ranges() {
        let mut rng = SeededEntropy::from_seed(5);
        for _ in 0..200 {
            let spark = Spark::new(Vec2::ZERO, &mut rng);
            let v = spark.velocity();
            assert!((SPEED.0..SPEED.1).contains(&v.magnitude));
            assert!((40..=60).contains(&spark.lifespan()));
            let s = spark.steering();
            assert!(s.drift.abs() <= STEER_DRIFT);
            assert!((s.max - s.min - 2.0 * STEER_SPREAD).abs() < 1e-4);
        }
    }

    #[test]
    fn burst_size_and_shared_origin() {
        let mut rng = SeededEntropy::from_seed(9);
        for _ in 0..50 {
            let burst = Burst::new(Vec2::new(3.0, 4.0), &mut rng);
            assert!((10..=20).contains(&burst.sparks().len()));
            assert!(burst.sparks().iter().all(|s| s.position() == Vec2::new(3.0, 4.0)));
        }
    }

    #[test]
    fn burst_drops_spent_sparks() {
        let mut burst = Burst::with_count(Vec2::ZERO, 0, &mut ConstEntropy(0.5));
        burst.sparks = vec![still_spark(0), still_spark(3), still_spark(0)];
        burst.update();
        assert_eq!(burst.sparks().len(), 1);
        assert!(!burst.is_spent());

        for _ in 0..3 {
            burst.update();
        }
        assert!(burst.is_spent());
    }

    #[test]
    fn spark_draws_trail_segment() {
        let mut spark = still_spark(4);
        spark.update();
        let mut surface = RecordingSurface::new(10, 10);
        spark.render(&mut surface);
        assert_eq!(surface.ops()[0], DrawOp::Alpha(0.75));
        match &surface.ops()[1] {
            DrawOp::Stroke { points, style } => {
                assert_eq!(points.len(), 2);
                assert!(style.glow.is_none());
            }
            other => panic!("expected stroke, got {other:?}"),
        }
    }
}
