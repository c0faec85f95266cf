//! A single lightning strike: a jittering polyline that fades over a few
//! frames, with a flickering radial flare at its root.

use std::f32::consts::{PI, TAU};

use glam::Vec2;

use crate::color::Rgba;
use crate::entropy::Entropy;
use crate::surface::{Bounds, GradientStop, Glow, StrokeStyle, Surface};

const LIFESPAN: (f32, f32) = (10.0, 20.0);
const SEGMENT_COUNT: (f32, f32) = (20.0, 30.0);
const SEGMENT_LENGTH: (f32, f32) = (80.0, 100.0);
const SEGMENT_JITTER: f32 = PI * 0.1;
const DRIFT: f32 = 0.02;
const DRIFT_FLIP_CHANCE: f32 = 0.04;
const GLOW_BLUR: f32 = 32.0;

const FLARE_COLOR: Rgba = Rgba::rgb(250, 200, 50);
const FLARE_RADIUS: (f32, f32) = (40.0, 120.0);
const FLARE_STOPS: [GradientStop; 5] = [
    GradientStop { offset: 0.0, alpha: 0.6 },
    GradientStop { offset: 0.1, alpha: 0.2 },
    GradientStop { offset: 0.4, alpha: 0.06 },
    GradientStop { offset: 0.65, alpha: 0.01 },
    GradientStop { offset: 0.8, alpha: 0.0 },
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub direction: f32,
    pub length: f32,
    /// Radians added to `direction` every update.
    pub drift: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoltStyle {
    pub color: Rgba,
    pub glow: Rgba,
    pub width: f32,
}

impl Default for BoltStyle {
    fn default() -> Self {
        Self {
            color: Rgba::rgb(0xfe, 0xfe, 0xfe),
            glow: Rgba::rgb(0x23, 0x23, 0xfe),
            width: 2.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Bolt {
    origin: Vec2,
    segments: Vec<Segment>,
    lifespan: u32,
    max_lifespan: u32,
    style: BoltStyle,
}

impl Bolt {
    pub fn new<E: Entropy + ?Sized>(origin: Vec2, rng: &mut E) -> Self {
        let lifespan = rng.range(LIFESPAN.0, LIFESPAN.1).round() as u32;
        let base = rng.range(0.0, TAU);
        let count = rng.range(SEGMENT_COUNT.0, SEGMENT_COUNT.1).round() as usize;
        let segments = (0..count)
            .map(|_| Segment {
                direction: base + rng.range(-SEGMENT_JITTER, SEGMENT_JITTER),
                length: rng.range(SEGMENT_LENGTH.0, SEGMENT_LENGTH.1),
                drift: rng.range(-DRIFT, DRIFT),
            })
            .collect();
        Self::from_segments(origin, segments, lifespan)
    }

    /// A bolt rooted at a random point inside `bounds`.
    pub fn scatter<E: Entropy + ?Sized>(bounds: Bounds, rng: &mut E) -> Self {
        let origin = bounds.sample(rng);
        Self::new(origin, rng)
    }

    pub fn from_segments(origin: Vec2, segments: Vec<Segment>, lifespan: u32) -> Self {
        Self {
            origin,
            segments,
            lifespan,
            max_lifespan: lifespan,
            style: BoltStyle::default(),
        }
    }

    pub fn with_style(mut self, style: BoltStyle) -> Self {
        self.style = style;
        self
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn lifespan(&self) -> u32 {
        self.lifespan
    }

    pub fn max_lifespan(&self) -> u32 {
        self.max_lifespan
    }

    pub fn is_spent(&self) -> bool {
        self.lifespan == 0
    }

    /// Advance one frame. Returns `false` once the bolt should be dropped,
    /// which is the update after its lifespan ran out.
    pub fn update<E: Entropy + ?Sized>(&mut self, rng: &mut E) -> bool {
        for segment in &mut self.segments {
            segment.direction += segment.drift;
            if rng.chance(DRIFT_FLIP_CHANCE) {
                segment.drift = -segment.drift;
            }
        }
        if self.lifespan > 0 {
            self.lifespan -= 1;
            true
        } else {
            false
        }
    }

    /// Origin followed by every segment endpoint.
    pub fn path(&self) -> Vec<Vec2> {
        let mut points = Vec::with_capacity(self.segments.len() + 1);
        let mut cursor = self.origin;
        points.push(cursor);
        for segment in &self.segments {
            cursor += Vec2::from_angle(segment.direction) * segment.length;
            points.push(cursor);
        }
        points
    }

    pub fn render<S, E>(&self, surface: &mut S, rng: &mut E)
    where
        S: Surface + ?Sized,
        E: Entropy + ?Sized,
    {
        if self.is_spent() {
            return;
        }

        surface.set_alpha(self.lifespan as f32 / self.max_lifespan as f32);
        surface.stroke_path(
            &self.path(),
            &StrokeStyle {
                color: self.style.color,
                width: self.style.width,
                glow: Some(Glow {
                    color: self.style.glow,
                    blur: GLOW_BLUR,
                }),
            },
        );

        let radius = rng.range(FLARE_RADIUS.0, FLARE_RADIUS.1);
        surface.fill_radial(self.origin, radius, FLARE_COLOR, &FLARE_STOPS);
    }
}
