//! Progressive text reveal. The scanner walks the rasterized text one column
//! at a time, seeding bolts and bursts wherever the column carries ink.

use glam::Vec2;

use crate::bitmap::GlyphBitmap;
use crate::bolt::Bolt;
use crate::config::SpawnChance;
use crate::entropy::Entropy;
use crate::spark::Burst;
use crate::surface::{Bounds, Surface};

/// Columns the cursor moves per step.
pub const REVEAL_STEP: u32 = 2;

#[derive(Debug, Clone)]
pub struct GlyphScanner {
    bitmap: GlyphBitmap,
    origin: Vec2,
    cursor: u32,
    delay: i32,
    base_delay: i32,
    spawn: SpawnChance,
}

impl GlyphScanner {
    /// Centers `bitmap` on a surface of `bounds`. A negative delay counts as 0.
    pub fn new(bitmap: GlyphBitmap, bounds: Bounds, reveal_delay: i32, spawn: SpawnChance) -> Self {
        let reveal_delay = reveal_delay.max(0);
        let size = Vec2::new(bitmap.width() as f32, bitmap.height() as f32);
        Self {
            origin: bounds.center() - size * 0.5,
            bitmap,
            cursor: 0,
            delay: reveal_delay,
            base_delay: reveal_delay,
            spawn,
        }
    }

    pub fn bitmap(&self) -> &GlyphBitmap {
        &self.bitmap
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Columns revealed so far.
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    pub fn advance<E: Entropy + ?Sized>(
        &mut self,
        bolts: &mut Vec<Bolt>,
        bursts: &mut Vec<Burst>,
        rng: &mut E,
    ) {
        let width = self.bitmap.width();
        if self.cursor >= width {
            // loop the reveal
            self.cursor = 0;
            return;
        }

        let column = self.cursor;
        for row in self.bitmap.ink_rows(column) {
            let point = self.origin + Vec2::new(column as f32, row as f32);
            if rng.chance(self.spawn.bolt) {
                bolts.push(Bolt::new(point, rng));
            }
            if rng.chance(self.spawn.burst) {
                bursts.push(Burst::new(point, rng));
            }
        }

        let elapsed = self.delay;
        self.delay -= 1;
        if elapsed < 0 {
            self.cursor = (self.cursor + REVEAL_STEP).min(width);
            // floor keeps a zero base delay from drifting
            self.delay = (self.delay + self.base_delay).max(-2);
        }
    }

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.blit_columns(&self.bitmap, self.origin, self.cursor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ConstEntropy, ink_column_bitmap};

    fn scanner(width: u32, delay: i32, spawn: SpawnChance) -> GlyphScanner {
        GlyphScanner::new(ink_column_bitmap(width, 6, &[]), Bounds::new(100, 50), delay, spawn)
    }

    #[test]
    fn origin_centers_the_bitmap() {
        let s = scanner(20, 2, SpawnChance::NEVER);
        assert_eq!(s.origin(), Vec2::new(40.0, 22.0));
    }

    #[test]
    fn cursor_steps_on_the_delay_cadence() {
        let mut s = scanner(100, 2, SpawnChance::NEVER);
        let (mut bolts, mut bursts) = (Vec::new(), Vec::new());
        let mut rng = ConstEntropy(0.5);
        let mut cursors = Vec::new();
        for _ in 0..8 {
            s.advance(&mut bolts, &mut bursts, &mut rng);
            cursors.push(s.cursor());
        }
        assert_eq!(cursors, vec![0, 0, 0, 2, 2, 4, 4, 6]);
    }

    #[test]
    fn negative_delay_behaves_like_zero() {
        let mut s = scanner(100, -3, SpawnChance::NEVER);
        let (mut bolts, mut bursts) = (Vec::new(), Vec::new());
        let mut rng = ConstEntropy(0.5);
        let mut cursors = Vec::new();
        for _ in 0..5 {
            s.advance(&mut bolts, &mut bursts, &mut rng);
            cursors.push(s.cursor());
        }
        assert_eq!(cursors, vec![0, 2, 4, 6, 8]);
        assert_eq!(s.delay, -2);
    }

    #[test]
    fn zero_delay_steps_every_frame_after_the_first() {
        let mut s = scanner(100, 0, SpawnChance::NEVER);
        let (mut bolts, mut bursts) = (Vec::new(), Vec::new());
        let mut rng = ConstEntropy(0.5);
        let mut cursors = Vec::new();
        for _ in 0..4 {
            s.advance(&mut bolts, &mut bursts, &mut rng);
            cursors.push(s.cursor());
        }
        assert_eq!(cursors, vec![0, 2, 4, 6]);
        for _ in 0..1000 {
            s.advance(&mut bolts, &mut bursts, &mut rng);
        }
        assert_eq!(s.delay, -2);
    }

    #[test]
    fn cursor_clamps_to_odd_width_then_wraps() {
        let mut s = scanner(3, 0, SpawnChance::NEVER);
        let (mut bolts, mut bursts) = (Vec::new(), Vec::new());
        let mut rng = ConstEntropy(0.5);
        let mut seen = Vec::new();
        for _ in 0..6 {
            s.advance(&mut bolts, &mut bursts, &mut rng);
            assert!(s.cursor() <= 3);
            seen.push(s.cursor());
        }
        assert_eq!(seen, vec![0, 2, 3, 0, 2, 3]);
    }

    #[test]
    fn blank_bitmap_is_a_no_op() {
        let mut s = GlyphScanner::new(GlyphBitmap::empty(), Bounds::new(10, 10), 2, SpawnChance::ALWAYS);
        let (mut bolts, mut bursts) = (Vec::new(), Vec::new());
        for _ in 0..5 {
            s.advance(&mut bolts, &mut bursts, &mut ConstEntropy(0.5));
        }
        assert_eq!(s.cursor(), 0);
        assert!(bolts.is_empty() && bursts.is_empty());
    }

    #[test]
    fn spawns_at_ink_in_the_current_column() {
        let bitmap = ink_column_bitmap(4, 6, &[(0, 1), (0, 4), (1, 2)]);
        let mut s = GlyphScanner::new(bitmap, Bounds::new(104, 56), 2, SpawnChance::ALWAYS);
        let (mut bolts, mut bursts) = (Vec::new(), Vec::new());
        s.advance(&mut bolts, &mut bursts, &mut ConstEntropy(0.5));

        let origins: Vec<_> = bolts.iter().map(Bolt::origin).collect();
        assert_eq!(origins, vec![Vec2::new(50.0, 26.0), Vec2::new(50.0, 29.0)]);
        assert_eq!(bursts.len(), 2);
        assert_eq!(bursts[1].origin(), Vec2::new(50.0, 29.0));
    }
}
