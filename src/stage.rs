//! The lightning logo's frame driver: owns the live bolts and bursts, feeds
//! them from the glyph scanner and composites everything onto a surface.

use glam::Vec2;

use crate::bitmap::GlyphRasterizer;
use crate::bolt::Bolt;
use crate::color::Rgba;
use crate::config::LogoConfig;
use crate::entropy::Entropy;
use crate::scanner::GlyphScanner;
use crate::spark::Burst;
use crate::surface::{BlendMode, Bounds, Surface};

pub struct LightningStage<R, E> {
    config: LogoConfig,
    rasterizer: R,
    rng: E,
    scanner: GlyphScanner,
    bolts: Vec<Bolt>,
    bursts: Vec<Burst>,
    size: (u32, u32),
    pending_size: Option<(u32, u32)>,
}

impl<R: GlyphRasterizer, E: Entropy> LightningStage<R, E> {
    pub fn new(config: LogoConfig, rasterizer: R, rng: E, width: u32, height: u32) -> Self {
        let scanner = build_scanner(&config, &rasterizer, width, height);
        log::debug!(
            "lightning stage {}x{}: {:?} rasterized to {}x{}",
            width,
            height,
            config.text,
            scanner.bitmap().width(),
            scanner.bitmap().height()
        );
        Self {
            config,
            rasterizer,
            rng,
            scanner,
            bolts: Vec::new(),
            bursts: Vec::new(),
            size: (width, height),
            pending_size: None,
        }
    }

    pub fn config(&self) -> &LogoConfig {
        &self.config
    }

    pub fn scanner(&self) -> &GlyphScanner {
        &self.scanner
    }

    pub fn bolts(&self) -> &[Bolt] {
        &self.bolts
    }

    pub fn bursts(&self) -> &[Burst] {
        &self.bursts
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.size.0, self.size.1)
    }

    /// Record a new surface size; applied at the start of the next frame.
    pub fn request_resize(&mut self, width: u32, height: u32) {
        self.pending_size = Some((width, height));
    }

    /// Re-rasterize the text for a new surface size so it stays centered.
    /// Live bolts and bursts are left where they are.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.scanner = build_scanner(&self.config, &self.rasterizer, width, height);
    }

    /// One bolt and one burst at `point`.
    pub fn strike(&mut self, point: Vec2) {
        self.bolts.push(Bolt::new(point, &mut self.rng));
        self.bursts.push(Burst::new(point, &mut self.rng));
    }

    /// One bolt and one burst somewhere inside the surface.
    pub fn strike_anywhere(&mut self) {
        let point = self.bounds().sample(&mut self.rng);
        self.strike(point);
    }

    pub fn frame<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        if let Some((width, height)) = self.pending_size.take() {
            if (width, height) != self.size {
                surface.resize(width, height);
                self.resize(width, height);
            }
        }

        self.scanner
            .advance(&mut self.bolts, &mut self.bursts, &mut self.rng);

        let rng = &mut self.rng;
        self.bolts.retain_mut(|bolt| bolt.update(rng));
        for burst in &mut self.bursts {
            burst.update();
        }
        self.bursts.retain(|burst| !burst.is_spent());

        surface.set_blend(BlendMode::SourceOver);
        surface.set_alpha(1.0);
        surface.fill(Rgba::BLACK);

        surface.set_blend(BlendMode::Screen);
        self.scanner.render(surface);
        for bolt in &self.bolts {
            bolt.render(surface, &mut self.rng);
        }
        for burst in &self.bursts {
            burst.render(surface);
        }
    }
}

fn build_scanner<R: GlyphRasterizer>(
    config: &LogoConfig,
    rasterizer: &R,
    width: u32,
    height: u32,
) -> GlyphScanner {
    let style = config.text_style();
    let bitmap = rasterizer.rasterize(&style, width, height);
    GlyphScanner::new(
        bitmap,
        Bounds::new(width, height),
        config.reveal_delay,
        config.spawn,
    )
}
