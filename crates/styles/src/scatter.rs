//! Scatter family: shapes placed one by one by the composition sampler.
//!
//! Every style here draws, per shape and in this order: position, shape
//! kind, size, rotation, then the shared dressing. They differ in their
//! default shape sets, size ranges and rotation steps.

use motif_core::config::SeasonalTheme;
use motif_core::shape::{ShapeData, ShapeKind, ShapeType};

use crate::context::GenContext;

const SCATTER: &[ShapeType] = &[
    ShapeType::Circle,
    ShapeType::Square,
    ShapeType::Triangle,
    ShapeType::Diamond,
    ShapeType::Hexagon,
    ShapeType::Star,
    ShapeType::Ring,
    ShapeType::Cross,
    ShapeType::Heart,
    ShapeType::SemiCircle,
];

const GEOMETRIC: &[ShapeType] = &[
    ShapeType::Square,
    ShapeType::Triangle,
    ShapeType::Diamond,
    ShapeType::Hexagon,
    ShapeType::Pentagon,
    ShapeType::Octagon,
];

const ORGANIC: &[ShapeType] = &[
    ShapeType::Blob,
    ShapeType::Leaf,
    ShapeType::Flower,
    ShapeType::Circle,
    ShapeType::Raindrop,
];

const CONFETTI: &[ShapeType] = &[
    ShapeType::Line,
    ShapeType::Squiggle,
    ShapeType::Zigzag,
    ShapeType::Circle,
    ShapeType::Triangle,
    ShapeType::Square,
];

const BAUHAUS: &[ShapeType] = &[
    ShapeType::Circle,
    ShapeType::SemiCircle,
    ShapeType::QuarterCircle,
    ShapeType::Square,
    ShapeType::Triangle,
    ShapeType::Line,
];

const MEMPHIS: &[ShapeType] = &[
    ShapeType::Squiggle,
    ShapeType::Zigzag,
    ShapeType::Triangle,
    ShapeType::Circle,
    ShapeType::Cross,
    ShapeType::Ring,
    ShapeType::Arc,
];

/// Default shapes for a seasonal theme.
pub fn seasonal_set(theme: SeasonalTheme) -> &'static [ShapeType] {
    match theme {
        SeasonalTheme::Winter => &[ShapeType::Snowflake, ShapeType::PineTree, ShapeType::Circle],
        SeasonalTheme::Spring => &[ShapeType::Flower, ShapeType::Leaf, ShapeType::Raindrop],
        SeasonalTheme::Summer => &[ShapeType::Sun, ShapeType::Cloud, ShapeType::Circle],
        SeasonalTheme::Autumn => &[ShapeType::Leaf, ShapeType::Pumpkin, ShapeType::Moon],
        SeasonalTheme::Love => &[ShapeType::Heart, ShapeType::Ring, ShapeType::Flower],
    }
}

/// How rotation is drawn.
#[derive(Clone, Copy)]
enum Turn {
    /// Uniform in [0, 360).
    Free,
    /// A multiple of the given step.
    Snap(f64),
    /// Uniform in [-a, a].
    Tilt(f64),
}

impl Turn {
    fn draw(self, ctx: &mut GenContext<'_>) -> f64 {
        match self {
            Turn::Free => ctx.rng.next_range(0.0, 360.0),
            Turn::Snap(step) => {
                let steps = (360.0 / step).round().max(1.0) as usize;
                ctx.rng.next_usize(steps) as f64 * step
            }
            Turn::Tilt(a) => ctx.rng.next_range(-a, a),
        }
    }
}

fn scatter_with(
    ctx: &mut GenContext<'_>,
    types: &[ShapeType],
    count: usize,
    sizes: (f64, f64),
    turn: Turn,
) -> Vec<ShapeData> {
    let types = ctx.allowed(types);
    (0..count)
        .map(|_| {
            let pos = ctx.place();
            let kind = ctx.pick_kind(&types);
            let size = ctx.size(sizes.0, sizes.1);
            let rotation = turn.draw(ctx);
            ctx.dress(kind, pos, size, rotation)
        })
        .collect()
}

pub fn scatter(ctx: &mut GenContext<'_>) -> Vec<ShapeData> {
    let n = ctx.count();
    scatter_with(ctx, SCATTER, n, (0.5, 1.5), Turn::Free)
}

pub fn geometric(ctx: &mut GenContext<'_>) -> Vec<ShapeData> {
    let n = ctx.count();
    scatter_with(ctx, GEOMETRIC, n, (0.6, 1.6), Turn::Snap(15.0))
}

pub fn organic(ctx: &mut GenContext<'_>) -> Vec<ShapeData> {
    let n = ctx.count();
    scatter_with(ctx, ORGANIC, n, (0.6, 1.8), Turn::Free)
}

/// Twice the shapes at a third of the size.
pub fn confetti(ctx: &mut GenContext<'_>) -> Vec<ShapeData> {
    let n = ctx.count() * 2;
    scatter_with(ctx, CONFETTI, n, (0.2, 0.6), Turn::Free)
}

pub fn bauhaus(ctx: &mut GenContext<'_>) -> Vec<ShapeData> {
    let n = ctx.count();
    scatter_with(ctx, BAUHAUS, n, (0.8, 2.5), Turn::Snap(90.0))
}

pub fn memphis(ctx: &mut GenContext<'_>) -> Vec<ShapeData> {
    let n = ctx.count();
    scatter_with(ctx, MEMPHIS, n, (0.5, 1.4), Turn::Snap(45.0))
}

pub fn seasonal(ctx: &mut GenContext<'_>) -> Vec<ShapeData> {
    let n = ctx.count();
    let set = seasonal_set(ctx.config.seasonal.theme);
    scatter_with(ctx, set, n, (0.6, 1.6), Turn::Tilt(25.0))
}

/// Characters from the configured charset.
pub fn typography(ctx: &mut GenContext<'_>) -> Vec<ShapeData> {
    let mut charset: Vec<char> = ctx
        .config
        .typography
        .charset
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if charset.is_empty() {
        charset = motif_core::config::TypographyOptions::default()
            .charset
            .chars()
            .collect();
    }
    (0..ctx.count())
        .map(|_| {
            let pos = ctx.place();
            let ch = ctx.rng.next_item(&charset).copied().unwrap_or('A');
            let size = ctx.size(0.8, 2.0);
            let rotation = Turn::Tilt(20.0).draw(ctx);
            ctx.dress(ShapeKind::Character { ch }, pos, size, rotation)
        })
        .collect()
}

/// Images from the configured asset ids, or plain scatter without any.
pub fn collage(ctx: &mut GenContext<'_>) -> Vec<ShapeData> {
    let images = ctx.config.images.clone();
    if images.is_empty() {
        return scatter(ctx);
    }
    (0..ctx.count())
        .map(|_| {
            let pos = ctx.place();
            let asset_id = ctx.rng.next_item(&images).cloned().unwrap_or_default();
            let size = ctx.size(1.2, 3.0);
            let rotation = Turn::Tilt(15.0).draw(ctx);
            ctx.dress(ShapeKind::Image { asset_id }, pos, size, rotation)
        })
        .collect()
}
