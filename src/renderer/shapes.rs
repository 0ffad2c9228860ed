//! Scenario drawing
//!
//! Every function here is a pure mapping from simulation state to surface
//! calls: it may run before the first step, and drawing the same state
//! twice issues the same commands.

use glam::{DVec2, Vec2};

use super::layout::{Layout, Viewport};
use super::{Color, Surface, colors, with_alpha};
use crate::sim::model::{DualDrop, FreeFall, Projectile, VerticalThrow};
use crate::sim::orbit::{CircularOrbit, KeplerPair};
use crate::sim::thermo::{AdiabaticProcess, MAX_VOLUME, MIN_VOLUME};
use crate::sim::{
    DualDropState, FallState, KeplerState, OrbitState, ProjectileState, Scenario, ScenarioState,
    ThrowState, Trail,
};
use crate::polar_to_cartesian;

const BALL_RADIUS: f32 = 10.0;
const ARROW_HEAD: f32 = 8.0;
/// Pixels per m/s for velocity arrows
const ARROW_SCALE: f32 = 2.0;

/// Draw one frame of an animated page
pub fn render_scenario(
    scenario: &Scenario,
    state: &ScenarioState,
    trail: &Trail,
    layout: &Layout,
    surface: &mut dyn Surface,
) {
    surface.clear(colors::BACKGROUND);
    match (scenario, state) {
        (Scenario::Throw(m), ScenarioState::Throw(s)) => draw_throw(m, s, trail, layout, surface),
        (Scenario::Fall(m), ScenarioState::Fall(s)) => draw_fall(m, s, layout, surface),
        (Scenario::DualDrop(m), ScenarioState::DualDrop(s)) => {
            draw_dual_drop(m, s, layout, surface)
        }
        (Scenario::Projectile(m), ScenarioState::Projectile(s)) => {
            draw_projectile(m, s, trail, layout, surface)
        }
        (Scenario::Orbit(m), ScenarioState::Orbit(s)) => draw_orbit(m, s, trail, layout, surface),
        (Scenario::Kepler(m), ScenarioState::Kepler(s)) => draw_kepler(m, s, layout, surface),
        _ => log::warn!("state does not belong to the {} page", scenario.name()),
    }
}

fn draw_ground(layout: &Layout, color: Color, surface: &mut dyn Surface) {
    let y = layout.ground_y();
    surface.fill_rect(
        Vec2::new(0.0, y),
        Vec2::new(layout.width, layout.height - y),
        color,
    );
}

/// Straight arrow from `from` to `to` with a two-stroke head
fn draw_arrow(from: Vec2, to: Vec2, color: Color, surface: &mut dyn Surface) {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return;
    }
    surface.line(from, to, 2.0, color);
    let back = to - dir * ARROW_HEAD;
    let perp = Vec2::new(-dir.y, dir.x) * (ARROW_HEAD * 0.5);
    surface.line(to, back + perp, 2.0, color);
    surface.line(to, back - perp, 2.0, color);
}

/// Fading polyline through the trail, oldest segment most transparent
fn draw_trail(trail: &Trail, view: &Viewport, surface: &mut dyn Surface) {
    if trail.len() < 2 {
        return;
    }
    let count = trail.len() as f32;
    let points: Vec<Vec2> = trail.iter().map(|p| view.to_screen(*p)).collect();
    for (i, pair) in points.windows(2).enumerate() {
        let age = 1.0 - (i + 1) as f32 / count;
        let alpha = (1.0 - age) * 0.8;
        let width = BALL_RADIUS * 0.6 * (1.0 - age * 0.7);
        surface.line(pair[0], pair[1], width, with_alpha(colors::TRAIL, alpha));
    }
}

fn draw_throw(
    model: &VerticalThrow,
    state: &ThrowState,
    trail: &Trail,
    layout: &Layout,
    surface: &mut dyn Surface,
) {
    let view = layout.ground_frame(DVec2::new(0.0, model.max_height() * 1.1), true);
    draw_ground(layout, colors::GROUND, surface);

    // Dashed-style guide at the apex
    let apex = view.to_screen(DVec2::new(0.0, model.max_height()));
    surface.line(
        Vec2::new(apex.x - 60.0, apex.y),
        Vec2::new(apex.x + 60.0, apex.y),
        1.0,
        colors::GUIDE,
    );

    draw_trail(trail, &view, surface);

    let ball = view.to_screen(DVec2::new(0.0, state.height)) - Vec2::new(0.0, BALL_RADIUS);
    surface.fill_circle(ball, BALL_RADIUS, colors::BALL);
    let tip = ball - Vec2::new(0.0, state.velocity as f32 * ARROW_SCALE);
    draw_arrow(ball, tip, colors::VELOCITY_ARROW, surface);
}

fn fall_ball(fall: &FreeFall, x: f64, sample: &FallState, view: &Viewport) -> Vec2 {
    debug_assert!(sample.height <= fall.height());
    view.to_screen(DVec2::new(x, sample.height)) - Vec2::new(0.0, BALL_RADIUS)
}

fn draw_fall(model: &FreeFall, state: &FallState, layout: &Layout, surface: &mut dyn Surface) {
    let view = layout.ground_frame(DVec2::new(0.0, model.height() * 1.1), true);
    draw_ground(layout, colors::WATER, surface);

    let release = view.to_screen(DVec2::new(0.0, model.height()));
    surface.line(
        Vec2::new(release.x - 40.0, release.y),
        Vec2::new(release.x + 40.0, release.y),
        3.0,
        colors::GUIDE,
    );
    let ball = fall_ball(model, 0.0, state, &view);
    surface.fill_circle(ball, BALL_RADIUS, colors::BALL);
    if matches!(state.phase, crate::sim::FallPhase::Splashed) {
        surface.stroke_circle(
            Vec2::new(ball.x, layout.ground_y()),
            BALL_RADIUS * 2.5,
            2.0,
            with_alpha(colors::WATER, 0.6),
        );
    }
}

fn draw_dual_drop(
    model: &DualDrop,
    state: &DualDropState,
    layout: &Layout,
    surface: &mut dyn Surface,
) {
    let top = model.first().height().max(model.second().height());
    let view = layout.ground_frame(DVec2::new(0.0, top * 1.1), true);
    draw_ground(layout, colors::GROUND, surface);

    // Balls side by side, a fixed pixel distance apart
    let offset = f64::from(layout.width * 0.15) / f64::from(view.scale);
    let first = fall_ball(model.first(), -offset, &state.first, &view);
    let second = fall_ball(model.second(), offset, &state.second, &view);

    // Separation marker between the two heights
    surface.line(
        Vec2::new(first.x, first.y),
        Vec2::new(second.x, first.y),
        1.0,
        colors::GUIDE,
    );
    surface.line(
        Vec2::new(second.x, first.y),
        Vec2::new(second.x, second.y),
        1.0,
        colors::GUIDE,
    );
    surface.text(
        Vec2::new(second.x + BALL_RADIUS * 1.5, (first.y + second.y) / 2.0),
        &format!("Δh = {:.1} m", state.separation()),
        colors::TEXT,
    );

    surface.fill_circle(first, BALL_RADIUS, colors::BALL);
    surface.fill_circle(second, BALL_RADIUS, colors::BALL_ALT);
}

fn draw_projectile(
    model: &Projectile,
    state: &ProjectileState,
    trail: &Trail,
    layout: &Layout,
    surface: &mut dyn Surface,
) {
    let extent = DVec2::new(model.range(), model.max_height()) * 1.1;
    let view = layout.ground_frame(extent, false);
    draw_ground(layout, colors::GROUND, surface);

    // Launch direction guide
    let origin = view.to_screen(DVec2::ZERO);
    let aim = polar_to_cartesian(1.0, model.angle());
    let guide_end = origin + Vec2::new(aim.x as f32, -aim.y as f32) * 40.0;
    surface.line(origin, guide_end, 1.0, colors::GUIDE);

    draw_trail(trail, &view, surface);

    let ball = view.to_screen(state.position) - Vec2::new(0.0, BALL_RADIUS);
    surface.fill_circle(ball, BALL_RADIUS, colors::BALL);
    let v = Vec2::new(state.velocity.x as f32, -state.velocity.y as f32) * ARROW_SCALE;
    draw_arrow(ball, ball + v, colors::VELOCITY_ARROW, surface);
}

fn draw_orbit(
    model: &CircularOrbit,
    state: &OrbitState,
    trail: &Trail,
    layout: &Layout,
    surface: &mut dyn Surface,
) {
    let view = layout.centered_frame(model.radius() * 1.05);
    let centre = view.to_screen(DVec2::ZERO);

    surface.fill_circle(centre, view.length(model.body().radius()), colors::PLANET);
    surface.stroke_circle(centre, view.length(model.radius()), 1.0, colors::GUIDE);
    draw_trail(trail, &view, surface);

    let satellite = view.to_screen(state.position);
    surface.fill_circle(satellite, BALL_RADIUS * 0.6, colors::SATELLITE);
    surface.line(centre, satellite, 1.0, with_alpha(colors::GUIDE, 0.3));
}

fn draw_kepler(model: &KeplerPair, state: &KeplerState, layout: &Layout, surface: &mut dyn Surface) {
    let outer = model.first_radius().max(model.second_radius());
    let view = layout.centered_frame(outer * 1.05);
    let centre = view.to_screen(DVec2::ZERO);

    // Scale would make the star sub-pixel; draw it at a fixed size
    surface.fill_circle(centre, BALL_RADIUS * 1.2, colors::STAR);

    let bodies = [
        (model.first_radius(), state.first_angle, colors::BALL),
        (model.second_radius(), state.second_angle, colors::BALL_ALT),
    ];
    for (radius, angle, color) in bodies {
        surface.stroke_circle(centre, view.length(radius), 1.0, colors::GUIDE);
        let pos = view.to_screen(polar_to_cartesian(radius, angle));
        surface.fill_circle(pos, BALL_RADIUS * 0.6, color);
    }
}

/// Draw the P-V diagram, the current state and the piston chamber
pub fn render_adiabatic(
    model: &AdiabaticProcess,
    volume: f64,
    guess: Option<f64>,
    layout: &Layout,
    surface: &mut dyn Surface,
) {
    surface.clear(colors::BACKGROUND);

    let curve = model.true_curve();
    let p_max = curve.iter().map(|(_, p)| *p).fold(0.0_f64, f64::max);
    let chart = Layout {
        height: layout.height * 0.7,
        ..*layout
    };
    let view = chart.ground_frame(DVec2::new(MAX_VOLUME, p_max), false);

    let draw_curve = |points: &[(f64, f64)], color: Color, surface: &mut dyn Surface| {
        for pair in points.windows(2) {
            let a = view.to_screen(DVec2::new(pair[0].0, pair[0].1.min(p_max)));
            let b = view.to_screen(DVec2::new(pair[1].0, pair[1].1.min(p_max)));
            surface.line(a, b, 2.0, color);
        }
    };
    draw_curve(&curve, colors::CURVE, surface);
    if let Some(gamma) = guess.filter(|g| g.is_finite() && *g > 0.0) {
        draw_curve(&model.curve(gamma), colors::GUESS_CURVE, surface);
    }

    let sample = model.sample(volume);
    let point = view.to_screen(DVec2::new(sample.volume, sample.pressure.min(p_max)));
    surface.fill_circle(point, 8.0, [1.0, 0.0, 0.0, 1.0]);

    // Chamber: width tracks volume, redder when pressure is high
    let top = chart.height + layout.margin * 0.5;
    let chamber_height = (layout.height - top - layout.margin * 0.5).max(1.0);
    let full = layout.width - 2.0 * layout.margin;
    let fraction = (sample.volume / MAX_VOLUME * 0.9) as f32;
    let fill = 1.0 - sample.tint as f32 / 255.0;
    surface.fill_rect(
        Vec2::new(layout.margin, top),
        Vec2::new(full * fraction, chamber_height),
        [1.0, fill, fill, 0.5],
    );
    surface.fill_rect(
        Vec2::new(layout.margin + full * fraction, top),
        Vec2::new(12.0, chamber_height),
        colors::PISTON,
    );
    surface.text(
        Vec2::new(layout.margin, top - 4.0),
        &format!(
            "V = {:.1} L (range {MIN_VOLUME}-{MAX_VOLUME})",
            sample.volume
        ),
        colors::TEXT,
    );
}
