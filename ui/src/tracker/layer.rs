use geom::{Bounds, Circle, Distance, Pt2D, PolyLine};
use widgetry::mapspace::{ObjectID, World};
use widgetry::{Canvas, Color, EventCtx, GeomBatch, Line, Text};

use model::{RouteView, StopStatus};

const ROUTE_COLOR: Color = Color::CYAN;

/// The static part of the view: the route polyline and one marker per stop,
/// styled by classification. Rebuilt when the step index changes; dropped
/// entirely when the route has nothing to draw.
pub struct RouteLayer {
    pub world: World<Obj>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Obj {
    Stop(usize),
}
impl ObjectID for Obj {}

impl RouteLayer {
    /// None when no waypoint has a drawable position; the caller drops any
    /// previous layer in that case.
    pub fn new(
        ctx: &mut EventCtx,
        route: &RouteView,
        statuses: &[StopStatus],
    ) -> Option<RouteLayer> {
        if !route.has_valid_position() {
            return None;
        }
        let mut world = World::new();

        // Two stacked strokes over the same points: a wide faint halo under a
        // narrow solid line.
        let pts: Vec<Pt2D> = route
            .waypoints
            .iter()
            .filter_map(|wp| wp.position)
            .map(|pos| pos.to_pt(&route.gps_bounds))
            .collect();
        let mut batch = GeomBatch::new();
        match PolyLine::new(pts) {
            Ok(pl) => {
                batch.push(
                    ROUTE_COLOR.alpha(0.3),
                    pl.make_polygons(Distance::meters(12.0)),
                );
                batch.push(ROUTE_COLOR, pl.make_polygons(Distance::meters(4.0)));
            }
            Err(err) => {
                // A degenerate route still gets its stop markers
                warn!("Can't draw the route polyline: {}", err);
            }
        }
        world.draw_master_batch(ctx, batch);

        for (idx, wp) in route.waypoints.iter().enumerate() {
            let pos = match wp.position {
                Some(pos) => pos,
                None => {
                    continue;
                }
            };
            let (color, radius) = style(statuses[idx]);

            let mut txt = Text::from(Line(wp.name.clone()));
            txt.add_line(Line(format!("Scheduled {}", wp.time)));
            txt.add_line(Line(statuses[idx].describe()));

            world
                .add(Obj::Stop(idx))
                .hitbox(Circle::new(pos.to_pt(&route.gps_bounds), radius).to_polygon())
                .draw_color(color)
                .hover_alpha(0.5)
                .tooltip(txt)
                .build(ctx);
        }
        world.initialize_hover(ctx);

        Some(RouteLayer { world })
    }
}

fn style(status: StopStatus) -> (Color, Distance) {
    match status {
        StopStatus::Upcoming => (Color::BLUE, Distance::meters(12.0)),
        StopStatus::Current => (Color::YELLOW, Distance::meters(18.0)),
        StopStatus::Completed => (Color::grey(0.5), Distance::meters(12.0)),
        StopStatus::Destination => (Color::RED, Distance::meters(18.0)),
    }
}

/// Fits the camera to the route's bounding box, with a fixed margin around
/// the edges.
pub fn fit_viewport(canvas: &mut Canvas, bounds: &Bounds) {
    let margin = 100.0;
    canvas.map_dims = (bounds.max_x + margin, bounds.max_y + margin);
    canvas.cam_zoom = (canvas.window_width / (bounds.width() + 2.0 * margin))
        .min(canvas.window_height / (bounds.height() + 2.0 * margin))
        .min(1.0);
    canvas.center_on_map_pt(bounds.center());
}
