mod feed;
mod layer;

use geom::{Circle, Distance, LonLat};
use widgetry::{
    Choice, Color, Drawable, EventCtx, GeomBatch, GfxCtx, HorizontalAlignment, Key, Line, Outcome,
    Panel, State, Text, TextExt, Toggle, UpdateType, VerticalAlignment, Widget,
};

use model::{classify, Animator, RouteID};

use self::feed::StepFeed;
use self::layer::RouteLayer;
use crate::{App, Transition};

pub struct Tracker {
    panel: Panel,
    layer: Option<RouteLayer>,
    feed: StepFeed,
    animator: Animator,
    draw_vehicle: Drawable,
}

impl Tracker {
    pub fn new_state(ctx: &mut EventCtx, app: &App) -> Box<dyn State<App>> {
        let mut state = Tracker {
            panel: make_panel(ctx, app),
            layer: None,
            feed: StepFeed::new(app.options.step_interval),
            animator: Animator::new(),
            draw_vehicle: Drawable::empty(ctx),
        };
        state.on_route_change(ctx, app);
        Box::new(state)
    }

    /// The route was replaced wholesale; all tracking progress resets.
    fn on_route_change(&mut self, ctx: &mut EventCtx, app: &App) {
        self.feed.pause();
        self.animator.reset();
        self.draw_vehicle = Drawable::empty(ctx);
        self.rebuild_layer(ctx, app);
        if self.layer.is_some() {
            layer::fit_viewport(ctx.canvas, &app.route.gps_bounds.to_bounds());
        }
        self.update_controls(ctx);
        self.update_status(ctx, app);
    }

    fn rebuild_layer(&mut self, ctx: &mut EventCtx, app: &App) {
        let statuses = classify(&app.route.waypoints, app.current_step);
        self.layer = RouteLayer::new(ctx, &app.route, &statuses);
    }

    /// A new step index arrived, from the feed or from the manual button.
    fn apply_step(&mut self, ctx: &mut EventCtx, app: &mut App, step: Option<usize>) {
        app.current_step = step;
        self.animator.on_step_change(step, &app.route.waypoints);
        // Stop classifications changed
        self.rebuild_layer(ctx, app);
        if let Some(pos) = self.animator.marker() {
            self.move_vehicle(ctx, app, pos);
        }
        self.update_status(ctx, app);
    }

    fn move_vehicle(&mut self, ctx: &mut EventCtx, app: &App, pos: LonLat) {
        let pt = pos.to_pt(&app.route.gps_bounds);
        let mut batch = GeomBatch::new();
        batch.push(
            Color::GREEN,
            Circle::new(pt, Distance::meters(15.0)).to_polygon(),
        );
        self.draw_vehicle = ctx.upload(batch);
        if app.options.auto_pan {
            // Immediate recenter; the marker's own motion already provides
            // the animated effect
            ctx.canvas.center_on_map_pt(pt);
        }
    }

    fn update_controls(&mut self, ctx: &mut EventCtx) {
        let row = Widget::row(vec![
            if self.feed.is_playing() {
                ctx.style()
                    .btn_outline
                    .text("pause")
                    .hotkey(Key::Space)
                    .build_def(ctx)
            } else {
                ctx.style()
                    .btn_outline
                    .text("play")
                    .hotkey(Key::Space)
                    .build_def(ctx)
            },
            ctx.style()
                .btn_outline
                .text("step forwards")
                .hotkey(Key::RightArrow)
                .build_def(ctx),
            ctx.style()
                .btn_outline
                .text("reset")
                .hotkey(Key::X)
                .build_def(ctx),
        ]);
        self.panel.replace(ctx, "controls", row);
    }

    fn update_status(&mut self, ctx: &mut EventCtx, app: &App) {
        let mut txt = Text::new();
        match app.current_step {
            None => {
                txt.add_line(Line("Not started"));
            }
            Some(step) => {
                if let Some(wp) = app.route.waypoints.get(step) {
                    txt.add_line(Line(format!(
                        "Stop {} of {}: {}",
                        step + 1,
                        app.route.waypoints.len(),
                        wp.name
                    )));
                    txt.add_line(Line(format!("Scheduled {}", wp.time)));
                }
                if let Some(heading) = self.animator.heading() {
                    txt.add_line(Line(format!("Heading {:.0} degrees", heading)));
                }
            }
        }
        self.panel.replace(ctx, "status", txt.into_widget(ctx));
    }
}

impl State<App> for Tracker {
    fn event(&mut self, ctx: &mut EventCtx, app: &mut App) -> Transition {
        ctx.canvas_movement();

        match self.panel.event(ctx) {
            Outcome::Clicked(x) => match x.as_ref() {
                "play" => {
                    self.feed.play();
                    self.update_controls(ctx);
                }
                "pause" => {
                    self.feed.pause();
                    self.update_controls(ctx);
                }
                "step forwards" => {
                    if let Some(next) =
                        feed::next_step(app.current_step, app.route.waypoints.len())
                    {
                        self.apply_step(ctx, app, Some(next));
                    }
                }
                "reset" => {
                    self.feed.pause();
                    self.animator.reset();
                    self.draw_vehicle = Drawable::empty(ctx);
                    self.apply_step(ctx, app, None);
                    self.update_controls(ctx);
                }
                _ => unreachable!(),
            },
            Outcome::Changed(x) => match x.as_ref() {
                "route" => {
                    let id: RouteID = self.panel.dropdown_value("route");
                    app.set_route(id);
                    self.on_route_change(ctx, app);
                }
                "auto-pan" => {
                    app.options.auto_pan = self.panel.is_checked("auto-pan");
                }
                _ => unreachable!(),
            },
            _ => {}
        }

        if let Some(ref mut layer) = self.layer {
            layer.world.event(ctx);
        }

        if let Some(dt) = ctx.input.nonblocking_is_update_event() {
            ctx.input.use_update_event();
            if let Some(next) = self.feed.tick(dt, app.current_step, app.route.waypoints.len()) {
                // apply_step already renders the new tween's start position;
                // charging this frame's dt too would skip past progress 0
                self.apply_step(ctx, app, Some(next));
            } else if self.animator.is_tweening() {
                if let Some(pos) = self.animator.advance(dt) {
                    self.move_vehicle(ctx, app, pos);
                }
            }
        }

        if self.feed.is_playing() || self.animator.is_tweening() {
            ctx.request_update(UpdateType::Game);
        }

        Transition::Keep
    }

    fn draw(&self, g: &mut GfxCtx, _: &App) {
        self.panel.draw(g);
        if let Some(ref layer) = self.layer {
            layer.world.draw(g);
        }
        g.redraw(&self.draw_vehicle);
    }
}

fn make_panel(ctx: &mut EventCtx, app: &App) -> Panel {
    let choices: Vec<Choice<RouteID>> = app
        .catalog
        .routes()
        .map(|id| Choice::new(id.0.clone(), id.clone()))
        .collect();

    Panel::new_builder(Widget::col(vec![
        Line("Live vehicle tracker").small_heading().into_widget(ctx),
        Widget::row(vec![
            "Route:".text_widget(ctx),
            Widget::dropdown(ctx, "route", app.route.id.clone(), choices),
        ]),
        Widget::placeholder(ctx, "controls"),
        Toggle::checkbox(ctx, "auto-pan", None, app.options.auto_pan),
        Widget::placeholder(ctx, "status"),
    ]))
    .aligned(HorizontalAlignment::Left, VerticalAlignment::Top)
    .build(ctx)
}
