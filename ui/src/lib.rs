#[macro_use]
extern crate log;

mod tracker;

use abstutil::Timer;
use anyhow::Result;
use geom::Duration;
use serde::{Deserialize, Serialize};
use structopt::StructOpt;
use widgetry::{Canvas, Color, GfxCtx, Settings, SharedAppState};

use model::{Catalog, RouteID, RouteView};

#[derive(StructOpt)]
struct Args {
    /// The path to a CSV of stops: route_id,stop_name,lat,lon,time,is_destination
    #[structopt(long)]
    catalog: Option<String>,
    /// The route to track on startup. Defaults to the first route in the catalog.
    #[structopt(long)]
    route: Option<String>,
    /// Seconds between step updates from the simulated external feed
    #[structopt(long, default_value = "4.0")]
    step_secs: f64,
    /// Don't recenter the viewport on the moving vehicle
    #[structopt(long)]
    no_auto_pan: bool,
}

impl Args {
    // TODO Reading the catalog from a file only makes sense on native
    fn load(mut self) -> Result<(Catalog, Options)> {
        let catalog = match self.catalog.take() {
            Some(path) => {
                let bytes = fs_err::read(path)?;
                Catalog::load(&bytes[..])?
            }
            None => Catalog::demo(),
        };
        let options = Options {
            route: self.route.take().map(RouteID),
            step_interval: Duration::seconds(self.step_secs),
            auto_pan: !self.no_auto_pan,
        };
        Ok((catalog, options))
    }
}

struct Options {
    route: Option<RouteID>,
    step_interval: Duration,
    auto_pan: bool,
}

fn run(settings: Settings) {
    abstutil::logger::setup();

    let args = Args::from_iter(abstutil::cli_args());

    widgetry::run(settings, move |ctx| {
        let (catalog, options) = args.load().unwrap();
        let mut app = App::new(catalog, options);

        // This only makes sense on native; before_quit is never called on
        // web.
        let savestate = abstio::maybe_read_json::<Savestate>(
            "data/save_tracker.json".to_string(),
            &mut Timer::throwaway(),
        )
        .ok();

        let mut route = app.options.route.clone();
        if route.is_none() {
            if let Some(ref ss) = savestate {
                // The catalog may have changed since the last run
                if app.catalog.routes().any(|id| *id == ss.route) {
                    route = Some(ss.route.clone());
                }
            }
        }
        // The catalog always has at least one route
        let route = route.unwrap_or_else(|| app.catalog.default_route().unwrap().clone());
        app.set_route(route);

        let states = vec![tracker::Tracker::new_state(ctx, &app)];

        // Restore the camera last, so it wins over the initial viewport fit
        if let Some(ss) = savestate {
            ctx.canvas.cam_x = ss.cam_x;
            ctx.canvas.cam_y = ss.cam_y;
            ctx.canvas.cam_zoom = ss.cam_zoom;
        }

        (app, states)
    });
}

pub fn main() {
    run(Settings::new("Live vehicle tracker"));
}

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn run_wasm() {
    run(Settings::new("Live vehicle tracker").root_dom_element_id("loading".to_string()));
}

pub struct App {
    catalog: Catalog,
    /// Replaced wholesale when the selection changes
    route: RouteView,
    /// What the external feed last reported. None means tracking hasn't
    /// started.
    current_step: Option<usize>,
    options: Options,
}

impl SharedAppState for App {
    fn draw_default(&self, g: &mut GfxCtx) {
        if cfg!(not(target_arch = "wasm32")) {
            g.clear(Color::BLACK);
        }
    }

    fn before_quit(&self, canvas: &Canvas) {
        let ss = Savestate {
            cam_x: canvas.cam_x,
            cam_y: canvas.cam_y,
            cam_zoom: canvas.cam_zoom,
            route: self.route.id.clone(),
        };
        abstio::write_json("data/save_tracker.json".to_string(), &ss);
    }
}

pub type Transition = widgetry::Transition<App>;

impl App {
    fn new(catalog: Catalog, options: Options) -> Self {
        Self {
            catalog,
            route: RouteView::new(RouteID(String::new()), Vec::new()),
            current_step: None,
            options,
        }
    }

    fn set_route(&mut self, id: RouteID) {
        let waypoints = self.catalog.resolve(Some(&id), None);
        info!("Tracking {:?} with {} waypoints", id, waypoints.len());
        self.route = RouteView::new(id, waypoints);
        self.current_step = None;
    }
}

#[derive(Serialize, Deserialize)]
struct Savestate {
    cam_x: f64,
    cam_y: f64,
    cam_zoom: f64,
    route: RouteID,
}
