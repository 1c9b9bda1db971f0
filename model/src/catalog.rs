use std::collections::BTreeMap;

use anyhow::Result;
use serde::Deserialize;

use crate::{RouteID, Waypoint};

/// All known routes, keyed by ID. Loaded once; lookups never mutate it.
pub struct Catalog {
    routes: BTreeMap<RouteID, Vec<Waypoint>>,
}

impl Catalog {
    /// Reads a CSV of stops: route_id,stop_name,lat,lon,time,is_destination.
    /// Rows with blank or non-finite coordinates become waypoints without a
    /// position; they're kept so step indices line up with the source data.
    pub fn load<R: std::io::Read>(reader: R) -> Result<Self> {
        let mut routes: BTreeMap<RouteID, Vec<Waypoint>> = BTreeMap::new();
        for rec in csv::Reader::from_reader(reader).deserialize() {
            let rec: Record = rec?;
            routes
                .entry(RouteID(rec.route_id))
                .or_insert_with(Vec::new)
                .push(Waypoint::new(
                    rec.stop_name,
                    rec.lon,
                    rec.lat,
                    rec.time,
                    rec.is_destination,
                ));
        }
        if routes.is_empty() {
            bail!("The catalog has no routes at all");
        }
        Ok(Self { routes })
    }

    /// A small built-in catalog, so the app runs with no arguments.
    pub fn demo() -> Self {
        let mut routes = BTreeMap::new();
        routes.insert(
            RouteID("city-loop".to_string()),
            vec![
                demo_stop("Harbour Terminal", 106.8125, -6.1260, "07:00", false),
                demo_stop("Old Town Square", 106.8170, -6.1377, "07:06", false),
                demo_stop("Central Station", 106.8237, -6.1450, "07:13", false),
                demo_stop("City Hall", 106.8283, -6.1622, "07:20", false),
                demo_stop("Riverside Market", 106.8356, -6.1751, "07:28", false),
                demo_stop("South Plaza", 106.8421, -6.1893, "07:35", true),
            ],
        );
        routes.insert(
            RouteID("airport-express".to_string()),
            vec![
                demo_stop("Central Station", 106.8237, -6.1450, "08:00", false),
                demo_stop("West Interchange", 106.7901, -6.1512, "08:12", false),
                demo_stop("Airport Terminal 2", 106.6559, -6.1236, "08:35", true),
            ],
        );
        Self { routes }
    }

    pub fn routes(&self) -> impl Iterator<Item = &RouteID> {
        self.routes.keys()
    }

    pub fn default_route(&self) -> Option<&RouteID> {
        self.routes.keys().next()
    }

    /// An explicitly injected list wins verbatim. Otherwise look up the
    /// route; a miss or an empty entry logs and yields an empty sequence --
    /// the renderer shows nothing, but nobody crashes. The result replaces
    /// any previously resolved list in full.
    pub fn resolve(
        &self,
        route_id: Option<&RouteID>,
        injected: Option<Vec<Waypoint>>,
    ) -> Vec<Waypoint> {
        if let Some(list) = injected {
            return list;
        }
        let id = match route_id {
            Some(id) => id,
            None => {
                return Vec::new();
            }
        };
        match self.routes.get(id) {
            Some(list) if !list.is_empty() => list.clone(),
            _ => {
                warn!("No waypoints for {:?}; showing an empty map", id);
                Vec::new()
            }
        }
    }
}

fn demo_stop(name: &str, lon: f64, lat: f64, time: &str, is_destination: bool) -> Waypoint {
    Waypoint::new(
        name.to_string(),
        Some(lon),
        Some(lat),
        time.to_string(),
        is_destination,
    )
}

#[derive(Deserialize)]
struct Record {
    route_id: String,
    stop_name: String,
    lat: Option<f64>,
    lon: Option<f64>,
    time: String,
    is_destination: bool,
}
