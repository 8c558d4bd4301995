//! Headless scenario runner: one aircraft on a Bay Area route with an RTA
//! and a time-window constraint, advised every cycle. Run with
//! `RUST_LOG=info` to watch the speed commands.

use std::path::Path;

use afms::afms::{commands, Afms, AfmsConfig};
use afms::clock::{parse_time_of_day, SimClock};
use afms::constants::MPS_TO_KTS;
use afms::geo;
use afms::route::Waypoint;
use afms::sim::Simulation;
use afms::traffic::{Aircraft, Traffic};

const CONFIG_PATH: &str = "afms.yaml";

fn build_traffic() -> Traffic {
    let mut ac = Aircraft::new("KL204", 37.6213, -122.3790, 9_000.0, 180.0);
    ac.route.push(Waypoint::new("SFO", 37.6213, -122.3790, 9_000.0));
    ac.route.push(Waypoint::new("EMZ", 37.792415, -122.297972, 9_000.0));
    ac.route.push(Waypoint::new("GGB", 37.818184, -122.484053, 9_500.0));
    ac.route.push(Waypoint::new("PTR", 38.0700, -122.8700, 10_000.0));
    ac.route.push(Waypoint::new("MEN", 39.1200, -123.5300, 10_000.0));
    ac.route.active = 1;

    let mut traffic = Traffic::new();
    traffic.spawn(ac);
    traffic
}

fn main() {
    env_logger::init();

    let config = if Path::new(CONFIG_PATH).exists() {
        AfmsConfig::load(Path::new(CONFIG_PATH))
    } else {
        AfmsConfig::default()
    };

    let start = parse_time_of_day("13:50:00").expect("literal time");
    let mut traffic = build_traffic();

    // RTA at Point Reyes, then a two-minute window at Mendocino
    for (name, acid, args) in [
        ("SET_MODE_FROM", "KL204", vec!["SFO", "RTA"]),
        ("SET_RTA_AT", "KL204", vec!["PTR", "14:00:00"]),
        ("SET_MODE_FROM", "KL204", vec!["PTR", "TW"]),
        ("SET_RTA_WINDOW_AT", "KL204", vec!["MEN", "14:15:00", "120"]),
        ("SET_OWN_SPEED_FROM", "KL204", vec!["PTR", "200"]),
    ] {
        if let Err(e) = commands::dispatch(&mut traffic, name, acid, &args) {
            log::error!("[main] {name}: {e}");
            std::process::exit(1);
        }
    }

    let mut sim = Simulation::new(traffic, SimClock::new(start), Afms::new(config));

    // 40 minutes of simulated flight, one-second steps, minute-by-minute log
    for minute in 0..40 {
        sim.run(60.0, 1.0);
        let ac = &sim.traffic.aircraft()[0];
        let wp = ac.route.get(ac.route.active);
        let to_go = wp
            .map(|w| geo::dist_m(ac.lat_deg, ac.lon_deg, w.lat_deg, w.lon_deg))
            .unwrap_or(0.0);
        log::info!(
            "[main] t+{:02}:00 {} at ({:.3}, {:.3}) {:.0} kts, {:.1} km to {}",
            minute + 1,
            ac.id,
            ac.lat_deg,
            ac.lon_deg,
            ac.cas_m_s * MPS_TO_KTS,
            to_go / 1000.0,
            wp.map(|w| w.name.as_str()).unwrap_or("end of route"),
        );
    }

    log::info!("[main] simulation complete at {}", sim.clock.time_of_day());
}
