use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand};
use gochara_config::{GocharaConfig, NatalSetup};
use gochara_core::{
    Body, ChartPoint, EphemerisChartBuilder, EphemerisProvider, NatalChart, separation,
};
use gochara_search::{
    AlignmentEvent, ReturnEvent, ScanRequest, SkySnapshot, TransitReport, find_relationship,
    find_return, return_chart, scan_transits, sign_position, sky_snapshot, solar_return_estimate,
};
use gochara_time::{SECONDS_PER_DAY, UtcTime};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

/// Julian Date of 1970-01-01T00:00Z.
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

#[derive(Parser)]
#[command(name = "gochara", version, about = "Transit alignment scanner")]
struct Cli {
    /// Verbosity (-v info, -vv debug, -vvv trace); RUST_LOG applies otherwise
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file (TOML); defaults apply when omitted
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a window for transits to the configured natal chart
    Transits {
        /// Window start, UTC (YYYY-MM-DD[Thh:mm[:ss]][Z]); default now
        #[arg(long)]
        start: Option<String>,
        /// Window length in days
        #[arg(long, default_value = "30")]
        days: f64,
        /// Reference instant for the today/week views; default now
        #[arg(long)]
        now: Option<String>,
        /// Number of important transits to list
        #[arg(long, default_value = "10")]
        top: usize,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Find when a body returns to a longitude
    Return {
        /// Body name (e.g. Sun, Moon, Saturn)
        #[arg(long, default_value = "Sun")]
        body: String,
        /// Target longitude in degrees; default the body's natal longitude
        #[arg(long)]
        target: Option<f64>,
        /// Rough instant of the return, UTC
        #[arg(long, conflicts_with = "year")]
        estimate: Option<String>,
        /// Solar-return year (Sun only; uses the configured birth date)
        #[arg(long)]
        year: Option<i32>,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Shortest angular distance between two longitudes
    Separation {
        /// First longitude in degrees
        #[arg(allow_negative_numbers = true)]
        a: f64,
        /// Second longitude in degrees
        #[arg(allow_negative_numbers = true)]
        b: f64,
    },
    /// Effective orb of a relationship between a body and a chart point
    Orb {
        /// Relationship name (e.g. Trine)
        #[arg(long)]
        relationship: String,
        /// Moving body
        #[arg(long)]
        body: String,
        /// Reference point (body name, Ascendant or Midheaven)
        #[arg(long)]
        point: String,
    },
    /// Retrograde bodies and lunar metrics at an instant
    Sky {
        /// UTC instant; default now
        #[arg(long)]
        date: Option<String>,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct TransitOutput<'a> {
    report: &'a TransitReport,
    sky: &'a SkySnapshot,
}

#[derive(Serialize)]
struct ReturnOutput<'a> {
    event: &'a ReturnEvent,
    utc: String,
    chart: &'a NatalChart,
}

fn exit_with(msg: impl Display) -> ! {
    eprintln!("{msg}");
    std::process::exit(1);
}

fn now_jd() -> f64 {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0);
    UNIX_EPOCH_JD + secs / SECONDS_PER_DAY
}

fn parse_utc_or_now(s: Option<&str>) -> f64 {
    match s {
        Some(text) => text
            .parse::<UtcTime>()
            .unwrap_or_else(|e| exit_with(format!("Invalid date '{text}': {e}")))
            .to_jd(),
        None => now_jd(),
    }
}

fn parse_body(s: &str) -> Body {
    s.parse()
        .unwrap_or_else(|e| exit_with(format!("Invalid body '{s}': {e}")))
}

fn load_config(path: Option<&Path>) -> GocharaConfig {
    match path {
        Some(p) => GocharaConfig::load(p)
            .unwrap_or_else(|e| exit_with(format!("Failed to load config: {e}"))),
        None => GocharaConfig::default(),
    }
}

fn open_provider(config: &GocharaConfig) -> Box<dyn EphemerisProvider + Send + Sync> {
    config
        .ephemeris
        .open()
        .unwrap_or_else(|e| exit_with(format!("Failed to open ephemeris: {e}")))
}

fn require_natal(config: &GocharaConfig) -> &NatalSetup {
    config
        .natal
        .as_ref()
        .unwrap_or_else(|| exit_with("No [natal] section in config; pass --config with natal data"))
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => exit_with(format!("Failed to serialize output: {e}")),
    }
}

fn fmt_jd(jd: f64) -> String {
    UtcTime::from_jd(jd).to_string()
}

fn print_event(ev: &AlignmentEvent) {
    let end = ev.end_jd.map_or_else(|| "(open)".to_string(), fmt_jd);
    println!(
        "  {}  {:<10} {:<12} {:<10}  dev {:>6.3}°  orb {:>5.2}°  strength {:>3}  [{} → {}]",
        fmt_jd(ev.exact_jd),
        ev.body.name(),
        ev.relationship,
        ev.point.name(),
        ev.deviation_deg,
        ev.orb_limit_deg,
        ev.strength,
        fmt_jd(ev.start_jd),
        end
    );
}

fn print_sky(sky: &SkySnapshot) {
    let l = &sky.lunar;
    println!(
        "Moon in {} - {} ({:.1}% lit, age {:.1} d, day {}){}{}{}",
        l.moon_sign,
        l.phase,
        l.illumination_pct,
        l.age_days,
        l.moon_day,
        if l.within_perigee { ", perigee" } else { "" },
        if l.within_apogee { ", apogee" } else { "" },
        if l.is_supermoon { ", supermoon" } else { "" },
    );
    if sky.retrogrades.is_empty() {
        println!("Retrograde: none");
    } else {
        let list: Vec<String> = sky
            .retrogrades
            .iter()
            .map(|r| format!("{} in {}", r.body, r.sign))
            .collect();
        println!("Retrograde: {}", list.join(", "));
    }
}

fn run_transits(
    config: &GocharaConfig,
    start: Option<&str>,
    days: f64,
    now: Option<&str>,
    top: usize,
    json: bool,
) {
    if !days.is_finite() || days <= 0.0 {
        exit_with("--days must be positive");
    }
    let provider = open_provider(config);
    let natal = require_natal(config)
        .chart(provider.as_ref(), &config.bodies)
        .unwrap_or_else(|e| exit_with(format!("Failed to build natal chart: {e}")));

    let start_jd = parse_utc_or_now(start);
    let now_jd = match now {
        Some(_) => parse_utc_or_now(now),
        None if start.is_some() => start_jd,
        None => now_jd(),
    };
    let request = ScanRequest::new(natal, start_jd, start_jd + days)
        .with_bodies(config.bodies.clone())
        .with_relationships(config.relationships.clone());

    let events = scan_transits(provider.as_ref(), &request, &config.scan)
        .unwrap_or_else(|e| exit_with(format!("Transit scan failed: {e}")));
    info!(events = events.len(), "scan complete");

    let report = TransitReport::build(&events, start_jd, start_jd + days, now_jd, top);
    let sky = sky_snapshot(provider.as_ref(), &config.bodies, now_jd)
        .unwrap_or_else(|e| exit_with(format!("Sky snapshot failed: {e}")));

    if json {
        print_json(&TransitOutput {
            report: &report,
            sky: &sky,
        });
        return;
    }

    println!(
        "Transits {} → {} ({} events)",
        report.window_start,
        report.window_end,
        report.events.len()
    );
    print_sky(&sky);
    println!("\nToday:");
    report.today.iter().for_each(print_event);
    println!("\nThis week:");
    report.week.iter().for_each(print_event);
    println!("\nImportant (top {top}):");
    report.important.iter().for_each(print_event);
    println!("\nAll:");
    report.events.iter().for_each(print_event);
}

fn run_return(
    config: &GocharaConfig,
    body: &str,
    target: Option<f64>,
    estimate: Option<&str>,
    year: Option<i32>,
    json: bool,
) {
    let body = parse_body(body);
    let provider = open_provider(config);

    let target = match target {
        Some(t) => t,
        None => {
            let natal = require_natal(config)
                .chart(provider.as_ref(), &config.bodies)
                .unwrap_or_else(|e| exit_with(format!("Failed to build natal chart: {e}")));
            natal.body_longitude(body).unwrap_or_else(|| {
                exit_with(format!("Natal chart has no {body}; pass --target"))
            })
        }
    };

    let estimate_jd = match (estimate, year) {
        (Some(text), _) => parse_utc_or_now(Some(text)),
        (None, Some(y)) => {
            if body != Body::Sun {
                exit_with("--year applies to solar returns only; use --estimate");
            }
            let birth = require_natal(config)
                .birth()
                .unwrap_or_else(|| exit_with("--year needs natal.birth in the config"));
            solar_return_estimate(birth, y)
        }
        (None, None) => exit_with("pass --estimate or --year"),
    };

    let event = match find_return(provider.as_ref(), body, target, estimate_jd, &config.return_search)
    {
        Ok(Some(ev)) => ev,
        Ok(None) => exit_with(format!(
            "{body} does not reach {target:.4}° within ±{} days of {}",
            config.return_search.window_days,
            fmt_jd(estimate_jd)
        )),
        Err(e) => exit_with(format!("Return search failed: {e}")),
    };

    let builder = EphemerisChartBuilder::new(provider.as_ref(), config.bodies.clone());
    let chart = return_chart(&builder, &event, None, None)
        .unwrap_or_else(|e| exit_with(format!("Failed to build return chart: {e}")));

    if json {
        print_json(&ReturnOutput {
            event: &event,
            utc: fmt_jd(event.jd_tdb),
            chart: &chart,
        });
        return;
    }

    println!(
        "{} return to {:.4}° at {} (JD {:.6}, speed {:+.4}°/day)",
        event.body,
        event.target_longitude_deg,
        fmt_jd(event.jd_tdb),
        event.jd_tdb,
        event.speed_deg_per_day
    );
    for p in &chart.points {
        println!("  {:<10} {}", p.point.name(), sign_position(p.longitude_deg));
    }
}

fn run_orb(config: &GocharaConfig, relationship: &str, body: &str, point: &str) {
    let rel = find_relationship(&config.relationships, relationship)
        .unwrap_or_else(|| {
            let names: Vec<&str> = config.relationships.iter().map(|r| r.name.as_str()).collect();
            exit_with(format!(
                "Unknown relationship '{relationship}'. Valid: {}",
                names.join(", ")
            ))
        });
    let body = parse_body(body);
    let point: ChartPoint = point
        .parse()
        .unwrap_or_else(|e| exit_with(format!("Invalid point '{point}': {e}")));
    let orb = config
        .scan
        .orbs
        .effective_orb(rel, ChartPoint::Body(body), point, config.scan.orb_scale);
    println!(
        "{} {} {}: {:.4}° (base {}° × scale {})",
        body, rel.name, point, orb, rel.orb_deg, config.scan.orb_scale
    );
}

fn run_sky(config: &GocharaConfig, date: Option<&str>, json: bool) {
    let provider = open_provider(config);
    let jd = parse_utc_or_now(date);
    let sky = sky_snapshot(provider.as_ref(), &config.bodies, jd)
        .unwrap_or_else(|e| exit_with(format!("Sky snapshot failed: {e}")));
    if json {
        print_json(&sky);
    } else {
        println!("{}", fmt_jd(jd));
        print_sky(&sky);
    }
}

fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Transits {
            start,
            days,
            now,
            top,
            json,
        } => run_transits(&config, start.as_deref(), days, now.as_deref(), top, json),

        Commands::Return {
            body,
            target,
            estimate,
            year,
            json,
        } => run_return(&config, &body, target, estimate.as_deref(), year, json),

        Commands::Separation { a, b } => {
            println!("{:.6}", separation(a, b));
        }

        Commands::Orb {
            relationship,
            body,
            point,
        } => run_orb(&config, &relationship, &body, &point),

        Commands::Sky { date, json } => run_sky(&config, date.as_deref(), json),
    }
}
