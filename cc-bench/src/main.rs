// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! Drive the controller without the simulator.
//!
//! `grid` runs a single tick for every combination of sample distances and sensor
//! angles. `approach` closes the loop with a minimal car model driving toward a wall.
//! Both print CSV.

use anyhow::{Context as _, Error};
use argh::FromArgs;
use cc_control::linearization::cos_alpha_scaled;
use cc_control::prelude::*;
use cc_log::{debug, info, LevelFilter};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

mod plant;

use plant::Plant;

/// Sample distances of the grid in cm
const GRID_DISTANCES_CM: [u16; 5] = [20, 40, 60, 100, 200];
/// Default sensor angles of the grid in degrees
const GRID_ANGLES_DEG: [f64; 3] = [60.0, 30.0, 0.0];

#[derive(FromArgs)]
#[argh(help_triggers("-h", "--help", "help"))]
/// Controller bench arguments
struct Args {
    #[argh(description = "configuration file (json)")]
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    #[argh(description = "output path, stdout if omitted")]
    #[argh(option, short = 'o')]
    out: Option<PathBuf>,

    #[argh(description = "log level")]
    #[argh(option, short = 'l')]
    log_level: Option<LevelFilter>,

    #[argh(subcommand)]
    command: Subcommand,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Subcommand {
    Grid(GridArgs),
    Approach(ApproachArgs),
}

#[derive(FromArgs)]
#[argh(subcommand, name = "grid")]
/// One tick per combination of front, left and right distance and sensor angle
struct GridArgs {
    #[argh(description = "side sensor angle in degrees, repeatable")]
    #[argh(option, short = 'a')]
    angle: Vec<f64>,
}

#[derive(FromArgs)]
#[argh(subcommand, name = "approach")]
/// Closed loop drive toward a wall
struct ApproachArgs {
    #[argh(description = "number of ticks")]
    #[argh(option, short = 'n', default = "100")]
    ticks: u32,

    #[argh(description = "initial distance to the wall in cm")]
    #[argh(option, default = "200.0")]
    start: f64,

    #[argh(description = "cm travelled per tick at full power")]
    #[argh(option, default = "10.0")]
    step: f64,

    #[argh(description = "distance to the left wall in cm")]
    #[argh(option, default = "80")]
    left: u16,

    #[argh(description = "distance to the right wall in cm")]
    #[argh(option, default = "80")]
    right: u16,

    #[argh(description = "side sensor angle in degrees")]
    #[argh(option, short = 'a', default = "0.0")]
    angle: f64,
}

/// Bench main entry point
fn main() -> Result<(), Error> {
    let Args {
        config,
        out,
        log_level,
        command,
    } = argh::from_env();

    cc_logger::init(log_level.unwrap_or(LevelFilter::Warn), true);

    let config = match config {
        Some(path) => load_config(&path)?,
        None => Config::default(),
    };
    info!("Running with policy {:?}", config.policy);

    let mut writer: Box<dyn Write> = match &out {
        Some(path) => Box::new(BufWriter::new(
            fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    match command {
        Subcommand::Grid(args) => grid(&config, &args, &mut writer)?,
        Subcommand::Approach(args) => approach(&config, &args, &mut writer)?,
    }

    writer.flush().context("failed to flush output")?;
    Ok(())
}

/// Read and validate a configuration file. Missing fields keep their defaults.
fn load_config(path: &Path) -> Result<Config, Error> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config: Config = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid configuration in {}", path.display()))?;
    Ok(config)
}

/// Sensor readings for one tick
struct Readings {
    front: u16,
    left: u16,
    right: u16,
    cos_alpha: u8,
}

impl Readings {
    fn from_distances(lin: &Linearization, front: u16, left: u16, right: u16, angle: f64) -> Self {
        Self {
            front: lin.adc_from_distance(front),
            left: lin.adc_from_distance(left),
            right: lin.adc_from_distance(right),
            cos_alpha: cos_alpha_scaled(angle),
        }
    }

    /// Push the readings in the order the simulator does.
    fn feed(&self, ctx: &mut Context) {
        ctx.update_front(self.front);
        ctx.update_right(self.right, self.cos_alpha);
        ctx.update_left(self.left, self.cos_alpha);
    }
}

fn grid<W: Write>(config: &Config, args: &GridArgs, mut w: W) -> Result<(), Error> {
    let angles = if args.angle.is_empty() {
        GRID_ANGLES_DEG.to_vec()
    } else {
        args.angle.clone()
    };

    writeln!(
        w,
        "front,left,right,angle,adc_front,adc_left,adc_right,lin_front,lin_left,lin_right,throttle,steer"
    )?;

    for front in GRID_DISTANCES_CM {
        for left in GRID_DISTANCES_CM {
            for right in GRID_DISTANCES_CM {
                for &angle in &angles {
                    let readings =
                        Readings::from_distances(&config.linearization, front, left, right, angle);

                    let mut ctx = Context::new(config.linearization);
                    let mut driver = Driver::new(config);
                    readings.feed(&mut ctx);
                    driver.tick(&mut ctx);

                    let lin = ctx.distances();
                    writeln!(
                        w,
                        "{front},{left},{right},{angle},{},{},{},{},{},{},{},{}",
                        readings.front,
                        readings.left,
                        readings.right,
                        lin.front,
                        lin.left,
                        lin.right,
                        ctx.throttle_command(),
                        ctx.steer_command()
                    )?;
                }
            }
        }
    }
    Ok(())
}

fn approach<W: Write>(config: &Config, args: &ApproachArgs, mut w: W) -> Result<(), Error> {
    let mut plant = Plant::new(args.start, args.left, args.right, args.step);
    let mut ctx = Context::new(config.linearization);
    let mut driver = Driver::new(config);

    writeln!(w, "tick,phase,wall,lin_front,lin_left,lin_right,throttle,steer,power,applied_steer")?;

    for tick in 1..=args.ticks {
        ctx.acknowledge_power(plant.power());
        ctx.acknowledge_steer(plant.steer());
        Readings::from_distances(
            &config.linearization,
            plant.front_cm(),
            plant.left_cm(),
            plant.right_cm(),
            args.angle,
        )
        .feed(&mut ctx);

        let phase = match driver.phase() {
            Phase::Warmup { .. } => "warmup",
            Phase::Drive => "drive",
        };
        driver.tick(&mut ctx);

        plant.actuate(ctx.throttle_command(), ctx.steer_command());
        plant.advance();
        debug!("Tick {tick}: wall at {} cm, power {}", plant.front_cm(), plant.power());

        let lin = ctx.distances();
        writeln!(
            w,
            "{tick},{phase},{},{},{},{},{},{},{},{}",
            plant.front_cm(),
            lin.front,
            lin.left,
            lin.right,
            ctx.throttle_command(),
            ctx.steer_command(),
            plant.power(),
            plant.steer()
        )?;
    }
    Ok(())
}
