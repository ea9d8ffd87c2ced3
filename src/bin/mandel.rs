// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use clap::{App, Arg, ArgMatches};
use failure::{err_msg, Error};
use log::info;
use mandelbrot_set::{
    FrameSweep, IterationConfig, OutputFormat, PlaneWindow, Preset, ScanParameters, SweepRule,
};
use num::Complex;
use std::path::PathBuf;
use std::str::FromStr;

fn parse_pair<T: FromStr>(s: &str, separator: char) -> Option<(T, T)> {
    let index = s.find(separator)?;
    match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
        (Ok(l), Ok(r)) => Some((l, r)),
        _ => None,
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    parse_pair(s, ',').map(|(re, im)| Complex { re, im })
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    parse_pair::<T>(s, separator)
        .map(|_| ())
        .ok_or_else(|| err.to_string())
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    let value = T::from_str(s).map_err(|_| isnotanumber_err.to_string())?;
    if value < low || value > high {
        return Err(isnotinrange_err.to_string());
    }
    Ok(())
}

const PRESET: &str = "preset";
const OUTPUT: &str = "output";
const SIZE: &str = "size";
const LEFTLOWER: &str = "leftlower";
const RIGHTUPPER: &str = "rightupper";
const ITERATIONS: &str = "iterations";
const FRAMES: &str = "frames";
const FORMAT: &str = "format";
const THREADS: &str = "threads";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();
    let presets: Vec<&'static str> = Preset::ALL.iter().map(|preset| preset.name()).collect();

    App::new("mandel")
        .version("0.1.0")
        .about("Escape-time Mandelbrot family renderer")
        .arg(
            Arg::with_name(PRESET)
                .long(PRESET)
                .short("p")
                .takes_value(true)
                .default_value("plain")
                .possible_values(&presets)
                .help("Render to start from"),
        )
        .arg(
            Arg::with_name(OUTPUT)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file (default depends on the preset)"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image, WIDTHxHEIGHT"),
        )
        .arg(
            Arg::with_name(LEFTLOWER)
                .long(LEFTLOWER)
                .allow_hyphen_values(true)
                .short("l")
                .takes_value(true)
                .requires(RIGHTUPPER)
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse left lower corner"))
                .help("Left lower corner of the window, RE,IM"),
        )
        .arg(
            Arg::with_name(RIGHTUPPER)
                .long(RIGHTUPPER)
                .allow_hyphen_values(true)
                .short("r")
                .takes_value(true)
                .requires(LEFTLOWER)
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse right upper corner"))
                .help("Right upper corner of the window, RE,IM"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        200_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 200000",
                    )
                })
                .help("Maximum number of iterations per point"),
        )
        .arg(
            Arg::with_name(FRAMES)
                .long(FRAMES)
                .short("f")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        100_000,
                        "Could not parse frame count",
                        "Frame count must be between 1 and 100000",
                    )
                })
                .help("Number of frames to render"),
        )
        .arg(
            Arg::with_name(FORMAT)
                .long(FORMAT)
                .takes_value(true)
                .possible_values(&["ppm", "plain", "gif"])
                .help("Output container (default depends on the preset)"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value("1")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in solver"),
        )
        .get_matches()
}

fn parsed<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<Option<T>, Error> {
    match matches.value_of(name) {
        None => Ok(None),
        Some(value) => T::from_str(value)
            .map(Some)
            .map_err(|_| err_msg(format!("Could not parse --{} '{}'", name, value))),
    }
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let preset = parsed::<Preset>(matches, PRESET)?.ok_or_else(|| err_msg("no preset given"))?;
    let mut job = preset.job()?;

    let mut window = job.scan.window();
    if let (Some(leftlower), Some(rightupper)) =
        (matches.value_of(LEFTLOWER), matches.value_of(RIGHTUPPER))
    {
        let leftlower =
            parse_complex(leftlower).ok_or_else(|| err_msg("Error parsing left lower point"))?;
        let rightupper =
            parse_complex(rightupper).ok_or_else(|| err_msg("Error parsing right upper point"))?;
        window = PlaneWindow::from_corners(leftlower, rightupper)?;
        if let SweepRule::Zoom { factor, .. } = job.sweep.rule {
            job.sweep.rule = SweepRule::zoom(&window, factor);
        }
    }
    let (width, height) = match matches.value_of(SIZE) {
        Some(size) => parse_pair::<usize>(size, 'x')
            .ok_or_else(|| err_msg("Error parsing image dimensions"))?,
        None => (job.scan.width(), job.scan.height()),
    };
    job.scan = ScanParameters::new(width, height, window)?.with_projection(job.scan.projection());

    if let Some(iterations) = parsed::<usize>(matches, ITERATIONS)? {
        job.config = IterationConfig::with_max_iterations(job.config, iterations)?;
    }
    if let Some(frames) = parsed::<usize>(matches, FRAMES)? {
        job.sweep = FrameSweep {
            frames,
            rule: job.sweep.rule,
        };
    }
    if let Some(format) = parsed::<OutputFormat>(matches, FORMAT)? {
        job.format = format;
    }
    if let Some(output) = matches.value_of(OUTPUT) {
        job.output = PathBuf::from(output);
    }
    let threads = parsed::<usize>(matches, THREADS)?.unwrap_or(1);

    info!(
        "{}: {}x{} pixels, {} frame(s), {} iterations, writing {}",
        preset.name(),
        width,
        height,
        job.sweep.frames,
        job.config.max_iterations(),
        job.output.display()
    );
    job.run(threads)?;
    Ok(())
}

fn main() {
    env_logger::init();
    let matches = args();
    if let Err(e) = run(&matches) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
