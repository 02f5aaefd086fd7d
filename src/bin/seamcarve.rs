// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate image;

use clap::{App, Arg};
use failure::ResultExt;
use log::debug;
use seamcarve::{BackendKind, CarveConfig, PixelBuffer, SeamCarver};
use std::process;

fn dimension(matches: &clap::ArgMatches, name: &str, fallback: u32) -> Result<u32, failure::Error> {
    match matches.value_of(name) {
        Some(value) => Ok(value
            .parse::<u32>()
            .with_context(|_| format!("--{} expects a whole number, got '{}'", name, value))?),
        None => Ok(fallback),
    }
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("seamcarve: {}", e);
        for cause in e.iter_causes() {
            eprintln!("  caused by: {}", cause);
        }
        process::exit(1);
    }
}

fn run() -> Result<(), failure::Error> {
    let matches = App::new("seamcarve")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Content-aware image resizing by seam carving")
        .arg(
            Arg::with_name("INPUT")
                .help("The image to carve")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("OUTPUT")
                .help("Where to write the carved image")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::with_name("width")
                .long("width")
                .takes_value(true)
                .help("Target width; defaults to the current width"),
        )
        .arg(
            Arg::with_name("height")
                .long("height")
                .takes_value(true)
                .help("Target height; defaults to the current height"),
        )
        .arg(
            Arg::with_name("batch-size")
                .long("batch-size")
                .short("b")
                .takes_value(true)
                .help("Most seams taken from one energy computation"),
        )
        .arg(
            Arg::with_name("threaded")
                .long("threaded")
                .help("Spread energy and recomposition over all CPUs"),
        )
        .arg(
            Arg::with_name("overlay")
                .long("overlay")
                .takes_value(true)
                .value_name("PATH")
                .help("Also write a copy with the last batch of seams painted in"),
        )
        .get_matches();

    // Both positionals are required, so clap has already refused a
    // command line without them.
    let input = matches.value_of("INPUT").unwrap_or_default();
    let output = matches.value_of("OUTPUT").unwrap_or_default();

    let source = image::open(input)
        .with_context(|_| format!("could not read '{}'", input))?
        .to_rgba();
    let buffer = PixelBuffer::from_image(&source)?;
    let (width, height) = buffer.dimensions();
    let target_width = dimension(&matches, "width", width)?;
    let target_height = dimension(&matches, "height", height)?;

    let mut config = CarveConfig::new();
    if let Some(size) = matches.value_of("batch-size") {
        let size = size
            .parse::<usize>()
            .with_context(|_| format!("--batch-size expects a whole number, got '{}'", size))?;
        config = config.set_batch_size(size);
    }
    if matches.is_present("threaded") {
        config = config.set_backend(BackendKind::Threaded);
    }

    let mut carver = SeamCarver::new(config);
    debug!("carving {} on the {} backend", input, carver.backend_name());
    carver.load(buffer);
    let (new_width, new_height) = carver.resize_to(target_width, target_height)?.dimensions();

    if let Some(path) = matches.value_of("overlay") {
        if let Some(overlay) = carver.overlay() {
            overlay
                .to_rgba_image()
                .save(path)
                .with_context(|_| format!("could not write '{}'", path))?;
        }
    }
    if let Some(carved) = carver.current() {
        carved
            .to_rgba_image()
            .save(output)
            .with_context(|_| format!("could not write '{}'", output))?;
    }

    println!("carved {}x{} -> {}x{}", width, height, new_width, new_height);
    Ok(())
}
