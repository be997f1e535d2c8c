//! Render ei-toolkit scenes to BMP files and compare snapshots.
//!
//! Usage:
//!   snapshot render <scene> <width> <height> [-o <output.bmp>]
//!   snapshot compare <expected.bmp> <actual.bmp> [-d <diff.bmp>]
//!   snapshot list

use std::path::Path;
use std::process;

use anyhow::{anyhow, bail, Context, Result};

use snapshot::{compare, diff_image, load_bmp, save_bmp, scenes};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            process::exit(2);
        }
    }
}

/// Returns `false` when a comparison found differences.
fn run(args: &[String]) -> Result<bool> {
    let Some(command) = args.first() else {
        print_usage();
        bail!("missing command");
    };
    match command.as_str() {
        "render" => cmd_render(&args[1..]).map(|_| true),
        "compare" => cmd_compare(&args[1..]),
        "list" => {
            for name in scenes::SCENES {
                println!("{name}");
            }
            Ok(true)
        }
        other => {
            print_usage();
            bail!("unknown command {other:?}")
        }
    }
}

fn print_usage() {
    eprintln!("snapshot: headless ei-toolkit scene renderer");
    eprintln!();
    eprintln!("  render <scene> <width> <height> [-o <output.bmp>]");
    eprintln!("  compare <expected.bmp> <actual.bmp> [-d <diff.bmp>]");
    eprintln!("  list");
}

/// Value following `flag` in `args`, if present.
fn option<'a>(args: &'a [String], flag: &str) -> Result<Option<&'a str>> {
    match args.iter().position(|a| a == flag) {
        None => Ok(None),
        Some(i) => args
            .get(i + 1)
            .map(|v| Some(v.as_str()))
            .ok_or_else(|| anyhow!("{flag} needs a value")),
    }
}

fn cmd_render(args: &[String]) -> Result<()> {
    let [scene, width, height, ..] = args else {
        bail!("usage: snapshot render <scene> <width> <height> [-o <output.bmp>]");
    };
    let width: u32 = width.parse().with_context(|| format!("invalid width {width:?}"))?;
    let height: u32 = height.parse().with_context(|| format!("invalid height {height:?}"))?;
    let output = match option(args, "-o")? {
        Some(path) => path.to_string(),
        None => format!("{scene}_{width}x{height}.bmp"),
    };

    let buf = scenes::render(scene, width, height)?;
    save_bmp(Path::new(&output), &buf).with_context(|| format!("writing {output}"))?;
    println!("saved {output}");
    Ok(())
}

fn cmd_compare(args: &[String]) -> Result<bool> {
    let [expected, actual, ..] = args else {
        bail!("usage: snapshot compare <expected.bmp> <actual.bmp> [-d <diff.bmp>]");
    };
    let a = load_bmp(Path::new(expected)).with_context(|| format!("reading {expected}"))?;
    let b = load_bmp(Path::new(actual)).with_context(|| format!("reading {actual}"))?;
    let result = compare(&a, &b).ok_or_else(|| {
        anyhow!(
            "size mismatch: {}x{} vs {}x{}",
            a.width,
            a.height,
            b.width,
            b.height
        )
    })?;
    println!("{result}");

    if let Some(path) = option(args, "-d")? {
        save_bmp(Path::new(path), &diff_image(&a, &b)).with_context(|| format!("writing {path}"))?;
        println!("diff saved to {path}");
    }
    Ok(result.identical())
}
