use std::fs::File;
use std::io::{BufWriter, Write};
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use libscanfill::{MaskSurface, PolygonFiller, YAxis};
use log::{error, info};

fn main() {
    env_logger::init();

    // Use std::env for argument parsing
    let mut args = std::env::args().skip(1);
    let vertex_path = match args.next() {
        Some(val) => val,
        None => {
            eprintln!("Missing required argument: vertex_file");
            print_usage_and_exit();
        }
    };

    let mut width: usize = 800;
    let mut height: usize = 600;
    let mut frames: Option<u64> = None;
    let mut y_axis = YAxis::Down;
    let mut pgm_path: Option<String> = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--width" => width = parse_number(&arg, args.next()),
            "--height" => height = parse_number(&arg, args.next()),
            "--frames" => frames = Some(parse_number(&arg, args.next())),
            "--flip-y" => y_axis = YAxis::Up,
            "--pgm" => match args.next() {
                Some(val) => pgm_path = Some(val),
                None => {
                    eprintln!("Expected a filename after --pgm");
                    print_usage_and_exit();
                }
            },
            _ => {
                eprintln!("Unknown argument: {}", arg);
                print_usage_and_exit();
            }
        }
    }

    let mut filler = PolygonFiller::builder()
        .max_height(height)
        .y_axis(y_axis)
        .build();
    let vertex_count = match filler.load_file(&vertex_path) {
        Ok(n) => n,
        Err(e) => {
            eprintln!("Could not load polygon from {}: {}", vertex_path, e);
            process::exit(1);
        }
    };
    println!("Vertices: {}", vertex_count);
    println!("Edges in edge table: {}", filler.edge_count());

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        if let Err(e) = ctrlc::set_handler(move || running.store(false, Ordering::SeqCst)) {
            eprintln!("Could not install Ctrl-C handler: {}", e);
            process::exit(1);
        }
    }

    // Redraw once per frame until stopped, like a window loop would
    let mut mask = MaskSurface::new(width, filler.limits().max_height);
    let start = Instant::now();
    let mut rendered: u64 = 0;
    while running.load(Ordering::SeqCst) && frames.map_or(true, |n| rendered < n) {
        match filler.render_into(&mut mask) {
            Ok(stats) => {
                info!("frame {}: {} spans, peak {} active edges", rendered, stats.spans, stats.peak_active);
            }
            Err(e) => {
                error!("frame {} failed: {}", rendered, e);
                process::exit(1);
            }
        }
        rendered += 1;
    }
    let elapsed = start.elapsed();
    println!(
        "Rendered {} frames in {:.3} seconds ({:.3} ms/frame)",
        rendered,
        elapsed.as_secs_f64(),
        if rendered > 0 { elapsed.as_secs_f64() * 1000.0 / rendered as f64 } else { 0.0 }
    );

    if let Some(path) = pgm_path {
        if let Err(e) = write_pgm(&path, &mask) {
            eprintln!("Could not write {}: {}", path, e);
            process::exit(1);
        }
        println!("Mask written to {}", path);
    }
}

/// Binary greymap (P5) of the mask.
fn write_pgm(path: &str, mask: &MaskSurface) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write!(out, "P5\n{} {}\n255\n", mask.width(), mask.height())?;
    out.write_all(mask.data())?;
    out.flush()
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: Option<String>) -> T {
    match value.as_deref().map(str::parse::<T>) {
        Some(Ok(n)) => n,
        _ => {
            eprintln!("{} expects a non-negative integer", flag);
            print_usage_and_exit();
        }
    }
}

fn print_usage_and_exit() -> ! {
    eprintln!("Usage: demo <vertex_file> [--width N] [--height N] [--frames N] [--flip-y] [--pgm <out.pgm>]");
    process::exit(1);
}
