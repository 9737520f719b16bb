/// Offline chunk generator: synthesizes one terrain chunk (optionally
/// skipping the erosion pass) and writes the serialized height field as JSON
/// for downstream mesh tooling.

use std::fs::File;
use std::io::BufWriter;

use anyhow::{Context, Result};
use clap::Parser;
use relief_core::{generate_heightfield, generate_terrain, ErosionBrush, TerrainParams};

#[derive(Parser, Debug)]
#[command(name = "relief", about = "Offline terrain chunk generator")]
struct Args {
    /// Chunk seed; equal seeds reproduce identical terrain.
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    #[arg(long, default_value_t = 512)]
    width: usize,

    #[arg(long, default_value_t = 512)]
    length: usize,

    /// Vertical scale of the raw height field.
    #[arg(long, default_value_t = 150.0)]
    amplitude: f32,

    /// World-space offset of the chunk, for tiling.
    #[arg(long, default_value_t = 0.0)]
    offset_x: f32,

    #[arg(long, default_value_t = 0.0)]
    offset_z: f32,

    /// Droplets simulated in the erosion pass.
    #[arg(long, default_value_t = 100_000)]
    droplets: u32,

    /// Emit the raw noise field without weathering it.
    #[arg(long)]
    skip_erosion: bool,

    /// Output path for the height-field JSON.
    #[arg(short, long, default_value = "chunk.json")]
    output: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut params = TerrainParams {
        seed: args.seed,
        width: args.width,
        length: args.length,
        amplitude: args.amplitude,
        world_offset: (args.offset_x, args.offset_z),
        ..TerrainParams::default()
    };
    params.erosion.droplets = args.droplets;

    let hf = if args.skip_erosion {
        generate_heightfield(&params)?
    } else {
        let brush = ErosionBrush::build(args.width, args.length, params.erosion.radius)?;
        generate_terrain(&params, &brush)?
    };

    eprintln!(
        "Generated {}x{} chunk (seed {}), elevation range {:.2}..{:.2}",
        hf.width,
        hf.length,
        args.seed,
        hf.min_elevation(),
        hf.max_elevation()
    );

    let file = File::create(&args.output)
        .with_context(|| format!("cannot create {}", args.output))?;
    serde_json::to_writer(BufWriter::new(file), &hf)
        .with_context(|| format!("cannot serialize height field to {}", args.output))?;
    eprintln!("Wrote {}", args.output);

    Ok(())
}
