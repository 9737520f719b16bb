//! Diagnostic visualizer — writes terrain debug PNGs to data/debug/.
//! Not part of the main pipeline; no tests, no clippy target.

use std::fs;
use std::path::Path;

use relief_core::{
    generate_heightfield, generate_terrain, ErosionBrush, HeightField, TerrainParams,
};

const W: usize = 512;
const L: usize = 512;

// ── Colour helpers ────────────────────────────────────────────────────────────

/// Elevation → grayscale against a shared [lo, hi] range.
fn gray(v: f32, lo: f32, hi: f32) -> [u8; 3] {
    let t = ((v - lo) / (hi - lo).max(1e-6)).clamp(0.0, 1.0);
    let c = (t * 255.0) as u8;
    [c, c, c]
}

/// Signed elevation change → red (eroded) through white (unchanged) to blue
/// (deposited), saturating at ±`scale`.
fn diff_color(delta: f32, scale: f32) -> [u8; 3] {
    let t = (delta / scale).clamp(-1.0, 1.0);
    if t < 0.0 {
        let o = (255.0 * (1.0 + t)) as u8;
        [255, o, o]
    } else {
        let o = (255.0 * (1.0 - t)) as u8;
        [o, o, 255]
    }
}

fn write_png(path: &Path, hf: &HeightField, color: impl Fn(usize) -> [u8; 3]) {
    let mut img = image::RgbImage::new(hf.width as u32, hf.length as u32);
    for z in 0..hf.length {
        for x in 0..hf.width {
            let [rv, gv, bv] = color(z * hf.width + x);
            img.put_pixel(x as u32, z as u32, image::Rgb([rv, gv, bv]));
        }
    }
    img.save(path)
        .unwrap_or_else(|e| panic!("failed to save {}: {e}", path.display()));
    println!("Wrote {}", path.display());
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let params = TerrainParams {
        seed: 42,
        width: W,
        length: L,
        ..TerrainParams::default()
    };

    println!("Generating raw height field ({W}x{L})…");
    let raw = generate_heightfield(&params).expect("raw generation failed");

    println!("Building erosion brush (radius {})…", params.erosion.radius);
    let brush = ErosionBrush::build(W, L, params.erosion.radius).expect("brush build failed");

    println!("Eroding ({} droplets)…", params.erosion.droplets);
    let eroded = generate_terrain(&params, &brush).expect("erosion pass failed");

    let out_dir = Path::new("data/debug");
    fs::create_dir_all(out_dir).expect("cannot create data/debug/");

    // Shared normalization so the two grayscale renders are comparable.
    let lo = raw.min_elevation().min(eroded.min_elevation());
    let hi = raw.max_elevation().max(eroded.max_elevation());

    // ── 1. raw_heightfield.png ───────────────────────────────────────────────
    write_png(&out_dir.join("raw_heightfield.png"), &raw, |i| {
        gray(raw.data[i], lo, hi)
    });

    // ── 2. eroded_heightfield.png ────────────────────────────────────────────
    write_png(&out_dir.join("eroded_heightfield.png"), &eroded, |i| {
        gray(eroded.data[i], lo, hi)
    });

    // ── 3. erosion_delta.png ─────────────────────────────────────────────────
    // Saturate the diverging map at the 99th-percentile |change| so a few
    // deep carves do not wash out the rest.
    {
        let mut magnitudes: Vec<f32> = raw
            .data
            .iter()
            .zip(&eroded.data)
            .map(|(a, b)| (b - a).abs())
            .collect();
        magnitudes.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let scale = magnitudes[magnitudes.len() * 99 / 100].max(1e-3);

        write_png(&out_dir.join("erosion_delta.png"), &eroded, |i| {
            diff_color(eroded.data[i] - raw.data[i], scale)
        });
    }
}
