//! Compare raw and smoothed motion ratios for a still and an active subject

use synheart_motion::{analyze, analyze_raw, Point3, WindowWeights};

fn synthetic_track(amplitude: f64, frames: usize) -> Vec<Point3> {
    (0..frames)
        .map(|i| {
            let t = i as f64 * 0.2;
            Point3::new(amplitude * t.sin(), 100.0 + amplitude * t.cos(), 250.0)
        })
        .collect()
}

fn main() {
    let sleeping = synthetic_track(0.5, 500);
    let eating = synthetic_track(40.0, 500);
    let weights = match WindowWeights::recency_tiers(50) {
        Ok(weights) => weights,
        Err(e) => {
            eprintln!("Error: {e}");
            return;
        }
    };

    for (name, track) in [("sleeping", &sleeping), ("eating", &eating)] {
        match (analyze_raw(track, 5.0), analyze(track, 1.0, &weights)) {
            (Ok(raw), Ok(smoothed)) => println!(
                "{name} move: raw {:.1} %, smoothed {:.1} %",
                raw.motion_ratio, smoothed.motion_ratio
            ),
            (Err(e), _) | (_, Err(e)) => eprintln!("Error: {e}"),
        }
    }
}
