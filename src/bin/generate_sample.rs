use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};

use outcar_compare::data::align::PressureGrid;

/// Gaussian peak of height `height` centred on `centre`.
fn peak(energy: f64, centre: f64, width: f64, height: f64) -> f64 {
    let z = (energy - centre) / width;
    height * (-0.5 * z * z).exp()
}

/// Reproducible measurement noise: splitmix64 feeding a Box-Muller draw.
struct Noise(u64);

impl Noise {
    fn uniform(&mut self) -> f64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        ((z ^ (z >> 31)) >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Normally distributed value with zero mean.
    fn sample(&mut self, std_dev: f64) -> f64 {
        let radius = (-2.0 * self.uniform().max(f64::MIN_POSITIVE).ln()).sqrt();
        radius * (std::f64::consts::TAU * self.uniform()).cos() * std_dev
    }
}

const HEADER: [&str; 10] = [
    "Pressure", "Enthalpy", "Volume", "Bandgap1", "Bandgap2", "MagTot", "Fe1", "Fe2", "O1", "O2",
];

/// Toy compound sampled on the canonical grid, minus `skipped` checkpoints.
struct Compound {
    name: &'static str,
    enthalpy0: f64,
    volume0: f64,
    bandgap: f64,
    moment: f64,
    /// Checkpoints this compound's run did not reach.
    skipped: &'static [f64],
    max_pressure: f64,
}

fn write_table(compound: &Compound, noise: &mut Noise) -> Result<usize> {
    let path = format!("{}.csv", compound.name);
    let mut writer = csv::Writer::from_path(&path).with_context(|| format!("creating {path}"))?;
    writer.write_record(HEADER)?;

    let mut rows = 0;
    for &p in PressureGrid::canonical().checkpoints() {
        if compound.skipped.contains(&p) || p > compound.max_pressure {
            continue;
        }
        let volume = compound.volume0 * (1.0 + p / 400.0).powf(-0.25);
        let enthalpy = compound.enthalpy0 + p * volume * 6.2415e-4 + noise.sample(0.002);
        let gap = (compound.bandgap - p * 0.002).max(0.0);
        let moment = (compound.moment - p * 0.004).max(0.0);
        let ion = moment / 2.0;

        let row = [
            p,
            enthalpy,
            volume,
            gap,
            gap + 0.1,
            moment,
            ion,
            ion + noise.sample(0.01),
            -0.05 * ion,
            -0.05 * ion,
        ];
        writer.write_record(row.iter().map(|v| format!("{v:.6}")))?;
        rows += 1;
    }
    writer.flush()?;
    Ok(rows)
}

fn write_dos(name: &str, peaks: &[(f64, f64, f64)], shift: f64, noise: &mut Noise) -> Result<usize> {
    let path = format!("{name}.dos");
    let file = File::create(&path).with_context(|| format!("creating {path}"))?;
    let mut out = BufWriter::new(file);

    let energies: Vec<f64> = (0..600).map(|i| -10.0 + i as f64 * 0.025).collect();
    for &e in &energies {
        let up: f64 = peaks.iter().map(|&(mu, sigma, amp)| peak(e, mu, sigma, amp)).sum();
        let down: f64 = peaks
            .iter()
            .map(|&(mu, sigma, amp)| peak(e, mu + shift, sigma, amp))
            .sum();
        let up = (up + noise.sample(0.01)).abs();
        let down = (down + noise.sample(0.01)).abs();
        writeln!(out, "{up:.5} {down:.5} {e:.4}")?;
    }
    out.flush()?;
    Ok(energies.len())
}

fn main() -> Result<()> {
    let mut noise = Noise(42);

    let compounds = [
        Compound {
            name: "FeO",
            enthalpy0: -17.2,
            volume0: 20.4,
            bandgap: 1.9,
            moment: 4.0,
            skipped: &[],
            max_pressure: 380.0,
        },
        Compound {
            name: "MnO",
            enthalpy0: -18.0,
            volume0: 22.0,
            bandgap: 2.4,
            moment: 5.0,
            skipped: &[6.0, 60.0, 200.0],
            max_pressure: 380.0,
        },
        Compound {
            name: "CoO",
            enthalpy0: -15.9,
            volume0: 19.3,
            bandgap: 1.6,
            moment: 3.0,
            skipped: &[0.0, 10.0],
            max_pressure: 240.0,
        },
    ];

    for compound in &compounds {
        let rows = write_table(compound, &mut noise)?;
        println!("Wrote {rows} pressure points to {}.csv", compound.name);
    }

    let dos_peaks: [(&str, Vec<(f64, f64, f64)>, f64); 3] = [
        ("FeO", vec![(-6.0, 0.8, 1.2), (-1.5, 0.4, 2.0), (2.5, 0.6, 1.0)], 1.2),
        ("MnO", vec![(-5.5, 0.9, 1.0), (-2.0, 0.5, 2.4), (3.0, 0.5, 1.4)], 1.8),
        ("CoO", vec![(-6.5, 0.7, 1.3), (-1.0, 0.3, 1.8), (2.0, 0.7, 0.9)], 0.8),
    ];
    for (name, peaks, shift) in &dos_peaks {
        let points = write_dos(name, peaks, *shift, &mut noise)?;
        println!("Wrote {points} DOS points to {name}.dos");
    }

    Ok(())
}
