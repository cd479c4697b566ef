#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

//! Measures how evenly the positional hash spreads random keys over a table.
//!
//! For a range of load factors the same key set goes into three setups: a fixed-size
//! `HashTable`, a fixed-size bucket array indexed with the standard library's SipHash,
//! and a `HashTable` whose caller grows it past a 0.75 load factor. The mean scan length
//! of a successful lookup and the longest chain are logged and plotted.

use std::collections::HashSet;
use std::hash::{DefaultHasher, Hash, Hasher};

use chaintable::{BucketStats, DEFAULT_LOAD_FACTOR_THRESHOLD, HashTable, logger};
use log::info;
use plotters::prelude::*;
use rand::{Rng, distr::Alphanumeric};

const BUCKETS: usize = 1024;
// Load factors from 0.25 to 4.0
const NUM_LOAD_FACTORS: usize = 10;
const MIN_LOAD_FACTOR: f64 = 0.25;
const MAX_LOAD_FACTOR: f64 = 4.0;
const MIN_KEY_LEN: usize = 4;
const MAX_KEY_LEN: usize = 16;
const OUTPUT: &str = "bucket_spread.png";

const METHODS: [&str; 3] = ["Positional hash", "SipHash (std)", "Positional hash, resized at 0.75"];

/// Per-method measurements, one point per load factor
#[derive(Debug, Default, Clone)]
struct Series {
    mean_scan: Vec<(f64, f64)>,
    longest_chain: Vec<(f64, f64)>,
}

impl Series {
    fn record(&mut self, load_factor: f64, stats: &BucketStats) {
        self.mean_scan.push((load_factor, stats.mean_successful_scan()));
        self.longest_chain.push((load_factor, stats.longest_chain as f64));
    }
}

fn random_keys(count: usize) -> Vec<String> {
    let mut rng = rand::rng();
    let mut seen = HashSet::with_capacity(count);
    let mut keys = Vec::with_capacity(count);

    while keys.len() < count {
        let len = rng.random_range(MIN_KEY_LEN..=MAX_KEY_LEN);
        let key: String = (0..len).map(|_| char::from(rng.sample(Alphanumeric))).collect();
        if seen.insert(key.clone()) {
            keys.push(key);
        }
    }

    keys
}

fn positional_fixed(keys: &[String]) -> Result<BucketStats, chaintable::TableError> {
    let mut table = HashTable::with_capacity(BUCKETS)?;
    for key in keys {
        table.set(key.as_str(), ());
    }
    Ok(table.stats())
}

fn positional_resized(keys: &[String]) -> Result<BucketStats, chaintable::TableError> {
    let mut table = HashTable::with_capacity(BUCKETS)?;
    for key in keys {
        table.set(key.as_str(), ());
        table.grow_if_loaded(DEFAULT_LOAD_FACTOR_THRESHOLD)?;
    }
    info!("    resized table ended with {} buckets", table.capacity());
    Ok(table.stats())
}

fn siphash_fixed(keys: &[String]) -> BucketStats {
    let mut lengths = vec![0_usize; BUCKETS];
    for key in keys {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        let index = (hasher.finish() % BUCKETS as u64) as usize;
        if let Some(len) = lengths.get_mut(index) {
            *len += 1;
        }
    }
    BucketStats::from_lengths(lengths)
}

fn draw_panel(
    area: &DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>,
    title: &str,
    y_desc: &str,
    lines: &[(&str, &[(f64, f64)])],
) -> Result<(), Box<dyn std::error::Error>> {
    let font_family = "sans-serif";
    let colors = [
        RGBColor(220, 50, 50), // Bright red
        RGBColor(50, 90, 220), // Bright blue
        RGBColor(50, 180, 50), // Bright green
    ];

    let max_y = lines
        .iter()
        .flat_map(|(_, points)| points.iter().map(|&(_, y)| y))
        .fold(1.0, f64::max) *
        1.1; // Add 10% margin

    let mut chart = ChartBuilder::on(area)
        .caption(title, (font_family, 28))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..MAX_LOAD_FACTOR * 1.05, 0.0..max_y)?;

    chart
        .configure_mesh()
        .x_desc("Load factor (entries / initial buckets)")
        .y_desc(y_desc)
        .axis_desc_style((font_family, 16))
        .draw()?;

    for (index, &(method, points)) in lines.iter().enumerate() {
        let color = colors.get(index % colors.len()).copied().unwrap_or(BLACK);
        let line_style = ShapeStyle::from(&color).stroke_width(2);

        chart
            .draw_series(LineSeries::new(points.iter().copied(), line_style))?
            .label(method)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));

        chart.draw_series(points.iter().map(|&point| Circle::new(point, 4, color.filled())))?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logger::initialize_logger();

    let load_factors: Vec<f64> = (0..NUM_LOAD_FACTORS)
        .map(|i| {
            MIN_LOAD_FACTOR +
                (MAX_LOAD_FACTOR - MIN_LOAD_FACTOR) * (i as f64) /
                    ((NUM_LOAD_FACTORS - 1) as f64)
        })
        .collect();
    let num_keys: Vec<usize> =
        load_factors.iter().map(|&load| (BUCKETS as f64 * load) as usize).collect();

    info!("Load factors: {load_factors:?}");
    info!("Number of keys: {num_keys:?}");

    // One key set, reused as prefixes so every method sees the same keys
    let keys = random_keys(num_keys.iter().copied().max().unwrap_or(0));

    let mut series = vec![Series::default(); METHODS.len()];

    for (&load_factor, &n_keys) in load_factors.iter().zip(&num_keys) {
        info!("Testing with {n_keys} keys");
        let sample = keys.get(..n_keys).unwrap_or(keys.as_slice());

        let results = [positional_fixed(sample)?, siphash_fixed(sample), positional_resized(sample)?];

        for ((method, stats), method_series) in METHODS.iter().zip(&results).zip(&mut series) {
            method_series.record(load_factor, stats);
            info!(
                "  {method}: mean scan = {:.2}, longest chain = {}, empty buckets = {}/{}",
                stats.mean_successful_scan(),
                stats.longest_chain,
                stats.empty_buckets,
                stats.buckets
            );
        }
    }

    let root = BitMapBackend::new(OUTPUT, (1600, 700)).into_drawing_area();
    root.fill(&WHITE)?;
    let areas = root.split_evenly((1, 2));

    let scan_lines: Vec<(&str, &[(f64, f64)])> =
        METHODS.iter().zip(&series).map(|(&m, s)| (m, s.mean_scan.as_slice())).collect();
    let chain_lines: Vec<(&str, &[(f64, f64)])> =
        METHODS.iter().zip(&series).map(|(&m, s)| (m, s.longest_chain.as_slice())).collect();

    if let [left, right] = areas.as_slice() {
        draw_panel(left, "Mean Successful Lookup Scan", "Comparisons", &scan_lines)?;
        draw_panel(right, "Longest Chain", "Entries in bucket", &chain_lines)?;
    }

    root.present()?;
    info!("Generated plot image: {OUTPUT}");

    Ok(())
}
