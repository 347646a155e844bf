//! Lotmap Replay - sample book walkthrough and concurrent stress run.
//!
//! Seeds a handful of symbols, shows aggregation and removal, then hammers a
//! shared map from several threads while a reader takes snapshots, and checks
//! the final buckets against per-thread expectations.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;
use std::time::Instant;

use anyhow::{anyhow, bail, ensure, Context, Result};
use clap::Parser;
use lotmap_core::{AggregatingOrderMap, LotSize, MapConfig, Price, QuantityPolicy};
use lotmap_metrics::{Clock, LatencyHistogram};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const SAMPLE_SYMBOLS: [&str; 10] = [
    "NESTLEIND", "HDFCBANK", "RELIANCE", "TCS", "INFY",
    "SBIN", "ICICIBANK", "LT", "BAJFINANCE", "HINDUNILVR",
];

#[derive(Parser, Debug)]
#[command(name = "lotmap-replay", about = "Aggregating order map demo and stress run")]
struct Args {
    /// Writer threads in the stress phase.
    #[arg(long, default_value_t = 8)]
    threads: usize,

    /// Inserts issued by each writer.
    #[arg(long, default_value_t = 100_000)]
    inserts_per_thread: u64,

    /// Distinct symbols written to.
    #[arg(long, default_value_t = 64)]
    symbols: u32,

    /// Distinct price levels per symbol.
    #[arg(long, default_value_t = 32)]
    price_levels: i64,

    /// Base RNG seed; writer `i` uses `seed + i`.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Reject negative lot sizes in the demo instead of summing them.
    #[arg(long)]
    reject_negative: bool,

    /// Skip the sample book walkthrough.
    #[arg(long)]
    skip_demo: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    ensure!(args.threads > 0, "--threads must be at least 1");
    ensure!(args.symbols > 0, "--symbols must be at least 1");
    ensure!(args.price_levels > 0, "--price-levels must be at least 1");

    if !args.skip_demo {
        run_demo(&args).context("sample book walkthrough failed")?;
    }
    run_stress(&args).context("stress run failed")?;
    Ok(())
}

/// Walk the sample book: seed, aggregate, add a level, remove a symbol.
fn run_demo(args: &Args) -> Result<()> {
    let policy = if args.reject_negative {
        QuantityPolicy::RejectNegative
    } else {
        QuantityPolicy::Permissive
    };
    let map: AggregatingOrderMap<String> = AggregatingOrderMap::with_config(
        MapConfig::default()
            .with_symbol_capacity(SAMPLE_SYMBOLS.len())
            .with_quantity_policy(policy),
    );

    for symbol in SAMPLE_SYMBOLS {
        map.insert(symbol.to_string(), LotSize::new(10), Price(2));
    }

    // Same price aggregates, new price opens a level.
    map.insert("NESTLEIND".to_string(), LotSize::new(20), Price(2));
    map.insert("HDFCBANK".to_string(), LotSize::new(15), Price(4));

    println!("{}", map.display());
    ensure!(map.lot_size(&"NESTLEIND".to_string(), Price(2)) == Some(30));
    ensure!(map.level_count(&"HDFCBANK".to_string()) == 2);

    map.remove(&"NESTLEIND".to_string());
    println!("{}", map.display());
    ensure!(!map.contains_symbol(&"NESTLEIND".to_string()));

    match map.try_insert("TCS".to_string(), LotSize::new(-5), Price(2)) {
        Ok(()) => info!(
            lot_size = ?map.lot_size(&"TCS".to_string(), Price(2)),
            "negative lot accepted"
        ),
        Err(e) => warn!(error = %e, "negative lot rejected"),
    }

    Ok(())
}

/// Per-writer outcome.
struct WriterReport {
    expected: HashMap<(u32, i64), i64>,
    latency: LatencyHistogram,
}

fn run_stress(args: &Args) -> Result<()> {
    info!(
        threads = args.threads,
        inserts_per_thread = args.inserts_per_thread,
        symbols = args.symbols,
        price_levels = args.price_levels,
        "starting stress run"
    );

    let map: AggregatingOrderMap<u32> = AggregatingOrderMap::with_config(
        MapConfig::default()
            .with_symbol_capacity(args.symbols as usize)
            .with_level_capacity(args.price_levels as usize),
    );
    let writers_done = AtomicBool::new(false);
    let snapshots_taken = AtomicU64::new(0);

    let start = Instant::now();
    let reports = thread::scope(|s| {
        let reader = s.spawn(|| {
            let clock = Clock::new();
            let mut latency = LatencyHistogram::new();
            while !writers_done.load(Ordering::Acquire) {
                let t0 = clock.now();
                let snap = map.snapshot();
                latency.record(clock.elapsed_nanos(t0));
                drop(snap);
                snapshots_taken.fetch_add(1, Ordering::Relaxed);
            }
            latency
        });

        let writers: Vec<_> = (0..args.threads)
            .map(|i| {
                let map = &map;
                s.spawn(move || run_writer(map, args, args.seed.wrapping_add(i as u64)))
            })
            .collect();

        let reports: Vec<_> = writers.into_iter().map(|w| w.join()).collect();
        writers_done.store(true, Ordering::Release);
        (reports, reader.join())
    });
    let elapsed = start.elapsed();

    let (writer_results, reader_result) = reports;
    let mut expected: HashMap<(u32, i64), i64> = HashMap::new();
    let mut latency = LatencyHistogram::new();
    for result in writer_results {
        let Ok(report) = result else {
            bail!("writer thread panicked");
        };
        for (bucket, qty) in report.expected {
            *expected.entry(bucket).or_default() += qty;
        }
        latency
            .merge(&report.latency)
            .map_err(|e| anyhow!("merging writer latency: {e:?}"))?;
    }
    let Ok(snapshot_latency) = reader_result else {
        bail!("snapshot thread panicked");
    };

    let total = args.threads as u64 * args.inserts_per_thread;
    let rate = total as f64 / elapsed.as_secs_f64();
    info!(
        inserts = total,
        elapsed = ?elapsed,
        rate_per_sec = rate as u64,
        "stress run complete"
    );
    info!(latency = %latency.summary(), "insert latency");
    info!(
        snapshots = snapshots_taken.load(Ordering::Relaxed),
        latency = %snapshot_latency.summary(),
        "snapshot latency"
    );

    verify(&map, &expected)
}

fn run_writer(map: &AggregatingOrderMap<u32>, args: &Args, seed: u64) -> WriterReport {
    let mut rng = StdRng::seed_from_u64(seed);
    let clock = Clock::new();
    let mut latency = LatencyHistogram::new();
    let mut expected = HashMap::new();

    for _ in 0..args.inserts_per_thread {
        let symbol = rng.gen_range(0..args.symbols);
        let price = rng.gen_range(0..args.price_levels);
        let qty = rng.gen_range(1..=100i64);

        let t0 = clock.now();
        map.insert(symbol, LotSize::new(qty), Price(price));
        latency.record(clock.elapsed_nanos(t0));

        *expected.entry((symbol, price)).or_default() += qty;
    }

    WriterReport { expected, latency }
}

/// Compare every bucket in the map against the summed writer expectations.
fn verify(map: &AggregatingOrderMap<u32>, expected: &HashMap<(u32, i64), i64>) -> Result<()> {
    let snap = map.snapshot();
    ensure!(
        snap.level_count() == expected.len(),
        "bucket count mismatch: map has {}, writers produced {}",
        snap.level_count(),
        expected.len()
    );

    for (symbol, price, qty) in &snap {
        let want = expected
            .get(&(*symbol, price.0))
            .with_context(|| format!("unexpected bucket ({symbol}, {price})"))?;
        ensure!(
            *want == qty,
            "bucket ({symbol}, {price}) holds {qty}, expected {want}"
        );
    }

    info!(buckets = expected.len(), "aggregate totals verified");
    Ok(())
}
