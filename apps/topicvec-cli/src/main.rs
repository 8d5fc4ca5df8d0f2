use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use topicvec_analysis::group::{Group, Steering};
use topicvec_analysis::ideal::ideal_fit;
use topicvec_analysis::simulate::simulate_score_differences;
use topicvec_analysis::stats::Histogram;
use topicvec_analysis::{labeled_pairs, pairwise_matrix, relationship_statistics, ProfileGenerator};
use topicvec_core::config::{expand_path, Config};
use topicvec_core::types::TopicRecord;
use topicvec_model::{CategoryTopicModel, RandomProjection};
use topicvec_topics::{read_topics, write_topics, Pipeline, WriteOptions};

/// topicvec - topic interest vectors for categorised text corpora
#[derive(Parser)]
#[command(name = "topicvec")]
#[command(about = "Generate and analyse per-topic interest vectors")]
#[command(version)]
struct Cli {
    /// Configuration environment (dev, test, prod)
    #[arg(long, global = true, env = "RUST_ENV")]
    config_env: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit the corpus and write the topic file
    Generate {
        /// Corpus directory (one sub-directory per category)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Output topic file
        #[arg(long)]
        output: Option<PathBuf>,
        /// Wrap the records in a versioned envelope
        #[arg(long)]
        versioned: bool,
    },
    /// Pairwise similarity matrix and relationship statistics of a topic file
    Similarity {
        /// Topic file to read
        topics: PathBuf,
    },
    /// Monte Carlo interest-score differences between synthetic users
    Simulate {
        /// Number of draws (overrides simulation.draws)
        #[arg(long)]
        draws: Option<usize>,
        /// Random seed (overrides simulation.seed)
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Steer a simulated group through a topic file so nobody freezes out
    Steer {
        /// Topic file to read
        topics: PathBuf,
        /// Index of the starting topic
        #[arg(long, default_value_t = 0)]
        start: usize,
        /// Number of rounds (overrides group.rounds)
        #[arg(long)]
        rounds: Option<usize>,
        /// Random seed (overrides group.seed)
        #[arg(long)]
        seed: Option<u64>,
    },
    /// How closely each topic matches its ideal interest shape
    IdealFit {
        /// Topic file to read
        topics: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry().with(fmt::layer().with_target(false)).with(filter).init();

    let config = match cli.config_env.as_deref() {
        Some(env_name) => Config::load_for_env(env_name),
        None => Config::load(),
    }
    .map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;

    match cli.command {
        Commands::Generate { input, output, versioned } => run_generate(&config, input, output, versioned),
        Commands::Similarity { topics } => run_similarity(&topics),
        Commands::Simulate { draws, seed } => run_simulate(&config, draws, seed),
        Commands::Steer { topics, start, rounds, seed } => run_steer(&config, &topics, start, rounds, seed),
        Commands::IdealFit { topics } => run_ideal_fit(&config, &topics),
    }
}

fn expanded(path: &Path) -> PathBuf {
    expand_path(path.to_string_lossy())
}

fn run_generate(config: &Config, input: Option<PathBuf>, output: Option<PathBuf>, versioned: bool) -> Result<()> {
    let mut pipeline_cfg = config.pipeline()?;
    if let Some(input) = input { pipeline_cfg.input_path = input; }
    if let Some(output) = output { pipeline_cfg.output_path = output; }
    pipeline_cfg.input_path = expanded(&pipeline_cfg.input_path);
    pipeline_cfg.output_path = expanded(&pipeline_cfg.output_path);
    let mut write_opts = WriteOptions::from(&config.output()?);
    write_opts.versioned |= versioned;

    println!("Topic Vector Generator\n======================");
    println!("Corpus: {}", pipeline_cfg.input_path.display());
    let output_path = pipeline_cfg.output_path.clone();
    let model = CategoryTopicModel::new(pipeline_cfg.embedding_dim, pipeline_cfg.min_token_len);
    let reducer = RandomProjection::new(pipeline_cfg.seed);
    let topics = Pipeline::new(&model, &reducer, pipeline_cfg).with_layout(config.layout()?).run()?;

    write_topics(&output_path, &topics, write_opts).with_context(|| format!("writing {}", output_path.display()))?;
    println!("\n✅ Wrote {} topics to {}", topics.len(), output_path.display());
    for t in &topics {
        let size = t.size.map_or_else(|| "-".to_string(), |s| s.to_string());
        println!("  {:>4}  {:<40} size {:>6}  ({:.3}, {:.3})", t.id, t.name, size, t.x, t.y);
    }
    Ok(())
}

fn load_topics(path: &Path) -> Result<Vec<TopicRecord>> {
    let path = expanded(path);
    read_topics(&path).with_context(|| format!("reading {}", path.display()))
}

fn run_similarity(path: &Path) -> Result<()> {
    let topics = load_topics(path)?;
    let names: Vec<String> = topics.iter().map(|t| t.name.clone()).collect();
    let vectors: Vec<Vec<f64>> = topics.iter().map(|t| t.vector.clone()).collect();
    let matrix = pairwise_matrix(&vectors, &names)?;

    println!("=== Topic cosine similarity matrix ===");
    let width = names.iter().map(|n| n.len()).max().unwrap_or(0).min(24);
    print!("{:width$}", "", width = width);
    for j in 0..matrix.len() { print!(" {:>7}", j); }
    println!();
    for (i, row) in matrix.values.iter().enumerate() {
        let label: String = matrix.labels[i].chars().take(width).collect();
        print!("{:<width$}", label, width = width);
        for v in row { print!(" {:>7.4}", v); }
        println!();
    }

    let pairs = labeled_pairs(&matrix);
    println!("\n📊 Similarity by relationship ({} pairs)", pairs.len());
    for (rel, s) in relationship_statistics(&pairs) {
        println!("  {:<16} n={:<6} mean={:.4} var={:.4} min={:.4} max={:.4}", rel.to_string(), s.count, s.mean, s.variance, s.min, s.max);
    }
    Ok(())
}

fn run_simulate(config: &Config, draws: Option<usize>, seed: Option<u64>) -> Result<()> {
    let mut sim = config.simulation()?;
    if let Some(draws) = draws { sim.draws = draws; }
    if let Some(seed) = seed { sim.seed = seed; }
    sim.validate()?;
    let generator = ProfileGenerator::from_config(&sim)?;
    let mut rng = StdRng::seed_from_u64(sim.seed);
    info!(draws = sim.draws, seed = sim.seed, dimension = sim.dimension, "starting simulation");

    let pb = ProgressBar::new(sim.draws as u64);
    pb.set_style(ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} draws ({percent}%)")?.progress_chars("#>-"));
    let report = simulate_score_differences(&generator, sim.draws, sim.histogram_bins, &mut rng, |n| pb.set_position(n as u64))?;
    pb.finish_and_clear();

    println!("--- Interest score difference ({} draws) ---", report.draws);
    println!("Mean difference:    {:.4}", report.difference.mean);
    println!("Std of difference:  {:.4}", report.difference.std_dev());
    println!("Max difference:     {:.4}", report.difference.max);
    println!("Min difference:     {:.4}", report.difference.min);
    println!("Mean score user 1:  {:.4}", report.first_user_mean);
    println!("Mean score user 2:  {:.4}", report.second_user_mean);
    print_histogram(&report.histogram);
    Ok(())
}

fn print_histogram(h: &Histogram) {
    let peak = h.counts.iter().copied().max().unwrap_or(0).max(1);
    println!("\n📊 Distribution of |s1 - s2|");
    for (i, &count) in h.counts.iter().enumerate() {
        let bar = "#".repeat(count * 40 / peak);
        println!("  {:>7.4} | {:<40} {}", h.bin_start(i), bar, count);
    }
}

fn run_steer(config: &Config, path: &Path, start: usize, rounds: Option<usize>, seed: Option<u64>) -> Result<()> {
    let mut group_cfg = config.group()?;
    if let Some(rounds) = rounds { group_cfg.rounds = rounds; }
    if let Some(seed) = seed { group_cfg.seed = seed; }
    let topics = load_topics(path)?;
    let mut rng = StdRng::seed_from_u64(group_cfg.seed);
    info!(members = group_cfg.group_size, rounds = group_cfg.rounds, seed = group_cfg.seed, "starting group simulation");
    let mut group = Group::random(&topics, start, group_cfg, &mut rng).context("building group")?;
    let reports = group.run()?;

    println!("=== Group steering ({} topics, {} members) ===", topics.len(), group.members().len());
    for r in &reports {
        let outcome = match r.steering {
            Steering::Stay => "stay".to_string(),
            Steering::SteerTo { topic, min_interest } => format!("-> {} (min interest {:.2})", topics[topic].name, min_interest),
            Steering::Halt(reason) => format!("halt: {}", reason),
        };
        println!(
            "  {:>3}  {:<32} v={:>6.2}  active {:>2}  at risk {:>2}  left {:>2}  {}",
            r.round, topics[r.topic].name, r.group_velocity, r.active, r.at_risk, r.left_out, outcome
        );
    }
    match group.halted() {
        Some(reason) => println!("\nHalted after {} rounds: {}", reports.len(), reason),
        None => println!("\nFinished {} rounds on {}", reports.len(), topics[group.current()].name),
    }
    Ok(())
}

fn run_ideal_fit(config: &Config, path: &Path) -> Result<()> {
    let ideal = config.ideal()?;
    let topics = load_topics(path)?;
    let report = ideal_fit(&topics, &ideal)?;

    println!("=== Ideal fit ({:.0}/{:.0}/{:.0}) ===", ideal.primary * 100.0, ideal.secondary * 100.0, ideal.residual_share * 100.0);
    println!("Average fit: {:.4}", report.average);
    if let (Some(best), Some(worst)) = (report.best(), report.worst()) {
        println!("Closest to ideal:   {} ({:.4})", best.name, best.score);
        println!("Furthest from ideal: {} ({:.4})", worst.name, worst.score);
    }
    for e in &report.entries {
        println!("  {:<40} {:.4}", e.name, e.score);
    }
    Ok(())
}
