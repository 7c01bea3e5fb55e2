//! Offline trainer: reads the dataset, fits the recommendation classifier,
//! and writes the artifacts the serving binary loads at startup.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;

use learning_advisor::data::DatasetStore;
use learning_advisor::model::RecommendationMap;
use learning_advisor::training::train;

#[derive(Parser)]
#[command(name = "train")]
#[command(about = "Train the recommendation classifier from the learning dataset")]
struct Args {
    /// Student dataset CSV
    #[arg(long, default_value = "data/personalized_learning.csv")]
    data: PathBuf,
    /// Where to write the classifier artifact
    #[arg(long, default_value = "artifacts/recommendation_model.json")]
    model_out: PathBuf,
    /// Where to write the recommendation map artifact
    #[arg(long, default_value = "artifacts/recommendation_map.json")]
    map_out: PathBuf,
    #[arg(long, default_value_t = 100)]
    trees: usize,
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    let args = Args::parse();

    let store = DatasetStore::from_csv(&args.data)
        .with_context(|| format!("loading dataset from {}", args.data.display()))?;
    info!("loaded {} student records", store.len());

    let outcome = train(store.records(), args.trees, args.seed)
        .context("training recommendation classifier")?;
    info!(
        "trained {} trees on {} records, holdout {} records, accuracy {:.2}%",
        args.trees,
        outcome.train_rows,
        outcome.test_rows,
        outcome.model.accuracy * 100.0
    );

    for out in [&args.model_out, &args.map_out] {
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating artifact directory {}", parent.display()))?;
        }
    }
    outcome
        .model
        .save(&args.model_out)
        .with_context(|| format!("writing classifier to {}", args.model_out.display()))?;
    RecommendationMap::defaults()
        .save(&args.map_out)
        .with_context(|| format!("writing recommendation map to {}", args.map_out.display()))?;

    info!(
        "artifacts saved: {} and {}",
        args.model_out.display(),
        args.map_out.display()
    );
    Ok(())
}
