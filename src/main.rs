use anyhow::Context;
use log::info;
use logreg_rs::config::ExperimentConfig;
use logreg_rs::experiment;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => ExperimentConfig::from_file(&path)
            .with_context(|| format!("failed to load config from {}", path))?,
        None => {
            info!("no config given, using the default experiment");
            ExperimentConfig::default()
        }
    };

    let reports = experiment::run(&config).context("experiment failed")?;
    for report in &reports {
        println!(
            "{:<8} train accuracy: {:.4}  test accuracy: {:.4}",
            report.classifier, report.train_accuracy, report.test_accuracy
        );
    }
    Ok(())
}
