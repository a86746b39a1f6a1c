//! `patternlab bench`: compare every enabled pattern over the test corpus.

use patternlab_bench::{BenchRunner, RunReport, TestCorpus};
use std::path::PathBuf;

use super::{build_agents, enabled_kinds, load_config};

pub async fn run(
    category: Option<String>,
    mock: bool,
    config_path: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path).map_err(|e| format!("Failed to load config: {e}"))?;

    let corpus_path = &config.testing.corpus_path;
    let corpus = if corpus_path.exists() {
        TestCorpus::load(corpus_path)?
    } else {
        println!("📝 No corpus at {}, generating the default one", corpus_path.display());
        let corpus = TestCorpus::default_corpus();
        match corpus_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(dir) => corpus.save_split(dir)?,
            None => corpus.save(corpus_path)?,
        }
        corpus
    };

    let cases = corpus.flatten(category.as_deref());
    if cases.is_empty() {
        return Err(match category {
            Some(c) => format!("No test cases in category '{c}'").into(),
            None => "Test corpus is empty".into(),
        });
    }

    let kinds = enabled_kinds(&config);
    if kinds.is_empty() {
        return Err("No patterns enabled in [agents]".into());
    }

    println!(
        "🧪 Running {} cases against {} patterns ({} runs)",
        cases.len(),
        kinds.len(),
        cases.len() * kinds.len()
    );

    let mut runner = BenchRunner::new(build_agents(&config, &kinds, mock)?);
    let report = runner.run(&cases).await;

    print_summary(&report);

    let path = report.save(&config.testing.output_dir)?;
    println!();
    println!("💾 Results saved to {}", path.display());

    Ok(())
}

fn print_summary(report: &RunReport) {
    println!();
    println!(
        "   {:<20} {:>6} {:>8} {:>8} {:>10} {:>8}",
        "Pattern", "Tests", "Success", "Failed", "Avg time", "Actions"
    );
    println!("   {}", "-".repeat(65));
    for s in report.summary() {
        println!(
            "   {:<20} {:>6} {:>8} {:>8} {:>9.2}s {:>8.1}",
            s.agent, s.tests, s.successes, s.failures, s.avg_duration_secs, s.avg_actions
        );
    }
    println!();
    println!(
        "   Total: {} runs, {} succeeded, {} failed",
        report.total_tests,
        report.successes(),
        report.failures()
    );
}
