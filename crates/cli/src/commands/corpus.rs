//! `patternlab corpus`: write the built-in test corpus to disk.

use patternlab_bench::TestCorpus;
use std::path::Path;

pub async fn run(output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let corpus = TestCorpus::default_corpus();
    corpus.save_split(output)?;

    let summary = corpus.summary();
    println!("📝 Wrote {} test cases to {}", summary.total_cases, output.display());
    for (category, count) in &summary.categories {
        println!("   {category:<24} {count}");
    }
    println!();
    for (difficulty, count) in &summary.difficulty_distribution {
        println!("   {difficulty:<24} {count}");
    }

    Ok(())
}
