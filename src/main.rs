//! # chatfold CLI
//!
//! Command-line interface for the chatfold library.

use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use chatfold::ChatfoldError;
use chatfold::cli::{Args, Stage};
use chatfold::core::Archive;

fn main() {
    let args = <Args as ClapParser>::parse();
    init_tracing(&args);

    if let Err(e) = run(&args) {
        eprintln!("❌ Error: {}", e);
        process::exit(if e.is_usage() { 2 } else { 1 });
    }
}

fn init_tracing(args: &Args) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<(), ChatfoldError> {
    let total_start = Instant::now();
    let archive = Archive::new(args.out.clone(), args.archive_config());

    // Print header
    println!("📦 chatfold v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("🧭 Stage:   {}", args.stage);
    if let Some(ref input) = args.input {
        println!("📂 Input:   {}", input.display());
    }
    println!("💾 Output:  {}", args.out.display());
    println!();

    match args.stage {
        Stage::Month => {
            let input = args
                .input
                .as_deref()
                .ok_or_else(|| ChatfoldError::usage("the month stage requires --input"))?;

            println!("⏳ Parsing archive...");
            let stats = archive.run(input)?;
            if stats.used_fallback {
                println!("🔁 Streaming failed, used a full parse instead");
            }

            println!();
            println!("✅ Done! Wrote {} messages into by_month + topic previews", stats.messages);
            println!();
            println!("📊 Summary:");
            println!("   Conversations: {}", stats.conversations);
            println!("   Messages:      {}", stats.messages);
            println!("   Month files:   {}", stats.months.len());
            println!("   Topics:        {}", stats.topics());
        }
        Stage::TopicPreview => {
            println!("🔍 Detecting topic boundaries...");
            let previews = archive.topic_preview()?;
            println!();
            println!("✅ Done! Topic previews generated");
            println!();
            println!("📊 Summary:");
            println!("   Previews: {}", previews.len());
            println!("   Topics:   {}", previews.values().sum::<usize>());
        }
        Stage::SplitTopics => {
            println!("✂️  Splitting topics...");
            let summary = archive.split_topics(args.month.as_deref(), args.topics_file.as_deref())?;
            println!();
            println!("✅ Done! Topics split");
            println!();
            println!("📊 Summary:");
            println!("   Topics: {}", summary.topics);
            println!("   Index:  {}", summary.index.display());
        }
    }

    println!();
    println!("⚡ Total time: {:.2}s", total_start.elapsed().as_secs_f64());

    Ok(())
}
