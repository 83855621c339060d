use clap::Parser;
use fiqh::{
    ConfigDb,
    DataDir,
    Knowledge,
    answer,
    cli::{self, Cli, Command, ConfigAction},
    config_db,
    error,
    mcp,
};
use serde_json::json;
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if let Ok(env) = std::env::var("FIQH_LOG") {
        EnvFilter::new(env)
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> error::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let data_dir = DataDir::resolve(cli.data_dir.as_deref())?;
    let config_db = ConfigDb::open(&data_dir.config_db())?;

    match cli.command {
        Command::Ask(args) => {
            let knowledge = Knowledge::from_settings(&config_db, &data_dir)?;
            let answer = answer::resolve(&args.question, &knowledge);
            if args.json {
                println!("{}", answer::format_json(&answer)?);
            } else {
                println!("{}", answer::format_human(&answer));
            }
        }
        Command::Explain(args) => {
            let knowledge = Knowledge::from_settings(&config_db, &data_dir)?;
            cmd_explain(&knowledge, &args)?;
        }
        Command::Topics(args) => {
            let knowledge = Knowledge::from_settings(&config_db, &data_dir)?;
            cmd_topics(&knowledge, args.json)?;
        }
        Command::Stats(args) => {
            let knowledge = Knowledge::from_settings(&config_db, &data_dir)?;
            cmd_stats(&knowledge, &data_dir, args.json)?;
        }
        Command::Config { action } => match action {
            ConfigAction::Get { key } => {
                let value = config_db.get_setting(&key)?.ok_or_else(|| {
                    error::Error::NotFound {
                        kind: "setting",
                        name: key.clone(),
                    }
                })?;
                println!("{value}");
            }
            ConfigAction::Set { key, value } => {
                let previous = config_db.get_setting(&key)?;
                config_db.set_setting(&key, &value)?;
                // Reject values that would leave the knowledge base unloadable.
                if let Err(e) = Knowledge::from_settings(&config_db, &data_dir)
                {
                    warn!(key = %key, error = %e, "rejected setting");
                    match previous {
                        Some(old) => config_db.set_setting(&key, &old)?,
                        None => {
                            config_db.remove_setting(&key)?;
                        }
                    }
                    return Err(e);
                }
                println!("Set '{key}' = '{value}'");
            }
            ConfigAction::Unset { key } => {
                if !config_db.remove_setting(&key)? {
                    return Err(error::Error::NotFound {
                        kind: "setting",
                        name: key,
                    });
                }
                println!("Removed setting '{key}'");
            }
            ConfigAction::List { json } => {
                config_list(&config_db, json)?;
            }
        },
        Command::Mcp => {
            let knowledge = Knowledge::from_settings(&config_db, &data_dir)?;
            mcp::run_mcp(knowledge)?;
        }
        Command::Completions(args) => args.generate(),
    }

    Ok(())
}

fn cmd_explain(
    knowledge: &Knowledge,
    args: &cli::ExplainArgs,
) -> error::Result<()> {
    let matcher = knowledge.matcher();
    let card = matcher.scores(&args.question);
    let entries = knowledge.catalog.entries();
    let chosen = card.best.filter(|_| card.confident);

    if args.json {
        let rows: Vec<_> = card
            .scores
            .iter()
            .zip(entries)
            .filter(|(score, _)| args.all || score.total() > 0)
            .map(|(score, entry)| {
                json!({
                    "title": entry.title,
                    "direct": score.direct,
                    "partial": score.partial,
                    "stem": score.stem,
                    "total": score.total(),
                })
            })
            .collect();
        let out = json!({
            "normalized": card.normalized,
            "tokens": card.tokens,
            "minScore": knowledge.weights.min_score,
            "bestScore": card.best_score(),
            "match": chosen.map(|idx| entries[idx].title.as_str()),
            "scores": rows,
        });
        println!("{}", serde_json::to_string(&out)?);
        return Ok(());
    }

    println!("Normalized: {}", card.normalized);
    println!("Tokens: {}", card.tokens.join(", "));
    println!(
        "Threshold: {} (best score {})",
        knowledge.weights.min_score,
        card.best_score()
    );
    println!();
    println!("{:>6} {:>7} {:>5} {:>6}  topic", "direct", "partial", "stem", "total");
    for (idx, (score, entry)) in card.scores.iter().zip(entries).enumerate() {
        if !args.all && score.total() == 0 {
            continue;
        }
        let marker = if chosen == Some(idx) { " <- match" } else { "" };
        println!(
            "{:>6} {:>7} {:>5} {:>6}  {}{marker}",
            score.direct,
            score.partial,
            score.stem,
            score.total(),
            entry.title
        );
    }
    if chosen.is_none() {
        println!("\nNo confident match.");
    }
    Ok(())
}

fn cmd_topics(knowledge: &Knowledge, json: bool) -> error::Result<()> {
    let entries = knowledge.catalog.entries();

    if json {
        let topics: Vec<_> = entries
            .iter()
            .map(|e| json!({ "title": e.title, "keys": e.keys }))
            .collect();
        println!("{}", serde_json::to_string(&topics)?);
    } else {
        for entry in entries {
            println!("{}\t{}", entry.title, entry.keys.join(", "));
        }
        println!("\n{} topic(s)", entries.len());
    }
    Ok(())
}

fn cmd_stats(
    knowledge: &Knowledge,
    data_dir: &DataDir,
    json: bool,
) -> error::Result<()> {
    let key_count: usize =
        knowledge.catalog.entries().iter().map(|e| e.keys.len()).sum();
    let topic_count = knowledge.stems.topics().len();
    let weights = &knowledge.weights;

    if json {
        let out = json!({
            "dataDir": data_dir.root().display().to_string(),
            "entries": knowledge.catalog.len(),
            "keys": key_count,
            "stems": knowledge.stems.len(),
            "stemTopics": topic_count,
            "weights": weights,
        });
        println!("{}", serde_json::to_string(&out)?);
    } else {
        println!("Data directory: {}", data_dir.root().display());
        println!("Entries: {}", knowledge.catalog.len());
        println!("Key phrases: {key_count}");
        println!(
            "Stems: {} ({topic_count} topics)",
            knowledge.stems.len()
        );
        println!(
            "Weights: direct={} partial={} stem={} min_score={} stem_prefix_len={}",
            weights.direct,
            weights.partial,
            weights.stem,
            weights.min_score,
            weights.stem_prefix_len
        );
    }
    Ok(())
}

fn config_list(config_db: &ConfigDb, json: bool) -> error::Result<()> {
    let settings = config_db.list_settings()?;

    if json {
        let map: serde_json::Map<String, serde_json::Value> = settings
            .into_iter()
            .map(|(k, v)| (k, serde_json::Value::String(v)))
            .collect();
        println!("{}", serde_json::Value::Object(map));
    } else if settings.is_empty() {
        println!("No settings stored (known: {}).", config_db::KNOWN_SETTINGS.join(", "));
    } else {
        for (key, value) in &settings {
            println!("{key}\t{value}");
        }
    }
    Ok(())
}
