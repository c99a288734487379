use anyhow::Result;
use runcal::cache::Snapshot;
use runcal::cli::{self, CliArgs};
use runcal::client::HttpLinkChecker;
use runcal::config::Config;
use runcal::context::{AppContext, StandardContext};
use runcal::{Data, fetch_data};
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::env;
use std::sync::Arc;

fn load_config(args: &CliArgs, ctx: &dyn AppContext) -> Result<Config> {
    if let Some(path) = &args.config {
        return Config::load_from(path);
    }
    match Config::load(ctx) {
        Ok(config) => Ok(config),
        Err(e) if Config::is_missing_config_error(&e) => {
            log::info!("no config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => Err(e),
    }
}

fn print_summary(data: &Data) {
    let store = &data.store;
    println!("events:           {}", store.non_separators(&data.events));
    println!("past events:      {}", store.non_separators(&data.events_old));
    for year in &data.old_events {
        println!("  {}:           {}", year.year, store.non_separators(&year.events));
    }
    println!("obsolete events:  {}", data.events_obsolete.len());
    println!("groups:           {}", data.groups.len());
    println!("shops:            {}", data.shops.len());
    println!("tags:             {}", data.tags.sorted.len());
    println!("series:           {} active, {} old", data.series.active.len(), data.series.old.len());
    println!("parkrun weeks:    {}", data.parkrun_events.len());
}

#[tokio::main]
async fn main() -> Result<()> {
    let argv: Vec<String> = env::args().collect();
    let binary_name = argv.first().map_or("runcal", String::as_str);
    let args = cli::parse_args(argv.get(1..).unwrap_or_default())?;
    if args.help {
        cli::print_help(binary_name);
        return Ok(());
    }

    let level = if args.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    let ctx = StandardContext::new(args.root.clone());
    let config = load_config(&args, &ctx)?;

    let source = match &args.snapshot {
        Some(path) => {
            let source = Snapshot::load_from(path)?;
            if let Err(e) = Snapshot::save(&ctx, &source) {
                log::warn!("cannot cache snapshot: {}", e);
            }
            source
        }
        None => Snapshot::load(&ctx)?,
    };

    let today = args.today.unwrap_or_else(|| chrono::Local::now().date_naive());
    let data = fetch_data(&source, &config, today)?;

    if args.check_links {
        let checker = Arc::new(HttpLinkChecker::new(&config.link_check)?);
        let report = data.check_links(checker, config.link_check.per_domain_limit).await;
        for line in report.lines() {
            println!("{}", line);
        }
        println!("{} links checked, {} invalid", report.checked, report.failures.len());
    } else if args.json {
        println!("{}", serde_json::to_string_pretty(&data)?);
    } else {
        print_summary(&data);
    }
    Ok(())
}
