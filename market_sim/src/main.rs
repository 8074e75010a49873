use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use market_sim::{
    Error,
    cli::{
        commands::{Cli, Commands, OutputFormat, SinkKind},
        params::{apply_overrides, format_series_table},
    },
    config::resolve_config,
    generator::SeriesGenerator,
    models::order::{format_table, sample_orders},
    projection::{LabelStyle, project},
    random::SeededSource,
    session::ChartSession,
    sink::{ChartSink, JsonLinesSink, TracingSink},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries data; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = resolve_config(cli.config.as_deref()).context("failed to load configuration")?;

    match cli.command {
        Commands::Generate {
            timeframe,
            seed,
            format,
        } => {
            let config = apply_overrides(config, timeframe, seed, None);
            config.validate()?;

            let mut generator = SeriesGenerator::new(
                config.generator.clone(),
                SeededSource::from_optional_seed(config.seed),
            )
            .with_symbol(config.symbol.clone());
            let series = generator.generate_for(config.timeframe, config.start_price)?;

            match format {
                OutputFormat::Json => {
                    let style = LabelStyle::for_timeframe(config.timeframe);
                    let frame = project(&series, &config.palette, &style);
                    let out = serde_json::json!({ "series": series, "chart": frame });
                    println!("{}", serde_json::to_string_pretty(&out)?);
                }
                OutputFormat::Table => print!("{}", format_series_table(&series)),
            }
        }

        Commands::Live {
            sink,
            timeframe,
            ticks,
            seed,
            tick_ms,
        } => {
            let config = apply_overrides(config, timeframe, seed, tick_ms);
            let sink: Box<dyn ChartSink> = match sink {
                SinkKind::Json => Box::new(JsonLinesSink::new(io::stdout())),
                SinkKind::Log => Box::new(TracingSink),
            };
            let mut session = ChartSession::from_config(&config, sink)?;

            match ticks {
                Some(n) => session.start_limited(n)?,
                None => session.start()?,
            }
            run_until_done(&mut session).await?;
            session.close().await;
        }

        Commands::Orders { format } => {
            let orders = sample_orders();
            match format {
                OutputFormat::Table => print!("{}", format_table(&orders)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&orders)?),
            }
        }
    }

    Ok(())
}

/// Waits for the feed to run out, for its sink to fail or for Ctrl-C,
/// whichever comes first. A closed stdout ends the feed quietly.
async fn run_until_done<S>(session: &mut ChartSession<SeededSource, S>) -> Result<()>
where
    S: ChartSink + 'static,
{
    tokio::select! {
        res = tokio::signal::ctrl_c() => {
            res.context("failed to listen for Ctrl-C")?;
            info!("interrupted");
        }
        res = session.join() => match res {
            Err(Error::Sink(e)) if is_broken_pipe(&e) => info!("output closed"),
            other => other.context("live feed failed")?,
        },
    }
    Ok(())
}

fn is_broken_pipe(err: &Error) -> bool {
    matches!(err, Error::Io(e) if e.kind() == io::ErrorKind::BrokenPipe)
}
