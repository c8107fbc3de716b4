use clap::Parser;

use slog::info;
use slog::o;
use slog::warn;
use slog::Drain;
use slog::Level;
use slog::LevelFilter;
use slog_async::Async;
use slog_term::CompactFormat;
use slog_term::TermDecorator;
use std::error::Error;
use std::fmt;
use std::result::Result;
use thread_executor::Executor;
use thread_executor::DEFAULT_THREADS;

#[derive(Debug, Clone, PartialEq)]
struct JobFailed(u64);

impl fmt::Display for JobFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job {} failed", self.0)
    }
}

impl Error for JobFailed {}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(long, default_value_t = DEFAULT_THREADS)]
    threads: usize,

    #[arg(long, default_value_t = 100)]
    jobs: u64,

    /// Make every job whose index is a multiple of this value fail; 0 disables failures.
    #[arg(long, value_name = "K", default_value_t = 0)]
    fail_every: u64,

    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::Debug
    } else {
        Level::Info
    };
    let decorator = TermDecorator::new().stderr().build();
    let drain = CompactFormat::new(decorator).build().fuse();
    let drain = LevelFilter::new(drain, level).fuse();
    let drain = Async::new(drain).build().fuse();

    let log = slog::Logger::root(drain, o!());

    info!(log, "starting up"; "version" => env!("CARGO_PKG_VERSION"));
    info!(
        log,
        "using configuration";
        "threads" => cli.threads, "jobs" => cli.jobs, "fail-every" => cli.fail_every
    );

    let executor = Executor::builder()
        .threads(cli.threads)
        .logger(log.new(o!("component" => "executor")))
        .build()?;

    let fail_every = cli.fail_every;
    let handles: Vec<_> = (0..cli.jobs)
        .map(|i| {
            executor.submit(move || {
                if fail_every > 0 && i % fail_every == 0 {
                    Err(JobFailed(i))
                } else {
                    Ok(i + 1)
                }
            })
        })
        .collect();
    info!(log, "submitted"; "queued" => executor.size());

    let mut sum = 0;
    let mut failed = 0;
    for handle in &handles {
        match handle.wait() {
            Ok(value) => sum += value,
            Err(err) => {
                warn!(log, "{}", err);
                failed += 1;
            }
        }
    }
    executor.finish();

    println!("sum={} failed={}", sum, failed);
    Ok(())
}
