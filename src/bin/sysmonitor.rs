use anyhow::{anyhow, Context, Result};
use clap::Parser;
use env_logger::{Builder, Env};
use log::info;

use std::path::PathBuf;
use std::time::Duration;

use WinDeck::monitor::{
    CancelToken, Monitor, MonitorOptions, RegistrySoftwareSource, SystemProcessSource,
};
use WinDeck::{metrics, DeckConfig};

#[derive(Parser, Debug)]
#[command(
    name = "sysmonitor",
    version,
    about = "Watch running processes and installed software, log every change"
)]
struct Opt {
    /// Log file (overwritten on start). Default: WD_MONITOR_LOG or <data_local_dir>/SysMonitor/monitor.log
    #[arg(long)]
    log: Option<PathBuf>,
    /// Poll interval in milliseconds (default: WD_POLL_MS or 500)
    #[arg(long)]
    poll_ms: Option<u64>,
    /// Extra process name to ignore (repeatable)
    #[arg(long = "deny")]
    deny: Vec<String>,
}

fn init_logger() {
    // warn по умолчанию: события печатаются в консоль, info-логи им мешают.
    Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();

    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let opt = Opt::parse();

    let mut cfg = DeckConfig::from_env().with_extra_denylist(opt.deny);
    if let Some(p) = opt.log {
        cfg = cfg.with_monitor_log(p);
    }
    if let Some(ms) = opt.poll_ms {
        cfg = cfg.with_poll_interval_ms(ms);
    }
    info!("sysmonitor: {}", cfg);

    let cancel = CancelToken::new();
    {
        let c = cancel.clone();
        ctrlc::set_handler(move || c.cancel())
            .map_err(|e| anyhow!("install Ctrl+C handler: {}", e))?;
    }

    let opts = MonitorOptions::new(
        cfg.monitor_log.clone(),
        Duration::from_millis(cfg.poll_interval_ms),
    );
    let mut monitor = Monitor::new(
        opts,
        SystemProcessSource::new(cfg.process_denylist.clone()),
        RegistrySoftwareSource,
        std::io::stdout(),
    );

    monitor
        .initialize()
        .with_context(|| format!("start monitoring (log {})", cfg.monitor_log.display()))?;
    println!(
        "Monitoring processes and installed software. Log: {}",
        cfg.monitor_log.display()
    );
    println!("Press Ctrl+C to stop.");

    let summary = monitor.run(&cancel)?;

    println!();
    println!("{}", summary);
    let m = metrics::snapshot();
    println!("  events logged      = {}", m.monitor_events_total());
    println!("Log file kept at {}", cfg.monitor_log.display());
    Ok(())
}
