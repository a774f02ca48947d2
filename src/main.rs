use clap::Parser;
use color_eyre::eyre::WrapErr;
use harboor_tray::{
    adapter::ChannelAdapter,
    app::App,
    config::{Cli, Config},
    logging,
    menu::{MenuStore, reconcile},
    model::parse_lsof_output,
    platform_sampler,
    poller::{PollLoop, PollSignal},
    portwatch::snapshot::write_snapshot,
    sampler::SocketSampler,
};
use std::{
    collections::BTreeMap,
    io,
    sync::{Arc, mpsc},
    thread,
};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let config = Config::try_from(Cli::parse())?;

    if config.once {
        logging::init_stderr();
        return run_once(&config);
    }

    logging::init_file(&config.log_file)
        .wrap_err_with(|| format!("opening log file {}", config.log_file.display()))?;

    let store = Arc::new(MenuStore::new());
    let (adapter, commands) = ChannelAdapter::new();
    let (control, signals) = mpsc::channel();

    let poller = PollLoop::new(
        platform_sampler(config.sampler_timeout),
        adapter,
        Arc::clone(&store),
        config.poll_interval,
    );
    let poller = thread::Builder::new()
        .name("poller".into())
        .spawn(move || poller.run(signals))
        .wrap_err("spawning poller thread")?;

    let terminal = ratatui::init();
    let result = App::new(&config, store, commands, control.clone()).run(terminal);
    ratatui::restore();

    // The poller only checks for shutdown between cycles.
    let _ = control.send(PollSignal::Shutdown);
    if poller.join().is_err() {
        tracing::error!("poller thread panicked");
    }
    result
}

/// Samples once and prints the resulting menu.
fn run_once(config: &Config) -> color_eyre::Result<()> {
    let raw = platform_sampler(config.sampler_timeout)
        .sample()
        .wrap_err("sampling listening sockets")?;
    let sockets = parse_lsof_output(&raw);
    let result = reconcile(&BTreeMap::new(), &sockets);
    tracing::debug!(sockets = sockets.len(), entries = result.entries.len(), "sampled once");

    let entries: Vec<_> = result.entries.into_values().collect();
    write_snapshot(&mut io::stdout().lock(), &entries, config.export_format)?;
    Ok(())
}
