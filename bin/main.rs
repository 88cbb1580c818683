use anyhow::Context;
use cadence::{Controller, Stopped};
use cadence_common::{config::Config, internal, logging};
use cadence_delivery::SmtpTransport;

async fn shutdown() -> anyhow::Result<()> {
    #[cfg(unix)]
    {
        let mut terminate =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;

        tokio::select! {
            r = tokio::signal::ctrl_c() => r?,
            _ = terminate.recv() => {}
        }
    }

    #[cfg(not(unix))]
    tokio::signal::ctrl_c().await?;

    Ok(())
}

async fn run(config: Config) -> anyhow::Result<()> {
    let mut controller = Controller::new(&config, SmtpTransport::new(&config));

    tokio::select! {
        stopped = controller.run() => match stopped {
            Stopped::Operator => internal!(level = INFO, "Stopping at the operator's request"),
            Stopped::NoContent => internal!(level = INFO, "Nothing left to deliver"),
        },
        r = shutdown() => {
            r?;
            internal!(level = INFO, "Signal received, shutting down");
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    logging::init();

    let config = Config::load().context("Invalid configuration")?;
    internal!(level = DEBUG, "Loaded {config:?}");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let outcome = runtime.block_on(run(config));

    // A stdin read left behind by the countdown never returns on its own.
    runtime.shutdown_background();

    internal!(level = INFO, "Farewell");

    outcome
}
