use lib_chain::DashboardConfig;
use std::io::Write;
use std::process::ExitCode;
use terminal::app::commands::Command;
use terminal::app::{App, Flow};
use terminal::core::error::{AppError, Result};
use terminal::debug::{config::LogConfig, logger};
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let _log_guard = logger::init(&LogConfig::from_env());

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "terminal stopped");
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let config = DashboardConfig::from_env().map_err(AppError::Config)?;
    config.validate().map_err(AppError::Config)?;

    tracing::info!(
        rpc_url = %config.rpc_url,
        history_api = %config.history_api_url,
        chain_info = config.chain_info_url.as_deref().unwrap_or("disabled"),
        "wallet terminal starting"
    );

    let app = App::from_config(&config);
    println!("Wallet terminal - {} (type `help` for commands)", config.rpc_url);
    println!("{}", app.restore().await);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        // EOF or ctrl-c
        let Some(line) = line else { break };

        let Some(command) = Command::parse(&line) else {
            continue;
        };
        match app.execute(command).await {
            Flow::Continue(output) => println!("{}\n", output),
            Flow::Quit => break,
        }
    }

    app.session().disconnect();
    tracing::info!("wallet terminal exiting");
    Ok(())
}
