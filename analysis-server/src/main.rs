use std::path::Path;
use std::time::Duration;

use analysis_server::{
    bootstrap,
    init_telemetry::init_telemetry_and_tracing,
    settings::config::Settings,
    stop_flag::{register_signal_handler, StopFlag},
};
use chrono::Local;
use clap::Parser;
use tokio::time::sleep;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "analysis-server")]
#[command(about = "Front door for the transit analysis service")]
#[clap(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Parser)]
enum Commands {
    /// Show current configuration and exit
    Config,
    /// Start the analysis server (default)
    Run,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    Settings::load_dotenv(Path::new("."));
    let settings = Settings::new()?;

    if let Commands::Config = cli.command.as_ref().unwrap_or(&Commands::Run) {
        println!("{:#?}", &settings);
        return Ok(());
    }

    let telemetry_enabled = init_telemetry_and_tracing(&settings)?;
    info!(
        "Starting analysis server, the time is now {}",
        Local::now().to_rfc3339()
    );

    let stop_flag = StopFlag::new();
    register_signal_handler(&stop_flag);

    let mut handles = match bootstrap::run(settings, stop_flag.clone(), telemetry_enabled).await {
        Ok(handles) => handles,
        Err(e) => {
            error!("Startup failed: {:#}", e);
            return Err(e);
        }
    };

    sleep(Duration::from_millis(100)).await;

    let mut failed = false;
    loop {
        let (finished, running): (Vec<_>, Vec<_>) =
            handles.into_iter().partition(|handle| handle.is_finished());
        handles = running;

        for handle in finished {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(e.into()),
            };
            if let Err(e) = result {
                error!("Task failed: {:#}", e);
                failed = true;
                stop_flag.stop();
            }
        }

        // Break the loop if no more handles are running
        if handles.is_empty() {
            info!("All tasks are done");
            break;
        }

        sleep(Duration::from_millis(200)).await;
    }

    if failed {
        anyhow::bail!("analysis server stopped after a task failure");
    }
    Ok(())
}
