use clap::Parser;
use colored::Colorize;
use nsxt_wizard::collect_spec;
use nsxt_wizard::config::Config;
use nsxt_wizard::wizard::{ReplayPrompter, TerminalPrompter};
use std::error::Error;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    let config = Config::parse();
    log4rs::init_file(&config.log_config, Default::default()).map_err(|e| {
        format!(
            "Error initializing log4rs from {}: {e}",
            config.log_config.display()
        )
    })?;
    //
    log::info!("#Start main() host={}", config.host);

    let result = match &config.answers {
        Some(path) => collect_spec(&config, ReplayPrompter::from_file(path)?).await,
        None => collect_spec(&config, TerminalPrompter::new()).await,
    };

    match result {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            log::info!("#End main()");
            Ok(())
        }
        Err(e) => {
            log::error!("{e}");
            eprintln!("{}", e.to_string().red());
            std::process::exit(1);
        }
    }
}
