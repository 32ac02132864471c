use crate::logic::client::broker::BrokerClient;
use crate::logic::config::BrokerConfig;
use crate::logic::types::{ENTITY_ID, FIWARE_SERVICE, FIWARE_SERVICE_PATH};
use colored::*;

/// Show the configuration the client will actually use
pub fn show(config: &BrokerConfig, source: Option<&str>) {
    println!("{}", "Current Configuration:".bright_blue().bold());
    match source {
        Some(path) => println!("  {} {}", "Loaded from:".cyan(), path.bright_white()),
        None => println!("  {} {}", "Loaded from:".cyan(), "defaults / environment".bright_white()),
    }

    println!();
    println!("{}", "Broker:".bright_green().bold());
    println!(
        "  {} {}",
        "Entity URL:".cyan(),
        BrokerClient::new(config).entity_url().bright_white()
    );
    println!("  {} {}", "Entity id:".cyan(), ENTITY_ID.bright_white());
    println!(
        "  {} {} {}",
        "FIWARE service:".cyan(),
        FIWARE_SERVICE.bright_white(),
        FIWARE_SERVICE_PATH.bright_white()
    );

    println!();
    println!("{}", "Timing:".bright_green().bold());
    println!(
        "  {} {} seconds",
        "Poll interval:".cyan(),
        config.poll_interval_secs.to_string().bright_white()
    );
    println!(
        "  {} {} ms",
        "Read timeout:".yellow(),
        config.read_timeout_ms.to_string().bright_white()
    );
    println!(
        "  {} {} ms",
        "Command timeout:".yellow(),
        config.command_timeout_ms.to_string().bright_white()
    );
}
