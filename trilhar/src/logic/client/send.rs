use crate::cli::CommandTarget;
use crate::logic::client::broker::BrokerClient;
use crate::logic::client::command::CommandSender;
use crate::logic::config::BrokerConfig;
use crate::logic::types::{Notification, CMD_SET_BREAK, CMD_SET_DURATION};

pub fn command_name(target: CommandTarget) -> &'static str {
    match target {
        CommandTarget::Duration => CMD_SET_DURATION,
        CommandTarget::Break => CMD_SET_BREAK,
    }
}

/// Send one command from the command line; failures are reported, not returned
pub async fn run(config: BrokerConfig, target: CommandTarget, minutes: u32) -> anyhow::Result<()> {
    let sender = CommandSender::new(BrokerClient::new(&config));
    let notification = sender
        .send_command(command_name(target), &minutes.to_string())
        .await;

    match &notification {
        Notification::Sent { .. } => println!("{}", notification),
        Notification::Failed { .. } => eprintln!("{}", notification),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_names() {
        assert_eq!(command_name(CommandTarget::Duration), "set_duracao");
        assert_eq!(command_name(CommandTarget::Break), "set_pausa");
    }
}
