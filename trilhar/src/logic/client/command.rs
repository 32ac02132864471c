use crate::logic::client::broker::BrokerClient;
use crate::logic::types::Notification;
use tracing::{info, warn};

/// Fire-and-forget writer of device commands
#[derive(Clone)]
pub struct CommandSender {
    broker: BrokerClient,
}

impl CommandSender {
    pub fn new(broker: BrokerClient) -> Self {
        Self { broker }
    }

    /// Send one command and report the outcome as a notification.
    ///
    /// Nothing is retried and nothing is returned as an error; whether the
    /// device ever applies the command is not tracked.
    pub async fn send_command(&self, command_name: &str, value: &str) -> Notification {
        match self.broker.send_command_attribute(command_name, value).await {
            Ok(()) => {
                info!(command = command_name, value, "command sent");
                Notification::Sent {
                    command: command_name.to_string(),
                    value: value.to_string(),
                }
            }
            Err(e) => {
                warn!(command = command_name, value, error = %e, "command failed");
                Notification::Failed {
                    command: command_name.to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }
}
