use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::host::message::HostRequest;
use crate::menu::error::MenuError;

/// Outbound path to the host.
pub trait HostBridge {
    fn send(&mut self, request: HostRequest) -> Result<(), MenuError>;
}

/// Keeps every request, in order.
impl HostBridge for Vec<HostRequest> {
    fn send(&mut self, request: HostRequest) -> Result<(), MenuError> {
        self.push(request);
        Ok(())
    }
}

/// Hands requests to a writer task over a bounded channel.
#[derive(Debug, Clone)]
pub struct ChannelBridge {
    sender: mpsc::Sender<HostRequest>,
}

impl ChannelBridge {
    pub fn new(sender: mpsc::Sender<HostRequest>) -> Self {
        Self { sender }
    }

    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<HostRequest>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self::new(sender), receiver)
    }
}

impl HostBridge for ChannelBridge {
    fn send(&mut self, request: HostRequest) -> Result<(), MenuError> {
        debug!("Sending host request: {:?}", request);
        self.sender.try_send(request).map_err(|e| {
            error!("Host request dropped: {}", e);
            match e {
                mpsc::error::TrySendError::Full(_) => {
                    MenuError::HostChannel("host request queue is full".to_string())
                }
                mpsc::error::TrySendError::Closed(_) => {
                    MenuError::HostChannel("host channel closed".to_string())
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn channel_bridge_delivers_in_order() {
        let (mut bridge, mut receiver) = ChannelBridge::channel(4);
        bridge.send(HostRequest::ChangeAllRequest { state: true }).unwrap();
        bridge.send(HostRequest::ClosureRequest).unwrap();

        assert_eq!(
            receiver.recv().await,
            Some(HostRequest::ChangeAllRequest { state: true })
        );
        assert_eq!(receiver.recv().await, Some(HostRequest::ClosureRequest));
    }

    #[tokio::test]
    async fn closed_channel_is_a_host_failure() {
        let (mut bridge, receiver) = ChannelBridge::channel(1);
        drop(receiver);
        let err = bridge.send(HostRequest::ClosureRequest).unwrap_err();
        assert!(matches!(err, MenuError::HostChannel(_)));
    }

    #[test]
    fn full_channel_is_a_host_failure() {
        let (mut bridge, _receiver) = ChannelBridge::channel(1);
        bridge.send(HostRequest::ClosureRequest).unwrap();
        assert!(bridge.send(HostRequest::ClosureRequest).is_err());
    }
}
