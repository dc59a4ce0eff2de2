use crossbeam_channel::{unbounded, Receiver, Sender};
use super::ControlMessage;

/// MessageBus carries control messages from UI widgets and the audio thread
pub struct MessageBus {
    sender: Sender<ControlMessage>,
    receiver: Receiver<ControlMessage>,
}

impl MessageBus {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        MessageBus { sender, receiver }
    }

    /// Get a sender that can be cloned and passed to other components
    pub fn sender(&self) -> Sender<ControlMessage> {
        self.sender.clone()
    }

    /// Takes up to `max_messages` pending messages, oldest first
    pub fn drain(&self, max_messages: usize) -> Vec<ControlMessage> {
        self.receiver.try_iter().take(max_messages).collect()
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_in_order_up_to_the_cap() {
        let bus = MessageBus::new();
        let sender = bus.sender();
        sender.send(ControlMessage::SetVolume(10)).unwrap();
        sender.send(ControlMessage::Start).unwrap();
        sender.send(ControlMessage::Stop).unwrap();

        assert_eq!(bus.drain(2), vec![ControlMessage::SetVolume(10), ControlMessage::Start]);
        assert_eq!(bus.drain(8), vec![ControlMessage::Stop]);
        assert!(bus.drain(8).is_empty());
    }

    #[test]
    fn senders_work_from_other_threads() {
        let bus = MessageBus::new();
        let sender = bus.sender();
        std::thread::spawn(move || {
            sender.send(ControlMessage::StreamFault("device lost".into())).unwrap();
        })
        .join()
        .unwrap();

        assert_eq!(bus.drain(1), vec![ControlMessage::StreamFault("device lost".into())]);
    }
}
