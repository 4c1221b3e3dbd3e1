/// Anything that reacts to commands or events delivered over a channel.
pub trait EventHandler<T> {
    fn handle_event(&mut self, event: &T);
}
