use crate::types::PeerRole;

/// Effect triggered for one event kind. The common part runs on every peer,
/// then exactly one of the master or client parts.
pub trait EventHandler<D> {
    fn name(&self) -> &'static str;

    fn trigger_common(&mut self, _data: &D) {}

    fn trigger_master(&mut self, _data: &D) {}

    fn trigger_client(&mut self, _data: &D) {}

    fn trigger(&mut self, data: &D, role: PeerRole) {
        self.trigger_common(data);
        match role {
            PeerRole::Master => self.trigger_master(data),
            PeerRole::Client => self.trigger_client(data),
        }
    }
}
