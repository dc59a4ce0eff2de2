/// Work items driven by the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    SessionDuration,
    Render,
    SyncConnected,
}
