//! In-memory audio host for exercising the engine without a sound card.

use std::cell::RefCell;
use std::rc::Rc;

use super::error::EngineError;
use super::graph::SharedGraph;
use super::host::{AudioHost, OutputStream, StreamSpec, StreamState};

#[derive(Default)]
pub struct HostLog {
    pub streams_opened: usize,
    pub resumes: usize,
    pub suspends: usize,
    pub graph: Option<SharedGraph>,
    pub state: Option<StreamState>,
}

#[derive(Clone)]
pub struct FakeHost {
    pub supported: bool,
    pub fail_open: bool,
    pub fail_resume: bool,
    pub log: Rc<RefCell<HostLog>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            supported: true,
            fail_open: false,
            fail_resume: false,
            log: Rc::new(RefCell::new(HostLog::default())),
        }
    }

    pub fn unsupported() -> Self {
        Self { supported: false, ..Self::new() }
    }

    /// Pulls `frames` samples through the most recently opened graph, as the
    /// audio callback would while the stream runs.
    pub fn pull(&self, frames: usize) {
        let log = self.log.borrow();
        if log.state != Some(StreamState::Running) {
            return;
        }
        if let Some(graph) = log.graph.as_ref() {
            let mut buffer = vec![0.0; frames];
            graph.write().unwrap().render(&mut buffer);
        }
    }
}

impl AudioHost for FakeHost {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn output_spec(&self) -> Result<StreamSpec, EngineError> {
        if !self.supported {
            return Err(EngineError::Unsupported);
        }
        Ok(StreamSpec { sample_rate: 48_000.0, channels: 2 })
    }

    fn open_stream(&self, _spec: &StreamSpec, graph: SharedGraph) -> Result<Box<dyn OutputStream>, EngineError> {
        if self.fail_open {
            return Err(EngineError::ResourceCreation("device busy".to_string()));
        }
        let mut log = self.log.borrow_mut();
        log.streams_opened += 1;
        log.graph = Some(graph);
        log.state = Some(StreamState::Suspended);
        Ok(Box::new(FakeStream { fail_resume: self.fail_resume, log: Rc::clone(&self.log) }))
    }
}

struct FakeStream {
    fail_resume: bool,
    log: Rc<RefCell<HostLog>>,
}

impl OutputStream for FakeStream {
    fn state(&self) -> StreamState {
        self.log.borrow().state.unwrap_or(StreamState::Suspended)
    }

    fn resume(&mut self) -> Result<(), EngineError> {
        if self.fail_resume {
            return Err(EngineError::Resume("output blocked".to_string()));
        }
        let mut log = self.log.borrow_mut();
        log.resumes += 1;
        log.state = Some(StreamState::Running);
        Ok(())
    }

    fn suspend(&mut self) -> Result<(), EngineError> {
        let mut log = self.log.borrow_mut();
        log.suspends += 1;
        log.state = Some(StreamState::Suspended);
        Ok(())
    }
}
