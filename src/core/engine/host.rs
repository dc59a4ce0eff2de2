use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Sample, SampleFormat, Stream};
use crossbeam_channel::Sender;

use super::error::EngineError;
use super::graph::SharedGraph;
use crate::messaging::ControlMessage;

/// Output format negotiated with the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamSpec {
    pub sample_rate: f32,
    pub channels: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Suspended,
    Running,
}

/// A live connection from a [`SharedGraph`] to the audio output
pub trait OutputStream {
    fn state(&self) -> StreamState;
    fn resume(&mut self) -> Result<(), EngineError>;
    fn suspend(&mut self) -> Result<(), EngineError>;
}

/// Platform audio subsystem
pub trait AudioHost {
    /// Capability probe; does not touch any engine state.
    fn is_supported(&self) -> bool;
    fn output_spec(&self) -> Result<StreamSpec, EngineError>;
    /// Opens a stream pulling from `graph`. Streams start suspended.
    fn open_stream(&self, spec: &StreamSpec, graph: SharedGraph) -> Result<Box<dyn OutputStream>, EngineError>;
}

/// Default cpal host and output device
pub struct CpalHost {
    faults: Sender<ControlMessage>,
}

impl CpalHost {
    /// `faults` receives a message whenever the output stream reports an error
    pub fn new(faults: Sender<ControlMessage>) -> Self {
        Self { faults }
    }

    fn default_device() -> Result<cpal::Device, EngineError> {
        cpal::default_host()
            .default_output_device()
            .ok_or(EngineError::Unsupported)
    }
}

impl AudioHost for CpalHost {
    fn is_supported(&self) -> bool {
        Self::default_device().is_ok()
    }

    fn output_spec(&self) -> Result<StreamSpec, EngineError> {
        let device = Self::default_device()?;
        let config = device.default_output_config()
            .map_err(|e| EngineError::ResourceCreation(e.to_string()))?;

        log::info!(
            "Using output device {:?} ({} Hz, {} channels)",
            device.name().unwrap_or_default(),
            config.sample_rate().0,
            config.channels()
        );

        Ok(StreamSpec {
            sample_rate: config.sample_rate().0 as f32,
            channels: config.channels(),
        })
    }

    fn open_stream(&self, spec: &StreamSpec, graph: SharedGraph) -> Result<Box<dyn OutputStream>, EngineError> {
        let device = Self::default_device()?;
        let sample_format = device.default_output_config()
            .map_err(|e| EngineError::ResourceCreation(e.to_string()))?
            .sample_format();

        let config = cpal::StreamConfig {
            channels: spec.channels,
            sample_rate: cpal::SampleRate(spec.sample_rate as u32),
            buffer_size: cpal::BufferSize::Default,
        };

        let stream = match sample_format {
            SampleFormat::F32 => create_stream::<f32>(&device, &config, graph, self.faults.clone()),
            SampleFormat::I16 => create_stream::<i16>(&device, &config, graph, self.faults.clone()),
            SampleFormat::U16 => create_stream::<u16>(&device, &config, graph, self.faults.clone()),
            other => Err(EngineError::ResourceCreation(format!("unsupported sample format {other:?}"))),
        }?;

        // Some backends start playing on build; hold output until a tone is requested
        if let Err(e) = stream.pause() {
            log::debug!("Could not pause new output stream: {}", e);
        }

        Ok(Box::new(CpalStream { stream, state: StreamState::Suspended }))
    }
}

struct CpalStream {
    stream: Stream,
    state: StreamState,
}

impl OutputStream for CpalStream {
    fn state(&self) -> StreamState {
        self.state
    }

    fn resume(&mut self) -> Result<(), EngineError> {
        self.stream.play().map_err(|e| EngineError::Resume(e.to_string()))?;
        self.state = StreamState::Running;
        Ok(())
    }

    fn suspend(&mut self) -> Result<(), EngineError> {
        self.stream.pause().map_err(|e| EngineError::Resume(e.to_string()))?;
        self.state = StreamState::Suspended;
        Ok(())
    }
}

fn create_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    graph: SharedGraph,
    faults: Sender<ControlMessage>,
) -> Result<Stream, EngineError>
where
    T: Sample + Send + 'static + cpal::SizedSample + cpal::FromSample<f32>,
{
    let channels = config.channels as usize;
    let fault_graph = SharedGraph::clone(&graph);
    let err_fn = move |err: cpal::StreamError| {
        log::error!("An error occurred on the audio stream: {}", err);
        if let Ok(mut graph) = fault_graph.write() {
            graph.terminate_source();
        }
        faults.send(ControlMessage::StreamFault(err.to_string())).ok();
    };

    device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            // One lock per buffer; a poisoned graph plays silence
            match graph.write() {
                Ok(mut graph) => {
                    for frame in data.chunks_mut(channels) {
                        let value = T::from_sample(graph.next_sample());
                        for sample in frame.iter_mut() {
                            *sample = value;
                        }
                    }
                },
                Err(_) => {
                    for sample in data.iter_mut() {
                        *sample = T::EQUILIBRIUM;
                    }
                },
            }
        },
        err_fn,
        None,
    )
    .map_err(|e| EngineError::ResourceCreation(e.to_string()))
}
