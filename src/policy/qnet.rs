//! Persisted Q-network policy
//!
//! A small fully-connected network (11 observation flags in, one value per
//! action out, ReLU between layers) loaded once at startup and played
//! greedily: the highest output is taken as the one-hot action index.
//!
//! A model is stored as two files:
//! - `<path>` - layer weights in Burn's named MessagePack record format
//! - `<path>.meta.json` - hidden layer sizes needed to rebuild the network

use burn::{
    backend::ndarray::{NdArray, NdArrayDevice},
    module::Module,
    nn::{Linear, LinearConfig},
    record::{FullPrecisionSettings, NamedMpkFileRecorder, Recorder},
    tensor::{Tensor, TensorData, activation::relu, backend::Backend},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use super::{OBSERVATION_SIZE, Observation, Policy, PolicyError};
use crate::game::Action;

/// Backend used to evaluate loaded models (CPU, no autodiff)
pub type InferenceBackend = NdArray<f32>;

/// Layer layout of a [`QNetwork`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QNetworkConfig {
    /// Widths of the hidden layers, input side first
    pub hidden_sizes: Vec<usize>,
}

impl QNetworkConfig {
    pub fn new(hidden_sizes: Vec<usize>) -> Self {
        Self { hidden_sizes }
    }

    /// `[input, hidden.., output]`
    pub fn widths(&self) -> Vec<usize> {
        let mut widths = Vec::with_capacity(self.hidden_sizes.len() + 2);
        widths.push(OBSERVATION_SIZE);
        widths.extend(&self.hidden_sizes);
        widths.push(Action::ALL.len());
        widths
    }

    pub fn validate(&self) -> Result<(), PolicyError> {
        if let Some(i) = self.hidden_sizes.iter().position(|&size| size == 0) {
            return Err(PolicyError::Shape(format!("hidden layer {i} has width 0")));
        }
        Ok(())
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> QNetwork<B> {
        let layers = self
            .widths()
            .windows(2)
            .map(|pair| LinearConfig::new(pair[0], pair[1]).init(device))
            .collect();

        QNetwork { layers }
    }
}

/// Metadata written next to the weights
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub network: QNetworkConfig,
    /// Crate version that wrote the model
    pub version: String,
}

/// Dense network mapping a batch of observations to one value per action
#[derive(Module, Debug)]
pub struct QNetwork<B: Backend> {
    layers: Vec<Linear<B>>,
}

impl<B: Backend> QNetwork<B> {
    /// `[batch, 11]` in, `[batch, 3]` out
    pub fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        let last = self.layers.len().saturating_sub(1);
        let mut x = input;

        for (i, layer) in self.layers.iter().enumerate() {
            x = layer.forward(x);
            if i < last {
                x = relu(x);
            }
        }

        x
    }

    /// `[input, hidden.., output]` as stored in the weights
    pub fn widths(&self) -> Vec<usize> {
        let mut widths = Vec::with_capacity(self.layers.len() + 1);
        for (i, layer) in self.layers.iter().enumerate() {
            let [inputs, outputs] = layer.weight.val().dims();
            if i == 0 {
                widths.push(inputs);
            }
            widths.push(outputs);
        }
        widths
    }

    /// Load a model written by Burn's named MessagePack recorder.
    ///
    /// The layout comes from `<path>.meta.json`; weights that do not match it
    /// are rejected.
    pub fn load(path: &Path, device: &B::Device) -> Result<Self, PolicyError> {
        let meta_path = path.with_extension("meta.json");
        let meta_json = std::fs::read_to_string(&meta_path)?;
        let metadata: ModelMetadata = serde_json::from_str(&meta_json)?;
        metadata.network.validate()?;

        let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
        let record: QNetworkRecord<B> = recorder
            .load(path.to_path_buf(), device)
            .map_err(|e| PolicyError::Record(e.to_string()))?;

        let expected = metadata.network.widths();
        let found = record_widths(&record);
        if found != expected {
            return Err(PolicyError::Shape(format!(
                "weights have layer widths {found:?}, metadata says {expected:?}"
            )));
        }
        let network = metadata.network.init::<B>(device).load_record(record);

        info!(
            path = %path.display(),
            widths = ?found,
            version = %metadata.version,
            "loaded q-network"
        );
        Ok(network)
    }
}

fn record_widths<B: Backend>(record: &QNetworkRecord<B>) -> Vec<usize> {
    let mut widths = Vec::with_capacity(record.layers.len() + 1);
    for (i, layer) in record.layers.iter().enumerate() {
        let [inputs, outputs] = layer.weight.val().dims();
        if i == 0 {
            widths.push(inputs);
        }
        widths.push(outputs);
    }
    widths
}

/// Greedy policy over a [`QNetwork`]
pub struct QNetPolicy {
    network: QNetwork<InferenceBackend>,
    device: NdArrayDevice,
}

impl QNetPolicy {
    pub fn new(network: QNetwork<InferenceBackend>) -> Self {
        Self {
            network,
            device: NdArrayDevice::default(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, PolicyError> {
        let device = NdArrayDevice::default();
        let network = QNetwork::load(path, &device)?;
        Ok(Self { network, device })
    }

    /// Action values for one observation, in `Action::index` order
    pub fn action_values(&self, observation: &Observation) -> Vec<f32> {
        let features = TensorData::new(observation.to_features().to_vec(), [1, OBSERVATION_SIZE]);
        let input = Tensor::<InferenceBackend, 2>::from_data(features, &self.device);

        self.network.forward(input).into_data().iter::<f32>().collect()
    }
}

impl Policy for QNetPolicy {
    fn choose_action(&mut self, observation: &Observation) -> Action {
        let values = self.action_values(observation);

        // first index wins ties
        let mut best = 0;
        for (i, value) in values.iter().enumerate() {
            if *value > values[best] {
                best = i;
            }
        }

        Action::from_index(best).unwrap_or(Action::Straight)
    }

    fn name(&self) -> &'static str {
        "q-network"
    }
}
