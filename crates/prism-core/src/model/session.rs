//! ONNX session management and inference for tagger models.
//!
//! Wraps an `ort` session loaded from a tagger's exported ONNX graph.
//! The model takes an NHWC BGR tensor and produces one sigmoid confidence
//! per vocabulary entry, in label-table order.

use std::path::Path;
use std::sync::Mutex;

use ndarray::Array4;
use ort::session::Session;
use ort::value::{Value, ValueType};

use crate::error::TaggerError;

/// An ONNX Runtime session for one tagger model.
///
/// Uses a `Mutex` because `Session::run` requires `&mut self`.
#[derive(Debug)]
pub struct TaggerSession {
    session: Mutex<Session>,
    /// Name of the input tensor (detected from model metadata).
    input_name: String,
    /// Square input side introspected from the input shape, when the
    /// model declares concrete spatial dimensions.
    input_side: Option<u32>,
}

impl TaggerSession {
    /// Load a tagger model from an ONNX file.
    pub fn load(model_path: &Path, model_id: &str) -> Result<Self, TaggerError> {
        let session = Session::builder()
            .map_err(|e| TaggerError::ModelLoad {
                model: model_id.to_string(),
                message: format!("Failed to create ONNX session builder: {e}"),
            })?
            .commit_from_file(model_path)
            .map_err(|e| TaggerError::ModelLoad {
                model: model_id.to_string(),
                message: format!("Failed to load ONNX model: {e}"),
            })?;

        let (input_name, input_side) = match session.inputs().first() {
            Some(input) => (
                input.name().to_string(),
                square_side(input.dtype()),
            ),
            None => ("input".to_string(), None),
        };

        tracing::debug!(
            "Loaded tagger model {} from {:?} (input: {:?}, side: {:?})",
            model_id,
            model_path,
            input_name,
            input_side,
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            input_side,
        })
    }

    /// The model's declared square input side, if introspectable.
    pub fn input_side(&self) -> Option<u32> {
        self.input_side
    }

    /// Run inference on a normalized image tensor.
    ///
    /// Input shape: \[1, S, S, 3\] (NHWC, BGR, raw 0–255 floats).
    /// Output: one confidence per label-table entry, vector order.
    pub fn infer(&self, tensor: &Array4<f32>) -> Result<Vec<f32>, TaggerError> {
        // Convert ndarray to (shape, flat_data) for ort.
        let shape: Vec<i64> = tensor.shape().iter().map(|&d| d as i64).collect();
        let flat_data: Vec<f32> = tensor.iter().copied().collect();

        let input_value =
            Value::from_array((shape, flat_data)).map_err(|e| TaggerError::Inference {
                message: format!("Failed to create input tensor: {e}"),
            })?;

        let inputs = ort::inputs![self.input_name.as_str() => input_value];

        let mut session = self.session.lock().map_err(|e| TaggerError::Inference {
            message: format!("Session lock poisoned: {e}"),
        })?;

        let outputs = session.run(inputs).map_err(|e| TaggerError::Inference {
            message: format!("ONNX inference failed: {e}"),
        })?;

        // The confidence vector is the model's first (and only) output.
        let confidences = outputs.iter().next().ok_or_else(|| TaggerError::Inference {
            message: "Model produced no outputs".to_string(),
        })?;

        let (shape, data) =
            confidences
                .1
                .try_extract_tensor::<f32>()
                .map_err(|e| TaggerError::Inference {
                    message: format!("Failed to extract confidence tensor: {e}"),
                })?;

        // Output is [1, N]; strip the batch dimension.
        match shape.len() {
            1 => Ok(data.to_vec()),
            2 => {
                let n = shape[1] as usize;
                Ok(data[..n].to_vec())
            }
            _ => Err(TaggerError::Inference {
                message: format!("Unexpected confidence tensor shape: {:?}", shape),
            }),
        }
    }
}

/// Extract the square spatial side from an NHWC input declaration.
///
/// Returns `None` for symbolic/dynamic dimensions or non-square inputs,
/// in which case the caller falls back to the configured default side.
fn square_side(value_type: &ValueType) -> Option<u32> {
    match value_type {
        ValueType::Tensor { shape, .. } => {
            // NHWC: [batch, height, width, channels]
            if shape.len() == 4 && shape[1] > 0 && shape[1] == shape[2] {
                Some(shape[1] as u32)
            } else {
                None
            }
        }
        _ => None,
    }
}
