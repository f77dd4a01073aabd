//! Validated NCHW float32 tensor handed to the inference collaborator

use crate::{CHANNELS, CONSTANT_FALLBACK_VALUE, INPUT_SIZE, TENSOR_LEN, TENSOR_SHAPE};
use ndarray::{Array4, ArrayView2, ArrayView4, Axis};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Element type of a tensor buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TensorDType {
    Float32,
}

impl std::fmt::Display for TensorDType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TensorDType::Float32 => write!(f, "float32"),
        }
    }
}

/// Tensor validation errors
#[derive(Debug, Error, PartialEq)]
pub enum TensorError {
    #[error("Invalid tensor shape: expected {expected:?}, got {actual:?}")]
    InvalidShape {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("Invalid tensor length: expected {expected} values, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Non-finite value at flat index {0}")]
    NonFinite(usize),
}

/// Model input tensor with shape `[1, 3, 224, 224]` in NCHW order
///
/// Construction validates shape, length and finiteness, so every value of
/// this type satisfies the output contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TensorRepr")]
pub struct NormalizedTensor {
    dtype: TensorDType,
    shape: [usize; 4],
    data: Vec<f32>,
}

/// Unvalidated wire form of a tensor
#[derive(Deserialize)]
struct TensorRepr {
    dtype: TensorDType,
    shape: Vec<usize>,
    data: Vec<f32>,
}

impl TryFrom<TensorRepr> for NormalizedTensor {
    type Error = TensorError;

    fn try_from(repr: TensorRepr) -> Result<Self, Self::Error> {
        match repr.dtype {
            TensorDType::Float32 => {}
        }
        if repr.shape != TENSOR_SHAPE {
            return Err(TensorError::InvalidShape {
                expected: TENSOR_SHAPE.to_vec(),
                actual: repr.shape,
            });
        }
        Self::from_vec(repr.data)
    }
}

impl NormalizedTensor {
    /// Build a tensor from a flat NCHW buffer
    ///
    /// # Errors
    /// Returns error if the buffer length is not `3 * 224 * 224` or any value
    /// is NaN or infinite.
    pub fn from_vec(data: Vec<f32>) -> Result<Self, TensorError> {
        if data.len() != TENSOR_LEN {
            return Err(TensorError::LengthMismatch {
                expected: TENSOR_LEN,
                actual: data.len(),
            });
        }
        if let Some(index) = data.iter().position(|v| !v.is_finite()) {
            return Err(TensorError::NonFinite(index));
        }
        Ok(Self {
            dtype: TensorDType::Float32,
            shape: TENSOR_SHAPE,
            data,
        })
    }

    /// Build a tensor from a 4-D array, copying it into contiguous NCHW order
    pub fn from_array(array: Array4<f32>) -> Result<Self, TensorError> {
        if array.shape() != TENSOR_SHAPE {
            return Err(TensorError::InvalidShape {
                expected: TENSOR_SHAPE.to_vec(),
                actual: array.shape().to_vec(),
            });
        }
        // Logical iteration order is row-major regardless of memory layout
        Self::from_vec(array.iter().copied().collect())
    }

    /// Tensor with every element set to `value`
    pub fn filled(value: f32) -> Result<Self, TensorError> {
        Self::from_vec(vec![value; TENSOR_LEN])
    }

    /// Last-resort tensor; cannot fail short of allocation failure
    #[must_use]
    pub fn constant() -> Self {
        Self {
            dtype: TensorDType::Float32,
            shape: TENSOR_SHAPE,
            data: vec![CONSTANT_FALLBACK_VALUE; TENSOR_LEN],
        }
    }

    #[must_use]
    pub fn dtype(&self) -> TensorDType {
        self.dtype
    }

    #[must_use]
    pub fn shape(&self) -> [usize; 4] {
        self.shape
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Flat contiguous NCHW buffer
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Zero-copy 4-D view over the buffer
    #[must_use]
    pub fn view(&self) -> ArrayView4<'_, f32> {
        ArrayView4::from_shape(self.shape, &self.data)
            .expect("tensor length validated at construction")
    }

    /// 224x224 plane of one channel (0 = R, 1 = G, 2 = B)
    ///
    /// # Panics
    /// Panics if `channel >= 3`.
    #[must_use]
    pub fn channel(&self, channel: usize) -> ArrayView2<'_, f32> {
        self.view().index_axis_move(Axis(0), 0).index_axis_move(Axis(0), channel)
    }

    /// Mean value of each channel plane
    #[must_use]
    pub fn channel_means(&self) -> [f32; CHANNELS] {
        let plane = (INPUT_SIZE * INPUT_SIZE) as usize;
        let mut means = [0.0f32; CHANNELS];
        for (c, chunk) in self.data.chunks_exact(plane).enumerate() {
            let sum: f64 = chunk.iter().map(|&v| f64::from(v)).sum();
            means[c] = (sum / plane as f64) as f32;
        }
        means
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec_rejects_wrong_length() {
        let err = NormalizedTensor::from_vec(vec![0.0; 10]).unwrap_err();
        assert_eq!(
            err,
            TensorError::LengthMismatch {
                expected: TENSOR_LEN,
                actual: 10
            }
        );
    }

    #[test]
    fn test_from_vec_rejects_nan() {
        let mut data = vec![0.0; TENSOR_LEN];
        data[42] = f32::NAN;
        assert_eq!(
            NormalizedTensor::from_vec(data).unwrap_err(),
            TensorError::NonFinite(42)
        );
    }

    #[test]
    fn test_from_array_rejects_wrong_shape() {
        let array = Array4::<f32>::zeros((1, 3, 112, 112));
        assert!(matches!(
            NormalizedTensor::from_array(array),
            Err(TensorError::InvalidShape { .. })
        ));
    }

    #[test]
    fn test_from_array_keeps_nchw_order() {
        let mut array = Array4::<f32>::zeros((1, 3, 224, 224));
        array[[0, 1, 2, 3]] = 7.0;
        let tensor = NormalizedTensor::from_array(array).unwrap();
        assert_eq!(tensor.as_slice()[224 * 224 + 2 * 224 + 3], 7.0);
        assert_eq!(tensor.channel(1)[[2, 3]], 7.0);
    }

    #[test]
    fn test_constant_tensor() {
        let tensor = NormalizedTensor::constant();
        assert_eq!(tensor.dtype(), TensorDType::Float32);
        assert_eq!(tensor.shape(), [1, 3, 224, 224]);
        assert_eq!(tensor.len(), TENSOR_LEN);
        assert!(tensor.as_slice().iter().all(|&v| v == -0.5));
        assert_eq!(tensor.channel_means(), [-0.5; 3]);
    }

    #[test]
    fn test_serialization_contract() {
        let tensor = NormalizedTensor::filled(0.25).unwrap();
        let json = serde_json::to_value(&tensor).unwrap();
        assert_eq!(json["dtype"], "float32");
        assert_eq!(json["shape"], serde_json::json!([1, 3, 224, 224]));
        assert_eq!(json["data"].as_array().unwrap().len(), TENSOR_LEN);

        let restored: NormalizedTensor = serde_json::from_value(json).unwrap();
        assert_eq!(restored, tensor);
    }

    #[test]
    fn test_deserialization_validates_shape() {
        let json = serde_json::json!({
            "dtype": "float32",
            "shape": [1, 3, 2, 2],
            "data": vec![0.0f32; 12],
        });
        assert!(serde_json::from_value::<NormalizedTensor>(json).is_err());
    }
}
