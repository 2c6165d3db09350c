use burn::{
    prelude::*,
    tensor::{backend::Backend, TensorData},
};

/// A trait for converting batches of plain values to float tensors
///
/// Implemented for the shapes the replay buffer hands out: `Vec<f32>` becomes a
/// `[batch]` tensor and `Vec<[f32; A]>` a `[batch, A]` tensor.
pub trait ToTensor<B: Backend, const D: usize> {
    fn to_tensor(self, device: &B::Device) -> Tensor<B, D>;
}

impl<B: Backend> ToTensor<B, 1> for Vec<f32> {
    #[inline]
    fn to_tensor(self, device: &B::Device) -> Tensor<B, 1> {
        let len = self.len();
        Tensor::from_data(
            TensorData::new(self, [len]).convert::<B::FloatElem>(),
            device,
        )
    }
}

impl<B: Backend, const A: usize> ToTensor<B, 2> for Vec<[f32; A]> {
    #[inline]
    fn to_tensor(self, device: &B::Device) -> Tensor<B, 2> {
        let batch_size = self.len();
        let mut flat = Vec::with_capacity(batch_size * A);
        for row in self.iter() {
            flat.extend_from_slice(row);
        }

        Tensor::from_data(
            TensorData::new(flat, [batch_size, A]).convert::<B::FloatElem>(),
            device,
        )
    }
}
