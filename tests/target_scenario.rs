use burn::{
    backend::{ndarray::NdArrayDevice, NdArray},
    prelude::*,
};
use rand::{rngs::StdRng, SeedableRng};
use sac_rl::{
    algo::sac::soft_q_target,
    memory::ReplayBuffer,
    nn::{policy::standard_normal, PolicyNetworkConfig, QNetworkConfig},
    Transition,
};

const GAMMA: f32 = 0.98;
const ALPHA: f32 = 0.05;

fn values(tensor: Tensor<NdArray, 2>) -> Vec<f32> {
    tensor.into_data().iter::<f32>().collect()
}

#[test]
fn target_from_identical_transitions() {
    let device = NdArrayDevice::default();
    let mut rng = StdRng::seed_from_u64(11);

    let mut memory = ReplayBuffer::new(50_000);
    for _ in 0..1000 {
        memory.put(Transition::new([0.0; 3], 0.0, -1.0, [0.0; 3], false));
    }
    let batch = memory.sample(32, &mut rng).unwrap();
    assert_eq!(batch.len(), 32);
    assert!(batch.masks.iter().all(|m| *m == 1.0));

    let policy = PolicyNetworkConfig::new().init::<NdArray>(&device);
    let q1 = QNetworkConfig::new().init::<NdArray>(&device);
    let q2 = QNetworkConfig::new().init::<NdArray>(&device);

    let noise = standard_normal::<NdArray, _>(32, &device, &mut rng);
    let tensors = batch.to_tensors::<NdArray>(&device);
    let target = values(soft_q_target(
        &policy,
        &q1,
        &q2,
        &tensors,
        noise.clone(),
        GAMMA,
        ALPHA,
    ));
    assert_eq!(target.len(), 32);

    // Recompute every element on its own: -1 + γ (min_q + entropy)
    let s = Tensor::<NdArray, 2>::zeros([1, 3], &device);
    for (i, z) in values(noise).into_iter().enumerate() {
        let z = Tensor::<NdArray, 2>::from_floats([[z]], &device);
        let (a, log_prob) = policy.forward(s.clone(), z);
        let min_q = values(q1.forward(s.clone(), a.clone()))[0]
            .min(values(q2.forward(s.clone(), a))[0]);
        let entropy = -ALPHA * values(log_prob)[0];

        let expected = -1.0 + GAMMA * (min_q + entropy);
        assert!(
            (target[i] - expected).abs() < 1e-5,
            "element {}: {} vs {}",
            i,
            target[i],
            expected
        );
    }
}

#[test]
fn terminal_target_ignores_next_state() {
    let device = NdArrayDevice::default();
    let mut rng = StdRng::seed_from_u64(3);

    let mut memory = ReplayBuffer::new(16);
    memory.put(Transition::new([0.1, 0.2, 0.3], 1.0, -0.7, [5.0, -5.0, 8.0], true));
    memory.put(Transition::new([0.1, 0.2, 0.3], 1.0, -0.7, [-9.0, 2.0, 0.0], true));

    let policy = PolicyNetworkConfig::new().init::<NdArray>(&device);
    let q1 = QNetworkConfig::new().init::<NdArray>(&device);
    let q2 = QNetworkConfig::new().init::<NdArray>(&device);

    let tensors = memory.sample(2, &mut rng).unwrap().to_tensors::<NdArray>(&device);
    let noise = standard_normal::<NdArray, _>(2, &device, &mut rng);
    let target = values(soft_q_target(&policy, &q1, &q2, &tensors, noise, GAMMA, ALPHA));

    assert_eq!(target, vec![-0.7, -0.7]);
}
