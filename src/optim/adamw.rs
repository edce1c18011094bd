//! AdamW optimizer (Adam with decoupled weight decay)

use super::Optimizer;
use crate::Tensor;
use ndarray::Array1;

/// AdamW optimizer
///
/// AdamW decouples weight decay from the gradient-based update. Instead of
/// adding weight decay to the gradient, it applies decay directly to the
/// parameters:
///
/// ```text
/// θ_t = (1 - lr * λ) * θ_{t-1} - lr * m̂_t / (√v̂_t + ε)
/// ```
pub struct AdamW {
    lr: f32,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    weight_decay: f32,
    t: u64,
    m: Vec<Option<Array1<f32>>>, // First moment
    v: Vec<Option<Array1<f32>>>, // Second moment
}

impl AdamW {
    /// Create a new AdamW optimizer
    pub fn new(lr: f32, beta1: f32, beta2: f32, epsilon: f32, weight_decay: f32) -> Self {
        Self {
            lr,
            beta1,
            beta2,
            epsilon,
            weight_decay,
            t: 0,
            m: Vec::new(),
            v: Vec::new(),
        }
    }

    /// Create AdamW with default parameters (weight_decay = 0.01)
    pub fn default_params(lr: f32) -> Self {
        Self::new(lr, 0.9, 0.999, 1e-8, 0.01)
    }

    /// Initialize moments if needed
    fn ensure_moments(&mut self, params: &[Tensor]) {
        if self.m.is_empty() {
            self.m = params.iter().map(|_| None).collect();
            self.v = params.iter().map(|_| None).collect();
        }
    }
}

impl Optimizer for AdamW {
    fn step(&mut self, params: &mut [Tensor]) {
        self.ensure_moments(params);
        self.t += 1;

        let bias1 = 1.0 - self.beta1.powi(self.t as i32);
        let bias2 = 1.0 - self.beta2.powi(self.t as i32);
        let decay = 1.0 - self.lr * self.weight_decay;

        for (i, param) in params.iter_mut().enumerate() {
            if let Some(grad) = param.grad() {
                let m = match &self.m[i] {
                    Some(m) => m * self.beta1 + &grad * (1.0 - self.beta1),
                    None => &grad * (1.0 - self.beta1),
                };
                let grad_sq = &grad * &grad;
                let v = match &self.v[i] {
                    Some(v) => v * self.beta2 + &grad_sq * (1.0 - self.beta2),
                    None => &grad_sq * (1.0 - self.beta2),
                };

                let m_hat = &m / bias1;
                let v_hat = &v / bias2;

                let update = m_hat
                    .iter()
                    .zip(v_hat.iter())
                    .map(|(&mh, &vh)| self.lr * mh / (vh.sqrt() + self.epsilon))
                    .collect::<Array1<f32>>();

                {
                    let mut data = param.data_mut();
                    *data = &*data * decay - &update;
                }

                self.m[i] = Some(m);
                self.v[i] = Some(v);
            }
        }
    }

    fn lr(&self) -> f32 {
        self.lr
    }

    fn set_lr(&mut self, lr: f32) {
        self.lr = lr;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    #[test]
    fn test_adamw_decays_weights_without_large_grads() {
        let mut opt = AdamW::new(0.1, 0.9, 0.999, 1e-8, 0.1);
        let param = Tensor::from_vec(vec![10.0], true);
        param.set_grad(arr1(&[0.0]));

        opt.step(&mut [param.clone()]);

        // Decoupled decay shrinks the weight even with zero gradient
        assert!(param.to_vec()[0] < 10.0);
    }

    #[test]
    fn test_adamw_zero_decay_matches_adam_direction() {
        let mut opt = AdamW::new(0.1, 0.9, 0.999, 1e-8, 0.0);
        let param = Tensor::from_vec(vec![1.0], true);
        param.set_grad(arr1(&[1.0]));

        opt.step(&mut [param.clone()]);
        assert!(param.to_vec()[0] < 1.0);
    }

    #[test]
    fn test_adamw_default_params() {
        let opt = AdamW::default_params(0.001);
        assert_eq!(opt.lr(), 0.001);
    }
}
