//! Adam optimizer

use super::Optimizer;
use crate::Tensor;
use ndarray::Array1;

/// Adam optimizer with bias-corrected first and second moment estimates
///
/// Update rule:
/// ```text
/// m_t = β1 * m_{t-1} + (1 - β1) * g_t
/// v_t = β2 * v_{t-1} + (1 - β2) * g_t²
/// θ_t = θ_{t-1} - lr * m̂_t / (√v̂_t + ε)
/// ```
pub struct Adam {
    lr: f32,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    t: u64,
    m: Vec<Option<Array1<f32>>>, // First moment
    v: Vec<Option<Array1<f32>>>, // Second moment
}

impl Adam {
    /// Create a new Adam optimizer
    pub fn new(lr: f32, beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Self {
            lr,
            beta1,
            beta2,
            epsilon,
            t: 0,
            m: Vec::new(),
            v: Vec::new(),
        }
    }

    /// Create Adam with the usual defaults (β1=0.9, β2=0.999, ε=1e-8)
    pub fn default_params(lr: f32) -> Self {
        Self::new(lr, 0.9, 0.999, 1e-8)
    }

    /// Initialize moments if needed
    fn ensure_moments(&mut self, params: &[Tensor]) {
        if self.m.is_empty() {
            self.m = params.iter().map(|_| None).collect();
            self.v = params.iter().map(|_| None).collect();
        }
    }
}

impl Optimizer for Adam {
    fn step(&mut self, params: &mut [Tensor]) {
        self.ensure_moments(params);
        self.t += 1;

        let bias1 = 1.0 - self.beta1.powi(self.t as i32);
        let bias2 = 1.0 - self.beta2.powi(self.t as i32);

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
                    *data = &*data - &update;
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
    fn test_adam_step_moves_against_gradient() {
        let mut opt = Adam::new(0.1, 0.9, 0.999, 1e-8);
        let param = Tensor::from_vec(vec![1.0, 2.0], true);
        param.set_grad(arr1(&[1.0, -1.0]));

        opt.step(&mut [param.clone()]);

        let data = param.to_vec();
        assert!(data[0] < 1.0);
        assert!(data[1] > 2.0);
    }

    #[test]
    fn test_adam_first_step_magnitude() {
        // With bias correction, the first update is ~lr regardless of grad scale
        let mut opt = Adam::new(0.1, 0.9, 0.999, 1e-8);
        let param = Tensor::from_vec(vec![0.0], true);
        param.set_grad(arr1(&[100.0]));

        opt.step(&mut [param.clone()]);

        assert!((param.to_vec()[0] + 0.1).abs() < 1e-3);
    }

    #[test]
    fn test_adam_skips_params_without_grad() {
        let mut opt = Adam::default_params(0.1);
        let param = Tensor::from_vec(vec![1.0], true);

        opt.step(&mut [param.clone()]);
        assert_eq!(param.to_vec(), vec![1.0]);
    }

    #[test]
    fn test_adam_lr_accessors() {
        let mut opt = Adam::default_params(0.001);
        assert_eq!(opt.lr(), 0.001);
        opt.set_lr(0.01);
        assert_eq!(opt.lr(), 0.01);
    }
}
