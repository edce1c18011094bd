//! Stochastic Gradient Descent optimizer

use super::Optimizer;
use crate::Tensor;
use ndarray::Array1;

/// SGD optimizer with optional momentum
pub struct SGD {
    lr: f32,
    momentum: f32,
    velocities: Vec<Option<Array1<f32>>>,
}

impl SGD {
    /// Create a new SGD optimizer
    pub fn new(lr: f32, momentum: f32) -> Self {
        Self {
            lr,
            momentum,
            velocities: Vec::new(),
        }
    }

    /// Initialize velocities if needed
    fn ensure_velocities(&mut self, params: &[Tensor]) {
        if self.velocities.is_empty() {
            self.velocities = params.iter().map(|_| None).collect();
        }
    }
}

impl Optimizer for SGD {
    fn step(&mut self, params: &mut [Tensor]) {
        self.ensure_velocities(params);

        for (i, param) in params.iter_mut().enumerate() {
            if let Some(grad) = param.grad() {
                if self.momentum > 0.0 {
                    // v = momentum * v - lr * grad
                    let velocity = if let Some(v) = &self.velocities[i] {
                        v * self.momentum - &grad * self.lr
                    } else {
                        &grad * (-self.lr)
                    };

                    {
                        let mut data = param.data_mut();
                        *data = &*data + &velocity;
                    }
                    self.velocities[i] = Some(velocity);
                } else {
                    // param -= lr * grad
                    let update = &grad * self.lr;
                    let mut data = param.data_mut();
                    *data = &*data - &update;
                }
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
    fn test_sgd_step() {
        let mut opt = SGD::new(0.1, 0.0);
        let param = Tensor::from_vec(vec![1.0, 2.0], true);
        param.set_grad(arr1(&[1.0, 1.0]));

        opt.step(&mut [param.clone()]);

        let data = param.to_vec();
        assert!((data[0] - 0.9).abs() < 1e-6);
        assert!((data[1] - 1.9).abs() < 1e-6);
    }

    #[test]
    fn test_sgd_momentum_accumulates() {
        let mut opt = SGD::new(0.1, 0.9);
        let param = Tensor::from_vec(vec![1.0], true);

        param.set_grad(arr1(&[1.0]));
        opt.step(&mut [param.clone()]);
        let after_first = param.to_vec()[0];

        param.set_grad(arr1(&[1.0]));
        opt.step(&mut [param.clone()]);
        let after_second = param.to_vec()[0];

        // Second step moves further than the first (velocity builds up)
        assert!((1.0 - after_first) < (after_first - after_second));
    }

    #[test]
    fn test_sgd_lr_accessors() {
        let mut opt = SGD::new(0.1, 0.0);
        assert_eq!(opt.lr(), 0.1);
        opt.set_lr(0.5);
        assert_eq!(opt.lr(), 0.5);
    }
}
