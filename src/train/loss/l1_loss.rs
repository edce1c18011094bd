//! Mean Absolute Error (L1) Loss

use crate::autograd::BackwardOp;
use crate::Tensor;
use ndarray::Array1;
use std::cell::RefCell;
use std::rc::Rc;

use super::LossFn;

/// L1 (Mean Absolute Error) Loss
///
/// L = mean(|predictions - targets|)
///
/// Less sensitive to outliers than MSE; the gradient is the sign of the
/// residual, `0` at exact fit.
pub struct L1Loss;

struct L1Backward {
    pred_grad_cell: Rc<RefCell<Option<Array1<f32>>>>,
    pred_op: Option<Rc<dyn BackwardOp>>,
    grad: Array1<f32>,
}

impl BackwardOp for L1Backward {
    fn backward(&self) {
        {
            let mut pred_grad = self.pred_grad_cell.borrow_mut();
            if let Some(existing) = pred_grad.as_mut() {
                *existing = &*existing + &self.grad;
            } else {
                *pred_grad = Some(self.grad.clone());
            }
        }

        if let Some(op) = &self.pred_op {
            op.backward();
        }
    }
}

impl LossFn for L1Loss {
    fn forward(&self, predictions: &Tensor, targets: &Tensor) -> Tensor {
        assert_eq!(
            predictions.len(),
            targets.len(),
            "Predictions and targets must have same length"
        );

        let diff = predictions.data() - targets.data();
        let mae = diff.mapv(f32::abs).mean().unwrap_or(0.0);

        let mut loss = Tensor::from_vec(vec![mae], true);

        // Gradient: d(MAE)/d(pred) = sign(pred - target) / n
        let n = predictions.len() as f32;
        let grad = diff.mapv(|d| {
            if d > 0.0 {
                1.0 / n
            } else if d < 0.0 {
                -1.0 / n
            } else {
                0.0
            }
        });

        if predictions.requires_grad() {
            loss.set_backward_op(Rc::new(L1Backward {
                pred_grad_cell: predictions.grad_cell(),
                pred_op: predictions.backward_op(),
                grad,
            }));
        }

        loss
    }

    fn name(&self) -> &'static str {
        "L1"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::arr1;

    #[test]
    fn test_l1_forward() {
        let pred = Tensor::from_vec(vec![1.0, 2.0], true);
        let target = Tensor::from_vec(vec![2.0, 4.0], false);

        let loss = L1Loss.forward(&pred, &target);
        assert_relative_eq!(loss.data()[0], 1.5, epsilon = 1e-6);
    }

    #[test]
    fn test_l1_backward_is_sign() {
        let pred = Tensor::from_vec(vec![3.0, 1.0, 2.0], true);
        let target = Tensor::from_vec(vec![2.0, 4.0, 2.0], false);

        let loss = L1Loss.forward(&pred, &target);
        loss.backward_op().unwrap().backward();

        let third = 1.0 / 3.0;
        let grad = pred.grad().unwrap();
        assert_relative_eq!(grad[0], third, epsilon = 1e-6);
        assert_relative_eq!(grad[1], -third, epsilon = 1e-6);
        assert_eq!(grad[2], 0.0);
    }
}
