//! Gradient-carrying tensor

use super::backward::BackwardOp;
use ndarray::Array1;
use std::cell::{RefCell, RefMut};
use std::rc::Rc;

/// A 1-D f32 tensor with an optional gradient.
///
/// Data and gradient live in shared cells, so clones of a tensor view the
/// same storage: an optimizer updating a parameter held by a `Trainer` is
/// visible to a model closure holding a clone of that parameter, and
/// gradients accumulated through the backward graph are visible to both.
///
/// # Example
///
/// ```
/// use podar::Tensor;
///
/// let t = Tensor::from_vec(vec![1.0, 2.0, 3.0], true);
/// assert_eq!(t.len(), 3);
/// assert!(t.requires_grad());
/// assert!(t.grad().is_none());
/// ```
pub struct Tensor {
    data: Rc<RefCell<Array1<f32>>>,
    grad: Rc<RefCell<Option<Array1<f32>>>>,
    requires_grad: bool,
    backward_op: RefCell<Option<Rc<dyn BackwardOp>>>,
}

impl Tensor {
    /// Create a tensor from an ndarray
    pub fn new(data: Array1<f32>, requires_grad: bool) -> Self {
        Self {
            data: Rc::new(RefCell::new(data)),
            grad: Rc::new(RefCell::new(None)),
            requires_grad,
            backward_op: RefCell::new(None),
        }
    }

    /// Create a tensor from a Vec
    pub fn from_vec(data: Vec<f32>, requires_grad: bool) -> Self {
        Self::new(Array1::from(data), requires_grad)
    }

    /// Create a zero-filled tensor
    pub fn zeros(len: usize, requires_grad: bool) -> Self {
        Self::new(Array1::zeros(len), requires_grad)
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.data.borrow().len()
    }

    /// Whether the tensor has no elements
    pub fn is_empty(&self) -> bool {
        self.data.borrow().is_empty()
    }

    /// Owned copy of the data
    pub fn data(&self) -> Array1<f32> {
        self.data.borrow().clone()
    }

    /// Mutable access to the shared data
    pub fn data_mut(&self) -> RefMut<'_, Array1<f32>> {
        self.data.borrow_mut()
    }

    /// Data as a plain Vec
    pub fn to_vec(&self) -> Vec<f32> {
        self.data.borrow().to_vec()
    }

    /// Whether gradients are tracked for this tensor
    pub fn requires_grad(&self) -> bool {
        self.requires_grad
    }

    /// Owned copy of the gradient, if any
    pub fn grad(&self) -> Option<Array1<f32>> {
        self.grad.borrow().clone()
    }

    /// The shared gradient cell (used by backward ops)
    pub fn grad_cell(&self) -> Rc<RefCell<Option<Array1<f32>>>> {
        Rc::clone(&self.grad)
    }

    /// Replace the gradient
    pub fn set_grad(&self, grad: Array1<f32>) {
        *self.grad.borrow_mut() = Some(grad);
    }

    /// Add to the gradient, initializing it if absent
    pub fn accumulate_grad(&self, grad: Array1<f32>) {
        let mut cell = self.grad.borrow_mut();
        match cell.as_mut() {
            Some(existing) => *existing = &*existing + &grad,
            None => *cell = Some(grad),
        }
    }

    /// Clear the gradient
    pub fn zero_grad(&self) {
        *self.grad.borrow_mut() = None;
    }

    /// The backward op producing this tensor, if any
    pub fn backward_op(&self) -> Option<Rc<dyn BackwardOp>> {
        self.backward_op.borrow().clone()
    }

    /// Attach the backward op producing this tensor
    pub fn set_backward_op(&mut self, op: Rc<dyn BackwardOp>) {
        *self.backward_op.borrow_mut() = Some(op);
    }
}

impl Clone for Tensor {
    fn clone(&self) -> Self {
        Self {
            data: Rc::clone(&self.data),
            grad: Rc::clone(&self.grad),
            requires_grad: self.requires_grad,
            backward_op: RefCell::new(self.backward_op.borrow().clone()),
        }
    }
}

impl std::fmt::Debug for Tensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tensor")
            .field("data", &self.data.borrow())
            .field("requires_grad", &self.requires_grad)
            .field("has_grad", &self.grad.borrow().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    #[test]
    fn test_tensor_creation() {
        let t = Tensor::from_vec(vec![1.0, 2.0, 3.0], true);
        assert_eq!(t.len(), 3);
        assert!(!t.is_empty());
        assert!(t.requires_grad());
        assert_eq!(t.to_vec(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_tensor_zeros() {
        let t = Tensor::zeros(4, false);
        assert_eq!(t.len(), 4);
        assert!(!t.requires_grad());
        assert!(t.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_clones_share_data() {
        let t = Tensor::from_vec(vec![1.0, 2.0], true);
        let c = t.clone();

        t.data_mut()[0] = 5.0;
        assert_eq!(c.data()[0], 5.0);
    }

    #[test]
    fn test_clones_share_grad() {
        let t = Tensor::from_vec(vec![1.0, 2.0], true);
        let c = t.clone();

        t.set_grad(arr1(&[0.1, 0.2]));
        assert_eq!(c.grad().unwrap(), arr1(&[0.1, 0.2]));
    }

    #[test]
    fn test_accumulate_grad() {
        let t = Tensor::from_vec(vec![1.0, 2.0], true);
        t.accumulate_grad(arr1(&[1.0, 1.0]));
        t.accumulate_grad(arr1(&[0.5, 0.5]));
        assert_eq!(t.grad().unwrap(), arr1(&[1.5, 1.5]));
    }

    #[test]
    fn test_zero_grad() {
        let t = Tensor::from_vec(vec![1.0], true);
        t.set_grad(arr1(&[1.0]));
        assert!(t.grad().is_some());

        t.zero_grad();
        assert!(t.grad().is_none());
    }
}
