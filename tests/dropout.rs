use convae::math::Matrix;
use convae::optim::{DropoutStack, OptParams, SGD};

#[test]
fn rate_zero_is_identity() {
    let mut stack = DropoutStack::new();
    let x = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let y = stack.dropout(&x, 0.0);
    assert_eq!(y, x);
}

#[test]
fn kept_elements_are_scaled_to_preserve_expectation() {
    let mut stack = DropoutStack::new();
    let x = Matrix::from_vec(1, 1000, vec![1.0; 1000]);
    let y = stack.dropout(&x, 0.5);
    let mut kept = 0usize;
    for &v in y.data.iter() {
        assert!(v == 0.0 || (v - 2.0).abs() < 1e-12);
        if v != 0.0 {
            kept += 1;
        }
    }
    // roughly half survive
    assert!(kept > 300 && kept < 700);
}

#[test]
fn de_dropout_reapplies_the_matching_mask() {
    let mut stack = DropoutStack::new();
    let x = Matrix::from_vec(1, 64, vec![1.0; 64]);
    let dropped = stack.dropout(&x, 0.5);
    let restored = stack.de_dropout(&x);
    // the same units are silenced in both directions
    for (d, r) in dropped.data.iter().zip(restored.data.iter()) {
        assert_eq!(*d == 0.0, *r == 0.0);
        assert_eq!(d, r);
    }
}

#[test]
fn masks_pop_in_reverse_order() {
    let mut stack = DropoutStack::new();
    let x = Matrix::from_vec(1, 32, vec![1.0; 32]);
    let first = stack.dropout(&x, 0.5);
    let second = stack.dropout(&x, 0.5);
    let undo_second = stack.de_dropout(&x);
    let undo_first = stack.de_dropout(&x);
    assert_eq!(undo_second, second);
    assert_eq!(undo_first, first);
}

#[test]
fn de_dropout_without_mask_passes_through() {
    let mut stack = DropoutStack::new();
    let x = Matrix::from_vec(1, 4, vec![1.0, 2.0, 3.0, 4.0]);
    assert_eq!(stack.de_dropout(&x), x);
}

#[test]
fn optimizer_exposes_the_configured_rate() {
    let sgd = SGD::new(0.0, 0.25);
    assert_eq!(sgd.dropout_rate(), 0.25);
}
