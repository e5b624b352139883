//! Reusable penalty expansions over binary variables.
//!
//! Each function adds `lambda` times a polynomial that is zero exactly
//! when its relation holds. Constants of the expansion go to the offset.
//!
//! | Function | Penalty | Zero iff |
//! |----------|---------|----------|
//! | [`one_hot`] | `(Σv − 1)²` | exactly one `v` set |
//! | [`at_most_one`] | `2 Σ_{a<b} v_a v_b` | at most one `v` set |
//! | [`sum_equals_sum`] | `(Σa − Σb)²` | equal counts |
//! | [`and_link`] | `xy − 2xw − 2yw + 3w` | `w = x ∧ y` |
//! | [`upper_bound`] | `w (1 − Σb)` | `w ≤ Σb` (for `Σb ≤ 1`) |
//! | [`exclusive_upper_bound`] | `w (1 − Σb) + Σ_{a<c} b_a b_c` | `w ≤ Σb ≤ 1` (≥ 0 always) |
//! | [`sum_equals_scaled`] | `(Σw − p·x)²` | `Σw = p·x` |

use super::Qubo;

/// `lambda · (Σ v_i − 1)²`.
///
/// Expanded as `+λ v_i` (from `v_i²`), `−2λ v_i`, `+2λ v_a v_b` for `a < b`,
/// and `+λ` into the offset.
pub fn one_hot(qubo: &mut Qubo, vars: &[usize], lambda: f64) {
    for &v in vars {
        qubo.add_linear(v, lambda);
        qubo.add_linear(v, -2.0 * lambda);
    }
    add_pairs(qubo, vars, 2.0 * lambda);
    qubo.add_offset(lambda);
}

/// `lambda · 2 Σ_{a<b} v_a v_b`.
///
/// Punishes collisions only; an all-zero family costs nothing.
pub fn at_most_one(qubo: &mut Qubo, vars: &[usize], lambda: f64) {
    add_pairs(qubo, vars, 2.0 * lambda);
}

/// `lambda · (Σ a_i − Σ b_j)²`.
pub fn sum_equals_sum(qubo: &mut Qubo, a: &[usize], b: &[usize], lambda: f64) {
    for &v in a.iter().chain(b) {
        qubo.add_linear(v, lambda);
    }
    add_pairs(qubo, a, 2.0 * lambda);
    add_pairs(qubo, b, 2.0 * lambda);
    for &i in a {
        for &j in b {
            qubo.add_quadratic(i, j, -2.0 * lambda);
        }
    }
}

/// `lambda · (xy − 2xw − 2yw + 3w)`, zero iff `w = x ∧ y`.
///
/// | x | y | w | penalty |
/// |---|---|---|---------|
/// | any | any | `x ∧ y` | 0 |
/// | 1 | 1 | 0 | λ |
/// | 1 | 0 | 1 | λ |
/// | 0 | 1 | 1 | λ |
/// | 0 | 0 | 1 | 3λ |
pub fn and_link(qubo: &mut Qubo, x: usize, y: usize, w: usize, lambda: f64) {
    qubo.add_quadratic(x, y, lambda);
    qubo.add_quadratic(x, w, -2.0 * lambda);
    qubo.add_quadratic(y, w, -2.0 * lambda);
    qubo.add_linear(w, 3.0 * lambda);
}

/// `lambda · w (1 − Σ b_i)`.
///
/// Encodes `w ≤ Σ b`. Non-negative whenever at most one `b` is set;
/// with an empty `bounds` it forces `w = 0`.
pub fn upper_bound(qubo: &mut Qubo, w: usize, bounds: &[usize], lambda: f64) {
    qubo.add_linear(w, lambda);
    for &b in bounds {
        qubo.add_quadratic(w, b, -lambda);
    }
}

/// `lambda · (w (1 − Σ b_i) + Σ_{a<c} b_a b_c)`.
///
/// [`upper_bound`] plus an at-most-one term over `bounds`, so the
/// penalty is non-negative for every count `k` of set bounds:
/// `(k − 1)(k − 2) / 2` with `w` set, `k(k − 1) / 2` without.
pub fn exclusive_upper_bound(qubo: &mut Qubo, w: usize, bounds: &[usize], lambda: f64) {
    upper_bound(qubo, w, bounds, lambda);
    add_pairs(qubo, bounds, lambda);
}

/// `lambda · (Σ w_i − p·x)²`.
///
/// Expanded as `(Σw)²` (linear `λ`, pairs `2λ`), cross terms `−2pλ w_i x`,
/// and `p²λ x` (from `x² = x`).
pub fn sum_equals_scaled(qubo: &mut Qubo, ws: &[usize], x: usize, p: f64, lambda: f64) {
    for &w in ws {
        qubo.add_linear(w, lambda);
    }
    add_pairs(qubo, ws, 2.0 * lambda);
    for &w in ws {
        qubo.add_quadratic(w, x, -2.0 * p * lambda);
    }
    qubo.add_linear(x, p * p * lambda);
}

fn add_pairs(qubo: &mut Qubo, vars: &[usize], coeff: f64) {
    for (a, &va) in vars.iter().enumerate() {
        for &vb in &vars[a + 1..] {
            qubo.add_quadratic(va, vb, coeff);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    fn bits(mask: u32, n: usize) -> Vec<bool> {
        (0..n).map(|i| mask & (1 << i) != 0).collect()
    }

    #[test]
    fn test_one_hot_penalty_by_count() {
        let vars = [0, 1, 2, 3];
        let mut q = Qubo::new();
        one_hot(&mut q, &vars, 5.0);

        for mask in 0..16u32 {
            let k = mask.count_ones() as f64;
            let expected = 5.0 * (k - 1.0) * (k - 1.0);
            assert!((q.energy(&bits(mask, 4)) - expected).abs() < EPS, "mask {mask}");
        }
    }

    #[test]
    fn test_one_hot_coefficients() {
        let mut q = Qubo::new();
        one_hot(&mut q, &[0, 1], 2.0);
        assert!((q.coefficient(0, 0) + 2.0).abs() < EPS);
        assert!((q.coefficient(0, 1) - 4.0).abs() < EPS);
        assert!((q.offset() - 2.0).abs() < EPS);
    }

    #[test]
    fn test_at_most_one_has_no_linear_terms() {
        let mut q = Qubo::new();
        at_most_one(&mut q, &[0, 1, 2], 1.5);
        assert_eq!(q.stats(3).num_linear, 0);
        assert_eq!(q.energy(&[false, false, false]), 0.0);
        assert_eq!(q.energy(&[true, false, false]), 0.0);
        assert!((q.energy(&[true, true, false]) - 3.0).abs() < EPS);
        assert!((q.energy(&[true, true, true]) - 9.0).abs() < EPS);
    }

    #[test]
    fn test_sum_equals_sum() {
        let a = [0, 1];
        let b = [2, 3, 4];
        let mut q = Qubo::new();
        sum_equals_sum(&mut q, &a, &b, 2.0);

        for mask in 0..32u32 {
            let s = bits(mask, 5);
            let ka = a.iter().filter(|&&i| s[i]).count() as f64;
            let kb = b.iter().filter(|&&i| s[i]).count() as f64;
            let expected = 2.0 * (ka - kb) * (ka - kb);
            assert!((q.energy(&s) - expected).abs() < EPS);
        }
    }

    #[test]
    fn test_and_link_truth_table() {
        // (x, y, w, penalty / lambda)
        let table = [
            (false, false, false, 0.0),
            (false, true, false, 0.0),
            (true, false, false, 0.0),
            (true, true, true, 0.0),
            (true, true, false, 1.0),
            (true, false, true, 1.0),
            (false, true, true, 1.0),
            (false, false, true, 3.0),
        ];
        let mut q = Qubo::new();
        and_link(&mut q, 0, 1, 2, 4.0);

        for (x, y, w, expected) in table {
            let e = q.energy(&[x, y, w]);
            assert!((e - 4.0 * expected).abs() < EPS, "x={x} y={y} w={w}");
            assert_eq!(e == 0.0, w == (x && y));
        }
    }

    #[test]
    fn test_upper_bound() {
        let mut q = Qubo::new();
        upper_bound(&mut q, 0, &[1, 2], 1.0);
        assert_eq!(q.energy(&[false, false, false]), 0.0);
        assert_eq!(q.energy(&[true, false, false]), 1.0);
        assert_eq!(q.energy(&[true, true, false]), 0.0);
        assert_eq!(q.energy(&[true, false, true]), 0.0);
        assert_eq!(q.energy(&[false, true, true]), 0.0);
    }

    #[test]
    fn test_upper_bound_empty_forces_zero() {
        let mut q = Qubo::new();
        upper_bound(&mut q, 0, &[], 2.0);
        assert_eq!(q.energy(&[true]), 2.0);
        assert_eq!(q.energy(&[false]), 0.0);
    }

    #[test]
    fn test_exclusive_upper_bound_never_negative() {
        let bounds = [1, 2, 3, 4];
        let mut q = Qubo::new();
        exclusive_upper_bound(&mut q, 0, &bounds, 2.0);

        for mask in 0..32u32 {
            let s = bits(mask, 5);
            let k = bounds.iter().filter(|&&i| s[i]).count() as f64;
            let expected = if s[0] {
                2.0 * (k - 1.0) * (k - 2.0) / 2.0
            } else {
                2.0 * k * (k - 1.0) / 2.0
            };
            assert!((q.energy(&s) - expected).abs() < EPS, "mask {mask}");
            assert!(q.energy(&s) > -EPS);
        }
        // Zero on `w ≤ Σb ≤ 1`, positive for `w` without a bound.
        assert_eq!(q.energy(&[true, false, true, false, false]), 0.0);
        assert_eq!(q.energy(&[true, false, false, false, false]), 2.0);
    }

    #[test]
    fn test_sum_equals_scaled() {
        let ws = [0, 1, 2];
        let x = 3;
        let mut q = Qubo::new();
        sum_equals_scaled(&mut q, &ws, x, 2.0, 1.5);

        for mask in 0..16u32 {
            let s = bits(mask, 4);
            let sw = ws.iter().filter(|&&i| s[i]).count() as f64;
            let px = if s[x] { 2.0 } else { 0.0 };
            let expected = 1.5 * (sw - px) * (sw - px);
            assert!((q.energy(&s) - expected).abs() < EPS);
        }
    }

    proptest! {
        #[test]
        fn prop_one_hot_penalty(n in 1usize..8, mask in any::<u32>(), lambda in 0.1f64..20.0) {
            let vars: Vec<usize> = (0..n).collect();
            let mut q = Qubo::new();
            one_hot(&mut q, &vars, lambda);
            let sample = bits(mask, n);
            let k = sample.iter().filter(|&&b| b).count() as f64;
            let expected = lambda * (k - 1.0) * (k - 1.0);
            prop_assert!((q.energy(&sample) - expected).abs() < 1e-7);
        }
    }
}
