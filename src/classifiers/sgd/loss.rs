/// Logistic loss for targets in {-1, +1}. Both functions take the raw
/// decision value `p` and the signed target `y`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogLoss;

impl LogLoss {
    pub fn loss(p: f64, y: f64) -> f64 {
        let z = p * y;
        if z > 18.0 {
            (-z).exp()
        } else if z < -18.0 {
            -z
        } else {
            (-z).exp().ln_1p()
        }
    }

    pub fn dloss(p: f64, y: f64) -> f64 {
        let z = p * y;
        if z > 18.0 {
            -y * (-z).exp()
        } else if z < -18.0 {
            -y
        } else {
            -y / (z.exp() + 1.0)
        }
    }
}

#[inline]
pub fn sigmoid(d: f64) -> f64 {
    if d >= 0.0 {
        1.0 / (1.0 + (-d).exp())
    } else {
        let e = d.exp();
        e / (1.0 + e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn loss_at_zero_margin_is_ln2() {
        assert!(approx(LogLoss::loss(0.0, 1.0), std::f64::consts::LN_2, 1e-12));
        assert!(approx(LogLoss::dloss(0.0, 1.0), -0.5, 1e-12));
        assert!(approx(LogLoss::dloss(0.0, -1.0), 0.5, 1e-12));
    }

    #[test]
    fn saturated_regions_are_continuous_enough() {
        assert!(approx(LogLoss::loss(18.1, 1.0), (-18.1f64).exp(), 1e-15));
        assert!(approx(LogLoss::loss(-30.0, 1.0), 30.0, 1e-12));
        assert!(approx(LogLoss::dloss(-30.0, 1.0), -1.0, 1e-12));
        assert!(LogLoss::dloss(30.0, 1.0).abs() < 1e-12);
    }

    #[test]
    fn dloss_matches_numeric_derivative() {
        let h = 1e-6;
        for &p in &[-3.0, -0.4, 0.0, 0.7, 5.0] {
            for &y in &[-1.0, 1.0] {
                let numeric = (LogLoss::loss(p + h, y) - LogLoss::loss(p - h, y)) / (2.0 * h);
                assert!(
                    approx(numeric, LogLoss::dloss(p, y), 1e-6),
                    "p={p} y={y} numeric={numeric}"
                );
            }
        }
    }

    #[test]
    fn sigmoid_is_stable_and_symmetric() {
        assert!(approx(sigmoid(0.0), 0.5, 1e-15));
        assert!(approx(sigmoid(2.0) + sigmoid(-2.0), 1.0, 1e-12));
        assert!(sigmoid(-800.0) >= 0.0);
        assert!(sigmoid(800.0) <= 1.0);
    }
}
