/// Coefficients of an explicit embedded Runge-Kutta pair.
///
/// `b` weights the propagated solution of order `order`, `b_tilde` weights the embedded
/// solution one order lower that is only used for the error estimate.
pub struct ButcherTableau<const STAGES: usize> {
    pub a: [[f64; STAGES]; STAGES],
    pub b: [f64; STAGES],
    pub b_tilde: [f64; STAGES],
    pub c: [f64; STAGES],
    pub order: usize,
}

impl ButcherTableau<4> {
    // usage is ButcherTableau::<4>::BOGACKISHAMPINE32
    pub const BOGACKISHAMPINE32: Self = Self {
        a: [
            [0., 0., 0., 0.],
            [1. / 2., 0., 0., 0.],
            [0., 3. / 4., 0., 0.],
            [2. / 9., 1. / 3., 4. / 9., 0.],
        ],
        b: [2. / 9., 1. / 3., 4. / 9., 0.],
        b_tilde: [7. / 24., 1. / 4., 1. / 3., 1. / 8.],
        c: [0., 1. / 2., 3. / 4., 1.],
        order: 3,
    };
}

impl ButcherTableau<6> {
    // usage is ButcherTableau::<6>::FEHLBERG45
    // propagates the fifth order solution (local extrapolation)
    pub const FEHLBERG45: Self = Self {
        a: [
            [0., 0., 0., 0., 0., 0.],
            [1. / 4., 0., 0., 0., 0., 0.],
            [3. / 32., 9. / 32., 0., 0., 0., 0.],
            [1932. / 2197., -7200. / 2197., 7296. / 2197., 0., 0., 0.],
            [439. / 216., -8., 3680. / 513., -845. / 4104., 0., 0.],
            [-8. / 27., 2., -3544. / 2565., 1859. / 4104., -11. / 40., 0.],
        ],
        b: [
            16. / 135.,
            0.,
            6656. / 12825.,
            28561. / 56430.,
            -9. / 50.,
            2. / 55.,
        ],
        b_tilde: [25. / 216., 0., 1408. / 2565., 2197. / 4104., -1. / 5., 0.],
        c: [0., 1. / 4., 3. / 8., 12. / 13., 1., 1. / 2.],
        order: 5,
    };
}

impl ButcherTableau<7> {
    // usage is ButcherTableau::<7>::DORMANDPRINCE45
    pub const DORMANDPRINCE45: Self = Self {
        a: [
            [0., 0., 0., 0., 0., 0., 0.],
            [1. / 5., 0., 0., 0., 0., 0., 0.],
            [3. / 40., 9. / 40., 0., 0., 0., 0., 0.],
            [44. / 45., -56. / 15., 32. / 9., 0., 0., 0., 0.],
            [
                19372. / 6561.,
                -25360. / 2187.,
                64448. / 6561.,
                -212. / 729.,
                0.,
                0.,
                0.,
            ],
            [
                9017. / 3168.,
                -355. / 33.,
                46732. / 5247.,
                49. / 176.,
                -5103. / 18656.,
                0.,
                0.,
            ],
            [
                35. / 384.,
                0.,
                500. / 1113.,
                125. / 192.,
                -2187. / 6784.,
                11. / 84.,
                0.,
            ],
        ],
        b: [
            35. / 384.,
            0.,
            500. / 1113.,
            125. / 192.,
            -2187. / 6784.,
            11. / 84.,
            0.,
        ],
        b_tilde: [
            5179. / 57600.,
            0.,
            7571. / 16695.,
            393. / 640.,
            -92097. / 339200.,
            187. / 2100.,
            1. / 40.,
        ],
        c: [0., 1. / 5., 3. / 10., 4. / 5., 8. / 9., 1.0, 1.0],
        order: 5,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    // row sums of a equal c, and both weight vectors sum to one
    fn check_consistency<const S: usize>(tableau: &ButcherTableau<S>) {
        for s in 0..S {
            let row: f64 = tableau.a[s].iter().sum();
            assert_abs_diff_eq!(row, tableau.c[s], epsilon = 1e-14);
            for i in s..S {
                assert_eq!(tableau.a[s][i], 0.0, "tableau must be explicit");
            }
        }
        assert_abs_diff_eq!(tableau.b.iter().sum::<f64>(), 1.0, epsilon = 1e-14);
        assert_abs_diff_eq!(tableau.b_tilde.iter().sum::<f64>(), 1.0, epsilon = 1e-14);
    }

    #[test]
    fn test_tableaus_are_consistent() {
        check_consistency(&ButcherTableau::<4>::BOGACKISHAMPINE32);
        check_consistency(&ButcherTableau::<6>::FEHLBERG45);
        check_consistency(&ButcherTableau::<7>::DORMANDPRINCE45);
    }
}
