/// Non-linear time remapping applied to raw progress before an effect uses it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    Linear,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    /// Overshoots past 1 before settling.
    OutBack,
    /// Damped-oscillation settle into 1.
    OutElastic,
    /// Triangular ping-pong: 0 → 1 at the midpoint → back to 0.
    Triangle,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::OutBack => {
                const C1: f64 = 1.70158;
                const C3: f64 = C1 + 1.0;
                1.0 + C3 * (t - 1.0).powi(3) + C1 * (t - 1.0).powi(2)
            }
            Self::OutElastic => {
                const TWO_PI_OVER_3: f64 = std::f64::consts::TAU / 3.0;
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else {
                    (2.0f64).powf(-10.0 * t) * ((t * 10.0 - 0.75) * TWO_PI_OVER_3).sin() + 1.0
                }
            }
            Self::Triangle => 1.0 - (1.0 - 2.0 * t).abs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MONOTONE: &[Ease] = &[
        Ease::Linear,
        Ease::InQuad,
        Ease::OutQuad,
        Ease::InOutQuad,
        Ease::InCubic,
        Ease::OutCubic,
        Ease::InOutCubic,
    ];

    #[test]
    fn endpoints_are_stable() {
        for ease in [
            Ease::Linear,
            Ease::InQuad,
            Ease::OutQuad,
            Ease::InOutQuad,
            Ease::InCubic,
            Ease::OutCubic,
            Ease::InOutCubic,
            Ease::OutBack,
            Ease::OutElastic,
        ] {
            assert!((ease.apply(0.0)).abs() < 1e-12, "{ease:?} at 0");
            assert!((ease.apply(1.0) - 1.0).abs() < 1e-12, "{ease:?} at 1");
        }
    }

    #[test]
    fn monotonic_spot_check() {
        for ease in MONOTONE {
            let a = ease.apply(0.25);
            let b = ease.apply(0.5);
            let c = ease.apply(0.75);
            assert!(a < b, "{ease:?}");
            assert!(b < c, "{ease:?}");
        }
    }

    #[test]
    fn out_back_overshoots_then_settles() {
        assert!(Ease::OutBack.apply(0.85) > 1.0);
        assert!((Ease::OutBack.apply(1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn triangle_peaks_at_midpoint_and_returns_to_zero() {
        assert_eq!(Ease::Triangle.apply(0.0), 0.0);
        assert_eq!(Ease::Triangle.apply(0.5), 1.0);
        assert_eq!(Ease::Triangle.apply(1.0), 0.0);
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        assert_eq!(Ease::Linear.apply(-2.0), 0.0);
        assert_eq!(Ease::Linear.apply(3.0), 1.0);
    }
}
