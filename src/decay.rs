//! Per-trial decay schedules for the learning rate and exploration rate.
//!
//! Alpha and epsilon follow two independent schedules so that how fast the
//! agent stops exploring can be tuned separately from how fast it stops
//! updating its estimates. Each schedule is a tagged variant carrying its
//! numeric parameters; the legacy string descriptors (`"1/t"`, `"r99.5"`,
//! `"inv_sigmoid_k0.03o100"`, ...) parse into these variants exactly once,
//! at configuration time, via [`FromStr`].
//!
//! Every application clamps its result to `[0, 1]`: several formulas
//! (`cos`, linear decrement) leave that interval on their own, and the
//! consumers are probability comparisons that must never see an
//! out-of-range value.

use std::f64::consts::E;
use std::str::FromStr;

use crate::error::ConfigError;

/// Minimum alpha enforced by [`AlphaDecay::CappedGeometric`].
pub const ALPHA_FLOOR: f64 = 0.001;

/// Clamps a rate to the closed interval `[0, 1]`.
pub(crate) fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Schedule for the learning rate alpha, applied once per trial.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlphaDecay {
    /// Alpha is held at its previous value.
    None,
    /// `a - rate` each trial.
    Linear(f64),
    /// `1/t`.
    InverseT,
    /// `1/t²`.
    InverseTSquared,
    /// `1/ln(t + e - 1)`; the offset keeps the log argument above 1 for t ≥ 1.
    InverseLogT,
    /// `a/2` each trial.
    Halving,
    /// `fraction · a` each trial, fraction parsed from a percentage (`"r90"` → 0.90).
    Geometric(f64),
    /// Geometric decay floored at [`ALPHA_FLOOR`] (`"cr90"`).
    CappedGeometric(f64),
}

impl AlphaDecay {
    /// Computes the alpha for a new trial.
    ///
    /// `trial` is the 1-based trial index (incremented before the schedule
    /// runs). The result is clamped to `[0, 1]`.
    pub fn apply(&self, alpha: f64, trial: u32) -> f64 {
        let t = trial as f64;
        let next = match self {
            AlphaDecay::None => alpha,
            AlphaDecay::Linear(rate) => alpha - rate,
            AlphaDecay::InverseT => 1.0 / t,
            AlphaDecay::InverseTSquared => 1.0 / (t * t),
            AlphaDecay::InverseLogT => 1.0 / (t + E - 1.0).ln(),
            AlphaDecay::Halving => alpha / 2.0,
            AlphaDecay::Geometric(fraction) => fraction * alpha,
            AlphaDecay::CappedGeometric(fraction) => (fraction * alpha).max(ALPHA_FLOOR),
        };
        clamp_unit(next)
    }
}

impl FromStr for AlphaDecay {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, ConfigError> {
        if let Ok(rate) = s.parse::<f64>() {
            return Ok(AlphaDecay::Linear(rate));
        }
        match s {
            "none" => Ok(AlphaDecay::None),
            "1/t" => Ok(AlphaDecay::InverseT),
            "1/t2" => Ok(AlphaDecay::InverseTSquared),
            "1/logt" => Ok(AlphaDecay::InverseLogT),
            "half" => Ok(AlphaDecay::Halving),
            _ => {
                if let Some(pct) = s.strip_prefix("cr") {
                    Ok(AlphaDecay::CappedGeometric(parse_float(pct, s)? / 100.0))
                } else if let Some(pct) = s.strip_prefix('r') {
                    Ok(AlphaDecay::Geometric(parse_float(pct, s)? / 100.0))
                } else {
                    Err(ConfigError::UnknownAlphaDecay(s.to_string()))
                }
            }
        }
    }
}

/// Schedule for the exploration rate epsilon, applied once per trial.
///
/// Alpha-coupled modes read the alpha of the *same* trial: the alpha
/// schedule runs first within a reset.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EpsilonDecay {
    /// Epsilon is held at its previous value.
    None,
    /// `e - rate` each trial.
    Linear(f64),
    /// `a^t`.
    AlphaPowT,
    /// Epsilon tracks alpha exactly.
    Alpha,
    /// `a²`.
    AlphaSquared,
    /// `1/t`.
    InverseT,
    /// `1/t²`.
    InverseTSquared,
    /// `exp(-a·t)`.
    ExpAlphaT,
    /// `exp(-rate·t)` (`"ert0.05"`).
    ExpRateT(f64),
    /// `exp(-t)`.
    ExpT,
    /// `cos(a·t)`; negative lobes clamp to 0, i.e. no exploration.
    CosAlphaT,
    /// `fraction · e` each trial (`"r99.5"` → 0.995).
    Geometric(f64),
    /// Smooth S-curve `1 - 1/(1 + exp(-k·(t - offset)))`, near 1 until
    /// trial `offset`, then falling at a rate set by `k`. With
    /// `with_alpha`, the exponent is additionally scaled by alpha.
    InverseSigmoid {
        k: f64,
        offset: f64,
        with_alpha: bool,
    },
}

impl EpsilonDecay {
    /// Computes the epsilon for a new trial.
    ///
    /// `alpha` is the already-updated learning rate for the same trial;
    /// `trial` is the 1-based trial index. The result is clamped to `[0, 1]`.
    pub fn apply(&self, epsilon: f64, alpha: f64, trial: u32) -> f64 {
        let t = trial as f64;
        let next = match self {
            EpsilonDecay::None => epsilon,
            EpsilonDecay::Linear(rate) => epsilon - rate,
            EpsilonDecay::AlphaPowT => alpha.powf(t),
            EpsilonDecay::Alpha => alpha,
            EpsilonDecay::AlphaSquared => alpha * alpha,
            EpsilonDecay::InverseT => 1.0 / t,
            EpsilonDecay::InverseTSquared => 1.0 / (t * t),
            EpsilonDecay::ExpAlphaT => (-alpha * t).exp(),
            EpsilonDecay::ExpRateT(rate) => (-rate * t).exp(),
            EpsilonDecay::ExpT => (-t).exp(),
            EpsilonDecay::CosAlphaT => (alpha * t).cos(),
            EpsilonDecay::Geometric(fraction) => fraction * epsilon,
            EpsilonDecay::InverseSigmoid {
                k,
                offset,
                with_alpha,
            } => {
                let scale = if *with_alpha { k * alpha } else { *k };
                1.0 - 1.0 / (1.0 + (-scale * (t - offset)).exp())
            }
        };
        clamp_unit(next)
    }
}

impl FromStr for EpsilonDecay {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, ConfigError> {
        if let Ok(rate) = s.parse::<f64>() {
            return Ok(EpsilonDecay::Linear(rate));
        }
        match s {
            "none" => Ok(EpsilonDecay::None),
            "a^t" => Ok(EpsilonDecay::AlphaPowT),
            "a" => Ok(EpsilonDecay::Alpha),
            "a2" => Ok(EpsilonDecay::AlphaSquared),
            "1/t" => Ok(EpsilonDecay::InverseT),
            "1/t2" => Ok(EpsilonDecay::InverseTSquared),
            "eat" => Ok(EpsilonDecay::ExpAlphaT),
            "et" => Ok(EpsilonDecay::ExpT),
            "cat" => Ok(EpsilonDecay::CosAlphaT),
            _ => {
                if let Some(rest) = s.strip_prefix("inv_sigmoida") {
                    parse_sigmoid(rest, s, true)
                } else if let Some(rest) = s.strip_prefix("inv_sigmoid") {
                    parse_sigmoid(rest, s, false)
                } else if let Some(rate) = s.strip_prefix("ert") {
                    Ok(EpsilonDecay::ExpRateT(parse_float(rate, s)?))
                } else if let Some(pct) = s.strip_prefix('r') {
                    Ok(EpsilonDecay::Geometric(parse_float(pct, s)? / 100.0))
                } else {
                    Err(ConfigError::UnknownEpsilonDecay(s.to_string()))
                }
            }
        }
    }
}

fn parse_float(text: &str, mode: &str) -> Result<f64, ConfigError> {
    text.parse::<f64>()
        .map_err(|_| ConfigError::MalformedDecayParameter {
            mode: mode.to_string(),
            reason: format!("`{text}` is not a number"),
        })
}

/// Parses the `[_]k<k>o<offset>` tail of an inverse-sigmoid descriptor.
fn parse_sigmoid(rest: &str, mode: &str, with_alpha: bool) -> Result<EpsilonDecay, ConfigError> {
    let rest = rest.strip_prefix('_').unwrap_or(rest);
    let body = rest
        .strip_prefix('k')
        .ok_or_else(|| ConfigError::MalformedDecayParameter {
            mode: mode.to_string(),
            reason: "missing `k` marker".to_string(),
        })?;
    let (k, offset) = body
        .split_once('o')
        .ok_or_else(|| ConfigError::MalformedDecayParameter {
            mode: mode.to_string(),
            reason: "missing `o` marker".to_string(),
        })?;
    Ok(EpsilonDecay::InverseSigmoid {
        k: parse_float(k, mode)?,
        offset: parse_float(offset, mode)?,
        with_alpha,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    #[test]
    fn linear_alpha_decay() {
        let decay = AlphaDecay::Linear(0.05);
        assert!((decay.apply(0.5, 1) - 0.45).abs() < TOL);
    }

    #[test]
    fn linear_alpha_decay_clamps_at_zero() {
        let decay = AlphaDecay::Linear(0.3);
        assert_eq!(decay.apply(0.2, 7), 0.0);
    }

    #[test]
    fn inverse_t_alpha() {
        assert!((AlphaDecay::InverseT.apply(0.9, 4) - 0.25).abs() < TOL);
        // t = 1 saturates at the clamp boundary
        assert_eq!(AlphaDecay::InverseT.apply(0.9, 1), 1.0);
    }

    #[test]
    fn inverse_t_squared_alpha() {
        assert!((AlphaDecay::InverseTSquared.apply(0.9, 4) - 1.0 / 16.0).abs() < TOL);
    }

    #[test]
    fn inverse_log_t_alpha() {
        // t = 1: argument is exactly e, so alpha = 1/ln(e) = 1
        assert!((AlphaDecay::InverseLogT.apply(0.5, 1) - 1.0).abs() < TOL);
        let expected = 1.0 / (10.0 + std::f64::consts::E - 1.0).ln();
        assert!((AlphaDecay::InverseLogT.apply(0.5, 10) - expected).abs() < TOL);
    }

    #[test]
    fn halving_alpha() {
        assert!((AlphaDecay::Halving.apply(0.5, 3) - 0.25).abs() < TOL);
    }

    #[test]
    fn geometric_alpha() {
        let decay = AlphaDecay::Geometric(0.90);
        assert!((decay.apply(0.2, 1) - 0.18).abs() < TOL);
    }

    #[test]
    fn capped_geometric_hits_floor_exactly() {
        let decay = AlphaDecay::CappedGeometric(0.10);
        // 0.10 · 0.01 lands right on the floor, never below it
        let at_floor = decay.apply(0.01, 1);
        assert!(at_floor >= ALPHA_FLOOR);
        assert!((at_floor - ALPHA_FLOOR).abs() < 1e-15);
        // further decay is held at the floor
        assert_eq!(decay.apply(0.001, 2), ALPHA_FLOOR);
    }

    #[test]
    fn none_holds_value() {
        assert_eq!(AlphaDecay::None.apply(0.37, 12), 0.37);
        assert_eq!(EpsilonDecay::None.apply(0.61, 0.3, 12), 0.61);
    }

    #[test]
    fn epsilon_tracks_alpha_family() {
        assert_eq!(EpsilonDecay::Alpha.apply(1.0, 0.4, 5), 0.4);
        assert!((EpsilonDecay::AlphaSquared.apply(1.0, 0.4, 5) - 0.16).abs() < TOL);
        assert!((EpsilonDecay::AlphaPowT.apply(1.0, 0.5, 3) - 0.125).abs() < TOL);
    }

    #[test]
    fn epsilon_inverse_t() {
        assert!((EpsilonDecay::InverseT.apply(1.0, 0.5, 4) - 0.25).abs() < TOL);
        assert!((EpsilonDecay::InverseTSquared.apply(1.0, 0.5, 2) - 0.25).abs() < TOL);
    }

    #[test]
    fn epsilon_exponential_family() {
        assert!((EpsilonDecay::ExpAlphaT.apply(1.0, 0.5, 2) - (-1.0f64).exp()).abs() < TOL);
        assert!((EpsilonDecay::ExpRateT(0.05).apply(1.0, 0.5, 10) - (-0.5f64).exp()).abs() < TOL);
        assert!((EpsilonDecay::ExpT.apply(1.0, 0.5, 3) - (-3.0f64).exp()).abs() < TOL);
    }

    #[test]
    fn cosine_clamps_negative_lobe_to_zero() {
        // a·t = 1·π lands on cos = -1
        let decay = EpsilonDecay::CosAlphaT;
        assert_eq!(decay.apply(1.0, std::f64::consts::PI, 1), 0.0);
        assert!((decay.apply(1.0, 0.5, 2) - 1.0f64.cos()).abs() < TOL);
    }

    #[test]
    fn geometric_epsilon() {
        let decay = EpsilonDecay::Geometric(0.995);
        assert!((decay.apply(1.0, 0.5, 1) - 0.995).abs() < TOL);
    }

    #[test]
    fn inverse_sigmoid_midpoint_at_offset() {
        let decay = EpsilonDecay::InverseSigmoid {
            k: 0.03,
            offset: 100.0,
            with_alpha: false,
        };
        assert!((decay.apply(1.0, 0.5, 100) - 0.5).abs() < TOL);
    }

    #[test]
    fn inverse_sigmoid_shape() {
        let decay = EpsilonDecay::InverseSigmoid {
            k: 0.03,
            offset: 100.0,
            with_alpha: false,
        };
        let early = decay.apply(1.0, 0.5, 1);
        let late = decay.apply(1.0, 0.5, 200);
        assert!(early > 0.9);
        assert!(late < 0.1);
    }

    #[test]
    fn inverse_sigmoid_with_alpha_scales_exponent() {
        let with = EpsilonDecay::InverseSigmoid {
            k: 2.6,
            offset: 60.0,
            with_alpha: true,
        };
        let expected = 1.0 - 1.0 / (1.0 + (-2.6_f64 * 0.15 * (80.0 - 60.0)).exp());
        assert!((with.apply(1.0, 0.15, 80) - expected).abs() < TOL);
    }

    #[test]
    fn linear_epsilon_clamps_both_ends() {
        assert_eq!(EpsilonDecay::Linear(0.5).apply(0.2, 0.5, 1), 0.0);
        assert_eq!(EpsilonDecay::Linear(-0.5).apply(0.8, 0.5, 1), 1.0);
    }

    #[test]
    fn parse_alpha_modes() {
        assert_eq!("0.05".parse::<AlphaDecay>(), Ok(AlphaDecay::Linear(0.05)));
        assert_eq!("1/t".parse::<AlphaDecay>(), Ok(AlphaDecay::InverseT));
        assert_eq!("1/t2".parse::<AlphaDecay>(), Ok(AlphaDecay::InverseTSquared));
        assert_eq!("1/logt".parse::<AlphaDecay>(), Ok(AlphaDecay::InverseLogT));
        assert_eq!("half".parse::<AlphaDecay>(), Ok(AlphaDecay::Halving));
        assert_eq!("none".parse::<AlphaDecay>(), Ok(AlphaDecay::None));
        assert_eq!("r90".parse::<AlphaDecay>(), Ok(AlphaDecay::Geometric(0.90)));
        assert_eq!(
            "cr99.5".parse::<AlphaDecay>(),
            Ok(AlphaDecay::CappedGeometric(0.995))
        );
    }

    #[test]
    fn parse_epsilon_modes() {
        assert_eq!("0.05".parse::<EpsilonDecay>(), Ok(EpsilonDecay::Linear(0.05)));
        assert_eq!("a^t".parse::<EpsilonDecay>(), Ok(EpsilonDecay::AlphaPowT));
        assert_eq!("a".parse::<EpsilonDecay>(), Ok(EpsilonDecay::Alpha));
        assert_eq!("a2".parse::<EpsilonDecay>(), Ok(EpsilonDecay::AlphaSquared));
        assert_eq!("eat".parse::<EpsilonDecay>(), Ok(EpsilonDecay::ExpAlphaT));
        assert_eq!("et".parse::<EpsilonDecay>(), Ok(EpsilonDecay::ExpT));
        assert_eq!("cat".parse::<EpsilonDecay>(), Ok(EpsilonDecay::CosAlphaT));
        assert_eq!(
            "ert0.05".parse::<EpsilonDecay>(),
            Ok(EpsilonDecay::ExpRateT(0.05))
        );
        assert_eq!(
            "r99.5".parse::<EpsilonDecay>(),
            Ok(EpsilonDecay::Geometric(0.995))
        );
    }

    #[test]
    fn parse_inverse_sigmoid_variants() {
        assert_eq!(
            "inv_sigmoid_k0.03o100".parse::<EpsilonDecay>(),
            Ok(EpsilonDecay::InverseSigmoid {
                k: 0.03,
                offset: 100.0,
                with_alpha: false,
            })
        );
        assert_eq!(
            "inv_sigmoidk2.6o60".parse::<EpsilonDecay>(),
            Ok(EpsilonDecay::InverseSigmoid {
                k: 2.6,
                offset: 60.0,
                with_alpha: false,
            })
        );
        assert_eq!(
            "inv_sigmoidak1.5o40".parse::<EpsilonDecay>(),
            Ok(EpsilonDecay::InverseSigmoid {
                k: 1.5,
                offset: 40.0,
                with_alpha: true,
            })
        );
    }

    #[test]
    fn parse_rejects_unknown_modes() {
        assert_eq!(
            "bogus".parse::<AlphaDecay>(),
            Err(ConfigError::UnknownAlphaDecay("bogus".to_string()))
        );
        assert_eq!(
            "sigmoid".parse::<EpsilonDecay>(),
            Err(ConfigError::UnknownEpsilonDecay("sigmoid".to_string()))
        );
    }

    #[test]
    fn parse_rejects_malformed_parameters() {
        assert!(matches!(
            "rxyz".parse::<AlphaDecay>(),
            Err(ConfigError::MalformedDecayParameter { .. })
        ));
        assert!(matches!(
            "inv_sigmoid_k0.03".parse::<EpsilonDecay>(),
            Err(ConfigError::MalformedDecayParameter { .. })
        ));
        assert!(matches!(
            "inv_sigmoid_0.03o100".parse::<EpsilonDecay>(),
            Err(ConfigError::MalformedDecayParameter { .. })
        ));
        assert!(matches!(
            "ert".parse::<EpsilonDecay>(),
            Err(ConfigError::MalformedDecayParameter { .. })
        ));
    }
}
