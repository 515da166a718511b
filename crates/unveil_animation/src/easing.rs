//! Easing curves
//!
//! Curves are addressed by GSAP-style identifiers so reveal configurations can
//! carry them as plain strings:
//!
//! ```rust
//! use unveil_animation::{EaseMode, Easing};
//!
//! let ease: Easing = "elastic.out(1, 0.3)".parse().unwrap();
//! assert_eq!(
//!     ease,
//!     Easing::Elastic { amplitude: 1.0, period: 0.3, mode: EaseMode::Out }
//! );
//! ```

use std::f32::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const TAU: f32 = 2.0 * PI;

/// Default overshoot for `back` curves
pub const BACK_OVERSHOOT: f32 = 1.70158;

/// Which end of the curve the acceleration sits on
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EaseMode {
    In,
    #[default]
    Out,
    InOut,
}

impl EaseMode {
    fn as_str(self) -> &'static str {
        match self {
            EaseMode::In => "in",
            EaseMode::Out => "out",
            EaseMode::InOut => "inOut",
        }
    }
}

/// Easing function type
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    #[default]
    Linear,
    /// Polynomial curve of degree `power + 1` (`power1` = quad, `power4` = quint)
    Power(u8, EaseMode),
    Sine(EaseMode),
    Expo(EaseMode),
    Circ(EaseMode),
    Back {
        overshoot: f32,
        mode: EaseMode,
    },
    Elastic {
        amplitude: f32,
        period: f32,
        mode: EaseMode,
    },
    Bounce(EaseMode),
    CubicBezier(f32, f32, f32, f32),
}

/// Errors from parsing an easing identifier
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EasingError {
    #[error("empty easing identifier")]
    Empty,

    #[error("unknown easing curve `{0}`")]
    UnknownCurve(String),

    #[error("unknown ease mode `{mode}` in `{ident}`")]
    UnknownMode { ident: String, mode: String },

    #[error("malformed easing identifier `{0}`")]
    Malformed(String),

    #[error("invalid arguments for `{ident}`: {reason}")]
    InvalidArguments { ident: String, reason: String },
}

impl Easing {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f32) -> f32 {
        match *self {
            Easing::Linear => t,
            Easing::Power(power, mode) => {
                let exponent = i32::from(power) + 1;
                shape(mode, t, |x| x.powi(exponent))
            }
            Easing::Sine(mode) => shape(mode, t, |x| 1.0 - (x * FRAC_PI_2).cos()),
            Easing::Expo(mode) => shape(mode, t, |x| {
                if x <= 0.0 {
                    0.0
                } else {
                    2f32.powf(10.0 * (x - 1.0))
                }
            }),
            Easing::Circ(mode) => shape(mode, t, |x| 1.0 - (1.0 - x * x).max(0.0).sqrt()),
            Easing::Back { overshoot, mode } => {
                shape(mode, t, |x| x * x * ((overshoot + 1.0) * x - overshoot))
            }
            Easing::Elastic {
                amplitude,
                period,
                mode,
            } => shape(mode, t, |x| 1.0 - elastic_out(1.0 - x, amplitude, period)),
            Easing::Bounce(mode) => shape(mode, t, |x| 1.0 - bounce_out(1.0 - x)),
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier_ease(t, x1, y1, x2, y2),
        }
    }

    /// The `elastic.out(1, 0.3)` curve reveals use by default
    pub fn elastic_out() -> Self {
        Easing::Elastic {
            amplitude: 1.0,
            period: 0.3,
            mode: EaseMode::Out,
        }
    }
}

/// Derive the out / in-out variants from an ease-in curve
fn shape(mode: EaseMode, t: f32, ease_in: impl Fn(f32) -> f32) -> f32 {
    match mode {
        EaseMode::In => ease_in(t),
        EaseMode::Out => 1.0 - ease_in(1.0 - t),
        EaseMode::InOut => {
            if t < 0.5 {
                ease_in(t * 2.0) / 2.0
            } else {
                1.0 - ease_in((1.0 - t) * 2.0) / 2.0
            }
        }
    }
}

/// Damped sine that overshoots the target before settling.
///
/// Amplitudes below 1 are folded into the period, as GSAP does.
fn elastic_out(t: f32, amplitude: f32, period: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let amp = amplitude.max(1.0);
    let period = period / if amplitude < 1.0 { amplitude } else { 1.0 };
    let phase = period / TAU * (1.0 / amp).asin();
    amp * 2f32.powf(-10.0 * t) * ((t - phase) * TAU / period).sin() + 1.0
}

fn bounce_out(t: f32) -> f32 {
    const N: f32 = 7.5625;
    const D: f32 = 2.75;

    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984375
    }
}

// ============================================================================
// Cubic bezier
// ============================================================================

/// CSS-compatible cubic bezier timing function.
///
/// Solves x(p) = t with Newton-Raphson and falls back to bisection when the
/// slope flattens out. Works in f64 to keep the solve stable near endpoints.
fn cubic_bezier_ease(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let target = f64::from(t);
    let (x1, y1, x2, y2) = (
        f64::from(x1),
        f64::from(y1),
        f64::from(x2),
        f64::from(y2),
    );

    let mut p = target;
    for _ in 0..8 {
        let err = bezier_sample(p, x1, x2) - target;
        if err.abs() < 1e-7 {
            return bezier_sample(p, y1, y2) as f32;
        }
        let slope = bezier_slope(p, x1, x2);
        if slope.abs() < 1e-7 {
            break;
        }
        p -= err / slope;
    }

    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    p = target;
    for _ in 0..20 {
        let x = bezier_sample(p, x1, x2);
        if (x - target).abs() < 1e-7 {
            break;
        }
        if x < target {
            lo = p;
        } else {
            hi = p;
        }
        p = (lo + hi) * 0.5;
    }

    bezier_sample(p, y1, y2) as f32
}

/// One coordinate of the curve through (0,0), p1, p2, (1,1)
#[inline]
fn bezier_sample(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    ((a * t + b) * t + c) * t
}

#[inline]
fn bezier_slope(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    (3.0 * a * t + 2.0 * b) * t + c
}

// ============================================================================
// Identifiers
// ============================================================================

impl FromStr for Easing {
    type Err = EasingError;

    fn from_str(ident: &str) -> Result<Self, Self::Err> {
        let ident = ident.trim();
        if ident.is_empty() {
            return Err(EasingError::Empty);
        }

        let (head, args) = split_call(ident)?;
        let head = head.to_ascii_lowercase();

        match head.as_str() {
            "cubic-bezier" => {
                return match args.as_slice() {
                    [x1, y1, x2, y2] => Ok(Easing::CubicBezier(*x1, *y1, *x2, *y2)),
                    _ => Err(invalid(ident, "expected four control values")),
                };
            }
            "ease" => return Ok(Easing::CubicBezier(0.25, 0.1, 0.25, 1.0)),
            "ease-in" => return Ok(Easing::CubicBezier(0.42, 0.0, 1.0, 1.0)),
            "ease-out" => return Ok(Easing::CubicBezier(0.0, 0.0, 0.58, 1.0)),
            "ease-in-out" => return Ok(Easing::CubicBezier(0.42, 0.0, 0.58, 1.0)),
            _ => {}
        }

        let (name, mode) = match head.split_once('.') {
            Some((name, mode)) => (name, parse_mode(ident, mode)?),
            None => (head.as_str(), EaseMode::Out),
        };

        let no_args = |easing: Easing| {
            if args.is_empty() {
                Ok(easing)
            } else {
                Err(invalid(ident, "curve takes no arguments"))
            }
        };

        match name {
            "none" | "linear" | "power0" => no_args(Easing::Linear),
            "power1" | "quad" => no_args(Easing::Power(1, mode)),
            "power2" | "cubic" => no_args(Easing::Power(2, mode)),
            "power3" | "quart" => no_args(Easing::Power(3, mode)),
            "power4" | "quint" | "strong" => no_args(Easing::Power(4, mode)),
            "sine" => no_args(Easing::Sine(mode)),
            "expo" => no_args(Easing::Expo(mode)),
            "circ" => no_args(Easing::Circ(mode)),
            "bounce" => no_args(Easing::Bounce(mode)),
            "back" => match args.as_slice() {
                [] => Ok(Easing::Back {
                    overshoot: BACK_OVERSHOOT,
                    mode,
                }),
                [overshoot] => Ok(Easing::Back {
                    overshoot: *overshoot,
                    mode,
                }),
                _ => Err(invalid(ident, "expected at most one overshoot value")),
            },
            "elastic" => {
                let default_period = if mode == EaseMode::InOut { 0.45 } else { 0.3 };
                let (amplitude, period) = match args.as_slice() {
                    [] => (1.0, default_period),
                    [amplitude] => (*amplitude, default_period),
                    [amplitude, period] => (*amplitude, *period),
                    _ => return Err(invalid(ident, "expected amplitude and period")),
                };
                if amplitude <= 0.0 || period <= 0.0 {
                    return Err(invalid(ident, "amplitude and period must be positive"));
                }
                Ok(Easing::Elastic {
                    amplitude,
                    period,
                    mode,
                })
            }
            _ => Err(EasingError::UnknownCurve(ident.to_string())),
        }
    }
}

/// Split `name(a, b)` into the name and its numeric arguments
fn split_call(ident: &str) -> Result<(&str, Vec<f32>), EasingError> {
    let Some(open) = ident.find('(') else {
        if ident.contains(')') {
            return Err(EasingError::Malformed(ident.to_string()));
        }
        return Ok((ident, Vec::new()));
    };

    let inner = ident[open + 1..]
        .strip_suffix(')')
        .ok_or_else(|| EasingError::Malformed(ident.to_string()))?;
    let head = ident[..open].trim();
    if head.is_empty() {
        return Err(EasingError::Malformed(ident.to_string()));
    }

    if inner.trim().is_empty() {
        return Ok((head, Vec::new()));
    }

    let args = inner
        .split(',')
        .map(|arg| {
            arg.trim()
                .parse::<f32>()
                .map_err(|_| invalid(ident, &format!("`{}` is not a number", arg.trim())))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((head, args))
}

fn parse_mode(ident: &str, mode: &str) -> Result<EaseMode, EasingError> {
    match mode {
        "in" => Ok(EaseMode::In),
        "out" => Ok(EaseMode::Out),
        "inout" => Ok(EaseMode::InOut),
        _ => Err(EasingError::UnknownMode {
            ident: ident.to_string(),
            mode: mode.to_string(),
        }),
    }
}

fn invalid(ident: &str, reason: &str) -> EasingError {
    EasingError::InvalidArguments {
        ident: ident.to_string(),
        reason: reason.to_string(),
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Easing::Linear => write!(f, "none"),
            Easing::Power(power, mode) => write!(f, "power{}.{}", power, mode.as_str()),
            Easing::Sine(mode) => write!(f, "sine.{}", mode.as_str()),
            Easing::Expo(mode) => write!(f, "expo.{}", mode.as_str()),
            Easing::Circ(mode) => write!(f, "circ.{}", mode.as_str()),
            Easing::Back { overshoot, mode } => {
                write!(f, "back.{}({})", mode.as_str(), overshoot)
            }
            Easing::Elastic {
                amplitude,
                period,
                mode,
            } => write!(f, "elastic.{}({}, {})", mode.as_str(), amplitude, period),
            Easing::Bounce(mode) => write!(f, "bounce.{}", mode.as_str()),
            Easing::CubicBezier(x1, y1, x2, y2) => {
                write!(f, "cubic-bezier({}, {}, {}, {})", x1, y1, x2, y2)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_curves() -> Vec<Easing> {
        let mut curves = vec![Easing::Linear, Easing::CubicBezier(0.42, 0.0, 0.58, 1.0)];
        for mode in [EaseMode::In, EaseMode::Out, EaseMode::InOut] {
            curves.extend([
                Easing::Power(1, mode),
                Easing::Power(4, mode),
                Easing::Sine(mode),
                Easing::Expo(mode),
                Easing::Circ(mode),
                Easing::Back {
                    overshoot: BACK_OVERSHOOT,
                    mode,
                },
                Easing::Elastic {
                    amplitude: 1.0,
                    period: 0.3,
                    mode,
                },
                Easing::Bounce(mode),
            ]);
        }
        curves
    }

    #[test]
    fn test_endpoints() {
        for easing in all_curves() {
            assert!(easing.apply(0.0).abs() < 1e-3, "{easing} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-3, "{easing} at 1");
        }
    }

    #[test]
    fn test_power_matches_polynomials() {
        assert!((Easing::Power(1, EaseMode::In).apply(0.5) - 0.25).abs() < 1e-6);
        assert!((Easing::Power(2, EaseMode::Out).apply(0.5) - 0.875).abs() < 1e-6);
        assert!((Easing::Power(2, EaseMode::InOut).apply(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_elastic_out_overshoots() {
        let ease = Easing::elastic_out();
        let peak = (1..100)
            .map(|i| ease.apply(i as f32 / 100.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn test_parse_default_reveal_ease() {
        let ease: Easing = "elastic.out(1, 0.3)".parse().unwrap();
        assert_eq!(ease, Easing::elastic_out());
    }

    #[test]
    fn test_parse_variants() {
        assert_eq!("none".parse::<Easing>(), Ok(Easing::Linear));
        assert_eq!(
            "power2.inOut".parse::<Easing>(),
            Ok(Easing::Power(2, EaseMode::InOut))
        );
        assert_eq!("bounce".parse::<Easing>(), Ok(Easing::Bounce(EaseMode::Out)));
        assert_eq!(
            "back.in(2)".parse::<Easing>(),
            Ok(Easing::Back {
                overshoot: 2.0,
                mode: EaseMode::In
            })
        );
        assert_eq!(
            "elastic.inOut".parse::<Easing>(),
            Ok(Easing::Elastic {
                amplitude: 1.0,
                period: 0.45,
                mode: EaseMode::InOut
            })
        );
        assert_eq!(
            "cubic-bezier(0.1, 0.2, 0.3, 1)".parse::<Easing>(),
            Ok(Easing::CubicBezier(0.1, 0.2, 0.3, 1.0))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Easing>(), Err(EasingError::Empty));
        assert!(matches!(
            "wobble.out".parse::<Easing>(),
            Err(EasingError::UnknownCurve(_))
        ));
        assert!(matches!(
            "sine.sideways".parse::<Easing>(),
            Err(EasingError::UnknownMode { .. })
        ));
        assert!(matches!(
            "elastic.out(1, 0.3".parse::<Easing>(),
            Err(EasingError::Malformed(_))
        ));
        assert!(matches!(
            "elastic.out(one)".parse::<Easing>(),
            Err(EasingError::InvalidArguments { .. })
        ));
        assert!(matches!(
            "sine.out(2)".parse::<Easing>(),
            Err(EasingError::InvalidArguments { .. })
        ));
    }

    #[test]
    fn test_display_round_trips_through_parser() {
        for easing in all_curves() {
            let parsed: Easing = easing.to_string().parse().unwrap();
            assert_eq!(parsed, easing);
        }
    }
}
