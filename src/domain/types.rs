//! Shared domain types.
//!
//! These types are kept small and serializable so they can be:
//!
//! - used in-memory during fitting
//! - printed as JSON by the CLI
//! - passed between the fitter, the evaluator and the reporting code

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FitError;

/// The six registered model forms.
///
/// Coefficients are always ordered as listed in `param_names`, with the
/// intercept `f` last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelKind {
    /// `a·x1 + f`
    LinearX1,
    /// `b·x2 + f`
    LinearX2,
    /// `a·x1 + c·x1² + f`
    QuadraticX1,
    /// `b·x2 + d·x2² + f`
    QuadraticX2,
    /// `a·x1 + b·x2 + f`
    Plane,
    /// `a·x1 + b·x2 + c·x1² + d·x2² + e·x1·x2 + f`
    FullQuadratic,
}

impl ModelKind {
    /// Registry order; a model's index is its position here.
    pub const ALL: [ModelKind; 6] = [
        ModelKind::LinearX1,
        ModelKind::LinearX2,
        ModelKind::QuadraticX1,
        ModelKind::QuadraticX2,
        ModelKind::Plane,
        ModelKind::FullQuadratic,
    ];

    /// Look up a model by registry index.
    pub fn from_index(index: usize) -> Result<Self, FitError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(FitError::InvalidModelIndex {
                index,
                max: Self::ALL.len() - 1,
            })
    }

    pub fn index(self) -> usize {
        match self {
            ModelKind::LinearX1 => 0,
            ModelKind::LinearX2 => 1,
            ModelKind::QuadraticX1 => 2,
            ModelKind::QuadraticX2 => 3,
            ModelKind::Plane => 4,
            ModelKind::FullQuadratic => 5,
        }
    }

    /// Stable machine-friendly name (also accepted by `FromStr`).
    pub fn name(self) -> &'static str {
        match self {
            ModelKind::LinearX1 => "linear-x1",
            ModelKind::LinearX2 => "linear-x2",
            ModelKind::QuadraticX1 => "quadratic-x1",
            ModelKind::QuadraticX2 => "quadratic-x2",
            ModelKind::Plane => "plane",
            ModelKind::FullQuadratic => "full-quadratic",
        }
    }

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            ModelKind::LinearX1 => "Linear in x1",
            ModelKind::LinearX2 => "Linear in x2",
            ModelKind::QuadraticX1 => "Quadratic in x1",
            ModelKind::QuadraticX2 => "Quadratic in x2",
            ModelKind::Plane => "Plane",
            ModelKind::FullQuadratic => "Full quadratic",
        }
    }

    pub fn formula(self) -> &'static str {
        match self {
            ModelKind::LinearX1 => "a*x1 + f",
            ModelKind::LinearX2 => "b*x2 + f",
            ModelKind::QuadraticX1 => "a*x1 + c*x1^2 + f",
            ModelKind::QuadraticX2 => "b*x2 + d*x2^2 + f",
            ModelKind::Plane => "a*x1 + b*x2 + f",
            ModelKind::FullQuadratic => "a*x1 + b*x2 + c*x1^2 + d*x2^2 + e*x1*x2 + f",
        }
    }

    /// Coefficient names in storage order.
    pub fn param_names(self) -> &'static [&'static str] {
        match self {
            ModelKind::LinearX1 => &["a", "f"],
            ModelKind::LinearX2 => &["b", "f"],
            ModelKind::QuadraticX1 => &["a", "c", "f"],
            ModelKind::QuadraticX2 => &["b", "d", "f"],
            ModelKind::Plane => &["a", "b", "f"],
            ModelKind::FullQuadratic => &["a", "b", "c", "d", "e", "f"],
        }
    }

    /// Number of coefficients, intercept included.
    pub fn param_count(self) -> usize {
        self.param_names().len()
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ModelKind {
    type Err = String;

    /// Accepts a registry index (`0`..`5`), `m0`..`m5`, or a model name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        let digits = s.strip_prefix('m').unwrap_or(s.as_str());
        if let Ok(index) = digits.parse::<usize>() {
            return ModelKind::from_index(index).map_err(|e| e.to_string());
        }
        ModelKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("Unknown model '{s}'. Run `sfit models` for the list."))
    }
}

/// Training data: two predictors and one response, all the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct Observations {
    x1: Vec<f64>,
    x2: Vec<f64>,
    y: Vec<f64>,
}

impl Observations {
    pub fn new(x1: Vec<f64>, x2: Vec<f64>, y: Vec<f64>) -> Result<Self, FitError> {
        if x1.len() != x2.len() || x1.len() != y.len() {
            return Err(FitError::LengthMismatch {
                x1: x1.len(),
                x2: x2.len(),
                y: y.len(),
            });
        }
        Ok(Self { x1, x2, y })
    }

    /// Copy from borrowed slices.
    pub fn from_slices(x1: &[f64], x2: &[f64], y: &[f64]) -> Result<Self, FitError> {
        Self::new(x1.to_vec(), x2.to_vec(), y.to_vec())
    }

    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    pub fn x1(&self) -> &[f64] {
        &self.x1
    }

    pub fn x2(&self) -> &[f64] {
        &self.x2
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Iterate `(x1, x2, y)` rows.
    pub fn rows(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.x1
            .iter()
            .zip(&self.x2)
            .zip(&self.y)
            .map(|((&a, &b), &c)| (a, b, c))
    }
}

/// Starting point for the iterative solver.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InitialGuess {
    /// Every coefficient starts at 1.0.
    #[default]
    Ones,
    /// Caller-supplied vector; must match the model's arity.
    Explicit(Vec<f64>),
}

impl InitialGuess {
    /// Resolve to a concrete vector for `kind`.
    pub fn resolve(&self, kind: ModelKind) -> Result<Vec<f64>, FitError> {
        let p = kind.param_count();
        match self {
            InitialGuess::Ones => Ok(vec![1.0; p]),
            InitialGuess::Explicit(values) if values.len() == p => Ok(values.clone()),
            InitialGuess::Explicit(values) => Err(FitError::Arity {
                expected: p,
                got: values.len(),
            }),
        }
    }
}
