//! Reference coefficient tables.
//!
//! The coefficients were fitted offline against the normalized alfalfa cycles;
//! at runtime they are opaque constants. A JSON override can replace any part
//! of the table (see `io::coefficients`).

use std::collections::BTreeMap;

use crate::domain::{Coefficients, ModelKind, ReferenceFit};

/// Mean-cycle fits and their RMSE against the averaged cycle.
pub const MEAN_CYCLE_FITS: [ReferenceFit; 3] = [
    ReferenceFit {
        kind: ModelKind::Fisher,
        coefficients: Coefficients::new(2.35594909, 0.86735709),
        rmse: Some(0.018341609219938593),
    },
    ReferenceFit {
        kind: ModelKind::Landau,
        coefficients: Coefficients::new(3.05408611, 1.71316648),
        rmse: Some(0.019534691782079044),
    },
    ReferenceFit {
        kind: ModelKind::Gompertz,
        coefficients: Coefficients::new(2.24074685, 3.38374238),
        rmse: Some(0.033374733520125356),
    },
];

/// Per-cycle Fisher coefficients.
pub const CYCLE_FISHER_COEFFICIENTS: [(&str, Coefficients); 12] = [
    ("ciclo_a6", Coefficients::new(1.575, 0.626)),
    ("ciclo_a7", Coefficients::new(1.755, 0.722)),
    ("ciclo_a5", Coefficients::new(3.206, 1.551)),
    ("ciclo_a8", Coefficients::new(1.849, 0.838)),
    ("ciclo_a2", Coefficients::new(2.611, 0.840)),
    ("ciclo_b1", Coefficients::new(2.569, 0.820)),
    ("ciclo_b3", Coefficients::new(2.648, 1.028)),
    ("ciclo_b4", Coefficients::new(3.735, 1.549)),
    ("ciclo_b5", Coefficients::new(1.875, 0.490)),
    ("ciclo_b6", Coefficients::new(2.616, 0.826)),
    ("ciclo_b7", Coefficients::new(2.864, 0.834)),
    ("ciclo_b8", Coefficients::new(3.326, 1.183)),
];

/// Mean-cycle fits plus per-cycle Fisher coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientTable {
    pub mean: Vec<ReferenceFit>,
    /// Keyed by lower-cased cycle name.
    pub cycles: BTreeMap<String, Coefficients>,
}

impl CoefficientTable {
    /// The built-in table.
    pub fn reference() -> Self {
        Self {
            mean: MEAN_CYCLE_FITS.to_vec(),
            cycles: CYCLE_FISHER_COEFFICIENTS
                .iter()
                .map(|(name, c)| (name.to_string(), *c))
                .collect(),
        }
    }

    pub fn mean_fit(&self, kind: ModelKind) -> Option<&ReferenceFit> {
        self.mean.iter().find(|f| f.kind == kind)
    }

    pub fn cycle(&self, name: &str) -> Option<Coefficients> {
        self.cycles.get(&name.trim().to_ascii_lowercase()).copied()
    }

    /// Replace (or add) a mean-cycle fit, keeping one entry per model kind.
    pub fn set_mean_fit(&mut self, fit: ReferenceFit) {
        match self.mean.iter_mut().find(|f| f.kind == fit.kind) {
            Some(slot) => *slot = fit,
            None => self.mean.push(fit),
        }
    }

    pub fn set_cycle(&mut self, name: &str, coefficients: Coefficients) {
        self.cycles.insert(name.trim().to_ascii_lowercase(), coefficients);
    }
}

impl Default for CoefficientTable {
    fn default() -> Self {
        Self::reference()
    }
}
