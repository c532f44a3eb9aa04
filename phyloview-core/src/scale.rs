//! Linear axis scales mapping data space to output (pixel) space.

use serde::{Deserialize, Serialize};

/// Monotonic linear mapping from `domain` to `range`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisScale {
    domain: [f64; 2],
    range: [f64; 2],
}

impl AxisScale {
    pub fn linear(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> [f64; 2] {
        self.domain
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    pub fn domain_min(&self) -> f64 {
        self.domain[0].min(self.domain[1])
    }

    pub fn domain_max(&self) -> f64 {
        self.domain[0].max(self.domain[1])
    }

    /// Map a data value to output space. A collapsed domain maps to the middle of the range.
    pub fn apply(&self, value: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        let span = d1 - d0;
        let t = if span == 0.0 { 0.5 } else { (value - d0) / span };
        r0 + t * (r1 - r0)
    }

    /// Map an output position back to data space
    pub fn invert(&self, position: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        let span = r1 - r0;
        let t = if span == 0.0 { 0.5 } else { (position - r0) / span };
        d0 + t * (d1 - d0)
    }
}
