//! Synthetic circuit source: generator-backed benchmarks.
//!
//! The function-backed counterpart of the QASM suites: well-known
//! circuit families generated at requested widths, so sweeps can
//! include sizes the static corpus lacks. Volume circuits are seeded
//! and deterministic per (seed, width).

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use grani_ir::{Circuit, QubitId};

use crate::error::{BenchError, BenchResult};
use crate::source::{CircuitSource, FilterConfig, split_width};

/// Synthetic circuit families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticFamily {
    /// GHZ state preparation (H + CX cascade).
    Ghz,
    /// Quantum Fourier Transform.
    Qft,
    /// Square random two-qubit-block circuits (quantum-volume style).
    Volume,
}

impl SyntheticFamily {
    /// Parse a family name.
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "ghz" => Some(Self::Ghz),
            "qft" => Some(Self::Qft),
            "volume" => Some(Self::Volume),
            _ => None,
        }
    }

    /// Family name as used in circuit names.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ghz => "ghz",
            Self::Qft => "qft",
            Self::Volume => "volume",
        }
    }
}

/// A dynamic source generating circuits at configured widths.
pub struct SyntheticSource {
    families: Vec<SyntheticFamily>,
    widths: Vec<u32>,
    seed: u64,
    filter: FilterConfig,
}

impl SyntheticSource {
    /// Create a synthetic source.
    pub fn new(
        families: Vec<SyntheticFamily>,
        widths: Vec<u32>,
        seed: u64,
        filter: FilterConfig,
    ) -> Self {
        Self {
            families,
            widths,
            seed,
            filter,
        }
    }

    fn generate(&self, family: SyntheticFamily, width: u32) -> BenchResult<Circuit> {
        if width < 2 {
            return Err(BenchError::LoadFailed {
                name: format!("{}_n{width}", family.name()),
                reason: "synthetic circuits need at least 2 qubits".into(),
            });
        }
        let circuit = match family {
            SyntheticFamily::Ghz => Circuit::ghz(width)?,
            SyntheticFamily::Qft => Circuit::qft(width)?,
            SyntheticFamily::Volume => volume_circuit(width, self.seed)?,
        };
        Ok(circuit)
    }
}

impl CircuitSource for SyntheticSource {
    fn source_name(&self) -> &'static str {
        "synthetic"
    }

    fn circuit_names(&self) -> Vec<String> {
        let mut names = vec![];
        for family in &self.families {
            for &width in &self.widths {
                let name = format!("{}_n{width}", family.name());
                if self.filter.matches(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    fn load(&self, name: &str) -> BenchResult<Circuit> {
        let (base, width) = split_width(name);
        let family = SyntheticFamily::from_name(base)
            .ok_or_else(|| BenchError::CircuitNotFound(name.to_string()))?;
        let width = width.ok_or_else(|| BenchError::LoadFailed {
            name: name.to_string(),
            reason: "dynamic circuits need a width suffix (e.g. qft_n8)".into(),
        })?;
        let mut circuit = self.generate(family, width)?;
        circuit.set_name(name);
        Ok(circuit)
    }

    fn is_dynamic(&self) -> bool {
        true
    }

    fn contains(&self, name: &str) -> bool {
        let (base, _) = split_width(name);
        SyntheticFamily::from_name(base).is_some_and(|f| self.families.contains(&f))
    }
}

/// Square volume circuit: `width` layers, each pairing shuffled qubits
/// and applying a random two-qubit block (u3 · cx · u3 · cx · u3).
fn volume_circuit(width: u32, seed: u64) -> BenchResult<Circuit> {
    let mut rng = SmallRng::seed_from_u64(seed.wrapping_mul(0x9e37_79b9).wrapping_add(width.into()));
    let mut circuit = Circuit::with_size(format!("volume_n{width}"), width, 0);

    let mut order: Vec<u32> = (0..width).collect();
    for _ in 0..width {
        order.shuffle(&mut rng);
        for pair in order.chunks_exact(2) {
            let (a, b) = (QubitId(pair[0]), QubitId(pair[1]));
            random_su4_block(&mut circuit, &mut rng, a, b)?;
        }
    }
    Ok(circuit)
}

fn random_su4_block(
    circuit: &mut Circuit,
    rng: &mut SmallRng,
    a: QubitId,
    b: QubitId,
) -> BenchResult<()> {
    let mut angle = |rng: &mut SmallRng| rng.gen_range(0.0..std::f64::consts::TAU);

    circuit.u3(angle(rng), angle(rng), angle(rng), a)?;
    circuit.u3(angle(rng), angle(rng), angle(rng), b)?;
    circuit.cx(a, b)?;
    circuit.u3(angle(rng), angle(rng), angle(rng), a)?;
    circuit.u3(angle(rng), angle(rng), angle(rng), b)?;
    circuit.cx(a, b)?;
    circuit.u3(angle(rng), angle(rng), angle(rng), a)?;
    circuit.u3(angle(rng), angle(rng), angle(rng), b)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> SyntheticSource {
        SyntheticSource::new(
            vec![SyntheticFamily::Ghz, SyntheticFamily::Volume],
            vec![4, 8],
            11,
            FilterConfig::default(),
        )
    }

    #[test]
    fn test_circuit_names() {
        let names = source().circuit_names();
        assert_eq!(names, vec!["ghz_n4", "ghz_n8", "volume_n4", "volume_n8"]);
    }

    #[test]
    fn test_dynamic_contains_any_width() {
        let source = source();
        assert!(source.contains("ghz_n32"));
        assert!(source.contains("volume_n6"));
        assert!(!source.contains("qft_n4"));
    }

    #[test]
    fn test_load_ghz() {
        let circuit = source().load("ghz_n4").unwrap();
        assert_eq!(circuit.name(), "ghz_n4");
        assert_eq!(circuit.num_qubits(), 4);
        assert_eq!(circuit.dag().count_named("cx"), 3);
    }

    #[test]
    fn test_volume_is_deterministic() {
        let a = source().load("volume_n4").unwrap();
        let b = source().load("volume_n4").unwrap();
        assert_eq!(a.dag().num_ops(), b.dag().num_ops());
        assert_eq!(a.two_qubit_depth(), b.two_qubit_depth());

        let other_seed = SyntheticSource::new(
            vec![SyntheticFamily::Volume],
            vec![4],
            12,
            FilterConfig::default(),
        );
        // Same shape either way: width layers of width/2 blocks.
        assert_eq!(
            other_seed.load("volume_n4").unwrap().dag().count_named("cx"),
            a.dag().count_named("cx"),
        );
    }

    #[test]
    fn test_width_required() {
        let result = source().load("ghz");
        assert!(matches!(result, Err(BenchError::LoadFailed { .. })));
    }

    #[test]
    fn test_too_narrow() {
        let result = source().load("ghz_n1");
        assert!(matches!(result, Err(BenchError::LoadFailed { .. })));
    }
}
