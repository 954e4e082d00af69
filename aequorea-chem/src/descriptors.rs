//! Topological and physicochemical descriptors.
//!
//! Descriptors form a closed set of tagged variants: [`DescriptorKind`]
//! enumerates every descriptor and carries its compute function, so adding a
//! descriptor is an explicit, compiler-checked change. All computations are
//! pure functions of a normalized graph; none mutates the molecule.

use std::collections::VecDeque;

use aequorea_core::{Result, Summarizable};

use crate::crippen;
use crate::molecule::{Molecule, NormStage};
use crate::properties::{hba_count, hbd_count, molecular_weight};

/// Every descriptor this engine knows how to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorKind {
    ZagrebIndex,
    PetitjeanNumber,
    RuleOfFiveViolations,
    ALogP,
    ALogP2,
    MolarRefractivity,
}

impl DescriptorKind {
    /// All descriptor kinds, in reporting order.
    pub const ALL: [DescriptorKind; 6] = [
        DescriptorKind::ZagrebIndex,
        DescriptorKind::PetitjeanNumber,
        DescriptorKind::RuleOfFiveViolations,
        DescriptorKind::ALogP,
        DescriptorKind::ALogP2,
        DescriptorKind::MolarRefractivity,
    ];

    /// Stable descriptor name used in reports and regression baselines.
    pub fn name(self) -> &'static str {
        match self {
            DescriptorKind::ZagrebIndex => "zagreb_index",
            DescriptorKind::PetitjeanNumber => "petitjean_number",
            DescriptorKind::RuleOfFiveViolations => "rule_of_five_violations",
            DescriptorKind::ALogP => "alogp",
            DescriptorKind::ALogP2 => "alogp2",
            DescriptorKind::MolarRefractivity => "amr",
        }
    }

    /// Compute this descriptor for a molecule.
    pub fn compute(self, mol: &Molecule) -> Result<f64> {
        match self {
            DescriptorKind::ZagrebIndex => zagreb_index(mol),
            DescriptorKind::PetitjeanNumber => petitjean_number(mol),
            DescriptorKind::RuleOfFiveViolations => {
                rule_of_five_violations(mol).map(|v| v as f64)
            }
            DescriptorKind::ALogP => crippen::alogp(mol).map(|r| r.alogp),
            DescriptorKind::ALogP2 => crippen::alogp(mol).map(|r| r.alogp2),
            DescriptorKind::MolarRefractivity => crippen::alogp(mol).map(|r| r.amr),
        }
    }
}

/// Per-descriptor results for one molecule.
///
/// Each entry carries its own `Result`, so one failed descriptor never hides
/// the values that did compute.
#[derive(Debug)]
pub struct DescriptorSet {
    pub entries: Vec<(DescriptorKind, Result<f64>)>,
}

impl DescriptorSet {
    /// The result for one descriptor kind, if present.
    pub fn get(&self, kind: DescriptorKind) -> Option<&Result<f64>> {
        self.entries.iter().find(|(k, _)| *k == kind).map(|(_, r)| r)
    }

    /// The computed value for one descriptor kind, if it succeeded.
    pub fn value(&self, kind: DescriptorKind) -> Option<f64> {
        match self.get(kind) {
            Some(Ok(v)) => Some(*v),
            _ => None,
        }
    }
}

impl Summarizable for DescriptorSet {
    fn summary(&self) -> String {
        self.entries
            .iter()
            .map(|(kind, result)| match result {
                Ok(v) => format!("{}={:.3}", kind.name(), v),
                Err(e) => format!("{}=<{}>", kind.name(), e),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Evaluate every descriptor, reporting each outcome individually.
pub fn compute_descriptors(mol: &Molecule) -> DescriptorSet {
    DescriptorSet {
        entries: DescriptorKind::ALL
            .iter()
            .map(|&kind| (kind, kind.compute(mol)))
            .collect(),
    }
}

/// First Zagreb index: sum of squared atom degrees over explicit bonds.
///
/// Hydrogens count once explicitized, so the graph must be past the
/// explicitization stage.
pub fn zagreb_index(mol: &Molecule) -> Result<f64> {
    mol.require_stage(NormStage::HydrogensExplicit, "Zagreb index")?;
    Ok((0..mol.atom_count())
        .map(|i| {
            let d = mol.degree(i) as f64;
            d * d
        })
        .sum())
}

/// Petitjean number: (diameter - radius) / diameter over the bond graph.
///
/// A graph with diameter 0 (empty or single-atom) yields the defined
/// sentinel 0 rather than a division fault.
pub fn petitjean_number(mol: &Molecule) -> Result<f64> {
    mol.require_stage(NormStage::HydrogensExplicit, "Petitjean number")?;
    let n = mol.atom_count();
    if n == 0 {
        return Ok(0.0);
    }

    let dist = shortest_path_matrix(mol);
    // Eccentricity over reachable pairs only; unreachable pairs are ignored
    // so disconnected inputs stay finite.
    let eccentricities: Vec<usize> = (0..n)
        .map(|i| {
            dist[i]
                .iter()
                .filter(|&&d| d != usize::MAX)
                .max()
                .copied()
                .unwrap_or(0)
        })
        .collect();

    let diameter = eccentricities.iter().max().copied().unwrap_or(0);
    let radius = eccentricities.iter().min().copied().unwrap_or(0);
    if diameter == 0 {
        return Ok(0.0);
    }
    Ok((diameter - radius) as f64 / diameter as f64)
}

/// Count of Lipinski Rule-of-Five threshold violations (0 to 4).
///
/// Thresholds: MW > 500, ALogP > 5, donors > 5, acceptors > 10.
pub fn rule_of_five_violations(mol: &Molecule) -> Result<u32> {
    mol.require_stage(NormStage::AromaticityApplied, "Rule-of-Five violations")?;
    let mut violations = 0;
    if molecular_weight(mol) > 500.0 {
        violations += 1;
    }
    if crippen::alogp(mol)?.alogp > 5.0 {
        violations += 1;
    }
    if hbd_count(mol) > 5 {
        violations += 1;
    }
    if hba_count(mol) > 10 {
        violations += 1;
    }
    Ok(violations)
}

/// All-pairs shortest path distances via BFS from every atom.
/// Unreachable pairs stay at `usize::MAX`.
fn shortest_path_matrix(mol: &Molecule) -> Vec<Vec<usize>> {
    let n = mol.atom_count();
    let mut dist = vec![vec![usize::MAX; n]; n];

    for start in 0..n {
        dist[start][start] = 0;
        let mut queue = VecDeque::new();
        queue.push_back(start);
        while let Some(curr) = queue.pop_front() {
            for &(neighbor, _) in &mol.adjacency[curr] {
                if dist[start][neighbor] == usize::MAX {
                    dist[start][neighbor] = dist[start][curr] + 1;
                    queue.push_back(neighbor);
                }
            }
        }
    }
    dist
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perceive::{explicitize_hydrogens, normalize};
    use crate::smiles::parse_smiles;
    use aequorea_core::AequoreaError;

    fn normalized(smiles: &str) -> Molecule {
        let mut mol = parse_smiles(smiles).unwrap();
        normalize(&mut mol).unwrap();
        mol
    }

    #[test]
    fn zagreb_requires_explicit_hydrogens() {
        let mol = parse_smiles("CC").unwrap();
        assert!(matches!(
            zagreb_index(&mol).unwrap_err(),
            AequoreaError::Precondition(_)
        ));
    }

    #[test]
    fn zagreb_of_explicit_ethane() {
        // 2 carbons of degree 4 plus 6 hydrogens of degree 1
        let mol = normalized("CC");
        assert_eq!(zagreb_index(&mol).unwrap(), 38.0);
    }

    #[test]
    fn zagreb_of_explicit_propane() {
        let mol = normalized("CCC");
        assert_eq!(zagreb_index(&mol).unwrap(), 3.0 * 16.0 + 8.0);
    }

    #[test]
    fn petitjean_of_single_atom_is_zero() {
        let mol = normalized("[He]");
        assert_eq!(mol.atom_count(), 1);
        assert_eq!(petitjean_number(&mol).unwrap(), 0.0);
    }

    #[test]
    fn petitjean_of_empty_graph_is_zero() {
        let mut mol = Molecule::new(String::new(), Vec::new(), Vec::new());
        normalize(&mut mol).unwrap();
        assert_eq!(petitjean_number(&mol).unwrap(), 0.0);
    }

    #[test]
    fn petitjean_of_methane() {
        // Star graph: center eccentricity 1, leaves 2
        let mol = normalized("C");
        let pj = petitjean_number(&mol).unwrap();
        assert!((pj - 0.5).abs() < 1e-12, "pj={pj}");
    }

    #[test]
    fn petitjean_in_unit_range() {
        for smi in ["CCO", "c1ccccc1", "CC(=O)Oc1ccccc1C(=O)O"] {
            let pj = petitjean_number(&normalized(smi)).unwrap();
            assert!((0.0..=1.0).contains(&pj), "{smi}: {pj}");
        }
    }

    #[test]
    fn benzene_has_no_rule_of_five_violations() {
        let mol = normalized("c1ccccc1");
        assert_eq!(rule_of_five_violations(&mol).unwrap(), 0);
    }

    #[test]
    fn octadecane_violates_logp_threshold() {
        let mol = normalized("CCCCCCCCCCCCCCCCCC");
        assert_eq!(rule_of_five_violations(&mol).unwrap(), 1);
    }

    #[test]
    fn descriptor_set_reports_partial_results() {
        // Only explicitized: the topological descriptors compute, the
        // aromaticity-dependent ones fail, and both outcomes are visible.
        let mut mol = parse_smiles("CCO").unwrap();
        explicitize_hydrogens(&mut mol);
        let set = compute_descriptors(&mol);
        assert!(set.get(DescriptorKind::ZagrebIndex).unwrap().is_ok());
        assert!(set.get(DescriptorKind::PetitjeanNumber).unwrap().is_ok());
        assert!(set.get(DescriptorKind::ALogP).unwrap().is_err());
        assert!(set.get(DescriptorKind::RuleOfFiveViolations).unwrap().is_err());
    }

    #[test]
    fn descriptor_set_complete_after_normalization() {
        let set = compute_descriptors(&normalized("CC(=O)Oc1ccccc1C(=O)O"));
        assert_eq!(set.entries.len(), DescriptorKind::ALL.len());
        for (kind, result) in &set.entries {
            assert!(result.is_ok(), "{} failed", kind.name());
        }
        assert!((set.value(DescriptorKind::RuleOfFiveViolations).unwrap()).abs() < 1e-12);
    }

    #[test]
    fn summary_names_every_descriptor() {
        let set = compute_descriptors(&normalized("CCO"));
        let summary = set.summary();
        for kind in DescriptorKind::ALL {
            assert!(summary.contains(kind.name()), "{summary}");
        }
    }

    #[test]
    fn descriptors_leave_molecule_unchanged() {
        let mol = normalized("c1ccncc1");
        let before = mol.clone();
        let _ = compute_descriptors(&mol);
        assert_eq!(before.atoms, mol.atoms);
        assert_eq!(before.bonds, mol.bonds);
    }
}
