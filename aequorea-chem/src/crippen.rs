//! Ghose-Crippen-style group contributions for LogP and molar refractivity.
//!
//! Every atom, explicit hydrogens included, is classified into one category
//! of a fixed table; the LogP and refractivity estimates are the sums of the
//! per-category contributions. Classification reads perceived atom types and
//! aromatic flags, so the full normalization pipeline is a precondition.

use aequorea_core::Result;

use crate::molecule::{Hybridization, Molecule, NormStage};

/// The fixed set of atom categories used by the contribution table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrippenCategory {
    CarbonSp3,
    CarbonSp3Branched,
    CarbonSp3Quaternary,
    CarbonSp3Hetero,
    CarbonSp2,
    CarbonSp2Hetero,
    CarbonSp,
    CarbonAromatic,
    CarbonAromaticHetero,
    NitrogenAromatic,
    NitrogenCharged,
    NitrogenSp2,
    NitrogenSp3,
    OxygenCharged,
    OxygenAromatic,
    OxygenCarbonyl,
    OxygenEther,
    OxygenHydroxyl,
    Fluorine,
    Chlorine,
    Bromine,
    Iodine,
    Phosphorus,
    SulfurDoubleBonded,
    SulfurCharged,
    Sulfur,
    HydrogenOnCarbon,
    HydrogenOnHetero,
    Unclassified,
}

impl CrippenCategory {
    /// LogP contribution of one atom in this category.
    pub fn logp_contribution(self) -> f64 {
        match self {
            CrippenCategory::CarbonSp3 => 0.1441,
            CrippenCategory::CarbonSp3Branched => 0.0,
            CrippenCategory::CarbonSp3Quaternary => -0.04,
            CrippenCategory::CarbonSp3Hetero => -0.2035,
            CrippenCategory::CarbonSp2 => 0.08,
            CrippenCategory::CarbonSp2Hetero => -0.03,
            CrippenCategory::CarbonSp => 0.0017,
            CrippenCategory::CarbonAromatic => 0.296,
            CrippenCategory::CarbonAromaticHetero => -0.14,
            CrippenCategory::NitrogenAromatic => -0.3187,
            CrippenCategory::NitrogenCharged => -1.019,
            CrippenCategory::NitrogenSp2 => -0.5262,
            CrippenCategory::NitrogenSp3 => -0.4458,
            CrippenCategory::OxygenCharged => -1.189,
            CrippenCategory::OxygenAromatic => 0.1552,
            CrippenCategory::OxygenCarbonyl => -0.3339,
            CrippenCategory::OxygenEther => -0.2893,
            CrippenCategory::OxygenHydroxyl => -0.3567,
            CrippenCategory::Fluorine => 0.4118,
            CrippenCategory::Chlorine => 0.6895,
            CrippenCategory::Bromine => 0.8813,
            CrippenCategory::Iodine => 1.050,
            CrippenCategory::Phosphorus => 0.2836,
            CrippenCategory::SulfurDoubleBonded => -0.1084,
            CrippenCategory::SulfurCharged => -0.5188,
            CrippenCategory::Sulfur => 0.6237,
            CrippenCategory::HydrogenOnCarbon => 0.1230,
            CrippenCategory::HydrogenOnHetero => -0.2677,
            CrippenCategory::Unclassified => 0.0,
        }
    }

    /// Molar refractivity contribution of one atom in this category.
    pub fn mr_contribution(self) -> f64 {
        match self {
            CrippenCategory::CarbonSp3
            | CrippenCategory::CarbonSp3Branched
            | CrippenCategory::CarbonSp3Quaternary
            | CrippenCategory::CarbonSp2
            | CrippenCategory::CarbonSp2Hetero
            | CrippenCategory::CarbonAromatic
            | CrippenCategory::CarbonAromaticHetero => 3.509,
            CrippenCategory::CarbonSp3Hetero => 2.753,
            CrippenCategory::CarbonSp => 3.888,
            CrippenCategory::NitrogenAromatic
            | CrippenCategory::NitrogenCharged
            | CrippenCategory::NitrogenSp2 => 2.188,
            CrippenCategory::NitrogenSp3 => 2.262,
            CrippenCategory::OxygenAromatic => 1.080,
            CrippenCategory::OxygenCharged
            | CrippenCategory::OxygenCarbonyl
            | CrippenCategory::OxygenEther
            | CrippenCategory::OxygenHydroxyl => 1.476,
            CrippenCategory::Fluorine => 1.108,
            CrippenCategory::Chlorine => 5.853,
            CrippenCategory::Bromine => 8.927,
            CrippenCategory::Iodine => 13.940,
            CrippenCategory::Phosphorus => 6.920,
            CrippenCategory::SulfurDoubleBonded
            | CrippenCategory::SulfurCharged
            | CrippenCategory::Sulfur => 7.365,
            CrippenCategory::HydrogenOnCarbon | CrippenCategory::HydrogenOnHetero => 1.057,
            CrippenCategory::Unclassified => 0.0,
        }
    }
}

/// The three values of the group-contribution estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlogpResult {
    pub alogp: f64,
    pub alogp2: f64,
    pub amr: f64,
}

/// Compute ALogP, its square, and molar refractivity.
///
/// Requires the full normalization pipeline (explicit hydrogens, perceived
/// atom types, aromaticity); the preconditions are checked, never re-derived.
pub fn alogp(mol: &Molecule) -> Result<AlogpResult> {
    mol.require_stage(NormStage::AromaticityApplied, "group-contribution LogP")?;

    let mut logp = 0.0;
    let mut mr = 0.0;
    for idx in 0..mol.atom_count() {
        let category = categorize_atom(mol, idx);
        logp += category.logp_contribution();
        mr += category.mr_contribution();
    }

    Ok(AlogpResult {
        alogp: logp,
        alogp2: logp * logp,
        amr: mr,
    })
}

/// Classify an atom into its contribution category.
pub fn categorize_atom(mol: &Molecule, idx: usize) -> CrippenCategory {
    let atom = &mol.atoms[idx];
    let pi_bonds = atom.atom_type.map(|t| t.pi_bonds).unwrap_or(0);
    let hybridization = atom
        .atom_type
        .map(|t| t.hybridization)
        .unwrap_or(Hybridization::Other);

    let heavy_neighbors = mol.adjacency[idx]
        .iter()
        .filter(|&&(n, _)| mol.atoms[n].atomic_number != 1)
        .count();
    let hetero_neighbor = mol.adjacency[idx]
        .iter()
        .any(|&(n, _)| !matches!(mol.atoms[n].atomic_number, 1 | 6));

    match atom.atomic_number {
        1 => {
            let parent = mol.adjacency[idx].first().map(|&(n, _)| mol.atoms[n].atomic_number);
            match parent {
                Some(6) => CrippenCategory::HydrogenOnCarbon,
                Some(_) => CrippenCategory::HydrogenOnHetero,
                None => CrippenCategory::Unclassified,
            }
        }
        6 => {
            if atom.is_aromatic {
                if hetero_neighbor {
                    CrippenCategory::CarbonAromaticHetero
                } else {
                    CrippenCategory::CarbonAromatic
                }
            } else if hybridization == Hybridization::Sp {
                CrippenCategory::CarbonSp
            } else if pi_bonds > 0 {
                if hetero_neighbor {
                    CrippenCategory::CarbonSp2Hetero
                } else {
                    CrippenCategory::CarbonSp2
                }
            } else if hetero_neighbor {
                CrippenCategory::CarbonSp3Hetero
            } else {
                match heavy_neighbors {
                    0..=2 => CrippenCategory::CarbonSp3,
                    3 => CrippenCategory::CarbonSp3Branched,
                    _ => CrippenCategory::CarbonSp3Quaternary,
                }
            }
        }
        7 => {
            if atom.is_aromatic {
                CrippenCategory::NitrogenAromatic
            } else if atom.formal_charge > 0 {
                CrippenCategory::NitrogenCharged
            } else if pi_bonds > 0 {
                CrippenCategory::NitrogenSp2
            } else {
                CrippenCategory::NitrogenSp3
            }
        }
        8 => {
            if atom.formal_charge < 0 {
                CrippenCategory::OxygenCharged
            } else if atom.is_aromatic {
                CrippenCategory::OxygenAromatic
            } else if pi_bonds > 0 {
                CrippenCategory::OxygenCarbonyl
            } else if heavy_neighbors >= 2 {
                CrippenCategory::OxygenEther
            } else {
                CrippenCategory::OxygenHydroxyl
            }
        }
        9 => CrippenCategory::Fluorine,
        17 => CrippenCategory::Chlorine,
        35 => CrippenCategory::Bromine,
        53 => CrippenCategory::Iodine,
        15 => CrippenCategory::Phosphorus,
        16 => {
            if atom.formal_charge != 0 {
                CrippenCategory::SulfurCharged
            } else if pi_bonds > 0 {
                CrippenCategory::SulfurDoubleBonded
            } else {
                CrippenCategory::Sulfur
            }
        }
        _ => CrippenCategory::Unclassified,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perceive::normalize;
    use crate::smiles::parse_smiles;

    fn normalized(smiles: &str) -> Molecule {
        let mut mol = parse_smiles(smiles).unwrap();
        normalize(&mut mol).unwrap();
        mol
    }

    #[test]
    fn precondition_checked() {
        let mol = parse_smiles("CCO").unwrap();
        assert!(alogp(&mol).is_err());
    }

    #[test]
    fn ethane_reference_value() {
        // 2 sp3 carbons + 6 hydrogens on carbon
        let mol = normalized("CC");
        let r = alogp(&mol).unwrap();
        let expected = 2.0 * 0.1441 + 6.0 * 0.1230;
        assert!((r.alogp - expected).abs() < 1e-9, "alogp={}", r.alogp);
        let expected_mr = 2.0 * 3.509 + 6.0 * 1.057;
        assert!((r.amr - expected_mr).abs() < 1e-9, "amr={}", r.amr);
    }

    #[test]
    fn alogp2_is_square() {
        let mol = normalized("CC(=O)Oc1ccccc1C(=O)O");
        let r = alogp(&mol).unwrap();
        assert!((r.alogp2 - r.alogp * r.alogp).abs() < 1e-9);
    }

    #[test]
    fn benzene_reference_value() {
        let mol = normalized("c1ccccc1");
        let r = alogp(&mol).unwrap();
        let expected = 6.0 * 0.296 + 6.0 * 0.1230;
        assert!((r.alogp - expected).abs() < 1e-9, "alogp={}", r.alogp);
    }

    #[test]
    fn ethanol_categories() {
        let mol = normalized("CCO");
        assert_eq!(categorize_atom(&mol, 0), CrippenCategory::CarbonSp3);
        assert_eq!(categorize_atom(&mol, 1), CrippenCategory::CarbonSp3Hetero);
        assert_eq!(categorize_atom(&mol, 2), CrippenCategory::OxygenHydroxyl);
    }

    #[test]
    fn carbonyl_and_ether_oxygen_distinguished() {
        // Methyl acetate: C(=O) carbonyl oxygen and ester/ether oxygen
        let mol = normalized("CC(=O)OC");
        assert_eq!(categorize_atom(&mol, 2), CrippenCategory::OxygenCarbonyl);
        assert_eq!(categorize_atom(&mol, 3), CrippenCategory::OxygenEther);
    }

    #[test]
    fn hydrogens_classified_by_parent() {
        let mol = normalized("CO");
        let h_on_c = (0..mol.atom_count())
            .filter(|&i| mol.atoms[i].atomic_number == 1)
            .filter(|&i| categorize_atom(&mol, i) == CrippenCategory::HydrogenOnCarbon)
            .count();
        let h_on_o = (0..mol.atom_count())
            .filter(|&i| mol.atoms[i].atomic_number == 1)
            .filter(|&i| categorize_atom(&mol, i) == CrippenCategory::HydrogenOnHetero)
            .count();
        assert_eq!(h_on_c, 3);
        assert_eq!(h_on_o, 1);
    }

    #[test]
    fn hydrophobic_ranking_is_sane() {
        // Octane should come out far more lipophilic than glycerol.
        let octane = alogp(&normalized("CCCCCCCC")).unwrap();
        let glycerol = alogp(&normalized("OCC(O)CO")).unwrap();
        assert!(octane.alogp > glycerol.alogp + 1.0);
    }

    #[test]
    fn deterministic_across_runs() {
        let mol = normalized("CC(=O)Oc1ccccc1C(=O)O");
        let a = alogp(&mol).unwrap();
        let b = alogp(&mol).unwrap();
        assert_eq!(a, b);
    }
}
