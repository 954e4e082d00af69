//! Scalar molecular properties: weight, formula, donor/acceptor counts.

use std::collections::BTreeMap;

use aequorea_core::Summarizable;

use crate::element::element_by_number;
use crate::molecule::Molecule;

/// Computed molecular properties.
#[derive(Debug, Clone)]
pub struct MolecularProperties {
    pub molecular_weight: f64,
    pub formula: String,
    pub heavy_atom_count: usize,
    pub hydrogen_bond_donors: usize,
    pub hydrogen_bond_acceptors: usize,
}

impl Summarizable for MolecularProperties {
    fn summary(&self) -> String {
        format!(
            "MW={:.2} Formula={} Heavy={} HBD={} HBA={}",
            self.molecular_weight,
            self.formula,
            self.heavy_atom_count,
            self.hydrogen_bond_donors,
            self.hydrogen_bond_acceptors,
        )
    }
}

/// Compute all scalar properties at once.
pub fn compute_properties(mol: &Molecule) -> MolecularProperties {
    MolecularProperties {
        molecular_weight: molecular_weight(mol),
        formula: molecular_formula(mol),
        heavy_atom_count: mol.heavy_atom_count(),
        hydrogen_bond_donors: hbd_count(mol),
        hydrogen_bond_acceptors: hba_count(mol),
    }
}

/// Molecular weight: sum of atomic weights, counting implicit hydrogens.
///
/// Identical before and after hydrogen explicitization, since explicitization
/// only moves hydrogens from counters into graph atoms.
pub fn molecular_weight(mol: &Molecule) -> f64 {
    let h_weight = 1.008;
    let mut mw = 0.0;
    for atom in &mol.atoms {
        if let Some(elem) = element_by_number(atom.atomic_number) {
            mw += elem.atomic_weight;
        }
        mw += f64::from(atom.implicit_hydrogens) * h_weight;
    }
    mw
}

/// Molecular formula in Hill order (C first, then H, then alphabetical).
pub fn molecular_formula(mol: &Molecule) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

    for atom in &mol.atoms {
        if let Some(elem) = element_by_number(atom.atomic_number) {
            *counts.entry(elem.symbol).or_insert(0) += 1;
        }
        if atom.implicit_hydrogens > 0 {
            *counts.entry("H").or_insert(0) += atom.implicit_hydrogens as usize;
        }
    }

    let mut formula = String::new();

    if let Some(&c_count) = counts.get("C") {
        formula.push('C');
        if c_count > 1 {
            formula.push_str(&c_count.to_string());
        }
        counts.remove("C");

        if let Some(&h_count) = counts.get("H") {
            formula.push('H');
            if h_count > 1 {
                formula.push_str(&h_count.to_string());
            }
            counts.remove("H");
        }
    }

    for (symbol, count) in &counts {
        formula.push_str(symbol);
        if *count > 1 {
            formula.push_str(&count.to_string());
        }
    }

    formula
}

/// Hydrogen-bond donors: N or O atoms with at least one attached hydrogen,
/// whether implicit or an explicit graph atom.
pub fn hbd_count(mol: &Molecule) -> usize {
    mol.atoms
        .iter()
        .enumerate()
        .filter(|(i, a)| {
            matches!(a.atomic_number, 7 | 8) && mol.total_hydrogens(*i) > 0
        })
        .count()
}

/// Hydrogen-bond acceptors: every N or O atom.
pub fn hba_count(mol: &Molecule) -> usize {
    mol.atoms
        .iter()
        .filter(|a| matches!(a.atomic_number, 7 | 8))
        .count()
}
