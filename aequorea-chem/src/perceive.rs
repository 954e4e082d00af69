//! Graph normalization: hydrogen explicitization, atom-type perception,
//! and aromaticity detection.
//!
//! The three steps are strictly ordered. [`normalize`] runs them in sequence;
//! each step can also be invoked on its own, in which case it checks the
//! molecule's [`NormStage`](crate::molecule::NormStage) and fails fast when a
//! prior step is missing.

use aequorea_core::Result;

use crate::element::element_by_number;
use crate::molecule::{AtomType, BondOrder, Hybridization, MolAtom, Molecule, NormStage};
use crate::ring;

/// Run the full normalization pipeline in its mandatory order.
///
/// Idempotent: a second run leaves atoms, bonds, flags, and perceived types
/// bit-identical.
pub fn normalize(mol: &mut Molecule) -> Result<()> {
    explicitize_hydrogens(mol);
    perceive_atom_types(mol)?;
    apply_aromaticity(mol)
}

/// Convert every implicit hydrogen into an explicit graph atom joined to its
/// parent by a single bond.
///
/// Appends new atoms only; existing atoms keep their indices. A graph whose
/// implicit counts are already zero is left untouched.
pub fn explicitize_hydrogens(mol: &mut Molecule) {
    let n = mol.atom_count();
    for idx in 0..n {
        let count = mol.atoms[idx].implicit_hydrogens;
        for _ in 0..count {
            let h = mol.add_atom(MolAtom::of_element(1));
            mol.add_bond(idx, h, BondOrder::Single);
        }
        mol.atoms[idx].implicit_hydrogens = 0;
    }
    if mol.stage < NormStage::HydrogensExplicit {
        mol.stage = NormStage::HydrogensExplicit;
    }
}

/// Assign every atom a canonical [`AtomType`] from the fixed classification
/// table over element, bond orders, charge, and the current aromatic flag.
pub fn perceive_atom_types(mol: &mut Molecule) -> Result<()> {
    mol.require_stage(NormStage::HydrogensExplicit, "atom-type perception")?;
    let types: Vec<AtomType> = (0..mol.atom_count())
        .map(|i| classify_atom(mol, i))
        .collect();
    for (atom, atom_type) in mol.atoms.iter_mut().zip(types) {
        atom.atom_type = Some(atom_type);
    }
    if mol.stage < NormStage::AtomTypesPerceived {
        mol.stage = NormStage::AtomTypesPerceived;
    }
    Ok(())
}

/// Derive aromatic flags from the cycle basis and the electron-donation model.
///
/// Each elementary ring is evaluated independently: the ring is aromatic iff
/// every member is sp2-compatible per its perceived type and the summed π
/// contributions satisfy the 4n+2 rule. Fused systems get no special
/// treatment beyond this per-ring evaluation, which can under-detect some
/// polycyclic aromatics; that behavior is intentional and kept stable.
///
/// Aromatic flags are derived state: the previous flags feed the evaluation,
/// then the full flag set is overwritten with the per-ring verdicts and atom
/// types are refreshed to agree with the final flags.
pub fn apply_aromaticity(mol: &mut Molecule) -> Result<()> {
    mol.require_stage(NormStage::AtomTypesPerceived, "aromaticity detection")?;

    let n = mol.atom_count();
    let rings = ring::find_sssr(mol);
    let mut aromatic_atoms = vec![false; n];
    let mut aromatic_bonds = vec![false; mol.bond_count()];

    for ring in &rings {
        let mut in_ring = vec![false; n];
        for &i in ring {
            in_ring[i] = true;
        }

        let compatible = ring.iter().all(|&i| {
            mol.atoms[i]
                .atom_type
                .as_ref()
                .map(sp2_compatible)
                .unwrap_or(false)
        });
        if !compatible {
            continue;
        }

        let mut pi_total = 0u32;
        let mut conjugated = true;
        for &i in ring {
            match pi_contribution(mol, &in_ring, i) {
                Some(c) => pi_total += u32::from(c),
                None => {
                    conjugated = false;
                    break;
                }
            }
        }
        if conjugated && pi_total >= 2 && pi_total % 4 == 2 {
            for &i in ring {
                aromatic_atoms[i] = true;
            }
            for bi in ring::ring_bond_indices(mol, ring) {
                aromatic_bonds[bi] = true;
            }
        }
    }

    for (atom, &flag) in mol.atoms.iter_mut().zip(&aromatic_atoms) {
        atom.is_aromatic = flag;
    }
    for (bond, &flag) in mol.bonds.iter_mut().zip(&aromatic_bonds) {
        bond.is_aromatic = flag;
    }

    let refreshed: Vec<AtomType> = (0..n).map(|i| classify_atom(mol, i)).collect();
    for (atom, atom_type) in mol.atoms.iter_mut().zip(refreshed) {
        atom.atom_type = Some(atom_type);
    }

    mol.stage = NormStage::AromaticityApplied;
    Ok(())
}

/// The fixed classification table: element + bond pattern + charge to type.
fn classify_atom(mol: &Molecule, idx: usize) -> AtomType {
    let atom = &mol.atoms[idx];
    let elem = atom.atomic_number;

    // Single-valent elements never hybridize further.
    if matches!(elem, 1 | 9 | 17 | 35 | 53) {
        return AtomType {
            hybridization: Hybridization::S,
            pi_bonds: 0,
            lone_pair_donor: false,
        };
    }
    let covalent = element_by_number(elem)
        .map(|e| e.default_valence.is_some())
        .unwrap_or(false);
    if !covalent {
        return AtomType {
            hybridization: Hybridization::Other,
            pi_bonds: 0,
            lone_pair_donor: false,
        };
    }

    let pi_bonds: u8 = mol.adjacency[idx]
        .iter()
        .map(|&(_, bi)| match mol.bonds[bi].order {
            BondOrder::Single => 0,
            BondOrder::Double => 1,
            BondOrder::Triple => 2,
        })
        .sum();

    let hybridization = if pi_bonds >= 2 {
        Hybridization::Sp
    } else if pi_bonds == 1 || atom.is_aromatic {
        Hybridization::Sp2
    } else if elem == 6 && atom.formal_charge > 0 {
        // Carbocation: trigonal planar with an empty p orbital.
        Hybridization::Sp2
    } else {
        Hybridization::Sp3
    };

    let lone_pair_donor = match elem {
        7 | 15 => pi_bonds == 0 && atom.formal_charge <= 0,
        8 | 16 | 34 => pi_bonds == 0 && atom.formal_charge <= 0,
        6 => atom.formal_charge < 0,
        _ => false,
    };

    AtomType {
        hybridization,
        pi_bonds,
        lone_pair_donor,
    }
}

/// An atom can sit in an aromatic ring when it is trigonal planar or holds a
/// donatable lone pair (pyrrole-type nitrogen, furan-type oxygen).
fn sp2_compatible(atom_type: &AtomType) -> bool {
    matches!(atom_type.hybridization, Hybridization::Sp2) || atom_type.lone_pair_donor
}

/// π electrons the atom donates into the ring: 0, 1, or 2.
///
/// `None` means the atom cannot take part in a conjugated ring at all, which
/// disqualifies the ring outright.
fn pi_contribution(mol: &Molecule, in_ring: &[bool], idx: usize) -> Option<u8> {
    let atom = &mol.atoms[idx];

    let mut endocyclic_double = false;
    let mut exocyclic_double = false;
    for &(neighbor, bi) in &mol.adjacency[idx] {
        match mol.bonds[bi].order {
            BondOrder::Double => {
                if in_ring[neighbor] {
                    endocyclic_double = true;
                } else {
                    exocyclic_double = true;
                }
            }
            BondOrder::Triple => return None,
            BondOrder::Single => {}
        }
    }
    if endocyclic_double {
        return Some(1);
    }
    if exocyclic_double {
        // The π electron pair points out of the ring (quinone carbonyl).
        return Some(0);
    }

    match atom.atomic_number {
        6 => {
            if atom.formal_charge < 0 {
                Some(2)
            } else if atom.formal_charge > 0 {
                Some(0)
            } else if atom.is_aromatic {
                Some(1)
            } else {
                None
            }
        }
        7 | 15 => {
            if atom.formal_charge > 0 {
                // Pyridinium-type: the proton sits on the in-plane lone pair.
                if atom.is_aromatic {
                    Some(1)
                } else {
                    None
                }
            } else if mol.total_hydrogens(idx) > 0 || heavy_degree(mol, idx) == 3 {
                // Pyrrole-type: the lone pair is the ring contribution.
                Some(2)
            } else if atom.is_aromatic {
                // Pyridine-type: the lone pair stays in plane.
                Some(1)
            } else {
                Some(2)
            }
        }
        8 | 16 | 34 => {
            if atom.formal_charge > 0 {
                if atom.is_aromatic {
                    Some(1)
                } else {
                    None
                }
            } else {
                Some(2)
            }
        }
        _ => None,
    }
}

fn heavy_degree(mol: &Molecule, idx: usize) -> usize {
    mol.adjacency[idx]
        .iter()
        .filter(|&&(n, _)| mol.atoms[n].atomic_number != 1)
        .count()
}
