//! Molecular graph representation and pipeline staging.

use std::collections::BTreeMap;

use aequorea_core::{AequoreaError, Annotated, ContentAddressable, Result, Summarizable};
use sha2::{Digest, Sha256};

/// How far through the normalization pipeline a graph has progressed.
///
/// The stages are strictly ordered; each downstream computation states the
/// stage it requires and fails fast (see [`Molecule::require_stage`]) instead
/// of silently computing on an inconsistent graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum NormStage {
    /// As loaded: hydrogens may be implicit, no types or aromatic flags.
    #[default]
    Raw,
    /// Every implicit hydrogen has been added as a graph atom.
    HydrogensExplicit,
    /// Every atom carries a perceived [`AtomType`].
    AtomTypesPerceived,
    /// Aromatic flags on atoms and bonds are derived and final.
    AromaticityApplied,
}

/// Orbital hybridization inferred from an atom's bonding pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hybridization {
    /// Single-valent atoms (hydrogen, halogens).
    S,
    Sp,
    Sp2,
    Sp3,
    /// Metals, noble gases, and anything the table does not cover.
    Other,
}

/// Canonical atom classification assigned by atom-type perception.
///
/// Captures the bonding context the downstream models need: hybridization,
/// π-bond count at the atom, and whether the atom holds a lone pair it can
/// donate into a ring π system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AtomType {
    pub hybridization: Hybridization,
    pub pi_bonds: u8,
    pub lone_pair_donor: bool,
}

/// Bond order classification. Aromaticity is a derived flag on [`Bond`],
/// never an order of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
}

impl BondOrder {
    /// Numeric bond order for valence calculations.
    pub fn as_f64(self) -> f64 {
        match self {
            BondOrder::Single => 1.0,
            BondOrder::Double => 2.0,
            BondOrder::Triple => 3.0,
        }
    }
}

/// An atom in a molecular graph.
///
/// Identity is the index in its parent [`Molecule`]; normalization may append
/// atoms but never renumbers or removes existing ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MolAtom {
    pub atomic_number: u8,
    pub formal_charge: i8,
    pub isotope: Option<u16>,
    pub implicit_hydrogens: u8,
    pub is_aromatic: bool,
    pub atom_type: Option<AtomType>,
}

impl MolAtom {
    /// A plain uncharged atom of the given element with no derived state.
    pub fn of_element(atomic_number: u8) -> Self {
        MolAtom {
            atomic_number,
            formal_charge: 0,
            isotope: None,
            implicit_hydrogens: 0,
            is_aromatic: false,
            atom_type: None,
        }
    }
}

/// An undirected bond between two atoms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bond {
    pub atom1: usize,
    pub atom2: usize,
    pub order: BondOrder,
    pub is_aromatic: bool,
}

/// A molecular graph with atoms, bonds, adjacency, and record metadata.
///
/// The metadata map is carried through every pipeline stage unchanged; no
/// stage reads or writes it.
#[derive(Debug, Clone)]
pub struct Molecule {
    pub name: String,
    pub atoms: Vec<MolAtom>,
    pub bonds: Vec<Bond>,
    /// adjacency[atom_idx] = Vec<(neighbor_atom_idx, bond_idx)>
    pub adjacency: Vec<Vec<(usize, usize)>>,
    pub metadata: BTreeMap<String, String>,
    pub stage: NormStage,
}

impl Molecule {
    /// Create a new molecule, building the adjacency list from atoms and bonds.
    pub fn new(name: String, atoms: Vec<MolAtom>, bonds: Vec<Bond>) -> Self {
        let mut adjacency = vec![Vec::new(); atoms.len()];
        for (bi, bond) in bonds.iter().enumerate() {
            adjacency[bond.atom1].push((bond.atom2, bi));
            adjacency[bond.atom2].push((bond.atom1, bi));
        }
        Molecule {
            name,
            atoms,
            bonds,
            adjacency,
            metadata: BTreeMap::new(),
            stage: NormStage::Raw,
        }
    }

    /// Append an atom, returning its index.
    pub fn add_atom(&mut self, atom: MolAtom) -> usize {
        self.atoms.push(atom);
        self.adjacency.push(Vec::new());
        self.atoms.len() - 1
    }

    /// Append a non-aromatic bond between two existing atoms.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the indices are out of range, equal, or
    /// already bonded (the graph is simple).
    pub fn add_bond(&mut self, atom1: usize, atom2: usize, order: BondOrder) -> usize {
        debug_assert!(atom1 < self.atoms.len() && atom2 < self.atoms.len());
        debug_assert_ne!(atom1, atom2, "self-loops are not allowed");
        debug_assert!(self.get_bond(atom1, atom2).is_none(), "parallel bond");
        let bi = self.bonds.len();
        self.bonds.push(Bond {
            atom1,
            atom2,
            order,
            is_aromatic: false,
        });
        self.adjacency[atom1].push((atom2, bi));
        self.adjacency[atom2].push((atom1, bi));
        bi
    }

    /// Number of graph atoms (explicit hydrogens included once added).
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Number of bonds.
    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    /// Number of non-hydrogen atoms.
    pub fn heavy_atom_count(&self) -> usize {
        self.atoms.iter().filter(|a| a.atomic_number != 1).count()
    }

    /// Neighbor atom indices for a given atom.
    pub fn neighbors(&self, atom_idx: usize) -> Vec<usize> {
        self.adjacency[atom_idx].iter().map(|&(n, _)| n).collect()
    }

    /// Graph degree of an atom (number of explicit bonds).
    pub fn degree(&self, atom_idx: usize) -> usize {
        self.adjacency[atom_idx].len()
    }

    /// Find the bond between two atoms, if any.
    pub fn get_bond(&self, a1: usize, a2: usize) -> Option<&Bond> {
        self.adjacency[a1]
            .iter()
            .find(|&&(n, _)| n == a2)
            .map(|&(_, bi)| &self.bonds[bi])
    }

    /// Number of explicit hydrogen atoms bonded to `atom_idx`.
    pub fn explicit_hydrogens(&self, atom_idx: usize) -> u8 {
        self.adjacency[atom_idx]
            .iter()
            .filter(|&&(n, _)| self.atoms[n].atomic_number == 1)
            .count() as u8
    }

    /// Attached hydrogens in either representation (implicit + bonded H atoms).
    pub fn total_hydrogens(&self, atom_idx: usize) -> u8 {
        self.atoms[atom_idx].implicit_hydrogens + self.explicit_hydrogens(atom_idx)
    }

    /// Sum of bond orders at an atom; bonds carrying the aromatic flag count 1.5.
    pub fn bond_order_sum(&self, atom_idx: usize) -> f64 {
        self.adjacency[atom_idx]
            .iter()
            .map(|&(_, bi)| {
                let bond = &self.bonds[bi];
                if bond.is_aromatic {
                    1.5
                } else {
                    bond.order.as_f64()
                }
            })
            .sum()
    }

    /// Fail fast when a computation is invoked before its pipeline stage.
    pub fn require_stage(&self, needed: NormStage, what: &str) -> Result<()> {
        if self.stage >= needed {
            Ok(())
        } else {
            Err(AequoreaError::Precondition(format!(
                "{what} requires {needed:?} but the graph is at {:?}",
                self.stage
            )))
        }
    }
}

impl Annotated for Molecule {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Summarizable for Molecule {
    fn summary(&self) -> String {
        format!(
            "{}: {} atoms, {} bonds ({:?})",
            if self.name.is_empty() { "Molecule" } else { &self.name },
            self.atom_count(),
            self.bond_count(),
            self.stage,
        )
    }
}

impl ContentAddressable for Molecule {
    /// Deterministic hash of the atom/bond state. Name and metadata are
    /// excluded so that annotation changes do not disturb regression
    /// baselines; the pipeline stage is excluded so the hash can compare
    /// pre- and post-normalization snapshots of the same arrays.
    fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        for atom in &self.atoms {
            hasher.update([atom.atomic_number]);
            hasher.update(atom.formal_charge.to_le_bytes());
            hasher.update(atom.isotope.unwrap_or(0).to_le_bytes());
            hasher.update([atom.implicit_hydrogens]);
            hasher.update([atom.is_aromatic as u8]);
        }
        let mut sorted_bonds: Vec<(usize, usize, u8, bool)> = self
            .bonds
            .iter()
            .map(|b| {
                let (lo, hi) = if b.atom1 <= b.atom2 {
                    (b.atom1, b.atom2)
                } else {
                    (b.atom2, b.atom1)
                };
                (lo, hi, b.order as u8, b.is_aromatic)
            })
            .collect();
        sorted_bonds.sort_unstable();
        for (lo, hi, order, aromatic) in sorted_bonds {
            hasher.update(lo.to_le_bytes());
            hasher.update(hi.to_le_bytes());
            hasher.update([order, aromatic as u8]);
        }
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_ethane() -> Molecule {
        let mut c = MolAtom::of_element(6);
        c.implicit_hydrogens = 3;
        let atoms = vec![c.clone(), c];
        let bonds = vec![Bond {
            atom1: 0,
            atom2: 1,
            order: BondOrder::Single,
            is_aromatic: false,
        }];
        Molecule::new("ethane".into(), atoms, bonds)
    }

    #[test]
    fn construction_and_adjacency() {
        let mol = make_ethane();
        assert_eq!(mol.atom_count(), 2);
        assert_eq!(mol.bond_count(), 1);
        assert_eq!(mol.neighbors(0), vec![1]);
        assert_eq!(mol.degree(1), 1);
        assert_eq!(mol.stage, NormStage::Raw);
    }

    #[test]
    fn add_atom_and_bond_maintain_adjacency() {
        let mut mol = make_ethane();
        let h = mol.add_atom(MolAtom::of_element(1));
        mol.add_bond(0, h, BondOrder::Single);
        assert_eq!(mol.degree(0), 2);
        assert_eq!(mol.explicit_hydrogens(0), 1);
        assert_eq!(mol.total_hydrogens(0), 4);
    }

    #[test]
    fn stage_ordering() {
        assert!(NormStage::Raw < NormStage::HydrogensExplicit);
        assert!(NormStage::AtomTypesPerceived < NormStage::AromaticityApplied);
    }

    #[test]
    fn require_stage_fails_fast() {
        let mol = make_ethane();
        let err = mol
            .require_stage(NormStage::AromaticityApplied, "structure keys")
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("structure keys"), "{msg}");
        assert!(msg.contains("Raw"), "{msg}");
    }

    #[test]
    fn content_hash_deterministic_and_metadata_blind() {
        let mut mol = make_ethane();
        let h1 = mol.content_hash();
        assert_eq!(h1.len(), 64);
        mol.metadata.insert("Name".into(), "Ethane".into());
        assert_eq!(h1, mol.content_hash());
    }
}
