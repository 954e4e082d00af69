//! Fixed 881-bit structure-key fingerprint.
//!
//! The catalogue is a fixed ordered table of structural tests in four
//! sections: hierarchical element counts, ring tests, bonded element pairs,
//! and bonded-neighborhood patterns. Every test owns fixed bit positions, so
//! the fingerprint layout never changes; catalogue positions whose patterns
//! go beyond graph-local evaluation simply stay unset. Requires a fully
//! normalized graph (explicit hydrogens, atom types, aromaticity).

use aequorea_core::Result;

use crate::fingerprint::Fingerprint;
use crate::molecule::{BondOrder, Molecule, NormStage};
use crate::ring;

/// Total catalogue length.
pub const STRUCTURE_KEY_BITS: usize = 881;

/// Position of the "at least one aromatic ring" key.
pub const KEY_AROMATIC_RING: usize = AROMATIC_RING_BASE;

// Section bases. Element counts occupy [0, RING_SECTION_BASE).
const RING_SECTION_BASE: usize = 115;
const RING_TESTS_PER_SIZE: usize = 8;
const RING_BITS_PER_SIZE: usize = RING_TESTS_PER_SIZE * 2;
const TOTAL_RING_BASE: usize = 243;
const AROMATIC_RING_BASE: usize = 247;
const HETEROAROMATIC_BASE: usize = 251;
const PAIR_SECTION_BASE: usize = 263;
const ORDER_SECTION_BASE: usize = 295;
const NEIGHBORHOOD_SECTION_BASE: usize = 327;
const AROMATIC_SUBSTITUENT_BASE: usize = 400;

/// Section 1: (element, count threshold), one bit per row.
const ELEMENT_COUNT_KEYS: &[(u8, u32)] = &[
    (1, 4),
    (1, 8),
    (1, 16),
    (1, 32),
    (3, 1),
    (3, 2),
    (5, 1),
    (5, 2),
    (5, 4),
    (6, 2),
    (6, 4),
    (6, 8),
    (6, 16),
    (6, 32),
    (7, 1),
    (7, 2),
    (7, 4),
    (7, 8),
    (8, 1),
    (8, 2),
    (8, 4),
    (8, 8),
    (8, 16),
    (9, 1),
    (9, 2),
    (9, 4),
    (11, 1),
    (11, 2),
    (14, 1),
    (14, 2),
    (15, 1),
    (15, 2),
    (15, 4),
    (16, 1),
    (16, 2),
    (16, 4),
    (16, 8),
    (17, 1),
    (17, 2),
    (17, 4),
    (17, 8),
    (19, 1),
    (19, 2),
    (35, 1),
    (35, 2),
    (35, 4),
    (53, 1),
    (53, 2),
    (53, 4),
    (4, 1),
    (12, 1),
    (13, 1),
    (20, 1),
    (26, 1),
    (29, 1),
    (30, 1),
    (33, 1),
    (34, 1),
    (50, 1),
    (51, 1),
    (52, 1),
];

/// Section 3a: unordered element pairs joined by any bond.
const BONDED_PAIR_KEYS: &[(u8, u8)] = &[
    (6, 6),
    (6, 7),
    (6, 8),
    (6, 16),
    (6, 15),
    (6, 9),
    (6, 17),
    (6, 35),
    (6, 53),
    (6, 5),
    (6, 14),
    (7, 7),
    (7, 8),
    (7, 16),
    (7, 15),
    (7, 17),
    (8, 8),
    (8, 16),
    (8, 15),
    (8, 14),
    (8, 5),
    (16, 16),
    (15, 15),
    (8, 1),
    (7, 1),
    (16, 1),
];

/// Section 3b: element pairs joined by a specific non-aromatic bond order.
const ORDERED_PAIR_KEYS: &[(u8, u8, BondOrder)] = &[
    (6, 6, BondOrder::Double),
    (6, 7, BondOrder::Double),
    (6, 8, BondOrder::Double),
    (6, 16, BondOrder::Double),
    (7, 7, BondOrder::Double),
    (7, 8, BondOrder::Double),
    (16, 8, BondOrder::Double),
    (15, 8, BondOrder::Double),
    (6, 6, BondOrder::Triple),
    (6, 7, BondOrder::Triple),
];

/// Section 4: center element, required heavy-neighbor elements (multiset),
/// and minimum attached-hydrogen count.
const NEIGHBORHOOD_KEYS: &[(u8, &[u8], u8)] = &[
    (6, &[6, 6], 0),
    (6, &[6, 6, 6], 0),
    (6, &[6, 6, 6, 6], 0),
    (6, &[6, 6], 1),
    (6, &[6, 6, 6], 1),
    (6, &[6, 7], 0),
    (6, &[6, 8], 0),
    (6, &[6, 16], 0),
    (6, &[7, 8], 0),
    (6, &[8, 8], 0),
    (6, &[7, 7], 0),
    (6, &[6, 6, 7], 0),
    (6, &[6, 6, 8], 0),
    (6, &[6, 9], 0),
    (6, &[6, 17], 0),
    (6, &[6, 35], 0),
    (6, &[6, 8], 1),
    (7, &[6], 1),
    (7, &[6], 2),
    (7, &[6, 6], 0),
    (7, &[6, 6, 6], 0),
    (7, &[6, 8], 0),
    (8, &[6], 1),
    (8, &[6, 6], 0),
    (8, &[7], 0),
    (8, &[15], 0),
    (16, &[6], 1),
    (16, &[6, 6], 0),
    (16, &[8], 0),
    (15, &[8], 0),
    (15, &[8, 8], 0),
    (15, &[8, 8, 8], 0),
];

/// Aromatic substituent tests: an aromatic atom carrying an exocyclic,
/// non-aromatic heavy neighbor of the given element (0 = any element).
const AROMATIC_SUBSTITUENT_KEYS: &[u8] = &[0, 6, 7, 8, 16, 9, 17, 35];

/// Evaluate the structure-key catalogue against a normalized graph.
pub fn structure_key_fingerprint(mol: &Molecule) -> Result<Fingerprint> {
    mol.require_stage(NormStage::AromaticityApplied, "structure keys")?;

    let mut fp = Fingerprint::new(STRUCTURE_KEY_BITS);
    if mol.atom_count() == 0 {
        return Ok(fp);
    }

    let rings = ring::find_sssr(mol);

    set_element_count_keys(&mut fp, mol);
    set_ring_keys(&mut fp, mol, &rings);
    set_pair_keys(&mut fp, mol);
    set_neighborhood_keys(&mut fp, mol);

    Ok(fp)
}

fn element_counts(mol: &Molecule) -> [u32; 120] {
    let mut counts = [0u32; 120];
    for atom in &mol.atoms {
        if (atom.atomic_number as usize) < 120 {
            counts[atom.atomic_number as usize] += 1;
        }
        counts[1] += u32::from(atom.implicit_hydrogens);
    }
    counts
}

fn set_element_count_keys(fp: &mut Fingerprint, mol: &Molecule) {
    let counts = element_counts(mol);
    for (bit, &(element, threshold)) in ELEMENT_COUNT_KEYS.iter().enumerate() {
        if counts[element as usize] >= threshold {
            fp.set_bit(bit);
        }
    }
}

fn set_ring_keys(fp: &mut Fingerprint, mol: &Molecule, rings: &[Vec<usize>]) {
    // Per-size counters: [any, carbocyclic, N-containing, O-containing,
    // heteroatom-containing, saturated, unsaturated non-aromatic, aromatic]
    let mut per_size = [[0u32; RING_TESTS_PER_SIZE]; 8];
    let mut aromatic_total = 0u32;
    let mut heteroaromatic_total = 0u32;

    for ring in rings {
        let size = ring.len();
        if !(3..=10).contains(&size) {
            continue;
        }
        let row = &mut per_size[size - 3];

        let has_n = ring.iter().any(|&i| mol.atoms[i].atomic_number == 7);
        let has_o = ring.iter().any(|&i| mol.atoms[i].atomic_number == 8);
        let has_hetero = ring.iter().any(|&i| mol.atoms[i].atomic_number != 6);
        let bond_indices = ring::ring_bond_indices(mol, ring);
        let aromatic = bond_indices.iter().all(|&bi| mol.bonds[bi].is_aromatic);
        let saturated = bond_indices
            .iter()
            .all(|&bi| mol.bonds[bi].order == BondOrder::Single && !mol.bonds[bi].is_aromatic);

        row[0] += 1;
        if !has_hetero {
            row[1] += 1;
        }
        if has_n {
            row[2] += 1;
        }
        if has_o {
            row[3] += 1;
        }
        if has_hetero {
            row[4] += 1;
        }
        if saturated {
            row[5] += 1;
        }
        if !saturated && !aromatic {
            row[6] += 1;
        }
        if aromatic {
            row[7] += 1;
            aromatic_total += 1;
            if has_hetero {
                heteroaromatic_total += 1;
            }
        }
    }

    for (size_idx, row) in per_size.iter().enumerate() {
        let base = RING_SECTION_BASE + size_idx * RING_BITS_PER_SIZE;
        for (test, &count) in row.iter().enumerate() {
            if count >= 1 {
                fp.set_bit(base + test * 2);
            }
            if count >= 2 {
                fp.set_bit(base + test * 2 + 1);
            }
        }
    }

    let total = rings.len() as u32;
    for k in 0..4 {
        if total >= k + 1 {
            fp.set_bit(TOTAL_RING_BASE + k as usize);
        }
        if aromatic_total >= k + 1 {
            fp.set_bit(AROMATIC_RING_BASE + k as usize);
        }
    }
    for k in 0..2 {
        if heteroaromatic_total >= k + 1 {
            fp.set_bit(HETEROAROMATIC_BASE + k as usize);
        }
    }
}

fn set_pair_keys(fp: &mut Fingerprint, mol: &Molecule) {
    for bond in &mol.bonds {
        let e1 = mol.atoms[bond.atom1].atomic_number;
        let e2 = mol.atoms[bond.atom2].atomic_number;
        for (i, &(a, b)) in BONDED_PAIR_KEYS.iter().enumerate() {
            if (e1 == a && e2 == b) || (e1 == b && e2 == a) {
                fp.set_bit(PAIR_SECTION_BASE + i);
            }
        }
        // Order-specific tests skip aromatic-flagged bonds so the outcome
        // does not depend on which resonance form the input carried.
        if !bond.is_aromatic {
            for (i, &(a, b, order)) in ORDERED_PAIR_KEYS.iter().enumerate() {
                if bond.order == order && ((e1 == a && e2 == b) || (e1 == b && e2 == a)) {
                    fp.set_bit(ORDER_SECTION_BASE + i);
                }
            }
        }
    }
}

fn set_neighborhood_keys(fp: &mut Fingerprint, mol: &Molecule) {
    for idx in 0..mol.atom_count() {
        let atom = &mol.atoms[idx];
        if atom.atomic_number == 1 {
            continue;
        }

        let mut heavy_neighbors: Vec<u8> = mol.adjacency[idx]
            .iter()
            .map(|&(n, _)| mol.atoms[n].atomic_number)
            .filter(|&e| e != 1)
            .collect();
        heavy_neighbors.sort_unstable();
        let h_count = mol.total_hydrogens(idx);

        for (i, &(center, required, min_h)) in NEIGHBORHOOD_KEYS.iter().enumerate() {
            if atom.atomic_number == center
                && h_count >= min_h
                && contains_multiset(&heavy_neighbors, required)
            {
                fp.set_bit(NEIGHBORHOOD_SECTION_BASE + i);
            }
        }

        if atom.is_aromatic {
            for &(n, _) in &mol.adjacency[idx] {
                let neighbor = &mol.atoms[n];
                if neighbor.atomic_number == 1 || neighbor.is_aromatic {
                    continue;
                }
                for (i, &element) in AROMATIC_SUBSTITUENT_KEYS.iter().enumerate() {
                    if element == 0 || neighbor.atomic_number == element {
                        fp.set_bit(AROMATIC_SUBSTITUENT_BASE + i);
                    }
                }
            }
        }
    }
}

/// Whether the sorted `haystack` contains the sorted `needle` as a multiset.
fn contains_multiset(haystack: &[u8], needle: &[u8]) -> bool {
    let mut it = haystack.iter();
    'outer: for &want in needle {
        for &have in it.by_ref() {
            if have == want {
                continue 'outer;
            }
            if have > want {
                return false;
            }
        }
        return false;
    }
    true
}
