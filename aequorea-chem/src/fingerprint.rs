//! Bit-vector fingerprints and the circular neighborhood-hash fingerprint.

use aequorea_core::{ContentAddressable, Result};
use sha2::{Digest, Sha256};

use crate::molecule::{BondOrder, Molecule, NormStage};
use crate::perceive::normalize;
use crate::ring;

/// Default number of neighborhood-expansion rounds (diameter-6 environments).
pub const DEFAULT_RADIUS: usize = 3;

/// Default folded length of the circular fingerprint.
pub const DEFAULT_NBITS: usize = 1024;

/// A fixed-length bit vector, packed into 64-bit words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    bits: Vec<u64>,
    nbits: usize,
}

impl Fingerprint {
    /// Create an all-zero fingerprint of the given bit length.
    pub fn new(nbits: usize) -> Self {
        debug_assert!(nbits > 0, "fingerprint length must be positive");
        let nwords = nbits.div_ceil(64);
        Fingerprint {
            bits: vec![0u64; nwords],
            nbits,
        }
    }

    /// Set the bit at `pos` (taken modulo the bit length).
    pub fn set_bit(&mut self, pos: usize) {
        let pos = pos % self.nbits;
        self.bits[pos / 64] |= 1u64 << (pos % 64);
    }

    /// Read the bit at `pos` (taken modulo the bit length).
    pub fn get_bit(&self, pos: usize) -> bool {
        let pos = pos % self.nbits;
        (self.bits[pos / 64] >> (pos % 64)) & 1 == 1
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> u32 {
        self.bits.iter().map(|w| w.count_ones()).sum()
    }

    /// Bit length of the fingerprint.
    pub fn nbits(&self) -> usize {
        self.nbits
    }

    /// Indices of all set bits, ascending.
    pub fn bit_indices(&self) -> Vec<usize> {
        (0..self.nbits).filter(|&i| self.get_bit(i)).collect()
    }

    pub(crate) fn words(&self) -> &[u64] {
        &self.bits
    }
}

impl ContentAddressable for Fingerprint {
    fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        for word in &self.bits {
            hasher.update(word.to_le_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

/// Compute the circular fingerprint with default radius and length.
pub fn circular_fingerprint(mol: &Molecule) -> Result<Fingerprint> {
    circular_fingerprint_with(mol, DEFAULT_RADIUS, DEFAULT_NBITS)
}

/// Compute a circular neighborhood-hash fingerprint.
///
/// Each heavy atom starts from an invariant of its own properties; `radius`
/// rounds of order-independent neighbor combination grow the environments,
/// and every identifier from every round is folded into the bit vector.
///
/// Hydrogen state and aromaticity are perceived internally on a scratch copy
/// when the input has not been normalized yet, and explicit hydrogen atoms
/// are folded back into per-atom counts, so the result does not depend on
/// whether the caller explicitized first. Atom relabelings that preserve the
/// graph leave the bit set unchanged.
pub fn circular_fingerprint_with(
    mol: &Molecule,
    radius: usize,
    nbits: usize,
) -> Result<Fingerprint> {
    let scratch;
    let source = if mol.stage >= NormStage::AromaticityApplied {
        mol
    } else {
        let mut copy = mol.clone();
        normalize(&mut copy)?;
        scratch = copy;
        &scratch
    };

    let mut fp = Fingerprint::new(nbits);

    // Heavy-atom projection: hydrogens become counts on their parents.
    let heavy: Vec<usize> = (0..source.atom_count())
        .filter(|&i| source.atoms[i].atomic_number != 1)
        .collect();
    if heavy.is_empty() {
        return Ok(fp);
    }
    let mut heavy_pos = vec![usize::MAX; source.atom_count()];
    for (hi, &ai) in heavy.iter().enumerate() {
        heavy_pos[ai] = hi;
    }

    let rings = ring::find_sssr(source);
    let in_ring = ring::ring_membership(source, &rings);

    // Adjacency among heavy atoms as (bond code, heavy neighbor) pairs.
    let neighbors: Vec<Vec<(u8, usize)>> = heavy
        .iter()
        .map(|&ai| {
            source.adjacency[ai]
                .iter()
                .filter(|&&(n, _)| source.atoms[n].atomic_number != 1)
                .map(|&(n, bi)| (bond_code(source, bi), heavy_pos[n]))
                .collect()
        })
        .collect();

    // Round-0 invariants from the atom's own properties.
    let mut identifiers: Vec<u64> = heavy
        .iter()
        .map(|&ai| {
            let atom = &source.atoms[ai];
            let mut h = fnv1a_init();
            h = fnv1a_update(h, u64::from(atom.atomic_number));
            h = fnv1a_update(h, atom.formal_charge as u64);
            h = fnv1a_update(h, neighbors[heavy_pos[ai]].len() as u64);
            h = fnv1a_update(h, u64::from(source.total_hydrogens(ai)));
            h = fnv1a_update(h, u64::from(in_ring[ai]));
            h
        })
        .collect();

    for &id in &identifiers {
        fp.set_bit(fold_hash(id, nbits));
    }

    for _ in 0..radius {
        let mut next = Vec::with_capacity(heavy.len());
        for hi in 0..heavy.len() {
            let mut h = fnv1a_init();
            h = fnv1a_update(h, identifiers[hi]);

            // Sorted multiset of (bond code, neighbor id): the combination
            // must not depend on adjacency order.
            let mut env: Vec<(u8, u64)> = neighbors[hi]
                .iter()
                .map(|&(code, n)| (code, identifiers[n]))
                .collect();
            env.sort_unstable();

            for (code, nid) in env {
                h = fnv1a_update(h, u64::from(code));
                h = fnv1a_update(h, nid);
            }
            next.push(h);
            fp.set_bit(fold_hash(h, nbits));
        }
        identifiers = next;
    }

    Ok(fp)
}

/// Wire value for a bond in the environment hash. Aromatic bonds share one
/// code regardless of the order the input happened to carry.
fn bond_code(mol: &Molecule, bond_idx: usize) -> u8 {
    let bond = &mol.bonds[bond_idx];
    if bond.is_aromatic {
        4
    } else {
        match bond.order {
            BondOrder::Single => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
        }
    }
}

// FNV-1a, the deterministic combining hash.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

fn fnv1a_init() -> u64 {
    FNV_OFFSET
}

fn fnv1a_update(hash: u64, value: u64) -> u64 {
    let mut h = hash;
    for b in value.to_le_bytes() {
        h ^= u64::from(b);
        h = h.wrapping_mul(FNV_PRIME);
    }
    h
}

fn fold_hash(hash: u64, nbits: usize) -> usize {
    (hash as usize) % nbits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse_smiles;

    #[test]
    fn bit_operations() {
        let mut fp = Fingerprint::new(128);
        assert!(!fp.get_bit(42));
        fp.set_bit(42);
        assert!(fp.get_bit(42));
        assert_eq!(fp.count_ones(), 1);
        fp.set_bit(100);
        assert_eq!(fp.count_ones(), 2);
        assert_eq!(fp.bit_indices(), vec![42, 100]);
    }

    #[test]
    fn odd_length_rounds_words_up() {
        let fp = Fingerprint::new(881);
        assert_eq!(fp.nbits(), 881);
        assert_eq!(fp.words().len(), 14);
    }

    #[test]
    fn deterministic_across_runs() {
        let mol = parse_smiles("CC(=O)Oc1ccccc1C(=O)O").unwrap();
        let fp1 = circular_fingerprint(&mol).unwrap();
        let fp2 = circular_fingerprint(&mol).unwrap();
        assert_eq!(fp1, fp2);
        assert_eq!(fp1.content_hash(), fp2.content_hash());
    }

    #[test]
    fn cardinality_bounded_by_length() {
        let mol = parse_smiles("CC12CCC3C(C1CCC2O)CCC4=CC(=O)CCC34C").unwrap();
        let fp = circular_fingerprint_with(&mol, 3, 64).unwrap();
        assert!(fp.count_ones() as usize <= fp.nbits());
    }

    #[test]
    fn insensitive_to_prior_explicitization() {
        let raw = parse_smiles("c1ccc2ccccc2c1").unwrap();
        let mut prepared = raw.clone();
        crate::perceive::normalize(&mut prepared).unwrap();
        let fp_raw = circular_fingerprint(&raw).unwrap();
        let fp_prepared = circular_fingerprint(&prepared).unwrap();
        assert_eq!(fp_raw, fp_prepared);
    }

    #[test]
    fn kekulized_and_aromatic_forms_agree() {
        let fp1 = circular_fingerprint(&parse_smiles("c1ccccc1").unwrap()).unwrap();
        let fp2 = circular_fingerprint(&parse_smiles("C1=CC=CC=C1").unwrap()).unwrap();
        assert_eq!(fp1, fp2);
    }

    #[test]
    fn invariant_under_atom_relabeling() {
        // The same molecules written from different starting atoms.
        let pairs = [
            ("CCO", "OCC"),
            ("CC(C)C", "C(C)(C)C"),
            ("Cc1ccccc1", "c1ccccc1C"),
            ("CC(=O)Oc1ccccc1C(=O)O", "OC(=O)c1ccccc1OC(C)=O"),
        ];
        for (a, b) in pairs {
            let fp_a = circular_fingerprint(&parse_smiles(a).unwrap()).unwrap();
            let fp_b = circular_fingerprint(&parse_smiles(b).unwrap()).unwrap();
            assert_eq!(fp_a, fp_b, "{a} vs {b}");
        }
    }

    #[test]
    fn different_molecules_differ() {
        let fp1 = circular_fingerprint(&parse_smiles("CCO").unwrap()).unwrap();
        let fp2 = circular_fingerprint(&parse_smiles("CCN").unwrap()).unwrap();
        assert_ne!(fp1, fp2);
    }

    #[test]
    fn hydrogen_only_and_empty_graphs_are_empty() {
        let mol = Molecule::new(String::new(), Vec::new(), Vec::new());
        assert_eq!(circular_fingerprint(&mol).unwrap().count_ones(), 0);
        let h2 = parse_smiles("[H][H]").unwrap();
        assert_eq!(circular_fingerprint(&h2).unwrap().count_ones(), 0);
    }

    #[test]
    fn radius_grows_feature_count() {
        let mol = parse_smiles("CC(=O)Oc1ccccc1C(=O)O").unwrap();
        let fp0 = circular_fingerprint_with(&mol, 0, 4096).unwrap();
        let fp3 = circular_fingerprint_with(&mol, 3, 4096).unwrap();
        assert!(fp3.count_ones() >= fp0.count_ones());
    }
}
