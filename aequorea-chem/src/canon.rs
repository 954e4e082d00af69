//! Canonical SMILES generation.
//!
//! Produces a deterministic serialization via invariant refinement and a
//! rank-ordered DFS. Two graphs describing the same molecule serialize to
//! the same string, which makes the output usable as an identity check and
//! for round-trip debugging; feature computation never depends on it.

use crate::element::element_by_number;
use crate::molecule::{BondOrder, Molecule};

/// Generate the canonical SMILES string for a molecule.
///
/// The traversal order comes from Morgan-like invariant refinement, so the
/// output is independent of the order atoms happen to be stored in.
pub fn canonical_smiles(mol: &Molecule) -> String {
    let n = mol.atom_count();
    if n == 0 {
        return String::new();
    }

    let ranks = compute_canonical_ranks(mol);
    let mut ring_closures = precompute_ring_closures(mol, &ranks);
    let mut visited = vec![false; n];
    let mut result = String::new();

    // One DFS per connected component, lowest-rank atom first.
    while let Some(start) = (0..n).filter(|&i| !visited[i]).min_by_key(|&i| ranks[i]) {
        if !result.is_empty() {
            result.push('.');
        }
        dfs_smiles(mol, start, None, &ranks, &mut visited, &mut result, &mut ring_closures);
    }

    result
}

/// Ring closure digits to write at each atom: (ring number, bond index,
/// whether this atom is the opening side).
struct RingClosureInfo {
    atom_closures: Vec<Vec<(usize, usize, bool)>>,
}

/// Identify back-edges with a preliminary DFS in canonical order and assign
/// them ring numbers.
fn precompute_ring_closures(mol: &Molecule, ranks: &[u64]) -> RingClosureInfo {
    let n = mol.atom_count();
    let mut visited = vec![false; n];
    let mut atom_closures: Vec<Vec<(usize, usize, bool)>> = vec![Vec::new(); n];
    let mut next_ring_num: usize = 1;
    let mut used_bonds = vec![false; mol.bond_count()];

    while let Some(start) = (0..n).filter(|&i| !visited[i]).min_by_key(|&i| ranks[i]) {
        precompute_dfs(
            mol,
            start,
            None,
            ranks,
            &mut visited,
            &mut atom_closures,
            &mut next_ring_num,
            &mut used_bonds,
        );
    }

    RingClosureInfo { atom_closures }
}

#[allow(clippy::too_many_arguments)]
fn precompute_dfs(
    mol: &Molecule,
    atom_idx: usize,
    from_atom: Option<usize>,
    ranks: &[u64],
    visited: &mut Vec<bool>,
    atom_closures: &mut [Vec<(usize, usize, bool)>],
    next_ring_num: &mut usize,
    used_bonds: &mut [bool],
) {
    visited[atom_idx] = true;

    let mut neighbors: Vec<(usize, usize)> = mol.adjacency[atom_idx]
        .iter()
        .copied()
        .filter(|&(n, _)| Some(n) != from_atom)
        .collect();
    neighbors.sort_by_key(|&(n, _)| ranks[n]);

    for &(n, bi) in &neighbors {
        if visited[n] {
            if !used_bonds[bi] {
                used_bonds[bi] = true;
                let ring_num = *next_ring_num;
                *next_ring_num += 1;
                atom_closures[n].push((ring_num, bi, true));
                atom_closures[atom_idx].push((ring_num, bi, false));
            }
        } else {
            precompute_dfs(
                mol,
                n,
                Some(atom_idx),
                ranks,
                visited,
                atom_closures,
                next_ring_num,
                used_bonds,
            );
        }
    }
}

/// Morgan-like iterative refinement of atom invariants into ranks.
fn compute_canonical_ranks(mol: &Molecule) -> Vec<u64> {
    let n = mol.atom_count();

    let mut invariants: Vec<u64> = (0..n)
        .map(|i| {
            let atom = &mol.atoms[i];
            (u64::from(atom.atomic_number) << 40)
                | ((mol.degree(i) as u64) << 32)
                | (u64::from(atom.implicit_hydrogens) << 24)
                | (((i64::from(atom.formal_charge) + 128) as u64) << 16)
                | (u64::from(atom.isotope.unwrap_or(0)) << 1)
                | u64::from(atom.is_aromatic)
        })
        .collect();

    let mut prev_distinct = count_distinct(&invariants);
    for _ in 0..n {
        let mut refined = Vec::with_capacity(n);
        for i in 0..n {
            let mut combined = invariants[i].wrapping_mul(1000003);
            let mut neighbor_invs: Vec<u64> = mol.adjacency[i]
                .iter()
                .map(|&(neighbor, bond_idx)| {
                    let bond = &mol.bonds[bond_idx];
                    let bond_val = if bond.is_aromatic { 4 } else { bond.order as u64 + 1 };
                    invariants[neighbor].wrapping_mul(31).wrapping_add(bond_val)
                })
                .collect();
            neighbor_invs.sort_unstable();
            for nv in &neighbor_invs {
                combined = combined.wrapping_mul(1000003).wrapping_add(*nv);
            }
            refined.push(combined);
        }

        let distinct = count_distinct(&refined);
        invariants = refined;
        if distinct <= prev_distinct {
            break;
        }
        prev_distinct = distinct;
    }

    let mut indexed: Vec<(u64, usize)> = invariants.iter().copied().zip(0..).collect();
    indexed.sort_unstable();

    let mut ranks = vec![0u64; n];
    let mut rank = 0u64;
    for i in 1..indexed.len() {
        if indexed[i].0 != indexed[i - 1].0 {
            rank += 1;
        }
        ranks[indexed[i].1] = rank;
    }
    if let Some(&(_, first)) = indexed.first() {
        ranks[first] = 0;
    }

    ranks
}

fn count_distinct(values: &[u64]) -> usize {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted.len()
}

#[allow(clippy::too_many_arguments)]
fn dfs_smiles(
    mol: &Molecule,
    atom_idx: usize,
    from_atom: Option<usize>,
    ranks: &[u64],
    visited: &mut Vec<bool>,
    output: &mut String,
    ring_info: &mut RingClosureInfo,
) {
    visited[atom_idx] = true;

    write_atom(mol, atom_idx, output);

    let mut closures = ring_info.atom_closures[atom_idx].clone();
    closures.sort_by_key(|&(rn, _, _)| rn);
    for &(ring_num, bond_idx, is_opening) in &closures {
        // The bond symbol is written once, at the opening side.
        if is_opening {
            write_bond_symbol(mol, bond_idx, output);
        }
        write_ring_number(ring_num, output);
    }

    let mut neighbors: Vec<(usize, usize)> = mol.adjacency[atom_idx]
        .iter()
        .copied()
        .filter(|&(n, _)| Some(n) != from_atom)
        .collect();
    neighbors.sort_by_key(|&(n, _)| ranks[n]);

    for i in 0..neighbors.len() {
        let (n, bi) = neighbors[i];
        if visited[n] {
            continue;
        }
        let has_more = neighbors[i + 1..].iter().any(|&(m, _)| !visited[m]);
        if has_more {
            output.push('(');
            write_bond_symbol(mol, bi, output);
            dfs_smiles(mol, n, Some(atom_idx), ranks, visited, output, ring_info);
            output.push(')');
        } else {
            write_bond_symbol(mol, bi, output);
            dfs_smiles(mol, n, Some(atom_idx), ranks, visited, output, ring_info);
        }
    }
}

fn write_ring_number(num: usize, output: &mut String) {
    if num < 10 {
        output.push((b'0' + num as u8) as char);
    } else {
        output.push('%');
        output.push_str(&num.to_string());
    }
}

/// Write a bond symbol, or nothing where the parser infers the bond.
///
/// An aromatic bond between two aromatic atoms is implicit; a plain single
/// bond between two aromatic atoms (the biphenyl linker case) must be spelled
/// out as '-' to stop the parser flagging it aromatic on re-read.
fn write_bond_symbol(mol: &Molecule, bond_idx: usize, output: &mut String) {
    let bond = &mol.bonds[bond_idx];
    let both_aromatic = mol.atoms[bond.atom1].is_aromatic && mol.atoms[bond.atom2].is_aromatic;

    if bond.is_aromatic {
        if !both_aromatic {
            output.push(':');
        }
        return;
    }
    match bond.order {
        BondOrder::Single => {
            if both_aromatic {
                output.push('-');
            }
        }
        BondOrder::Double => output.push('='),
        BondOrder::Triple => output.push('#'),
    }
}

fn write_atom(mol: &Molecule, atom_idx: usize, output: &mut String) {
    let atom = &mol.atoms[atom_idx];

    // Brackets whenever a bare organic-subset symbol would not round-trip:
    // charges, isotopes, exotic elements, or a hydrogen count the parser
    // would not infer from the default valence.
    let needs_bracket = atom.formal_charge != 0
        || atom.isotope.is_some()
        || !is_organic_subset(atom.atomic_number, atom.is_aromatic)
        || atom.implicit_hydrogens != inferred_hydrogens(mol, atom_idx);

    let Some(elem) = element_by_number(atom.atomic_number) else {
        return;
    };

    if needs_bracket {
        output.push('[');
        if let Some(iso) = atom.isotope {
            output.push_str(&iso.to_string());
        }
        if atom.is_aromatic {
            for c in elem.symbol.chars() {
                output.push(c.to_ascii_lowercase());
            }
        } else {
            output.push_str(elem.symbol);
        }
        if atom.implicit_hydrogens > 0 {
            output.push('H');
            if atom.implicit_hydrogens > 1 {
                output.push_str(&atom.implicit_hydrogens.to_string());
            }
        }
        if atom.formal_charge > 0 {
            output.push('+');
            if atom.formal_charge > 1 {
                output.push_str(&atom.formal_charge.to_string());
            }
        } else if atom.formal_charge < 0 {
            output.push('-');
            if atom.formal_charge < -1 {
                output.push_str(&atom.formal_charge.abs().to_string());
            }
        }
        output.push(']');
    } else if atom.is_aromatic {
        for c in elem.symbol.chars() {
            output.push(c.to_ascii_lowercase());
        }
    } else {
        output.push_str(elem.symbol);
    }
}

/// Implicit hydrogens the SMILES parser would assign to this atom if it were
/// written as a bare organic-subset symbol. Mirrors the parser's
/// valence-default fill.
fn inferred_hydrogens(mol: &Molecule, atom_idx: usize) -> u8 {
    let atom = &mol.atoms[atom_idx];
    let Some(valence) = element_by_number(atom.atomic_number).and_then(|e| e.default_valence)
    else {
        return 0;
    };
    let valence = valence as usize;

    let (available, used) = if atom.is_aromatic {
        (valence.saturating_sub(1), mol.degree(atom_idx))
    } else {
        (valence, mol.bond_order_sum(atom_idx).round() as usize)
    };
    available.saturating_sub(used) as u8
}

fn is_organic_subset(atomic_number: u8, is_aromatic: bool) -> bool {
    if is_aromatic {
        matches!(atomic_number, 5 | 6 | 7 | 8 | 15 | 16)
    } else {
        matches!(atomic_number, 5 | 6 | 7 | 8 | 15 | 16 | 9 | 17 | 35 | 53)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perceive::normalize;
    use crate::smiles::parse_smiles;

    #[test]
    fn empty_graph() {
        let mol = Molecule::new("empty".into(), vec![], vec![]);
        assert_eq!(canonical_smiles(&mol), "");
    }

    #[test]
    fn methane() {
        let mol = parse_smiles("C").unwrap();
        assert_eq!(canonical_smiles(&mol), "C");
    }

    #[test]
    fn same_molecule_different_input_order() {
        let pairs = [
            ("OCC", "CCO"),
            ("CCCO", "OCCC"),
            ("CC(C)C", "C(C)(C)C"),
            ("Cc1ccccc1", "c1ccccc1C"),
        ];
        for (a, b) in pairs {
            let can_a = canonical_smiles(&parse_smiles(a).unwrap());
            let can_b = canonical_smiles(&parse_smiles(b).unwrap());
            assert_eq!(can_a, can_b, "{a} vs {b}");
        }
    }

    #[test]
    fn roundtrip_is_a_fixed_point() {
        let inputs = [
            "CCO",
            "CC(=O)O",
            "c1ccccc1",
            "C1CCCCC1",
            "C#N",
            "C.O",
            "[NH4+]",
            "[O-]C(=O)C",
            "CC(=O)Oc1ccccc1C(=O)O",
            "c1cc[nH]c1",
        ];
        for smi in inputs {
            let can1 = canonical_smiles(&parse_smiles(smi).unwrap());
            let reparsed = parse_smiles(&can1).unwrap();
            let can2 = canonical_smiles(&reparsed);
            assert_eq!(can1, can2, "roundtrip of {smi}: '{can1}' vs '{can2}'");
        }
    }

    #[test]
    fn roundtrip_preserves_formula() {
        use crate::properties::molecular_formula;
        for smi in ["CCO", "CC(=O)O", "c1ccccc1", "CC(C)C", "C=CC=C"] {
            let mol = parse_smiles(smi).unwrap();
            let reparsed = parse_smiles(&canonical_smiles(&mol)).unwrap();
            assert_eq!(molecular_formula(&mol), molecular_formula(&reparsed), "{smi}");
        }
    }

    #[test]
    fn normalized_forms_serialize_identically() {
        // Kekulized and aromatic benzene are the same molecule once
        // aromaticity is perceived.
        let mut kekulized = parse_smiles("C1=CC=CC=C1").unwrap();
        let mut aromatic = parse_smiles("c1ccccc1").unwrap();
        normalize(&mut kekulized).unwrap();
        normalize(&mut aromatic).unwrap();
        assert_eq!(canonical_smiles(&kekulized), canonical_smiles(&aromatic));
    }

    #[test]
    fn normalized_molecule_roundtrips() {
        let mut mol = parse_smiles("c1ccncc1").unwrap();
        normalize(&mut mol).unwrap();
        let can1 = canonical_smiles(&mol);
        let reparsed = parse_smiles(&can1).unwrap();
        let can2 = canonical_smiles(&reparsed);
        assert_eq!(can1, can2);
    }

    #[test]
    fn biphenyl_linker_stays_single() {
        let mol = parse_smiles("c1ccccc1-c1ccccc1").unwrap();
        let can = canonical_smiles(&mol);
        assert!(can.contains('-'), "got '{can}'");
        let reparsed = parse_smiles(&can).unwrap();
        let nonaromatic_bonds = reparsed.bonds.iter().filter(|b| !b.is_aromatic).count();
        assert_eq!(nonaromatic_bonds, 1);
    }

    #[test]
    fn charged_atom_bracketed() {
        let mol = parse_smiles("[NH4+]").unwrap();
        assert_eq!(canonical_smiles(&mol), "[NH4+]");
    }

    #[test]
    fn bracket_hydrogen_counts_survive() {
        // [CH2] has fewer hydrogens than valence would imply; the bracket
        // must carry the count through a round trip.
        let mol = parse_smiles("[CH2]").unwrap();
        let can = canonical_smiles(&mol);
        let reparsed = parse_smiles(&can).unwrap();
        assert_eq!(reparsed.atoms[0].implicit_hydrogens, 2);
    }

    #[test]
    fn triple_bond_and_fragments() {
        assert!(canonical_smiles(&parse_smiles("C#N").unwrap()).contains('#'));
        assert!(canonical_smiles(&parse_smiles("C.O").unwrap()).contains('.'));
    }

    #[test]
    fn deterministic() {
        let mol = parse_smiles("CC(=O)Oc1ccccc1C(=O)O").unwrap();
        assert_eq!(canonical_smiles(&mol), canonical_smiles(&mol));
    }
}
