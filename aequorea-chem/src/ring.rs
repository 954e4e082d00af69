//! Cycle-basis computation via smallest set of smallest rings (SSSR).
//!
//! The cycle basis is derived state: it is computed transiently where a
//! consumer needs it (aromaticity detection, ring-count keys) and never
//! cached on the molecule.

use std::collections::VecDeque;

use crate::molecule::Molecule;

/// Find the smallest set of smallest rings (SSSR) in a molecule.
///
/// Returns one `Vec<usize>` of atom indices per elementary ring, sorted by
/// ring size and normalized so the output is deterministic. Disconnected
/// graphs are handled per component by the cyclomatic-number bookkeeping.
pub fn find_sssr(mol: &Molecule) -> Vec<Vec<usize>> {
    let n = mol.atom_count();
    if n == 0 || mol.bond_count() == 0 {
        return Vec::new();
    }

    // Expected number of rings = bonds - atoms + connected components
    let expected_rings =
        mol.bond_count() as isize - n as isize + connected_components(mol) as isize;
    if expected_rings <= 0 {
        return Vec::new();
    }

    let ring_atoms = find_ring_atoms(mol);
    if ring_atoms.iter().all(|&r| !r) {
        return Vec::new();
    }

    // For each ring bond, the shortest cycle through it is the BFS path
    // between its endpoints that avoids the bond itself.
    let mut rings: Vec<Vec<usize>> = Vec::new();
    for (bond_idx, bond) in mol.bonds.iter().enumerate() {
        if !ring_atoms[bond.atom1] || !ring_atoms[bond.atom2] {
            continue;
        }
        if let Some(mut ring) = bfs_shortest_path(mol, bond.atom1, bond.atom2, bond_idx, &ring_atoms)
        {
            normalize_ring(&mut ring);
            if !rings.iter().any(|r| r == &ring) {
                rings.push(ring);
            }
        }
    }

    rings.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    if rings.len() > expected_rings as usize {
        rings.truncate(expected_rings as usize);
    }
    rings
}

/// Number of connected components in the bond graph.
pub fn connected_components(mol: &Molecule) -> usize {
    let n = mol.atom_count();
    let mut visited = vec![false; n];
    let mut components = 0;

    for start in 0..n {
        if visited[start] {
            continue;
        }
        components += 1;
        let mut queue = VecDeque::new();
        queue.push_back(start);
        visited[start] = true;
        while let Some(curr) = queue.pop_front() {
            for &(neighbor, _) in &mol.adjacency[curr] {
                if !visited[neighbor] {
                    visited[neighbor] = true;
                    queue.push_back(neighbor);
                }
            }
        }
    }

    components
}

/// Per-atom ring membership for a precomputed ring set.
pub fn ring_membership(mol: &Molecule, rings: &[Vec<usize>]) -> Vec<bool> {
    let mut member = vec![false; mol.atom_count()];
    for ring in rings {
        for &idx in ring {
            member[idx] = true;
        }
    }
    member
}

/// Bond indices along one ring, following consecutive ring atoms.
pub fn ring_bond_indices(mol: &Molecule, ring: &[usize]) -> Vec<usize> {
    let mut indices = Vec::with_capacity(ring.len());
    for i in 0..ring.len() {
        let a1 = ring[i];
        let a2 = ring[(i + 1) % ring.len()];
        if let Some(&(_, bi)) = mol.adjacency[a1].iter().find(|&&(nb, _)| nb == a2) {
            indices.push(bi);
        }
    }
    indices
}

/// Identify ring atoms by iteratively pruning terminal (degree <= 1) atoms.
fn find_ring_atoms(mol: &Molecule) -> Vec<bool> {
    let n = mol.atom_count();
    let mut degree: Vec<usize> = (0..n).map(|i| mol.adjacency[i].len()).collect();

    let mut queue: VecDeque<usize> = (0..n).filter(|&i| degree[i] <= 1).collect();
    let mut removed = vec![false; n];
    while let Some(atom) = queue.pop_front() {
        if removed[atom] {
            continue;
        }
        removed[atom] = true;
        for &(neighbor, _) in &mol.adjacency[atom] {
            if !removed[neighbor] {
                degree[neighbor] -= 1;
                if degree[neighbor] <= 1 {
                    queue.push_back(neighbor);
                }
            }
        }
    }

    removed.iter().map(|&r| !r).collect()
}

/// BFS from `start` to `end` avoiding one bond, restricted to ring atoms.
fn bfs_shortest_path(
    mol: &Molecule,
    start: usize,
    end: usize,
    excluded_bond: usize,
    ring_atoms: &[bool],
) -> Option<Vec<usize>> {
    let n = mol.atom_count();
    let mut visited = vec![false; n];
    let mut parent = vec![usize::MAX; n];
    let mut queue = VecDeque::new();

    visited[start] = true;
    queue.push_back(start);

    while let Some(curr) = queue.pop_front() {
        if curr == end {
            let mut path = Vec::new();
            let mut node = end;
            while node != start {
                path.push(node);
                node = parent[node];
            }
            path.push(start);
            path.reverse();
            return Some(path);
        }

        for &(neighbor, bond_idx) in &mol.adjacency[curr] {
            if bond_idx == excluded_bond {
                continue;
            }
            if !visited[neighbor] && ring_atoms[neighbor] {
                visited[neighbor] = true;
                parent[neighbor] = curr;
                queue.push_back(neighbor);
            }
        }
    }

    None
}

/// Rotate a ring so it starts at its smallest atom index and runs in the
/// direction that gives the lexicographically smaller sequence.
fn normalize_ring(ring: &mut Vec<usize>) {
    if ring.is_empty() {
        return;
    }
    let min_pos = ring.iter().enumerate().min_by_key(|&(_, &v)| v).map(|(i, _)| i);
    if let Some(min_pos) = min_pos {
        ring.rotate_left(min_pos);
    }
    let n = ring.len();
    if n > 2 && ring[n - 1] < ring[1] {
        ring[1..].reverse();
    }
}
