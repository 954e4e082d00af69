use criterion::{black_box, criterion_group, criterion_main, Criterion};

use aequorea_chem::{
    canonical_smiles, circular_fingerprint, compute_descriptors, normalize, parse_smiles,
    structure_key_fingerprint, tanimoto_bulk, Fingerprint, Molecule,
};

/// A set of representative drug-like SMILES strings
const SMILES_SET: &[&str] = &[
    "CCO",                                  // ethanol
    "CC(=O)O",                              // acetic acid
    "c1ccccc1",                             // benzene
    "CC(=O)Oc1ccccc1C(=O)O",                // aspirin
    "CC12CCC3C(C1CCC2O)CCC4=CC(=O)CCC34C",  // testosterone
    "CN1C=NC2=C1C(=O)N(C(=O)N2C)C",         // caffeine
    "CC(C)CC1=CC=C(C=C1)C(C)C(=O)O",        // ibuprofen
    "OC(=O)C1=CC=CC=C1O",                   // salicylic acid
    "C1=CC=C(C=C1)O",                       // phenol
    "CC(=O)NC1=CC=C(C=C1)O",                // acetaminophen
    "C(C(=O)O)N",                           // glycine
    "c1ccc2ccccc2c1",                       // naphthalene
    "C1CCCCC1",                             // cyclohexane
    "C(=O)(N)N",                            // urea
    "CC(O)CC",                              // 2-butanol
    "CCCCCCCC",                             // octane
    "c1ccncc1",                             // pyridine
    "C1=CN=CN=C1",                          // pyrimidine
    "c1cc[nH]c1",                           // pyrrole
    "C1=CSC=C1",                            // thiophene
];

fn normalized_set() -> Vec<Molecule> {
    SMILES_SET
        .iter()
        .filter_map(|s| parse_smiles(s).ok())
        .map(|mut m| {
            normalize(&mut m).unwrap();
            m
        })
        .collect()
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    let mols: Vec<Molecule> = SMILES_SET.iter().filter_map(|s| parse_smiles(s).ok()).collect();
    let mols_1k: Vec<&Molecule> = mols.iter().cycle().take(1000).collect();

    group.bench_function("1k_mols", |b| {
        b.iter(|| {
            for mol in black_box(&mols_1k) {
                let mut m = (*mol).clone();
                normalize(&mut m).unwrap();
            }
        })
    });

    group.finish();
}

fn bench_descriptors(c: &mut Criterion) {
    let mut group = c.benchmark_group("descriptors");

    let mols = normalized_set();
    let mols_1k: Vec<&Molecule> = mols.iter().cycle().take(1000).collect();

    group.bench_function("1k_mols_all_kinds", |b| {
        b.iter(|| {
            for mol in black_box(&mols_1k) {
                let _ = compute_descriptors(mol);
            }
        })
    });

    group.finish();
}

fn bench_fingerprints(c: &mut Criterion) {
    let mut group = c.benchmark_group("fingerprints");

    let mols = normalized_set();
    let mols_1k: Vec<&Molecule> = mols.iter().cycle().take(1000).collect();

    group.bench_function("circular_1k_mols", |b| {
        b.iter(|| {
            for mol in black_box(&mols_1k) {
                let _ = circular_fingerprint(mol).unwrap();
            }
        })
    });

    group.bench_function("structure_keys_1k_mols", |b| {
        b.iter(|| {
            for mol in black_box(&mols_1k) {
                let _ = structure_key_fingerprint(mol).unwrap();
            }
        })
    });

    group.finish();
}

fn bench_tanimoto(c: &mut Criterion) {
    let mut group = c.benchmark_group("tanimoto");

    let mols = normalized_set();
    let fps: Vec<Fingerprint> = mols.iter().map(|m| circular_fingerprint(m).unwrap()).collect();

    let queries: Vec<Fingerprint> = fps.iter().cycle().take(100).cloned().collect();
    let targets: Vec<Fingerprint> = fps.iter().cycle().take(1000).cloned().collect();

    group.bench_function("100x1k_bulk", |b| {
        b.iter(|| {
            for q in black_box(&queries) {
                let _ = tanimoto_bulk(q, black_box(&targets)).unwrap();
            }
        })
    });

    group.finish();
}

fn bench_canonical_smiles(c: &mut Criterion) {
    let mut group = c.benchmark_group("canonical_smiles");

    let mols = normalized_set();
    let mols_1k: Vec<&Molecule> = mols.iter().cycle().take(1000).collect();

    group.bench_function("1k_mols", |b| {
        b.iter(|| {
            for mol in black_box(&mols_1k) {
                let _ = canonical_smiles(mol);
            }
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_normalize,
    bench_descriptors,
    bench_fingerprints,
    bench_tanimoto,
    bench_canonical_smiles
);
criterion_main!(benches);
