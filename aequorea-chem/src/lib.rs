//! Molecular featurization for the Aequorea cheminformatics workspace.
//!
//! Provides the full pipeline from molecule ingestion to comparable
//! features: SMILES/SDF parsing, graph normalization (hydrogen
//! explicitization, atom-type perception, aromaticity detection),
//! topological and group-contribution descriptors, substructure-key and
//! circular fingerprints, and Tanimoto similarity. Every computation is
//! deterministic, so feature values and bit sets are stable across runs and
//! safe to use as regression baselines.
//!
//! # Example
//!
//! ```
//! use aequorea_chem::{
//!     circular_fingerprint, compute_descriptors, normalize, parse_smiles, tanimoto,
//!     DescriptorKind,
//! };
//!
//! let mut aspirin = parse_smiles("CC(=O)Oc1ccccc1C(=O)O").unwrap();
//! normalize(&mut aspirin).unwrap();
//!
//! let descriptors = compute_descriptors(&aspirin);
//! assert_eq!(descriptors.value(DescriptorKind::RuleOfFiveViolations), Some(0.0));
//!
//! let fp = circular_fingerprint(&aspirin).unwrap();
//! assert!((tanimoto(&fp, &fp).unwrap() - 1.0).abs() < 1e-12);
//! ```

pub mod canon;
pub mod crippen;
pub mod descriptors;
pub mod element;
pub mod fingerprint;
pub mod keys;
pub mod molecule;
pub mod perceive;
pub mod properties;
pub mod ring;
pub mod sdf;
pub mod similarity;
pub mod smiles;

pub use canon::canonical_smiles;
pub use crippen::{alogp, AlogpResult, CrippenCategory};
pub use descriptors::{compute_descriptors, DescriptorKind, DescriptorSet};
pub use element::{element_by_number, element_by_symbol, Element};
pub use fingerprint::{circular_fingerprint, circular_fingerprint_with, Fingerprint};
pub use keys::{structure_key_fingerprint, KEY_AROMATIC_RING, STRUCTURE_KEY_BITS};
pub use molecule::{AtomType, Bond, BondOrder, Hybridization, MolAtom, Molecule, NormStage};
pub use perceive::{apply_aromaticity, explicitize_hydrogens, normalize, perceive_atom_types};
pub use properties::{
    compute_properties, hba_count, hbd_count, molecular_formula, molecular_weight,
    MolecularProperties,
};
pub use sdf::{parse_mol_v2000, parse_sd_record, parse_sdf, read_sdf_file, SdfReader};
pub use similarity::{tanimoto, tanimoto_bulk};
pub use smiles::{parse_smiles, parse_smiles_named};
