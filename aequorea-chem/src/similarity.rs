//! Tanimoto similarity over equal-length fingerprints.

use aequorea_core::{AequoreaError, Result};

use crate::fingerprint::Fingerprint;

/// Tanimoto coefficient |A∩B| / |A∪B| of two fingerprints.
///
/// Defined only for fingerprints of the same bit length; a length mismatch
/// is a programmer error surfaced as `DimensionMismatch`. Two all-zero
/// fingerprints are identical, so their similarity is 1.0.
pub fn tanimoto(fp1: &Fingerprint, fp2: &Fingerprint) -> Result<f64> {
    if fp1.nbits() != fp2.nbits() {
        return Err(AequoreaError::DimensionMismatch {
            left: fp1.nbits(),
            right: fp2.nbits(),
        });
    }

    let mut and_count = 0u32;
    let mut or_count = 0u32;
    for (w1, w2) in fp1.words().iter().zip(fp2.words()) {
        and_count += (w1 & w2).count_ones();
        or_count += (w1 | w2).count_ones();
    }

    if or_count == 0 {
        return Ok(1.0);
    }
    Ok(f64::from(and_count) / f64::from(or_count))
}

/// Score a query fingerprint against many targets.
///
/// Runs on a rayon worker pool when the `parallel` feature is enabled; each
/// target is scored independently, so the output order always matches the
/// input order.
#[cfg(feature = "parallel")]
pub fn tanimoto_bulk(query: &Fingerprint, targets: &[Fingerprint]) -> Result<Vec<f64>> {
    use rayon::prelude::*;
    targets.par_iter().map(|t| tanimoto(query, t)).collect()
}

/// Score a query fingerprint against many targets.
#[cfg(not(feature = "parallel"))]
pub fn tanimoto_bulk(query: &Fingerprint, targets: &[Fingerprint]) -> Result<Vec<f64>> {
    targets.iter().map(|t| tanimoto(query, t)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::{circular_fingerprint, circular_fingerprint_with};
    use crate::smiles::parse_smiles;
    use aequorea_core::AequoreaError;

    #[test]
    fn self_similarity_is_one() {
        let mol = parse_smiles("c1ccccc1").unwrap();
        let fp = circular_fingerprint(&mol).unwrap();
        assert!(fp.count_ones() > 0);
        assert!((tanimoto(&fp, &fp).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn symmetric() {
        let fp1 = circular_fingerprint(&parse_smiles("CCO").unwrap()).unwrap();
        let fp2 = circular_fingerprint(&parse_smiles("CCCO").unwrap()).unwrap();
        let ab = tanimoto(&fp1, &fp2).unwrap();
        let ba = tanimoto(&fp2, &fp1).unwrap();
        assert_eq!(ab, ba);
        assert!(ab > 0.0 && ab < 1.0, "tanimoto={ab}");
    }

    #[test]
    fn empty_fingerprints_are_identical() {
        let a = Fingerprint::new(256);
        let b = Fingerprint::new(256);
        assert_eq!(tanimoto(&a, &b).unwrap(), 1.0);
    }

    #[test]
    fn disjoint_fingerprints_score_zero() {
        let mut a = Fingerprint::new(64);
        let mut b = Fingerprint::new(64);
        a.set_bit(3);
        b.set_bit(40);
        assert_eq!(tanimoto(&a, &b).unwrap(), 0.0);
    }

    #[test]
    fn length_mismatch_is_an_error() {
        let mol = parse_smiles("CCO").unwrap();
        let fp1 = circular_fingerprint_with(&mol, 3, 1024).unwrap();
        let fp2 = circular_fingerprint_with(&mol, 3, 2048).unwrap();
        let err = tanimoto(&fp1, &fp2).unwrap_err();
        assert!(matches!(
            err,
            AequoreaError::DimensionMismatch { left: 1024, right: 2048 }
        ));
    }

    #[test]
    fn bulk_matches_single_scoring() {
        let smiles = ["CCO", "CCCO", "c1ccccc1", "CC(=O)O"];
        let query = circular_fingerprint(&parse_smiles("CCO").unwrap()).unwrap();
        let targets: Vec<Fingerprint> = smiles
            .iter()
            .map(|s| circular_fingerprint(&parse_smiles(s).unwrap()).unwrap())
            .collect();
        let bulk = tanimoto_bulk(&query, &targets).unwrap();
        assert_eq!(bulk.len(), targets.len());
        for (score, target) in bulk.iter().zip(&targets) {
            assert_eq!(*score, tanimoto(&query, target).unwrap());
        }
        assert_eq!(bulk[0], 1.0);
    }

    #[test]
    fn bulk_propagates_mismatch() {
        let mol = parse_smiles("CCO").unwrap();
        let query = circular_fingerprint_with(&mol, 3, 1024).unwrap();
        let targets = vec![circular_fingerprint_with(&mol, 3, 512).unwrap()];
        assert!(tanimoto_bulk(&query, &targets).is_err());
    }
}
