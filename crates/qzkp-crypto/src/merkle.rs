//! # Merkle Aggregation
//!
//! Folds the ordered responses of a proof into one root with a sibling path
//! per leaf.
//!
//! ## Algorithm
//!
//! Domain-separated SHA-256:
//! - Leaf: `SHA256(0x00 || leaf_bytes)`.
//! - Node: `SHA256(0x01 || left || right)`.
//! - Padding leaf: `SHA256(0x02 || "qzkp/merkle/padding")`.
//!
//! The leaf row is padded with the padding leaf up to the next power of two,
//! so every tree is complete and a leaf's path length is `log2(width)`. The
//! padding prefix differs from the leaf prefix, so padding can never be
//! confused with a real leaf without a SHA-256 collision.
//!
//! Each level depends only on the level below. Wide levels are hashed in
//! parallel unless the caller asks for a sequential build.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use qzkp_core::{ContentDigest, CryptoError};

const LEAF_PREFIX: u8 = 0x00;
const NODE_PREFIX: u8 = 0x01;
const PADDING_PREFIX: u8 = 0x02;
const PADDING_LABEL: &[u8] = b"qzkp/merkle/padding";

// Below this width a level is hashed sequentially.
const PARALLEL_THRESHOLD: usize = 64;

/// Hash of a leaf: `SHA256(0x00 || bytes)`.
pub fn leaf_hash(bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update([LEAF_PREFIX]);
    hasher.update(bytes);
    hasher.finalize().into()
}

/// Hash of an internal node: `SHA256(0x01 || left || right)`.
pub fn node_hash(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update([NODE_PREFIX]);
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// The fixed padding leaf.
pub fn padding_leaf() -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update([PADDING_PREFIX]);
    hasher.update(PADDING_LABEL);
    hasher.finalize().into()
}

/// Which side of the running hash a sibling sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

/// One step of an inclusion path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    /// Side of the sibling.
    pub side: Side,
    /// The sibling hash.
    #[serde(with = "qzkp_core::hex::serde_array32")]
    pub hash: [u8; 32],
}

/// Inclusion path from one leaf to the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerklePath {
    /// Position of the leaf in the (unpadded) leaf row.
    pub leaf_index: usize,
    /// Siblings from the leaf level upward.
    pub steps: Vec<PathStep>,
}

/// A complete binary Merkle tree over a padded leaf row.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    /// `levels[0]` is the padded leaf row, the last level holds the root.
    levels: Vec<Vec<[u8; 32]>>,
    leaf_count: usize,
}

impl MerkleTree {
    /// Build a tree over raw leaf encodings, hashing wide levels in parallel.
    pub fn build<L: AsRef<[u8]> + Sync>(leaves: &[L]) -> Result<Self, CryptoError> {
        Self::build_with(leaves, true)
    }

    /// Build a tree over raw leaf encodings. With `parallel` false no level
    /// touches the rayon pool.
    pub fn build_with<L: AsRef<[u8]> + Sync>(
        leaves: &[L],
        parallel: bool,
    ) -> Result<Self, CryptoError> {
        let hashes: Vec<[u8; 32]> = if parallel && leaves.len() >= PARALLEL_THRESHOLD {
            leaves.par_iter().map(|l| leaf_hash(l.as_ref())).collect()
        } else {
            leaves.iter().map(|l| leaf_hash(l.as_ref())).collect()
        };
        Self::from_row(hashes, parallel)
    }

    fn from_row(mut row: Vec<[u8; 32]>, parallel: bool) -> Result<Self, CryptoError> {
        if row.is_empty() {
            return Err(CryptoError::MerkleError(
                "cannot build a tree with no leaves".to_string(),
            ));
        }
        let leaf_count = row.len();
        row.resize(leaf_count.next_power_of_two(), padding_leaf());

        let mut levels = vec![row];
        while let Some(level) = levels.last().filter(|l| l.len() > 1) {
            let next: Vec<[u8; 32]> = if parallel && level.len() >= PARALLEL_THRESHOLD {
                level.par_chunks(2).map(|p| node_hash(&p[0], &p[1])).collect()
            } else {
                level.chunks(2).map(|p| node_hash(&p[0], &p[1])).collect()
            };
            levels.push(next);
        }
        Ok(Self { levels, leaf_count })
    }

    /// Number of real (unpadded) leaves.
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Width of the padded leaf row.
    pub fn padded_width(&self) -> usize {
        self.levels[0].len()
    }

    /// Leaf hash at `index`.
    pub fn leaf(&self, index: usize) -> Option<&[u8; 32]> {
        self.levels[0][..self.leaf_count].get(index)
    }

    /// The root digest.
    pub fn root(&self) -> ContentDigest {
        // `from_row` guarantees a non-empty top level.
        let top = self.levels.last().map(|l| l[0]).unwrap_or_else(padding_leaf);
        ContentDigest::sha256(top)
    }

    /// Inclusion path for a real leaf.
    pub fn path(&self, index: usize) -> Result<MerklePath, CryptoError> {
        if index >= self.leaf_count {
            return Err(CryptoError::MerkleError(format!(
                "leaf index {index} out of range for {} leaves",
                self.leaf_count
            )));
        }
        let mut pos = index;
        let mut steps = Vec::with_capacity(self.levels.len() - 1);
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling = pos ^ 1;
            let side = if sibling < pos { Side::Left } else { Side::Right };
            steps.push(PathStep {
                side,
                hash: level[sibling],
            });
            pos /= 2;
        }
        Ok(MerklePath {
            leaf_index: index,
            steps,
        })
    }

    /// Paths for every real leaf, in leaf order.
    pub fn paths(&self) -> Vec<MerklePath> {
        (0..self.leaf_count)
            .filter_map(|i| self.path(i).ok())
            .collect()
    }
}

/// Build the root and every inclusion path over raw leaf encodings.
pub fn build_tree<L: AsRef<[u8]> + Sync>(
    leaves: &[L],
) -> Result<(ContentDigest, Vec<MerklePath>), CryptoError> {
    let tree = MerkleTree::build(leaves)?;
    Ok((tree.root(), tree.paths()))
}

/// Recompute the root from a leaf hash and its path and compare.
///
/// Returns `false` (never an error) for malformed paths: sides that disagree
/// with the leaf index, an index beyond the tree width, or a non-SHA-256 root.
pub fn verify_path(leaf: &[u8; 32], path: &MerklePath, root: &ContentDigest) -> bool {
    let depth = path.steps.len();
    if depth >= usize::BITS as usize || path.leaf_index >= (1usize << depth) {
        return false;
    }
    let mut cur = *leaf;
    let mut pos = path.leaf_index;
    for step in &path.steps {
        let expected = if pos & 1 == 1 { Side::Left } else { Side::Right };
        if step.side != expected {
            return false;
        }
        cur = match step.side {
            Side::Left => node_hash(&step.hash, &cur),
            Side::Right => node_hash(&cur, &step.hash),
        };
        pos >>= 1;
    }
    ContentDigest::sha256(cur).ct_eq(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qzkp_core::DigestAlgorithm;

    fn leaves(n: usize) -> Vec<Vec<u8>> {
        (0..n).map(|i| format!("response-{i}").into_bytes()).collect()
    }

    #[test]
    fn test_domain_separation() {
        assert_ne!(leaf_hash(PADDING_LABEL), padding_leaf());
        let l = leaf_hash(b"x");
        let mut both = Vec::new();
        both.extend_from_slice(&l);
        both.extend_from_slice(&l);
        assert_ne!(leaf_hash(&both), node_hash(&l, &l));
    }

    #[test]
    fn test_sequential_build_matches_parallel() {
        let data = leaves(300);
        let par = MerkleTree::build_with(&data, true).unwrap();
        let seq = MerkleTree::build_with(&data, false).unwrap();
        assert_eq!(par.root(), seq.root());
        assert_eq!(par.paths(), seq.paths());
        assert_eq!(MerkleTree::build(&data).unwrap().root(), seq.root());
    }

    #[test]
    fn test_empty_rejected() {
        let empty: Vec<Vec<u8>> = vec![];
        assert!(MerkleTree::build(&empty).is_err());
    }

    #[test]
    fn test_single_leaf_root_is_leaf_hash() {
        let tree = MerkleTree::build(&leaves(1)).unwrap();
        assert_eq!(tree.padded_width(), 1);
        assert_eq!(tree.root().bytes, leaf_hash(b"response-0"));
        assert!(tree.path(0).unwrap().steps.is_empty());
    }

    #[test]
    fn test_padding_to_power_of_two() {
        let tree = MerkleTree::build(&leaves(5)).unwrap();
        assert_eq!(tree.leaf_count(), 5);
        assert_eq!(tree.padded_width(), 8);
        assert_eq!(tree.path(4).unwrap().steps.len(), 3);
        assert!(tree.path(5).is_err());
        assert!(tree.leaf(5).is_none());
    }

    #[test]
    fn test_three_leaf_root_by_hand() {
        let l: Vec<[u8; 32]> = leaves(3).iter().map(|b| leaf_hash(b)).collect();
        let expected = node_hash(&node_hash(&l[0], &l[1]), &node_hash(&l[2], &padding_leaf()));
        let (root, _) = build_tree(&leaves(3)).unwrap();
        assert_eq!(root.bytes, expected);
        assert_eq!(root.algorithm, DigestAlgorithm::Sha256);
    }

    #[test]
    fn test_all_paths_verify_for_various_sizes() {
        for size in [1usize, 2, 3, 4, 5, 7, 8, 9, 31, 32, 33, 64, 65, 128, 256] {
            let data = leaves(size);
            let (root, paths) = build_tree(&data).unwrap();
            assert_eq!(paths.len(), size);
            for (i, path) in paths.iter().enumerate() {
                assert!(
                    verify_path(&leaf_hash(&data[i]), path, &root),
                    "path failed at size={size}, idx={i}"
                );
            }
        }
    }

    #[test]
    fn test_tampered_sibling_fails() {
        let data = leaves(9);
        let (root, paths) = build_tree(&data).unwrap();
        let mut tampered = paths[3].clone();
        tampered.steps[0].hash[0] ^= 0x01;
        assert!(!verify_path(&leaf_hash(&data[3]), &tampered, &root));
    }

    #[test]
    fn test_wrong_leaf_or_index_fails() {
        let data = leaves(8);
        let (root, paths) = build_tree(&data).unwrap();
        assert!(!verify_path(&leaf_hash(&data[2]), &paths[3], &root));

        let mut moved = paths[3].clone();
        moved.leaf_index = 2;
        assert!(!verify_path(&leaf_hash(&data[3]), &moved, &root));

        let mut out_of_range = paths[3].clone();
        out_of_range.leaf_index = 8;
        assert!(!verify_path(&leaf_hash(&data[3]), &out_of_range, &root));
    }

    #[test]
    fn test_padding_slot_only_accepts_padding_leaf() {
        let tree = MerkleTree::build(&leaves(3)).unwrap();
        let root = tree.root();
        let mut path = tree.path(2).unwrap();
        path.leaf_index = 3;
        path.steps[0].side = Side::Left;
        path.steps[0].hash = *tree.leaf(2).unwrap();
        // The padding slot re-derives the root only with the padding leaf itself.
        assert!(verify_path(&padding_leaf(), &path, &root));
        assert!(!verify_path(&leaf_hash(b"forged"), &path, &root));
    }

    #[test]
    fn test_wrong_root_algorithm_fails() {
        let data = leaves(4);
        let (root, paths) = build_tree(&data).unwrap();
        let relabelled = ContentDigest::new(DigestAlgorithm::Blake3Keyed, root.bytes);
        assert!(!verify_path(&leaf_hash(&data[0]), &paths[0], &relabelled));
    }

    #[test]
    fn test_path_serde_shape() {
        let (_, paths) = build_tree(&leaves(2)).unwrap();
        let json = serde_json::to_value(&paths[0]).unwrap();
        assert_eq!(json["leaf_index"], 0);
        assert_eq!(json["steps"][0]["side"], "right");
        assert_eq!(json["steps"][0]["hash"].as_str().unwrap().len(), 64);
    }
}
