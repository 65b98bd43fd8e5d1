//! Random record trees.
//!
//! Used by the datagen binary to write test files and by the demo to produce
//! data and to answer simulated lazy loads.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};

use crate::types::TreeRecord;

const DEFAULT_SEED: u64 = 42;

const WORDS: &[&str] = &[
    "amber", "basalt", "cedar", "delta", "ember", "fjord", "garnet", "harbor", "indigo", "juniper",
    "kelp", "lagoon", "meadow", "nectar", "onyx", "prairie", "quartz", "raven", "summit", "tundra",
    "umber", "valley", "willow", "xenon", "yarrow", "zephyr",
];

/// Shape of a generated tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorParams {
    pub roots: usize,
    /// Number of levels below the roots.
    pub depth: usize,
    /// Maximum children per branch; each branch gets between one and this many.
    pub fanout: usize,
    /// Probability that a node on the last level is lazy instead of a leaf.
    pub lazy_ratio: f64,
    pub disabled_ratio: f64,
    pub seed: u64,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            roots: 5,
            depth: 2,
            fanout: 4,
            lazy_ratio: 0.0,
            disabled_ratio: 0.05,
            seed: DEFAULT_SEED,
        }
    }
}

/// Keeps `gen_bool` in its domain.
fn probability(p: f64) -> f64 {
    if p.is_finite() {
        p.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn label(rng: &mut impl Rng, prefix: &str, index: usize) -> String {
    let word = WORDS[rng.gen_range(0..WORDS.len())];
    if prefix.is_empty() {
        format!("{word} {index}")
    } else {
        format!("{prefix}.{index} {word}")
    }
}

fn record(rng: &mut impl Rng, params: &GeneratorParams, key: String, text: String) -> TreeRecord {
    let mut record = TreeRecord::new(text).disabled(rng.gen_bool(probability(params.disabled_ratio)));
    record.extra.insert("key".to_string(), Value::String(key));
    record.extra.insert("weight".to_string(), json!(rng.gen_range(0..100)));
    record
}

fn generate_level(
    rng: &mut impl Rng,
    params: &GeneratorParams,
    key_prefix: &str,
    level: usize,
    count: usize,
) -> Vec<TreeRecord> {
    (0..count)
        .map(|index| {
            let key = if key_prefix.is_empty() {
                index.to_string()
            } else {
                format!("{key_prefix}-{index}")
            };
            let text = label(rng, "", index);
            let mut node = record(rng, params, key.clone(), text);

            if level < params.depth && params.fanout > 0 {
                let fanout = rng.gen_range(1..=params.fanout);
                node.children = generate_level(rng, params, &key, level + 1, fanout);
            } else {
                node.lazy = rng.gen_bool(probability(params.lazy_ratio));
            }
            node
        })
        .collect()
}

/// Generates a record forest from a seeded RNG.
pub fn generate(params: &GeneratorParams) -> Vec<TreeRecord> {
    let mut rng = StdRng::seed_from_u64(params.seed);
    generate_level(&mut rng, params, "", 0, params.roots)
}

/// Generates the children of a lazy `parent`.
///
/// Children inherit the parent's label as a prefix. Each child is itself lazy
/// with `params.lazy_ratio` probability, so lazy trees can be browsed to any
/// depth.
pub fn generate_children(parent: &TreeRecord, params: &GeneratorParams, rng: &mut impl Rng) -> Vec<TreeRecord> {
    let count = if params.fanout == 0 {
        0
    } else {
        rng.gen_range(1..=params.fanout)
    };
    let key_prefix = parent
        .extra
        .get("key")
        .and_then(Value::as_str)
        .unwrap_or(parent.label.as_str())
        .to_string();

    (0..count)
        .map(|index| {
            let text = label(rng, &parent.label, index);
            let mut child = record(rng, params, format!("{key_prefix}-{index}"), text);
            child.lazy = rng.gen_bool(probability(params.lazy_ratio));
            child
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn depth_of(records: &[TreeRecord]) -> usize {
        records
            .iter()
            .map(|r| 1 + depth_of(&r.children))
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn test_same_seed_same_tree() {
        let params = GeneratorParams::default();
        assert_eq!(generate(&params), generate(&params));
    }

    #[test]
    fn test_depth_and_fanout_respected() {
        let params = GeneratorParams {
            roots: 3,
            depth: 2,
            fanout: 3,
            ..Default::default()
        };
        let records = generate(&params);
        assert_eq!(records.len(), 3);
        assert_eq!(depth_of(&records), 3);
        assert!(records.iter().all(|r| (1..=3).contains(&r.children.len())));
    }

    #[test]
    fn test_full_lazy_ratio_marks_every_leaf() {
        let params = GeneratorParams {
            roots: 2,
            depth: 1,
            lazy_ratio: 1.0,
            ..Default::default()
        };
        let records = generate(&params);
        for root in &records {
            assert!(!root.lazy);
            assert!(root.children.iter().all(|c| c.lazy && c.children.is_empty()));
        }
    }

    #[test]
    fn test_out_of_range_ratio_is_clamped() {
        let params = GeneratorParams {
            roots: 4,
            depth: 0,
            lazy_ratio: 7.0,
            disabled_ratio: f64::NAN,
            ..Default::default()
        };
        let records = generate(&params);
        assert!(records.iter().all(|r| r.lazy && !r.disabled));
    }

    #[test]
    fn test_children_carry_parent_prefix() {
        let parent = TreeRecord::new("root").lazy(true);
        let params = GeneratorParams {
            fanout: 2,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(7);
        let children = generate_children(&parent, &params, &mut rng);

        assert!((1..=2).contains(&children.len()));
        assert!(children[0].label.starts_with("root.0 "));
        assert_eq!(children[0].extra["key"], "root-0");
    }
}
