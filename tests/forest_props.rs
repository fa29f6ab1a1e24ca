//! Property tests for the pre-order + child-count forest encoding


use chronotree::SectionEntry;
use chronotree::tree::{self, ChildIndices, RootIndices};
use proptest::prelude::*;
use test_helpers::*;

const NAME_POOL: [&str; 8] = [
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta",
];

/// Turn free-form choices into a well-nested script: an `end` choice at
/// depth zero becomes a `start`, and unclosed sections are closed at the
/// tail. Also returns each started section's nesting depth, in start
/// order.
fn well_nested_script(choices: &[bool]) -> (Vec<Op>, Vec<usize>) {
    let mut ops = Vec::with_capacity(choices.len() * 2);
    let mut depths = Vec::new();
    let mut open = 0usize;
    let mut started = 0usize;

    for &wants_end in choices {
        if wants_end && open > 0 {
            ops.push(Op::End);
            open -= 1;
        } else {
            ops.push(Op::Start(NAME_POOL[started % NAME_POOL.len()]));
            depths.push(open);
            started += 1;
            open += 1;
        }
    }
    for _ in 0..open {
        ops.push(Op::End);
    }

    (ops, depths)
}

/// Give every node a strictly positive synthetic duration covering its
/// children, so percentage bounds can be checked exactly
fn assign_synthetic_durations(entries: &mut Vec<SectionEntry>) {
    fn fill(entries: &mut Vec<SectionEntry>, index: usize) -> f64 {
        let children: Vec<usize> = ChildIndices::new(entries, index).collect();
        let mut total = 1.0;
        for child in children {
            total += fill(entries, child);
        }
        entries[index].elapsed_seconds = total;
        total
    }

    let roots: Vec<usize> = RootIndices::new(entries).collect();
    for root in roots {
        fill(entries, root);
    }
}

proptest! {
    #[test]
    fn child_counts_match_reconstructed_forest(
        choices in proptest::collection::vec(any::<bool>(), 0..120),
    ) {
        let (ops, _) = well_nested_script(&choices);
        let profiler = run_script(&ops);
        let entries = profiler.entries();

        for index in 0..entries.len() {
            let counted = counted_descendants(entries, index);
            prop_assert_eq!(
                entries[index].child_count as usize,
                counted,
                "entry {} claims {} descendants but the forest walk found {}",
                index,
                entries[index].child_count,
                counted
            );
        }
        prop_assert!(subtrees_are_contiguous(entries));
    }

    #[test]
    fn log_order_equals_start_order(
        choices in proptest::collection::vec(any::<bool>(), 0..120),
    ) {
        let (ops, _) = well_nested_script(&choices);
        let started: Vec<&str> = ops
            .iter()
            .filter_map(|op| match op {
                Op::Start(name) => Some(*name),
                Op::End => None,
            })
            .collect();

        let profiler = run_script(&ops);
        prop_assert_eq!(names(profiler.entries()), started);
    }

    #[test]
    fn annotation_matches_script_depths(
        choices in proptest::collection::vec(any::<bool>(), 0..120),
    ) {
        let (ops, depths) = well_nested_script(&choices);
        let profiler = run_script(&ops);

        let mut entries = profiler.entries().to_vec();
        tree::annotate(&mut entries);

        for (index, entry) in entries.iter().enumerate() {
            prop_assert_eq!(
                entry.indentation as usize,
                depths[index] * 2,
                "entry {} started at depth {}",
                index,
                depths[index]
            );
        }
    }

    #[test]
    fn percentages_stay_within_bounds(
        choices in proptest::collection::vec(any::<bool>(), 0..120),
    ) {
        let (ops, _) = well_nested_script(&choices);
        let profiler = run_script(&ops);

        // Synthetic durations: strictly positive, parent covers children
        let mut entries = profiler.entries().to_vec();
        assign_synthetic_durations(&mut entries);
        tree::annotate(&mut entries);

        let roots: Vec<usize> = RootIndices::new(&entries).collect();
        for (index, entry) in entries.iter().enumerate() {
            prop_assert!(
                entry.time_percentage > 0.0 && entry.time_percentage <= 100.0,
                "entry {} has out-of-bounds percentage {}",
                index,
                entry.time_percentage
            );
            if roots.contains(&index) {
                prop_assert_eq!(entry.time_percentage, 100.0);
            }
        }
    }
}
