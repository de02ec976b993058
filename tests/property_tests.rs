//! Property-based tests for verdict stability
//!
//! Structural verdict flags depend only on the graph, pairs and adversary;
//! key draws and row order must never change them.

use krp_verify::math::{gf2_rank, BitVector};
use krp_verify::{enumerate_graphs, simulate, Adversary, Graph, KrpConfig, UserPair, Verifier};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn bit_rows(dim: usize, max_rows: usize) -> impl Strategy<Value = Vec<BitVector>> {
    prop::collection::vec(prop::collection::vec(any::<bool>(), dim), 0..max_rows).prop_map(
        move |rows| {
            rows.into_iter()
                .map(|bits| {
                    let mut v = BitVector::zeros(dim);
                    for (i, b) in bits.into_iter().enumerate() {
                        v.set(i, b);
                    }
                    v
                })
                .collect()
        },
    )
}

proptest! {
    #[test]
    fn prop_rank_invariant_under_row_permutation(
        rows in bit_rows(6, 8),
        shuffle_seed in any::<u64>(),
    ) {
        use rand::seq::SliceRandom;

        let mut shuffled = rows.clone();
        shuffled.shuffle(&mut ChaCha8Rng::seed_from_u64(shuffle_seed));

        // PROPERTY: rank is a function of the row set, not its order
        prop_assert_eq!(gf2_rank(&rows), gf2_rank(&shuffled));
    }

    #[test]
    fn prop_rank_bounded(rows in bit_rows(5, 10)) {
        let rank = gf2_rank(&rows);
        prop_assert!(rank <= rows.len());
        prop_assert!(rank <= 5);
    }

    #[test]
    fn prop_flags_independent_of_key_draws(
        graph_index in 0usize..11,
        adversary_mask in any::<u8>(),
        seed_a in any::<u64>(),
        seed_b in any::<u64>(),
        key_length in 1usize..130,
    ) {
        let graphs = enumerate_graphs(4).unwrap();
        let graph = &graphs[graph_index];
        let adversary = Adversary::new(
            graph
                .edges()
                .enumerate()
                .filter(|(i, _)| (adversary_mask >> i) & 1 == 1)
                .map(|(_, e)| (e.u(), e.v())),
        )
        .unwrap();
        let pairs = [UserPair::new(0, 3).unwrap(), UserPair::new(1, 2).unwrap()];

        let verifier = Verifier::new(KrpConfig::default().with_key_length(key_length)).unwrap();
        let a = verifier
            .evaluate_with_rng(graph, &pairs, &adversary, &mut ChaCha8Rng::seed_from_u64(seed_a))
            .unwrap();
        let b = verifier
            .evaluate_with_rng(graph, &pairs, &adversary, &mut ChaCha8Rng::seed_from_u64(seed_b))
            .unwrap();

        // PROPERTY: randomness only affects key values, never the flags
        prop_assert_eq!(a.sound(), b.sound());
        prop_assert_eq!(a.min_cut_passed(), b.min_cut_passed());
        prop_assert_eq!(a.secrecy_holds(), b.secrecy_holds());
        prop_assert_eq!(a.pairs(), b.pairs());
    }

    #[test]
    fn prop_keys_agree_whenever_path_exists(
        edge_mask in 0u16..(1 << 10),
        seed in any::<u64>(),
    ) {
        // Random graph on 5 nodes from a 10-bit edge mask
        let mut edges = Vec::new();
        let mut bit = 0;
        for a in 0u32..5 {
            for b in (a + 1)..5 {
                if (edge_mask >> bit) & 1 == 1 {
                    edges.push((a, b));
                }
                bit += 1;
            }
        }
        let graph = Graph::new(0..5, edges).unwrap();
        let pairs = [UserPair::new(0, 4).unwrap()];
        let sim = simulate(&graph, &pairs, &Adversary::passive(), 8, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
        let outcome = &sim.outcomes()[0];

        // PROPERTY: sound exactly when connected, and k1 == k2 either way
        prop_assert_eq!(outcome.is_sound(), graph.is_connected(0, 4));
        prop_assert_eq!(outcome.k1(), outcome.k2());
        prop_assert_eq!(outcome.k1().is_some(), outcome.path().is_some());
    }
}
