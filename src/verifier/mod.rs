//! End-to-end KRP evaluation.
//!
//! [`Verifier`] runs the linear pipeline for one instance:
//!
//! ```text
//! simulate -> min-cut check -> secrecy check -> verdict
//! ```
//!
//! and sweeps that pipeline across every non-isomorphic graph on `N`
//! nodes, one parallel task per candidate graph.

pub mod sweep;
pub mod verdict;

pub use sweep::{FullWiretap, Scenario, ScenarioInstance, SweepEntry, SweepReport};
pub use verdict::{PairVerdict, Verdict};

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::cancel::CancelToken;
use crate::config::KrpConfig;
use crate::error::KrpError;
use crate::graph::{enumerate_graphs_with, Graph, IsomorphismTest, MinCutSolver, PetgraphBackend};
use crate::protocol::{simulate, Adversary, UserPair};
use crate::verification::{check_min_cut, check_secrecy, TraceLog};

/// KRP soundness and secrecy verifier.
///
/// Generic over the graph backend so isomorphism and min-cut can be
/// swapped or faked.
///
/// # Example
///
/// ```rust
/// use krp_verify::{Adversary, Graph, KrpConfig, UserPair, Verifier};
///
/// let verifier = Verifier::new(KrpConfig::default().with_seed(1)).unwrap();
///
/// let graph = Graph::path(4);
/// let pairs = [UserPair::new(0, 3).unwrap()];
/// let adversary = Adversary::new([(1, 2)]).unwrap();
///
/// let verdict = verifier.evaluate(&graph, &pairs, &adversary).unwrap();
/// assert!(verdict.sound());
/// assert!(verdict.min_cut_passed());
/// assert!(verdict.secrecy_holds());
/// ```
#[derive(Clone, Debug)]
pub struct Verifier<B = PetgraphBackend> {
    config: KrpConfig,
    backend: B,
    // Shared by clones so no two runs draw from the same key stream.
    runs: Arc<AtomicU64>,
}

impl Default for Verifier<PetgraphBackend> {
    fn default() -> Self {
        Self {
            config: KrpConfig::default(),
            backend: PetgraphBackend,
            runs: Arc::default(),
        }
    }
}

impl Verifier<PetgraphBackend> {
    /// Create a verifier with the default backend.
    pub fn new(config: KrpConfig) -> Result<Self, KrpError> {
        Self::with_backend(config, PetgraphBackend)
    }
}

impl<B> Verifier<B>
where
    B: IsomorphismTest + MinCutSolver,
{
    /// Create a verifier with an injected backend.
    pub fn with_backend(config: KrpConfig, backend: B) -> Result<Self, KrpError> {
        config.validate()?;
        Ok(Self {
            config,
            backend,
            runs: Arc::default(),
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &KrpConfig {
        &self.config
    }

    /// Graph backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Evaluate one instance with fresh local keys.
    ///
    /// With a configured seed, the n-th run of a verifier draws from
    /// stream n of the seeded generator: repeated runs never share keys,
    /// and a new verifier with the same seed replays the same sequence.
    pub fn evaluate(
        &self,
        graph: &Graph,
        pairs: &[UserPair],
        adversary: &Adversary,
    ) -> Result<Verdict, KrpError> {
        let mut rng = self.key_rng(0, self.next_run());
        self.evaluate_with_rng(graph, pairs, adversary, &mut rng)
    }

    fn next_run(&self) -> u64 {
        self.runs.fetch_add(1, Ordering::Relaxed)
    }

    /// Configured seed offset by `offset`, on stream `run`.
    fn key_rng(&self, offset: u64, run: u64) -> ChaCha8Rng {
        match self.config.seed {
            Some(seed) => {
                let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(offset));
                rng.set_stream(run);
                rng
            }
            None => ChaCha8Rng::from_entropy(),
        }
    }

    /// Evaluate one instance with a caller-supplied RNG.
    ///
    /// Inputs are validated before anything runs. The RNG only affects
    /// key values in the log, never the verdict flags.
    pub fn evaluate_with_rng<R>(
        &self,
        graph: &Graph,
        pairs: &[UserPair],
        adversary: &Adversary,
        rng: &mut R,
    ) -> Result<Verdict, KrpError>
    where
        R: Rng + ?Sized,
    {
        let simulation = simulate(graph, pairs, adversary, self.config.key_length, rng)?;
        let (outcomes, mut log) = simulation.into_parts();

        let mut pair_verdicts = Vec::with_capacity(outcomes.len());
        for outcome in &outcomes {
            let pair = outcome.pair();
            let cut = check_min_cut(&self.backend, graph, pair, adversary)?;
            log.record(format!(
                "Min-cut for UserPair {}: minimum {}, adversary edges {}, separates: {} -> {}",
                pair,
                cut.min_cut_size,
                cut.adversary_size,
                cut.separates,
                if cut.passed() { "passed" } else { "failed" }
            ));

            let secrecy_holds = if outcome.is_sound() && cut.passed() {
                let check = check_secrecy(graph, &outcome.path_edges(), adversary);
                if check.holds() {
                    log.record(format!(
                        "Secrecy for UserPair {}: rank(adversary) = {}, rank(adversary + path) = {} -> holds",
                        pair, check.adversary_rank, check.extended_rank
                    ));
                } else {
                    breach(
                        &mut log,
                        pair,
                        format!("path lies in the span of wiretapped edges (rank {})", check.adversary_rank),
                    );
                }
                check.holds()
            } else {
                breach(
                    &mut log,
                    pair,
                    format!(
                        "precondition failed (sound: {}, min-cut passed: {})",
                        outcome.is_sound(),
                        cut.passed()
                    ),
                );
                false
            };

            pair_verdicts.push(PairVerdict {
                node1: pair.node1(),
                node2: pair.node2(),
                path: outcome.path().map(<[_]>::to_vec),
                sound: outcome.is_sound(),
                min_cut_size: cut.min_cut_size,
                min_cut_passed: cut.passed(),
                secrecy_holds,
            });
        }

        let sound = pair_verdicts.iter().all(|p| p.sound);
        let min_cut_passed = pair_verdicts.iter().all(|p| p.min_cut_passed);
        let secrecy_holds = pair_verdicts.iter().all(|p| p.secrecy_holds);
        log.record(format!(
            "Verdict: sound={}, minCutPassed={}, secrecyHolds={}, adversaryEdgeCount={}",
            sound,
            min_cut_passed,
            secrecy_holds,
            adversary.len()
        ));

        Ok(Verdict::from_pairs(pair_verdicts, adversary.len(), log.into_entries()))
    }

    /// Enumerate candidate graphs, honoring `max_nodes`.
    pub fn enumerate(&self, n_nodes: usize, cancel: &CancelToken) -> Result<Vec<Graph>, KrpError> {
        if n_nodes > self.config.max_nodes {
            return Err(KrpError::NodeCountTooLarge {
                requested: n_nodes,
                limit: self.config.max_nodes,
            });
        }
        enumerate_graphs_with(n_nodes, &self.backend, cancel)
    }

    /// Evaluate `scenario` on every non-isomorphic graph with `n_nodes` nodes.
    pub fn sweep<S>(&self, n_nodes: usize, scenario: &S) -> Result<SweepReport, KrpError>
    where
        S: Scenario + ?Sized,
    {
        self.sweep_with_cancel(n_nodes, scenario, &CancelToken::new())
    }

    /// [`sweep`](Self::sweep) with cooperative cancellation.
    ///
    /// Each candidate graph is an independent parallel task with its own
    /// RNG seeded from the base seed and the graph index. Once `cancel`
    /// fires, tasks not yet started are skipped and the report keeps every
    /// verdict already produced; the report is marked cancelled only when
    /// some task was skipped. The first invalid scenario aborts the sweep
    /// with its error.
    pub fn sweep_with_cancel<S>(
        &self,
        n_nodes: usize,
        scenario: &S,
        cancel: &CancelToken,
    ) -> Result<SweepReport, KrpError>
    where
        S: Scenario + ?Sized,
    {
        let graphs = match self.enumerate(n_nodes, cancel) {
            Ok(graphs) => graphs,
            Err(KrpError::Cancelled) => {
                warn!(n_nodes, "sweep cancelled during enumeration");
                return Ok(SweepReport {
                    n_nodes,
                    cancelled: true,
                    ..SweepReport::default()
                });
            }
            Err(e) => return Err(e),
        };

        let run = self.next_run();
        let skipped = AtomicUsize::new(0);
        info!(n_nodes, candidates = graphs.len(), "sweep started");

        let entries: Vec<SweepEntry> = graphs
            .par_iter()
            .enumerate()
            .filter_map(|(graph_index, graph)| {
                if cancel.is_cancelled() {
                    skipped.fetch_add(1, Ordering::Relaxed);
                    return None;
                }
                let instance = scenario.instantiate(graph)?;
                let mut rng = self.key_rng(graph_index as u64, run);
                let result = self
                    .evaluate_with_rng(graph, &instance.pairs, &instance.adversary, &mut rng)
                    .map(|verdict| SweepEntry {
                        graph_index,
                        edges: graph.edges().collect(),
                        verdict,
                    });
                Some(result)
            })
            .collect::<Result<_, _>>()?;

        let skipped = skipped.into_inner();
        let cancelled = skipped > 0;
        if cancelled {
            warn!(n_nodes, completed = entries.len(), skipped, "sweep cancelled");
        }
        info!(n_nodes, evaluated = entries.len(), "sweep finished");

        Ok(SweepReport {
            n_nodes,
            candidates: graphs.len(),
            entries,
            cancelled,
        })
    }
}

fn breach(log: &mut TraceLog, pair: UserPair, reason: String) {
    warn!(pair = %pair, %reason, "secrecy breach");
    log.record(format!("Secrecy BREACH for UserPair {}: {}", pair, reason));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeId;

    fn verifier() -> Verifier {
        Verifier::new(KrpConfig::default().with_seed(5).with_key_length(4)).unwrap()
    }

    fn pair(a: NodeId, b: NodeId) -> UserPair {
        UserPair::new(a, b).unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let result = Verifier::new(KrpConfig::default().with_key_length(0));
        assert!(matches!(result, Err(KrpError::InvalidKeyLength(0))));
    }

    #[test]
    fn test_secrecy_holds_on_path() {
        let v = verifier()
            .evaluate(&Graph::path(4), &[pair(0, 3)], &Adversary::new([(1, 2)]).unwrap())
            .unwrap();
        assert!(v.sound());
        assert!(v.min_cut_passed());
        assert!(v.secrecy_holds());
        assert_eq!(v.adversary_edge_count(), 1);
        assert_eq!(v.pairs()[0].min_cut_size, 1);
    }

    #[test]
    fn test_full_wiretap_is_breach() {
        let g = Graph::path(3);
        let v = verifier().evaluate(&g, &[pair(0, 2)], &Adversary::wiretap_all(&g)).unwrap();
        assert!(v.sound());
        assert!(!v.min_cut_passed());
        assert!(!v.secrecy_holds());
        assert!(v.log().iter().any(|l| l.contains("Secrecy BREACH")));
    }

    #[test]
    fn test_unsound_pair_cannot_be_secret() {
        let g = Graph::new([0, 1, 2], [(0, 1)]).unwrap();
        let v = verifier().evaluate(&g, &[pair(0, 2)], &Adversary::passive()).unwrap();
        assert!(!v.sound());
        // Empty set already separates a disconnected pair
        assert!(v.min_cut_passed());
        assert!(!v.secrecy_holds());
        assert_eq!(v.pairs()[0].path, None);
    }

    #[test]
    fn test_log_ends_with_verdict_line() {
        let v = verifier()
            .evaluate(&Graph::path(2), &[pair(0, 1)], &Adversary::new([(0, 1)]).unwrap())
            .unwrap();
        let last = v.log().last().unwrap();
        assert!(last.starts_with("Verdict: sound=true"));
    }

    #[test]
    fn test_single_edge_wiretapped_is_breach() {
        // Adversary holds the only edge: exact min cut, but the path is observed
        let v = verifier()
            .evaluate(&Graph::path(2), &[pair(0, 1)], &Adversary::new([(0, 1)]).unwrap())
            .unwrap();
        assert!(v.min_cut_passed());
        assert!(!v.secrecy_holds());
    }

    #[test]
    fn test_seeded_evaluation_is_reproducible() {
        let g = Graph::path(4);
        let adv = Adversary::new([(2, 3)]).unwrap();
        let a = verifier().evaluate(&g, &[pair(0, 3)], &adv).unwrap();
        let b = verifier().evaluate(&g, &[pair(0, 3)], &adv).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_repeated_evaluations_draw_fresh_keys() {
        let v = Verifier::new(KrpConfig::default().with_seed(5).with_key_length(64)).unwrap();
        let g = Graph::path(3);
        let first = v.evaluate(&g, &[pair(0, 2)], &Adversary::passive()).unwrap();
        let second = v.evaluate(&g, &[pair(0, 2)], &Adversary::passive()).unwrap();
        assert_ne!(first.log(), second.log());
        assert_eq!(first.sound(), second.sound());

        // A clone shares the run counter
        let third = v.clone().evaluate(&g, &[pair(0, 2)], &Adversary::passive()).unwrap();
        assert_ne!(third.log(), first.log());
        assert_ne!(third.log(), second.log());

        // A fresh verifier with the same seed replays the first run
        let replay = Verifier::new(KrpConfig::default().with_seed(5).with_key_length(64))
            .unwrap()
            .evaluate(&g, &[pair(0, 2)], &Adversary::passive())
            .unwrap();
        assert_eq!(replay, first);
    }

    #[test]
    fn test_enumerate_respects_max_nodes() {
        let v = Verifier::new(KrpConfig::default().with_max_nodes(3)).unwrap();
        assert_eq!(v.enumerate(3, &CancelToken::new()).unwrap().len(), 4);
        assert!(matches!(
            v.enumerate(4, &CancelToken::new()),
            Err(KrpError::NodeCountTooLarge { limit: 3, .. })
        ));
    }

    #[test]
    fn test_sweep_full_wiretap() {
        let report = verifier().sweep(3, &FullWiretap::new(pair(0, 1))).unwrap();
        assert_eq!(report.candidates, 4);
        assert_eq!(report.len(), 4);
        assert!(!report.cancelled);
        // Wiretapping every edge never leaves a secret path
        assert_eq!(report.secrecy_count(), 0);
    }

    #[test]
    fn test_sweep_cancelled_up_front() {
        let token = CancelToken::new();
        token.cancel();
        let report = verifier()
            .sweep_with_cancel(3, &FullWiretap::new(pair(0, 1)), &token)
            .unwrap();
        assert!(report.cancelled);
        assert!(report.is_empty());
    }

    #[test]
    fn test_sweep_cancelled_mid_run_keeps_finished_verdicts() {
        let token = CancelToken::new();
        let trigger = token.clone();
        let scenario = move |g: &Graph| -> Option<ScenarioInstance> {
            trigger.cancel();
            FullWiretap::new(UserPair::new(0, 1).ok()?).instantiate(g)
        };

        // Two workers: at most one task per worker gets past the check
        let pool = rayon::ThreadPoolBuilder::new().num_threads(2).build().unwrap();
        let report = pool
            .install(|| verifier().sweep_with_cancel(5, &scenario, &token))
            .unwrap();

        assert!(report.cancelled);
        assert_eq!(report.candidates, 34);
        assert!(!report.is_empty());
        assert!(report.len() < report.candidates);
        for entry in &report.entries {
            assert_eq!(entry.verdict.pairs().len(), 1);
            assert_eq!(entry.verdict.adversary_edge_count(), entry.edges.len());
            assert!(entry.verdict.log().last().unwrap().starts_with("Verdict:"));
        }
    }

    #[test]
    fn test_sweep_cancel_after_last_task_is_not_cancelled() {
        let token = CancelToken::new();
        let trigger = token.clone();
        let calls = AtomicUsize::new(0);
        // Cancel from the last instantiation, after every task passed its check
        let scenario = |g: &Graph| -> Option<ScenarioInstance> {
            if calls.fetch_add(1, Ordering::SeqCst) + 1 == 11 {
                trigger.cancel();
            }
            FullWiretap::new(UserPair::new(0, 1).ok()?).instantiate(g)
        };

        let report = verifier().sweep_with_cancel(4, &scenario, &token).unwrap();
        assert!(token.is_cancelled());
        assert!(!report.cancelled);
        assert_eq!(report.len(), 11);
    }

    #[test]
    fn test_sweep_propagates_scenario_errors() {
        let bad = |_: &Graph| {
            Some(ScenarioInstance {
                pairs: vec![pair(0, 9)],
                adversary: Adversary::passive(),
            })
        };
        assert_eq!(verifier().sweep(2, &bad).unwrap_err(), KrpError::UnknownNode(9));
    }
}
