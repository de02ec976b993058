//! Sweep every graph on 4 nodes and report soundness and secrecy

use krp_verify::{Adversary, Graph, KrpConfig, NodeId, ScenarioInstance, UserPair, Verifier};
use krp_verify::graph::MinCutSolver;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("KRP sweep demo\n");

    let verifier = Verifier::new(KrpConfig::default().with_seed(42).with_key_length(8))
        .expect("default config is valid");

    // Pair (0,3) against the edges at node 3, when they form an exact min cut
    let scenario = |g: &Graph| -> Option<ScenarioInstance> {
        let cut = verifier.backend().min_edge_cut(g, 0, 3);
        if cut == 0 || g.degree(3) != cut {
            return None;
        }
        let edges: Vec<(NodeId, NodeId)> = g.neighbors(3).map(|n| (n, 3)).collect();
        Some(ScenarioInstance {
            pairs: vec![UserPair::new(0, 3).ok()?],
            adversary: Adversary::new(edges).ok()?,
        })
    };

    let report = verifier.sweep(4, &scenario).expect("sweep failed");

    println!(
        "{} candidate graphs, {} evaluated",
        report.candidates,
        report.len()
    );
    for entry in &report.entries {
        let edges: Vec<String> = entry.edges.iter().map(ToString::to_string).collect();
        println!(
            "   graph #{:<2} [{}] sound={} minCut={} secrecy={}",
            entry.graph_index,
            edges.join(" "),
            entry.verdict.sound(),
            entry.verdict.min_cut_passed(),
            entry.verdict.secrecy_holds()
        );
    }
    println!(
        "\nSecrecy held on {}/{} graphs",
        report.secrecy_count(),
        report.len()
    );
}
