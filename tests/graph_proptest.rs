use proptest::prelude::*;
use social_graph::{Graph, GraphError};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

type Model = BTreeMap<String, BTreeSet<String>>;

fn arb_edges() -> impl Strategy<Value = Vec<(u8, u8)>> {
    proptest::collection::vec((0u8..24, 0u8..24), 0..80)
}

fn name(i: u8) -> String {
    format!("p{i}")
}

fn build(edges: &[(u8, u8)]) -> (Graph, Model) {
    let mut g = Graph::new();
    let mut model = Model::new();
    for &(a, b) in edges {
        let (a, b) = (name(a), name(b));
        g.add_edge(&a, &b);
        model.entry(a.clone()).or_default().insert(b.clone());
        model.entry(b).or_default().insert(a);
    }
    (g, model)
}

// Reference distances by plain BFS over the model.
fn distances(model: &Model, from: &str) -> BTreeMap<String, usize> {
    let mut dist = BTreeMap::new();
    let mut queue = VecDeque::from([from.to_string()]);
    dist.insert(from.to_string(), 0);
    while let Some(cur) = queue.pop_front() {
        let d = dist[&cur];
        for n in model.get(&cur).into_iter().flatten() {
            if !dist.contains_key(n) {
                dist.insert(n.clone(), d + 1);
                queue.push_back(n.clone());
            }
        }
    }
    dist
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    // Property: neighbor sets equal the symmetric closure of the edge list,
    // and adding the whole list a second time changes nothing.
    #[test]
    fn prop_symmetric_and_idempotent(edges in arb_edges()) {
        let (mut g, model) = build(&edges);
        let distinct: BTreeSet<(String, String)> = edges
            .iter()
            .map(|&(a, b)| if a <= b { (name(a), name(b)) } else { (name(b), name(a)) })
            .collect();

        for _ in 0..2 {
            prop_assert_eq!(g.node_count(), model.len());
            prop_assert_eq!(g.edge_count(), distinct.len());
            for (id, expected) in &model {
                let got: BTreeSet<String> =
                    g.neighbors(id).unwrap().into_iter().map(str::to_owned).collect();
                prop_assert_eq!(&got, expected);
            }
            for &(a, b) in &edges {
                prop_assert!(!g.add_edge(&name(a), &name(b)));
            }
        }
    }

    // Property: find_path agrees with reference BFS distances, returns a
    // walk over real edges from source to target, and reports NoPath
    // exactly when the target is unreachable.
    #[test]
    fn prop_paths_are_shortest(edges in arb_edges(), s in 0u8..24, t in 0u8..24) {
        let (g, model) = build(&edges);
        let (s, t) = (name(s), name(t));
        match g.find_path(&s, &t) {
            Ok(path) => {
                let dist = distances(&model, &s);
                prop_assert_eq!(path.len(), dist[&t] + 1);
                prop_assert_eq!(path[0], s.as_str());
                prop_assert_eq!(*path.last().unwrap(), t.as_str());
                for w in path.windows(2) {
                    prop_assert!(model[w[0]].contains(w[1]));
                }
            }
            Err(GraphError::InvalidId(id)) => {
                prop_assert!(!model.contains_key(&id));
                prop_assert!(id == s || id == t);
            }
            Err(GraphError::NoPath { .. }) => {
                prop_assert!(!distances(&model, &s).contains_key(&t));
            }
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }
}
