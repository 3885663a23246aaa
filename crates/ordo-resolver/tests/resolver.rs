use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ordo_core::config::ResolverConfig;
use ordo_resolver::{Dependency, HookError, ResolveError, Resolution, Resolver, Source};

#[derive(Debug, Clone, PartialEq)]
struct Node {
    name: &'static str,
    tags: Vec<&'static str>,
    needs: Vec<&'static str>,
    depends_on: Vec<&'static str>,
    missing: Vec<String>,
    depends_on_calls: usize,
    missing_calls: usize,
    fail_depends_on: bool,
    fail_missing: bool,
}

fn node(name: &'static str, needs: &[&'static str]) -> Node {
    Node {
        name,
        tags: Vec::new(),
        needs: needs.to_vec(),
        depends_on: Vec::new(),
        missing: Vec::new(),
        depends_on_calls: 0,
        missing_calls: 0,
        fail_depends_on: false,
        fail_missing: false,
    }
}

impl Node {
    fn tagged(mut self, tag: &'static str) -> Self {
        self.tags.push(tag);
        self
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

struct Needs(&'static str);

impl fmt::Display for Needs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "needs {}", self.0)
    }
}

impl Dependency<Node> for Needs {
    fn satisfied_by(&self, candidate: &Node) -> bool {
        candidate.name == self.0 || candidate.tags.contains(&self.0)
    }
}

impl Source for Node {
    type Dep = Needs;

    fn dependencies(&self) -> Vec<Needs> {
        self.needs.iter().map(|&n| Needs(n)).collect()
    }

    fn set_depends_on(&mut self, providers: &[&Node]) -> Result<(), HookError> {
        self.depends_on_calls += 1;
        if self.fail_depends_on {
            return Err("depends-on rejected".into());
        }
        self.depends_on = providers.iter().map(|p| p.name).collect();
        Ok(())
    }

    fn set_unresolved_dependencies(&mut self, missing: &[Needs]) -> Result<(), HookError> {
        self.missing_calls += 1;
        if self.fail_missing {
            return Err("cannot run without it".into());
        }
        self.missing = missing.iter().map(|m| m.to_string()).collect();
        Ok(())
    }
}

fn resolve(nodes: Vec<Node>) -> Result<Resolution<Node>, ResolveError> {
    let mut resolver = Resolver::new();
    resolver.add_all(nodes);
    resolver.resolve()
}

fn names(resolution: &Resolution<Node>) -> Vec<&'static str> {
    resolution.iter().map(|n| n.name).collect()
}

fn index_of(order: &[&str], name: &str) -> usize {
    order.iter().position(|n| *n == name).unwrap()
}

#[test]
fn chain_orders_providers_first() {
    let resolution = resolve(vec![
        node("A", &[]),
        node("B", &["A"]),
        node("C", &["A", "B"]),
    ])
    .unwrap();
    assert_eq!(names(&resolution), vec!["A", "B", "C"]);

    let c = &resolution.ordered()[2];
    let providers: Vec<&str> = resolution.depends_on_of(c).unwrap().iter().map(|n| n.name).collect();
    assert_eq!(providers, vec!["A", "B"]);
    assert!(resolution.unresolved().is_none());
}

#[test]
fn registration_order_does_not_break_dependencies() {
    let resolution = resolve(vec![
        node("C", &["A", "B"]),
        node("B", &["A"]),
        node("A", &[]),
    ])
    .unwrap();
    assert_eq!(names(&resolution), vec!["A", "B", "C"]);
}

#[test]
fn every_edge_points_backwards_in_the_order() {
    let nodes = vec![
        node("app", &["http", "db", "log"]),
        node("http", &["log", "tls"]),
        node("db", &["log"]),
        node("tls", &[]),
        node("log", &[]),
        node("metrics", &["log"]),
    ];
    let edges: Vec<(&str, &str)> = nodes
        .iter()
        .flat_map(|n| n.needs.iter().map(move |d| (n.name, *d)))
        .collect();
    let resolution = resolve(nodes).unwrap();
    let order = names(&resolution);
    assert_eq!(order.len(), 6);
    for (dependent, provider) in edges {
        assert!(
            index_of(&order, provider) < index_of(&order, dependent),
            "{provider} should precede {dependent} in {order:?}"
        );
    }
}

#[test]
fn unrelated_sources_keep_registration_order() {
    let resolution = resolve(vec![node("z", &[]), node("a", &[]), node("m", &[])]).unwrap();
    assert_eq!(names(&resolution), vec!["z", "a", "m"]);
}

#[test]
fn ready_sources_go_in_registration_order() {
    // `free` and `base` are both ready first; `late` waits for `base`.
    let resolution = resolve(vec![
        node("late", &["base"]),
        node("free", &[]),
        node("base", &[]),
    ])
    .unwrap();
    assert_eq!(names(&resolution), vec!["free", "base", "late"]);
}

#[test]
fn resolution_is_deterministic() {
    let build = || {
        vec![
            node("d", &["b", "c"]),
            node("c", &["a"]),
            node("b", &["a"]),
            node("a", &[]),
            node("e", &[]),
        ]
    };
    let first = names(&resolve(build()).unwrap());
    let second = names(&resolve(build()).unwrap());
    assert_eq!(first, second);
    assert_eq!(first, vec!["a", "c", "b", "d", "e"]);
}

#[test]
fn two_cycle_is_detected() {
    let err = resolve(vec![node("X", &["Y"]), node("Y", &["X"])]).unwrap_err();
    let ResolveError::Cyclic(cycle) = err else {
        panic!("expected a cycle");
    };
    assert!(cycle.involves("X"));
    assert!(cycle.involves("Y"));
    assert_eq!(cycle.chain().first(), cycle.chain().last());
    assert_eq!(cycle.to_string(), "Cyclic dependency: Y --> X --> Y");
}

#[test]
fn three_cycle_renders_full_chain() {
    let err = resolve(vec![
        node("A", &["B"]),
        node("B", &["C"]),
        node("C", &["A"]),
    ])
    .unwrap_err();
    assert_eq!(err.to_string(), "Cyclic dependency: C --> A --> B --> C");
}

#[test]
fn cycle_skips_capability_hooks() {
    // Hooks would fail; the cycle must be reported first.
    let mut x = node("X", &["Y"]);
    x.fail_depends_on = true;
    let err = resolve(vec![x, node("Y", &["X"])]).unwrap_err();
    assert!(matches!(err, ResolveError::Cyclic(_)));
}

#[test]
fn unresolved_dependency_fails_in_strict_mode() {
    let err = resolve(vec![node("P", &["ghost"])]).unwrap_err();
    let ResolveError::Unresolved(unresolved) = err else {
        panic!("expected unresolved dependencies");
    };
    assert_eq!(unresolved.entries().len(), 1);
    assert_eq!(
        unresolved.missing_for("P"),
        Some(&["needs ghost".to_string()][..])
    );
    assert_eq!(
        unresolved.to_string(),
        "Found 1 unresolved dependency:\n  P: needs ghost"
    );
}

#[test]
fn unresolved_dependency_is_only_reported_in_permissive_mode() {
    let mut resolver = Resolver::new().warn_on_missing_dependencies(true);
    resolver.add(node("P", &["ghost"]));
    let resolution = resolver.resolve().unwrap();
    assert_eq!(names(&resolution), vec!["P"]);
    let report = resolution.unresolved().unwrap();
    assert_eq!(report.count(), 1);
    assert_eq!(resolution.ordered()[0].missing, vec!["needs ghost"]);
}

#[test]
fn permissive_mode_still_orders_resolvable_edges() {
    let mut resolver = Resolver::with_config(ResolverConfig::permissive());
    resolver.add_all(vec![
        node("late", &["early", "ghost", "phantom"]),
        node("early", &[]),
    ]);
    let resolution = resolver.resolve().unwrap();
    assert_eq!(names(&resolution), vec!["early", "late"]);
    let report = resolution.unresolved().unwrap();
    assert!(report.to_string().starts_with("Found 2 unresolved dependencies:"));
}

#[test]
fn source_never_satisfies_itself() {
    let err = resolve(vec![node("A", &["self"]).tagged("self")]).unwrap_err();
    assert!(matches!(err, ResolveError::Unresolved(_)));
}

#[test]
fn every_provider_of_a_dependency_becomes_an_edge() {
    let resolution = resolve(vec![
        node("consumer", &["storage"]),
        node("disk", &[]).tagged("storage"),
        node("s3", &[]).tagged("storage"),
    ])
    .unwrap();
    let order = names(&resolution);
    assert_eq!(order, vec!["disk", "s3", "consumer"]);
    let consumer = &resolution.ordered()[2];
    assert_eq!(consumer.depends_on, vec!["disk", "s3"]);
    assert_eq!(resolution.depends_on(2).len(), 2);
}

#[test]
fn equal_sources_are_distinct_vertices() {
    let twin = node("twin", &[]);
    let resolution = resolve(vec![twin.clone(), twin, node("user", &["twin"])]).unwrap();
    assert_eq!(names(&resolution), vec!["twin", "twin", "user"]);
    assert_eq!(resolution.ordered()[0], resolution.ordered()[1]);
    assert_eq!(resolution.depends_on(2).len(), 2);
}

#[test]
fn unresolved_entries_tell_apart_sources_sharing_a_name() {
    let mut resolver = Resolver::new().warn_on_missing_dependencies(true);
    resolver.add(node("twin", &["left"]));
    resolver.add(node("twin", &["right"]));
    let resolution = resolver.resolve().unwrap();
    let report = resolution.unresolved().unwrap();
    assert_eq!(report.missing_at(0), Some(&["needs left".to_string()][..]));
    assert_eq!(report.missing_at(1), Some(&["needs right".to_string()][..]));
    assert_eq!(report.entries()[1].source_name, "twin");
}

/// A handle to shared state; clones point at the same step.
#[derive(Clone, Debug)]
struct Shared(Rc<RefCell<&'static str>>);

impl fmt::Display for Shared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.borrow())
    }
}

struct SameName(&'static str);

impl fmt::Display for SameName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "named {}", self.0)
    }
}

impl Dependency<Shared> for SameName {
    fn satisfied_by(&self, candidate: &Shared) -> bool {
        *candidate.0.borrow() == self.0
    }
}

impl Source for Shared {
    type Dep = SameName;

    fn dependencies(&self) -> Vec<SameName> {
        vec![SameName("peer")]
    }
}

#[test]
fn cloned_handles_become_separate_vertices() {
    let handle = Shared(Rc::new(RefCell::new("peer")));
    let mut resolver = Resolver::new();
    resolver.add(handle.clone());
    resolver.add(handle);
    // Each clone satisfies the other, which closes a cycle.
    let err = resolver.resolve().unwrap_err();
    assert_eq!(err.to_string(), "Cyclic dependency: peer --> peer --> peer");
}

#[test]
fn depends_on_hook_runs_once_for_every_source() {
    let resolution = resolve(vec![node("A", &[]), node("B", &["A"])]).unwrap();
    for n in &resolution {
        assert_eq!(n.depends_on_calls, 1, "{}", n.name);
    }
    assert!(resolution.ordered()[0].depends_on.is_empty());
    assert_eq!(resolution.ordered()[1].depends_on, vec!["A"]);
}

#[test]
fn unresolved_hook_runs_only_for_sources_with_missing_dependencies() {
    let mut resolver = Resolver::new().warn_on_missing_dependencies(true);
    resolver.add(node("ok", &[]));
    resolver.add(node("gap", &["ok", "ghost"]));
    let resolution = resolver.resolve().unwrap();
    assert_eq!(resolution.ordered()[0].missing_calls, 0);
    assert_eq!(resolution.ordered()[1].missing_calls, 1);
    assert_eq!(resolution.ordered()[1].missing, vec!["needs ghost"]);
}

#[test]
fn failing_depends_on_hook_is_wrapped() {
    let mut bad = node("bad", &["A"]);
    bad.fail_depends_on = true;
    let err = resolve(vec![node("A", &[]), bad]).unwrap_err();
    let ResolveError::Hook { source_name, cause } = err else {
        panic!("expected a hook failure");
    };
    assert_eq!(source_name, "bad");
    assert_eq!(cause.to_string(), "depends-on rejected");
}

#[test]
fn failing_unresolved_hook_is_wrapped() {
    let mut bad = node("bad", &["ghost"]);
    bad.fail_missing = true;
    let err = resolve(vec![bad]).unwrap_err();
    assert_eq!(err.to_string(), "Capability hook failed for `bad`");
    let cause = std::error::Error::source(&err).unwrap();
    assert_eq!(cause.to_string(), "cannot run without it");
}

#[test]
fn tree_rendering_lists_providers() {
    let resolution = resolve(vec![node("A", &[]), node("B", &["A"])]).unwrap();
    assert_eq!(resolution.render_tree(), "A\nB\n└── A\n");
}

#[test]
fn extend_registers_in_order() {
    let mut resolver: Resolver<Node> = Resolver::default();
    resolver.extend([node("one", &[]), node("two", &[])]);
    resolver.add(node("three", &[]));
    assert_eq!(resolver.len(), 3);
    assert!(!resolver.config().warn_on_missing_dependencies);
    let resolution = resolver.resolve().unwrap();
    assert_eq!(names(&resolution), vec!["one", "two", "three"]);
    assert_eq!(
        resolution.into_ordered().into_iter().map(|n| n.name).collect::<Vec<_>>(),
        vec!["one", "two", "three"]
    );
}

#[test]
#[should_panic(expected = "before any source was added")]
fn resolving_nothing_is_a_usage_error() {
    let resolver: Resolver<Node> = Resolver::new();
    assert!(resolver.is_empty());
    let _ = resolver.resolve();
}
