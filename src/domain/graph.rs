use super::service::{Service, validate_name};
use crate::error::{ComposerError, Result};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    White,
    Gray,
    Black,
}

/// Read-only view of a service set keyed by short name.
///
/// When a short name occurs more than once the first occurrence wins.
struct Graph<'a> {
    services: &'a [Service],
    index: HashMap<&'a str, usize>,
}

impl<'a> Graph<'a> {
    fn new(services: &'a [Service]) -> Self {
        let mut index = HashMap::with_capacity(services.len());
        for (position, service) in services.iter().enumerate() {
            index.entry(service.short_name.as_str()).or_insert(position);
        }
        Self { services, index }
    }

    fn node(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Depth-first visit from `root` with an explicit stack. Nodes are
    /// appended to `order` once all of their dependencies are.
    fn visit(&self, root: usize, marks: &mut [Mark], order: &mut Vec<usize>) -> Result<()> {
        if marks[root] != Mark::White {
            return Ok(());
        }

        marks[root] = Mark::Gray;
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];

        while let Some(frame) = stack.last_mut() {
            let (node, next_dep) = *frame;
            let service = &self.services[node];

            let Some(dep_name) = service.depends_on.get(next_dep) else {
                marks[node] = Mark::Black;
                order.push(node);
                stack.pop();
                continue;
            };
            frame.1 += 1;

            let dep = self
                .node(dep_name)
                .ok_or_else(|| ComposerError::UndefinedDependency {
                    service: service.short_name.clone(),
                    dependency: dep_name.clone(),
                })?;

            match marks[dep] {
                Mark::Black => {}
                Mark::Gray => {
                    return Err(ComposerError::CycleDetected {
                        service: self.services[dep].short_name.clone(),
                    });
                }
                Mark::White => {
                    marks[dep] = Mark::Gray;
                    stack.push((dep, 0));
                }
            }
        }

        Ok(())
    }

    fn collect(&self, order: Vec<usize>) -> Vec<Service> {
        order
            .into_iter()
            .map(|node| self.services[node].clone())
            .collect()
    }
}

/// Orders the whole set so that every dependency precedes its dependents.
///
/// Roots are visited in input order, which makes the result deterministic
/// for a given input.
pub fn topological_sort(services: &[Service]) -> Result<Vec<Service>> {
    let graph = Graph::new(services);
    let mut marks = vec![Mark::White; services.len()];
    let mut order = Vec::with_capacity(services.len());

    for (position, service) in services.iter().enumerate() {
        // Shadowed duplicates are not nodes of their own.
        if graph.node(&service.short_name) != Some(position) {
            continue;
        }
        graph.visit(position, &mut marks, &mut order)?;
    }

    Ok(graph.collect(order))
}

/// Returns the requested services together with everything they transitively
/// depend on, dependencies first and without duplicates.
///
/// Every requested name must exist in `all_services`.
pub fn resolve_dependency_closure(
    requested: &[String],
    all_services: &[Service],
) -> Result<Vec<Service>> {
    let graph = Graph::new(all_services);
    let mut marks = vec![Mark::White; all_services.len()];
    let mut order = Vec::new();

    for name in requested {
        let root = graph
            .node(name)
            .ok_or_else(|| ComposerError::ServiceNotFound(vec![name.clone()]))?;
        graph.visit(root, &mut marks, &mut order)?;
    }

    Ok(graph.collect(order))
}

/// Validates a complete service set and returns it in topological order.
///
/// Checks run in order: names, duplicate short names, undefined
/// dependencies, cycles. The first failure is returned.
pub fn validate_set(services: &[Service]) -> Result<Vec<Service>> {
    for service in services {
        validate_name(&service.short_name)?;
        validate_name(&service.compose_name)?;
    }

    let mut known = HashSet::with_capacity(services.len());
    for service in services {
        if !known.insert(service.short_name.as_str()) {
            return Err(ComposerError::DuplicateService(service.short_name.clone()));
        }
    }

    for service in services {
        if let Some(missing) = service
            .depends_on
            .iter()
            .find(|dep| !known.contains(dep.as_str()))
        {
            return Err(ComposerError::UndefinedDependency {
                service: service.short_name.clone(),
                dependency: missing.clone(),
            });
        }
    }

    topological_sort(services)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn svc(name: &str, deps: &[&str]) -> Service {
        Service::new(name, name, deps.iter().map(|d| d.to_string()).collect())
    }

    fn names(services: &[Service]) -> Vec<&str> {
        services.iter().map(|s| s.short_name.as_str()).collect()
    }

    fn requested(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn assert_dependencies_first(sorted: &[Service]) {
        for (position, service) in sorted.iter().enumerate() {
            for dep in &service.depends_on {
                let dep_position = sorted
                    .iter()
                    .position(|s| &s.short_name == dep)
                    .unwrap_or_else(|| panic!("{dep} missing from output"));
                assert!(
                    dep_position < position,
                    "{dep} should come before {}",
                    service.short_name
                );
            }
        }
    }

    #[test]
    fn sorts_chain() {
        let services = vec![svc("web", &["api"]), svc("api", &["db"]), svc("db", &[])];
        let sorted = topological_sort(&services).unwrap();
        assert_eq!(names(&sorted), vec!["db", "api", "web"]);
    }

    #[test]
    fn sorts_diamond_with_dependencies_first() {
        let services = vec![
            svc("app", &["auth", "cache"]),
            svc("auth", &["db"]),
            svc("cache", &["db"]),
            svc("db", &[]),
            svc("metrics", &[]),
        ];
        let sorted = topological_sort(&services).unwrap();
        assert_eq!(sorted.len(), 5);
        assert_dependencies_first(&sorted);
        assert_eq!(names(&sorted), vec!["db", "auth", "cache", "app", "metrics"]);
    }

    #[test]
    fn sort_is_deterministic() {
        let services = vec![
            svc("e", &["c", "d"]),
            svc("d", &["a"]),
            svc("c", &["b", "a"]),
            svc("b", &[]),
            svc("a", &[]),
        ];
        let first = topological_sort(&services).unwrap();
        for _ in 0..20 {
            assert_eq!(topological_sort(&services).unwrap(), first);
        }
    }

    #[test]
    fn sort_visits_disconnected_nodes() {
        let services = vec![svc("a", &[]), svc("b", &[]), svc("c", &["b"])];
        let sorted = topological_sort(&services).unwrap();
        assert_eq!(names(&sorted), vec!["a", "b", "c"]);
    }

    #[test]
    fn sort_of_empty_set_is_empty() {
        assert!(topological_sort(&[]).unwrap().is_empty());
    }

    #[test]
    fn sort_detects_two_node_cycle() {
        let services = vec![svc("a", &["b"]), svc("b", &["a"])];
        let err = topological_sort(&services).unwrap_err();
        assert!(matches!(err, ComposerError::CycleDetected { .. }));
    }

    #[test]
    fn sort_detects_self_cycle() {
        let services = vec![svc("loop", &["loop"])];
        let err = topological_sort(&services).unwrap_err();
        assert!(matches!(err, ComposerError::CycleDetected { ref service } if service == "loop"));
    }

    #[test]
    fn sort_keeps_first_duplicate() {
        let services = vec![svc("a", &[]), svc("b", &["a"]), svc("a", &["b"])];
        let sorted = topological_sort(&services).unwrap();
        assert_eq!(names(&sorted), vec!["a", "b"]);
        assert!(sorted[0].depends_on.is_empty());
    }

    #[test]
    fn closure_follows_chain_and_skips_unrelated() {
        let services = vec![svc("a", &["b"]), svc("b", &["c"]), svc("c", &[]), svc("d", &[])];
        let closure = resolve_dependency_closure(&requested(&["a"]), &services).unwrap();
        assert_eq!(names(&closure), vec!["c", "b", "a"]);
    }

    #[test]
    fn closure_ignores_duplicate_requests() {
        let services = vec![svc("a", &[]), svc("b", &["a"])];
        let with_duplicates =
            resolve_dependency_closure(&requested(&["a", "a", "b"]), &services).unwrap();
        let without = resolve_dependency_closure(&requested(&["a", "b"]), &services).unwrap();
        assert_eq!(with_duplicates, without);
        assert_eq!(names(&with_duplicates), vec!["a", "b"]);
    }

    #[test]
    fn closure_shares_common_dependencies() {
        let services = vec![
            svc("db", &[]),
            svc("api", &["db"]),
            svc("worker", &["db"]),
            svc("web", &[]),
        ];
        let closure =
            resolve_dependency_closure(&requested(&["worker", "api"]), &services).unwrap();
        assert_eq!(names(&closure), vec!["db", "worker", "api"]);
    }

    #[test]
    fn closure_follows_request_order() {
        let services = vec![svc("x", &[]), svc("y", &[]), svc("z", &[])];
        let closure = resolve_dependency_closure(&requested(&["z", "x"]), &services).unwrap();
        assert_eq!(names(&closure), vec!["z", "x"]);
    }

    #[test]
    fn closure_rejects_unknown_name() {
        let services = vec![svc("a", &[])];
        let err = resolve_dependency_closure(&requested(&["ghost"]), &services).unwrap_err();
        assert!(matches!(err, ComposerError::ServiceNotFound(ref n) if n == &["ghost"]));
    }

    #[test]
    fn closure_detects_reachable_cycle() {
        let services = vec![svc("a", &["b"]), svc("b", &["c"]), svc("c", &["b"])];
        let err = resolve_dependency_closure(&requested(&["a"]), &services).unwrap_err();
        assert!(matches!(err, ComposerError::CycleDetected { .. }));
    }

    #[test]
    fn closure_ignores_unreachable_cycle() {
        let services = vec![svc("a", &[]), svc("b", &["c"]), svc("c", &["b"])];
        let closure = resolve_dependency_closure(&requested(&["a"]), &services).unwrap();
        assert_eq!(names(&closure), vec!["a"]);
    }

    #[test]
    fn validate_accepts_valid_set() {
        let services = vec![svc("web", &["db"]), svc("db", &[])];
        let sorted = validate_set(&services).unwrap();
        assert_eq!(names(&sorted), vec!["db", "web"]);
    }

    #[test]
    fn validate_reports_undefined_before_cycle() {
        let services = vec![svc("a", &["b"]), svc("b", &["a", "ghost"])];
        let err = validate_set(&services).unwrap_err();
        assert!(matches!(
            err,
            ComposerError::UndefinedDependency { ref dependency, .. } if dependency == "ghost"
        ));
    }

    #[test]
    fn validate_rejects_duplicates() {
        let services = vec![svc("a", &[]), svc("a", &[])];
        let err = validate_set(&services).unwrap_err();
        assert!(matches!(err, ComposerError::DuplicateService(ref n) if n == "a"));
    }

    #[test]
    fn validate_rejects_bad_compose_name() {
        let services = vec![Service::new("web", "../web", vec![])];
        assert!(matches!(
            validate_set(&services),
            Err(ComposerError::InvalidName { .. })
        ));
    }

    #[test]
    fn validate_rejects_cycle() {
        let services = vec![svc("a", &["c"]), svc("b", &["a"]), svc("c", &["b"])];
        assert!(matches!(
            validate_set(&services),
            Err(ComposerError::CycleDetected { .. })
        ));
    }
}
