//! Production-readiness rules for an architecture graph.
//!
//! Rules run in a fixed order so identical input yields identical output:
//!
//! 1. Graph-wide rules: entry point, mandatory tiers, redundancy.
//! 2. Input hygiene: duplicate ids, dangling and self-looping connections.
//! 3. Per-node rules, in node insertion order: isolation, then the rules of
//!    the node's tier.
//! 4. Cycle detection from the entry point.
//!
//! Nothing here fails. Every finding is returned as an [`Issue`], and only
//! error-level issues make a graph invalid.

use crate::cycle::has_cycle;
use crate::graph::{ArchitectureGraph, GraphIndex, NodeKind, ServerNode};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Issue types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Blocks production readiness.
    Error,
    /// A recommendation; never affects validity.
    Warning,
}

/// The rule that produced an [`Issue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    MissingEntryPoint,
    EntryPointWithoutUserTraffic,
    EntryPointWithoutOutgoing,
    MissingLoadBalancer,
    MissingDatabase,
    MissingCacheTier,
    InsufficientComputeRedundancy,
    DuplicateNodeId,
    DanglingConnection,
    SelfLoop,
    IsolatedNode,
    /// A load balancer or gateway not fed by the user or the entry point.
    IngressWithoutTraffic,
    MissingIncoming,
    MissingOutgoing,
    LowFanOut,
    MissingCacheLink,
    MissingDatabaseLink,
    /// A database or cache with outgoing connections.
    TerminalHasOutgoing,
    NoReplication,
    Cycle,
}

/// One finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub rule: Rule,
    /// Id of the node or connection the issue is about, if any.
    pub subject: Option<String>,
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Outcome of [`validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// True iff `errors` is empty.
    pub is_valid: bool,
    pub errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
}

impl ValidationResult {
    pub fn has_error(&self, rule: Rule) -> bool {
        self.errors.iter().any(|i| i.rule == rule)
    }

    pub fn has_warning(&self, rule: Rule) -> bool {
        self.warnings.iter().any(|i| i.rule == rule)
    }

    /// Errors raised by `rule` about `subject`.
    pub fn errors_for<'r>(&'r self, rule: Rule, subject: &'r str) -> impl Iterator<Item = &'r Issue> {
        self.errors
            .iter()
            .filter(move |i| i.rule == rule && i.subject.as_deref() == Some(subject))
    }

    pub fn error_messages(&self) -> Vec<&str> {
        self.errors.iter().map(|i| i.message.as_str()).collect()
    }

    pub fn warning_messages(&self) -> Vec<&str> {
        self.warnings.iter().map(|i| i.message.as_str()).collect()
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Policy knobs for [`validate_with`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Severity of a cycle reachable from the entry point. Retry and
    /// feedback paths are legitimate, so the default is a warning.
    pub cycle_severity: Severity,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            cycle_severity: Severity::Warning,
        }
    }
}

// ---------------------------------------------------------------------------
// Collector
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Findings {
    errors: Vec<Issue>,
    warnings: Vec<Issue>,
}

impl Findings {
    fn push(&mut self, severity: Severity, rule: Rule, subject: Option<&str>, message: String) {
        let issue = Issue {
            rule,
            subject: subject.map(str::to_string),
            message,
        };
        match severity {
            Severity::Error => self.errors.push(issue),
            Severity::Warning => self.warnings.push(issue),
        }
    }

    fn error(&mut self, rule: Rule, subject: Option<&str>, message: String) {
        self.push(Severity::Error, rule, subject, message);
    }

    fn warning(&mut self, rule: Rule, subject: Option<&str>, message: String) {
        self.push(Severity::Warning, rule, subject, message);
    }

    fn finish(self) -> ValidationResult {
        ValidationResult {
            is_valid: self.errors.is_empty(),
            errors: self.errors,
            warnings: self.warnings,
        }
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Validate `graph` with the default policy.
///
/// `entry_point` is the id of the node designated as the architecture's
/// ingress, if the host has one.
pub fn validate(graph: &ArchitectureGraph, entry_point: Option<&str>) -> ValidationResult {
    validate_with(graph, entry_point, &ValidationConfig::default())
}

/// Validate `graph` under an explicit policy.
pub fn validate_with(
    graph: &ArchitectureGraph,
    entry_point: Option<&str>,
    config: &ValidationConfig,
) -> ValidationResult {
    let index = graph.index();
    let mut out = Findings::default();

    let entry = check_entry_point(&index, entry_point, &mut out);
    check_tiers(&index, &mut out);
    check_hygiene(&index, &mut out);
    for node in index.nodes() {
        check_node(&index, node, entry, &mut out);
    }
    if let Some(entry) = entry
        && has_cycle(&index, entry)
    {
        out.push(
            config.cycle_severity,
            Rule::Cycle,
            Some(entry),
            "Architecture contains cycles".to_string(),
        );
    }

    let result = out.finish();
    tracing::debug!(
        nodes = graph.nodes.len(),
        edges = graph.connections.len(),
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        "validation complete"
    );
    result
}

// ---------------------------------------------------------------------------
// Graph-wide rules
// ---------------------------------------------------------------------------

/// Returns the entry point's id when it exists in the graph.
fn check_entry_point<'a>(
    index: &GraphIndex<'a>,
    requested: Option<&str>,
    out: &mut Findings,
) -> Option<&'a str> {
    let Some(requested) = requested else {
        out.error(
            Rule::MissingEntryPoint,
            None,
            "No entry point defined".to_string(),
        );
        return None;
    };
    let Some(node) = index.node(requested) else {
        out.error(
            Rule::MissingEntryPoint,
            Some(requested),
            format!("Entry point \"{requested}\" does not exist"),
        );
        return None;
    };
    let id = node.id.as_str();

    if !index.edges_to(id).iter().any(|c| index.is_user(&c.source)) {
        out.error(
            Rule::EntryPointWithoutUserTraffic,
            Some(id),
            format!("Entry point \"{id}\" must have an incoming connection from user"),
        );
    }
    if index.out_degree(id) == 0 {
        out.error(
            Rule::EntryPointWithoutOutgoing,
            Some(id),
            format!("Entry point \"{id}\" must have outgoing connections"),
        );
    }
    Some(id)
}

fn check_tiers(index: &GraphIndex<'_>, out: &mut Findings) {
    if index.count_by_type(NodeKind::Lb) == 0 {
        out.error(
            Rule::MissingLoadBalancer,
            None,
            "Production architecture must include a load balancer for high availability"
                .to_string(),
        );
    }
    if index.count_by_type(NodeKind::Db) == 0 {
        out.error(
            Rule::MissingDatabase,
            None,
            "Production architecture must include a database for data persistence".to_string(),
        );
    }
    if index.count_by_type(NodeKind::Cache) == 0 {
        out.warning(
            Rule::MissingCacheTier,
            None,
            "Consider adding a cache layer for improved performance".to_string(),
        );
    }
    let compute = index.count_by_type(NodeKind::App) + index.count_by_type(NodeKind::Micro);
    if compute <= 1 {
        out.warning(
            Rule::InsufficientComputeRedundancy,
            None,
            "Consider adding multiple application servers for redundancy".to_string(),
        );
    }
}

fn check_hygiene(index: &GraphIndex<'_>, out: &mut Findings) {
    for id in index.duplicate_ids() {
        out.warning(
            Rule::DuplicateNodeId,
            Some(id),
            format!("Node id \"{id}\" is used more than once; only the first definition counts"),
        );
    }
    for conn in index.dangling() {
        let missing = if index.resolve_id(&conn.source).is_none() {
            &conn.source
        } else {
            &conn.target
        };
        out.warning(
            Rule::DanglingConnection,
            Some(conn.id.as_str()),
            format!(
                "Connection \"{}\" references unknown node \"{missing}\" and is ignored",
                conn.id
            ),
        );
    }
    for conn in index.self_loops() {
        out.warning(
            Rule::SelfLoop,
            Some(conn.id.as_str()),
            format!(
                "Connection \"{}\" loops back to \"{}\" and is ignored",
                conn.id, conn.source
            ),
        );
    }
}

// ---------------------------------------------------------------------------
// Per-node rules
// ---------------------------------------------------------------------------

fn check_node(index: &GraphIndex<'_>, node: &ServerNode, entry: Option<&str>, out: &mut Findings) {
    let id = node.id.as_str();
    if index.is_user(id) {
        return;
    }

    let name = node.display_name();
    let incoming = index.in_degree(id);
    let outgoing = index.out_degree(id);

    if incoming + outgoing == 0 {
        out.error(
            Rule::IsolatedNode,
            Some(id),
            format!("{name} \"{id}\" is isolated"),
        );
    }

    let require_incoming = |out: &mut Findings| {
        if incoming == 0 {
            out.error(
                Rule::MissingIncoming,
                Some(id),
                format!("{name} \"{id}\" must have incoming connections"),
            );
        }
    };
    let replication = |out: &mut Findings, tier: &str| {
        if index.count_by_type(node.kind) < 2 {
            out.warning(
                Rule::NoReplication,
                Some(id),
                format!("Consider adding {tier} replication for high availability"),
            );
        }
    };

    match node.kind {
        NodeKind::Lb | NodeKind::Gateway => {
            let fed = index
                .edges_to(id)
                .iter()
                .any(|c| index.is_user(&c.source) || Some(c.source.as_str()) == entry);
            if !fed {
                out.error(
                    Rule::IngressWithoutTraffic,
                    Some(id),
                    format!(
                        "{name} \"{id}\" must have an incoming connection from user or the entry point"
                    ),
                );
            }
            if outgoing == 0 {
                out.error(
                    Rule::MissingOutgoing,
                    Some(id),
                    format!("{name} \"{id}\" must have outgoing connections"),
                );
            }
            if index.successors_where(id, NodeKind::is_compute) < 2 {
                out.warning(
                    Rule::LowFanOut,
                    Some(id),
                    format!(
                        "{name} \"{id}\" should connect to multiple application servers for redundancy"
                    ),
                );
            }
        }
        NodeKind::App | NodeKind::Micro => {
            require_incoming(out);
            if index.successors_where(id, |k| k == NodeKind::Cache) == 0 {
                out.warning(
                    Rule::MissingCacheLink,
                    Some(id),
                    format!("{name} \"{id}\" should connect to a cache for better performance"),
                );
            }
            if index.successors_where(id, |k| k == NodeKind::Db) == 0 {
                out.error(
                    Rule::MissingDatabaseLink,
                    Some(id),
                    format!("{name} \"{id}\" must connect to a database"),
                );
            }
        }
        NodeKind::Db => {
            require_incoming(out);
            if outgoing > 0 {
                out.error(
                    Rule::TerminalHasOutgoing,
                    Some(id),
                    format!("{name} \"{id}\" should not have outgoing connections"),
                );
            }
            replication(out, "database");
        }
        NodeKind::Cache => {
            require_incoming(out);
            if outgoing > 0 {
                out.warning(
                    Rule::TerminalHasOutgoing,
                    Some(id),
                    format!("{name} \"{id}\" typically should not have outgoing connections"),
                );
            }
            replication(out, "cache");
        }
        NodeKind::Mq => {
            require_incoming(out);
            if outgoing == 0 {
                out.warning(
                    Rule::MissingOutgoing,
                    Some(id),
                    format!("{name} \"{id}\" typically should have outgoing connections"),
                );
            }
            replication(out, "message queue");
        }
        NodeKind::Cdn | NodeKind::Asg => {
            require_incoming(out);
            if outgoing == 0 {
                out.warning(
                    Rule::MissingOutgoing,
                    Some(id),
                    format!("{name} \"{id}\" typically should have outgoing connections"),
                );
            }
        }
        NodeKind::Dr | NodeKind::Entry | NodeKind::User => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Connection, ServerNode};

    fn n(id: &str, kind: NodeKind) -> ServerNode {
        ServerNode::new(id, kind)
    }

    /// user -> lb1 -> {app1, app2} -> db1
    fn reference() -> ArchitectureGraph {
        ArchitectureGraph::new()
            .with_node(n("lb1", NodeKind::Lb))
            .with_node(n("app1", NodeKind::App))
            .with_node(n("app2", NodeKind::App))
            .with_node(n("db1", NodeKind::Db))
            .connect("user", "lb1")
            .connect("lb1", "app1")
            .connect("lb1", "app2")
            .connect("app1", "db1")
            .connect("app2", "db1")
    }

    fn rules(issues: &[Issue]) -> Vec<Rule> {
        issues.iter().map(|i| i.rule).collect()
    }

    // -----------------------------------------------------------------------
    // Graph-wide rules
    // -----------------------------------------------------------------------

    #[test]
    fn reference_architecture_is_valid() {
        let result = validate(&reference(), Some("lb1"));
        assert!(result.is_valid, "unexpected errors: {:?}", result.errors);
        assert_eq!(
            rules(&result.warnings),
            vec![
                Rule::MissingCacheTier,
                Rule::MissingCacheLink,
                Rule::MissingCacheLink,
                Rule::NoReplication,
            ]
        );
    }

    #[test]
    fn empty_graph_reports_mandatory_tiers() {
        let result = validate(&ArchitectureGraph::new(), None);
        assert!(!result.is_valid);
        assert_eq!(
            rules(&result.errors),
            vec![
                Rule::MissingEntryPoint,
                Rule::MissingLoadBalancer,
                Rule::MissingDatabase
            ]
        );
        assert_eq!(result.errors[0].message, "No entry point defined");
        assert_eq!(
            rules(&result.warnings),
            vec![Rule::MissingCacheTier, Rule::InsufficientComputeRedundancy]
        );
    }

    #[test]
    fn unknown_entry_point_is_missing() {
        let result = validate(&reference(), Some("ghost"));
        assert!(result.has_error(Rule::MissingEntryPoint));
        assert_eq!(result.errors[0].subject.as_deref(), Some("ghost"));
    }

    #[test]
    fn entry_point_needs_user_traffic_and_outgoing() {
        let graph = reference().with_node(n("entry_0", NodeKind::Entry));
        let result = validate(&graph, Some("entry_0"));

        assert!(result.has_error(Rule::EntryPointWithoutUserTraffic));
        assert!(result.has_error(Rule::EntryPointWithoutOutgoing));
        // The entry node has no edges at all, so it is also isolated.
        assert_eq!(
            result.errors_for(Rule::IsolatedNode, "entry_0").count(),
            1
        );
    }

    #[test]
    fn missing_load_balancer_is_an_error() {
        let graph = ArchitectureGraph::new()
            .with_node(n("gw", NodeKind::Gateway))
            .with_node(n("app1", NodeKind::App))
            .with_node(n("db1", NodeKind::Db))
            .connect("user", "gw")
            .connect("gw", "app1")
            .connect("app1", "db1");
        let result = validate(&graph, Some("gw"));
        assert!(result.has_error(Rule::MissingLoadBalancer));
        assert!(!result.has_error(Rule::MissingDatabase));
    }

    #[test]
    fn single_compute_node_warns_about_redundancy() {
        let graph = ArchitectureGraph::new()
            .with_node(n("lb1", NodeKind::Lb))
            .with_node(n("svc", NodeKind::Micro))
            .with_node(n("db1", NodeKind::Db))
            .connect("user", "lb1")
            .connect("lb1", "svc")
            .connect("svc", "db1");
        let result = validate(&graph, Some("lb1"));
        assert!(result.has_warning(Rule::InsufficientComputeRedundancy));
        assert!(result.has_warning(Rule::LowFanOut));
    }

    // -----------------------------------------------------------------------
    // Input hygiene
    // -----------------------------------------------------------------------

    #[test]
    fn dangling_connection_is_ignored_with_warning() {
        let graph = reference().connect("db1", "ghost");
        let result = validate(&graph, Some("lb1"));

        // The edge is treated as absent, so db1 has no outgoing edge.
        assert!(!result.has_error(Rule::TerminalHasOutgoing));
        let warning = result
            .warnings
            .iter()
            .find(|i| i.rule == Rule::DanglingConnection)
            .unwrap();
        assert!(warning.message.contains("\"ghost\""));
    }

    #[test]
    fn self_loop_is_ignored_with_warning() {
        let graph = reference().connect("db1", "db1");
        let result = validate(&graph, Some("lb1"));
        assert!(result.is_valid);
        assert!(result.has_warning(Rule::SelfLoop));
        assert!(!result.has_warning(Rule::Cycle));
    }

    #[test]
    fn duplicate_ids_are_reported_once_per_extra_copy() {
        let graph = reference()
            .with_node(n("db1", NodeKind::Cache))
            .with_node(n("db1", NodeKind::Cache));
        let result = validate(&graph, Some("lb1"));
        let dupes = result
            .warnings
            .iter()
            .filter(|i| i.rule == Rule::DuplicateNodeId)
            .count();
        assert_eq!(dupes, 2);
        // The shadowed cache definitions do not count as a cache tier.
        assert!(result.has_warning(Rule::MissingCacheTier));
    }

    // -----------------------------------------------------------------------
    // Per-node rules
    // -----------------------------------------------------------------------

    #[test]
    fn isolated_node_is_an_error() {
        let graph = reference().with_node(n("lonely", NodeKind::Cache));
        let result = validate(&graph, Some("lb1"));
        assert!(!result.is_valid);
        let issue = result.errors_for(Rule::IsolatedNode, "lonely").next().unwrap();
        assert_eq!(issue.message, "Cache Server \"lonely\" is isolated");
    }

    #[test]
    fn user_node_is_never_isolated() {
        let graph = reference().with_node(n("user", NodeKind::User));
        let result = validate(&graph, Some("lb1"));
        assert!(result.is_valid);
    }

    #[test]
    fn database_with_outgoing_edge_is_named() {
        let graph = reference()
            .with_node(n("db2", NodeKind::Db).with_label("Postgres"))
            .connect("app1", "db2")
            .connect("db2", "app2");
        let result = validate(&graph, Some("lb1"));

        let issue = result
            .errors_for(Rule::TerminalHasOutgoing, "db2")
            .next()
            .unwrap();
        assert_eq!(
            issue.message,
            "Postgres \"db2\" should not have outgoing connections"
        );
        // Two databases now: no replication warning.
        assert!(!result.has_warning(Rule::NoReplication));
    }

    #[test]
    fn cache_with_outgoing_edge_is_only_a_warning() {
        let graph = reference()
            .with_node(n("c1", NodeKind::Cache))
            .connect("app1", "c1")
            .connect("c1", "db1");
        let result = validate(&graph, Some("lb1"));
        assert!(result.is_valid);
        assert!(
            result
                .warnings
                .iter()
                .any(|i| i.rule == Rule::TerminalHasOutgoing && i.subject.as_deref() == Some("c1"))
        );
    }

    #[test]
    fn app_without_database_is_an_error() {
        let graph = reference()
            .with_node(n("app3", NodeKind::App))
            .connect("lb1", "app3");
        let result = validate(&graph, Some("lb1"));
        assert_eq!(
            result.errors_for(Rule::MissingDatabaseLink, "app3").count(),
            1
        );
    }

    #[test]
    fn app_without_incoming_is_an_error() {
        let graph = reference()
            .with_node(n("orphan", NodeKind::App))
            .connect("orphan", "db1");
        let result = validate(&graph, Some("lb1"));
        assert_eq!(result.errors_for(Rule::MissingIncoming, "orphan").count(), 1);
    }

    #[test]
    fn gateway_fed_by_entry_point_is_accepted() {
        let graph = reference()
            .with_node(n("entry_0", NodeKind::Entry))
            .with_node(n("gw", NodeKind::Gateway))
            .connect("user", "entry_0")
            .connect("entry_0", "gw")
            .connect("gw", "app1")
            .connect("gw", "app2");
        let result = validate(&graph, Some("entry_0"));
        assert!(result.errors_for(Rule::IngressWithoutTraffic, "gw").next().is_none());
    }

    #[test]
    fn load_balancer_behind_another_tier_is_an_error() {
        let graph = reference()
            .with_node(n("lb2", NodeKind::Lb))
            .connect("app1", "lb2")
            .connect("lb2", "db1");
        let result = validate(&graph, Some("lb1"));
        assert_eq!(
            result.errors_for(Rule::IngressWithoutTraffic, "lb2").count(),
            1
        );
    }

    #[test]
    fn fan_out_counts_distinct_compute_targets() {
        let graph = ArchitectureGraph::new()
            .with_node(n("lb1", NodeKind::Lb))
            .with_node(n("app1", NodeKind::App))
            .with_node(n("db1", NodeKind::Db))
            .connect("user", "lb1")
            .connect("lb1", "app1")
            .connect("lb1", "app1")
            .connect("app1", "db1");
        let result = validate(&graph, Some("lb1"));
        assert!(result.has_warning(Rule::LowFanOut));
    }

    #[test]
    fn queue_without_consumers_warns() {
        let graph = reference()
            .with_node(n("mq1", NodeKind::Mq))
            .connect("app1", "mq1");
        let result = validate(&graph, Some("lb1"));
        assert!(result.is_valid);
        let mq_rules: Vec<Rule> = result
            .warnings
            .iter()
            .filter(|i| i.subject.as_deref() == Some("mq1"))
            .map(|i| i.rule)
            .collect();
        assert_eq!(mq_rules, vec![Rule::MissingOutgoing, Rule::NoReplication]);
    }

    #[test]
    fn cdn_and_asg_need_incoming() {
        let graph = reference()
            .with_node(n("cdn1", NodeKind::Cdn))
            .with_node(n("asg1", NodeKind::Asg))
            .connect("cdn1", "lb1")
            .connect("lb1", "asg1");
        let result = validate(&graph, Some("lb1"));
        assert_eq!(result.errors_for(Rule::MissingIncoming, "cdn1").count(), 1);
        assert_eq!(result.errors_for(Rule::MissingIncoming, "asg1").count(), 0);
        assert!(
            result
                .warnings
                .iter()
                .any(|i| i.rule == Rule::MissingOutgoing && i.subject.as_deref() == Some("asg1"))
        );
    }

    #[test]
    fn backup_nodes_have_no_tier_rules() {
        let graph = reference()
            .with_node(n("dr1", NodeKind::Dr))
            .connect("db1", "dr1");
        let result = validate(&graph, Some("lb1"));
        assert!(result.errors_for(Rule::MissingIncoming, "dr1").next().is_none());
        assert!(result.warnings.iter().all(|i| i.subject.as_deref() != Some("dr1")));
    }

    #[test]
    fn ingress_without_outgoing_is_an_error() {
        let graph = ArchitectureGraph::new()
            .with_node(n("lb1", NodeKind::Lb))
            .with_node(n("gw1", NodeKind::Gateway))
            .connect("user", "lb1")
            .connect("user", "gw1");
        let result = validate(&graph, Some("lb1"));

        let issue = result.errors_for(Rule::MissingOutgoing, "lb1").next().unwrap();
        assert_eq!(
            issue.message,
            "Load Balancer \"lb1\" must have outgoing connections"
        );
        assert_eq!(result.errors_for(Rule::MissingOutgoing, "gw1").count(), 1);
    }

    #[test]
    fn single_cache_warns_about_replication() {
        let graph = reference()
            .with_node(n("c1", NodeKind::Cache))
            .connect("app1", "c1");
        let result = validate(&graph, Some("lb1"));

        let issue = result
            .warnings
            .iter()
            .find(|i| i.rule == Rule::NoReplication && i.subject.as_deref() == Some("c1"))
            .unwrap();
        assert_eq!(
            issue.message,
            "Consider adding cache replication for high availability"
        );
    }

    #[test]
    fn queue_without_producers_is_an_error() {
        let graph = reference()
            .with_node(n("q1", NodeKind::Mq))
            .with_node(n("c1", NodeKind::Cache))
            .connect("q1", "c1");
        let result = validate(&graph, Some("lb1"));

        assert!(!result.is_valid);
        assert_eq!(result.errors_for(Rule::MissingIncoming, "q1").count(), 1);
        // c1 is fed by the queue, so only q1 lacks incoming traffic.
        assert_eq!(result.errors_for(Rule::MissingIncoming, "c1").count(), 0);
    }

    #[test]
    fn message_views_follow_issue_order() {
        let result = validate(&ArchitectureGraph::new(), None);
        assert_eq!(
            result.error_messages(),
            vec![
                "No entry point defined",
                "Production architecture must include a load balancer for high availability",
                "Production architecture must include a database for data persistence",
            ]
        );
        assert_eq!(
            result.warning_messages(),
            vec![
                "Consider adding a cache layer for improved performance",
                "Consider adding multiple application servers for redundancy",
            ]
        );
        assert_eq!(result.errors[0].to_string(), result.error_messages()[0]);
    }

    // -----------------------------------------------------------------------
    // Cycles
    // -----------------------------------------------------------------------

    fn looped() -> ArchitectureGraph {
        reference()
            .with_node(n("mq1", NodeKind::Mq))
            .connect("app1", "mq1")
            .connect("mq1", "lb1")
    }

    #[test]
    fn cycle_is_a_warning_by_default() {
        let result = validate(&looped(), Some("lb1"));
        assert!(result.has_warning(Rule::Cycle));
        assert_eq!(result.warnings.last().unwrap().message, "Architecture contains cycles");
    }

    #[test]
    fn cycle_severity_is_configurable() {
        let config = ValidationConfig {
            cycle_severity: Severity::Error,
        };
        let result = validate_with(&looped(), Some("lb1"), &config);
        assert!(result.has_error(Rule::Cycle));
        assert!(!result.is_valid);
    }

    #[test]
    fn no_cycle_check_without_entry_point() {
        let result = validate(&looped(), None);
        assert!(!result.has_warning(Rule::Cycle));
    }

    // -----------------------------------------------------------------------
    // Determinism
    // -----------------------------------------------------------------------

    #[test]
    fn repeated_validation_is_identical() {
        let graph = looped()
            .with_node(n("stray", NodeKind::Db))
            .with_connection(Connection::new("bad", "stray", "nowhere"));
        let first = validate(&graph, Some("lb1"));
        for _ in 0..5 {
            assert_eq!(validate(&graph, Some("lb1")), first);
        }
    }

    #[test]
    fn result_serializes_camel_case() {
        let result = validate(&reference(), Some("lb1"));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["isValid"], true);
        assert_eq!(json["warnings"][0]["rule"], "missing_cache_tier");
    }
}
