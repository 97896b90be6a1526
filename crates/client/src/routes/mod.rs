//! Route descriptor tree and path matching.
//!
//! Routes are static configuration organized as a tree. A child inherits
//! nothing from its parent; the guard walks the full matched chain and
//! evaluates each node's requirements independently.

use std::collections::HashMap;

use tutorhub_protocol::Role;

/// One node in the route tree.
///
/// `path` is a segment pattern relative to the parent: literal segments,
/// `:param` dynamic segments, an empty string for an index route, or `*`
/// for the catch-all.
#[derive(Debug, Clone)]
pub struct RouteNode {
    path: String,
    name: Option<String>,
    requires_auth: bool,
    required_role: Option<Role>,
    children: Vec<RouteNode>,
}

impl RouteNode {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.trim_matches('/').to_string(),
            name: None,
            requires_auth: false,
            required_role: None,
            children: Vec::new(),
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn requires_auth(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    /// Declares a required role; implies `requires_auth`.
    pub fn requires_role(mut self, role: Role) -> Self {
        self.requires_auth = true;
        self.required_role = Some(role);
        self
    }

    pub fn child(mut self, node: RouteNode) -> Self {
        self.children.push(node);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn auth_required(&self) -> bool {
        self.requires_auth
    }

    pub fn role_required(&self) -> Option<Role> {
        self.required_role
    }

    fn segments(&self) -> Vec<&str> {
        if self.path.is_empty() {
            Vec::new()
        } else {
            self.path.split('/').collect()
        }
    }

    /// Matches this node's pattern against a prefix of `segments`.
    ///
    /// Returns the number of segments consumed and any captured params.
    fn match_prefix<'p>(&self, segments: &[&'p str]) -> Option<(usize, Vec<(String, &'p str)>)> {
        let pattern = self.segments();
        if pattern.len() > segments.len() {
            return None;
        }
        let mut params = Vec::new();
        for (part, segment) in pattern.iter().zip(segments) {
            if let Some(param) = part.strip_prefix(':') {
                params.push((param.to_string(), *segment));
            } else if part != segment {
                return None;
            }
        }
        Some((pattern.len(), params))
    }
}

/// A matched route: the chain of nodes from root to leaf plus captured
/// path parameters.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    chain: Vec<&'a RouteNode>,
    params: HashMap<String, String>,
}

impl<'a> RouteMatch<'a> {
    /// The full matched chain, root first.
    pub fn chain(&self) -> &[&'a RouteNode] {
        &self.chain
    }

    /// The most specific matched node.
    pub fn leaf(&self) -> &'a RouteNode {
        self.chain[self.chain.len() - 1]
    }

    /// Whether any node in the chain requires authentication.
    pub fn requires_auth(&self) -> bool {
        self.chain.iter().any(|node| node.requires_auth)
    }

    /// Every role requirement declared along the chain, root first.
    pub fn required_roles(&self) -> Vec<Role> {
        self.chain
            .iter()
            .filter_map(|node| node.required_role)
            .collect()
    }

    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }
}

/// Static route configuration with tree-walking path matching.
#[derive(Debug, Clone)]
pub struct RouteTable {
    roots: Vec<RouteNode>,
}

impl RouteTable {
    pub fn new(roots: Vec<RouteNode>) -> Self {
        Self { roots }
    }

    /// Matches `path` against the tree.
    ///
    /// Literal roots are tried in declaration order; the `*` catch-all (if
    /// declared) is the match of last resort.
    pub fn match_path(&self, path: &str) -> Option<RouteMatch<'_>> {
        let trimmed = path.trim_matches('/');
        let segments: Vec<&str> = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed.split('/').collect()
        };

        for root in self.roots.iter().filter(|r| r.path != "*") {
            if let Some(found) = match_node(root, &segments) {
                return Some(found);
            }
        }

        self.roots.iter().find(|r| r.path == "*").map(|catch_all| RouteMatch {
            chain: vec![catch_all],
            params: HashMap::new(),
        })
    }
}

fn match_node<'a>(node: &'a RouteNode, segments: &[&str]) -> Option<RouteMatch<'a>> {
    let (consumed, captured) = node.match_prefix(segments)?;
    let rest = &segments[consumed..];

    if rest.is_empty() {
        // Prefer an index child so layout nodes resolve to their default view.
        let chain = match node.children.iter().find(|child| child.path.is_empty()) {
            Some(index) => vec![node, index],
            None => vec![node],
        };
        return Some(RouteMatch {
            chain,
            params: captured
                .into_iter()
                .map(|(k, v)| (k, v.to_string()))
                .collect(),
        });
    }

    for child in &node.children {
        if child.path.is_empty() {
            continue;
        }
        if let Some(mut found) = match_node(child, rest) {
            found.chain.insert(0, node);
            for (k, v) in captured {
                found.params.insert(k, v.to_string());
            }
            return Some(found);
        }
    }

    None
}

/// The application route surface.
///
/// Public entry pages, the authenticated default area under `/dashboard`,
/// the teacher and admin role areas, and a catch-all not-found route.
pub fn default_routes() -> RouteTable {
    let dashboard = RouteNode::new("dashboard")
        .child(RouteNode::new("").named("home").requires_auth())
        .child(RouteNode::new("find-teachers").named("find-teachers").requires_auth())
        .child(RouteNode::new("book").named("book").requires_auth())
        .child(RouteNode::new("my-classes").named("my-classes").requires_auth())
        .child(RouteNode::new("profile").named("my-profile").requires_auth())
        .child(RouteNode::new("my-certificates").named("my-certificates").requires_auth())
        .child(RouteNode::new("my-bundles").named("my-bundles").requires_auth())
        .child(RouteNode::new("bundles").named("purchase-bundle").requires_auth())
        .child(RouteNode::new("my-badges").named("my-badges").requires_auth())
        .child(RouteNode::new("my-progress").named("my-progress").requires_auth())
        .child(RouteNode::new("my-messages").named("my-messages").requires_auth())
        .child(RouteNode::new("exams").named("exam-list").requires_auth())
        .child(RouteNode::new("exam/results").named("exam-results").requires_auth())
        .child(RouteNode::new("apply-to-teach").named("apply-to-teach").requires_auth());

    let teacher = RouteNode::new("teacher")
        .requires_role(Role::Teacher)
        .child(RouteNode::new("").named("teacher-classes"))
        .child(RouteNode::new("classes").named("teacher-classes"))
        .child(RouteNode::new("availability").named("teacher-availability"))
        .child(RouteNode::new("reschedules").named("teacher-reschedules"))
        .child(RouteNode::new("earnings").named("teacher-earnings"))
        .child(RouteNode::new("profile").named("teacher-my-profile"))
        .child(RouteNode::new("analytics").named("teacher-analytics"))
        .child(RouteNode::new("messages").named("teacher-messages"))
        .child(RouteNode::new("reviews").named("teacher-reviews"))
        .child(RouteNode::new("student-progress/:student_id").named("teacher-student-progress"));

    let admin = RouteNode::new("admin")
        .requires_role(Role::Admin)
        .child(RouteNode::new("").named("admin-dashboard"))
        .child(RouteNode::new("dashboard").named("admin-dashboard"))
        .child(RouteNode::new("users").named("admin-users"))
        .child(RouteNode::new("teacher-applications").named("admin-teacher-applications"))
        .child(RouteNode::new("languages").named("admin-languages"))
        .child(RouteNode::new("bundles").named("admin-bundles"))
        .child(RouteNode::new("payouts").named("admin-payouts"))
        .child(RouteNode::new("reports").named("admin-reports"))
        .child(RouteNode::new("bookings").named("admin-bookings"))
        .child(RouteNode::new("refunds").named("admin-refunds"))
        .child(RouteNode::new("exams").named("admin-exams"))
        .child(RouteNode::new("payments").named("admin-payments"))
        .child(RouteNode::new("reviews").named("admin-reviews"));

    RouteTable::new(vec![
        RouteNode::new("").named("landing"),
        dashboard,
        teacher,
        // Teacher profile view; reached when no literal teacher-area child
        // matches the second segment.
        RouteNode::new("teacher/:id").named("teacher-profile").requires_auth(),
        admin,
        RouteNode::new("login").named("login"),
        RouteNode::new("register").named("register"),
        RouteNode::new("forgot-password").named("forgot-password"),
        RouteNode::new("reset-password").named("reset-password"),
        RouteNode::new("*").named("not-found"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landing_page_is_public() {
        let table = default_routes();
        let matched = table.match_path("/").unwrap();
        assert_eq!(matched.leaf().name(), Some("landing"));
        assert!(!matched.requires_auth());
    }

    #[test]
    fn dashboard_children_require_auth() {
        let table = default_routes();
        for path in ["/dashboard", "/dashboard/profile", "/dashboard/exam/results"] {
            let matched = table.match_path(path).unwrap();
            assert!(matched.requires_auth(), "expected auth for {path}");
            assert!(matched.required_roles().is_empty());
        }
    }

    #[test]
    fn dashboard_index_resolves_to_home() {
        let table = default_routes();
        let matched = table.match_path("/dashboard").unwrap();
        assert_eq!(matched.leaf().name(), Some("home"));
        assert_eq!(matched.chain().len(), 2);
    }

    #[test]
    fn teacher_area_declares_role_on_parent_only() {
        let table = default_routes();
        let matched = table.match_path("/teacher/earnings").unwrap();
        assert!(matched.requires_auth());
        assert_eq!(matched.required_roles(), vec![Role::Teacher]);
        assert_eq!(matched.leaf().name(), Some("teacher-earnings"));
    }

    #[test]
    fn dynamic_segment_captures_param() {
        let table = default_routes();
        let matched = table.match_path("/teacher/student-progress/s-42").unwrap();
        assert_eq!(matched.params().get("student_id").map(String::as_str), Some("s-42"));
        assert_eq!(matched.required_roles(), vec![Role::Teacher]);
    }

    #[test]
    fn teacher_profile_view_needs_auth_but_no_role() {
        let table = default_routes();
        let matched = table.match_path("/teacher/t-99").unwrap();
        assert_eq!(matched.leaf().name(), Some("teacher-profile"));
        assert!(matched.requires_auth());
        assert!(matched.required_roles().is_empty());
    }

    #[test]
    fn admin_index_matches_role_area() {
        let table = default_routes();
        let matched = table.match_path("/admin").unwrap();
        assert_eq!(matched.required_roles(), vec![Role::Admin]);
        assert_eq!(matched.leaf().name(), Some("admin-dashboard"));
    }

    #[test]
    fn unknown_path_falls_through_to_not_found() {
        let table = default_routes();
        let matched = table.match_path("/does/not/exist").unwrap();
        assert_eq!(matched.leaf().name(), Some("not-found"));
        assert!(!matched.requires_auth());
    }

    #[test]
    fn literal_teacher_children_win_over_profile_param() {
        let table = default_routes();
        let matched = table.match_path("/teacher/classes").unwrap();
        assert_eq!(matched.leaf().name(), Some("teacher-classes"));
        assert_eq!(matched.required_roles(), vec![Role::Teacher]);
    }
}
