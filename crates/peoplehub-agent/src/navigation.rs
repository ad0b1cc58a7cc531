//! Dashboard route table and role-checked navigation.

use peoplehub_core::Role;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, info};

const ALL_ROLES: &[Role] = &[Role::Employee, Role::Manager, Role::Hr];
const PRIVILEGED: &[Role] = &[Role::Manager, Role::Hr];
const HR_ONLY: &[Role] = &[Role::Hr];

/// A dashboard page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    /// Canonical name.
    pub name: &'static str,
    /// Absolute path.
    pub path: &'static str,
    /// Roles allowed to open the page.
    pub roles: &'static [Role],
}

impl Route {
    /// Whether `role` may open this page.
    pub fn allows(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

const ROUTES: &[Route] = &[
    Route { name: "dashboard", path: "/dashboard", roles: ALL_ROLES },
    Route { name: "tasks", path: "/dashboard/tasks", roles: ALL_ROLES },
    Route { name: "leave", path: "/dashboard/leave", roles: ALL_ROLES },
    Route { name: "policies", path: "/dashboard/policies", roles: ALL_ROLES },
    Route { name: "wellness", path: "/dashboard/wellness", roles: ALL_ROLES },
    Route { name: "announcements", path: "/dashboard/announcements", roles: ALL_ROLES },
    Route { name: "profile", path: "/dashboard/profile", roles: ALL_ROLES },
    Route { name: "settings", path: "/dashboard/settings", roles: ALL_ROLES },
    Route { name: "employees", path: "/dashboard/employees", roles: PRIVILEGED },
    Route { name: "analytics", path: "/dashboard/analytics", roles: PRIVILEGED },
    Route { name: "approvals", path: "/dashboard/approvals", roles: PRIVILEGED },
    Route { name: "payroll", path: "/dashboard/payroll", roles: HR_ONLY },
];

const ALIASES: &[(&str, &str)] = &[
    ("home", "dashboard"),
    ("main", "dashboard"),
    ("overview", "dashboard"),
    ("staff", "employees"),
    ("team", "employees"),
    ("people", "employees"),
    ("directory", "employees"),
    ("time-off", "leave"),
    ("vacation", "leave"),
    ("leaves", "leave"),
    ("holidays", "leave"),
    ("todo", "tasks"),
    ("todos", "tasks"),
    ("salary", "payroll"),
    ("salaries", "payroll"),
    ("payslips", "payroll"),
    ("compensation", "payroll"),
    ("reports", "analytics"),
    ("insights", "analytics"),
    ("stats", "analytics"),
    ("news", "announcements"),
    ("updates", "announcements"),
    ("health", "wellness"),
    ("handbook", "policies"),
    ("account", "profile"),
    ("me", "profile"),
    ("preferences", "settings"),
];

/// Lowercases, trims and turns whitespace/underscore runs into single dashes.
fn normalize(input: &str) -> String {
    input
        .trim()
        .trim_end_matches('/')
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Singular/plural variants of a route word.
fn number_variants(word: &str) -> Vec<String> {
    let mut variants = Vec::new();
    if let Some(stem) = word.strip_suffix("ies") {
        variants.push(format!("{stem}y"));
    }
    if let Some(stem) = word.strip_suffix('s') {
        variants.push(stem.to_string());
    }
    if let Some(stem) = word.strip_suffix('y') {
        variants.push(format!("{stem}ies"));
    }
    variants.push(format!("{word}s"));
    variants
}

/// The static dashboard route table.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteTable;

impl RouteTable {
    /// All routes.
    pub fn routes(self) -> &'static [Route] {
        ROUTES
    }

    /// Routes visible to `role`.
    pub fn accessible(self, role: Role) -> Vec<&'static Route> {
        ROUTES.iter().filter(|route| route.allows(role)).collect()
    }

    fn by_name_or_alias(name: &str) -> Option<&'static Route> {
        let canonical =
            ALIASES.iter().find(|(alias, _)| *alias == name).map_or(name, |(_, target)| *target);
        ROUTES.iter().find(|route| route.name == canonical)
    }

    fn by_name(name: &str) -> Option<&'static Route> {
        ROUTES.iter().find(|route| route.name == name)
    }

    /// Maps a name, alias or path to a route, ignoring roles.
    ///
    /// Tries, in order: exact name, alias, path suffix (`/dashboard/<name>`
    /// or `/<name>`), then singular/plural variants of route names. Aliases
    /// only match as written, so "update" does not reach `updates`.
    pub fn lookup(self, input: &str) -> Option<&'static Route> {
        let normalized = normalize(input);
        if normalized.is_empty() {
            return None;
        }

        if let Some(route) = Self::by_name_or_alias(&normalized) {
            return Some(route);
        }

        let candidate = if normalized.starts_with('/') {
            if let Some(route) = ROUTES.iter().find(|route| route.path == normalized) {
                return Some(route);
            }
            let stripped = normalized
                .strip_prefix("/dashboard/")
                .unwrap_or_else(|| normalized.trim_start_matches('/'));
            if let Some(route) = Self::by_name_or_alias(stripped) {
                return Some(route);
            }
            stripped.to_string()
        } else {
            normalized
        };

        number_variants(&candidate).iter().find_map(|variant| Self::by_name(variant))
    }
}

/// A route the actor may open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRoute {
    /// Canonical route name.
    pub name: String,
    /// Absolute path.
    pub path: String,
}

impl From<&Route> for ResolvedRoute {
    fn from(route: &Route) -> Self {
        Self { name: route.name.to_string(), path: route.path.to_string() }
    }
}

/// Navigation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// Nothing in the route table matched.
    #[error("Unknown page '{input}'. Available pages: {}", accessible.join(", "))]
    Unresolved {
        /// The raw input.
        input: String,
        /// Route names the actor may open.
        accessible: Vec<String>,
    },

    /// The route exists but the role may not open it.
    #[error("Access denied: the {route} page is not available for the {role} role")]
    Forbidden {
        /// Canonical route name.
        route: String,
        /// The actor's role.
        role: Role,
    },
}

/// Performs the actual UI transition.
pub trait Navigator: Send + Sync {
    /// Moves the UI to `path`.
    fn navigate(&self, path: &str);
}

/// Navigator that only records visited paths.
#[derive(Debug, Default)]
pub struct HistoryNavigator {
    visited: Mutex<Vec<String>>,
}

impl HistoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths visited so far, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.visited.lock().map(|v| v.clone()).unwrap_or_default()
    }

    /// The last visited path.
    pub fn current(&self) -> Option<String> {
        self.visited.lock().ok().and_then(|v| v.last().cloned())
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&self, path: &str) {
        if let Ok(mut visited) = self.visited.lock() {
            visited.push(path.to_string());
        }
    }
}

/// Resolves route references and checks them against the actor's role.
#[derive(Clone)]
pub struct NavigationResolver {
    table: RouteTable,
    navigator: Arc<dyn Navigator>,
}

impl NavigationResolver {
    /// Creates a resolver over the standard route table.
    pub fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self { table: RouteTable, navigator }
    }

    /// The route table in use.
    pub fn table(&self) -> RouteTable {
        self.table
    }

    /// Maps `input` to a route `role` may open.
    pub fn resolve(&self, input: &str, role: Role) -> Result<ResolvedRoute, NavigationError> {
        let Some(route) = self.table.lookup(input) else {
            debug!(input = %input, "Route not found");
            return Err(NavigationError::Unresolved {
                input: input.trim().to_string(),
                accessible: self
                    .table
                    .accessible(role)
                    .iter()
                    .map(|route| route.name.to_string())
                    .collect(),
            });
        };

        if !route.allows(role) {
            return Err(NavigationError::Forbidden { route: route.name.to_string(), role });
        }

        Ok(ResolvedRoute::from(route))
    }

    /// Resolves `input` and moves the UI there.
    pub fn navigate(&self, input: &str, role: Role) -> Result<ResolvedRoute, NavigationError> {
        let resolved = self.resolve(input, role)?;
        info!(route = %resolved.name, path = %resolved.path, "Navigating");
        self.navigator.navigate(&resolved.path);
        Ok(resolved)
    }
}
