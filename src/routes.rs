//! Application route table.
//!
//! ARCHITECTURE
//! ============
//! Every screen the portal can land on is an [`AppRoute`]. The redirect
//! handler, guards, gateway and invitation flow all return routes instead of
//! navigating themselves; the web client turns a route into a navigation.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

use crate::guards::Guard;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppRoute {
    /// `/auth/microsoft/callback`: OAuth redirect consumer.
    AuthCallback,
    /// `/invite/accept/{token}`.
    AcceptInvitation { token: String },
    /// `/`: always forwards to the dashboard.
    Root,
    /// `/login`, optionally carrying a notice to display and the location the
    /// user was trying to reach.
    Login { notice: Option<String>, from: Option<String> },
    Dashboard,
    Profile,
    MyOkr,
    DepartmentOverview,
    DepartmentOkr,
    DepartmentKpi,
    DepartmentUsers,
    AdminSettings,
    AdminDepartment,
    /// `/404`: also the blocked screen for disallowed email domains.
    NotFound,
}

impl AppRoute {
    /// Plain login route with no notice.
    #[must_use]
    pub fn login() -> Self {
        Self::Login { notice: None, from: None }
    }

    #[must_use]
    pub fn login_with_notice(notice: impl Into<String>) -> Self {
        Self::Login { notice: Some(notice.into()), from: None }
    }

    /// Resolve a location path. Unknown paths fall back to [`AppRoute::Root`].
    #[must_use]
    pub fn resolve(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            ["auth", "microsoft", "callback"] => Self::AuthCallback,
            ["invite", "accept", token] => Self::AcceptInvitation { token: (*token).to_owned() },
            ["login"] => Self::login(),
            ["dashboard"] => Self::Dashboard,
            ["profile"] => Self::Profile,
            ["my-okr"] => Self::MyOkr,
            ["departments", "overview"] => Self::DepartmentOverview,
            ["departments", "okr"] => Self::DepartmentOkr,
            ["departments", "kpi"] => Self::DepartmentKpi,
            ["departments", "users"] => Self::DepartmentUsers,
            ["admin", "settings"] => Self::AdminSettings,
            ["admin", "department"] => Self::AdminDepartment,
            ["404"] => Self::NotFound,
            _ => Self::Root,
        }
    }

    /// Location path for this route.
    #[must_use]
    pub fn href(&self) -> String {
        match self {
            Self::AuthCallback => "/auth/microsoft/callback".to_owned(),
            Self::AcceptInvitation { token } => format!("/invite/accept/{token}"),
            Self::Root => "/".to_owned(),
            Self::Login { from: Some(from), .. } => {
                format!("/login?from={}", utf8_percent_encode(from, NON_ALPHANUMERIC))
            }
            Self::Login { from: None, .. } => "/login".to_owned(),
            Self::Dashboard => "/dashboard".to_owned(),
            Self::Profile => "/profile".to_owned(),
            Self::MyOkr => "/my-okr".to_owned(),
            Self::DepartmentOverview => "/departments/overview".to_owned(),
            Self::DepartmentOkr => "/departments/okr".to_owned(),
            Self::DepartmentKpi => "/departments/kpi".to_owned(),
            Self::DepartmentUsers => "/departments/users".to_owned(),
            Self::AdminSettings => "/admin/settings".to_owned(),
            Self::AdminDepartment => "/admin/department".to_owned(),
            Self::NotFound => "/404".to_owned(),
        }
    }

    /// Notice to show on arrival, if any.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        match self {
            Self::Login { notice, .. } => notice.as_deref(),
            _ => None,
        }
    }

    /// Guard chain, outermost first. Routes in the signed-in layout are all
    /// behind the authenticated guard; admin settings nest the admin guard inside it.
    #[must_use]
    pub fn guards(&self) -> &'static [Guard] {
        match self {
            Self::AuthCallback | Self::AcceptInvitation { .. } | Self::Root | Self::NotFound => &[],
            Self::Login { .. } => &[Guard::PublicOnly],
            Self::AdminSettings => &[Guard::Authenticated, Guard::Admin],
            Self::Dashboard
            | Self::Profile
            | Self::MyOkr
            | Self::DepartmentOverview
            | Self::DepartmentOkr
            | Self::DepartmentKpi
            | Self::DepartmentUsers
            | Self::AdminDepartment => &[Guard::Authenticated],
        }
    }

    /// Sidebar/page title for the signed-in screens.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::AuthCallback => "Signing in",
            Self::AcceptInvitation { .. } => "Accept invitation",
            Self::Root | Self::Dashboard => "Dashboard",
            Self::Login { .. } => "Sign in",
            Self::Profile => "Profile",
            Self::MyOkr => "My OKR",
            Self::DepartmentOverview => "Department overview",
            Self::DepartmentOkr => "Department OKR",
            Self::DepartmentKpi => "Department KPI",
            Self::DepartmentUsers | Self::AdminDepartment => "Personnel",
            Self::AdminSettings => "Admin settings",
            Self::NotFound => "Not found",
        }
    }
}
