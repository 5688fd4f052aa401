//! Client route guards.
//!
//! A [`RouteGuard`] decides, for the current [`AuthSession`], whether a
//! route subtree renders, shows a loading placeholder, or redirects. A
//! [`RouteTable`] nests guards by path prefix.

use lms_models::{Role, UserType};

use crate::session::AuthSession;

pub const DEFAULT_REDIRECT: &str = "/login";

/// Where staff land when their role is not allowed on a route.
pub const STAFF_HOME: &str = "/admin";

/// Which branch of the guard state machine a session falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Loading,
    ReverseGuardPass,
    ReverseGuardBlock,
    Unauthenticated,
    WrongUserType,
    WrongRole,
    Authorized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Show `component`, or the default spinner when `None`.
    Loading { component: Option<String> },
    Render,
    Redirect(String),
}

impl GuardOutcome {
    pub fn is_render(&self) -> bool {
        matches!(self, GuardOutcome::Render)
    }
}

#[derive(Debug, Clone)]
pub struct RouteGuard {
    allowed_user_types: Option<Vec<UserType>>,
    allowed_roles: Option<Vec<Role>>,
    redirect_to: String,
    unauthorized_redirect_to: Option<String>,
    reverse: bool,
    loading_component: Option<String>,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self {
            allowed_user_types: None,
            allowed_roles: None,
            redirect_to: DEFAULT_REDIRECT.to_string(),
            unauthorized_redirect_to: None,
            reverse: false,
            loading_component: None,
        }
    }
}

impl RouteGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Guard for pages reachable only while signed out.
    pub fn reverse() -> Self {
        Self {
            reverse: true,
            ..Self::default()
        }
    }

    pub fn allowed_user_types(mut self, types: impl IntoIterator<Item = UserType>) -> Self {
        self.allowed_user_types = Some(types.into_iter().collect());
        self
    }

    pub fn allowed_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.allowed_roles = Some(roles.into_iter().collect());
        self
    }

    pub fn redirect_to(mut self, path: impl Into<String>) -> Self {
        self.redirect_to = path.into();
        self
    }

    pub fn unauthorized_redirect_to(mut self, path: impl Into<String>) -> Self {
        self.unauthorized_redirect_to = Some(path.into());
        self
    }

    pub fn loading_component(mut self, component: impl Into<String>) -> Self {
        self.loading_component = Some(component.into());
        self
    }

    pub fn state(&self, session: &AuthSession) -> GuardState {
        if !session.initialized || session.is_loading {
            return GuardState::Loading;
        }

        let Some(user_type) = session.user_type else {
            return if self.reverse {
                GuardState::ReverseGuardPass
            } else {
                GuardState::Unauthenticated
            };
        };

        if self.reverse {
            return GuardState::ReverseGuardBlock;
        }

        if self
            .allowed_user_types
            .as_ref()
            .is_some_and(|types| !types.contains(&user_type))
        {
            return GuardState::WrongUserType;
        }

        // Parents have no role dimension.
        if user_type == UserType::Staff
            && self
                .allowed_roles
                .as_ref()
                .is_some_and(|roles| !session.has_any_role(roles))
        {
            return GuardState::WrongRole;
        }

        GuardState::Authorized
    }

    pub fn evaluate(&self, session: &AuthSession) -> GuardOutcome {
        let home = session.user_type.map(UserType::home_route).unwrap_or(STAFF_HOME);

        match self.state(session) {
            GuardState::Loading => GuardOutcome::Loading {
                component: self.loading_component.clone(),
            },
            GuardState::ReverseGuardPass | GuardState::Authorized => GuardOutcome::Render,
            GuardState::ReverseGuardBlock => GuardOutcome::Redirect(home.to_string()),
            GuardState::Unauthenticated => GuardOutcome::Redirect(self.redirect_to.clone()),
            GuardState::WrongUserType => GuardOutcome::Redirect(
                self.unauthorized_redirect_to
                    .clone()
                    .unwrap_or_else(|| home.to_string()),
            ),
            GuardState::WrongRole => GuardOutcome::Redirect(
                self.unauthorized_redirect_to
                    .clone()
                    .unwrap_or_else(|| STAFF_HOME.to_string()),
            ),
        }
    }
}

/// Guards nested by path prefix.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<(String, RouteGuard)>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn guard(mut self, prefix: impl Into<String>, guard: RouteGuard) -> Self {
        let prefix = prefix.into();
        let at = self
            .entries
            .partition_point(|(existing, _)| existing.len() <= prefix.len());
        self.entries.insert(at, (prefix, guard));
        self
    }

    /// The portal's client routes.
    pub fn portal() -> Self {
        Self::new()
            .guard("/login", RouteGuard::reverse())
            .guard("/parent-login", RouteGuard::reverse())
            .guard(
                "/admin",
                RouteGuard::new().allowed_user_types([UserType::Staff]),
            )
            .guard(
                "/admin/users",
                RouteGuard::new().allowed_roles([Role::SuperAdmin]),
            )
            .guard(
                "/admin/attendance",
                RouteGuard::new().allowed_roles([Role::ClassTeacher, Role::SuperAdmin]),
            )
            .guard(
                "/parent",
                RouteGuard::new()
                    .allowed_user_types([UserType::Parent])
                    .redirect_to("/parent-login"),
            )
    }

    /// Runs every guard covering `path`, outermost first; the first guard
    /// that does not render decides.
    pub fn evaluate(&self, path: &str, session: &AuthSession) -> GuardOutcome {
        self.entries
            .iter()
            .filter(|(prefix, _)| covers(prefix, path))
            .map(|(_, guard)| guard.evaluate(session))
            .find(|outcome| !outcome.is_render())
            .unwrap_or(GuardOutcome::Render)
    }
}

fn covers(prefix: &str, path: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lms_models::{ParentIdentity, StaffIdentity};

    fn signed_out() -> AuthSession {
        AuthSession {
            initialized: true,
            ..AuthSession::default()
        }
    }

    fn staff(role: Role) -> AuthSession {
        AuthSession {
            token: Some("t".to_string()),
            user_type: Some(UserType::Staff),
            user: Some(StaffIdentity {
                id: 1,
                fname: "S".to_string(),
                mname: None,
                lname: "T".to_string(),
                email: "s@t.com".to_string(),
                phone: "9000000000".to_string(),
                role,
                gender: "M".to_string(),
                dob: None,
                address: None,
            }),
            user_roles: Some(vec![role]),
            initialized: true,
            ..AuthSession::default()
        }
    }

    fn parent() -> AuthSession {
        AuthSession {
            token: Some("t".to_string()),
            user_type: Some(UserType::Parent),
            student: Some(ParentIdentity {
                student_id: 2,
                fname: "P".to_string(),
                lname: "Q".to_string(),
                father_phone: Some("9000000001".to_string()),
                mother_phone: None,
                std: "1".to_string(),
                div: "A".to_string(),
            }),
            initialized: true,
            ..AuthSession::default()
        }
    }

    #[test]
    fn test_loading_until_initialized() {
        let guard = RouteGuard::new().loading_component("Spinner");
        assert_eq!(guard.state(&AuthSession::default()), GuardState::Loading);
        assert_eq!(
            guard.evaluate(&AuthSession::default()),
            GuardOutcome::Loading {
                component: Some("Spinner".to_string())
            }
        );

        let mut busy = staff(Role::Teacher);
        busy.is_loading = true;
        assert_eq!(RouteGuard::reverse().state(&busy), GuardState::Loading);
    }

    #[test]
    fn test_reverse_guard() {
        let guard = RouteGuard::reverse();
        assert_eq!(guard.evaluate(&signed_out()), GuardOutcome::Render);
        assert_eq!(
            guard.evaluate(&staff(Role::SuperAdmin)),
            GuardOutcome::Redirect("/admin".to_string())
        );
        assert_eq!(
            guard.evaluate(&parent()),
            GuardOutcome::Redirect("/parent".to_string())
        );
    }

    #[test]
    fn test_reverse_guard_redirects_every_staff_role_home() {
        let guard = RouteGuard::reverse();
        for role in Role::ALL {
            assert_eq!(
                guard.evaluate(&staff(role)),
                GuardOutcome::Redirect("/admin".to_string())
            );
        }
    }

    #[test]
    fn test_unauthenticated_redirects() {
        assert_eq!(
            RouteGuard::new().evaluate(&signed_out()),
            GuardOutcome::Redirect("/login".to_string())
        );
        assert_eq!(
            RouteGuard::new()
                .redirect_to("/parent-login")
                .evaluate(&signed_out()),
            GuardOutcome::Redirect("/parent-login".to_string())
        );
    }

    #[test]
    fn test_wrong_user_type() {
        let staff_only = RouteGuard::new().allowed_user_types([UserType::Staff]);
        assert_eq!(staff_only.state(&parent()), GuardState::WrongUserType);
        assert_eq!(
            staff_only.evaluate(&parent()),
            GuardOutcome::Redirect("/parent".to_string())
        );
        assert_eq!(
            staff_only
                .unauthorized_redirect_to("/denied")
                .evaluate(&parent()),
            GuardOutcome::Redirect("/denied".to_string())
        );
    }

    #[test]
    fn test_user_type_checked_before_role() {
        let guard = RouteGuard::new()
            .allowed_user_types([UserType::Parent])
            .allowed_roles([Role::Teacher]);
        assert_eq!(guard.state(&staff(Role::ClassTeacher)), GuardState::WrongUserType);
    }

    #[test]
    fn test_wrong_role() {
        let guard = RouteGuard::new().allowed_roles([Role::SuperAdmin]);
        let session = staff(Role::ClassTeacher);
        assert_eq!(guard.state(&session), GuardState::WrongRole);
        assert_eq!(
            guard.evaluate(&session),
            GuardOutcome::Redirect("/admin".to_string())
        );
        assert_eq!(
            guard
                .unauthorized_redirect_to("/admin/home")
                .evaluate(&session),
            GuardOutcome::Redirect("/admin/home".to_string())
        );
    }

    #[test]
    fn test_roles_skipped_for_parents() {
        let guard = RouteGuard::new().allowed_roles([Role::SuperAdmin]);
        assert_eq!(guard.state(&parent()), GuardState::Authorized);
    }

    #[test]
    fn test_authorized() {
        let guard = RouteGuard::new()
            .allowed_user_types([UserType::Staff])
            .allowed_roles([Role::ClassTeacher, Role::SuperAdmin]);
        assert_eq!(guard.evaluate(&staff(Role::ClassTeacher)), GuardOutcome::Render);
    }

    #[test]
    fn test_prefix_matching_is_segment_aware() {
        assert!(covers("/admin", "/admin"));
        assert!(covers("/admin", "/admin/users/4"));
        assert!(covers("/admin/", "/admin/users"));
        assert!(!covers("/admin", "/administrator"));
        assert!(!covers("/parent", "/parent-login"));
    }

    #[test]
    fn test_portal_table() {
        let table = RouteTable::portal();

        assert_eq!(table.evaluate("/login", &signed_out()), GuardOutcome::Render);
        assert_eq!(
            table.evaluate("/admin/users", &signed_out()),
            GuardOutcome::Redirect("/login".to_string())
        );
        assert_eq!(
            table.evaluate("/parent", &signed_out()),
            GuardOutcome::Redirect("/parent-login".to_string())
        );

        let teacher = staff(Role::ClassTeacher);
        assert_eq!(table.evaluate("/admin", &teacher), GuardOutcome::Render);
        assert_eq!(
            table.evaluate("/admin/attendance/today", &teacher),
            GuardOutcome::Render
        );
        assert_eq!(
            table.evaluate("/admin/users", &teacher),
            GuardOutcome::Redirect("/admin".to_string())
        );
        assert_eq!(
            table.evaluate("/parent", &teacher),
            GuardOutcome::Redirect("/admin".to_string())
        );
        assert_eq!(
            table.evaluate("/parent-login", &teacher),
            GuardOutcome::Redirect("/admin".to_string())
        );

        let admin = staff(Role::SuperAdmin);
        assert_eq!(table.evaluate("/admin/users", &admin), GuardOutcome::Render);

        // The outer staff-only guard stops parents before any role check.
        assert_eq!(
            table.evaluate("/admin/users", &parent()),
            GuardOutcome::Redirect("/parent".to_string())
        );
        assert_eq!(table.evaluate("/parent/attendance", &parent()), GuardOutcome::Render);
    }
}
