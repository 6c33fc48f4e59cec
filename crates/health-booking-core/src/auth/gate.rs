//! The role gate: which navigation links and routes each role may reach.
//!
//! Role resolution is asynchronous relative to identity resolution, so
//! every function here must tolerate `Role::Unknown` without failing.

use tracing::warn;

use crate::db::DbError;
use crate::models::Role;

use super::AuthContext;

/// Navigation links, per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavLink {
    Home,
    Doctors,
    MyAppointments,
    Report,
    Profile,
    DoctorHome,
    DoctorAppointments,
}

impl NavLink {
    /// Label as rendered in the navigation bar.
    pub fn label(&self) -> &'static str {
        match self {
            NavLink::Home => "HOME",
            NavLink::Doctors => "DOCTORS",
            NavLink::MyAppointments => "MY APPOINTMENTS",
            NavLink::Report => "REPORT",
            NavLink::Profile => "PROFILE",
            NavLink::DoctorHome => "DOCTOR HOME",
            NavLink::DoctorAppointments => "APPOINTMENTS",
        }
    }

    /// The route this link navigates to.
    pub fn route(&self) -> Route {
        match self {
            NavLink::Home => Route::Home,
            NavLink::Doctors => Route::Doctors,
            NavLink::MyAppointments => Route::MyAppointments,
            NavLink::Report => Route::Report,
            NavLink::Profile => Route::Profile,
            NavLink::DoctorHome => Route::DoctorHome,
            NavLink::DoctorAppointments => Route::DoctorAppointments,
        }
    }
}

/// Application routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Home,
    DoctorHome,
    Doctors,
    BookDoctor,
    MyAppointments,
    DoctorAppointments,
    Report,
    Profile,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Home => "/home",
            Route::DoctorHome => "/doctorHome",
            Route::Doctors => "/doctors",
            Route::BookDoctor => "/bookDoctors",
            Route::MyAppointments => "/appointments",
            Route::DoctorAppointments => "/doctorAppointments",
            Route::Report => "/report",
            Route::Profile => "/profile",
        }
    }

    /// Every route except the login page requires an identity.
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

/// Navigation links visible to a role. `Unknown` gets none: the transient
/// window between identity and role resolution renders a bare navbar, not
/// an error.
pub fn nav_links(role: Role) -> &'static [NavLink] {
    match role {
        Role::Patient => &[
            NavLink::Home,
            NavLink::Doctors,
            NavLink::MyAppointments,
            NavLink::Report,
            NavLink::Profile,
        ],
        Role::Doctor => &[
            NavLink::DoctorHome,
            NavLink::DoctorAppointments,
            NavLink::Profile,
        ],
        Role::Unknown => &[],
    }
}

/// Default landing route for an authenticated user.
pub fn landing_route(role: Role) -> Route {
    match role {
        Role::Patient => Route::Home,
        Role::Doctor => Route::DoctorHome,
        Role::Unknown => Route::Home,
    }
}

/// The single authoritative route guard.
///
/// All redirect decisions happen here, once per navigation, never inside
/// rendering - that is what kept the original shell from double-navigating
/// while identity resolution was still in flight.
pub fn resolve_route(requested: Route, ctx: &AuthContext) -> Route {
    if !ctx.is_authenticated() {
        if requested.requires_auth() {
            return Route::Login;
        }
        return requested;
    }

    // A signed-in user has no business on the login page.
    if requested == Route::Login {
        return Route::Profile;
    }

    requested
}

/// Collapse a role lookup into a renderable role.
///
/// A missing account record and a failed lookup both degrade to `Unknown`:
/// the gate fails open to the no-role view and logs the failure instead of
/// surfacing a blocking error.
pub fn resolve_role(lookup: Result<Option<Role>, DbError>) -> Role {
    match lookup {
        Ok(Some(role)) => role,
        Ok(None) => Role::Unknown,
        Err(e) => {
            warn!("role lookup failed, rendering without role links: {}", e);
            Role::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patient_nav_links() {
        let links = nav_links(Role::Patient);
        assert_eq!(
            links,
            &[
                NavLink::Home,
                NavLink::Doctors,
                NavLink::MyAppointments,
                NavLink::Report,
                NavLink::Profile,
            ]
        );
    }

    #[test]
    fn test_doctor_nav_links() {
        let links = nav_links(Role::Doctor);
        assert_eq!(
            links,
            &[NavLink::DoctorHome, NavLink::DoctorAppointments, NavLink::Profile]
        );
        assert!(!links.contains(&NavLink::Report));
    }

    #[test]
    fn test_unknown_role_renders_no_links() {
        assert!(nav_links(Role::Unknown).is_empty());
    }

    #[test]
    fn test_landing_routes() {
        assert_eq!(landing_route(Role::Patient), Route::Home);
        assert_eq!(landing_route(Role::Doctor), Route::DoctorHome);
        assert_eq!(landing_route(Role::Unknown), Route::Home);
    }

    #[test]
    fn test_unauthenticated_redirects_to_login() {
        let ctx = AuthContext::new();
        assert_eq!(resolve_route(Route::Profile, &ctx), Route::Login);
        assert_eq!(resolve_route(Route::MyAppointments, &ctx), Route::Login);
        assert_eq!(resolve_route(Route::Login, &ctx), Route::Login);
    }

    #[test]
    fn test_authenticated_passes_through() {
        let mut ctx = AuthContext::new();
        ctx.sign_in("uid-1", "max@example.com");

        assert_eq!(resolve_route(Route::Profile, &ctx), Route::Profile);
        assert_eq!(resolve_route(Route::Doctors, &ctx), Route::Doctors);
        // Signed-in visit to the login page lands on the profile.
        assert_eq!(resolve_route(Route::Login, &ctx), Route::Profile);
    }

    #[test]
    fn test_resolve_role_fails_open() {
        assert_eq!(resolve_role(Ok(Some(Role::Doctor))), Role::Doctor);
        assert_eq!(resolve_role(Ok(None)), Role::Unknown);
        assert_eq!(
            resolve_role(Err(DbError::NotFound("users".into()))),
            Role::Unknown
        );
    }

    #[test]
    fn test_link_routes_and_labels() {
        assert_eq!(NavLink::MyAppointments.route(), Route::MyAppointments);
        assert_eq!(NavLink::MyAppointments.label(), "MY APPOINTMENTS");
        assert_eq!(Route::MyAppointments.path(), "/appointments");
        assert!(Route::Profile.requires_auth());
        assert!(!Route::Login.requires_auth());
    }
}
