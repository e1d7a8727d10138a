//! Per-request access gate.

use std::sync::Arc;

use http::header::LOCATION;
use http::{HeaderValue, Response, StatusCode};
use shop_auth::Role;
use shop_core::RoutingConfig;
use tracing::debug;

use crate::error::{RouterError, RouterResult};
use crate::matcher::RouteMatcher;
use crate::redirect::{resolve, RedirectTable};

/// What to do with an incoming request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Serve the request as-is.
    Continue,
    /// Send the visitor elsewhere.
    Redirect(String),
    /// The visitor must sign in first.
    SignIn,
}

impl GateDecision {
    /// The short-circuit response for this decision, or `None` to continue.
    ///
    /// Redirects are `307 Temporary Redirect` with a `Location` header;
    /// sign-in is `401 Unauthorized`.
    pub fn into_response(self) -> RouterResult<Option<Response<()>>> {
        match self {
            GateDecision::Continue => Ok(None),
            GateDecision::Redirect(target) => {
                let location = HeaderValue::from_str(&target)
                    .map_err(|_| RouterError::InvalidLocation(target.clone()))?;
                let mut response = Response::new(());
                *response.status_mut() = StatusCode::TEMPORARY_REDIRECT;
                response.headers_mut().insert(LOCATION, location);
                Ok(Some(response))
            }
            GateDecision::SignIn => {
                let mut response = Response::new(());
                *response.status_mut() = StatusCode::UNAUTHORIZED;
                Ok(Some(response))
            }
        }
    }
}

/// Access rules and redirects, evaluated once per request.
#[derive(Debug, Clone)]
pub struct RequestGate {
    public: RouteMatcher,
    admin: RouteMatcher,
    redirects: Arc<RedirectTable>,
}

impl RequestGate {
    pub fn new(public: RouteMatcher, admin: RouteMatcher, redirects: Arc<RedirectTable>) -> Self {
        Self {
            public,
            admin,
            redirects,
        }
    }

    pub fn from_config(config: &RoutingConfig) -> RouterResult<Self> {
        Ok(Self::new(
            RouteMatcher::new(config.public_routes.iter().cloned())?,
            RouteMatcher::new(config.admin_routes.iter().cloned())?,
            Arc::new(RedirectTable::from_config(config)),
        ))
    }

    pub fn redirects(&self) -> &RedirectTable {
        &self.redirects
    }

    /// Decide the fate of a request for `path` by a visitor with `role`.
    ///
    /// Any query string on `path` is ignored.
    pub fn evaluate(&self, path: &str, role: Role) -> GateDecision {
        let path = path.split('?').next().unwrap_or(path);

        let decision = if self.admin.matches(path) && !role.is_admin() {
            GateDecision::Redirect("/".to_string())
        } else if !self.public.matches(path) && !role.is_signed_in() {
            GateDecision::SignIn
        } else if let Some(target) = resolve(path, &self.redirects) {
            GateDecision::Redirect(target)
        } else {
            GateDecision::Continue
        };

        debug!(path, role = %role, ?decision, "gate evaluated");
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> RequestGate {
        RequestGate::from_config(&RoutingConfig::default()).unwrap()
    }

    #[test]
    fn test_admin_routes_bounce_non_admins() {
        let g = gate();
        for role in [Role::Guest, Role::User] {
            assert_eq!(g.evaluate("/admin/sales", role), GateDecision::Redirect("/".into()));
            assert_eq!(g.evaluate("/admin", role), GateDecision::Redirect("/".into()));
        }
    }

    #[test]
    fn test_admin_follows_redirect_chain() {
        let g = gate();
        assert_eq!(
            g.evaluate("/admin", Role::Admin),
            GateDecision::Redirect("/admin/sales".into())
        );
        assert_eq!(g.evaluate("/admin/sales", Role::Admin), GateDecision::Continue);
    }

    #[test]
    fn test_private_routes_need_sign_in() {
        let g = gate();
        assert_eq!(g.evaluate("/cart", Role::Guest), GateDecision::SignIn);
        assert_eq!(g.evaluate("/orders?page=2", Role::Guest), GateDecision::SignIn);
        assert_eq!(g.evaluate("/cart", Role::User), GateDecision::Continue);
    }

    #[test]
    fn test_public_routes_open_to_guests() {
        let g = gate();
        assert_eq!(g.evaluate("/", Role::Guest), GateDecision::Continue);
        assert_eq!(g.evaluate("/products/p1", Role::Guest), GateDecision::Continue);
        assert_eq!(g.evaluate("/about", Role::Guest), GateDecision::Continue);
    }

    #[test]
    fn test_cyclic_redirect_continues() {
        let table = RedirectTable::from_iter([("/loop", "/loop")]);
        let g = RequestGate::new(
            RouteMatcher::new(["/loop"]).unwrap(),
            RouteMatcher::default(),
            Arc::new(table),
        );
        assert_eq!(g.evaluate("/loop", Role::Guest), GateDecision::Continue);
    }

    #[test]
    fn test_responses() {
        assert!(GateDecision::Continue.into_response().unwrap().is_none());

        let redirect = GateDecision::Redirect("/admin/sales".into())
            .into_response()
            .unwrap()
            .unwrap();
        assert_eq!(redirect.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(redirect.headers()[LOCATION], "/admin/sales");

        let sign_in = GateDecision::SignIn.into_response().unwrap().unwrap();
        assert_eq!(sign_in.status(), StatusCode::UNAUTHORIZED);

        assert!(matches!(
            GateDecision::Redirect("/bad\npath".into()).into_response(),
            Err(RouterError::InvalidLocation(_))
        ));
    }
}
