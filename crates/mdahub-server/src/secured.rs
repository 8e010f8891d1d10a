// Security context and authorization macro for API access control

use actix_web::HttpRequest;

// Re-export auth types needed by the secured! macro
// These are referenced via $crate::secured:: in the macro expansion
pub use mdahub_auth::model::AuthContext;
pub use mdahub_auth::model::ROLE_USER;

/// Which token namespace a route belongs to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PrincipalKind {
    #[default]
    User,
    Admin,
}

// Security context for API access control
#[derive(Debug, Clone)]
pub struct Secured<'a> {
    pub req: &'a HttpRequest,
    pub principal: PrincipalKind,
    pub superadmin: bool,
}

impl<'a> Secured<'a> {
    pub fn builder(req: &'a HttpRequest) -> SecuredBuilder<'a> {
        SecuredBuilder::new(req)
    }
}

#[derive(Debug, Clone)]
pub struct SecuredBuilder<'a> {
    req: &'a HttpRequest,
    principal: PrincipalKind,
    superadmin: bool,
}

impl<'a> SecuredBuilder<'a> {
    pub fn new(req: &'a HttpRequest) -> Self {
        SecuredBuilder::<'a> {
            req,
            principal: PrincipalKind::default(),
            superadmin: false,
        }
    }

    pub fn user(mut self) -> Self {
        self.principal = PrincipalKind::User;
        self
    }

    pub fn admin(mut self) -> Self {
        self.principal = PrincipalKind::Admin;
        self
    }

    /// Require the superadmin role on top of an admin token
    pub fn superadmin(mut self) -> Self {
        self.principal = PrincipalKind::Admin;
        self.superadmin = true;
        self
    }

    pub fn build(self) -> Secured<'a> {
        Secured::<'a> {
            req: self.req,
            principal: self.principal,
            superadmin: self.superadmin,
        }
    }
}

/// Authorize a request at the route boundary and bind the validated
/// auth context. Expands to early returns, so the surrounding handler
/// must return `HttpResponse`.
#[macro_export]
macro_rules! secured {
    ($ctx:ident, $secured:expr) => {
        let __secured = $secured;

        let __auth_context_opt: Option<$crate::secured::AuthContext> = {
            actix_web::HttpMessage::extensions(__secured.req)
                .get::<$crate::secured::AuthContext>()
                .cloned()
        };

        let $ctx = match __auth_context_opt {
            None => {
                return $crate::model::response::ErrorResult::http_response_unauthorized(
                    "no auth context found",
                    __secured.req.path(),
                );
            }
            Some(ref __auth_context) if !__auth_context.token_provided => {
                return $crate::model::response::ErrorResult::http_response_unauthorized(
                    "no token provided",
                    __secured.req.path(),
                );
            }
            Some(ref __auth_context) if __auth_context.jwt_error.is_some() => {
                return $crate::model::response::ErrorResult::http_response_unauthorized(
                    &__auth_context.jwt_error_string(),
                    __secured.req.path(),
                );
            }
            Some(__auth_context) => __auth_context,
        };

        match __secured.principal {
            $crate::secured::PrincipalKind::Admin => {
                if !$ctx.is_admin() {
                    return $crate::model::response::ErrorResult::http_response_forbidden(
                        "authorization failed!",
                        __secured.req.path(),
                    );
                }
                if __secured.superadmin && !$ctx.is_superadmin() {
                    return $crate::model::response::ErrorResult::http_response_forbidden(
                        "superadmin required",
                        __secured.req.path(),
                    );
                }
            }
            $crate::secured::PrincipalKind::User => {
                if $ctx.role != $crate::secured::ROLE_USER {
                    return $crate::model::response::ErrorResult::http_response_forbidden(
                        "authorization failed!",
                        __secured.req.path(),
                    );
                }
            }
        }
    };
}
