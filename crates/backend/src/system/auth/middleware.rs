use axum::{body::Body, extract::Request, http::StatusCode, middleware::Next, response::Response};
use contracts::system::auth::{Role, TokenClaims};

async fn authenticate(req: &mut Request<Body>) -> Result<TokenClaims, StatusCode> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let claims = super::jwt::validate_token(token)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    // Make claims available to handlers through request extensions
    req.extensions_mut().insert(claims.clone());

    Ok(claims)
}

/// Middleware that requires valid JWT authentication
pub async fn require_auth(mut req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    authenticate(&mut req).await?;
    Ok(next.run(req).await)
}

/// Middleware that requires the agent or admin role
pub async fn require_agent(mut req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    let claims = authenticate(&mut req).await?;
    if !claims.role.can_manage_listings() {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(next.run(req).await)
}

/// Middleware that requires the admin role
pub async fn require_admin(mut req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    let claims = authenticate(&mut req).await?;
    if claims.role != Role::Admin {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(next.run(req).await)
}
