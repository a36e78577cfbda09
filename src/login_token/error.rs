use thiserror::Error;

/// Errors returned when redeeming a login token.
///
/// Unknown, already redeemed and expired tokens all map to the same variant
/// so callers cannot tell which tokens once existed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoginTokenError {
    #[error("login token not found")]
    TokenNotFound,
}
