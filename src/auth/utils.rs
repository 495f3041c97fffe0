use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
};

/// Question bank management is limited to admins and examiners.
pub fn require_staff(claims: &Claims) -> AppResult<()> {
    if !claims.is_staff() {
        return Err(AppError::Forbidden(
            "Only admins and examiners can perform this action".to_string(),
        ));
    }
    Ok(())
}

pub fn require_owner_or_staff(claims: &Claims, resource_owner: &str) -> AppResult<()> {
    if !claims.is_staff() && claims.sub != resource_owner {
        return Err(AppError::Forbidden(
            "You can only access your own resources".to_string(),
        ));
    }
    Ok(())
}

/// Which user's attempts a caller may list. Candidates are pinned to their own
/// id whatever they asked for; staff see what they asked for, or everyone.
pub fn attempt_owner_filter(claims: &Claims, requested: Option<&str>) -> Option<String> {
    if claims.is_staff() {
        requested.map(str::to_string)
    } else {
        Some(claims.sub.clone())
    }
}
