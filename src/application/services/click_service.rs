//! Click log retrieval with per-link access control.

use std::sync::Arc;

use crate::domain::entities::{Click, SessionUser};
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::AppError;
use serde_json::json;

pub struct ClickService<L: LinkRepository + ?Sized, C: ClickRepository + ?Sized> {
    link_repository: Arc<L>,
    click_repository: Arc<C>,
}

impl<L, C> ClickService<L, C>
where
    L: LinkRepository + ?Sized,
    C: ClickRepository + ?Sized,
{
    pub fn new(link_repository: Arc<L>, click_repository: Arc<C>) -> Self {
        Self {
            link_repository,
            click_repository,
        }
    }

    /// Lists click logs of a link, newest first, with the total count.
    ///
    /// Admins may read any link. Other users only see their own links; a link
    /// owned by someone else is reported as missing so its existence does
    /// not leak.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist or is not
    /// visible to `session`.
    pub async fn list_for_link(
        &self,
        session: &SessionUser,
        link_id: i64,
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<Click>, i64), AppError> {
        let link = self
            .link_repository
            .find_by_id(link_id)
            .await?
            .filter(|link| session.is_admin() || link.is_owned_by(session.user_id))
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "link_id": link_id })))?;

        let offset = (page - 1).saturating_mul(per_page);
        let clicks = self
            .click_repository
            .list_for_link(link.id, offset, per_page)
            .await?;
        let total = self.click_repository.count_for_link(link.id).await?;

        Ok((clicks, total))
    }
}
