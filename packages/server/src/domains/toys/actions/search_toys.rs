use anyhow::Result;
use sqlx::PgPool;
use tracing::debug;

use crate::domains::toys::data::ToyPage;
use crate::domains::toys::filters::ToyFilter;
use crate::domains::toys::models::Toy;
use crate::domains::users::data::UserSummary;

/// Browse listings and attach owner summaries
pub async fn search_toys(filter: &ToyFilter, pool: &PgPool) -> Result<ToyPage> {
    let result = Toy::search(filter, pool).await?;
    let owners = UserSummary::load_many(result.toys.iter().map(|row| row.toy.user_id), pool).await?;

    debug!(
        returned = result.toys.len(),
        total = result.total,
        "Toy search complete"
    );

    Ok(ToyPage::new(
        result,
        &owners,
        filter.origin.is_some(),
        filter.page.limit,
        filter.page.offset,
    ))
}
