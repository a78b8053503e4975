use anyhow::Result;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::cmp::Ordering;
use tracing::debug;

use crate::common::utils::geo::{calculate_distance_km, BoundingBox};
use crate::domains::toys::filters::{GeoPoint, ToyFilter, ToySort};
use crate::domains::toys::models::toy::Toy;

/// A toy annotated with its distance from the search origin
#[derive(Debug, Clone)]
pub struct ToyWithDistance {
    pub toy: Toy,
    /// `None` when there is no origin or the toy has no coordinates
    pub distance_km: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct ToySearchResult {
    pub toys: Vec<ToyWithDistance>,
    /// Matches before pagination
    pub total: i64,
}

impl Toy {
    /// Browse toys with the given filters.
    ///
    /// Radius filtering and distance ordering happen in Rust after a
    /// bounding-box pre-filter in SQL; everything else is pushed to the
    /// database.
    pub async fn search(filter: &ToyFilter, pool: &PgPool) -> Result<ToySearchResult> {
        if filter.needs_post_processing() {
            let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM toys WHERE true");
            push_predicates(&mut query, filter);
            query.push(" ORDER BY created_at DESC, id DESC");

            let rows = query.build_query_as::<Toy>().fetch_all(pool).await?;
            let candidates = rows.len();
            let matched = rank_by_distance(rows, filter);
            let total = matched.len() as i64;

            debug!(candidates, total, "Post-filtered toy search");

            return Ok(ToySearchResult {
                toys: filter.page.apply(matched),
                total,
            });
        }

        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM toys WHERE true");
        push_predicates(&mut count_query, filter);
        let total: i64 = count_query.build_query_scalar().fetch_one(pool).await?;

        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM toys WHERE true");
        push_predicates(&mut query, filter);
        query.push(" ORDER BY created_at DESC, id DESC LIMIT ");
        query.push_bind(filter.page.limit);
        query.push(" OFFSET ");
        query.push_bind(filter.page.offset);

        let rows = query.build_query_as::<Toy>().fetch_all(pool).await?;
        let toys = rows
            .into_iter()
            .map(|toy| annotate(toy, filter.origin))
            .collect();

        Ok(ToySearchResult { toys, total })
    }
}

/// Append `AND ...` clauses for every active filter
fn push_predicates(query: &mut QueryBuilder<'_, Postgres>, filter: &ToyFilter) {
    if let Some(available) = filter.is_available {
        query.push(" AND is_available = ").push_bind(available);
    }

    if !filter.age_ranges.is_empty() {
        let values: Vec<String> = filter
            .age_ranges
            .iter()
            .map(|a| a.as_str().to_string())
            .collect();
        query.push(" AND age_range = ANY(").push_bind(values).push(")");
    }

    if !filter.conditions.is_empty() {
        let values: Vec<String> = filter
            .conditions
            .iter()
            .map(|c| c.as_str().to_string())
            .collect();
        query.push(" AND condition = ANY(").push_bind(values).push(")");
    }

    if !filter.categories.is_empty() {
        query
            .push(" AND lower(category) = ANY(")
            .push_bind(filter.categories.clone())
            .push(")");
    }

    if !filter.tags.is_empty() {
        query.push(" AND tags && ").push_bind(filter.tags.clone());
    }

    if let Some(user_id) = filter.user_id {
        query.push(" AND user_id = ").push_bind(user_id);
    }

    if let Some(pattern) = filter.search_pattern() {
        query
            .push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR EXISTS (SELECT 1 FROM unnest(tags) AS tag WHERE tag ILIKE ")
            .push_bind(pattern)
            .push("))");
    }

    if let (Some(origin), Some(radius_km)) = (filter.origin, filter.radius_km) {
        let bbox = BoundingBox::around(origin.latitude, origin.longitude, radius_km);
        query
            .push(" AND latitude IS NOT NULL AND longitude IS NOT NULL")
            .push(" AND latitude BETWEEN ")
            .push_bind(bbox.min_lat)
            .push(" AND ")
            .push_bind(bbox.max_lat);
        if let Some((min_lng, max_lng)) = bbox.lng_range {
            query
                .push(" AND longitude BETWEEN ")
                .push_bind(min_lng)
                .push(" AND ")
                .push_bind(max_lng);
        }
    }
}

fn annotate(toy: Toy, origin: Option<GeoPoint>) -> ToyWithDistance {
    let distance_km = match (origin, toy.latitude, toy.longitude) {
        (Some(origin), Some(lat), Some(lng)) => Some(calculate_distance_km(
            origin.latitude,
            origin.longitude,
            lat,
            lng,
        )),
        _ => None,
    };
    ToyWithDistance { toy, distance_km }
}

/// Annotate, radius-filter and order rows that arrive newest first.
///
/// The radius is inclusive. Under distance ordering, toys without
/// coordinates go last and ties keep newest-first order.
pub fn rank_by_distance(rows: Vec<Toy>, filter: &ToyFilter) -> Vec<ToyWithDistance> {
    let mut matched: Vec<ToyWithDistance> = rows
        .into_iter()
        .map(|toy| annotate(toy, filter.origin))
        .filter(|row| match filter.radius_km {
            Some(radius) => row.distance_km.is_some_and(|d| d <= radius),
            None => true,
        })
        .collect();

    if filter.sort == ToySort::Distance {
        // Stable sort: equal distances stay newest first
        matched.sort_by(|a, b| match (a.distance_km, b.distance_km) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
    }

    matched
}
