//! Diesel/Postgres implementations of `matchcore`'s repository traits.

use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};

use matchcore::error::EngineError;
use matchcore::model::{LinkStatus, Market, MarketLink, Venue, WatchlistItem};
use matchcore::repository::{IngestionRepository, MarketLinkRepository, MarketRepository, WatchlistRepository};

use crate::convert::{link_status_to_str, venue_to_str};
use crate::error::RepoError;
use crate::models::{MarketLinkRow, MarketRow, WatchlistItemRow};
use crate::schema::{market_links, markets, watchlist_items};
use crate::writer::{write_all, BatchSizer};

pub type PgPool = Pool<ConnectionManager<PgConnection>>;

pub fn build_pool(database_url: &str, max_size: u32) -> Result<PgPool, RepoError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder().max_size(max_size).build(manager).map_err(|e| RepoError::Connection(e.to_string()))
}

pub struct PgRepo {
    pool: PgPool,
    write_batch_size: usize,
    write_min_batch_size: usize,
}

impl PgRepo {
    pub fn new(pool: PgPool, write_batch_size: usize, write_min_batch_size: usize) -> PgRepo {
        PgRepo { pool, write_batch_size, write_min_batch_size }
    }

    fn conn(&self) -> Result<PooledConnection<ConnectionManager<PgConnection>>, RepoError> {
        self.pool.get().map_err(RepoError::from)
    }
}

impl MarketRepository for PgRepo {
    fn markets_for_venue(&self, venue: Venue, since: DateTime<Utc>) -> Result<Vec<Market>, EngineError> {
        let mut conn = self.conn().map_err(Into::<EngineError>::into)?;
        let rows: Vec<MarketRow> = markets::table
            .filter(markets::venue.eq(venue_to_str(venue)))
            .filter(markets::close_time.is_null().or(markets::close_time.ge(since)))
            .load(&mut conn)
            .map_err(RepoError::from)
            .map_err(Into::<EngineError>::into)?;

        rows.into_iter()
            .map(|r| r.into_domain().map_err(Into::into))
            .collect()
    }

    fn market_by_id(&self, id: i64) -> Result<Option<Market>, EngineError> {
        let mut conn = self.conn().map_err(Into::<EngineError>::into)?;
        let row: Option<MarketRow> = markets::table
            .find(id)
            .first(&mut conn)
            .optional()
            .map_err(RepoError::from)
            .map_err(Into::<EngineError>::into)?;
        row.map(|r| r.into_domain().map_err(Into::into)).transpose()
    }
}

impl MarketLinkRepository for PgRepo {
    fn upsert_links(&mut self, links: &[MarketLink]) -> Result<usize, EngineError> {
        let mut conn = self.conn().map_err(Into::<EngineError>::into)?;
        let rows: Vec<MarketLinkRow> = links.iter().map(MarketLinkRow::from_domain).collect();
        let mut sizer = BatchSizer::new(self.write_batch_size, self.write_min_batch_size);

        write_all(&rows, &mut sizer, |batch: &[MarketLinkRow]| -> Result<usize, RepoError> {
            conn.transaction(|conn| {
                // Score/reason/algo_version/updated_at refresh unconditionally on
                // every rerun, even for a link a human has already confirmed or
                // rejected, so diagnostics never go stale. Only `status` is
                // protected once it reaches a terminal state, which the second
                // statement below enforces with its own conflict filter.
                let written = diesel::insert_into(market_links::table)
                    .values(batch)
                    .on_conflict((market_links::left_market_id, market_links::right_market_id))
                    .do_update()
                    .set((
                        market_links::score.eq(diesel::upsert::excluded(market_links::score)),
                        market_links::reason.eq(diesel::upsert::excluded(market_links::reason)),
                        market_links::algo_version.eq(diesel::upsert::excluded(market_links::algo_version)),
                        market_links::updated_at.eq(diesel::upsert::excluded(market_links::updated_at)),
                    ))
                    .execute(conn)?;

                let stmt = diesel::insert_into(market_links::table)
                    .values(batch)
                    .on_conflict((market_links::left_market_id, market_links::right_market_id))
                    .do_update()
                    .set(market_links::status.eq(diesel::upsert::excluded(market_links::status)));
                let stmt = diesel::query_dsl::methods::FilterDsl::filter(
                    stmt,
                    market_links::status
                        .ne(link_status_to_str(LinkStatus::Confirmed))
                        .and(market_links::status.ne(link_status_to_str(LinkStatus::Rejected))),
                );
                stmt.execute(conn)?;

                Ok::<usize, diesel::result::Error>(written)
            })
            .map_err(RepoError::from)
        })
        .map_err(Into::into)
    }

    fn links_for_market(&self, market_id: i64) -> Result<Vec<MarketLink>, EngineError> {
        let mut conn = self.conn().map_err(Into::<EngineError>::into)?;
        let rows: Vec<MarketLinkRow> = market_links::table
            .filter(
                market_links::left_market_id
                    .eq(market_id)
                    .or(market_links::right_market_id.eq(market_id)),
            )
            .load(&mut conn)
            .map_err(RepoError::from)
            .map_err(Into::<EngineError>::into)?;
        rows.into_iter().map(|r| r.into_domain().map_err(Into::into)).collect()
    }

    fn existing_status(&self, left_market_id: i64, right_market_id: i64) -> Result<Option<LinkStatus>, EngineError> {
        let mut conn = self.conn().map_err(Into::<EngineError>::into)?;
        let status: Option<String> = market_links::table
            .find((left_market_id, right_market_id))
            .select(market_links::status)
            .first(&mut conn)
            .optional()
            .map_err(RepoError::from)
            .map_err(Into::<EngineError>::into)?;
        status
            .map(|s| crate::convert::link_status_from_str(&s).map_err(Into::into))
            .transpose()
    }
}

impl WatchlistRepository for PgRepo {
    fn replace_watchlist(&mut self, items: &[WatchlistItem]) -> Result<usize, EngineError> {
        let mut conn = self.conn().map_err(Into::<EngineError>::into)?;
        let rows: Vec<WatchlistItemRow> = items.iter().map(WatchlistItemRow::from_domain).collect();

        conn.transaction(|conn| {
            diesel::delete(watchlist_items::table).execute(conn)?;
            diesel::insert_into(watchlist_items::table).values(&rows).execute(conn)
        })
        .map_err(RepoError::from)
        .map_err(Into::into)
    }

    fn current_watchlist(&self) -> Result<Vec<WatchlistItem>, EngineError> {
        let mut conn = self.conn().map_err(Into::<EngineError>::into)?;
        let rows: Vec<WatchlistItemRow> = watchlist_items::table
            .load(&mut conn)
            .map_err(RepoError::from)
            .map_err(Into::<EngineError>::into)?;
        rows.into_iter().map(|r| r.into_domain().map_err(Into::into)).collect()
    }
}

impl IngestionRepository for PgRepo {
    fn upsert_markets(&mut self, venue: Venue, markets_in: &[Market]) -> Result<usize, EngineError> {
        let mut conn = self.conn().map_err(Into::<EngineError>::into)?;
        let rows: Vec<MarketRow> = markets_in
            .iter()
            .inspect(|m| debug_assert_eq!(m.venue, venue))
            .map(MarketRow::from_domain)
            .collect();
        let mut sizer = BatchSizer::new(self.write_batch_size, self.write_min_batch_size);

        write_all(&rows, &mut sizer, |batch: &[MarketRow]| -> Result<usize, RepoError> {
            diesel::insert_into(markets::table)
                .values(batch)
                .on_conflict(markets::id)
                .do_update()
                .set((
                    markets::title.eq(diesel::upsert::excluded(markets::title)),
                    markets::category.eq(diesel::upsert::excluded(markets::category)),
                    markets::status.eq(diesel::upsert::excluded(markets::status)),
                    markets::close_time.eq(diesel::upsert::excluded(markets::close_time)),
                    markets::derived_topic.eq(diesel::upsert::excluded(markets::derived_topic)),
                    markets::metadata.eq(diesel::upsert::excluded(markets::metadata)),
                    markets::outcomes.eq(diesel::upsert::excluded(markets::outcomes)),
                ))
                .execute(&mut conn)
                .map_err(RepoError::from)
        })
        .map_err(Into::into)
    }
}
