use std::time::Duration;

use diesel::r2d2;
use failsafe::backoff::EqualJittered;
use failsafe::failure_policy::{ConsecutiveFailures, OrElse, SuccessRateOverTimeWindow};
use failsafe::{CircuitBreaker, StateMachine};
use r2d2_redis::redis::{self, Commands, RedisError};
use r2d2_redis::RedisConnectionManager;

use crate::config::Config;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::Food;
use crate::query;

pub(crate) type RedisPool = r2d2::Pool<RedisConnectionManager>;

pub(crate) type CircuitBreakerType = StateMachine<
    OrElse<SuccessRateOverTimeWindow<EqualJittered>, ConsecutiveFailures<EqualJittered>>,
    (),
>;

const GET_ALL_FOOD_KEY: &str = "all";
const CACHE_POOL_CONNECTION_TIMEOUT_MILLIS: u64 = 250;
const CACHE_POOL_EXPIRE_SECONDS: u64 = 60;

#[derive(Debug, thiserror::Error)]
enum CacheError {
    #[error("redis: {0}")]
    Redis(#[from] RedisError),
    #[error("payload: {0}")]
    Payload(#[from] bincode::Error),
}

/// Read-through redis cache in front of the food catalog.
///
/// Redis is optional: when it cannot be reached the catalog is read straight from
/// MySQL. MySQL reads go through a circuit breaker so a struggling database is
/// answered with 503 instead of piling up blocked workers.
#[derive(Clone)]
pub(crate) struct FoodCache {
    redis_pool: RedisPool,
    circuit_breaker: CircuitBreakerType,
    ttl: Duration,
}

impl FoodCache {
    pub(crate) fn new(redis_pool: RedisPool, circuit_breaker: CircuitBreakerType, ttl: Duration) -> Self {
        FoodCache {
            redis_pool,
            circuit_breaker,
            ttl,
        }
    }

    pub(crate) fn foods(&self, db_pool: &DbPool) -> Result<Vec<Food>, ApiError> {
        let mut redis_conn = match self.redis_pool.get() {
            Ok(conn) => Some(conn),
            Err(err) => {
                log::warn!("redis unavailable, reading food catalog from mysql: {}", err);
                None
            }
        };

        if let Some(conn) = redis_conn.as_mut() {
            match read_foods(conn) {
                Ok(Some(foods)) => return Ok(foods),
                Ok(None) => log::debug!("food catalog cache miss"),
                Err(err) => log::warn!("ignoring cached food catalog: {}", err),
            }
        }

        let foods = self.load_foods(db_pool)?;

        if let Some(conn) = redis_conn.as_mut() {
            if let Err(err) = write_foods(conn, &foods, self.ttl) {
                log::warn!("could not cache food catalog: {}", err);
            }
        }
        Ok(foods)
    }

    fn load_foods(&self, db_pool: &DbPool) -> Result<Vec<Food>, ApiError> {
        let result = self.circuit_breaker.call(|| {
            let conn = db_pool.get()?;
            query::find_all_foods(&conn)
        });
        match result {
            Ok(foods) => Ok(foods),
            Err(failsafe::Error::Inner(err)) => Err(err),
            Err(failsafe::Error::Rejected) => {
                log::warn!("circuit breaker open, rejecting food catalog read");
                Err(ApiError::ServiceUnavailable)
            }
        }
    }
}

pub(crate) fn create_redis_pool(config: &Config) -> Result<RedisPool, RedisError> {
    let manager = RedisConnectionManager::new(config.redis_url.as_str())?;
    // build_unchecked: the service starts even when redis is down
    Ok(r2d2::Pool::builder()
        .max_size(config.cache_pool_max_open)
        .max_lifetime(Some(Duration::from_secs(CACHE_POOL_EXPIRE_SECONDS)))
        .min_idle(Some(config.cache_pool_min_idle))
        .connection_timeout(Duration::from_millis(CACHE_POOL_CONNECTION_TIMEOUT_MILLIS))
        .build_unchecked(manager))
}

fn read_foods(conn: &mut redis::Connection) -> Result<Option<Vec<Food>>, CacheError> {
    let value: Option<Vec<u8>> = conn.get(GET_ALL_FOOD_KEY)?;
    match value {
        Some(bytes) if !bytes.is_empty() => Ok(Some(Food::list_from_bytes(&bytes)?)),
        _ => Ok(None),
    }
}

fn write_foods(conn: &mut redis::Connection, foods: &[Food], ttl: Duration) -> Result<(), CacheError> {
    let bytes = Food::list_to_bytes(foods)?;
    let seconds = ttl.as_secs() as usize;
    let _: () = conn.set_ex(GET_ALL_FOOD_KEY, bytes, seconds)?;
    Ok(())
}
