use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

pub const DEFAULT_POOL_MAX_SIZE: u32 = 10;

pub fn create_pool(database_url: &str, max_size: u32) -> Result<DbPool, r2d2::Error> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder().max_size(max_size).build(manager)
}
