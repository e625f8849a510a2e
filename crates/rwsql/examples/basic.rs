//! Basic end-to-end usage: dual pools, builder chains, raw passthrough.
//!
//! Expects `RWSQL_HOST`, `RWSQL_DATABASE`, `RWSQL_USER`, `RWSQL_PASSWORD`
//! (and optionally `RWSQL_READ_HOST` for a replica) in the environment or a
//! `.env` file.

use rwsql::{Db, DbConfig, Order, PoolConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let write = PoolConfig::new(env("RWSQL_HOST"), env("RWSQL_DATABASE"))
        .user(env("RWSQL_USER"))
        .password(env("RWSQL_PASSWORD"))
        .max_connections(8);
    let mut config = DbConfig::new().write(write.clone());
    if let Ok(read_host) = std::env::var("RWSQL_READ_HOST") {
        config = config.read(PoolConfig { host: read_host, ..write });
    }

    let db = Db::connect(config).await?;

    db.write(
        "CREATE TABLE IF NOT EXISTS demo_users (
            id BIGINT AUTO_INCREMENT PRIMARY KEY,
            name VARCHAR(64) NOT NULL UNIQUE,
            visits BIGINT NOT NULL DEFAULT 0,
            created_at DATETIME NOT NULL
        )",
        (),
    )
    .await?;

    // upsert keyed on the unique name
    let id = db
        .table("demo_users")
        .set("name", "alice")
        .set("created_at", "NOW()")
        .on_duplicate_raw("visits = visits + 1")
        .upsert()
        .await?;
    println!("upserted alice (id: {id:?})");

    // read back through the read route
    let rows = db
        .table("demo_users")
        .select(&["id", "name", "visits"])
        .like("name", "ali")
        .order_by("id", Order::Desc)
        .limit(10)
        .total()
        .get()
        .await?;
    for row in rows {
        println!("{row:?}");
    }

    db.close().await?;
    Ok(())
}

fn env(key: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| panic!("{key} must be set"))
}
