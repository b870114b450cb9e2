// Admin utility: create (or reuse) a back-office user and issue an API access token.
//
// Usage:
//   cargo run --bin issue_token -- <email> [name] [db_path]
//
// The plain token is printed once; only its SHA-256 digest is stored.

use anyhow::Context;
use student_records::app::get_default_db_path;
use student_records::db::{init_schema, open_sqlite_connection};
use student_records::logging;
use student_records::repository::UserRepository;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

fn main() -> anyhow::Result<()> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let email = args
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .context("usage: issue_token <email> [name] [db_path]")?;
    let name = args.next().unwrap_or_else(|| "Admin".to_string());
    let db_path = args.next().unwrap_or_else(get_default_db_path);

    let conn = open_sqlite_connection(&db_path)
        .with_context(|| format!("cannot open database: {}", db_path))?;
    init_schema(&conn)?;
    let user_repo = UserRepository::from_connection(Arc::new(Mutex::new(conn)));

    let user = match user_repo.find_by_email(&email)? {
        Some(user) => user,
        None => user_repo.create_user(&name, &email)?,
    };

    let token = Uuid::new_v4().simple().to_string();
    user_repo.register_token(user.id, "auth_token", &token)?;

    tracing::info!(user_id = user.id, email = %user.email, "access token issued");
    println!("user_id={}", user.id);
    println!("token={}", token);
    Ok(())
}
