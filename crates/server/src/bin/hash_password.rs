//! Print an argon2 digest for a password, for seeding accounts by hand.

fn main() {
    let password = std::env::args().nth(1).unwrap_or_else(|| "testuser123".to_string());
    match server::auth::password::hash_password(&password) {
        Ok(digest) => println!("{digest}"),
        Err(e) => {
            eprintln!("Failed to hash password: {}", e.message);
            std::process::exit(1);
        }
    }
}
