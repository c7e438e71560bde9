use std::time::Duration;

use cookieseal::{AuthConfig, DefaultAuthenticator, Payload, Secret};

pub fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("debug")
        .init();

    // In production the secret comes from COOKIESEAL_SECRET via AuthConfig::from_env().
    let config = AuthConfig::with_secret(Secret::generate());
    let auth = DefaultAuthenticator::from_config(&config)?;

    // The server mints a cookie value after a successful login.
    let payload = Payload::new("mrf").with("role", "editor");
    let cookie = auth.mint(&payload, Duration::from_secs(600))?;
    println!("Set-Cookie: auth={cookie}; HttpOnly; Secure");

    // On the next request the cookie value comes back untouched.
    let user = auth.validate(&cookie)?;
    println!("authenticated as {}", user.subject());

    // An edited cookie is rejected. Every failure means "not authenticated".
    let mut tampered = cookie.clone();
    let last = tampered.pop().unwrap_or('A');
    tampered.push(if last == 'A' { 'B' } else { 'A' });
    match auth.validate(&tampered) {
        Ok(_) => println!("tampered cookie accepted?!"),
        Err(e) => println!("tampered cookie rejected ({})", e.kind()),
    }

    Ok(())
}
