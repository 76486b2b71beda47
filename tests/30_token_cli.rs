use std::process::Command;

use anyhow::{Context, Result};
use museum_api::auth::TokenIssuer;

#[test]
fn token_command_prints_verifiable_token() -> Result<()> {
    let output = Command::new(env!("CARGO_BIN_EXE_museum-api"))
        .args(["token", "curator-42"])
        .env("JWT_SECRET", "cli-test-secret")
        .env_remove("JWT_EXPIRY_HOURS")
        .output()
        .context("failed to run token command")?;

    assert!(output.status.success(), "token command failed: {:?}", output);

    let token = String::from_utf8(output.stdout)?.trim().to_string();
    let claims = TokenIssuer::new("cli-test-secret", 24)
        .verify_token(&token)
        .context("token should verify")?;
    assert_eq!(claims.id, "curator-42");

    assert!(TokenIssuer::new("wrong-secret", 24).verify_token(&token).is_none());
    Ok(())
}
