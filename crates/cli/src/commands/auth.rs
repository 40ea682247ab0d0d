use anyhow::Result;
use storyfeed_service::SessionService;

pub async fn login(sessions: &SessionService, email: &str, password: &str) -> Result<()> {
    let session = sessions.login(email, password).await?;
    println!("logged in as {} <{}>", session.name, session.email);
    Ok(())
}

pub async fn register(
    sessions: &SessionService,
    name: &str,
    email: &str,
    password: &str,
) -> Result<()> {
    sessions.register(name, email, password).await?;
    println!("account created for {}; log in with `storyfeed login`", email);
    Ok(())
}

pub async fn logout(sessions: &SessionService) -> Result<()> {
    sessions.logout().await?;
    println!("logged out, local cache cleared");
    Ok(())
}
