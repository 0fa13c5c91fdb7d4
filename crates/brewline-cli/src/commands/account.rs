use brewline_state::AppStores;

/// Sign in and persist the session for later invocations.
///
/// # Errors
///
/// Returns an error if the server rejects the credentials.
pub(crate) async fn run_login(app: &AppStores, phone: &str, password: &str) -> anyhow::Result<()> {
    let user = app.auth.login(phone, password).await?;
    println!("signed in as {} ({})", user.name, user.phone);
    Ok(())
}

pub(crate) async fn run_logout(app: &AppStores) {
    if !app.auth.is_authenticated() {
        println!("not signed in");
        return;
    }
    app.auth.logout().await;
    println!("signed out");
}

/// Print the signed-in account, refreshed from the server.
///
/// # Errors
///
/// Returns an error if the profile cannot be fetched. An expired session is
/// cleared before the error is returned.
pub(crate) async fn run_whoami(app: &AppStores) -> anyhow::Result<()> {
    let Some(user) = app.auth.fetch_profile().await? else {
        println!("not signed in; run `login` first");
        return Ok(());
    };
    println!("{:<8}{}", "ID", user.id);
    println!("{:<8}{}", "NAME", user.name);
    println!("{:<8}{}", "PHONE", user.phone);
    println!("{:<8}{}", "LEVEL", app.auth.user_level());
    println!("{:<8}{}", "POINTS", app.auth.user_points());
    Ok(())
}
