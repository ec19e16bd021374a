use bloodlink_state::SessionStore;

pub async fn run(store: &SessionStore) -> anyhow::Result<()> {
    if store.clear().await? {
        println!("Cleared stored request in session '{}'.", store.session());
    } else {
        println!("Nothing stored in session '{}'.", store.session());
    }
    Ok(())
}
