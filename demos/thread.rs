use std::sync::Arc;
use worldon::error::*;
use worldon::{timeline, Client, Fetch, Renderable, Session, Threadable};

#[tokio::main]
async fn main() -> Result<()> {
    let fetch: Arc<dyn Fetch> = Arc::new(Client::new("worldon")?);
    let session = Session::anonymous("mastodon.social");

    let statuses = timeline::fetch(fetch.as_ref(), &session, &timeline::Endpoint::PublicLocal).await?;

    for status in statuses.iter().filter(|s| s.has_receive_message()).take(3) {
        println!("{}\n", status.description());

        match status.replyto_source_d(fetch.clone()).await? {
            Some(parent) => println!("  in reply to {}: {}", parent.user().acct, parent.description()),
            None => println!("  parent not found"),
        }
    }

    Ok(())
}
