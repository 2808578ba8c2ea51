use bytes::Bytes;
use http::Response;
use http_body_util::BodyExt;
use std::time::Duration;

use micro_result::content::Html;
use micro_result::error::ResultError;
use micro_result::event_source::{Event, event_channel};
use micro_result::results::{CREATED, OK, redirect};
use micro_result::session::Flash;
use micro_result::{ActionResult, AsyncResult, CookieConfig, PlainResult, ResponseBody};
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

async fn print(name: &str, result: ActionResult) {
    let response: Response<ResponseBody> = match result.into_response().await {
        Ok(response) => response,
        Err(e) => {
            error!(name, cause = %e, "failed to build response");
            return;
        }
    };

    let (parts, body) = response.into_parts();
    let body: Bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(never) => match never {},
    };

    info!(name, status = %parts.status, headers = ?parts.headers, body = ?body, "drained result");
}

async fn load_user(id: u32) -> Result<String, std::io::Error> {
    tokio::time::sleep(Duration::from_millis(10)).await;
    if id == 0 { Err(std::io::Error::other("no such user")) } else { Ok(format!("user-{id}")) }
}

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let config = CookieConfig::builder()
        .secret("an example secret that is long enough to derive a key")
        .session_max_age(Duration::from_secs(3600))
        .build()
        .expect("valid cookie config");
    config.install().expect("cookie config installed once");

    print("hello", OK.apply("hello").into()).await;

    print("html", OK.apply(Html::new("<h1>micro</h1>")).with_session_values([("user", "micro")]).into()).await;

    print("redirect", redirect("/login").flashing(&Flash::new().with("error", "login required")).into()).await;

    let created = AsyncResult::try_new(async {
        let user = load_user(42).await?;
        Ok::<_, std::io::Error>(CREATED.apply(user))
    });
    print("async", created.into()).await;

    let failing = AsyncResult::try_new(async { load_user(0).await.map(|user| OK.apply(user)) });
    print("async failure", failing.into()).await;

    let (events, mut sender) = event_channel(2);
    tokio::spawn(async move {
        for i in 0..3 {
            let _ = sender.send(Event::from_data(format!("{i}"))).await;
        }
        let _ = sender.close().await;
    });
    print("events", events.into()).await;

    let deferred: Result<ActionResult, ResultError> = AsyncResult::new(async { OK.empty() }).resolve().await;
    info!(is_async = deferred.as_ref().map(ActionResult::is_async).unwrap_or_default(), "resolved deferred result");
}
