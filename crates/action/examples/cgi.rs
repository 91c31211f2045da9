//! A CGI program: run it from a web server's `cgi-bin`, or by hand with
//!
//! ```text
//! REQUEST_METHOD=POST QUERY_STRING=name=micro CONTENT_TYPE=application/x-www-form-urlencoded \
//!     CONTENT_LENGTH=11 cargo run --example cgi <<< "color=green"
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderValue, StatusCode};
use micro_action::{ActionError, ActionState, BoundAction, ServerActions, action_fn, bound};
use micro_message::connection::{ResponseWriter, StatusLine};
use micro_message::env::{RequestMarshaller, ServerParams};
use micro_message::protocol::{BoxError, Response, ResponseBody, ServerRequest};
use tokio::io::AsyncReadExt;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

fn greet(request: &ServerRequest<Bytes>, _previous: Option<Response>) -> Result<Response, BoxError> {
    let name = request.get_param("name").unwrap_or("world");
    Ok(Response::new(ResponseBody::from(format!("hello {name}\n"))))
}

/// Lists the submitted form fields below the previous response.
struct EchoForm;

#[async_trait]
impl BoundAction<Bytes> for EchoForm {
    async fn handle(&self, mut state: ActionState<'_, Bytes>) -> Result<Response, ActionError> {
        let request = state.request()?;
        let mut body = match state.take_previous_response() {
            Some(previous) => previous.into_body().into_bytes().await?.to_vec(),
            None => vec![],
        };

        if let Some(form) = request.form_params() {
            for (name, value) in &form {
                body.extend_from_slice(format!("{name} = {value}\n").as_bytes());
            }
        }

        let mut response = Response::new(ResponseBody::from(Bytes::from(body)));
        response.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
        Ok(response)
    }
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // stdout carries the response
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).with_writer(std::io::stderr).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let server = ServerParams::from_env();
    let length = server.get_str("CONTENT_LENGTH").and_then(|length| length.trim().parse::<u64>().ok()).unwrap_or(0);

    let mut body = Vec::new();
    tokio::io::stdin().take(length).read_to_end(&mut body).await?;

    let request = RequestMarshaller::default().marshal(server, Bytes::from(body))?;
    info!(method = %request.method(), uri = %request.uri(), "handling cgi request");

    let mut actions = ServerActions::default();
    actions.add_last(action_fn(greet)).add_last(bound(EchoForm));

    let mut response = match actions.invoke(&request).await {
        Ok(response) => response,
        Err(e) => {
            error!(cause = %e, "server actions failed");
            let mut response = Response::new(ResponseBody::from("internal server error\n"));
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
        }
    };

    if let Some(length) = http_body::Body::size_hint(response.body()).exact() {
        response.headers_mut().insert(CONTENT_LENGTH, HeaderValue::from(length));
    }

    let writer = ResponseWriter::builder().status_line(StatusLine::Cgi).build();
    writer.send(&mut tokio::io::stdout(), response).await?;
    Ok(())
}
