//! Ordered server action chains for [`micro_message`] requests.
//!
//! A [`ServerAction`] turns a request, plus the response of the action that
//! ran before it, into a new response. [`ServerActions`] runs a list of them
//! in order:
//!
//! ```
//! use micro_action::{ServerActions, action_fn};
//! use micro_message::env::ServerParams;
//! use micro_message::protocol::{Response, ResponseBody, ServerRequest};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let mut actions = ServerActions::default();
//! actions.add_last(action_fn(|request: &ServerRequest<()>, _previous| {
//!     let name = request.get_param("name").unwrap_or("world");
//!     Ok(Response::new(ResponseBody::from(format!("hello {name}"))))
//! }));
//!
//! let server: ServerParams = [("REQUEST_URI", "/?name=micro"), ("QUERY_STRING", "name=micro")].into_iter().collect();
//! let request = ServerRequest::from_server_params(server, ())?;
//!
//! let response = actions.invoke(&request).await?;
//! assert_eq!(response.into_body().into_bytes().await?, "hello micro");
//! # Ok(())
//! # }
//! ```
//!
//! Actions come in three shapes:
//!
//! - any type implementing [`ServerAction`] directly
//! - a synchronous function wrapped with [`action_fn`]
//! - a [`BoundAction`] working on an [`ActionState`], wrapped with [`bound`]
//!
//! A [`ServerActions`] is itself a `ServerAction`, so chains nest.

mod action;
mod bound;
mod chain;
mod error;

pub use action::FnAction;
pub use action::ServerAction;
pub use action::action_fn;
pub use bound::ActionState;
pub use bound::Bound;
pub use bound::BoundAction;
pub use bound::bound;
pub use chain::ServerActions;
pub use error::ActionError;
