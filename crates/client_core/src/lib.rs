//! Client side of the assistant chat: HTTP transport to the backend, the
//! poll/reconcile loop that keeps a view in sync with backend state, and the
//! worker thread that performs network calls off the UI thread.

pub mod bridge;
pub mod config;
pub mod controller;
pub mod error;
pub mod reconcile;
pub mod transport;
pub mod view;

pub use bridge::{spawn_backend_worker, BackendCommand, PollTicket, UiEvent};
pub use config::{load_client_settings, ClientSettings};
pub use controller::ChatController;
pub use error::{ClientError, ClientResult};
pub use reconcile::{reconcile, Reconciled, RedrawPolicy, RenderOptions, UiState};
pub use transport::BackendClient;
pub use view::{MessageStyle, RenderedMessage, View, ViewModel};
